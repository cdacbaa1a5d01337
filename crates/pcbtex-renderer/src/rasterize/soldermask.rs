use pcbtex_core::LayerFeature;
use tiny_skia::BlendMode;

use super::{collect, pad, pour, LayerKind, RasterContext};
use crate::error::RenderError;
use crate::surface::RasterSurface;

/// Board outline in the material's mask color, opened over pads, plated
/// holes and exposed copper pours.
pub(super) fn rasterize(
    ctx: &RasterContext<'_>,
    features: &[LayerFeature],
) -> Result<Option<RasterSurface>, RenderError> {
    if !features.iter().any(|f| f.is_on(ctx.side)) {
        return Ok(None);
    }

    let color = ctx.config.soldermask.for_material(ctx.board.material);
    let mut canvas = ctx.new_canvas()?;
    if !canvas.fill_polygon(&ctx.to_canvas_all(&ctx.board.outline_points()), color) {
        log::warn!("Board outline on {} is degenerate; no soldermask", ctx.side);
        return Ok(None);
    }

    let openings = collect(ctx, features, |f| match f {
        LayerFeature::Pad(_) | LayerFeature::PlatedHole(_) => Some(f),
        LayerFeature::CopperPour(p) if !p.covered_with_solder_mask => Some(f),
        _ => None,
    });
    {
        let mut scope = canvas.scope();
        scope.set_blend_mode(BlendMode::DestinationOut);
        for feature in &openings {
            match feature {
                LayerFeature::Pad(p) => {
                    pad::draw_pad(&mut scope, ctx, p, color);
                }
                LayerFeature::PlatedHole(h) => {
                    scope.fill_circle(
                        ctx.to_canvas(&h.position),
                        ctx.length(h.outer_diameter / 2.0),
                        color,
                    );
                }
                LayerFeature::CopperPour(p) => pour::fill_pour_area(&mut scope, ctx, p, color),
                _ => {}
            }
        }
    }
    log::debug!("Rasterized soldermask on {} with {} openings", ctx.side, openings.len());
    Ok(Some(canvas.into_surface(LayerKind::Soldermask)))
}
