use pcbtex_core::feature::{CopperPour, PourShape};
use pcbtex_core::{build_boundary_polygon, BBox, LayerColor, LayerFeature, PolygonWithHoles};
use tiny_skia::BlendMode;

use super::{collect, LayerKind, RasterContext};
use crate::error::RenderError;
use crate::surface::{rings_path, Canvas, RasterSurface};

/// Flatten a pour shape into board-space polygons.
pub fn pour_polygons(shape: &PourShape, arc_segments: usize) -> Vec<PolygonWithHoles> {
    match shape {
        PourShape::Rect {
            center,
            width,
            height,
            rotation,
        } => {
            let exterior = BBox::from_center(*center, *width, *height)
                .corners()
                .iter()
                .map(|p| p.rotate_about(center, *rotation))
                .collect();
            vec![PolygonWithHoles {
                exterior,
                interiors: Vec::new(),
            }]
        }
        PourShape::Polygon { points } => vec![PolygonWithHoles {
            exterior: points.clone(),
            interiors: Vec::new(),
        }],
        PourShape::Brep { brep } => build_boundary_polygon(brep, arc_segments),
    }
}

pub(super) fn rasterize(
    ctx: &RasterContext<'_>,
    features: &[LayerFeature],
) -> Result<Option<RasterSurface>, RenderError> {
    let pours = collect(ctx, features, |f| match f {
        LayerFeature::CopperPour(p) => Some(p),
        _ => None,
    });
    if pours.is_empty() {
        return Ok(None);
    }

    let mut canvas = ctx.new_canvas()?;
    let mut drawn = 0usize;
    for pour in &pours {
        let polygons = pour_polygons(&pour.shape, ctx.config.arc_segments);
        let color = ctx.config.copper_color(pour.covered_with_solder_mask);
        if draw_polygons(&mut canvas, ctx, &polygons, color) {
            drawn += 1;
        } else {
            log::warn!("Copper pour on {} has a degenerate outline", ctx.side);
        }
    }
    log::debug!("Rasterized {}/{} copper pours on {}", drawn, pours.len(), ctx.side);
    if drawn == 0 {
        return Ok(None);
    }
    Ok(Some(canvas.into_surface(LayerKind::CopperPour)))
}

/// Fill each exterior, then punch its holes. `false` if no exterior filled.
fn draw_polygons(
    canvas: &mut Canvas,
    ctx: &RasterContext<'_>,
    polygons: &[PolygonWithHoles],
    color: LayerColor,
) -> bool {
    let mut filled = false;
    for polygon in polygons {
        if !canvas.fill_polygon(&ctx.to_canvas_all(&polygon.exterior), color) {
            continue;
        }
        filled = true;
        if polygon.interiors.is_empty() {
            continue;
        }
        let mut scope = canvas.scope();
        scope.set_blend_mode(BlendMode::DestinationOut);
        for hole in &polygon.interiors {
            scope.fill_polygon(&ctx.to_canvas_all(hole), color);
        }
    }
    filled
}

/// Fill the pour's net area (holes left untouched) with the current blend
/// mode. Used to open the soldermask over exposed copper.
pub(super) fn fill_pour_area(
    canvas: &mut Canvas,
    ctx: &RasterContext<'_>,
    pour: &CopperPour,
    color: LayerColor,
) {
    for polygon in pour_polygons(&pour.shape, ctx.config.arc_segments) {
        let rings: Vec<_> = std::iter::once(&polygon.exterior)
            .chain(&polygon.interiors)
            .map(|ring| ctx.to_canvas_all(ring))
            .collect();
        if let Some(path) = rings_path(rings.iter().map(Vec::as_slice)) {
            canvas.fill_path(&path, color);
        }
    }
}
