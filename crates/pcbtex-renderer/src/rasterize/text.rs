use pcbtex_core::{LayerColor, LayerFeature, Point, Text};
use tiny_skia::BlendMode;

use super::{collect, LayerKind, RasterContext};
use crate::config::TextClass;
use crate::error::RenderError;
use crate::surface::{polyline_path, Canvas, RasterSurface};
use crate::text::{layout_text, TextParams};

/// Draw one text element. Knockout text fills its padded box and punches
/// the glyph strokes out of it. Returns `false` if nothing was drawable.
pub(super) fn draw_text(
    canvas: &mut Canvas,
    ctx: &RasterContext<'_>,
    text: &Text,
    class: TextClass,
    color: LayerColor,
) -> bool {
    let params = TextParams::for_text(text, class, ctx.config);
    let Some(layout) = layout_text(&text.text, &params) else {
        return false;
    };
    let stroke = ctx.length(text.font_size * ctx.config.text_stroke_ratio);
    let outlines: Vec<Vec<Point>> = layout
        .placed_outlines(&text.anchor)
        .iter()
        .map(|o| ctx.to_canvas_all(o))
        .collect();

    match layout.placed_knockout(&text.anchor) {
        Some(rect) => {
            canvas.fill_polygon(&ctx.to_canvas_all(&rect), color);
            let mut scope = canvas.scope();
            scope.set_blend_mode(BlendMode::DestinationOut);
            stroke_outlines(&mut scope, &outlines, color, stroke);
        }
        None => stroke_outlines(canvas, &outlines, color, stroke),
    }
    true
}

fn stroke_outlines(canvas: &mut Canvas, outlines: &[Vec<Point>], color: LayerColor, width: f64) {
    for outline in outlines {
        if let Some(path) = polyline_path(outline) {
            canvas.stroke_path(&path, color, width);
        }
    }
}

/// Shared body of the text-only rasterizers.
pub(super) fn rasterize_texts(
    ctx: &RasterContext<'_>,
    texts: &[&Text],
    class: TextClass,
    color: LayerColor,
    kind: LayerKind,
) -> Result<Option<RasterSurface>, RenderError> {
    if texts.is_empty() {
        return Ok(None);
    }
    let mut canvas = ctx.new_canvas()?;
    let drawn = texts
        .iter()
        .filter(|t| draw_text(&mut canvas, ctx, t, class, color))
        .count();
    log::debug!("Rasterized {}/{} {} texts on {}", drawn, texts.len(), kind, ctx.side);
    if drawn == 0 {
        return Ok(None);
    }
    Ok(Some(canvas.into_surface(kind)))
}

pub(super) fn rasterize_copper_text(
    ctx: &RasterContext<'_>,
    features: &[LayerFeature],
) -> Result<Option<RasterSurface>, RenderError> {
    let texts = collect(ctx, features, |f| match f {
        LayerFeature::CopperText(t) => Some(t),
        _ => None,
    });
    rasterize_texts(
        ctx,
        &texts,
        TextClass::Copper,
        ctx.config.copper_exposed,
        LayerKind::CopperText,
    )
}
