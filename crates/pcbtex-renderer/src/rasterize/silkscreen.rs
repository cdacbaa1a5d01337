use pcbtex_core::feature::SilkscreenPath;
use pcbtex_core::{LayerFeature, Text};

use super::text::draw_text;
use super::{collect, LayerKind, RasterContext};
use crate::config::TextClass;
use crate::error::RenderError;
use crate::surface::{polyline_path, RasterSurface};

enum Marking<'f> {
    Text(&'f Text),
    Path(&'f SilkscreenPath),
}

pub(super) fn rasterize(
    ctx: &RasterContext<'_>,
    features: &[LayerFeature],
) -> Result<Option<RasterSurface>, RenderError> {
    let markings = collect(ctx, features, |f| match f {
        LayerFeature::SilkscreenText(t) => Some(Marking::Text(t)),
        LayerFeature::SilkscreenPath(p) => Some(Marking::Path(p)),
        _ => None,
    });
    if markings.is_empty() {
        return Ok(None);
    }

    let color = ctx.config.silkscreen;
    let mut canvas = ctx.new_canvas()?;
    let mut drawn = 0usize;
    for marking in &markings {
        let ok = match marking {
            Marking::Text(text) => draw_text(&mut canvas, ctx, text, TextClass::Silkscreen, color),
            Marking::Path(path) => match polyline_path(&ctx.to_canvas_all(&path.route)) {
                Some(p) => {
                    canvas.stroke_path(&p, color, ctx.length(path.stroke_width));
                    true
                }
                None => false,
            },
        };
        drawn += usize::from(ok);
    }
    log::debug!(
        "Rasterized {}/{} silkscreen markings on {}",
        drawn,
        markings.len(),
        ctx.side
    );
    if drawn == 0 {
        return Ok(None);
    }
    Ok(Some(canvas.into_surface(LayerKind::Silkscreen)))
}
