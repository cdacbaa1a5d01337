use pcbtex_core::LayerFeature;

use super::text::rasterize_texts;
use super::{collect, LayerKind, RasterContext};
use crate::config::TextClass;
use crate::error::RenderError;
use crate::surface::RasterSurface;

/// Fabrication notes, drawn above silkscreen.
pub(super) fn rasterize(
    ctx: &RasterContext<'_>,
    features: &[LayerFeature],
) -> Result<Option<RasterSurface>, RenderError> {
    let texts = collect(ctx, features, |f| match f {
        LayerFeature::NoteText(t) => Some(t),
        _ => None,
    });
    rasterize_texts(ctx, &texts, TextClass::Note, ctx.config.note, LayerKind::Note)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::config::RenderConfig;
    use pcbtex_core::{Point, Side, Text};

    #[test]
    fn test_note_color_and_kind() {
        let board = board();
        let config = RenderConfig::default();
        let ctx = context(&board, &config, Side::Top);
        let features = vec![
            LayerFeature::NoteText(Text::new(Side::Top, "I", Point::new(0.0, 0.0), 2.0)),
            LayerFeature::SilkscreenText(Text::new(Side::Top, "I", Point::new(3.0, 0.0), 2.0)),
        ];
        let surface = rasterize(&ctx, &features).unwrap().unwrap();
        assert_eq!(surface.kind, LayerKind::Note);
        let px = surface.pixmap.pixel(50, 50).unwrap().demultiply();
        assert!((i32::from(px.green()) - i32::from(config.note.g)).abs() <= 1);
        assert_eq!(surface.alpha_at(80, 50), 0);
    }

    #[test]
    fn test_no_notes_is_none() {
        let board = board();
        let config = RenderConfig::default();
        let ctx = context(&board, &config, Side::Top);
        assert!(rasterize(&ctx, &[]).unwrap().is_none());
    }
}
