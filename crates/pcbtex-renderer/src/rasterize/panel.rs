use pcbtex_core::feature::PanelOutline;
use pcbtex_core::LayerFeature;

use super::{collect, LayerKind, RasterContext};
use crate::error::RenderError;
use crate::surface::{polygon_path, RasterSurface};

/// Sub-board outlines of a panel. Present on both sides; the bottom canvas
/// flip mirrors them like everything else.
pub(super) fn rasterize(
    ctx: &RasterContext<'_>,
    features: &[LayerFeature],
) -> Result<Option<RasterSurface>, RenderError> {
    let panels: Vec<&PanelOutline> = collect(ctx, features, |f| match f {
        LayerFeature::PanelOutline(p) => Some(p),
        _ => None,
    });
    if panels.is_empty() {
        return Ok(None);
    }

    let color = ctx.config.panel_outline;
    let width = ctx.length(ctx.config.panel_outline_width);
    let mut canvas = ctx.new_canvas()?;
    let mut drawn = 0usize;
    for sub_board in panels.iter().flat_map(|p| &p.sub_boards) {
        let outline = ctx.to_canvas_all(&sub_board.outline_points());
        if let Some(path) = polygon_path(&outline) {
            canvas.stroke_path(&path, color, width);
            drawn += 1;
        }
    }
    log::debug!("Rasterized {} panel sub-boards on {}", drawn, ctx.side);
    if drawn == 0 {
        return Ok(None);
    }
    Ok(Some(canvas.into_surface(LayerKind::PanelOutline)))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::config::RenderConfig;
    use pcbtex_core::feature::SubBoard;
    use pcbtex_core::{Point, Side};

    fn panel() -> LayerFeature {
        LayerFeature::PanelOutline(PanelOutline {
            sub_boards: vec![
                SubBoard {
                    center: Point::new(-2.5, 0.0),
                    width: 4.0,
                    height: 8.0,
                    outline: None,
                },
                SubBoard {
                    center: Point::new(2.5, 0.0),
                    width: 0.0,
                    height: 0.0,
                    outline: Some(vec![
                        Point::new(1.0, -4.0),
                        Point::new(4.0, -4.0),
                        Point::new(4.0, 4.0),
                    ]),
                },
            ],
        })
    }

    #[test]
    fn test_outlines_are_stroked_not_filled() {
        let board = board();
        let config = RenderConfig::default();
        let ctx = context(&board, &config, Side::Top);
        let surface = rasterize(&ctx, &[panel()]).unwrap().unwrap();
        // A thin stroke centred on a pixel boundary splits its coverage
        // unevenly between the two columns it touches.
        let edge = |x: u32| surface.alpha_at(x - 1, 50).max(surface.alpha_at(x, 50));
        // Left sub-board spans x 5..45 px, y 10..90 px.
        assert!(edge(5) > 100);
        assert!(edge(45) > 100);
        assert_eq!(surface.alpha_at(25, 50), 0);
        // Right sub-board's explicit outline: vertical edge at x = 90 px.
        assert!(edge(90) > 100);
    }

    #[test]
    fn test_empty_panel_has_no_surface() {
        let board = board();
        let config = RenderConfig::default();
        let ctx = context(&board, &config, Side::Top);
        let empty = LayerFeature::PanelOutline(PanelOutline {
            sub_boards: Vec::new(),
        });
        assert!(rasterize(&ctx, &[empty]).unwrap().is_none());
    }

    #[test]
    fn test_drawn_on_both_sides() {
        let board = board();
        let config = RenderConfig::default();
        for side in Side::BOTH {
            let ctx = context(&board, &config, side);
            assert!(rasterize(&ctx, &[panel()]).unwrap().is_some());
        }
    }
}
