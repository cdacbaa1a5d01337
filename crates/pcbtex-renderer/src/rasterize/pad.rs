use pcbtex_core::feature::{Pad, PadShape, PlatedHole};
use pcbtex_core::{LayerColor, LayerFeature, Point};
use tiny_skia::{BlendMode, Transform};

use super::{collect, LayerKind, RasterContext};
use crate::error::RenderError;
use crate::surface::{rounded_rect_path, Canvas, RasterSurface};

/// Corner radius limited to `[0, min(width, height) / 2]`.
pub fn clamp_corner_radius(radius: Option<f64>, width: f64, height: f64) -> f64 {
    match radius {
        Some(r) if r.is_finite() => r.clamp(0.0, (width.min(height) / 2.0).max(0.0)),
        _ => 0.0,
    }
}

enum PadItem<'f> {
    Pad(&'f Pad),
    Hole(&'f PlatedHole),
}

pub(super) fn rasterize(
    ctx: &RasterContext<'_>,
    features: &[LayerFeature],
) -> Result<Option<RasterSurface>, RenderError> {
    let items = collect(ctx, features, |f| match f {
        LayerFeature::Pad(p) => Some(PadItem::Pad(p)),
        LayerFeature::PlatedHole(h) => Some(PadItem::Hole(h)),
        _ => None,
    });
    if items.is_empty() {
        return Ok(None);
    }

    // Pads are never under the mask.
    let color = ctx.config.copper_exposed;
    let mut canvas = ctx.new_canvas()?;
    let drawn = items
        .iter()
        .filter(|item| match item {
            PadItem::Pad(pad) => draw_pad(&mut canvas, ctx, pad, color),
            PadItem::Hole(hole) => draw_plated_hole(&mut canvas, ctx, hole, color),
        })
        .count();
    log::debug!("Rasterized {}/{} pads on {}", drawn, items.len(), ctx.side);
    if drawn == 0 {
        return Ok(None);
    }
    Ok(Some(canvas.into_surface(LayerKind::Pad)))
}

/// Fill a pad's copper shape using the canvas's current blend mode.
/// Returns `false` if the shape has no drawable path.
pub(super) fn draw_pad(
    canvas: &mut Canvas,
    ctx: &RasterContext<'_>,
    pad: &Pad,
    color: LayerColor,
) -> bool {
    match &pad.shape {
        PadShape::Rect {
            width,
            height,
            corner_radius,
        } => draw_rect(canvas, ctx, pad.position, *width, *height, 0.0, *corner_radius, color),
        PadShape::RotatedRect {
            width,
            height,
            rotation,
            corner_radius,
        } => draw_rect(
            canvas,
            ctx,
            pad.position,
            *width,
            *height,
            *rotation,
            *corner_radius,
            color,
        ),
        PadShape::Circle { radius } => {
            canvas.fill_circle(ctx.to_canvas(&pad.position), ctx.length(*radius), color)
        }
        PadShape::Polygon { points } => canvas.fill_polygon(&ctx.to_canvas_all(points), color),
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_rect(
    canvas: &mut Canvas,
    ctx: &RasterContext<'_>,
    center: Point,
    width: f64,
    height: f64,
    rotation: f64,
    corner_radius: Option<f64>,
    color: LayerColor,
) -> bool {
    let (w, h) = (ctx.length(width), ctx.length(height));
    let r = ctx.length(clamp_corner_radius(corner_radius, width, height));
    let Some(path) = rounded_rect_path(-w / 2.0, -h / 2.0, w, h, r) else {
        return false;
    };
    let c = ctx.to_canvas(&center);
    let mut scope = canvas.scope();
    scope.concat(Transform::from_translate(c.x as f32, c.y as f32));
    if rotation != 0.0 {
        // Canvas Y points down, so a counter-clockwise board turn is negative here.
        scope.concat(Transform::from_rotate(-rotation as f32));
    }
    scope.fill_path(&path, color);
    true
}

/// Annular ring with the drill punched out.
fn draw_plated_hole(
    canvas: &mut Canvas,
    ctx: &RasterContext<'_>,
    hole: &PlatedHole,
    color: LayerColor,
) -> bool {
    let c = ctx.to_canvas(&hole.position);
    if !canvas.fill_circle(c, ctx.length(hole.outer_diameter / 2.0), color) {
        return false;
    }
    let mut scope = canvas.scope();
    scope.set_blend_mode(BlendMode::DestinationOut);
    scope.fill_circle(c, ctx.length(hole.hole_diameter / 2.0), color);
    true
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::config::RenderConfig;
    use pcbtex_core::Side;

    fn filled(surface: &RasterSurface, x: u32, y: u32) -> bool {
        surface.alpha_at(x, y) > 127
    }

    fn pad(side: Side, x: f64, y: f64, shape: PadShape) -> LayerFeature {
        LayerFeature::Pad(Pad::new(side, Point::new(x, y), shape))
    }

    #[test]
    fn test_rect_pad_scenario() {
        let board = board();
        let config = RenderConfig::default();
        let ctx = context(&board, &config, Side::Top);
        let features = vec![pad(
            Side::Top,
            0.0,
            0.0,
            PadShape::Rect {
                width: 2.0,
                height: 1.0,
                corner_radius: None,
            },
        )];
        let surface = rasterize(&ctx, &features).unwrap().unwrap();
        assert_eq!((surface.width(), surface.height()), (100, 100));
        assert_eq!(surface.alpha_at(50, 50), 255);
        assert!(filled(&surface, 40, 45));
        assert!(filled(&surface, 59, 54));
        assert!(!filled(&surface, 39, 50));
        assert!(!filled(&surface, 60, 50));
        assert!(!filled(&surface, 50, 44));
        assert!(!filled(&surface, 50, 55));
    }

    #[test]
    fn test_no_pads_is_none() {
        let board = board();
        let config = RenderConfig::default();
        let ctx = context(&board, &config, Side::Top);
        let features = vec![pad(Side::Bottom, 0.0, 0.0, PadShape::Circle { radius: 1.0 })];
        assert!(rasterize(&ctx, &features).unwrap().is_none());
        assert!(rasterize(&ctx, &[]).unwrap().is_none());
    }

    #[test]
    fn test_corner_radius_clamp() {
        assert!((clamp_corner_radius(Some(5.0), 2.0, 1.0) - 0.5).abs() < 1e-12);
        assert!((clamp_corner_radius(Some(0.2), 2.0, 1.0) - 0.2).abs() < 1e-12);
        assert_eq!(clamp_corner_radius(Some(-1.0), 2.0, 1.0), 0.0);
        assert_eq!(clamp_corner_radius(None, 2.0, 1.0), 0.0);
    }

    #[test]
    fn test_rounded_corner_is_clear() {
        let board = board();
        let config = RenderConfig::default();
        let ctx = context(&board, &config, Side::Top);
        let features = vec![pad(
            Side::Top,
            0.0,
            0.0,
            PadShape::Rect {
                width: 4.0,
                height: 4.0,
                corner_radius: Some(10.0),
            },
        )];
        let surface = rasterize(&ctx, &features).unwrap().unwrap();
        // Radius clamps to 2 mm: the pad becomes a 4 mm circle.
        assert!(!filled(&surface, 31, 31));
        assert!(filled(&surface, 50, 31));
    }

    #[test]
    fn test_rotated_rect_turns_counter_clockwise() {
        let board = board();
        let config = RenderConfig::default();
        let ctx = context(&board, &config, Side::Top);
        let features = vec![pad(
            Side::Top,
            0.0,
            0.0,
            PadShape::RotatedRect {
                width: 4.0,
                height: 1.0,
                rotation: 90.0,
                corner_radius: None,
            },
        )];
        let surface = rasterize(&ctx, &features).unwrap().unwrap();
        assert!(filled(&surface, 50, 35));
        assert!(filled(&surface, 50, 65));
        assert!(!filled(&surface, 35, 50));
    }

    #[test]
    fn test_bottom_pad_is_flipped() {
        let board = board();
        let config = RenderConfig::default();
        let shape = PadShape::Circle { radius: 0.5 };
        let top = context(&board, &config, Side::Top);
        let surface = rasterize(&top, &[pad(Side::Top, 2.0, 3.0, shape.clone())])
            .unwrap()
            .unwrap();
        assert!(filled(&surface, 70, 20));
        assert!(!filled(&surface, 70, 80));

        let bottom = context(&board, &config, Side::Bottom);
        let surface = rasterize(&bottom, &[pad(Side::Bottom, 2.0, 3.0, shape)])
            .unwrap()
            .unwrap();
        assert!(filled(&surface, 70, 79));
        assert!(!filled(&surface, 70, 20));
    }

    #[test]
    fn test_plated_hole_on_both_sides() {
        let board = board();
        let config = RenderConfig::default();
        let features = vec![LayerFeature::PlatedHole(PlatedHole {
            position: Point::new(0.0, 0.0),
            outer_diameter: 3.0,
            hole_diameter: 1.0,
        })];
        for side in Side::BOTH {
            let ctx = context(&board, &config, side);
            let surface = rasterize(&ctx, &features).unwrap().unwrap();
            assert_eq!(surface.alpha_at(50, 50), 0);
            assert!(filled(&surface, 50, 38));
            assert!(!filled(&surface, 50, 30));
        }
    }

    #[test]
    fn test_polygon_pad_uses_absolute_points() {
        let board = board();
        let config = RenderConfig::default();
        let ctx = context(&board, &config, Side::Top);
        let features = vec![pad(
            Side::Top,
            100.0,
            100.0,
            PadShape::Polygon {
                points: vec![
                    Point::new(-4.0, -4.0),
                    Point::new(-2.0, -4.0),
                    Point::new(-2.0, -2.0),
                    Point::new(-4.0, -2.0),
                ],
            },
        )];
        let surface = rasterize(&ctx, &features).unwrap().unwrap();
        assert!(filled(&surface, 20, 80));
        assert!(!filled(&surface, 50, 50));
    }
}
