use pcbtex_core::feature::{RoutePoint, Trace};
use pcbtex_core::{LayerFeature, Point, Side};

use super::{collect, LayerKind, RasterContext};
use crate::error::RenderError;
use crate::surface::{polyline_path, RasterSurface};

/// Split a route into runs of consecutive wire points on `side`, as
/// `(position, width)` pairs. A via or a point on the other layer ends the
/// current run; runs shorter than two points are dropped.
pub(crate) fn wire_runs(trace: &Trace, side: Side) -> Vec<Vec<(Point, f64)>> {
    let mut runs = Vec::new();
    let mut current: Vec<(Point, f64)> = Vec::new();
    for point in &trace.route {
        match *point {
            RoutePoint::Wire { x, y, width, layer } if layer == side => {
                current.push((Point::new(x, y), width));
            }
            _ => {
                if current.len() >= 2 {
                    runs.push(std::mem::take(&mut current));
                } else {
                    current.clear();
                }
            }
        }
    }
    if current.len() >= 2 {
        runs.push(current);
    }
    runs
}

pub(super) fn rasterize(
    ctx: &RasterContext<'_>,
    features: &[LayerFeature],
) -> Result<Option<RasterSurface>, RenderError> {
    let traces = collect(ctx, features, |f| match f {
        LayerFeature::Trace(t) => Some(t),
        _ => None,
    });
    if traces.is_empty() {
        return Ok(None);
    }

    let mut canvas = ctx.new_canvas()?;
    let mut segments = 0usize;
    for trace in &traces {
        let color = ctx.config.copper_color(trace.covered_with_solder_mask);
        for run in wire_runs(trace, ctx.side) {
            // Each segment takes the width declared on its starting point.
            for pair in run.windows(2) {
                let (a, width) = pair[0];
                let (b, _) = pair[1];
                let points = [ctx.to_canvas(&a), ctx.to_canvas(&b)];
                if let Some(path) = polyline_path(&points) {
                    canvas.stroke_path(&path, color, ctx.length(width));
                    segments += 1;
                }
            }
        }
    }
    log::debug!(
        "Rasterized {} traces ({} segments) on {}",
        traces.len(),
        segments,
        ctx.side
    );
    if segments == 0 {
        return Ok(None);
    }
    Ok(Some(canvas.into_surface(LayerKind::Trace)))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::config::RenderConfig;

    fn wire(x: f64, y: f64, layer: Side) -> RoutePoint {
        RoutePoint::Wire {
            x,
            y,
            width: 0.4,
            layer,
        }
    }

    fn via(x: f64, y: f64) -> RoutePoint {
        RoutePoint::Via {
            x,
            y,
            from_layer: Side::Top,
            to_layer: Side::Bottom,
        }
    }

    #[test]
    fn test_runs_break_at_vias_and_layer_changes() {
        let trace = Trace {
            route: vec![
                wire(0.0, 0.0, Side::Top),
                wire(1.0, 0.0, Side::Top),
                via(1.0, 0.0),
                wire(1.0, 0.0, Side::Bottom),
                wire(2.0, 0.0, Side::Bottom),
                wire(3.0, 0.0, Side::Top),
                wire(4.0, 0.0, Side::Top),
                wire(5.0, 0.0, Side::Top),
            ],
            covered_with_solder_mask: true,
        };
        let top = wire_runs(&trace, Side::Top);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].len(), 2);
        assert_eq!(top[1].len(), 3);
        let bottom = wire_runs(&trace, Side::Bottom);
        assert_eq!(bottom.len(), 1);
        assert!((bottom[0][1].0.x - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_lone_point_is_not_a_run() {
        let trace = Trace {
            route: vec![wire(0.0, 0.0, Side::Top), via(0.0, 0.0)],
            covered_with_solder_mask: true,
        };
        assert!(wire_runs(&trace, Side::Top).is_empty());

        let board = board();
        let config = RenderConfig::default();
        let ctx = context(&board, &config, Side::Top);
        let features = vec![LayerFeature::Trace(trace)];
        assert!(rasterize(&ctx, &features).unwrap().is_none());
    }

    #[test]
    fn test_trace_stroke_width_and_caps() {
        let board = board();
        let config = RenderConfig::default();
        let ctx = context(&board, &config, Side::Top);
        let features = vec![LayerFeature::Trace(Trace {
            route: vec![wire(-3.0, 0.0, Side::Top), wire(3.0, 0.0, Side::Top)],
            covered_with_solder_mask: true,
        })];
        let surface = rasterize(&ctx, &features).unwrap().unwrap();
        assert!(surface.alpha_at(50, 50) > 200);
        assert!(surface.alpha_at(50, 49) > 200);
        assert_eq!(surface.alpha_at(50, 45), 0);
        // Round cap reaches past the endpoint.
        assert!(surface.alpha_at(19, 50) > 127);
        assert_eq!(surface.alpha_at(15, 50), 0);
    }

    #[test]
    fn test_other_side_points_are_ignored() {
        let board = board();
        let config = RenderConfig::default();
        let ctx = context(&board, &config, Side::Top);
        let features = vec![LayerFeature::Trace(Trace {
            route: vec![wire(-3.0, 0.0, Side::Bottom), wire(3.0, 0.0, Side::Bottom)],
            covered_with_solder_mask: true,
        })];
        assert!(rasterize(&ctx, &features).unwrap().is_none());
    }
}
