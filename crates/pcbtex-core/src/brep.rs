//! Boundary representation shapes: rings of bulge-annotated vertices, arc
//! tessellation and polygon-with-holes construction.

use std::f64::consts::PI;

use geo::{BooleanOps, LineString, MultiPolygon};
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::geometry::{is_clockwise, signed_area, BBox, Point};

/// Bulges and distances below this are treated as straight or coincident.
pub const EPSILON: f64 = 1e-9;

/// Segments used for a full circle unless a caller asks otherwise.
pub const DEFAULT_ARC_SEGMENTS: usize = 64;

/// A ring vertex. `bulge` describes the arc to the next vertex:
/// `tan(sweep / 4)`, positive for counter-clockwise arcs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bulge: Option<f64>,
}

impl Vertex {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, bulge: None }
    }

    pub fn with_bulge(x: f64, y: f64, bulge: f64) -> Self {
        Self {
            x,
            y,
            bulge: Some(bulge),
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A closed sequence of vertices; the last vertex connects back to the first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Ring {
    pub vertices: Vec<Vertex>,
}

impl Ring {
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self { vertices }
    }

    /// Straight-edged ring through the given points.
    pub fn from_points(points: &[Point]) -> Self {
        Self {
            vertices: points.iter().map(|p| Vertex::new(p.x, p.y)).collect(),
        }
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        for (index, v) in self.vertices.iter().enumerate() {
            let bulge_ok = v.bulge.map_or(true, f64::is_finite);
            if !v.x.is_finite() || !v.y.is_finite() || !bulge_ok {
                return Err(GeometryError::NonFiniteVertex { index });
            }
        }
        Ok(())
    }
}

/// An outer ring with optional holes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BRep {
    pub outer_ring: Ring,
    #[serde(default)]
    pub inner_rings: Vec<Ring>,
}

impl BRep {
    pub fn new(outer_ring: Ring, inner_rings: Vec<Ring>) -> Self {
        Self {
            outer_ring,
            inner_rings,
        }
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        self.outer_ring.validate()?;
        for ring in &self.inner_rings {
            ring.validate()?;
        }
        Ok(())
    }
}

/// A flattened polygon: CCW exterior, CW interiors. Rings are implicitly closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonWithHoles {
    pub exterior: Vec<Point>,
    pub interiors: Vec<Vec<Point>>,
}

impl PolygonWithHoles {
    /// Net area: exterior minus holes.
    pub fn area(&self) -> f64 {
        let holes: f64 = self.interiors.iter().map(|r| signed_area(r).abs()).sum();
        signed_area(&self.exterior).abs() - holes
    }

    pub fn bbox(&self) -> Option<BBox> {
        BBox::from_points(&self.exterior)
    }
}

/// Interior points of the arc from `p1` to `p2`, endpoints excluded.
///
/// The sweep is `4 * atan(bulge)`; the number of samples scales with the
/// sweep so that a full circle would use `target_segments` segments.
pub fn tessellate_arc(p1: Point, p2: Point, bulge: f64, target_segments: usize) -> Vec<Point> {
    let chord = p1.distance_to(&p2);
    if bulge.abs() < EPSILON || chord < EPSILON {
        return Vec::new();
    }

    let sweep = 4.0 * bulge.atan();
    let radius = (chord / (2.0 * (sweep / 2.0).sin())).abs();

    // Distance from chord midpoint to center, along the left normal.
    let apothem = (chord / 2.0) * (1.0 - bulge * bulge) / (2.0 * bulge);
    let mid = p1.midpoint(&p2);
    let nx = -(p2.y - p1.y) / chord;
    let ny = (p2.x - p1.x) / chord;
    let center = Point::new(mid.x + nx * apothem, mid.y + ny * apothem);

    let segments = ((sweep.abs() / (2.0 * PI)) * target_segments as f64)
        .ceil()
        .max(1.0) as usize;
    let start = (p1.y - center.y).atan2(p1.x - center.x);

    (1..segments)
        .map(|i| {
            let angle = start + sweep * (i as f64 / segments as f64);
            Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect()
}

/// Flatten a ring: each vertex followed by the tessellated arc to the next.
pub fn ring_to_polygon(ring: &Ring, target_segments: usize) -> Vec<Point> {
    let n = ring.vertices.len();
    let mut points = Vec::with_capacity(n);
    for (i, v) in ring.vertices.iter().enumerate() {
        let next = &ring.vertices[(i + 1) % n];
        points.push(v.point());
        if let Some(bulge) = v.bulge {
            points.extend(tessellate_arc(v.point(), next.point(), bulge, target_segments));
        }
    }
    points
}

/// Flatten a ring and force counter-clockwise winding.
/// Returns `None` when fewer than three points remain.
fn ccw_ring(ring: &Ring, target_segments: usize) -> Option<Vec<Point>> {
    let mut points = ring_to_polygon(ring, target_segments);
    if points.len() < 3 {
        return None;
    }
    if is_clockwise(&points) {
        points.reverse();
    }
    Some(points)
}

fn to_geo(points: &[Point]) -> geo::Polygon<f64> {
    let coords: Vec<(f64, f64)> = points.iter().map(|p| (p.x, p.y)).collect();
    geo::Polygon::new(LineString::from(coords), vec![])
}

fn from_geo_ring(ring: &LineString<f64>, want_clockwise: bool) -> Vec<Point> {
    let mut points: Vec<Point> = ring.coords().map(|c| Point::new(c.x, c.y)).collect();
    // geo closes rings explicitly.
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    if is_clockwise(&points) != want_clockwise {
        points.reverse();
    }
    points
}

/// Convert a BRep into filled polygons: outer ring minus the union of holes.
///
/// Degenerate rings are skipped; a degenerate outer ring yields nothing.
pub fn build_boundary_polygon(brep: &BRep, target_segments: usize) -> Vec<PolygonWithHoles> {
    let Some(outer) = ccw_ring(&brep.outer_ring, target_segments) else {
        log::debug!("BRep outer ring degenerated after tessellation");
        return Vec::new();
    };

    let mut holes = brep
        .inner_rings
        .iter()
        .filter_map(|ring| ccw_ring(ring, target_segments))
        .map(|points| to_geo(&points));

    let Some(first_hole) = holes.next() else {
        return vec![PolygonWithHoles {
            exterior: outer,
            interiors: Vec::new(),
        }];
    };

    let cutters = holes.fold(MultiPolygon::new(vec![first_hole]), |acc, hole| {
        acc.union(&MultiPolygon::new(vec![hole]))
    });
    let solid = MultiPolygon::new(vec![to_geo(&outer)]);

    solid
        .difference(&cutters)
        .0
        .iter()
        .map(|poly| PolygonWithHoles {
            exterior: from_geo_ring(poly.exterior(), false),
            interiors: poly
                .interiors()
                .iter()
                .map(|ring| from_geo_ring(ring, true))
                .collect(),
        })
        .filter(|poly| poly.exterior.len() >= 3)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f64) -> Ring {
        Ring::from_points(&[
            Point::new(0.0, 0.0),
            Point::new(size, 0.0),
            Point::new(size, size),
            Point::new(0.0, size),
        ])
    }

    #[test]
    fn test_zero_bulge_is_straight() {
        let pairs = [
            (Point::new(0.0, 0.0), Point::new(1.0, 0.0)),
            (Point::new(-3.0, 2.0), Point::new(4.0, -7.5)),
            (Point::new(1.0, 1.0), Point::new(1.0, 1.0)),
        ];
        for (a, b) in pairs {
            assert!(tessellate_arc(a, b, 0.0, 64).is_empty());
        }
    }

    #[test]
    fn test_coincident_endpoints_yield_nothing() {
        let p = Point::new(2.0, 2.0);
        assert!(tessellate_arc(p, p, 1.0, 64).is_empty());
    }

    #[test]
    fn test_half_circle_midpoint() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(2.0, 0.0);
        let points = tessellate_arc(a, b, 1.0, 32);
        // 16 segments for a half circle, 15 interior samples.
        assert_eq!(points.len(), 15);
        let radius = 1.0;
        let chord_mid = a.midpoint(&b);
        let mid_sample = points[7];
        assert!((mid_sample.distance_to(&chord_mid) - radius).abs() < 1e-9);
        // Positive bulge sweeps counter-clockwise, so the arc dips below the chord.
        assert!((mid_sample.x - 1.0).abs() < 1e-9);
        assert!((mid_sample.y + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_sample_count_scales_with_sweep() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(2.0, 0.0);
        let quarter = tessellate_arc(a, b, (PI / 8.0).tan(), 64);
        let half = tessellate_arc(a, b, 1.0, 64);
        assert!(half.len() > quarter.len());
    }

    #[test]
    fn test_ring_to_polygon_straight() {
        let points = ring_to_polygon(&square(1.0), 64);
        assert_eq!(points.len(), 4);
    }

    #[test]
    fn test_clockwise_outer_is_normalized() {
        let mut ring = square(4.0);
        ring.vertices.reverse();
        let result = build_boundary_polygon(&BRep::new(ring, vec![]), 64);
        assert_eq!(result.len(), 1);
        assert!(signed_area(&result[0].exterior) > 0.0);
    }

    #[test]
    fn test_ccw_outer_is_unchanged() {
        let ring = square(4.0);
        let result = build_boundary_polygon(&BRep::new(ring.clone(), vec![]), 64);
        let expected: Vec<Point> = ring.vertices.iter().map(Vertex::point).collect();
        assert_eq!(result[0].exterior, expected);
    }

    #[test]
    fn test_degenerate_outer_renders_nothing() {
        let _ = env_logger::builder().is_test(true).try_init();
        let ring = Ring::from_points(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        assert!(build_boundary_polygon(&BRep::new(ring, vec![]), 64).is_empty());
    }

    #[test]
    fn test_pour_with_circular_hole() {
        let hole = Ring::new(vec![
            Vertex::with_bulge(7.0, 5.0, 1.0),
            Vertex::with_bulge(3.0, 5.0, 1.0),
        ]);
        let result = build_boundary_polygon(&BRep::new(square(10.0), vec![hole]), 64);
        let area: f64 = result.iter().map(PolygonWithHoles::area).sum();
        let expected = 100.0 - PI * 4.0;
        assert!(((area - expected) / expected).abs() < 0.01, "area {area}");
        assert!(result.iter().all(|p| signed_area(&p.exterior) > 0.0));
    }

    #[test]
    fn test_degenerate_hole_is_skipped() {
        let hole = Ring::from_points(&[Point::new(1.0, 1.0), Point::new(2.0, 2.0)]);
        let result = build_boundary_polygon(&BRep::new(square(10.0), vec![hole]), 64);
        assert_eq!(result.len(), 1);
        assert!((result[0].area() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_validate_rejects_nan() {
        let ring = Ring::new(vec![Vertex::new(0.0, f64::NAN)]);
        assert!(matches!(
            ring.validate(),
            Err(GeometryError::NonFiniteVertex { index: 0 })
        ));
    }
}
