use serde::{Deserialize, Serialize};

/// A 2D point in board coordinates (millimeters, Y up).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn midpoint(&self, other: &Point) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Rotate counter-clockwise by `degrees` about `pivot`.
    pub fn rotate_about(&self, pivot: &Point, degrees: f64) -> Self {
        let rad = degrees.to_radians();
        let (sin_r, cos_r) = rad.sin_cos();
        let dx = self.x - pivot.x;
        let dy = self.y - pivot.y;
        Self {
            x: pivot.x + dx * cos_r - dy * sin_r,
            y: pivot.y + dx * sin_r + dy * cos_r,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub min: Point,
    pub max: Point,
}

impl BBox {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Box of the given size centered on `center`.
    pub fn from_center(center: Point, width: f64, height: f64) -> Self {
        let half_w = width / 2.0;
        let half_h = height / 2.0;
        Self {
            min: Point::new(center.x - half_w, center.y - half_h),
            max: Point::new(center.x + half_w, center.y + half_h),
        }
    }

    pub fn from_points(points: &[Point]) -> Option<Self> {
        Self::from_iter_points(points.iter().copied())
    }

    pub fn from_iter_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bbox = Self::new(first, first);
        for p in points {
            bbox.min.x = bbox.min.x.min(p.x);
            bbox.min.y = bbox.min.y.min(p.y);
            bbox.max.x = bbox.max.x.max(p.x);
            bbox.max.y = bbox.max.y.max(p.y);
        }
        Some(bbox)
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// Grow each side independently.
    pub fn expand(&self, left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            min: Point::new(self.min.x - left, self.min.y - bottom),
            max: Point::new(self.max.x + right, self.max.y + top),
        }
    }

    /// Corners in counter-clockwise order starting at the lower left.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.min,
            Point::new(self.max.x, self.min.y),
            self.max,
            Point::new(self.min.x, self.max.y),
        ]
    }
}

/// Signed shoelace area; positive for counter-clockwise rings.
pub fn signed_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for (i, a) in points.iter().enumerate() {
        let b = &points[(i + 1) % points.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

/// Zero-area rings count as clockwise, so only strictly positive area is CCW.
pub fn is_clockwise(points: &[Point]) -> bool {
    signed_area(points) <= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_rotate_about() {
        let p = Point::new(2.0, 1.0).rotate_about(&Point::new(1.0, 1.0), 90.0);
        assert!((p.x - 1.0).abs() < 1e-10);
        assert!((p.y - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_bbox_expand() {
        let bb = BBox::from_center(Point::new(0.0, 0.0), 2.0, 1.0).expand(0.1, 0.2, 0.3, 0.4);
        assert!((bb.width() - 2.3).abs() < 1e-10);
        assert!((bb.height() - 1.7).abs() < 1e-10);
        assert!((bb.max.y - 0.8).abs() < 1e-10);
    }

    #[test]
    fn test_winding() {
        let ccw = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ];
        let cw: Vec<Point> = ccw.iter().rev().copied().collect();
        assert!(!is_clockwise(&ccw));
        assert!(is_clockwise(&cw));
        assert!((signed_area(&ccw) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_degenerate_ring_is_clockwise() {
        let line = [Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 2.0)];
        assert!(is_clockwise(&line));
    }
}
