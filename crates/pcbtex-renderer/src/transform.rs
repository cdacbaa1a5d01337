use pcbtex_core::{BBox, Point, Side};
use serde::{Deserialize, Serialize};
use tiny_skia::Transform;

/// Maps board millimeters onto texture pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasTransform {
    /// Board extent in board coordinates.
    pub bounds: BBox,
    /// Pixels per millimeter.
    pub resolution: f64,
}

impl CanvasTransform {
    pub fn new(bounds: BBox, resolution: f64) -> Self {
        Self { bounds, resolution }
    }

    /// Canvas size in whole pixels, or `None` if either side is empty.
    pub fn canvas_size(&self) -> Option<(u32, u32)> {
        let width = (self.bounds.width() * self.resolution).floor();
        let height = (self.bounds.height() * self.resolution).floor();
        if !(width >= 1.0 && height >= 1.0) || width > u32::MAX as f64 || height > u32::MAX as f64 {
            return None;
        }
        Some((width as u32, height as u32))
    }

    pub fn to_canvas_x(&self, board_x: f64) -> f64 {
        (board_x - self.bounds.min.x) * self.resolution
    }

    /// Raster row 0 is the top of the image, board Y grows upward.
    pub fn to_canvas_y(&self, board_y: f64) -> f64 {
        (self.bounds.max.y - board_y) * self.resolution
    }

    pub fn to_canvas(&self, p: &Point) -> Point {
        Point::new(self.to_canvas_x(p.x), self.to_canvas_y(p.y))
    }

    pub fn to_board_x(&self, canvas_x: f64) -> f64 {
        canvas_x / self.resolution + self.bounds.min.x
    }

    pub fn to_board_y(&self, canvas_y: f64) -> f64 {
        self.bounds.max.y - canvas_y / self.resolution
    }

    /// Scale a board length (stroke widths, radii) into pixels.
    pub fn length(&self, mm: f64) -> f64 {
        mm * self.resolution
    }
}

/// Base drawing transform for a side: identity on top, a single vertical
/// flip about the image height on the bottom.
pub fn side_transform(side: Side, canvas_height: u32) -> Transform {
    match side {
        Side::Top => Transform::identity(),
        Side::Bottom => Transform::from_row(1.0, 0.0, 0.0, -1.0, 0.0, canvas_height as f32),
    }
}
