//! Raster surfaces and the drawing canvas the rasterizers paint into.

use std::ops::{Deref, DerefMut};

use pcbtex_core::{LayerColor, Point, Side};
use tiny_skia::{
    BlendMode, FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, PixmapPaint, Stroke,
    Transform,
};

use crate::error::RenderError;
use crate::rasterize::LayerKind;
use crate::transform::side_transform;

/// Hands out empty pixel buffers. The only capability the pipeline needs
/// from its host.
pub trait SurfaceProvider {
    fn create_surface(&self, width: u32, height: u32) -> Result<Pixmap, RenderError>;
}

/// Allocates `tiny-skia` pixmaps in memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct PixmapProvider;

impl SurfaceProvider for PixmapProvider {
    fn create_surface(&self, width: u32, height: u32) -> Result<Pixmap, RenderError> {
        Pixmap::new(width, height).ok_or(RenderError::SurfaceAllocation { width, height })
    }
}

/// Output of one layer rasterizer.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    pub kind: LayerKind,
    pub pixmap: Pixmap,
}

impl RasterSurface {
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Alpha at a pixel; 0 outside the surface.
    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        self.pixmap.pixel(x, y).map_or(0, |p| p.alpha())
    }
}

#[derive(Debug, Clone, Copy)]
struct DrawState {
    transform: Transform,
    blend_mode: BlendMode,
}

/// A pixmap plus the current transform and blend mode.
///
/// State changes made through a [`CanvasScope`] are undone when the scope
/// is dropped.
#[derive(Debug)]
pub struct Canvas {
    pixmap: Pixmap,
    state: DrawState,
    saved: Vec<DrawState>,
}

impl Canvas {
    pub fn new(pixmap: Pixmap) -> Self {
        Self {
            pixmap,
            state: DrawState {
                transform: Transform::identity(),
                blend_mode: BlendMode::SourceOver,
            },
            saved: Vec::new(),
        }
    }

    /// Canvas whose base transform mirrors bottom-side drawing.
    pub fn for_side(pixmap: Pixmap, side: Side) -> Self {
        let height = pixmap.height();
        let mut canvas = Self::new(pixmap);
        canvas.state.transform = side_transform(side, height);
        canvas
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn transform(&self) -> Transform {
        self.state.transform
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.state.blend_mode
    }

    /// Apply `t` before the current transform (like a 2D context's `transform`).
    pub fn concat(&mut self, t: Transform) {
        self.state.transform = self.state.transform.pre_concat(t);
    }

    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.state.blend_mode = mode;
    }

    /// Save the drawing state; it is restored when the guard drops.
    pub fn scope(&mut self) -> CanvasScope<'_> {
        self.saved.push(self.state);
        CanvasScope { canvas: self }
    }

    fn paint(&self, color: LayerColor) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, color.a);
        paint.anti_alias = true;
        paint.blend_mode = self.state.blend_mode;
        paint
    }

    pub fn fill_path(&mut self, path: &Path, color: LayerColor) {
        let paint = self.paint(color);
        self.pixmap
            .fill_path(path, &paint, FillRule::Winding, self.state.transform, None);
    }

    /// Stroke with round caps and joins.
    pub fn stroke_path(&mut self, path: &Path, color: LayerColor, width: f64) {
        let paint = self.paint(color);
        let stroke = Stroke {
            width: width as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(path, &paint, &stroke, self.state.transform, None);
    }

    /// `false` when the points do not form a fillable path.
    pub fn fill_polygon(&mut self, points: &[Point], color: LayerColor) -> bool {
        match polygon_path(points) {
            Some(path) => {
                self.fill_path(&path, color);
                true
            }
            None => false,
        }
    }

    pub fn fill_circle(&mut self, center: Point, radius: f64, color: LayerColor) -> bool {
        match PathBuilder::from_circle(center.x as f32, center.y as f32, radius as f32) {
            Some(path) => {
                self.fill_path(&path, color);
                true
            }
            None => false,
        }
    }

    /// Paint another surface over this one, pixel for pixel.
    pub fn draw_surface(&mut self, surface: &RasterSurface) {
        self.pixmap.draw_pixmap(
            0,
            0,
            surface.pixmap.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    pub fn into_surface(self, kind: LayerKind) -> RasterSurface {
        RasterSurface {
            kind,
            pixmap: self.pixmap,
        }
    }
}

/// Restores the canvas state saved by [`Canvas::scope`] on drop.
#[derive(Debug)]
pub struct CanvasScope<'a> {
    canvas: &'a mut Canvas,
}

impl Deref for CanvasScope<'_> {
    type Target = Canvas;

    fn deref(&self) -> &Canvas {
        self.canvas
    }
}

impl DerefMut for CanvasScope<'_> {
    fn deref_mut(&mut self) -> &mut Canvas {
        self.canvas
    }
}

impl Drop for CanvasScope<'_> {
    fn drop(&mut self) {
        if let Some(state) = self.canvas.saved.pop() {
            self.canvas.state = state;
        }
    }
}

// ── Path construction (pixel space) ──────────────────────────────────

/// Closed polygon; `None` for fewer than three points.
pub fn polygon_path(points: &[Point]) -> Option<Path> {
    if points.len() < 3 {
        return None;
    }
    let mut pb = PathBuilder::new();
    pb.move_to(points[0].x as f32, points[0].y as f32);
    for p in &points[1..] {
        pb.line_to(p.x as f32, p.y as f32);
    }
    pb.close();
    pb.finish()
}

/// One path holding several closed rings. Rings with fewer than three points
/// are dropped; opposite windings cancel under the nonzero rule.
pub fn rings_path<'a>(rings: impl IntoIterator<Item = &'a [Point]>) -> Option<Path> {
    let mut pb = PathBuilder::new();
    for ring in rings.into_iter().filter(|r| r.len() >= 3) {
        pb.move_to(ring[0].x as f32, ring[0].y as f32);
        for p in &ring[1..] {
            pb.line_to(p.x as f32, p.y as f32);
        }
        pb.close();
    }
    pb.finish()
}

/// Open polyline; `None` for fewer than two points.
pub fn polyline_path(points: &[Point]) -> Option<Path> {
    if points.len() < 2 {
        return None;
    }
    let mut pb = PathBuilder::new();
    pb.move_to(points[0].x as f32, points[0].y as f32);
    for p in &points[1..] {
        pb.line_to(p.x as f32, p.y as f32);
    }
    pb.finish()
}

/// Rectangle with quarter-circle corners. `radius` must already be clamped.
pub fn rounded_rect_path(x: f64, y: f64, width: f64, height: f64, radius: f64) -> Option<Path> {
    let (x, y, w, h) = (x as f32, y as f32, width as f32, height as f32);
    if radius <= 0.0 {
        return tiny_skia::Rect::from_xywh(x, y, w, h).map(PathBuilder::from_rect);
    }
    let r = radius as f32;
    // Cubic approximation of a quarter circle.
    let k = r * 0.552_284_8;
    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(x + w - r, y);
    pb.cubic_to(x + w - r + k, y, x + w, y + r - k, x + w, y + r);
    pb.line_to(x + w, y + h - r);
    pb.cubic_to(x + w, y + h - r + k, x + w - r + k, y + h, x + w - r, y + h);
    pb.line_to(x + r, y + h);
    pb.cubic_to(x + r - k, y + h, x, y + h - r + k, x, y + h - r);
    pb.line_to(x, y + r);
    pb.cubic_to(x, y + r - k, x + r - k, y, x + r, y);
    pb.close();
    pb.finish()
}
