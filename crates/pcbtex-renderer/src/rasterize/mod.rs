//! Layer rasterizers. Each one turns the features of a single class into
//! its own surface, or `None` when it has nothing to draw.

mod note;
mod pad;
mod panel;
mod pour;
mod silkscreen;
mod soldermask;
mod text;
mod trace;

pub use pad::clamp_corner_radius;
pub use pour::pour_polygons;

use pcbtex_core::{Board, LayerFeature, LayerVisibility, Point, Side};
use serde::{Deserialize, Serialize};

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::surface::{Canvas, RasterSurface, SurfaceProvider};
use crate::transform::CanvasTransform;

/// One raster layer of a composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Soldermask,
    CopperPour,
    Trace,
    CopperText,
    Pad,
    Silkscreen,
    Note,
    PanelOutline,
}

impl LayerKind {
    /// Bottom to top. Mask underlies copper; markings sit above copper.
    pub const DRAW_ORDER: [LayerKind; 8] = [
        LayerKind::Soldermask,
        LayerKind::CopperPour,
        LayerKind::Trace,
        LayerKind::CopperText,
        LayerKind::Pad,
        LayerKind::Silkscreen,
        LayerKind::Note,
        LayerKind::PanelOutline,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LayerKind::Soldermask => "soldermask",
            LayerKind::CopperPour => "copper_pour",
            LayerKind::Trace => "trace",
            LayerKind::CopperText => "copper_text",
            LayerKind::Pad => "pad",
            LayerKind::Silkscreen => "silkscreen",
            LayerKind::Note => "note",
            LayerKind::PanelOutline => "panel_outline",
        }
    }

    pub fn is_visible(self, visibility: &LayerVisibility, side: Side) -> bool {
        match self {
            LayerKind::Soldermask => visibility.soldermask(side),
            LayerKind::CopperPour | LayerKind::Trace | LayerKind::CopperText | LayerKind::Pad => {
                visibility.copper(side)
            }
            LayerKind::Silkscreen => visibility.silkscreen(side),
            LayerKind::Note => visibility.fabrication_notes,
            LayerKind::PanelOutline => visibility.panel_outlines,
        }
    }

    /// Run this layer's rasterizer over the whole feature list.
    pub fn rasterize(
        self,
        ctx: &RasterContext<'_>,
        features: &[LayerFeature],
    ) -> Result<Option<RasterSurface>, RenderError> {
        match self {
            LayerKind::Soldermask => soldermask::rasterize(ctx, features),
            LayerKind::CopperPour => pour::rasterize(ctx, features),
            LayerKind::Trace => trace::rasterize(ctx, features),
            LayerKind::CopperText => text::rasterize_copper_text(ctx, features),
            LayerKind::Pad => pad::rasterize(ctx, features),
            LayerKind::Silkscreen => silkscreen::rasterize(ctx, features),
            LayerKind::Note => note::rasterize(ctx, features),
            LayerKind::PanelOutline => panel::rasterize(ctx, features),
        }
    }
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything a rasterizer needs besides the features themselves.
pub struct RasterContext<'a> {
    pub board: &'a Board,
    pub side: Side,
    pub transform: CanvasTransform,
    pub width: u32,
    pub height: u32,
    pub config: &'a RenderConfig,
    provider: &'a dyn SurfaceProvider,
}

impl<'a> RasterContext<'a> {
    /// `None` when the board has no extent at this resolution.
    pub fn new(
        board: &'a Board,
        side: Side,
        resolution: f64,
        config: &'a RenderConfig,
        provider: &'a dyn SurfaceProvider,
    ) -> Option<Self> {
        if !resolution.is_finite() || resolution <= 0.0 {
            return None;
        }
        let transform = CanvasTransform::new(board.bounds()?, resolution);
        let (width, height) = transform.canvas_size()?;
        Some(Self {
            board,
            side,
            transform,
            width,
            height,
            config,
            provider,
        })
    }

    /// A fresh, transparent canvas carrying this side's base transform.
    pub fn new_canvas(&self) -> Result<Canvas, RenderError> {
        let pixmap = self.provider.create_surface(self.width, self.height)?;
        Ok(Canvas::for_side(pixmap, self.side))
    }

    pub fn to_canvas(&self, p: &Point) -> Point {
        self.transform.to_canvas(p)
    }

    pub fn to_canvas_all(&self, points: &[Point]) -> Vec<Point> {
        points.iter().map(|p| self.transform.to_canvas(p)).collect()
    }

    /// Board millimeters to pixels.
    pub fn length(&self, mm: f64) -> f64 {
        self.transform.length(mm)
    }
}

/// Pick the features `select` accepts that sit on the context's side,
/// dropping (with a warning) any that fail validation.
fn collect<'f, T>(
    ctx: &RasterContext<'_>,
    features: &'f [LayerFeature],
    select: impl Fn(&'f LayerFeature) -> Option<T>,
) -> Vec<T> {
    features
        .iter()
        .filter(|f| f.is_on(ctx.side))
        .filter_map(|f| {
            let item = select(f)?;
            match f.validate() {
                Ok(()) => Some(item),
                Err(e) => {
                    log::warn!("Skipping {} on {}: {}", f.kind_name(), ctx.side, e);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use pcbtex_core::{Board, Point, Side};

    use super::RasterContext;
    use crate::config::RenderConfig;
    use crate::surface::PixmapProvider;

    pub static PROVIDER: PixmapProvider = PixmapProvider;

    /// 10 × 10 mm board about the origin.
    pub fn board() -> Board {
        Board::new(Point::new(0.0, 0.0), 10.0, 10.0)
    }

    pub fn context<'a>(board: &'a Board, config: &'a RenderConfig, side: Side) -> RasterContext<'a> {
        let _ = env_logger::builder().is_test(true).try_init();
        RasterContext::new(board, side, 10.0, config, &PROVIDER).unwrap()
    }
}
