//! Layer compositor: runs the visible rasterizers for one side in draw order
//! and paints their surfaces onto a single canvas.

use pcbtex_core::{Board, LayerFeature, LayerVisibility, Side};
use tiny_skia::Pixmap;

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::rasterize::{LayerKind, RasterContext};
use crate::surface::{Canvas, PixmapProvider, SurfaceProvider};
use crate::texture::{finalize, BoardTextures};

/// Merged raster output for one board side.
#[derive(Debug, Clone)]
pub struct CompositeTexture {
    pub side: Side,
    pub pixmap: Pixmap,
    /// Layers that contributed, bottom to top.
    pub layers: Vec<LayerKind>,
}

impl CompositeTexture {
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }
}

/// Holds the render configuration and the surface provider. Every call
/// builds its own surfaces; nothing is cached between calls.
#[derive(Debug, Clone, Default)]
pub struct Compositor<P = PixmapProvider> {
    config: RenderConfig,
    provider: P,
}

impl Compositor<PixmapProvider> {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            provider: PixmapProvider,
        }
    }
}

impl<P: SurfaceProvider> Compositor<P> {
    pub fn with_provider(config: RenderConfig, provider: P) -> Self {
        Self { config, provider }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Composite one side. `Ok(None)` when the canvas would be empty or no
    /// layer produced a surface; `Err` only when a surface cannot be
    /// allocated.
    pub fn composite_side(
        &self,
        side: Side,
        board: &Board,
        features: &[LayerFeature],
        visibility: &LayerVisibility,
        resolution: f64,
    ) -> Result<Option<CompositeTexture>, RenderError> {
        let Some(ctx) = RasterContext::new(board, side, resolution, &self.config, &self.provider)
        else {
            log::debug!("No {} canvas at resolution {}", side, resolution);
            return Ok(None);
        };

        let mut surfaces = Vec::new();
        for kind in LayerKind::DRAW_ORDER {
            if !kind.is_visible(visibility, side) {
                continue;
            }
            if let Some(surface) = kind.rasterize(&ctx, features)? {
                surfaces.push(surface);
            }
        }
        if surfaces.is_empty() {
            log::debug!("No visible content on {}", side);
            return Ok(None);
        }

        let mut canvas = Canvas::new(self.provider.create_surface(ctx.width, ctx.height)?);
        for surface in &surfaces {
            canvas.draw_surface(surface);
        }
        let layers: Vec<LayerKind> = surfaces.iter().map(|s| s.kind).collect();
        log::debug!(
            "Composited {} layers on {} ({}x{})",
            layers.len(),
            side,
            ctx.width,
            ctx.height
        );
        Ok(Some(CompositeTexture {
            side,
            pixmap: canvas.into_pixmap(),
            layers,
        }))
    }

    /// Composite and finalize both sides.
    pub fn render_board_textures(
        &self,
        board: &Board,
        features: &[LayerFeature],
        visibility: &LayerVisibility,
        resolution: f64,
    ) -> Result<BoardTextures, RenderError> {
        let mut textures = BoardTextures::default();
        for side in Side::BOTH {
            let texture = self
                .composite_side(side, board, features, visibility, resolution)?
                .map(finalize);
            match side {
                Side::Top => textures.top = texture,
                Side::Bottom => textures.bottom = texture,
            }
        }
        Ok(textures)
    }
}

/// [`Compositor::composite_side`] with the default configuration.
pub fn composite_side(
    side: Side,
    board: &Board,
    features: &[LayerFeature],
    visibility: &LayerVisibility,
    resolution: f64,
) -> Result<Option<CompositeTexture>, RenderError> {
    Compositor::new(RenderConfig::default()).composite_side(
        side, board, features, visibility, resolution,
    )
}

/// [`Compositor::render_board_textures`] with the default configuration.
pub fn render_board_textures(
    board: &Board,
    features: &[LayerFeature],
    visibility: &LayerVisibility,
    resolution: f64,
) -> Result<BoardTextures, RenderError> {
    Compositor::new(RenderConfig::default()).render_board_textures(
        board, features, visibility, resolution,
    )
}
