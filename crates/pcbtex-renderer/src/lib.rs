//! # PCBTex Renderer
//!
//! Turns a board description into one composite texture per board side.
//! Each feature class is rasterized onto its own `tiny-skia` surface; the
//! compositor stacks the visible surfaces in a fixed order and the texture
//! finalizer attaches the sampling settings.
//!
//! The pipeline is a pure function of the board, features, visibility,
//! resolution and [`RenderConfig`]. Nothing is cached between calls.

pub mod compositor;
pub mod config;
pub mod error;
pub mod font;
pub mod rasterize;
pub mod surface;
pub mod text;
pub mod texture;
pub mod transform;

pub use compositor::{composite_side, render_board_textures, CompositeTexture, Compositor};
pub use config::{RenderConfig, TextClass};
pub use error::RenderError;
pub use rasterize::{LayerKind, RasterContext};
pub use surface::{Canvas, PixmapProvider, RasterSurface, SurfaceProvider};
pub use text::{layout_text, TextLayout, TextParams};
pub use texture::{
    finalize, BoardTexture, BoardTextures, TextureFilter, TextureSettings, TEXTURE_SETTINGS,
};
pub use transform::{side_transform, CanvasTransform};
