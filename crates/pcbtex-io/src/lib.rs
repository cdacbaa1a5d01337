//! # PCBTex I/O
//!
//! Adapters around the texture pipeline: JSON scene files in, PNG textures
//! out. Nothing here is needed to call the renderer directly.

pub mod error;
pub mod png;
pub mod scene;

pub use error::IoError;
pub use png::{export_textures, save_png, PngWriter};
pub use scene::{load_scene, Scene, SceneReader};
