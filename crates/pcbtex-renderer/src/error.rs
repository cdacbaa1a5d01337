use thiserror::Error;

/// Failures that leave a board side without a texture.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Failed to allocate {width}x{height} raster surface")]
    SurfaceAllocation { width: u32, height: u32 },

    #[error("Raster surface provider unavailable: {0}")]
    ProviderUnavailable(String),
}
