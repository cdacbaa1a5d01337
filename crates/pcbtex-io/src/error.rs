use std::io;

use pcbtex_renderer::RenderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("PNG encoding failed: {0}")]
    Png(String),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),
}
