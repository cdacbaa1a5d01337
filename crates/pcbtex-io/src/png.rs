//! PNG export of finalized textures.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use pcbtex_renderer::{BoardTexture, BoardTextures};

use crate::error::IoError;

/// Writes textures as PNG to any byte sink.
pub struct PngWriter<W: Write> {
    writer: W,
}

impl<W: Write> PngWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write(&mut self, texture: &BoardTexture) -> Result<(), IoError> {
        let bytes = texture
            .pixmap
            .encode_png()
            .map_err(|e| IoError::Png(e.to_string()))?;
        self.writer.write_all(&bytes)?;
        self.writer.flush()?;
        Ok(())
    }
}

pub fn save_png(texture: &BoardTexture, path: impl AsRef<Path>) -> Result<(), IoError> {
    let file = File::create(path.as_ref())?;
    PngWriter::new(BufWriter::new(file)).write(texture)
}

/// Write `<stem>_top.png` / `<stem>_bottom.png` into `dir` for each side
/// that has a texture. Returns the files written.
pub fn export_textures(
    textures: &BoardTextures,
    dir: impl AsRef<Path>,
    stem: &str,
) -> Result<Vec<PathBuf>, IoError> {
    let dir = dir.as_ref();
    let mut written = Vec::new();
    for texture in textures.iter() {
        let path = dir.join(format!("{}_{}.png", stem, texture.side));
        save_png(texture, &path)?;
        log::info!(
            "Wrote {} ({}x{}, {} layers)",
            path.display(),
            texture.width(),
            texture.height(),
            texture.layers.len()
        );
        written.push(path);
    }
    Ok(written)
}
