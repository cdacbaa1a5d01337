//! Texture finalizer: wraps a composite with the fixed sampling settings the
//! 3D side uses. Pixel data is handed over untouched.

use pcbtex_core::Side;
use serde::Serialize;
use tiny_skia::Pixmap;

use crate::compositor::CompositeTexture;
use crate::rasterize::LayerKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureFilter {
    Nearest,
    Linear,
    NearestMipmapNearest,
    LinearMipmapNearest,
    NearestMipmapLinear,
    LinearMipmapLinear,
}

impl TextureFilter {
    pub fn uses_mipmaps(self) -> bool {
        !matches!(self, TextureFilter::Nearest | TextureFilter::Linear)
    }
}

/// Sampling configuration attached to every finalized texture. Fixed: see
/// [`TEXTURE_SETTINGS`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextureSettings {
    pub generate_mipmaps: bool,
    pub min_filter: TextureFilter,
    pub mag_filter: TextureFilter,
    pub anisotropy: u16,
    pub flip_y: bool,
    pub srgb: bool,
}

/// Trilinear, 16x anisotropic, sRGB, rows top to bottom.
pub const TEXTURE_SETTINGS: TextureSettings = TextureSettings {
    generate_mipmaps: true,
    min_filter: TextureFilter::LinearMipmapLinear,
    mag_filter: TextureFilter::Linear,
    anisotropy: 16,
    flip_y: false,
    srgb: true,
};

impl Default for TextureSettings {
    fn default() -> Self {
        TEXTURE_SETTINGS
    }
}

/// A composite ready to hand to the renderer.
#[derive(Debug, Clone)]
pub struct BoardTexture {
    pub side: Side,
    pub pixmap: Pixmap,
    pub settings: TextureSettings,
    pub layers: Vec<LayerKind>,
}

impl BoardTexture {
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Premultiplied RGBA bytes, row-major from the top row.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Straight-alpha RGBA bytes, as most GPU upload paths expect.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }

    /// Levels in the full mip chain, or 1 when mipmapping is off.
    pub fn mip_level_count(&self) -> u32 {
        if !self.settings.generate_mipmaps || !self.settings.min_filter.uses_mipmaps() {
            return 1;
        }
        let largest = self.width().max(self.height());
        u32::BITS - largest.leading_zeros()
    }
}

pub fn finalize(composite: CompositeTexture) -> BoardTexture {
    BoardTexture {
        side: composite.side,
        pixmap: composite.pixmap,
        settings: TEXTURE_SETTINGS,
        layers: composite.layers,
    }
}

/// Finalized textures for both sides of a board; a side with nothing to
/// show is `None`.
#[derive(Debug, Clone, Default)]
pub struct BoardTextures {
    pub top: Option<BoardTexture>,
    pub bottom: Option<BoardTexture>,
}

impl BoardTextures {
    pub fn get(&self, side: Side) -> Option<&BoardTexture> {
        match side {
            Side::Top => self.top.as_ref(),
            Side::Bottom => self.bottom.as_ref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.bottom.is_none()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoardTexture> {
        self.top.iter().chain(self.bottom.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiny_skia::{Color, Paint, Rect, Transform};

    fn composite(width: u32, height: u32) -> CompositeTexture {
        CompositeTexture {
            side: Side::Top,
            pixmap: Pixmap::new(width, height).unwrap(),
            layers: vec![LayerKind::Pad],
        }
    }

    #[test]
    fn test_fixed_settings() {
        let s = finalize(composite(2, 2)).settings;
        assert_eq!(s, TextureSettings::default());
        assert!(s.generate_mipmaps);
        assert_eq!(s.min_filter, TextureFilter::LinearMipmapLinear);
        assert_eq!(s.mag_filter, TextureFilter::Linear);
        assert_eq!(s.anisotropy, 16);
        assert!(!s.flip_y);
        assert!(s.srgb);
    }

    #[test]
    fn test_mip_chain_length() {
        let mut texture = finalize(composite(100, 50));
        assert_eq!(texture.mip_level_count(), 7);
        texture.settings.min_filter = TextureFilter::Linear;
        assert_eq!(texture.mip_level_count(), 1);
        assert_eq!(finalize(composite(1, 1)).mip_level_count(), 1);
    }

    #[test]
    fn test_finalize_keeps_pixels() {
        let mut c = composite(4, 4);
        let mut paint = Paint::default();
        paint.set_color(Color::from_rgba8(200, 100, 50, 128));
        c.pixmap.fill_rect(
            Rect::from_xywh(0.0, 0.0, 4.0, 4.0).unwrap(),
            &paint,
            Transform::identity(),
            None,
        );
        let before = c.pixmap.data().to_vec();
        let texture = finalize(c);
        assert_eq!(texture.data(), &before[..]);
        assert_eq!(texture.layers, vec![LayerKind::Pad]);

        let rgba = texture.to_rgba8();
        assert_eq!(rgba.len(), 4 * 4 * 4);
        assert_eq!(rgba[3], 128);
        assert!((i32::from(rgba[0]) - 200).abs() <= 2);
    }

    #[test]
    fn test_board_textures_lookup() {
        let textures = BoardTextures {
            top: Some(finalize(composite(2, 2))),
            bottom: None,
        };
        assert!(textures.get(Side::Top).is_some());
        assert!(textures.get(Side::Bottom).is_none());
        assert_eq!(textures.iter().count(), 1);
        assert!(!textures.is_empty());
        assert!(BoardTextures::default().is_empty());
    }
}
