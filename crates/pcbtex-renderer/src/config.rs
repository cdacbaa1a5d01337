use pcbtex_core::{BoardMaterial, LayerColor};
use serde::{Deserialize, Serialize};

/// Text feature classes; each has its own glyph scale and color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextClass {
    Silkscreen,
    Copper,
    Note,
}

/// Soldermask color per board material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoldermaskColors {
    pub fr4: LayerColor,
    pub fr1: LayerColor,
}

impl SoldermaskColors {
    pub fn for_material(&self, material: BoardMaterial) -> LayerColor {
        match material {
            BoardMaterial::Fr4 => self.fr4,
            BoardMaterial::Fr1 => self.fr1,
        }
    }
}

/// Colors and tuning constants for one render. Passed explicitly into every
/// rasterizer; nothing here is global.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Copper not covered by soldermask (pads, exposed pours).
    pub copper_exposed: LayerColor,
    /// Copper seen through the soldermask.
    pub copper_covered: LayerColor,
    pub soldermask: SoldermaskColors,
    pub silkscreen: LayerColor,
    pub note: LayerColor,
    pub panel_outline: LayerColor,
    pub silkscreen_text_scale: f64,
    pub copper_text_scale: f64,
    pub note_text_scale: f64,
    /// Glyph stroke width as a fraction of the font size.
    pub text_stroke_ratio: f64,
    /// Knockout padding (mm) for sides a text leaves unset.
    pub knockout_padding: f64,
    /// Segments per full circle when flattening arcs.
    pub arc_segments: usize,
    /// Panel outline stroke width in millimeters.
    pub panel_outline_width: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            copper_exposed: LayerColor::rgb(230, 153, 51),
            copper_covered: LayerColor::rgb(122, 154, 64),
            soldermask: SoldermaskColors {
                fr4: LayerColor::rgb(14, 92, 44),
                fr1: LayerColor::rgb(92, 58, 28),
            },
            silkscreen: LayerColor::rgb(242, 242, 242),
            note: LayerColor::rgb(255, 214, 92),
            panel_outline: LayerColor::rgb(24, 24, 24),
            silkscreen_text_scale: 0.57,
            copper_text_scale: 0.45,
            note_text_scale: 0.45,
            text_stroke_ratio: 0.1,
            knockout_padding: 0.2,
            arc_segments: pcbtex_core::brep::DEFAULT_ARC_SEGMENTS,
            panel_outline_width: 0.1,
        }
    }
}

impl RenderConfig {
    pub fn text_scale(&self, class: TextClass) -> f64 {
        match class {
            TextClass::Silkscreen => self.silkscreen_text_scale,
            TextClass::Copper => self.copper_text_scale,
            TextClass::Note => self.note_text_scale,
        }
    }

    pub fn copper_color(&self, covered_with_solder_mask: bool) -> LayerColor {
        if covered_with_solder_mask {
            self.copper_covered
        } else {
            self.copper_exposed
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = RenderConfig::from_json(r#"{"knockout_padding": 0.5}"#).unwrap();
        assert!((config.knockout_padding - 0.5).abs() < 1e-10);
        assert!((config.silkscreen_text_scale - 0.57).abs() < 1e-10);
        assert_eq!(config.arc_segments, 64);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = RenderConfig::default();
        let back = RenderConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn test_copper_tints_differ() {
        let config = RenderConfig::default();
        assert_ne!(config.copper_color(true), config.copper_color(false));
        assert_ne!(
            config.soldermask.for_material(BoardMaterial::Fr4),
            config.soldermask.for_material(BoardMaterial::Fr1)
        );
    }
}
