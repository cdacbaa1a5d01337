use serde::{Deserialize, Serialize};

use crate::board::Side;

/// Straight-alpha RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

impl Default for LayerColor {
    fn default() -> Self {
        Self::rgb(128, 128, 128)
    }
}

impl LayerColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Which feature classes are drawn. Owned by the UI; read-only here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerVisibility {
    pub board_body: bool,
    pub top_copper: bool,
    pub bottom_copper: bool,
    pub top_soldermask: bool,
    pub bottom_soldermask: bool,
    pub top_silkscreen: bool,
    pub bottom_silkscreen: bool,
    pub fabrication_notes: bool,
    pub panel_outlines: bool,
}

impl Default for LayerVisibility {
    fn default() -> Self {
        Self {
            board_body: true,
            top_copper: true,
            bottom_copper: true,
            top_soldermask: true,
            bottom_soldermask: true,
            top_silkscreen: true,
            bottom_silkscreen: true,
            fabrication_notes: false,
            panel_outlines: true,
        }
    }
}

impl LayerVisibility {
    pub const NAMES: [&'static str; 9] = [
        "board_body",
        "top_copper",
        "bottom_copper",
        "top_soldermask",
        "bottom_soldermask",
        "top_silkscreen",
        "bottom_silkscreen",
        "fabrication_notes",
        "panel_outlines",
    ];

    pub fn copper(&self, side: Side) -> bool {
        match side {
            Side::Top => self.top_copper,
            Side::Bottom => self.bottom_copper,
        }
    }

    /// Mask sits on the board body, so hiding the body hides it too.
    pub fn soldermask(&self, side: Side) -> bool {
        self.board_body
            && match side {
                Side::Top => self.top_soldermask,
                Side::Bottom => self.bottom_soldermask,
            }
    }

    pub fn silkscreen(&self, side: Side) -> bool {
        match side {
            Side::Top => self.top_silkscreen,
            Side::Bottom => self.bottom_silkscreen,
        }
    }

    fn slot(&mut self, name: &str) -> Option<&mut bool> {
        Some(match name {
            "board_body" => &mut self.board_body,
            "top_copper" => &mut self.top_copper,
            "bottom_copper" => &mut self.bottom_copper,
            "top_soldermask" => &mut self.top_soldermask,
            "bottom_soldermask" => &mut self.bottom_soldermask,
            "top_silkscreen" => &mut self.top_silkscreen,
            "bottom_silkscreen" => &mut self.bottom_silkscreen,
            "fabrication_notes" => &mut self.fabrication_notes,
            "panel_outlines" => &mut self.panel_outlines,
            _ => return None,
        })
    }

    /// Set a toggle by name. Returns `false` for unknown names.
    pub fn set(&mut self, name: &str, visible: bool) -> bool {
        match self.slot(name) {
            Some(flag) => {
                *flag = visible;
                true
            }
            None => {
                log::warn!("Unknown layer toggle '{}'", name);
                false
            }
        }
    }

    pub fn toggle(&mut self, name: &str) -> bool {
        match self.slot(name) {
            Some(flag) => {
                *flag = !*flag;
                true
            }
            None => false,
        }
    }

    pub fn set_all_visible(&mut self, visible: bool) {
        for name in Self::NAMES {
            self.set(name, visible);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_hide_notes() {
        let vis = LayerVisibility::default();
        assert!(vis.copper(Side::Top));
        assert!(!vis.fabrication_notes);
    }

    #[test]
    fn test_board_body_gates_mask() {
        let mut vis = LayerVisibility::default();
        assert!(vis.soldermask(Side::Bottom));
        vis.board_body = false;
        assert!(!vis.soldermask(Side::Bottom));
    }

    #[test]
    fn test_set_by_name() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut vis = LayerVisibility::default();
        assert!(vis.set("bottom_silkscreen", false));
        assert!(!vis.silkscreen(Side::Bottom));
        assert!(vis.silkscreen(Side::Top));
        assert!(!vis.set("inner_copper", false));
        assert!(vis.toggle("bottom_silkscreen"));
        assert!(vis.silkscreen(Side::Bottom));
    }

    #[test]
    fn test_set_all_visible() {
        let mut vis = LayerVisibility::default();
        vis.set_all_visible(true);
        assert!(vis.fabrication_notes);
        vis.set_all_visible(false);
        assert!(!vis.panel_outlines && !vis.top_copper);
    }
}
