use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{BBox, Point};

/// Physical side of the board a feature is printed or plated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Top,
    Bottom,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Top, Side::Bottom];

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Bottom => "bottom",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Board substrate; selects the soldermask color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardMaterial {
    #[default]
    Fr4,
    Fr1,
}

fn default_thickness() -> f64 {
    1.6
}

fn default_num_layers() -> u32 {
    2
}

/// The board being textured. Units are millimeters, Y up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub center: Point,
    pub width: f64,
    pub height: f64,
    /// Explicit outline for non-rectangular boards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<Vec<Point>>,
    #[serde(default = "default_thickness")]
    pub thickness: f64,
    #[serde(default)]
    pub material: BoardMaterial,
    #[serde(default = "default_num_layers")]
    pub num_layers: u32,
}

impl Board {
    pub fn new(center: Point, width: f64, height: f64) -> Self {
        Self {
            center,
            width,
            height,
            outline: None,
            thickness: default_thickness(),
            material: BoardMaterial::default(),
            num_layers: default_num_layers(),
        }
    }

    pub fn with_outline(mut self, outline: Vec<Point>) -> Self {
        self.outline = Some(outline);
        self
    }

    pub fn with_material(mut self, material: BoardMaterial) -> Self {
        self.material = material;
        self
    }

    /// The explicit outline when it has at least three points, else the
    /// `width × height` rectangle about `center`.
    pub fn outline_points(&self) -> Vec<Point> {
        match &self.outline {
            Some(outline) if outline.len() >= 3 => outline.clone(),
            _ => BBox::from_center(self.center, self.width, self.height)
                .corners()
                .to_vec(),
        }
    }

    /// Bounding box of the outline; this is the texture's extent.
    pub fn bounds(&self) -> Option<BBox> {
        BBox::from_points(&self.outline_points())
    }
}
