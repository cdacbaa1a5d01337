//! The typed feature model every rasterizer consumes.

use serde::{Deserialize, Serialize};

use crate::board::Side;
use crate::brep::BRep;
use crate::error::GeometryError;
use crate::geometry::{BBox, Point};

/// One renderable board feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerFeature {
    CopperPour(CopperPour),
    Trace(Trace),
    Pad(Pad),
    PlatedHole(PlatedHole),
    CopperText(Text),
    SilkscreenText(Text),
    SilkscreenPath(SilkscreenPath),
    NoteText(Text),
    PanelOutline(PanelOutline),
}

impl LayerFeature {
    /// The single side this feature lives on. `None` for features that are
    /// per-point (traces) or present on both sides (plated holes, panels).
    pub fn side(&self) -> Option<Side> {
        match self {
            LayerFeature::CopperPour(p) => Some(p.side),
            LayerFeature::Pad(p) => Some(p.side),
            LayerFeature::CopperText(t)
            | LayerFeature::SilkscreenText(t)
            | LayerFeature::NoteText(t) => Some(t.side),
            LayerFeature::SilkscreenPath(p) => Some(p.side),
            LayerFeature::Trace(_) | LayerFeature::PlatedHole(_) | LayerFeature::PanelOutline(_) => {
                None
            }
        }
    }

    /// Whether anything of this feature is drawn on `side`.
    pub fn is_on(&self, side: Side) -> bool {
        match self {
            LayerFeature::Trace(t) => t.wire_points().any(|(_, _, layer)| layer == side),
            LayerFeature::PlatedHole(_) | LayerFeature::PanelOutline(_) => true,
            other => other.side() == Some(side),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            LayerFeature::CopperPour(_) => "copper_pour",
            LayerFeature::Trace(_) => "trace",
            LayerFeature::Pad(_) => "pad",
            LayerFeature::PlatedHole(_) => "plated_hole",
            LayerFeature::CopperText(_) => "copper_text",
            LayerFeature::SilkscreenText(_) => "silkscreen_text",
            LayerFeature::SilkscreenPath(_) => "silkscreen_path",
            LayerFeature::NoteText(_) => "note_text",
            LayerFeature::PanelOutline(_) => "panel_outline",
        }
    }

    /// Check coordinates and dimensions before drawing.
    pub fn validate(&self) -> Result<(), GeometryError> {
        match self {
            LayerFeature::CopperPour(p) => p.shape.validate(),
            LayerFeature::Trace(t) => t.validate(),
            LayerFeature::Pad(p) => p.validate(),
            LayerFeature::PlatedHole(h) => h.validate(),
            LayerFeature::CopperText(t)
            | LayerFeature::SilkscreenText(t)
            | LayerFeature::NoteText(t) => t.validate(),
            LayerFeature::SilkscreenPath(p) => {
                check_positive("stroke_width", p.stroke_width)?;
                check_points(&p.route)
            }
            LayerFeature::PanelOutline(p) => p.sub_boards.iter().try_for_each(SubBoard::validate),
        }
    }
}

fn check_finite(field: &'static str, value: f64) -> Result<(), GeometryError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(GeometryError::NonFinite { field })
    }
}

fn check_positive(field: &'static str, value: f64) -> Result<(), GeometryError> {
    check_finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::NonPositiveDimension { field, value })
    }
}

fn check_point(field: &'static str, p: &Point) -> Result<(), GeometryError> {
    if p.is_finite() {
        Ok(())
    } else {
        Err(GeometryError::NonFinite { field })
    }
}

fn check_points(points: &[Point]) -> Result<(), GeometryError> {
    match points.iter().position(|p| !p.is_finite()) {
        Some(index) => Err(GeometryError::NonFiniteVertex { index }),
        None => Ok(()),
    }
}

// ── Copper pours ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopperPour {
    pub side: Side,
    pub shape: PourShape,
    #[serde(default)]
    pub covered_with_solder_mask: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PourShape {
    Rect {
        center: Point,
        width: f64,
        height: f64,
        /// Counter-clockwise degrees about `center`.
        #[serde(default)]
        rotation: f64,
    },
    Polygon {
        points: Vec<Point>,
    },
    Brep {
        brep: BRep,
    },
}

impl PourShape {
    pub fn validate(&self) -> Result<(), GeometryError> {
        match self {
            PourShape::Rect {
                center,
                width,
                height,
                rotation,
            } => {
                check_point("center", center)?;
                check_positive("width", *width)?;
                check_positive("height", *height)?;
                check_finite("rotation", *rotation)
            }
            PourShape::Polygon { points } => {
                if points.len() < 3 {
                    return Err(GeometryError::TooFewPoints(points.len()));
                }
                check_points(points)
            }
            PourShape::Brep { brep } => brep.validate(),
        }
    }
}

// ── Traces ───────────────────────────────────────────────────────────

fn covered_by_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub route: Vec<RoutePoint>,
    #[serde(default = "covered_by_default")]
    pub covered_with_solder_mask: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "route_type", rename_all = "snake_case")]
pub enum RoutePoint {
    Wire {
        x: f64,
        y: f64,
        width: f64,
        layer: Side,
    },
    Via {
        x: f64,
        y: f64,
        from_layer: Side,
        to_layer: Side,
    },
}

impl Trace {
    /// `(position, width, layer)` of every wire point.
    pub fn wire_points(&self) -> impl Iterator<Item = (Point, f64, Side)> + '_ {
        self.route.iter().filter_map(|p| match *p {
            RoutePoint::Wire { x, y, width, layer } => Some((Point::new(x, y), width, layer)),
            RoutePoint::Via { .. } => None,
        })
    }

    fn validate(&self) -> Result<(), GeometryError> {
        for (index, point) in self.route.iter().enumerate() {
            let (x, y) = match *point {
                RoutePoint::Wire { x, y, width, .. } => {
                    check_positive("width", width)?;
                    (x, y)
                }
                RoutePoint::Via { x, y, .. } => (x, y),
            };
            if !x.is_finite() || !y.is_finite() {
                return Err(GeometryError::NonFiniteVertex { index });
            }
        }
        Ok(())
    }
}

// ── Pads and holes ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pad {
    pub side: Side,
    pub position: Point,
    #[serde(flatten)]
    pub shape: PadShape,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum PadShape {
    Rect {
        width: f64,
        height: f64,
        #[serde(default)]
        corner_radius: Option<f64>,
    },
    RotatedRect {
        width: f64,
        height: f64,
        /// Counter-clockwise degrees about the pad center.
        rotation: f64,
        #[serde(default)]
        corner_radius: Option<f64>,
    },
    Circle {
        radius: f64,
    },
    /// Absolute board coordinates; `position` is ignored for drawing.
    Polygon {
        points: Vec<Point>,
    },
}

impl Pad {
    pub fn new(side: Side, position: Point, shape: PadShape) -> Self {
        Self {
            side,
            position,
            shape,
        }
    }

    fn validate(&self) -> Result<(), GeometryError> {
        check_point("position", &self.position)?;
        match &self.shape {
            PadShape::Rect {
                width,
                height,
                corner_radius,
            } => {
                check_positive("width", *width)?;
                check_positive("height", *height)?;
                corner_radius.map_or(Ok(()), |r| check_finite("corner_radius", r))
            }
            PadShape::RotatedRect {
                width,
                height,
                rotation,
                corner_radius,
            } => {
                check_positive("width", *width)?;
                check_positive("height", *height)?;
                check_finite("rotation", *rotation)?;
                corner_radius.map_or(Ok(()), |r| check_finite("corner_radius", r))
            }
            PadShape::Circle { radius } => check_positive("radius", *radius),
            PadShape::Polygon { points } => {
                if points.len() < 3 {
                    return Err(GeometryError::TooFewPoints(points.len()));
                }
                check_points(points)
            }
        }
    }
}

/// A through-hole with an annular copper ring on both sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatedHole {
    pub position: Point,
    pub outer_diameter: f64,
    pub hole_diameter: f64,
}

impl PlatedHole {
    fn validate(&self) -> Result<(), GeometryError> {
        check_point("position", &self.position)?;
        check_positive("outer_diameter", self.outer_diameter)?;
        check_positive("hole_diameter", self.hole_diameter)
    }
}

// ── Text ─────────────────────────────────────────────────────────────

/// Which point of the text's bounding box sits on the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorAlignment {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    #[default]
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl AnchorAlignment {
    pub fn is_left(self) -> bool {
        matches!(
            self,
            AnchorAlignment::TopLeft | AnchorAlignment::CenterLeft | AnchorAlignment::BottomLeft
        )
    }

    pub fn is_right(self) -> bool {
        matches!(
            self,
            AnchorAlignment::TopRight | AnchorAlignment::CenterRight | AnchorAlignment::BottomRight
        )
    }

    pub fn is_top(self) -> bool {
        matches!(
            self,
            AnchorAlignment::TopLeft | AnchorAlignment::TopCenter | AnchorAlignment::TopRight
        )
    }

    pub fn is_bottom(self) -> bool {
        matches!(
            self,
            AnchorAlignment::BottomLeft
                | AnchorAlignment::BottomCenter
                | AnchorAlignment::BottomRight
        )
    }
}

/// Per-side knockout padding; unset sides use the configured default.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct KnockoutPadding {
    #[serde(default)]
    pub left: Option<f64>,
    #[serde(default)]
    pub right: Option<f64>,
    #[serde(default)]
    pub top: Option<f64>,
    #[serde(default)]
    pub bottom: Option<f64>,
}

/// Fully resolved padding in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Padding {
    pub fn uniform(value: f64) -> Self {
        Self {
            left: value,
            right: value,
            top: value,
            bottom: value,
        }
    }
}

impl KnockoutPadding {
    pub fn resolve(&self, default: f64) -> Padding {
        Padding {
            left: self.left.unwrap_or(default),
            right: self.right.unwrap_or(default),
            top: self.top.unwrap_or(default),
            bottom: self.bottom.unwrap_or(default),
        }
    }
}

/// Copper, silkscreen or note text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub side: Side,
    pub text: String,
    pub anchor: Point,
    #[serde(default)]
    pub anchor_alignment: AnchorAlignment,
    pub font_size: f64,
    /// Counter-clockwise degrees.
    #[serde(default)]
    pub rotation: f64,
    /// Explicit mirroring; `None` mirrors on the bottom side only.
    #[serde(default)]
    pub mirror: Option<bool>,
    #[serde(default)]
    pub is_knockout: bool,
    #[serde(default)]
    pub knockout_padding: Option<KnockoutPadding>,
}

impl Text {
    pub fn new(side: Side, text: &str, anchor: Point, font_size: f64) -> Self {
        Self {
            side,
            text: text.to_string(),
            anchor,
            anchor_alignment: AnchorAlignment::default(),
            font_size,
            rotation: 0.0,
            mirror: None,
            is_knockout: false,
            knockout_padding: None,
        }
    }

    pub fn knockout(mut self, padding: Option<KnockoutPadding>) -> Self {
        self.is_knockout = true;
        self.knockout_padding = padding;
        self
    }

    /// Bottom text mirrors unless explicitly disabled; top text only on request.
    pub fn is_mirrored(&self) -> bool {
        match self.side {
            Side::Bottom => self.mirror != Some(false),
            Side::Top => self.mirror == Some(true),
        }
    }

    fn validate(&self) -> Result<(), GeometryError> {
        check_point("anchor", &self.anchor)?;
        check_positive("font_size", self.font_size)?;
        check_finite("rotation", self.rotation)
    }
}

// ── Silkscreen paths and panels ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SilkscreenPath {
    pub side: Side,
    pub route: Vec<Point>,
    pub stroke_width: f64,
}

/// Outline of every board in a panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelOutline {
    pub sub_boards: Vec<SubBoard>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubBoard {
    pub center: Point,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<Vec<Point>>,
}

impl SubBoard {
    /// Explicit outline, or the implied rectangle.
    pub fn outline_points(&self) -> Vec<Point> {
        match &self.outline {
            Some(outline) if outline.len() >= 3 => outline.clone(),
            _ => BBox::from_center(self.center, self.width, self.height)
                .corners()
                .to_vec(),
        }
    }

    fn validate(&self) -> Result<(), GeometryError> {
        check_point("center", &self.center)?;
        match &self.outline {
            Some(outline) if outline.len() >= 3 => check_points(outline),
            _ => {
                check_positive("width", self.width)?;
                check_positive("height", self.height)
            }
        }
    }
}
