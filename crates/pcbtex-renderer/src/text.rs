//! Text layout: glyph outlines, anchor alignment, mirroring, rotation and
//! knockout boxes, all in board millimeters.

use pcbtex_core::feature::{AnchorAlignment, Padding};
use pcbtex_core::{BBox, Point, Text};

use crate::config::{RenderConfig, TextClass};
use crate::font::{split_looped_outlines, vector_text};

/// Everything that shapes a text's outlines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextParams {
    pub font_size: f64,
    /// x-height as a fraction of `font_size`; differs per text class.
    pub glyph_scale: f64,
    pub alignment: AnchorAlignment,
    /// Counter-clockwise degrees, before mirroring is taken into account.
    pub rotation: f64,
    pub mirror: bool,
    pub knockout: Option<Padding>,
}

impl TextParams {
    pub fn for_text(text: &Text, class: TextClass, config: &RenderConfig) -> Self {
        let knockout = text.is_knockout.then(|| {
            text.knockout_padding
                .unwrap_or_default()
                .resolve(config.knockout_padding)
        });
        Self {
            font_size: text.font_size,
            glyph_scale: config.text_scale(class),
            alignment: text.anchor_alignment,
            rotation: text.rotation,
            mirror: text.is_mirrored(),
            knockout,
        }
    }
}

/// Laid-out text relative to its anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    /// Glyph polylines in text space (first baseline at y = 0).
    pub outlines: Vec<Vec<Point>>,
    pub offset_x: f64,
    pub offset_y: f64,
    /// Bounds of all outline points in text space.
    pub bounds: BBox,
    pub mirrored: bool,
    /// Effective rotation; negated when mirrored.
    pub rotation: f64,
    /// Knockout box in text space: `bounds` grown by the padding.
    pub knockout: Option<BBox>,
}

/// Lay out `text`. Returns `None` when nothing would be drawn.
pub fn layout_text(text: &str, params: &TextParams) -> Option<TextLayout> {
    let x_height = params.font_size * params.glyph_scale;
    let outlines = split_looped_outlines(vector_text(text, x_height));
    let bounds = BBox::from_iter_points(outlines.iter().flatten().copied())?;
    let center = bounds.center();

    let offset_x = if params.alignment.is_left() {
        -bounds.min.x
    } else if params.alignment.is_right() {
        -bounds.max.x
    } else {
        -center.x
    };
    let offset_y = if params.alignment.is_top() {
        -bounds.max.y
    } else if params.alignment.is_bottom() {
        -bounds.min.y
    } else {
        -center.y
    };

    let rotation = if params.mirror {
        -params.rotation
    } else {
        params.rotation
    };
    let knockout = params
        .knockout
        .map(|p| bounds.expand(p.left, p.right, p.top, p.bottom));

    Some(TextLayout {
        outlines,
        offset_x,
        offset_y,
        bounds,
        mirrored: params.mirror,
        rotation,
        knockout,
    })
}

impl TextLayout {
    /// Center of the text relative to the anchor.
    pub fn pivot(&self) -> Point {
        self.bounds.center().translate(self.offset_x, self.offset_y)
    }

    /// Map a text-space point to board space: align, mirror about the text
    /// center, rotate about the text center, then move to the anchor.
    pub fn place(&self, p: &Point, anchor: &Point) -> Point {
        let pivot = self.pivot();
        let mut q = p.translate(self.offset_x, self.offset_y);
        if self.mirrored {
            q.x = 2.0 * pivot.x - q.x;
        }
        if self.rotation != 0.0 {
            q = q.rotate_about(&pivot, self.rotation);
        }
        q.translate(anchor.x, anchor.y)
    }

    pub fn placed_outlines(&self, anchor: &Point) -> Vec<Vec<Point>> {
        self.outlines
            .iter()
            .map(|outline| outline.iter().map(|p| self.place(p, anchor)).collect())
            .collect()
    }

    /// Knockout rectangle corners in board space.
    pub fn placed_knockout(&self, anchor: &Point) -> Option<Vec<Point>> {
        self.knockout
            .map(|bb| bb.corners().iter().map(|p| self.place(p, anchor)).collect())
    }
}
