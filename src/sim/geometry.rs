//! Play field geometry
//!
//! Coordinates follow the stage's layout: `x` grows to the right from the
//! field's left edge, vertical offsets grow upward from the field's bottom
//! edge (the CSS `bottom` convention).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Axis-aligned rectangle, `min` is the bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Rectangle from its bottom-left corner and size
    pub fn from_corner(x: f32, bottom: f32, size: Vec2) -> Self {
        let min = Vec2::new(x, bottom);
        Self {
            min,
            max: min + size,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.max.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.max.y
    }

    /// Inclusive overlap test: rectangles that only touch still overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.right() < other.left()
            || self.left() > other.right()
            || self.top() < other.bottom()
            || self.bottom() > other.top())
    }
}

/// Free-function form of [`Rect::overlaps`]
#[inline]
pub fn overlap(a: &Rect, b: &Rect) -> bool {
    a.overlaps(b)
}

/// Visible field dimensions as reported by the stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldGeometry {
    pub width: f32,
    pub height: f32,
    /// Distance from the field's top edge to the score bar's bottom edge
    pub hud_bottom: f32,
    /// Score bar height
    pub hud_height: f32,
}

impl Default for FieldGeometry {
    fn default() -> Self {
        Self {
            width: DEFAULT_FIELD_WIDTH,
            height: DEFAULT_FIELD_HEIGHT,
            hud_bottom: DEFAULT_HUD_BOTTOM,
            hud_height: DEFAULT_HUD_HEIGHT,
        }
    }
}

fn usable(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

impl FieldGeometry {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
        .sanitized()
    }

    /// Replace degenerate dimensions with the defaults
    pub fn sanitized(self) -> Self {
        let hud = |v: f32, fallback: f32| if v.is_finite() && v >= 0.0 { v } else { fallback };
        Self {
            width: if usable(self.width) {
                self.width
            } else {
                DEFAULT_FIELD_WIDTH
            },
            height: if usable(self.height) {
                self.height
            } else {
                DEFAULT_FIELD_HEIGHT
            },
            hud_bottom: hud(self.hud_bottom, DEFAULT_HUD_BOTTOM),
            hud_height: hud(self.hud_height, DEFAULT_HUD_HEIGHT),
        }
    }

    /// Bottom offset of the top lane, just under the score bar
    pub fn top_row_bottom(&self) -> f32 {
        self.height - self.hud_bottom - self.hud_height - HUD_CLEARANCE
    }

    /// Vertical range of the upper band, lowest first
    pub fn upper_band(&self) -> (f32, f32) {
        let a = self.top_row_bottom();
        let b = self.height * UPPER_BAND_RATIO;
        (a.min(b), a.max(b))
    }

    /// Mid-lane offset for pipes: half the field height, kept above the
    /// ground lane and under the top row. The ground margin wins when the
    /// field is too short for both.
    pub fn pipe_bottom(&self, ground_level: f32) -> f32 {
        let min_middle = ground_level + PIPE_MIN_ABOVE_GROUND;
        let max_middle = self.top_row_bottom() - PIPE_BELOW_TOP_ROW;
        min_middle.max(max_middle.min(self.height * 0.5))
    }
}
