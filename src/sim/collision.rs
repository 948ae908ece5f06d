//! Collision detection for axis-aligned boxes
//!
//! Both boxes have their trailing (right and bottom) edges pulled in by a
//! tolerance margin before the overlap test, so a graze along an edge does not
//! end the run.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::FieldGeometry;
use crate::consts::COLLISION_TOLERANCE;

/// Axis-aligned rectangle in field coordinates (origin top-left, y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from a top-left position and a size
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Overlap test with the default tolerance margin
#[inline]
pub fn collides(a: &Rect, b: &Rect) -> bool {
    collides_with_tolerance(a, b, COLLISION_TOLERANCE)
}

/// Overlap test after insetting each box's right and bottom edges by `tolerance`
pub fn collides_with_tolerance(a: &Rect, b: &Rect, tolerance: f32) -> bool {
    a.x < b.right() - tolerance
        && a.right() - tolerance > b.x
        && a.y < b.bottom() - tolerance
        && a.bottom() - tolerance > b.y
}

/// Entirely past the left edge of the field
#[inline]
pub fn is_off_left(rect: &Rect) -> bool {
    rect.right() < 0.0
}

/// Entirely past the right edge of the field
#[inline]
pub fn is_off_right(rect: &Rect, field: &FieldGeometry) -> bool {
    rect.x > field.width
}

/// Entirely above the field
#[inline]
pub fn is_off_top(rect: &Rect) -> bool {
    rect.bottom() < 0.0
}

/// Entirely below the field
#[inline]
pub fn is_off_bottom(rect: &Rect, field: &FieldGeometry) -> bool {
    rect.y > field.height
}
