use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::button::LogicalButton;

/// Screen-space rectangle with half-open bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// `left <= x < right` and `top <= y < bottom`.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x < self.right && p.y >= self.top && p.y < self.bottom
    }
}

/// An on-screen control that holds a logical button while touched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchRegion {
    pub rect: Rect,
    pub button: LogicalButton,
}

impl TouchRegion {
    pub fn new(rect: Rect, button: LogicalButton) -> Self {
        Self { rect, button }
    }

    /// True if any of `points` is inside the region.
    pub fn hit(&self, points: &[Vec2]) -> bool {
        points.iter().any(|p| self.rect.contains(*p))
    }
}
