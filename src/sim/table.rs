//! Table geometry

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Rectangular playing surface; the cushions sit `margin` inside each edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl Table {
    pub fn new(width: f32, height: f32, margin: f32) -> Self {
        Self {
            width,
            height,
            margin,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Lowest legal center coordinate for a disc of `radius`
    #[inline]
    pub fn min_bound(&self, radius: f32) -> Vec2 {
        Vec2::splat(self.margin + radius)
    }

    /// Highest legal center coordinate for a disc of `radius`
    #[inline]
    pub fn max_bound(&self, radius: f32) -> Vec2 {
        Vec2::new(
            self.width - self.margin - radius,
            self.height - self.margin - radius,
        )
    }

    pub fn contains(&self, pos: Vec2, radius: f32) -> bool {
        let lo = self.min_bound(radius);
        let hi = self.max_bound(radius);
        pos.x >= lo.x && pos.x <= hi.x && pos.y >= lo.y && pos.y <= hi.y
    }

    pub fn clamp(&self, pos: Vec2, radius: f32) -> Vec2 {
        pos.clamp(self.min_bound(radius), self.max_bound(radius))
    }
}
