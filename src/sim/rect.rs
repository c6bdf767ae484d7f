//! Axis-aligned rectangles for the playfield and safe zones
//!
//! Canvas space: origin top-left, y grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{LOGICAL_HEIGHT, LOGICAL_WIDTH};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// The full logical canvas
    pub const fn playfield() -> Self {
        Self::new(0.0, 0.0, LOGICAL_WIDTH, LOGICAL_HEIGHT)
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.w, self.y + self.h)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Grow the rectangle by `margin` on every side
    pub fn expanded(&self, margin: f32) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.w + margin * 2.0,
            self.h + margin * 2.0,
        )
    }

    /// Point containment, edges inclusive
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    /// Closest point of the rectangle to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min(), self.max())
    }

    /// Circle overlap using the closest-point distance; touching counts
    pub fn intersects_circle(&self, center: Vec2, radius: f32) -> bool {
        let d = center - self.closest_point(center);
        d.length_squared() <= radius * radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_outside_corner() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        // 3-4-5 triangle from the (10, 10) corner
        assert!(rect.intersects_circle(Vec2::new(13.0, 14.0), 5.0));
        assert!(!rect.intersects_circle(Vec2::new(13.0, 14.0), 4.9));
    }

    #[test]
    fn test_circle_center_inside() {
        let rect = Rect::new(100.0, 100.0, 50.0, 20.0);
        assert!(rect.intersects_circle(Vec2::new(120.0, 110.0), 0.0));
    }

    #[test]
    fn test_expanded_playfield() {
        let bounds = Rect::playfield().expanded(40.0);
        assert_eq!(bounds.min(), Vec2::new(-40.0, -40.0));
        assert_eq!(bounds.max(), Vec2::new(1000.0, 580.0));
        assert!(bounds.contains_point(Vec2::new(-40.0, 580.0)));
        assert!(!bounds.contains_point(Vec2::new(500.0, 1000.0)));
    }
}
