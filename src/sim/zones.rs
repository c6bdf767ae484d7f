//! Safe and bonus zones
//!
//! Safe zones are fixed rectangles along the bottom edge. The bonus zone is a
//! circle orbiting the middle of the canvas.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::{LOGICAL_HEIGHT, LOGICAL_WIDTH};
use crate::tuning::ZoneTuning;
use crate::unit_from_angle;

/// Where the player currently stands (drives scoring and BGM selection)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ZoneState {
    #[default]
    Open,
    Safe,
    Bonus,
}

/// Lay out `cols` safe rectangles flush with the bottom edge, spaced evenly
pub fn layout_safe_zones(tuning: &ZoneTuning) -> Vec<Rect> {
    let cols = tuning.safe_cols as usize;
    if cols == 0 {
        return Vec::new();
    }
    let w = (LOGICAL_WIDTH / tuning.safe_width_divisor).round();
    let h = tuning.safe_h;
    let gap = ((LOGICAL_WIDTH - w * cols as f32) / (cols as f32 + 1.0)).max(0.0);
    let y = LOGICAL_HEIGHT - h;

    (0..cols)
        .map(|i| Rect::new((gap + i as f32 * (w + gap)).round(), y, w, h))
        .collect()
}

/// Fixed set of safe rectangles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SafeZones {
    pub rects: Vec<Rect>,
}

impl SafeZones {
    pub fn new(tuning: &ZoneTuning) -> Self {
        Self {
            rects: layout_safe_zones(tuning),
        }
    }

    /// Whether a circle overlaps any safe rectangle
    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        self.rects.iter().any(|r| r.intersects_circle(center, radius))
    }
}

/// Circular scoring bonus that orbits the canvas centre
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusZone {
    pub radius: f32,
    pub orbit_center: Vec2,
    pub orbit_radius: f32,
    /// Orbit speed (radians/second)
    pub orbit_rate: f32,
    /// Sprite spin speed (radians/second)
    pub spin_rate: f32,
    /// Current orbit angle
    pub theta: f32,
    /// Current sprite angle
    pub spin: f32,
}

impl BonusZone {
    pub fn new(tuning: &ZoneTuning) -> Self {
        Self {
            radius: tuning.bonus_radius,
            orbit_center: Vec2::new(
                tuning.orbit_center[0] * LOGICAL_WIDTH,
                tuning.orbit_center[1] * LOGICAL_HEIGHT,
            ),
            orbit_radius: tuning.orbit_radius,
            orbit_rate: tuning.orbit_deg_per_sec.to_radians(),
            spin_rate: tuning.spin_deg_per_sec.to_radians(),
            theta: 0.0,
            spin: 0.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.theta = (self.theta + self.orbit_rate * dt) % std::f32::consts::TAU;
        self.spin = (self.spin + self.spin_rate * dt) % std::f32::consts::TAU;
    }

    pub fn center(&self) -> Vec2 {
        self.orbit_center + unit_from_angle(self.theta) * self.orbit_radius
    }

    /// Point-in-circle test for the player's position
    pub fn contains(&self, p: Vec2) -> bool {
        (p - self.center()).length_squared() <= self.radius * self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_layout_even_gaps() {
        let tuning = ZoneTuning::default();
        let rects = layout_safe_zones(&tuning);
        assert_eq!(rects.len(), 4);
        for r in &rects {
            assert_eq!(r.y + r.h, LOGICAL_HEIGHT);
            assert!(r.x >= 0.0 && r.x + r.w <= LOGICAL_WIDTH);
        }
        let gap_left = rects[0].x;
        let gap_mid = rects[1].x - (rects[0].x + rects[0].w);
        assert!((gap_left - gap_mid).abs() <= 1.0);
    }

    #[test]
    fn test_no_columns() {
        let tuning = ZoneTuning {
            safe_cols: 0,
            ..Default::default()
        };
        assert!(layout_safe_zones(&tuning).is_empty());
    }

    #[test]
    fn test_safe_overlap() {
        let zones = SafeZones::new(&ZoneTuning::default());
        let r = zones.rects[0];
        assert!(zones.overlaps_circle(r.center(), 1.0));
        assert!(!zones.overlaps_circle(Vec2::new(r.center().x, 100.0), 10.0));
    }

    #[test]
    fn test_bonus_orbit() {
        let tuning = ZoneTuning::default();
        let mut zone = BonusZone::new(&tuning);
        let start = zone.center();
        assert!((start - Vec2::new(600.0, 270.0)).length() < 1e-3);

        // A quarter orbit at 24°/s takes 3.75 s
        for _ in 0..375 {
            zone.update(0.01);
        }
        let quarter = zone.center();
        assert!((quarter - Vec2::new(480.0, 390.0)).length() < 0.5);
        assert!((quarter - zone.orbit_center).length() - tuning.orbit_radius < 1e-3);
        assert!(zone.contains(quarter));
        assert!(!zone.contains(Vec2::new(0.0, 0.0)));
    }
}
