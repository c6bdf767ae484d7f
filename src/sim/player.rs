//! The player's ship
//!
//! The core only reads `pos` and `hit_radius`; movement lives here so the
//! headless runner and the browser host share one rule.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{LOGICAL_HEIGHT, LOGICAL_WIDTH};
use crate::tuning::PlayerTuning;

/// Pointer follow stiffness (1/s)
const POINTER_GAIN: f32 = 12.0;
/// Pointer follow speed cap, as a multiple of the current move speed
const POINTER_SPEED_CAP: f32 = 3.0;

/// Movement intent for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveInput {
    /// Keyboard/stick axis, each component in [-1, 1]
    pub axis: Vec2,
    /// Slow (focus) modifier held
    pub slow: bool,
    /// Pointer position while a pointer is held down
    pub pointer: Option<Vec2>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub hit_radius: f32,
    pub size: f32,
    pub speed: f32,
    pub slow_speed: f32,
}

impl Player {
    pub fn new(tuning: &PlayerTuning) -> Self {
        Self {
            pos: Self::spawn_point(),
            vel: Vec2::ZERO,
            hit_radius: tuning.hit_radius,
            size: tuning.size,
            speed: tuning.speed,
            slow_speed: tuning.slow_speed,
        }
    }

    /// Bottom-centre start position
    pub fn spawn_point() -> Vec2 {
        Vec2::new(LOGICAL_WIDTH * 0.5, LOGICAL_HEIGHT * 0.85)
    }

    pub fn update(&mut self, dt: f32, input: &MoveInput) {
        let speed = if input.slow { self.slow_speed } else { self.speed };

        if let Some(target) = input.pointer.filter(|p| p.is_finite()) {
            self.vel = ((target - self.pos) * POINTER_GAIN).clamp_length_max(speed * POINTER_SPEED_CAP);
        } else {
            let axis = if input.axis.is_finite() {
                input.axis.clamp(Vec2::splat(-1.0), Vec2::ONE)
            } else {
                Vec2::ZERO
            };
            self.vel = axis * speed;
        }
        self.pos += self.vel * dt;

        let r = self.size / 2.0;
        self.pos = self.pos.clamp(
            Vec2::splat(r),
            Vec2::new(LOGICAL_WIDTH - r, LOGICAL_HEIGHT - r),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_movement() {
        let mut player = Player::new(&PlayerTuning::default());
        let start = player.pos;
        player.update(
            0.1,
            &MoveInput {
                axis: Vec2::new(1.0, 0.0),
                ..Default::default()
            },
        );
        assert!((player.pos.x - (start.x + 24.0)).abs() < 1e-3);

        player.update(
            0.1,
            &MoveInput {
                axis: Vec2::new(-1.0, 0.0),
                slow: true,
                ..Default::default()
            },
        );
        assert!((player.pos.x - (start.x + 12.0)).abs() < 1e-3);
    }

    #[test]
    fn test_pointer_follow_capped() {
        let mut player = Player::new(&PlayerTuning::default());
        player.update(
            0.01,
            &MoveInput {
                pointer: Some(Vec2::new(0.0, 0.0)),
                ..Default::default()
            },
        );
        assert!(player.vel.length() <= player.speed * POINTER_SPEED_CAP + 1e-3);
    }

    #[test]
    fn test_clamped_to_canvas() {
        let mut player = Player::new(&PlayerTuning::default());
        for _ in 0..200 {
            player.update(
                0.05,
                &MoveInput {
                    axis: Vec2::new(1.0, 1.0),
                    ..Default::default()
                },
            );
        }
        let r = player.size / 2.0;
        assert_eq!(player.pos, Vec2::new(LOGICAL_WIDTH - r, LOGICAL_HEIGHT - r));
    }
}
