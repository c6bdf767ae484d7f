//! Kanji Danmaku - a bullet-hell arcade simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawner, projectile motion, collisions, game state)
//! - `tuning`: Data-driven game balance
//! - `web`: Browser bindings (wasm32 only)

pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use tuning::{SafeZonePolicy, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Logical canvas dimensions (the host scales this to the window)
    pub const LOGICAL_WIDTH: f32 = 960.0;
    pub const LOGICAL_HEIGHT: f32 = 540.0;

    /// Largest frame delta a single tick will simulate (seconds)
    pub const MAX_FRAME_DT: f32 = 1.0 / 20.0;
    /// Step used by the headless runner
    pub const SIM_DT: f32 = 1.0 / 60.0;
}

/// Wrap an angle into (-π, π]
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped.min(PI) }
}

/// Heading of a velocity vector in canvas space (y grows downward).
///
/// A zero-length vector has no heading; it falls back to straight down.
#[inline]
pub fn heading_of(vel: Vec2) -> f32 {
    if vel.length_squared() > f32::EPSILON {
        vel.y.atan2(vel.x)
    } else {
        std::f32::consts::FRAC_PI_2
    }
}

/// Unit vector pointing along `theta`
#[inline]
pub fn unit_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}
