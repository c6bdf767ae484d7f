//! Projectiles and their per-kind motion rules
//!
//! A projectile is a tagged record: `kind` picks the motion rule and the
//! optional `steering` payload carries the homing state for the kinds that
//! turn toward the player.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Radii;
use crate::{heading_of, unit_from_angle, wrap_angle};

/// Projectile kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectileKind {
    /// Straight line, white
    Normal,
    /// Straight line, faster, red
    Fast,
    /// Turns toward the player at a bounded rate until its budget runs out
    Homing,
    /// Huge slow disc with a glyph; tracking is configurable
    GiantKanji,
}

impl ProjectileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectileKind::Normal => "normal",
            ProjectileKind::Fast => "fast",
            ProjectileKind::Homing => "homing",
            ProjectileKind::GiantKanji => "giant_kanji",
        }
    }
}

/// Spawn pattern that produced a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    Rain,
    Side,
    Fan,
    Ring,
    Homing,
    Kanji,
}

impl Pattern {
    pub const COUNT: usize = 6;

    /// All patterns, in the order the spawner evaluates them
    pub const ALL: [Pattern; Self::COUNT] = [
        Pattern::Rain,
        Pattern::Side,
        Pattern::Fan,
        Pattern::Ring,
        Pattern::Homing,
        Pattern::Kanji,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Pattern::Rain => "rain",
            Pattern::Side => "side",
            Pattern::Fan => "fan",
            Pattern::Ring => "ring",
            Pattern::Homing => "homing",
            Pattern::Kanji => "kanji",
        }
    }
}

/// Bounded-rate turning state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Steering {
    /// Radians per second
    pub max_turn_rate: f32,
    /// Cumulative turn allowance in degrees (`None` = unlimited)
    pub budget_deg: Option<f32>,
    /// Cumulative turn applied so far, in degrees
    pub steered_deg: f32,
}

impl Steering {
    pub fn new(max_turn_rate: f32, budget_deg: Option<f32>) -> Self {
        Self {
            max_turn_rate: if max_turn_rate.is_finite() {
                max_turn_rate.max(0.0)
            } else {
                0.0
            },
            budget_deg,
            steered_deg: 0.0,
        }
    }

    /// Build from a turn rate given in degrees per second
    pub fn from_degrees(turn_rate_deg: f32, budget_deg: Option<f32>) -> Self {
        Self::new(turn_rate_deg.to_radians(), budget_deg)
    }

    /// True once the budget is spent; the projectile then flies straight
    pub fn exhausted(&self) -> bool {
        self.budget_deg.is_some_and(|b| self.steered_deg >= b)
    }

    /// Remaining allowance in radians
    fn remaining(&self) -> f32 {
        match self.budget_deg {
            Some(b) => (b - self.steered_deg).max(0.0).to_radians(),
            None => f32::INFINITY,
        }
    }

    /// Rotate `vel` toward `target` as seen from `pos`, preserving speed.
    ///
    /// Returns the new velocity and the signed turn applied (radians).
    pub fn steer(&mut self, pos: Vec2, vel: Vec2, target: Vec2, dt: f32) -> (Vec2, f32) {
        if self.exhausted() || dt <= 0.0 {
            return (vel, 0.0);
        }

        let to_target = target - pos;
        if to_target.length_squared() <= f32::EPSILON {
            // Sitting on the target: no bearing to steer toward
            return (vel, 0.0);
        }

        let speed = vel.length();
        let heading = heading_of(vel);
        let bearing = to_target.y.atan2(to_target.x);
        let delta = wrap_angle(bearing - heading);

        let remaining = self.remaining();
        let limit = (self.max_turn_rate * dt).min(remaining);
        let turn = delta.clamp(-limit, limit);
        if !turn.is_finite() {
            return (vel, 0.0);
        }

        match self.budget_deg {
            // Snap to the budget so rounding can never leave a sliver of steering
            Some(budget) if turn.abs() >= remaining => self.steered_deg = budget,
            _ => self.steered_deg += turn.abs().to_degrees(),
        }
        (unit_from_angle(heading + turn) * speed, turn)
    }
}

/// A live bullet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub kind: ProjectileKind,
    pub pattern: Pattern,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Drawn radius (rendering only)
    pub radius: f32,
    /// Collision radius
    pub hit_radius: f32,
    pub alive: bool,
    pub steering: Option<Steering>,
    /// Index into the kanji glyph list
    #[serde(default)]
    pub glyph: Option<usize>,
}

impl Projectile {
    /// A straight-flying bullet
    pub fn straight(
        kind: ProjectileKind,
        pattern: Pattern,
        pos: Vec2,
        vel: Vec2,
        radii: Radii,
    ) -> Self {
        Self {
            kind,
            pattern,
            pos,
            vel,
            radius: radii.radius,
            hit_radius: radii.hit_radius,
            alive: true,
            steering: None,
            glyph: None,
        }
    }

    /// A homing bullet launched at `target`
    pub fn homing(pos: Vec2, target: Vec2, speed: f32, radii: Radii, steering: Steering) -> Self {
        Self {
            steering: Some(steering),
            ..Self::straight(
                ProjectileKind::Homing,
                Pattern::Homing,
                pos,
                aim(pos, target, speed),
                radii,
            )
        }
    }

    /// A giant kanji launched at `target`; it steers only when `steering` is set
    pub fn giant_kanji(
        pos: Vec2,
        target: Vec2,
        speed: f32,
        radii: Radii,
        steering: Option<Steering>,
        glyph: Option<usize>,
    ) -> Self {
        Self {
            steering,
            glyph,
            ..Self::straight(
                ProjectileKind::GiantKanji,
                Pattern::Kanji,
                pos,
                aim(pos, target, speed),
                radii,
            )
        }
    }

    /// Advance one tick toward the player at `target`.
    ///
    /// Returns the turn applied this tick (radians, 0 for straight kinds).
    pub fn update(&mut self, dt: f32, target: Vec2) -> f32 {
        let turn = match self.kind {
            ProjectileKind::Normal | ProjectileKind::Fast => 0.0,
            ProjectileKind::Homing | ProjectileKind::GiantKanji => match self.steering.as_mut() {
                Some(steering) => {
                    let (vel, turn) = steering.steer(self.pos, self.vel, target, dt);
                    self.vel = vel;
                    turn
                }
                None => 0.0,
            },
        };
        self.pos += self.vel * dt;
        turn
    }

    /// Sprite rotation (radians)
    pub fn rotation(&self) -> f32 {
        heading_of(self.vel)
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// Velocity of magnitude `speed` from `from` toward `to`
pub fn aim(from: Vec2, to: Vec2, speed: f32) -> Vec2 {
    let dir = to - from;
    let dir = if dir.length_squared() > f32::EPSILON {
        dir.normalize()
    } else {
        unit_from_angle(heading_of(Vec2::ZERO))
    };
    dir * speed
}
