//! Timed pattern spawner
//!
//! Each pattern owns an accumulator. A tick adds `dt` to every accumulator and
//! then drains every whole interval it holds, so a long frame fires a pattern
//! as many times as it was due (up to `MAX_BURSTS_PER_UPDATE`) instead of
//! dropping bursts.
//!
//! During the opening grace period the accumulators keep filling but nothing
//! is emitted: whatever is due when grace ends fires on that tick.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI, TAU};

use super::difficulty::{Difficulty, compute_difficulty, in_grace};
use super::projectile::{Pattern, Projectile, ProjectileKind, Steering};
use crate::consts::{LOGICAL_HEIGHT, LOGICAL_WIDTH};
use crate::tuning::{PatternTuning, Tuning};
use crate::unit_from_angle;

/// How far outside the canvas edge-spawned bullets appear (px)
const EDGE_OFFSET: f32 = 10.0;
/// Giant kanji start a little higher so their disc enters gradually
const KANJI_OFFSET: f32 = 20.0;
/// Keep side volleys and fan origins away from the corners (px)
const EDGE_INSET: f32 = 60.0;
/// Keep ring centres away from the edges (px)
const RING_INSET: f32 = 80.0;
/// Keep giant kanji spawn columns away from the side edges (px)
const KANJI_INSET: f32 = 40.0;
/// Most times one pattern may fire in a single update; overdue bursts beyond
/// this are dropped
pub const MAX_BURSTS_PER_UPDATE: u32 = 16;

/// One pattern firing during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emission {
    pub pattern: Pattern,
    /// Times the pattern fired this tick
    pub bursts: u32,
    /// Projectiles added across those bursts
    pub count: usize,
}

/// Screen edge a pattern launches from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match rng.random_range(0..4) {
            0 => Edge::Top,
            1 => Edge::Right,
            2 => Edge::Bottom,
            _ => Edge::Left,
        }
    }

    /// Random point just outside this edge
    fn spawn_point<R: Rng + ?Sized>(self, rng: &mut R) -> Vec2 {
        match self {
            Edge::Top => Vec2::new(rng.random_range(0.0..=LOGICAL_WIDTH), -EDGE_OFFSET),
            Edge::Right => Vec2::new(LOGICAL_WIDTH + EDGE_OFFSET, rng.random_range(0.0..=LOGICAL_HEIGHT)),
            Edge::Bottom => Vec2::new(rng.random_range(0.0..=LOGICAL_WIDTH), LOGICAL_HEIGHT + EDGE_OFFSET),
            Edge::Left => Vec2::new(-EDGE_OFFSET, rng.random_range(0.0..=LOGICAL_HEIGHT)),
        }
    }
}

/// Uniform draw in [-amp, amp]; zero amplitude draws nothing
#[inline]
fn jitter<R: Rng + ?Sized>(rng: &mut R, amp: f32) -> f32 {
    if amp > 0.0 { rng.random_range(-amp..=amp) } else { 0.0 }
}

/// Per-bullet speed variation used by rain and side volleys
#[inline]
fn speed_spread<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.random_range(0.9..=1.2)
}

/// Owns the per-pattern timers and emits projectiles into the live set
#[derive(Debug, Clone)]
pub struct Spawner {
    tuning: Tuning,
    timers: [f32; Pattern::COUNT],
    paused: bool,
}

impl Spawner {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            tuning: tuning.clone(),
            timers: [0.0; Pattern::COUNT],
            paused: false,
        }
    }

    /// Swap the balance sheet; timers and pause state are kept
    pub fn set_tuning(&mut self, tuning: &Tuning) {
        self.tuning = tuning.clone();
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Zero every timer (round reset)
    pub fn reset(&mut self) {
        self.timers = [0.0; Pattern::COUNT];
    }

    /// Freeze emission and timers
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Seconds accumulated toward the next `pattern` emission
    pub fn timer(&self, pattern: Pattern) -> f32 {
        self.timers[pattern.index()]
    }

    fn pattern_tuning(&self, pattern: Pattern) -> &PatternTuning {
        let s = &self.tuning.spawns;
        match pattern {
            Pattern::Rain => &s.rain,
            Pattern::Side => &s.side,
            Pattern::Fan => &s.fan,
            Pattern::Ring => &s.ring,
            Pattern::Homing => &s.homing,
            Pattern::Kanji => &s.kanji,
        }
    }

    /// Advance all pattern timers by `dt` and emit whatever is due.
    ///
    /// `elapsed` is the round clock at the end of this step.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        elapsed: f32,
        live: &mut Vec<Projectile>,
        player: Vec2,
        rng: &mut R,
    ) -> Vec<Emission> {
        let mut emissions = Vec::new();
        if self.paused || !(dt.is_finite() && dt > 0.0) {
            return emissions;
        }

        let difficulty = compute_difficulty(elapsed, &self.tuning.difficulty);
        let grace = in_grace(elapsed, &self.tuning.difficulty);

        for pattern in Pattern::ALL {
            let i = pattern.index();
            self.timers[i] += dt;
            if grace {
                continue;
            }

            let every = self.pattern_tuning(pattern).every;
            if !every.is_finite() || every <= 0.0 {
                continue;
            }

            let due = (self.timers[i] / every).floor();
            if due < 1.0 {
                continue;
            }
            self.timers[i] = (self.timers[i] - due * every).max(0.0);

            let bursts = if due > MAX_BURSTS_PER_UPDATE as f32 {
                log::warn!(
                    "{} overdue {} times, firing {}",
                    pattern.as_str(),
                    due,
                    MAX_BURSTS_PER_UPDATE
                );
                MAX_BURSTS_PER_UPDATE
            } else {
                due as u32
            };
            let count: usize = (0..bursts)
                .map(|_| self.emit(pattern, difficulty, live, player, rng))
                .sum();

            log::debug!(
                "{} x{}: {} projectiles (speed x{:.2}, count x{:.2})",
                pattern.as_str(),
                bursts,
                count,
                difficulty.speed_mul,
                difficulty.count_mul
            );
            emissions.push(Emission {
                pattern,
                bursts,
                count,
            });
        }

        emissions
    }

    /// Emit one instance of `pattern`, returning how many projectiles were added
    pub fn emit<R: Rng + ?Sized>(
        &self,
        pattern: Pattern,
        difficulty: Difficulty,
        live: &mut Vec<Projectile>,
        player: Vec2,
        rng: &mut R,
    ) -> usize {
        let before = live.len();
        match pattern {
            Pattern::Rain => self.spawn_rain(difficulty, live, rng),
            Pattern::Side => self.spawn_side(difficulty, live, rng),
            Pattern::Fan => self.spawn_fan(difficulty, live, rng),
            Pattern::Ring => self.spawn_ring(difficulty, live, rng),
            Pattern::Homing => self.spawn_homing(difficulty, live, player, rng),
            Pattern::Kanji => {
                let tracks = self.tuning.kanji.tracks_player;
                self.spawn_kanji(difficulty, live, player, tracks, rng)
            }
        }
        live.len() - before
    }

    /// Evenly slotted columns above the top edge, falling straight down
    fn spawn_rain<R: Rng + ?Sized>(&self, d: Difficulty, live: &mut Vec<Projectile>, rng: &mut R) {
        let t = &self.tuning.spawns.rain;
        let radii = self.tuning.projectiles.normal;
        let n = d.scaled_count(t.count, t.min_count);
        if n == 0 {
            return;
        }
        let slot = LOGICAL_WIDTH / n as f32;
        live.extend((0..n).map(|i| {
            let x = slot * (i as f32 + rng.random_range(0.2..=0.8));
            let v = t.speed * d.speed_mul * speed_spread(rng);
            Projectile::straight(
                ProjectileKind::Normal,
                Pattern::Rain,
                Vec2::new(x, -EDGE_OFFSET),
                Vec2::new(0.0, v),
                radii,
            )
        }));
    }

    /// A staggered column crossing from one side edge
    fn spawn_side<R: Rng + ?Sized>(&self, d: Difficulty, live: &mut Vec<Projectile>, rng: &mut R) {
        let s = &self.tuning.spawns;
        let t = &s.side;
        let radii = self.tuning.projectiles.fast;
        let from_left = rng.random_bool(0.5);
        let y0 = rng.random_range(EDGE_INSET..=LOGICAL_HEIGHT - EDGE_INSET);
        let x = if from_left { -EDGE_OFFSET } else { LOGICAL_WIDTH + EDGE_OFFSET };
        let dir = if from_left { 1.0 } else { -1.0 };
        let n = d.scaled_count(t.count, t.min_count);

        live.extend((0..n).map(|i| {
            let vx = dir * t.speed * d.speed_mul * speed_spread(rng);
            let vy = jitter(rng, s.side_drift);
            Projectile::straight(
                ProjectileKind::Fast,
                Pattern::Side,
                Vec2::new(x, y0 + i as f32 * s.side_stagger),
                Vec2::new(vx, vy),
                radii,
            )
        }));
    }

    /// A spread from one origin, centred on straight across the canvas
    fn spawn_fan<R: Rng + ?Sized>(&self, d: Difficulty, live: &mut Vec<Projectile>, rng: &mut R) {
        let s = &self.tuning.spawns;
        let t = &s.fan;
        let radii = self.tuning.projectiles.normal;
        let (origin, base) = match rng.random_range(0..3) {
            0 => (
                Vec2::new(-EDGE_OFFSET, rng.random_range(EDGE_INSET..=LOGICAL_HEIGHT - EDGE_INSET)),
                0.0,
            ),
            1 => (
                Vec2::new(
                    LOGICAL_WIDTH + EDGE_OFFSET,
                    rng.random_range(EDGE_INSET..=LOGICAL_HEIGHT - EDGE_INSET),
                ),
                PI,
            ),
            _ => (
                Vec2::new(rng.random_range(EDGE_INSET..=LOGICAL_WIDTH - EDGE_INSET), -EDGE_OFFSET),
                FRAC_PI_2,
            ),
        };

        let n = d.scaled_count(t.count, t.min_count);
        let spread = s.fan_spread_deg.to_radians();
        let speed = t.speed * d.speed_mul;
        live.extend((0..n).map(|i| {
            let offset = if n > 1 {
                spread * (i as f32 / (n - 1) as f32 - 0.5)
            } else {
                0.0
            };
            Projectile::straight(
                ProjectileKind::Normal,
                Pattern::Fan,
                origin,
                unit_from_angle(base + offset) * speed,
                radii,
            )
        }));
    }

    /// 360°/N burst from a random interior point
    fn spawn_ring<R: Rng + ?Sized>(&self, d: Difficulty, live: &mut Vec<Projectile>, rng: &mut R) {
        let t = &self.tuning.spawns.ring;
        let radii = self.tuning.projectiles.normal;
        let center = Vec2::new(
            rng.random_range(RING_INSET..=LOGICAL_WIDTH - RING_INSET),
            rng.random_range(RING_INSET..=LOGICAL_HEIGHT - RING_INSET),
        );
        let n = d.scaled_count(t.count, t.min_count);
        if n == 0 {
            return;
        }
        let speed = t.speed * d.speed_mul;
        live.extend((0..n).map(|i| {
            let a = i as f32 / n as f32 * TAU;
            Projectile::straight(
                ProjectileKind::Normal,
                Pattern::Ring,
                center,
                unit_from_angle(a) * speed,
                radii,
            )
        }));
    }

    /// One tracking bullet from a random edge, launched at the player
    fn spawn_homing<R: Rng + ?Sized>(
        &self,
        d: Difficulty,
        live: &mut Vec<Projectile>,
        player: Vec2,
        rng: &mut R,
    ) {
        let p = &self.tuning.projectiles;
        let speed = self.tuning.spawns.homing.speed * d.speed_mul;
        let pos = Edge::random(rng).spawn_point(rng);
        let steering = Steering::from_degrees(p.homing_turn_rate_deg, p.homing_budget_deg);
        live.push(Projectile::homing(pos, player, speed, p.homing, steering));
    }

    /// One giant kanji from the top edge, launched at the player.
    ///
    /// `tracks_player` decides whether it keeps steering after launch.
    pub fn spawn_kanji<R: Rng + ?Sized>(
        &self,
        d: Difficulty,
        live: &mut Vec<Projectile>,
        player: Vec2,
        tracks_player: bool,
        rng: &mut R,
    ) {
        let k = &self.tuning.kanji;
        let speed = self.tuning.spawns.kanji.speed * d.speed_mul;
        let pos = Vec2::new(
            rng.random_range(KANJI_INSET..=LOGICAL_WIDTH - KANJI_INSET),
            -KANJI_OFFSET,
        );
        let steering = tracks_player.then(|| Steering::from_degrees(k.turn_rate_deg, k.budget_deg));
        let glyph = (!k.glyphs.is_empty()).then(|| rng.random_range(0..k.glyphs.len()));
        live.push(Projectile::giant_kanji(pos, player, speed, k.radii, steering, glyph));
    }
}
