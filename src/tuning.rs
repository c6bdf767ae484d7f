//! Data-driven game balance
//!
//! Every number the spawner, projectiles, zones and scoring read lives here.
//! Loaded from JSON by the host; any missing field takes its default and a
//! malformed document falls back to the defaults wholesale.

use serde::{Deserialize, Serialize};

use crate::consts::{LOGICAL_HEIGHT, LOGICAL_WIDTH};

/// What a safe zone does to bullets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SafeZonePolicy {
    /// Bullets may not exist inside a safe rectangle; overlapping ones are removed
    #[default]
    PurgeProjectiles,
    /// Bullets pass through; the player cannot be hit while standing in one
    ShieldPlayer,
}

impl SafeZonePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SafeZonePolicy::PurgeProjectiles => "purge_projectiles",
            SafeZonePolicy::ShieldPlayer => "shield_player",
        }
    }
}

/// Linear growth curve with a hard cap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Curve {
    pub base: f32,
    pub growth: f32,
    pub cap: f32,
}

impl Default for Curve {
    fn default() -> Self {
        Self {
            base: 1.0,
            growth: 0.8,
            cap: 1.8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyTuning {
    /// Seconds of flat difficulty at the start of a round
    pub grace_secs: f32,
    /// Seconds after grace until growth saturates
    pub time_to_max_secs: f32,
    pub speed: Curve,
    pub count: Curve,
}

impl Default for DifficultyTuning {
    fn default() -> Self {
        Self {
            grace_secs: 3.0,
            time_to_max_secs: 120.0,
            speed: Curve {
                base: 1.0,
                growth: 0.8,
                cap: 1.8,
            },
            count: Curve {
                base: 1.0,
                growth: 1.0,
                cap: 2.0,
            },
        }
    }
}

/// Shortest pattern interval accepted (seconds)
pub const MIN_INTERVAL: f32 = 1.0 / 60.0;

/// Timing and size of one spawn pattern
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternTuning {
    /// Seconds between emissions
    pub every: f32,
    /// Base projectile speed (px/s) before the difficulty multiplier
    pub speed: f32,
    /// Base projectile count before the difficulty multiplier.
    /// Homing and kanji always fire a single projectile.
    pub count: u32,
    /// Floor for the scaled count
    pub min_count: u32,
}

impl Default for PatternTuning {
    fn default() -> Self {
        Self {
            every: 4.0,
            speed: 100.0,
            count: 1,
            min_count: 1,
        }
    }
}

impl PatternTuning {
    const fn new(every: f32, speed: f32, count: u32, min_count: u32) -> Self {
        Self {
            every,
            speed,
            count,
            min_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    pub rain: PatternTuning,
    pub side: PatternTuning,
    pub fan: PatternTuning,
    pub ring: PatternTuning,
    pub homing: PatternTuning,
    pub kanji: PatternTuning,

    // === Pattern shape ===
    /// Vertical spacing between side-volley bullets (px)
    pub side_stagger: f32,
    /// Max random vertical drift of side-volley bullets (px/s)
    pub side_drift: f32,
    /// Total angular spread of a fan (degrees)
    pub fan_spread_deg: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            rain: PatternTuning::new(3.8, 90.0, 10, 8),
            side: PatternTuning::new(1.8, 140.0, 5, 4),
            fan: PatternTuning::new(6.5, 120.0, 7, 5),
            ring: PatternTuning::new(9.0, 130.0, 24, 24),
            homing: PatternTuning::new(4.5, 110.0, 1, 1),
            kanji: PatternTuning::new(5.0, 60.0, 1, 1),

            side_stagger: 8.0,
            side_drift: 24.0,
            fan_spread_deg: 60.0,
        }
    }
}

/// Drawn and collision radii of a projectile kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Radii {
    pub radius: f32,
    pub hit_radius: f32,
}

impl Default for Radii {
    fn default() -> Self {
        Self {
            radius: 9.0,
            hit_radius: 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    pub normal: Radii,
    pub fast: Radii,
    pub homing: Radii,
    /// Homing turn rate (degrees/second)
    pub homing_turn_rate_deg: f32,
    /// Cumulative turn after which a homing bullet flies straight (degrees)
    pub homing_budget_deg: Option<f32>,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            normal: Radii {
                radius: 9.0,
                hit_radius: 3.0,
            },
            fast: Radii {
                radius: 7.0,
                hit_radius: 3.0,
            },
            homing: Radii {
                radius: 8.0,
                hit_radius: 3.0,
            },
            homing_turn_rate_deg: 180.0,
            homing_budget_deg: Some(70.0),
        }
    }
}

/// A glyph painted on a giant kanji bullet, with its reading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Glyph {
    pub kanji: String,
    pub furigana: String,
}

impl Glyph {
    fn new(kanji: &str, furigana: &str) -> Self {
        Self {
            kanji: kanji.to_string(),
            furigana: furigana.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KanjiTuning {
    /// Whether a giant kanji keeps steering toward the player after spawn
    pub tracks_player: bool,
    /// Turn rate while tracking (degrees/second)
    pub turn_rate_deg: f32,
    /// Optional cumulative turn budget (degrees); `None` tracks forever
    pub budget_deg: Option<f32>,
    pub radii: Radii,
    pub glyphs: Vec<Glyph>,
}

impl Default for KanjiTuning {
    fn default() -> Self {
        Self {
            tracks_player: true,
            turn_rate_deg: 15.0,
            budget_deg: None,
            radii: Radii {
                radius: 84.0,
                hit_radius: 24.0,
            },
            glyphs: vec![
                Glyph::new("漢字", "かんじ"),
                Glyph::new("弾幕", "だんまく"),
                Glyph::new("回避", "かいひ"),
                Glyph::new("誘導", "ゆうどう"),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneTuning {
    pub policy: SafeZonePolicy,
    /// Number of safe rectangles along the bottom edge
    pub safe_cols: u32,
    /// Safe rectangle height (px)
    pub safe_h: f32,
    /// Safe rectangle width is the canvas width divided by this
    pub safe_width_divisor: f32,

    // === Bonus zone ===
    pub bonus_radius: f32,
    /// Orbit centre as a fraction of the canvas (x, y)
    pub orbit_center: [f32; 2],
    pub orbit_radius: f32,
    pub orbit_deg_per_sec: f32,
    pub spin_deg_per_sec: f32,
}

impl Default for ZoneTuning {
    fn default() -> Self {
        Self {
            policy: SafeZonePolicy::PurgeProjectiles,
            safe_cols: 4,
            safe_h: 36.0,
            safe_width_divisor: 4.5,

            bonus_radius: 90.0,
            orbit_center: [0.5, 0.5],
            orbit_radius: 120.0,
            orbit_deg_per_sec: 24.0,
            spin_deg_per_sec: 35.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub speed: f32,
    /// Speed while the slow modifier is held
    pub slow_speed: f32,
    /// Drawn body diameter, also used to keep the body on screen
    pub size: f32,
    pub hit_radius: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: 240.0,
            slow_speed: 120.0,
            size: 32.0,
            hit_radius: 4.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreTuning {
    pub points_per_sec: f64,
    pub bonus_multiplier: f64,
    pub safe_multiplier: f64,
}

impl Default for ScoreTuning {
    fn default() -> Self {
        Self {
            points_per_sec: 100.0,
            bonus_multiplier: 2.0,
            safe_multiplier: 0.25,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub difficulty: DifficultyTuning,
    pub spawns: SpawnTuning,
    pub projectiles: ProjectileTuning,
    pub kanji: KanjiTuning,
    pub zones: ZoneTuning,
    pub player: PlayerTuning,
    pub scoring: ScoreTuning,
    /// How far outside the canvas a bullet may travel before it is purged
    pub bounds_margin: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            difficulty: DifficultyTuning::default(),
            spawns: SpawnTuning::default(),
            projectiles: ProjectileTuning::default(),
            kanji: KanjiTuning::default(),
            zones: ZoneTuning::default(),
            player: PlayerTuning::default(),
            scoring: ScoreTuning::default(),
            bounds_margin: 40.0,
        }
    }
}

impl Tuning {
    /// Parse a tuning document, surfacing the parse error
    pub fn try_from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut tuning: Tuning = serde_json::from_str(json)?;
        tuning.sanitize();
        Ok(tuning)
    }

    /// Parse a tuning document; a malformed document yields the defaults
    pub fn from_json(json: &str) -> Self {
        match Self::try_from_json(json) {
            Ok(tuning) => {
                log::info!("Loaded tuning");
                tuning
            }
            Err(err) => {
                log::warn!("Malformed tuning ({err}), using defaults");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Largest collision radius any projectile kind can have
    pub fn max_hit_radius(&self) -> f32 {
        let p = &self.projectiles;
        [
            p.normal.hit_radius,
            p.fast.hit_radius,
            p.homing.hit_radius,
            self.kanji.radii.hit_radius,
        ]
        .into_iter()
        .fold(0.0, f32::max)
    }

    /// Replace values that would stall or corrupt the simulation with defaults
    pub fn sanitize(&mut self) {
        let defaults = Tuning::default();

        let d = &mut self.difficulty;
        non_negative_or(&mut d.grace_secs, defaults.difficulty.grace_secs, "difficulty.grace_secs");
        positive_or(
            &mut d.time_to_max_secs,
            defaults.difficulty.time_to_max_secs,
            "difficulty.time_to_max_secs",
        );
        sanitize_curve(&mut d.speed, defaults.difficulty.speed, "difficulty.speed");
        sanitize_curve(&mut d.count, defaults.difficulty.count, "difficulty.count");

        let s = &mut self.spawns;
        let ds = &defaults.spawns;
        sanitize_pattern(&mut s.rain, ds.rain, "spawns.rain");
        sanitize_pattern(&mut s.side, ds.side, "spawns.side");
        sanitize_pattern(&mut s.fan, ds.fan, "spawns.fan");
        sanitize_pattern(&mut s.ring, ds.ring, "spawns.ring");
        sanitize_pattern(&mut s.homing, ds.homing, "spawns.homing");
        sanitize_pattern(&mut s.kanji, ds.kanji, "spawns.kanji");
        non_negative_or(&mut s.side_stagger, ds.side_stagger, "spawns.side_stagger");
        non_negative_or(&mut s.side_drift, ds.side_drift, "spawns.side_drift");
        non_negative_or(&mut s.fan_spread_deg, ds.fan_spread_deg, "spawns.fan_spread_deg");

        let p = &mut self.projectiles;
        let dp = &defaults.projectiles;
        sanitize_radii(&mut p.normal, dp.normal, "projectiles.normal");
        sanitize_radii(&mut p.fast, dp.fast, "projectiles.fast");
        sanitize_radii(&mut p.homing, dp.homing, "projectiles.homing");
        non_negative_or(
            &mut p.homing_turn_rate_deg,
            dp.homing_turn_rate_deg,
            "projectiles.homing_turn_rate_deg",
        );
        sanitize_budget(&mut p.homing_budget_deg, "projectiles.homing_budget_deg");

        let k = &mut self.kanji;
        non_negative_or(&mut k.turn_rate_deg, defaults.kanji.turn_rate_deg, "kanji.turn_rate_deg");
        sanitize_budget(&mut k.budget_deg, "kanji.budget_deg");
        sanitize_radii(&mut k.radii, defaults.kanji.radii, "kanji.radii");
        if k.radii.hit_radius > k.radii.radius {
            log::warn!("kanji.radii.hit_radius exceeds the drawn radius, clamping");
            k.radii.hit_radius = k.radii.radius;
        }
        if k.glyphs.is_empty() {
            k.glyphs = defaults.kanji.glyphs.clone();
        }

        let z = &mut self.zones;
        let dz = &defaults.zones;
        positive_or(&mut z.safe_h, dz.safe_h, "zones.safe_h");
        positive_or(&mut z.safe_width_divisor, dz.safe_width_divisor, "zones.safe_width_divisor");
        if z.safe_cols as f32 > z.safe_width_divisor {
            log::warn!("zones.safe_cols do not fit on the canvas, using defaults");
            z.safe_cols = dz.safe_cols;
            z.safe_width_divisor = dz.safe_width_divisor;
        }
        non_negative_or(&mut z.bonus_radius, dz.bonus_radius, "zones.bonus_radius");
        non_negative_or(&mut z.orbit_radius, dz.orbit_radius, "zones.orbit_radius");
        if !z.orbit_center.iter().all(|c| c.is_finite()) {
            log::warn!("zones.orbit_center is not finite, using default");
            z.orbit_center = dz.orbit_center;
        }
        if !z.orbit_deg_per_sec.is_finite() {
            z.orbit_deg_per_sec = dz.orbit_deg_per_sec;
        }
        if !z.spin_deg_per_sec.is_finite() {
            z.spin_deg_per_sec = dz.spin_deg_per_sec;
        }

        let pl = &mut self.player;
        let dpl = &defaults.player;
        positive_or(&mut pl.speed, dpl.speed, "player.speed");
        positive_or(&mut pl.slow_speed, dpl.slow_speed, "player.slow_speed");
        positive_or(&mut pl.size, dpl.size, "player.size");
        non_negative_or(&mut pl.hit_radius, dpl.hit_radius, "player.hit_radius");
        if pl.size > LOGICAL_HEIGHT.min(LOGICAL_WIDTH) {
            log::warn!("player.size larger than the canvas, using default");
            pl.size = dpl.size;
        }

        let sc = &mut self.scoring;
        if !(sc.points_per_sec.is_finite() && sc.points_per_sec >= 0.0) {
            log::warn!("scoring.points_per_sec invalid, using default");
            sc.points_per_sec = defaults.scoring.points_per_sec;
        }
        if !(sc.bonus_multiplier.is_finite() && sc.bonus_multiplier >= 0.0) {
            sc.bonus_multiplier = defaults.scoring.bonus_multiplier;
        }
        if !(sc.safe_multiplier.is_finite() && sc.safe_multiplier >= 0.0) {
            sc.safe_multiplier = defaults.scoring.safe_multiplier;
        }

        // A bullet must never be purged while the player could still touch it
        non_negative_or(&mut self.bounds_margin, defaults.bounds_margin, "bounds_margin");
        let min_margin = self.max_hit_radius() + self.player.hit_radius;
        if self.bounds_margin < min_margin {
            log::warn!(
                "bounds_margin {} below largest hit reach {}, raising",
                self.bounds_margin,
                min_margin
            );
            self.bounds_margin = min_margin;
        }
    }
}

fn positive_or(value: &mut f32, fallback: f32, name: &str) {
    if !(value.is_finite() && *value > 0.0) {
        log::warn!("{name} = {value} is invalid, using {fallback}");
        *value = fallback;
    }
}

fn non_negative_or(value: &mut f32, fallback: f32, name: &str) {
    if !(value.is_finite() && *value >= 0.0) {
        log::warn!("{name} = {value} is invalid, using {fallback}");
        *value = fallback;
    }
}

fn sanitize_curve(curve: &mut Curve, fallback: Curve, name: &str) {
    if !(curve.base.is_finite() && curve.growth.is_finite() && curve.cap.is_finite()) {
        log::warn!("{name} has non-finite terms, using default");
        *curve = fallback;
    }
    if curve.growth < 0.0 {
        log::warn!("{name}.growth is negative, clamping to 0");
        curve.growth = 0.0;
    }
}

fn sanitize_pattern(pattern: &mut PatternTuning, fallback: PatternTuning, name: &str) {
    positive_or(&mut pattern.every, fallback.every, name);
    if pattern.every < MIN_INTERVAL {
        log::warn!("{name}.every = {} is below {MIN_INTERVAL}, raising", pattern.every);
        pattern.every = MIN_INTERVAL;
    }
    non_negative_or(&mut pattern.speed, fallback.speed, name);
    if pattern.min_count == 0 && pattern.count == 0 {
        pattern.count = fallback.count;
        pattern.min_count = fallback.min_count;
    }
}

fn sanitize_radii(radii: &mut Radii, fallback: Radii, name: &str) {
    non_negative_or(&mut radii.radius, fallback.radius, name);
    non_negative_or(&mut radii.hit_radius, fallback.hit_radius, name);
}

fn sanitize_budget(budget: &mut Option<f32>, name: &str) {
    if let Some(b) = *budget {
        if !(b.is_finite() && b >= 0.0) {
            log::warn!("{name} = {b} is invalid, disabling the budget");
            *budget = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let mut tuning = Tuning::default();
        let before = tuning.clone();
        tuning.sanitize();
        assert_eq!(tuning, before);
        assert!(tuning.bounds_margin >= tuning.max_hit_radius());
        assert!(tuning.kanji.radii.hit_radius <= tuning.kanji.radii.radius);
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let tuning = Tuning::from_json(r#"{ "spawns": { "rain": { "every": 2.0 } } }"#);
        assert_eq!(tuning.spawns.rain.every, 2.0);
        assert_eq!(tuning.spawns.rain.speed, 90.0);
        assert_eq!(tuning.spawns.side, SpawnTuning::default().side);
        assert_eq!(tuning.difficulty, DifficultyTuning::default());
    }

    #[test]
    fn test_malformed_document_uses_defaults() {
        let tuning = Tuning::from_json("{ not json");
        assert_eq!(tuning, Tuning::default());
        assert!(Tuning::try_from_json("{ not json").is_err());
    }

    #[test]
    fn test_zero_interval_replaced() {
        let tuning = Tuning::from_json(r#"{ "spawns": { "side": { "every": 0.0 } } }"#);
        assert_eq!(tuning.spawns.side.every, SpawnTuning::default().side.every);
    }

    #[test]
    fn test_tiny_interval_raised() {
        let tuning = Tuning::from_json(r#"{ "spawns": { "rain": { "every": 1e-7 } } }"#);
        assert_eq!(tuning.spawns.rain.every, MIN_INTERVAL);
        // Sane intervals pass through untouched
        assert_eq!(tuning.spawns.side.every, SpawnTuning::default().side.every);
    }

    #[test]
    fn test_margin_raised_to_hit_reach() {
        let tuning = Tuning::from_json(r#"{ "bounds_margin": 5.0 }"#);
        assert!(tuning.bounds_margin >= tuning.max_hit_radius());
    }

    #[test]
    fn test_policy_round_trip_names() {
        let tuning = Tuning::from_json(r#"{ "zones": { "policy": "shield_player" } }"#);
        assert_eq!(tuning.zones.policy, SafeZonePolicy::ShieldPlayer);
        assert_eq!(tuning.zones.policy.as_str(), "shield_player");
    }

    #[test]
    fn test_json_export_reloads() {
        let mut tuning = Tuning::default();
        tuning.kanji.tracks_player = false;
        let reloaded = Tuning::from_json(&tuning.to_json());
        assert_eq!(reloaded, tuning);
    }
}
