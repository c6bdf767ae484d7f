//! Game state and core simulation types
//!
//! The game-loop controller owns exactly one `GameState`; nothing in the core
//! lives at module level.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::player::Player;
use super::projectile::{Projectile, ProjectileKind};
use super::spawner::{Emission, Spawner};
use super::zones::{BonusZone, SafeZones, ZoneState};
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Waiting for the first tap
    Title,
    /// Active gameplay
    Playing,
    /// Frozen mid-round
    Paused,
    /// Player was hit; waiting for restart
    GameOver,
}

/// Things that happened during a tick, for audio/UI collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    RoundStarted,
    PatternFired(Emission),
    ZoneChanged { from: ZoneState, to: ZoneState },
    PlayerHit { x: f32, y: f32, by: ProjectileKind },
    GameOver { score: u64 },
    NewBest { score: u64 },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Balance sheet for the current round
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Round clock (seconds)
    pub elapsed: f32,
    /// Simulated ticks this round
    pub time_ticks: u64,
    /// Fractional score accumulator
    pub score: f64,
    /// Best score this session
    pub best: u64,
    pub player: Player,
    /// Live projectiles, owned exclusively by the game loop
    pub projectiles: Vec<Projectile>,
    pub spawner: Spawner,
    pub safe_zones: SafeZones,
    pub bonus: BonusZone,
    /// Zone the player stood in at the end of the last tick
    pub zone: ZoneState,
    /// True only on the tick the player was hit
    pub player_hit: bool,
    /// Events from the last tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state on the title screen
    pub fn new(seed: u64, mut tuning: Tuning) -> Self {
        tuning.sanitize();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Title,
            elapsed: 0.0,
            time_ticks: 0,
            score: 0.0,
            best: 0,
            player: Player::new(&tuning.player),
            projectiles: Vec::new(),
            spawner: Spawner::new(&tuning),
            safe_zones: SafeZones::new(&tuning.zones),
            bonus: BonusZone::new(&tuning.zones),
            zone: ZoneState::Open,
            player_hit: false,
            events: Vec::new(),
            tuning,
        }
    }

    pub fn with_default_tuning(seed: u64) -> Self {
        Self::new(seed, Tuning::default())
    }

    /// Begin a fresh round: clear bullets, zero timers, reset clock and score
    pub fn start_round(&mut self) {
        self.projectiles.clear();
        self.spawner.set_tuning(&self.tuning);
        self.spawner.reset();
        self.spawner.resume();
        self.elapsed = 0.0;
        self.time_ticks = 0;
        self.score = 0.0;
        self.player = Player::new(&self.tuning.player);
        self.safe_zones = SafeZones::new(&self.tuning.zones);
        self.bonus = BonusZone::new(&self.tuning.zones);
        self.zone = ZoneState::Open;
        self.player_hit = false;
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::RoundStarted);
        log::info!(
            "Round started (seed {}, zone policy {})",
            self.seed,
            self.tuning.zones.policy.as_str()
        );
    }

    /// Swap tuning. The spawner picks it up immediately; zones and the
    /// player body follow on the next round.
    pub fn apply_tuning(&mut self, mut tuning: Tuning) {
        tuning.sanitize();
        self.spawner.set_tuning(&tuning);
        self.tuning = tuning;
    }

    /// End the round after a hit by a `by` projectile at `hit_at`
    pub fn game_over(&mut self, hit_at: Vec2, by: ProjectileKind) {
        self.player_hit = true;
        self.phase = GamePhase::GameOver;
        self.spawner.pause();

        let score = self.score_points();
        self.events.push(GameEvent::PlayerHit {
            x: hit_at.x,
            y: hit_at.y,
            by,
        });
        self.events.push(GameEvent::GameOver { score });
        log::info!(
            "Game over at {:.1}s: hit by {}, score {} ({} bullets live)",
            self.elapsed,
            by.as_str(),
            score,
            self.projectiles.len()
        );

        if score > self.best {
            self.best = score;
            self.events.push(GameEvent::NewBest { score });
            log::info!("New best: {}", score);
        }
    }

    /// Whole points scored this round
    pub fn score_points(&self) -> u64 {
        if self.score.is_finite() && self.score > 0.0 {
            self.score.floor() as u64
        } else {
            0
        }
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Whether the player was hit during the last tick
    pub fn player_hit(&self) -> bool {
        self.player_hit
    }
}
