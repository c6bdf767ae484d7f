//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame delta clamped before use
//! - Seeded RNG only (one `Pcg32` per game)
//! - Stable iteration order (projectiles in spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod player;
pub mod projectile;
pub mod rect;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod zones;

pub use collision::{check_collision, first_hit, purge_inside_safe_zones, purge_out_of_bounds};
pub use difficulty::{Difficulty, compute_difficulty, in_grace};
pub use player::{MoveInput, Player};
pub use projectile::{Pattern, Projectile, ProjectileKind, Steering};
pub use rect::Rect;
pub use snapshot::Snapshot;
pub use spawner::{Emission, Spawner};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
pub use zones::{BonusZone, SafeZones, ZoneState};
