//! Render view of one frame
//!
//! Hosts draw from this and never touch `GameState` directly.

use serde::{Deserialize, Serialize};

use super::projectile::ProjectileKind;
use super::rect::Rect;
use super::state::{GameEvent, GamePhase, GameState};
use super::zones::ZoneState;
use crate::tuning::Glyph;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub kind: ProjectileKind,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub hit_radius: f32,
    pub rotation: f32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub glyph: Option<Glyph>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub hit_radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusView {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub spin: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub elapsed: f32,
    /// Simulated ticks this round
    pub ticks: u64,
    pub score: u64,
    pub best: u64,
    pub zone: ZoneState,
    pub player_hit: bool,
    pub player: PlayerView,
    pub projectiles: Vec<ProjectileView>,
    pub safe_zones: Vec<Rect>,
    pub bonus: BonusView,
    pub events: Vec<GameEvent>,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let glyphs = &state.tuning.kanji.glyphs;
        let projectiles = state
            .projectiles()
            .iter()
            .filter(|p| p.alive)
            .map(|p| ProjectileView {
                kind: p.kind,
                x: p.pos.x,
                y: p.pos.y,
                radius: p.radius,
                hit_radius: p.hit_radius,
                rotation: p.rotation(),
                glyph: p.glyph.and_then(|i| glyphs.get(i).cloned()),
            })
            .collect();

        let bonus_center = state.bonus.center();
        Self {
            phase: state.phase,
            elapsed: state.elapsed,
            ticks: state.time_ticks,
            score: state.score_points(),
            best: state.best,
            zone: state.zone,
            player_hit: state.player_hit(),
            player: PlayerView {
                x: state.player.pos.x,
                y: state.player.pos.y,
                size: state.player.size,
                hit_radius: state.player.hit_radius,
            },
            projectiles,
            safe_zones: state.safe_zones.rects.clone(),
            bonus: BonusView {
                x: bonus_center.x,
                y: bonus_center.y,
                radius: state.bonus.radius,
                spin: state.bonus.spin,
            },
            events: state.events.clone(),
        }
    }

    /// Serialize to JSON for the browser host
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
