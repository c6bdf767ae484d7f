//! Per-frame simulation tick
//!
//! Order within a playing tick:
//! spawn -> move -> hit test (full set) -> bounds purge -> safe-zone purge -> score

use super::collision::{first_hit, purge_inside_safe_zones, purge_out_of_bounds};
use super::player::MoveInput;
use super::rect::Rect;
use super::state::{GameEvent, GamePhase, GameState};
use super::zones::ZoneState;
use crate::consts::MAX_FRAME_DT;
use crate::tuning::SafeZonePolicy;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub movement: MoveInput,
    /// Start a round from the title or game-over screen (tap/click)
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
    /// Abandon the current round and start a new one
    pub restart: bool,
}

/// Clamp a raw frame delta into a safe simulation step
#[inline]
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 {
        dt.min(MAX_FRAME_DT)
    } else {
        0.0
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();
    state.player_hit = false;
    let dt = clamp_dt(dt);

    if input.restart && state.phase != GamePhase::Title {
        state.start_round();
        return;
    }

    match state.phase {
        GamePhase::Title | GamePhase::GameOver => {
            if input.start {
                state.start_round();
            }
            return;
        }
        GamePhase::Paused => {
            if input.pause {
                state.phase = GamePhase::Playing;
                log::info!("Resumed at {:.1}s", state.elapsed);
            }
            return;
        }
        GamePhase::Playing => {
            if input.pause {
                state.phase = GamePhase::Paused;
                log::info!("Paused at {:.1}s", state.elapsed);
                return;
            }
        }
    }

    if dt <= 0.0 {
        return;
    }

    state.time_ticks += 1;
    state.player.update(dt, &input.movement);
    state.bonus.update(dt);
    state.elapsed += dt;

    // Spawn
    let target = state.player.pos;
    let elapsed = state.elapsed;
    let mut live = std::mem::take(&mut state.projectiles);
    let emissions = state
        .spawner
        .update(dt, elapsed, &mut live, target, &mut state.rng);
    state
        .events
        .extend(emissions.into_iter().map(GameEvent::PatternFired));

    // Move
    for projectile in live.iter_mut() {
        projectile.update(dt, target);
    }

    // Where is the player standing
    let player = &state.player;
    let in_safe = state.safe_zones.overlaps_circle(player.pos, player.hit_radius);
    let zone = if in_safe {
        ZoneState::Safe
    } else if state.bonus.contains(player.pos) {
        ZoneState::Bonus
    } else {
        ZoneState::Open
    };
    if zone != state.zone {
        log::debug!("Zone {:?} -> {:?}", state.zone, zone);
        state.events.push(GameEvent::ZoneChanged {
            from: state.zone,
            to: zone,
        });
        state.zone = zone;
    }

    // Hit test before anything is purged
    let policy = state.tuning.zones.policy;
    let shielded = policy == SafeZonePolicy::ShieldPlayer && in_safe;
    let hit = if shielded {
        None
    } else {
        first_hit(&live, &state.player).map(|i| (live[i].pos, live[i].kind))
    };

    purge_out_of_bounds(&mut live, &Rect::playfield(), state.tuning.bounds_margin);
    if policy == SafeZonePolicy::PurgeProjectiles {
        purge_inside_safe_zones(&mut live, &state.safe_zones.rects);
    }
    state.projectiles = live;

    if let Some((hit_at, by)) = hit {
        state.game_over(hit_at, by);
        return;
    }

    let scoring = &state.tuning.scoring;
    let multiplier = match zone {
        ZoneState::Open => 1.0,
        ZoneState::Safe => scoring.safe_multiplier,
        ZoneState::Bonus => scoring.bonus_multiplier,
    };
    state.score += scoring.points_per_sec * dt as f64 * multiplier;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::projectile::{Pattern, Projectile, ProjectileKind};
    use crate::tuning::{Radii, Tuning};
    use glam::Vec2;

    fn playing(seed: u64, tuning: Tuning) -> GameState {
        let mut state = GameState::new(seed, tuning);
        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &start, 0.016);
        assert_eq!(state.phase, GamePhase::Playing);
        state
    }

    fn still_bullet(pos: Vec2) -> Projectile {
        Projectile::straight(
            ProjectileKind::Normal,
            Pattern::Rain,
            pos,
            Vec2::ZERO,
            Radii {
                radius: 9.0,
                hit_radius: 3.0,
            },
        )
    }

    #[test]
    fn test_title_to_playing() {
        let mut state = GameState::with_default_tuning(12345);
        tick(&mut state, &TickInput::default(), 0.016);
        assert_eq!(state.phase, GamePhase::Title);
        assert_eq!(state.elapsed, 0.0);

        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &start, 0.016);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.events.contains(&GameEvent::RoundStarted));
    }

    #[test]
    fn test_dt_is_clamped() {
        let mut state = playing(1, Tuning::default());
        tick(&mut state, &TickInput::default(), 3.0);
        assert!((state.elapsed - MAX_FRAME_DT).abs() < 1e-6);
        assert_eq!(clamp_dt(f32::NAN), 0.0);
        assert_eq!(clamp_dt(-1.0), 0.0);
    }

    #[test]
    fn test_ticks_counted_in_snapshot() {
        let mut state = playing(1, Tuning::default());
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), 0.016);
        }
        assert_eq!(crate::sim::Snapshot::capture(&state).ticks, 10);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = playing(1, Tuning::default());
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, 0.016);
        assert_eq!(state.phase, GamePhase::Paused);

        let frozen = state.elapsed;
        tick(&mut state, &TickInput::default(), 0.016);
        assert_eq!(state.elapsed, frozen);

        tick(&mut state, &pause, 0.016);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_hit_ends_round() {
        let mut state = playing(1, Tuning::default());
        let at = state.player.pos;
        state.projectiles.push(still_bullet(at));

        tick(&mut state, &TickInput::default(), 0.016);
        assert!(state.player_hit);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.spawner.is_paused());
        assert!(state.events.iter().any(|e| matches!(
            e,
            GameEvent::PlayerHit {
                by: ProjectileKind::Normal,
                ..
            }
        )));

        // The hit signal lasts one tick
        tick(&mut state, &TickInput::default(), 0.016);
        assert!(!state.player_hit);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_restart_clears_round() {
        let mut state = playing(1, Tuning::default());
        for _ in 0..200 {
            tick(&mut state, &TickInput::default(), 0.05);
            if state.phase != GamePhase::Playing {
                break;
            }
        }
        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart, 0.016);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.elapsed, 0.0);
        assert_eq!(state.spawner.timer(Pattern::Rain), 0.0);
    }

    #[test]
    fn test_shield_policy_protects_player_in_safe_zone() {
        let mut tuning = Tuning::default();
        tuning.zones.policy = SafeZonePolicy::ShieldPlayer;
        let mut state = playing(1, tuning);
        let safe = state.safe_zones.rects[0].center();
        state.player.pos = safe;
        state.projectiles.push(still_bullet(safe));

        tick(&mut state, &TickInput::default(), 0.016);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.zone, ZoneState::Safe);
        // Bullets are allowed inside safe rectangles under this policy
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_purge_policy_clears_safe_zone() {
        let mut state = playing(1, Tuning::default());
        let safe = state.safe_zones.rects[1].center();
        state.projectiles.push(still_bullet(safe));
        state.projectiles.push(still_bullet(Vec2::new(100.0, 100.0)));

        tick(&mut state, &TickInput::default(), 0.016);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_score_multipliers() {
        let tuning = Tuning::default();
        let per_tick = tuning.scoring.points_per_sec * 0.05f32 as f64;

        let mut open = playing(1, tuning.clone());
        tick(&mut open, &TickInput::default(), 0.05);
        assert_eq!(open.zone, ZoneState::Open);
        assert!((open.score - per_tick).abs() < 1e-6);

        let mut bonus = playing(1, tuning.clone());
        bonus.player.pos = bonus.bonus.center();
        tick(&mut bonus, &TickInput::default(), 0.05);
        assert_eq!(bonus.zone, ZoneState::Bonus);
        assert!((bonus.score - per_tick * tuning.scoring.bonus_multiplier).abs() < 1e-6);
        assert!(bonus.events.iter().any(|e| matches!(
            e,
            GameEvent::ZoneChanged {
                to: ZoneState::Bonus,
                ..
            }
        )));

        let mut safe = playing(1, tuning.clone());
        safe.player.pos = safe.safe_zones.rects[2].center();
        tick(&mut safe, &TickInput::default(), 0.05);
        assert_eq!(safe.zone, ZoneState::Safe);
        assert!((safe.score - per_tick * tuning.scoring.safe_multiplier).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_bounds_purged_in_tick() {
        let mut state = playing(1, Tuning::default());
        state.projectiles.push(still_bullet(Vec2::new(500.0, 1000.0)));
        tick(&mut state, &TickInput::default(), 0.016);
        assert!(state.projectiles.iter().all(|p| p.pos.y < 1000.0));
    }

    #[test]
    fn test_determinism() {
        let run = || {
            let mut state = playing(99999, Tuning::default());
            let input = TickInput {
                movement: MoveInput {
                    axis: Vec2::new(0.3, -0.2),
                    ..Default::default()
                },
                ..Default::default()
            };
            for _ in 0..400 {
                tick(&mut state, &input, 0.05);
            }
            state
        };
        let a = run();
        let b = run();
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.elapsed, b.elapsed);
        assert_eq!(a.projectiles.len(), b.projectiles.len());
        for (pa, pb) in a.projectiles.iter().zip(&b.projectiles) {
            assert_eq!(pa.pos, pb.pos);
        }
    }

    #[test]
    fn test_bullets_appear_after_grace() {
        let mut state = playing(7, Tuning::default());
        let grace = state.tuning.difficulty.grace_secs;
        while state.elapsed + 0.05 < grace {
            tick(&mut state, &TickInput::default(), 0.05);
        }
        assert!(state.projectiles.is_empty());

        for _ in 0..4 {
            tick(&mut state, &TickInput::default(), 0.05);
        }
        assert!(!state.projectiles.is_empty() || state.phase == GamePhase::GameOver);
    }
}
