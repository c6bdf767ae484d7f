//! Kanji Danmaku entry point
//!
//! Native builds run a headless soak: `kanji-danmaku [seed] [seconds]`.
//! The browser build enters through `kanji_danmaku::web`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use kanji_danmaku::consts::SIM_DT;
    use kanji_danmaku::sim::{GameEvent, GamePhase, GameState, Snapshot, TickInput, tick};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(12345);
    let seconds = args
        .next()
        .and_then(|s| s.parse::<f32>().ok())
        .filter(|s| s.is_finite() && *s > 0.0)
        .unwrap_or(60.0);

    log::info!("Kanji Danmaku (headless) seed {} for {:.0}s", seed, seconds);

    let mut state = GameState::with_default_tuning(seed);
    let start = TickInput {
        start: true,
        ..Default::default()
    };
    tick(&mut state, &start, SIM_DT);

    let mut fired = [0usize; kanji_danmaku::sim::Pattern::COUNT];
    let mut peak_live = 0;
    while state.phase == GamePhase::Playing && state.elapsed < seconds {
        let input = TickInput {
            movement: dodge::steer(&state),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);

        for event in &state.events {
            if let GameEvent::PatternFired(emission) = event {
                fired[emission.pattern.index()] += emission.count;
            }
        }
        peak_live = peak_live.max(state.projectiles().len());
    }

    for pattern in kanji_danmaku::sim::Pattern::ALL {
        log::info!("{:>7}: {} bullets", pattern.as_str(), fired[pattern.index()]);
    }

    let snap = Snapshot::capture(&state);
    println!(
        "seed {} | {:?} at {:.2}s ({} ticks) | score {} | {} live (peak {}) | zone {:?}",
        seed,
        snap.phase,
        snap.elapsed,
        snap.ticks,
        snap.score,
        snap.projectiles.len(),
        peak_live,
        snap.zone
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is kanji_danmaku::web::start, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod dodge {
    use glam::Vec2;
    use kanji_danmaku::sim::{GameState, MoveInput, Player};

    /// Threat radius around the player's hit circle
    const WATCH: f32 = 90.0;

    /// Naive autopilot: flee nearby bullets, otherwise drift home
    pub fn steer(state: &GameState) -> MoveInput {
        let pos = state.player.pos;
        let mut push = Vec2::ZERO;
        for p in state.projectiles() {
            let away = pos - p.pos;
            let gap = away.length() - p.hit_radius - state.player.hit_radius;
            if gap < WATCH {
                push += away.normalize_or_zero() * (1.0 - gap.max(0.0) / WATCH);
            }
        }

        let axis = if push.length_squared() > 1e-4 {
            push.normalize_or_zero()
        } else {
            let home = Player::spawn_point() - pos;
            if home.length() > 4.0 {
                home.normalize_or_zero() * 0.5
            } else {
                Vec2::ZERO
            }
        };

        MoveInput {
            axis,
            slow: push.length() > 2.0,
            pointer: None,
        }
    }
}
