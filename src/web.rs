//! Browser bindings
//!
//! The page owns the canvas, audio and storage; it drives `DanmakuGame` once
//! per animation frame and draws from the JSON snapshot.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::sim::{GameState, MoveInput, Snapshot, TickInput, tick};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // A second init (hot reload) fails harmlessly
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("Kanji Danmaku core loaded");
}

#[wasm_bindgen]
pub struct DanmakuGame {
    state: GameState,
}

#[wasm_bindgen]
impl DanmakuGame {
    /// New game on the title screen. `tuning_json` falls back to defaults
    /// when missing or malformed.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32, tuning_json: Option<String>) -> DanmakuGame {
        let tuning = tuning_json
            .as_deref()
            .map(Tuning::from_json)
            .unwrap_or_default();
        log::info!("Game initialized with seed: {}", seed);
        DanmakuGame {
            state: GameState::new(seed as u64, tuning),
        }
    }

    /// Advance one frame. `dt` is the raw frame delta in seconds.
    #[allow(clippy::too_many_arguments)]
    pub fn tick(
        &mut self,
        dt: f32,
        axis_x: f32,
        axis_y: f32,
        slow: bool,
        pointer_down: bool,
        pointer_x: f32,
        pointer_y: f32,
        start: bool,
        pause: bool,
        restart: bool,
    ) {
        let input = TickInput {
            movement: MoveInput {
                axis: Vec2::new(axis_x, axis_y),
                slow,
                pointer: pointer_down.then(|| Vec2::new(pointer_x, pointer_y)),
            },
            start,
            pause,
            restart,
        };
        tick(&mut self.state, &input, dt);
    }

    /// JSON render view of the current frame
    pub fn snapshot(&self) -> String {
        Snapshot::capture(&self.state).to_json()
    }

    pub fn player_hit(&self) -> bool {
        self.state.player_hit()
    }

    pub fn score(&self) -> u32 {
        self.state.score_points().min(u32::MAX as u64) as u32
    }

    /// Seed the session best from the page's storage
    pub fn set_best(&mut self, best: u32) {
        self.state.best = best as u64;
    }

    pub fn best(&self) -> u32 {
        self.state.best.min(u32::MAX as u64) as u32
    }

    /// Hot-swap the balance sheet
    pub fn set_tuning(&mut self, json: &str) {
        self.state.apply_tuning(Tuning::from_json(json));
    }

    pub fn tuning_json(&self) -> String {
        self.state.tuning.to_json()
    }
}
