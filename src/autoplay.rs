//! Headless autoplay session
//!
//! Drives the simulation with a scripted pilot at a fixed 60 Hz and reports
//! how far it got. Used by the native binary as a smoke run.

use glam::Vec2;
use serde::Serialize;

use crate::platform::InputAdapter;
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState, tick};

/// Arena used for headless runs
pub const HEADLESS_ARENA: Vec2 = Vec2::new(1280.0, 720.0);
/// Pilot fires once every this many ticks
const FIRE_EVERY_TICKS: u64 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    GameOver,
    TimeLimit,
}

/// Result of a headless run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub score: u64,
    pub wave: u32,
    pub ticks: u64,
    pub enemies_alive: usize,
    pub outcome: Outcome,
}

/// Play until the player dies or `max_ticks` frames have elapsed
pub fn run(settings: &Settings, seed: u64, max_ticks: u64) -> RunSummary {
    let mut state = GameState::new(seed, HEADLESS_ARENA);
    state.clock.set_max_factor(settings.max_delta_factor);
    let mut input = InputAdapter::new(settings.gamepad_dead_zone);
    input.request_start();

    let frame = 1.0 / crate::consts::TARGET_FRAME_RATE;
    let mut frames = 0u64;
    while frames < max_ticks && state.phase != GamePhase::GameOver {
        if frames % FIRE_EVERY_TICKS == 0 {
            if let Some(target) = nearest_enemy(&state) {
                input.pointer_down(target);
            }
        }
        let frame_input = input.sample(state.player.center());
        tick(&mut state, &frame_input, frames as f64 * frame);
        frames += 1;
    }

    let outcome = if state.phase == GamePhase::GameOver {
        Outcome::GameOver
    } else {
        Outcome::TimeLimit
    };
    log::info!(
        "Autoplay finished after {} ticks: score {}, wave {}",
        state.time_ticks,
        state.score,
        state.wave.current_wave
    );

    RunSummary {
        seed,
        score: state.score,
        wave: state.wave.current_wave,
        ticks: state.time_ticks,
        enemies_alive: state.enemies.len(),
        outcome,
    }
}

/// Center of the live enemy closest to the player
fn nearest_enemy(state: &GameState) -> Option<Vec2> {
    let from = state.player.center();
    state
        .enemies
        .iter()
        .filter(|e| !e.is_destroyed())
        .map(|e| e.center())
        .min_by(|a, b| from.distance_squared(*a).total_cmp(&from.distance_squared(*b)))
}
