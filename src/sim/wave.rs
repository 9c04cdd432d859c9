//! Wave director
//!
//! Spawn scheduling, enemy-type weighting, per-wave stat scaling and the
//! wave-clear / cooldown state machine.

use glam::Vec2;
use rand::Rng;

use super::state::{Enemy, EnemyKind, EnemyStats, GameState, WaveState};
use super::timers::TimerEvent;
use crate::consts::*;

/// Planned enemy count for a wave: `floor(5 * 1.2^(wave-1))`
pub fn wave_size(wave: u32) -> u32 {
    let exponent = wave.max(1) as i32 - 1;
    (BASE_WAVE_SIZE * WAVE_SIZE_GROWTH.powi(exponent)).floor() as u32
}

/// Probability of each selectable enemy kind; always sums to 1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindWeights {
    pub basic: f64,
    pub tank: f64,
    pub shooter: f64,
}

/// Piecewise kind table keyed by wave number
pub fn kind_weights(wave: u32) -> KindWeights {
    match wave {
        0..=2 => KindWeights {
            basic: 1.0,
            tank: 0.0,
            shooter: 0.0,
        },
        3..=7 => {
            let tank = (wave - 2) as f64 * 0.2;
            KindWeights {
                basic: 1.0 - tank,
                tank,
                shooter: 0.0,
            }
        }
        8..=89 => {
            let tank = 0.10;
            let shooter = ((wave - 7) as f64 * 0.01).min(0.05);
            KindWeights {
                basic: 1.0 - (tank + shooter),
                tank,
                shooter,
            }
        }
        _ => KindWeights {
            basic: 0.85,
            tank: 0.10,
            shooter: 0.05,
        },
    }
}

/// Map a uniform roll in [0, 1) to an enemy kind for `wave`
pub fn pick_enemy_kind(wave: u32, roll: f64) -> EnemyKind {
    let weights = kind_weights(wave);
    if roll < weights.basic {
        EnemyKind::Basic
    } else if roll < weights.basic + weights.tank {
        EnemyKind::Tank
    } else {
        EnemyKind::Shooter
    }
}

/// Base stats of `kind` scaled for `wave`
pub fn scaled_stats(kind: EnemyKind, wave: u32) -> EnemyStats {
    let base = kind.base_stats();
    let steps = (wave.max(1) - 1) as f32;
    let wave_scaling = 1.0 + steps * 0.1;

    EnemyStats {
        health: base.health * wave_scaling,
        attack: base.attack * wave_scaling,
        defense: base.defense * (1.0 + steps * 0.025),
        score: base.score * wave_scaling,
        collision_damage: base.collision_damage * (1.0 + steps * 0.05),
        speed: base.speed + steps * 0.05,
        ..base
    }
}

/// Random point just outside one of the four arena edges, uniform along it
pub fn spawn_position<R: Rng>(rng: &mut R, arena: Vec2, size: f32) -> Vec2 {
    let along = rng.random::<f32>();
    match rng.random_range(0..4u32) {
        0 => Vec2::new(along * arena.x, -size),
        1 => Vec2::new(arena.x + size, along * arena.y),
        2 => Vec2::new(along * arena.x, arena.y + size),
        _ => Vec2::new(-size, along * arena.y),
    }
}

/// Start spawning the current wave: one enemy per spawn interval
pub fn begin_wave(state: &mut GameState) {
    log::info!(
        "Wave {} starting with {} enemies",
        state.wave.current_wave,
        state.wave.to_spawn_total
    );
    if state.wave.remaining_to_spawn > 0 {
        let due = state.now_ms() + SPAWN_INTERVAL_MS;
        state.timers.schedule(due, TimerEvent::SpawnEnemy);
    }
}

/// Spawn-interval tick due at `due_ms`: create one enemy and schedule the
/// next one interval after this one while any remain
pub fn spawn_tick(state: &mut GameState, due_ms: f64) {
    if state.wave.remaining_to_spawn == 0 || state.wave.cooldown_active {
        return;
    }

    let wave = state.wave.current_wave;
    let roll = state.rng.random::<f64>();
    let kind = pick_enemy_kind(wave, roll);
    let stats = scaled_stats(kind, wave);
    let pos = spawn_position(&mut state.rng, state.arena, stats.size);
    let id = state.next_entity_id();

    log::debug!("Spawned {} #{} at ({:.0}, {:.0})", kind.as_str(), id, pos.x, pos.y);
    state.enemies.push(Enemy::new(id, kind, stats, pos));
    state.wave.remaining_to_spawn -= 1;

    if state.wave.remaining_to_spawn > 0 {
        state
            .timers
            .schedule(due_ms + SPAWN_INTERVAL_MS, TimerEvent::SpawnEnemy);
    }
}

/// Count one enemy of the wave as destroyed
pub fn record_kill(state: &mut GameState) {
    state.wave.alive_in_wave = state.wave.alive_in_wave.saturating_sub(1);
}

/// Enter the between-wave cooldown once every enemy of the wave is gone.
///
/// Returns true only on the call that starts the cooldown; later calls for
/// the same wave are no-ops.
pub fn check_wave_clear(state: &mut GameState) -> bool {
    if state.wave.alive_in_wave > 0 || state.wave.cooldown_active {
        return false;
    }

    state.wave.cooldown_active = true;
    let due = state.now_ms() + WAVE_COOLDOWN_MS;
    state.timers.schedule(due, TimerEvent::WaveCooldownEnds);
    log::info!("Wave {} cleared", state.wave.current_wave);
    true
}

/// Cooldown finished: move to the next wave and resume spawning
pub fn advance_wave(state: &mut GameState) {
    if !state.wave.cooldown_active {
        return;
    }
    state.wave = WaveState::for_wave(state.wave.current_wave + 1);
    begin_wave(state);
}
