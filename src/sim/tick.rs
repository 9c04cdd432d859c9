//! Per-frame simulation tick
//!
//! One call per animation frame. Order within a tick:
//! phase commands → clock → due timers → entity updates → spatial index →
//! collisions → wave clear check → purge of destroyed entities.

use glam::Vec2;

use super::combat::{CombatReport, resolve_collisions};
use super::spatial::SpatialGrid;
use super::state::{Bullet, GamePhase, GameState};
use super::timers::TimerEvent;
use super::wave::{advance_wave, begin_wave, check_wave_clear, spawn_tick};

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Movement vector, each component in [-1, 1]
    pub movement: Vec2,
    /// New aim direction, if the player aimed this frame
    pub aim: Option<Vec2>,
    /// Fire one bullet (edge-triggered)
    pub fire: bool,
    /// Pause / resume toggle
    pub pause: bool,
    /// Leave the title screen
    pub start: bool,
    /// Start a new run after game over
    pub restart: bool,
}

/// Advance the game by one frame taken at `timestamp` (seconds).
///
/// Returns the collision report when the world was simulated this frame.
pub fn tick(state: &mut GameState, input: &TickInput, timestamp: f64) -> Option<CombatReport> {
    apply_phase_commands(state, input);

    // Only PLAYING advances simulation time
    if state.phase != GamePhase::Playing {
        return None;
    }

    let delta = state.clock.advance(timestamp);
    state.time_ticks += 1;

    run_due_timers(state);

    // The world holds still between waves; only timers run
    if state.wave.cooldown_active {
        state.purge_destroyed();
        return None;
    }

    for bullet in state.bullets.iter_mut().filter(|b| !b.is_destroyed()) {
        bullet.advance(delta);
    }

    update_player(state, input, delta);
    update_enemies(state, delta);

    for number in state.damage_numbers.iter_mut().filter(|d| !d.is_destroyed()) {
        number.advance(delta);
    }

    let mut grid = SpatialGrid::default();
    grid.rebuild(&state.enemies);
    let report = resolve_collisions(state, &grid);

    if report.player_died {
        end_game(state);
    } else {
        check_wave_clear(state);
    }

    state.purge_destroyed();
    Some(report)
}

/// Handle start / pause / resume / restart requests for the current phase.
///
/// Requests that are not valid in the current phase are ignored.
pub fn apply_phase_commands(state: &mut GameState, input: &TickInput) {
    match state.phase {
        GamePhase::Title if input.start => start(state),
        GamePhase::Playing if input.pause => {
            state.phase = GamePhase::Paused;
            log::info!("Paused");
        }
        GamePhase::Paused if input.pause => {
            state.phase = GamePhase::Playing;
            state.clock.reset();
            log::info!("Resumed");
        }
        GamePhase::GameOver if input.restart => restart(state),
        _ => {}
    }
}

/// TITLE → PLAYING: begin spawning the first wave
pub fn start(state: &mut GameState) {
    if state.phase != GamePhase::Title {
        return;
    }
    state.phase = GamePhase::Playing;
    state.clock.reset();
    log::info!("Game started (seed {})", state.seed);
    begin_wave(state);
}

/// GAME_OVER → PLAYING with a fresh run
pub fn restart(state: &mut GameState) {
    if state.phase != GamePhase::GameOver {
        return;
    }
    state.reset_run();
    state.phase = GamePhase::Playing;
    log::info!("Game restarted");
    begin_wave(state);
}

/// PLAYING → GAME_OVER
pub fn end_game(state: &mut GameState) {
    if state.phase != GamePhase::Playing {
        return;
    }
    state.phase = GamePhase::GameOver;
    state.previous_score = Some(state.score);
    log::info!(
        "Game over: score {} on wave {}",
        state.score,
        state.wave.current_wave
    );
}

/// Fire every deferred effect whose time has come
fn run_due_timers(state: &mut GameState) {
    for (due_ms, event) in state.timers.drain_due(state.now_ms()) {
        match event {
            TimerEvent::PlayerInvincibilityEnds => state.player.invincible = false,
            TimerEvent::EnemyInvincibilityEnds(id) => {
                // The enemy may already be gone
                if let Some(enemy) = state.enemy_mut(id) {
                    enemy.invincible = false;
                }
            }
            TimerEvent::SpawnEnemy => spawn_tick(state, due_ms),
            TimerEvent::WaveCooldownEnds => advance_wave(state),
        }
    }
}

fn update_player(state: &mut GameState, input: &TickInput, delta: f32) {
    let arena = state.arena;
    state.player.move_by(input.movement, delta, arena);

    if let Some(aim) = input.aim {
        state.player.set_aim(aim);
    }

    if input.fire {
        let id = state.next_entity_id();
        let bullet = Bullet::from_player(id, &state.player);
        state.bullets.push(bullet);
    }
}

fn update_enemies(state: &mut GameState, delta: f32) {
    let target = state.player.pos;
    let now = state.now_ms();
    let mut shooters = Vec::new();

    for (index, enemy) in state.enemies.iter_mut().enumerate() {
        if enemy.is_destroyed() {
            continue;
        }
        enemy.pursue(target, delta);
        if enemy.ready_to_shoot(now) {
            enemy.last_shot_ms = Some(now);
            shooters.push(index);
        }
    }

    let wave = state.wave.current_wave;
    for index in shooters {
        let id = state.next_entity_id();
        let bullet = Bullet::from_enemy(id, &state.enemies[index], target, wave);
        state.bullets.push(bullet);
    }
}
