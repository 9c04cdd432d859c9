//! Collision detection and damage resolution
//!
//! All entities are squares positioned by their top-left corner. Broad phase
//! for player bullets goes through the [`SpatialGrid`]; enemy bullets and
//! enemy bodies only ever test against the single player, so they are checked
//! directly.

use glam::Vec2;

use super::spatial::SpatialGrid;
use super::state::{DamageNumber, GameState};
use super::timers::TimerEvent;
use super::wave::{check_wave_clear, record_kill};

/// Axis-aligned overlap of two squares given by top-left corner and size
#[inline]
pub fn overlaps(a_pos: Vec2, a_size: f32, b_pos: Vec2, b_size: f32) -> bool {
    a_pos.x < b_pos.x + b_size
        && a_pos.x + a_size > b_pos.x
        && a_pos.y < b_pos.y + b_size
        && a_pos.y + a_size > b_pos.y
}

/// Damage dealt to an enemy by a player bullet
pub fn bullet_damage_to_enemy(player_attack: f32, bullet_damage: f32, enemy_defense: f32) -> f32 {
    (player_attack + bullet_damage - enemy_defense).max(1.0).round()
}

/// Damage dealt to the player by an enemy body.
///
/// Rounded like the bullet path. Enemy bullets bypass this and deal their
/// flat damage, ignoring player defense.
pub fn contact_damage_to_player(collision_damage: f32, player_defense: f32) -> f32 {
    (collision_damage - player_defense).max(1.0).round()
}

/// What happened during one resolution pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CombatReport {
    pub enemy_hits: u32,
    pub kills: u32,
    pub player_hits: u32,
    pub player_died: bool,
    /// This pass started the wave cooldown
    pub wave_cleared: bool,
}

/// Apply damage to the player and open its invincibility window.
///
/// Returns false (and changes nothing) if the player is already invincible.
pub fn damage_player(state: &mut GameState, amount: f32) -> bool {
    if state.player.invincible {
        return false;
    }
    state.player.health -= amount;
    state.player.invincible = true;
    let due = state.now_ms() + state.player.invincibility_ms;
    state
        .timers
        .schedule(due, TimerEvent::PlayerInvincibilityEnds);
    log::debug!(
        "Player took {} damage ({} left)",
        amount,
        state.player.health
    );
    true
}

/// Evaluate every collision for this tick.
///
/// Order: player bullets vs enemies, enemy bullets vs player, enemy bodies vs
/// player. Destroyed entities are skipped but not removed; the purge runs
/// after this pass.
pub fn resolve_collisions(state: &mut GameState, grid: &SpatialGrid) -> CombatReport {
    let mut report = CombatReport::default();

    resolve_player_bullets(state, grid, &mut report);
    resolve_enemy_bullets(state, &mut report);
    resolve_contacts(state, &mut report);

    report.player_died = state.player.is_dead();
    report
}

fn resolve_player_bullets(state: &mut GameState, grid: &SpatialGrid, report: &mut CombatReport) {
    for bi in 0..state.bullets.len() {
        let bullet = &state.bullets[bi];
        if bullet.is_destroyed() || !bullet.fired_by_player {
            continue;
        }
        let (b_pos, b_size, b_damage) = (bullet.pos, bullet.size, bullet.damage);

        for ei in grid.query(bullet.center()) {
            let enemy = &state.enemies[ei];
            if enemy.is_destroyed() || !overlaps(b_pos, b_size, enemy.pos, enemy.size()) {
                continue;
            }

            // Shots into an invincible enemy are absorbed
            if enemy.invincible {
                state.bullets[bi].destroy();
                break;
            }

            let damage = bullet_damage_to_enemy(state.player.attack, b_damage, enemy.stats.defense);
            let now = state.now_ms();
            let enemy = &mut state.enemies[ei];
            enemy.health -= damage;
            enemy.invincible = true;
            let (id, pos, window) = (enemy.id, enemy.pos, enemy.stats.invincibility_ms);
            let dead = enemy.health <= 0.0;
            let score = enemy.stats.score;

            state
                .timers
                .schedule(now + window, TimerEvent::EnemyInvincibilityEnds(id));
            state.damage_numbers.push(DamageNumber::new(pos, damage as i32));
            state.bullets[bi].destroy();
            report.enemy_hits += 1;

            if dead {
                state.enemies[ei].destroy();
                record_kill(state);
                state.score = (state.score as f64 + score as f64).round() as u64;
                report.kills += 1;
                if check_wave_clear(state) {
                    report.wave_cleared = true;
                }
            }
            break;
        }
    }
}

fn resolve_enemy_bullets(state: &mut GameState, report: &mut CombatReport) {
    let (p_pos, p_size) = (state.player.pos, state.player.size);

    for bi in 0..state.bullets.len() {
        let bullet = &state.bullets[bi];
        if bullet.is_destroyed() || bullet.fired_by_player {
            continue;
        }
        if !overlaps(bullet.pos, bullet.size, p_pos, p_size) {
            continue;
        }

        let damage = bullet.damage;
        state.bullets[bi].destroy();
        if damage_player(state, damage) {
            report.player_hits += 1;
        }
    }
}

fn resolve_contacts(state: &mut GameState, report: &mut CombatReport) {
    for ei in 0..state.enemies.len() {
        let enemy = &state.enemies[ei];
        if enemy.is_destroyed() || state.player.invincible {
            continue;
        }
        if !overlaps(enemy.pos, enemy.size(), state.player.pos, state.player.size) {
            continue;
        }

        let damage = contact_damage_to_player(enemy.stats.collision_damage, state.player.defense);
        if damage_player(state, damage) {
            report.player_hits += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Bullet, Enemy, EnemyKind};
    use crate::sim::wave::scaled_stats;

    fn arena_state() -> GameState {
        let mut state = GameState::new(42, Vec2::new(1000.0, 1000.0));
        state.player.pos = Vec2::new(500.0, 500.0);
        state
    }

    fn spawn(state: &mut GameState, kind: EnemyKind, pos: Vec2) -> usize {
        let id = state.next_entity_id();
        let stats = scaled_stats(kind, state.wave.current_wave);
        state.enemies.push(Enemy::new(id, kind, stats, pos));
        state.enemies.len() - 1
    }

    fn player_bullet_at(state: &mut GameState, pos: Vec2) {
        let id = state.next_entity_id();
        let mut bullet = Bullet::from_player(id, &state.player);
        bullet.pos = pos;
        state.bullets.push(bullet);
    }

    fn resolve(state: &mut GameState) -> CombatReport {
        let mut grid = SpatialGrid::default();
        grid.rebuild(&state.enemies);
        resolve_collisions(state, &grid)
    }

    #[test]
    fn test_overlap_is_strict() {
        let a = Vec2::new(0.0, 0.0);
        assert!(overlaps(a, 10.0, Vec2::new(9.9, 9.9), 10.0));
        assert!(!overlaps(a, 10.0, Vec2::new(10.0, 0.0), 10.0));
        assert!(!overlaps(a, 10.0, Vec2::new(0.0, -10.0), 10.0));
    }

    #[test]
    fn test_damage_formulas() {
        assert_eq!(bullet_damage_to_enemy(10.0, 5.0, 10.0), 5.0);
        assert_eq!(bullet_damage_to_enemy(10.0, 5.0, 40.0), 1.0);
        assert_eq!(bullet_damage_to_enemy(10.0, 5.0, 10.3), 5.0);
        assert_eq!(contact_damage_to_player(30.0, 10.0), 20.0);
        assert_eq!(contact_damage_to_player(5.0, 10.0), 1.0);
    }

    #[test]
    fn test_player_bullet_hits_enemy() {
        let mut state = arena_state();
        let ei = spawn(&mut state, EnemyKind::Basic, Vec2::new(100.0, 100.0));
        player_bullet_at(&mut state, Vec2::new(105.0, 105.0));

        let report = resolve(&mut state);

        assert_eq!(report.enemy_hits, 1);
        // 10 attack + 5 bullet - 10 defense
        assert_eq!(state.enemies[ei].health, 10.0);
        assert!(state.enemies[ei].invincible);
        assert!(state.bullets[0].is_destroyed());
        assert_eq!(state.damage_numbers.len(), 1);
        assert_eq!(state.damage_numbers[0].value, 5);
        assert_eq!(state.damage_numbers[0].pos, Vec2::new(100.0, 100.0));
        let id = state.enemies[ei].id;
        assert!(state.timers.is_pending(TimerEvent::EnemyInvincibilityEnds(id)));
    }

    #[test]
    fn test_invincible_enemy_absorbs_bullets() {
        let mut state = arena_state();
        let ei = spawn(&mut state, EnemyKind::Basic, Vec2::new(100.0, 100.0));
        player_bullet_at(&mut state, Vec2::new(105.0, 105.0));
        player_bullet_at(&mut state, Vec2::new(110.0, 110.0));

        let report = resolve(&mut state);

        assert_eq!(report.enemy_hits, 1);
        assert_eq!(state.enemies[ei].health, 10.0);
        assert!(state.bullets.iter().all(|b| b.is_destroyed()));
        assert_eq!(state.damage_numbers.len(), 1);
    }

    #[test]
    fn test_kill_awards_score_and_counts_down_wave() {
        let mut state = arena_state();
        let ei = spawn(&mut state, EnemyKind::Shooter, Vec2::new(100.0, 100.0));
        state.enemies[ei].health = 1.0;
        player_bullet_at(&mut state, Vec2::new(105.0, 105.0));

        let report = resolve(&mut state);

        assert_eq!(report.kills, 1);
        assert!(state.enemies[ei].is_destroyed());
        assert_eq!(state.score, 3);
        assert_eq!(state.wave.alive_in_wave, 4);
        assert!(!state.wave.cooldown_active);
    }

    #[test]
    fn test_simultaneous_last_kills_clear_wave_once() {
        let mut state = arena_state();
        state.wave.remaining_to_spawn = 0;
        state.wave.alive_in_wave = 2;
        for (i, x) in [100.0, 400.0].into_iter().enumerate() {
            let ei = spawn(&mut state, EnemyKind::Basic, Vec2::new(x, 100.0));
            state.enemies[ei].health = 1.0;
            player_bullet_at(&mut state, Vec2::new(x + 5.0 + i as f32, 105.0));
        }

        let report = resolve(&mut state);

        assert_eq!(report.kills, 2);
        assert!(report.wave_cleared);
        assert!(state.wave.cooldown_active);
        assert_eq!(state.wave.alive_in_wave, 0);
        let cooldowns = state
            .timers
            .drain_due(f64::MAX)
            .into_iter()
            .filter(|(_, e)| *e == TimerEvent::WaveCooldownEnds)
            .count();
        assert_eq!(cooldowns, 1);
    }

    #[test]
    fn test_enemy_bullet_ignores_player_defense() {
        let mut state = arena_state();
        let ei = spawn(&mut state, EnemyKind::Shooter, Vec2::new(0.0, 0.0));
        let id = state.next_entity_id();
        let mut bullet = Bullet::from_enemy(id, &state.enemies[ei], state.player.pos, 1);
        bullet.pos = state.player.pos + Vec2::splat(5.0);
        state.bullets.push(bullet);

        let report = resolve(&mut state);

        assert_eq!(report.player_hits, 1);
        assert_eq!(state.player.health, 97.0);
        assert!(state.player.invincible);
        assert!(state.bullets[0].is_destroyed());
    }

    #[test]
    fn test_contact_damage_and_invincibility_window() {
        let mut state = arena_state();
        let pos = state.player.pos;
        spawn(&mut state, EnemyKind::Basic, pos);
        spawn(&mut state, EnemyKind::Basic, pos + Vec2::splat(2.0));

        let report = resolve(&mut state);

        assert_eq!(report.player_hits, 1);
        assert_eq!(state.player.health, 80.0);
        assert!(state.player.invincible);

        // Still overlapping next tick: no further loss while invincible
        let report = resolve(&mut state);
        assert_eq!(report.player_hits, 0);
        assert_eq!(state.player.health, 80.0);
    }

    #[test]
    fn test_player_death_reported() {
        let mut state = arena_state();
        state.player.health = 5.0;
        let pos = state.player.pos;
        spawn(&mut state, EnemyKind::Tank, pos);

        let report = resolve(&mut state);
        assert!(report.player_died);
        assert!(state.player.health <= 0.0);
    }
}
