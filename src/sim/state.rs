//! Game state and core simulation types
//!
//! Every piece of session state lives in [`GameState`], which is passed by
//! reference to each subsystem. Entities are plain records; behaviour that
//! needs other parts of the session lives in free functions in `tick`,
//! `combat` and `wave`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::SimClock;
use super::timers::TimerQueue;
use super::wave::wave_size;
use crate::consts::*;
use crate::{direction_to, square_center};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the start action
    Title,
    /// Active gameplay
    Playing,
    /// Simulation frozen, overlay shown
    Paused,
    /// Player died; waits for restart
    GameOver,
}

/// The player's avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    /// Square bounding size
    pub size: f32,
    /// Movement per nominal frame
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    pub attack: f32,
    pub defense: f32,
    /// Unit aim/facing direction
    pub aim: Vec2,
    pub invincible: bool,
    pub invincibility_ms: f64,
}

impl Player {
    /// Player centered in an arena of the given size
    pub fn new(arena: Vec2) -> Self {
        Self {
            pos: arena / 2.0,
            size: PLAYER_SIZE,
            speed: PLAYER_SPEED,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            attack: PLAYER_ATTACK,
            defense: PLAYER_DEFENSE,
            aim: Vec2::new(0.0, -1.0),
            invincible: false,
            invincibility_ms: PLAYER_INVINCIBILITY_MS,
        }
    }

    pub fn center(&self) -> Vec2 {
        square_center(self.pos, self.size)
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Move by `movement * speed * delta`, staying inside the arena rectangle
    pub fn move_by(&mut self, movement: Vec2, delta: f32, arena: Vec2) {
        let step = movement * self.speed * delta;
        let max = (arena - Vec2::splat(self.size)).max(Vec2::ZERO);
        self.pos = (self.pos + step).clamp(Vec2::ZERO, max);
    }

    /// Point the player at `dir`; zero-length requests keep the current aim
    pub fn set_aim(&mut self, dir: Vec2) {
        if let Some(unit) = dir.try_normalize() {
            self.aim = unit;
        }
    }
}

/// A projectile fired by the player or a shooter enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    pub damage: f32,
    /// Unit travel direction
    pub dir: Vec2,
    pub distance_traveled: f32,
    pub max_distance: f32,
    pub fired_by_player: bool,
    destroyed: bool,
}

impl Bullet {
    /// Bullet leaving the player's center along the aim direction
    pub fn from_player(id: u32, player: &Player) -> Self {
        Self {
            id,
            pos: player.center() - Vec2::splat(BULLET_SIZE / 2.0),
            size: BULLET_SIZE,
            speed: PLAYER_BULLET_SPEED,
            damage: PLAYER_BULLET_DAMAGE,
            dir: player.aim,
            distance_traveled: 0.0,
            max_distance: BULLET_MAX_DISTANCE,
            fired_by_player: true,
            destroyed: false,
        }
    }

    /// Bullet fired by an enemy toward `target`; damage scales with the wave
    pub fn from_enemy(id: u32, enemy: &Enemy, target: Vec2, wave: u32) -> Self {
        let scaling = 1.0 + (wave.max(1) - 1) as f32 * 0.05;
        Self {
            id,
            pos: enemy.pos - Vec2::splat(BULLET_SIZE / 2.0),
            size: BULLET_SIZE,
            speed: ENEMY_BULLET_SPEED,
            damage: ENEMY_BULLET_BASE_DAMAGE * scaling,
            dir: direction_to(enemy.pos, target),
            distance_traveled: 0.0,
            max_distance: BULLET_MAX_DISTANCE,
            fired_by_player: false,
            destroyed: false,
        }
    }

    /// Travel for `delta` frames; destroyed once past max range
    pub fn advance(&mut self, delta: f32) {
        self.pos += self.dir * self.speed * delta;
        self.distance_traveled += self.speed * delta;
        if self.distance_traveled > self.max_distance {
            self.destroy();
        }
    }

    pub fn center(&self) -> Vec2 {
        square_center(self.pos, self.size)
    }

    pub fn destroy(&mut self) {
        self.destroyed = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Basic,
    Tank,
    Fast,
    Shooter,
}

/// Enemy stats, either the unscaled table values or scaled for a wave
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnemyStats {
    pub health: f32,
    pub attack: f32,
    pub defense: f32,
    pub score: f32,
    pub collision_damage: f32,
    pub speed: f32,
    pub size: f32,
    /// CSS color name used when drawing
    pub color: &'static str,
    /// Time between shots for shooting-capable kinds
    pub shoot_interval_ms: Option<f64>,
    pub invincibility_ms: f64,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 4] = [
        EnemyKind::Basic,
        EnemyKind::Tank,
        EnemyKind::Fast,
        EnemyKind::Shooter,
    ];

    /// Unscaled stats for this kind
    pub fn base_stats(self) -> EnemyStats {
        match self {
            EnemyKind::Basic => EnemyStats {
                health: 15.0,
                attack: 5.0,
                defense: 10.0,
                score: 1.0,
                collision_damage: 30.0,
                speed: 2.0,
                size: 30.0,
                color: "red",
                shoot_interval_ms: None,
                invincibility_ms: 500.0,
            },
            EnemyKind::Tank => EnemyStats {
                health: 25.0,
                attack: 4.0,
                defense: 12.0,
                score: 2.0,
                collision_damage: 38.0,
                speed: 1.5,
                size: 40.0,
                color: "blue",
                shoot_interval_ms: None,
                invincibility_ms: 600.0,
            },
            EnemyKind::Fast => EnemyStats {
                health: 10.0,
                attack: 2.0,
                defense: 6.0,
                score: 1.5,
                collision_damage: 18.0,
                speed: 3.0,
                size: 20.0,
                color: "green",
                shoot_interval_ms: None,
                invincibility_ms: 400.0,
            },
            EnemyKind::Shooter => EnemyStats {
                health: 20.0,
                attack: 4.0,
                defense: 5.0,
                score: 3.0,
                collision_damage: 15.0,
                speed: 1.8,
                size: 25.0,
                color: "purple",
                shoot_interval_ms: Some(2000.0),
                invincibility_ms: 500.0,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Basic => "basic",
            EnemyKind::Tank => "tank",
            EnemyKind::Fast => "fast",
            EnemyKind::Shooter => "shooter",
        }
    }
}

/// A hostile agent pursuing the player
#[derive(Debug, Clone, Serialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    /// Top-left corner
    pub pos: Vec2,
    /// Stats already scaled for the wave the enemy spawned in
    pub stats: EnemyStats,
    /// Current health (may go negative; only `<= 0` matters)
    pub health: f32,
    pub invincible: bool,
    pub last_shot_ms: Option<f64>,
    destroyed: bool,
}

impl Enemy {
    pub fn new(id: u32, kind: EnemyKind, stats: EnemyStats, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            stats,
            health: stats.health,
            invincible: false,
            last_shot_ms: None,
            destroyed: false,
        }
    }

    pub fn size(&self) -> f32 {
        self.stats.size
    }

    pub fn center(&self) -> Vec2 {
        square_center(self.pos, self.stats.size)
    }

    /// Step straight toward `target` (pure pursuit)
    pub fn pursue(&mut self, target: Vec2, delta: f32) {
        self.pos += direction_to(self.pos, target) * self.stats.speed * delta;
    }

    /// Whether a shooting-capable enemy may fire at `now_ms`
    pub fn ready_to_shoot(&self, now_ms: f64) -> bool {
        match (self.stats.shoot_interval_ms, self.last_shot_ms) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(interval), Some(last)) => now_ms - last >= interval,
        }
    }

    pub fn destroy(&mut self) {
        self.destroyed = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

/// Floating damage readout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageNumber {
    pub pos: Vec2,
    pub value: i32,
    /// 0-1
    pub opacity: f32,
    pub rise_speed: f32,
    pub fade_speed: f32,
    destroyed: bool,
}

impl DamageNumber {
    pub fn new(pos: Vec2, value: i32) -> Self {
        Self {
            pos,
            value,
            opacity: 1.0,
            rise_speed: DAMAGE_NUMBER_RISE,
            fade_speed: DAMAGE_NUMBER_FADE,
            destroyed: false,
        }
    }

    /// Rise and fade; destroyed once nearly transparent
    pub fn advance(&mut self, delta: f32) {
        self.pos.y -= self.rise_speed * delta;
        self.opacity -= self.fade_speed * delta;
        if self.opacity <= DAMAGE_NUMBER_MIN_OPACITY {
            self.destroy();
        }
    }

    pub fn destroy(&mut self) {
        self.destroyed = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

/// Wave progress counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveState {
    /// Current wave number (>= 1)
    pub current_wave: u32,
    /// Planned enemy count for this wave
    pub to_spawn_total: u32,
    /// Enemies not yet created
    pub remaining_to_spawn: u32,
    /// Enemies of this wave not yet destroyed (includes unspawned ones)
    pub alive_in_wave: u32,
    /// Between-wave cooldown in progress
    pub cooldown_active: bool,
}

impl WaveState {
    /// Counters for the given wave, nothing spawned yet
    pub fn for_wave(wave: u32) -> Self {
        let total = wave_size(wave);
        Self {
            current_wave: wave,
            to_spawn_total: total,
            remaining_to_spawn: total,
            alive_in_wave: total,
            cooldown_active: false,
        }
    }
}

impl Default for WaveState {
    fn default() -> Self {
        Self::for_wave(1)
    }
}

/// Complete session state (the simulation context)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub score: u64,
    /// Final score of the last finished run this session
    pub previous_score: Option<u64>,
    /// Visible area size; enemies spawn on its margin
    pub arena: Vec2,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub damage_numbers: Vec<DamageNumber>,
    pub wave: WaveState,
    pub clock: SimClock,
    pub timers: TimerQueue,
    /// Simulated ticks (PLAYING only)
    pub time_ticks: u64,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// New session on the title screen
    pub fn new(seed: u64, arena: Vec2) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Title,
            score: 0,
            previous_score: None,
            arena,
            player: Player::new(arena),
            bullets: Vec::new(),
            enemies: Vec::new(),
            damage_numbers: Vec::new(),
            wave: WaveState::default(),
            clock: SimClock::default(),
            timers: TimerQueue::new(),
            time_ticks: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Current simulation time (ms)
    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    /// Resize the visible area (player is kept inside it)
    pub fn set_arena(&mut self, arena: Vec2) {
        self.arena = arena;
        self.player.move_by(Vec2::ZERO, 0.0, arena);
    }

    /// Re-initialise player, entities, waves and score for a new run.
    ///
    /// Pending timers are dropped, so invincibility or cooldown callbacks from
    /// the previous run never reach the new one.
    pub fn reset_run(&mut self) {
        self.score = 0;
        self.player = Player::new(self.arena);
        self.bullets.clear();
        self.enemies.clear();
        self.damage_numbers.clear();
        self.wave = WaveState::default();
        self.timers.clear();
        self.clock.reset();
    }

    /// Remove every entity flagged destroyed. Runs once per tick.
    pub fn purge_destroyed(&mut self) {
        self.bullets.retain(|b| !b.is_destroyed());
        self.enemies.retain(|e| !e.is_destroyed());
        self.damage_numbers.retain(|d| !d.is_destroyed());
    }

    pub fn enemy_mut(&mut self, id: u32) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_starts_centered() {
        let player = Player::new(Vec2::new(800.0, 600.0));
        assert_eq!(player.pos, Vec2::new(400.0, 300.0));
        assert_eq!(player.health, player.max_health);
        assert_eq!(player.aim, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_player_movement_clamped_to_arena() {
        let arena = Vec2::new(200.0, 200.0);
        let mut player = Player::new(arena);
        player.move_by(Vec2::new(1.0, 1.0), 100.0, arena);
        assert_eq!(player.pos, Vec2::splat(200.0 - PLAYER_SIZE));
        player.move_by(Vec2::new(-1.0, -1.0), 100.0, arena);
        assert_eq!(player.pos, Vec2::ZERO);
    }

    #[test]
    fn test_zero_aim_keeps_previous() {
        let mut player = Player::new(Vec2::new(100.0, 100.0));
        player.set_aim(Vec2::new(3.0, 0.0));
        player.set_aim(Vec2::ZERO);
        assert_eq!(player.aim, Vec2::X);
    }

    #[test]
    fn test_bullet_expires_past_range() {
        let player = Player::new(Vec2::new(100.0, 100.0));
        let mut bullet = Bullet::from_player(1, &player);
        bullet.advance(399.0);
        assert!(!bullet.is_destroyed());
        bullet.advance(2.0);
        assert!(bullet.is_destroyed());
    }

    #[test]
    fn test_bullet_travel_scales_with_delta() {
        let player = Player::new(Vec2::new(100.0, 100.0));
        let mut a = Bullet::from_player(1, &player);
        let mut b = Bullet::from_player(2, &player);
        a.advance(2.0);
        b.advance(1.0);
        b.advance(1.0);
        assert!((a.pos - b.pos).length() < 1e-4);
        assert_eq!(a.distance_traveled, 20.0);
    }

    #[test]
    fn test_enemy_bullet_damage_scales_with_wave() {
        let stats = EnemyKind::Shooter.base_stats();
        let enemy = Enemy::new(1, EnemyKind::Shooter, stats, Vec2::ZERO);
        let w1 = Bullet::from_enemy(2, &enemy, Vec2::new(10.0, 0.0), 1);
        let w11 = Bullet::from_enemy(3, &enemy, Vec2::new(10.0, 0.0), 11);
        assert_eq!(w1.damage, 3.0);
        assert!((w11.damage - 4.5).abs() < 1e-5);
        assert!(!w1.fired_by_player);
        assert_eq!(w1.dir, Vec2::X);
    }

    #[test]
    fn test_enemy_pursuit_on_top_of_target_stays_put() {
        let stats = EnemyKind::Basic.base_stats();
        let mut enemy = Enemy::new(1, EnemyKind::Basic, stats, Vec2::new(5.0, 5.0));
        enemy.pursue(Vec2::new(5.0, 5.0), 1.0);
        assert_eq!(enemy.pos, Vec2::new(5.0, 5.0));
        enemy.pursue(Vec2::new(105.0, 5.0), 1.0);
        assert_eq!(enemy.pos, Vec2::new(7.0, 5.0));
    }

    #[test]
    fn test_shooter_cadence() {
        let stats = EnemyKind::Shooter.base_stats();
        let mut enemy = Enemy::new(1, EnemyKind::Shooter, stats, Vec2::ZERO);
        assert!(enemy.ready_to_shoot(0.0));
        enemy.last_shot_ms = Some(100.0);
        assert!(!enemy.ready_to_shoot(2000.0));
        assert!(enemy.ready_to_shoot(2100.0));

        let basic = Enemy::new(2, EnemyKind::Basic, EnemyKind::Basic.base_stats(), Vec2::ZERO);
        assert!(!basic.ready_to_shoot(1e9));
    }

    #[test]
    fn test_damage_number_fades_out() {
        let mut dn = DamageNumber::new(Vec2::new(0.0, 100.0), 5);
        dn.advance(80.0);
        assert!(!dn.is_destroyed());
        assert_eq!(dn.pos.y, 20.0);
        dn.advance(15.0);
        assert!(dn.is_destroyed());
    }

    #[test]
    fn test_purge_removes_only_destroyed() {
        let mut state = GameState::new(1, Vec2::new(400.0, 400.0));
        let id = state.next_entity_id();
        state.bullets.push(Bullet::from_player(id, &state.player));
        let id = state.next_entity_id();
        let mut dead = Bullet::from_player(id, &state.player);
        dead.destroy();
        state.bullets.push(dead);

        state.purge_destroyed();
        assert_eq!(state.bullets.len(), 1);
        assert!(!state.bullets[0].is_destroyed());
    }
}
