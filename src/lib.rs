//! Wave Arena - A top-down wave shooter
//!
//! Core modules:
//! - `sim`: Simulation core (entities, collisions, waves, game phases)
//! - `renderer`: Canvas drawing collaborator and frame drawing
//! - `platform`: Input unification and browser glue
//! - `ui`: HUD collaborator (score/wave text, game-over panel)
//! - `settings`: Startup configuration
//! - `autoplay`: Headless scripted run used by the native binary

pub mod autoplay;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use error::{SettingsError, StartupError};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal frame rate the per-frame speeds are tuned for
    pub const TARGET_FRAME_RATE: f64 = 60.0;
    /// Milliseconds of simulation time covered by a delta factor of 1
    pub const MS_PER_FRAME: f64 = 1000.0 / TARGET_FRAME_RATE;
    /// Default upper clamp for the delta factor (one frame covers at most 4 nominal frames)
    pub const DEFAULT_MAX_DELTA_FACTOR: f32 = 4.0;

    /// Spatial grid cell size (simulation units)
    pub const GRID_CELL_SIZE: f32 = 100.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 40.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;
    pub const PLAYER_ATTACK: f32 = 10.0;
    pub const PLAYER_DEFENSE: f32 = 10.0;
    pub const PLAYER_INVINCIBILITY_MS: f64 = 1000.0;

    /// Bullet defaults
    pub const BULLET_SIZE: f32 = 10.0;
    pub const BULLET_MAX_DISTANCE: f32 = 4000.0;
    pub const PLAYER_BULLET_SPEED: f32 = 10.0;
    pub const PLAYER_BULLET_DAMAGE: f32 = 5.0;
    pub const ENEMY_BULLET_SPEED: f32 = 9.0;
    pub const ENEMY_BULLET_BASE_DAMAGE: f32 = 3.0;

    /// Damage number motion (per nominal frame)
    pub const DAMAGE_NUMBER_RISE: f32 = 1.0;
    pub const DAMAGE_NUMBER_FADE: f32 = 0.01;
    pub const DAMAGE_NUMBER_MIN_OPACITY: f32 = 0.1;

    /// Wave pacing
    pub const SPAWN_INTERVAL_MS: f64 = 1000.0;
    pub const WAVE_COOLDOWN_MS: f64 = 3000.0;
    pub const BASE_WAVE_SIZE: f64 = 5.0;
    pub const WAVE_SIZE_GROWTH: f64 = 1.2;

    /// Gamepad left-stick dead zone
    pub const DEFAULT_DEAD_ZONE: f32 = 0.2;
}

/// Unit vector from `from` toward `to`.
///
/// A zero-length offset divides by 1 instead, yielding `Vec2::ZERO`.
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    let delta = to - from;
    let dist = delta.length();
    let dist = if dist > 0.0 { dist } else { 1.0 };
    delta / dist
}

/// Center of a square whose top-left corner is `pos`
#[inline]
pub fn square_center(pos: Vec2, size: f32) -> Vec2 {
    pos + Vec2::splat(size / 2.0)
}
