//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering and
//! platform dependencies:
//! - Delta-factor motion only (see `clock`)
//! - Seeded RNG only
//! - Deferred effects through the timer queue, never wall-clock callbacks
//! - One owning context (`GameState`) mutated by one tick at a time

pub mod clock;
pub mod combat;
pub mod spatial;
pub mod state;
pub mod tick;
pub mod timers;
pub mod wave;

pub use clock::SimClock;
pub use combat::{CombatReport, overlaps, resolve_collisions};
pub use spatial::SpatialGrid;
pub use state::{
    Bullet, DamageNumber, Enemy, EnemyKind, EnemyStats, GamePhase, GameState, Player, WaveState,
};
pub use tick::{TickInput, end_game, restart, start, tick};
pub use timers::{TimerEvent, TimerQueue};
pub use wave::{kind_weights, pick_enemy_kind, scaled_stats, wave_size};
