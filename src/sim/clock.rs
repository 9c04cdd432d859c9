//! Simulation clock
//!
//! Turns frame timestamps into a delta factor: the number of nominal 60 Hz
//! frames that elapsed since the previous tick. Per-frame speeds are
//! multiplied by this factor so motion does not depend on the display rate.

use crate::consts::{DEFAULT_MAX_DELTA_FACTOR, MS_PER_FRAME, TARGET_FRAME_RATE};

/// Frame-rate independent delta factor source
#[derive(Debug, Clone)]
pub struct SimClock {
    /// Timestamp of the previous tick (seconds), `None` right after a reset
    last_timestamp: Option<f64>,
    /// Upper bound for a single delta factor (<= 0 disables the clamp)
    max_factor: f32,
    /// Simulation time in milliseconds; only advances while ticking
    elapsed_ms: f64,
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DELTA_FACTOR)
    }
}

impl SimClock {
    pub fn new(max_factor: f32) -> Self {
        Self {
            last_timestamp: None,
            max_factor,
            elapsed_ms: 0.0,
        }
    }

    /// Forget the previous timestamp so the next tick counts as exactly one frame
    pub fn reset(&mut self) {
        self.last_timestamp = None;
    }

    pub fn set_max_factor(&mut self, max_factor: f32) {
        self.max_factor = max_factor;
    }

    /// Advance to `timestamp` (seconds, monotonic) and return the delta factor.
    ///
    /// The first call after a reset yields 1.0. Simulation time advances by the
    /// returned factor worth of nominal frames, so clamped jumps are clamped for
    /// timers too.
    pub fn advance(&mut self, timestamp: f64) -> f32 {
        let factor = match self.last_timestamp {
            Some(prev) => ((timestamp - prev) * TARGET_FRAME_RATE).max(0.0) as f32,
            None => 1.0,
        };
        self.last_timestamp = Some(timestamp);

        let factor = if self.max_factor > 0.0 {
            factor.min(self.max_factor)
        } else {
            factor
        };

        self.elapsed_ms += factor as f64 * MS_PER_FRAME;
        factor
    }

    /// Simulation time (ms) accumulated by `advance`
    pub fn now_ms(&self) -> f64 {
        self.elapsed_ms
    }
}
