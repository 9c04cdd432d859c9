//! Deferred effects on simulation time
//!
//! Invincibility expiry, spawn ticks and the wave cooldown are scheduled here
//! and drained once per tick, so their order relative to frames is fixed.

/// A deferred effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Player invincibility window ends
    PlayerInvincibilityEnds,
    /// Invincibility window of the enemy with this id ends (no-op if it is gone)
    EnemyInvincibilityEnds(u32),
    /// Spawn the next enemy of the current wave
    SpawnEnemy,
    /// Wave cooldown finished, advance to the next wave
    WaveCooldownEnds,
}

#[derive(Debug, Clone)]
struct Scheduled {
    due_ms: f64,
    seq: u64,
    event: TimerEvent,
}

/// Pending deferred effects, fired in (due time, scheduling order)
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    pending: Vec<Scheduled>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` to fire once simulation time reaches `due_ms`
    pub fn schedule(&mut self, due_ms: f64, event: TimerEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Scheduled { due_ms, seq, event });
    }

    /// Remove and return all events due at or before `now_ms` with their due
    /// times, earliest first
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<(f64, TimerEvent)> {
        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|s| s.due_ms <= now_ms);
        self.pending = rest;

        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|s| (s.due_ms, s.event)).collect()
    }

    /// Whether an event equal to `event` is waiting to fire
    pub fn is_pending(&self, event: TimerEvent) -> bool {
        self.pending.iter().any(|s| s.event == event)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
