//! Combo counter with an idle timeout, driven by the caller's clock.

use std::time::{Duration, Instant};

pub const DEFAULT_MAX_COMBO: u32 = 10;
pub const DEFAULT_COMBO_TIMEOUT: Duration = Duration::from_millis(5000);

/// Snapshot handed to the UI and returned with every action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComboState {
    pub count: u32,
    pub active: bool,
}

/// Counts consecutive scoring steps. Each scoring step re-arms the expiry;
/// once `now` passes it, the count drops back to zero.
#[derive(Debug, Clone)]
pub struct ComboTracker {
    count: u32,
    max: u32,
    timeout: Duration,
    /// Reset deadline; None while idle.
    expires_at: Option<Instant>,
}

impl ComboTracker {
    pub fn new(max: u32, timeout: Duration) -> Self {
        Self {
            count: 0,
            max,
            timeout,
            expires_at: None,
        }
    }

    /// Drop the count if the deadline has passed. Called before every read and bump.
    pub fn expire(&mut self, now: Instant) {
        if self.expires_at.is_some_and(|t| now >= t) {
            self.reset();
        }
    }

    /// Register one scoring step; returns the new count (capped at max).
    pub fn bump(&mut self, now: Instant) -> u32 {
        self.expire(now);
        self.count = (self.count + 1).min(self.max);
        self.expires_at = Some(now + self.timeout);
        self.count
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.expires_at = None;
    }

    pub fn state(&self, now: Instant) -> ComboState {
        match self.expires_at {
            Some(t) if now < t => ComboState {
                count: self.count,
                active: true,
            },
            _ => ComboState::default(),
        }
    }

    /// Time left before the combo resets (zero when idle).
    pub fn remaining(&self, now: Instant) -> Duration {
        self.expires_at
            .map(|t| t.saturating_duration_since(now))
            .unwrap_or(Duration::ZERO)
    }

    /// Fraction of the timeout still left, for the gauge.
    pub fn remaining_ratio(&self, now: Instant) -> f64 {
        if self.timeout.is_zero() {
            return 0.0;
        }
        (self.remaining(now).as_secs_f64() / self.timeout.as_secs_f64()).min(1.0)
    }

    pub fn max(&self) -> u32 {
        self.max
    }
}

impl Default for ComboTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_COMBO, DEFAULT_COMBO_TIMEOUT)
    }
}
