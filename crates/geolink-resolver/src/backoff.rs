//! Backoff schedule and the delay primitive used between outer attempts.
//!
//! The retry loop itself lives in [`crate::client`]; this module only answers
//! "how long to wait before attempt `n`" and performs the wait through the
//! [`Sleeper`] seam so tests never depend on wall-clock time.

use std::future::Future;
use std::time::Duration;

use geolink_core::ResolverSettings;

/// Exponential backoff capped at an upper bound.
///
/// # Backoff schedule (base = 1000 ms, factor = 2.0, cap = 8000 ms)
///
/// | Attempt index | Sleep before next attempt |
/// |---------------|---------------------------|
/// | 1             | 1000 × 2⁰ = 1000 ms       |
/// | 2             | 1000 × 2¹ = 2000 ms       |
/// | 3             | 1000 × 2² = 4000 ms       |
/// | 4             | 1000 × 2³ = 8000 ms       |
/// | 5+            | capped at 8000 ms         |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffPolicy {
    pub base: Duration,
    pub factor: f64,
    pub cap: Duration,
}

impl BackoffPolicy {
    #[must_use]
    pub fn from_settings(settings: &ResolverSettings) -> Self {
        Self {
            base: Duration::from_millis(settings.backoff_base_ms),
            factor: settings.backoff_factor,
            cap: Duration::from_millis(settings.backoff_cap_ms),
        }
    }

    /// Delay to wait after attempt `attempt` (1-based) has failed.
    ///
    /// Computes `base * factor^(attempt - 1)` and clamps it to `cap`. Never
    /// exceeds `cap`, no matter how large `attempt` grows.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let scaled = self.base.as_secs_f64() * self.factor.powi(exponent);
        if !scaled.is_finite() || scaled >= self.cap.as_secs_f64() {
            return self.cap;
        }
        Duration::from_secs_f64(scaled.max(0.0)).min(self.cap)
    }

    /// Sum of every sleep taken across `max_attempts` attempts that all fail.
    ///
    /// No sleep follows the final attempt.
    #[must_use]
    pub fn total_delay(&self, max_attempts: u32) -> Duration {
        (1..max_attempts).map(|attempt| self.delay_for(attempt)).sum()
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::from_settings(&ResolverSettings::default())
    }
}

/// Pause primitive between attempts.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, delay: Duration) -> impl Future<Output = ()> + Send;
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, delay: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(delay)
    }
}
