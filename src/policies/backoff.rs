//! # Restart backoff for supervised actors.
//!
//! [`BackoffPolicy`] controls how long a failing actor waits before it is
//! reinitialised. It is parameterized by:
//! - [`BackoffPolicy::base`] the delay for the first restart in a window;
//! - [`BackoffPolicy::multiplier`] the growth factor per consecutive failure;
//! - [`BackoffPolicy::max`] the maximum delay cap.
//!
//! The delay for attempt `n` is `min(max, base × multiplier^n)`, then jitter is applied.
//! The attempt is the retry count taken from the supervisor's restart ledger, so the
//! delay falls back to `base` once the failure window drains.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use actorvisor::{BackoffPolicy, JitterPolicy};
//!
//! let backoff = BackoffPolicy {
//!     base: Duration::from_millis(100),
//!     max: Duration::from_secs(10),
//!     multiplier: 2.0,
//!     jitter: JitterPolicy::None,
//! };
//!
//! assert_eq!(backoff.delay(0), Duration::from_millis(100));
//! assert_eq!(backoff.delay(1), Duration::from_millis(200));
//! // 100ms × 2^10 = 102_400ms → capped at max=10s
//! assert_eq!(backoff.delay(10), Duration::from_secs(10));
//! ```

use std::time::Duration;

use crate::policies::jitter::JitterPolicy;

/// Exponential restart backoff.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackoffPolicy {
    /// Delay before the first restart (attempt 0).
    pub base: Duration,
    /// Maximum delay cap.
    pub max: Duration,
    /// Multiplicative growth factor (`>= 1.0` keeps delays monotonic).
    pub multiplier: f64,
    /// Jitter policy to spread simultaneous restarts.
    pub jitter: JitterPolicy,
}

impl Default for BackoffPolicy {
    /// Returns a policy with:
    /// - `base = 100ms`;
    /// - `multiplier = 2.0`;
    /// - `max = 30s`;
    /// - no jitter.
    fn default() -> Self {
        Self {
            base: Duration::from_millis(100),
            max: Duration::from_secs(30),
            multiplier: 2.0,
            jitter: JitterPolicy::None,
        }
    }
}

impl BackoffPolicy {
    /// A policy that restarts immediately.
    pub const fn immediate() -> Self {
        Self {
            base: Duration::ZERO,
            max: Duration::ZERO,
            multiplier: 1.0,
            jitter: JitterPolicy::None,
        }
    }

    /// A policy with the same delay for every attempt.
    pub const fn constant(delay: Duration) -> Self {
        Self {
            base: delay,
            max: delay,
            multiplier: 1.0,
            jitter: JitterPolicy::None,
        }
    }

    /// Exponential policy without jitter.
    pub const fn exponential(base: Duration, multiplier: f64, max: Duration) -> Self {
        Self {
            base,
            max,
            multiplier,
            jitter: JitterPolicy::None,
        }
    }

    /// Returns a copy with the given jitter policy.
    pub fn with_jitter(mut self, jitter: JitterPolicy) -> Self {
        self.jitter = jitter;
        self
    }

    /// Computes the restart delay for the given attempt number (0-indexed).
    ///
    /// The base delay is `base × multiplier^attempt`, clamped to [`BackoffPolicy::max`].
    /// Non-finite or negative intermediate values clamp to `max`.
    pub fn delay(&self, attempt: u32) -> Duration {
        let max_secs = self.max.as_secs_f64();
        let exp = attempt.min(i32::MAX as u32) as i32;
        let raw_secs = self.base.as_secs_f64() * self.multiplier.powi(exp);

        let capped = if !raw_secs.is_finite() || raw_secs < 0.0 || raw_secs > max_secs {
            self.max
        } else {
            Duration::from_secs_f64(raw_secs)
        };
        self.jitter.apply(capped)
    }
}
