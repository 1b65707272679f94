//! # Actor system configuration.
//!
//! [`SystemConfig`] centralises the settings of an [`ActorSystem`](crate::ActorSystem):
//! shutdown grace, event bus sizing, fatal-escalation behaviour, and the default
//! supervisor strategy (root guardian and actors defined without one).
//!
//! ## Sentinel values
//! - `grace = 0s` → shutdown does not wait for dispatch loops
//! - `bus_capacity = 0` → clamped to 1

use std::time::Duration;

use crate::policies::BackoffPolicy;
use crate::supervision::SupervisorStrategy;

/// Global configuration of an actor system.
///
/// ## Field semantics
/// - `grace`: maximum wait for dispatch loops to exit on shutdown
/// - `bus_capacity`: event bus ring buffer size (min 1)
/// - `max_retries` / `within` / `backoff`: default One-For-One strategy, used by the root
///   guardian and by actors defined without a strategy
/// - `root_strategy`: replaces the root guardian strategy
/// - `exit_on_fatal`: exit the process with status 1 when a failure escalates past the root
#[derive(Clone, Debug)]
pub struct SystemConfig {
    /// Maximum time [`ActorSystem::shutdown`](crate::ActorSystem::shutdown) waits for
    /// dispatch loops before returning `RuntimeError::GraceExceeded`.
    pub grace: Duration,

    /// Capacity of the event bus broadcast channel.
    ///
    /// Receivers lagging more than `bus_capacity` events skip older items.
    pub bus_capacity: usize,

    /// Failures tolerated per child inside `within` before it is stopped.
    pub max_retries: u32,

    /// Sliding window of the default strategy.
    pub within: Duration,

    /// Restart backoff of the default strategy.
    pub backoff: BackoffPolicy,

    /// Explicit root guardian strategy.
    ///
    /// With a deciding `Escalate`, any top-level failure becomes fatal.
    pub root_strategy: Option<SupervisorStrategy>,

    /// Terminate the process (status 1) on fatal escalation.
    ///
    /// When `false`, the tree is torn down and [`ActorSystem::terminated`](crate::ActorSystem::terminated)
    /// resolves with `RuntimeError::FatalEscalation`; the process keeps running.
    pub exit_on_fatal: bool,
}

impl SystemConfig {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Strategy of actors created without one: One-For-One, restart until the window is
    /// exhausted.
    pub fn default_strategy(&self) -> SupervisorStrategy {
        SupervisorStrategy::one_for_one(self.max_retries, self.within, None).with_backoff(self.backoff)
    }

    /// Strategy of the root guardian: `root_strategy`, else [`default_strategy`](Self::default_strategy).
    pub fn root_strategy(&self) -> SupervisorStrategy {
        self.root_strategy
            .clone()
            .unwrap_or_else(|| self.default_strategy())
    }
}

impl Default for SystemConfig {
    /// Default configuration:
    ///
    /// - `grace = 60s`
    /// - `bus_capacity = 1024`
    /// - `max_retries = 3` within `60s`
    /// - `backoff = BackoffPolicy::default()` (100ms doubling, capped at 30s)
    /// - `root_strategy = None`
    /// - `exit_on_fatal = true`
    fn default() -> Self {
        Self {
            grace: Duration::from_secs(60),
            bus_capacity: 1024,
            max_retries: 3,
            within: Duration::from_secs(60),
            backoff: BackoffPolicy::default(),
            root_strategy: None,
            exit_on_fatal: true,
        }
    }
}
