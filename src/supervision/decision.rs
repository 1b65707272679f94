//! # Supervision decisions and deciders.
//!
//! A decider is a pure function `&SupervisionContext -> SupervisionDecision` consulted by a
//! supervisor whenever one of its children fails and its restart ledger is not exhausted.
//! [`SupervisorStrategies`] provides constant deciders for the four decisions.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::actor::ActorAddress;
use crate::error::ActorError;

/// Recovery action chosen for a failed child.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SupervisionDecision {
    /// Keep the state, discard the failed message, continue with the next one.
    Resume,
    /// Wait for the backoff delay, reset state and mailbox, run `post_restart`.
    Restart,
    /// Stop permanently.
    Stop,
    /// Fail the supervisor itself with the same error, one level up.
    Escalate,
}

impl SupervisionDecision {
    /// Short stable label for logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SupervisionDecision::Resume => "resume",
            SupervisionDecision::Restart => "restart",
            SupervisionDecision::Stop => "stop",
            SupervisionDecision::Escalate => "escalate",
        }
    }
}

impl fmt::Display for SupervisionDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Input of a decider.
#[derive(Debug, Clone)]
pub struct SupervisionContext {
    /// The failing child.
    pub child: ActorAddress,
    /// What it failed with.
    pub error: ActorError,
    /// Failures of this child inside the current window, not counting this one.
    pub retry_count: u32,
    /// Time of the oldest failure still inside the window.
    pub window_start: Instant,
}

/// Decision function of a [`SupervisorStrategy`](crate::SupervisorStrategy).
pub type Decider = Arc<dyn Fn(&SupervisionContext) -> SupervisionDecision + Send + Sync>;

/// Factories for constant deciders.
///
/// ```
/// use std::time::Duration;
/// use actorvisor::{SupervisorStrategies, SupervisorStrategy};
///
/// let strategy = SupervisorStrategy::one_for_one(
///     3,
///     Duration::from_secs(10),
///     Some(SupervisorStrategies::escalate()),
/// );
/// assert_eq!(strategy.max_retries(), 3);
/// ```
pub struct SupervisorStrategies;

impl SupervisorStrategies {
    /// Always resume.
    pub fn resume() -> Decider {
        Arc::new(|_| SupervisionDecision::Resume)
    }

    /// Always restart (the default decider).
    pub fn restart() -> Decider {
        Arc::new(|_| SupervisionDecision::Restart)
    }

    /// Always stop.
    pub fn stop() -> Decider {
        Arc::new(|_| SupervisionDecision::Stop)
    }

    /// Always escalate.
    pub fn escalate() -> Decider {
        Arc::new(|_| SupervisionDecision::Escalate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> SupervisionContext {
        SupervisionContext {
            child: ActorAddress::new(5, "orders".into()),
            error: ActorError::fail("rejected"),
            retry_count: 0,
            window_start: Instant::now(),
        }
    }

    #[test]
    fn constant_deciders() {
        let c = ctx();
        assert_eq!(SupervisorStrategies::resume()(&c), SupervisionDecision::Resume);
        assert_eq!(SupervisorStrategies::restart()(&c), SupervisionDecision::Restart);
        assert_eq!(SupervisorStrategies::stop()(&c), SupervisionDecision::Stop);
        assert_eq!(SupervisorStrategies::escalate()(&c), SupervisionDecision::Escalate);
    }

    #[test]
    fn labels() {
        assert_eq!(SupervisionDecision::Escalate.to_string(), "escalate");
    }
}
