//! # Supervisor strategies.
//!
//! A [`SupervisorStrategy`] bundles everything a supervisor needs to react to a child
//! failure:
//! - [`StrategyKind`]: the *scope* of a restart/stop decision;
//! - `max_retries` / `within`: the bounded-retry window (exceeding it forces `Stop`);
//! - a [`Decider`] consulted while the window is not exhausted;
//! - a [`BackoffPolicy`] delaying restarts.
//!
//! ## Scope
//! ```text
//! children (creation order): [a, b, c, d]    c fails
//!
//! OneForOne   → [c]
//! AllForOne   → [a, b, c, d]
//! RestForOne  → [c, d]
//! ```
//! `Resume` always targets the failing child only; `Escalate` targets the supervisor.

use std::fmt;
use std::time::Duration;

use crate::actor::ActorAddress;
use crate::policies::BackoffPolicy;
use crate::supervision::decision::{
    Decider, SupervisionContext, SupervisionDecision, SupervisorStrategies,
};

/// Which children a restart/stop decision applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyKind {
    /// Only the failing child.
    OneForOne,
    /// The failing child and every sibling.
    AllForOne,
    /// The failing child and every sibling created after it.
    RestForOne,
}

/// Failure-handling policy of a supervisor.
#[derive(Clone)]
pub struct SupervisorStrategy {
    kind: StrategyKind,
    max_retries: u32,
    within: Duration,
    decider: Decider,
    backoff: BackoffPolicy,
}

impl SupervisorStrategy {
    fn with_kind(kind: StrategyKind, max_retries: u32, within: Duration, decider: Option<Decider>) -> Self {
        Self {
            kind,
            max_retries,
            within,
            decider: decider.unwrap_or_else(SupervisorStrategies::restart),
            backoff: BackoffPolicy::default(),
        }
    }

    /// One-For-One: act on the failing child only.
    ///
    /// `decider = None` restarts until more than `max_retries` failures happen within `within`.
    pub fn one_for_one(max_retries: u32, within: Duration, decider: Option<Decider>) -> Self {
        Self::with_kind(StrategyKind::OneForOne, max_retries, within, decider)
    }

    /// All-For-One: restart/stop the failing child together with all its siblings.
    pub fn all_for_one(max_retries: u32, within: Duration, decider: Option<Decider>) -> Self {
        Self::with_kind(StrategyKind::AllForOne, max_retries, within, decider)
    }

    /// Rest-For-One: restart/stop the failing child and the siblings created after it.
    pub fn rest_for_one(max_retries: u32, within: Duration, decider: Option<Decider>) -> Self {
        Self::with_kind(StrategyKind::RestForOne, max_retries, within, decider)
    }

    /// Replaces the restart backoff.
    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Strategy kind.
    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    /// Failures tolerated inside the window before `Stop` is forced.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Length of the sliding failure window.
    pub fn within(&self) -> Duration {
        self.within
    }

    /// Restart backoff.
    pub fn backoff(&self) -> &BackoffPolicy {
        &self.backoff
    }

    /// Consults the decider.
    pub fn decide(&self, ctx: &SupervisionContext) -> SupervisionDecision {
        (self.decider)(ctx)
    }

    /// True if `failures` (including the latest) exceed the retry budget.
    pub fn is_exhausted(&self, failures: usize) -> bool {
        failures > self.max_retries as usize
    }

    /// Children a restart/stop decision applies to, in creation order.
    ///
    /// `siblings` is the supervisor's child list in creation order. The failing child is
    /// always part of the result, even if it is no longer listed.
    pub fn affected(&self, failed: &ActorAddress, siblings: &[ActorAddress]) -> Vec<ActorAddress> {
        let position = siblings.iter().position(|s| s == failed);
        match (self.kind, position) {
            (StrategyKind::OneForOne, _) | (_, None) => vec![failed.clone()],
            (StrategyKind::AllForOne, Some(_)) => siblings.to_vec(),
            (StrategyKind::RestForOne, Some(idx)) => siblings[idx..].to_vec(),
        }
    }
}

impl fmt::Debug for SupervisorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupervisorStrategy")
            .field("kind", &self.kind)
            .field("max_retries", &self.max_retries)
            .field("within", &self.within)
            .field("backoff", &self.backoff)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ActorError;
    use std::sync::Arc;
    use std::time::Instant;

    fn addrs(n: u64) -> Vec<ActorAddress> {
        (1..=n).map(|i| ActorAddress::new(i, "child".into())).collect()
    }

    #[test]
    fn scope_per_kind() {
        let kids = addrs(4);
        let failed = kids[2].clone();
        let window = Duration::from_secs(1);

        let one = SupervisorStrategy::one_for_one(3, window, None);
        assert_eq!(one.affected(&failed, &kids), vec![failed.clone()]);

        let all = SupervisorStrategy::all_for_one(3, window, None);
        assert_eq!(all.affected(&failed, &kids), kids);

        let rest = SupervisorStrategy::rest_for_one(3, window, None);
        assert_eq!(rest.affected(&failed, &kids), kids[2..].to_vec());
    }

    #[test]
    fn unknown_child_is_acted_on_alone() {
        let kids = addrs(3);
        let stranger = ActorAddress::new(99, "gone".into());
        let all = SupervisorStrategy::all_for_one(1, Duration::from_secs(1), None);
        assert_eq!(all.affected(&stranger, &kids), vec![stranger]);
    }

    #[test]
    fn default_decider_restarts_and_budget_forces_stop() {
        let strategy = SupervisorStrategy::one_for_one(2, Duration::from_secs(1), None);
        let ctx = SupervisionContext {
            child: ActorAddress::new(1, "feed".into()),
            error: ActorError::fail("boom"),
            retry_count: 1,
            window_start: Instant::now(),
        };
        assert_eq!(strategy.decide(&ctx), SupervisionDecision::Restart);
        assert!(!strategy.is_exhausted(2));
        assert!(strategy.is_exhausted(3));
    }

    #[test]
    fn custom_decider_sees_context() {
        let decider: Decider = Arc::new(|ctx: &SupervisionContext| {
            if ctx.retry_count == 0 {
                SupervisionDecision::Resume
            } else {
                SupervisionDecision::Escalate
            }
        });
        let strategy = SupervisorStrategy::rest_for_one(5, Duration::from_secs(1), Some(decider));
        let mut ctx = SupervisionContext {
            child: ActorAddress::new(1, "feed".into()),
            error: ActorError::fail("boom"),
            retry_count: 0,
            window_start: Instant::now(),
        };
        assert_eq!(strategy.decide(&ctx), SupervisionDecision::Resume);
        ctx.retry_count = 1;
        assert_eq!(strategy.decide(&ctx), SupervisionDecision::Escalate);
    }
}
