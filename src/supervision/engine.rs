//! # Supervision engine.
//!
//! Owned by a supervisor's dispatch loop; turns `Supervise{child, incarnation, error}`
//! control messages into decisions and applies them.
//!
//! ```text
//! Supervise{child, incarnation, error}
//!   ├─ child no longer supervised by me ───────────────► Ignored
//!   ├─ incarnation already restarted ──────────────────► Ignored
//!   ├─ forget ledgers of children that are gone
//!   ├─ ledger.record(now, within)
//!   ├─ failures > max_retries ─► RetriesExhausted ─────► Stop
//!   ├─ else decider(SupervisionContext) ───────────────► Resume | Restart | Stop | Escalate
//!   └─ publish SupervisionDecided, then apply:
//!        Resume   → Resume sent to the child
//!        Restart  → new incarnation + Restart{backoff.delay(retry)} for every affected sibling
//!        Stop     → system.stop(every affected sibling)
//!        Escalate → remember the child, suspend myself, report upward
//! ```

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use crate::actor::ActorAddress;
use crate::core::mailbox::SystemMessage;
use crate::core::ActorSystem;
use crate::error::ActorError;
use crate::events::{Event, EventKind};
use crate::supervision::decision::{SupervisionContext, SupervisionDecision};
use crate::supervision::ledger::RestartLedger;
use crate::supervision::strategy::SupervisorStrategy;

/// Outcome of handling one child failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Verdict {
    /// The failure came from an actor that is no longer a child, or from a run of
    /// it that a restart already replaced.
    Ignored,
    /// A decision was applied locally.
    Handled(SupervisionDecision),
    /// The supervisor must fail with this error.
    Escalate(ActorError),
}

/// Per-supervisor failure handling state.
pub(crate) struct SupervisionEngine {
    strategy: SupervisorStrategy,
    ledgers: HashMap<ActorAddress, RestartLedger>,
    deferred: VecDeque<(ActorAddress, u64, ActorError)>,
    escalated: Vec<ActorAddress>,
}

impl SupervisionEngine {
    pub(crate) fn new(strategy: SupervisorStrategy) -> Self {
        Self {
            strategy,
            ledgers: HashMap::new(),
            deferred: VecDeque::new(),
            escalated: Vec::new(),
        }
    }

    /// Decides and applies the reaction to `child` failing with `error` while running
    /// as `incarnation`.
    pub(crate) fn handle_failure(
        &mut self,
        system: &ActorSystem,
        me: &ActorAddress,
        child: ActorAddress,
        incarnation: u64,
        error: ActorError,
    ) -> Verdict {
        let siblings = system.registry().children(me);
        if !siblings.contains(&child) || system.registry().incarnation_of(&child) != Some(incarnation) {
            return Verdict::Ignored;
        }
        self.ledgers.retain(|addr, _| siblings.contains(addr));

        let now = Instant::now();
        let ledger = self.ledgers.entry(child.clone()).or_default();
        let failures = ledger.record(now, self.strategy.within());
        let retry_count = ledger.retry_count();
        let window_start = ledger.window_start().unwrap_or(now);

        let decision = if self.strategy.is_exhausted(failures) {
            system.publish(
                Event::about(EventKind::RetriesExhausted, &child)
                    .with_supervisor(me.to_string())
                    .with_attempt(failures.min(u32::MAX as usize) as u32),
            );
            SupervisionDecision::Stop
        } else {
            self.strategy.decide(&SupervisionContext {
                child: child.clone(),
                error: error.clone(),
                retry_count,
                window_start,
            })
        };

        system.publish(
            Event::about(EventKind::SupervisionDecided, &child)
                .with_supervisor(me.to_string())
                .with_decision(decision)
                .with_attempt(retry_count)
                .with_reason(error.as_message()),
        );

        match decision {
            SupervisionDecision::Resume => {
                system.registry().control(&child, SystemMessage::Resume);
                Verdict::Handled(decision)
            }
            SupervisionDecision::Restart => {
                let delay = self.strategy.backoff().delay(retry_count);
                for addr in self.strategy.affected(&child, &siblings) {
                    let Some(incarnation) = system.registry().next_incarnation(&addr) else {
                        continue;
                    };
                    system.registry().control(
                        &addr,
                        SystemMessage::Restart {
                            delay,
                            retry: retry_count,
                            incarnation,
                        },
                    );
                }
                Verdict::Handled(decision)
            }
            SupervisionDecision::Stop => {
                for addr in self.strategy.affected(&child, &siblings) {
                    self.ledgers.remove(&addr);
                    system.stop(&addr);
                }
                Verdict::Handled(decision)
            }
            SupervisionDecision::Escalate => {
                self.escalated.push(child);
                Verdict::Escalate(error)
            }
        }
    }

    /// Queues a failure that arrived while this supervisor was suspended.
    pub(crate) fn defer(&mut self, child: ActorAddress, incarnation: u64, error: ActorError) {
        self.deferred.push_back((child, incarnation, error));
    }

    /// Takes the next deferred failure.
    pub(crate) fn next_deferred(&mut self) -> Option<(ActorAddress, u64, ActorError)> {
        self.deferred.pop_front()
    }

    /// Resumes the children whose failures this supervisor escalated.
    pub(crate) fn resume_escalated(&mut self, system: &ActorSystem) {
        for child in self.escalated.drain(..) {
            system.registry().control(&child, SystemMessage::Resume);
        }
    }

    /// Forgets everything; used when the supervisor restarts and its children are gone.
    pub(crate) fn reset(&mut self) {
        self.ledgers.clear();
        self.deferred.clear();
        self.escalated.clear();
    }
}
