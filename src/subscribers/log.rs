//! # LogWriter: events rendered through `tracing`.
//!
//! Maps every [`Event`] to one `tracing` record with structured fields. Failures and
//! forced stops are `warn`, fatal escalation and exceeded grace are `error`, the rest is
//! `info`/`debug`. Install a `tracing` subscriber (e.g. `tracing-subscriber`) to see them.
//!
//! ## Example output (`tracing_subscriber::fmt`)
//! ```text
//! INFO  actorvisor: started actor="feed#3" supervisor="root#0"
//! WARN  actorvisor: failed actor="feed#3" supervisor="root#0" reason="error: socket closed"
//! INFO  actorvisor: decided actor="feed#3" supervisor="root#0" decision=restart retry=0
//! DEBUG actorvisor: restart scheduled actor="feed#3" delay_ms=100 retry=0
//! INFO  actorvisor: restarted actor="feed#3" retry=0
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Tracing-backed event writer.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Constructs a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let actor = e.actor.as_deref().unwrap_or("-");
        let supervisor = e.supervisor.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("-");

        match e.kind {
            EventKind::ActorStarted => {
                tracing::info!(seq = e.seq, actor, supervisor, "started");
            }
            EventKind::ActorFailed => {
                tracing::warn!(seq = e.seq, actor, supervisor, reason, "failed");
            }
            EventKind::SupervisionDecided => {
                let decision = e.decision.map(|d| d.as_label()).unwrap_or("-");
                tracing::info!(seq = e.seq, actor, supervisor, decision, retry = ?e.attempt, reason, "decided");
            }
            EventKind::RestartScheduled => {
                tracing::debug!(seq = e.seq, actor, delay_ms = ?e.delay_ms, retry = ?e.attempt, "restart scheduled");
            }
            EventKind::ActorRestarted => {
                tracing::info!(seq = e.seq, actor, retry = ?e.attempt, reason = ?e.reason, "restarted");
            }
            EventKind::ActorResumed => {
                tracing::info!(seq = e.seq, actor, "resumed");
            }
            EventKind::ActorStopped => {
                tracing::info!(seq = e.seq, actor, "stopped");
            }
            EventKind::RetriesExhausted => {
                tracing::warn!(seq = e.seq, actor, supervisor, failures = ?e.attempt, "retries exhausted, stopping");
            }
            EventKind::Escalated => {
                tracing::warn!(seq = e.seq, actor, supervisor, reason, "escalated");
            }
            EventKind::DeadLetter => {
                tracing::debug!(seq = e.seq, actor, reason, "dead letter");
            }
            EventKind::AskTimedOut => {
                tracing::debug!(seq = e.seq, actor, timeout_ms = ?e.timeout_ms, "ask timed out");
            }
            EventKind::FatalEscalation => {
                tracing::error!(seq = e.seq, actor, reason, "fatal escalation past the root");
            }
            EventKind::ShutdownRequested => {
                tracing::info!(seq = e.seq, "shutdown requested");
            }
            EventKind::AllStoppedWithin => {
                tracing::info!(seq = e.seq, "all actors stopped within grace");
            }
            EventKind::GraceExceeded => {
                tracing::error!(seq = e.seq, reason, "grace exceeded");
            }
            EventKind::SubscriberOverflow => {
                tracing::warn!(seq = e.seq, subscriber = actor, reason, "subscriber overflow");
            }
            EventKind::SubscriberPanicked => {
                tracing::error!(seq = e.seq, subscriber = actor, reason, "subscriber panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
