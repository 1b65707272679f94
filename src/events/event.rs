//! # Runtime events emitted by the actor system.
//!
//! The [`EventKind`] enum classifies events across four categories:
//! - **Lifecycle**: actors starting, failing, restarting, resuming, stopping
//! - **Supervision**: decisions, exhausted retry windows, escalations
//! - **Delivery**: dead letters and ask timeouts
//! - **System**: shutdown, fatal escalation, subscriber health
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use actorvisor::{Event, EventKind, SupervisionDecision};
//!
//! let ev = Event::now(EventKind::SupervisionDecided)
//!     .with_actor("orders#7")
//!     .with_supervisor("risk#3")
//!     .with_decision(SupervisionDecision::Restart)
//!     .with_attempt(2)
//!     .with_delay(Duration::from_millis(400));
//!
//! assert_eq!(ev.kind, EventKind::SupervisionDecided);
//! assert_eq!(ev.actor.as_deref(), Some("orders#7"));
//! assert_eq!(ev.delay_ms, Some(400));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::actor::ActorAddress;
use crate::supervision::SupervisionDecision;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Actor lifecycle ===
    /// Dispatch loop started.
    ///
    /// Sets: `actor`, `supervisor` (absent for the root).
    ActorStarted,

    /// A behavior invocation failed; the actor is suspended until its supervisor decides.
    ///
    /// Sets: `actor`, `supervisor`, `reason`.
    ActorFailed,

    /// A restart was decided; the actor sleeps `delay_ms` before resetting.
    ///
    /// Sets: `actor`, `attempt` (retry count), `delay_ms`.
    RestartScheduled,

    /// State and mailbox were reset and `post_restart` ran.
    ///
    /// Sets: `actor`, `attempt` (retry count), `reason` (dropped queued messages, if any).
    ActorRestarted,

    /// The actor continues with its next message.
    ///
    /// Sets: `actor`.
    ActorResumed,

    /// Dispatch loop exited for good (after `pre_stop`).
    ///
    /// Sets: `actor`.
    ActorStopped,

    // === Supervision ===
    /// A supervisor chose a decision for a failed child.
    ///
    /// Sets: `actor` (child), `supervisor`, `decision`, `attempt` (retry count), `reason`.
    SupervisionDecided,

    /// The child's restart ledger exceeded `max_retries`; `Stop` is forced.
    ///
    /// Sets: `actor` (child), `supervisor`, `attempt` (failures in window).
    RetriesExhausted,

    /// A supervisor escalated a child failure to its own supervisor.
    ///
    /// Sets: `actor` (escalating supervisor), `supervisor` (receiver), `reason`.
    Escalated,

    // === Delivery ===
    /// A message was addressed to an unknown or stopped actor and dropped.
    ///
    /// Sets: `actor` (target), `reason`.
    DeadLetter,

    /// An ask got no reply in time.
    ///
    /// Sets: `actor` (asked), `timeout_ms`.
    AskTimedOut,

    // === System ===
    /// A failure escalated past the root; the whole tree is being torn down.
    ///
    /// Sets: `actor`, `reason`.
    FatalEscalation,

    /// Shutdown requested (explicit call or OS signal).
    ShutdownRequested,

    /// All actors stopped within the configured grace period.
    AllStoppedWithin,

    /// Grace period exceeded; some actors did not stop in time.
    GraceExceeded,

    /// A subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `actor` (subscriber name), `reason`.
    SubscriberOverflow,

    /// A subscriber panicked while processing an event.
    ///
    /// Sets: `actor` (subscriber name), `reason`.
    SubscriberPanicked,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Actor the event is about (display form of its address).
    pub actor: Option<Arc<str>>,
    /// Supervisor involved, if any.
    pub supervisor: Option<Arc<str>>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Supervision decision, for `SupervisionDecided`.
    pub decision: Option<SupervisionDecision>,
    /// Retry count or similar counter.
    pub attempt: Option<u32>,
    /// Restart delay in milliseconds.
    pub delay_ms: Option<u32>,
    /// Ask timeout in milliseconds.
    pub timeout_ms: Option<u32>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            actor: None,
            supervisor: None,
            reason: None,
            decision: None,
            attempt: None,
            delay_ms: None,
            timeout_ms: None,
        }
    }

    /// Attaches the actor the event is about.
    #[inline]
    pub fn with_actor(mut self, actor: impl Into<Arc<str>>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Attaches the involved supervisor.
    #[inline]
    pub fn with_supervisor(mut self, supervisor: impl Into<Arc<str>>) -> Self {
        self.supervisor = Some(supervisor.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a supervision decision.
    #[inline]
    pub fn with_decision(mut self, decision: SupervisionDecision) -> Self {
        self.decision = Some(decision);
        self
    }

    /// Attaches a counter (retry count, failures in window).
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a restart delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        self.delay_ms = Some(d.as_millis().min(u128::from(u32::MAX)) as u32);
        self
    }

    /// Attaches an ask timeout (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        self.timeout_ms = Some(d.as_millis().min(u128::from(u32::MAX)) as u32);
        self
    }

    /// Shorthand for an event about `address`.
    #[inline]
    pub(crate) fn about(kind: EventKind, address: &ActorAddress) -> Self {
        Event::now(kind).with_actor(address.to_string())
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::now(EventKind::SubscriberOverflow)
            .with_actor(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::now(EventKind::SubscriberPanicked)
            .with_actor(subscriber)
            .with_reason(info)
    }

    /// True if the event is about `address`.
    pub fn is_about(&self, address: &ActorAddress) -> bool {
        self.actor.as_deref() == Some(address.to_string().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic() {
        let a = Event::now(EventKind::ActorStarted);
        let b = Event::now(EventKind::ActorStopped);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn durations_saturate() {
        let ev = Event::now(EventKind::RestartScheduled).with_delay(Duration::from_secs(u64::MAX / 4));
        assert_eq!(ev.delay_ms, Some(u32::MAX));
    }

    #[test]
    fn about_matches_address() {
        let addr = ActorAddress::new(12, "tp".into());
        let ev = Event::about(EventKind::ActorResumed, &addr);
        assert!(ev.is_about(&addr));
        assert!(!ev.is_about(&ActorAddress::new(13, "tp".into())));
    }
}
