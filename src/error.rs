//! Error types used by the actorvisor runtime and by actor behaviors.
//!
//! This module defines two main error enums:
//!
//! - [`RuntimeError`] — errors raised by the runtime itself (addressing, ask, shutdown).
//! - [`ActorError`] — errors raised by a behavior invocation; always routed to supervision.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by the actorvisor runtime.
///
/// Returned by [`ActorSystem`](crate::ActorSystem) and [`ActorContext`](crate::ActorContext)
/// operations. None of them crash an actor on their own; a behavior that propagates one
/// with `?` turns it into an [`ActorError`] and hands it to its supervisor.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum RuntimeError {
    /// The address is unknown or the actor behind it was permanently stopped.
    ///
    /// Sends to such addresses are never queued; a `DeadLetter` event is published.
    #[error("actor not found: {address}")]
    ActorNotFound {
        /// Display form of the address.
        address: String,
    },

    /// The actor exists but its mailbox carries a different message type.
    #[error("actor {address} does not accept messages of type {got} (expects {expected})")]
    MessageTypeMismatch {
        /// Display form of the address.
        address: String,
        /// Type name the mailbox accepts.
        expected: &'static str,
        /// Type name that was sent.
        got: &'static str,
    },

    /// No reply arrived within the ask window.
    #[error("ask to {address} timed out after {timeout:?}")]
    AskTimeout {
        /// Display form of the asked address.
        address: String,
        /// The configured ask timeout.
        timeout: Duration,
    },

    /// The hidden reply address was torn down before a reply arrived (system shutdown).
    #[error("reply channel for ask to {address} was dropped")]
    ReplyDropped {
        /// Display form of the asked address.
        address: String,
    },

    /// A reply arrived but had a different type than the asker expected.
    #[error("reply has unexpected type (expected {expected})")]
    ReplyTypeMismatch {
        /// Type name the asker expected.
        expected: &'static str,
    },

    /// `reply` was called while handling a message that has neither `reply_to` nor `sender`.
    #[error("current message has no reply target")]
    NoReplyTarget,

    /// A failure escalated past the root supervisor; the whole tree was torn down.
    #[error("fatal escalation from {actor}: {error}")]
    FatalEscalation {
        /// Display form of the actor whose failure reached the root.
        actor: String,
        /// The escalated failure.
        error: ActorError,
    },

    /// Shutdown grace period was exceeded; some actors were still registered.
    #[error("shutdown timeout {grace:?} exceeded; stuck: {stuck:?}")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Display names of actors that did not stop in time.
        stuck: Vec<String>,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use actorvisor::RuntimeError;
    ///
    /// let err = RuntimeError::ActorNotFound { address: "feed#3".into() };
    /// assert_eq!(err.as_label(), "runtime_actor_not_found");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::ActorNotFound { .. } => "runtime_actor_not_found",
            RuntimeError::MessageTypeMismatch { .. } => "runtime_message_type_mismatch",
            RuntimeError::AskTimeout { .. } => "runtime_ask_timeout",
            RuntimeError::ReplyDropped { .. } => "runtime_reply_dropped",
            RuntimeError::ReplyTypeMismatch { .. } => "runtime_reply_type_mismatch",
            RuntimeError::NoReplyTarget => "runtime_no_reply_target",
            RuntimeError::FatalEscalation { .. } => "runtime_fatal_escalation",
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::GraceExceeded { grace, stuck } => {
                format!("grace exceeded after {grace:?}; stuck actors={stuck:?}")
            }
            RuntimeError::FatalEscalation { actor, error } => {
                format!("fatal: {actor} escalated past root: {}", error.as_message())
            }
            other => other.to_string(),
        }
    }

    /// Indicates whether the caller may simply try again later.
    ///
    /// Ask timeouts are recoverable by contract; addressing errors are not.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RuntimeError::AskTimeout { .. })
    }
}

/// # Errors produced by a behavior invocation.
///
/// Returning one of these from [`Behavior::handle`](crate::Behavior::handle)
/// (or panicking) suspends the actor and hands the failure to its supervisor.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActorError {
    /// The behavior reported a failure.
    #[error("behavior failed: {reason}")]
    Fail {
        /// The underlying error message.
        reason: String,
    },

    /// The behavior (or a lifecycle hook) panicked.
    #[error("behavior panicked: {reason}")]
    Panicked {
        /// Panic payload rendered as text.
        reason: String,
    },
}

impl ActorError {
    /// Shorthand for [`ActorError::Fail`].
    ///
    /// ```
    /// use actorvisor::ActorError;
    ///
    /// let err = ActorError::fail("exchange rejected order");
    /// assert_eq!(err.as_label(), "actor_failed");
    /// ```
    pub fn fail(reason: impl Into<String>) -> Self {
        ActorError::Fail {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ActorError::Fail { .. } => "actor_failed",
            ActorError::Panicked { .. } => "actor_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ActorError::Fail { reason } => format!("error: {reason}"),
            ActorError::Panicked { reason } => format!("panic: {reason}"),
        }
    }

    /// Builds an [`ActorError::Panicked`] from a caught panic payload.
    pub(crate) fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        ActorError::Panicked {
            reason: panic_reason(payload),
        }
    }
}

/// Renders a caught panic payload as text.
pub(crate) fn panic_reason(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl From<RuntimeError> for ActorError {
    fn from(err: RuntimeError) -> Self {
        ActorError::Fail {
            reason: err.to_string(),
        }
    }
}
