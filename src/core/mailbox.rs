//! # Mailboxes and control messages.
//!
//! Every actor owns two unbounded channels:
//! - the **mailbox** of typed [`Message<M>`]s, fed through a type-erased [`Deliver`]
//!   handle stored in the registry;
//! - the **control** channel of [`SystemMessage`]s, read with priority by the dispatch loop.
//!
//! ```text
//! send(addr, Box<dyn Any>) ─► Registry ─► Arc<dyn Deliver> ─► downcast::<M>() ─► mpsc<Message<M>>
//!                                                                 └─ mismatch ─► TypeMismatch
//! ```

use std::any::{type_name, Any};
use std::time::Duration;

use tokio::sync::mpsc;

use crate::actor::{ActorAddress, Message};
use crate::error::ActorError;

/// Why a delivery did not reach a mailbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DeliveryError {
    /// No live actor or reply slot at the address.
    NotFound,
    /// The payload is not the actor's message type.
    TypeMismatch { expected: &'static str },
    /// The dispatch loop is gone.
    Closed,
}

/// Supervision traffic between an actor and its supervisor.
#[derive(Debug)]
pub(crate) enum SystemMessage {
    /// A child failed during `incarnation`; sent to its supervisor.
    Supervise {
        child: ActorAddress,
        incarnation: u64,
        error: ActorError,
    },
    /// Continue with the next user message.
    Resume,
    /// Sleep `delay`, then reset state, mailbox and children and run as `incarnation`.
    Restart {
        delay: Duration,
        retry: u32,
        incarnation: u64,
    },
}

/// Type-erased entry point of a typed mailbox.
pub(crate) trait Deliver: Send + Sync {
    /// Downcasts `payload` and enqueues it.
    fn deliver(
        &self,
        payload: Box<dyn Any + Send>,
        sender: Option<ActorAddress>,
        reply_to: Option<ActorAddress>,
    ) -> Result<(), DeliveryError>;
}

/// Sending half of a typed mailbox.
pub(crate) struct MailboxSender<M> {
    tx: mpsc::UnboundedSender<Message<M>>,
}

impl<M: Send + 'static> MailboxSender<M> {
    /// Creates a mailbox and returns both halves.
    pub(crate) fn channel() -> (Self, mpsc::UnboundedReceiver<Message<M>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl<M: Send + 'static> Deliver for MailboxSender<M> {
    fn deliver(
        &self,
        payload: Box<dyn Any + Send>,
        sender: Option<ActorAddress>,
        reply_to: Option<ActorAddress>,
    ) -> Result<(), DeliveryError> {
        let payload = payload.downcast::<M>().map_err(|_| DeliveryError::TypeMismatch {
            expected: type_name::<M>(),
        })?;
        let message = Message::new(*payload)
            .with_sender(sender)
            .with_reply_to(reply_to);
        self.tx.send(message).map_err(|_| DeliveryError::Closed)
    }
}
