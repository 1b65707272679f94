//! Message envelope delivered to an actor's mailbox.

use crate::actor::address::ActorAddress;

/// Immutable envelope around a payload.
///
/// - `sender`: who sent it (`None` for messages from outside the actor tree);
/// - `reply_to`: hidden one-shot address set by `ask`; replies go there first.
#[derive(Debug, Clone)]
pub struct Message<M> {
    /// Application payload (usually a closed enum per actor protocol).
    pub payload: M,
    /// Sending actor, if any.
    pub sender: Option<ActorAddress>,
    /// Reply target for request/response.
    pub reply_to: Option<ActorAddress>,
}

impl<M> Message<M> {
    /// Envelope with no sender and no reply target.
    pub fn new(payload: M) -> Self {
        Self {
            payload,
            sender: None,
            reply_to: None,
        }
    }

    /// Sets the sender.
    #[inline]
    pub fn with_sender(mut self, sender: Option<ActorAddress>) -> Self {
        self.sender = sender;
        self
    }

    /// Sets the reply target.
    #[inline]
    pub fn with_reply_to(mut self, reply_to: Option<ActorAddress>) -> Self {
        self.reply_to = reply_to;
        self
    }

    /// Where a reply to this message should go: `reply_to`, falling back to `sender`.
    pub fn reply_target(&self) -> Option<&ActorAddress> {
        self.reply_to.as_ref().or(self.sender.as_ref())
    }
}
