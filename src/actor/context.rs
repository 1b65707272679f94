//! # Per-invocation actor context.
//!
//! [`ActorContext`] is handed to every behavior invocation and lifecycle hook. It carries
//! the actor's own address, the sender and reply target of the current message, and a
//! handle to the owning [`ActorSystem`]. Everything an actor does to the outside world
//! goes through it:
//!
//! ```text
//! ctx.send(to, payload)           ─► mailbox of `to` (sender = myself), returns immediately
//! ctx.ask(to, payload, timeout)   ─► hidden reply address ─► awaits first reply / AskTimeout
//! ctx.reply(payload)              ─► reply_to, else sender of the current message
//! ctx.spawn_child(definition)     ─► new actor supervised by myself
//! ctx.spawn_child_ref(definition) ─► same, returned as a typed ActorRef
//! ctx.stop(address)               ─► permanent stop (idempotent)
//! ```

use std::time::Duration;

use crate::actor::address::ActorAddress;
use crate::actor::behavior::Behavior;
use crate::actor::definition::ActorDefinition;
use crate::actor::reference::ActorRef;
use crate::core::ActorSystem;
use crate::error::RuntimeError;

/// Capabilities available inside a behavior invocation.
///
/// Cheap to clone; clones refer to the same actor and message.
#[derive(Clone)]
pub struct ActorContext {
    system: ActorSystem,
    myself: ActorAddress,
    sender: Option<ActorAddress>,
    reply_to: Option<ActorAddress>,
}

impl ActorContext {
    pub(crate) fn new(
        system: ActorSystem,
        myself: ActorAddress,
        sender: Option<ActorAddress>,
        reply_to: Option<ActorAddress>,
    ) -> Self {
        Self {
            system,
            myself,
            sender,
            reply_to,
        }
    }

    /// Address of the actor running this invocation.
    pub fn myself(&self) -> &ActorAddress {
        &self.myself
    }

    /// Sender of the message being processed, if any.
    pub fn sender(&self) -> Option<&ActorAddress> {
        self.sender.as_ref()
    }

    /// Reply target of the message being processed, if any.
    pub fn reply_to(&self) -> Option<&ActorAddress> {
        self.reply_to.as_ref()
    }

    /// The owning actor system.
    pub fn system(&self) -> &ActorSystem {
        &self.system
    }

    /// Enqueues `payload` for `to` with this actor as sender.
    pub fn send<M: Send + 'static>(&self, to: &ActorAddress, payload: M) -> Result<(), RuntimeError> {
        self.system.send(to, payload, Some(&self.myself))
    }

    /// Request/response with this actor as sender.
    ///
    /// Suspends this invocation (not the thread) until the reply or the timeout.
    pub async fn ask<M, R>(&self, to: &ActorAddress, payload: M, timeout: Duration) -> Result<R, RuntimeError>
    where
        M: Send + 'static,
        R: Send + 'static,
    {
        self.system
            .ask_from(Some(&self.myself), to, payload, timeout)
            .await
    }

    /// Replies to the current message (to its `reply_to`, falling back to its sender).
    pub fn reply<R: Send + 'static>(&self, payload: R) -> Result<(), RuntimeError> {
        let target = self
            .reply_to
            .as_ref()
            .or(self.sender.as_ref())
            .ok_or(RuntimeError::NoReplyTarget)?;
        self.system.send(target, payload, Some(&self.myself))
    }

    /// Creates a child supervised by this actor.
    pub fn spawn_child<B: Behavior>(&self, definition: ActorDefinition<B>) -> Result<ActorAddress, RuntimeError> {
        self.system.create_actor(definition, Some(&self.myself))
    }

    /// Like [`spawn_child`](Self::spawn_child), keeping the child's message type.
    pub fn spawn_child_ref<B: Behavior>(
        &self,
        definition: ActorDefinition<B>,
    ) -> Result<ActorRef<B::Message>, RuntimeError> {
        self.system.create_actor_ref(definition, Some(&self.myself))
    }

    /// Permanently stops `address` and its subtree. Stopping `myself` takes effect after
    /// the current invocation returns.
    pub fn stop(&self, address: &ActorAddress) {
        self.system.stop(address);
    }
}
