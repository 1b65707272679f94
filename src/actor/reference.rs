//! # Typed actor handles.
//!
//! An [`ActorRef<M>`] is an [`ActorAddress`] that remembers the actor's message type.
//! Sends through it are checked by the compiler, so `MessageTypeMismatch` cannot happen:
//!
//! ```text
//! system.create_actor_ref(def) ─► ActorRef<B::Message>
//!   .send(M)                 ─► mailbox (no sender)
//!   .send_from(M, &me)       ─► mailbox (sender = me)
//!   .ask::<R>(M, timeout)    ─► reply R
//!   deref                    ─► &ActorAddress (children, stop, untyped APIs)
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::time::Duration;

use crate::actor::address::ActorAddress;
use crate::core::ActorSystem;
use crate::error::RuntimeError;

/// Address of an actor whose protocol is `M`.
///
/// Cheap to clone. Equality follows the address.
pub struct ActorRef<M> {
    address: ActorAddress,
    system: ActorSystem,
    _protocol: PhantomData<fn(M)>,
}

impl<M: Send + 'static> ActorRef<M> {
    pub(crate) fn new(system: ActorSystem, address: ActorAddress) -> Self {
        Self {
            address,
            system,
            _protocol: PhantomData,
        }
    }

    /// Untyped address of the actor.
    pub fn address(&self) -> &ActorAddress {
        &self.address
    }

    /// Enqueues `payload` without a sender.
    pub fn send(&self, payload: M) -> Result<(), RuntimeError> {
        self.system.send(&self.address, payload, None)
    }

    /// Enqueues `payload` with `sender` as the reply fallback.
    pub fn send_from(&self, payload: M, sender: &ActorAddress) -> Result<(), RuntimeError> {
        self.system.send(&self.address, payload, Some(sender))
    }

    /// Request/response; see [`ActorSystem::ask`].
    pub async fn ask<R: Send + 'static>(&self, payload: M, timeout: Duration) -> Result<R, RuntimeError> {
        self.system.ask(&self.address, payload, timeout).await
    }

    /// True while the actor is registered.
    pub fn is_alive(&self) -> bool {
        self.system.is_alive(&self.address)
    }
}

impl<M> Deref for ActorRef<M> {
    type Target = ActorAddress;

    fn deref(&self) -> &ActorAddress {
        &self.address
    }
}

impl<M> Clone for ActorRef<M> {
    fn clone(&self) -> Self {
        Self {
            address: self.address.clone(),
            system: self.system.clone(),
            _protocol: PhantomData,
        }
    }
}

impl<M> PartialEq for ActorRef<M> {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl<M> Eq for ActorRef<M> {}

impl<M> From<ActorRef<M>> for ActorAddress {
    fn from(actor: ActorRef<M>) -> Self {
        actor.address
    }
}

impl<M> fmt::Display for ActorRef<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.address, f)
    }
}

impl<M> fmt::Debug for ActorRef<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActorRef<{}>({})", std::any::type_name::<M>(), self.address)
    }
}
