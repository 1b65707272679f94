//! # Actor behaviors.
//!
//! A [`Behavior`] is the message handler of an actor. It never owns mutable state:
//! the dispatch loop threads the current state in and replaces it with whatever
//! the behavior returns. A failed invocation leaves the previous state untouched,
//! which is what a `Resume` decision continues from.
//!
//! [`BehaviorFn`] wraps a closure `Fn(State, Message, ActorContext) -> Fut`, producing a
//! fresh future per message from an owned copy of the state.
//!
//! ## Example
//! ```rust
//! use actorvisor::{ActorContext, ActorDefinition, ActorError};
//!
//! enum Tick {
//!     Price(f64),
//!     Reset,
//! }
//!
//! let feed = ActorDefinition::from_fn(0.0_f64, |last: f64, msg: Tick, _ctx: ActorContext| async move {
//!     match msg {
//!         Tick::Price(p) if p <= 0.0 => Err(ActorError::fail("non-positive price")),
//!         Tick::Price(p) => Ok(p),
//!         Tick::Reset => Ok(0.0),
//!     }
//! })
//! .with_name("feed");
//!
//! assert_eq!(feed.name(), "feed");
//! ```

use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;

use crate::actor::context::ActorContext;
use crate::error::ActorError;

/// # Message handler of an actor.
///
/// `handle` receives the current state by reference and returns the next state.
/// Returning `Err` (or panicking) suspends the actor and hands the failure to its supervisor.
#[async_trait]
pub trait Behavior: Send + Sync + 'static {
    /// Private state of the actor. Cloned from the definition's initial state on start and restart.
    type State: Clone + Send + Sync + 'static;
    /// Message protocol accepted by the actor's mailbox.
    type Message: Send + 'static;

    /// Processes one message.
    async fn handle(
        &self,
        state: &Self::State,
        message: Self::Message,
        ctx: &ActorContext,
    ) -> Result<Self::State, ActorError>;
}

/// Closure-backed behavior.
///
/// Each invocation clones the state and the context into the closure so the produced
/// future is `'static`; no state is captured between messages.
pub struct BehaviorFn<S, M, F> {
    f: F,
    _protocol: PhantomData<fn(S, M) -> S>,
}

impl<S, M, F> BehaviorFn<S, M, F> {
    /// Wraps a closure.
    pub fn new(f: F) -> Self {
        Self {
            f,
            _protocol: PhantomData,
        }
    }
}

#[async_trait]
impl<S, M, F, Fut> Behavior for BehaviorFn<S, M, F>
where
    S: Clone + Send + Sync + 'static,
    M: Send + 'static,
    F: Fn(S, M, ActorContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<S, ActorError>> + Send + 'static,
{
    type State = S;
    type Message = M;

    async fn handle(&self, state: &S, message: M, ctx: &ActorContext) -> Result<S, ActorError> {
        (self.f)(state.clone(), message, ctx.clone()).await
    }
}
