//! # Run a single behavior invocation.
//!
//! Executes one `handle(&state, message, ctx)` call and folds every way it can go wrong
//! into an [`ActorError`]:
//!
//! ```text
//! handle() → Ok(state')          → Ok(state')
//!          → Err(ActorError)     → Err(error)
//!          → panic!(..)          → Err(ActorError::Panicked { reason })
//! ```
//!
//! Lifecycle hooks go through [`run_hook`] with the same panic folding.

use std::panic::AssertUnwindSafe;

use futures::FutureExt;

use crate::actor::{ActorContext, Behavior};
use crate::error::ActorError;

/// Invokes `behavior` once.
pub(crate) async fn run_once<B: Behavior>(
    behavior: &B,
    state: &B::State,
    message: B::Message,
    ctx: &ActorContext,
) -> Result<B::State, ActorError> {
    match AssertUnwindSafe(behavior.handle(state, message, ctx))
        .catch_unwind()
        .await
    {
        Ok(result) => result,
        Err(panic) => Err(ActorError::from_panic(&*panic)),
    }
}

/// Runs a synchronous lifecycle hook, turning a panic into an error.
pub(crate) fn run_hook(hook: impl FnOnce()) -> Result<(), ActorError> {
    std::panic::catch_unwind(AssertUnwindSafe(hook)).map_err(|panic| ActorError::from_panic(&*panic))
}
