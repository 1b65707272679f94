//! # Actor definitions.
//!
//! An [`ActorDefinition`] is the immutable blueprint an actor is created (and re-created on
//! restart) from:
//! - the [`Behavior`];
//! - the initial state, cloned on start and on every restart;
//! - an optional [`SupervisorStrategy`] applied to the actor's **children**;
//! - optional `post_restart` / `pre_stop` lifecycle hooks.
//!
//! Hooks are synchronous: they run inside the dispatch loop and may only use the
//! non-blocking parts of [`ActorContext`] (`send`, `spawn_child`, `stop`).

use std::future::Future;
use std::sync::Arc;

use crate::actor::behavior::{Behavior, BehaviorFn};
use crate::actor::context::ActorContext;
use crate::error::ActorError;
use crate::supervision::SupervisorStrategy;

/// Hook invoked after a restart reinitialised the state.
pub type RestartHook = Arc<dyn Fn(&ActorContext) + Send + Sync>;

/// Hook invoked once before the actor is permanently stopped, with its final state.
pub type StopHook<S> = Arc<dyn Fn(&S, &ActorContext) + Send + Sync>;

/// Blueprint of an actor.
pub struct ActorDefinition<B: Behavior> {
    name: Arc<str>,
    behavior: B,
    initial_state: B::State,
    strategy: Option<SupervisorStrategy>,
    post_restart: Option<RestartHook>,
    pre_stop: Option<StopHook<B::State>>,
}

impl<B: Behavior> ActorDefinition<B> {
    /// Creates a definition named `"actor"` with no strategy and no hooks.
    pub fn new(behavior: B, initial_state: B::State) -> Self {
        Self {
            name: Arc::from("actor"),
            behavior,
            initial_state,
            strategy: None,
            post_restart: None,
            pre_stop: None,
        }
    }

    /// Sets the display name used in the address and in events.
    pub fn with_name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the strategy used when this actor supervises its children.
    ///
    /// Without one, the system default from [`SystemConfig`](crate::SystemConfig) applies.
    pub fn with_strategy(mut self, strategy: SupervisorStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Sets the hook invoked after each restart.
    pub fn with_post_restart<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ActorContext) + Send + Sync + 'static,
    {
        self.post_restart = Some(Arc::new(hook));
        self
    }

    /// Sets the hook invoked once before the actor stops for good.
    pub fn with_pre_stop<F>(mut self, hook: F) -> Self
    where
        F: Fn(&B::State, &ActorContext) + Send + Sync + 'static,
    {
        self.pre_stop = Some(Arc::new(hook));
        self
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The behavior.
    pub fn behavior(&self) -> &B {
        &self.behavior
    }

    /// The initial state.
    pub fn initial_state(&self) -> &B::State {
        &self.initial_state
    }

    /// Strategy for this actor's children, if one was set.
    pub fn strategy(&self) -> Option<&SupervisorStrategy> {
        self.strategy.as_ref()
    }

    pub(crate) fn name_arc(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    pub(crate) fn post_restart(&self) -> Option<&RestartHook> {
        self.post_restart.as_ref()
    }

    pub(crate) fn pre_stop(&self) -> Option<&StopHook<B::State>> {
        self.pre_stop.as_ref()
    }
}

impl<S, M, F, Fut> ActorDefinition<BehaviorFn<S, M, F>>
where
    S: Clone + Send + Sync + 'static,
    M: Send + 'static,
    F: Fn(S, M, ActorContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<S, ActorError>> + Send + 'static,
{
    /// Creates a definition from a closure behavior.
    pub fn from_fn(initial_state: S, f: F) -> Self {
        Self::new(BehaviorFn::new(f), initial_state)
    }
}
