//! # actorvisor
//!
//! **Actorvisor** is an in-process actor runtime with supervision trees, built for
//! long-running services such as trading bots: market-data feeds, strategies, risk
//! checks and order routers run as isolated actors, and failures are contained and
//! recovered by their supervisors instead of taking the process down.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!                         ┌──────────────────────────────┐
//!                         │  ActorSystem                 │
//!                         │  - Registry (address table)  │
//!                         │  - Bus (broadcast events)    │
//!                         │  - SubscriberSet             │
//!                         │  - TaskTracker + root token  │
//!                         └──────────────┬───────────────┘
//!                                        ▼
//!                                ┌───────────────┐
//!                                │  root#0       │ (guardian, SystemConfig strategy)
//!                                └───┬───────┬───┘
//!                                    ▼       ▼
//!                           ┌──────────┐  ┌──────────┐
//!                           │ feed#1   │  │ risk#2   │ (SupervisorStrategy)
//!                           └──────────┘  └────┬─────┘
//!                                              ▼
//!                                        ┌──────────┐
//!                                        │ orders#3 │
//!                                        └──────────┘
//!
//! every actor = one tokio task (ActorCell) with
//!   mailbox: mpsc<Message<M>>  +  control: mpsc<SystemMessage> (read first)
//!
//! publish(Event) ──► Bus ──► listener ──► SubscriberSet ──► LogWriter / custom
//! ```
//!
//! ### Failure handling
//! ```text
//! handle() Err / panic
//!   └─► child suspended, ActorFailed, Supervise{child, incarnation, error} ──► supervisor
//!         ├─ ledger.record(now, within); failures > max_retries ─► Stop
//!         └─ decider(SupervisionContext) ─► Resume | Restart | Stop | Escalate
//!               Resume   → next message, failed one discarded
//!               Restart  → backoff.delay(retry) then reset state/mailbox/children (scope)
//!               Stop     → permanent stop (scope), pre_stop runs
//!               Escalate → supervisor fails with the same error one level up
//!                          (past the root: fatal, tree torn down)
//!
//! scope: OneForOne → failing child; AllForOne → all siblings; RestForOne → child + younger siblings
//! ```
//!
//! ## Features
//! | Area              | Description                                                      | Key types / traits                                  |
//! |-------------------|------------------------------------------------------------------|-----------------------------------------------------|
//! | **Actors**        | Behaviors with explicit state, definitions, per-call context.    | [`Behavior`], [`ActorDefinition`], [`ActorContext`] |
//! | **Messaging**     | Fire-and-forget `send`, request/response `ask` with timeout.     | [`ActorSystem`], [`ActorAddress`], [`Message`]      |
//! | **Supervision**   | Strategies, deciders, sliding retry window.                      | [`SupervisorStrategy`], [`SupervisorStrategies`]    |
//! | **Policies**      | Restart backoff with jitter.                                     | [`BackoffPolicy`], [`JitterPolicy`]                 |
//! | **Events**        | Structured lifecycle events and pluggable subscribers.           | [`Event`], [`EventKind`], [`Subscribe`]             |
//! | **Errors**        | Typed runtime and behavior errors.                               | [`RuntimeError`], [`ActorError`]                    |
//! | **Configuration** | Grace period, bus sizing, root strategy, fatal handling.         | [`SystemConfig`]                                    |
//!
//! ## Optional features
//! - `logging` (default): exports [`LogWriter`], which renders events through `tracing`.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use async_trait::async_trait;
//! use actorvisor::{
//!     ActorContext, ActorDefinition, ActorError, ActorSystem, Behavior, SupervisorStrategy,
//!     SystemConfig,
//! };
//!
//! enum Order {
//!     Place { qty: u32 },
//!     Filled,
//! }
//!
//! struct Router;
//!
//! #[async_trait]
//! impl Behavior for Router {
//!     type State = u32;
//!     type Message = Order;
//!
//!     async fn handle(&self, open: &u32, msg: Order, ctx: &ActorContext) -> Result<u32, ActorError> {
//!         match msg {
//!             Order::Place { qty } if qty == 0 => Err(ActorError::fail("zero quantity")),
//!             Order::Place { .. } => Ok(open + 1),
//!             Order::Filled => {
//!                 ctx.reply(*open)?;
//!                 Ok(*open)
//!             }
//!         }
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let system = ActorSystem::new(SystemConfig::default());
//!
//!     let router = system.create_actor(
//!         ActorDefinition::new(Router, 0)
//!             .with_name("router")
//!             .with_strategy(SupervisorStrategy::one_for_one(3, Duration::from_secs(10), None)),
//!         None,
//!     )?;
//!
//!     system.send(&router, Order::Place { qty: 5 }, None)?;
//!     let open: u32 = system.ask(&router, Order::Filled, Duration::from_secs(1)).await?;
//!     assert_eq!(open, 1);
//!
//!     system.shutdown().await?;
//!     Ok(())
//! }
//! ```
mod actor;
mod core;
mod error;
mod events;
mod policies;
mod subscribers;
mod supervision;

// ---- Public re-exports ----

pub use actor::{
    ActorAddress, ActorContext, ActorDefinition, ActorRef, Behavior, BehaviorFn, Message, RestartHook,
    StopHook,
};
pub use crate::core::{create_actor_system, ActorSystem, SystemBuilder, SystemConfig};
pub use error::{ActorError, RuntimeError};
pub use events::{Event, EventKind};
pub use policies::{BackoffPolicy, JitterPolicy};
pub use subscribers::{Subscribe, SubscriberSet};
pub use supervision::{
    Decider, RestartLedger, StrategyKind, SupervisionContext, SupervisionDecision, SupervisorStrategies,
    SupervisorStrategy,
};

// Built-in `tracing` subscriber.
// Disable with: `--no-default-features`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
