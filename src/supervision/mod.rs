//! Supervision: strategies, deciders, retry windows, and the engine applying them.
//!
//! - [`SupervisorStrategy`] / [`StrategyKind`] scope and budget of a supervisor
//! - [`SupervisionDecision`], [`SupervisionContext`], [`Decider`], [`SupervisorStrategies`]
//! - [`RestartLedger`] sliding failure window per child
//! - `engine` (internal) runs inside each supervisor's dispatch loop

mod decision;
pub(crate) mod engine;
mod ledger;
mod strategy;

pub use decision::{Decider, SupervisionContext, SupervisionDecision, SupervisorStrategies};
pub use ledger::RestartLedger;
pub use strategy::{StrategyKind, SupervisorStrategy};
