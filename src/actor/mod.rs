//! # Actor building blocks.
//!
//! - [`ActorAddress`] - opaque, comparable mailbox handle
//! - [`Message`] - envelope (payload, sender, reply target)
//! - [`Behavior`] / [`BehaviorFn`] - message handlers threading explicit state
//! - [`ActorDefinition`] - blueprint (behavior + initial state + strategy + hooks)
//! - [`ActorContext`] - capabilities inside an invocation
//! - [`ActorRef`] - address that knows its actor's message type

mod address;
mod behavior;
mod context;
mod definition;
mod message;
mod reference;

pub use address::ActorAddress;
pub use behavior::{Behavior, BehaviorFn};
pub use context::ActorContext;
pub use definition::{ActorDefinition, RestartHook, StopHook};
pub use message::Message;
pub use reference::ActorRef;
