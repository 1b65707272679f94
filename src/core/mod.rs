//! Runtime core: address table, dispatch loops, and system lifecycle.
//!
//! Public API from this module: [`ActorSystem`], [`SystemBuilder`], [`SystemConfig`].
//!
//! Internal modules:
//! - `mailbox`: typed mailboxes behind a type-erased delivery handle, control messages;
//! - `registry`: the concurrent address table (actors and hidden reply addresses);
//! - `runner`: one behavior invocation / hook call with panic capture;
//! - `cell`: the dispatch loop of one actor (suspend, resume, restart, stop);
//! - `system`: creation, messaging, stop, shutdown, fatal escalation;
//! - `shutdown`: OS signal handling.

mod builder;
mod cell;
mod config;
pub(crate) mod mailbox;
pub(crate) mod registry;
mod runner;
mod shutdown;
mod system;

pub use builder::SystemBuilder;
pub use config::SystemConfig;
pub use system::{create_actor_system, ActorSystem};
