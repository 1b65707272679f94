//! # Event subscribers.
//!
//! [`Subscribe`] is the extension point for observing an [`ActorSystem`](crate::ActorSystem);
//! [`SubscriberSet`] drives every subscriber from its own bounded queue.
//!
//! ```text
//! dispatch loops ── publish(Event) ──► Bus ──► listener ──► SubscriberSet::emit
//!                                                               ├──► LogWriter (tracing)
//!                                                               └──► custom subscribers
//! ```
//!
//! Built-in:
//! - [`LogWriter`] (feature `logging`): renders events through `tracing`.

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
