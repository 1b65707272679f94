use std::sync::Arc;

use crate::core::{ActorSystem, SystemConfig};
use crate::subscribers::Subscribe;

/// Builder for an [`ActorSystem`] with explicit subscribers.
///
/// ```rust
/// use std::sync::Arc;
/// use actorvisor::{ActorSystem, Subscribe, SystemConfig};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let subscribers: Vec<Arc<dyn Subscribe>> = Vec::new();
/// let system = ActorSystem::builder(SystemConfig::default())
///     .with_subscribers(subscribers)
///     .build();
/// assert!(system.is_alive(system.root()));
/// # }
/// ```
pub struct SystemBuilder {
    cfg: SystemConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl SystemBuilder {
    /// Creates a builder without subscribers.
    pub fn new(cfg: SystemConfig) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets the event subscribers, each driven by its own worker and bounded queue.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Starts the event plumbing and the root guardian.
    ///
    /// Must be called inside a tokio runtime.
    pub fn build(self) -> ActorSystem {
        ActorSystem::new_internal(self.cfg, self.subscribers)
    }
}
