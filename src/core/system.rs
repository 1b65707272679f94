//! # ActorSystem: registry, messaging, lifecycle, and graceful shutdown.
//!
//! The [`ActorSystem`] owns the address table, the event bus, the [`SubscriberSet`], and
//! the root guardian every top-level actor is supervised by. It is a cheap handle
//! (`Arc` inside): clones refer to the same system.
//!
//! ## Architecture
//! ```text
//! create_actor(def, parent) ──► Registry.insert + attach to parent
//!                                 └──► TaskTracker.spawn(ActorCell::run)    (one task per actor)
//! create_actor_ref(def, parent) ──► same, wrapped as ActorRef<B::Message>
//!
//! send(to, payload) ──► Registry.deliver ──► mailbox of `to`
//!                              └─ unknown ─► DeadLetter + ActorNotFound
//!
//! ask(to, payload, timeout):
//!   Registry.register_reply() ─► hidden reply address ──► deliver(reply_to = hidden)
//!   └─► first reply / timeout ─► hidden address removed
//!
//! Event flow:
//!   ActorCell / engine ── publish(Event) ──► Bus ──► listener ──► SubscriberSet::emit
//!                                              └──► subscribe() receivers
//!
//! Shutdown path:
//!   shutdown() / run_until_signal()
//!     └─► Bus.publish(ShutdownRequested)
//!     └─► root token cancel()   → cascades to every actor token
//!     └─► TaskTracker.wait() within cfg.grace:
//!            ├─ all exited   → AllStoppedWithin
//!            └─ timeout      → GraceExceeded (names of actors still registered)
//!
//! Fatal path (failure escalated past the root):
//!   FatalEscalation event + tracing::error! ─► root token cancel() ─► terminated() = Err
//!   └─► exit(1) once loops are done (when cfg.exit_on_fatal)
//! ```
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use actorvisor::{ActorDefinition, ActorSystem, SystemConfig};
//!
//! #[derive(Debug)]
//! enum Quote {
//!     Tick(u64),
//!     Last,
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let system = ActorSystem::new(SystemConfig::default());
//!
//!     let def = ActorDefinition::from_fn(0u64, |last: u64, msg: Quote, ctx| async move {
//!         match msg {
//!             Quote::Tick(px) => Ok(px),
//!             Quote::Last => {
//!                 ctx.reply(last)?;
//!                 Ok(last)
//!             }
//!         }
//!     })
//!     .with_name("quotes");
//!
//!     let quotes = system.create_actor(def, None)?;
//!     system.send(&quotes, Quote::Tick(101), None)?;
//!     let last: u64 = system.ask(&quotes, Quote::Last, Duration::from_secs(1)).await?;
//!     assert_eq!(last, 101);
//!
//!     system.shutdown().await?;
//!     Ok(())
//! }
//! ```

use std::any::type_name;
use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::actor::{ActorAddress, ActorContext, ActorDefinition, ActorRef, Behavior};
use crate::core::builder::SystemBuilder;
use crate::core::cell::ActorCell;
use crate::core::config::SystemConfig;
use crate::core::mailbox::{DeliveryError, MailboxSender};
use crate::core::registry::{ActorRecord, Registry};
use crate::core::shutdown;
use crate::error::{ActorError, RuntimeError};
use crate::events::{Bus, Event, EventKind};
use crate::subscribers::{Subscribe, SubscriberSet};
use crate::supervision::engine::SupervisionEngine;

/// Behavior of the root guardian: ignores its own messages, supervises top-level actors.
struct Guardian;

#[async_trait]
impl Behavior for Guardian {
    type State = ();
    type Message = ();

    async fn handle(&self, _state: &(), _message: (), _ctx: &ActorContext) -> Result<(), ActorError> {
        Ok(())
    }
}

struct Inner {
    cfg: SystemConfig,
    registry: Registry,
    bus: Bus,
    subs: Arc<SubscriberSet>,
    token: CancellationToken,
    tracker: TaskTracker,
    root: ActorAddress,
    fatal: OnceLock<RuntimeError>,
}

/// Handle to a running actor system.
#[derive(Clone)]
pub struct ActorSystem {
    inner: Arc<Inner>,
}

impl ActorSystem {
    /// Creates a system with the default subscribers (the `tracing` [`LogWriter`](crate::LogWriter)
    /// when the `logging` feature is on).
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(cfg: SystemConfig) -> Self {
        Self::builder(cfg)
            .with_subscribers(default_subscribers())
            .build()
    }

    /// Starts building a system with custom subscribers.
    pub fn builder(cfg: SystemConfig) -> SystemBuilder {
        SystemBuilder::new(cfg)
    }

    pub(crate) fn new_internal(cfg: SystemConfig, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        let subs = Arc::new(SubscriberSet::new(subscribers, bus.clone()));
        let registry = Registry::new();
        let root = registry.allocate(Arc::from("root"));
        let root_strategy = cfg.root_strategy();

        let system = Self {
            inner: Arc::new(Inner {
                cfg,
                registry,
                bus,
                subs,
                token: CancellationToken::new(),
                tracker: TaskTracker::new(),
                root: root.clone(),
                fatal: OnceLock::new(),
            }),
        };

        system.subscriber_listener();
        let guardian = ActorDefinition::new(Guardian, ()).with_strategy(root_strategy);
        let token = system.inner.token.child_token();
        system.spawn_cell(root, None, guardian, token);
        system
    }

    /// Forwards bus events to the subscriber set (fire-and-forget).
    fn subscriber_listener(&self) {
        if self.inner.subs.is_empty() {
            return;
        }
        let mut rx = self.inner.bus.subscribe();
        let set = Arc::clone(&self.inner.subs);
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => set.emit(&ev),
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }

    /// Address of the root guardian.
    pub fn root(&self) -> &ActorAddress {
        &self.inner.root
    }

    /// Configuration the system was built with.
    pub fn config(&self) -> &SystemConfig {
        &self.inner.cfg
    }

    /// Creates an actor supervised by `parent` (the root guardian when `None`).
    ///
    /// The actor is registered and its dispatch loop spawned before this returns.
    pub fn create_actor<B: Behavior>(
        &self,
        definition: ActorDefinition<B>,
        parent: Option<&ActorAddress>,
    ) -> Result<ActorAddress, RuntimeError> {
        let parent = parent.unwrap_or(&self.inner.root).clone();
        let token = self
            .inner
            .registry
            .token_of(&parent)
            .ok_or_else(|| RuntimeError::ActorNotFound {
                address: parent.to_string(),
            })?
            .child_token();

        let address = self.inner.registry.allocate(definition.name_arc());
        self.spawn_cell(address.clone(), Some(parent.clone()), definition, token);
        if !self.inner.registry.attach_child(&parent, address.clone()) {
            self.stop(&address);
            return Err(RuntimeError::ActorNotFound {
                address: parent.to_string(),
            });
        }
        Ok(address)
    }

    /// Same as [`create_actor`](Self::create_actor), returning a typed [`ActorRef`].
    pub fn create_actor_ref<B: Behavior>(
        &self,
        definition: ActorDefinition<B>,
        parent: Option<&ActorAddress>,
    ) -> Result<ActorRef<B::Message>, RuntimeError> {
        let address = self.create_actor(definition, parent)?;
        Ok(ActorRef::new(self.clone(), address))
    }

    fn spawn_cell<B: Behavior>(
        &self,
        address: ActorAddress,
        parent: Option<ActorAddress>,
        definition: ActorDefinition<B>,
        token: CancellationToken,
    ) {
        let (mailbox, mailbox_rx) = MailboxSender::<B::Message>::channel();
        let (control, control_rx) = mpsc::unbounded_channel();
        let strategy = definition
            .strategy()
            .cloned()
            .unwrap_or_else(|| self.inner.cfg.default_strategy());

        self.inner.registry.insert_actor(
            address.clone(),
            ActorRecord {
                parent: parent.clone(),
                children: Vec::new(),
                mailbox: Arc::new(mailbox),
                control,
                token: token.clone(),
                incarnation: 0,
            },
        );

        let cell = ActorCell::new(
            self.clone(),
            address,
            parent,
            definition,
            SupervisionEngine::new(strategy),
            mailbox_rx,
            control_rx,
            token,
        );
        self.inner.tracker.spawn(cell.run());
    }

    /// Enqueues `payload` for `to`. Never blocks.
    ///
    /// # Errors
    /// - [`RuntimeError::ActorNotFound`] if `to` is unknown or stopped (a `DeadLetter` is published);
    /// - [`RuntimeError::MessageTypeMismatch`] if `to` accepts another message type.
    pub fn send<M: Send + 'static>(
        &self,
        to: &ActorAddress,
        payload: M,
        sender: Option<&ActorAddress>,
    ) -> Result<(), RuntimeError> {
        self.inner
            .registry
            .deliver(to, Box::new(payload), sender.cloned(), None)
            .map_err(|err| self.undeliverable(to, err, type_name::<M>()))
    }

    /// Request/response: sends `payload` with a hidden reply address and waits for the
    /// first reply, at most `timeout`.
    pub async fn ask<M, R>(&self, to: &ActorAddress, payload: M, timeout: Duration) -> Result<R, RuntimeError>
    where
        M: Send + 'static,
        R: Send + 'static,
    {
        self.ask_from(None, to, payload, timeout).await
    }

    pub(crate) async fn ask_from<M, R>(
        &self,
        sender: Option<&ActorAddress>,
        to: &ActorAddress,
        payload: M,
        timeout: Duration,
    ) -> Result<R, RuntimeError>
    where
        M: Send + 'static,
        R: Send + 'static,
    {
        let registry = &self.inner.registry;
        let (reply_to, rx) = registry.register_reply();

        if let Err(err) = registry.deliver(to, Box::new(payload), sender.cloned(), Some(reply_to.clone())) {
            registry.remove_reply(&reply_to);
            return Err(self.undeliverable(to, err, type_name::<M>()));
        }

        let outcome = tokio::time::timeout(timeout, rx).await;
        registry.remove_reply(&reply_to);

        match outcome {
            Ok(Ok(reply)) => reply
                .downcast::<R>()
                .map(|r| *r)
                .map_err(|_| RuntimeError::ReplyTypeMismatch {
                    expected: type_name::<R>(),
                }),
            Ok(Err(_dropped)) => Err(RuntimeError::ReplyDropped {
                address: to.to_string(),
            }),
            Err(_elapsed) => {
                self.publish(Event::about(EventKind::AskTimedOut, to).with_timeout(timeout));
                Err(RuntimeError::AskTimeout {
                    address: to.to_string(),
                    timeout,
                })
            }
        }
    }

    fn undeliverable(&self, to: &ActorAddress, err: DeliveryError, got: &'static str) -> RuntimeError {
        let (reason, error) = match err {
            DeliveryError::TypeMismatch { expected } => (
                "type_mismatch",
                RuntimeError::MessageTypeMismatch {
                    address: to.to_string(),
                    expected,
                    got,
                },
            ),
            DeliveryError::NotFound | DeliveryError::Closed => (
                "not_found",
                RuntimeError::ActorNotFound {
                    address: to.to_string(),
                },
            ),
        };
        self.publish(Event::about(EventKind::DeadLetter, to).with_reason(reason));
        error
    }

    /// Permanently stops `address` and its descendants. Idempotent.
    ///
    /// In-flight invocations finish; each loop then runs `pre_stop` and publishes
    /// `ActorStopped`.
    pub fn stop(&self, address: &ActorAddress) {
        for (_, record) in self.inner.registry.remove_subtree(address) {
            record.token.cancel();
        }
    }

    /// True if `address` is a registered, not yet stopped actor.
    pub fn is_alive(&self, address: &ActorAddress) -> bool {
        self.inner.registry.contains_actor(address)
    }

    /// Children of `address` in creation order.
    pub fn children(&self, address: &ActorAddress) -> Vec<ActorAddress> {
        self.inner.registry.children(address)
    }

    /// Receiver of all events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.inner.bus.subscribe()
    }

    pub(crate) fn publish(&self, event: Event) {
        self.inner.bus.publish(event);
    }

    pub(crate) fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    /// Tears the tree down after a failure escalated past the root.
    pub(crate) fn fatal(&self, actor: &ActorAddress, error: ActorError) {
        tracing::error!(actor = %actor, error = %error, "failure escalated past the root supervisor");
        self.publish(Event::about(EventKind::FatalEscalation, actor).with_reason(error.as_message()));

        let _ = self.inner.fatal.set(RuntimeError::FatalEscalation {
            actor: actor.to_string(),
            error,
        });
        self.inner.token.cancel();

        if self.inner.cfg.exit_on_fatal {
            let system = self.clone();
            tokio::spawn(async move {
                let _ = system.wait_all_with_grace().await;
                std::process::exit(1);
            });
        }
    }

    /// Graceful shutdown: cancels every actor and waits up to `cfg.grace` for the loops.
    ///
    /// # Errors
    /// [`RuntimeError::GraceExceeded`] with the actors still registered when the grace ran out.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        self.publish(Event::now(EventKind::ShutdownRequested));
        self.inner.token.cancel();
        self.wait_all_with_grace().await
    }

    /// Resolves once the system stopped: `Ok` after a shutdown, `Err(FatalEscalation)`
    /// after a failure escalated past the root.
    pub async fn terminated(&self) -> Result<(), RuntimeError> {
        self.inner.token.cancelled().await;
        self.inner.tracker.close();
        let _ = tokio::time::timeout(self.inner.cfg.grace, self.inner.tracker.wait()).await;
        match self.inner.fatal.get() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Runs until an OS termination signal (then shuts down gracefully) or a fatal
    /// escalation.
    pub async fn run_until_signal(&self) -> Result<(), RuntimeError> {
        tokio::select! {
            _ = shutdown::wait_for_shutdown_signal() => self.shutdown().await,
            res = self.terminated() => res,
        }
    }

    async fn wait_all_with_grace(&self) -> Result<(), RuntimeError> {
        let grace = self.inner.cfg.grace;
        self.inner.tracker.close();

        match tokio::time::timeout(grace, self.inner.tracker.wait()).await {
            Ok(()) => {
                self.publish(Event::now(EventKind::AllStoppedWithin));
                Ok(())
            }
            Err(_) => {
                let stuck = self.inner.registry.actor_names();
                self.publish(Event::now(EventKind::GraceExceeded).with_reason(stuck.join(",")));
                Err(RuntimeError::GraceExceeded { grace, stuck })
            }
        }
    }
}

impl fmt::Debug for ActorSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorSystem")
            .field("root", &self.inner.root)
            .field("cfg", &self.inner.cfg)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "logging")]
fn default_subscribers() -> Vec<Arc<dyn Subscribe>> {
    vec![Arc::new(crate::subscribers::LogWriter::new())]
}

#[cfg(not(feature = "logging"))]
fn default_subscribers() -> Vec<Arc<dyn Subscribe>> {
    Vec::new()
}

/// Creates an actor system with [`SystemConfig::default`].
///
/// Must be called inside a tokio runtime.
pub fn create_actor_system() -> ActorSystem {
    ActorSystem::new(SystemConfig::default())
}
