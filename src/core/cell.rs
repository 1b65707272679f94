//! # ActorCell: the dispatch loop of one actor.
//!
//! Each actor runs as one tokio task owning its state, its mailbox receiver, its control
//! receiver and the supervision engine for its children.
//!
//! ## Loop
//! ```text
//! loop (biased select) {
//!   ├─► token cancelled                      → exit
//!   ├─► control message (priority)
//!   │     ├─ Supervise{child, inc, error}    → engine (deferred while suspended)
//!   │     ├─ Resume                          → Running, resume escalated children
//!   │     └─ Restart{delay, inc}             → sleep, stop children, drain mailbox,
//!   │                                          reset state, post_restart
//!   └─► user message (only while Running)
//!         ├─ Ok(state')                      → keep state'
//!         └─ Err / panic                     → Suspended, ActorFailed,
//!                                              Supervise → supervisor (root: fatal)
//! }
//! exit: pre_stop → forget in registry → ActorStopped
//! ```
//!
//! ## Rules
//! - Messages are processed one at a time in FIFO order; control messages never
//!   interrupt an in-flight invocation.
//! - While suspended no user message is consumed; the mailbox keeps accumulating.
//! - `pre_stop` runs exactly once, whatever the reason for stopping.

use tokio::select;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::actor::{ActorAddress, ActorContext, ActorDefinition, Behavior, Message};
use crate::core::mailbox::SystemMessage;
use crate::core::runner::{run_hook, run_once};
use crate::core::ActorSystem;
use crate::error::ActorError;
use crate::events::{Event, EventKind};
use crate::supervision::engine::{SupervisionEngine, Verdict};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Running,
    Suspended,
}

/// Owned state of a running actor.
pub(crate) struct ActorCell<B: Behavior> {
    system: ActorSystem,
    address: ActorAddress,
    parent: Option<ActorAddress>,
    definition: ActorDefinition<B>,
    state: B::State,
    phase: Phase,
    incarnation: u64,
    engine: SupervisionEngine,
    mailbox: mpsc::UnboundedReceiver<Message<B::Message>>,
    control: mpsc::UnboundedReceiver<SystemMessage>,
    token: CancellationToken,
}

impl<B: Behavior> ActorCell<B> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        system: ActorSystem,
        address: ActorAddress,
        parent: Option<ActorAddress>,
        definition: ActorDefinition<B>,
        engine: SupervisionEngine,
        mailbox: mpsc::UnboundedReceiver<Message<B::Message>>,
        control: mpsc::UnboundedReceiver<SystemMessage>,
        token: CancellationToken,
    ) -> Self {
        let state = definition.initial_state().clone();
        Self {
            system,
            address,
            parent,
            definition,
            state,
            phase: Phase::Running,
            incarnation: 0,
            engine,
            mailbox,
            control,
            token,
        }
    }

    /// Runs until the actor is stopped (explicitly, by supervision or by shutdown).
    pub(crate) async fn run(mut self) {
        let mut started = Event::about(EventKind::ActorStarted, &self.address);
        if let Some(parent) = &self.parent {
            started = started.with_supervisor(parent.to_string());
        }
        self.system.publish(started);

        loop {
            select! {
                biased;

                _ = self.token.cancelled() => break,
                ctrl = self.control.recv() => match ctrl {
                    Some(msg) => {
                        if !self.on_system(msg).await {
                            break;
                        }
                    }
                    None => break,
                },
                msg = self.mailbox.recv(), if self.phase == Phase::Running => match msg {
                    Some(message) => self.on_message(message).await,
                    None => break,
                },
            }
        }

        self.finish();
    }

    async fn on_message(&mut self, message: Message<B::Message>) {
        let Message {
            payload,
            sender,
            reply_to,
        } = message;
        let ctx = ActorContext::new(self.system.clone(), self.address.clone(), sender, reply_to);

        match run_once(self.definition.behavior(), &self.state, payload, &ctx).await {
            Ok(next) => self.state = next,
            Err(error) => self.fail(error),
        }
    }

    /// Handles one control message. Returns `false` if the loop must exit.
    async fn on_system(&mut self, msg: SystemMessage) -> bool {
        match msg {
            SystemMessage::Supervise {
                child,
                incarnation,
                error,
            } => {
                if self.phase == Phase::Suspended {
                    self.engine.defer(child, incarnation, error);
                } else {
                    self.supervise(child, incarnation, error);
                }
                true
            }
            SystemMessage::Resume => {
                if self.phase == Phase::Suspended {
                    self.phase = Phase::Running;
                    self.system
                        .publish(Event::about(EventKind::ActorResumed, &self.address));
                    self.engine.resume_escalated(&self.system);
                    self.drain_deferred();
                }
                true
            }
            SystemMessage::Restart {
                delay,
                retry,
                incarnation,
            } => {
                // failures of the run being replaced are no longer reported
                self.incarnation = incarnation;
                self.restart(delay, retry).await
            }
        }
    }

    fn supervise(&mut self, child: ActorAddress, incarnation: u64, error: ActorError) {
        if let Verdict::Escalate(error) =
            self.engine
                .handle_failure(&self.system, &self.address, child, incarnation, error)
        {
            let mut escalated = Event::about(EventKind::Escalated, &self.address)
                .with_reason(error.as_message());
            if let Some(parent) = &self.parent {
                escalated = escalated.with_supervisor(parent.to_string());
            }
            self.system.publish(escalated);
            self.fail(error);
        }
    }

    fn drain_deferred(&mut self) {
        while self.phase == Phase::Running {
            match self.engine.next_deferred() {
                Some((child, incarnation, error)) => self.supervise(child, incarnation, error),
                None => break,
            }
        }
    }

    /// Suspends the actor and reports `error` to its supervisor.
    fn fail(&mut self, error: ActorError) {
        self.phase = Phase::Suspended;

        let mut failed = Event::about(EventKind::ActorFailed, &self.address)
            .with_reason(error.as_message());
        if let Some(parent) = &self.parent {
            failed = failed.with_supervisor(parent.to_string());
        }
        self.system.publish(failed);

        match &self.parent {
            None => self.system.fatal(&self.address, error),
            Some(parent) => {
                let reported = self.system.registry().control(
                    parent,
                    SystemMessage::Supervise {
                        child: self.address.clone(),
                        incarnation: self.incarnation,
                        error,
                    },
                );
                if !reported {
                    // supervisor is gone; the subtree is being torn down
                    self.system.stop(&self.address);
                }
            }
        }
    }

    /// Backoff, then reset. Returns `false` if cancelled while waiting.
    async fn restart(&mut self, delay: std::time::Duration, retry: u32) -> bool {
        self.system.publish(
            Event::about(EventKind::RestartScheduled, &self.address)
                .with_attempt(retry)
                .with_delay(delay),
        );

        if !delay.is_zero() {
            let sleep = tokio::time::sleep(delay);
            tokio::pin!(sleep);
            select! {
                _ = &mut sleep => {}
                _ = self.token.cancelled() => return false,
            }
        }

        for child in self.system.registry().children(&self.address) {
            self.system.stop(&child);
        }
        let mut dropped: u32 = 0;
        while self.mailbox.try_recv().is_ok() {
            dropped = dropped.saturating_add(1);
        }
        self.state = self.definition.initial_state().clone();
        self.engine.reset();
        self.phase = Phase::Running;

        let outcome = match self.definition.post_restart() {
            Some(hook) => {
                let ctx = self.hook_context();
                run_hook(|| (**hook)(&ctx))
            }
            None => Ok(()),
        };

        let mut restarted = Event::about(EventKind::ActorRestarted, &self.address).with_attempt(retry);
        if dropped > 0 {
            restarted = restarted.with_reason(format!("dropped {dropped} queued messages"));
        }
        self.system.publish(restarted);
        if let Err(error) = outcome {
            self.fail(error);
        }
        true
    }

    fn finish(self) {
        let mut stopped = Event::about(EventKind::ActorStopped, &self.address);
        if let Some(hook) = self.definition.pre_stop() {
            let ctx = self.hook_context();
            if let Err(error) = run_hook(|| (**hook)(&self.state, &ctx)) {
                stopped = stopped.with_reason(error.as_message());
            }
        }
        self.system.registry().forget(&self.address);
        self.system.publish(stopped);
    }

    fn hook_context(&self) -> ActorContext {
        ActorContext::new(self.system.clone(), self.address.clone(), None, None)
    }
}
