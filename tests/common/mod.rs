#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use actorvisor::{
    ActorAddress, ActorContext, ActorDefinition, ActorError, ActorSystem, BackoffPolicy, Behavior, Event,
    EventKind, SystemConfig,
};
use async_trait::async_trait;
use tokio::sync::broadcast;

pub const WAIT: Duration = Duration::from_secs(3);
pub const ASK: Duration = Duration::from_secs(1);

/// Config for fast tests: immediate restarts, short grace, no process exit.
pub fn quick_config() -> SystemConfig {
    SystemConfig {
        grace: Duration::from_secs(2),
        backoff: BackoffPolicy::immediate(),
        exit_on_fatal: false,
        ..SystemConfig::default()
    }
}

/// System without subscribers.
pub fn system(cfg: SystemConfig) -> ActorSystem {
    ActorSystem::builder(cfg).build()
}

/// Waits for the first event matching `pred`, panicking after [`WAIT`].
pub async fn wait_for<F>(rx: &mut broadcast::Receiver<Event>, pred: F) -> Event
where
    F: Fn(&Event) -> bool,
{
    let found = tokio::time::timeout(WAIT, async {
        loop {
            match rx.recv().await {
                Ok(ev) if pred(&ev) => return ev,
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => panic!("bus closed"),
            }
        }
    })
    .await;
    found.expect("expected event was not published")
}

/// Waits for an event of `kind` about `addr`.
pub async fn wait_kind(rx: &mut broadcast::Receiver<Event>, kind: EventKind, addr: &ActorAddress) -> Event {
    wait_for(rx, |ev| ev.kind == kind && ev.is_about(addr)).await
}

/// Waits until every `(kind, addr)` pair was published, in any order.
pub async fn wait_all(rx: &mut broadcast::Receiver<Event>, expected: &[(EventKind, &ActorAddress)]) {
    let mut pending: Vec<(EventKind, ActorAddress)> =
        expected.iter().map(|(k, a)| (*k, (*a).clone())).collect();
    while !pending.is_empty() {
        let ev = wait_for(rx, |ev| pending.iter().any(|(k, a)| ev.kind == *k && ev.is_about(a))).await;
        pending.retain(|(k, a)| !(ev.kind == *k && ev.is_about(a)));
    }
}

/// Protocol of the test counter.
pub enum Cmd {
    Add(u64),
    Fail,
    Panic,
    Get,
    Sleep(Duration),
}

/// Counter that fails or panics on request.
pub struct Counter;

#[async_trait]
impl Behavior for Counter {
    type State = u64;
    type Message = Cmd;

    async fn handle(&self, total: &u64, msg: Cmd, ctx: &ActorContext) -> Result<u64, ActorError> {
        match msg {
            Cmd::Add(n) => Ok(total + n),
            Cmd::Fail => Err(ActorError::fail("requested failure")),
            Cmd::Panic => panic!("requested panic"),
            Cmd::Get => {
                ctx.reply(*total)?;
                Ok(*total)
            }
            Cmd::Sleep(d) => {
                tokio::time::sleep(d).await;
                Ok(*total)
            }
        }
    }
}

pub fn counter(name: &str) -> ActorDefinition<Counter> {
    ActorDefinition::new(Counter, 0).with_name(name.to_string())
}

/// Counter whose `post_restart` bumps `restarts`.
pub fn counted(name: &str, restarts: &Arc<AtomicUsize>) -> ActorDefinition<Counter> {
    let restarts = Arc::clone(restarts);
    counter(name).with_post_restart(move |_ctx| {
        restarts.fetch_add(1, Ordering::SeqCst);
    })
}

pub async fn get(system: &ActorSystem, addr: &ActorAddress) -> u64 {
    system
        .ask::<Cmd, u64>(addr, Cmd::Get, ASK)
        .await
        .expect("counter replies")
}
