//! # Example: supervision_tree
//!
//! Builds a three-level tree and walks a failure up through it:
//! the leaf fails, its supervisor escalates, the top supervisor restarts the middle
//! subtree. A custom subscriber prints every supervision decision.
//!
//! ## Flow
//! ```text
//! root#0
//!  └─ gateway   (RestForOne, restart)
//!      ├─ session  (OneForOne, escalate)
//!      │    └─ heartbeat     Fail ─► session escalates ─► gateway restarts session + book
//!      └─ book
//!
//! Subscriber: SupervisionDecided / Escalated / ActorStopped ──► println!
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example supervision_tree
//! ```

use std::sync::Arc;
use std::time::Duration;

use actorvisor::{
    ActorDefinition, ActorError, ActorSystem, BackoffPolicy, Event, EventKind, Subscribe,
    SupervisorStrategies, SupervisorStrategy, SystemConfig,
};
use tracing_subscriber::EnvFilter;

/// Prints supervision activity.
struct Console;

#[async_trait::async_trait]
impl Subscribe for Console {
    async fn on_event(&self, ev: &Event) {
        let actor = ev.actor.as_deref().unwrap_or("-");
        match ev.kind {
            EventKind::SupervisionDecided => println!(
                "[sub] {} decided {} for {actor} (retry {})",
                ev.supervisor.as_deref().unwrap_or("-"),
                ev.decision.map(|d| d.as_label()).unwrap_or("-"),
                ev.attempt.unwrap_or(0),
            ),
            EventKind::Escalated => println!("[sub] {actor} escalated: {}", ev.reason.as_deref().unwrap_or("-")),
            EventKind::ActorRestarted => println!("[sub] {actor} restarted"),
            EventKind::ActorStopped => println!("[sub] {actor} stopped"),
            _ => {}
        }
    }

    fn name(&self) -> &'static str {
        "console"
    }
}

enum Beat {
    Ok,
    Missed,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cfg = SystemConfig {
        grace: Duration::from_secs(2),
        backoff: BackoffPolicy::constant(Duration::from_millis(100)),
        ..SystemConfig::default()
    };
    let subscribers: Vec<Arc<dyn Subscribe>> = vec![Arc::new(Console), Arc::new(actorvisor::LogWriter::new())];
    let system = ActorSystem::builder(cfg).with_subscribers(subscribers).build();

    let idle = |name: &'static str| {
        ActorDefinition::from_fn((), |(), (): (), _ctx| async { Ok::<_, ActorError>(()) }).with_name(name)
    };

    let gateway = system.create_actor(
        idle("gateway").with_strategy(
            SupervisorStrategy::rest_for_one(2, Duration::from_secs(30), Some(SupervisorStrategies::restart()))
                .with_backoff(BackoffPolicy::exponential(
                    Duration::from_millis(50),
                    2.0,
                    Duration::from_secs(2),
                )),
        ),
        None,
    )?;
    let session = system.create_actor(
        idle("session").with_strategy(SupervisorStrategy::one_for_one(
            5,
            Duration::from_secs(30),
            Some(SupervisorStrategies::escalate()),
        )),
        Some(&gateway),
    )?;
    let _book = system.create_actor(idle("book"), Some(&gateway))?;

    let heartbeat = system.create_actor(
        ActorDefinition::from_fn(0u32, |missed: u32, beat: Beat, _ctx| async move {
            match beat {
                Beat::Ok => Ok(0),
                Beat::Missed if missed >= 1 => Err(ActorError::fail("two heartbeats missed")),
                Beat::Missed => Ok(missed + 1),
            }
        })
        .with_name("heartbeat"),
        Some(&session),
    )?;

    for beat in [Beat::Ok, Beat::Missed, Beat::Missed] {
        system.send(&heartbeat, beat, None)?;
    }
    tokio::time::sleep(Duration::from_millis(500)).await;

    println!("[main] session children after restart: {:?}", system.children(&session));
    println!("[main] heartbeat alive: {}", system.is_alive(&heartbeat));

    system.shutdown().await?;
    Ok(())
}
