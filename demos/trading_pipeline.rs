//! # Example: trading_pipeline
//!
//! A small trading pipeline: a quote feed pushes prices into a strategy, which sends
//! orders to a router. The router rejects oversized orders by failing, and its
//! supervisor restarts it with exponential backoff.
//!
//! ## Flow
//! ```text
//! root#0
//!  └─ desk            (OneForOne, 3 retries / 10s, backoff 50ms x2, equal jitter)
//!      ├─ router      qty > limit ─► Err ─► ActorFailed ─► desk: Restart
//!      ├─ strategy    px below threshold ──► router: Place{qty}
//!      └─ feed        px ──► strategy
//!
//! main ── ask(router, Open) ──► open orders
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example trading_pipeline
//! ```

use std::time::Duration;

use actorvisor::{
    ActorContext, ActorDefinition, ActorError, ActorRef, ActorSystem, BackoffPolicy, Behavior, JitterPolicy,
    SupervisorStrategy, SystemConfig,
};
use async_trait::async_trait;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum Order {
    Place { qty: u32 },
    Open,
}

/// Router with a hard size limit.
struct Router {
    limit: u32,
}

#[async_trait]
impl Behavior for Router {
    type State = u32;
    type Message = Order;

    async fn handle(&self, open: &u32, msg: Order, ctx: &ActorContext) -> Result<u32, ActorError> {
        match msg {
            Order::Place { qty } if qty > self.limit => {
                Err(ActorError::fail(format!("order of {qty} exceeds limit {}", self.limit)))
            }
            Order::Place { qty } => {
                println!("[router] placed {qty}");
                Ok(open + 1)
            }
            Order::Open => {
                ctx.reply(*open)?;
                Ok(*open)
            }
        }
    }
}

/// Buys when the price drops below `threshold`, sized by how far it dropped.
struct Momentum {
    router: ActorRef<Order>,
    threshold: f64,
}

#[async_trait]
impl Behavior for Momentum {
    type State = Option<f64>;
    type Message = f64;

    async fn handle(&self, _last: &Option<f64>, px: f64, ctx: &ActorContext) -> Result<Option<f64>, ActorError> {
        if px < self.threshold {
            let qty = ((self.threshold - px) * 10.0).round() as u32;
            self.router.send_from(Order::Place { qty }, ctx.myself())?;
        }
        Ok(Some(px))
    }
}

/// Supervisor of the pipeline; has no protocol of its own.
struct Desk;

#[async_trait]
impl Behavior for Desk {
    type State = ();
    type Message = ();

    async fn handle(&self, _: &(), _: (), _: &ActorContext) -> Result<(), ActorError> {
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = SystemConfig {
        grace: Duration::from_secs(5),
        ..SystemConfig::default()
    };
    let system = ActorSystem::new(cfg);

    let backoff = BackoffPolicy::exponential(Duration::from_millis(50), 2.0, Duration::from_secs(1))
        .with_jitter(JitterPolicy::Equal);
    let desk = system.create_actor(
        ActorDefinition::new(Desk, ())
            .with_name("desk")
            .with_strategy(SupervisorStrategy::one_for_one(3, Duration::from_secs(10), None).with_backoff(backoff)),
        None,
    )?;

    let router = system.create_actor_ref(
        ActorDefinition::new(Router { limit: 50 }, 0)
            .with_name("router")
            .with_post_restart(|ctx| println!("[router] {} restarted", ctx.myself())),
        Some(&desk),
    )?;
    let strategy = system.create_actor_ref(
        ActorDefinition::new(
            Momentum {
                router: router.clone(),
                threshold: 100.0,
            },
            None,
        )
        .with_name("strategy"),
        Some(&desk),
    )?;
    let feed = system.create_actor(
        ActorDefinition::from_fn(0u64, move |ticks: u64, px: f64, ctx: ActorContext| {
            let strategy = strategy.clone();
            async move {
                strategy.send_from(px, ctx.myself())?;
                Ok::<_, ActorError>(ticks + 1)
            }
        })
        .with_name("feed"),
        Some(&desk),
    )?;

    for px in [101.2, 99.5, 98.7, 92.0, 99.9, 97.3] {
        system.send(&feed, px, None)?;
        tokio::time::sleep(Duration::from_millis(30)).await;
    }
    tokio::time::sleep(Duration::from_millis(300)).await;

    let open: u32 = router.ask(Order::Open, Duration::from_secs(1)).await?;
    println!("[main] open orders since last restart: {open}");

    system.shutdown().await?;
    Ok(())
}
