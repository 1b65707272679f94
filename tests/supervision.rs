mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use actorvisor::{
    BackoffPolicy, EventKind, RuntimeError, SupervisionDecision, SupervisorStrategies, SupervisorStrategy,
    SystemConfig,
};
use common::{counted, counter, get, quick_config, system, wait_all, wait_for, wait_kind, Cmd};

fn immediate(strategy: SupervisorStrategy) -> SupervisorStrategy {
    strategy.with_backoff(BackoffPolicy::immediate())
}

#[tokio::test]
async fn restart_resets_state_and_runs_post_restart() {
    let sys = system(quick_config());
    let mut events = sys.subscribe();
    let restarts = Arc::new(AtomicUsize::new(0));
    let c = sys.create_actor(counted("pnl", &restarts), None).unwrap();

    sys.send(&c, Cmd::Add(5), None).unwrap();
    sys.send(&c, Cmd::Fail, None).unwrap();

    let failed = wait_kind(&mut events, EventKind::ActorFailed, &c).await;
    assert_eq!(failed.supervisor.as_deref(), Some(sys.root().to_string().as_str()));
    let decided = wait_kind(&mut events, EventKind::SupervisionDecided, &c).await;
    assert_eq!(decided.decision, Some(SupervisionDecision::Restart));
    wait_kind(&mut events, EventKind::ActorRestarted, &c).await;

    assert_eq!(restarts.load(Ordering::SeqCst), 1);
    assert_eq!(get(&sys, &c).await, 0);
    sys.shutdown().await.unwrap();
}

#[tokio::test]
async fn panics_are_supervised_like_errors() {
    let sys = system(quick_config());
    let mut events = sys.subscribe();
    let c = sys.create_actor(counter("quoter"), None).unwrap();

    sys.send(&c, Cmd::Panic, None).unwrap();

    let failed = wait_kind(&mut events, EventKind::ActorFailed, &c).await;
    assert_eq!(failed.reason.as_deref(), Some("panic: requested panic"));
    wait_kind(&mut events, EventKind::ActorRestarted, &c).await;
    assert!(sys.is_alive(&c));
    sys.shutdown().await.unwrap();
}

#[tokio::test]
async fn queued_messages_are_dropped_on_restart() {
    let sys = system(quick_config());
    let mut events = sys.subscribe();
    let sup = sys
        .create_actor(
            counter("sup").with_strategy(
                SupervisorStrategy::one_for_one(3, Duration::from_secs(1), None)
                    .with_backoff(BackoffPolicy::constant(Duration::from_millis(80))),
            ),
            None,
        )
        .unwrap();
    let c = sys.create_actor(counter("orders"), Some(&sup)).unwrap();

    let started = Instant::now();
    sys.send(&c, Cmd::Fail, None).unwrap();
    for _ in 0..3 {
        sys.send(&c, Cmd::Add(1), None).unwrap();
    }

    let scheduled = wait_kind(&mut events, EventKind::RestartScheduled, &c).await;
    assert_eq!(scheduled.delay_ms, Some(80));
    assert_eq!(scheduled.attempt, Some(0));
    let restarted = wait_kind(&mut events, EventKind::ActorRestarted, &c).await;
    assert!(started.elapsed() >= Duration::from_millis(80));
    assert_eq!(restarted.reason.as_deref(), Some("dropped 3 queued messages"));

    assert_eq!(get(&sys, &c).await, 0);
    sys.shutdown().await.unwrap();
}

#[tokio::test]
async fn exponential_backoff_grows_with_retries() {
    let sys = system(quick_config());
    let mut events = sys.subscribe();
    let sup = sys
        .create_actor(
            counter("sup").with_strategy(
                SupervisorStrategy::one_for_one(5, Duration::from_secs(5), None).with_backoff(
                    BackoffPolicy::exponential(Duration::from_millis(10), 2.0, Duration::from_secs(1)),
                ),
            ),
            None,
        )
        .unwrap();
    let c = sys.create_actor(counter("feed"), Some(&sup)).unwrap();

    let mut delays = Vec::new();
    for _ in 0..3 {
        sys.send(&c, Cmd::Fail, None).unwrap();
        let ev = wait_kind(&mut events, EventKind::RestartScheduled, &c).await;
        delays.push(ev.delay_ms);
        wait_kind(&mut events, EventKind::ActorRestarted, &c).await;
    }
    assert_eq!(delays, vec![Some(10), Some(20), Some(40)]);
    sys.shutdown().await.unwrap();
}

#[tokio::test]
async fn backoff_only_holds_the_failing_actor() {
    let sys = system(quick_config());
    let mut events = sys.subscribe();
    let desk = sys
        .create_actor(
            counter("desk").with_strategy(
                SupervisorStrategy::one_for_one(3, Duration::from_secs(5), None)
                    .with_backoff(BackoffPolicy::constant(Duration::from_millis(300))),
            ),
            None,
        )
        .unwrap();
    let flaky = sys.create_actor(counter("flaky"), Some(&desk)).unwrap();
    let peer = sys.create_actor(counter("peer"), Some(&desk)).unwrap();
    let other = sys.create_actor(counter("other"), None).unwrap();

    sys.send(&flaky, Cmd::Fail, None).unwrap();
    wait_kind(&mut events, EventKind::RestartScheduled, &flaky).await;
    let scheduled = Instant::now();

    sys.send(&peer, Cmd::Add(2), None).unwrap();
    sys.send(&other, Cmd::Add(3), None).unwrap();
    assert_eq!(get(&sys, &peer).await, 2);
    assert_eq!(get(&sys, &other).await, 3);
    assert_eq!(get(&sys, &desk).await, 0);
    assert!(scheduled.elapsed() < Duration::from_millis(150));

    wait_kind(&mut events, EventKind::ActorRestarted, &flaky).await;
    assert!(scheduled.elapsed() >= Duration::from_millis(250));
    sys.shutdown().await.unwrap();
}

#[tokio::test]
async fn exhausted_window_stops_the_child() {
    let sys = system(quick_config());
    let mut events = sys.subscribe();
    let sup = sys
        .create_actor(
            counter("sup").with_strategy(immediate(SupervisorStrategy::one_for_one(
                2,
                Duration::from_secs(1),
                None,
            ))),
            None,
        )
        .unwrap();
    let c = sys.create_actor(counter("risk"), Some(&sup)).unwrap();

    for _ in 0..2 {
        sys.send(&c, Cmd::Fail, None).unwrap();
        wait_kind(&mut events, EventKind::ActorRestarted, &c).await;
    }
    sys.send(&c, Cmd::Fail, None).unwrap();

    let exhausted = wait_kind(&mut events, EventKind::RetriesExhausted, &c).await;
    assert_eq!(exhausted.attempt, Some(3));
    let decided = wait_kind(&mut events, EventKind::SupervisionDecided, &c).await;
    assert_eq!(decided.decision, Some(SupervisionDecision::Stop));
    wait_kind(&mut events, EventKind::ActorStopped, &c).await;

    assert!(!sys.is_alive(&c));
    assert!(sys.children(&sup).is_empty());
    assert!(sys.is_alive(&sup));
    assert!(matches!(
        sys.send(&c, Cmd::Add(1), None),
        Err(RuntimeError::ActorNotFound { .. })
    ));
    sys.shutdown().await.unwrap();
}

#[tokio::test]
async fn old_failures_slide_out_of_the_window() {
    let sys = system(quick_config());
    let mut events = sys.subscribe();
    let sup = sys
        .create_actor(
            counter("sup").with_strategy(immediate(SupervisorStrategy::one_for_one(
                1,
                Duration::from_millis(200),
                None,
            ))),
            None,
        )
        .unwrap();
    let c = sys.create_actor(counter("feed"), Some(&sup)).unwrap();

    sys.send(&c, Cmd::Fail, None).unwrap();
    wait_kind(&mut events, EventKind::ActorRestarted, &c).await;

    tokio::time::sleep(Duration::from_millis(300)).await;
    sys.send(&c, Cmd::Fail, None).unwrap();
    let decided = wait_kind(&mut events, EventKind::SupervisionDecided, &c).await;
    assert_eq!(decided.decision, Some(SupervisionDecision::Restart));
    assert_eq!(decided.attempt, Some(0));
    wait_kind(&mut events, EventKind::ActorRestarted, &c).await;

    // a second failure inside the window exceeds max_retries = 1
    sys.send(&c, Cmd::Fail, None).unwrap();
    wait_kind(&mut events, EventKind::RetriesExhausted, &c).await;
    wait_kind(&mut events, EventKind::ActorStopped, &c).await;
    assert!(!sys.is_alive(&c));
    sys.shutdown().await.unwrap();
}

#[tokio::test]
async fn one_for_one_restarts_only_the_failed_child() {
    let sys = system(quick_config());
    let mut events = sys.subscribe();
    let restarts = Arc::new(AtomicUsize::new(0));
    let sup = sys
        .create_actor(
            counter("sup").with_strategy(immediate(SupervisorStrategy::one_for_one(
                3,
                Duration::from_secs(1),
                None,
            ))),
            None,
        )
        .unwrap();
    let kids: Vec<_> = ["a", "b", "c"]
        .iter()
        .map(|n| sys.create_actor(counted(n, &restarts), Some(&sup)).unwrap())
        .collect();

    sys.send(&kids[0], Cmd::Add(1), None).unwrap();
    sys.send(&kids[1], Cmd::Fail, None).unwrap();
    wait_kind(&mut events, EventKind::ActorRestarted, &kids[1]).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(restarts.load(Ordering::SeqCst), 1);
    assert_eq!(get(&sys, &kids[0]).await, 1);
    sys.shutdown().await.unwrap();
}

#[tokio::test]
async fn all_for_one_restarts_every_sibling() {
    let sys = system(quick_config());
    let mut events = sys.subscribe();
    let restarts = Arc::new(AtomicUsize::new(0));
    let sup = sys
        .create_actor(
            counter("sup").with_strategy(immediate(SupervisorStrategy::all_for_one(
                3,
                Duration::from_secs(1),
                None,
            ))),
            None,
        )
        .unwrap();
    let kids: Vec<_> = ["feed", "strategy", "orders"]
        .iter()
        .map(|n| sys.create_actor(counted(n, &restarts), Some(&sup)).unwrap())
        .collect();

    sys.send(&kids[0], Cmd::Add(7), None).unwrap();
    sys.send(&kids[1], Cmd::Fail, None).unwrap();

    let mut pending = kids.clone();
    while !pending.is_empty() {
        let ev = wait_for(&mut events, |ev| ev.kind == EventKind::ActorRestarted).await;
        pending.retain(|k| !ev.is_about(k));
    }

    assert_eq!(restarts.load(Ordering::SeqCst), 3);
    assert_eq!(get(&sys, &kids[0]).await, 0);
    assert_eq!(sys.children(&sup), kids);
    sys.shutdown().await.unwrap();
}

#[tokio::test]
async fn simultaneous_sibling_failures_restart_the_group_once() {
    let sys = system(quick_config());
    let mut events = sys.subscribe();
    let mut decisions = sys.subscribe();
    let restarts = Arc::new(AtomicUsize::new(0));
    let sup = sys
        .create_actor(
            counter("desk").with_strategy(immediate(SupervisorStrategy::all_for_one(
                5,
                Duration::from_secs(10),
                None,
            ))),
            None,
        )
        .unwrap();
    let kids: Vec<_> = ["quotes", "hedger", "router"]
        .iter()
        .map(|n| sys.create_actor(counted(n, &restarts), Some(&sup)).unwrap())
        .collect();

    // both reports queue up while the supervisor is busy
    sys.send(&sup, Cmd::Sleep(Duration::from_millis(100)), None).unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    sys.send(&kids[0], Cmd::Fail, None).unwrap();
    sys.send(&kids[1], Cmd::Fail, None).unwrap();

    let mut pending = kids.clone();
    while !pending.is_empty() {
        let ev = wait_for(&mut events, |ev| ev.kind == EventKind::ActorRestarted).await;
        pending.retain(|k| !ev.is_about(k));
    }
    sys.send(&kids[2], Cmd::Add(4), None).unwrap();
    assert_eq!(get(&sys, &kids[2]).await, 4);
    tokio::time::sleep(Duration::from_millis(100)).await;

    let mut decided = 0;
    while let Ok(ev) = decisions.try_recv() {
        if ev.kind == EventKind::SupervisionDecided {
            decided += 1;
        }
    }
    assert_eq!(decided, 1);
    assert_eq!(restarts.load(Ordering::SeqCst), 3);
    assert_eq!(get(&sys, &kids[2]).await, 4);
    sys.shutdown().await.unwrap();
}

#[tokio::test]
async fn rest_for_one_restarts_the_child_and_younger_siblings() {
    let sys = system(quick_config());
    let mut events = sys.subscribe();
    let restarts = Arc::new(AtomicUsize::new(0));
    let sup = sys
        .create_actor(
            counter("sup").with_strategy(immediate(SupervisorStrategy::rest_for_one(
                3,
                Duration::from_secs(1),
                None,
            ))),
            None,
        )
        .unwrap();
    let kids: Vec<_> = ["feed", "strategy", "orders"]
        .iter()
        .map(|n| sys.create_actor(counted(n, &restarts), Some(&sup)).unwrap())
        .collect();

    for k in &kids {
        sys.send(k, Cmd::Add(7), None).unwrap();
    }
    sys.send(&kids[1], Cmd::Fail, None).unwrap();

    let mut pending = kids[1..].to_vec();
    while !pending.is_empty() {
        let ev = wait_for(&mut events, |ev| ev.kind == EventKind::ActorRestarted).await;
        assert!(!ev.is_about(&kids[0]), "older sibling must not restart");
        pending.retain(|k| !ev.is_about(k));
    }

    assert_eq!(restarts.load(Ordering::SeqCst), 2);
    assert_eq!(get(&sys, &kids[0]).await, 7);
    assert_eq!(get(&sys, &kids[1]).await, 0);
    assert_eq!(get(&sys, &kids[2]).await, 0);
    sys.shutdown().await.unwrap();
}

#[tokio::test]
async fn all_for_one_stop_stops_every_sibling() {
    let sys = system(quick_config());
    let mut events = sys.subscribe();
    let sup = sys
        .create_actor(
            counter("sup").with_strategy(SupervisorStrategy::all_for_one(
                3,
                Duration::from_secs(1),
                Some(SupervisorStrategies::stop()),
            )),
            None,
        )
        .unwrap();
    let a = sys.create_actor(counter("a"), Some(&sup)).unwrap();
    let b = sys.create_actor(counter("b"), Some(&sup)).unwrap();

    sys.send(&b, Cmd::Fail, None).unwrap();
    wait_kind(&mut events, EventKind::ActorStopped, &a).await;

    assert!(!sys.is_alive(&a));
    assert!(!sys.is_alive(&b));
    assert!(sys.is_alive(&sup));
    sys.shutdown().await.unwrap();
}

#[tokio::test]
async fn resume_keeps_state_and_discards_the_failed_message() {
    let sys = system(quick_config());
    let mut events = sys.subscribe();
    let sup = sys
        .create_actor(
            counter("sup").with_strategy(SupervisorStrategy::one_for_one(
                3,
                Duration::from_secs(1),
                Some(SupervisorStrategies::resume()),
            )),
            None,
        )
        .unwrap();
    let c = sys.create_actor(counter("book"), Some(&sup)).unwrap();

    sys.send(&c, Cmd::Add(1), None).unwrap();
    sys.send(&c, Cmd::Add(1), None).unwrap();
    sys.send(&c, Cmd::Fail, None).unwrap();
    sys.send(&c, Cmd::Add(1), None).unwrap();

    wait_kind(&mut events, EventKind::ActorResumed, &c).await;
    assert_eq!(get(&sys, &c).await, 3);
    sys.shutdown().await.unwrap();
}

#[tokio::test]
async fn custom_decider_sees_the_retry_count() {
    let sys = system(quick_config());
    let mut events = sys.subscribe();
    let decider: actorvisor::Decider = Arc::new(|ctx: &actorvisor::SupervisionContext| {
        if ctx.retry_count == 0 {
            SupervisionDecision::Resume
        } else {
            SupervisionDecision::Stop
        }
    });
    let sup = sys
        .create_actor(
            counter("sup").with_strategy(SupervisorStrategy::one_for_one(
                5,
                Duration::from_secs(5),
                Some(decider),
            )),
            None,
        )
        .unwrap();
    let c = sys.create_actor(counter("algo"), Some(&sup)).unwrap();

    sys.send(&c, Cmd::Fail, None).unwrap();
    wait_kind(&mut events, EventKind::ActorResumed, &c).await;
    sys.send(&c, Cmd::Fail, None).unwrap();
    let decided = wait_kind(&mut events, EventKind::SupervisionDecided, &c).await;
    assert_eq!(decided.decision, Some(SupervisionDecision::Stop));
    assert_eq!(decided.attempt, Some(1));
    wait_kind(&mut events, EventKind::ActorStopped, &c).await;
    sys.shutdown().await.unwrap();
}

/// top (restart) ─► mid (escalate) ─► leaf
fn escalation_tree(
    sys: &actorvisor::ActorSystem,
    top_decider: actorvisor::Decider,
) -> (actorvisor::ActorAddress, actorvisor::ActorAddress, actorvisor::ActorAddress) {
    let top = sys
        .create_actor(
            counter("top").with_strategy(immediate(SupervisorStrategy::one_for_one(
                3,
                Duration::from_secs(1),
                Some(top_decider),
            ))),
            None,
        )
        .unwrap();
    let mid = sys
        .create_actor(
            counter("mid").with_strategy(SupervisorStrategy::one_for_one(
                3,
                Duration::from_secs(1),
                Some(SupervisorStrategies::escalate()),
            )),
            Some(&top),
        )
        .unwrap();
    let leaf = sys.create_actor(counter("leaf"), Some(&mid)).unwrap();
    (top, mid, leaf)
}

#[tokio::test]
async fn escalation_restarts_the_supervisor_and_its_subtree() {
    let sys = system(quick_config());
    let mut events = sys.subscribe();
    let (top, mid, leaf) = escalation_tree(&sys, SupervisorStrategies::restart());

    sys.send(&mid, Cmd::Add(3), None).unwrap();
    sys.send(&leaf, Cmd::Fail, None).unwrap();

    let escalated = wait_kind(&mut events, EventKind::Escalated, &mid).await;
    assert_eq!(escalated.supervisor.as_deref(), Some(top.to_string().as_str()));
    assert_eq!(escalated.reason.as_deref(), Some("error: requested failure"));
    wait_all(
        &mut events,
        &[(EventKind::ActorStopped, &leaf), (EventKind::ActorRestarted, &mid)],
    )
    .await;

    assert!(!sys.is_alive(&leaf));
    assert!(sys.children(&mid).is_empty());
    assert_eq!(get(&sys, &mid).await, 0);
    sys.shutdown().await.unwrap();
}

#[tokio::test]
async fn resuming_an_escalating_supervisor_resumes_the_child() {
    let sys = system(quick_config());
    let mut events = sys.subscribe();
    let (_top, mid, leaf) = escalation_tree(&sys, SupervisorStrategies::resume());

    sys.send(&leaf, Cmd::Add(2), None).unwrap();
    sys.send(&leaf, Cmd::Fail, None).unwrap();

    wait_kind(&mut events, EventKind::ActorResumed, &mid).await;
    wait_kind(&mut events, EventKind::ActorResumed, &leaf).await;
    assert_eq!(get(&sys, &leaf).await, 2);
    sys.shutdown().await.unwrap();
}

#[tokio::test]
async fn escalation_past_the_root_is_fatal() {
    let cfg = SystemConfig {
        root_strategy: Some(SupervisorStrategy::one_for_one(
            3,
            Duration::from_secs(1),
            Some(SupervisorStrategies::escalate()),
        )),
        ..quick_config()
    };
    let sys = system(cfg);
    let mut events = sys.subscribe();
    let c = sys.create_actor(counter("gateway"), None).unwrap();

    sys.send(&c, Cmd::Fail, None).unwrap();

    let fatal = wait_for(&mut events, |ev| ev.kind == EventKind::FatalEscalation).await;
    assert!(fatal.is_about(sys.root()));
    match sys.terminated().await {
        Err(RuntimeError::FatalEscalation { actor, .. }) => assert_eq!(actor, sys.root().to_string()),
        other => panic!("expected FatalEscalation, got {other:?}"),
    }
    assert!(!sys.is_alive(&c));
}
