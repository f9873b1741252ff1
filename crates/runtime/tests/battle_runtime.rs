//! Runtime behaviour under tokio's paused clock.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use arena_content::{ContentFactory, PlayerLoadout};
use arena_core::{BattleError, BattleManager, BattleState, LogKind};
use arena_runtime::{BattleEvent, BattleRuntime, RuntimeConfig, RuntimeError};

fn battle(round: u32) -> BattleManager {
    let factory = ContentFactory::embedded().expect("embedded content loads");
    let player = factory
        .player(&PlayerLoadout::new("Hero"), round)
        .expect("player builds");
    let enemy = factory.enemy_for_round(round).expect("enemy builds");
    BattleManager::new(player, enemy, round)
        .with_config(factory.config().clone())
        .with_seed(11)
}

fn runtime(battle: BattleManager) -> BattleRuntime {
    let config = RuntimeConfig {
        event_buffer_size: 8192,
        ..RuntimeConfig::default()
    };
    BattleRuntime::builder()
        .config(config)
        .battle(battle)
        .build()
        .expect("runtime builds")
}

#[tokio::test(start_paused = true)]
async fn battle_ticks_until_it_ends() {
    let runtime = runtime(battle(1));
    let handle = runtime.handle();
    let mut events = handle.subscribe_events();

    handle.start().await.expect("battle starts");

    let mut ticks = 0;
    let mut logs = Vec::new();
    let (winner, outcome) = loop {
        match events.recv().await.expect("event stream open") {
            BattleEvent::Tick { .. } => ticks += 1,
            BattleEvent::Log(entry) => logs.push(entry),
            BattleEvent::Ended { winner, outcome } => break (winner, outcome),
            _ => {}
        }
    };

    assert!(ticks > 0);
    assert!(logs[0].message.starts_with("Round 1:"));
    assert_eq!(logs.last().map(|e| e.kind), Some(LogKind::Victory));

    let snapshot = handle.snapshot().await.expect("snapshot");
    assert_eq!(snapshot.state, BattleState::Ended);
    assert_eq!(snapshot.outcome, outcome);
    assert_eq!(snapshot.winner(), winner);
    assert_eq!(snapshot.log.len(), logs.len());

    drop(handle);
    runtime.shutdown().await.expect("worker exits");
}

#[tokio::test(start_paused = true)]
async fn pause_freezes_the_battle_until_resumed() {
    let runtime = runtime(battle(1));
    let handle = runtime.handle();

    handle.start().await.expect("battle starts");
    tokio::time::sleep(Duration::from_millis(1_050)).await;
    handle.pause().await.expect("pause");

    let paused = handle.snapshot().await.expect("snapshot");
    assert!(paused.paused);
    assert_eq!(paused.state, BattleState::InProgress);

    tokio::time::sleep(Duration::from_secs(5)).await;
    let still = handle.snapshot().await.expect("snapshot");
    assert_eq!(still.turn_count, paused.turn_count);
    assert_eq!(still.log.len(), paused.log.len());

    assert!(!handle.toggle_pause().await.expect("toggle resumes"));
    tokio::time::sleep(Duration::from_secs(2)).await;
    let resumed = handle.snapshot().await.expect("snapshot");
    assert!(resumed.log.len() > still.log.len());
}

#[tokio::test(start_paused = true)]
async fn lifecycle_commands_require_a_running_battle() {
    let runtime = runtime(battle(1));
    let handle = runtime.handle();

    let err = handle.pause().await.expect_err("cannot pause before start");
    assert!(matches!(
        err,
        RuntimeError::Battle(BattleError::InvalidState { .. })
    ));
    assert!(handle.resume().await.is_err());
    assert!(handle.toggle_pause().await.is_err());

    handle.start().await.expect("battle starts");
    let err = handle.start().await.expect_err("cannot start twice");
    assert!(matches!(
        err,
        RuntimeError::Battle(BattleError::InvalidState { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn start_reports_blocking_reasons() {
    let factory = ContentFactory::embedded().expect("embedded content loads");
    let loadout = PlayerLoadout {
        actions: vec!["Slash".into()],
        ..PlayerLoadout::new("Hero")
    };
    let player = factory.player(&loadout, 1).expect("player builds");
    let enemy = factory.enemy_for_round(1).expect("enemy builds");
    let runtime = runtime(BattleManager::new(player, enemy, 1));
    let handle = runtime.handle();

    let reasons = handle.can_start().await.expect("query");
    assert_eq!(reasons.len(), 1);
    let err = handle.start().await.expect_err("wrong action count");
    assert!(matches!(
        err,
        RuntimeError::Battle(BattleError::CannotStart(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn listeners_survive_a_panicking_neighbour() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let runtime = BattleRuntime::builder()
        .battle(battle(1))
        .listener(|| panic!("listener failure"))
        .listener(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        })
        .build()
        .expect("runtime builds");
    let handle = runtime.handle();

    handle.start().await.expect("battle starts");
    let after_start = calls.load(Ordering::SeqCst);
    assert!(after_start >= 1, "start message notifies");

    tokio::time::sleep(Duration::from_millis(550)).await;
    assert!(calls.load(Ordering::SeqCst) > after_start);
    assert_eq!(
        handle.snapshot().await.expect("snapshot").state,
        BattleState::InProgress
    );
}

#[tokio::test(start_paused = true)]
async fn unsubscribed_listener_is_not_called() {
    let runtime = runtime(battle(1));
    let handle = runtime.handle();
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let subscription = handle.subscribe(move || {
        seen.fetch_add(1, Ordering::SeqCst);
    });
    let id = subscription.id();

    assert!(subscription.unsubscribe());
    assert!(!handle.unsubscribe(id));
    handle.start().await.expect("battle starts");
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn cleanup_and_replace() {
    let runtime = runtime(battle(1));
    let handle = runtime.handle();
    let mut events = handle.subscribe_events();

    handle.start().await.expect("battle starts");
    handle.cleanup().await.expect("cleanup");

    let snapshot = handle.snapshot().await.expect("snapshot");
    assert_eq!(snapshot.state, BattleState::Ended);
    assert_eq!(snapshot.outcome, None);

    let ended = loop {
        if let BattleEvent::Ended { winner, outcome } = events.recv().await.expect("open") {
            break (winner, outcome);
        }
    };
    assert_eq!(ended, (None, None));

    handle.replace(battle(2)).await.expect("replace");
    let fresh = handle.snapshot().await.expect("snapshot");
    assert_eq!(fresh.state, BattleState::NotStarted);
    assert_eq!(fresh.round, 2);
    handle.start().await.expect("replacement starts");
}

#[tokio::test]
async fn build_requires_a_battle() {
    assert!(matches!(
        BattleRuntime::builder().build(),
        Err(RuntimeError::MissingBattle)
    ));
}
