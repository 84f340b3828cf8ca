use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use governor_common::environment::Environment;
use governor_core::check::LogChecker;
use governor_core::manager::HealthCheckManager;
use governor_core::pool::{BoundedPool, WorkerPool};
use governor_core::registry::{self, MemoryRegistry};
use governor_core::round::{RoundController, RoundState};
use governor_core::shutdown::ShutdownController;
use tokio::time::Instant;

use crate::support::{RecordingPool, example_registry, manager, root};

#[tokio::test(start_paused = true)]
async fn drain_observes_idle_pool_before_the_round_ends() {
    let pool = Arc::new(RecordingPool::with_active(&[3, 1, 0]));
    let controller = RoundController::new(
        Arc::new(manager(pool.clone(), example_registry())),
        ShutdownController::new(),
    );

    let started = Instant::now();
    let report = controller.run_round().await.unwrap();

    assert_eq!(report.submitted(), 2);
    assert_eq!(pool.polls.load(Ordering::SeqCst), 3);
    assert_eq!(started.elapsed(), Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn every_round_starts_with_a_fresh_address_set() {
    let pool = Arc::new(RecordingPool::default());
    let controller = RoundController::new(
        Arc::new(manager(pool.clone(), example_registry())),
        ShutdownController::new(),
    );

    controller.run_round().await.unwrap();
    controller.run_round().await.unwrap();

    assert_eq!(pool.hosts().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn registry_changes_are_picked_up_next_round() {
    let pool = Arc::new(RecordingPool::default());
    let registry = Arc::new(example_registry());
    let manager = HealthCheckManager::new(pool.clone(), Arc::new(LogChecker))
        .with_environment(Environment::new("prod", "zk-prod:2181"), registry.clone());
    let controller = RoundController::new(Arc::new(manager), ShutdownController::new());

    controller.run_round().await.unwrap();
    registry.set_address(root().child("com^example^svc"), Some("10.0.0.3:9090".into()));
    let report = controller.run_round().await.unwrap();

    assert_eq!(report.submitted(), 1);
    assert_eq!(pool.hosts().last().unwrap().port, 9090);
}

#[tokio::test(start_paused = true)]
async fn loop_stops_on_shutdown_during_sleep() {
    let pool = Arc::new(RecordingPool::default());
    let shutdown = ShutdownController::new();
    let controller = Arc::new(RoundController::new(
        Arc::new(manager(pool.clone(), example_registry())),
        shutdown.clone(),
    ));
    let mut states = controller.subscribe();

    let runner = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move { controller.run().await }
    });

    states
        .wait_for(|state| *state == RoundState::Sleeping)
        .await
        .unwrap();
    shutdown.request_shutdown();
    runner.await.unwrap();

    assert_eq!(controller.state(), RoundState::Stopped);
    assert_eq!(pool.hosts().len(), 2);
}

#[tokio::test]
async fn snapshot_round_runs_checks_on_a_real_pool() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("prod.yaml");
    std::fs::write(
        &file,
        r#"
nodes:
  /DP/SERVER/@HTTP@com^example^svc: "10.0.0.1:8080,10.0.0.2:8080,10.0.0.3:9090"
  /DP/SERVER/com^example^svc: "10.0.0.1:8080,10.0.0.2:8080"
  /DP/SERVER/com^example^svc/canary: "10.0.0.3:9090"
"#,
    )
    .unwrap();

    let registry: MemoryRegistry = registry::load_snapshot(&file).unwrap();
    let pool = Arc::new(BoundedPool::new(2));
    let manager = HealthCheckManager::new(pool.clone(), Arc::new(LogChecker))
        .with_drain_poll_interval(Duration::from_millis(10))
        .with_environment(Environment::new("prod", "zk-prod:2181"), Arc::new(registry));
    let controller = RoundController::new(Arc::new(manager), ShutdownController::new());

    let report = controller.run_round().await.unwrap();

    assert_eq!(report.submitted(), 3);
    assert_eq!(pool.completed_count(), 3);
    assert_eq!(pool.active_count(), 0);
}
