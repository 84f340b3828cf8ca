use std::sync::Arc;

use governor_core::address_set::AddressSet;
use governor_core::generator::{RoundReport, TaskGenerator};
use governor_core::manager::HealthCheckManager;
use governor_core::registry::MemoryRegistry;
use governor_core::shutdown::ShutdownController;

use crate::support::{RecordingPool, example_registry, manager, prod, root};

async fn generate(manager: &HealthCheckManager) -> RoundReport {
    let shutdown = ShutdownController::new();
    let mut addresses = AddressSet::new();
    TaskGenerator::new(manager, &shutdown)
        .generate_round(&mut addresses)
        .await
        .expect("round should succeed")
}

#[tokio::test]
async fn http_service_without_groups_yields_one_task_per_host() {
    let pool = Arc::new(RecordingPool::default());
    let manager = manager(pool.clone(), example_registry());

    let report = generate(&manager).await;

    assert_eq!(
        pool.endpoints(),
        vec![
            ("com/example/svc".to_string(), "10.0.0.1".to_string(), 8080),
            ("com/example/svc".to_string(), "10.0.0.2".to_string(), 8080),
        ]
    );
    assert_eq!(report.submitted(), 2);
    assert!(pool.hosts().iter().all(|host| host.service.environment == prod()));
}

#[tokio::test]
async fn non_http_children_never_yield_tasks() {
    let pool = Arc::new(RecordingPool::default());
    let manager = manager(pool.clone(), example_registry());

    generate(&manager).await;

    assert!(pool.hosts().iter().all(|host| host.ip != "10.0.0.9"));
}

#[tokio::test]
async fn canary_group_adds_a_third_task() {
    let pool = Arc::new(RecordingPool::default());
    let registry = example_registry()
        .with_address(root().child("com^example^svc").child("canary"), "10.0.0.3:9090");
    let manager = manager(pool.clone(), registry);

    let report = generate(&manager).await;

    let hosts = pool.hosts();
    assert_eq!(hosts.len(), 3);

    let canary = &hosts[2];
    assert_eq!(canary.service.url, "com/example/svc");
    assert_eq!(canary.service.group, "canary");
    assert_eq!((canary.ip.as_str(), canary.port), ("10.0.0.3", 9090));

    let services = &report.environments[0].services;
    assert_eq!(services.len(), 2);
    assert_eq!(services[1].hosts.len(), 1);
}

#[tokio::test]
async fn no_address_is_scheduled_twice_in_a_round() {
    let pool = Arc::new(RecordingPool::default());
    let registry = MemoryRegistry::new()
        .with_address(root().child("@HTTP@a"), "10.0.0.5:8080,10.0.0.6:8080")
        .with_address(root().child("a"), "10.0.0.5:8080,10.0.0.5:8080")
        .with_address(root().child("a").child("blue"), "10.0.0.5:8080,10.0.0.6:8080")
        .with_address(root().child("@HTTP@b"), "10.0.0.5:8080")
        .with_address(root().child("b"), "10.0.0.5:8080");
    let manager = manager(pool.clone(), registry);

    generate(&manager).await;

    let mut addresses: Vec<String> = pool
        .hosts()
        .iter()
        .map(|host| format!("{}:{}", host.ip, host.port))
        .collect();
    let total = addresses.len();
    addresses.sort();
    addresses.dedup();

    assert_eq!(total, addresses.len());
    assert_eq!(addresses, vec!["10.0.0.5:8080", "10.0.0.6:8080"]);
}

#[tokio::test]
async fn invalid_tokens_are_dropped_and_the_rest_survive() {
    let pool = Arc::new(RecordingPool::default());
    let registry = MemoryRegistry::new()
        .with_address(root().child("@HTTP@svc"), "10.0.0.5:8080")
        .with_address(
            root().child("svc"),
            "10.0.0.5:abc,10.0.0.5:0,10.0.0.5:-1,10.0.0.5,10.0.0.5:8080,10.0.0.5:8080",
        );
    let manager = manager(pool.clone(), registry);

    let report = generate(&manager).await;

    assert_eq!(
        pool.endpoints(),
        vec![("svc".to_string(), "10.0.0.5".to_string(), 8080)]
    );
    assert_eq!(report.environments[0].rejected, 4);
    assert_eq!(report.environments[0].duplicates, 1);
}
