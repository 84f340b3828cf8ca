use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use governor_common::environment::Environment;
use governor_common::network::host::Host;
use governor_common::registry::RegistryPath;
use governor_core::check::{CheckTask, LogChecker};
use governor_core::manager::HealthCheckManager;
use governor_core::pool::WorkerPool;
use governor_core::registry::MemoryRegistry;

/// Keeps every submitted host and replays scripted active counts.
#[derive(Default)]
pub struct RecordingPool {
    submitted: Mutex<Vec<Host>>,
    active: Mutex<VecDeque<usize>>,
    pub polls: AtomicUsize,
}

impl RecordingPool {
    pub fn with_active(counts: &[usize]) -> Self {
        Self {
            active: Mutex::new(counts.iter().copied().collect()),
            ..Default::default()
        }
    }

    pub fn hosts(&self) -> Vec<Host> {
        self.submitted.lock().unwrap().clone()
    }

    /// `(service, ip, port)` per submitted task, in submission order.
    pub fn endpoints(&self) -> Vec<(String, String, u16)> {
        self.hosts()
            .iter()
            .map(|host| (host.service.to_string(), host.ip.clone(), host.port))
            .collect()
    }
}

impl WorkerPool for RecordingPool {
    fn submit(&self, task: CheckTask) {
        self.submitted.lock().unwrap().push(task.host().clone());
    }

    fn active_count(&self) -> usize {
        self.polls.fetch_add(1, Ordering::SeqCst);
        self.active.lock().unwrap().pop_front().unwrap_or(0)
    }

    fn queue_len(&self) -> usize {
        0
    }

    fn completed_count(&self) -> u64 {
        self.submitted.lock().unwrap().len() as u64
    }
}

pub fn prod() -> Environment {
    Environment::new("prod", "zk-prod:2181")
}

pub fn root() -> RegistryPath {
    RegistryPath::root()
}

/// An HTTP service at `com/example/svc` on two hosts, next to a TCP-only one.
pub fn example_registry() -> MemoryRegistry {
    MemoryRegistry::new()
        .with_address(
            root().child("@HTTP@com^example^svc"),
            "10.0.0.1:8080,10.0.0.2:8080,10.0.0.3:9090",
        )
        .with_address(root().child("com^example^svc"), "10.0.0.1:8080,10.0.0.2:8080")
        .with_address(root().child("@TCP@other"), "10.0.0.9:7000")
        .with_address(root().child("other"), "10.0.0.9:7000")
}

pub fn manager(pool: Arc<RecordingPool>, registry: MemoryRegistry) -> HealthCheckManager {
    HealthCheckManager::new(pool, Arc::new(LogChecker))
        .with_interval(Duration::from_secs(30))
        .with_drain_poll_interval(Duration::from_secs(1))
        .with_environment(prod(), Arc::new(registry))
}
