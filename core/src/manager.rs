//! # Health Check Manager
//!
//! The context shared by the generator and the round controller: which
//! environments to scan, the registry behind each one, the worker pool and
//! the round timing.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use governor_common::config::{Config, RegistryFailurePolicy};
use governor_common::environment::Environment;
use governor_common::error::RegistryError;

use crate::check::Checker;
use crate::pool::WorkerPool;
use crate::registry::Registry;

pub struct HealthCheckManager {
    interval: Duration,
    drain_poll_interval: Duration,
    drain_log_every: u32,
    registry_failure: RegistryFailurePolicy,
    environments: Vec<Environment>,
    registries: HashMap<Environment, Arc<dyn Registry>>,
    pool: Arc<dyn WorkerPool>,
    checker: Arc<dyn Checker>,
}

impl HealthCheckManager {
    /// A manager with default timing and no environments.
    pub fn new(pool: Arc<dyn WorkerPool>, checker: Arc<dyn Checker>) -> Self {
        Self::from_config(&Config::default(), pool, checker)
    }

    /// Takes timing and failure policy from `config`. Environments still have
    /// to be added with their registries.
    pub fn from_config(
        config: &Config,
        pool: Arc<dyn WorkerPool>,
        checker: Arc<dyn Checker>,
    ) -> Self {
        Self {
            interval: config.interval(),
            drain_poll_interval: config.drain_poll_interval(),
            drain_log_every: config.drain_log_every.max(1),
            registry_failure: config.registry_failure,
            environments: Vec::new(),
            registries: HashMap::new(),
            pool,
            checker,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_drain_poll_interval(mut self, interval: Duration) -> Self {
        self.drain_poll_interval = interval;
        self
    }

    pub fn with_drain_log_every(mut self, polls: u32) -> Self {
        self.drain_log_every = polls.max(1);
        self
    }

    pub fn with_registry_failure(mut self, policy: RegistryFailurePolicy) -> Self {
        self.registry_failure = policy;
        self
    }

    pub fn with_environment(mut self, env: Environment, registry: Arc<dyn Registry>) -> Self {
        self.add_environment(env, registry);
        self
    }

    /// Environments are scanned in the order they were added. Re-adding one
    /// replaces its registry.
    pub fn add_environment(&mut self, env: Environment, registry: Arc<dyn Registry>) {
        if self.registries.insert(env.clone(), registry).is_none() {
            self.environments.push(env);
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn drain_poll_interval(&self) -> Duration {
        self.drain_poll_interval
    }

    pub fn drain_log_every(&self) -> u32 {
        self.drain_log_every
    }

    pub fn registry_failure(&self) -> RegistryFailurePolicy {
        self.registry_failure
    }

    pub fn environments(&self) -> &[Environment] {
        &self.environments
    }

    pub fn registry(&self, env: &Environment) -> Result<&Arc<dyn Registry>, RegistryError> {
        self.registries
            .get(env)
            .ok_or_else(|| RegistryError::UnknownEnvironment(env.clone()))
    }

    pub fn worker_pool(&self) -> &Arc<dyn WorkerPool> {
        &self.pool
    }

    pub fn checker(&self) -> &Arc<dyn Checker> {
        &self.checker
    }
}

impl fmt::Debug for HealthCheckManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HealthCheckManager")
            .field("interval", &self.interval)
            .field("drain_poll_interval", &self.drain_poll_interval)
            .field("drain_log_every", &self.drain_log_every)
            .field("registry_failure", &self.registry_failure)
            .field("environments", &self.environments)
            .finish_non_exhaustive()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
