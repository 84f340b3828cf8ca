//! # Task Generation
//!
//! One pass over every configured environment:
//!
//! 1. List the children of `/DP/SERVER` and keep those carrying the HTTP
//!    marker. The address list of the marker node is the **allow-list**: an
//!    endpoint is only scheduled if its ip appears in it.
//! 2. Schedule the base service (`/DP/SERVER/<name>`), then, if the base has
//!    an address list at all, every group below it.
//! 3. Each address token is parsed, filtered against the allow-list and
//!    deduplicated per environment before a [`CheckTask`] is submitted.
//!
//! Malformed tokens are logged and skipped. A missing address list means there
//! is nothing to check.

use std::sync::Arc;

use governor_common::config::RegistryFailurePolicy;
use governor_common::environment::Environment;
use governor_common::error::RegistryError;
use governor_common::network::address::{self, Address};
use governor_common::network::host::{Service, ServiceId};
use governor_common::registry::{HttpServiceNode, RegistryPath};
use tracing::{debug, error, trace, warn};

use crate::address_set::AddressSet;
use crate::check::CheckTask;
use crate::error::RoundError;
use crate::manager::HealthCheckManager;
use crate::registry::Registry;
use crate::shutdown::ShutdownController;

/// What one environment produced in a round.
#[derive(Debug)]
pub struct EnvironmentReport {
    pub environment: Environment,
    /// Every service with an address list, including those that yielded no task.
    pub services: Vec<Service>,
    pub submitted: usize,
    /// Tokens that failed to parse.
    pub rejected: usize,
    /// Tokens whose ip is missing from the allow-list.
    pub filtered: usize,
    /// Tokens already scheduled earlier in the round.
    pub duplicates: usize,
    /// Set when the environment was skipped after a registry failure.
    pub error: Option<String>,
}

impl EnvironmentReport {
    fn new(environment: Environment) -> Self {
        Self {
            environment,
            services: Vec::new(),
            submitted: 0,
            rejected: 0,
            filtered: 0,
            duplicates: 0,
            error: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct RoundReport {
    pub environments: Vec<EnvironmentReport>,
}

impl RoundReport {
    pub fn submitted(&self) -> usize {
        self.environments.iter().map(|env| env.submitted).sum()
    }

    pub fn failed_environments(&self) -> impl Iterator<Item = &EnvironmentReport> {
        self.environments.iter().filter(|env| env.error.is_some())
    }
}

pub struct TaskGenerator<'a> {
    manager: &'a HealthCheckManager,
    shutdown: &'a ShutdownController,
}

impl<'a> TaskGenerator<'a> {
    pub fn new(manager: &'a HealthCheckManager, shutdown: &'a ShutdownController) -> Self {
        Self { manager, shutdown }
    }

    /// Walks every environment and submits one check task per unique address.
    ///
    /// Shutdown is honoured between environments. Registry failures either
    /// abort the rest of the round or only the failing environment, depending
    /// on the manager's [`RegistryFailurePolicy`].
    pub async fn generate_round(&self, addresses: &mut AddressSet) -> Result<RoundReport, RoundError> {
        let mut report = RoundReport::default();

        for env in self.manager.environments() {
            self.shutdown.check()?;

            let mut env_report = EnvironmentReport::new(env.clone());
            if let Err(source) = self.generate_environment(env, addresses, &mut env_report).await {
                match self.manager.registry_failure() {
                    RegistryFailurePolicy::AbortRound => {
                        return Err(RoundError::Registry {
                            environment: env.clone(),
                            source,
                        });
                    }
                    RegistryFailurePolicy::SkipEnvironment => {
                        error!(environment = %env, error = %source, "Skipping environment for this round");
                        env_report.error = Some(source.to_string());
                    }
                }
            }

            debug!(
                environment = %env,
                submitted = env_report.submitted,
                rejected = env_report.rejected,
                filtered = env_report.filtered,
                duplicates = env_report.duplicates,
                "Environment scanned"
            );
            report.environments.push(env_report);
        }

        Ok(report)
    }

    async fn generate_environment(
        &self,
        env: &Environment,
        addresses: &mut AddressSet,
        report: &mut EnvironmentReport,
    ) -> Result<(), RegistryError> {
        let registry = Arc::clone(self.manager.registry(env)?);
        let root = RegistryPath::root();

        for child in registry.get_children(&root).await? {
            let Some(node) = HttpServiceNode::parse(&child) else {
                trace!(environment = %env, node = %child, "Not an HTTP registration");
                continue;
            };

            let allow_list = registry
                .get_service_address(&root.child(node.marker_node()))
                .await?;
            self.generate_service(env, registry.as_ref(), &node, allow_list.as_deref(), addresses, report)
                .await?;
        }

        Ok(())
    }

    async fn generate_service(
        &self,
        env: &Environment,
        registry: &dyn Registry,
        node: &HttpServiceNode,
        allow_list: Option<&str>,
        addresses: &mut AddressSet,
        report: &mut EnvironmentReport,
    ) -> Result<(), RegistryError> {
        let url = node.url();
        let service_path = RegistryPath::root().child(node.stored_name());
        let allow_list = allow_list.unwrap_or_else(|| {
            debug!(environment = %env, service = %url, "No allow-list, nothing will be scheduled");
            ""
        });

        let hosts = registry.get_service_address(&service_path).await?;
        self.generate_target(env, &url, "", hosts.as_deref(), allow_list, addresses, report);

        if hosts.is_none() {
            return Ok(());
        }

        for group in registry.get_children(&service_path).await? {
            let group_hosts = registry
                .get_service_address(&service_path.child(group.as_str()))
                .await?;
            self.generate_target(env, &url, &group, group_hosts.as_deref(), allow_list, addresses, report);
        }

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn generate_target(
        &self,
        env: &Environment,
        url: &str,
        group: &str,
        hosts: Option<&str>,
        allow_list: &str,
        addresses: &mut AddressSet,
        report: &mut EnvironmentReport,
    ) {
        let Some(hosts) = hosts else {
            return;
        };

        let mut service = Service::new(ServiceId::new(env.clone(), url, group));

        for token in address::tokens(hosts) {
            let parsed = match Address::parse(token) {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!(environment = %env, group, reason = %e, "invalid address:{token} for service:{url}");
                    report.rejected += 1;
                    continue;
                }
            };

            if !allow_list.contains(parsed.ip.as_str()) {
                trace!(environment = %env, service = %service.id, address = token, "Address not in allow-list");
                report.filtered += 1;
                continue;
            }

            if !addresses.add(env, token) {
                report.duplicates += 1;
                continue;
            }

            let host = service.add_host(parsed);
            let task = CheckTask::new(host, Arc::clone(self.manager.checker()));
            self.manager.worker_pool().submit(task);
            report.submitted += 1;
        }

        report.services.push(service);
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
