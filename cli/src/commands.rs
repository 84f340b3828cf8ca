pub mod once;
pub mod run;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use governor_common::config::Config;
use governor_core::check::LogChecker;
use governor_core::manager::HealthCheckManager;
use governor_core::pool::BoundedPool;
use governor_core::registry;
use governor_core::shutdown::ShutdownController;
use tracing::info;

#[derive(Parser)]
#[command(name = "governor")]
#[command(about = "Schedules a health check for every HTTP endpoint in a service registry.")]
pub struct CommandLine {
    /// Configuration file
    #[arg(short, long, global = true, default_value = "governor.yaml")]
    pub config: PathBuf,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Seconds to sleep between rounds (overrides the config file)
    #[arg(short, long, global = true)]
    pub interval: Option<u64>,

    /// Concurrent check tasks (overrides the config file)
    #[arg(short, long, global = true)]
    pub workers: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan the registries forever, one round per interval
    #[command(alias = "r")]
    Run,
    /// Scan once, wait for the checks to finish and print a summary
    #[command(alias = "o")]
    Once,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(interval) = self.interval {
            cfg.interval_secs = interval;
        }
        if let Some(workers) = self.workers {
            cfg.workers = workers;
        }
    }
}

/// Loads every environment's registry snapshot and wires up the pool.
pub fn build_manager(cfg: &Config) -> anyhow::Result<HealthCheckManager> {
    let pool = Arc::new(BoundedPool::new(cfg.workers));
    let mut manager = HealthCheckManager::from_config(cfg, pool, Arc::new(LogChecker));

    for env_cfg in &cfg.environments {
        let registry = registry::load_snapshot(&env_cfg.snapshot)
            .with_context(|| format!("loading registry for environment '{}'", env_cfg.name))?;
        manager.add_environment(env_cfg.environment(), Arc::new(registry));
    }

    info!(
        environments = manager.environments().len(),
        workers = cfg.workers,
        "Health check manager ready"
    );
    Ok(manager)
}

/// Requests shutdown on the first Ctrl-C.
pub fn shutdown_on_ctrl_c() -> ShutdownController {
    let shutdown = ShutdownController::new();
    let signal = shutdown.clone();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, stopping after the current wait");
            signal.request_shutdown();
        }
    });

    shutdown
}
