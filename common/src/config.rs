//! # Configuration
//!
//! Loaded from a YAML file. Every tunable has a serde default so a minimal file
//! only needs to list environments.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::environment::Environment;
use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Pause between rounds, in seconds (default: 60)
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// How often the drain wait polls the worker pool, in milliseconds (default: 1000)
    #[serde(default = "default_drain_poll_interval")]
    pub drain_poll_interval_ms: u64,

    /// Emit a drain progress line every N polls (default: 10)
    #[serde(default = "default_drain_log_every")]
    pub drain_log_every: u32,

    /// Concurrent check tasks (default: 16)
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// What a registry failure in one environment does to the rest of the round
    #[serde(default)]
    pub registry_failure: RegistryFailurePolicy,

    #[serde(default)]
    pub environments: Vec<EnvironmentConfig>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryFailurePolicy {
    /// The first failure abandons the remaining environments for this round.
    #[default]
    AbortRound,
    /// The failing environment is logged and the sweep moves on.
    SkipEnvironment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub name: String,
    pub registry_address: String,
    /// Registry snapshot file backing this environment.
    pub snapshot: PathBuf,
}

impl EnvironmentConfig {
    pub fn environment(&self) -> Environment {
        Environment::new(&self.name, &self.registry_address)
    }
}

fn default_interval() -> u64 {
    60
}

fn default_drain_poll_interval() -> u64 {
    1_000
}

fn default_drain_log_every() -> u32 {
    10
}

fn default_workers() -> usize {
    16
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            drain_poll_interval_ms: default_drain_poll_interval(),
            drain_log_every: default_drain_log_every(),
            workers: default_workers(),
            registry_failure: RegistryFailurePolicy::default(),
            environments: Vec::new(),
        }
    }
}

impl Config {
    /// Reads a config file. Relative snapshot paths are resolved against the
    /// directory holding the config. Call [`Config::validate`] once command
    /// line overrides have been applied.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config: Config = serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(base) = path.parent() {
            for env in &mut config.environments {
                if env.snapshot.is_relative() {
                    env.snapshot = base.join(&env.snapshot);
                }
            }
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::Invalid("workers must be at least 1".into()));
        }
        if self.drain_poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "drain_poll_interval_ms must be positive".into(),
            ));
        }
        if self.drain_log_every == 0 {
            return Err(ConfigError::Invalid("drain_log_every must be positive".into()));
        }
        if self.environments.is_empty() {
            return Err(ConfigError::Invalid("no environments configured".into()));
        }

        let mut seen = HashSet::new();
        for env in &self.environments {
            if !seen.insert(env.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate environment '{}'",
                    env.name
                )));
            }
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn drain_poll_interval(&self) -> Duration {
        Duration::from_millis(self.drain_poll_interval_ms)
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
