//! # Error Types
//!
//! Errors shared across crates. Registry failures are recoverable at the round
//! boundary, address errors only ever cost the offending token, and config
//! errors are fatal at startup.

use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

use crate::environment::Environment;

/// A registry call failed. Aborts the affected scope for the current round only.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry {address} is unreachable: {reason}")]
    Unreachable { address: String, reason: String },

    #[error("malformed registry response for {path}: {reason}")]
    Malformed { path: String, reason: String },

    #[error("no registry configured for environment {0}")]
    UnknownEnvironment(Environment),
}

/// Why a single `ip:port` token was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("missing ':' separator")]
    MissingSeparator,

    #[error("empty host")]
    EmptyHost,

    #[error("invalid port '{port}': {source}")]
    InvalidPort {
        port: String,
        #[source]
        source: ParseIntError,
    },

    #[error("port {0} is not positive")]
    NonPositivePort(i32),

    #[error("port {0} is out of range")]
    PortOutOfRange(i32),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
