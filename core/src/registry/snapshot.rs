//! Loads a registry tree from a YAML snapshot.
//!
//! ```yaml
//! nodes:
//!   /DP/SERVER/@HTTP@com^example^svc: "10.0.0.1:8080,10.0.0.2:8080"
//!   /DP/SERVER/com^example^svc: "10.0.0.1:8080,10.0.0.2:8080"
//!   /DP/SERVER/com^example^svc/canary: "10.0.0.3:9090"
//!   /DP/SERVER/com^example^idle: ~
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use governor_common::registry::RegistryPath;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::MemoryRegistry;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse snapshot {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("snapshot {path}: {reason}")]
    InvalidPath { path: PathBuf, reason: String },
}

#[derive(Debug, Deserialize)]
struct Snapshot {
    #[serde(default)]
    nodes: BTreeMap<String, Option<String>>,
}

pub fn load_snapshot(path: &Path) -> Result<MemoryRegistry, SnapshotError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_snapshot(&raw).map_err(|err| match err {
        ParseFailure::Yaml(source) => SnapshotError::Parse {
            path: path.to_path_buf(),
            source,
        },
        ParseFailure::Path(reason) => SnapshotError::InvalidPath {
            path: path.to_path_buf(),
            reason,
        },
    })
}

enum ParseFailure {
    Yaml(serde_yaml::Error),
    Path(String),
}

fn parse_snapshot(raw: &str) -> Result<MemoryRegistry, ParseFailure> {
    let snapshot: Snapshot = serde_yaml::from_str(raw).map_err(ParseFailure::Yaml)?;
    let registry = MemoryRegistry::new();

    for (node, address) in snapshot.nodes {
        let path: RegistryPath = node.parse().map_err(ParseFailure::Path)?;
        registry.set_address(path, address);
    }

    debug!(nodes = registry.len(), "Loaded registry snapshot");
    Ok(registry)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
