//! # Registry Paths
//!
//! Services are published under a fixed root as `/DP/SERVER/<name>`, with
//! optional group nodes one level further down. Node names cannot contain `/`,
//! so a service identifier such as `com/example/svc` is stored as
//! `com^example^svc`.
//!
//! HTTP registrations are additionally published under a marker-prefixed node
//! (`@HTTP@com^example^svc`) whose address list acts as the protocol allow-list
//! for that service.

use std::fmt;
use std::str::FromStr;

/// Segments of the well-known registry root, `/DP/SERVER`.
pub const ROOT_SEGMENTS: [&str; 2] = ["DP", "SERVER"];

/// Prefix that marks a root child as an HTTP-capable service registration.
pub const HTTP_MARKER: &str = "@HTTP@";

/// Stands in for `/` inside a stored node name.
pub const ESCAPED_SEPARATOR: char = '^';

/// An absolute registry path, kept as a list of segments.
///
/// Paths are only ever joined through [`RegistryPath::child`], so a segment is
/// never split or re-escaped on the way to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistryPath {
    segments: Vec<String>,
}

impl RegistryPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// `/DP/SERVER`
    pub fn root() -> Self {
        Self::new(ROOT_SEGMENTS)
    }

    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.segments.split_last()?;
        Some(Self {
            segments: rest.to_vec(),
        })
    }

    /// Last segment, or `None` for `/`.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_parent_of(&self, other: &RegistryPath) -> bool {
        other.segments.len() == self.segments.len() + 1
            && other.segments.starts_with(&self.segments)
    }
}

impl fmt::Display for RegistryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for RegistryPath {
    type Err = String;

    /// Parses an absolute path such as `/DP/SERVER/com^example^svc`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.starts_with('/') {
            return Err(format!("registry path must be absolute: {s}"));
        }

        let segments: Vec<&str> = s[1..].split('/').collect();
        if s.len() > 1 && segments.iter().any(|segment| segment.is_empty()) {
            return Err(format!("registry path contains an empty segment: {s}"));
        }

        Ok(Self::new(segments.into_iter().filter(|segment| !segment.is_empty())))
    }
}

/// A root child that carries the HTTP marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpServiceNode {
    node: String,
}

impl HttpServiceNode {
    /// Returns `None` for children published under any other protocol, and for
    /// a bare marker with no service name behind it.
    pub fn parse(child: &str) -> Option<Self> {
        let stored = child.strip_prefix(HTTP_MARKER)?;
        if stored.is_empty() {
            return None;
        }
        Some(Self {
            node: child.to_string(),
        })
    }

    /// The full child name, marker included.
    pub fn marker_node(&self) -> &str {
        &self.node
    }

    /// The stored (still escaped) service name, used to build registry paths.
    pub fn stored_name(&self) -> &str {
        &self.node[HTTP_MARKER.len()..]
    }

    /// The human-readable service identifier.
    pub fn url(&self) -> String {
        unescape(self.stored_name())
    }
}

/// Translates every escaped separator back to `/`.
pub fn unescape(stored: &str) -> String {
    stored.replace(ESCAPED_SEPARATOR, "/")
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
