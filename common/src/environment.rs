use std::fmt;

use serde::{Deserialize, Serialize};

/// One registry instance that is scanned every round.
///
/// Environments are immutable once configured. Two environments are the same
/// key only when both the name and the registry address match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Environment {
    pub name: String,
    pub registry_address: String,
}

impl Environment {
    pub fn new(name: impl Into<String>, registry_address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            registry_address: registry_address.into(),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.name, self.registry_address)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_registry_address() {
        let env = Environment::new("prod", "zk1.internal:2181");
        assert_eq!(env.to_string(), "prod[zk1.internal:2181]");
    }

    #[test]
    fn same_name_different_registry_is_a_different_key() {
        let a = Environment::new("prod", "zk1:2181");
        let b = Environment::new("prod", "zk2:2181");
        assert_ne!(a, b);
    }
}
