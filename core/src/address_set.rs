//! # Per-Round Address Deduplication
//!
//! Tracks which literal `ip:port` tokens already produced a check task in the
//! current round, per environment. It is not a cache: the controller creates
//! one per round and clears it once the round has drained.

use std::collections::{HashMap, HashSet};

use governor_common::environment::Environment;
use tracing::info;

#[derive(Debug, Default)]
pub struct AddressSet {
    addresses: HashMap<Environment, HashSet<String>>,
}

impl AddressSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, env: &Environment, address: &str) -> bool {
        self.addresses
            .get(env)
            .is_some_and(|set| set.contains(address))
    }

    /// Records `address` for `env`. Returns `false` if it was already present.
    pub fn add(&mut self, env: &Environment, address: &str) -> bool {
        self.addresses
            .entry(env.clone())
            .or_default()
            .insert(address.to_string())
    }

    /// Number of addresses recorded for `env` this round.
    pub fn len(&self, env: &Environment) -> usize {
        self.addresses.get(env).map_or(0, HashSet::len)
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.values().all(HashSet::is_empty)
    }

    /// Logs how many tasks each environment produced, then forgets every
    /// address. Per-environment entries are kept for the next round.
    pub fn clear(&mut self) {
        for (env, set) in &mut self.addresses {
            info!(
                environment = %env.name,
                registry = %env.registry_address,
                tasks = set.len(),
                "generated {} health check tasks for env {}",
                set.len(),
                env
            );
            set.clear();
        }
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

    fn prod() -> Environment {
        Environment::new("prod", "zk-prod:2181")
    }

    fn beta() -> Environment {
        Environment::new("beta", "zk-beta:2181")
    }

    #[test]
    fn add_is_idempotent() {
        let mut set = AddressSet::new();

        assert!(set.add(&prod(), "10.0.0.1:8080"));
        assert!(!set.add(&prod(), "10.0.0.1:8080"));
        assert_eq!(set.len(&prod()), 1);
    }

    #[test]
    fn environments_are_independent() {
        let mut set = AddressSet::new();
        set.add(&prod(), "10.0.0.1:8080");

        assert!(set.contains(&prod(), "10.0.0.1:8080"));
        assert!(!set.contains(&beta(), "10.0.0.1:8080"));
        assert_eq!(set.len(&beta()), 0);
    }

    #[test]
    fn addresses_are_compared_literally() {
        let mut set = AddressSet::new();
        set.add(&prod(), "10.0.0.1:8080");

        assert!(!set.contains(&prod(), "10.0.0.1:08080"));
    }

    #[test]
    fn clear_forgets_everything() {
        let mut set = AddressSet::new();
        set.add(&prod(), "10.0.0.1:8080");
        set.add(&prod(), "10.0.0.2:8080");
        set.add(&beta(), "10.0.0.1:8080");

        set.clear();

        assert!(set.is_empty());
        assert!(!set.contains(&prod(), "10.0.0.1:8080"));
        assert!(!set.contains(&prod(), "10.0.0.2:8080"));
        assert!(!set.contains(&beta(), "10.0.0.1:8080"));

        assert!(set.add(&prod(), "10.0.0.1:8080"));
    }
}
