use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use governor_common::error::RegistryError;
use governor_common::registry::RegistryPath;

use super::Registry;

/// A registry tree held in memory.
///
/// Inserting a node implicitly creates its ancestors. Children are listed in
/// lexicographic order.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    nodes: RwLock<BTreeMap<RegistryPath, Option<String>>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`MemoryRegistry::set_address`].
    pub fn with_address(self, path: RegistryPath, address: impl Into<String>) -> Self {
        self.set_address(path, Some(address.into()));
        self
    }

    /// Builder form of [`MemoryRegistry::set_address`] for a node without data.
    pub fn with_node(self, path: RegistryPath) -> Self {
        self.set_address(path, None);
        self
    }

    pub fn set_address(&self, path: RegistryPath, address: Option<String>) {
        let mut nodes = self.nodes.write().unwrap_or_else(PoisonError::into_inner);

        let mut ancestor = path.parent();
        while let Some(parent) = ancestor {
            ancestor = parent.parent();
            nodes.entry(parent).or_insert(None);
        }
        nodes.insert(path, address);
    }

    /// Removes `path` and everything below it.
    pub fn remove(&self, path: &RegistryPath) {
        let mut nodes = self.nodes.write().unwrap_or_else(PoisonError::into_inner);
        nodes.retain(|node, _| !node.segments().starts_with(path.segments()));
    }

    pub fn len(&self) -> usize {
        self.nodes.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Registry for MemoryRegistry {
    async fn get_children(&self, path: &RegistryPath) -> Result<Vec<String>, RegistryError> {
        let nodes = self.nodes.read().unwrap_or_else(PoisonError::into_inner);
        let children = nodes
            .keys()
            .filter(|node| path.is_parent_of(node))
            .filter_map(|node| node.name().map(str::to_string))
            .collect();
        Ok(children)
    }

    async fn get_service_address(
        &self,
        path: &RegistryPath,
    ) -> Result<Option<String>, RegistryError> {
        let nodes = self.nodes.read().unwrap_or_else(PoisonError::into_inner);
        Ok(nodes.get(path).cloned().flatten())
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
