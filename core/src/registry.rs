//! The service registry as seen by the generator.
//!
//! Connection handling, retries and watches belong to whatever implements
//! [`Registry`]. The generator only ever lists children and reads address
//! lists, one call at a time.

use async_trait::async_trait;
use governor_common::error::RegistryError;
use governor_common::registry::RegistryPath;

mod memory;
mod snapshot;

pub use memory::MemoryRegistry;
pub use snapshot::{SnapshotError, load_snapshot};

#[async_trait]
pub trait Registry: Send + Sync {
    /// Child node names of `path`, in registry order. A missing node has no
    /// children.
    async fn get_children(&self, path: &RegistryPath) -> Result<Vec<String>, RegistryError>;

    /// The comma-separated `ip:port` list stored at `path`, or `None` when the
    /// node is absent or carries no data.
    async fn get_service_address(
        &self,
        path: &RegistryPath,
    ) -> Result<Option<String>, RegistryError>;
}
