use governor_common::environment::Environment;
use governor_common::error::RegistryError;
use thiserror::Error;

/// Why a round did not run to completion.
#[derive(Debug, Error)]
pub enum RoundError {
    #[error("registry failure in {environment}: {source}")]
    Registry {
        environment: Environment,
        #[source]
        source: RegistryError,
    },

    #[error("shutdown requested")]
    Cancelled,
}
