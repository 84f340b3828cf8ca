//! Shared value types for the governor workspace.
//!
//! Everything in here is plain data: environments, registry paths, parsed
//! addresses, services and their hosts, configuration and the error types
//! that travel between the `core` and `cli` crates.

pub mod config;
pub mod environment;
pub mod error;
pub mod network;
pub mod registry;
