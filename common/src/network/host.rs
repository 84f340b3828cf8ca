//! Services discovered in a round and the hosts resolved for them.

use std::fmt;
use std::sync::Arc;

use crate::environment::Environment;
use crate::network::address::Address;

/// Identity of a service within one environment. The base service uses the
/// empty group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceId {
    pub environment: Environment,
    pub url: String,
    pub group: String,
}

impl ServiceId {
    pub fn new(environment: Environment, url: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            environment,
            url: url.into(),
            group: group.into(),
        }
    }

    pub fn is_base(&self) -> bool {
        self.group.is_empty()
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_base() {
            write!(f, "{}", self.url)
        } else {
            write!(f, "{}#{}", self.url, self.group)
        }
    }
}

/// A single checkable endpoint. Cheap to clone; the service identity is shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    pub service: Arc<ServiceId>,
    pub ip: String,
    pub port: u16,
}

impl Host {
    pub fn new(service: Arc<ServiceId>, address: Address) -> Self {
        Self {
            service,
            ip: address.ip,
            port: address.port,
        }
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} ({})", self.ip, self.port, self.service)
    }
}

/// A service together with the hosts scheduled for it this round.
#[derive(Debug, Clone)]
pub struct Service {
    pub id: Arc<ServiceId>,
    pub hosts: Vec<Host>,
}

impl Service {
    pub fn new(id: ServiceId) -> Self {
        Self {
            id: Arc::new(id),
            hosts: Vec::new(),
        }
    }

    /// Attaches a host and hands back a clone for dispatch.
    pub fn add_host(&mut self, address: Address) -> Host {
        let host = Host::new(Arc::clone(&self.id), address);
        self.hosts.push(host.clone());
        host
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
