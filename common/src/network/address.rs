//! # Address Parsing
//!
//! Registry address lists are comma-separated `ip:port` tokens. The port is
//! whatever follows the **last** `:`, so bracketed IPv6 literals survive.

use std::fmt;

use crate::error::AddressError;

/// A validated `ip:port` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    pub ip: String,
    pub port: u16,
}

impl Address {
    /// Parses one token of an address list.
    ///
    /// The token is taken literally: no trimming, no ip validation beyond
    /// non-emptiness. Ports go through a signed parse first so that `-1` is
    /// reported as non-positive rather than malformed.
    pub fn parse(token: &str) -> Result<Self, AddressError> {
        let idx = token.rfind(':').ok_or(AddressError::MissingSeparator)?;
        let (ip, port) = (&token[..idx], &token[idx + 1..]);

        let port: i32 = port.parse().map_err(|source| AddressError::InvalidPort {
            port: port.to_string(),
            source,
        })?;
        if port <= 0 {
            return Err(AddressError::NonPositivePort(port));
        }
        let port = u16::try_from(port).map_err(|_| AddressError::PortOutOfRange(port))?;

        if ip.is_empty() {
            return Err(AddressError::EmptyHost);
        }

        Ok(Self {
            ip: ip.to_string(),
            port,
        })
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ip, self.port)
    }
}

/// Splits an address list into its non-blank tokens.
pub fn tokens(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').filter(|token| !token.trim().is_empty())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
