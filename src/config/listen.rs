//! Network listener configuration.

use serde::Deserialize;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

/// Default listening port.
pub const DEFAULT_PORT: u16 = 8000;

/// Network listener configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ListenConfig {
    /// Address to bind to (default: 127.0.0.1:8000).
    #[serde(default = "default_address")]
    pub address: SocketAddr,
    /// Pending-connection backlog. The kernel clamps this to
    /// `net.core.somaxconn`, so the default asks for the usual maximum.
    #[serde(default = "default_backlog")]
    pub backlog: u32,
    /// Set SO_REUSEADDR before binding.
    #[serde(default)]
    pub reuse_address: bool,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            backlog: default_backlog(),
            reuse_address: false,
        }
    }
}

fn default_address() -> SocketAddr {
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, DEFAULT_PORT))
}

fn default_backlog() -> u32 {
    4096
}
