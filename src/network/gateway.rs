//! Gateway - the listening socket.
//!
//! Binds once at startup; every failure here is fatal. The accepting handle
//! is owned by the event loop and never enters the connection table.

use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpSocket};
use tracing::{info, instrument};

use super::EventLoop;
use crate::config::ListenConfig;
use crate::error::ServerError;
use crate::state::{Hub, HubSettings};

/// The Gateway owns the listener until it is handed to the event loop.
pub struct Gateway {
    listener: TcpListener,
}

impl Gateway {
    /// Create, bind and listen on the configured address.
    pub fn bind(config: &ListenConfig) -> Result<Self, ServerError> {
        let addr = config.address;
        let socket = match addr {
            SocketAddr::V4(_) => TcpSocket::new_v4(),
            SocketAddr::V6(_) => TcpSocket::new_v6(),
        }
        .map_err(ServerError::Socket)?;

        if config.reuse_address {
            socket.set_reuseaddr(true).map_err(ServerError::Socket)?;
        }
        socket
            .bind(addr)
            .map_err(|source| ServerError::Bind { addr, source })?;
        let listener = socket.listen(config.backlog).map_err(ServerError::Listen)?;

        let local = listener.local_addr().map_err(ServerError::Listen)?;
        info!(address = %local, backlog = config.backlog, "Listener bound");
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        self.listener.local_addr().map_err(ServerError::Listen)
    }

    /// Run the event loop forever. Only a policy-fatal error returns.
    #[instrument(skip_all, name = "gateway")]
    pub async fn run(self, settings: HubSettings) -> Result<(), ServerError> {
        EventLoop::new(self.listener, Hub::new(settings)).run().await
    }
}
