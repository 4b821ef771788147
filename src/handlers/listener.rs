//! Listener handling: admit accepted connections.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::ServerError;
use crate::protocol::Notice;
use crate::state::{Connection, ConnectionId, Hub, Visitor};

/// A connection that made it into the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admitted {
    pub id: ConnectionId,
    pub visitor: Visitor,
}

impl<T> Hub<T> {
    /// Handle the result of one accept.
    ///
    /// A failed accept is fatal only under the strict policy. When the table
    /// is full the socket is dropped before it is given a visitor number.
    /// Otherwise the connection gets the next visitor number and every other
    /// client is told it joined.
    pub fn handle_accept(
        &mut self,
        accepted: io::Result<(T, SocketAddr)>,
    ) -> Result<Option<Admitted>, ServerError> {
        let (transport, peer) = match accepted {
            Ok(pair) => pair,
            Err(e) if self.settings.policy.is_strict() => return Err(ServerError::Accept(e)),
            Err(e) => {
                debug!(error = %e, "Accept failed, ignoring");
                return Ok(None);
            }
        };

        if self.table.is_full() {
            warn!(
                %peer,
                capacity = self.table.capacity(),
                "Connection table full - rejecting"
            );
            drop(transport);
            return Ok(None);
        }

        let visitor = self.visitors.next();
        let transport = Arc::new(transport);
        let id = match self
            .table
            .insert_with(|id| Connection::new(id, visitor, transport).with_peer(peer))
        {
            Ok(id) => id,
            // Unreachable after the is_full check; treat like a full table.
            Err(full) => {
                warn!(%peer, error = %full, "Connection table full - rejecting");
                return Ok(None);
            }
        };

        info!(visitor, %id, %peer, "Client joined");
        self.announce(Some(id), &Notice::Joined { visitor });

        Ok(Some(Admitted { id, visitor }))
    }
}
