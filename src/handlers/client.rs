//! Client handling: the per-connection state machine.
//!
//! A connection is `Active` until a read returns end-of-stream, its socket
//! breaks, or it exceeds a configured bound; it then goes through `Closing`
//! exactly once and leaves the table.

use std::io;
use tracing::{debug, info, warn};

use crate::error::{IoErrorAction, ServerError, classify_io_error};
use crate::network::{Readiness, Transport};
use crate::protocol::{Notice, WriteOutcome};
use crate::state::{CloseReason, ConnectionId, Hub, ReadOutcome};

impl<T: Transport> Hub<T> {
    /// Dispatch one readiness event for a client connection.
    ///
    /// Read is handled before write, and at most one queue head is drained.
    /// Nothing is attempted once the connection has closed.
    pub fn handle_client(&mut self, id: ConnectionId, ready: Readiness) -> Result<(), ServerError> {
        let Some(visitor) = self.table.get(id).map(|c| c.visitor()) else {
            return Ok(());
        };

        if ready.readable {
            self.on_readable(id)?;
        }
        if ready.writable && self.is_current(id, visitor) {
            self.on_writable(id)?;
        }
        if ready.error && self.is_current(id, visitor) {
            if self.settings.policy.is_strict() {
                return Err(ServerError::ErrorReadiness { visitor });
            }
            debug!(visitor, "Error readiness");
            // Let a read surface the pending socket error, if any.
            if !ready.readable {
                self.on_readable(id)?;
            }
        }
        Ok(())
    }

    fn on_readable(&mut self, id: ConnectionId) -> Result<(), ServerError> {
        let Some(conn) = self.table.get_mut(id) else {
            return Ok(());
        };
        let visitor = conn.visitor();

        match conn.read_into(&mut self.read_buf) {
            Ok(ReadOutcome::EndOfStream) => {
                self.disconnect(id, CloseReason::EndOfStream);
                Ok(())
            }
            Ok(ReadOutcome::Data { bytes, lines }) => {
                let buffered = conn.buffered_input();
                let overlong = self
                    .settings
                    .max_line_bytes
                    .is_some_and(|max| buffered > max);

                debug!(visitor, bytes, lines = lines.len(), buffered, "Read");
                for line in &lines {
                    // A relay can overflow a recipient whose departure then
                    // overflows the sender; nothing more is relayed after that.
                    if !self.is_current(id, visitor) {
                        return Ok(());
                    }
                    self.announce(Some(id), &Notice::Relay { visitor, line });
                }

                if overlong && self.is_current(id, visitor) {
                    warn!(visitor, buffered, "Unterminated line over limit - disconnecting");
                    self.disconnect(id, CloseReason::LineTooLong);
                }
                Ok(())
            }
            Err(e) => self.handle_io_error(id, e),
        }
    }

    fn on_writable(&mut self, id: ConnectionId) -> Result<(), ServerError> {
        let Some(conn) = self.table.get_mut(id) else {
            return Ok(());
        };
        let visitor = conn.visitor();

        match conn.flush_head() {
            Ok(WriteOutcome::Partial { written, remaining }) => {
                debug!(visitor, written, remaining, "Partial write");
                Ok(())
            }
            Ok(WriteOutcome::Idle | WriteOutcome::Completed { .. }) => Ok(()),
            Err(e) => self.handle_io_error(id, e),
        }
    }
}

impl<T> Hub<T> {
    /// Apply the error policy to an I/O failure on a client connection.
    pub fn handle_io_error(&mut self, id: ConnectionId, e: io::Error) -> Result<(), ServerError> {
        let Some(visitor) = self.table.get(id).map(|c| c.visitor()) else {
            return Ok(());
        };

        match classify_io_error(&e) {
            IoErrorAction::Spurious => Ok(()),
            _ if self.settings.policy.is_strict() => Err(ServerError::Io { visitor, source: e }),
            IoErrorAction::Transient => {
                debug!(visitor, error = %e, "Transient I/O error, ignoring");
                Ok(())
            }
            IoErrorAction::Broken => {
                debug!(visitor, error = %e, "Connection broken");
                self.disconnect(id, CloseReason::ConnectionError);
                Ok(())
            }
        }
    }

    /// Run the `Closing` transition for `id` and announce the departure.
    ///
    /// Buffers are released, interest is withdrawn and the slot is freed
    /// before the departure notice is queued on everyone else. Recipients the
    /// notice overflows are closed in turn.
    pub fn disconnect(&mut self, id: ConnectionId, reason: CloseReason) {
        let mut pending = vec![(id, reason)];

        while let Some((id, reason)) = pending.pop() {
            let Some(mut conn) = self.table.remove(id) else {
                continue;
            };
            let released = conn.close();
            let visitor = conn.visitor();
            let peer = conn.peer();
            drop(conn);

            match reason {
                CloseReason::EndOfStream | CloseReason::ConnectionError => info!(
                    visitor,
                    %id,
                    ?peer,
                    %reason,
                    partial_bytes = released.partial_bytes,
                    dropped_messages = released.messages,
                    "Client left"
                ),
                CloseReason::LineTooLong | CloseReason::SendQueueExceeded => warn!(
                    visitor,
                    %id,
                    ?peer,
                    %reason,
                    partial_bytes = released.partial_bytes,
                    dropped_messages = released.messages,
                    "Client disconnected"
                ),
            }

            let fanout = self.broadcast(Some(id), &Notice::Left { visitor });
            pending.extend(
                fanout
                    .overflowed
                    .into_iter()
                    .map(|id| (id, CloseReason::SendQueueExceeded)),
            );
        }
    }
}
