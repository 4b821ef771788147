//! Broadcast fan-out to every other live connection.

use tracing::debug;

use crate::protocol::Notice;
use crate::state::{CloseReason, ConnectionId, Hub};

/// Result of one broadcast.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Fanout {
    /// Connections the payload was queued on.
    pub recipients: usize,
    /// Connections the payload would have pushed past their send queue bound.
    pub overflowed: Vec<ConnectionId>,
}

impl<T> Hub<T> {
    /// Render `notice` once and queue it on every live connection except
    /// `origin`.
    ///
    /// Each recipient gets its own [`PendingMessage`](crate::protocol::PendingMessage)
    /// with its own cursor, so entries are released independently. Recipients
    /// that would exceed `max_queued_bytes` are skipped and reported instead.
    pub fn broadcast(&mut self, origin: Option<ConnectionId>, notice: &Notice<'_>) -> Fanout {
        let payload = notice.render();
        let limit = self.settings.max_queued_bytes;
        let mut fanout = Fanout::default();

        for conn in self.table.iter_mut() {
            if Some(conn.id()) == origin || !conn.is_live() {
                continue;
            }
            if let Some(limit) = limit
                && conn.queued_bytes() + payload.len() > limit
            {
                fanout.overflowed.push(conn.id());
                continue;
            }
            conn.enqueue(payload.clone());
            fanout.recipients += 1;
        }

        debug!(
            kind = notice.kind(),
            bytes = payload.len(),
            recipients = fanout.recipients,
            overflowed = fanout.overflowed.len(),
            "Broadcast queued"
        );
        fanout
    }

    /// Broadcast, then close every recipient that overflowed its send queue.
    ///
    /// Returns how many connections the notice was queued on.
    pub fn announce(&mut self, origin: Option<ConnectionId>, notice: &Notice<'_>) -> usize {
        let fanout = self.broadcast(origin, notice);
        for id in fanout.overflowed {
            self.disconnect(id, CloseReason::SendQueueExceeded);
        }
        fanout.recipients
    }
}
