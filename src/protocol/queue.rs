//! Outbound queueing with partial-write resumption.

use bytes::Bytes;
use std::collections::VecDeque;
use std::io;

/// One outbound payload and how much of it the transport has taken.
///
/// Invariant: `written <= payload.len()`; the message leaves its queue only
/// once `written == payload.len()`.
#[derive(Debug, Clone)]
pub struct PendingMessage {
    payload: Bytes,
    written: usize,
}

impl PendingMessage {
    pub fn new(payload: Bytes) -> Self {
        Self {
            payload,
            written: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Bytes already accepted by the transport.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Bytes still to be written, starting at the cursor.
    pub fn remaining(&self) -> &[u8] {
        &self.payload[self.written..]
    }

    /// Move the cursor forward by what the transport accepted.
    pub fn advance(&mut self, n: usize) {
        debug_assert!(n <= self.remaining().len(), "cursor past end of message");
        self.written = (self.written + n).min(self.payload.len());
    }

    pub fn is_complete(&self) -> bool {
        self.written == self.payload.len()
    }
}

/// Result of one attempt to drain the queue head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Nothing was queued.
    Idle,
    /// The head took `written` bytes and still has `remaining` to go.
    Partial { written: usize, remaining: usize },
    /// The head finished with this write and was released.
    Completed { written: usize },
}

/// FIFO of [`PendingMessage`]s owned by one connection.
#[derive(Debug, Default)]
pub struct OutputQueue {
    messages: VecDeque<PendingMessage>,
    /// Unwritten bytes across all queued messages.
    queued_bytes: usize,
}

impl OutputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, payload: Bytes) {
        if payload.is_empty() {
            return;
        }
        self.queued_bytes += payload.len();
        self.messages.push_back(PendingMessage::new(payload));
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn queued_bytes(&self) -> usize {
        self.queued_bytes
    }

    pub fn head(&self) -> Option<&PendingMessage> {
        self.messages.front()
    }

    /// Offer the head's unwritten bytes to `write` once.
    ///
    /// The cursor advances by exactly what `write` reports; at most one
    /// message is released per call. On error the queue is left untouched.
    pub fn write_head<F>(&mut self, write: F) -> io::Result<WriteOutcome>
    where
        F: FnOnce(&[u8]) -> io::Result<usize>,
    {
        let Some(head) = self.messages.front_mut() else {
            return Ok(WriteOutcome::Idle);
        };

        let offered = head.remaining().len();
        let written = write(head.remaining())?.min(offered);
        head.advance(written);
        self.queued_bytes -= written;

        if head.is_complete() {
            self.messages.pop_front();
            Ok(WriteOutcome::Completed { written })
        } else {
            Ok(WriteOutcome::Partial {
                written,
                remaining: offered - written,
            })
        }
    }

    /// Release every queued message, returning how many were dropped.
    pub fn clear(&mut self) -> usize {
        let released = self.messages.len();
        self.messages.clear();
        self.queued_bytes = 0;
        released
    }
}
