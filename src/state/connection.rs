//! Per-client connection state.

use bytes::Bytes;
use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use super::Visitor;
use crate::network::{InterestSignal, Transport};
use crate::protocol::{LineAssembler, OutputQueue, WriteOutcome};

/// Stable handle of a connection-table slot.
///
/// Slots are reused after a connection closes; the visitor number is what
/// tells two occupants of the same slot apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(usize);

impl ConnectionId {
    pub const fn new(slot: usize) -> Self {
        Self(slot)
    }

    pub const fn slot(self) -> usize {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Active,
    /// Terminal; buffers are released and interest is withdrawn.
    Closing,
}

/// Why a connection left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    EndOfStream,
    LineTooLong,
    SendQueueExceeded,
    ConnectionError,
}

impl CloseReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EndOfStream => "end of stream",
            Self::LineTooLong => "line too long",
            Self::SendQueueExceeded => "send queue exceeded",
            Self::ConnectionError => "connection error",
        }
    }
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one read attempt.
#[derive(Debug)]
pub enum ReadOutcome {
    /// Orderly peer shutdown.
    EndOfStream,
    /// `bytes` arrived and completed `lines` (terminators included).
    Data { bytes: usize, lines: Vec<Bytes> },
}

/// What closing a connection released.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Released {
    pub partial_bytes: usize,
    pub messages: usize,
}

/// One client: liveness, visitor number, input assembler, output queue.
pub struct Connection<T> {
    id: ConnectionId,
    visitor: Visitor,
    peer: Option<SocketAddr>,
    state: ConnectionState,
    input: LineAssembler,
    output: OutputQueue,
    transport: Arc<T>,
    interest: Arc<InterestSignal>,
}

impl<T> Connection<T> {
    pub fn new(id: ConnectionId, visitor: Visitor, transport: Arc<T>) -> Self {
        Self {
            id,
            visitor,
            peer: None,
            state: ConnectionState::Active,
            input: LineAssembler::new(),
            output: OutputQueue::new(),
            transport,
            interest: Arc::new(InterestSignal::new()),
        }
    }

    pub fn with_peer(mut self, peer: SocketAddr) -> Self {
        self.peer = Some(peer);
        self
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn visitor(&self) -> Visitor {
        self.visitor
    }

    pub fn peer(&self) -> Option<SocketAddr> {
        self.peer
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_live(&self) -> bool {
        self.state == ConnectionState::Active
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    pub fn interest(&self) -> &Arc<InterestSignal> {
        &self.interest
    }

    /// Bytes waiting for a line terminator.
    pub fn buffered_input(&self) -> usize {
        self.input.buffered()
    }

    pub fn output(&self) -> &OutputQueue {
        &self.output
    }

    pub fn queued_bytes(&self) -> usize {
        self.output.queued_bytes()
    }

    /// Queue a payload, turning on write interest if the queue was idle.
    pub fn enqueue(&mut self, payload: Bytes) {
        self.output.push(payload);
        if !self.output.is_empty() {
            self.interest.set_wants_write(true);
        }
    }

    /// Enter `Closing`: drop buffered input and queued output and withdraw
    /// interest. Idempotent.
    pub fn close(&mut self) -> Released {
        if self.state == ConnectionState::Closing {
            return Released::default();
        }
        self.state = ConnectionState::Closing;
        self.interest.set_wants_write(false);
        self.interest.close();
        Released {
            partial_bytes: self.input.clear(),
            messages: self.output.clear(),
        }
    }
}

impl<T: Transport> Connection<T> {
    /// One non-blocking read into `buf`, framing whatever arrived.
    pub fn read_into(&mut self, buf: &mut [u8]) -> io::Result<ReadOutcome> {
        let n = self.transport.try_read(buf)?;
        if n == 0 {
            return Ok(ReadOutcome::EndOfStream);
        }
        let lines = self.input.push(&buf[..n]);
        Ok(ReadOutcome::Data { bytes: n, lines })
    }

    /// One non-blocking write of the queue head from its cursor.
    pub fn flush_head(&mut self) -> io::Result<WriteOutcome> {
        let transport = &self.transport;
        let outcome = self.output.write_head(|buf| transport.try_write(buf))?;
        if self.output.is_empty() {
            self.interest.set_wants_write(false);
        }
        Ok(outcome)
    }
}

impl<T> fmt::Debug for Connection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("visitor", &self.visitor)
            .field("peer", &self.peer)
            .field("state", &self.state)
            .field("buffered_input", &self.input.buffered())
            .field("queued_messages", &self.output.len())
            .finish()
    }
}
