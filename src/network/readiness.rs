//! Readiness registration for one connection.
//!
//! Each live connection has exactly one armed future in the event loop's
//! readiness set. It waits on the socket with the connection's current
//! interest and re-arms itself whenever that interest changes.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::io::{Interest, Ready};
use tokio::net::TcpStream;
use tokio::sync::Notify;

use crate::state::ConnectionId;

/// Which operations a handler may attempt without blocking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Readiness {
    pub readable: bool,
    pub writable: bool,
    pub error: bool,
}

impl Readiness {
    pub const READABLE: Self = Self {
        readable: true,
        writable: false,
        error: false,
    };
    pub const WRITABLE: Self = Self {
        readable: false,
        writable: true,
        error: false,
    };
    pub const ERROR: Self = Self {
        readable: false,
        writable: false,
        error: true,
    };

    pub fn is_empty(&self) -> bool {
        !(self.readable || self.writable || self.error)
    }
}

impl From<Ready> for Readiness {
    fn from(ready: Ready) -> Self {
        Self {
            // A closed half still has to be observed through read/write.
            readable: ready.is_readable() || ready.is_read_closed(),
            writable: ready.is_writable() || ready.is_write_closed(),
            error: ready.is_error(),
        }
    }
}

/// Interest shared between a connection and its armed future.
#[derive(Debug, Default)]
pub struct InterestSignal {
    writable: AtomicBool,
    closed: AtomicBool,
    changed: Notify,
}

impl InterestSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wants_write(&self) -> bool {
        self.writable.load(Ordering::Acquire)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Toggle write interest, waking the armed future when it turns on.
    pub fn set_wants_write(&self, on: bool) {
        let was = self.writable.swap(on, Ordering::AcqRel);
        if on && !was {
            self.changed.notify_one();
        }
    }

    /// Release the armed future so it drops its socket handle.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.changed.notify_one();
    }

    pub fn interest(&self) -> Interest {
        let base = Interest::READABLE | Interest::ERROR;
        if self.wants_write() {
            base | Interest::WRITABLE
        } else {
            base
        }
    }

    async fn changed(&self) {
        self.changed.notified().await;
    }
}

/// What an armed future resolved with.
#[derive(Debug)]
pub enum Armed {
    Ready(io::Result<Ready>),
    /// The connection was closed while the future was parked.
    Released,
}

/// A readiness event tagged with the registration it belongs to.
#[derive(Debug)]
pub struct ReadinessEvent {
    pub id: ConnectionId,
    pub visitor: u64,
    pub armed: Armed,
}

/// Wait until `stream` is ready for the connection's current interest.
pub async fn wait_ready(
    id: ConnectionId,
    visitor: u64,
    stream: Arc<TcpStream>,
    signal: Arc<InterestSignal>,
) -> ReadinessEvent {
    loop {
        if signal.is_closed() {
            return ReadinessEvent {
                id,
                visitor,
                armed: Armed::Released,
            };
        }
        let interest = signal.interest();
        tokio::select! {
            ready = stream.ready(interest) => {
                return ReadinessEvent { id, visitor, armed: Armed::Ready(ready) };
            }
            () = signal.changed() => {}
        }
    }
}
