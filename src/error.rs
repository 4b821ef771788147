//! Unified error handling for talkerd.
//!
//! Startup failures and policy-fatal runtime failures are [`ServerError`]s.
//! Per-connection I/O errors are first classified with
//! [`classify_io_error`]; only the error policy decides whether one stops
//! the server.

use std::io;
use std::net::SocketAddr;
use thiserror::Error;

// ============================================================================
// Server Errors (startup and event loop)
// ============================================================================

/// Errors that stop the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to create listening socket: {0}")]
    Socket(#[source] io::Error),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("failed to listen: {0}")]
    Listen(#[source] io::Error),

    #[error("failed to accept connection: {0}")]
    Accept(#[source] io::Error),

    #[error("I/O error on client {visitor}: {source}")]
    Io {
        visitor: u64,
        #[source]
        source: io::Error,
    },

    #[error("error readiness on client {visitor}")]
    ErrorReadiness { visitor: u64 },
}

impl ServerError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Socket(_) => "socket",
            Self::Bind { .. } => "bind",
            Self::Listen(_) => "listen",
            Self::Accept(_) => "accept",
            Self::Io { .. } => "io",
            Self::ErrorReadiness { .. } => "error_readiness",
        }
    }
}

// ============================================================================
// Table Errors
// ============================================================================

/// The connection table has no free slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("connection table is full ({capacity} slots)")]
pub struct TableFull {
    pub capacity: usize,
}

// ============================================================================
// I/O error classification
// ============================================================================

/// What a per-connection I/O error means for that connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoErrorAction {
    /// Readiness was spurious; try again on the next event.
    Spurious,
    /// Worth retrying; the connection is still usable.
    Transient,
    /// The socket is unusable; the connection has to close.
    Broken,
}

/// Classify an I/O error from a non-blocking read or write.
pub fn classify_io_error(e: &io::Error) -> IoErrorAction {
    match e.kind() {
        io::ErrorKind::WouldBlock => IoErrorAction::Spurious,
        io::ErrorKind::Interrupted | io::ErrorKind::TimedOut => IoErrorAction::Transient,
        _ => IoErrorAction::Broken,
    }
}
