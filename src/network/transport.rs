//! Non-blocking byte transport seam.
//!
//! Handlers only ever make one non-blocking attempt per readiness event, so
//! the seam is the pair of `try_*` calls tokio exposes on its sockets.

use std::io;
use tokio::net::TcpStream;

/// A non-blocking, connected byte stream.
pub trait Transport {
    /// Read what is available now. `Ok(0)` means the peer shut down.
    fn try_read(&self, buf: &mut [u8]) -> io::Result<usize>;

    /// Write as much of `buf` as the transport takes right now.
    fn try_write(&self, buf: &[u8]) -> io::Result<usize>;
}

impl Transport for TcpStream {
    fn try_read(&self, buf: &mut [u8]) -> io::Result<usize> {
        TcpStream::try_read(self, buf)
    }

    fn try_write(&self, buf: &[u8]) -> io::Result<usize> {
        TcpStream::try_write(self, buf)
    }
}
