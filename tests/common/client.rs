//! Test chat client.
//!
//! A raw TCP client that sends bytes and reads newline-terminated lines
//! with timeouts.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

/// A test client.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    /// Connect to a test server.
    pub async fn connect(addr: SocketAddr) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        let (read_half, write_half) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(read_half),
            writer: write_half,
        })
    }

    /// Send raw bytes exactly as given.
    pub async fn send_raw(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        self.writer.write_all(bytes).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Receive one line, terminator included.
    pub async fn recv(&mut self) -> anyhow::Result<Vec<u8>> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    /// Receive one line with a timeout.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<Vec<u8>> {
        let mut line = Vec::new();
        let n = timeout(dur, self.reader.read_until(b'\n', &mut line)).await??;
        if n == 0 {
            anyhow::bail!("connection closed by server");
        }
        Ok(line)
    }

    /// Receive one line and compare it with `expected`.
    pub async fn expect(&mut self, expected: &str) -> anyhow::Result<()> {
        let line = self.recv().await?;
        if line != expected.as_bytes() {
            anyhow::bail!(
                "expected {:?}, got {:?}",
                expected,
                String::from_utf8_lossy(&line)
            );
        }
        Ok(())
    }

    /// Assert nothing arrives within `dur`.
    pub async fn expect_silence(&mut self, dur: Duration) -> anyhow::Result<()> {
        match self.recv_timeout(dur).await {
            Ok(line) => anyhow::bail!("unexpected line {:?}", String::from_utf8_lossy(&line)),
            Err(e) if e.is::<tokio::time::error::Elapsed>() => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Close the write half, which the server sees as end-of-stream.
    pub async fn hang_up(mut self) -> anyhow::Result<()> {
        self.writer.shutdown().await?;
        Ok(())
    }
}
