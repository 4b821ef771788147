//! Test server management.
//!
//! `TestServer` runs the event loop in-process on an ephemeral port.
//! `BinaryServer` spawns the real `talkerd` binary with a generated config.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::Duration;
use talkerd::config::ListenConfig;
use talkerd::{Gateway, HubSettings};
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// An in-process server instance, stopped on drop.
pub struct TestServer {
    addr: SocketAddr,
    task: JoinHandle<Result<(), talkerd::ServerError>>,
}

impl TestServer {
    /// Start a server with default settings.
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with(HubSettings::default()).await
    }

    /// Start a server with the given handler settings.
    pub async fn start_with(settings: HubSettings) -> anyhow::Result<Self> {
        let listen = ListenConfig {
            address: "127.0.0.1:0".parse()?,
            ..ListenConfig::default()
        };
        let gateway = Gateway::bind(&listen)?;
        let addr = gateway.local_addr()?;
        let task = tokio::spawn(gateway.run(settings));
        Ok(Self { addr, task })
    }

    pub fn address(&self) -> SocketAddr {
        self.addr
    }

    /// Connect a new client.
    pub async fn connect(&self) -> anyhow::Result<super::client::TestClient> {
        super::client::TestClient::connect(self.addr).await
    }

    /// Whether the event loop has stopped (it only stops on a fatal error).
    pub fn is_stopped(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// A spawned `talkerd` process.
pub struct BinaryServer {
    child: Child,
    port: u16,
    _config_dir: tempfile::TempDir,
}

impl BinaryServer {
    /// Spawn the binary listening on `port`.
    pub async fn spawn(port: u16) -> anyhow::Result<Self> {
        let config_dir = tempfile::tempdir()?;
        let config_path: PathBuf = config_dir.path().join("talkerd.toml");
        let config_content = format!(
            r#"
[listen]
address = "127.0.0.1:{port}"
reuse_address = true

[limits]
max_connections = 64
"#
        );
        std::fs::write(&config_path, config_content)?;

        let child = Command::new(env!("CARGO_BIN_EXE_talkerd"))
            .arg(&config_path)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        let server = Self {
            child,
            port,
            _config_dir: config_dir,
        };
        server.wait_until_ready().await?;
        Ok(server)
    }

    /// Wait until the server is accepting connections.
    ///
    /// The probe connection is a real client: it consumes visitor 0 and
    /// leaves again.
    async fn wait_until_ready(&self) -> anyhow::Result<()> {
        for _ in 0..50 {
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                return Ok(());
            }
            sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("Server failed to start within 5 seconds")
    }

    pub fn address(&self) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], self.port))
    }

    pub async fn connect(&self) -> anyhow::Result<super::client::TestClient> {
        super::client::TestClient::connect(self.address()).await
    }
}

impl Drop for BinaryServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
