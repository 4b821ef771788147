//! Capacity and buffering limits.

use serde::Deserialize;

/// Connection capacity and per-connection buffering bounds.
///
/// The buffering bounds default to unbounded: a slow reader or a line that
/// never terminates grows its buffers until one is configured.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LimitsConfig {
    /// Connection table capacity (default: 1024).
    /// Connections accepted beyond it are dropped without a join notice.
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
    /// Maximum unterminated input per connection, in bytes (default: none).
    #[serde(default)]
    pub max_line_bytes: Option<usize>,
    /// Maximum queued output per connection, in bytes (default: none).
    #[serde(default)]
    pub max_queued_bytes: Option<usize>,
    /// Bytes requested per read (default: 2048).
    #[serde(default = "default_read_chunk")]
    pub read_chunk: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            max_line_bytes: None,
            max_queued_bytes: None,
            read_chunk: default_read_chunk(),
        }
    }
}

fn default_max_connections() -> usize {
    1024
}

fn default_read_chunk() -> usize {
    2048
}
