//! The event loop's owned server state.
//!
//! `Hub` is the single writer of the connection table. Listener, client and
//! fan-out handling are `impl Hub` blocks under `crate::handlers`.

use super::{ConnectionId, ConnectionTable, VisitorCounter};
use crate::config::{Config, ErrorPolicy};

/// Knobs the handlers consult on every event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubSettings {
    /// Connection table capacity.
    pub capacity: usize,
    /// Bytes requested per read.
    pub read_chunk: usize,
    /// Close a connection whose unterminated input exceeds this.
    pub max_line_bytes: Option<usize>,
    /// Close a recipient whose queued output would exceed this.
    pub max_queued_bytes: Option<usize>,
    pub policy: ErrorPolicy,
}

impl From<&Config> for HubSettings {
    fn from(config: &Config) -> Self {
        Self {
            capacity: config.limits.max_connections,
            read_chunk: config.limits.read_chunk,
            max_line_bytes: config.limits.max_line_bytes,
            max_queued_bytes: config.limits.max_queued_bytes,
            policy: config.errors.policy,
        }
    }
}

impl Default for HubSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// Connection table, visitor counter and settings, owned by one task.
pub struct Hub<T> {
    pub(crate) table: ConnectionTable<T>,
    pub(crate) visitors: VisitorCounter,
    pub(crate) settings: HubSettings,
    /// Scratch buffer every read lands in before framing.
    pub(crate) read_buf: Vec<u8>,
}

impl<T> Hub<T> {
    pub fn new(settings: HubSettings) -> Self {
        Self {
            table: ConnectionTable::with_capacity(settings.capacity),
            visitors: VisitorCounter::new(),
            read_buf: vec![0; settings.read_chunk.max(1)],
            settings,
        }
    }

    pub fn table(&self) -> &ConnectionTable<T> {
        &self.table
    }

    /// Visitor numbers handed out so far.
    pub fn visitors_issued(&self) -> u64 {
        self.visitors.issued()
    }

    pub fn is_current(&self, id: ConnectionId, visitor: u64) -> bool {
        self.table.is_current(id, visitor)
    }
}
