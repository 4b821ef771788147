//! Event handlers.
//!
//! Handlers are `impl Hub` blocks split by concern, each running to
//! completion without suspending:
//! - [`listener`]: admit one accepted connection and announce it
//! - [`client`]: the per-connection read/write/close state machine
//! - [`fanout`]: render a notice once and queue it on every other client

mod client;
mod fanout;
mod listener;

pub use fanout::Fanout;
pub use listener::Admitted;
