//! Network module.
//!
//! Contains the Gateway (listening socket), the event loop that multiplexes
//! every connection's readiness, and the transport seam handlers use.

mod event_loop;
mod gateway;
mod readiness;
mod transport;

pub use event_loop::EventLoop;
pub use gateway::Gateway;
pub use readiness::{Armed, InterestSignal, Readiness, ReadinessEvent};
pub use transport::Transport;

#[cfg(test)]
pub(crate) use transport::testing;
