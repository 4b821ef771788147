//! talkerd - a line-oriented broadcast chat server.
//!
//! Every client line is relayed to every other connected client. One task
//! multiplexes all connections over the runtime's readiness driver and owns
//! all server state, so no state is shared between tasks.

pub mod config;
pub mod error;
pub mod handlers;
pub mod network;
pub mod protocol;
pub mod state;

pub use config::Config;
pub use error::ServerError;
pub use network::Gateway;
pub use state::HubSettings;
