//! State management module.
//!
//! Contains the [`Hub`] (the event loop's owned state) and its parts.

mod connection;
mod hub;
mod table;
mod visitor;

pub use connection::{
    CloseReason, Connection, ConnectionId, ConnectionState, ReadOutcome, Released,
};
pub use hub::{Hub, HubSettings};
pub use table::ConnectionTable;
pub use visitor::{Visitor, VisitorCounter};
