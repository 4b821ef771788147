//! Integration test common infrastructure.
//!
//! Provides utilities for starting test servers, creating test clients,
//! and asserting on broadcast flows.

pub mod client;
pub mod server;

#[allow(unused_imports)]
pub use client::TestClient;
#[allow(unused_imports)]
pub use server::{BinaryServer, TestServer};
