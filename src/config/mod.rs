//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: the top-level [`Config`] and its loader
//! - [`listen`]: listening socket configuration ([`ListenConfig`])
//! - [`limits`]: table capacity and buffering bounds ([`LimitsConfig`])
//! - [`errors`]: how non-fatal failures are treated ([`ErrorsConfig`])
//! - [`validation`]: startup sanity checks

mod errors;
mod limits;
mod listen;
mod types;
pub mod validation;

pub use errors::{ErrorPolicy, ErrorsConfig};
pub use limits::LimitsConfig;
pub use listen::ListenConfig;
pub use types::{Config, ConfigError};
pub use validation::{ValidationError, validate};
