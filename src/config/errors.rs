//! Error policy configuration.

use serde::Deserialize;

/// How failures that only concern one connection are treated.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Ignore failed accepts, transient I/O errors and error readiness;
    /// close connections whose socket is broken.
    #[default]
    Permissive,
    /// Any failed accept, I/O error or error readiness stops the server.
    Strict,
}

impl ErrorPolicy {
    pub fn is_strict(self) -> bool {
        self == Self::Strict
    }
}

/// `[errors]` section.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ErrorsConfig {
    #[serde(default)]
    pub policy: ErrorPolicy,
}
