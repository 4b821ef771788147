//! talkerd - line-oriented broadcast chat server.
//!
//! Binds immediately and runs until killed. An optional positional argument
//! names a TOML config file; without it the built-in defaults are used.

use std::process::ExitCode;
use talkerd::config::{self, Config};
use talkerd::{Gateway, HubSettings, ServerError};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = e
                .downcast_ref::<ServerError>()
                .map_or("startup", ServerError::error_code);
            error!(code, "{}", fatal_diagnostic(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    // Load configuration
    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(&path).map_err(|e| {
            error!(path = %path, error = %e, "Failed to load config");
            e
        })?,
        None => Config::default(),
    };

    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("invalid configuration ({} errors)", errors.len());
    }

    info!(
        address = %config.listen.address,
        max_connections = config.limits.max_connections,
        policy = ?config.errors.policy,
        "Starting talkerd"
    );

    let gateway = Gateway::bind(&config.listen)?;
    gateway.run(HubSettings::from(&config)).await?;

    Ok(())
}

/// Release builds report a generic message; debug builds include the cause.
fn fatal_diagnostic(err: &anyhow::Error) -> String {
    if cfg!(debug_assertions) {
        format!("Fatal error: {err:#}")
    } else {
        "Fatal error".to_string()
    }
}
