//! Structured logging initialisation.
//!
//! Grounded on `chutoro-cli/src/logging.rs`'s shape (idempotent install of
//! a global `tracing` subscriber, env-filter driven, diagnostics on
//! stderr) trimmed to the crates this workspace actually carries: no
//! `log`-facade bridge and no JSON-format switch, since nothing here
//! emits through the `log` crate and a single human-readable format is
//! enough for a CLI that is run interactively or from a shell script.

use std::sync::OnceLock;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

static INITIALISED: OnceLock<()> = OnceLock::new();

/// Errors raised while installing the global tracing subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to install tracing subscriber: {source}")]
    InstallFailed {
        #[source]
        source: tracing_subscriber::util::TryInitError,
    },
}

/// Install global structured logging if it has not already been
/// configured. The log level is controlled via `RUST_LOG`, defaulting
/// to `info`. Safe to call more than once.
pub fn init_logging() -> Result<(), LoggingError> {
    if INITIALISED.get().is_some() {
        return Ok(());
    }
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
    match result {
        Ok(()) => {}
        Err(source) => eprintln!("structured logging already configured elsewhere: {source}"),
    }
    let _ = INITIALISED.set(());
    Ok(())
}
