//! Diagnostic logging.
//!
//! Skipped cards, removals, writes and backups are reported as `tracing`
//! events on stderr. The operator conversation never goes through here: it is
//! written by the workflows' prompter, so raising the log level does not
//! change what the prompts look like on stdout.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Level used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "warn";

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    #[error("failed to initialize logging: {0}")]
    Install(String),
}

/// Build the filter from `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
pub fn filter() -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(DEFAULT_FILTER)?),
    }
}

/// Install the global subscriber. Call once, at startup.
pub fn init() -> Result<(), LoggingError> {
    tracing_subscriber::fmt()
        .with_env_filter(filter()?)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| LoggingError::Install(err.to_string()))
}
