//! Error types for the gcal CLI.

use thiserror::Error;

use crate::session::ScopeMode;

/// Errors that can occur in gcal operations.
///
/// Every fallible operation in the crate returns one of these; the process
/// boundary in `main` is the only place an error becomes text and an exit
/// code.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No stored credentials for {mode} access. Run `gcal auth --mode {mode}` first.")]
    NoCredentials { mode: ScopeMode },

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid time format: '{0}'")]
    InvalidTimeFormat(String),

    #[error("Calendar API error: {0}")]
    RemoteApi(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for gcal operations.
pub type CliResult<T> = Result<T, CliError>;
