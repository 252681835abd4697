//! Error types for portpool.
//!
//! Uses `thiserror` for ergonomic error definitions.

use crate::types::PortError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while probing ports or running the worker pool.
///
/// `SocketCreate` and `Connect` are transient: they only ever affect the
/// port being probed. `WorkerSpawn` and `WorkerPanicked` end the scan.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("failed to create socket: {0}")]
    SocketCreate(#[source] std::io::Error),

    #[error("connection failed: {0}")]
    Connect(#[source] std::io::Error),

    #[error("failed to spawn worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    #[error("worker {0} panicked")]
    WorkerPanicked(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScanError {
    /// Whether the error only affects a single port.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::SocketCreate(_) | Self::Connect(_))
    }
}

/// Errors from loading application settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings format: {0}")]
    InvalidFormat(String),

    #[error("invalid setting: {0}")]
    InvalidValue(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level error for the command-line front end.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Port(#[from] PortError),

    #[error("could not open output file {path}: {source}")]
    OutputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Other(String),
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Result type alias for settings operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
