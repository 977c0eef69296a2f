//! Error types for Netwatch.
//!
//! Uses `thiserror` for ergonomic error definitions. Each concern
//! (scanning, export, configuration, CLI) gets its own enum; the CLI
//! umbrella converts from the rest.

use thiserror::Error;

/// Main error type for discovery, probing, and session operations.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("ARP discovery requires elevated privileges (run as root/administrator)")]
    InsufficientPrivilege,

    #[error("link-layer capability unavailable: {0}")]
    CapabilityUnavailable(String),

    #[error("discovery failed: {0}")]
    DiscoveryFailed(String),

    #[error("probing tool not found on PATH: {0}")]
    ToolNotFound(String),

    #[error("probe failed: {0}")]
    ProbeFailed(String),

    #[error("probe exceeded its time limit")]
    ProbeTimeout,

    #[error("no target selected for probing")]
    NoTargetSelected,

    #[error("an operation is already in flight")]
    SessionBusy,
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Error type for CSV export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("nothing to export: the record list is empty")]
    EmptyInput,

    #[error("failed to write export file: {0}")]
    WriteFailed(String),
}

/// Result type alias for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Error type for configuration loading and saving.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine configuration directories")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: String, reason: String },

    #[error("failed to write {path}: {reason}")]
    WriteFailed { path: String, reason: String },

    #[error("invalid settings format: {0}")]
    InvalidFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level error for CLI command execution.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid port specification: {0}")]
    Port(#[from] crate::types::PortError),

    #[error("invalid scan range: {0}")]
    Range(#[from] crate::types::RangeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
