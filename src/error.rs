//! Error types for portsweep.
//!
//! Uses `thiserror` for ergonomic error definitions. Input errors are fatal
//! and surface before any scanning; per-port failures never become errors
//! here and are reported as probe statuses instead.

use crate::types::{PortError, TargetError};
use std::path::PathBuf;
use thiserror::Error;

/// Connect-stage failures inside the TCP prober.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("connection timed out")]
    Timeout,

    #[error("connection refused")]
    ConnectionRefused,

    #[error("connection failed: {0}")]
    ConnectionFailed(#[from] std::io::Error),
}

/// Errors from loading application settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings file: {0}")]
    InvalidFormat(String),
}

/// Errors surfaced to the user by the command-line front end.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid ports: {0}")]
    InvalidPortSpec(#[from] PortError),

    #[error("Invalid target: {0}")]
    InvalidTarget(#[from] TargetError),

    #[error("Invalid thread count: must be at least 1")]
    InvalidWorkers,

    #[error("Invalid timeout: {0}")]
    InvalidTimeout(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type ScanResult<T> = Result<T, ScanError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type CliResult<T> = Result<T, CliError>;
