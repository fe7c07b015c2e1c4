//! Error definitions for the device layer

use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by an input backend
#[derive(Debug, Error)]
pub enum BackendError {
    /// The platform input subsystem could not be started
    #[error("Input subsystem unavailable: {0}")]
    Unavailable(String),

    /// Querying the connected devices failed
    #[error("Failed to enumerate devices: {0}")]
    EnumerationError(String),

    /// No device exists at the requested index
    #[error("No device at index {0}")]
    NoSuchDevice(usize),

    /// The device exists but could not be opened
    #[error("Failed to open device {index}: {reason}")]
    OpenError { index: usize, reason: String },
}

/// Errors while reading the controller mapping database
#[derive(Debug, Error)]
pub enum MappingDbError {
    #[error("Failed to read mapping database {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed mapping on line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },
}
