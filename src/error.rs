//! Error types for sdkgate operations.
//!
//! This module defines [`SdkgateError`], the error type returned by every
//! fallible operation, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Missing SDK artifacts are not errors: they disable a capability and are
//!   reported through [`crate::probe::ProbeOutcome`]
//! - Staging failures are not errors: they are captured as
//!   [`crate::stager::StageStatus::Failed`] values
//! - `SdkgateError` is reserved for malformed caller input (platform
//!   identifier, capability table) that must stop the resolve

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for sdkgate operations.
#[derive(Debug, Error)]
pub enum SdkgateError {
    /// Platform identifier could not be parsed.
    #[error("Invalid platform identifier '{value}' (expected one of: {expected})")]
    InvalidPlatform { value: String, expected: String },

    /// Capability table not found at expected location.
    #[error("Capability table not found: {path}")]
    TableNotFound { path: PathBuf },

    /// Failed to parse capability table.
    #[error("Failed to parse capability table at {path}: {message}")]
    TableParseError { path: PathBuf, message: String },

    /// Capability table is structurally invalid.
    #[error("Invalid capability table: {message}")]
    InvalidTable { message: String },

    /// A path template references a variable nobody defined.
    #[error("Unknown variable '${{{name}}}' in '{input}'")]
    UnknownVariable { name: String, input: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SdkgateError {
    /// Process exit code for this error: 2 when the table is missing, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            SdkgateError::TableNotFound { .. } => 2,
            _ => 1,
        }
    }
}

/// Result type alias for sdkgate operations.
pub type Result<T> = std::result::Result<T, SdkgateError>;
