//! # Error Types
//!
//! Structured error types for splice_core. Every edit either completes or is
//! refused with one of these values before the girder is touched, so callers
//! can surface the reason without worrying about partial state.
//!
//! ## Example
//!
//! ```rust
//! use splice_core::errors::{GirderError, GirderResult};
//!
//! fn validate_station(station_ft: f64) -> GirderResult<()> {
//!     if !station_ft.is_finite() {
//!         return Err(GirderError::invalid_input(
//!             "station_ft",
//!             station_ft.to_string(),
//!             "Station must be a finite number",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for splice_core operations
pub type GirderResult<T> = Result<T, GirderError>;

/// Structured error type for girder topology operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum GirderError {
    /// An input value is invalid (out of range, non-finite, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A pier or temporary support is not known to the bridge topology
    #[error("Support not found: {support}")]
    SupportNotFound { support: String },

    /// No segment of the girder spans the support station
    #[error("Support {support} at station {station_ft} does not fall inside any segment")]
    SupportNotOnGirder { support: String, station_ft: f64 },

    /// No closure joint of the girder sits on the support
    #[error("No closure joint at support {support}")]
    ClosureNotFound { support: String },

    /// The variation type cannot take part in the operation
    #[error("Unsupported variation: {operation} is not available for {variation} segments")]
    UnsupportedVariation { operation: String, variation: String },

    /// The resulting shape cannot be expressed by any supported variation type
    #[error("Unsupported geometry: {operation} - {reason}")]
    UnsupportedGeometry { operation: String, reason: String },

    /// The segment/closure sequences are inconsistent
    #[error("Invariant violation: {message}")]
    InvariantViolation { message: String },

    /// Persisted data could not be turned into a consistent girder
    #[error("Load failed: {reason}")]
    LoadFailed { reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl GirderError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        GirderError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a SupportNotFound error
    pub fn support_not_found(support: impl Into<String>) -> Self {
        GirderError::SupportNotFound {
            support: support.into(),
        }
    }

    /// Create an UnsupportedVariation error
    pub fn unsupported_variation(operation: impl Into<String>, variation: impl Into<String>) -> Self {
        GirderError::UnsupportedVariation {
            operation: operation.into(),
            variation: variation.into(),
        }
    }

    /// Create an UnsupportedGeometry error
    pub fn unsupported_geometry(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        GirderError::UnsupportedGeometry {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvariantViolation error
    pub fn invariant(message: impl Into<String>) -> Self {
        GirderError::InvariantViolation {
            message: message.into(),
        }
    }

    /// Create a LoadFailed error
    pub fn load_failed(reason: impl Into<String>) -> Self {
        GirderError::LoadFailed {
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        GirderError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True when an edit was refused before anything was mutated.
    ///
    /// Refusals are normal outcomes for UI callers (the user picked a support
    /// that does not touch this girder, or a shape that cannot be split).
    pub fn is_refusal(&self) -> bool {
        matches!(
            self,
            GirderError::SupportNotFound { .. }
                | GirderError::SupportNotOnGirder { .. }
                | GirderError::ClosureNotFound { .. }
                | GirderError::UnsupportedVariation { .. }
                | GirderError::UnsupportedGeometry { .. }
                | GirderError::InvalidInput { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            GirderError::InvalidInput { .. } => "INVALID_INPUT",
            GirderError::SupportNotFound { .. } => "SUPPORT_NOT_FOUND",
            GirderError::SupportNotOnGirder { .. } => "SUPPORT_NOT_ON_GIRDER",
            GirderError::ClosureNotFound { .. } => "CLOSURE_NOT_FOUND",
            GirderError::UnsupportedVariation { .. } => "UNSUPPORTED_VARIATION",
            GirderError::UnsupportedGeometry { .. } => "UNSUPPORTED_GEOMETRY",
            GirderError::InvariantViolation { .. } => "INVARIANT_VIOLATION",
            GirderError::LoadFailed { .. } => "LOAD_FAILED",
            GirderError::FileError { .. } => "FILE_ERROR",
            GirderError::SerializationError { .. } => "SERIALIZATION_ERROR",
            GirderError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}
