//! # Error Types
//!
//! Structured error types for door_core. Only hard failures live here.
//! Conditions the engine tolerates (an unpriced finish, an unpriced add-on)
//! are reported as [`PricingNotice`](crate::pricing::PricingNotice) values
//! on the itemized quote instead, so callers can tell the two apart.
//!
//! ## Example
//!
//! ```rust
//! use door_core::errors::{PricingError, PricingResult};
//!
//! fn validate_length(length_mm: f64) -> PricingResult<()> {
//!     if length_mm <= 0.0 {
//!         return Err(PricingError::invalid_input(
//!             "length_mm",
//!             length_mm.to_string(),
//!             "Length must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for door_core operations
pub type PricingResult<T> = Result<T, PricingError>;

/// Structured error type for pricing and configuration operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum PricingError {
    /// The rails/filler pair has no base rate. Fatal to the quote.
    #[error("Pricing not defined for material combination: rails '{rails}', filler '{filler}'")]
    UnknownMaterialCombination { rails: String, filler: String },

    /// An input value is invalid (out of range, empty, not finite)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Rate table failed validation
    #[error("Invalid rate table: {reason}")]
    InvalidRateTable { reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON/TOML serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Rate table schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl PricingError {
    /// Create an UnknownMaterialCombination error
    pub fn unknown_material_combination(rails: impl Into<String>, filler: impl Into<String>) -> Self {
        PricingError::UnknownMaterialCombination {
            rails: rails.into(),
            filler: filler.into(),
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        PricingError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidRateTable error
    pub fn invalid_rate_table(reason: impl Into<String>) -> Self {
        PricingError::InvalidRateTable {
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        PricingError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        PricingError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            PricingError::UnknownMaterialCombination { .. } => "UNKNOWN_MATERIAL_COMBINATION",
            PricingError::InvalidInput { .. } => "INVALID_INPUT",
            PricingError::InvalidRateTable { .. } => "INVALID_RATE_TABLE",
            PricingError::FileError { .. } => "FILE_ERROR",
            PricingError::SerializationError { .. } => "SERIALIZATION_ERROR",
            PricingError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}
