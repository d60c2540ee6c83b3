//! # Error Types
//!
//! Two layers of errors live here:
//!
//! - [`FieldError`] - a single field failed validation. These are values, not
//!   failures of the program: the aggregate validator collects one per failing
//!   field and keeps going.
//! - [`CalcError`] - everything else (bad descriptors, file problems, a submit
//!   that could not run the formula).
//!
//! ## Example
//!
//! ```rust
//! use cleanroom_core::errors::{CalcError, CalcResult};
//!
//! fn check_size(size_um: f64) -> CalcResult<()> {
//!     if size_um <= 0.0 {
//!         return Err(CalcError::calculation_failed(
//!             "iso_cleanroom_particle",
//!             "Particle size must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_size(0.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::ValidationErrors;

/// Result type alias for cleanroom_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Generic not-a-number text used when a descriptor has no message of its own,
/// and for required fields left empty.
pub const DEFAULT_NOT_A_NUMBER_MESSAGE: &str = "Please enter a valid number";

/// A single field's validation failure.
///
/// The display text is exactly the message configured on the descriptor for
/// the rule that was violated.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum FieldError {
    /// The raw value could not be read as a number (or was missing)
    #[error("{message}")]
    NotANumber { message: String },

    /// The value is below the inclusive minimum
    #[error("{message}")]
    BelowMinimum { message: String, min: f64 },

    /// The value is above the inclusive maximum
    #[error("{message}")]
    AboveMaximum { message: String, max: f64 },
}

impl FieldError {
    pub fn not_a_number(message: impl Into<String>) -> Self {
        FieldError::NotANumber {
            message: message.into(),
        }
    }

    pub fn below_minimum(message: impl Into<String>, min: f64) -> Self {
        FieldError::BelowMinimum {
            message: message.into(),
            min,
        }
    }

    pub fn above_maximum(message: impl Into<String>, max: f64) -> Self {
        FieldError::AboveMaximum {
            message: message.into(),
            max,
        }
    }

    /// The human-readable message shown beside the input
    pub fn message(&self) -> &str {
        match self {
            FieldError::NotANumber { message }
            | FieldError::BelowMinimum { message, .. }
            | FieldError::AboveMaximum { message, .. } => message,
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            FieldError::NotANumber { .. } => "NOT_A_NUMBER",
            FieldError::BelowMinimum { .. } => "BELOW_MINIMUM",
            FieldError::AboveMaximum { .. } => "ABOVE_MAXIMUM",
        }
    }
}

/// Structured error type for everything outside per-field validation.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// A field descriptor is malformed (empty name, min > max, ...)
    #[error("Invalid descriptor '{field}': {reason}")]
    InvalidDescriptor { field: String, reason: String },

    /// Two descriptors share a name
    #[error("Duplicate field name: {field}")]
    DuplicateField { field: String },

    /// A name that is not part of the descriptor set
    #[error("Unknown field: {field}")]
    UnknownField { field: String },

    /// Attempt to edit a computed (disabled) field
    #[error("Field '{field}' is computed and cannot be edited")]
    FieldDisabled { field: String },

    /// A value the calculation needs is absent
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// One or more fields failed validation
    #[error("Validation failed: {errors}")]
    ValidationFailed { errors: ValidationErrors },

    /// The formula could not be evaluated for the given inputs
    #[error("Calculation failed: {calculation_type} - {reason}")]
    CalculationFailed {
        calculation_type: String,
        reason: String,
    },

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

impl CalcError {
    /// Create an InvalidDescriptor error
    pub fn invalid_descriptor(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidDescriptor {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnknownField error
    pub fn unknown_field(field: impl Into<String>) -> Self {
        CalcError::UnknownField {
            field: field.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a CalculationFailed error
    pub fn calculation_failed(
        calculation_type: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::CalculationFailed {
            calculation_type: calculation_type.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Field errors carried by a failed submit, if any
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            CalcError::ValidationFailed { errors } => Some(errors),
            _ => None,
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidDescriptor { .. } => "INVALID_DESCRIPTOR",
            CalcError::DuplicateField { .. } => "DUPLICATE_FIELD",
            CalcError::UnknownField { .. } => "UNKNOWN_FIELD",
            CalcError::FieldDisabled { .. } => "FIELD_DISABLED",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::ValidationFailed { .. } => "VALIDATION_FAILED",
            CalcError::CalculationFailed { .. } => "CALCULATION_FAILED",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_displays_configured_message() {
        let error = FieldError::below_minimum("ISO Class must be between 5 and 9", 5.0);
        assert_eq!(error.to_string(), "ISO Class must be between 5 and 9");
        assert_eq!(error.message(), "ISO Class must be between 5 and 9");
    }

    #[test]
    fn test_field_error_serialization() {
        let error = FieldError::above_maximum("Airflow cannot exceed 8760 hours per year", 8760.0);
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("AboveMaximum"));
        let roundtrip: FieldError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(FieldError::not_a_number("x").error_code(), "NOT_A_NUMBER");
        assert_eq!(CalcError::missing_field("iso_class").error_code(), "MISSING_FIELD");
        assert_eq!(CalcError::unknown_field("nope").error_code(), "UNKNOWN_FIELD");
    }
}
