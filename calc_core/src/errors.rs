//! # Error Types
//!
//! Structured error types for calc_core. Every calculator rejects bad input
//! with an error that names the offending field, so front ends can show the
//! message next to the form control that caused it.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::errors::{CalcError, CalcResult};
//!
//! fn validate_length(length_m: f64) -> CalcResult<()> {
//!     if length_m <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "length_m",
//!             length_m.to_string(),
//!             "Length must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_length(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for calc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, not finite, malformed text)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A code could not be resolved against a regulation table
    #[error("Unknown {table} code: {code}")]
    UnknownCode { table: String, code: String },

    /// File I/O error (settings files, CLI input files)
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON/TOML serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Report rendering failed
    #[error("Report error: {reason}")]
    ReportError { reason: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create an UnknownCode error
    pub fn unknown_code(table: impl Into<String>, code: impl Into<String>) -> Self {
        CalcError::UnknownCode {
            table: table.into(),
            code: code.into(),
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

    /// Create a ReportError
    pub fn report_error(reason: impl Into<String>) -> Self {
        CalcError::ReportError {
            reason: reason.into(),
        }
    }

    /// Name of the input field this error points at, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            CalcError::InvalidInput { field, .. } | CalcError::MissingField { field } => {
                Some(field)
            }
            _ => None,
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::UnknownCode { .. } => "UNKNOWN_CODE",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::ReportError { .. } => "REPORT_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::SerializationError { reason: e.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("b_m", "-5", "Panel width must be positive");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("test").error_code(), "MISSING_FIELD");
        assert_eq!(CalcError::unknown_code("method", "Z9").error_code(), "UNKNOWN_CODE");
        assert_eq!(CalcError::report_error("boom").error_code(), "REPORT_ERROR");
        let file_error = CalcError::file_error("read", "calc.toml", "denied");
        assert_eq!(file_error.error_code(), "FILE_ERROR");

        // edge cases degrade to a placeholder, so no calculation-failure variant exists
        let json = r#"{"type":"CalculationFailed","details":{"reason":"y"}}"#;
        assert!(serde_json::from_str::<CalcError>(json).is_err());
    }

    #[test]
    fn test_field_accessor() {
        let error = CalcError::invalid_input("beta_deg", "95", "Tilt must be between 0 and 90");
        assert_eq!(error.field(), Some("beta_deg"));
        assert_eq!(CalcError::report_error("x").field(), None);
    }
}
