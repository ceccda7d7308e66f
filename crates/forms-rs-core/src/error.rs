//! Core error types for forms-rs.
//!
//! This module provides the workspace-wide error enum [`FormsError`], which
//! covers export failures, validation errors of the export request form,
//! configuration errors, serialization errors, and IO errors.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Represents a validation error with optional field-level errors.
///
/// Validation errors can be either simple (a single message) or compound
/// (containing per-field error lists). Field errors are kept in a sorted map
/// so that rendered messages are stable.
///
/// # Examples
///
/// ```
/// use forms_rs_core::error::ValidationError;
///
/// // Simple validation error
/// let err = ValidationError::new("Enter a valid date.", "invalid");
///
/// // Field-level validation errors
/// let mut field_errors = std::collections::BTreeMap::new();
/// field_errors.insert(
///     "from_date".to_string(),
///     vec![ValidationError::new("Enter a valid date.", "invalid")],
/// );
/// let err = ValidationError::with_field_errors(field_errors);
/// assert!(err.has_field("from_date"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The primary error message.
    pub message: String,
    /// A short code identifying the type of validation failure (e.g. "invalid").
    pub code: String,
    /// Additional parameters providing context for the error message.
    pub params: BTreeMap<String, String>,
    /// Per-field validation errors, keyed by field name.
    pub field_errors: BTreeMap<String, Vec<Self>>,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a message and code.
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            params: BTreeMap::new(),
            field_errors: BTreeMap::new(),
        }
    }

    /// Creates a `ValidationError` containing per-field errors.
    pub fn with_field_errors(field_errors: BTreeMap<String, Vec<Self>>) -> Self {
        Self {
            message: String::new(),
            code: String::new(),
            params: BTreeMap::new(),
            field_errors,
        }
    }

    /// Adds a parameter to this validation error.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Returns `true` if at least one error is recorded for `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.field_errors.get(field).is_some_and(|errors| !errors.is_empty())
    }

    /// Returns the error codes recorded for `field`, in insertion order.
    pub fn codes_for(&self, field: &str) -> Vec<&str> {
        self.field_errors
            .get(field)
            .map(|errors| errors.iter().map(|e| e.code.as_str()).collect())
            .unwrap_or_default()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.message.is_empty() {
            write!(f, "{}", self.message)?;
        } else if !self.field_errors.is_empty() {
            let mut first = true;
            for (field, errors) in &self.field_errors {
                for error in errors {
                    if !first {
                        write!(f, "; ")?;
                    }
                    write!(f, "{field}: {error}")?;
                    first = false;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// The primary error type for forms-rs.
///
/// Export errors are fatal for the whole export: the engine never returns a
/// partial table. Each variant maps to a process exit code via
/// [`FormsError::exit_code`].
#[derive(Error, Debug)]
pub enum FormsError {
    // ── Export errors ────────────────────────────────────────────────

    /// There are no submissions to infer the field schema from.
    #[error("No submissions to export")]
    EmptyInput,

    /// Extended data was requested but no submission has a client profile
    /// with a resolvable client type.
    #[error("Extended data requested but no submission has a resolvable client type")]
    MissingClientType,

    /// A submission without a sent timestamp reached the row builder.
    #[error("Submission {submission} has no sent timestamp")]
    MissingTimestamp {
        /// The id of the offending submission.
        submission: u64,
    },

    /// A row does not have the same number of cells as the header.
    #[error("Row has {found} cells but the header has {expected}")]
    InvalidDimensions {
        /// The header width.
        expected: usize,
        /// The width of the rejected row.
        found: usize,
    },

    /// The stored field data of a submission could not be decoded.
    #[error("Could not decode data of submission {submission}: {message}")]
    Decode {
        /// The id of the offending submission.
        submission: u64,
        /// The decoder's error message.
        message: String,
    },

    // ── Validation ───────────────────────────────────────────────────

    /// One or more fields of an export request failed validation.
    #[error("Validation error: {0}")]
    ValidationError(ValidationError),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── Serialization ────────────────────────────────────────────────

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl FormsError {
    /// Returns the process exit code associated with this error.
    ///
    /// - `ValidationError`, `ConfigurationError` -> 2 (bad invocation)
    /// - Everything else -> 1
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::ValidationError(_) | Self::ConfigurationError(_) => 2,
            Self::EmptyInput
            | Self::MissingClientType
            | Self::MissingTimestamp { .. }
            | Self::InvalidDimensions { .. }
            | Self::Decode { .. }
            | Self::SerializationError(_)
            | Self::IoError(_) => 1,
        }
    }
}

impl From<ValidationError> for FormsError {
    fn from(err: ValidationError) -> Self {
        Self::ValidationError(err)
    }
}

/// A convenience type alias for `Result<T, FormsError>`.
pub type FormsResult<T> = Result<T, FormsError>;
