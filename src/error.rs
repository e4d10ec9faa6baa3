//! Error types for the agent message schema
//!
//! Schema violations are reported through [`SchemaValidationError`], which is the
//! only error a record constructor or decoder raises. Boundary helpers that start
//! from raw JSON text wrap it in [`PayloadError`] so callers can tell malformed
//! input apart from well-formed input that breaks the schema.

use std::fmt;
use thiserror::Error;

/// A single field-level schema violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON pointer of the offending field (e.g. `/message/embeds/img/content_type`)
    pub field: String,
    /// What the schema requires at that location
    pub expected: String,
    /// What was actually found
    pub actual: String,
}

impl Violation {
    pub fn new<F, E, A>(field: F, expected: E, actual: A) -> Self
    where
        F: Into<String>,
        E: Into<String>,
        A: Into<String>,
    {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = if self.field.is_empty() {
            "<root>"
        } else {
            &self.field
        };
        write!(
            f,
            "at '{field}': expected {}, got {}",
            self.expected, self.actual
        )
    }
}

/// Raised when a record cannot be constructed because a field is missing,
/// has the wrong shape, or a nested record is itself invalid.
///
/// Construction is atomic: when this error is returned no record exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Schema validation failed: {}", join_violations(.violations))]
pub struct SchemaValidationError {
    pub violations: Vec<Violation>,
}

impl SchemaValidationError {
    /// Create an error carrying one violation
    pub fn single<F, E, A>(field: F, expected: E, actual: A) -> Self
    where
        F: Into<String>,
        E: Into<String>,
        A: Into<String>,
    {
        Self {
            violations: vec![Violation::new(field, expected, actual)],
        }
    }

    /// Check whether any violation points at the given field
    pub fn mentions(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors raised when decoding a payload from JSON text
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Malformed JSON payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] SchemaValidationError),
}

impl PayloadError {
    /// Schema violations, if the payload was well-formed JSON
    pub fn violations(&self) -> &[Violation] {
        match self {
            PayloadError::Malformed(_) => &[],
            PayloadError::Invalid(e) => &e.violations,
        }
    }
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_violation_display() {
        let error = SchemaValidationError::single("/content_type", "a string", "number 42");

        assert_eq!(error.violations.len(), 1);
        assert_eq!(
            error.to_string(),
            "Schema validation failed: at '/content_type': expected a string, got number 42"
        );
    }

    #[test]
    fn test_root_field_display() {
        let violation = Violation::new("", "an object", "array");
        assert_eq!(violation.to_string(), "at '<root>': expected an object, got array");
    }

    #[test]
    fn test_multiple_violations_joined() {
        let error = SchemaValidationError {
            violations: vec![
                Violation::new("/message", "a required property", "missing"),
                Violation::new("/access_token", "a string or null", "boolean true"),
            ],
        };

        let rendered = error.to_string();
        assert!(rendered.contains("/message"));
        assert!(rendered.contains("/access_token"));
        assert!(rendered.contains("; "));
    }

    #[test]
    fn test_mentions() {
        let error = SchemaValidationError::single("/message/text", "a string", "null");
        assert!(error.mentions("/message/text"));
        assert!(!error.mentions("/message"));
    }

    #[test]
    fn test_payload_error_violations() {
        let malformed: PayloadError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(malformed.violations().is_empty());
        assert!(malformed.to_string().starts_with("Malformed JSON payload"));

        let invalid: PayloadError =
            SchemaValidationError::single("/uri", "a string", "missing").into();
        assert_eq!(invalid.violations().len(), 1);
        assert!(invalid.to_string().starts_with("Schema validation failed"));
    }
}
