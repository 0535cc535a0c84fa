//! Validation error types
//!
//! Two kinds of failure leave the rule engine:
//! - [`ValidationFailure`]: a rule did not pass. Expected and user-facing; the
//!   field pipeline turns it into an `error` [`FieldState`](crate::FieldState).
//! - [`SchemaError`]: the schema itself cannot be evaluated (wrong argument
//!   type, nested enum list, unknown field). Returned to the caller.
//!
//! Recoverable configuration problems, such as a `beforeValidation` that is not
//! callable, are not errors at all: they are logged with `tracing::warn!` and
//! validation continues.

use crate::types::Value;
use thiserror::Error;

// ============================================================================
// Result Aliases
// ============================================================================

/// Result type for operations that may hit a malformed schema
pub type SchemaResult<T> = Result<T, SchemaError>;

// ============================================================================
// Validation Failure
// ============================================================================

/// A rule rejected a value
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ValidationFailure {
    /// The value the failing rule saw (after any `beforeValidation` transform)
    pub value: Value,
    /// Resolved message: the caller's custom text, or the rule's default
    pub message: String,
}

impl ValidationFailure {
    /// Create a new validation failure
    pub fn new(value: Value, message: impl Into<String>) -> Self {
        Self {
            value,
            message: message.into(),
        }
    }
}

// ============================================================================
// Schema Error
// ============================================================================

/// A schema fragment that cannot be evaluated
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("rule `{rule}` on field `{field}` expects {expected}, got {found}")]
    ArgumentMismatch {
        field: String,
        rule: String,
        expected: &'static str,
        found: String,
    },

    /// An array-valued rule was given an array of arrays
    #[error("rule `{rule}` on field `{field}` has a nested array argument, which is not supported")]
    NestedSequence { field: String, rule: String },

    #[error("rule `{rule}` on field `{field}` must be a bare argument or an [argument, message] pair")]
    MalformedPair { field: String, rule: String },

    #[error("rule `{rule}` on field `{field}` has an invalid regex: {reason}")]
    InvalidPattern {
        field: String,
        rule: String,
        reason: String,
    },

    #[error("rule `{0}` is already registered")]
    DuplicateRule(String),

    /// The name is a schema directive, not a rule
    #[error("`{0}` is a reserved schema key and cannot name a rule")]
    ReservedRuleName(String),

    #[error("field `{0}` is not declared in the schema")]
    UnknownField(String),

    #[error("field `{0}` declares an async beforeValidation; use the async entry point")]
    AsyncTransformInSyncContext(String),

    #[error("invalid schema document: {0}")]
    InvalidDocument(String),
}

// ============================================================================
// Rule Error
// ============================================================================

/// Outcome of running a single rule that did not pass
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    #[error(transparent)]
    Failed(#[from] ValidationFailure),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_displays_message_only() {
        let failure = ValidationFailure::new(Value::from("not"), "Value of title is not valid.");
        assert_eq!(failure.to_string(), "Value of title is not valid.");
        assert_eq!(failure.value, Value::from("not"));
    }

    #[test]
    fn test_schema_error_display() {
        let err = SchemaError::ArgumentMismatch {
            field: "age".to_string(),
            rule: "min".to_string(),
            expected: "a number",
            found: "boolean".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "rule `min` on field `age` expects a number, got boolean"
        );
        assert_eq!(
            SchemaError::UnknownField("nope".to_string()).to_string(),
            "field `nope` is not declared in the schema"
        );
    }

    #[test]
    fn test_rule_error_is_transparent() {
        let err: RuleError = ValidationFailure::new(Value::Null, "boom").into();
        assert_eq!(err.to_string(), "boom");

        let err: RuleError = SchemaError::DuplicateRule("enum".to_string()).into();
        assert_eq!(err.to_string(), "rule `enum` is already registered");
    }
}
