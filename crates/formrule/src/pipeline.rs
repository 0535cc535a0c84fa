//! Field validation pipeline
//!
//! Validates one field value against its schema in a single pass:
//!
//! 1. Start from a fresh state holding the value. A non-empty value starts
//!    optimistically as `ok`, an empty one stays `normal`.
//! 2. Walk the schema keys in declaration order. `beforeValidation` replaces
//!    the value; a key naming a known rule runs that rule; anything else
//!    (`default`, `isRequired`, unknown names) is skipped.
//! 3. The first failing rule ends the pass and the field becomes `error` with
//!    that rule's message. Later rules never run.
//!
//! A [`ValidationFailure`] never escapes the pipeline; it is always turned
//! into an `error` [`FieldState`]. Only a malformed schema is returned as `Err`.

use crate::config::ValidatorConfig;
use crate::errors::{RuleError, SchemaResult, ValidationFailure};
use crate::registry::RuleRegistry;
use crate::runner::run_rule;
use crate::schema::{FieldSchema, RuleSpec, SchemaEntry};
use crate::state::{FieldState, FieldStatus};
use crate::types::Value;

// ============================================================================
// Public API
// ============================================================================

/// Validate one field without suspending
///
/// Fails with [`SchemaError::AsyncTransformInSyncContext`](crate::SchemaError)
/// if the schema declares an async `beforeValidation`.
///
/// # Example
///
/// ```
/// use formrule::{validate_field, FieldSchema, FieldStatus, RuleRegistry, ValidatorConfig, Value};
///
/// let schema = FieldSchema::new().rule("enum", vec!["tom", "jerry"]);
/// let state = validate_field(
///     &RuleRegistry::new(),
///     &ValidatorConfig::default(),
///     "title",
///     Value::from("not"),
///     &schema,
/// )
/// .unwrap();
///
/// assert_eq!(state.status, FieldStatus::Error);
/// assert_eq!(state.error_text, "Value of title should be within [tom,jerry].");
/// ```
pub fn validate_field(
    registry: &RuleRegistry,
    config: &ValidatorConfig,
    field: &str,
    value: Value,
    schema: &FieldSchema,
) -> SchemaResult<FieldState> {
    let mut state = begin(value);

    for (key, entry) in schema.entries() {
        match entry {
            SchemaEntry::BeforeValidation(transform) => {
                let current = std::mem::take(&mut state.value);
                state.value = transform.apply_sync(field, current)?;
            }
            SchemaEntry::Rule(spec) => {
                if let Some(failure) = check_rule(registry, config, field, key, spec, &state.value)? {
                    return Ok(fail(failure));
                }
            }
            SchemaEntry::Default(_) | SchemaEntry::IsRequired(_) => {}
        }
    }

    Ok(state)
}

/// Validate one field, awaiting async `beforeValidation` hooks
///
/// Nothing outside this future is touched until it completes, so dropping
/// it part-way leaves the caller's previous field state in place.
pub async fn validate_field_async(
    registry: &RuleRegistry,
    config: &ValidatorConfig,
    field: &str,
    value: Value,
    schema: &FieldSchema,
) -> SchemaResult<FieldState> {
    let mut state = begin(value);

    for (key, entry) in schema.entries() {
        match entry {
            SchemaEntry::BeforeValidation(transform) => {
                let current = std::mem::take(&mut state.value);
                state.value = transform.apply(field, current).await;
            }
            SchemaEntry::Rule(spec) => {
                if let Some(failure) = check_rule(registry, config, field, key, spec, &state.value)? {
                    return Ok(fail(failure));
                }
            }
            SchemaEntry::Default(_) | SchemaEntry::IsRequired(_) => {}
        }
    }

    Ok(state)
}

// ============================================================================
// Steps
// ============================================================================

fn begin(value: Value) -> FieldState {
    let status = if value.is_empty() {
        FieldStatus::Normal
    } else {
        FieldStatus::Ok
    };
    FieldState {
        value,
        status,
        error_text: String::new(),
    }
}

/// Run `key` if it names a rule. `Ok(Some(_))` is a rule failure.
fn check_rule(
    registry: &RuleRegistry,
    config: &ValidatorConfig,
    field: &str,
    key: &str,
    spec: &RuleSpec,
    value: &Value,
) -> SchemaResult<Option<ValidationFailure>> {
    let Some(rule) = registry.resolve(key) else {
        if config.log_unknown_keys {
            tracing::debug!(field = field, key = key, "schema key names no known rule; skipped");
        }
        return Ok(None);
    };

    match run_rule(config, &rule, key, field, value, spec) {
        Ok(()) => Ok(None),
        Err(RuleError::Failed(failure)) => {
            tracing::debug!(field = field, rule = key, message = %failure.message, "rule failed");
            Ok(Some(failure))
        }
        Err(RuleError::Schema(err)) => Err(err),
    }
}

fn fail(failure: ValidationFailure) -> FieldState {
    FieldState::from(failure)
}
