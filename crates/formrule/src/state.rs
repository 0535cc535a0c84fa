//! Field and form state handed to the binding layer

use crate::aggregate::check_is_form_ok_with;
use crate::config::ValidatorConfig;
use crate::errors::ValidationFailure;
use crate::schema::FormSchema;
use crate::types::Value;
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Field Status
// ============================================================================

/// Validation status of one field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FieldStatus {
    /// Untouched / initial
    #[default]
    Normal,
    /// Passed validation
    Ok,
    /// Failed validation
    Error,
}

impl fmt::Display for FieldStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Ok => write!(f, "ok"),
            Self::Error => write!(f, "error"),
        }
    }
}

// ============================================================================
// Field State
// ============================================================================

/// Current value and validation outcome of one field
///
/// `error_text` is non-empty exactly when `status` is [`FieldStatus::Error`].
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct FieldState {
    pub value: Value,
    pub status: FieldStatus,
    pub error_text: String,
}

impl FieldState {
    /// Fresh state: no value, status normal
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh state holding `value`, status normal
    pub fn with_value(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    /// Passed validation
    pub fn ok(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            status: FieldStatus::Ok,
            error_text: String::new(),
        }
    }

    /// Failed validation with `error_text`
    pub fn error(value: impl Into<Value>, error_text: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            status: FieldStatus::Error,
            error_text: error_text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == FieldStatus::Error
    }
}

impl From<ValidationFailure> for FieldState {
    fn from(failure: ValidationFailure) -> Self {
        Self::error(failure.value, failure.message)
    }
}

// ============================================================================
// Form State
// ============================================================================

/// Every field's state plus the derived form verdict
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FormState {
    /// True when no field blocks submission; only ever set by the aggregator
    #[cfg_attr(feature = "serde", serde(rename = "isFormOK"))]
    pub is_form_ok: bool,
    pub fields: BTreeMap<String, FieldState>,
}

impl FormState {
    /// Initial state for a schema: each field holds its `default` (or null),
    /// status normal, with the verdict already derived.
    pub fn initial(schema: &FormSchema) -> Self {
        Self::initial_with(schema, &ValidatorConfig::default())
    }

    /// [`FormState::initial`] with an explicit configuration
    pub fn initial_with(schema: &FormSchema, config: &ValidatorConfig) -> Self {
        let fields = schema
            .iter()
            .filter(|(name, _)| *name != config.aggregate_key)
            .map(|(name, field)| {
                let value = field.declared_default().cloned().unwrap_or_default();
                (name.to_string(), FieldState::with_value(value))
            })
            .collect();
        let state = Self {
            is_form_ok: false,
            fields,
        };
        check_is_form_ok_with(schema, &state, config)
    }

    /// State of one field
    pub fn field(&self, name: &str) -> Option<&FieldState> {
        self.fields.get(name)
    }

    /// A copy with `name` replaced by `field`. The verdict is not recomputed.
    pub fn merge(&self, name: impl Into<String>, field: FieldState) -> Self {
        let mut merged = self.clone();
        merged.fields.insert(name.into(), field);
        merged
    }

    /// Current values of all fields
    pub fn values(&self) -> Vec<(String, Value)> {
        self.fields
            .iter()
            .map(|(name, field)| (name.clone(), field.value.clone()))
            .collect()
    }

    /// Names of fields currently in error
    pub fn error_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(_, field)| field.is_error())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldSchema;

    #[test]
    fn test_field_state_constructors() {
        let fresh = FieldState::new();
        assert_eq!(fresh.status, FieldStatus::Normal);
        assert_eq!(fresh.value, Value::Null);
        assert!(fresh.error_text.is_empty());

        let ok = FieldState::ok("jerry");
        assert_eq!(ok.status, FieldStatus::Ok);
        assert!(ok.error_text.is_empty());

        let failed = FieldState::from(ValidationFailure::new(Value::from("x"), "bad"));
        assert!(failed.is_error());
        assert_eq!(failed.error_text, "bad");
        assert_eq!(failed.value, Value::from("x"));
    }

    #[test]
    fn test_status_display() {
        assert_eq!(FieldStatus::Normal.to_string(), "normal");
        assert_eq!(FieldStatus::Ok.to_string(), "ok");
        assert_eq!(FieldStatus::Error.to_string(), "error");
    }

    #[test]
    fn test_initial_state_uses_defaults() {
        let schema = FormSchema::new()
            .field("title", FieldSchema::new().rule("minLength", 1).default_value(""))
            .field("age", FieldSchema::new().optional());

        let state = FormState::initial(&schema);
        assert_eq!(state.field("title").unwrap().value, Value::from(""));
        assert_eq!(state.field("age").unwrap().value, Value::Null);
        assert!(state.is_form_ok);
    }

    #[test]
    fn test_initial_state_blocks_without_default() {
        let schema = FormSchema::new().field("title", FieldSchema::new().rule("minLength", 1));
        assert!(!FormState::initial(&schema).is_form_ok);
    }

    #[test]
    fn test_merge_is_pure() {
        let schema = FormSchema::new().field("title", FieldSchema::new());
        let before = FormState::initial(&schema);
        let after = before.merge("title", FieldState::error("x", "bad"));

        assert_eq!(before.field("title").unwrap().status, FieldStatus::Normal);
        assert!(after.field("title").unwrap().is_error());
        assert_eq!(after.error_fields(), vec!["title"]);
        assert_eq!(after.values(), vec![("title".to_string(), Value::from("x"))]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serializes_for_binding_layer() {
        let state = FormState::default().merge(
            "title",
            FieldState::error("not", "Value of title should be within [tom,jerry]."),
        );
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "isFormOK": false,
                "fields": {
                    "title": {
                        "value": "not",
                        "status": "error",
                        "errorText": "Value of title should be within [tom,jerry]."
                    }
                }
            })
        );
    }
}
