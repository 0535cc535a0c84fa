//! Public entry point tying the pipeline and the aggregator together

use crate::aggregate::check_is_form_ok_with;
use crate::config::ValidatorConfig;
use crate::errors::{SchemaError, SchemaResult};
use crate::pipeline::{validate_field, validate_field_async};
use crate::registry::RuleRegistry;
use crate::schema::{FieldSchema, FormSchema};
use crate::state::{FieldState, FormState};
use crate::types::Value;

/// Validates field input events against a form schema
///
/// Each call validates one field, merges the result into a copy of the given
/// [`FormState`] and recomputes the form verdict. The validator holds no state
/// between calls; the caller owns the form state and must apply results for
/// the same field in order.
///
/// # Example
///
/// ```
/// use formrule::{FieldSchema, FieldStatus, FormSchema, FormValidator};
///
/// # tokio_test_block(async {
/// let validator = FormValidator::new(
///     FormSchema::new().field("title", FieldSchema::new().rule("enum", vec!["tom", "jerry"])),
/// );
/// let state = validator.initial_state();
/// let state = validator.validate("title", "not", &state).await.unwrap();
///
/// let title = state.field("title").unwrap();
/// assert_eq!(title.status, FieldStatus::Error);
/// assert!(!state.is_form_ok);
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FormValidator {
    schema: FormSchema,
    registry: RuleRegistry,
    config: ValidatorConfig,
}

impl FormValidator {
    /// Validator with built-in rules and default configuration
    pub fn new(schema: FormSchema) -> Self {
        Self {
            schema,
            registry: RuleRegistry::new(),
            config: ValidatorConfig::default(),
        }
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the rule registry (to add custom rules)
    pub fn with_registry(mut self, registry: RuleRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Form state before any input
    pub fn initial_state(&self) -> FormState {
        FormState::initial_with(&self.schema, &self.config)
    }

    /// Validate one input event, awaiting any async `beforeValidation`
    pub async fn validate(
        &self,
        field: &str,
        raw: impl Into<Value>,
        state: &FormState,
    ) -> SchemaResult<FormState> {
        let field_schema = self.field_schema(field)?;
        let field_state =
            validate_field_async(&self.registry, &self.config, field, raw.into(), field_schema).await?;
        Ok(self.apply(field, field_state, state))
    }

    /// Validate one input event without suspending
    pub fn validate_sync(
        &self,
        field: &str,
        raw: impl Into<Value>,
        state: &FormState,
    ) -> SchemaResult<FormState> {
        let field_schema = self.field_schema(field)?;
        let field_state =
            validate_field(&self.registry, &self.config, field, raw.into(), field_schema)?;
        Ok(self.apply(field, field_state, state))
    }

    /// Recompute the verdict for an externally modified state
    pub fn check_is_form_ok(&self, state: &FormState) -> FormState {
        check_is_form_ok_with(&self.schema, state, &self.config)
    }

    fn field_schema(&self, field: &str) -> SchemaResult<&FieldSchema> {
        if field == self.config.aggregate_key {
            return Err(SchemaError::UnknownField(field.to_string()));
        }
        self.schema
            .get(field)
            .ok_or_else(|| SchemaError::UnknownField(field.to_string()))
    }

    fn apply(&self, field: &str, field_state: FieldState, state: &FormState) -> FormState {
        tracing::debug!(
            field = field,
            status = %field_state.status,
            error_text = field_state.error_text.as_str(),
            "field validated"
        );
        let merged = state.merge(field, field_state);
        check_is_form_ok_with(&self.schema, &merged, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FieldStatus;

    fn validator() -> FormValidator {
        FormValidator::new(
            FormSchema::new()
                .field("title", FieldSchema::new().rule("minLength", 3))
                .field("nickname", FieldSchema::new().optional().rule("maxLength", 5)),
        )
    }

    #[test]
    fn test_validate_sync_merges_and_aggregates() {
        let v = validator();
        let state = v.initial_state();
        assert!(!state.is_form_ok);

        let state = v.validate_sync("title", "abc", &state).unwrap();
        assert_eq!(state.field("title").unwrap().status, FieldStatus::Ok);
        assert!(state.is_form_ok);

        let state = v.validate_sync("nickname", "toolong", &state).unwrap();
        assert!(state.field("nickname").unwrap().is_error());
        assert!(!state.is_form_ok);
    }

    #[test]
    fn test_unknown_field() {
        let v = validator();
        let state = v.initial_state();
        assert_eq!(
            v.validate_sync("missing", "x", &state),
            Err(SchemaError::UnknownField("missing".to_string()))
        );
        assert!(v.validate_sync("collectValues", "x", &state).is_err());
    }

    #[test]
    fn test_input_state_untouched() {
        let v = validator();
        let before = v.initial_state();
        let _after = v.validate_sync("title", "a", &before).unwrap();
        assert_eq!(before, v.initial_state());
    }

    #[tokio::test]
    async fn test_validate_async() {
        let v = validator();
        let state = v.validate("title", "ab", &v.initial_state()).await.unwrap();
        let title = state.field("title").unwrap();
        assert_eq!(title.error_text, "title's length should be equal or greater than 3.");
        assert!(!state.is_form_ok);
    }
}
