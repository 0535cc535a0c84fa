//! Form-level verdict
//!
//! Scans every declared field and decides whether the form as a whole is OK.
//! A field blocks the form when:
//! - its status is `error`, or
//! - it is required, untouched (`normal`), and not sitting at its declared
//!   `default` value.
//!
//! Optional fields (`isRequired: false`) only block while in error.

use crate::config::ValidatorConfig;
use crate::schema::{FieldSchema, FormSchema};
use crate::state::{FieldState, FieldStatus, FormState};

/// Recompute `is_form_ok` with the default configuration
pub fn check_is_form_ok(schema: &FormSchema, state: &FormState) -> FormState {
    check_is_form_ok_with(schema, state, &ValidatorConfig::default())
}

/// Return a copy of `state` with `is_form_ok` derived from its fields
pub fn check_is_form_ok_with(
    schema: &FormSchema,
    state: &FormState,
    config: &ValidatorConfig,
) -> FormState {
    FormState {
        is_form_ok: is_form_ok(schema, state, config),
        fields: state.fields.clone(),
    }
}

/// The verdict alone. Fields missing from `state` count as untouched.
pub fn is_form_ok(schema: &FormSchema, state: &FormState, config: &ValidatorConfig) -> bool {
    let untouched = FieldState::new();
    let blocking = schema
        .iter()
        .filter(|(name, _)| *name != config.aggregate_key)
        .find(|(name, field_schema)| {
            let field = state.field(name).unwrap_or(&untouched);
            blocks_form(field_schema, field)
        });

    match blocking {
        Some((name, _)) => {
            tracing::trace!(field = name, "field blocks form");
            false
        }
        None => true,
    }
}

fn blocks_form(schema: &FieldSchema, field: &FieldState) -> bool {
    if !schema.is_required() && field.status != FieldStatus::Error {
        return false;
    }

    match field.status {
        FieldStatus::Error => true,
        FieldStatus::Ok => false,
        FieldStatus::Normal => match schema.declared_default() {
            Some(default) => *default != field.value,
            None => true,
        },
    }
}
