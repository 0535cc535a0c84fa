//! Rule runner
//!
//! Runs one resolved rule against one value: extract the custom message,
//! honor a disabled boolean gate, convert the argument, call the handler and
//! raise a [`ValidationFailure`] if it rejects the value.

use crate::args::RuleArg;
use crate::config::ValidatorConfig;
use crate::errors::{RuleError, ValidationFailure};
use crate::extractor::extract;
use crate::registry::ResolvedRule;
use crate::schema::RuleSpec;
use crate::types::Value;

/// Run a single rule. `Ok(())` means the rule passed or was switched off.
pub fn run_rule(
    config: &ValidatorConfig,
    rule: &ResolvedRule,
    rule_name: &str,
    field: &str,
    value: &Value,
    raw: &RuleSpec,
) -> Result<(), RuleError> {
    let extracted = extract(field, rule_name, rule.is_array_valued(), raw)?;

    if rule.is_boolean_gated() && extracted.spec.is_false() {
        tracing::trace!(field = field, rule = rule_name, "rule disabled");
        return Ok(());
    }

    let arg = RuleArg::from_spec(field, rule_name, rule.arg_kind(), extracted.spec)?;
    let result = rule.check(field, value, &arg);
    tracing::trace!(field = field, rule = rule_name, is_valid = result.is_valid, "rule checked");
    if result.is_valid {
        return Ok(());
    }

    let message = match extracted.user_error_text {
        Some(text) if !text.is_empty() => text.to_string(),
        _ if !result.error_text.is_empty() => result.error_text,
        _ => {
            tracing::debug!(field = field, rule = rule_name, "rule failed without a message");
            config.render_fallback(field)
        }
    };
    Err(ValidationFailure::new(value.clone(), message).into())
}
