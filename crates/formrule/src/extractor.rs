//! Custom message extraction
//!
//! A rule value is either a bare argument or `[argument, customErrorText]`.
//! Array-valued rules make the two look alike: `enum: ['tom', 'jerry']` is a
//! bare argument, `enum: [['tom', 'jerry'], 'Pick one']` is a pair. A list is
//! a pair unless the rule is array-valued and its first element is not itself
//! a list.

use crate::errors::{SchemaError, SchemaResult};
use crate::schema::RuleSpec;
use crate::types::Value;

/// Effective rule argument plus the caller's message, if any
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted<'a> {
    pub spec: &'a RuleSpec,
    pub user_error_text: Option<&'a str>,
}

impl<'a> Extracted<'a> {
    fn bare(spec: &'a RuleSpec) -> Self {
        Self {
            spec,
            user_error_text: None,
        }
    }
}

/// Split a declared rule value into argument and custom message
pub fn extract<'a>(
    field: &str,
    rule: &str,
    array_valued: bool,
    raw: &'a RuleSpec,
) -> SchemaResult<Extracted<'a>> {
    let RuleSpec::Seq(items) = raw else {
        return Ok(Extracted::bare(raw));
    };

    if array_valued && !items.first().is_some_and(RuleSpec::is_seq) {
        return Ok(Extracted::bare(raw));
    }

    let malformed = || SchemaError::MalformedPair {
        field: field.to_string(),
        rule: rule.to_string(),
    };

    match items.as_slice() {
        [spec] => Ok(Extracted::bare(spec)),
        [spec, RuleSpec::Scalar(Value::String(message))] => Ok(Extracted {
            spec,
            user_error_text: Some(message.as_str()),
        }),
        // [[a, b], [c, d]]: an array of arrays, not a pair
        [_, RuleSpec::Seq(_), ..] if array_valued => Err(SchemaError::NestedSequence {
            field: field.to_string(),
            rule: rule.to_string(),
        }),
        _ => Err(malformed()),
    }
}
