//! Typed rule arguments
//!
//! Each built-in rule expects one kind of argument. The declared [`RuleSpec`]
//! is converted into a [`RuleArg`] of that kind when the rule runs.

use crate::errors::{SchemaError, SchemaResult};
use crate::schema::RuleSpec;
use crate::types::Value;
use regex::Regex;

// ============================================================================
// Argument Kinds
// ============================================================================

/// The argument shape a rule expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// Non-negative character count
    Length,
    /// Substring / prefix / suffix
    Text,
    /// Regular expression (a regex, or a string compiled on use)
    Pattern,
    /// Number to compare against
    Number,
    /// List of allowed values
    Choices,
    /// On/off switch of a boolean-gated rule
    Flag,
    /// Passed through untouched to custom handlers
    Raw,
}

impl ArgKind {
    /// Human-readable description used in schema errors
    pub fn expected(self) -> &'static str {
        match self {
            Self::Length => "a non-negative integer",
            Self::Text => "a string",
            Self::Pattern => "a regex",
            Self::Number => "a number",
            Self::Choices => "an array of values",
            Self::Flag => "a boolean",
            Self::Raw => "any value",
        }
    }
}

// ============================================================================
// Rule Arguments
// ============================================================================

/// Argument handed to a rule handler
#[derive(Debug, Clone)]
pub enum RuleArg {
    Length(usize),
    Text(String),
    Pattern(Regex),
    Number(f64),
    Choices(Vec<Value>),
    Flag(bool),
    /// Declared value for custom rules
    Raw(RuleSpec),
}

impl RuleArg {
    /// Convert a declared spec into the argument `kind` calls for
    pub fn from_spec(field: &str, rule: &str, kind: ArgKind, spec: &RuleSpec) -> SchemaResult<Self> {
        let mismatch = || SchemaError::ArgumentMismatch {
            field: field.to_string(),
            rule: rule.to_string(),
            expected: kind.expected(),
            found: spec.describe(),
        };

        match (kind, spec) {
            (ArgKind::Raw, _) => Ok(Self::Raw(spec.clone())),

            (ArgKind::Length, RuleSpec::Scalar(Value::Int(n))) => {
                usize::try_from(*n).map(Self::Length).map_err(|_| mismatch())
            }
            (ArgKind::Length, RuleSpec::Scalar(Value::Float(n)))
                if *n >= 0.0 && n.fract() == 0.0 && n.is_finite() =>
            {
                Ok(Self::Length(*n as usize))
            }

            (ArgKind::Text, RuleSpec::Scalar(Value::String(s))) => Ok(Self::Text(s.clone())),
            (ArgKind::Text, RuleSpec::Scalar(v @ (Value::Int(_) | Value::Float(_)))) => {
                Ok(Self::Text(v.to_string()))
            }

            (ArgKind::Pattern, RuleSpec::Pattern(re)) => Ok(Self::Pattern(re.clone())),
            (ArgKind::Pattern, RuleSpec::Scalar(Value::String(source))) => Regex::new(source)
                .map(Self::Pattern)
                .map_err(|e| SchemaError::InvalidPattern {
                    field: field.to_string(),
                    rule: rule.to_string(),
                    reason: e.to_string(),
                }),

            (ArgKind::Number, RuleSpec::Scalar(value)) => {
                let number = match value {
                    Value::Int(_) | Value::Float(_) | Value::String(_) => value.as_number(),
                    _ => None,
                };
                number.map(Self::Number).ok_or_else(mismatch)
            }

            (ArgKind::Choices, RuleSpec::Seq(items)) => items
                .iter()
                .map(|item| match item {
                    RuleSpec::Scalar(value) => Ok(value.clone()),
                    RuleSpec::Seq(_) => Err(SchemaError::NestedSequence {
                        field: field.to_string(),
                        rule: rule.to_string(),
                    }),
                    RuleSpec::Pattern(_) => Err(mismatch()),
                })
                .collect::<SchemaResult<Vec<_>>>()
                .map(Self::Choices),

            (ArgKind::Flag, RuleSpec::Scalar(Value::Bool(b))) => Ok(Self::Flag(*b)),

            _ => Err(mismatch()),
        }
    }
}
