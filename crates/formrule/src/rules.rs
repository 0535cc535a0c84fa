//! Built-in rule catalogue
//!
//! Every built-in rule is a [`Rule`] variant. Name lookup is an explicit match,
//! and each variant knows its argument kind, its classification (array-valued
//! or boolean-gated) and how to test a value.

use crate::args::{ArgKind, RuleArg};
use crate::formats;
use crate::types::Value;

// ============================================================================
// Rule Result
// ============================================================================

/// A handler's verdict plus its default message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleResult {
    pub is_valid: bool,
    pub error_text: String,
}

impl RuleResult {
    /// Passing verdict
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error_text: String::new(),
        }
    }

    /// Failing verdict with its default message
    pub fn invalid(error_text: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error_text: error_text.into(),
        }
    }

    /// Pass if `ok`, otherwise fail with the message built by `message`
    pub fn check(ok: bool, message: impl FnOnce() -> String) -> Self {
        if ok {
            Self::valid()
        } else {
            Self::invalid(message())
        }
    }
}

// ============================================================================
// Built-in Rules
// ============================================================================

/// Built-in rules, addressed in schemas by [`Rule::name`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    // String rules
    MinLength,
    MaxLength,
    ExactLength,
    Include,
    Exclude,
    StartWith,
    EndWith,
    MatchRegex,
    Enum,

    // Boolean-gated format rules
    IsEmail,
    IsUrl,
    IsCreditCard,
    IsHexColor,
    IsIp,
    NotEmpty,
    IsInt,
    IsDecimal,
    IsPositive,
    IsNegative,

    // Numeric rules
    Min,
    Max,
    Equal,
    NotEqual,
}

impl Rule {
    /// Every built-in rule
    pub const ALL: [Rule; 23] = [
        Rule::MinLength,
        Rule::MaxLength,
        Rule::ExactLength,
        Rule::Include,
        Rule::Exclude,
        Rule::StartWith,
        Rule::EndWith,
        Rule::MatchRegex,
        Rule::Enum,
        Rule::IsEmail,
        Rule::IsUrl,
        Rule::IsCreditCard,
        Rule::IsHexColor,
        Rule::IsIp,
        Rule::NotEmpty,
        Rule::IsInt,
        Rule::IsDecimal,
        Rule::IsPositive,
        Rule::IsNegative,
        Rule::Min,
        Rule::Max,
        Rule::Equal,
        Rule::NotEqual,
    ];

    /// Look up a built-in rule by its schema name
    pub fn from_name(name: &str) -> Option<Self> {
        let rule = match name {
            "minLength" => Self::MinLength,
            "maxLength" => Self::MaxLength,
            "exactLength" => Self::ExactLength,
            "include" => Self::Include,
            "exclude" => Self::Exclude,
            "startWith" => Self::StartWith,
            "endWith" => Self::EndWith,
            "matchRegex" => Self::MatchRegex,
            "enum" => Self::Enum,
            "isEmail" => Self::IsEmail,
            "isUrl" => Self::IsUrl,
            "isCreditCard" => Self::IsCreditCard,
            "isHexColor" => Self::IsHexColor,
            "isIP" => Self::IsIp,
            "notEmpty" => Self::NotEmpty,
            "isInt" => Self::IsInt,
            "isDecimal" => Self::IsDecimal,
            "isPositive" => Self::IsPositive,
            "isNegative" => Self::IsNegative,
            "min" => Self::Min,
            "max" => Self::Max,
            "equal" => Self::Equal,
            "notEqual" => Self::NotEqual,
            _ => return None,
        };
        Some(rule)
    }

    /// Schema name of this rule
    pub fn name(self) -> &'static str {
        match self {
            Self::MinLength => "minLength",
            Self::MaxLength => "maxLength",
            Self::ExactLength => "exactLength",
            Self::Include => "include",
            Self::Exclude => "exclude",
            Self::StartWith => "startWith",
            Self::EndWith => "endWith",
            Self::MatchRegex => "matchRegex",
            Self::Enum => "enum",
            Self::IsEmail => "isEmail",
            Self::IsUrl => "isUrl",
            Self::IsCreditCard => "isCreditCard",
            Self::IsHexColor => "isHexColor",
            Self::IsIp => "isIP",
            Self::NotEmpty => "notEmpty",
            Self::IsInt => "isInt",
            Self::IsDecimal => "isDecimal",
            Self::IsPositive => "isPositive",
            Self::IsNegative => "isNegative",
            Self::Min => "min",
            Self::Max => "max",
            Self::Equal => "equal",
            Self::NotEqual => "notEqual",
        }
    }

    /// Argument shape this rule expects
    pub fn arg_kind(self) -> ArgKind {
        match self {
            Self::MinLength | Self::MaxLength | Self::ExactLength => ArgKind::Length,
            Self::Include | Self::Exclude | Self::StartWith | Self::EndWith => ArgKind::Text,
            Self::MatchRegex => ArgKind::Pattern,
            Self::Enum => ArgKind::Choices,
            Self::Min | Self::Max | Self::Equal | Self::NotEqual => ArgKind::Number,
            Self::IsEmail
            | Self::IsUrl
            | Self::IsCreditCard
            | Self::IsHexColor
            | Self::IsIp
            | Self::NotEmpty
            | Self::IsInt
            | Self::IsDecimal
            | Self::IsPositive
            | Self::IsNegative => ArgKind::Flag,
        }
    }

    /// Rules whose bare argument is itself a list
    pub fn is_array_valued(self) -> bool {
        self.arg_kind() == ArgKind::Choices
    }

    /// Rules that a literal `false` switches off
    pub fn is_boolean_gated(self) -> bool {
        self.arg_kind() == ArgKind::Flag
    }

    /// Test `value` against this rule.
    ///
    /// An argument of the wrong kind never passes; the runner converts
    /// arguments with [`RuleArg::from_spec`] first, so this only happens on
    /// direct calls.
    pub fn check(self, field: &str, value: &Value, arg: &RuleArg) -> RuleResult {
        match (self, arg) {
            (Self::MinLength, RuleArg::Length(n)) => RuleResult::check(char_len(value) >= *n, || {
                format!("{}'s length should be equal or greater than {}.", field, n)
            }),
            (Self::MaxLength, RuleArg::Length(n)) => RuleResult::check(char_len(value) <= *n, || {
                format!("{}'s length should be equal or less than {}.", field, n)
            }),
            (Self::ExactLength, RuleArg::Length(n)) => RuleResult::check(char_len(value) == *n, || {
                format!("{}'s length should be equal to {}.", field, n)
            }),
            (Self::Include, RuleArg::Text(s)) => RuleResult::check(value.as_text().contains(s.as_str()), || {
                format!("{} should include {}.", field, s)
            }),
            (Self::Exclude, RuleArg::Text(s)) => RuleResult::check(!value.as_text().contains(s.as_str()), || {
                format!("{} should not include {}.", field, s)
            }),
            (Self::StartWith, RuleArg::Text(s)) => RuleResult::check(value.as_text().starts_with(s.as_str()), || {
                format!("{} should start with '{}'.", field, s)
            }),
            (Self::EndWith, RuleArg::Text(s)) => RuleResult::check(value.as_text().ends_with(s.as_str()), || {
                format!("{} should end with '{}'.", field, s)
            }),
            (Self::MatchRegex, RuleArg::Pattern(re)) => RuleResult::check(re.is_match(&value.as_text()), || {
                format!("Value of {} is not valid.", field)
            }),
            (Self::Enum, RuleArg::Choices(choices)) => RuleResult::check(choices.contains(value), || {
                format!("Value of {} should be within [{}].", field, Value::List(choices.clone()))
            }),

            // A disabled gate never reaches a handler through the runner
            (rule, RuleArg::Flag(false)) if rule.is_boolean_gated() => RuleResult::valid(),
            (Self::IsEmail, RuleArg::Flag(true)) => text_format(value, formats::validate_email, || {
                format!("{} is not a valid email.", field)
            }),
            (Self::IsUrl, RuleArg::Flag(true)) => text_format(value, formats::validate_url, || {
                format!("{} is not a valid url.", field)
            }),
            (Self::IsCreditCard, RuleArg::Flag(true)) => text_format(value, formats::validate_credit_card, || {
                format!("{} is not a valid credit card number.", field)
            }),
            (Self::IsHexColor, RuleArg::Flag(true)) => text_format(value, formats::validate_hex_color, || {
                format!("{} is not a valid hex color.", field)
            }),
            (Self::IsIp, RuleArg::Flag(true)) => text_format(value, formats::validate_ip, || {
                format!("{} is not a valid IP address.", field)
            }),
            (Self::NotEmpty, RuleArg::Flag(true)) => RuleResult::check(!value.is_empty(), || {
                format!("{} should not be empty.", field)
            }),
            (Self::IsInt, RuleArg::Flag(true)) => {
                let ok = matches!(value, Value::Int(_)) || formats::validate_int(&value.as_text());
                RuleResult::check(ok, || format!("{} should be an integer.", field))
            }
            (Self::IsDecimal, RuleArg::Flag(true)) => {
                let ok = matches!(value, Value::Int(_) | Value::Float(_))
                    || formats::validate_decimal(&value.as_text());
                RuleResult::check(ok, || format!("{} should be a decimal number.", field))
            }
            (Self::IsPositive, RuleArg::Flag(true)) => {
                RuleResult::check(value.as_number().is_some_and(|n| n > 0.0), || {
                    format!("{} should be a positive number.", field)
                })
            }
            (Self::IsNegative, RuleArg::Flag(true)) => {
                RuleResult::check(value.as_number().is_some_and(|n| n < 0.0), || {
                    format!("{} should be a negative number.", field)
                })
            }

            (Self::Min, RuleArg::Number(bound)) => compare(field, value, |n| n >= *bound, || {
                format!("{} should be equal or greater than {}.", field, Value::Float(*bound))
            }),
            (Self::Max, RuleArg::Number(bound)) => compare(field, value, |n| n <= *bound, || {
                format!("{} should be equal or less than {}.", field, Value::Float(*bound))
            }),
            (Self::Equal, RuleArg::Number(target)) => compare(field, value, |n| n == *target, || {
                format!("{} should be equal to {}.", field, Value::Float(*target))
            }),
            (Self::NotEqual, RuleArg::Number(target)) => compare(field, value, |n| n != *target, || {
                format!("{} should not be equal to {}.", field, Value::Float(*target))
            }),

            (rule, arg) => RuleResult::invalid(format!(
                "{} received an unusable argument for {}: {:?}.",
                field,
                rule.name(),
                arg
            )),
        }
    }
}

fn char_len(value: &Value) -> usize {
    match value {
        Value::List(items) => items.len(),
        other => other.as_text().chars().count(),
    }
}

fn text_format(value: &Value, is_valid: fn(&str) -> bool, message: impl FnOnce() -> String) -> RuleResult {
    RuleResult::check(is_valid(&value.as_text()), message)
}

fn compare(
    field: &str,
    value: &Value,
    predicate: impl FnOnce(f64) -> bool,
    message: impl FnOnce() -> String,
) -> RuleResult {
    match value.as_number() {
        Some(n) => RuleResult::check(predicate(n), message),
        None => RuleResult::invalid(format!("{} should be a number.", field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn text(s: &str) -> Value {
        Value::from(s)
    }

    #[test]
    fn test_names_round_trip() {
        for rule in Rule::ALL {
            assert_eq!(Rule::from_name(rule.name()), Some(rule));
        }
        assert_eq!(Rule::from_name("default"), None);
        assert_eq!(Rule::from_name("beforeValidation"), None);
    }

    #[test]
    fn test_classification() {
        assert!(Rule::Enum.is_array_valued());
        assert!(!Rule::MinLength.is_array_valued());
        assert!(Rule::IsEmail.is_boolean_gated());
        assert!(Rule::NotEmpty.is_boolean_gated());
        assert!(!Rule::Min.is_boolean_gated());
    }

    #[test]
    fn test_length_rules() {
        let result = Rule::MinLength.check("title", &text("ab"), &RuleArg::Length(3));
        assert_eq!(
            result,
            RuleResult::invalid("title's length should be equal or greater than 3.")
        );
        assert!(Rule::MinLength.check("title", &text("abc"), &RuleArg::Length(3)).is_valid);
        assert!(Rule::MaxLength.check("title", &text("héllo"), &RuleArg::Length(5)).is_valid);
        assert!(!Rule::ExactLength.check("pin", &text("123"), &RuleArg::Length(4)).is_valid);
    }

    #[test]
    fn test_substring_rules() {
        assert!(Rule::Include.check("f", &text("hello"), &RuleArg::Text("ell".into())).is_valid);
        assert_eq!(
            Rule::Exclude.check("f", &text("hello"), &RuleArg::Text("ell".into())).error_text,
            "f should not include ell."
        );
        assert_eq!(
            Rule::StartWith.check("f", &text("hello"), &RuleArg::Text("x".into())).error_text,
            "f should start with 'x'."
        );
        assert!(Rule::EndWith.check("f", &text("hello"), &RuleArg::Text("lo".into())).is_valid);
    }

    #[test]
    fn test_enum_message() {
        let choices = RuleArg::Choices(vec![text("tom"), text("jerry")]);
        assert_eq!(
            Rule::Enum.check("title", &text("not"), &choices),
            RuleResult::invalid("Value of title should be within [tom,jerry].")
        );
        assert!(Rule::Enum.check("title", &text("tom"), &choices).is_valid);
    }

    #[test]
    fn test_regex_message() {
        let arg = RuleArg::Pattern(Regex::new(r"^([a-z0-9]{5,})$").unwrap());
        assert_eq!(
            Rule::MatchRegex.check("title", &text("tom"), &arg),
            RuleResult::invalid("Value of title is not valid.")
        );
        assert!(Rule::MatchRegex.check("title", &text("jerry"), &arg).is_valid);
    }

    #[test]
    fn test_format_rules() {
        let on = RuleArg::Flag(true);
        assert!(Rule::IsEmail.check("email", &text("a@b.io"), &on).is_valid);
        assert_eq!(
            Rule::IsEmail.check("email", &text("nope"), &on).error_text,
            "email is not a valid email."
        );
        assert!(!Rule::NotEmpty.check("name", &text(""), &on).is_valid);
        assert!(Rule::IsInt.check("n", &Value::Int(4), &on).is_valid);
        assert!(!Rule::IsInt.check("n", &text("4.5"), &on).is_valid);
        assert!(Rule::IsDecimal.check("n", &text("4.5"), &on).is_valid);
        assert!(Rule::IsPositive.check("n", &text("3"), &on).is_valid);
        assert!(!Rule::IsNegative.check("n", &text("3"), &on).is_valid);
        assert!(Rule::IsEmail.check("email", &text("nope"), &RuleArg::Flag(false)).is_valid);
    }

    #[test]
    fn test_numeric_rules() {
        let five = RuleArg::Number(5.0);
        assert!(Rule::Min.check("age", &text("5"), &five).is_valid);
        assert_eq!(
            Rule::Min.check("age", &Value::Int(4), &five).error_text,
            "age should be equal or greater than 5."
        );
        assert_eq!(
            Rule::Max.check("age", &Value::Float(5.5), &five).error_text,
            "age should be equal or less than 5."
        );
        assert!(Rule::Equal.check("age", &Value::Int(5), &five).is_valid);
        assert!(!Rule::NotEqual.check("age", &Value::Int(5), &five).is_valid);
        assert_eq!(
            Rule::Min.check("age", &text("five"), &five).error_text,
            "age should be a number."
        );
    }

    #[test]
    fn test_wrong_argument_kind_fails() {
        let result = Rule::MinLength.check("title", &text("abc"), &RuleArg::Flag(true));
        assert!(!result.is_valid);
        assert!(!result.error_text.is_empty());
    }
}
