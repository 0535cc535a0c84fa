//! Rule registry
//!
//! Maps rule names to handlers. Built-in names resolve to [`Rule`] variants;
//! additional names can be registered with a [`RuleHandler`], similar to
//! registering a custom field validator.
//!
//! # Example (Rust)
//!
//! ```rust
//! use formrule::{FnRuleHandler, RuleRegistry, RuleResult};
//!
//! let mut registry = RuleRegistry::new();
//! registry
//!     .register("isEven", FnRuleHandler::new(|field, value, _arg| {
//!         let even = value.as_number().is_some_and(|n| n % 2.0 == 0.0);
//!         RuleResult::check(even, || format!("{} should be even.", field))
//!     }))
//!     .unwrap();
//!
//! assert!(registry.is_known("isEven"));
//! assert!(registry.is_known("minLength"));
//! ```

use crate::args::{ArgKind, RuleArg};
use crate::errors::{SchemaError, SchemaResult};
use crate::rules::{Rule, RuleResult};
use crate::schema::RESERVED_KEYS;
use crate::types::Value;
use std::collections::HashMap;
use std::sync::Arc;

// ============================================================================
// Rule Handler Trait
// ============================================================================

/// Handler for a custom rule
///
/// Handlers must be pure, and `error_text` must be non-empty whenever
/// `is_valid` is false. Custom handlers receive the declared value as
/// [`RuleArg::Raw`].
pub trait RuleHandler: Send + Sync {
    /// Test `value` against the rule argument
    fn check(&self, field: &str, value: &Value, arg: &RuleArg) -> RuleResult;

    /// Whether the bare argument is itself a list
    fn is_array_valued(&self) -> bool {
        false
    }

    /// Whether a literal `false` argument disables the rule
    fn is_boolean_gated(&self) -> bool {
        false
    }
}

/// Type alias for a shared rule handler
pub type BoxedRuleHandler = Arc<dyn RuleHandler>;

// ============================================================================
// Function-based Handlers (for ergonomic API)
// ============================================================================

/// Create a rule handler from a function
pub struct FnRuleHandler<F>
where
    F: Fn(&str, &Value, &RuleArg) -> RuleResult + Send + Sync,
{
    check_fn: F,
    array_valued: bool,
    boolean_gated: bool,
}

impl<F> FnRuleHandler<F>
where
    F: Fn(&str, &Value, &RuleArg) -> RuleResult + Send + Sync,
{
    /// Create a new function-based rule handler
    pub fn new(check_fn: F) -> Self {
        Self {
            check_fn,
            array_valued: false,
            boolean_gated: false,
        }
    }

    /// Treat a bare list as the argument, not as `[argument, message]`
    pub fn array_valued(mut self) -> Self {
        self.array_valued = true;
        self
    }

    /// Let `false` switch the rule off
    pub fn boolean_gated(mut self) -> Self {
        self.boolean_gated = true;
        self
    }
}

impl<F> RuleHandler for FnRuleHandler<F>
where
    F: Fn(&str, &Value, &RuleArg) -> RuleResult + Send + Sync,
{
    fn check(&self, field: &str, value: &Value, arg: &RuleArg) -> RuleResult {
        (self.check_fn)(field, value, arg)
    }

    fn is_array_valued(&self) -> bool {
        self.array_valued
    }

    fn is_boolean_gated(&self) -> bool {
        self.boolean_gated
    }
}

// ============================================================================
// Resolved Rule
// ============================================================================

/// A rule name after lookup
#[derive(Clone)]
pub enum ResolvedRule {
    Builtin(Rule),
    Custom(BoxedRuleHandler),
}

impl ResolvedRule {
    pub fn is_array_valued(&self) -> bool {
        match self {
            Self::Builtin(rule) => rule.is_array_valued(),
            Self::Custom(handler) => handler.is_array_valued(),
        }
    }

    pub fn is_boolean_gated(&self) -> bool {
        match self {
            Self::Builtin(rule) => rule.is_boolean_gated(),
            Self::Custom(handler) => handler.is_boolean_gated(),
        }
    }

    /// Argument kind the handler takes
    pub fn arg_kind(&self) -> ArgKind {
        match self {
            Self::Builtin(rule) => rule.arg_kind(),
            Self::Custom(_) => ArgKind::Raw,
        }
    }

    /// Invoke the handler
    pub fn check(&self, field: &str, value: &Value, arg: &RuleArg) -> RuleResult {
        match self {
            Self::Builtin(rule) => rule.check(field, value, arg),
            Self::Custom(handler) => handler.check(field, value, arg),
        }
    }
}

impl std::fmt::Debug for ResolvedRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Builtin(rule) => f.debug_tuple("Builtin").field(rule).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

// ============================================================================
// Rule Registry
// ============================================================================

/// Lookup table from rule name to handler
#[derive(Default, Clone)]
pub struct RuleRegistry {
    custom: HashMap<String, BoxedRuleHandler>,
}

impl RuleRegistry {
    /// Registry with the built-in rules only
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a custom rule. Reserved schema keys, built-in names and already
    /// registered names are refused.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        handler: impl RuleHandler + 'static,
    ) -> SchemaResult<()> {
        let name = name.into();
        if RESERVED_KEYS.contains(&name.as_str()) {
            return Err(SchemaError::ReservedRuleName(name));
        }
        if Rule::from_name(&name).is_some() || self.custom.contains_key(&name) {
            return Err(SchemaError::DuplicateRule(name));
        }
        self.custom.insert(name, Arc::new(handler));
        Ok(())
    }

    /// Resolve a rule name
    pub fn resolve(&self, name: &str) -> Option<ResolvedRule> {
        if let Some(rule) = Rule::from_name(name) {
            return Some(ResolvedRule::Builtin(rule));
        }
        self.custom.get(name).cloned().map(ResolvedRule::Custom)
    }

    /// Whether `name` names a rule
    pub fn is_known(&self, name: &str) -> bool {
        Rule::from_name(name).is_some() || self.custom.contains_key(name)
    }

    /// Names of rules whose bare argument is a list
    pub fn array_valued_rules(&self) -> Vec<&str> {
        let builtin = Rule::ALL.into_iter().filter(|r| r.is_array_valued()).map(|r| r.name());
        let custom = self
            .custom
            .iter()
            .filter(|(_, h)| h.is_array_valued())
            .map(|(n, _)| n.as_str());
        builtin.chain(custom).collect()
    }

    /// Names of rules that `false` switches off
    pub fn boolean_gated_rules(&self) -> Vec<&str> {
        let builtin = Rule::ALL.into_iter().filter(|r| r.is_boolean_gated()).map(|r| r.name());
        let custom = self
            .custom
            .iter()
            .filter(|(_, h)| h.is_boolean_gated())
            .map(|(n, _)| n.as_str());
        builtin.chain(custom).collect()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("builtin_count", &Rule::ALL.len())
            .field("custom", &self.custom.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn even_handler() -> impl RuleHandler {
        FnRuleHandler::new(|field, value, _arg| {
            let even = value.as_number().is_some_and(|n| n % 2.0 == 0.0);
            RuleResult::check(even, || format!("{} should be even.", field))
        })
    }

    #[test]
    fn test_resolve_builtin() {
        let registry = RuleRegistry::new();
        assert!(matches!(
            registry.resolve("enum"),
            Some(ResolvedRule::Builtin(Rule::Enum))
        ));
        assert!(registry.resolve("default").is_none());
        assert!(!registry.is_known("beforeValidation"));
    }

    #[test]
    fn test_register_custom() {
        let mut registry = RuleRegistry::new();
        registry.register("isEven", even_handler()).unwrap();

        let resolved = registry.resolve("isEven").unwrap();
        assert_eq!(resolved.arg_kind(), ArgKind::Raw);
        let arg = RuleArg::Flag(true);
        assert!(resolved.check("n", &Value::Int(4), &arg).is_valid);
        assert_eq!(
            resolved.check("n", &Value::Int(3), &arg).error_text,
            "n should be even."
        );
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut registry = RuleRegistry::new();
        assert_eq!(
            registry.register("minLength", even_handler()),
            Err(SchemaError::DuplicateRule("minLength".to_string()))
        );
        registry.register("isEven", even_handler()).unwrap();
        assert!(registry.register("isEven", even_handler()).is_err());
    }

    #[test]
    fn test_register_rejects_reserved_keys() {
        let mut registry = RuleRegistry::new();
        for key in ["default", "isRequired", "beforeValidation", "collectValues"] {
            assert_eq!(
                registry.register(key, even_handler()),
                Err(SchemaError::ReservedRuleName(key.to_string()))
            );
            assert!(!registry.is_known(key));
        }
    }

    #[test]
    fn test_classified_sets() {
        let mut registry = RuleRegistry::new();
        registry
            .register(
                "oneOfGroups",
                FnRuleHandler::new(|_, _, _| RuleResult::valid()).array_valued(),
            )
            .unwrap();
        registry
            .register(
                "isShouty",
                FnRuleHandler::new(|_, _, _| RuleResult::valid()).boolean_gated(),
            )
            .unwrap();

        let arrays = registry.array_valued_rules();
        assert!(arrays.contains(&"enum"));
        assert!(arrays.contains(&"oneOfGroups"));

        let gated = registry.boolean_gated_rules();
        assert!(gated.contains(&"isEmail"));
        assert!(gated.contains(&"isShouty"));
        assert!(!gated.contains(&"minLength"));
    }
}
