//! Formrule
//!
//! Rule-matching and execution engine for declarative form validation.
//!
//! Given a field's current value and its schema fragment, the engine runs every
//! applicable rule in declaration order, stops at the first failure, honors
//! custom error messages and `beforeValidation` transforms, and folds per-field
//! results into a form-level "is everything OK" verdict.
//!
//! # Architecture
//!
//! ```text
//! FormValidator::validate(field, raw, &FormState)
//!   └─ pipeline        one pass over the field schema, fail-fast
//!        ├─ transform  beforeValidation (sync, async or built-in)
//!        └─ runner     extractor -> registry -> rule handler
//!   └─ FormState::merge
//!   └─ aggregate       derive isFormOK from every field + schema
//! ```
//!
//! # Features
//!
//! - **serde** (default): JSON schema loading and serializable state
//!
//! # Example
//!
//! ```rust
//! use formrule::{validate_field, FieldSchema, FieldStatus, RuleRegistry, ValidatorConfig, Value};
//! use regex::Regex;
//!
//! let schema = FieldSchema::new().rule("matchRegex", Regex::new(r"^([a-z]{5,})$").unwrap());
//! let registry = RuleRegistry::new();
//! let config = ValidatorConfig::default();
//!
//! let state = validate_field(&registry, &config, "title", Value::from("jerry"), &schema).unwrap();
//! assert_eq!(state.status, FieldStatus::Ok);
//!
//! let state = validate_field(&registry, &config, "title", Value::from("tom"), &schema).unwrap();
//! assert_eq!(state.error_text, "Value of title is not valid.");
//! ```

// Public modules
pub mod aggregate;
pub mod args;
pub mod config;
pub mod errors;
pub mod extractor;
pub mod form;
pub mod formats;
pub mod pipeline;
pub mod registry;
pub mod rules;
pub mod runner;
pub mod schema;
pub mod state;
pub mod transform;
pub mod types;

// Re-export commonly used types
pub use aggregate::{check_is_form_ok, check_is_form_ok_with, is_form_ok};
pub use args::{ArgKind, RuleArg};
pub use config::ValidatorConfig;
pub use errors::{RuleError, SchemaError, SchemaResult, ValidationFailure};
pub use form::FormValidator;
pub use pipeline::{validate_field, validate_field_async};
pub use registry::{BoxedRuleHandler, FnRuleHandler, ResolvedRule, RuleHandler, RuleRegistry};
pub use rules::{Rule, RuleResult};
pub use schema::{FieldSchema, FormSchema, RuleSpec, SchemaEntry};
pub use state::{FieldState, FieldStatus, FormState};
pub use transform::{AsyncTransform, BuiltinTransform, Transform};
pub use types::Value;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
