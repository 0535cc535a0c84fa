//! Declarative form schemas
//!
//! A [`FormSchema`] maps field names to [`FieldSchema`]s. A field schema is an
//! ordered list of keys: rule names with their [`RuleSpec`], plus the reserved
//! directives `default`, `isRequired` and `beforeValidation`. Declaration order
//! is execution order.
//!
//! Schemas are not checked when they are declared. A rule argument of the
//! wrong shape surfaces as a [`SchemaError`](crate::SchemaError) the first time
//! the field is validated.

#[cfg(feature = "serde")]
use crate::config::ValidatorConfig;
use crate::transform::{AsyncTransform, BuiltinTransform, Transform};
use crate::types::Value;
use regex::Regex;

/// Value used when the field is untouched
pub const DEFAULT_KEY: &str = "default";
/// Whether the field must be filled in (defaults to true)
pub const IS_REQUIRED_KEY: &str = "isRequired";
/// Transform applied to the value before rules run
pub const BEFORE_VALIDATION_KEY: &str = "beforeValidation";
/// Form-level key reserved for value collection; never treated as a field
pub const COLLECT_VALUES_KEY: &str = "collectValues";

/// Keys that are never rule names
pub const RESERVED_KEYS: [&str; 4] = [
    DEFAULT_KEY,
    IS_REQUIRED_KEY,
    BEFORE_VALIDATION_KEY,
    COLLECT_VALUES_KEY,
];

// ============================================================================
// Rule Specification
// ============================================================================

/// A rule value exactly as declared
///
/// Either a bare argument or a `[argument, customErrorText]` pair. Both are
/// lists at the surface, so lists are always held as [`RuleSpec::Seq`] and
/// the message extractor tells them apart.
#[derive(Debug, Clone)]
pub enum RuleSpec {
    /// Number, string, boolean or null
    Scalar(Value),
    /// Regular expression
    Pattern(Regex),
    /// Ordered sequence
    Seq(Vec<RuleSpec>),
}

impl RuleSpec {
    /// Whether this is an ordered sequence
    pub fn is_seq(&self) -> bool {
        matches!(self, Self::Seq(_))
    }

    /// Whether this is literally `false`
    pub fn is_false(&self) -> bool {
        matches!(self, Self::Scalar(Value::Bool(false)))
    }

    /// Short description of the declared shape, for error messages
    pub fn describe(&self) -> String {
        match self {
            Self::Scalar(value) => value.type_name().to_string(),
            Self::Pattern(_) => "regex".to_string(),
            Self::Seq(items) => format!("array of {}", items.len()),
        }
    }
}

impl PartialEq for RuleSpec {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Scalar(a), Self::Scalar(b)) => a == b,
            (Self::Pattern(a), Self::Pattern(b)) => a.as_str() == b.as_str(),
            (Self::Seq(a), Self::Seq(b)) => a == b,
            _ => false,
        }
    }
}

impl From<Value> for RuleSpec {
    fn from(value: Value) -> Self {
        match value {
            Value::List(items) => Self::Seq(items.into_iter().map(Into::into).collect()),
            other => Self::Scalar(other),
        }
    }
}

impl From<Regex> for RuleSpec {
    fn from(re: Regex) -> Self {
        Self::Pattern(re)
    }
}

impl From<&str> for RuleSpec {
    fn from(value: &str) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<String> for RuleSpec {
    fn from(value: String) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<bool> for RuleSpec {
    fn from(value: bool) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<i64> for RuleSpec {
    fn from(value: i64) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<i32> for RuleSpec {
    fn from(value: i32) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<usize> for RuleSpec {
    fn from(value: usize) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<f64> for RuleSpec {
    fn from(value: f64) -> Self {
        Self::Scalar(value.into())
    }
}

impl<T: Into<RuleSpec>> From<Vec<T>> for RuleSpec {
    fn from(items: Vec<T>) -> Self {
        Self::Seq(items.into_iter().map(Into::into).collect())
    }
}

// ============================================================================
// Field Schema
// ============================================================================

/// One key of a field schema
#[derive(Debug, Clone)]
pub enum SchemaEntry {
    /// A rule name (known or not) with its declared value
    Rule(RuleSpec),
    /// `default`
    Default(Value),
    /// `isRequired`
    IsRequired(bool),
    /// `beforeValidation`
    BeforeValidation(Transform),
}

/// Ordered rules and directives for a single field
#[derive(Debug, Clone, Default)]
pub struct FieldSchema {
    entries: Vec<(String, SchemaEntry)>,
}

impl FieldSchema {
    /// Create an empty field schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a rule with a bare argument
    pub fn rule(self, name: impl Into<String>, spec: impl Into<RuleSpec>) -> Self {
        self.entry(name, SchemaEntry::Rule(spec.into()))
    }

    /// Declare a rule as an `[argument, customErrorText]` pair
    pub fn rule_with_message(
        self,
        name: impl Into<String>,
        spec: impl Into<RuleSpec>,
        message: impl Into<String>,
    ) -> Self {
        let pair = RuleSpec::Seq(vec![spec.into(), RuleSpec::Scalar(Value::String(message.into()))]);
        self.entry(name, SchemaEntry::Rule(pair))
    }

    /// Set the `default` value
    pub fn default_value(self, value: impl Into<Value>) -> Self {
        self.entry(DEFAULT_KEY, SchemaEntry::Default(value.into()))
    }

    /// Mark the field optional (`isRequired: false`)
    pub fn optional(self) -> Self {
        self.entry(IS_REQUIRED_KEY, SchemaEntry::IsRequired(false))
    }

    /// Mark the field required explicitly
    pub fn required(self) -> Self {
        self.entry(IS_REQUIRED_KEY, SchemaEntry::IsRequired(true))
    }

    /// Set a synchronous `beforeValidation` transform
    pub fn before_validation<F>(self, f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.entry(BEFORE_VALIDATION_KEY, SchemaEntry::BeforeValidation(Transform::from_fn(f)))
    }

    /// Set an async `beforeValidation` hook
    pub fn before_validation_async(self, hook: impl AsyncTransform + 'static) -> Self {
        self.entry(
            BEFORE_VALIDATION_KEY,
            SchemaEntry::BeforeValidation(Transform::from_async(hook)),
        )
    }

    /// Set any `beforeValidation` transform
    pub fn transform(self, transform: Transform) -> Self {
        self.entry(BEFORE_VALIDATION_KEY, SchemaEntry::BeforeValidation(transform))
    }

    /// Insert or replace a key.
    ///
    /// Re-declaring a key keeps its original position, the way assigning an
    /// existing object property does.
    pub fn entry(mut self, key: impl Into<String>, entry: SchemaEntry) -> Self {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = entry,
            None => self.entries.push((key, entry)),
        }
        self
    }

    /// Remove a key, if declared
    pub fn without(mut self, key: &str) -> Self {
        self.entries.retain(|(k, _)| k != key);
        self
    }

    /// Entries in declaration order
    pub fn entries(&self) -> &[(String, SchemaEntry)] {
        &self.entries
    }

    /// Look up an entry by key
    pub fn get(&self, key: &str) -> Option<&SchemaEntry> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, e)| e)
    }

    /// Declared `default`, if any
    pub fn declared_default(&self) -> Option<&Value> {
        match self.get(DEFAULT_KEY) {
            Some(SchemaEntry::Default(value)) => Some(value),
            _ => None,
        }
    }

    /// Fields are required unless `isRequired` is explicitly `false`
    pub fn is_required(&self) -> bool {
        !matches!(self.get(IS_REQUIRED_KEY), Some(SchemaEntry::IsRequired(false)))
    }

    /// Whether any transform needs the async pipeline
    pub fn has_async_transform(&self) -> bool {
        self.entries
            .iter()
            .any(|(_, e)| matches!(e, SchemaEntry::BeforeValidation(t) if t.is_async()))
    }

    /// Build from a JSON object (order of keys is declaration order)
    #[cfg(feature = "serde")]
    pub fn from_json(field: &str, json: &serde_json::Value) -> crate::SchemaResult<Self> {
        let serde_json::Value::Object(map) = json else {
            return Err(crate::SchemaError::InvalidDocument(format!(
                "schema for field `{}` must be an object",
                field
            )));
        };

        let mut schema = Self::new();
        for (key, raw) in map {
            let value = Value::from(raw.clone());
            let entry = match key.as_str() {
                DEFAULT_KEY => SchemaEntry::Default(value),
                IS_REQUIRED_KEY => SchemaEntry::IsRequired(!matches!(value, Value::Bool(false))),
                BEFORE_VALIDATION_KEY => {
                    let builtin = value.as_str().and_then(BuiltinTransform::from_name);
                    match builtin {
                        Some(builtin) => SchemaEntry::BeforeValidation(Transform::Builtin(builtin)),
                        None => SchemaEntry::BeforeValidation(Transform::NotCallable(value)),
                    }
                }
                _ => SchemaEntry::Rule(RuleSpec::from(value)),
            };
            schema = schema.entry(key.as_str(), entry);
        }
        Ok(schema)
    }
}

// ============================================================================
// Form Schema
// ============================================================================

/// Field schemas keyed by field name, in declaration order
#[derive(Debug, Clone, Default)]
pub struct FormSchema {
    fields: Vec<(String, FieldSchema)>,
}

impl FormSchema {
    /// Create an empty form schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare (or replace) a field
    pub fn field(mut self, name: impl Into<String>, schema: FieldSchema) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = schema,
            None => self.fields.push((name, schema)),
        }
        self
    }

    /// Look up a field schema
    pub fn get(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    /// Fields in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSchema)> {
        self.fields.iter().map(|(n, s)| (n.as_str(), s))
    }

    /// Declared field names
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Number of declared fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if no field is declared
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parse a JSON form schema with the default configuration
    #[cfg(feature = "serde")]
    pub fn from_json(json: &serde_json::Value) -> crate::SchemaResult<Self> {
        Self::from_json_with_config(json, &ValidatorConfig::default())
    }

    /// Parse a JSON form schema from text
    #[cfg(feature = "serde")]
    pub fn from_json_str(text: &str) -> crate::SchemaResult<Self> {
        let json: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| crate::SchemaError::InvalidDocument(e.to_string()))?;
        Self::from_json(&json)
    }

    /// Parse a JSON form schema.
    ///
    /// The aggregate key (`collectValues` by default) is skipped. Functions
    /// cannot be expressed in JSON, so `beforeValidation` accepts the names of
    /// built-in transforms only.
    #[cfg(feature = "serde")]
    pub fn from_json_with_config(
        json: &serde_json::Value,
        config: &ValidatorConfig,
    ) -> crate::SchemaResult<Self> {
        let serde_json::Value::Object(map) = json else {
            return Err(crate::SchemaError::InvalidDocument(
                "form schema must be an object".to_string(),
            ));
        };

        let mut schema = Self::new();
        for (name, field_json) in map {
            if *name == config.aggregate_key {
                tracing::debug!(key = name.as_str(), "skipping aggregate key in form schema");
                continue;
            }
            schema = schema.field(name.as_str(), FieldSchema::from_json(name, field_json)?);
        }
        Ok(schema)
    }
}
