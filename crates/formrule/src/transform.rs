//! `beforeValidation` transforms
//!
//! A transform rewrites the field value before any rule sees it. It can be a
//! plain closure, an async hook (awaited by the async pipeline), one of the
//! named built-ins, or a declared value that is not callable at all. The last
//! case is a configuration warning: it is logged and the value passes through.

use crate::errors::{SchemaError, SchemaResult};
use crate::types::Value;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Async Transform Trait
// ============================================================================

/// Hook that may suspend before producing the transformed value
///
/// # Example
///
/// ```rust,ignore
/// struct Normalize;
///
/// #[async_trait]
/// impl AsyncTransform for Normalize {
///     async fn transform(&self, value: Value) -> Value {
///         lookup_canonical(value).await
///     }
/// }
/// ```
#[async_trait]
pub trait AsyncTransform: Send + Sync {
    /// Produce the value rules will be checked against
    async fn transform(&self, value: Value) -> Value;
}

/// Shared synchronous transform function
pub type SyncTransformFn = Arc<dyn Fn(Value) -> Value + Send + Sync>;

// ============================================================================
// Built-in Transforms
// ============================================================================

/// Named transforms usable from declarative (JSON) schemas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinTransform {
    /// Strip leading and trailing whitespace
    Trim,
    /// Convert to lowercase
    Lowercase,
    /// Convert to uppercase
    Uppercase,
}

impl BuiltinTransform {
    /// Look up a built-in transform by name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "trim" => Some(Self::Trim),
            "lowercase" => Some(Self::Lowercase),
            "uppercase" => Some(Self::Uppercase),
            _ => None,
        }
    }

    /// Name used in declarative schemas
    pub fn name(self) -> &'static str {
        match self {
            Self::Trim => "trim",
            Self::Lowercase => "lowercase",
            Self::Uppercase => "uppercase",
        }
    }

    /// Apply to a value. Non-string values pass through untouched.
    pub fn apply(self, value: Value) -> Value {
        match value {
            Value::String(s) => Value::String(match self {
                Self::Trim => s.trim().to_string(),
                Self::Lowercase => s.to_lowercase(),
                Self::Uppercase => s.to_uppercase(),
            }),
            other => other,
        }
    }
}

// ============================================================================
// Transform
// ============================================================================

/// A declared `beforeValidation` entry
#[derive(Clone)]
pub enum Transform {
    /// Synchronous closure
    Sync(SyncTransformFn),
    /// Hook awaited by the async pipeline
    Async(Arc<dyn AsyncTransform>),
    /// Named built-in
    Builtin(BuiltinTransform),
    /// Something that is not a function; ignored with a warning
    NotCallable(Value),
}

impl Transform {
    /// Wrap a synchronous closure
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        Self::Sync(Arc::new(f))
    }

    /// Wrap an async hook
    pub fn from_async(hook: impl AsyncTransform + 'static) -> Self {
        Self::Async(Arc::new(hook))
    }

    /// Whether applying this transform needs to suspend
    pub fn is_async(&self) -> bool {
        matches!(self, Self::Async(_))
    }

    /// Apply without suspending. Async hooks are refused.
    pub fn apply_sync(&self, field: &str, value: Value) -> SchemaResult<Value> {
        match self {
            Self::Sync(f) => Ok(f(value)),
            Self::Builtin(builtin) => Ok(builtin.apply(value)),
            Self::NotCallable(declared) => Ok(warn_not_callable(field, declared, value)),
            Self::Async(_) => Err(SchemaError::AsyncTransformInSyncContext(field.to_string())),
        }
    }

    /// Apply, awaiting async hooks
    pub async fn apply(&self, field: &str, value: Value) -> Value {
        match self {
            Self::Async(hook) => hook.transform(value).await,
            Self::Sync(f) => f(value),
            Self::Builtin(builtin) => builtin.apply(value),
            Self::NotCallable(declared) => warn_not_callable(field, declared, value),
        }
    }
}

fn warn_not_callable(field: &str, declared: &Value, value: Value) -> Value {
    tracing::warn!(
        field = field,
        declared = %declared,
        declared_type = declared.type_name(),
        "expected beforeValidation to be a function; value left unchanged"
    );
    value
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sync(_) => f.write_str("Transform::Sync(..)"),
            Self::Async(_) => f.write_str("Transform::Async(..)"),
            Self::Builtin(builtin) => f.debug_tuple("Transform::Builtin").field(builtin).finish(),
            Self::NotCallable(value) => {
                f.debug_tuple("Transform::NotCallable").field(value).finish()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Mutex;

    /// Collects formatted log lines
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct Suffix;

    #[async_trait]
    impl AsyncTransform for Suffix {
        async fn transform(&self, value: Value) -> Value {
            tokio::task::yield_now().await;
            Value::String(format!("{}!", value.as_text()))
        }
    }

    #[test]
    fn test_builtin_transforms() {
        assert_eq!(BuiltinTransform::Trim.apply(Value::from("  a b ")), Value::from("a b"));
        assert_eq!(BuiltinTransform::Lowercase.apply(Value::from("AbC")), Value::from("abc"));
        assert_eq!(BuiltinTransform::Uppercase.apply(Value::from("AbC")), Value::from("ABC"));
        assert_eq!(BuiltinTransform::Trim.apply(Value::Int(3)), Value::Int(3));
        assert_eq!(BuiltinTransform::from_name("trim"), Some(BuiltinTransform::Trim));
        assert_eq!(BuiltinTransform::from_name("reverse"), None);
    }

    #[test]
    fn test_sync_apply() {
        let transform = Transform::from_fn(|v| Value::String(v.as_text().replace('-', "")));
        let result = transform.apply_sync("phone", Value::from("555-1234")).unwrap();
        assert_eq!(result, Value::from("5551234"));
    }

    #[test]
    fn test_not_callable_leaves_value_unchanged() {
        let transform = Transform::NotCallable(Value::from("shout"));
        let result = transform.apply_sync("title", Value::from("hello")).unwrap();
        assert_eq!(result, Value::from("hello"));
    }

    #[test]
    fn test_not_callable_emits_warning() {
        let logs = LogBuffer::default();
        let sink = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .finish();

        let transform = Transform::NotCallable(Value::from("shout"));
        let result = tracing::subscriber::with_default(subscriber, || {
            transform.apply_sync("title", Value::from("hello"))
        });
        assert_eq!(result, Ok(Value::from("hello")));

        let output = logs.contents();
        assert!(output.contains("WARN"), "{}", output);
        assert!(output.contains("expected beforeValidation to be a function"), "{}", output);
        assert!(output.contains("title"), "{}", output);
        assert!(output.contains("shout"), "{}", output);
    }

    #[test]
    fn test_async_refused_in_sync_context() {
        let transform = Transform::from_async(Suffix);
        assert!(transform.is_async());
        let err = transform.apply_sync("title", Value::from("x")).unwrap_err();
        assert_eq!(err, SchemaError::AsyncTransformInSyncContext("title".to_string()));
    }

    #[tokio::test]
    async fn test_async_apply() {
        let transform = Transform::from_async(Suffix);
        assert_eq!(transform.apply("title", Value::from("hi")).await, Value::from("hi!"));

        let transform = Transform::Builtin(BuiltinTransform::Uppercase);
        assert_eq!(transform.apply("title", Value::from("hi")).await, Value::from("HI"));
    }
}
