//! Configuration options for validation behavior

use crate::schema::COLLECT_VALUES_KEY;

/// Fallback message used when none is configured
pub const DEFAULT_FALLBACK_ERROR_TEXT: &str = "Value of {field} is not valid.";

// ============================================================================
// Validator Config
// ============================================================================

/// Configuration options for the form validator
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Form-level key that is never treated as a field (`collectValues`)
    pub aggregate_key: String,

    /// Emit a debug event for schema keys that name no known rule
    pub log_unknown_keys: bool,

    /// Message used when a custom rule fails without supplying one
    pub fallback_error_text: String,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            aggregate_key: COLLECT_VALUES_KEY.to_string(),
            log_unknown_keys: true,
            fallback_error_text: DEFAULT_FALLBACK_ERROR_TEXT.to_string(),
        }
    }
}

impl ValidatorConfig {
    /// Create a new validator config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reserved aggregate key
    pub fn aggregate_key(mut self, key: impl Into<String>) -> Self {
        self.aggregate_key = key.into();
        self
    }

    /// Enable or disable logging of unknown schema keys
    pub fn log_unknown_keys(mut self, log: bool) -> Self {
        self.log_unknown_keys = log;
        self
    }

    /// Set the fallback message; `{field}` is replaced by the field name
    pub fn fallback_error_text(mut self, text: impl Into<String>) -> Self {
        self.fallback_error_text = text.into();
        self
    }

    /// Fallback message rendered for a field. Never empty.
    pub fn render_fallback(&self, field: &str) -> String {
        let template = if self.fallback_error_text.trim().is_empty() {
            DEFAULT_FALLBACK_ERROR_TEXT
        } else {
            self.fallback_error_text.as_str()
        };
        template.replace("{field}", field)
    }
}

// ============================================================================
// Tests
// ============================================================================
