//! Field validation rules
//!
//! Rules are declared per field in the schema and evaluated against the
//! field's current value. The wire shape follows the usual form-library
//! conventions:
//!
//! ```json
//! {
//!   "required": "Campo obligatorio",
//!   "minLength": { "value": 2, "message": "Muy corto" },
//!   "maxLength": 40,
//!   "pattern": { "value": "^[0-9]+$", "message": "Solo números" }
//! }
//! ```
//!
//! Patterns use Rust `regex` syntax; prefix with `(?i)` for case-insensitive
//! matching. Note that `(?i)` folds Unicode case, so `[A-Z]` then also
//! matches letters such as `ſ`; spell out `[A-Za-z]` for ASCII-only classes.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

use super::error::FieldError;

/// Message shown when an email field does not match [`EMAIL_PATTERN`]
pub const EMAIL_MESSAGE: &str = "Ingresa un email válido";

/// Email address pattern (`localpart@domain.tld`)
pub const EMAIL_PATTERN: &str = r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$";

const REQUIRED_MESSAGE: &str = "Este campo es obligatorio";
const PATTERN_MESSAGE: &str = "Formato no válido";

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(EMAIL_PATTERN).expect("Invalid regex"));

/// `required` rule: a flag or the message to show
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RequiredRule {
    /// `true` uses the default message, `false` disables the rule
    Flag(bool),
    /// Required with a custom message
    Message(String),
}

impl RequiredRule {
    /// The message to report, or `None` when the rule is disabled
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Flag(true) => Some(REQUIRED_MESSAGE),
            Self::Flag(false) => None,
            Self::Message(message) => Some(message),
        }
    }
}

/// `minLength` / `maxLength` rule
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LengthRule {
    /// Bare limit with the default message
    Limit(usize),
    /// Limit with a custom message
    WithMessage {
        /// Character limit
        value: usize,
        /// Message to report
        message: String,
    },
}

impl LengthRule {
    /// Character limit
    #[must_use]
    pub const fn limit(&self) -> usize {
        match self {
            Self::Limit(value) | Self::WithMessage { value, .. } => *value,
        }
    }

    fn message_or(&self, fallback: impl FnOnce(usize) -> String) -> String {
        match self {
            Self::Limit(value) => fallback(*value),
            Self::WithMessage { message, .. } => message.clone(),
        }
    }
}

/// Compiled `pattern` rule
#[derive(Debug, Clone)]
pub struct PatternRule {
    regex: Regex,
    message: String,
}

impl PatternRule {
    /// Compile a pattern rule
    ///
    /// # Errors
    ///
    /// Returns the regex error when `pattern` does not compile.
    pub fn new(pattern: &str, message: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            message: message.into(),
        })
    }

    /// The built-in email rule
    #[must_use]
    pub fn email() -> Self {
        Self {
            regex: EMAIL_REGEX.clone(),
            message: EMAIL_MESSAGE.to_string(),
        }
    }

    /// Source of the compiled pattern
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Message reported on mismatch
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether `text` matches the pattern
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl<'de> Deserialize<'de> for PatternRule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bare(String),
            WithMessage { value: String, message: String },
        }

        let (pattern, message) = match Raw::deserialize(deserializer)? {
            Raw::Bare(value) => (value, PATTERN_MESSAGE.to_string()),
            Raw::WithMessage { value, message } => (value, message),
        };
        Self::new(&pattern, message)
            .map_err(|e| de::Error::custom(format!("invalid pattern `{pattern}`: {e}")))
    }
}

type ValidateFn = dyn Fn(Option<&Value>) -> Result<(), String> + Send + Sync;

/// Programmatic validation rule
///
/// Returns `Err(message)` to reject a value. Custom rules run on every
/// value, empty or not, after the declarative rules passed.
#[derive(Clone)]
pub struct CustomRule(Arc<ValidateFn>);

impl CustomRule {
    /// Wrap a validation closure
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(Option<&Value>) -> Result<(), String> + Send + Sync + 'static,
    {
        Self(Arc::new(check))
    }
}

impl fmt::Debug for CustomRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomRule(..)")
    }
}

/// Validation rules for one field
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rules {
    /// Value must be non-empty
    #[serde(default)]
    pub required: Option<RequiredRule>,
    /// Minimum number of characters
    #[serde(default)]
    pub min_length: Option<LengthRule>,
    /// Maximum number of characters
    #[serde(default)]
    pub max_length: Option<LengthRule>,
    /// Regular expression the value must match
    #[serde(default)]
    pub pattern: Option<PatternRule>,
    /// Programmatic rules, only available through the builder
    #[serde(skip)]
    pub validate: Vec<CustomRule>,
}

impl Rules {
    /// No rules
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a non-empty value
    #[must_use]
    pub fn required(mut self, message: impl Into<String>) -> Self {
        self.required = Some(RequiredRule::Message(message.into()));
        self
    }

    /// Require at least `value` characters
    #[must_use]
    pub fn min_length(mut self, value: usize, message: impl Into<String>) -> Self {
        self.min_length = Some(LengthRule::WithMessage {
            value,
            message: message.into(),
        });
        self
    }

    /// Allow at most `value` characters
    #[must_use]
    pub fn max_length(mut self, value: usize, message: impl Into<String>) -> Self {
        self.max_length = Some(LengthRule::WithMessage {
            value,
            message: message.into(),
        });
        self
    }

    /// Require a pattern match
    #[must_use]
    pub fn pattern(mut self, rule: PatternRule) -> Self {
        self.pattern = Some(rule);
        self
    }

    /// Add a programmatic rule
    #[must_use]
    pub fn validate<F>(mut self, check: F) -> Self
    where
        F: Fn(Option<&Value>) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validate.push(CustomRule::new(check));
        self
    }

    /// Layer the email pattern on top of these rules
    ///
    /// A caller-supplied `pattern` takes precedence over the email pattern.
    #[must_use]
    pub fn with_email_pattern(mut self) -> Self {
        if self.pattern.is_none() {
            self.pattern = Some(PatternRule::email());
        }
        self
    }

    /// Whether the rules mark the field as required
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
            .as_ref()
            .and_then(RequiredRule::message)
            .is_some()
    }

    /// Evaluate the rules, returning the first failure
    #[must_use]
    pub fn evaluate(&self, value: Option<&Value>) -> Option<FieldError> {
        let empty = is_empty_value(value);

        if empty {
            if let Some(message) = self.required.as_ref().and_then(RequiredRule::message) {
                return Some(FieldError::with_code(message, "required"));
            }
        } else if let Some(text) = value.and_then(Value::as_str) {
            if let Some(error) = self.evaluate_text(text) {
                return Some(error);
            }
        }

        self.validate.iter().find_map(|rule| {
            (rule.0)(value)
                .err()
                .map(|message| FieldError::with_code(message, "validate"))
        })
    }

    fn evaluate_text(&self, text: &str) -> Option<FieldError> {
        let length = text.chars().count();

        if let Some(rule) = &self.min_length {
            if length < rule.limit() {
                let message =
                    rule.message_or(|n| format!("Debe tener al menos {n} caracteres"));
                return Some(FieldError::with_code(message, "minLength"));
            }
        }
        if let Some(rule) = &self.max_length {
            if length > rule.limit() {
                let message = rule.message_or(|n| format!("No puede superar {n} caracteres"));
                return Some(FieldError::with_code(message, "maxLength"));
            }
        }
        if let Some(rule) = &self.pattern {
            if !rule.is_match(text) {
                return Some(FieldError::with_code(rule.message(), "pattern"));
            }
        }
        None
    }
}

/// Whether a value counts as empty for the `required` rule
///
/// Absent, `null`, `""`, `false` and `[]` are empty.
#[must_use]
pub fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null | Value::Bool(false)) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}
