//! Form validation error types
//!
//! A field holds at most one validation error at a time: the first rule
//! that fails wins. [`ValidationErrors`] collects those per-field results
//! for a whole form and converts from the `validator` crate's errors.

use std::collections::BTreeMap;

/// A single validation error for a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The error message
    pub message: String,
    /// Optional error code for programmatic handling
    pub code: Option<String>,
}

impl FieldError {
    /// Create a new field error with just a message
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    /// Create a field error with a message and code
    #[must_use]
    pub fn with_code(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: Some(code.into()),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Validation results keyed by field name
///
/// Only invalid fields have an entry; a missing entry means the field is valid.
///
/// # Examples
///
/// ```rust
/// use acton_forms::forms::ValidationErrors;
///
/// let mut errors = ValidationErrors::new();
/// errors.add("email", "Ingresa un email válido");
/// errors.add("email", "is required");
///
/// assert!(errors.has_errors());
/// assert_eq!(errors.count(), 1);
/// assert_eq!(errors.for_field("email").unwrap().message, "is required");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<String, FieldError>,
}

impl ValidationErrors {
    /// Create a new empty error collection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the error for a field, replacing any previous one
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.insert(field, FieldError::new(message));
    }

    /// Set an error with a code for a field
    pub fn add_with_code(
        &mut self,
        field: impl Into<String>,
        message: impl Into<String>,
        code: impl Into<String>,
    ) {
        self.insert(field, FieldError::with_code(message, code));
    }

    /// Set a prepared error for a field
    pub fn insert(&mut self, field: impl Into<String>, error: FieldError) {
        self.errors.insert(field.into(), error);
    }

    /// Remove the error of a field, returning it
    pub fn remove(&mut self, field: &str) -> Option<FieldError> {
        self.errors.remove(field)
    }

    /// Check if there are any errors
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if a specific field has an error
    #[must_use]
    pub fn has_field_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Get the error for a specific field
    #[must_use]
    pub fn for_field(&self, field: &str) -> Option<&FieldError> {
        self.errors.get(field)
    }

    /// Get all field names that have errors, in name order
    #[must_use]
    pub fn fields_with_errors(&self) -> Vec<&str> {
        self.errors.keys().map(String::as_str).collect()
    }

    /// Get the number of invalid fields
    #[must_use]
    pub fn count(&self) -> usize {
        self.errors.len()
    }

    /// Clear all errors
    pub fn clear(&mut self) {
        self.errors.clear();
    }

    /// Merge errors from another collection; entries from `other` win
    pub fn merge(&mut self, other: &Self) {
        for (field, error) in &other.errors {
            self.errors.insert(field.clone(), error.clone());
        }
    }

    /// Iterate over all errors
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldError)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Convert from validator crate's `ValidationErrors`
///
/// Keeps the first reported error of every field.
impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut result = Self::new();
        for (field, field_errors) in errors.field_errors() {
            if let Some(error) = field_errors.first() {
                let message = error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string);
                result.add_with_code(field.to_string(), message, error.code.to_string());
            }
        }
        result
    }
}
