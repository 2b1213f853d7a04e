//! Form state container
//!
//! [`FormStore`] is the single source of truth for one mounted form: the
//! current value of every field, per-field validation results, and the
//! touched/dirty bookkeeping that drives the validation trigger mode.
//! Controls never keep their own copy of a value; they read a
//! [`FieldSnapshot`] from the store and write back through
//! [`FormStore::change`] and [`FormStore::blur`].

use std::collections::{HashMap, HashSet};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use super::error::{FieldError, ValidationErrors};
use super::rules::Rules;
use super::schema::Schema;
use crate::error::FormError;

/// Name → value mapping of a form
pub type FormValues = Map<String, Value>;

/// Event that (re)validates a field before the first submit attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TriggerMode {
    /// Validate on every change
    #[serde(rename = "onChange")]
    OnChange,
    /// Validate when the field loses focus
    #[default]
    #[serde(rename = "onBlur")]
    OnBlur,
    /// Validate only on submit
    #[serde(rename = "onSubmit")]
    OnSubmit,
    /// Validate on first blur, then on every change
    #[serde(rename = "onTouched")]
    OnTouched,
    /// Validate on blur and on change
    #[serde(rename = "all")]
    All,
}

/// Event that re-validates a field after a submit attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RevalidateMode {
    /// Re-validate on every change
    #[default]
    #[serde(rename = "onChange")]
    OnChange,
    /// Re-validate when the field loses focus
    #[serde(rename = "onBlur")]
    OnBlur,
    /// Re-validate only on submit
    #[serde(rename = "onSubmit")]
    OnSubmit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldEvent {
    Change,
    Blur,
}

/// Registration of one field in the store
#[derive(Debug, Clone, Default)]
struct Binding {
    rules: Rules,
    fixed: Option<Value>,
}

/// Read-only view of one bound field
#[derive(Debug, Clone, Copy)]
pub struct FieldSnapshot<'a> {
    /// Field name
    pub name: &'a str,
    /// Current value, `None` when the field has none
    pub value: Option<&'a Value>,
    /// Current validation error
    pub error: Option<&'a FieldError>,
    /// Whether the field lost focus at least once
    pub touched: bool,
    /// Whether the value differs from its initial value
    pub dirty: bool,
    /// Whether the field's rules mark it as required
    pub required: bool,
}

impl FieldSnapshot<'_> {
    /// Current value as text; `null` and absent values read as empty
    #[must_use]
    pub fn text(&self) -> String {
        self.value.map(value_text).unwrap_or_default()
    }

    /// Current value as a checkbox state; absent or falsy reads as `false`
    #[must_use]
    pub fn checked(&self) -> bool {
        !super::rules::is_empty_value(self.value)
            && !matches!(self.value, Some(Value::Number(n)) if n.as_f64() == Some(0.0))
    }

    /// Whether the field currently holds a validation error
    #[must_use]
    pub const fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Render a value the way an input element shows it
#[must_use]
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Validated name → value mapping handed to the submit callback
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Submission(FormValues);

impl Submission {
    /// Wrap a set of values
    #[must_use]
    pub const fn new(values: FormValues) -> Self {
        Self(values)
    }

    /// Value of a field
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// All values
    #[must_use]
    pub const fn values(&self) -> &FormValues {
        &self.0
    }

    /// Unwrap the values
    #[must_use]
    pub fn into_inner(self) -> FormValues {
        self.0
    }

    /// The payload as a JSON object
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Deserialize the payload into a typed shape
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Payload`] when the values do not fit `T`.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, FormError> {
        serde_json::from_value(self.to_json()).map_err(|e| FormError::Payload(e.to_string()))
    }

    /// Deserialize the payload and run its `validator` rules
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Payload`] when the values do not fit `T`, or
    /// [`FormError::Validation`] when `T`'s rules reject them.
    pub fn validated<T: DeserializeOwned + Validate>(&self) -> Result<T, FormError> {
        let typed: T = self.parse()?;
        typed.validate()?;
        Ok(typed)
    }
}

/// Compute the initial values of a form
///
/// For every field, in increasing priority: the field's declared default,
/// then the caller-supplied default, then (hidden fields only) the fixed
/// value, which always wins. Caller defaults for names outside the schema
/// are kept as they are.
#[must_use]
pub fn initial_values(schema: &Schema, defaults: &FormValues) -> FormValues {
    let mut values = defaults.clone();

    for field in schema.iter().filter(|f| f.is_recognized()) {
        let name = field.name();
        if let Some(fixed) = field.fixed_value() {
            values.insert(name.to_string(), fixed.clone());
        } else if !values.contains_key(name) {
            if let Some(default) = field.default_value() {
                values.insert(name.to_string(), default);
            }
        }
    }

    values
}

/// Shared state and validation container for one form instance
#[derive(Debug, Clone)]
pub struct FormStore {
    initial: FormValues,
    values: FormValues,
    bindings: HashMap<String, Binding>,
    errors: ValidationErrors,
    touched: HashSet<String>,
    dirty: HashSet<String>,
    mode: TriggerMode,
    revalidate_mode: RevalidateMode,
    submit_count: u32,
}

impl FormStore {
    /// Create a store holding `initial` values
    #[must_use]
    pub fn new(initial: FormValues, mode: TriggerMode, revalidate_mode: RevalidateMode) -> Self {
        Self {
            values: initial.clone(),
            initial,
            bindings: HashMap::new(),
            errors: ValidationErrors::new(),
            touched: HashSet::new(),
            dirty: HashSet::new(),
            mode,
            revalidate_mode,
            submit_count: 0,
        }
    }

    /// Bind a field to the store with its validation rules
    ///
    /// Registering a name twice replaces its rules. A fixed-value binding
    /// keeps its value.
    pub fn register(&mut self, name: impl Into<String>, rules: Rules) {
        let name = name.into();
        let fixed = self.bindings.get(&name).and_then(|b| b.fixed.clone());
        if fixed.is_some() {
            tracing::debug!(field = %name, "keeping fixed value of re-registered field");
        }
        self.bindings.insert(name, Binding { rules, fixed });
    }

    /// Bind a read-only field whose value is always `value`
    pub fn register_fixed(&mut self, name: impl Into<String>, rules: Rules, value: Value) {
        let name = name.into();
        self.values.insert(name.clone(), value.clone());
        self.initial.insert(name.clone(), value.clone());
        self.bindings.insert(
            name,
            Binding {
                rules,
                fixed: Some(value),
            },
        );
    }

    /// Whether `name` is bound to this store
    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Active trigger mode
    #[must_use]
    pub const fn mode(&self) -> TriggerMode {
        self.mode
    }

    /// Active re-validation mode
    #[must_use]
    pub const fn revalidate_mode(&self) -> RevalidateMode {
        self.revalidate_mode
    }

    /// Snapshot of a bound field
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnboundField`] when `name` is not registered.
    pub fn field<'a>(&'a self, name: &str) -> Result<FieldSnapshot<'a>, FormError> {
        let (name, binding) = self
            .bindings
            .get_key_value(name)
            .ok_or_else(|| FormError::UnboundField(name.to_string()))?;

        Ok(FieldSnapshot {
            name,
            value: self.values.get(name),
            error: self.errors.for_field(name),
            touched: self.touched.contains(name),
            dirty: self.dirty.contains(name),
            required: binding.rules.is_required(),
        })
    }

    /// Current value of a field, bound or not
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// All current values
    #[must_use]
    pub const fn values(&self) -> &FormValues {
        &self.values
    }

    /// Current validation results
    #[must_use]
    pub const fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Whether no field currently holds an error
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.errors.has_errors()
    }

    /// Number of submit attempts
    #[must_use]
    pub const fn submit_count(&self) -> u32 {
        self.submit_count
    }

    /// Whether a submit was attempted
    #[must_use]
    pub const fn is_submitted(&self) -> bool {
        self.submit_count > 0
    }

    /// Write a new value from user input
    ///
    /// Validates the field when the active mode asks for it. Input on a
    /// fixed-value field is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnboundField`] when `name` is not registered.
    pub fn change(&mut self, name: &str, value: impl Into<Value>) -> Result<(), FormError> {
        let binding = self.binding(name)?;
        if binding.fixed.is_some() {
            tracing::debug!(field = %name, "ignoring input on fixed-value field");
            return Ok(());
        }

        let value = value.into();
        if self.initial.get(name) == Some(&value) {
            self.dirty.remove(name);
        } else {
            self.dirty.insert(name.to_string());
        }
        self.values.insert(name.to_string(), value);

        if self.should_validate(name, FieldEvent::Change) {
            self.validate_field(name);
        }
        Ok(())
    }

    /// Record that a field lost focus
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnboundField`] when `name` is not registered.
    pub fn blur(&mut self, name: &str) -> Result<(), FormError> {
        self.binding(name)?;
        self.touched.insert(name.to_string());

        if self.should_validate(name, FieldEvent::Blur) {
            self.validate_field(name);
        }
        Ok(())
    }

    /// Validate one field immediately, regardless of mode
    ///
    /// Returns whether the field is valid.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnboundField`] when `name` is not registered.
    pub fn trigger(&mut self, name: &str) -> Result<bool, FormError> {
        self.binding(name)?;
        Ok(self.validate_field(name))
    }

    /// Validate every bound field, returning whether all are valid
    pub fn validate_all(&mut self) -> bool {
        let mut names: Vec<String> = self.bindings.keys().cloned().collect();
        names.sort_unstable();

        let mut valid = true;
        for name in &names {
            valid &= self.validate_field(name);
        }
        valid
    }

    /// Run submit validation
    ///
    /// Counts the attempt, validates every field and returns the payload
    /// only when all of them pass. Fixed-value fields always carry their
    /// fixed value in the payload.
    ///
    /// # Errors
    ///
    /// Returns the validation results when any field is invalid.
    pub fn handle_submit(&mut self) -> Result<Submission, ValidationErrors> {
        self.submit_count += 1;
        if !self.validate_all() {
            return Err(self.errors.clone());
        }

        let mut payload = self.values.clone();
        for (name, binding) in &self.bindings {
            if let Some(fixed) = &binding.fixed {
                payload.insert(name.clone(), fixed.clone());
            }
        }
        Ok(Submission::new(payload))
    }

    /// Set an error on a field manually
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnboundField`] when `name` is not registered.
    pub fn set_error(&mut self, name: &str, error: FieldError) -> Result<(), FormError> {
        self.binding(name)?;
        self.errors.insert(name, error);
        Ok(())
    }

    /// Clear the error of one field, or all errors when `name` is `None`
    pub fn clear_errors(&mut self, name: Option<&str>) {
        match name {
            Some(name) => {
                self.errors.remove(name);
            }
            None => self.errors.clear(),
        }
    }

    /// Return to the initial values and forget errors, touches and submits
    pub fn reset(&mut self) {
        self.values = self.initial.clone();
        self.errors.clear();
        self.touched.clear();
        self.dirty.clear();
        self.submit_count = 0;
    }

    fn binding(&self, name: &str) -> Result<&Binding, FormError> {
        self.bindings
            .get(name)
            .ok_or_else(|| FormError::UnboundField(name.to_string()))
    }

    fn validate_field(&mut self, name: &str) -> bool {
        let Some(binding) = self.bindings.get(name) else {
            return true;
        };

        match binding.rules.evaluate(self.values.get(name)) {
            Some(error) => {
                tracing::debug!(field = %name, error = %error, "field invalid");
                self.errors.insert(name, error);
                false
            }
            None => {
                self.errors.remove(name);
                true
            }
        }
    }

    fn should_validate(&self, name: &str, event: FieldEvent) -> bool {
        let is_blur = event == FieldEvent::Blur;

        if self.mode == TriggerMode::All {
            return true;
        }
        if !self.is_submitted() && self.mode == TriggerMode::OnTouched {
            return is_blur || self.touched.contains(name);
        }

        let (on_blur, on_change) = if self.is_submitted() {
            (
                self.revalidate_mode == RevalidateMode::OnBlur,
                self.revalidate_mode == RevalidateMode::OnChange,
            )
        } else {
            (
                self.mode == TriggerMode::OnBlur,
                self.mode == TriggerMode::OnChange,
            )
        };

        if on_blur {
            is_blur
        } else if on_change {
            !is_blur
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::schema::FieldConfig;
    use serde_json::json;

    fn store(mode: TriggerMode) -> FormStore {
        let mut store = FormStore::new(FormValues::new(), mode, RevalidateMode::OnChange);
        store.register("email", Rules::new().required("Obligatorio").with_email_pattern());
        store
    }

    fn defaults(pairs: &[(&str, Value)]) -> FormValues {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_initial_values_priority() {
        let schema = Schema::new(vec![
            FieldConfig::text("a", "").with_default("own"),
            FieldConfig::text("b", "").with_default("own"),
            FieldConfig::text("c", ""),
            FieldConfig::hidden("d", 42),
            FieldConfig::checkbox("e", "ok").with_default(true),
        ]);
        let caller = defaults(&[
            ("b", json!("caller")),
            ("d", json!("caller")),
            ("extra", json!(1)),
        ]);

        let values = initial_values(&schema, &caller);

        assert_eq!(values.get("a"), Some(&json!("own")));
        assert_eq!(values.get("b"), Some(&json!("caller")));
        assert_eq!(values.get("c"), None);
        assert_eq!(values.get("d"), Some(&json!(42)));
        assert_eq!(values.get("e"), Some(&json!(true)));
        assert_eq!(values.get("extra"), Some(&json!(1)));
    }

    #[test]
    fn test_falsy_caller_default_is_kept() {
        let schema = Schema::new(vec![FieldConfig::text("a", "").with_default("own")]);
        let values = initial_values(&schema, &defaults(&[("a", json!(""))]));
        assert_eq!(values.get("a"), Some(&json!("")));
    }

    #[test]
    fn test_unbound_field_fails_fast() {
        let mut store = store(TriggerMode::OnBlur);

        assert!(matches!(store.field("phone"), Err(FormError::UnboundField(n)) if n == "phone"));
        assert!(matches!(store.change("phone", "1"), Err(FormError::UnboundField(_))));
        assert!(matches!(store.blur("phone"), Err(FormError::UnboundField(_))));
        assert!(matches!(store.trigger("phone"), Err(FormError::UnboundField(_))));
    }

    #[test]
    fn test_on_blur_mode() {
        let mut store = store(TriggerMode::OnBlur);

        store.change("email", "abc").unwrap();
        assert!(store.is_valid());

        store.blur("email").unwrap();
        let field = store.field("email").unwrap();
        assert!(field.touched);
        assert_eq!(field.error.unwrap().message, "Ingresa un email válido");

        store.change("email", "a@b.co").unwrap();
        assert!(!store.is_valid());
        store.blur("email").unwrap();
        assert!(store.is_valid());
    }

    #[test]
    fn test_on_change_mode() {
        let mut store = store(TriggerMode::OnChange);

        store.change("email", "abc").unwrap();
        assert!(store.errors().has_field_error("email"));

        store.change("email", "a@b.co").unwrap();
        assert!(store.is_valid());
    }

    #[test]
    fn test_on_submit_mode_then_revalidate_on_change() {
        let mut store = store(TriggerMode::OnSubmit);

        store.change("email", "abc").unwrap();
        store.blur("email").unwrap();
        assert!(store.is_valid());

        assert!(store.handle_submit().is_err());
        assert_eq!(store.submit_count(), 1);

        store.change("email", "a@b.co").unwrap();
        assert!(store.is_valid());
    }

    #[test]
    fn test_revalidate_on_blur_after_submit() {
        let mut store = FormStore::new(FormValues::new(), TriggerMode::OnSubmit, RevalidateMode::OnBlur);
        store.register("name", Rules::new().required("Obligatorio"));

        assert!(store.handle_submit().is_err());
        assert!(!store.is_valid());

        store.change("name", "Ana").unwrap();
        assert!(!store.is_valid());

        store.blur("name").unwrap();
        assert!(store.is_valid());
    }

    #[test]
    fn test_trigger_validates_regardless_of_mode() {
        let mut store = store(TriggerMode::OnSubmit);

        store.change("email", "abc").unwrap();
        assert!(store.is_valid());
        assert!(!store.trigger("email").unwrap());
        assert_eq!(store.field("email").unwrap().error.unwrap().message, "Ingresa un email válido");

        store.change("email", "a@b.co").unwrap();
        assert!(store.trigger("email").unwrap());
        assert!(store.is_valid());
    }

    #[test]
    fn test_revalidate_on_submit_waits_for_next_submit() {
        let mut store = FormStore::new(FormValues::new(), TriggerMode::OnSubmit, RevalidateMode::OnSubmit);
        store.register("name", Rules::new().required("Obligatorio"));

        assert!(store.handle_submit().is_err());
        store.change("name", "Ana").unwrap();
        store.blur("name").unwrap();
        assert!(!store.is_valid());

        assert!(store.handle_submit().is_ok());
    }

    #[test]
    fn test_on_touched_mode() {
        let mut store = store(TriggerMode::OnTouched);

        store.change("email", "abc").unwrap();
        assert!(store.is_valid());

        store.blur("email").unwrap();
        assert!(!store.is_valid());

        store.change("email", "a@b.co").unwrap();
        assert!(store.is_valid());
    }

    #[test]
    fn test_all_mode() {
        let mut store = store(TriggerMode::All);

        store.change("email", "abc").unwrap();
        assert!(!store.is_valid());
        store.change("email", "a@b.co").unwrap();
        store.blur("email").unwrap();
        assert!(store.is_valid());
    }

    #[test]
    fn test_fixed_value_ignores_input() {
        let mut store = store(TriggerMode::OnChange);
        store.register_fixed("source", Rules::new(), json!(42));

        store.change("source", "tampered").unwrap();
        assert_eq!(store.value("source"), Some(&json!(42)));
        assert!(!store.field("source").unwrap().dirty);
    }

    #[test]
    fn test_fixed_value_survives_duplicate_registration() {
        let mut store = FormStore::new(FormValues::new(), TriggerMode::OnBlur, RevalidateMode::OnChange);
        store.register_fixed("y", Rules::new(), json!(42));
        store.register("y", Rules::new());

        store.change("y", "typed").unwrap();
        let submission = store.handle_submit().unwrap();

        assert_eq!(submission.to_json(), json!({ "y": 42 }));
    }

    #[test]
    fn test_handle_submit_payload() {
        let mut store = FormStore::new(FormValues::new(), TriggerMode::OnBlur, RevalidateMode::OnChange);
        store.register("x", Rules::new());
        store.register_fixed("y", Rules::new(), json!(42));

        store.change("x", "hello").unwrap();
        let submission = store.handle_submit().unwrap();

        assert_eq!(submission.to_json(), json!({ "x": "hello", "y": 42 }));
    }

    #[test]
    fn test_dirty_tracking() {
        let mut store = FormStore::new(
            defaults(&[("email", json!("a@b.co"))]),
            TriggerMode::OnBlur,
            RevalidateMode::OnChange,
        );
        store.register("email", Rules::new());

        store.change("email", "c@d.co").unwrap();
        assert!(store.field("email").unwrap().dirty);
        store.change("email", "a@b.co").unwrap();
        assert!(!store.field("email").unwrap().dirty);
    }

    #[test]
    fn test_set_and_clear_errors() {
        let mut store = store(TriggerMode::OnBlur);

        store
            .set_error("email", FieldError::new("Ya registrado"))
            .unwrap();
        assert_eq!(store.field("email").unwrap().error.unwrap().message, "Ya registrado");
        assert!(store.set_error("other", FieldError::new("x")).is_err());

        store.clear_errors(Some("email"));
        assert!(store.is_valid());
    }

    #[test]
    fn test_reset() {
        let mut store = store(TriggerMode::OnChange);
        store.change("email", "abc").unwrap();
        store.blur("email").unwrap();
        let _ = store.handle_submit();

        store.reset();

        assert!(store.is_valid());
        assert_eq!(store.value("email"), None);
        assert_eq!(store.submit_count(), 0);
        assert!(!store.field("email").unwrap().touched);
    }

    #[test]
    fn test_snapshot_helpers() {
        let mut store = FormStore::new(FormValues::new(), TriggerMode::OnBlur, RevalidateMode::OnChange);
        store.register("terms", Rules::new());
        store.register("floor", Rules::new());

        assert!(!store.field("terms").unwrap().checked());
        assert_eq!(store.field("terms").unwrap().text(), "");

        store.change("terms", true).unwrap();
        store.change("floor", 3).unwrap();
        assert!(store.field("terms").unwrap().checked());
        assert_eq!(store.field("floor").unwrap().text(), "3");
    }

    #[test]
    fn test_trigger_mode_serde() {
        let mode: TriggerMode = serde_json::from_value(json!("onTouched")).unwrap();
        assert_eq!(mode, TriggerMode::OnTouched);
        assert_eq!(serde_json::to_value(TriggerMode::All).unwrap(), json!("all"));
        assert_eq!(TriggerMode::default(), TriggerMode::OnBlur);
    }
}
