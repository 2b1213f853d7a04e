//! Field configuration schema
//!
//! A schema is an ordered list of [`FieldConfig`] records. Each record is
//! tagged with its kind (`type`) and carries the shared attributes of
//! [`FieldBase`] plus kind-specific ones. Schemas are usually built in code
//! with the fluent constructors or parsed from JSON:
//!
//! ```rust
//! use acton_forms::forms::{FieldConfig, Schema};
//!
//! let schema = Schema::from_json(r#"[
//!     { "type": "text", "name": "name", "placeholder": "Nombre" },
//!     { "type": "hidden", "name": "source", "value": "landing" }
//! ]"#)?;
//!
//! assert_eq!(schema.len(), 2);
//! assert!(matches!(schema.fields()[1], FieldConfig::Hidden(_)));
//! # Ok::<(), acton_forms::FormError>(())
//! ```

use std::collections::HashSet;

use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

use super::rules::Rules;
use crate::error::FormError;

/// Attributes shared by every field kind
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldBase {
    /// Key of the field in the form state, unique within a schema
    pub name: String,
    /// Validation rules
    #[serde(default)]
    pub rules: Rules,
    /// CSS class(es) replacing the control's default class
    #[serde(default)]
    pub class_name: Option<String>,
    /// CSS `grid-column` value for the control's cell
    #[serde(default)]
    pub grid_column: Option<String>,
}

impl FieldBase {
    fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Option for select dropdowns
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SelectOption {
    /// Value attribute
    pub value: String,
    /// Display text
    pub label: String,
}

impl SelectOption {
    /// Create a new select option
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Option for radio groups
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadioOption {
    /// Value attribute
    pub value: String,
    /// Display text
    pub label: String,
    /// Extra class for the option's label
    #[serde(default)]
    pub class_name: Option<String>,
}

impl RadioOption {
    /// Create a new radio option
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            class_name: None,
        }
    }

    /// Set the option's label class
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class_name = Some(class.into());
        self
    }
}

/// Piece of rich label content
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LabelSegment {
    /// Hyperlink
    Link {
        /// Link target
        href: String,
        /// Link text
        text: String,
    },
    /// Plain text
    Text(String),
}

/// Label content: plain text or text mixed with links
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Label {
    /// Plain text
    Text(String),
    /// Sequence of text and link segments
    Rich(Vec<LabelSegment>),
}

impl Default for Label {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<&str> for Label {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Label {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<LabelSegment>> for Label {
    fn from(segments: Vec<LabelSegment>) -> Self {
        Self::Rich(segments)
    }
}

/// Text or email input
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputTextConfig {
    /// Shared attributes
    #[serde(flatten)]
    pub base: FieldBase,
    /// Placeholder text
    #[serde(default)]
    pub placeholder: String,
    /// Initial value
    #[serde(default)]
    pub default_value: Option<String>,
}

/// Select dropdown
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectConfig {
    /// Shared attributes
    #[serde(flatten)]
    pub base: FieldBase,
    /// Text of the disabled placeholder option
    #[serde(default)]
    pub placeholder: Option<String>,
    /// Available options
    #[serde(default)]
    pub options: Vec<SelectOption>,
    /// Initially selected value
    #[serde(default)]
    pub default_value: Option<String>,
}

/// Multi-line text input
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAreaConfig {
    /// Shared attributes
    #[serde(flatten)]
    pub base: FieldBase,
    /// Placeholder text
    #[serde(default)]
    pub placeholder: String,
    /// Visible rows
    #[serde(default)]
    pub rows: Option<u32>,
    /// Initial value
    #[serde(default)]
    pub default_value: Option<String>,
    /// Caption rendered above the textarea
    #[serde(default)]
    pub label: Option<String>,
}

/// Radio button group
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadioConfig {
    /// Shared attributes
    #[serde(flatten)]
    pub base: FieldBase,
    /// Group caption
    #[serde(default)]
    pub label: String,
    /// Available options
    #[serde(default)]
    pub options: Vec<RadioOption>,
    /// Initially checked value
    #[serde(default)]
    pub default_value: Option<String>,
}

/// Single boolean checkbox
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckBoxConfig {
    /// Shared attributes
    #[serde(flatten)]
    pub base: FieldBase,
    /// Label next to the box
    #[serde(default)]
    pub label: Label,
    /// Initial state
    #[serde(default)]
    pub default_value: Option<bool>,
}

/// Hidden field with a fixed value
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HiddenConfig {
    /// Shared attributes
    #[serde(flatten)]
    pub base: FieldBase,
    /// Fixed value; user input and defaults never replace it
    #[serde(default)]
    pub value: Value,
}

/// Configuration whose kind tag is outside the supported set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnrecognizedField {
    /// The unsupported kind tag
    pub kind: String,
    /// Field name, empty when the record had none
    pub name: String,
}

/// Declarative description of one form control
#[derive(Debug, Clone)]
pub enum FieldConfig {
    /// Single-line text input
    Text(InputTextConfig),
    /// Email input
    Email(InputTextConfig),
    /// Select dropdown
    Select(SelectConfig),
    /// Multi-line text input
    Textarea(TextAreaConfig),
    /// Radio button group
    Radio(RadioConfig),
    /// Boolean checkbox
    Checkbox(CheckBoxConfig),
    /// Hidden fixed value
    Hidden(HiddenConfig),
    /// Unsupported kind, skipped when rendering
    Unrecognized(UnrecognizedField),
}

impl FieldConfig {
    /// Kind tags with a matching control
    pub const KINDS: [&'static str; 7] = [
        "text", "email", "select", "textarea", "radio", "checkbox", "hidden",
    ];

    /// Create a text input
    #[must_use]
    pub fn text(name: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self::Text(InputTextConfig {
            base: FieldBase::named(name),
            placeholder: placeholder.into(),
            default_value: None,
        })
    }

    /// Create an email input
    #[must_use]
    pub fn email(name: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self::Email(InputTextConfig {
            base: FieldBase::named(name),
            placeholder: placeholder.into(),
            default_value: None,
        })
    }

    /// Create a select dropdown
    #[must_use]
    pub fn select(name: impl Into<String>, options: Vec<SelectOption>) -> Self {
        Self::Select(SelectConfig {
            base: FieldBase::named(name),
            options,
            ..SelectConfig::default()
        })
    }

    /// Create a textarea
    #[must_use]
    pub fn textarea(name: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self::Textarea(TextAreaConfig {
            base: FieldBase::named(name),
            placeholder: placeholder.into(),
            ..TextAreaConfig::default()
        })
    }

    /// Create a radio group
    #[must_use]
    pub fn radio(
        name: impl Into<String>,
        label: impl Into<String>,
        options: Vec<RadioOption>,
    ) -> Self {
        Self::Radio(RadioConfig {
            base: FieldBase::named(name),
            label: label.into(),
            options,
            default_value: None,
        })
    }

    /// Create a checkbox
    #[must_use]
    pub fn checkbox(name: impl Into<String>, label: impl Into<Label>) -> Self {
        Self::Checkbox(CheckBoxConfig {
            base: FieldBase::named(name),
            label: label.into(),
            default_value: None,
        })
    }

    /// Create a hidden field with a fixed value
    #[must_use]
    pub fn hidden(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Hidden(HiddenConfig {
            base: FieldBase::named(name),
            value: value.into(),
        })
    }

    /// Parse a single configuration from JSON
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Schema`] when the JSON is malformed, lacks a
    /// `type` tag, or a known kind has invalid attributes.
    pub fn from_json(json: &str) -> Result<Self, FormError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set validation rules
    #[must_use]
    pub fn with_rules(mut self, rules: Rules) -> Self {
        if let Some(base) = self.base_mut() {
            base.rules = rules;
        }
        self
    }

    /// Set the class replacing the control's default class
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        if let Some(base) = self.base_mut() {
            base.class_name = Some(class.into());
        }
        self
    }

    /// Set the `grid-column` placement hint
    #[must_use]
    pub fn with_grid_column(mut self, column: impl Into<String>) -> Self {
        if let Some(base) = self.base_mut() {
            base.grid_column = Some(column.into());
        }
        self
    }

    /// Set the field's declared default value
    ///
    /// Strings apply to text-like kinds, booleans to checkboxes. Hidden
    /// fields keep their fixed value.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        let value = value.into();
        match &mut self {
            Self::Text(c) | Self::Email(c) => c.default_value = value.as_str().map(String::from),
            Self::Select(c) => c.default_value = value.as_str().map(String::from),
            Self::Textarea(c) => c.default_value = value.as_str().map(String::from),
            Self::Radio(c) => c.default_value = value.as_str().map(String::from),
            Self::Checkbox(c) => c.default_value = value.as_bool(),
            Self::Hidden(c) => {
                tracing::debug!(field = %c.base.name, "default ignored for hidden field");
            }
            Self::Unrecognized(f) => {
                tracing::debug!(field = %f.name, kind = %f.kind, "default ignored for unrecognized field");
            }
        }
        self
    }

    /// Set the visible rows of a textarea
    #[must_use]
    pub fn with_rows(mut self, rows: u32) -> Self {
        if let Self::Textarea(config) = &mut self {
            config.rows = Some(rows);
        }
        self
    }

    /// Set the caption of a textarea, radio group or checkbox
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        match &mut self {
            Self::Textarea(config) => config.label = Some(label.into()),
            Self::Radio(config) => config.label = label.into(),
            Self::Checkbox(config) => config.label = Label::Text(label.into()),
            _ => {}
        }
        self
    }

    /// Set the placeholder of a select dropdown
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        match &mut self {
            Self::Text(c) | Self::Email(c) => c.placeholder = placeholder.into(),
            Self::Select(c) => c.placeholder = Some(placeholder.into()),
            Self::Textarea(c) => c.placeholder = placeholder.into(),
            _ => {}
        }
        self
    }

    /// Field name
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Unrecognized(field) => &field.name,
            _ => self.base().map_or("", |base| base.name.as_str()),
        }
    }

    /// Kind tag as written in the schema
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Text(_) => "text",
            Self::Email(_) => "email",
            Self::Select(_) => "select",
            Self::Textarea(_) => "textarea",
            Self::Radio(_) => "radio",
            Self::Checkbox(_) => "checkbox",
            Self::Hidden(_) => "hidden",
            Self::Unrecognized(field) => &field.kind,
        }
    }

    /// Shared attributes, `None` for unrecognized kinds
    #[must_use]
    pub const fn base(&self) -> Option<&FieldBase> {
        match self {
            Self::Text(c) | Self::Email(c) => Some(&c.base),
            Self::Select(c) => Some(&c.base),
            Self::Textarea(c) => Some(&c.base),
            Self::Radio(c) => Some(&c.base),
            Self::Checkbox(c) => Some(&c.base),
            Self::Hidden(c) => Some(&c.base),
            Self::Unrecognized(_) => None,
        }
    }

    fn base_mut(&mut self) -> Option<&mut FieldBase> {
        match self {
            Self::Text(c) | Self::Email(c) => Some(&mut c.base),
            Self::Select(c) => Some(&mut c.base),
            Self::Textarea(c) => Some(&mut c.base),
            Self::Radio(c) => Some(&mut c.base),
            Self::Checkbox(c) => Some(&mut c.base),
            Self::Hidden(c) => Some(&mut c.base),
            Self::Unrecognized(_) => None,
        }
    }

    /// The field's own declared default, if any
    #[must_use]
    pub fn default_value(&self) -> Option<Value> {
        match self {
            Self::Text(c) | Self::Email(c) => c.default_value.clone().map(Value::String),
            Self::Select(c) => c.default_value.clone().map(Value::String),
            Self::Textarea(c) => c.default_value.clone().map(Value::String),
            Self::Radio(c) => c.default_value.clone().map(Value::String),
            Self::Checkbox(c) => c.default_value.map(Value::Bool),
            Self::Hidden(_) | Self::Unrecognized(_) => None,
        }
    }

    /// Fixed value of a hidden field
    #[must_use]
    pub const fn fixed_value(&self) -> Option<&Value> {
        match self {
            Self::Hidden(c) => Some(&c.value),
            _ => None,
        }
    }

    /// Check if this field is a textarea
    #[must_use]
    pub const fn is_textarea(&self) -> bool {
        matches!(self, Self::Textarea(_))
    }

    /// Check if this field has a supported kind
    #[must_use]
    pub const fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum KnownField {
    Text(InputTextConfig),
    Email(InputTextConfig),
    Select(SelectConfig),
    Textarea(TextAreaConfig),
    Radio(RadioConfig),
    Checkbox(CheckBoxConfig),
    Hidden(HiddenConfig),
}

impl From<KnownField> for FieldConfig {
    fn from(field: KnownField) -> Self {
        match field {
            KnownField::Text(c) => Self::Text(c),
            KnownField::Email(c) => Self::Email(c),
            KnownField::Select(c) => Self::Select(c),
            KnownField::Textarea(c) => Self::Textarea(c),
            KnownField::Radio(c) => Self::Radio(c),
            KnownField::Checkbox(c) => Self::Checkbox(c),
            KnownField::Hidden(c) => Self::Hidden(c),
        }
    }
}

impl<'de> Deserialize<'de> for FieldConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        let kind = raw
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| de::Error::missing_field("type"))?;

        if !Self::KINDS.iter().any(|known| *known == kind) {
            let name = raw.get("name").and_then(Value::as_str).unwrap_or_default();
            return Ok(Self::Unrecognized(UnrecognizedField {
                kind: kind.to_string(),
                name: name.to_string(),
            }));
        }

        KnownField::deserialize(raw)
            .map(Into::into)
            .map_err(de::Error::custom)
    }
}

/// Ordered list of field configurations
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: Vec<FieldConfig>,
}

impl Schema {
    /// Wrap a list of configurations
    #[must_use]
    pub const fn new(fields: Vec<FieldConfig>) -> Self {
        Self { fields }
    }

    /// Parse a JSON array of configurations
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Schema`] when any record fails to parse.
    /// Records with an unsupported `type` parse as
    /// [`FieldConfig::Unrecognized`] instead of failing.
    pub fn from_json(json: &str) -> Result<Self, FormError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The configurations in schema order
    #[must_use]
    pub fn fields(&self) -> &[FieldConfig] {
        &self.fields
    }

    /// Number of configurations
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no configurations
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over the configurations
    pub fn iter(&self) -> std::slice::Iter<'_, FieldConfig> {
        self.fields.iter()
    }

    /// Append a configuration
    pub fn push(&mut self, field: FieldConfig) {
        self.fields.push(field);
    }

    /// Names used by more than one recognized field, in first-repeat order
    #[must_use]
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for field in self.fields.iter().filter(|f| f.is_recognized()) {
            let name = field.name();
            if !seen.insert(name) && !duplicates.contains(&name) {
                duplicates.push(name);
            }
        }
        duplicates
    }
}

impl From<Vec<FieldConfig>> for Schema {
    fn from(fields: Vec<FieldConfig>) -> Self {
        Self::new(fields)
    }
}

impl FromIterator<FieldConfig> for Schema {
    fn from_iter<I: IntoIterator<Item = FieldConfig>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a FieldConfig;
    type IntoIter = std::slice::Iter<'a, FieldConfig>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_every_kind() {
        let schema = Schema::from_json(
            r#"[
                { "type": "text", "name": "name", "placeholder": "Nombre", "gridColumn": "span 2" },
                { "type": "email", "name": "email", "placeholder": "Email", "className": "input wide" },
                { "type": "select", "name": "country", "options": [{ "value": "es", "label": "España" }] },
                { "type": "textarea", "name": "message", "placeholder": "Mensaje", "rows": 6, "label": "Comentarios" },
                { "type": "radio", "name": "kind", "label": "Tipo", "options": [{ "value": "a", "label": "A", "className": "wide" }] },
                { "type": "checkbox", "name": "news", "label": "Novedades", "defaultValue": true },
                { "type": "hidden", "name": "source", "value": 42 }
            ]"#,
        )
        .unwrap();

        let kinds: Vec<_> = schema.iter().map(FieldConfig::kind).collect();
        assert_eq!(kinds, FieldConfig::KINDS);

        let FieldConfig::Text(text) = &schema.fields()[0] else { panic!("expected text") };
        assert_eq!(text.base.grid_column.as_deref(), Some("span 2"));

        let FieldConfig::Email(email) = &schema.fields()[1] else { panic!("expected email") };
        assert_eq!(email.base.class_name.as_deref(), Some("input wide"));

        let FieldConfig::Textarea(area) = &schema.fields()[3] else { panic!("expected textarea") };
        assert_eq!(area.rows, Some(6));
        assert_eq!(area.label.as_deref(), Some("Comentarios"));

        let FieldConfig::Radio(radio) = &schema.fields()[4] else { panic!("expected radio") };
        assert_eq!(radio.options[0].class_name.as_deref(), Some("wide"));

        assert_eq!(schema.fields()[5].default_value(), Some(json!(true)));
        assert_eq!(schema.fields()[6].fixed_value(), Some(&json!(42)));
    }

    #[test]
    fn test_unknown_kind_parses_as_unrecognized() {
        let field = FieldConfig::from_json(r#"{ "type": "date", "name": "when" }"#).unwrap();

        assert!(!field.is_recognized());
        assert_eq!(field.kind(), "date");
        assert_eq!(field.name(), "when");
        assert!(field.base().is_none());
    }

    #[test]
    fn test_missing_type_is_an_error() {
        let err = FieldConfig::from_json(r#"{ "name": "when" }"#).unwrap_err();
        assert!(err.to_string().contains("type"));
    }

    #[test]
    fn test_known_kind_with_bad_attributes_is_an_error() {
        let result = FieldConfig::from_json(r#"{ "type": "textarea", "name": "m", "rows": "many" }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_rich_label() {
        let field = FieldConfig::from_json(
            r#"{ "type": "checkbox", "name": "terms", "label": ["Acepto ", { "href": "/legal_notice", "text": "Aviso legal" }] }"#,
        )
        .unwrap();

        let FieldConfig::Checkbox(checkbox) = field else { panic!("expected checkbox") };
        assert_eq!(
            checkbox.label,
            Label::Rich(vec![
                LabelSegment::Text("Acepto ".into()),
                LabelSegment::Link {
                    href: "/legal_notice".into(),
                    text: "Aviso legal".into()
                },
            ])
        );
    }

    #[test]
    fn test_builders() {
        let field = FieldConfig::textarea("message", "Escribe aquí")
            .with_rows(8)
            .with_label("Mensaje")
            .with_grid_column("span 2")
            .with_default("hola");

        let FieldConfig::Textarea(area) = &field else { panic!("expected textarea") };
        assert_eq!(area.rows, Some(8));
        assert_eq!(area.label.as_deref(), Some("Mensaje"));
        assert_eq!(area.base.grid_column.as_deref(), Some("span 2"));
        assert_eq!(field.default_value(), Some(json!("hola")));
    }

    #[test]
    fn test_hidden_ignores_declared_default() {
        let field = FieldConfig::hidden("source", "web").with_default("other");
        assert_eq!(field.default_value(), None);
        assert_eq!(field.fixed_value(), Some(&json!("web")));
    }

    #[test]
    fn test_duplicate_names() {
        let schema: Schema = vec![
            FieldConfig::text("name", ""),
            FieldConfig::email("email", ""),
            FieldConfig::text("name", ""),
            FieldConfig::text("name", ""),
        ]
        .into();

        assert_eq!(schema.duplicate_names(), vec!["name"]);
    }
}
