//! Field controls
//!
//! Each control binds one named slot of the [`FormStore`] to one rendered
//! element and shows the slot's validation error next to it. Controls only
//! write the attributes listed here; nothing from the configuration is
//! passed through to the element unchecked.

use serde_json::Value;

use super::html::{class_list, escape_html, write_attr, write_flag, write_label, write_opt_attr};
use super::rules::Rules;
use super::schema::{Label, RadioOption, SelectOption};
use super::state::{value_text, FieldSnapshot, FormStore};
use crate::error::FormError;

const ERROR_CLASS: &str = "error";
const INLINE_ERROR_CLASS: &str = "error-message";
const BLOCK_ERROR_CLASS: &str = "text-red-500 text-sm mt-1 block";
const DEFAULT_SELECT_PLACEHOLDER: &str = "Selecciona una opción";
const DEFAULT_TEXTAREA_ROWS: u32 = 4;

/// Where a control sits in the form grid
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Placement {
    /// Default grid flow
    #[default]
    Flow,
    /// Explicit `grid-column` value
    Column(String),
    /// Span the whole row
    FullRow,
}

impl Placement {
    /// Inline style for the control's outer element
    #[must_use]
    pub fn style(&self) -> Option<String> {
        match self {
            Self::Flow => None,
            Self::Column(column) => Some(format!("grid-column: {column}")),
            Self::FullRow => Some("grid-column: 1 / -1".to_string()),
        }
    }
}

/// Props shared by every control
#[derive(Debug, Clone, Default)]
pub struct CommonProps {
    /// Unique key of the rendered instance
    pub key: String,
    /// Bound field name
    pub name: String,
    /// Effective validation rules
    pub rules: Rules,
    /// Class replacing the control's default class
    pub class_name: Option<String>,
    /// Grid placement
    pub placement: Placement,
}

impl CommonProps {
    fn class_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.class_name.as_deref().unwrap_or(default)
    }

    fn write_outer_attrs(&self, html: &mut String) {
        write_attr(html, "data-key", &self.key);
        write_opt_attr(html, "style", self.placement.style().as_deref());
    }
}

fn write_state_attrs(html: &mut String, field: &FieldSnapshot<'_>) {
    if field.required {
        write_attr(html, "aria-required", "true");
    }
    if field.has_error() {
        write_attr(html, "aria-invalid", "true");
    }
}

fn write_error(html: &mut String, field: &FieldSnapshot<'_>, class: &str) {
    if let Some(error) = field.error {
        html.push_str("<span");
        write_attr(html, "class", class);
        html.push('>');
        html.push_str(&escape_html(&error.message));
        html.push_str("</span>\n");
    }
}

fn error_class(field: &FieldSnapshot<'_>) -> &'static str {
    if field.has_error() {
        ERROR_CLASS
    } else {
        ""
    }
}

/// Kind of single-line input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    /// Plain text
    Text,
    /// Email address
    Email,
}

impl TextKind {
    /// HTML `type` attribute value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
        }
    }
}

/// Single-line text or email input
///
/// The email variant layers the email pattern onto the field's rules,
/// shows a leading `@` indicator and enables email autofill.
#[derive(Debug, Clone)]
pub struct TextInput {
    /// Shared props
    pub props: CommonProps,
    /// Input kind
    pub kind: TextKind,
    /// Placeholder text
    pub placeholder: String,
}

impl TextInput {
    /// Create a text input, layering email validation when needed
    #[must_use]
    pub fn new(mut props: CommonProps, kind: TextKind, placeholder: impl Into<String>) -> Self {
        if kind == TextKind::Email {
            props.rules = props.rules.with_email_pattern();
        }
        Self {
            props,
            kind,
            placeholder: placeholder.into(),
        }
    }

    fn render(&self, field: &FieldSnapshot<'_>, html: &mut String) {
        let is_email = self.kind == TextKind::Email;
        let type_class = if is_email { "input-email" } else { "input-text" };

        html.push_str(r#"<div class="input-container""#);
        self.props.write_outer_attrs(html);
        html.push_str(">\n");

        if is_email {
            html.push_str("<span class=\"input-type-indicator\">@</span>\n");
        }

        html.push_str("<input");
        write_attr(html, "type", self.kind.as_str());
        write_attr(html, "name", field.name);
        write_attr(html, "id", field.name);
        write_attr(
            html,
            "class",
            &class_list(&[self.props.class_or("input"), type_class, error_class(field)]),
        );
        write_attr(html, "placeholder", &self.placeholder);
        write_attr(html, "value", &field.text());
        write_attr(html, "autocomplete", if is_email { "email" } else { "off" });
        write_state_attrs(html, field);
        html.push_str(">\n");

        write_error(html, field, INLINE_ERROR_CLASS);
        html.push_str("</div>\n");
    }
}

/// Dropdown with a disabled placeholder option
#[derive(Debug, Clone)]
pub struct SelectInput {
    /// Shared props
    pub props: CommonProps,
    /// Placeholder option text
    pub placeholder: Option<String>,
    /// Selectable options
    pub options: Vec<SelectOption>,
}

impl SelectInput {
    fn render(&self, field: &FieldSnapshot<'_>, html: &mut String) {
        let current = field.text();

        html.push_str("<div");
        self.props.write_outer_attrs(html);
        html.push_str(">\n<select");
        write_attr(html, "name", field.name);
        write_attr(html, "id", field.name);
        write_attr(
            html,
            "class",
            &class_list(&[self.props.class_or("select"), error_class(field)]),
        );
        write_state_attrs(html, field);
        html.push_str(">\n");

        html.push_str(r#"<option value="" disabled"#);
        write_flag(html, "selected", current.is_empty());
        html.push('>');
        html.push_str(&escape_html(
            self.placeholder.as_deref().unwrap_or(DEFAULT_SELECT_PLACEHOLDER),
        ));
        html.push_str("</option>\n");

        for option in &self.options {
            html.push_str("<option");
            write_attr(html, "value", &option.value);
            write_flag(html, "selected", !current.is_empty() && current == option.value);
            html.push('>');
            html.push_str(&escape_html(&option.label));
            html.push_str("</option>\n");
        }

        html.push_str("</select>\n");
        write_error(html, field, INLINE_ERROR_CLASS);
        html.push_str("</div>\n");
    }
}

/// Multi-line text input with an optional caption
#[derive(Debug, Clone)]
pub struct TextArea {
    /// Shared props
    pub props: CommonProps,
    /// Placeholder text
    pub placeholder: String,
    /// Visible rows
    pub rows: Option<u32>,
    /// Caption above the textarea
    pub label: Option<String>,
}

impl TextArea {
    fn render(&self, field: &FieldSnapshot<'_>, html: &mut String) {
        html.push_str("<div");
        self.props.write_outer_attrs(html);
        html.push_str(">\n");

        if let Some(label) = &self.label {
            html.push_str("<label");
            write_attr(html, "for", field.name);
            write_attr(html, "class", "block text-sm font-medium text-gray-300 mb-2");
            html.push('>');
            html.push_str(&escape_html(label));
            html.push_str("</label>\n");
        }

        html.push_str("<textarea");
        write_attr(html, "name", field.name);
        write_attr(html, "id", field.name);
        write_attr(
            html,
            "class",
            &class_list(&[self.props.class_or("textarea"), error_class(field)]),
        );
        write_attr(html, "placeholder", &self.placeholder);
        write_attr(
            html,
            "rows",
            &self.rows.unwrap_or(DEFAULT_TEXTAREA_ROWS).to_string(),
        );
        write_state_attrs(html, field);
        html.push('>');
        html.push_str(&escape_html(&field.text()));
        html.push_str("</textarea>\n");

        write_error(html, field, INLINE_ERROR_CLASS);
        html.push_str("</div>\n");
    }
}

/// Group of radio inputs sharing one field
#[derive(Debug, Clone)]
pub struct RadioGroup {
    /// Shared props
    pub props: CommonProps,
    /// Group caption
    pub label: String,
    /// One radio input per option
    pub options: Vec<RadioOption>,
}

impl RadioGroup {
    /// Checked state of every option for the field's current value
    ///
    /// An option is checked when its value equals the current value
    /// exactly, so at most one option is checked.
    #[must_use]
    pub fn checked_states(&self, field: &FieldSnapshot<'_>) -> Vec<bool> {
        let current = field.value.and_then(Value::as_str);
        let mut found = false;
        self.options
            .iter()
            .map(|option| {
                let checked = !found && current == Some(option.value.as_str());
                found |= checked;
                checked
            })
            .collect()
    }

    fn render(&self, field: &FieldSnapshot<'_>, html: &mut String) {
        html.push_str("<div");
        write_attr(
            html,
            "class",
            &class_list(&["radio-input-container", self.props.class_or("")]),
        );
        self.props.write_outer_attrs(html);
        write_attr(html, "role", "radiogroup");
        write_state_attrs(html, field);
        html.push_str(">\n");

        html.push_str("<p class=\"radio-input-label\">");
        html.push_str(&escape_html(&self.label));
        html.push_str(" <span class=\"text-red-500\">*</span></p>\n");

        for (option, checked) in self.options.iter().zip(self.checked_states(field)) {
            html.push_str("<label");
            write_attr(
                html,
                "class",
                &class_list(&["radio-label", option.class_name.as_deref().unwrap_or("")]),
            );
            html.push_str("><input");
            write_attr(html, "class", "radio-input");
            write_attr(html, "type", "radio");
            write_attr(html, "name", field.name);
            write_attr(html, "value", &option.value);
            write_flag(html, "checked", checked);
            html.push('>');
            html.push_str(&escape_html(&option.label));
            html.push_str("</label>\n");
        }

        write_error(html, field, BLOCK_ERROR_CLASS);
        html.push_str("</div>\n");
    }
}

/// Single boolean toggle
#[derive(Debug, Clone)]
pub struct CheckBox {
    /// Shared props
    pub props: CommonProps,
    /// Label content next to the box
    pub label: Label,
}

impl CheckBox {
    fn render(&self, field: &FieldSnapshot<'_>, html: &mut String) {
        html.push_str("<div");
        self.props.write_outer_attrs(html);
        html.push_str(">\n<label");
        write_attr(html, "class", self.props.class_or("text-primary radio-label"));
        html.push_str("><input");
        write_attr(html, "type", "checkbox");
        write_attr(html, "class", "checkbox");
        write_attr(html, "name", field.name);
        write_attr(html, "id", field.name);
        write_attr(html, "value", "true");
        write_flag(html, "checked", field.checked());
        write_state_attrs(html, field);
        html.push_str("><span>");
        write_label(html, &self.label);
        html.push_str("</span></label>\n");

        write_error(html, field, BLOCK_ERROR_CLASS);
        html.push_str("</div>\n");
    }
}

/// Non-editable field carrying a fixed value
#[derive(Debug, Clone)]
pub struct HiddenInput {
    /// Shared props
    pub props: CommonProps,
    /// The fixed value
    pub value: Value,
}

impl HiddenInput {
    fn render(&self, field: &FieldSnapshot<'_>, html: &mut String) {
        html.push_str("<input");
        write_attr(html, "type", "hidden");
        write_attr(html, "name", field.name);
        write_attr(html, "value", &value_text(&self.value));
        write_opt_attr(html, "class", self.props.class_name.as_deref());
        self.props.write_outer_attrs(html);
        write_flag(html, "readonly", true);
        html.push_str(">\n");
    }
}

/// A control bound to one field
#[derive(Debug, Clone)]
pub enum Control {
    /// Text or email input
    Text(TextInput),
    /// Dropdown
    Select(SelectInput),
    /// Multi-line input
    TextArea(TextArea),
    /// Radio group
    Radio(RadioGroup),
    /// Checkbox
    CheckBox(CheckBox),
    /// Hidden input
    Hidden(HiddenInput),
}

impl Control {
    /// Shared props
    #[must_use]
    pub const fn props(&self) -> &CommonProps {
        match self {
            Self::Text(c) => &c.props,
            Self::Select(c) => &c.props,
            Self::TextArea(c) => &c.props,
            Self::Radio(c) => &c.props,
            Self::CheckBox(c) => &c.props,
            Self::Hidden(c) => &c.props,
        }
    }

    /// Bound field name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.props().name
    }

    /// Unique instance key
    #[must_use]
    pub fn key(&self) -> &str {
        &self.props().key
    }

    /// Effective validation rules
    #[must_use]
    pub const fn rules(&self) -> &Rules {
        &self.props().rules
    }

    /// Fixed value of a hidden control
    #[must_use]
    pub const fn fixed_value(&self) -> Option<&Value> {
        match self {
            Self::Hidden(c) => Some(&c.value),
            _ => None,
        }
    }

    /// Check if this control is a textarea
    #[must_use]
    pub const fn is_textarea(&self) -> bool {
        matches!(self, Self::TextArea(_))
    }

    /// Render the control for the current state of its field
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnboundField`] when the field is not registered
    /// in `store`.
    pub fn render(&self, store: &FormStore, html: &mut String) -> Result<(), FormError> {
        let field = store.field(self.name())?;
        match self {
            Self::Text(c) => c.render(&field, html),
            Self::Select(c) => c.render(&field, html),
            Self::TextArea(c) => c.render(&field, html),
            Self::Radio(c) => c.render(&field, html),
            Self::CheckBox(c) => c.render(&field, html),
            Self::Hidden(c) => c.render(&field, html),
        }
        Ok(())
    }

    /// Render the control to a new string
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnboundField`] when the field is not registered
    /// in `store`.
    pub fn to_html(&self, store: &FormStore) -> Result<String, FormError> {
        let mut html = String::with_capacity(256);
        self.render(store, &mut html)?;
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::error::FieldError;
    use crate::forms::schema::LabelSegment;
    use crate::forms::state::{FormValues, RevalidateMode, TriggerMode};
    use serde_json::json;

    fn props(name: &str) -> CommonProps {
        CommonProps {
            key: format!("{name}-0"),
            name: name.to_string(),
            ..CommonProps::default()
        }
    }

    fn store_with(control: &Control, value: Option<Value>) -> FormStore {
        let mut values = FormValues::new();
        if let Some(value) = value {
            values.insert(control.name().to_string(), value);
        }
        let mut store = FormStore::new(values, TriggerMode::OnBlur, RevalidateMode::OnChange);
        match control.fixed_value() {
            Some(fixed) => store.register_fixed(control.name(), control.rules().clone(), fixed.clone()),
            None => store.register(control.name(), control.rules().clone()),
        }
        store
    }

    #[test]
    fn test_text_input() {
        let control = Control::Text(TextInput::new(props("name"), TextKind::Text, "Nombre"));
        let html = control.to_html(&store_with(&control, Some(json!("Ana")))).unwrap();

        assert!(html.contains(r#"type="text""#));
        assert!(html.contains(r#"class="input input-text""#));
        assert!(html.contains(r#"placeholder="Nombre""#));
        assert!(html.contains(r#"value="Ana""#));
        assert!(html.contains(r#"autocomplete="off""#));
        assert!(html.contains(r#"data-key="name-0""#));
        assert!(!html.contains("input-type-indicator"));
    }

    #[test]
    fn test_email_input_layers_rule_and_indicator() {
        let control = Control::Text(TextInput::new(props("email"), TextKind::Email, "Email"));
        let html = control.to_html(&store_with(&control, None)).unwrap();

        assert!(control.rules().pattern.is_some());
        assert!(html.contains(r#"<span class="input-type-indicator">@</span>"#));
        assert!(html.contains(r#"type="email""#));
        assert!(html.contains(r#"class="input input-email""#));
        assert!(html.contains(r#"autocomplete="email""#));
    }

    #[test]
    fn test_error_is_additive_class_and_adjacent_message() {
        let control = Control::Text(TextInput::new(props("email"), TextKind::Email, ""));
        let mut store = store_with(&control, Some(json!("abc")));
        store.blur("email").unwrap();

        let html = control.to_html(&store).unwrap();
        assert!(html.contains(r#"class="input input-email error""#));
        assert!(html.contains(r#"aria-invalid="true""#));
        assert!(html.contains(r#"<span class="error-message">Ingresa un email válido</span>"#));
    }

    #[test]
    fn test_custom_class_replaces_default() {
        let mut common = props("name");
        common.class_name = Some("big-input".into());
        let control = Control::Text(TextInput::new(common, TextKind::Text, ""));
        let html = control.to_html(&store_with(&control, None)).unwrap();

        assert!(html.contains(r#"class="big-input input-text""#));
    }

    #[test]
    fn test_select_placeholder_and_selection() {
        let control = Control::Select(SelectInput {
            props: props("country"),
            placeholder: None,
            options: vec![
                SelectOption::new("es", "España"),
                SelectOption::new("pt", "Portugal"),
            ],
        });

        let html = control.to_html(&store_with(&control, None)).unwrap();
        assert!(html.contains(r#"<option value="" disabled selected>Selecciona una opción</option>"#));
        assert!(html.contains(r#"<option value="es">España</option>"#));

        let html = control.to_html(&store_with(&control, Some(json!("pt")))).unwrap();
        assert!(html.contains(r#"<option value="" disabled>"#));
        assert!(html.contains(r#"<option value="pt" selected>Portugal</option>"#));
    }

    #[test]
    fn test_textarea_caption_rows_and_placement() {
        let mut common = props("message");
        common.placement = Placement::FullRow;
        let control = Control::TextArea(TextArea {
            props: common,
            placeholder: "Escribe".into(),
            rows: None,
            label: Some("Mensaje".into()),
        });

        let html = control.to_html(&store_with(&control, Some(json!("a < b")))).unwrap();
        assert!(html.contains(r#"style="grid-column: 1 / -1""#));
        assert!(html.contains(r#"<label for="message""#));
        assert!(html.contains(r#"rows="4""#));
        assert!(html.contains("a &lt; b</textarea>"));
        assert!(control.is_textarea());
    }

    #[test]
    fn test_radio_exactly_one_checked() {
        let group = RadioGroup {
            props: props("kind"),
            label: "Tipo de instalación".into(),
            options: vec![
                RadioOption::new("new", "Nueva"),
                RadioOption::new("reform", "Reforma").class("wide"),
            ],
        };
        let control = Control::Radio(group.clone());
        let mut store = store_with(&control, Some(json!("reform")));

        assert_eq!(group.checked_states(&store.field("kind").unwrap()), vec![false, true]);

        store.change("kind", "new").unwrap();
        assert_eq!(group.checked_states(&store.field("kind").unwrap()), vec![true, false]);

        let html = control.to_html(&store).unwrap();
        assert!(html.contains(r#"Tipo de instalación <span class="text-red-500">*</span>"#));
        assert!(html.contains(r#"value="new" checked>Nueva"#));
        assert!(html.contains(r#"<label class="radio-label wide">"#));
        assert_eq!(html.matches(" checked").count(), 1);
    }

    #[test]
    fn test_radio_matches_strictly() {
        let group = RadioGroup {
            props: props("floor"),
            label: "Planta".into(),
            options: vec![RadioOption::new("1", "Primera")],
        };
        let store = store_with(&Control::Radio(group.clone()), Some(json!(1)));

        assert_eq!(group.checked_states(&store.field("floor").unwrap()), vec![false]);
    }

    #[test]
    fn test_checkbox_defaults_unchecked() {
        let control = Control::CheckBox(CheckBox {
            props: props("news"),
            label: Label::Rich(vec![
                LabelSegment::Text("Quiero ".into()),
                LabelSegment::Link {
                    href: "/news".into(),
                    text: "novedades".into(),
                },
            ]),
        });

        let html = control.to_html(&store_with(&control, None)).unwrap();
        assert!(!html.contains(" checked"));
        assert!(html.contains(r#"<a href="/news" class="underline">novedades</a>"#));

        let html = control.to_html(&store_with(&control, Some(json!(true)))).unwrap();
        assert!(html.contains(" checked"));
    }

    #[test]
    fn test_checkbox_error_message() {
        let mut common = props("terms");
        common.rules = Rules::new().required("Debe aceptar");
        let control = Control::CheckBox(CheckBox {
            props: common,
            label: Label::from("Acepto"),
        });
        let mut store = store_with(&control, None);
        store.set_error("terms", FieldError::new("Debe aceptar")).unwrap();

        let html = control.to_html(&store).unwrap();
        assert!(html.contains(r#"<span class="text-red-500 text-sm mt-1 block">Debe aceptar</span>"#));
        assert!(html.contains(r#"aria-required="true""#));
    }

    #[test]
    fn test_hidden_renders_fixed_value() {
        let control = Control::Hidden(HiddenInput {
            props: props("source"),
            value: json!(42),
        });
        let mut store = store_with(&control, None);
        store.change("source", "tampered").unwrap();

        let html = control.to_html(&store).unwrap();
        assert!(html.contains(r#"type="hidden""#));
        assert!(html.contains(r#"value="42""#));
        assert!(html.contains(" readonly"));
        assert!(!html.contains("tampered"));
    }

    #[test]
    fn test_hidden_carries_key_and_placement() {
        let control = Control::Hidden(HiddenInput {
            props: CommonProps {
                placement: Placement::Column("span 2".into()),
                ..props("source")
            },
            value: json!("landing"),
        });
        let store = store_with(&control, None);

        let html = control.to_html(&store).unwrap();
        assert!(html.contains(r#"data-key="source-0""#));
        assert!(html.contains(r#"style="grid-column: span 2""#));
    }

    #[test]
    fn test_render_outside_form_fails() {
        let control = Control::Text(TextInput::new(props("name"), TextKind::Text, ""));
        let store = FormStore::new(FormValues::new(), TriggerMode::OnBlur, RevalidateMode::OnChange);

        assert!(matches!(control.to_html(&store), Err(FormError::UnboundField(n)) if n == "name"));
    }

    #[test]
    fn test_placement_style() {
        assert_eq!(Placement::Flow.style(), None);
        assert_eq!(
            Placement::Column("span 2".into()).style().as_deref(),
            Some("grid-column: span 2")
        );
    }
}
