//! Form renderer
//!
//! [`FormRenderer`] mounts a [`Schema`] into one [`FormStore`], lays the
//! resolved controls out and wires submission. Fields other than textareas
//! go into the grid container in schema order; textareas follow below the
//! grid, each in its own block, also in schema order.
//!
//! # Example
//!
//! ```rust
//! use acton_forms::forms::{FieldConfig, FormRenderer, FormRendererProps, Schema, SubmitOutcome};
//!
//! let schema = Schema::new(vec![
//!     FieldConfig::text("x", "X"),
//!     FieldConfig::hidden("y", 42),
//! ]);
//! let mut form = FormRenderer::mount(&schema, FormRendererProps::new(), |_| {});
//!
//! form.change("x", "hello")?;
//! let SubmitOutcome::Submitted(payload) = form.submit() else {
//!     panic!("form should be valid");
//! };
//! assert_eq!(payload.to_json(), serde_json::json!({ "x": "hello", "y": 42 }));
//! # Ok::<(), acton_forms::FormError>(())
//! ```

use std::fmt;

use serde_json::Value;

use super::controls::{CheckBox, CommonProps, Control};
use super::error::ValidationErrors;
use super::html::{escape_html, write_attr, write_flag};
use super::resolver::{field_key, resolve_schema, Diagnostic, ResolvedField};
use super::schema::Schema;
use super::state::{initial_values, FormStore, FormValues, RevalidateMode, Submission, TriggerMode};
use crate::config::{FormsConfig, TermsSettings};
use crate::error::FormError;

/// Callback receiving the validated payload
pub type SubmitHandler = Box<dyn FnMut(&Submission) + Send>;

/// Presentation and behavior options of a rendered form
#[derive(Debug, Clone)]
pub struct FormRendererProps {
    /// Heading rendered above the fields
    pub title: Option<String>,
    /// Heading class
    pub title_class: String,
    /// Form element class
    pub form_class: String,
    /// Grid container class
    pub grid_class: String,
    /// Submit button text
    pub submit_label: String,
    /// Submit button class
    pub submit_class: String,
    /// Caller-supplied initial values
    pub default_values: FormValues,
    /// Add the terms-acceptance checkbox
    pub accept_conditions: bool,
    /// Terms checkbox copy and links
    pub terms: TermsSettings,
    /// Validation trigger before the first submit
    pub mode: TriggerMode,
    /// Validation trigger after the first submit
    pub revalidate_mode: RevalidateMode,
    /// Leave browser-native validation enabled
    pub native_validation: bool,
}

impl Default for FormRendererProps {
    fn default() -> Self {
        Self::from_settings(&FormsConfig::default())
    }
}

impl FormRendererProps {
    /// Props with the default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Props from loaded configuration
    #[must_use]
    pub fn from_settings(config: &FormsConfig) -> Self {
        let renderer = &config.renderer;
        Self {
            title: renderer.title.clone(),
            title_class: renderer.title_class.clone(),
            form_class: renderer.form_class.clone(),
            grid_class: renderer.grid_class.clone(),
            submit_label: renderer.submit_label.clone(),
            submit_class: renderer.submit_class.clone(),
            default_values: FormValues::new(),
            accept_conditions: config.terms.enabled,
            terms: config.terms.clone(),
            mode: renderer.mode,
            revalidate_mode: renderer.revalidate_mode,
            native_validation: config.features.native_validation,
        }
    }

    /// Set the heading
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the heading class
    #[must_use]
    pub fn title_class(mut self, class: impl Into<String>) -> Self {
        self.title_class = class.into();
        self
    }

    /// Set the form element class
    #[must_use]
    pub fn form_class(mut self, class: impl Into<String>) -> Self {
        self.form_class = class.into();
        self
    }

    /// Set the grid container class
    #[must_use]
    pub fn grid_class(mut self, class: impl Into<String>) -> Self {
        self.grid_class = class.into();
        self
    }

    /// Set the submit button text
    #[must_use]
    pub fn submit_label(mut self, label: impl Into<String>) -> Self {
        self.submit_label = label.into();
        self
    }

    /// Set the submit button class
    #[must_use]
    pub fn submit_class(mut self, class: impl Into<String>) -> Self {
        self.submit_class = class.into();
        self
    }

    /// Replace the caller-supplied initial values
    #[must_use]
    pub fn default_values(mut self, values: FormValues) -> Self {
        self.default_values = values;
        self
    }

    /// Add one caller-supplied initial value
    #[must_use]
    pub fn default_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.default_values.insert(name.into(), value.into());
        self
    }

    /// Toggle the terms-acceptance checkbox
    #[must_use]
    pub const fn accept_conditions(mut self, enabled: bool) -> Self {
        self.accept_conditions = enabled;
        self
    }

    /// Replace the terms checkbox copy
    #[must_use]
    pub fn terms(mut self, terms: TermsSettings) -> Self {
        self.terms = terms;
        self
    }

    /// Set the validation trigger mode
    #[must_use]
    pub const fn mode(mut self, mode: TriggerMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the re-validation mode
    #[must_use]
    pub const fn revalidate_mode(mut self, mode: RevalidateMode) -> Self {
        self.revalidate_mode = mode;
        self
    }
}

/// Result of a submit attempt
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Every field passed; the handler received this payload
    Submitted(Submission),
    /// At least one field failed; the handler was not called
    Rejected(ValidationErrors),
}

impl SubmitOutcome {
    /// Whether the handler was called
    #[must_use]
    pub const fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }
}

/// A mounted form
pub struct FormRenderer {
    props: FormRendererProps,
    grid: Vec<ResolvedField>,
    textareas: Vec<ResolvedField>,
    terms: Option<Control>,
    store: FormStore,
    diagnostics: Vec<Diagnostic>,
    on_submit: SubmitHandler,
}

impl fmt::Debug for FormRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormRenderer")
            .field("props", &self.props)
            .field("grid", &self.grid)
            .field("textareas", &self.textareas)
            .field("terms", &self.terms)
            .field("store", &self.store)
            .field("diagnostics", &self.diagnostics)
            .finish_non_exhaustive()
    }
}

fn terms_control(terms: &TermsSettings, index: usize) -> Control {
    Control::CheckBox(CheckBox {
        props: CommonProps {
            key: field_key(&terms.field_name, index),
            name: terms.field_name.clone(),
            rules: terms.rules(),
            ..CommonProps::default()
        },
        label: terms.label(),
    })
}

fn register(store: &mut FormStore, control: &Control) {
    match control.fixed_value() {
        Some(fixed) => store.register_fixed(control.name(), control.rules().clone(), fixed.clone()),
        None => store.register(control.name(), control.rules().clone()),
    }
}

impl FormRenderer {
    /// Mount `schema` with `props`, calling `on_submit` on every valid submit
    pub fn mount<F>(schema: &Schema, props: FormRendererProps, on_submit: F) -> Self
    where
        F: FnMut(&Submission) + Send + 'static,
    {
        let (fields, mut diagnostics) = resolve_schema(schema);
        let mut store = FormStore::new(
            initial_values(schema, &props.default_values),
            props.mode,
            props.revalidate_mode,
        );

        for field in &fields {
            register(&mut store, &field.control);
        }

        let terms = props.accept_conditions.then(|| {
            let control = terms_control(&props.terms, schema.len());
            if store.is_registered(control.name()) {
                tracing::warn!(field = %control.name(), "terms checkbox shadows a schema field");
                diagnostics.push(Diagnostic::DuplicateName {
                    name: control.name().to_string(),
                });
            }
            register(&mut store, &control);
            control
        });

        let (textareas, grid): (Vec<_>, Vec<_>) = fields
            .into_iter()
            .partition(|field| field.control.is_textarea());

        tracing::debug!(
            fields = schema.len(),
            diagnostics = diagnostics.len(),
            terms = props.accept_conditions,
            "form mounted"
        );

        Self {
            props,
            grid,
            textareas,
            terms,
            store,
            diagnostics,
            on_submit: Box::new(on_submit),
        }
    }

    /// Props the form was mounted with
    #[must_use]
    pub const fn props(&self) -> &FormRendererProps {
        &self.props
    }

    /// Controls rendered inside the grid, in schema order
    #[must_use]
    pub fn grid_fields(&self) -> &[ResolvedField] {
        &self.grid
    }

    /// Textarea controls rendered below the grid, in schema order
    #[must_use]
    pub fn textarea_fields(&self) -> &[ResolvedField] {
        &self.textareas
    }

    /// Problems found while mounting
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The form's state container
    #[must_use]
    pub const fn store(&self) -> &FormStore {
        &self.store
    }

    /// Mutable access to the state container
    pub fn store_mut(&mut self) -> &mut FormStore {
        &mut self.store
    }

    /// Current values
    #[must_use]
    pub const fn values(&self) -> &FormValues {
        self.store.values()
    }

    /// Deliver user input to a field
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnboundField`] when no control is bound to `name`.
    pub fn change(&mut self, name: &str, value: impl Into<Value>) -> Result<(), FormError> {
        self.store.change(name, value)
    }

    /// Deliver a focus loss to a field
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnboundField`] when no control is bound to `name`.
    pub fn blur(&mut self, name: &str) -> Result<(), FormError> {
        self.store.blur(name)
    }

    /// Attempt a submit
    ///
    /// Validates every field; the submit handler runs only when all pass.
    pub fn submit(&mut self) -> SubmitOutcome {
        match self.store.handle_submit() {
            Ok(submission) => {
                tracing::debug!(fields = submission.values().len(), "form submitted");
                (self.on_submit)(&submission);
                SubmitOutcome::Submitted(submission)
            }
            Err(errors) => {
                tracing::debug!(
                    invalid = ?errors.fields_with_errors(),
                    "form submission rejected"
                );
                SubmitOutcome::Rejected(errors)
            }
        }
    }

    /// Return every field to its initial value and clear validation state
    pub fn reset(&mut self) {
        self.store.reset();
    }

    /// Tear the form down, returning its last values
    #[must_use]
    pub fn unmount(self) -> FormValues {
        tracing::debug!("form unmounted");
        self.store.values().clone()
    }

    /// Render the form as HTML
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnboundField`] when a control is not bound to
    /// the form's store.
    pub fn render(&self) -> Result<String, FormError> {
        let mut html = String::with_capacity(4096);

        html.push_str("<form");
        write_attr(&mut html, "class", &self.props.form_class);
        write_flag(&mut html, "novalidate", !self.props.native_validation);
        html.push_str(">\n");

        if let Some(title) = self.props.title.as_deref().filter(|t| !t.is_empty()) {
            html.push_str("<h2");
            write_attr(&mut html, "class", &self.props.title_class);
            html.push('>');
            html.push_str(&escape_html(title));
            html.push_str("</h2>\n");
        }

        html.push_str("<div");
        write_attr(&mut html, "class", &self.props.grid_class);
        html.push_str(">\n");
        for field in &self.grid {
            field.control.render(&self.store, &mut html)?;
        }
        html.push_str("</div>\n");

        for field in &self.textareas {
            html.push_str("<div class=\"mt-6\">\n");
            field.control.render(&self.store, &mut html)?;
            html.push_str("</div>\n");
        }

        html.push_str("<div class=\"flex flex-col justify-start mt-12\">\n");
        if let Some(terms) = &self.terms {
            terms.render(&self.store, &mut html)?;
        }
        html.push_str("<button");
        write_attr(&mut html, "type", "submit");
        write_attr(&mut html, "class", &self.props.submit_class);
        html.push('>');
        html.push_str(&escape_html(&self.props.submit_label));
        html.push_str("</button>\n</div>\n</form>\n");

        Ok(html)
    }
}
