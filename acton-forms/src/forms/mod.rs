//! Schema-driven forms
//!
//! This module turns a declarative list of field configurations into a
//! rendered, validated form:
//! - [`Schema`] / [`FieldConfig`]: what fields exist, their rules and layout hints
//! - [`FormStore`]: values, validation results and the trigger-mode bookkeeping
//! - [`Control`]: one rendered control per field, reading from the store
//! - [`FormRenderer`]: mounts a schema, lays it out and wires submission
//!
//! # Quick Start
//!
//! ```rust
//! use acton_forms::forms::{FieldConfig, FormRenderer, FormRendererProps, Rules, Schema};
//!
//! let schema = Schema::new(vec![
//!     FieldConfig::text("name", "Nombre").with_rules(Rules::new().required("Introduce tu nombre")),
//!     FieldConfig::email("email", "Email"),
//!     FieldConfig::textarea("message", "Mensaje").with_rows(6),
//! ]);
//!
//! let mut form = FormRenderer::mount(
//!     &schema,
//!     FormRendererProps::new().title("Contacto").accept_conditions(true),
//!     |payload| println!("{}", payload.to_json()),
//! );
//!
//! form.change("email", "not-an-email")?;
//! form.blur("email")?;
//!
//! let html = form.render()?;
//! assert!(html.contains("Ingresa un email válido"));
//! # Ok::<(), acton_forms::FormError>(())
//! ```
//!
//! # Schemas from JSON
//!
//! Schemas use the same wire shape as the pages embedding them. Unknown
//! field kinds are skipped with a warning instead of failing the form:
//!
//! ```rust
//! use acton_forms::forms::{FormRenderer, FormRendererProps, Schema};
//!
//! let schema = Schema::from_json(r#"[
//!     { "type": "text", "name": "name", "placeholder": "Nombre", "rules": { "required": true } },
//!     { "type": "date", "name": "when" }
//! ]"#)?;
//!
//! let form = FormRenderer::mount(&schema, FormRendererProps::new(), |_| {});
//! assert_eq!(form.diagnostics().len(), 1);
//! # Ok::<(), acton_forms::FormError>(())
//! ```

mod controls;
mod error;
mod html;
mod quote;
mod renderer;
mod resolver;
mod rules;
mod schema;
mod state;

pub use controls::{
    CheckBox, CommonProps, Control, HiddenInput, Placement, RadioGroup, SelectInput, TextArea,
    TextInput, TextKind,
};
pub use error::{FieldError, ValidationErrors};
pub use quote::{default_schema, QuoteForm, QuoteRequest, SUBMIT_LABEL, TITLE};
pub use renderer::{FormRenderer, FormRendererProps, SubmitHandler, SubmitOutcome};
pub use resolver::{field_key, resolve, resolve_schema, Diagnostic, Resolved, ResolvedField};
pub use rules::{
    is_empty_value, CustomRule, LengthRule, PatternRule, RequiredRule, Rules, EMAIL_MESSAGE,
    EMAIL_PATTERN,
};
pub use schema::{
    CheckBoxConfig, FieldBase, FieldConfig, HiddenConfig, InputTextConfig, Label, LabelSegment,
    RadioConfig, RadioOption, Schema, SelectConfig, SelectOption, TextAreaConfig,
    UnrecognizedField,
};
pub use state::{
    initial_values, value_text, FieldSnapshot, FormStore, FormValues, RevalidateMode, Submission,
    TriggerMode,
};
