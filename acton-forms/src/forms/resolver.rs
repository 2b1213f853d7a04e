//! Schema-to-control resolution
//!
//! [`resolve`] maps one [`FieldConfig`] and its position in the schema to a
//! concrete [`Control`]. Unsupported kinds never fail: they resolve to
//! [`Resolved::Skipped`] and a warning is logged.

use std::fmt;

use super::controls::{
    CheckBox, CommonProps, Control, HiddenInput, Placement, RadioGroup, SelectInput, TextArea,
    TextInput, TextKind,
};
use super::schema::{FieldBase, FieldConfig, Schema};

/// Problem found while resolving a schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A configuration's kind has no matching control
    UnrecognizedKind {
        /// The unsupported kind tag
        kind: String,
        /// Field name
        name: String,
        /// Position in the schema
        index: usize,
    },
    /// More than one field uses the same name
    DuplicateName {
        /// The repeated name
        name: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognizedKind { kind, name, index } => {
                write!(f, "unrecognized field kind `{kind}` for `{name}` at position {index}")
            }
            Self::DuplicateName { name } => write!(f, "field name `{name}` is used more than once"),
        }
    }
}

/// A configuration resolved to its control
#[derive(Debug, Clone)]
pub struct ResolvedField {
    /// Position in the schema
    pub index: usize,
    /// The control
    pub control: Control,
}

impl ResolvedField {
    /// Unique instance key
    #[must_use]
    pub fn key(&self) -> &str {
        self.control.key()
    }

    /// Bound field name
    #[must_use]
    pub fn name(&self) -> &str {
        self.control.name()
    }

    /// Grid placement
    #[must_use]
    pub const fn placement(&self) -> &Placement {
        &self.control.props().placement
    }
}

/// Result of resolving one configuration
#[derive(Debug, Clone)]
pub enum Resolved {
    /// A renderable control
    Control(ResolvedField),
    /// Nothing to render
    Skipped(Diagnostic),
}

/// Instance key for the field at `index`
#[must_use]
pub fn field_key(name: &str, index: usize) -> String {
    format!("{name}-{index}")
}

fn placement(field: &FieldConfig, base: &FieldBase) -> Placement {
    if field.is_textarea() {
        Placement::FullRow
    } else {
        base.grid_column
            .clone()
            .map_or(Placement::Flow, Placement::Column)
    }
}

fn common_props(field: &FieldConfig, base: &FieldBase, index: usize) -> CommonProps {
    CommonProps {
        key: field_key(&base.name, index),
        name: base.name.clone(),
        rules: base.rules.clone(),
        class_name: base.class_name.clone(),
        placement: placement(field, base),
    }
}

/// Resolve one configuration at position `index`
#[must_use]
pub fn resolve(field: &FieldConfig, index: usize) -> Resolved {
    let props = |base: &FieldBase| common_props(field, base, index);

    let control = match field {
        FieldConfig::Text(c) => {
            Control::Text(TextInput::new(props(&c.base), TextKind::Text, &c.placeholder))
        }
        FieldConfig::Email(c) => {
            Control::Text(TextInput::new(props(&c.base), TextKind::Email, &c.placeholder))
        }
        FieldConfig::Select(c) => Control::Select(SelectInput {
            props: props(&c.base),
            placeholder: c.placeholder.clone(),
            options: c.options.clone(),
        }),
        FieldConfig::Textarea(c) => Control::TextArea(TextArea {
            props: props(&c.base),
            placeholder: c.placeholder.clone(),
            rows: c.rows,
            label: c.label.clone(),
        }),
        FieldConfig::Radio(c) => Control::Radio(RadioGroup {
            props: props(&c.base),
            label: c.label.clone(),
            options: c.options.clone(),
        }),
        FieldConfig::Checkbox(c) => Control::CheckBox(CheckBox {
            props: props(&c.base),
            label: c.label.clone(),
        }),
        FieldConfig::Hidden(c) => Control::Hidden(HiddenInput {
            props: props(&c.base),
            value: c.value.clone(),
        }),
        FieldConfig::Unrecognized(unknown) => {
            tracing::warn!(
                kind = %unknown.kind,
                field = %unknown.name,
                index,
                "unrecognized field kind `{}`, skipping",
                unknown.kind
            );
            return Resolved::Skipped(Diagnostic::UnrecognizedKind {
                kind: unknown.kind.clone(),
                name: unknown.name.clone(),
                index,
            });
        }
    };

    Resolved::Control(ResolvedField { index, control })
}

/// Resolve a whole schema
///
/// Returns the controls in schema order together with every diagnostic:
/// one per unrecognized kind and one per repeated name.
#[must_use]
pub fn resolve_schema(schema: &Schema) -> (Vec<ResolvedField>, Vec<Diagnostic>) {
    let mut fields = Vec::with_capacity(schema.len());
    let mut diagnostics = Vec::new();

    for (index, field) in schema.iter().enumerate() {
        match resolve(field, index) {
            Resolved::Control(resolved) => fields.push(resolved),
            Resolved::Skipped(diagnostic) => diagnostics.push(diagnostic),
        }
    }

    for name in schema.duplicate_names() {
        tracing::warn!(field = %name, "duplicate field name in schema");
        diagnostics.push(Diagnostic::DuplicateName {
            name: name.to_string(),
        });
    }

    (fields, diagnostics)
}
