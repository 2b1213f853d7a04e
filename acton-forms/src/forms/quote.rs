//! Quote-request form
//!
//! Fixed presentation of the renderer used by the quote-request page: title
//! "SOLICITA PRESUPUESTO", submit label "Enviar" and validation on blur.
//! The default submit handler only logs the payload.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::renderer::{FormRenderer, FormRendererProps};
use crate::config::FormsConfig;
use super::rules::{PatternRule, Rules};
use super::schema::{FieldConfig, RadioOption, Schema, SelectOption};
use super::state::{Submission, TriggerMode};

/// Heading of the quote form
pub const TITLE: &str = "SOLICITA PRESUPUESTO";

/// Submit button text of the quote form
pub const SUBMIT_LABEL: &str = "Enviar";

static PHONE_RULE: Lazy<PatternRule> = Lazy::new(|| {
    PatternRule::new(r"^\+?[0-9 ]{9,15}$", "Introduce un teléfono válido").expect("Invalid regex")
});

/// Typed payload of a quote request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteRequest {
    /// First name
    #[validate(length(min = 1, message = "Este campo es obligatorio"))]
    pub name: String,
    /// Last name
    pub surname: String,
    /// Contact email
    #[validate(email(message = "Ingresa un email válido"))]
    pub email: String,
    /// Contact phone
    pub phone: String,
    /// Country code
    pub country: String,
    /// Province
    pub province: String,
    /// Installation type
    pub type_installation: String,
    /// Number of floors served
    pub floor_number: String,
    /// Product model
    pub model: String,
    /// Free-form message
    pub message: String,
    /// Terms accepted
    #[serde(alias = "acceptConditions")]
    pub terms: bool,
}

/// The standard quote-request schema
#[must_use]
pub fn default_schema() -> Schema {
    Schema::new(vec![
        FieldConfig::text("name", "Nombre").with_rules(Rules::new().required("Introduce tu nombre")),
        FieldConfig::text("surname", "Apellidos"),
        FieldConfig::email("email", "Email").with_rules(Rules::new().required("Introduce tu email")),
        FieldConfig::text("phone", "Teléfono").with_rules(Rules::new().pattern(PHONE_RULE.clone())),
        FieldConfig::select(
            "country",
            vec![
                SelectOption::new("es", "España"),
                SelectOption::new("pt", "Portugal"),
                SelectOption::new("fr", "Francia"),
                SelectOption::new("ad", "Andorra"),
            ],
        )
        .with_placeholder("País"),
        FieldConfig::text("province", "Provincia"),
        FieldConfig::radio(
            "typeInstallation",
            "Tipo de instalación",
            vec![
                RadioOption::new("new", "Obra nueva"),
                RadioOption::new("existing", "Edificio existente"),
            ],
        )
        .with_grid_column("1 / -1"),
        FieldConfig::select(
            "floorNumber",
            (1..=5)
                .map(|n| SelectOption::new(n.to_string(), n.to_string()))
                .chain(std::iter::once(SelectOption::new("6+", "6 o más")))
                .collect(),
        )
        .with_placeholder("Número de plantas"),
        FieldConfig::select(
            "model",
            vec![
                SelectOption::new("hydraulic", "Hidráulico"),
                SelectOption::new("electric", "Eléctrico"),
                SelectOption::new("platform", "Plataforma elevadora"),
            ],
        )
        .with_placeholder("Modelo"),
        FieldConfig::textarea("message", "Cuéntanos tu proyecto")
            .with_rows(5)
            .with_label("Mensaje")
            .with_rules(Rules::new().max_length(1000, "No puede superar 1000 caracteres")),
    ])
}

fn log_submission(submission: &Submission) {
    tracing::info!(payload = %submission.to_json(), "quote form data");
}

/// Quote-request form over a caller-chosen schema
#[derive(Debug, Clone)]
pub struct QuoteForm {
    schema: Schema,
    accept_conditions: bool,
}

impl Default for QuoteForm {
    fn default() -> Self {
        Self::new(default_schema(), true)
    }
}

impl QuoteForm {
    /// Create a quote form
    #[must_use]
    pub const fn new(schema: Schema, accept_conditions: bool) -> Self {
        Self {
            schema,
            accept_conditions,
        }
    }

    /// The schema being rendered
    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Renderer props with the quote form's fixed presentation
    #[must_use]
    pub fn props(&self) -> FormRendererProps {
        self.props_from(&FormsConfig::default())
    }

    /// Renderer props from loaded configuration
    ///
    /// Classes, terms copy and feature toggles come from `config`. The
    /// title, submit label, trigger mode and terms toggle stay fixed.
    #[must_use]
    pub fn props_from(&self, config: &FormsConfig) -> FormRendererProps {
        FormRendererProps::from_settings(config)
            .title(TITLE)
            .submit_label(SUBMIT_LABEL)
            .mode(TriggerMode::OnBlur)
            .accept_conditions(self.accept_conditions)
    }

    /// Mount with the log-only submit handler
    #[must_use]
    pub fn mount(&self) -> FormRenderer {
        self.mount_with(log_submission)
    }

    /// Mount with a custom submit handler
    pub fn mount_with<F>(&self, on_submit: F) -> FormRenderer
    where
        F: FnMut(&Submission) + Send + 'static,
    {
        FormRenderer::mount(&self.schema, self.props(), on_submit)
    }

    /// Mount with loaded configuration and a custom submit handler
    pub fn mount_with_settings<F>(&self, config: &FormsConfig, on_submit: F) -> FormRenderer
    where
        F: FnMut(&Submission) + Send + 'static,
    {
        FormRenderer::mount(&self.schema, self.props_from(config), on_submit)
    }
}
