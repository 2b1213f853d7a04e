//! Configuration management for acton-forms
//!
//! Renderer presentation, the terms-acceptance checkbox copy and feature
//! toggles are loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `ACTON_FORMS_` prefix, `__` for nesting)
//! 2. `./acton-forms.toml` (development)
//! 3. `~/.config/acton-forms/{app_name}/config.toml` (user config, XDG)
//! 4. `/etc/acton-forms/{app_name}/config.toml` (system config)
//! 5. Hardcoded defaults (fallback)
//!
//! Example: `ACTON_FORMS_RENDERER__MODE=onChange`
//!
//! # Example Configuration
//!
//! ```toml
//! [renderer]
//! title = "SOLICITA PRESUPUESTO"
//! submit_label = "Enviar"
//! mode = "onBlur"
//! revalidate_mode = "onChange"
//!
//! [terms]
//! enabled = true
//! required_message = "Debe aceptar los términos y condiciones"
//!
//! [terms.privacy_policy]
//! href = "/privacy_policy"
//! text = "Política de privacidad"
//!
//! [features]
//! native_validation = false
//! ```
//!
//! # Usage
//!
//! ```rust
//! use acton_forms::config::FormsConfig;
//! use acton_forms::forms::FormRendererProps;
//!
//! let config = FormsConfig::default();
//! let props = FormRendererProps::from_settings(&config);
//! assert_eq!(props.submit_label, "Enviar");
//! ```

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::forms::{Label, LabelSegment, RevalidateMode, Rules, TriggerMode};

const ENV_PREFIX: &str = "ACTON_FORMS_";

/// Form presentation and validation timing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
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

    /// Validation trigger before the first submit
    pub mode: TriggerMode,

    /// Validation trigger after the first submit
    pub revalidate_mode: RevalidateMode,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            title: None,
            title_class: "form-title".to_string(),
            form_class: "form-container".to_string(),
            grid_class: "form-grid".to_string(),
            submit_label: "Enviar".to_string(),
            submit_class: "btn-submit-secondary".to_string(),
            mode: TriggerMode::OnBlur,
            revalidate_mode: RevalidateMode::OnChange,
        }
    }
}

/// Link shown in the terms checkbox label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSettings {
    /// Link target
    pub href: String,

    /// Link text
    pub text: String,
}

impl LinkSettings {
    fn new(href: &str, text: &str) -> Self {
        Self {
            href: href.to_string(),
            text: text.to_string(),
        }
    }
}

/// Terms-acceptance checkbox
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TermsSettings {
    /// Render the checkbox by default
    pub enabled: bool,

    /// Field name of the checkbox in the payload
    pub field_name: String,

    /// Error shown while the box is unchecked
    pub required_message: String,

    /// Text before the links
    pub lead: String,

    /// Text between the links
    pub conjunction: String,

    /// Legal notice link
    pub legal_notice: LinkSettings,

    /// Privacy policy link
    pub privacy_policy: LinkSettings,
}

impl Default for TermsSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            field_name: "acceptConditions".to_string(),
            required_message: "Debe aceptar los términos y condiciones".to_string(),
            lead: "He leído y acepto".to_string(),
            conjunction: "y".to_string(),
            legal_notice: LinkSettings::new("/legal_notice", "Aviso legal"),
            privacy_policy: LinkSettings::new("/privacy_policy", "Política de privacidad"),
        }
    }
}

impl TermsSettings {
    /// Label content of the checkbox
    #[must_use]
    pub fn label(&self) -> Label {
        Label::Rich(vec![
            LabelSegment::Text(format!("{} ", self.lead)),
            LabelSegment::Link {
                href: self.legal_notice.href.clone(),
                text: self.legal_notice.text.clone(),
            },
            LabelSegment::Text(format!(" {} ", self.conjunction)),
            LabelSegment::Link {
                href: self.privacy_policy.href.clone(),
                text: self.privacy_policy.text.clone(),
            },
        ])
    }

    /// Validation rules of the checkbox
    #[must_use]
    pub fn rules(&self) -> Rules {
        Rules::new().required(self.required_message.clone())
    }
}

/// Optional behavior
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureSettings {
    /// Leave browser-native validation on (omit `novalidate`)
    pub native_validation: bool,
}

/// Complete acton-forms configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormsConfig {
    /// Presentation and validation timing
    pub renderer: RendererSettings,

    /// Terms-acceptance checkbox
    pub terms: TermsSettings,

    /// Optional behavior
    pub features: FeatureSettings,
}

impl FormsConfig {
    /// Load configuration for an application
    ///
    /// Searches the locations listed in the module documentation, from
    /// lowest to highest priority.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Default configuration cannot be serialized to TOML
    /// - A configuration file cannot be read or parsed
    /// - Configuration values fail type conversion
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use acton_forms::config::FormsConfig;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = FormsConfig::load_for_service("quotes")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn load_for_service(app_name: &str) -> anyhow::Result<Self> {
        let mut figment =
            Figment::new().merge(Toml::string(&toml::to_string(&Self::default())?));

        let system_config = PathBuf::from("/etc/acton-forms")
            .join(app_name)
            .join("config.toml");
        if system_config.exists() {
            figment = figment.merge(Toml::file(&system_config));
        }

        let user_config = Self::recommended_path(app_name);
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }

        let local_config = PathBuf::from("./acton-forms.toml");
        if local_config.exists() {
            figment = figment.merge(Toml::file(&local_config));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true));

        let config = figment.extract()?;
        tracing::debug!(app = %app_name, "configuration loaded");
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// A missing file leaves the defaults in place.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Default configuration cannot be serialized to TOML
    /// - The file contains invalid TOML syntax
    /// - Configuration values fail type conversion
    pub fn load_from(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config = Figment::new()
            .merge(Toml::string(&toml::to_string(&Self::default())?))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true))
            .extract()?;

        Ok(config)
    }

    /// Get the recommended XDG config path for an application
    ///
    /// ```rust
    /// use acton_forms::config::FormsConfig;
    ///
    /// let path = FormsConfig::recommended_path("quotes");
    /// // Returns: ~/.config/acton-forms/quotes/config.toml
    /// assert!(path.ends_with("config.toml"));
    /// ```
    #[must_use]
    pub fn recommended_path(app_name: &str) -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from("./acton-forms.toml"),
            |config_dir| {
                config_dir
                    .join("acton-forms")
                    .join(app_name)
                    .join("config.toml")
            },
        )
    }
}
