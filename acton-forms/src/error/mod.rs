//! Error types and error handling

use thiserror::Error;

use crate::forms::ValidationErrors;

/// Framework error type
#[derive(Debug, Error)]
pub enum FormError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A field was used outside of the form it belongs to
    ///
    /// Raised when a control or event names a field that no mounted form
    /// registered. This is a usage error, never a user input error.
    #[error("Field `{0}` is not bound to an active form")]
    UnboundField(String),

    /// Field schema could not be parsed
    #[error("Invalid field schema: {0}")]
    Schema(#[from] serde_json::Error),

    /// Submission payload does not have the expected shape
    #[error("Invalid submission payload: {0}")]
    Payload(String),

    /// Submission payload failed validation
    #[error("Validation failed for {} field(s)", .0.count())]
    Validation(ValidationErrors),
}

impl From<validator::ValidationErrors> for FormError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.into())
    }
}
