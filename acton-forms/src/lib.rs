//! acton-forms: Schema-driven forms for Acton applications
//!
//! Describe a form as an ordered list of field configurations and get back
//! rendered controls bound to one state container, per-field validation
//! with configurable timing, and a validated payload on submit.
//!
//! # Design Principles
//!
//! 1. **Declarative**: forms are data, usually parsed from the page's JSON
//! 2. **Single source of truth**: every control reads and writes one [`forms::FormStore`]
//! 3. **Forgiving schemas**: unknown field kinds are skipped with a warning, never fatal
//! 4. **Typed payloads**: submissions deserialize into `validator`-checked structs
//!
//! # Quick Start
//!
//! ```rust
//! use acton_forms::prelude::*;
//!
//! let mut form = QuoteForm::default().mount();
//!
//! form.change("name", "Ana")?;
//! form.change("email", "ana@example.com")?;
//! form.change("acceptConditions", true)?;
//!
//! match form.submit() {
//!     SubmitOutcome::Submitted(payload) => {
//!         let request: QuoteRequest = payload.validated()?;
//!         assert_eq!(request.name, "Ana");
//!     }
//!     SubmitOutcome::Rejected(errors) => panic!("{} invalid field(s)", errors.count()),
//! }
//! # Ok::<(), acton_forms::FormError>(())
//! ```

pub mod config;
pub mod error;
pub mod forms;
pub mod observability;

pub use error::FormError;

pub mod prelude {
    //! Convenience re-exports for common types and traits
    //!
    //! ```rust
    //! use acton_forms::prelude::*;
    //! ```

    pub use crate::config::FormsConfig;
    pub use crate::error::FormError;
    pub use crate::forms::{
        FieldConfig, FieldError, FormRenderer, FormRendererProps, FormStore, QuoteForm,
        QuoteRequest, RadioOption, RevalidateMode, Rules, Schema, SelectOption, Submission,
        SubmitOutcome, TriggerMode, ValidationErrors,
    };
}
