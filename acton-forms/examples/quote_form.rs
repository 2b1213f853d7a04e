//! Quote Form Example
//!
//! Mounts the standard quote-request form, replays a user session against it
//! and prints the rendered HTML at each step.
//!
//! Run with: `cargo run --example quote_form`

use acton_forms::config::FormsConfig;
use acton_forms::observability;
use acton_forms::prelude::*;

// =============================================================================
// Session
// =============================================================================

fn main() -> anyhow::Result<()> {
    observability::init()?;

    let config = FormsConfig::load_for_service("quote-form")?;
    tracing::info!(terms = config.terms.enabled, "configuration loaded");

    let mut form = QuoteForm::default().mount_with_settings(&config, |payload| {
        match payload.validated::<QuoteRequest>() {
            Ok(request) => tracing::info!(?request, "quote request accepted"),
            Err(e) => tracing::warn!(error = %e, "quote request rejected by payload rules"),
        }
    });

    println!("{}", form.render()?);

    // A mistyped email shows its error once the field loses focus
    form.change("name", "Ana")?;
    form.change("email", "ana@example")?;
    form.blur("email")?;
    println!("{}", form.render()?);

    // Submitting without accepting the terms is rejected
    if let SubmitOutcome::Rejected(errors) = form.submit() {
        for (field, error) in errors.iter() {
            println!("{field}: {error}");
        }
    }

    form.change("email", "ana@example.com")?;
    form.change("typeInstallation", "new")?;
    form.change("floorNumber", "3")?;
    form.change("message", "Edificio de tres plantas sin ascensor.")?;
    form.change("acceptConditions", true)?;

    match form.submit() {
        SubmitOutcome::Submitted(payload) => println!("{}", serde_json::to_string_pretty(&payload)?),
        SubmitOutcome::Rejected(errors) => println!("still {} invalid field(s)", errors.count()),
    }

    Ok(())
}
