//! Observability (structured logging)
//!
//! Forms log through `tracing`: warnings for skipped field kinds and
//! duplicate names, debug events for mounts and submissions, and the quote
//! form's default submit handler at info level.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter for debug builds
pub const DEV_FILTER: &str = "debug,acton_forms=trace";

/// Default filter for release builds
pub const PROD_FILTER: &str = "info";

/// Initialize logging
///
/// Sets up:
/// - Pretty formatting in debug builds, JSON in release builds
/// - Filtering from `RUST_LOG`, falling back to [`DEV_FILTER`] or [`PROD_FILTER`]
///
/// # Errors
///
/// Returns an error when a global subscriber is already installed.
///
/// # Example
///
/// ```rust,no_run
/// use acton_forms::observability;
///
/// # fn main() -> anyhow::Result<()> {
/// observability::init()?;
/// tracing::info!("Application started");
/// # Ok(())
/// # }
/// ```
pub fn init() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            EnvFilter::new(DEV_FILTER)
        } else {
            EnvFilter::new(PROD_FILTER)
        }
    });

    #[cfg(debug_assertions)]
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init()?;
    }

    #[cfg(not(debug_assertions))]
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    }

    Ok(())
}
