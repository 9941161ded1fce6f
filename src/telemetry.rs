use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use crate::config::ObservabilityConfig;

/// Initialize structured logging.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_telemetry(observability: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&observability.log_level))?;

    // Logs go to stderr so command output on stdout stays machine readable
    let registry = tracing_subscriber::registry().with(filter);
    if observability.json_logs {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()?;
    }

    tracing::debug!("freeform-relay telemetry initialized");
    Ok(())
}

/// Generate a correlation ID for one submit attempt
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span covering a single submit attempt
pub fn create_submission_span(form_id: u32, attempt_id: &str) -> tracing::Span {
    tracing::info_span!(
        "submission",
        form.id = form_id,
        attempt.id = attempt_id,
    )
}
