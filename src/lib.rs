// freeform-relay library - headless Craft Freeform form client
// This exposes the core components for testing and integration

pub mod app;
pub mod backend;
pub mod challenge;
pub mod cli;
pub mod config;
pub mod form;
pub mod telemetry;

// Re-export key types for easy access
pub use backend::{
    ConfigFetchError, ConfigLoader, GraphQlClient, GraphQlGateway, HttpConfigLoader, SubmissionError,
    SubmissionGateway, TransportFailure,
};
pub use challenge::{ChallengeProvider, CommandChallengeProvider, StaticChallengeProvider};
pub use config::RelayConfig;
pub use form::{
    FieldValues, FormConfig, FormError, FormSchema, FormSession, FormVariant, FormView, Phase,
    SubmissionOutcome,
};
pub use telemetry::{create_submission_span, generate_correlation_id, init_telemetry};
