// Composition root: builds the collaborators a form session needs

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::backend::{build_http_client, GraphQlClient, GraphQlGateway, HttpConfigLoader};
use crate::challenge::command::ProcessCommandExecutor;
use crate::challenge::{ChallengeProvider, CommandChallengeProvider, StaticChallengeProvider};
use crate::config::{CaptchaConfig, RelayConfig};
use crate::form::{FormSchema, FormServices, FormSession, SessionSettings};

/// Pick the challenge capability the configuration describes.
pub fn challenge_provider(captcha: &CaptchaConfig) -> Arc<dyn ChallengeProvider> {
    if !captcha.token.is_empty() {
        info!("Using pre-issued challenge token");
        Arc::new(StaticChallengeProvider::new(captcha.token.clone()))
    } else if !captcha.token_command.trim().is_empty() {
        info!(command = %captcha.token_command, "Using token command for challenges");
        let executor = Arc::new(ProcessCommandExecutor::new(captcha.token_command_timeout()));
        Arc::new(CommandChallengeProvider::new(
            executor,
            &captcha.token_command,
            captcha.site_key.clone(),
        ))
    } else {
        Arc::new(StaticChallengeProvider::unavailable())
    }
}

/// Wire HTTP-backed services for `schema` from `config`.
pub fn build_services(config: &RelayConfig, schema: &FormSchema) -> Result<FormServices> {
    let http = build_http_client(config.backend.request_timeout())?;
    let client = GraphQlClient::new(http.clone(), config.backend.endpoint_url.clone());

    Ok(FormServices {
        loader: Arc::new(HttpConfigLoader::new(http, config.backend.properties_base_url.clone())),
        challenge: challenge_provider(&config.captcha),
        gateway: Arc::new(GraphQlGateway::new(client, schema.clone())),
    })
}

/// A ready-to-mount session for the configured form.
pub fn build_session(config: &RelayConfig, schema: FormSchema) -> Result<FormSession> {
    let services = build_services(config, &schema)?;
    let settings = SessionSettings {
        form_id: config.form.form_id,
        submission_timeout: config.form.submission_timeout(),
        challenge_required: config.captcha.required,
    };
    Ok(FormSession::new(schema, services, settings))
}
