// CAPTCHA challenge token acquisition
//
// Providers never fail loudly: an unavailable capability yields `None` and
// the form lifecycle decides whether that blocks a submission.

pub mod command;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::form::types::ChallengeToken;
use command::CommandExecutor;

/// Environment variable carrying the site key to token commands.
pub const SITE_KEY_ENV: &str = "FREEFORM_RELAY_SITE_KEY";

#[async_trait]
pub trait ChallengeProvider: Send + Sync {
    async fn acquire_token(&self) -> Option<ChallengeToken>;
}

/// A pre-issued token, or none at all.
#[derive(Debug, Clone, Default)]
pub struct StaticChallengeProvider {
    token: Option<ChallengeToken>,
}

impl StaticChallengeProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(ChallengeToken::new(token)),
        }
    }

    pub fn unavailable() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChallengeProvider for StaticChallengeProvider {
    async fn acquire_token(&self) -> Option<ChallengeToken> {
        if self.token.is_none() {
            debug!("No challenge capability configured");
        }
        self.token.clone()
    }
}

/// Obtains a fresh token from an external command on every call.
pub struct CommandChallengeProvider {
    executor: Arc<dyn CommandExecutor>,
    program: String,
    args: Vec<String>,
    site_key: String,
}

impl CommandChallengeProvider {
    /// `command_line` is split on whitespace into program and arguments.
    pub fn new(executor: Arc<dyn CommandExecutor>, command_line: &str, site_key: impl Into<String>) -> Self {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next().unwrap_or_default();
        Self {
            executor,
            program,
            args: parts.collect(),
            site_key: site_key.into(),
        }
    }
}

#[async_trait]
impl ChallengeProvider for CommandChallengeProvider {
    async fn acquire_token(&self) -> Option<ChallengeToken> {
        if self.program.is_empty() {
            return None;
        }

        let envs = [(SITE_KEY_ENV.to_string(), self.site_key.clone())];
        match self.executor.execute(&self.program, &self.args, &envs).await {
            Ok(output) if output.success() => {
                let token = output.stdout.trim();
                if token.is_empty() {
                    warn!(program = %self.program, "Token command printed nothing");
                    None
                } else {
                    debug!(program = %self.program, "Challenge token acquired");
                    Some(ChallengeToken::new(token))
                }
            }
            Ok(output) => {
                warn!(
                    program = %self.program,
                    status = output.status_code,
                    stderr = %output.stderr.trim(),
                    "Token command failed"
                );
                None
            }
            Err(e) => {
                warn!(program = %self.program, error = %e, "Token command could not run");
                None
            }
        }
    }
}
