use anyhow::{bail, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::form::FormVariant;

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "freeform-relay.toml";

/// Main configuration structure for freeform-relay
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Backend endpoints
    pub backend: BackendConfig,
    /// Which form to drive
    pub form: FormConfigSection,
    /// CAPTCHA capability
    pub captcha: CaptchaConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// GraphQL endpoint receiving submissions
    pub endpoint_url: String,
    /// Base URL of the Freeform plugin; properties live under `/form/properties/{id}`
    pub properties_base_url: String,
    /// Per-request HTTP timeout
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FormConfigSection {
    /// Freeform form ID in Craft
    pub form_id: u32,
    /// Field set to submit
    pub variant: FormVariant,
    /// Upper bound on how long the submit control stays busy
    pub submission_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CaptchaConfig {
    /// Request a challenge token for every submission; with `false` the
    /// mutation is sent with an empty reCAPTCHA value
    pub required: bool,
    /// reCAPTCHA site key handed to the token command
    pub site_key: String,
    /// Pre-issued challenge token
    pub token: String,
    /// Command printing a fresh challenge token on stdout
    pub token_command: String,
    /// How long the token command may run
    pub token_command_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (or full `EnvFilter` directive)
    pub log_level: String,
    /// Emit JSON log lines
    pub json_logs: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint_url: "https://demo.solspace.net/craft/graphql/api".to_string(),
            properties_base_url: "https://demo.solspace.net/craft/freeform".to_string(),
            request_timeout_seconds: 15,
        }
    }
}

impl Default for FormConfigSection {
    fn default() -> Self {
        Self {
            form_id: 1,
            variant: FormVariant::Contact,
            submission_timeout_seconds: 30,
        }
    }
}

impl Default for CaptchaConfig {
    fn default() -> Self {
        Self {
            required: true,
            site_key: String::new(),
            token: String::new(),
            token_command: String::new(),
            token_command_timeout_seconds: None,
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl BackendConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl FormConfigSection {
    pub fn submission_timeout(&self) -> Duration {
        Duration::from_secs(self.submission_timeout_seconds)
    }
}

impl CaptchaConfig {
    pub fn token_command_timeout(&self) -> Duration {
        Duration::from_secs(self.token_command_timeout_seconds.unwrap_or(20))
    }
}

impl RelayConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (`path`, or freeform-relay.toml when present)
    /// 3. Environment variables (prefixed with FREEFORM_RELAY_, `__` between sections)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`RelayConfig::load`], reading variables from `env` instead of the
    /// process environment when given.
    pub fn load_with_env(path: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let mut builder = Config::builder();

        match path {
            Some(path) => {
                builder = builder.add_source(File::from(path));
            }
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                builder = builder.add_source(File::with_name(DEFAULT_CONFIG_FILE));
            }
            None => {}
        }

        builder = builder.add_source(
            Environment::with_prefix("FREEFORM_RELAY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let relay_config: RelayConfig = builder.build()?.try_deserialize()?;
        relay_config.validate()?;
        Ok(relay_config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.backend.endpoint_url.trim().is_empty() {
            bail!("backend.endpoint_url must not be empty");
        }
        if self.backend.properties_base_url.trim().is_empty() {
            bail!("backend.properties_base_url must not be empty");
        }
        if self.form.form_id == 0 {
            bail!("form.form_id must be a positive Freeform form ID");
        }
        if self.form.submission_timeout_seconds == 0 {
            bail!("form.submission_timeout_seconds must be greater than zero");
        }
        Ok(())
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_sources() {
        let config = RelayConfig::load_with_env(None, Some(HashMap::new())).unwrap();

        assert_eq!(config.backend.endpoint_url, "https://demo.solspace.net/craft/graphql/api");
        assert_eq!(config.form.form_id, 1);
        assert_eq!(config.form.variant, FormVariant::Contact);
        assert_eq!(config.form.submission_timeout(), Duration::from_secs(30));
        assert!(config.captcha.token_command.is_empty());
        assert!(config.captcha.required);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[backend]\nendpoint_url = \"https://cms.example.com/graphql\"\n\n[form]\nform_id = 4\nvariant = \"quote\"\n"
        )
        .unwrap();

        let config = RelayConfig::load_with_env(Some(file.path()), Some(HashMap::new())).unwrap();

        assert_eq!(config.backend.endpoint_url, "https://cms.example.com/graphql");
        assert_eq!(config.backend.request_timeout_seconds, 15);
        assert_eq!(config.form.form_id, 4);
        assert_eq!(config.form.variant, FormVariant::Quote);
    }

    #[test]
    fn test_environment_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[form]\nform_id = 4\n").unwrap();
        let env = HashMap::from([
            ("FREEFORM_RELAY_FORM__FORM_ID".to_string(), "9".to_string()),
            ("FREEFORM_RELAY_CAPTCHA__SITE_KEY".to_string(), "site-key".to_string()),
            ("FREEFORM_RELAY_CAPTCHA__REQUIRED".to_string(), "false".to_string()),
        ]);

        let config = RelayConfig::load_with_env(Some(file.path()), Some(env)).unwrap();

        assert_eq!(config.form.form_id, 9);
        assert_eq!(config.captcha.site_key, "site-key");
        assert!(!config.captcha.required);
    }

    #[test]
    fn test_invalid_form_id_rejected() {
        let env = HashMap::from([("FREEFORM_RELAY_FORM__FORM_ID".to_string(), "0".to_string())]);
        assert!(RelayConfig::load_with_env(None, Some(env)).is_err());
    }

    #[test]
    fn test_toml_round_trip_of_defaults() {
        let rendered = RelayConfig::default().to_toml().unwrap();
        assert!(rendered.contains("[backend]"));
        assert!(rendered.contains("variant = \"contact\""));
    }
}
