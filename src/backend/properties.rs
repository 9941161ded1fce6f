// Form configuration loading

use async_trait::async_trait;
use tracing::{debug, info};

use super::errors::ConfigFetchError;
use crate::form::types::{FormConfig, FormProperties};

/// Fetches the server-supplied configuration of a form.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfigLoader: Send + Sync {
    async fn load(&self, form_id: u32) -> Result<FormConfig, ConfigFetchError>;
}

/// Loads `{base_url}/form/properties/{form_id}` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpConfigLoader {
    http: reqwest::Client,
    base_url: String,
}

impl HttpConfigLoader {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn properties_url(&self, form_id: u32) -> String {
        format!("{}/form/properties/{}", self.base_url, form_id)
    }
}

#[async_trait]
impl ConfigLoader for HttpConfigLoader {
    async fn load(&self, form_id: u32) -> Result<FormConfig, ConfigFetchError> {
        let url = self.properties_url(form_id);
        debug!(form_id, url = %url, "Fetching form properties");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ConfigFetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConfigFetchError::Status { status: status.as_u16() });
        }

        let properties: FormProperties = response
            .json()
            .await
            .map_err(|e| ConfigFetchError::Decode(e.to_string()))?;

        info!(form_id, captcha_enabled = properties.re_captcha.enabled, "Form properties loaded");
        Ok(properties.into())
    }
}
