use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CACHE_CONTROL};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::errors::{FieldError, TransportFailure};

/// Build the HTTP client shared by the config loader and the GraphQL client.
pub fn build_http_client(request_timeout: Duration) -> Result<reqwest::Client, TransportFailure> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(
        HeaderName::from_static("x-requested-with"),
        HeaderValue::from_static("XMLHttpRequest"),
    );
    // Same header under its CGI variable name
    headers.insert(
        HeaderName::from_static("http_x_requested_with"),
        HeaderValue::from_static("XMLHttpRequest"),
    );
    headers.insert(
        HeaderName::from_static("x-craft-solspace-freeform-mode"),
        HeaderValue::from_static("Headless"),
    );

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(request_timeout)
        .user_agent(concat!("freeform-relay/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| TransportFailure::Network(e.to_string()))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlRequest<'a, V: Serialize> {
    query: &'a str,
    operation_name: &'a str,
    variables: V,
}

/// A decoded GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<FieldError>,
}

/// GraphQL endpoint client, constructed once and injected into gateways.
#[derive(Debug, Clone)]
pub struct GraphQlClient {
    http: reqwest::Client,
    endpoint: String,
}

impl GraphQlClient {
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    /// Execute one operation. Non-2xx responses that still carry a GraphQL
    /// body are returned as responses; only bodies that are not GraphQL map
    /// to a status error.
    pub async fn execute<V, T>(
        &self,
        query: &str,
        operation_name: &str,
        variables: V,
    ) -> Result<GraphQlResponse<T>, TransportFailure>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let request = GraphQlRequest {
            query,
            operation_name,
            variables,
        };

        debug!(endpoint = %self.endpoint, operation = operation_name, "Sending GraphQL request");

        let response = self.http.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<GraphQlResponse<T>>(&body) {
            Ok(decoded) if status.is_success() || !decoded.errors.is_empty() => Ok(decoded),
            Ok(_) => Err(TransportFailure::Status { status: status.as_u16() }),
            Err(_) if !status.is_success() => Err(TransportFailure::Status { status: status.as_u16() }),
            Err(e) => Err(TransportFailure::Decode(e.to_string())),
        }
    }
}
