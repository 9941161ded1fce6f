// Submission of collected field values as a single GraphQL mutation

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use tracing::{info, warn};

use super::client::GraphQlClient;
use super::errors::{SubmissionError, SubmissionResult, TransportFailure};
use crate::form::fields::FieldValues;
use crate::form::schema::{FieldKind, FormSchema};
use crate::form::types::{SecurityTokens, SubmissionId};

/// Sends one submission to the backend. Implementations must not retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionGateway: Send + Sync {
    async fn submit(&self, fields: &FieldValues, tokens: &SecurityTokens) -> SubmissionResult;
}

/// Render the mutation document for a schema.
pub fn build_mutation(schema: &FormSchema) -> String {
    let mut declarations = vec![
        "$honeypot: FreeformHoneypotInputType".to_string(),
        "$reCaptcha: FreeformReCaptchaInputType".to_string(),
        "$csrfToken: FreeformCsrfTokenInputType".to_string(),
    ];
    let mut arguments = vec![
        "honeypot: $honeypot".to_string(),
        "reCaptcha: $reCaptcha".to_string(),
        "csrfToken: $csrfToken".to_string(),
    ];

    for spec in &schema.fields {
        declarations.push(format!("${}: {}", spec.name, spec.kind.graphql_type()));
        arguments.push(format!("{0}: ${0}", spec.name));
    }

    format!(
        "mutation {}(\n    {}\n) {{\n  {}(\n    {}\n  ) {{\n    submissionId\n    success\n  }}\n}}\n",
        schema.operation_name,
        declarations.join(",\n    "),
        schema.mutation_field(),
        arguments.join("\n    "),
    )
}

/// Variables for one submission: security tokens first, then every schema field.
pub fn build_variables(schema: &FormSchema, fields: &FieldValues, tokens: &SecurityTokens) -> Map<String, Value> {
    let mut variables = Map::new();
    variables.insert(
        "honeypot".into(),
        json!({ "name": tokens.honeypot_name, "value": tokens.honeypot_value }),
    );
    variables.insert(
        "csrfToken".into(),
        json!({ "name": tokens.csrf_name, "value": tokens.csrf_value }),
    );
    variables.insert(
        "reCaptcha".into(),
        json!({
            "name": tokens.captcha_name,
            "value": tokens.challenge.as_ref().map(|t| t.as_str()).unwrap_or_default(),
        }),
    );

    for spec in &schema.fields {
        let value = match fields.get(&spec.name) {
            // DateTime is a scalar the server parses; an empty string is not a date.
            Some(value) if spec.kind == FieldKind::DateTime && value.is_empty() => Value::Null,
            Some(value) => serde_json::to_value(value).unwrap_or(Value::Null),
            None if spec.kind == FieldKind::DateTime => Value::Null,
            None => serde_json::to_value(spec.kind.default_value()).unwrap_or(Value::Null),
        };
        variables.insert(spec.name.clone(), value);
    }

    variables
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmissionPayload {
    #[serde(default)]
    submission_id: Option<Value>,
    #[serde(default)]
    success: Option<bool>,
}

fn submission_id_from(value: Option<Value>) -> SubmissionId {
    match value {
        Some(Value::String(id)) => SubmissionId::new(id),
        Some(Value::Null) | None => SubmissionId::new(""),
        Some(other) => SubmissionId::new(other.to_string()),
    }
}

/// GraphQL implementation bound to one form schema.
#[derive(Debug, Clone)]
pub struct GraphQlGateway {
    client: GraphQlClient,
    schema: FormSchema,
    mutation: String,
}

impl GraphQlGateway {
    pub fn new(client: GraphQlClient, schema: FormSchema) -> Self {
        let mutation = build_mutation(&schema);
        Self {
            client,
            schema,
            mutation,
        }
    }
}

#[async_trait]
impl SubmissionGateway for GraphQlGateway {
    async fn submit(&self, fields: &FieldValues, tokens: &SecurityTokens) -> SubmissionResult {
        let variables = build_variables(&self.schema, fields, tokens);

        let response = self
            .client
            .execute::<_, HashMap<String, Option<SubmissionPayload>>>(
                &self.mutation,
                &self.schema.operation_name,
                variables,
            )
            .await?;

        if !response.errors.is_empty() {
            warn!(
                form = %self.schema.handle,
                errors = response.errors.len(),
                "Backend rejected submission"
            );
            return Err(SubmissionError::Rejected(response.errors));
        }

        let payload = response
            .data
            .and_then(|mut data| data.remove(&self.schema.mutation_field()))
            .flatten()
            .ok_or_else(|| {
                TransportFailure::Decode(format!("response has no {} payload", self.schema.mutation_field()))
            })?;

        if payload.success == Some(true) {
            let id = submission_id_from(payload.submission_id);
            info!(form = %self.schema.handle, submission_id = %id, "Submission accepted");
            Ok(id)
        } else {
            warn!(form = %self.schema.handle, "Backend reported success=false");
            Err(SubmissionError::Rejected(Vec::new()))
        }
    }
}
