// Core data types for the form lifecycle

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::backend::errors::SubmissionError;

/// Server-supplied form configuration, flattened from the Freeform
/// properties payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormConfig {
    pub csrf_field_name: String,
    pub csrf_token: String,
    pub honeypot_field_name: String,
    pub honeypot_value: String,
    pub captcha_enabled: bool,
    pub captcha_handle: String,
    pub captcha_field_name: String,
    pub loading_text: String,
    pub success_message: String,
    pub error_message: String,
}

/// Wire shape of `GET /form/properties/{formId}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormProperties {
    pub csrf: CsrfProperties,
    pub honeypot: HoneypotProperties,
    pub re_captcha: ReCaptchaProperties,
    pub loading_text: String,
    pub success_message: String,
    pub error_message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CsrfProperties {
    pub name: String,
    pub token: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HoneypotProperties {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReCaptchaProperties {
    pub enabled: bool,
    pub handle: String,
    pub name: String,
}

impl From<FormProperties> for FormConfig {
    fn from(props: FormProperties) -> Self {
        Self {
            csrf_field_name: props.csrf.name,
            csrf_token: props.csrf.token,
            honeypot_field_name: props.honeypot.name,
            honeypot_value: props.honeypot.value,
            captcha_enabled: props.re_captcha.enabled,
            captcha_handle: props.re_captcha.handle,
            captcha_field_name: props.re_captcha.name,
            loading_text: props.loading_text,
            success_message: props.success_message,
            error_message: props.error_message,
        }
    }
}

/// A single field value: plain text or the members of a multi-select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::List(items) => items.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::Text(_) => None,
            FieldValue::List(items) => Some(items),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        FieldValue::Text(text.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        FieldValue::Text(text)
    }
}

/// Short-lived proof-of-humanity credential.
#[derive(Clone, PartialEq, Eq)]
pub struct ChallengeToken(String);

impl ChallengeToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ChallengeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(6).collect();
        write!(f, "ChallengeToken({prefix}…)")
    }
}

/// Identifier the backend assigns to an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubmissionId(String);

impl SubmissionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for SubmissionId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of the most recent submit attempt.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SubmissionOutcome {
    #[default]
    Idle,
    Pending,
    Success(SubmissionId),
    Failure(SubmissionError),
}

impl SubmissionOutcome {
    pub fn is_pending(&self) -> bool {
        matches!(self, SubmissionOutcome::Pending)
    }
}

/// Lifecycle phase, mirrored from the state machine for inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Uninitialized,
    Loading,
    Ready,
    Submitting,
    Succeeded,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Uninitialized => "uninitialized",
            Phase::Loading => "loading",
            Phase::Ready => "ready",
            Phase::Submitting => "submitting",
            Phase::Succeeded => "succeeded",
            Phase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Security tokens forwarded with every submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityTokens {
    pub csrf_name: String,
    pub csrf_value: String,
    pub honeypot_name: String,
    pub honeypot_value: String,
    pub captcha_name: String,
    pub challenge: Option<ChallengeToken>,
}

impl SecurityTokens {
    pub fn from_config(config: &FormConfig, challenge: Option<ChallengeToken>) -> Self {
        Self {
            csrf_name: config.csrf_field_name.clone(),
            csrf_value: config.csrf_token.clone(),
            honeypot_name: config.honeypot_field_name.clone(),
            honeypot_value: config.honeypot_value.clone(),
            captcha_name: config.captcha_field_name.clone(),
            challenge,
        }
    }
}
