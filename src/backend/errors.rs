use serde::Deserialize;
use thiserror::Error;

/// Failure to fetch the form configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigFetchError {
    #[error("form properties request returned HTTP {status}")]
    Status { status: u16 },
    #[error("form properties request failed: {0}")]
    Network(String),
    #[error("form properties payload could not be decoded: {0}")]
    Decode(String),
}

/// Network-level failure while submitting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportFailure {
    #[error("network error: {0}")]
    Network(String),
    #[error("backend returned HTTP {status}")]
    Status { status: u16 },
    #[error("response could not be decoded: {0}")]
    Decode(String),
    #[error("submission timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },
}

impl From<reqwest::Error> for TransportFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TransportFailure::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            TransportFailure::Status { status: status.as_u16() }
        } else {
            TransportFailure::Network(err.to_string())
        }
    }
}

/// A validation or processing error reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldError {
    pub message: String,
    /// GraphQL path of the error, when the server includes one.
    #[serde(default)]
    pub path: Vec<serde_json::Value>,
}

impl FieldError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), path: Vec::new() }
    }
}

/// Why a submission was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("submission rejected ({} error(s))", .0.len())]
    Rejected(Vec<FieldError>),
    #[error("transport error: {0}")]
    Transport(#[from] TransportFailure),
}

impl SubmissionError {
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            SubmissionError::Rejected(errors) => errors,
            SubmissionError::Transport(_) => &[],
        }
    }
}

pub type SubmissionResult = Result<crate::form::SubmissionId, SubmissionError>;
