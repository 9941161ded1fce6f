use thiserror::Error;

/// Reasons a submit action is refused before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("required fields are empty: {}", .fields.join(", "))]
    MissingRequired { fields: Vec<String> },
    #[error("fields do not contain a valid e-mail address: {}", .fields.join(", "))]
    InvalidEmail { fields: Vec<String> },
    #[error("form configuration has not been loaded")]
    ConfigUnavailable,
    #[error("CAPTCHA challenge token is unavailable")]
    ChallengeUnavailable,
    #[error("form is busy or not ready to submit")]
    Busy,
    #[error("form was unmounted while the submission was in flight")]
    Detached,
}
