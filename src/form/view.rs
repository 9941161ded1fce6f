// Pure rendering of form state

use serde::Serialize;

use super::fields::FieldValues;
use super::state_machine::FormLifecycle;
use super::types::{Phase, SubmissionOutcome};

pub const SUBMIT_LABEL: &str = "Submit";
const DEFAULT_LOADING_TEXT: &str = "Submitting...";
const DEFAULT_SUCCESS_MESSAGE: &str = "Form submitted successfully.";
const DEFAULT_ERROR_MESSAGE: &str = "Sorry, there was an error submitting the form. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
}

/// Everything a front end needs to draw the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub phase: Phase,
    pub banner: Option<Banner>,
    pub submit_label: String,
    pub submit_enabled: bool,
    pub config_loaded: bool,
    pub fields: FieldValues,
}

fn or_default(text: &str, fallback: &str) -> String {
    if text.is_empty() {
        fallback.to_string()
    } else {
        text.to_string()
    }
}

pub fn render(form: &FormLifecycle) -> FormView {
    let config = form.config();

    let banner = match form.outcome() {
        SubmissionOutcome::Success(_) => Some(Banner {
            kind: BannerKind::Success,
            message: or_default(&config.success_message, DEFAULT_SUCCESS_MESSAGE),
        }),
        SubmissionOutcome::Failure(_) => Some(Banner {
            kind: BannerKind::Error,
            message: or_default(&config.error_message, DEFAULT_ERROR_MESSAGE),
        }),
        SubmissionOutcome::Idle | SubmissionOutcome::Pending => None,
    };

    let submit_label = if form.outcome().is_pending() {
        or_default(&config.loading_text, DEFAULT_LOADING_TEXT)
    } else {
        SUBMIT_LABEL.to_string()
    };

    FormView {
        phase: form.phase(),
        banner,
        submit_label,
        submit_enabled: form.phase() == Phase::Ready && form.config_loaded(),
        config_loaded: form.config_loaded(),
        fields: form.fields().clone(),
    }
}
