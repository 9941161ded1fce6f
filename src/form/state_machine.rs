use statig::prelude::*;

use super::errors::FormError;
use super::fields::FieldValues;
use super::schema::FormSchema;
use super::types::{ChallengeToken, FormConfig, Phase, SubmissionOutcome};
use crate::backend::errors::{ConfigFetchError, SubmissionResult};

#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    Mount,
    Unmount,
    ConfigLoaded(FormConfig),
    ConfigFailed(ConfigFetchError),
    ChallengeRefreshed(Option<ChallengeToken>),
    SubmitRequested,
    ChallengeMissing,
    SubmissionFinished(SubmissionResult),
    OutcomePresented,
    SetField { name: String, value: String },
    SetListMember { name: String, member: String, checked: bool },
    ToggleListMember { name: String, member: String },
}

/// Number of most recent phases kept in the history.
pub const HISTORY_LIMIT: usize = 32;

/// Everything the form owns: configuration, field values and outcome.
pub struct FormLifecycle {
    form_id: u32,
    schema: FormSchema,
    fields: FieldValues,
    config: FormConfig,
    config_loaded: bool,
    challenge: Option<ChallengeToken>,
    outcome: SubmissionOutcome,
    phase: Phase,
    history: Vec<Phase>,
}

impl FormLifecycle {
    pub fn new(form_id: u32, schema: FormSchema) -> Self {
        let fields = schema.default_values();
        Self {
            form_id,
            schema,
            fields,
            config: FormConfig::default(),
            config_loaded: false,
            challenge: None,
            outcome: SubmissionOutcome::Idle,
            phase: Phase::Uninitialized,
            history: vec![Phase::Uninitialized],
        }
    }

    fn enter(&mut self, phase: Phase) {
        tracing::debug!(form_id = self.form_id, from = %self.phase, to = %phase, "Form phase change");
        self.phase = phase;
        self.history.push(phase);
        if self.history.len() > HISTORY_LIMIT {
            let excess = self.history.len() - HISTORY_LIMIT;
            self.history.drain(..excess);
        }
    }

    /// Why a submit action would be refused right now, if it would be.
    pub fn submit_blocker(&self) -> Option<FormError> {
        match self.phase {
            Phase::Ready => {}
            Phase::Loading | Phase::Uninitialized => return Some(FormError::ConfigUnavailable),
            _ => return Some(FormError::Busy),
        }

        let missing = self.fields.missing_required(&self.schema);
        if !missing.is_empty() {
            return Some(FormError::MissingRequired { fields: missing });
        }

        let invalid = self.fields.invalid_emails(&self.schema);
        if !invalid.is_empty() {
            return Some(FormError::InvalidEmail { fields: invalid });
        }

        if !self.config_loaded {
            return Some(FormError::ConfigUnavailable);
        }

        None
    }
}

#[state_machine(initial = "State::uninitialized()")]
impl FormLifecycle {
    /// Field edits, challenge refreshes and mount/unmount are accepted in
    /// every state.
    #[superstate]
    fn editable(&mut self, event: &FormEvent) -> Outcome<State> {
        match event {
            FormEvent::SetField { name, value } => {
                self.fields.set_field(name, value.clone());
                Handled
            }
            FormEvent::SetListMember { name, member, checked } => {
                self.fields.set_list_member(name, member, *checked);
                Handled
            }
            FormEvent::ToggleListMember { name, member } => {
                self.fields.toggle_list_member(name, member);
                Handled
            }
            FormEvent::ChallengeRefreshed(token) => {
                self.challenge = token.clone();
                Handled
            }
            FormEvent::Mount => {
                self.config = FormConfig::default();
                self.config_loaded = false;
                self.outcome = SubmissionOutcome::Idle;
                self.enter(Phase::Loading);
                tracing::info!(form_id = self.form_id, "Form mounted, loading configuration");
                Transition(State::loading())
            }
            FormEvent::Unmount => {
                self.config = FormConfig::default();
                self.config_loaded = false;
                self.challenge = None;
                self.outcome = SubmissionOutcome::Idle;
                self.enter(Phase::Uninitialized);
                tracing::info!(form_id = self.form_id, "Form unmounted");
                Transition(State::uninitialized())
            }
            _ => Handled,
        }
    }

    #[state(superstate = "editable")]
    fn uninitialized(&mut self, event: &FormEvent) -> Outcome<State> {
        match event {
            FormEvent::Unmount => Handled,
            _ => Super,
        }
    }

    #[state(superstate = "editable")]
    fn loading(&mut self, event: &FormEvent) -> Outcome<State> {
        match event {
            FormEvent::ConfigLoaded(config) => {
                self.config = config.clone();
                self.config_loaded = true;
                self.enter(Phase::Ready);
                tracing::info!(
                    form_id = self.form_id,
                    captcha_enabled = self.config.captcha_enabled,
                    "Form configuration applied"
                );
                Transition(State::ready())
            }
            FormEvent::ConfigFailed(error) => {
                self.config = FormConfig::default();
                self.config_loaded = false;
                self.enter(Phase::Ready);
                tracing::warn!(
                    form_id = self.form_id,
                    error = %error,
                    "Form configuration unavailable, submission disabled"
                );
                Transition(State::ready())
            }
            _ => Super,
        }
    }

    #[state(superstate = "editable")]
    fn ready(&mut self, event: &FormEvent) -> Outcome<State> {
        match event {
            FormEvent::SubmitRequested => {
                if let Some(blocker) = self.submit_blocker() {
                    tracing::debug!(form_id = self.form_id, reason = %blocker, "Submit refused");
                    return Handled;
                }
                self.outcome = SubmissionOutcome::Pending;
                self.enter(Phase::Submitting);
                Transition(State::submitting())
            }
            _ => Super,
        }
    }

    #[state(superstate = "editable")]
    fn submitting(&mut self, event: &FormEvent) -> Outcome<State> {
        match event {
            FormEvent::ChallengeMissing => {
                self.outcome = SubmissionOutcome::Idle;
                self.enter(Phase::Ready);
                tracing::warn!(form_id = self.form_id, "No challenge token, submission not sent");
                Transition(State::ready())
            }
            FormEvent::SubmissionFinished(Ok(id)) => {
                self.outcome = SubmissionOutcome::Success(id.clone());
                self.fields = self.schema.default_values();
                self.enter(Phase::Succeeded);
                tracing::info!(form_id = self.form_id, submission_id = %id, "Submission succeeded");
                Transition(State::succeeded())
            }
            FormEvent::SubmissionFinished(Err(error)) => {
                self.outcome = SubmissionOutcome::Failure(error.clone());
                self.enter(Phase::Failed);
                tracing::error!(
                    form_id = self.form_id,
                    error = %error,
                    field_errors = ?error.field_errors(),
                    "Submission failed"
                );
                Transition(State::failed())
            }
            _ => Super,
        }
    }

    #[state(superstate = "editable")]
    fn succeeded(&mut self, event: &FormEvent) -> Outcome<State> {
        match event {
            FormEvent::OutcomePresented => {
                self.enter(Phase::Ready);
                Transition(State::ready())
            }
            _ => Super,
        }
    }

    #[state(superstate = "editable")]
    fn failed(&mut self, event: &FormEvent) -> Outcome<State> {
        match event {
            FormEvent::OutcomePresented => {
                self.enter(Phase::Ready);
                Transition(State::ready())
            }
            _ => Super,
        }
    }
}

impl FormLifecycle {
    pub fn form_id(&self) -> u32 {
        self.form_id
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn fields(&self) -> &FieldValues {
        &self.fields
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn config_loaded(&self) -> bool {
        self.config_loaded
    }

    pub fn challenge(&self) -> Option<&ChallengeToken> {
        self.challenge.as_ref()
    }

    pub fn outcome(&self) -> &SubmissionOutcome {
        &self.outcome
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The most recent phases entered, oldest first, at most
    /// [`HISTORY_LIMIT`] of them.
    pub fn history(&self) -> &[Phase] {
        &self.history
    }
}
