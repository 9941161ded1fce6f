// Async orchestration around the form lifecycle
//
// The machine lives behind a mutex that is never held across an await, so
// field edits go through while loads and submissions are in flight. Each
// mount gets an epoch; asynchronous results carry the epoch they started
// under and are dropped once it is stale.

use statig::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn, Instrument};

use super::errors::FormError;
use super::fields::FieldValues;
use super::schema::FormSchema;
use super::state_machine::{FormEvent, FormLifecycle};
use super::types::{Phase, SecurityTokens, SubmissionOutcome};
use super::view::{self, FormView};
use crate::backend::errors::{SubmissionError, SubmissionResult, TransportFailure};
use crate::backend::{ConfigLoader, SubmissionGateway};
use crate::challenge::ChallengeProvider;
use crate::telemetry::{create_submission_span, generate_correlation_id};

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub form_id: u32,
    /// Bound on the whole pending phase of a submit attempt.
    pub submission_timeout: Duration,
    /// When false no challenge token is requested and the mutation carries
    /// an empty reCAPTCHA value.
    pub challenge_required: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            form_id: 1,
            submission_timeout: Duration::from_secs(30),
            challenge_required: true,
        }
    }
}

fn timed_out(timeout: Duration) -> SubmissionError {
    let after_ms = timeout.as_millis() as u64;
    warn!(timeout_ms = after_ms, "Submission timed out");
    SubmissionError::Transport(TransportFailure::Timeout { after_ms })
}

/// Collaborators injected by the composition root.
#[derive(Clone)]
pub struct FormServices {
    pub loader: Arc<dyn ConfigLoader>,
    pub challenge: Arc<dyn ChallengeProvider>,
    pub gateway: Arc<dyn SubmissionGateway>,
}

/// A mounted (or mountable) form instance.
#[derive(Clone)]
pub struct FormSession {
    machine: Arc<Mutex<StateMachine<FormLifecycle>>>,
    epoch: Arc<AtomicU64>,
    services: FormServices,
    settings: SessionSettings,
}

impl FormSession {
    pub fn new(schema: FormSchema, services: FormServices, settings: SessionSettings) -> Self {
        let machine = FormLifecycle::new(settings.form_id, schema).state_machine();
        Self {
            machine: Arc::new(Mutex::new(machine)),
            epoch: Arc::new(AtomicU64::new(0)),
            services,
            settings,
        }
    }

    fn machine(&self) -> MutexGuard<'_, StateMachine<FormLifecycle>> {
        self.machine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn dispatch(&self, event: FormEvent) {
        self.machine().handle(&event);
    }

    /// Apply `event` only if `epoch` still identifies the current mount.
    fn dispatch_for(&self, epoch: u64, event: FormEvent) -> bool {
        let mut machine = self.machine();
        if self.epoch.load(Ordering::SeqCst) != epoch {
            return false;
        }
        machine.handle(&event);
        true
    }

    /// Start loading configuration and an initial challenge token.
    ///
    /// Each result is applied as soon as it arrives, so a slow token does
    /// not hold the form in loading. The returned handle completes once both
    /// have settled; results that arrive after `unmount` (or a newer
    /// `mount`) are discarded.
    pub fn mount(&self) -> JoinHandle<()> {
        let epoch = {
            let mut machine = self.machine();
            let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
            machine.handle(&FormEvent::Mount);
            epoch
        };

        let session = self.clone();
        let form_id = self.settings.form_id;
        tokio::spawn(
            async move {
                let config = async {
                    let event = match session.services.loader.load(form_id).await {
                        Ok(config) => FormEvent::ConfigLoaded(config),
                        Err(error) => FormEvent::ConfigFailed(error),
                    };
                    if !session.dispatch_for(epoch, event) {
                        debug!(form_id, epoch, "Discarding configuration for a torn-down mount");
                    }
                };
                let challenge = async {
                    if !session.settings.challenge_required {
                        return;
                    }
                    let token = session.services.challenge.acquire_token().await;
                    if !session.dispatch_for(epoch, FormEvent::ChallengeRefreshed(token)) {
                        debug!(form_id, epoch, "Discarding challenge token for a torn-down mount");
                    }
                };
                tokio::join!(config, challenge);
            }
            .instrument(tracing::info_span!("form_mount", form_id, epoch)),
        )
    }

    /// Tear down the current mount; pending results for it are ignored.
    pub fn unmount(&self) {
        let mut machine = self.machine();
        self.epoch.fetch_add(1, Ordering::SeqCst);
        machine.handle(&FormEvent::Unmount);
    }

    pub fn set_field(&self, name: &str, value: &str) {
        self.dispatch(FormEvent::SetField {
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    pub fn set_list_member(&self, name: &str, member: &str, checked: bool) {
        self.dispatch(FormEvent::SetListMember {
            name: name.to_string(),
            member: member.to_string(),
            checked,
        });
    }

    pub fn toggle_list_member(&self, name: &str, member: &str) {
        self.dispatch(FormEvent::ToggleListMember {
            name: name.to_string(),
            member: member.to_string(),
        });
    }

    /// Run one submit attempt: validate, refresh the challenge token, send
    /// exactly one mutation, then present the outcome.
    pub async fn submit(&self) -> Result<SubmissionOutcome, FormError> {
        let attempt = generate_correlation_id();
        let span = create_submission_span(self.settings.form_id, &attempt);
        self.submit_attempt().instrument(span).await
    }

    async fn submit_attempt(&self) -> Result<SubmissionOutcome, FormError> {
        let epoch = {
            let mut machine = self.machine();
            if let Some(blocker) = machine.inner().submit_blocker() {
                info!(reason = %blocker, "Submission blocked");
                return Err(blocker);
            }
            machine.handle(&FormEvent::SubmitRequested);
            self.epoch.load(Ordering::SeqCst)
        };

        // One deadline covers the token refresh and the gateway call
        let timeout = self.settings.submission_timeout;
        let deadline = Instant::now() + timeout;

        let token = if self.settings.challenge_required {
            match tokio::time::timeout_at(deadline, self.services.challenge.acquire_token()).await {
                Ok(token) => token,
                Err(_) => return self.finish(epoch, Err(timed_out(timeout))),
            }
        } else {
            None
        };

        let (fields, tokens) = {
            let mut machine = self.machine();
            if self.epoch.load(Ordering::SeqCst) != epoch {
                return Err(FormError::Detached);
            }
            machine.handle(&FormEvent::ChallengeRefreshed(token.clone()));

            if token.is_none() && self.settings.challenge_required {
                machine.handle(&FormEvent::ChallengeMissing);
                return Err(FormError::ChallengeUnavailable);
            }
            let form = machine.inner();
            (form.fields().clone(), SecurityTokens::from_config(form.config(), token))
        };

        let result = tokio::time::timeout_at(deadline, self.services.gateway.submit(&fields, &tokens))
            .await
            .unwrap_or_else(|_| Err(timed_out(timeout)));
        self.finish(epoch, result)
    }

    /// Apply a finished attempt and present its outcome.
    fn finish(&self, epoch: u64, result: SubmissionResult) -> Result<SubmissionOutcome, FormError> {
        let mut machine = self.machine();
        if self.epoch.load(Ordering::SeqCst) != epoch {
            debug!("Discarding submission result for a torn-down mount");
            return Err(FormError::Detached);
        }
        machine.handle(&FormEvent::SubmissionFinished(result));
        let outcome = machine.inner().outcome().clone();
        machine.handle(&FormEvent::OutcomePresented);
        Ok(outcome)
    }

    pub fn phase(&self) -> Phase {
        self.machine().inner().phase()
    }

    pub fn history(&self) -> Vec<Phase> {
        self.machine().inner().history().to_vec()
    }

    pub fn fields(&self) -> FieldValues {
        self.machine().inner().fields().clone()
    }

    pub fn outcome(&self) -> SubmissionOutcome {
        self.machine().inner().outcome().clone()
    }

    pub fn config_loaded(&self) -> bool {
        self.machine().inner().config_loaded()
    }

    pub fn config(&self) -> crate::form::FormConfig {
        self.machine().inner().config().clone()
    }

    /// Current renderable state.
    pub fn view(&self) -> FormView {
        view::render(self.machine().inner())
    }
}
