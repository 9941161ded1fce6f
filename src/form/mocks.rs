// Test doubles for the form collaborators - no network, no processes

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::backend::errors::{ConfigFetchError, SubmissionResult};
use crate::backend::{ConfigLoader, SubmissionGateway};
use crate::challenge::ChallengeProvider;
use crate::form::fields::FieldValues;
use crate::form::types::{ChallengeToken, FormConfig, SecurityTokens};

/// One scripted response, optionally held back until `gate` is notified.
pub struct Scripted<T> {
    pub gate: Option<Arc<Notify>>,
    pub response: T,
}

impl<T> Scripted<T> {
    pub fn now(response: T) -> Self {
        Self { gate: None, response }
    }

    pub fn gated(response: T) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        (
            Self {
                gate: Some(gate.clone()),
                response,
            },
            gate,
        )
    }
}

/// Config loader answering calls from a queue of scripted responses.
#[derive(Default)]
pub struct MockConfigLoader {
    script: Mutex<VecDeque<Scripted<Result<FormConfig, ConfigFetchError>>>>,
    calls: Mutex<Vec<u32>>,
}

impl MockConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, scripted: Scripted<Result<FormConfig, ConfigFetchError>>) {
        self.script.lock().unwrap().push_back(scripted);
    }

    pub fn calls(&self) -> Vec<u32> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConfigLoader for MockConfigLoader {
    async fn load(&self, form_id: u32) -> Result<FormConfig, ConfigFetchError> {
        self.calls.lock().unwrap().push(form_id);
        let scripted = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Scripted::now(Err(ConfigFetchError::Network("no scripted response".into()))));

        if let Some(gate) = scripted.gate {
            gate.notified().await;
        }
        scripted.response
    }
}

/// Challenge provider handing out numbered tokens, or none.
///
/// One call can be held until its gate is notified.
pub struct MockChallengeProvider {
    available: bool,
    calls: Mutex<u32>,
    hold: Option<(u32, Arc<Notify>)>,
}

impl MockChallengeProvider {
    pub fn available() -> Self {
        Self {
            available: true,
            calls: Mutex::new(0),
            hold: None,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::available()
        }
    }

    /// Available provider whose `call`-th request waits on the returned gate.
    pub fn held_on_call(call: u32) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let provider = Self {
            hold: Some((call, gate.clone())),
            ..Self::available()
        };
        (provider, gate)
    }

    pub fn calls(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl ChallengeProvider for MockChallengeProvider {
    async fn acquire_token(&self) -> Option<ChallengeToken> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            *calls
        };
        if let Some((held, gate)) = &self.hold {
            if *held == call {
                gate.notified().await;
            }
        }
        self.available.then(|| ChallengeToken::new(format!("token-{call}")))
    }
}

/// Gateway recording every submission it receives.
#[derive(Default)]
pub struct MockSubmissionGateway {
    script: Mutex<VecDeque<Scripted<SubmissionResult>>>,
    submissions: Mutex<Vec<(FieldValues, SecurityTokens)>>,
}

impl MockSubmissionGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, scripted: Scripted<SubmissionResult>) {
        self.script.lock().unwrap().push_back(scripted);
    }

    pub fn submissions(&self) -> Vec<(FieldValues, SecurityTokens)> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubmissionGateway for MockSubmissionGateway {
    async fn submit(&self, fields: &FieldValues, tokens: &SecurityTokens) -> SubmissionResult {
        self.submissions
            .lock()
            .unwrap()
            .push((fields.clone(), tokens.clone()));
        let scripted = self.script.lock().unwrap().pop_front();

        match scripted {
            Some(Scripted { gate, response }) => {
                if let Some(gate) = gate {
                    gate.notified().await;
                }
                response
            }
            None => Err(crate::backend::errors::SubmissionError::Rejected(vec![])),
        }
    }
}
