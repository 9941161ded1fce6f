use anyhow::{bail, Result};

use crate::app::build_session;
use crate::backend::SubmissionError;
use crate::cli::commands::Command;
use crate::config::RelayConfig;
use crate::form::{BannerKind, FormView, SubmissionOutcome};

pub struct SubmitCommand {
    pub config: RelayConfig,
    pub fields: Vec<(String, String)>,
    pub checked: Vec<(String, String)>,
    pub json: bool,
}

impl SubmitCommand {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            config,
            fields: Vec::new(),
            checked: Vec::new(),
            json: false,
        }
    }

    pub fn with_fields(mut self, fields: Vec<(String, String)>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_checked(mut self, checked: Vec<(String, String)>) -> Self {
        self.checked = checked;
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

impl Command for SubmitCommand {
    async fn execute(&self) -> Result<()> {
        let schema = self.config.form.variant.schema();
        let session = build_session(&self.config, schema.clone())?;

        if !self.json {
            println!(
                "🔄 Loading {} form #{}...",
                self.config.form.variant, self.config.form.form_id
            );
        }
        session.mount().await?;

        if !session.config_loaded() && !self.json {
            println!("⚠️  Form configuration could not be loaded; submission is disabled");
        }

        for (name, value) in &self.fields {
            if schema.field(name).is_none() {
                tracing::warn!(field = %name, "Field is not part of the form schema");
            }
            session.set_field(name, value);
        }
        for (name, member) in &self.checked {
            session.set_list_member(name, member, true);
        }

        let result = session.submit().await;
        let view = session.view();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&view)?);
        } else {
            print_view(&view);
        }

        match result {
            Ok(SubmissionOutcome::Success(id)) => {
                if !self.json {
                    println!("✅ Submission #{id} accepted");
                }
                Ok(())
            }
            Ok(SubmissionOutcome::Failure(error)) => {
                if !self.json {
                    print_failure(&error);
                }
                bail!("submission failed: {error}")
            }
            Ok(other) => bail!("submission ended in unexpected state: {other:?}"),
            Err(blocked) => {
                if !self.json {
                    println!("🚫 {blocked}");
                }
                bail!("submission blocked: {blocked}")
            }
        }
    }
}

pub fn print_view(view: &FormView) {
    if let Some(banner) = &view.banner {
        match banner.kind {
            BannerKind::Success => println!("🎉 {}", banner.message),
            BannerKind::Error => println!("❌ {}", banner.message),
        }
    }
    let state = if view.submit_enabled { "enabled" } else { "disabled" };
    println!("   [{}] ({state})", view.submit_label);
}

fn print_failure(error: &SubmissionError) {
    match error {
        SubmissionError::Rejected(errors) if !errors.is_empty() => {
            println!("📋 The backend reported:");
            for field_error in errors {
                println!("   → {}", field_error.message);
            }
        }
        SubmissionError::Rejected(_) => println!("📋 The backend did not accept the submission"),
        SubmissionError::Transport(failure) => {
            println!("🌐 {failure}");
            println!("💡 Your values were not lost; re-run the command to retry");
        }
    }
}
