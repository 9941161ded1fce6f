use anyhow::Result;

use crate::backend::{build_http_client, ConfigLoader, HttpConfigLoader};
use crate::cli::commands::Command;
use crate::config::RelayConfig;

pub struct PropertiesCommand {
    pub config: RelayConfig,
}

impl PropertiesCommand {
    pub fn new(config: RelayConfig) -> Self {
        Self { config }
    }
}

fn or_unset(value: &str) -> &str {
    if value.is_empty() {
        "(unset)"
    } else {
        value
    }
}

impl Command for PropertiesCommand {
    async fn execute(&self) -> Result<()> {
        let http = build_http_client(self.config.backend.request_timeout())?;
        let loader = HttpConfigLoader::new(http, self.config.backend.properties_base_url.clone());
        let form_id = self.config.form.form_id;

        println!("🔍 Fetching properties for form #{form_id}");
        println!("   🔗 {}", loader.properties_url(form_id));
        println!();

        let config = loader.load(form_id).await?;

        println!("🔐 CSRF field:      {}", or_unset(&config.csrf_field_name));
        println!("🍯 Honeypot field:  {}", or_unset(&config.honeypot_field_name));
        println!(
            "🤖 reCAPTCHA:       {}",
            if config.captcha_enabled { "enabled" } else { "disabled" }
        );
        if config.captcha_enabled {
            println!("   Field:           {}", or_unset(&config.captcha_field_name));
        }
        println!("⏳ Loading text:    {}", or_unset(&config.loading_text));
        println!("🎉 Success message: {}", or_unset(&config.success_message));
        println!("❌ Error message:   {}", or_unset(&config.error_message));
        Ok(())
    }
}
