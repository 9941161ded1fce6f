use anyhow::Result;

use crate::cli::commands::Command;
use crate::config::RelayConfig;

pub struct ConfigCommand {
    pub config: RelayConfig,
}

impl ConfigCommand {
    pub fn new(config: RelayConfig) -> Self {
        Self { config }
    }
}

impl Command for ConfigCommand {
    async fn execute(&self) -> Result<()> {
        let mut shown = self.config.clone();
        if !shown.captcha.token.is_empty() {
            shown.captcha.token = "<redacted>".to_string();
        }
        print!("{}", shown.to_toml()?);
        Ok(())
    }
}
