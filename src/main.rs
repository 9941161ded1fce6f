use anyhow::Result;
use clap::Parser;

use freeform_relay::cli::commands::config::ConfigCommand;
use freeform_relay::cli::commands::fields::FieldsCommand;
use freeform_relay::cli::commands::mutation::MutationCommand;
use freeform_relay::cli::commands::properties::PropertiesCommand;
use freeform_relay::cli::commands::submit::SubmitCommand;
use freeform_relay::cli::commands::{show_how_to_use, Command};
use freeform_relay::cli::{Cli, Commands};
use freeform_relay::config::RelayConfig;
use freeform_relay::telemetry::init_telemetry;

fn main() -> Result<()> {
    let cli = Cli::parse();

    RelayConfig::load_env_file()?;
    let mut config = RelayConfig::load(cli.config.as_deref())?;
    if cli.verbose {
        config.observability.log_level = "debug".to_string();
    }
    init_telemetry(&config.observability)?;

    match cli.command {
        // No subcommand: explain how to use the tool
        None => tokio::runtime::Runtime::new()?.block_on(async { show_how_to_use().await }),
        Some(Commands::Submit {
            variant,
            form_id,
            set,
            check,
            json,
        }) => {
            if let Some(variant) = variant {
                config.form.variant = variant;
            }
            if let Some(form_id) = form_id {
                config.form.form_id = form_id;
            }
            tokio::runtime::Runtime::new()?.block_on(async {
                SubmitCommand::new(config)
                    .with_fields(set)
                    .with_checked(check)
                    .with_json(json)
                    .execute()
                    .await
            })
        }
        Some(Commands::Properties { form_id }) => {
            if let Some(form_id) = form_id {
                config.form.form_id = form_id;
            }
            tokio::runtime::Runtime::new()?
                .block_on(async { PropertiesCommand::new(config).execute().await })
        }
        Some(Commands::Fields { variant }) => {
            let variant = variant.unwrap_or(config.form.variant);
            tokio::runtime::Runtime::new()?
                .block_on(async { FieldsCommand::new(variant).execute().await })
        }
        Some(Commands::Mutation { variant }) => {
            let variant = variant.unwrap_or(config.form.variant);
            tokio::runtime::Runtime::new()?
                .block_on(async { MutationCommand::new(variant).execute().await })
        }
        Some(Commands::Config) => tokio::runtime::Runtime::new()?
            .block_on(async { ConfigCommand::new(config).execute().await }),
    }
}
