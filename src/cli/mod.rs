use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::form::FormVariant;

pub mod commands;

#[derive(Parser)]
#[command(name = "freeform-relay")]
#[command(about = "Headless client for Craft Freeform forms")]
#[command(long_about = "freeform-relay loads a Freeform form's configuration, collects field values, \
                       obtains a CAPTCHA challenge token and submits everything as one GraphQL mutation. \
                       Get started with 'freeform-relay fields' to see what a form expects.")]
pub struct Cli {
    /// Configuration file (defaults to ./freeform-relay.toml when present)
    #[arg(long, global = true, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true, help = "Log at debug level")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fill in a form and submit it
    Submit {
        /// Form variant to submit
        #[arg(long, help = "Form variant: contact or quote")]
        variant: Option<FormVariant>,
        /// Freeform form ID
        #[arg(long, help = "Override the configured Freeform form ID")]
        form_id: Option<u32>,
        /// Field values as name=value
        #[arg(long = "set", value_parser = commands::parse_assignment, help = "Set a field, e.g. --set firstName=Ann")]
        set: Vec<(String, String)>,
        /// Checked members of multi-select fields as name=value
        #[arg(long = "check", value_parser = commands::parse_assignment, help = "Check a multi-select option, e.g. --check howDidYouHearAboutThisJobPosting=Radio")]
        check: Vec<(String, String)>,
        /// Print the resulting view as JSON
        #[arg(long, help = "Print the final form view as JSON")]
        json: bool,
    },
    /// Fetch and display a form's server-side configuration
    Properties {
        /// Freeform form ID
        #[arg(long, help = "Override the configured Freeform form ID")]
        form_id: Option<u32>,
    },
    /// List the fields of a form variant
    Fields {
        /// Form variant to describe
        #[arg(long, help = "Form variant: contact or quote")]
        variant: Option<FormVariant>,
    },
    /// Print the GraphQL mutation a form variant submits
    Mutation {
        /// Form variant to render
        #[arg(long, help = "Form variant: contact or quote")]
        variant: Option<FormVariant>,
    },
    /// Print the effective configuration
    Config,
}
