use anyhow::Result;

use crate::backend::build_mutation;
use crate::cli::commands::Command;
use crate::form::FormVariant;

pub struct MutationCommand {
    pub variant: FormVariant,
}

impl MutationCommand {
    pub fn new(variant: FormVariant) -> Self {
        Self { variant }
    }
}

impl Command for MutationCommand {
    async fn execute(&self) -> Result<()> {
        print!("{}", build_mutation(&self.variant.schema()));
        Ok(())
    }
}
