use anyhow::Result;

use crate::cli::commands::Command;
use crate::form::{FieldKind, FormVariant};

pub struct FieldsCommand {
    pub variant: FormVariant,
}

impl FieldsCommand {
    pub fn new(variant: FormVariant) -> Self {
        Self { variant }
    }
}

impl Command for FieldsCommand {
    async fn execute(&self) -> Result<()> {
        let schema = self.variant.schema();

        println!("📋 Fields of the {} form (* = required):", self.variant);
        for spec in &schema.fields {
            let kind = match spec.kind {
                FieldKind::Text => "text",
                FieldKind::Email => "email",
                FieldKind::List => "multi-select (--check)",
                FieldKind::DateTime => "date/time",
            };
            let marker = if spec.required { "*" } else { " " };
            println!("   {marker} {:<36} {kind}", spec.name);
        }
        Ok(())
    }
}
