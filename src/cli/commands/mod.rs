use anyhow::Result;

pub mod config;
pub mod fields;
pub mod mutation;
pub mod properties;
pub mod submit;

#[allow(async_fn_in_trait)]
pub trait Command {
    async fn execute(&self) -> Result<()>;
}

/// Parse a `name=value` command-line assignment.
pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim().to_string(), value.to_string())),
        _ => Err(format!("expected name=value, got '{raw}'")),
    }
}

pub async fn show_how_to_use() -> Result<()> {
    println!("📝 freeform-relay - Headless Craft Freeform client");
    println!();
    println!("To get started:");
    println!("  📋 freeform-relay fields       # See which fields a form expects");
    println!("  🔐 freeform-relay properties   # Fetch the form's server configuration");
    println!("  🚀 freeform-relay submit --set firstName=Ann ...");
    println!();
    println!("Other commands:");
    println!("  🧬 freeform-relay mutation     # Print the GraphQL mutation");
    println!("  ⚙️  freeform-relay config       # Show the effective configuration");
    println!();
    println!("💡 Settings come from freeform-relay.toml and FREEFORM_RELAY_* environment variables");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("firstName=Ann"),
            Ok(("firstName".to_string(), "Ann".to_string()))
        );
        assert_eq!(
            parse_assignment("message=a=b"),
            Ok(("message".to_string(), "a=b".to_string()))
        );
        assert_eq!(parse_assignment("email="), Ok(("email".to_string(), String::new())));
        assert!(parse_assignment("firstName").is_err());
        assert!(parse_assignment("=Ann").is_err());
    }
}
