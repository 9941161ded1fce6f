// CLI behavior tests for the freeform-relay binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn relay(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("freeform-relay").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env_remove("FREEFORM_RELAY_FORM__VARIANT")
        .env_remove("FREEFORM_RELAY_FORM__FORM_ID");
    cmd
}

#[test]
fn test_no_subcommand_shows_usage_guidance() {
    let dir = TempDir::new().unwrap();

    relay(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("freeform-relay fields"))
        .stdout(predicate::str::contains("freeform-relay submit"));
}

#[test]
fn test_help_lists_subcommands() {
    let dir = TempDir::new().unwrap();

    relay(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("submit"))
        .stdout(predicate::str::contains("properties"))
        .stdout(predicate::str::contains("mutation"));
}

#[test]
fn test_fields_marks_required_quote_fields() {
    let dir = TempDir::new().unwrap();

    relay(&dir)
        .args(["fields", "--variant", "quote"])
        .assert()
        .success()
        .stdout(predicate::str::contains("quote form"))
        .stdout(predicate::str::contains("* cellPhone"))
        .stdout(predicate::str::contains("appointmentDate"));
}

#[test]
fn test_mutation_prints_graphql_document() {
    let dir = TempDir::new().unwrap();

    relay(&dir)
        .args(["mutation", "--variant", "contact"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("mutation SaveContactSubmission("))
        .stdout(predicate::str::contains("save_contact_Submission("));
}

#[test]
fn test_config_file_sets_default_variant() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("freeform-relay.toml"),
        "[form]\nform_id = 8\nvariant = \"quote\"\n\n[captcha]\ntoken = \"secret-token\"\n",
    )
    .unwrap();

    relay(&dir)
        .arg("mutation")
        .assert()
        .success()
        .stdout(predicate::str::contains("SaveQuoteSubmission"));

    relay(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("form_id = 8"))
        .stdout(predicate::str::contains("<redacted>"))
        .stdout(predicate::str::contains("secret-token").not());
}

#[test]
fn test_malformed_assignment_is_rejected() {
    let dir = TempDir::new().unwrap();

    relay(&dir)
        .args(["submit", "--set", "firstName"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected name=value"));
}
