//! Integration tests for CLI commands.
//!
//! Every test initializes a fresh project with the demo catalog:
//! 1 Python Basics (basic, 09:00-18:00), 2 Flask Advanced (premium, always),
//! 3 SQL Database (basic, 09:00-20:00), and two global rules, premium-access
//! then active-account.

#![allow(deprecated)] // Command::cargo_bin is deprecated but replacement requires newer assert_cmd

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn portcullis(project: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("portcullis").unwrap();
    cmd.args(["--no-color", "--project", project.path().to_str().unwrap()]);
    cmd
}

fn demo_project() -> TempDir {
    let temp = TempDir::new().unwrap();
    portcullis(&temp).arg("init").assert().success();
    temp
}

// ============================================================================
// Init
// ============================================================================

#[test]
fn init_writes_demo_catalog() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("portal");

    Command::cargo_bin("portcullis")
        .unwrap()
        .args(["--no-color", "init", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote portcullis.toml"));

    let written = fs::read_to_string(path.join("portcullis.toml")).unwrap();
    assert!(written.contains("Python Basics"));
    assert!(written.contains("Flask Advanced"));
    assert!(written.contains("SQL Database"));

    let gitignore = fs::read_to_string(path.join(".gitignore")).unwrap();
    assert!(gitignore.contains("portcullis.local.toml"));
}

#[test]
fn init_refuses_to_overwrite_without_force() {
    let project = demo_project();

    portcullis(&project)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));

    portcullis(&project).args(["init", "--force"]).assert().success();
}

// ============================================================================
// Check
// ============================================================================

#[test]
fn check_grants_basic_resource_in_window() {
    let project = demo_project();

    portcullis(&project)
        .args(["check", "--resource", "1", "--status", "active", "--tier", "basic"])
        .args(["--at", "10:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ALLOW access granted"));
}

#[test]
fn check_denies_premium_resource_to_basic_subject() {
    let project = demo_project();

    portcullis(&project)
        .args(["check", "--resource", "Flask Advanced", "--status", "active"])
        .args(["--tier", "basic", "--at", "12:00"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("premium subscription required"));
}

#[test]
fn check_denies_frozen_account_before_tier() {
    let project = demo_project();

    portcullis(&project)
        .args(["check", "--resource", "2", "--status", "frozen", "--tier", "premium"])
        .args(["--at", "12:00"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("account not active"));
}

#[test]
fn check_denies_outside_window() {
    let project = demo_project();

    portcullis(&project)
        .args(["check", "--resource", "python basics", "--status", "active"])
        .args(["--tier", "basic", "--at", "20:00"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains(
            "resource available from 09:00 to 18:00",
        ));
}

#[test]
fn check_window_end_is_inclusive() {
    let project = demo_project();

    portcullis(&project)
        .args(["check", "--resource", "1", "--status", "active", "--tier", "basic"])
        .args(["--at", "18:00"])
        .assert()
        .success();

    portcullis(&project)
        .args(["check", "--resource", "1", "--status", "active", "--tier", "basic"])
        .args(["--at", "18:00:01"])
        .assert()
        .code(2);
}

#[test]
fn check_records_client_ip() {
    let project = demo_project();

    portcullis(&project)
        .args(["check", "--resource", "2", "--status", "active", "--tier", "premium"])
        .args(["--client-ip", "203.0.113.7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("203.0.113.7"));
}

#[test]
fn check_unknown_resource_is_an_error() {
    let project = demo_project();

    portcullis(&project)
        .args(["check", "--resource", "Rust Basics", "--status", "active", "--tier", "basic"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown resource 'Rust Basics'"));
}

#[test]
fn check_malformed_window_is_an_error_not_a_denial() {
    let project = demo_project();
    let config_path = project.path().join("portcullis.toml");
    let content = fs::read_to_string(&config_path)
        .unwrap()
        .replace("09:00-20:00", "9am-8pm");
    fs::write(&config_path, content).unwrap();

    // Even a frozen account, which the status gate would deny, surfaces the error.
    portcullis(&project)
        .args(["check", "--resource", "3", "--status", "frozen", "--tier", "basic"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("misconfigured"));
}

#[test]
fn check_with_rules_runs_configured_rules() {
    let project = demo_project();
    fs::write(
        project.path().join("portcullis.local.toml"),
        r#"
[[rules]]
name = "no-sql-for-basic"
attribute = "subscription_tier"
operator = "=="
value = "premium"
resource = 3
"#,
    )
    .unwrap();

    portcullis(&project)
        .args(["check", "--resource", "3", "--status", "active", "--tier", "basic"])
        .args(["--at", "12:00"])
        .assert()
        .success();

    portcullis(&project)
        .args(["check", "--resource", "3", "--status", "active", "--tier", "basic"])
        .args(["--at", "12:00", "--with-rules"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains(
            "policy 'no-sql-for-basic' not satisfied",
        ));
}

// ============================================================================
// List
// ============================================================================

#[test]
fn list_shows_only_accessible_resources() {
    let project = demo_project();

    portcullis(&project)
        .args(["list", "--status", "active", "--tier", "basic", "--at", "19:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SQL Database"))
        .stdout(predicate::str::contains("Python Basics").not())
        .stdout(predicate::str::contains("(1 resource)"));
}

#[test]
fn list_at_night_for_basic_subject_is_empty() {
    let project = demo_project();

    portcullis(&project)
        .args(["list", "--status", "active", "--tier", "basic", "--at", "23:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No accessible resources."));
}

#[test]
fn list_all_includes_denial_reasons() {
    let project = demo_project();

    portcullis(&project)
        .args(["list", "--status", "active", "--tier", "basic", "--at", "23:00", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("premium subscription required"))
        .stdout(predicate::str::contains("(3 resources)"));
}

// ============================================================================
// Rules
// ============================================================================

#[test]
fn rules_premium_rule_denies_basic_subject_everywhere() {
    let project = demo_project();

    portcullis(&project)
        .args(["rules", "--resource", "1", "--status", "active", "--tier", "basic"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains(
            "policy 'premium-access' not satisfied",
        ));

    portcullis(&project)
        .args(["rules", "--resource", "2", "--status", "active", "--tier", "basic"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("premium-access"))
        .stdout(predicate::str::contains(
            "policy 'premium-access' not satisfied",
        ));
}

#[test]
fn rules_global_rule_denies_suspended_subject() {
    let project = demo_project();

    portcullis(&project)
        .args(["rules", "--resource", "1", "--status", "suspended", "--tier", "premium"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains(
            "policy 'active-account' not satisfied",
        ));
}

#[test]
fn rules_all_holding_allow() {
    let project = demo_project();

    portcullis(&project)
        .args(["rules", "--resource", "1", "--status", "active", "--tier", "premium"])
        .assert()
        .success()
        .stdout(predicate::str::contains("access granted"));
}

#[test]
fn rules_invalid_rule_is_an_error_even_after_a_denial() {
    let project = demo_project();
    fs::write(
        project.path().join("portcullis.local.toml"),
        r#"
[[rules]]
name = "premium-access"
attribute = "subscription_tier"
operator = "=="
value = "premium"

[[rules]]
name = "geo"
attribute = "country"
operator = "=="
value = "US"
"#,
    )
    .unwrap();

    portcullis(&project)
        .args(["rules", "--resource", "1", "--status", "active", "--tier", "basic"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown attribute 'country'"));
}

#[test]
fn rules_on_client_ip_use_the_recorded_address() {
    let project = demo_project();
    fs::write(
        project.path().join("portcullis.local.toml"),
        r#"
[[rules]]
name = "office-network"
attribute = "client_ip"
operator = "=="
value = "10.0.0.1"
"#,
    )
    .unwrap();

    portcullis(&project)
        .args(["rules", "--resource", "2", "--status", "active", "--tier", "basic"])
        .args(["--client-ip", "10.0.0.1"])
        .assert()
        .success();

    portcullis(&project)
        .args(["check", "--resource", "2", "--status", "active", "--tier", "premium"])
        .args(["--with-rules", "--client-ip", "203.0.113.7"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains(
            "policy 'office-network' not satisfied",
        ));

    portcullis(&project)
        .args(["rules", "--resource", "2", "--status", "active", "--tier", "basic"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("requires an access context"));
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn config_show_text() {
    let project = demo_project();

    portcullis(&project)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("learning-portal"))
        .stdout(predicate::str::contains("wrap"));
}

#[test]
fn config_show_json() {
    let project = demo_project();

    portcullis(&project)
        .args(["config", "show", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Python Basics\""))
        .stdout(predicate::str::contains(
            "\"description\": \"Python fundamentals\"",
        ));
}

#[test]
fn config_show_toml() {
    let project = demo_project();

    portcullis(&project)
        .args(["config", "show", "--format", "toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[[resources]]"));
}

#[test]
fn config_show_rejects_unknown_format() {
    let project = demo_project();

    portcullis(&project)
        .args(["config", "show", "--format", "yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown format 'yaml'"));
}

#[test]
fn config_validate_accepts_demo_catalog() {
    let project = demo_project();

    portcullis(&project)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn config_validate_honors_env_override() {
    let project = demo_project();
    let config_path = project.path().join("portcullis.toml");
    let content = fs::read_to_string(&config_path)
        .unwrap()
        .replace("09:00-20:00", "22:00-06:00");
    fs::write(&config_path, content).unwrap();

    portcullis(&project).args(["config", "validate"]).assert().success();

    portcullis(&project)
        .env("PORTCULLIS_EVALUATOR__OVERNIGHT_WINDOWS", "reject")
        .args(["config", "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("SQL Database"));
}

#[test]
fn config_validate_reports_unknown_rule_attribute() {
    let project = demo_project();
    fs::write(
        project.path().join("portcullis.local.toml"),
        r#"
[[rules]]
name = "shoe-size"
attribute = "shoe_size"
operator = ">="
value = "42"
"#,
    )
    .unwrap();

    portcullis(&project)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("shoe-size"));
}
