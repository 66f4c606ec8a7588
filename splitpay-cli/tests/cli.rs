//! Integration tests for the splitpay binary.
//!
//! These tests run the compiled binary against a temporary storage
//! directory and never touch the network.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn splitpay(storage_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_splitpay"))
        .args(args)
        .env("SPLITPAY_DIR", storage_dir)
        .env("NO_COLOR", "1")
        .env_remove("SPLITPAY_RELAY")
        .output()
        .expect("Failed to execute splitpay")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn help_lists_commands() {
    let temp_dir = TempDir::new().unwrap();
    let output = splitpay(temp_dir.path(), &["--help"]);
    assert!(output.status.success());
    let text = stdout(&output);
    for command in ["classify", "resolve", "wallet", "targets"] {
        assert!(text.contains(command), "help should mention '{command}'");
    }
}

#[test]
fn classify_reports_kinds() {
    let temp_dir = TempDir::new().unwrap();
    let output = splitpay(
        temp_dir.path(),
        &[
            "--json",
            "classify",
            "abc123",
            "user@domain.com",
            "LNURL1DP68GURN8GHJ7",
            "npub1xyz",
        ],
    );
    assert!(output.status.success(), "{}", stderr(&output));

    let kinds: Vec<_> = json(&output)
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["kind"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        kinds,
        ["direct", "email_address", "url_scheme", "public_key"]
    );
}

#[test]
fn wallet_list_empty() {
    let temp_dir = TempDir::new().unwrap();
    let output = splitpay(temp_dir.path(), &["wallet", "list"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("No wallets found"));
}

#[test]
fn targets_set_list_clear() {
    let temp_dir = TempDir::new().unwrap();
    assert!(splitpay(temp_dir.path(), &["wallet", "create", "alice"])
        .status
        .success());

    let created = splitpay(temp_dir.path(), &["--json", "wallet", "create", "bob"]);
    assert!(created.status.success(), "{}", stderr(&created));
    let bob_id = json(&created)["id"].as_str().unwrap().to_string();

    let set = splitpay(
        temp_dir.path(),
        &[
            "--json",
            "targets",
            "set",
            "alice",
            &format!("{bob_id}=40=Bob"),
            "tips@domain.com=10",
        ],
    );
    assert!(set.status.success(), "{}", stderr(&set));
    let targets = json(&set);
    assert_eq!(targets.as_array().unwrap().len(), 2);
    assert_eq!(targets[0]["wallet"], bob_id.as_str());
    assert_eq!(targets[0]["alias"], "Bob");
    assert_eq!(targets[1]["wallet"], "tips@domain.com");

    let listed = splitpay(temp_dir.path(), &["targets", "list", "alice"]);
    assert!(listed.status.success(), "{}", stderr(&listed));
    assert!(stdout(&listed).contains("Allocated: 50%"));

    let cleared = splitpay(temp_dir.path(), &["targets", "clear", "alice", "--yes"]);
    assert!(cleared.status.success(), "{}", stderr(&cleared));

    let listed = splitpay(temp_dir.path(), &["--json", "targets", "list", "alice"]);
    assert_eq!(json(&listed), serde_json::json!([]));
}

#[test]
fn over_allocation_fails_and_keeps_targets() {
    let temp_dir = TempDir::new().unwrap();
    assert!(splitpay(temp_dir.path(), &["wallet", "create", "alice"])
        .status
        .success());
    assert!(
        splitpay(temp_dir.path(), &["targets", "set", "alice", "a@domain.com=30"])
            .status
            .success()
    );

    let rejected = splitpay(
        temp_dir.path(),
        &["targets", "set", "alice", "a@domain.com=60", "b@domain.com=50"],
    );
    assert!(!rejected.status.success());
    assert!(stderr(&rejected).contains("Cannot set targets."));

    let listed = splitpay(temp_dir.path(), &["--json", "targets", "list", "alice"]);
    let targets = json(&listed);
    assert_eq!(targets.as_array().unwrap().len(), 1);
    assert_eq!(targets[0]["percent"], "30");
}

#[test]
fn unknown_source_wallet() {
    let temp_dir = TempDir::new().unwrap();
    let output = splitpay(temp_dir.path(), &["targets", "list", "nobody"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("No wallet 'nobody'"));
}
