#![allow(deprecated)]

use assert_cmd::{assert::OutputAssertExt, cargo::CommandCargoExt};
use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

/// `lexi` pointed at a config path inside `dir`, so the user's own config is never read
fn lexi(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("lexi").unwrap();
    cmd.arg("--config").arg(dir.path().join("config.toml"));
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    lexi(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("legal Q&A assistant"))
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn ask_prints_answer_with_citation() {
    let dir = TempDir::new().unwrap();
    lexi(&dir)
        .args(["ask", "Is a self-employed claimant entitled to future prospects?"])
        .args(["--delay-ms", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("future prospects"))
        .stdout(predicate::str::contains("Citations:"))
        .stdout(predicate::str::contains("Dani Devi v. Pritam Singh (P&H)"))
        .stdout(predicate::str::contains("Para 7"));
}

#[test]
fn ask_json_output() {
    let dir = TempDir::new().unwrap();
    let output = lexi(&dir)
        .args(["ask", "future prospects?", "--json", "--delay-ms", "0"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["question"], "future prospects?");
    assert_eq!(value["failed"], false);
    assert_eq!(value["citations"].as_array().unwrap().len(), 1);
    assert_eq!(value["citations"][0]["paragraph"], "Para 7");
    assert_eq!(value["citations"][0]["source"], "Dani Devi v. Pritam Singh (P&H)");
}

#[test]
fn ask_rejects_blank_question() {
    let dir = TempDir::new().unwrap();
    lexi(&dir)
        .args(["ask", "   ", "--delay-ms", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Question is empty"));
}

#[test]
fn ask_reads_delay_from_config_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[assistant]\nbackend = \"simulated\"\nresponse_delay_ms = 0\n",
    )
    .unwrap();

    lexi(&dir)
        .args(["ask", "future prospects?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dani Devi"));
}

#[test]
fn ask_reports_unreachable_endpoint() {
    let dir = TempDir::new().unwrap();
    // Bind then drop a listener so the port is very likely closed
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    lexi(&dir)
        .args(["ask", "future prospects?"])
        .args(["--endpoint", &format!("http://127.0.0.1:{}/answer", port)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not be retrieved"));
}

#[test]
fn invalid_config_file_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[assistant\n").unwrap();

    lexi(&dir)
        .args(["ask", "anything"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config file"));
}

#[test]
fn init_writes_default_config() {
    let dir = TempDir::new().unwrap();
    lexi(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));

    let written = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(written.contains("[assistant]"));
    assert!(written.contains("backend = \"simulated\""));
    assert!(written.contains("theme = \"catppuccin_mocha\""));

    // The written file is accepted by the other commands
    lexi(&dir)
        .args(["ask", "future prospects?", "--delay-ms", "0"])
        .assert()
        .success();
}

#[test]
fn init_keeps_existing_config_without_force() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[assistant\n").unwrap();

    lexi(&dir)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "[assistant\n");

    lexi(&dir).args(["init", "--force"]).assert().success();
    assert!(std::fs::read_to_string(&path).unwrap().contains("[ui]"));
}
