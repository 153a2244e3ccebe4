use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

fn gemchat_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_gemchat"))
}

#[test]
fn test_cli_help() {
    gemchat_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Gemini"))
        .stdout(predicate::str::contains("--model"));
}

#[test]
fn test_cli_version() {
    gemchat_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gemchat"));
}

#[test]
fn test_config_where() {
    gemchat_cmd()
        .args(["config", "where"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_ask_without_api_key_fails() {
    let home = tempfile::tempdir().unwrap();
    gemchat_cmd()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env_remove("GEMINI_API_KEY")
        .env_remove("API_KEY")
        .args(["ask", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GEMINI_API_KEY"));
}

#[test]
fn test_ask_requires_text() {
    gemchat_cmd().arg("ask").assert().failure();
}

#[test]
fn test_invalid_temperature_rejected() {
    let home = tempfile::tempdir().unwrap();
    gemchat_cmd()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .args(["--temperature", "5.0", "config", "show"])
        .assert()
        .failure();
}

#[test]
fn test_invalid_subcommand() {
    gemchat_cmd().arg("invalid-command").assert().failure();
}
