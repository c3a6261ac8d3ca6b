//! Integration tests for the sgate binary
//!
//! Runs `sgate` against a gate config in a temp directory and checks the
//! exit codes and the redirect / section lines it prints.

use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

const SGATE: &str = env!("CARGO_BIN_EXE_sgate");

fn write_config(temp: &TempDir) -> String {
    let config_path = temp.path().join("gate.yaml");
    fs::write(
        &config_path,
        r#"
apiVersion: schoolgate/v1
kind: GateConfig
metadata:
  name: cli-test
spec:
  store:
    kind: memory
    users:
      u1: [system_settings, users_manage]
      u2: [blog_manage]
"#,
    )
    .unwrap();
    config_path.to_string_lossy().to_string()
}

fn sgate(args: &[&str]) -> Output {
    let output = Command::new(SGATE)
        .args(args)
        .env("NO_COLOR", "1")
        .env("CLICOLOR", "0")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run sgate");

    if !output.status.success() {
        eprintln!("STDOUT:\n{}", String::from_utf8_lossy(&output.stdout));
        eprintln!("STDERR:\n{}", String::from_utf8_lossy(&output.stderr));
    }
    output
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn redirect_line(output: &Output) -> Option<String> {
    stdout(output)
        .lines()
        .find(|line| line.contains("redirect"))
        .map(|line| line.trim().to_string())
}

#[test]
fn test_check_granted_exits_zero() {
    let temp = TempDir::new().unwrap();
    let config = write_config(&temp);

    let output = sgate(&["check", "-c", &config, "-u", "u1", "-p", "system_settings"]);

    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert!(out.contains("granted"), "stdout: {}", out);
    assert!(!out.contains("denied"));
    assert!(out.contains("page rendered"));
    assert_eq!(redirect_line(&output), None);
}

#[test]
fn test_check_unauthorized_exits_two_and_redirects() {
    let temp = TempDir::new().unwrap();
    let config = write_config(&temp);

    let output = sgate(&["check", "-c", &config, "-u", "u2", "-p", "users_manage"]);

    assert_eq!(output.status.code(), Some(2));
    let line = redirect_line(&output).expect("expected a redirect line");
    assert!(line.ends_with("/unauthorized"), "redirect line: {}", line);
}

#[test]
fn test_check_signed_out_redirects_to_public_root() {
    let temp = TempDir::new().unwrap();
    let config = write_config(&temp);

    let output = sgate(&[
        "check",
        "-c",
        &config,
        "--status",
        "unauthenticated",
        "-p",
        "blog_manage",
    ]);

    assert_eq!(output.status.code(), Some(2));
    let line = redirect_line(&output).expect("expected a redirect line");
    assert!(line.ends_with(" /"), "redirect line: {}", line);
}

#[test]
fn test_check_loading_exits_three() {
    let temp = TempDir::new().unwrap();
    let config = write_config(&temp);

    let output = sgate(&[
        "check", "-c", &config, "-u", "u1", "--status", "loading", "-p", "users_manage",
    ]);

    assert_eq!(output.status.code(), Some(3));
    assert!(stdout(&output).contains("loading indicator"));
    assert_eq!(redirect_line(&output), None);
}

#[test]
fn test_check_missing_permission_denies() {
    let temp = TempDir::new().unwrap();
    let config = write_config(&temp);

    let output = sgate(&["check", "-c", &config, "-u", "u1"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).contains("no_permission_required"));
}

#[test]
fn test_soft_check_shows_or_omits_section() {
    let temp = TempDir::new().unwrap();
    let config = write_config(&temp);

    let shown = sgate(&["check", "-c", &config, "-u", "u2", "-p", "blog_manage", "--soft"]);
    assert_eq!(shown.status.code(), Some(0));
    assert!(stdout(&shown).contains("section rendered"));

    let omitted = sgate(&[
        "check", "-c", &config, "-u", "u2", "-p", "payments_view", "--soft",
    ]);
    assert_eq!(omitted.status.code(), Some(2));
    assert!(stdout(&omitted).contains("section omitted"));
    assert_eq!(redirect_line(&omitted), None);
}

#[test]
fn test_check_rejects_unknown_permission() {
    let output = sgate(&["check", "-u", "u1", "-p", "system_setings"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("system_setings"));
}

#[test]
fn test_permissions_lists_vocabulary() {
    let output = sgate(&["permissions"]);
    assert!(output.status.success());
    let out = stdout(&output);
    for name in ["system_settings", "users_manage", "payments_view"] {
        assert!(out.contains(name), "missing {}", name);
    }
}

#[test]
fn test_validate_config() {
    let temp = TempDir::new().unwrap();
    let config = write_config(&temp);
    assert!(sgate(&["validate-config", &config]).status.success());

    let bad = temp.path().join("bad.yaml");
    fs::write(
        &bad,
        "apiVersion: schoolgate/v1\nkind: GateConfig\nmetadata:\n  name: x\nspec:\n  redirects:\n    publicRoot: //evil.example\n",
    )
    .unwrap();
    assert!(!sgate(&["validate-config", &bad.to_string_lossy()]).status.success());
}
