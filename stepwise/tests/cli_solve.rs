//! CLI tests for the solve subcommands and `stepwise init`.
//!
//! Spawns the stepwise binary and verifies exit codes and stdout for
//! successful, failing and misconfigured invocations.

use std::fs;
use std::process::{Command, Output};

use stepwise::exit_codes;
use stepwise::io::config::{EngineConfig, load_config};

fn stepwise(dir: &std::path::Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_stepwise"))
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("run stepwise")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn determinant_prints_trace_and_result() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = stepwise(temp.path(), &["determinant", "--matrix", "2 1; 3 4"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let text = stdout(&output);
    assert!(text.contains("Verification:"), "{text}");
    assert!(text.trim_end().ends_with("Result: 5"), "{text}");
}

#[test]
fn negative_inputs_are_accepted_as_values() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = stepwise(temp.path(), &["root", "--radicand", "-27", "--index", "3"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert!(stdout(&output).trim_end().ends_with("Result: -3"));
}

#[test]
fn domain_error_exits_with_solve_failed() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = stepwise(temp.path(), &["power", "--base", "0", "--exponent", "-1"]);
    assert_eq!(output.status.code(), Some(exit_codes::SOLVE_FAILED));
    assert!(stdout(&output).is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Domain"), "{stderr}");
}

#[test]
fn json_output_carries_typed_separator() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = stepwise(temp.path(), &["subtract", "--example", "--json"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(
        json["result"],
        serde_json::json!({"type": "matrix", "value": [[-3.0, -1.0], [1.0, 3.0]]})
    );
    let trace = json["trace"].as_array().expect("trace array");
    assert!(
        trace
            .iter()
            .any(|item| item == &serde_json::json!({"kind": "verification_separator"}))
    );
    assert!(json["error"].is_null());
}

#[test]
fn missing_input_is_a_solve_failure() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = stepwise(temp.path(), &["distance", "--p1", "0 0 0", "--json"]);
    assert_eq!(output.status.code(), Some(exit_codes::SOLVE_FAILED));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(json["error"]["kind"], "parse");
    assert_eq!(json["trace"], serde_json::json!([]));
}

#[test]
fn unknown_flag_is_invalid() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = stepwise(temp.path(), &["determinant", "--bogus"]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
}

#[test]
fn init_writes_default_config_once() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = stepwise(temp.path(), &["init"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let path = temp.path().join("stepwise.toml");
    assert_eq!(load_config(&path).expect("load"), EngineConfig::default());

    fs::write(&path, "decimal_places = 2\n").expect("edit");
    let output = stepwise(temp.path(), &["init"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(load_config(&path).expect("load").decimal_places, 2);

    let output = stepwise(temp.path(), &["init", "--force"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(load_config(&path).expect("load"), EngineConfig::default());
}

#[test]
fn config_controls_rounding() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::write(temp.path().join("stepwise.toml"), "decimal_places = 2\n").expect("config");
    let output = stepwise(temp.path(), &["root", "--radicand", "2", "--index", "2"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert!(stdout(&output).trim_end().ends_with("Result: 1.41"));
}

#[test]
fn invalid_config_is_rejected() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("stepwise.toml");
    fs::write(&path, "max_determinant_size = 0\n").expect("config");
    let output = stepwise(temp.path(), &["determinant", "--example"]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("max_determinant_size"), "{stderr}");
}
