//! CLI Integration Tests
//!
//! Spawns the `scriptbridge` binary and checks what it prints and how it
//! exits.

use std::io::Write;
use std::process::{Command, Output, Stdio};

// ============================================================================
// Test Helpers
// ============================================================================

fn scriptbridge() -> Command {
    Command::new(env!("CARGO_BIN_EXE_scriptbridge"))
}

fn run(args: &[&str]) -> Output {
    scriptbridge().args(args).output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Creates a temporary script file.
fn create_test_script(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".js").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

// ============================================================================
// eval
// ============================================================================

#[test]
fn test_eval_prints_result() {
    let output = run(&["eval", "1 + 2"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "3\n");
}

#[test]
fn test_eval_prints_strings_raw() {
    let output = run(&["eval", "'a' + 'b'"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "ab\n");
}

#[test]
fn test_eval_narrows_numbers() {
    let output = run(&["eval", "9007199254740993"]);
    assert_eq!(stdout(&output), "0\n");
}

#[test]
fn test_eval_object_placeholder() {
    let output = run(&["eval", "({ a: 1 })"]);
    assert_eq!(stdout(&output), "{}\n");
}

#[test]
fn test_eval_exception_exits_nonzero() {
    let output = run(&["eval", "throw new Error('x')"]);
    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("Uncaught Error: x"));
}

#[test]
fn test_eval_syntax_error() {
    let output = run(&["eval", "1 +"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Uncaught SyntaxError"));
}

#[test]
fn test_eval_with_length_hint_truncates() {
    let output = run(&["eval", "--length-hint", "3", "12 + 30"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "12\n");
}

#[test]
fn test_eval_with_bindings() {
    let output = run(&[
        "--set",
        "x=40",
        "--set",
        "cfg={\"step\": 2}",
        "eval",
        "x + cfg.step",
    ]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "42\n");
}

#[test]
fn test_invalid_binding_fails() {
    let output = run(&["--set", "x={oops", "eval", "x"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Invalid JSON"));
}

#[test]
fn test_missing_subcommand_fails() {
    let output = run(&[]);
    assert!(!output.status.success());
}

// ============================================================================
// run
// ============================================================================

#[test]
fn test_run_file() {
    let script = create_test_script(
        r#"
        function fib(n) { return n < 2 ? n : fib(n - 1) + fib(n - 2); }
        fib(10);
        "#,
    );
    let output = run(&["run", script.path().to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "55\n");
}

#[test]
fn test_run_file_sees_bindings() {
    let script = create_test_script("`hello ${name}`");
    let output = run(&["--set", "name=\"bridge\"", "run", script.path().to_str().unwrap()]);
    assert_eq!(stdout(&output), "hello bridge\n");
}

#[test]
fn test_run_missing_file() {
    let output = run(&["run", "/nonexistent/script.js"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Failed to read script"));
}

#[test]
fn test_run_file_exception() {
    let script = create_test_script("undefinedFunction()");
    let output = run(&["run", script.path().to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Uncaught ReferenceError"));
}

// ============================================================================
// repl
// ============================================================================

fn repl(args: &[&str], input: &str) -> Output {
    let mut child = scriptbridge()
        .arg("repl")
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn test_repl_evaluates_lines() {
    let output = repl(&[], "var n = 20\nn + 1\n_ * 2\n.exit\n");
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("21\n"));
    assert!(out.contains("42\n"));
}

#[test]
fn test_repl_custom_prompt() {
    let output = repl(&["--prompt", "js> "], "1\n");
    assert!(stdout(&output).starts_with("js> 1\n"));
}

#[test]
fn test_repl_recovers_after_exception() {
    let output = repl(&[], "throw 'boom'\n'still here'\n");
    let out = stdout(&output);
    assert!(out.contains("Uncaught "));
    assert!(out.contains("boom"));
    assert!(out.contains("still here"));
}

#[test]
fn test_repl_invalid_keyword() {
    let output = repl(&[], ".load x.js\n");
    assert!(stdout(&output).contains("Invalid REPL keyword"));
}

#[test]
fn test_repl_without_last_result() {
    let output = repl(&["--no-last-result"], "5\ntypeof _\n");
    assert!(stdout(&output).contains("undefined\n"));
}
