//! CLI integration tests for nrextract.
//!
//! These run the built binary against the headers in `tests/fixtures`.

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn nrextract_bin() -> String {
    env!("CARGO_BIN_EXE_nrextract").to_string()
}

fn fixture_path(name: &str) -> String {
    format!("tests/fixtures/{}", name)
}

fn run_nrextract(args: &[&str]) -> Output {
    Command::new(nrextract_bin())
        .args(args)
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .output()
        .expect("Failed to execute nrextract")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// =============================================================================
// Usage
// =============================================================================

#[test]
fn test_help() {
    let output = run_nrextract(&["--help"]);
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("--strict"), "Help should show --strict");
    assert!(stdout.contains("--table"), "Help should show --table");
}

#[test]
fn test_missing_arguments_is_usage_error() {
    let output = run_nrextract(&["v6.1", "arm64"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stdout_of(&output).is_empty());
}

#[test]
fn test_missing_file_fails() {
    let output = run_nrextract(&["v6.1", "arm64", &fixture_path("does_not_exist.h")]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("does_not_exist.h"));
}

// =============================================================================
// Extraction
// =============================================================================

#[test]
fn test_generic_header() {
    let output = run_nrextract(&["v6.1", "arm64", &fixture_path("generic_unistd.h")]);
    assert!(output.status.success());
    assert_eq!(
        stdout_of(&output),
        "v6.1,arm64,io_setup,0\n\
         v6.1,arm64,io_destroy,1\n\
         v6.1,arm64,read,63\n\
         v6.1,arm64,write,64\n\
         v6.1,arm64,syscalls,451\n\
         v6.1,arm64,fcntl,25\n\
         v6.1,arm64,riscv_flush_icache,259\n\
         v6.1,arm64,lseek,62\n"
    );
    assert!(stderr_of(&output).is_empty(), "{}", stderr_of(&output));
}

#[test]
fn test_base_offsets_and_foreign_macros() {
    let output = run_nrextract(&["v4.19", "arm", &fixture_path("arm_unistd.h")]);
    assert!(output.status.success());
    assert_eq!(
        stdout_of(&output),
        "v4.19,arm,restart_syscall,0\nv4.19,arm,exit,1\nv4.19,arm,fork,2\n"
    );
    let stderr = stderr_of(&output);
    assert!(stderr.contains("extraction error in tests/fixtures/arm_unistd.h:8"));
    assert!(stderr.contains("__ARM_NR_BASE + 1"));
}

#[test]
fn test_forward_references_and_redefinition() {
    let output = run_nrextract(&["t", "a", &fixture_path("forward_refs.h")]);
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "t,a,a,5\nt,a,b,7\nt,a,c,10\nt,a,x,2\n");
    let stderr = stderr_of(&output);
    assert_eq!(stderr.matches("WARNING").count(), 1);
    assert!(stderr.contains("__NR_x was defined as 1, redefined as 2"));
}

#[test]
fn test_quiet_hides_redefinitions() {
    let output = run_nrextract(&["t", "a", "-q", &fixture_path("forward_refs.h")]);
    assert!(output.status.success());
    assert!(!stderr_of(&output).contains("WARNING"));
}

#[test]
fn test_broken_header_is_best_effort() {
    let output = run_nrextract(&["t", "a", &fixture_path("broken.h")]);
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "t,a,good,8\n");
    let stderr = stderr_of(&output);
    assert!(stderr.contains("broken.h:1: could not process \"some_garbage\""));
    assert!(stderr.contains("__NR_never_defined had 2 definitions pending"));
    assert_eq!(stderr.matches("__NR_lost = __NR_never_defined + 4").count(), 1);
    assert_eq!(stderr.matches("__NR_also_lost = __NR_never_defined\n").count(), 1);
}

#[test]
fn test_latin1_comments_are_skipped() {
    let output = run_nrextract(&["t", "a", &fixture_path("latin1_comments.h")]);
    assert!(output.status.success(), "{}", stderr_of(&output));
    assert_eq!(stdout_of(&output), "t,a,read,63\nt,a,write,64\n");
    assert!(stderr_of(&output).is_empty(), "{}", stderr_of(&output));
}

#[test]
fn test_strict_fails_on_pending() {
    let output = run_nrextract(&["t", "a", "--strict", &fixture_path("broken.h")]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout_of(&output), "t,a,good,8\n");

    let output = run_nrextract(&["t", "a", "--strict", &fixture_path("forward_refs.h")]);
    assert!(output.status.success());
}

// =============================================================================
// Output modes
// =============================================================================

#[test]
fn test_table_output() {
    let output = run_nrextract(&["t", "a", "--table", &fixture_path("forward_refs.h")]);
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("syscall"));
    assert!(stdout.contains("number"));
    assert!(!stdout.contains("t,a,"));
}

#[test]
fn test_stdin_input() {
    let mut child = Command::new(nrextract_bin())
        .args(["t", "a", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn nrextract");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"#define __NR3264_foo 9\n#define __NR_bar (__NR3264_foo + 1)\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "t,a,bar,10\nt,a,foo,9\n");
}

#[test]
fn test_output_file() {
    let path = std::env::temp_dir().join(format!("nrextract-{}.csv", std::process::id()));
    let path_arg = path.to_string_lossy().into_owned();
    let output = run_nrextract(&["t", "a", "-o", &path_arg, &fixture_path("forward_refs.h")]);
    assert!(output.status.success());
    assert!(stdout_of(&output).is_empty());
    let written = std::fs::read_to_string(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(written, "t,a,a,5\nt,a,b,7\nt,a,c,10\nt,a,x,2\n");
}
