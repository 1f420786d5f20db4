//! End-to-end tests for the `stacker` binary

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

fn stacker_cmd() -> Command {
    Command::cargo_bin("stacker").unwrap()
}

fn write_program(dir: &TempDir, name: &str, source: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, source).unwrap();
    path
}

#[test]
fn runs_program_and_prints_output() {
    let dir = TempDir::new().unwrap();
    let path = write_program(&dir, "add.bc", "push 3\npush 4\nadd\nprint\nend\n");

    stacker_cmd()
        .arg(&path)
        .assert()
        .success()
        .stdout("7\n");
}

#[test]
fn defaults_to_test_bc_in_working_directory() {
    let dir = TempDir::new().unwrap();
    write_program(&dir, "test.bc", "push 'hi'\nprint\nend\n");

    stacker_cmd()
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout("hi\n");
}

#[test]
fn runtime_error_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let path = write_program(&dir, "div.bc", "push 6\npush 0\ndiv\nend\n");

    stacker_cmd()
        .arg(&path)
        .assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("division by zero"))
        .stderr(predicate::str::contains("line 3"));
}

#[test]
fn parse_error_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let path = write_program(&dir, "bad.bc", "push 1.2.3\nend\n");

    stacker_cmd()
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed literal `1.2.3`"));
}

#[test]
fn missing_file_is_reported() {
    let dir = TempDir::new().unwrap();

    stacker_cmd()
        .arg(dir.path().join("nope.bc"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load"));
}

#[test]
fn time_flag_reports_elapsed() {
    let dir = TempDir::new().unwrap();
    let path = write_program(&dir, "t.bc", "push 1\nprint\nend\n");

    stacker_cmd()
        .arg(&path)
        .arg("--time")
        .assert()
        .success()
        .stdout("1\n")
        .stderr(predicate::str::contains("elapsed:"));
}

#[test]
fn check_flag_parses_only() {
    let dir = TempDir::new().unwrap();
    // would divide by zero if executed
    let path = write_program(&dir, "c.bc", "push 1\npush 0\ndiv\nend\n");

    stacker_cmd()
        .arg(&path)
        .arg("--check")
        .assert()
        .success()
        .stdout(predicate::str::contains("4 instructions"));
}

#[test]
fn debug_flag_dumps_state() {
    let dir = TempDir::new().unwrap();
    let path = write_program(&dir, "d.bc", "push 10\nstore x\nfetch x\nprint\nend\n");

    stacker_cmd()
        .arg(&path)
        .arg("--debug")
        .assert()
        .success()
        .stdout("10\n")
        .stderr(predicate::str::contains("STACK"))
        .stderr(predicate::str::contains("HEAP  [x = Integer(10)]"))
        .stderr(predicate::str::contains("NEXT     4  end"));
}

#[test]
fn max_steps_stops_infinite_loop() {
    let dir = TempDir::new().unwrap();
    let path = write_program(&dir, "loop.bc", "jump 0\n");

    stacker_cmd()
        .arg(&path)
        .args(["--max-steps", "50"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("step limit of 50"));
}

#[test]
fn deep_stack_runs_without_a_cap() {
    let dir = TempDir::new().unwrap();
    let mut source: String = (0..2000).map(|i| format!("push {}\n", i)).collect();
    source.push_str("print\nend\n");
    let path = write_program(&dir, "deep.bc", &source);

    stacker_cmd()
        .arg(&path)
        .env_remove("STACKER_MAX_STACK")
        .assert()
        .success()
        .stdout("1999\n");
}

#[test]
fn max_stack_from_environment() {
    let dir = TempDir::new().unwrap();
    let path = write_program(&dir, "deep.bc", "push 1\npush 2\npush 3\nend\n");

    stacker_cmd()
        .arg(&path)
        .env("STACKER_MAX_STACK", "2")
        .assert()
        .failure()
        .stderr(predicate::str::contains("stack overflow"));
}
