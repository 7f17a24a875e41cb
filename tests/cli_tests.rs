use std::io::Write;
use std::process::{Command, Output, Stdio};

fn boi(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_boi"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(stdin.as_bytes()).unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn runs_a_script_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hello.boi");
    std::fs::write(&path, "boi, [dec [int 40 2]] boi\n").unwrap();

    let output = boi(&[path.to_str().unwrap()], "");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "42\n");
}

#[test]
fn failing_script_exits_nonzero_with_a_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.boi");
    std::fs::write(&path, "boi, before boi\nboi! nope boi\n").unwrap();

    let output = boi(&[path.to_str().unwrap()], "");

    assert!(!output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "before\n");
    assert!(String::from_utf8_lossy(&output.stderr).contains("nope"));
}

#[test]
fn reads_the_script_from_stdin() {
    let output = boi(&["-"], "boi, from stdin boi");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "fromstdin\n");
}

#[test]
fn repl_keeps_state_between_lines() {
    let output = boi(&["-i"], "boi: x 5 boi\nboi! nope boi\nboi, boi:x boi\nexit\n");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("> 5\n"), "stdout was: {}", stdout);
    assert!(stdout.contains("Goodbye!"));
}

#[test]
fn missing_file_fails() {
    let output = boi(&["/definitely/not/here.boi"], "");
    assert!(!output.status.success());
}
