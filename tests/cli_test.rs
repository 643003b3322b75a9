//! Command-line tests for the `chatmark` binary.

#![cfg(feature = "cli")]

use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

fn chatmark() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_chatmark"));
    for var in ["CHATMARK_FENCE_CLASS", "CHATMARK_ESCAPE_APOSTROPHE", "CHATMARK_HARD_BREAKS", "RUST_LOG"] {
        cmd.env_remove(var);
    }
    cmd
}

fn run_stdin(cmd: &mut Command, input: &str) -> String {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn chatmark");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(input.as_bytes())
        .expect("write stdin");
    let output = child.wait_with_output().expect("wait");
    assert!(output.status.success());
    String::from_utf8(output.stdout).expect("utf-8 stdout")
}

#[test]
fn test_stdin_to_stdout() {
    let out = run_stdin(&mut chatmark(), "Hello **world**");
    assert_eq!(out, "<p>Hello <strong>world</strong></p>\n");
}

#[test]
fn test_file_to_file_with_flags() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("msg.md");
    let output = dir.path().join("msg.html");
    fs::write(&input, "```js\nlet a;\n```").unwrap();

    let status = chatmark()
        .arg("--fence-class")
        .arg(&input)
        .arg(&output)
        .status()
        .unwrap();
    assert!(status.success());
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "<pre><code class=\"language-js\">let a;</code></pre>"
    );
}

#[test]
fn test_env_enables_option() {
    let out = run_stdin(chatmark().env("CHATMARK_HARD_BREAKS", "1"), "a\nb");
    assert_eq!(out, "<p>a<br>\nb</p>\n");
}

#[test]
fn test_until_stage() {
    let out = run_stdin(chatmark().args(["--until", "headers"]), "# <x>");
    assert_eq!(out, "<h1>&lt;x&gt;</h1>\n");
}

#[test]
fn test_unknown_stage_is_rejected() {
    let output = chatmark()
        .args(["--until", "nope"])
        .stdin(Stdio::null())
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_history_limit() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("messages.json");
    fs::write(
        &input,
        r#"[{"username": "a", "content": "old"}, {"username": "b", "content": "*new*"}]"#,
    )
    .unwrap();

    let output = chatmark()
        .args(["--history", "--limit", "1"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());
    let html = String::from_utf8(output.stdout).unwrap();
    assert!(!html.contains("old"));
    assert!(html.contains("<div class=\"content\"><p><em>new</em></p></div>"));
}

#[test]
fn test_missing_input_fails() {
    let output = chatmark().arg("/definitely/not/here.md").output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("error:"));
}
