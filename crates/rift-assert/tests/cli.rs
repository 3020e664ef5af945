//! Integration tests for the `rift-assert` binary

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

const RESPONSE: &str = r#"
status: 200
headers:
  - name: Content-Type
    value: application/json
  - name: Set-Cookie
    value: SESSION=abc; Path=/
body: '{"order":{"id":42,"items":["a","b"]}}'
"#;

fn file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn rift_assert(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rift-assert"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to run rift-assert")
}

fn check(response: &Path, expectations: &Path) -> Output {
    rift_assert(&[
        "check",
        "--response",
        response.to_str().unwrap(),
        "--expectations",
        expectations.to_str().unwrap(),
        "--output",
        "json",
    ])
}

#[test]
fn test_check_passes() {
    let response = file(".yaml", RESPONSE);
    let expectations = file(
        ".yaml",
        r#"
status: 200
body:
  - path: order.id
    matcher:
      equals: 42
cookies:
  - name: SESSION
    matcher:
      equals: abc
"#,
    );
    let output = check(response.path(), expectations.path());
    assert!(output.status.success());

    let results: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(results.as_array().map(Vec::len), Some(3));
}

#[test]
fn test_check_reports_failures() {
    let response = file(".yaml", RESPONSE);
    let expectations = file(
        ".json",
        r#"{"body": [{"path": "order.items", "matcher": {"hasSize": 3}}]}"#,
    );
    let output = check(response.path(), expectations.path());
    assert_eq!(output.status.code(), Some(1));

    let results: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(results[0]["success"], false);
    assert_eq!(
        results[0]["error_message"],
        "JSON path order.items doesn't match.\nExpected: a collection with size <3>\n  Actual: [\"a\", \"b\"]\n"
    );
}

#[test]
fn test_check_missing_file() {
    let response = file(".yaml", RESPONSE);
    let output = check(response.path(), Path::new("/nonexistent/expectations.yaml"));
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to load expectations"));
}

#[test]
fn test_content_type_command() {
    let output = rift_assert(&["content-type", "application/hal+json; charset=utf-8"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "json");
}
