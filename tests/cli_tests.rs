//! Integration tests driving the `side-effects` binary.

use indoc::indoc;
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn side_effects(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_side-effects"))
        .current_dir(dir)
        .args(args)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to execute side-effects")
}

fn json_output(output: &Output) -> Value {
    if !output.status.success() {
        eprintln!("stdout: {}", String::from_utf8_lossy(&output.stdout));
        eprintln!("stderr: {}", String::from_utf8_lossy(&output.stderr));
        panic!("side-effects exited with {:?}", output.status.code());
    }
    serde_json::from_slice(&output.stdout).expect("Output is not valid JSON")
}

fn write(dir: &Path, relative: &str, contents: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

#[test]
fn test_inline_code_json() {
    let dir = TempDir::new().unwrap();
    let output = side_effects(
        dir.path(),
        &["analyze", "--code", "<?php echo unknownFunction($x);", "--format", "json"],
    );

    let json = json_output(&output);
    assert_eq!(
        json,
        serde_json::json!([{
            "source": "<inline>",
            "verdict": "yes",
            "side_effects": ["standard_output", "maybe"]
        }])
    );
}

#[test]
fn test_ignore_output_flag() {
    let dir = TempDir::new().unwrap();
    let output = side_effects(
        dir.path(),
        &["analyze", "--code", "<?php echo 'x';", "--ignore-output", "--format", "json"],
    );

    let json = json_output(&output);
    assert_eq!(json[0]["verdict"], "no");
    assert_eq!(json[0]["side_effects"], serde_json::json!([]));
}

#[test]
fn test_directory_analysis_with_phpt_sections() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "tests/locale.phpt",
        indoc! {r#"
            --TEST--
            locale
            --SKIPIF--
            <?php if (setlocale(LC_ALL, 'invalid') === 'invalid') { echo 'skip'; } ?>
            --FILE--
            <?php exit(1); ?>
        "#},
    );
    write(
        dir.path(),
        "tests/plain.phpt",
        "--TEST--\nno skipif\n--FILE--\n<?php echo 1;\n",
    );
    write(dir.path(), "src/pure.php", "<?php $x = strlen('abc');\n");
    write(dir.path(), "vendor/lib.php", "<?php exit(1);\n");
    write(dir.path(), ".side-effects.toml", "ignore = [\"vendor/**\"]\n");

    let output = side_effects(dir.path(), &["analyze", ".", "--format", "json"]);
    let json = json_output(&output);
    let units = json.as_array().unwrap();

    assert_eq!(units.len(), 2, "{:#}", json);
    let locale = units
        .iter()
        .find(|u| u["source"].as_str().unwrap().ends_with("locale.phpt"))
        .unwrap();
    assert_eq!(locale["section"], "SKIPIF");
    assert_eq!(
        locale["side_effects"],
        serde_json::json!(["scope_pollution", "standard_output"])
    );

    let pure = units
        .iter()
        .find(|u| u["source"].as_str().unwrap().ends_with("pure.php"))
        .unwrap();
    assert_eq!(pure["verdict"], "no");
}

#[test]
fn test_fail_on_sets_exit_status() {
    let dir = TempDir::new().unwrap();
    let with_threshold = |threshold: &'static str| {
        vec![
            "analyze",
            "--code",
            "<?php unknownFunction();",
            "--format",
            "json",
            "--fail-on",
            threshold,
        ]
    };

    let passing = side_effects(dir.path(), &with_threshold("yes"));
    assert!(passing.status.success());

    let failing = side_effects(dir.path(), &with_threshold("unknown"));
    assert_eq!(failing.status.code(), Some(1));
}

#[test]
fn test_stdin_input() {
    let dir = TempDir::new().unwrap();
    let mut child = Command::new(env!("CARGO_BIN_EXE_side-effects"))
        .current_dir(dir.path())
        .args(["analyze", "-", "--format", "json"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn side-effects");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"<?php exit(0);")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    let json = json_output(&output);
    assert_eq!(json[0]["source"], "<stdin>");
    assert_eq!(json[0]["side_effects"], serde_json::json!(["process_exit"]));
}

#[test]
fn test_terminal_output() {
    let dir = TempDir::new().unwrap();
    let output = side_effects(dir.path(), &["analyze", "--code", "<?php exit;", "--plain"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Side Effects Report"));
    assert!(stdout.contains("<inline>"));
    assert!(stdout.contains("process_exit"));
}

#[test]
fn test_invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), ".side-effects.toml", "phpt_section = 3\n");

    let output = side_effects(dir.path(), &["analyze", "--code", "<?php"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Configuration error"), "{}", stderr);
}

#[test]
fn test_init_creates_and_protects_config() {
    let dir = TempDir::new().unwrap();

    let first = side_effects(dir.path(), &["init"]);
    assert!(first.status.success());
    assert!(dir.path().join(".side-effects.toml").exists());

    let second = side_effects(dir.path(), &["init"]);
    assert!(!second.status.success());

    let forced = side_effects(dir.path(), &["init", "--force"]);
    assert!(forced.status.success());
}
