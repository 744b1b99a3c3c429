//! Tests for the `dgc` binary: exit codes, output streams and formats.

use std::path::Path;
use std::process::{Command, Output};

const GOOD: &str = r#"{
  "classes": [
    { "name": "AppModule", "kind": "object", "module": true,
      "functions": [{ "name": "provideName", "returns": "String", "provides": true }] },
    { "name": "Greeter",
      "constructors": [{ "inject": true, "params": [{ "name": "name", "type": "String" }] }] },
    { "name": "AppComponent", "kind": "interface",
      "functions": [{ "name": "greeter", "returns": "Greeter" }] }
  ],
  "components": [{ "name": "AppComponent", "modules": ["AppModule"] }]
}"#;

const BROKEN: &str = r#"{
  "source": "Broken.kt",
  "classes": [
    { "name": "BrokenComponent", "kind": "interface",
      "functions": [{ "name": "clock", "returns": "Clock", "span": [34, 5] }] }
  ],
  "components": [{ "name": "BrokenComponent" }]
}"#;

const BROKEN_SOURCE: &str = "interface BrokenComponent {\n  fun clock(): Clock\n}\n";

fn dgc(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dgc"))
        .current_dir(dir)
        .args(args)
        .env_remove("DGC_LOG")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run dgc")
}

fn write(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).expect("failed to write test file");
}

#[test]
fn clean_check_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "app.dgc.json", GOOD);

    let output = dgc(dir.path(), &["check", "."]);
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());
    assert!(output.stderr.is_empty());
}

#[test]
fn errors_exit_one_with_rendered_diagnostics() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "app.dgc.json", GOOD);
    write(dir.path(), "broken.dgc.json", BROKEN);
    write(dir.path(), "Broken.kt", BROKEN_SOURCE);

    let output = dgc(dir.path(), &["check", ".", "--pretty", "false"]);
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(
        stderr.contains("Broken.kt:2:7 - error DGC1001: No binding found for 'Clock'."),
        "{stderr}"
    );
    assert!(stderr.contains("fun clock(): Clock"), "{stderr}");
    assert!(stderr.contains("Found 1 error."), "{stderr}");
}

#[test]
fn component_filter_skips_broken_components() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "app.dgc.json", GOOD);
    write(dir.path(), "broken.dgc.json", BROKEN);

    let output = dgc(dir.path(), &["check", ".", "-c", "AppComponent"]);
    assert_eq!(output.status.code(), Some(0));

    let output = dgc(dir.path(), &["check", ".", "-c", "Nope"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("error: unknown component: Nope"), "{stderr}");
}

#[test]
fn graph_goes_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "app.dgc.json", GOOD);

    let output = dgc(dir.path(), &["check", "app.dgc.json", "--graph", "--no-color"]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("AppComponent\n"), "{stdout}");
    assert!(stdout.contains("greeter(): Greeter"), "{stdout}");
    assert!(
        stdout.contains("String <- AppModule.provideName (static_function)"),
        "{stdout}"
    );
}

#[test]
fn json_output_lists_components_and_diagnostics() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "app.dgc.json", GOOD);
    write(dir.path(), "broken.dgc.json", BROKEN);

    let output = dgc(dir.path(), &["check", ".", "--json"]);
    assert_eq!(output.status.code(), Some(1));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let components = json.as_array().unwrap();
    assert_eq!(components.len(), 2);

    let broken = components
        .iter()
        .find(|c| c["graph"]["component"] == "BrokenComponent")
        .unwrap();
    assert_eq!(broken["graph"]["renderable"], false);
    assert_eq!(broken["diagnostics"][0]["code"], 1001);
    assert_eq!(broken["graph"]["endpoints"][0]["unresolved"][0], "Clock");

    let app = components
        .iter()
        .find(|c| c["graph"]["component"] == "AppComponent")
        .unwrap();
    assert_eq!(app["graph"]["renderable"], true);
    assert_eq!(app["diagnostics"].as_array().unwrap().len(), 0);
}

#[test]
fn unreadable_input_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "bad.dgc.json", "{ nope");

    let output = dgc(dir.path(), &["check", "."]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("failed to parse manifest"), "{stderr}");

    let output = dgc(dir.path(), &["check", "missing"]);
    assert_eq!(output.status.code(), Some(2));
}
