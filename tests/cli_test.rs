mod common;

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

use common::{ComposePage, NOTE};
use typewell::Tab;

/// Run the binary with its config dir inside `home`
fn typewell(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_typewell"))
        .args(args)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .output()
        .expect("Failed to run typewell")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[test]
fn test_tones_lists_every_tone() {
    let home = TempDir::new().unwrap();
    let output = typewell(home.path(), &["tones"]);
    assert!(output.status.success());

    let listing = stdout(&output);
    for id in ["professional", "friendly", "concise", "fix"] {
        assert!(listing.contains(id), "missing {id} in {listing}");
    }
    assert!(listing.contains("Fix Grammar"));
}

#[test]
fn test_offline_rewrite_prints_fallback() {
    let home = TempDir::new().unwrap();
    let output = typewell(
        home.path(),
        &["rewrite", "--offline", "--tone", "concise", "this is just fine"],
    );
    assert!(output.status.success());
    assert_eq!(stdout(&output), "This is fine.");
}

#[test]
fn test_key_set_show_clear() {
    let home = TempDir::new().unwrap();

    assert!(typewell(home.path(), &["key", "set", "hf_secret123"]).status.success());
    assert_eq!(stdout(&typewell(home.path(), &["key", "show"])), "hf_s********");

    assert!(typewell(home.path(), &["key", "clear"]).status.success());
    assert_eq!(stdout(&typewell(home.path(), &["key", "show"])), "No key stored");
}

#[test]
fn test_polish_snapshot_without_key() {
    let home = TempDir::new().unwrap();
    let mut compose = ComposePage::new();
    compose.select_note(0, NOTE.chars().count());

    let snapshot = home.path().join("tab.json");
    std::fs::write(&snapshot, serde_json::to_string(&compose.tab).unwrap()).unwrap();

    let output = typewell(
        home.path(),
        &["polish", "--tone", "concise", "--page", snapshot.to_str().unwrap()],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let tab: Tab = serde_json::from_str(&std::fs::read_to_string(&snapshot).unwrap()).unwrap();
    assert_eq!(
        tab.page.document.text_content(compose.editor),
        "We should meet tomorrow, ok."
    );
}

#[test]
fn test_polish_without_selection_fails() {
    let home = TempDir::new().unwrap();
    let compose = ComposePage::new();

    let snapshot = home.path().join("tab.json");
    std::fs::write(&snapshot, serde_json::to_string(&compose.tab).unwrap()).unwrap();

    let output = typewell(home.path(), &["polish", "--page", snapshot.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Nothing selected"));
}

#[test]
fn test_polish_rejects_malformed_snapshot() {
    let home = TempDir::new().unwrap();
    let snapshot = home.path().join("bad.json");
    std::fs::write(
        &snapshot,
        r#"{"url": "https://example.com", "page": {
            "document": {"nodes": [
                {"data": {"type": "element", "tag": "body"}, "children": [1]},
                {"data": {"type": "element", "tag": "div"}, "parent": 0, "children": [0]}
            ]},
            "focus": 1
        }}"#,
    )
    .unwrap();

    let output = typewell(home.path(), &["polish", "--page", snapshot.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid tab snapshot"));
}
