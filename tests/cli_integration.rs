//! Integration tests for the `nf` CLI.
//!
//! Each test runs `nf` as a subprocess against a temp data directory
//! (and a temp config home) and verifies stdout and/or persisted state.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Get the path to the built `nf` binary.
fn nf_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("nf");
    path
}

struct TestEnv {
    data: TempDir,
    config: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        TestEnv {
            data: TempDir::new().unwrap(),
            config: TempDir::new().unwrap(),
        }
    }

    fn config_file(&self) -> PathBuf {
        self.config.path().join("noteflow").join("config.toml")
    }

    /// Run `nf` with the given args, returning (stdout, stderr, success).
    fn run(&self, args: &[&str]) -> (String, String, bool) {
        let data_dir = self.data.path().to_string_lossy().to_string();
        let output = Command::new(nf_bin())
            .arg("--data-dir")
            .arg(&data_dir)
            .args(args)
            .env("XDG_CONFIG_HOME", self.config.path())
            .output()
            .expect("failed to run nf");
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        (stdout, stderr, output.status.success())
    }

    /// Run `nf` expecting success, return stdout.
    fn run_ok(&self, args: &[&str]) -> String {
        let (stdout, stderr, success) = self.run(args);
        if !success {
            panic!(
                "nf {:?} failed:\nstdout: {}\nstderr: {}",
                args, stdout, stderr
            );
        }
        stdout
    }

    /// Run a create command and pull the short id out of "created <id>".
    fn create(&self, args: &[&str]) -> String {
        let out = self.run_ok(args);
        out.split_whitespace()
            .last()
            .expect("create output has an id")
            .to_string()
    }
}

fn parse_json(out: &str) -> serde_json::Value {
    serde_json::from_str(out).expect("valid JSON output")
}

// ---------------------------------------------------------------------------
// First run & basic note flow
// ---------------------------------------------------------------------------

#[test]
fn first_run_seeds_sample_notes() {
    let env = TestEnv::new();
    let out = env.run_ok(&["list"]);
    assert!(out.contains("Welcome to noteflow"));
    assert!(out.contains("Shopping List"));
}

#[test]
fn new_note_appears_in_list() {
    let env = TestEnv::new();
    let id = env.create(&["new", "Standup notes"]);
    let out = env.run_ok(&["list"]);
    assert!(out.contains("Standup notes"));
    assert!(out.contains(&id));
}

#[test]
fn show_displays_content_and_version() {
    let env = TestEnv::new();
    let id = env.create(&["new", "Draft"]);
    env.run_ok(&["edit", &id, "--content", "# Heading\nbody text"]);
    let out = env.run_ok(&["show", &id]);
    assert!(out.contains("Draft"));
    assert!(out.contains("body text"));
    assert!(out.contains("version: 2 (1 previous)"));
}

#[test]
fn rm_deletes_notes() {
    let env = TestEnv::new();
    let a = env.create(&["new", "First"]);
    let b = env.create(&["new", "Second"]);
    let out = env.run_ok(&["rm", &a, &b]);
    assert!(out.contains("deleted 2 notes"));
    let list = env.run_ok(&["list"]);
    assert!(!list.contains("First"));
    assert!(!list.contains("Second"));
}

#[test]
fn rm_unknown_id_fails() {
    let env = TestEnv::new();
    let (_, stderr, success) = env.run(&["rm", "zzzzzzzz"]);
    assert!(!success);
    assert!(stderr.contains("no note matching"));
}

#[test]
fn pin_toggles_and_sorts_first() {
    let env = TestEnv::new();
    let id = env.create(&["new", "Pin me"]);
    let out = env.run_ok(&["pin", &id]);
    assert!(out.contains("pinned"));

    let json = env.run_ok(&["list", "--pinned", "--json"]);
    let notes = parse_json(&json);
    let titles: Vec<&str> = notes
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect();
    assert!(titles.contains(&"Pin me"));

    let out = env.run_ok(&["pin", &id]);
    assert!(out.contains("unpinned"));
}

// ---------------------------------------------------------------------------
// Version history
// ---------------------------------------------------------------------------

#[test]
fn content_edits_build_a_version_chain() {
    let env = TestEnv::new();
    let id = env.create(&["new", "Versioned"]);
    env.run_ok(&["edit", &id, "--content", "first"]);
    env.run_ok(&["edit", &id, "--content", "second"]);

    let out = env.run_ok(&["versions", &id]);
    assert!(out.contains("v1"));
    assert!(out.contains("v2"));
    assert!(out.contains("current: v3"));

    // Title-only edit leaves the chain alone
    env.run_ok(&["edit", &id, "--title", "Renamed"]);
    let out = env.run_ok(&["versions", &id]);
    assert!(out.contains("current: v3"));
}

#[test]
fn restore_brings_back_old_content() {
    let env = TestEnv::new();
    let id = env.create(&["new", "Versioned"]);
    env.run_ok(&["edit", &id, "--content", "first"]);
    env.run_ok(&["edit", &id, "--content", "second"]);

    // v2 held "first"
    env.run_ok(&["restore", &id, "2"]);
    let out = env.run_ok(&["show", &id]);
    assert!(out.contains("first"));
    assert!(out.contains("version: 4"));

    let (_, stderr, success) = env.run(&["restore", &id, "99"]);
    assert!(!success);
    assert!(stderr.contains("no version 99"));
}

// ---------------------------------------------------------------------------
// Undo / redo
// ---------------------------------------------------------------------------

#[test]
fn undo_in_a_fresh_process_has_no_history() {
    // History is session-scoped: it starts empty on every load, so a
    // fresh invocation has nothing to step back to.
    let env = TestEnv::new();
    env.create(&["new", "Edited"]);
    let out = env.run_ok(&["undo"]);
    assert!(out.contains("nothing to undo"));
    let out = env.run_ok(&["redo"]);
    assert!(out.contains("nothing to redo"));
}

// ---------------------------------------------------------------------------
// Folders
// ---------------------------------------------------------------------------

#[test]
fn folder_flow() {
    let env = TestEnv::new();
    env.run_ok(&["folder", "new", "Research", "--icon", "folder-search"]);
    let note = env.create(&["new", "Paper notes", "--folder", "Research"]);

    let out = env.run_ok(&["folder", "list"]);
    assert!(out.contains("Research"));
    assert!(out.contains("<folder-search>"));

    // Deleting the folder moves its notes to root
    env.run_ok(&["folder", "rm", "Research"]);
    let out = env.run_ok(&["list", "--root"]);
    assert!(out.contains("Paper notes"));
    assert!(out.contains(&note));
}

#[test]
fn active_folder_receives_new_notes() {
    let env = TestEnv::new();
    env.run_ok(&["folder", "new", "Inbox"]);
    env.run_ok(&["folder", "open", "Inbox"]);
    env.create(&["new", "Captured"]);

    let out = env.run_ok(&["list", "--folder", "Inbox"]);
    assert!(out.contains("Captured"));
}

#[test]
fn unknown_icon_is_rejected() {
    let env = TestEnv::new();
    let (_, stderr, success) = env.run(&["folder", "new", "Bad", "--icon", "folder-rocket"]);
    assert!(!success);
    assert!(stderr.contains("unknown icon"));
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

#[test]
fn tag_lifecycle() {
    let env = TestEnv::new();
    let note = env.create(&["new", "Tagged note"]);
    env.run_ok(&["tag", "new", "urgent", "--color", "#ef4444"]);
    env.run_ok(&["tag", "add", &note, "urgent"]);

    let out = env.run_ok(&["list", "--tag", "urgent"]);
    assert!(out.contains("Tagged note"));
    assert!(out.contains("#urgent"));

    // Deleting the tag scrubs it everywhere
    env.run_ok(&["tag", "rm", "urgent"]);
    let json = env.run_ok(&["show", &note, "--json"]);
    let detail = parse_json(&json);
    assert!(detail["tags"].is_null() || detail["tags"].as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Sharing & protection
// ---------------------------------------------------------------------------

#[test]
fn share_prints_and_clears_public_link() {
    let env = TestEnv::new();
    let id = env.create(&["new", "Public note"]);
    let out = env.run_ok(&["share", &id]);
    assert!(out.contains("https://noteflow.app/share/"));

    let show = env.run_ok(&["show", &id]);
    assert!(show.contains("public: https://noteflow.app/share/"));

    let out = env.run_ok(&["share", &id, "--off"]);
    assert!(out.contains("now private"));
}

#[test]
fn protect_and_remove_password() {
    let env = TestEnv::new();
    let id = env.create(&["new", "Secret"]);
    env.run_ok(&["protect", &id, "--password", "hunter2"]);
    let show = env.run_ok(&["show", &id]);
    assert!(show.contains("protection: password"));

    env.run_ok(&["protect", &id, "--remove"]);
    let show = env.run_ok(&["show", &id]);
    assert!(!show.contains("protection: password"));
}

// ---------------------------------------------------------------------------
// Search & export
// ---------------------------------------------------------------------------

#[test]
fn search_finds_title_and_content() {
    let env = TestEnv::new();
    let id = env.create(&["new", "Quarterly planning"]);
    env.run_ok(&["edit", &id, "--content", "revenue targets\nheadcount plan"]);

    let out = env.run_ok(&["search", "headcount"]);
    assert!(out.contains("Quarterly planning"));
    assert!(out.contains("[content]: headcount plan"));

    let out = env.run_ok(&["search", "no-such-term-anywhere"]);
    assert!(out.contains("no matches"));
}

#[test]
fn export_formats() {
    let env = TestEnv::new();
    let id = env.create(&["new", "Exportable"]);
    env.run_ok(&["edit", &id, "--content", "# Title\n*emphasis*"]);

    let md = env.run_ok(&["export", &id]);
    assert!(md.contains("# Title"));

    let text = env.run_ok(&["export", &id, "--format", "text"]);
    assert!(text.contains("Title"));
    assert!(!text.contains('#'));

    let json = env.run_ok(&["export", &id, "--format", "json"]);
    let value = parse_json(&json);
    assert_eq!(value["title"], "Exportable");

    let out_file = env.data.path().join("note.html");
    env.run_ok(&["export", &id, "--format", "html", "--out", out_file.to_str().unwrap()]);
    let html = std::fs::read_to_string(&out_file).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
}

// ---------------------------------------------------------------------------
// Session & namespacing
// ---------------------------------------------------------------------------

#[test]
fn login_switches_to_a_fresh_namespace() {
    let env = TestEnv::new();
    env.create(&["new", "Signed-out note"]);

    env.run_ok(&["login", "ada@example.com", "secret1"]);
    let who = env.run_ok(&["whoami"]);
    assert!(who.contains("ada@example.com"));

    // The signed-in namespace starts from the sample data, not the
    // signed-out notes.
    let out = env.run_ok(&["list"]);
    assert!(!out.contains("Signed-out note"));
    assert!(out.contains("Welcome to noteflow"));

    // Signing out returns to the old namespace
    env.run_ok(&["logout"]);
    let out = env.run_ok(&["list"]);
    assert!(out.contains("Signed-out note"));
}

#[test]
fn login_rejects_short_password() {
    let env = TestEnv::new();
    let (_, stderr, success) = env.run(&["login", "ada@example.com", "12345"]);
    assert!(!success);
    assert!(stderr.contains("at least 6 characters"));
}

// ---------------------------------------------------------------------------
// Sync
// ---------------------------------------------------------------------------

#[test]
fn sync_requires_enabling() {
    let env = TestEnv::new();
    let (_, stderr, success) = env.run(&["sync"]);
    assert!(!success);
    assert!(stderr.contains("disabled"));
}

#[test]
fn sync_reports_collection_counts() {
    let env = TestEnv::new();
    env.run_ok(&["list"]); // seed samples
    write_config(&env, "[sync]\nenabled = true\nlatency_ms = 0\n");

    let out = env.run_ok(&["sync", "--json"]);
    let report = parse_json(&out);
    assert_eq!(report["provider"], "drive");
    assert_eq!(report["notes"].as_u64().unwrap(), 3);
}

#[test]
fn sync_enable_writes_config() {
    let env = TestEnv::new();
    env.run_ok(&["sync", "--enable"]);
    let content = std::fs::read_to_string(env.config_file()).unwrap();
    assert!(content.contains("enabled = true"));
    env.run_ok(&["sync", "--disable"]);
    let content = std::fs::read_to_string(env.config_file()).unwrap();
    assert!(content.contains("enabled = false"));
}

fn write_config(env: &TestEnv, content: &str) {
    let path = env.config_file();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

// ---------------------------------------------------------------------------
// Persistence across invocations
// ---------------------------------------------------------------------------

#[test]
fn data_survives_across_invocations() {
    let env = TestEnv::new();
    let id = env.create(&["new", "Durable"]);
    env.run_ok(&["edit", &id, "--content", "still here"]);

    // Every command is a fresh process; the note must round-trip
    let out = env.run_ok(&["show", &id]);
    assert!(out.contains("still here"));

    let data_dir: &Path = env.data.path();
    assert!(data_dir.join("noteflow_notes.json").exists());
    assert!(data_dir.join("noteflow_active_note.json").exists());
}
