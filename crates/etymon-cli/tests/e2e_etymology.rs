//! E2E etymology tests: `ety relate`, `ety unrelate`, `ety origin`,
//! `ety origins`, `ety show`, and the cascade on `ety word rm`.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use std::path::Path;
use tempfile::TempDir;

fn ety_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ety"));
    cmd.current_dir(dir);
    cmd.env("ETYMON_LOG", "error");
    cmd.env("XDG_CONFIG_HOME", dir.join(".user-config"));
    cmd.env_remove("FORMAT");
    cmd
}

fn json_of(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("command should not crash");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON")
}

fn json_err(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("command should not crash");
    assert!(!output.status.success(), "command unexpectedly succeeded");
    serde_json::from_slice(&output.stderr).expect("JSON error on stderr")
}

/// Project with `kal` (1), `kalan` (2), `kalanir` (3), `sor` (4).
fn seeded_project() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    ety_cmd(dir.path()).args(["init"]).assert().success();
    for (value, definition) in [
        ("kal", "water"),
        ("kalan", "river"),
        ("kalanir", "delta"),
        ("sor", "stone"),
    ] {
        ety_cmd(dir.path())
            .args(["word", "add", value, "--definition", definition])
            .assert()
            .success();
    }
    dir
}

fn show(dir: &Path, id: &str) -> Value {
    json_of(ety_cmd(dir).args(["show", id, "--json"]))
}

fn ids(value: &Value) -> Vec<u64> {
    value
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|r| r["id"].as_u64())
        .collect()
}

// ---------------------------------------------------------------------------
// relate / unrelate
// ---------------------------------------------------------------------------

#[test]
fn relate_builds_lineage() {
    let dir = seeded_project();
    let out = json_of(ety_cmd(dir.path()).args(["relate", "1", "2", "--json"]));
    assert_eq!(out, json!({ "ok": true, "parent": 1, "children": [2] }));
    ety_cmd(dir.path()).args(["relate", "2", "3"]).assert().success();

    let middle = show(dir.path(), "2");
    assert_eq!(ids(&middle["parents"]), [1]);
    assert_eq!(ids(&middle["children"]), [3]);

    let root = show(dir.path(), "1");
    assert_eq!(ids(&root["descendants"]), [2, 3]);
    assert_eq!(root["descendants"][1]["value"], "kalanir");

    let leaf = show(dir.path(), "3");
    assert_eq!(ids(&leaf["ancestors"]), [2, 1]);
}

#[test]
fn relate_accepts_several_children() {
    let dir = seeded_project();
    ety_cmd(dir.path())
        .args(["relate", "1", "2", "3"])
        .assert()
        .success()
        .stdout("related 1 -> 2, 3\n");

    let root = show(dir.path(), "1");
    assert_eq!(ids(&root["children"]), [2, 3]);
}

#[test]
fn loop_is_rejected_and_document_left_unchanged() {
    let dir = seeded_project();
    ety_cmd(dir.path()).args(["relate", "1", "2"]).assert().success();
    ety_cmd(dir.path()).args(["relate", "2", "3"]).assert().success();
    let before = std::fs::read_to_string(dir.path().join("language.etymon.json")).expect("read");

    let err = json_err(ety_cmd(dir.path()).args(["relate", "3", "1", "--json"]));
    assert_eq!(err["error"]["error_code"], "E2003");
    assert!(err["error"]["suggestion"].is_string());

    let after = std::fs::read_to_string(dir.path().join("language.etymon.json")).expect("read");
    assert_eq!(before, after);
    assert!(ids(&show(dir.path(), "1")["parents"]).is_empty());
}

#[test]
fn loop_through_one_child_rejects_whole_command() {
    let dir = seeded_project();
    ety_cmd(dir.path()).args(["relate", "1", "2"]).assert().success();

    // 2 -> 4 is fine, 2 -> 1 closes a loop.
    ety_cmd(dir.path())
        .args(["relate", "2", "4", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));

    assert!(ids(&show(dir.path(), "4")["parents"]).is_empty());
}

#[test]
fn self_relation_is_rejected() {
    let dir = seeded_project();
    let err = json_err(ety_cmd(dir.path()).args(["relate", "1", "1", "--json"]));
    assert_eq!(err["error"]["error_code"], "E2003");
}

#[test]
fn relate_unknown_word_fails() {
    let dir = seeded_project();
    let err = json_err(ety_cmd(dir.path()).args(["relate", "1", "9", "--json"]));
    assert_eq!(err["error"]["error_code"], "E2001");
}

#[test]
fn unrelate_reports_whether_link_existed() {
    let dir = seeded_project();
    ety_cmd(dir.path()).args(["relate", "1", "2"]).assert().success();

    let first = json_of(ety_cmd(dir.path()).args(["unrelate", "1", "2", "--json"]));
    assert_eq!(first["removed"], true);
    let second = json_of(ety_cmd(dir.path()).args(["unrelate", "1", "2", "--json"]));
    assert_eq!(second["removed"], false);

    assert!(ids(&show(dir.path(), "2")["parents"]).is_empty());
    // The reverse link is allowed again once the edge is gone.
    ety_cmd(dir.path()).args(["relate", "2", "1"]).assert().success();
}

// ---------------------------------------------------------------------------
// origins
// ---------------------------------------------------------------------------

#[test]
fn origin_add_then_replace() {
    let dir = seeded_project();
    let added = json_of(ety_cmd(dir.path()).args([
        "origin", "add", "1", "--word", "aqua", "--language", "Latin", "--definition", "water",
        "--json",
    ]));
    assert_eq!(added["replaced"], false);
    assert_eq!(added["origin"]["word"], "aqua");

    let replaced = json_of(ety_cmd(dir.path()).args([
        "origin", "add", "1", "--word", "aqua", "--language", "Latin", "--definition", "rain",
        "--json",
    ]));
    assert_eq!(replaced["replaced"], true);

    let word = show(dir.path(), "1");
    assert_eq!(
        word["origins"],
        json!([{ "word": "aqua", "language": "Latin", "definition": "rain" }])
    );
}

#[test]
fn origin_on_unknown_word_fails() {
    let dir = seeded_project();
    let err = json_err(ety_cmd(dir.path()).args([
        "origin", "add", "9", "--word", "aqua", "--language", "Latin", "--json",
    ]));
    assert_eq!(err["error"]["error_code"], "E2001");

    let catalog = json_of(ety_cmd(dir.path()).args(["origins", "--json"]));
    assert_eq!(catalog, json!([]));
}

#[test]
fn origins_catalog_tracks_live_labels() {
    let dir = seeded_project();
    for args in [
        ["origin", "add", "1", "--word", "aqua", "--language", "Latin"],
        ["origin", "add", "2", "--word", "aqua", "--language", "Latin"],
        ["origin", "add", "4", "--word", "stein", "--language", "German"],
    ] {
        ety_cmd(dir.path()).args(args).assert().success();
    }

    let catalog = json_of(ety_cmd(dir.path()).args(["origins", "--json"]));
    assert_eq!(
        catalog,
        json!([
            { "label": "aqua (Latin)", "words": [1, 2] },
            { "label": "stein (German)", "words": [4] },
        ])
    );

    ety_cmd(dir.path())
        .args(["origins", "--filter", "LAT", "--format", "text"])
        .assert()
        .success()
        .stdout("aqua (Latin)\n");

    // The label survives while another word still carries it.
    ety_cmd(dir.path())
        .args(["origin", "rm", "1", "--word", "aqua", "--language", "Latin"])
        .assert()
        .success();
    let catalog = json_of(ety_cmd(dir.path()).args(["origins", "--json"]));
    assert_eq!(catalog[0], json!({ "label": "aqua (Latin)", "words": [2] }));

    let removed = json_of(ety_cmd(dir.path()).args([
        "origin", "rm", "2", "--word", "aqua", "--language", "Latin", "--json",
    ]));
    assert_eq!(removed["removed"], true);
    let catalog = json_of(ety_cmd(dir.path()).args(["origins", "--json"]));
    assert_eq!(catalog, json!([{ "label": "stein (German)", "words": [4] }]));
}

#[test]
fn removing_missing_origin_succeeds() {
    let dir = seeded_project();
    let out = json_of(ety_cmd(dir.path()).args([
        "origin", "rm", "1", "--word", "aqua", "--language", "Latin", "--json",
    ]));
    assert_eq!(out["removed"], false);
}

// ---------------------------------------------------------------------------
// cascade and persistence
// ---------------------------------------------------------------------------

#[test]
fn word_rm_cascades_relations() {
    let dir = seeded_project();
    ety_cmd(dir.path()).args(["relate", "1", "2"]).assert().success();
    ety_cmd(dir.path()).args(["relate", "2", "3"]).assert().success();
    ety_cmd(dir.path())
        .args(["origin", "add", "2", "--word", "aqua", "--language", "Latin"])
        .assert()
        .success();

    let out = json_of(ety_cmd(dir.path()).args(["word", "rm", "2", "--json"]));
    assert_eq!(out["relations_removed"], 3);

    assert!(ids(&show(dir.path(), "1")["children"]).is_empty());
    assert!(ids(&show(dir.path(), "3")["parents"]).is_empty());
    let catalog = json_of(ety_cmd(dir.path()).args(["origins", "--json"]));
    assert_eq!(catalog, json!([]));

    // Ids are not reused after a delete.
    let added = json_of(ety_cmd(dir.path()).args(["word", "add", "mir", "--json"]));
    assert_eq!(added["id"], 5);
}

#[test]
fn show_text_mode_lists_ids() {
    let dir = seeded_project();
    ety_cmd(dir.path()).args(["relate", "1", "2"]).assert().success();

    ety_cmd(dir.path())
        .args(["show", "2", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("word        2 kalan"))
        .stdout(predicate::str::contains("parents     1\n"));
}

#[test]
fn show_unknown_word_fails() {
    let dir = seeded_project();
    let err = json_err(ety_cmd(dir.path()).args(["show", "42", "--json"]));
    assert_eq!(err["error"]["error_code"], "E2001");
}

#[test]
fn explicit_doc_flag_targets_another_document() {
    let dir = seeded_project();
    ety_cmd(dir.path())
        .args(["--doc", "other.json", "init"])
        .assert()
        .success();
    ety_cmd(dir.path())
        .args(["--doc", "other.json", "word", "add", "zen"])
        .assert()
        .success();

    let other = json_of(ety_cmd(dir.path()).args(["--doc", "other.json", "word", "list", "--json"]));
    assert_eq!(other.as_array().map(Vec::len), Some(1));
    let main = json_of(ety_cmd(dir.path()).args(["word", "list", "--json"]));
    assert_eq!(main.as_array().map(Vec::len), Some(4));
}
