use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn bowtie(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("bowtie").unwrap();
    cmd.env("BOWTIE_CONFIG", dir.join("config.toml"));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn snapshot_path(dir: &Path) -> String {
    dir.join("session.json").to_string_lossy().into_owned()
}

fn new_session(dir: &Path) -> String {
    let path = snapshot_path(dir);
    bowtie(dir)
        .args(["new", &path, "--project", "Baltic", "--problem", "Marine pollution"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created session"));
    path
}

#[test]
fn test_new_writes_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = new_session(dir.path());

    let json: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(json["currentStep"], 1);
    assert_eq!(json["inputs"]["projectName"], "Baltic");
    assert_eq!(json["inputs"]["problemStatement"], "Marine pollution");
}

#[test]
fn test_new_refuses_to_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = new_session(dir.path());
    bowtie(dir.path())
        .args(["new", &path, "--project", "Other"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_add_and_inspect() {
    let dir = tempfile::tempdir().unwrap();
    let path = new_session(dir.path());

    bowtie(dir.path())
        .args(["add", &path, "activities", "Shipping"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ACT_1"));

    bowtie(dir.path())
        .args(["add", &path, "activities", "Shipping"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Duplicate item"));

    let out = bowtie(dir.path())
        .args(["--output", "json", "inspect", &path])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let summary: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(summary["current_step"], 1);
    assert_eq!(summary["items"][0]["items"], 1);
}

#[test]
fn test_convert_single_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let path = new_session(dir.path());
    bowtie(dir.path())
        .args(["add", &path, "activities", "Shipping"])
        .assert()
        .success();
    bowtie(dir.path())
        .args(["add", &path, "pressures", "Oil spill"])
        .assert()
        .success();

    let out = bowtie(dir.path())
        .args(["--output", "json", "convert", &path])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let rows: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["Activity"], "Shipping");
    assert_eq!(rows[0]["Preventive_Control"], "General management control");
}

#[test]
fn test_convert_without_pressures_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = new_session(dir.path());
    bowtie(dir.path())
        .args(["add", &path, "activities", "Shipping"])
        .assert()
        .success();
    bowtie(dir.path())
        .args(["convert", &path])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pressures"));
}

#[test]
fn test_complete_requires_last_step() {
    let dir = tempfile::tempdir().unwrap();
    let path = new_session(dir.path());
    bowtie(dir.path())
        .args(["complete", &path])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not ready"));
}

#[test]
fn test_walkthrough_to_completion() {
    let dir = tempfile::tempdir().unwrap();
    let path = new_session(dir.path());
    for (category, name) in [("activities", "Shipping"), ("pressures", "Oil spill")] {
        bowtie(dir.path())
            .args(["add", &path, category, name])
            .assert()
            .success();
    }
    for _ in 0..7 {
        bowtie(dir.path()).args(["next", &path]).assert().success();
    }

    bowtie(dir.path())
        .args(["--output", "json", "complete", &path, "--save"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Risk_Level\""));

    let json: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(json["currentStep"], 8);
    assert_eq!(json["completedSteps"].as_array().unwrap().len(), 8);
}

#[test]
fn test_inspect_rejects_snapshot_without_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let path = snapshot_path(dir.path());
    std::fs::write(&path, r#"{"currentStep": 2, "selectedItems": {}}"#).unwrap();

    bowtie(dir.path())
        .args(["inspect", &path])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required fields: inputs"));
}

#[test]
fn test_goto_rejects_out_of_range() {
    let dir = tempfile::tempdir().unwrap();
    let path = new_session(dir.path());
    bowtie(dir.path())
        .args(["goto", &path, "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid step"));
}

#[test]
fn test_add_from_vocabulary() {
    let dir = tempfile::tempdir().unwrap();
    let vocab = dir.path().join("vocabulary.json");
    std::fs::write(
        &vocab,
        r#"{"terms": {"pressures": [{"id": "P7", "name": "Underwater noise", "level": 2}]}}"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        format!("vocabulary = {:?}\n", vocab.to_string_lossy()),
    )
    .unwrap();

    let path = new_session(dir.path());
    bowtie(dir.path())
        .args(["add", &path, "pressures", "--term", "P7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Underwater noise"));
    bowtie(dir.path())
        .args(["add", &path, "pressures", "--term", "P8"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown vocabulary term"));
}
