use std::fs;

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

fn bin() -> Command {
    Command::cargo_bin("kira-hemostasis").unwrap()
}

#[test]
fn cli_help_lists_subcommands() {
    let out = bin().arg("--help").assert().success().get_output().stdout.clone();
    let text = String::from_utf8(out).unwrap();
    for sub in ["run", "batch", "factors", "validate", "simulate"] {
        assert!(text.contains(sub), "{}", sub);
    }
}

#[test]
fn run_writes_json_report() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("case.json");
    fs::write(&input, r#"{"labs": {"aptt": 55, "mixingTest": "corrects"}}"#).unwrap();
    let out = tmp.path().join("out");

    bin()
        .arg("run")
        .arg("--input")
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .arg("--json")
        .assert()
        .success();

    let json: Value =
        serde_json::from_str(&fs::read_to_string(out.join("hemostasis.json")).unwrap()).unwrap();
    assert_eq!(json["schema_version"], "v1");
    assert_eq!(json["input_meta"]["label"], "case");
    assert_eq!(json["interpretation"]["diagnoses"][0]["name"], "Hemophilia A");
}

#[test]
fn run_timecourse_writes_trajectory() {
    let tmp = TempDir::new().unwrap();
    let t0 = tmp.path().join("pt_T0.json");
    let t1 = tmp.path().join("pt_T1.json");
    fs::write(&t0, r#"{"labs": {"platelets": 250}}"#).unwrap();
    fs::write(&t1, r#"{"labs": {"platelets": 60, "dDimers": 3000}}"#).unwrap();
    let out = tmp.path().join("out");

    bin()
        .arg("run")
        .arg("--input")
        .arg(&t1)
        .arg(&t0)
        .arg("--out")
        .arg(&out)
        .arg("--timecourse")
        .arg("--json")
        .assert()
        .success();

    let json: Value =
        serde_json::from_str(&fs::read_to_string(out.join("timecourse.json")).unwrap()).unwrap();
    assert_eq!(json["trajectory"], "worsening");
    assert_eq!(json["timepoints"][0]["label"], "pt_T0");
    assert!(out.join("pt_T1").join("hemostasis.json").exists());
}

#[test]
fn run_rejects_multiple_inputs_without_timecourse() {
    let tmp = TempDir::new().unwrap();
    let a = tmp.path().join("a.json");
    fs::write(&a, "{}").unwrap();
    bin()
        .arg("run")
        .arg("--input")
        .arg(&a)
        .arg(&a)
        .arg("--out")
        .arg(tmp.path().join("out"))
        .assert()
        .failure();
}

#[test]
fn validate_command_ok() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("panel.json");
    fs::write(&input, r#"{"labs": {"pt": 45}}"#).unwrap();
    let out = bin()
        .arg("validate")
        .arg("--input")
        .arg(&input)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("kira-hemostasis validate ok"));
    assert!(text.contains("pt\t45\ts\tcritical"));
}

#[test]
fn validate_command_rejects_bad_panel() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("panel.json");
    fs::write(&input, r#"{"labs": {"platelets": -1}}"#).unwrap();
    bin().arg("validate").arg("--input").arg(&input).assert().failure();
}

#[test]
fn batch_writes_one_row_per_panel() {
    let tmp = TempDir::new().unwrap();
    let a = tmp.path().join("a.json");
    let b = tmp.path().join("b.json");
    fs::write(&a, "{}").unwrap();
    fs::write(&b, r#"{"labs": {"d_dimers_typo": 1}}"#).unwrap();
    let out = tmp.path().join("batch.tsv");

    bin()
        .arg("batch")
        .arg("--input")
        .arg(&a)
        .arg(&b)
        .arg("--out")
        .arg(&out)
        .assert()
        .failure();

    fs::write(&b, r#"{"labs": {"dDimers": 1200}}"#).unwrap();
    bin()
        .arg("batch")
        .arg("--input")
        .arg(&a)
        .arg(&b)
        .arg("--out")
        .arg(&out)
        .arg("--threads")
        .arg("2")
        .assert()
        .success();

    let content = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert!(lines[0].starts_with("label\tpattern\t"));
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("a\tnormal profile\t"));
    assert!(lines[2].starts_with("b\tisolated D-dimer elevation\t"));
}

#[test]
fn factors_show_scenario() {
    let out = bin()
        .arg("factors")
        .arg("show")
        .arg("--scenario")
        .arg("hemophilia_a")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("scenario: hemophilia_a"));
    assert!(text.contains("F8a\t"));
}

#[test]
fn simulate_exports_json() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("sim.json");
    bin()
        .arg("simulate")
        .arg("--scenario")
        .arg("normal")
        .arg("--t-end")
        .arg("60")
        .arg("--out")
        .arg(&out)
        .assert()
        .success();
    let json: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["scenario"], "normal");
    assert!(json["metrics"]["peak_iia_nm"].as_f64().unwrap() > 0.0);
    assert!(json["factors"]["IIa"].is_array());
}

#[test]
fn simulate_unknown_scenario_fails() {
    bin()
        .arg("simulate")
        .arg("--scenario")
        .arg("no_such_thing")
        .arg("--t-end")
        .arg("1")
        .assert()
        .failure();
}
