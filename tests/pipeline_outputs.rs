use std::fs;
use std::path::Path;

use kira_hemostasis::ctx::Ctx;
use kira_hemostasis::io::summary::format_summary;
use kira_hemostasis::pipeline::Pipeline;
use serde_json::Value;
use tempfile::TempDir;

fn write_panel(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn run_panel(tmp: &TempDir, content: &str, json: bool, tsv: bool) -> Ctx {
    let input = write_panel(tmp.path(), "panel.json", content);
    let mut ctx = Ctx::new(input, tmp.path().join("out"), false, json, tsv, "0.0.0-test");
    Pipeline::single_panel().run(&mut ctx).unwrap();
    ctx
}

#[test]
fn stage_order() {
    let names = Pipeline::single_panel().stage_names();
    assert_eq!(names.first(), Some(&"stage0_scaffold"));
    assert_eq!(names.last(), Some(&"stage8_output"));
    assert!(!names.contains(&"stage7_timecourse"));
}

#[test]
fn json_report_written() {
    let tmp = TempDir::new().unwrap();
    let ctx = run_panel(
        &tmp,
        r#"{"label": "dic_case", "labs": {"pt": 18, "aptt": 60, "fibrinogen": 80, "platelets": 40, "dDimers": 3000}}"#,
        true,
        false,
    );
    let content = fs::read_to_string(&ctx.output.json_path).unwrap();
    let json: Value = serde_json::from_str(&content).unwrap();

    assert_eq!(json["tool"], "kira-hemostasis");
    assert_eq!(json["schema_version"], "v1");
    assert_eq!(json["input_meta"]["label"], "dic_case");
    assert_eq!(json["input_meta"]["tables_version"], "v1");
    assert_eq!(json["lab_statuses"].as_array().unwrap().len(), 8);
    assert_eq!(json["factors"].as_array().unwrap().len(), 33);
    assert_eq!(json["interpretation"]["pattern"], "combined PT and aPTT prolongation");
    assert!(json["interpretation"]["isthScore"]["total"].as_u64().unwrap() >= 5);
    assert!(json["timecourse"].is_null());
    assert!(!ctx.output.tsv_path.exists());
}

#[test]
fn factor_tsv_written() {
    let tmp = TempDir::new().unwrap();
    let ctx = run_panel(&tmp, r#"{"medications": {"heparin": true}}"#, false, true);
    let content = fs::read_to_string(&ctx.output.tsv_path).unwrap();
    let mut lines = content.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("factor_id\t"));
    assert_eq!(lines.count(), 33);
    assert!(!ctx.output.json_path.exists());
}

#[test]
fn scenario_from_panel_drives_activity() {
    let tmp = TempDir::new().unwrap();
    let ctx = run_panel(&tmp, r#"{"scenario": "hemophilia_a"}"#, false, false);
    assert_eq!(ctx.scenario.as_deref(), Some("hemophilia_a"));
    let activity = ctx.activity.as_ref().unwrap();
    assert_eq!(activity.get("F8"), Some(0.0));
    assert_eq!(activity.get("F8a"), Some(0.0));
}

#[test]
fn unknown_scenario_warns_and_continues() {
    let tmp = TempDir::new().unwrap();
    let ctx = run_panel(&tmp, r#"{"scenario": "not_a_preset"}"#, false, false);
    assert!(ctx.scenario.is_none());
    assert!(ctx.warnings.iter().any(|w| w.contains("not_a_preset")));
}

#[test]
fn summary_format() {
    let tmp = TempDir::new().unwrap();
    let ctx = run_panel(
        &tmp,
        r#"{"label": "hit_case", "labs": {"platelets": 90}, "medications": {"heparin": true},
            "hit4t": {"thrombocytopenia": 2, "timing": 2, "thrombosis": 1, "otherCauses": 1}}"#,
        false,
        false,
    );
    let s = format_summary(&ctx).unwrap();
    assert!(s.contains("kira-hemostasis v"));
    assert!(s.contains("Panel: hit_case (medications: heparin)"));
    assert!(s.contains("Pattern: thrombocytopenia"));
    assert!(s.contains("4T: 6/8 (high)"));
    assert!(s.contains("- Heparin-induced thrombocytopenia (HIT) [high]"));
    assert!(s.contains("Clinical warnings:"));
}

#[test]
fn validate_pipeline_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let input = write_panel(tmp.path(), "panel.json", r#"{"labs": {"aptt": 55}}"#);
    let out = tmp.path().join("never");
    let mut ctx = Ctx::new(input, out.clone(), false, true, true, "0.0.0-test");
    Pipeline::validate_only().run(&mut ctx).unwrap();
    assert_eq!(ctx.lab_statuses.len(), 8);
    assert!(ctx.interpretation.is_none());
    assert!(!out.exists());
}
