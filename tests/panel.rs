use std::fs;
use std::path::PathBuf;

use kira_hemostasis::io::panel::{label_from_path, load_panel, order_timecourse_inputs, parse_panel};
use kira_hemostasis::labs::MixingTest;
use kira_hemostasis::scores::Calibration;
use tempfile::TempDir;

#[test]
fn missing_fields_take_defaults() {
    let cal = Calibration::default_v1();
    let panel = parse_panel(r#"{"labs": {"aptt": 55, "mixingTest": "corrects"}}"#, "mem", &cal).unwrap();
    assert_eq!(panel.labs.aptt, 55.0);
    assert_eq!(panel.labs.pt, 12.0);
    assert_eq!(panel.labs.platelets, 250.0);
    assert_eq!(panel.labs.mixing_test, MixingTest::Corrects);
    assert!(panel.hit4t.is_none());
    assert!(panel.scenario.is_none());
}

#[test]
fn inr_derived_from_pt_when_absent() {
    let cal = Calibration::default_v1();
    let panel = parse_panel(r#"{"labs": {"pt": 24}}"#, "mem", &cal).unwrap();
    assert_eq!(panel.labs.inr, 2.0);

    let panel = parse_panel(r#"{"labs": {"pt": 24, "inr": 2.6}}"#, "mem", &cal).unwrap();
    assert_eq!(panel.labs.inr, 2.6);
}

#[test]
fn full_panel_parses() {
    let cal = Calibration::default_v1();
    let content = r#"{
        "label": "icu_bed_4",
        "labs": {"platelets": 90, "dDimers": 800, "bleedingTime": 5, "apttMix": 33},
        "medications": {"heparin": true},
        "scenario": "heparin_ufh",
        "hit4T": {"thrombocytopenia": 2, "timing": 2, "thrombosis": 1, "otherCauses": 1}
    }"#;
    let panel = parse_panel(content, "mem", &cal).unwrap();
    assert_eq!(panel.label, "icu_bed_4");
    assert_eq!(panel.labs.d_dimers, 800.0);
    assert_eq!(panel.labs.aptt_mix, Some(33.0));
    assert!(panel.medications.heparin);
    assert_eq!(panel.scenario.as_deref(), Some("heparin_ufh"));
    assert_eq!(panel.hit4t.unwrap().other_causes, 1);
}

#[test]
fn unknown_field_rejected() {
    let cal = Calibration::default_v1();
    assert!(parse_panel(r#"{"labs": {"ptt": 40}}"#, "mem", &cal).is_err());
    assert!(parse_panel(r#"{"medications": {"aspirin": true}}"#, "mem", &cal).is_err());
}

#[test]
fn negative_value_rejected() {
    let cal = Calibration::default_v1();
    let err = parse_panel(r#"{"labs": {"platelets": -5}}"#, "mem", &cal).unwrap_err();
    assert!(format!("{:#}", err).contains("platelets"));
}

#[test]
fn out_of_range_4t_criterion_rejected() {
    let cal = Calibration::default_v1();
    let content = r#"{"hit4t": {"thrombocytopenia": 3, "timing": 0, "thrombosis": 0, "otherCauses": 0}}"#;
    assert!(parse_panel(content, "mem", &cal).is_err());
}

#[test]
fn label_falls_back_to_file_stem() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("patient7_T2.json");
    fs::write(&path, r#"{"labs": {}}"#).unwrap();
    let panel = load_panel(&path, &Calibration::default_v1()).unwrap();
    assert_eq!(panel.label, "patient7_T2");
}

#[test]
fn timecourse_inputs_sorted_by_time_token() {
    let inputs = vec![
        PathBuf::from("p_T10.json"),
        PathBuf::from("p_T2.json"),
        PathBuf::from("p_T0.json"),
    ];
    let ordered = order_timecourse_inputs(&inputs);
    let labels: Vec<String> = ordered.iter().map(|p| label_from_path(p)).collect();
    assert_eq!(labels, vec!["p_T0", "p_T2", "p_T10"]);
}

#[test]
fn timecourse_inputs_without_tokens_keep_order() {
    let inputs = vec![PathBuf::from("later.json"), PathBuf::from("earlier.json")];
    assert_eq!(order_timecourse_inputs(&inputs), inputs);
}
