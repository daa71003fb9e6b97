use kira_hemostasis::labs::{
    LabFlags, LabInput, LabRange, LabStatus, LabTest, MedicationContext, classify,
};
use kira_hemostasis::tables::load_builtin;
use proptest::prelude::*;

fn range(min: f64, max: f64, critical_low: Option<f64>, critical_high: Option<f64>) -> LabRange {
    LabRange {
        min,
        max,
        unit: "s".to_string(),
        critical_low,
        critical_high,
    }
}

#[test]
fn bounds_are_inclusive() {
    let r = range(11.0, 13.5, None, Some(30.0));
    assert_eq!(classify(11.0, &r), LabStatus::Normal);
    assert_eq!(classify(13.5, &r), LabStatus::Normal);
    assert_eq!(classify(10.9, &r), LabStatus::Low);
    assert_eq!(classify(13.6, &r), LabStatus::High);
}

#[test]
fn critical_wins_over_band() {
    let r = range(150.0, 400.0, Some(20.0), Some(1000.0));
    assert_eq!(classify(19.0, &r), LabStatus::Critical);
    assert_eq!(classify(20.0, &r), LabStatus::Low);
    assert_eq!(classify(1000.0, &r), LabStatus::High);
    assert_eq!(classify(1000.5, &r), LabStatus::Critical);
}

#[test]
fn missing_critical_bounds_never_critical() {
    let r = range(0.0, 500.0, None, None);
    assert_eq!(classify(1.0e6, &r), LabStatus::High);
}

#[test]
fn default_panel_is_all_normal() {
    let config = load_builtin().unwrap();
    let labs = LabInput::default();
    let statuses = config.ranges.statuses(&labs);
    assert_eq!(statuses.len(), LabTest::ALL.len());
    assert!(statuses.iter().all(|s| s.status == LabStatus::Normal));
    let flags = LabFlags::from_labs(&labs, &config.ranges);
    assert!(flags.all_normal);
}

#[test]
fn flags_follow_direction() {
    let config = load_builtin().unwrap();
    let labs = LabInput {
        aptt: 55.0,
        platelets: 90.0,
        fibrinogen: 600.0,
        ..LabInput::default()
    };
    let flags = LabFlags::from_labs(&labs, &config.ranges);
    assert!(flags.aptt_high);
    assert!(!flags.pt_high);
    assert!(flags.platelets_low);
    assert!(!flags.fibrinogen_low);
    assert!(!flags.all_normal);
}

#[test]
fn critical_pt_counts_as_high() {
    let config = load_builtin().unwrap();
    let labs = LabInput {
        pt: 45.0,
        ..LabInput::default()
    };
    assert_eq!(config.ranges.status(LabTest::Pt, 45.0), LabStatus::Critical);
    assert!(LabFlags::from_labs(&labs, &config.ranges).pt_high);
}

#[test]
fn medication_context_reads_camel_case() {
    let meds: MedicationContext =
        serde_json::from_str(r#"{"heparin": true, "doacIIa": true}"#).unwrap();
    assert!(meds.heparin);
    assert!(meds.doac_iia);
    assert!(meds.any_heparin());
    assert_eq!(meds.active().len(), 2);

    let bad = serde_json::from_str::<MedicationContext>(r#"{"aspirin": true}"#);
    assert!(bad.is_err());
}

fn rank(status: LabStatus) -> i8 {
    match status {
        LabStatus::Low => -1,
        LabStatus::Normal => 0,
        LabStatus::High => 1,
        LabStatus::Critical => 2,
    }
}

proptest! {
    #[test]
    fn classification_is_monotone_above_min(a in 11.0f64..200.0, b in 11.0f64..200.0) {
        let r = range(11.0, 13.5, None, Some(30.0));
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(rank(classify(lo, &r)) <= rank(classify(hi, &r)));
    }

    #[test]
    fn values_inside_band_are_normal(v in 200.0f64..=400.0) {
        let r = range(200.0, 400.0, Some(100.0), Some(800.0));
        prop_assert_eq!(classify(v, &r), LabStatus::Normal);
    }
}
