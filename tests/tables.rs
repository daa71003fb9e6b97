use std::fs;

use kira_hemostasis::labs::LabTest;
use kira_hemostasis::tables::{TABLES_VERSION, load_builtin, merge_by_key};
use tempfile::TempDir;

#[test]
fn builtin_tables_load_and_validate() {
    let config = load_builtin().unwrap();
    assert_eq!(config.version, TABLES_VERSION);
    assert_eq!(config.factors.len(), 33);
    assert_eq!(config.scenarios.presets().len(), 16);
    for test in LabTest::ALL {
        assert!(config.ranges.get(test).is_some(), "{}", test.key());
    }
    let keys = config.scenario_keys();
    assert_eq!(keys[0], "normal");
    assert!(keys.contains(&"heparin_ufh"));
    assert!(keys.contains(&"rivaroxaban"));
}

#[test]
fn scenario_rows_grouped_into_presets() {
    let config = load_builtin().unwrap();
    let warfarin = config.scenarios.get("warfarin").unwrap();
    assert!(warfarin.factor_levels.len() >= 4);
    assert!(warfarin.level("F2").unwrap() < 1.0);
    let ufh = config.scenarios.get("heparin_ufh").unwrap();
    assert!(ufh.factor_levels.is_empty());
    assert!(ufh.kinetics.at_factor > 1.0);
}

#[test]
fn range_overlay_replaces_builtin_row() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("ranges.tsv");
    fs::write(&path, "#lab\tmin\tmax\tunit\tcritical_low\tcritical_high\npt\t10.0\t14.0\ts\t-\t35.0\n").unwrap();

    let config = load_builtin().unwrap().with_overlays(Some(&path), None).unwrap();
    let pt = config.ranges.get(LabTest::Pt).unwrap();
    assert_eq!(pt.max, 14.0);
    assert_eq!(pt.critical_high, Some(35.0));
    assert_eq!(config.ranges.get(LabTest::Aptt).unwrap().max, 35.0);
}

#[test]
fn scenario_overlay_appends_new_preset() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("scenarios.tsv");
    fs::write(
        &path,
        "custom_mild_a\tMild hemophilia A\tfactor\tF8\t0.2\ncustom_mild_a\tMild hemophilia A\tkinetic\tat_factor\t1.5\n",
    )
    .unwrap();

    let config = load_builtin().unwrap().with_overlays(None, Some(&path)).unwrap();
    assert_eq!(config.scenarios.presets().len(), 17);
    let preset = config.scenarios.get("custom_mild_a").unwrap();
    assert_eq!(preset.level("F8"), Some(0.2));
    assert_eq!(preset.kinetics.at_factor, 1.5);
}

#[test]
fn malformed_overlay_reports_line() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("ranges.tsv");
    fs::write(&path, "#lab\tmin\tmax\npt\t10.0\t14.0\n").unwrap();

    let err = load_builtin()
        .unwrap()
        .with_overlays(Some(&path), None)
        .unwrap_err();
    let msg = format!("{:#}", err);
    assert!(msg.contains(":2 malformed TSV"), "{}", msg);
}

#[test]
fn overlay_with_unknown_factor_fails_validation() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("scenarios.tsv");
    fs::write(&path, "bogus\tBogus\tfactor\tF99\t0.5\n").unwrap();

    let err = load_builtin()
        .unwrap()
        .with_overlays(None, Some(&path))
        .unwrap_err();
    assert!(err.to_string().contains("F99"));
}

#[test]
fn merge_keeps_builtin_order() {
    let builtin = vec![("a", 1), ("b", 2), ("c", 3)];
    let user = vec![("d", 40), ("b", 20)];
    let merged = merge_by_key(builtin, user, |(k, _)| *k);
    assert_eq!(merged, vec![("a", 1), ("b", 20), ("c", 3), ("d", 40)]);
}
