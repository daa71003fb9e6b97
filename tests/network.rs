use kira_hemostasis::labs::{LabInput, Medication, MedicationContext};
use kira_hemostasis::network::{
    ActivityMap, Factor, FactorKind, FactorTable, apply_ceilings, apply_preset,
    estimate_activities, evaluate_activity, propagate,
};
use kira_hemostasis::tables::load_builtin;
use proptest::prelude::*;

fn factor(id: &str, parents: &[&str], children: &[&str]) -> Factor {
    Factor {
        id: id.to_string(),
        name: id.to_string(),
        short_name: id.to_string(),
        kind: FactorKind::Zymogen,
        base_activity: 1.0,
        vit_k_dependent: false,
        zymogen_id: None,
        parents: parents.iter().map(|s| s.to_string()).collect(),
        children: children.iter().map(|s| s.to_string()).collect(),
        feedback_targets: Vec::new(),
        inhibits: Vec::new(),
        complex_partner: None,
        complex_name: None,
        plasma_nm: None,
    }
}

#[test]
fn builtin_graph_has_nine_activation_pairs() {
    let config = load_builtin().unwrap();
    let pairs = config.factors.activation_pairs();
    assert_eq!(pairs.len(), 9);
    assert!(pairs.contains(&("F10", "F10a")));
    assert!(pairs.contains(&("F2", "IIa")));
}

#[test]
fn validate_rejects_cycle() {
    let table = FactorTable::new(vec![
        factor("A", &["B"], &["B"]),
        factor("B", &["A"], &["A"]),
    ]);
    let err = table.validate().unwrap_err().to_string();
    assert!(err.contains("cycle"), "{}", err);
}

#[test]
fn validate_rejects_unknown_reference() {
    let table = FactorTable::new(vec![factor("A", &[], &["MISSING"])]);
    let err = table.validate().unwrap_err().to_string();
    assert!(err.contains("MISSING"), "{}", err);
}

#[test]
fn activity_map_ignores_unknown_and_clamps() {
    let config = load_builtin().unwrap();
    let mut map = ActivityMap::baseline(&config.factors);
    let len = map.len();
    map.set("NOT_A_FACTOR", 0.5);
    assert_eq!(map.len(), len);
    map.set("F8", 1.7);
    assert_eq!(map.get("F8"), Some(1.0));
    map.set("F8", -0.2);
    assert_eq!(map.get("F8"), Some(0.0));
    map.set("F8", f64::NAN);
    assert_eq!(map.get("F8"), Some(0.0));
}

#[test]
fn activated_form_follows_low_zymogen() {
    let config = load_builtin().unwrap();
    let mut map = ActivityMap::baseline(&config.factors);
    map.set("F10", 0.3);
    let out = propagate(&config.factors, &map);
    assert_eq!(out.get("F10a"), Some(0.3));
    assert_eq!(out.get("F10"), Some(0.3));
    assert_eq!(map.get("F10a"), Some(1.0));
}

#[test]
fn propagation_is_idempotent() {
    let config = load_builtin().unwrap();
    let mut map = ActivityMap::baseline(&config.factors);
    map.set("F2", 0.4);
    map.set("F9", 0.1);
    let once = propagate(&config.factors, &map);
    let twice = propagate(&config.factors, &once);
    assert_eq!(once, twice);
}

#[test]
fn thrombin_feedback_does_not_raise_factor_v() {
    let config = load_builtin().unwrap();
    let mut map = ActivityMap::baseline(&config.factors);
    assert_eq!(
        config.factors.feedback_edges(),
        vec![("IIa", "F5"), ("IIa", "F8"), ("IIa", "F11")]
    );
    map.set("F5", 0.5);
    assert_eq!(map.get("IIa"), Some(1.0));
    let out = propagate(&config.factors, &map);
    assert_eq!(out.get("F5"), Some(0.5));
    assert_eq!(out.get("F5a"), Some(0.5));
}

#[test]
fn heparin_caps_thrombin_and_xa() {
    let config = load_builtin().unwrap();
    let meds = MedicationContext {
        heparin: true,
        ..MedicationContext::default()
    };
    let eval = evaluate_activity(&config, &LabInput::default(), &meds, None);
    assert!(eval.activity.get("IIa").unwrap() <= 0.2);
    assert!(eval.activity.get("F10a").unwrap() <= 0.2);
    assert_eq!(eval.activity.get("F8"), Some(1.0));
}

#[test]
fn remaining_medications_apply_their_ceilings() {
    let config = load_builtin().unwrap();
    let cases = [
        (MedicationContext { lmwh: true, ..MedicationContext::default() }, "F10a", 0.3),
        (MedicationContext { doac_xa: true, ..MedicationContext::default() }, "F10a", 0.3),
        (MedicationContext { doac_iia: true, ..MedicationContext::default() }, "IIa", 0.3),
        (MedicationContext { antiplatelet: true, ..MedicationContext::default() }, "PLT", 0.5),
    ];
    for (meds, factor_id, ceiling) in cases {
        let eval = evaluate_activity(&config, &LabInput::default(), &meds, None);
        assert_eq!(eval.activity.get(factor_id), Some(ceiling), "{:?}", meds);
        assert_eq!(eval.activity.get("F8"), Some(1.0));
    }
}

#[test]
fn normal_panel_yields_baseline_activity() {
    let config = load_builtin().unwrap();
    let eval = evaluate_activity(&config, &LabInput::default(), &MedicationContext::default(), None);
    assert_eq!(eval.activity, ActivityMap::baseline(&config.factors));

    let low_normal = LabInput {
        fibrinogen: 210.0,
        platelets: 160.0,
        ..LabInput::default()
    };
    let eval = evaluate_activity(&config, &low_normal, &MedicationContext::default(), None);
    assert_eq!(eval.activity.get("FBG"), Some(1.0));
    assert_eq!(eval.activity.get("PLT"), Some(1.0));
}

#[test]
fn direct_assays_scale_below_reference_band() {
    let config = load_builtin().unwrap();
    let labs = LabInput {
        fibrinogen: 100.0,
        platelets: 75.0,
        ..LabInput::default()
    };
    let eval = evaluate_activity(&config, &labs, &MedicationContext::default(), None);
    assert_eq!(eval.activity.get("FBG"), Some(0.5));
    assert_eq!(eval.activity.get("PLT"), Some(0.5));
}

#[test]
fn ceiling_rules_grouped_by_medication() {
    let config = load_builtin().unwrap();
    let heparin: Vec<&str> = config
        .ceilings
        .for_medication(Medication::Heparin)
        .map(|r| r.factor_id.as_str())
        .collect();
    assert_eq!(heparin, vec!["IIa", "F10a"]);
    assert_eq!(config.ceilings.for_medication(Medication::Warfarin).count(), 6);
}

#[test]
fn ceilings_never_raise_activity() {
    let config = load_builtin().unwrap();
    let mut map = ActivityMap::baseline(&config.factors);
    map.set("F2", 0.1);
    let meds = MedicationContext {
        warfarin: true,
        ..MedicationContext::default()
    };
    let out = apply_ceilings(&config.ceilings, &meds, &map);
    assert_eq!(out.get("F2"), Some(0.1));
    assert_eq!(out.get("F7"), Some(0.4));
}

#[test]
fn isolated_aptt_lowers_intrinsic_members_only() {
    let config = load_builtin().unwrap();
    let labs = LabInput {
        aptt: 55.0,
        ..LabInput::default()
    };
    let estimates = estimate_activities(
        &config.factors,
        &config.ranges,
        &config.lab_factors,
        &labs,
        &MedicationContext::default(),
    );
    let get = |id: &str| {
        estimates
            .iter()
            .find(|e| e.factor_id == id)
            .map(|e| e.activity_percent)
            .unwrap()
    };
    assert!(get("F8") < 50.0);
    assert!(get("F9") < 50.0);
    assert_eq!(get("F7"), 100.0);
    assert_eq!(get("F10"), 100.0);
    assert_eq!(get("FBG"), 100.0);
}

#[test]
fn heparin_explains_aptt_prolongation() {
    let config = load_builtin().unwrap();
    let labs = LabInput {
        aptt: 80.0,
        ..LabInput::default()
    };
    let meds = MedicationContext {
        heparin: true,
        ..MedicationContext::default()
    };
    let estimates = estimate_activities(
        &config.factors,
        &config.ranges,
        &config.lab_factors,
        &labs,
        &meds,
    );
    let f8 = estimates.iter().find(|e| e.factor_id == "F8").unwrap();
    assert_eq!(f8.activity_percent, 100.0);
}

#[test]
fn scenario_presets_are_deterministic() {
    let config = load_builtin().unwrap();
    let baseline = ActivityMap::baseline(&config.factors);
    let preset = config.scenarios.get("hemophilia_a").unwrap();
    let a = apply_preset(&config.factors, &baseline, preset);
    let b = apply_preset(&config.factors, &baseline, preset);
    assert_eq!(a, b);
    assert_eq!(a.get("F8"), Some(0.0));
    assert_eq!(propagate(&config.factors, &a).get("F8a"), Some(0.0));
}

#[test]
fn scenario_activity_ignores_lab_values() {
    let config = load_builtin().unwrap();
    let meds = MedicationContext {
        warfarin: true,
        ..MedicationContext::default()
    };
    let prolonged = LabInput {
        pt: 25.0,
        aptt: 60.0,
        fibrinogen: 90.0,
        platelets: 40.0,
        ..LabInput::default()
    };
    let a = evaluate_activity(&config, &LabInput::default(), &meds, Some("hemophilia_a"));
    let b = evaluate_activity(&config, &prolonged, &meds, Some("hemophilia_a"));
    assert_eq!(a.scenario.as_deref(), Some("hemophilia_a"));
    assert_eq!(a.activity, b.activity);
    assert_eq!(a.activity.get("F8"), Some(0.0));
}

#[test]
fn unknown_scenario_falls_back_to_labs() {
    let config = load_builtin().unwrap();
    let eval = evaluate_activity(
        &config,
        &LabInput::default(),
        &MedicationContext::default(),
        Some("no_such_scenario"),
    );
    assert!(eval.scenario.is_none());
    assert_eq!(eval.activity, ActivityMap::baseline(&config.factors));
}

proptest! {
    #[test]
    fn activated_never_exceeds_zymogen(levels in proptest::collection::vec(0.0f64..=1.0, 33)) {
        let config = load_builtin().unwrap();
        let mut map = ActivityMap::baseline(&config.factors);
        let ids: Vec<String> = config.factors.iter().map(|f| f.id.clone()).collect();
        for (id, level) in ids.iter().zip(&levels) {
            map.set(id, *level);
        }
        let out = propagate(&config.factors, &map);
        for (zymogen, activated) in config.factors.activation_pairs() {
            prop_assert!(out.get(activated).unwrap() <= out.get(zymogen).unwrap());
        }
        for (_, v) in out.iter() {
            prop_assert!((0.0..=1.0).contains(v));
        }
    }
}
