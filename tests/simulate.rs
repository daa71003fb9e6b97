use kira_hemostasis::simulate::kinetics::Species;
use kira_hemostasis::simulate::{SimulationConfig, SimulationResult, ThrombinSimulator};
use kira_hemostasis::tables::load_builtin;

fn short_config() -> SimulationConfig {
    SimulationConfig {
        t_end_s: 120.0,
        dt_s: 0.005,
        t_points: 600,
        tf_nm: 25.0,
    }
}

fn run(scenario: Option<&str>) -> SimulationResult {
    let config = load_builtin().unwrap();
    let preset = scenario.map(|key| config.scenarios.get(key).unwrap());
    ThrombinSimulator::new(short_config()).run(preset).unwrap()
}

#[test]
fn normal_plasma_generates_thrombin() {
    let result = run(None);
    assert_eq!(result.scenario, "normal");
    let m = result.metrics();
    assert!(m.peak_iia_nm > 100.0, "peak {}", m.peak_iia_nm);
    let lag = m.lag_time_s.unwrap();
    assert!(lag > 0.0 && lag < 30.0, "lag {}", lag);
    assert!(m.final_fibrin_nm > 0.0);
    assert!(m.etp_nm_s > 0.0);
}

#[test]
fn concentrations_stay_non_negative() {
    let result = run(Some("rivaroxaban"));
    for species in Species::ALL {
        assert!(result.series(species).iter().all(|&c| c >= 0.0), "{}", species.label());
    }
}

#[test]
fn hemophilia_a_lowers_peak() {
    let normal = run(None).metrics();
    let hemophilia = run(Some("hemophilia_a")).metrics();
    assert!(hemophilia.peak_iia_nm < normal.peak_iia_nm);
}

#[test]
fn unfractionated_heparin_suppresses_thrombin() {
    let normal = run(None).metrics();
    let ufh = run(Some("heparin_ufh")).metrics();
    assert!(ufh.lag_time_s.is_none());
    assert!(ufh.peak_iia_nm < normal.peak_iia_nm);
}

#[test]
fn anti_xa_lowers_peak() {
    let normal = run(None).metrics();
    let riva = run(Some("rivaroxaban")).metrics();
    assert!(riva.peak_iia_nm < normal.peak_iia_nm);
}

#[test]
fn runs_are_deterministic() {
    let a = run(Some("warfarin"));
    let b = run(Some("warfarin"));
    assert_eq!(a.time, b.time);
    assert_eq!(a.series(Species::Iia), b.series(Species::Iia));
}

#[test]
fn samples_cover_whole_run() {
    let result = run(None);
    assert_eq!(result.time[0], 0.0);
    let last = *result.time.last().unwrap();
    assert!((last - 120.0).abs() < 1e-6, "last {}", last);
    assert_eq!(result.series(Species::Iia).len(), result.time.len());
}

#[test]
fn export_decimates_samples() {
    let result = run(None);
    let export = result.export(10);
    let expected = result.time.len().div_ceil(10);
    assert_eq!(export.time.len(), expected);
    assert_eq!(export.factors["IIa"].len(), expected);
    assert!(export.factors.contains_key("Fibrin"));
    assert_eq!(export.scenario, "normal");
}

#[test]
fn invalid_step_rejected() {
    let sim = ThrombinSimulator::new(SimulationConfig {
        dt_s: 0.0,
        ..short_config()
    });
    assert!(sim.run(None).is_err());
}
