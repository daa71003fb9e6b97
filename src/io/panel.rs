//! Lab panel JSON input.
//!
//! Missing lab fields fall back to mid-normal values and a missing INR is
//! derived from the PT, so a panel file only needs the abnormal results.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::labs::{LabInput, LabTest, MedicationContext, MixingTest};
use crate::scores::inr::calculate_inr_from_pt;
use crate::scores::{Calibration, Hit4TCriteria};

#[derive(Debug, Clone, PartialEq)]
pub struct LabPanel {
    pub label: String,
    pub labs: LabInput,
    pub medications: MedicationContext,
    pub scenario: Option<String>,
    pub hit4t: Option<Hit4TCriteria>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct LabFields {
    pt: Option<f64>,
    inr: Option<f64>,
    aptt: Option<f64>,
    tt: Option<f64>,
    fibrinogen: Option<f64>,
    platelets: Option<f64>,
    d_dimers: Option<f64>,
    bleeding_time: Option<f64>,
    mixing_test: Option<MixingTest>,
    aptt_mix: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct PanelFile {
    label: Option<String>,
    #[serde(default)]
    labs: LabFields,
    #[serde(default)]
    medications: MedicationContext,
    scenario: Option<String>,
    #[serde(alias = "hit4T")]
    hit4t: Option<Hit4TCriteria>,
}

pub fn load_panel(path: &Path, cal: &Calibration) -> Result<LabPanel> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read lab panel {}", path.display()))?;
    let mut panel = parse_panel(&content, &path.display().to_string(), cal)?;
    if panel.label.is_empty() {
        panel.label = label_from_path(path);
    }
    Ok(panel)
}

pub fn parse_panel(content: &str, source: &str, cal: &Calibration) -> Result<LabPanel> {
    let file: PanelFile = serde_json::from_str(content)
        .with_context(|| format!("{}: invalid lab panel JSON", source))?;

    let defaults = LabInput::default();
    let f = file.labs;
    let pt = f.pt.unwrap_or(defaults.pt);
    let labs = LabInput {
        pt,
        inr: f.inr.unwrap_or_else(|| calculate_inr_from_pt(pt, cal)),
        aptt: f.aptt.unwrap_or(defaults.aptt),
        tt: f.tt.unwrap_or(defaults.tt),
        fibrinogen: f.fibrinogen.unwrap_or(defaults.fibrinogen),
        platelets: f.platelets.unwrap_or(defaults.platelets),
        d_dimers: f.d_dimers.unwrap_or(defaults.d_dimers),
        bleeding_time: f.bleeding_time.unwrap_or(defaults.bleeding_time),
        mixing_test: f.mixing_test.unwrap_or_default(),
        aptt_mix: f.aptt_mix,
    };

    let panel = LabPanel {
        label: file.label.unwrap_or_default(),
        labs,
        medications: file.medications,
        scenario: file.scenario,
        hit4t: file.hit4t,
    };
    validate_panel(&panel).with_context(|| format!("{}: lab panel rejected", source))?;
    Ok(panel)
}

pub fn validate_panel(panel: &LabPanel) -> Result<()> {
    for test in LabTest::ALL {
        let value = panel.labs.value(test);
        if !value.is_finite() {
            bail!("{} must be finite, got {}", test.key(), value);
        }
        if value < 0.0 {
            bail!("{} must be >= 0, got {}", test.key(), value);
        }
    }
    if let Some(mix) = panel.labs.aptt_mix {
        if !mix.is_finite() || mix < 0.0 {
            bail!("aptt_mix must be finite and >= 0, got {}", mix);
        }
    }
    if let Some(c) = &panel.hit4t {
        let criteria = [
            ("thrombocytopenia", c.thrombocytopenia),
            ("timing", c.timing),
            ("thrombosis", c.thrombosis),
            ("other_causes", c.other_causes),
        ];
        for (name, value) in criteria {
            if value > 2 {
                bail!("4T criterion {} must be 0-2, got {}", name, value);
            }
        }
    }
    Ok(())
}

/// Panels whose labels all carry a `_T<digits>` token are sorted by label;
/// otherwise the given order is kept.
pub fn order_timecourse_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut labels: Vec<(String, PathBuf)> = inputs
        .iter()
        .map(|p| (label_from_path(p), p.clone()))
        .collect();
    let all_have_t = labels.iter().all(|(l, _)| has_time_token(l));
    if all_have_t {
        labels.sort_by(|a, b| time_key(&a.0).cmp(&time_key(&b.0)).then(a.0.cmp(&b.0)));
    }
    labels.into_iter().map(|(_, p)| p).collect()
}

fn time_key(label: &str) -> u64 {
    label
        .find("_T")
        .map(|pos| {
            label[pos + 2..]
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect::<String>()
        })
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0)
}

fn has_time_token(label: &str) -> bool {
    if let Some(pos) = label.find("_T") {
        let rest = &label[pos + 2..];
        return rest.chars().take_while(|c| c.is_ascii_digit()).count() > 0;
    }
    false
}

pub fn label_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("panel")
        .to_string()
}
