//! Clinical scores computed from a lab panel.

pub mod hit4t;
pub mod inr;
pub mod isth;
pub mod rosner;
pub mod timecourse;

use serde::{Deserialize, Serialize};

/// Reagent and reference constants the score formulas depend on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub pt_normal_s: f64,
    pub isi: f64,
    pub aptt_normal_s: f64,
}

impl Calibration {
    pub fn default_v1() -> Self {
        Self {
            pt_normal_s: 12.0,
            isi: 1.0,
            aptt_normal_s: 30.0,
        }
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::default_v1()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsthCategory {
    Unlikely,
    NonOvert,
    Overt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IsthScore {
    pub platelets: u8,
    pub d_dimer: u8,
    pub pt_prolongation: u8,
    pub fibrinogen: u8,
    pub total: u8,
    pub category: IsthCategory,
    pub interpretation: String,
}

/// Each criterion is scored 0-2 by the clinician.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Hit4TCriteria {
    pub thrombocytopenia: u8,
    pub timing: u8,
    pub thrombosis: u8,
    pub other_causes: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hit4TProbability {
    Low,
    Intermediate,
    High,
}

impl Hit4TProbability {
    pub fn as_str(self) -> &'static str {
        match self {
            Hit4TProbability::Low => "low",
            Hit4TProbability::Intermediate => "intermediate",
            Hit4TProbability::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hit4TScore {
    pub thrombocytopenia: u8,
    pub timing: u8,
    pub thrombosis: u8,
    pub other_causes: u8,
    pub total: u8,
    pub probability: Hit4TProbability,
    pub interpretation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixingInterpretation {
    FactorDeficiency,
    Indeterminate,
    Inhibitor,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosnerResult {
    pub index: f64,
    pub interpretation: MixingInterpretation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimepointSummary {
    pub label: String,
    pub pt: f64,
    pub inr: f64,
    pub aptt: f64,
    pub platelets: f64,
    pub fibrinogen: f64,
    pub d_dimers: f64,
    pub isth_total: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaSummary {
    pub from: String,
    pub to: String,
    pub delta_inr: f64,
    pub delta_aptt: f64,
    pub delta_platelets: f64,
    pub delta_fibrinogen: f64,
    pub delta_d_dimers: f64,
    pub delta_isth: i16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimecourseResult {
    pub timepoints: Vec<TimepointSummary>,
    pub deltas: Vec<DeltaSummary>,
    pub trajectory: String,
}
