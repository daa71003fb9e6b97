//! Rule-based interpretation of a lab panel.
//!
//! Patterns are tried in priority order and the first match classifies the
//! panel. Addenda then run independently and may append diagnoses,
//! recommendations and warnings on top of the primary pattern.

mod addenda;
mod patterns;
mod rules;

use serde::{Deserialize, Serialize};

use crate::labs::{LabFlags, LabInput, MedicationContext, MixingTest, RangeTable};
use crate::scores::{Calibration, Hit4TCriteria, Hit4TScore, IsthScore, MixingInterpretation, RosnerResult, hit4t, rosner};
use crate::tables::EngineConfig;

pub use rules::{RULE_SET_VERSION, Rule, RuleSet};

pub const UNCHARACTERISTIC_PATTERN: &str = "uncharacteristic profile";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Probability {
    Low,
    Moderate,
    High,
}

impl Probability {
    pub fn downgrade(self) -> Self {
        match self {
            Probability::High => Probability::Moderate,
            Probability::Moderate | Probability::Low => Probability::Low,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Probability::Low => "low",
            Probability::Moderate => "moderate",
            Probability::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pathway {
    #[default]
    None,
    Intrinsic,
    Extrinsic,
    Common,
    Platelet,
}

impl Pathway {
    pub fn as_str(self) -> &'static str {
        match self {
            Pathway::None => "none",
            Pathway::Intrinsic => "intrinsic",
            Pathway::Extrinsic => "extrinsic",
            Pathway::Common => "common",
            Pathway::Platelet => "platelet",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
    pub id: String,
    pub name: String,
    pub probability: Probability,
    pub description: String,
    pub affected_factors: Vec<String>,
    pub suggested_tests: Vec<String>,
}

impl Diagnosis {
    pub fn new(id: &str, name: &str, probability: Probability) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            probability,
            description: String::new(),
            affected_factors: Vec::new(),
            suggested_tests: Vec::new(),
        }
    }

    pub fn describe(mut self, text: &str) -> Self {
        self.description = text.to_string();
        self
    }

    pub fn factors(mut self, ids: &[&str]) -> Self {
        self.affected_factors = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn tests(mut self, tests: &[&str]) -> Self {
        self.suggested_tests = tests.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_probability(mut self, probability: Probability) -> Self {
        self.probability = probability;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalInterpretation {
    pub pattern: String,
    pub affected_pathway: Pathway,
    pub diagnoses: Vec<Diagnosis>,
    pub recommendations: Vec<String>,
    pub warnings: Vec<String>,
    pub isth_score: Option<IsthScore>,
    #[serde(rename = "hit4TScore")]
    pub hit4t_score: Option<Hit4TScore>,
    pub rule_set_version: String,
}

/// Everything a rule may read. Built once per panel.
#[derive(Debug, Clone)]
pub struct RuleInput<'a> {
    pub labs: &'a LabInput,
    pub meds: &'a MedicationContext,
    pub ranges: &'a RangeTable,
    pub calibration: &'a Calibration,
    pub flags: LabFlags,
    /// Reported mixing result, or the one the Rosner index implies.
    pub mixing: MixingTest,
    pub rosner: Option<RosnerResult>,
    pub hit4t: Option<Hit4TScore>,
}

impl<'a> RuleInput<'a> {
    pub fn new(
        config: &'a EngineConfig,
        labs: &'a LabInput,
        meds: &'a MedicationContext,
        hit4t_criteria: Option<&Hit4TCriteria>,
    ) -> Self {
        let flags = LabFlags::from_labs(labs, &config.ranges);
        let rosner = match (labs.mixing_test, labs.aptt_mix) {
            (MixingTest::NotPerformed, Some(mix)) => {
                Some(rosner::evaluate(mix, labs.aptt, &config.calibration))
            }
            _ => None,
        };
        let mixing = match rosner {
            Some(r) if r.interpretation != MixingInterpretation::Indeterminate => {
                r.interpretation.as_mixing_test()
            }
            _ => labs.mixing_test,
        };
        Self {
            labs,
            meds,
            ranges: &config.ranges,
            calibration: &config.calibration,
            flags,
            mixing,
            rosner,
            hit4t: hit4t_criteria.map(hit4t::score),
        }
    }
}

/// Mutable accumulator the rules write into.
#[derive(Debug, Clone, Default)]
pub struct Findings {
    pub pattern: Option<String>,
    pub pattern_rule: Option<&'static str>,
    pub pathway: Pathway,
    pub diagnoses: Vec<Diagnosis>,
    pub recommendations: Vec<String>,
    pub warnings: Vec<String>,
    pub isth: Option<IsthScore>,
    pub hit4t: Option<Hit4TScore>,
}

impl Findings {
    pub fn classify(&mut self, pattern: &str, pathway: Pathway) {
        self.pattern = Some(pattern.to_string());
        self.pathway = pathway;
    }

    pub fn push(&mut self, diagnosis: Diagnosis) {
        self.diagnoses.push(diagnosis);
    }

    /// Places `front` ahead of everything already listed, keeping its order.
    pub fn unshift_all(&mut self, front: Vec<Diagnosis>) {
        if front.is_empty() {
            return;
        }
        let rest = std::mem::take(&mut self.diagnoses);
        self.diagnoses = front;
        self.diagnoses.extend(rest);
    }

    pub fn recommend(&mut self, text: impl Into<String>) {
        self.recommendations.push(text.into());
    }

    pub fn warn(&mut self, text: impl Into<String>) {
        self.warnings.push(text.into());
    }

    pub fn warn_first(&mut self, text: impl Into<String>) {
        self.warnings.insert(0, text.into());
    }

    pub fn has_diagnosis(&self, id: &str) -> bool {
        self.diagnoses.iter().any(|d| d.id == id)
    }

    pub fn into_interpretation(self, version: &str) -> ClinicalInterpretation {
        ClinicalInterpretation {
            pattern: self
                .pattern
                .unwrap_or_else(|| UNCHARACTERISTIC_PATTERN.to_string()),
            affected_pathway: self.pathway,
            diagnoses: self.diagnoses,
            recommendations: self.recommendations,
            warnings: self.warnings,
            isth_score: self.isth,
            hit4t_score: self.hit4t,
            rule_set_version: version.to_string(),
        }
    }
}

/// Interprets one panel with the canonical rule set.
pub fn interpret(
    config: &EngineConfig,
    labs: &LabInput,
    meds: &MedicationContext,
    hit4t_criteria: Option<&Hit4TCriteria>,
) -> ClinicalInterpretation {
    let input = RuleInput::new(config, labs, meds, hit4t_criteria);
    RuleSet::canonical_v1().evaluate(&input)
}
