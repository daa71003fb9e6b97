//! Lab-specific rules that run after the primary pattern.

use crate::diagnosis::patterns::{ISOLATED_D_DIMER, ISOLATED_TT};
use crate::diagnosis::{Findings, Rule, RuleInput};
use crate::labs::LabTest;
use crate::scores::{Hit4TProbability, MixingInterpretation};

pub const WARFARIN_INR_LOW: f64 = 2.0;
pub const WARFARIN_INR_HIGH: f64 = 3.0;

pub fn ordered() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(CriticalValues),
        Box::new(RosnerIndex),
        Box::new(HitScore),
        Box::new(WarfarinMonitoring),
        Box::new(DDimerNonSpecific),
        Box::new(ThrombinTime),
    ]
}

fn critical_high(input: &RuleInput, test: LabTest) -> bool {
    input
        .ranges
        .get(test)
        .and_then(|r| r.critical_high)
        .is_some_and(|limit| input.labs.value(test) > limit)
}

fn critical_low(input: &RuleInput, test: LabTest) -> bool {
    input
        .ranges
        .get(test)
        .and_then(|r| r.critical_low)
        .is_some_and(|limit| input.labs.value(test) < limit)
}

struct CriticalValues;

impl Rule for CriticalValues {
    fn name(&self) -> &'static str {
        "critical_values"
    }

    fn matches(&self, input: &RuleInput) -> bool {
        critical_high(input, LabTest::Inr)
            || critical_high(input, LabTest::Pt)
            || critical_low(input, LabTest::Platelets)
            || critical_low(input, LabTest::Fibrinogen)
    }

    fn apply(&self, input: &RuleInput, out: &mut Findings) {
        let labs = input.labs;
        let mut critical = Vec::new();
        if critical_high(input, LabTest::Inr) || critical_high(input, LabTest::Pt) {
            critical.push(format!(
                "CRITICAL: INR {:.1} / PT {:.1} s indicates incoagulable plasma; assess for bleeding and reverse anticoagulation",
                labs.inr, labs.pt
            ));
        }
        if critical_low(input, LabTest::Platelets) {
            critical.push(format!(
                "CRITICAL: platelets {:.0} x10^3/uL, risk of spontaneous hemorrhage",
                labs.platelets
            ));
        }
        if critical_low(input, LabTest::Fibrinogen) {
            critical.push(format!(
                "CRITICAL: fibrinogen {:.0} mg/dL, replace with cryoprecipitate or concentrate if bleeding",
                labs.fibrinogen
            ));
        }
        for warning in critical.into_iter().rev() {
            out.warn_first(warning);
        }
    }
}

struct RosnerIndex;

impl Rule for RosnerIndex {
    fn name(&self) -> &'static str {
        "rosner_index"
    }

    fn matches(&self, input: &RuleInput) -> bool {
        input.rosner.is_some()
    }

    fn apply(&self, input: &RuleInput, out: &mut Findings) {
        let Some(result) = input.rosner else {
            return;
        };
        match result.interpretation {
            MixingInterpretation::FactorDeficiency => out.recommend(format!(
                "Rosner index {:.1} (<=11): mixing corrects, consistent with factor deficiency",
                result.index
            )),
            MixingInterpretation::Inhibitor => out.recommend(format!(
                "Rosner index {:.1} (>15): mixing does not correct, consistent with an inhibitor",
                result.index
            )),
            MixingInterpretation::Indeterminate => out.warn(format!(
                "Rosner index {:.1} is indeterminate (11-15); repeat the mixing study with 2 h incubation",
                result.index
            )),
        }
    }
}

struct HitScore;

impl Rule for HitScore {
    fn name(&self) -> &'static str {
        "hit_4t"
    }

    fn matches(&self, input: &RuleInput) -> bool {
        input.hit4t.is_some() || (input.meds.any_heparin() && input.flags.platelets_low)
    }

    fn apply(&self, input: &RuleInput, out: &mut Findings) {
        let Some(score) = input.hit4t.clone() else {
            out.recommend("Heparin with a low platelet count: calculate the 4T score for HIT");
            return;
        };
        match score.probability {
            Hit4TProbability::High | Hit4TProbability::Intermediate => out.warn(format!(
                "4T score {}/8: stop all heparin, including flushes, and start a non-heparin anticoagulant",
                score.total
            )),
            Hit4TProbability::Low => out.recommend(format!(
                "4T score {}/8: {}",
                score.total, score.interpretation
            )),
        }
        out.hit4t = Some(score);
    }
}

struct WarfarinMonitoring;

impl Rule for WarfarinMonitoring {
    fn name(&self) -> &'static str {
        "warfarin_monitoring"
    }

    fn matches(&self, input: &RuleInput) -> bool {
        input.meds.warfarin
    }

    fn apply(&self, input: &RuleInput, out: &mut Findings) {
        let inr = input.labs.inr;
        if inr < WARFARIN_INR_LOW {
            out.recommend(format!(
                "INR {:.1} below the warfarin target 2.0-3.0: subtherapeutic, review dose and adherence",
                inr
            ));
        } else if inr > WARFARIN_INR_HIGH {
            out.warn(format!(
                "INR {:.1} above the warfarin target 2.0-3.0: bleeding risk, hold doses and consider vitamin K",
                inr
            ));
        } else {
            out.recommend(format!("INR {:.1} within the warfarin target 2.0-3.0", inr));
        }
    }
}

struct DDimerNonSpecific;

impl Rule for DDimerNonSpecific {
    fn name(&self) -> &'static str {
        "d_dimer_non_specific"
    }

    fn matches(&self, input: &RuleInput) -> bool {
        input.flags.d_dimer_high
    }

    fn apply(&self, _input: &RuleInput, out: &mut Findings) {
        if out.pattern_rule == Some(ISOLATED_D_DIMER) || out.has_diagnosis("dic") {
            return;
        }
        out.warn("Elevated D-dimer is non-specific and should be read against the clinical picture");
    }
}

struct ThrombinTime;

impl Rule for ThrombinTime {
    fn name(&self) -> &'static str {
        "thrombin_time"
    }

    fn matches(&self, input: &RuleInput) -> bool {
        input.flags.tt_high
    }

    fn apply(&self, input: &RuleInput, out: &mut Findings) {
        if out.pattern_rule == Some(ISOLATED_TT) {
            return;
        }
        if input.meds.heparin || input.meds.doac_iia {
            out.recommend("Prolonged TT is expected with heparin or dabigatran");
        } else {
            out.recommend("Prolonged TT: check fibrinogen level and function (reptilase time)");
        }
    }
}
