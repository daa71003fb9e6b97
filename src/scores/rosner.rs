use crate::labs::MixingTest;
use crate::math::round_to;
use crate::scores::{Calibration, MixingInterpretation, RosnerResult};

pub const DEFICIENCY_MAX: f64 = 11.0;
pub const INHIBITOR_MIN: f64 = 15.0;

/// ((aPTT_mix - aPTT_normal) / aPTT_patient) * 100, one decimal.
/// A zero patient aPTT yields 0.
pub fn rosner_index(aptt_mix_s: f64, aptt_patient_s: f64, cal: &Calibration) -> f64 {
    if aptt_patient_s == 0.0 {
        return 0.0;
    }
    round_to(
        (aptt_mix_s - cal.aptt_normal_s) / aptt_patient_s * 100.0,
        1,
    )
}

pub fn interpret_index(index: f64) -> MixingInterpretation {
    if index <= DEFICIENCY_MAX {
        MixingInterpretation::FactorDeficiency
    } else if index > INHIBITOR_MIN {
        MixingInterpretation::Inhibitor
    } else {
        MixingInterpretation::Indeterminate
    }
}

pub fn evaluate(aptt_mix_s: f64, aptt_patient_s: f64, cal: &Calibration) -> RosnerResult {
    let index = rosner_index(aptt_mix_s, aptt_patient_s, cal);
    RosnerResult {
        index,
        interpretation: interpret_index(index),
    }
}

impl MixingInterpretation {
    pub fn as_mixing_test(self) -> MixingTest {
        match self {
            MixingInterpretation::FactorDeficiency => MixingTest::Corrects,
            MixingInterpretation::Inhibitor => MixingTest::DoesNotCorrect,
            MixingInterpretation::Indeterminate => MixingTest::NotPerformed,
        }
    }
}
