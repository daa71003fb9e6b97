//! 4T pretest probability for heparin-induced thrombocytopenia.

use crate::scores::{Hit4TCriteria, Hit4TProbability, Hit4TScore};

pub const CRITERION_MAX: u8 = 2;

pub fn probability(total: u8) -> Hit4TProbability {
    match total {
        0..=3 => Hit4TProbability::Low,
        4..=5 => Hit4TProbability::Intermediate,
        _ => Hit4TProbability::High,
    }
}

pub fn advisory(probability: Hit4TProbability) -> &'static str {
    match probability {
        Hit4TProbability::Low => {
            "Low probability (<5%): HIT unlikely, anti-PF4 testing usually not needed"
        }
        Hit4TProbability::Intermediate => {
            "Intermediate probability (~14%): stop heparin, send anti-PF4 antibodies, start a non-heparin anticoagulant"
        }
        Hit4TProbability::High => {
            "High probability (~64%): stop all heparin now, start argatroban or fondaparinux, confirm with anti-PF4 and functional assay"
        }
    }
}

/// Criteria above 2 are capped so the total stays within 0-8.
pub fn score(criteria: &Hit4TCriteria) -> Hit4TScore {
    let thrombocytopenia = criteria.thrombocytopenia.min(CRITERION_MAX);
    let timing = criteria.timing.min(CRITERION_MAX);
    let thrombosis = criteria.thrombosis.min(CRITERION_MAX);
    let other_causes = criteria.other_causes.min(CRITERION_MAX);
    let total = thrombocytopenia + timing + thrombosis + other_causes;
    let probability = probability(total);
    Hit4TScore {
        thrombocytopenia,
        timing,
        thrombosis,
        other_causes,
        total,
        probability,
        interpretation: advisory(probability).to_string(),
    }
}
