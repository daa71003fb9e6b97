use crate::labs::{Medication, MedicationContext};
use crate::network::ActivityMap;

#[derive(Debug, Clone, PartialEq)]
pub struct CeilingRule {
    pub medication: Medication,
    pub factor_id: String,
    pub ceiling: f64,
}

#[derive(Debug, Clone, Default)]
pub struct CeilingTable {
    rules: Vec<CeilingRule>,
}

impl CeilingTable {
    pub fn new(rules: Vec<CeilingRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[CeilingRule] {
        &self.rules
    }

    pub fn for_medication(&self, med: Medication) -> impl Iterator<Item = &CeilingRule> {
        self.rules.iter().filter(move |r| r.medication == med)
    }
}

/// Caps activities for every active medication. Ceilings only lower a value,
/// so the order the rules run in does not change the result.
pub fn apply_ceilings(
    table: &CeilingTable,
    meds: &MedicationContext,
    activity: &ActivityMap,
) -> ActivityMap {
    let mut next = activity.clone();
    for rule in table.rules() {
        if meds.is_active(rule.medication) {
            next.cap(&rule.factor_id, rule.ceiling);
        }
    }
    next
}
