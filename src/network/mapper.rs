//! Lab values -> per-factor activity estimates.
//!
//! Clotting-time assays are sums over many factors, so a single prolonged
//! assay cannot pin down which member is low. The estimate uses two rules:
//! a prolonged assay bounds the activity of every member it attributes the
//! prolongation to, and a normal assay exonerates every member it contains.
//! Fibrinogen and platelets are measured directly and only lowered below
//! the reference band.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::labs::{LabInput, LabTest, MedicationContext, RangeTable};
use crate::math::round_to;
use crate::network::FactorTable;

/// Steepness of the clotting-time/activity relationship.
pub const CLOTTING_TIME_EXPONENT: f64 = 3.0;

const CLOTTING_ASSAYS: [LabTest; 2] = [LabTest::Pt, LabTest::Aptt];
const DIRECT_ASSAYS: [LabTest; 2] = [LabTest::Fibrinogen, LabTest::Platelets];

#[derive(Debug, Clone, Default)]
pub struct LabFactorTable {
    members: BTreeMap<LabTest, Vec<String>>,
}

impl LabFactorTable {
    pub fn new(members: BTreeMap<LabTest, Vec<String>>) -> Self {
        Self { members }
    }

    pub fn members(&self, test: LabTest) -> &[String] {
        self.members.get(&test).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, test: LabTest, factor_id: &str) -> bool {
        self.members(test).iter().any(|f| f == factor_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LabTest, &Vec<String>)> {
        self.members.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorEstimate {
    pub factor_id: String,
    /// 0-100.
    pub activity_percent: f64,
    pub concentration_nm: Option<f64>,
}

pub fn estimate_activities(
    factors: &FactorTable,
    ranges: &RangeTable,
    membership: &LabFactorTable,
    labs: &LabInput,
    meds: &MedicationContext,
) -> Vec<FactorEstimate> {
    let mut out = Vec::new();
    for factor in factors.iter() {
        let in_any = LabTest::ALL
            .into_iter()
            .any(|t| membership.contains(t, &factor.id));
        if !in_any {
            continue;
        }

        let fraction = match DIRECT_ASSAYS
            .into_iter()
            .find(|t| membership.contains(*t, &factor.id))
        {
            Some(test) => direct_fraction(ranges, test, labs.value(test)),
            None => clotting_fraction(ranges, membership, labs, meds, &factor.id, factor.vit_k_dependent),
        };

        out.push(FactorEstimate {
            factor_id: factor.id.clone(),
            activity_percent: round_to(fraction * 100.0, 1),
            concentration_nm: factor.plasma_nm.map(|nm| round_to(nm * fraction, 3)),
        });
    }
    out
}

fn clotting_fraction(
    ranges: &RangeTable,
    membership: &LabFactorTable,
    labs: &LabInput,
    meds: &MedicationContext,
    factor_id: &str,
    vit_k_dependent: bool,
) -> f64 {
    let assays: Vec<LabTest> = CLOTTING_ASSAYS
        .into_iter()
        .filter(|t| membership.contains(*t, factor_id))
        .collect();

    if assays
        .iter()
        .any(|t| !ranges.is_above(*t, labs.value(*t)))
    {
        return 1.0;
    }

    assays
        .iter()
        .map(|&t| {
            if drug_explains(t, meds, vit_k_dependent) {
                1.0
            } else {
                time_fraction(ranges, t, labs.value(t))
            }
        })
        .fold(1.0, f64::min)
}

fn drug_explains(test: LabTest, meds: &MedicationContext, vit_k_dependent: bool) -> bool {
    match test {
        LabTest::Aptt => meds.heparin || meds.doac_iia,
        LabTest::Pt => meds.doac_xa || meds.doac_iia || (meds.warfarin && !vit_k_dependent),
        _ => false,
    }
}

fn time_fraction(ranges: &RangeTable, test: LabTest, value: f64) -> f64 {
    let Some(range) = ranges.get(test) else {
        return 1.0;
    };
    if value <= range.max || value <= 0.0 {
        return 1.0;
    }
    (range.max / value).powf(CLOTTING_TIME_EXPONENT).clamp(0.0, 1.0)
}

fn direct_fraction(ranges: &RangeTable, test: LabTest, value: f64) -> f64 {
    let Some(range) = ranges.get(test) else {
        return 1.0;
    };
    if value >= range.min || range.min <= 0.0 {
        return 1.0;
    }
    (value / range.min).clamp(0.0, 1.0)
}
