//! Lab panel types and the status classifier.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabTest {
    Pt,
    Inr,
    Aptt,
    Tt,
    Fibrinogen,
    Platelets,
    DDimers,
    BleedingTime,
}

impl LabTest {
    pub const ALL: [LabTest; 8] = [
        LabTest::Pt,
        LabTest::Inr,
        LabTest::Aptt,
        LabTest::Tt,
        LabTest::Fibrinogen,
        LabTest::Platelets,
        LabTest::DDimers,
        LabTest::BleedingTime,
    ];

    pub fn key(self) -> &'static str {
        match self {
            LabTest::Pt => "pt",
            LabTest::Inr => "inr",
            LabTest::Aptt => "aptt",
            LabTest::Tt => "tt",
            LabTest::Fibrinogen => "fibrinogen",
            LabTest::Platelets => "platelets",
            LabTest::DDimers => "d_dimers",
            LabTest::BleedingTime => "bleeding_time",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.key() == key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MixingTest {
    #[default]
    NotPerformed,
    Corrects,
    DoesNotCorrect,
}

/// One clinical snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabInput {
    pub pt: f64,
    pub inr: f64,
    pub aptt: f64,
    pub tt: f64,
    pub fibrinogen: f64,
    pub platelets: f64,
    pub d_dimers: f64,
    pub bleeding_time: f64,
    pub mixing_test: MixingTest,
    /// aPTT of the 1:1 patient/normal plasma mix, when the lab reports it.
    pub aptt_mix: Option<f64>,
}

impl Default for LabInput {
    fn default() -> Self {
        Self {
            pt: 12.0,
            inr: 1.0,
            aptt: 30.0,
            tt: 16.0,
            fibrinogen: 300.0,
            platelets: 250.0,
            d_dimers: 200.0,
            bleeding_time: 4.0,
            mixing_test: MixingTest::NotPerformed,
            aptt_mix: None,
        }
    }
}

impl LabInput {
    pub fn value(&self, test: LabTest) -> f64 {
        match test {
            LabTest::Pt => self.pt,
            LabTest::Inr => self.inr,
            LabTest::Aptt => self.aptt,
            LabTest::Tt => self.tt,
            LabTest::Fibrinogen => self.fibrinogen,
            LabTest::Platelets => self.platelets,
            LabTest::DDimers => self.d_dimers,
            LabTest::BleedingTime => self.bleeding_time,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Medication {
    Warfarin,
    Heparin,
    Lmwh,
    DoacXa,
    DoacIIa,
    Antiplatelet,
}

impl Medication {
    pub const ALL: [Medication; 6] = [
        Medication::Warfarin,
        Medication::Heparin,
        Medication::Lmwh,
        Medication::DoacXa,
        Medication::DoacIIa,
        Medication::Antiplatelet,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Medication::Warfarin => "warfarin",
            Medication::Heparin => "heparin",
            Medication::Lmwh => "lmwh",
            Medication::DoacXa => "doac_xa",
            Medication::DoacIIa => "doac_iia",
            Medication::Antiplatelet => "antiplatelet",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.key() == key)
    }
}

/// Medications active for a panel. Flags are independent; several may be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct MedicationContext {
    pub warfarin: bool,
    pub heparin: bool,
    pub lmwh: bool,
    pub doac_xa: bool,
    #[serde(rename = "doacIIa")]
    pub doac_iia: bool,
    pub antiplatelet: bool,
}

impl MedicationContext {
    pub fn is_active(&self, med: Medication) -> bool {
        match med {
            Medication::Warfarin => self.warfarin,
            Medication::Heparin => self.heparin,
            Medication::Lmwh => self.lmwh,
            Medication::DoacXa => self.doac_xa,
            Medication::DoacIIa => self.doac_iia,
            Medication::Antiplatelet => self.antiplatelet,
        }
    }

    pub fn active(&self) -> Vec<Medication> {
        Medication::ALL
            .into_iter()
            .filter(|m| self.is_active(*m))
            .collect()
    }

    pub fn any_heparin(&self) -> bool {
        self.heparin || self.lmwh
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabRange {
    pub min: f64,
    pub max: f64,
    pub unit: String,
    pub critical_low: Option<f64>,
    pub critical_high: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabStatus {
    Normal,
    Low,
    High,
    Critical,
}

/// Critical bounds win over the normal band; a value on a bound is in range.
pub fn classify(value: f64, range: &LabRange) -> LabStatus {
    if let Some(low) = range.critical_low {
        if value < low {
            return LabStatus::Critical;
        }
    }
    if let Some(high) = range.critical_high {
        if value > high {
            return LabStatus::Critical;
        }
    }
    if value < range.min {
        LabStatus::Low
    } else if value > range.max {
        LabStatus::High
    } else {
        LabStatus::Normal
    }
}

#[derive(Debug, Clone, Default)]
pub struct RangeTable {
    ranges: BTreeMap<LabTest, LabRange>,
}

impl RangeTable {
    pub fn new(ranges: BTreeMap<LabTest, LabRange>) -> Self {
        Self { ranges }
    }

    pub fn get(&self, test: LabTest) -> Option<&LabRange> {
        self.ranges.get(&test)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LabTest, &LabRange)> {
        self.ranges.iter()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Tests without a range are treated as not applicable, hence normal.
    pub fn status(&self, test: LabTest, value: f64) -> LabStatus {
        match self.get(test) {
            Some(range) => classify(value, range),
            None => LabStatus::Normal,
        }
    }

    pub fn is_above(&self, test: LabTest, value: f64) -> bool {
        match self.get(test) {
            Some(range) => classify(value, range) != LabStatus::Normal && value > range.max,
            None => false,
        }
    }

    pub fn is_below(&self, test: LabTest, value: f64) -> bool {
        match self.get(test) {
            Some(range) => classify(value, range) != LabStatus::Normal && value < range.min,
            None => false,
        }
    }

    pub fn statuses(&self, labs: &LabInput) -> Vec<LabStatusEntry> {
        LabTest::ALL
            .into_iter()
            .map(|test| {
                let value = labs.value(test);
                LabStatusEntry {
                    test,
                    value,
                    unit: self.get(test).map(|r| r.unit.clone()).unwrap_or_default(),
                    status: self.status(test, value),
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabStatusEntry {
    pub test: LabTest,
    pub value: f64,
    pub unit: String,
    pub status: LabStatus,
}

/// Directional abnormality flags the diagnostic rules branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LabFlags {
    pub pt_high: bool,
    pub aptt_high: bool,
    pub tt_high: bool,
    pub fibrinogen_low: bool,
    pub platelets_low: bool,
    pub d_dimer_high: bool,
    pub bleeding_time_high: bool,
    pub all_normal: bool,
}

impl LabFlags {
    pub fn from_labs(labs: &LabInput, ranges: &RangeTable) -> Self {
        let six_normal = [
            LabTest::Pt,
            LabTest::Aptt,
            LabTest::Tt,
            LabTest::Fibrinogen,
            LabTest::Platelets,
            LabTest::DDimers,
        ]
        .into_iter()
        .all(|t| ranges.status(t, labs.value(t)) == LabStatus::Normal);
        let bleeding_time_high = ranges.is_above(LabTest::BleedingTime, labs.bleeding_time);
        let d_dimer_high = ranges.is_above(LabTest::DDimers, labs.d_dimers);

        Self {
            pt_high: ranges.is_above(LabTest::Pt, labs.pt),
            aptt_high: ranges.is_above(LabTest::Aptt, labs.aptt),
            tt_high: ranges.is_above(LabTest::Tt, labs.tt),
            fibrinogen_low: ranges.is_below(LabTest::Fibrinogen, labs.fibrinogen),
            platelets_low: ranges.is_below(LabTest::Platelets, labs.platelets),
            d_dimer_high,
            bleeding_time_high,
            all_normal: six_normal && !bleeding_time_high && !d_dimer_high,
        }
    }
}
