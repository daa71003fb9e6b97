//! The coagulation-factor graph and per-evaluation activity maps.
//!
//! Factor definitions are static configuration. Every evaluation works on an
//! [`ActivityMap`] and each pass returns a new map, so the definitions and any
//! caller-held map are never mutated.

pub mod mapper;
pub mod medication;
pub mod propagate;
pub mod scenario;

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::labs::{LabInput, MedicationContext};
use crate::tables::EngineConfig;

pub use mapper::{FactorEstimate, LabFactorTable, estimate_activities};
pub use medication::{CeilingRule, CeilingTable, apply_ceilings};
pub use propagate::propagate;
pub use scenario::{KineticModifiers, ScenarioPreset, ScenarioTable, apply_preset};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    Zymogen,
    Enzyme,
    Cofactor,
    Procofactor,
    Substrate,
    Product,
    Inhibitor,
    Cell,
    Carrier,
    Activator,
}

impl FactorKind {
    pub fn from_key(key: &str) -> Option<Self> {
        let kind = match key {
            "zymogen" => Self::Zymogen,
            "enzyme" => Self::Enzyme,
            "cofactor" => Self::Cofactor,
            "procofactor" => Self::Procofactor,
            "substrate" => Self::Substrate,
            "product" => Self::Product,
            "inhibitor" => Self::Inhibitor,
            "cell" => Self::Cell,
            "carrier" => Self::Carrier,
            "activator" => Self::Activator,
            _ => return None,
        };
        Some(kind)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Factor {
    pub id: String,
    pub name: String,
    pub short_name: String,
    pub kind: FactorKind,
    pub base_activity: f64,
    pub vit_k_dependent: bool,
    /// Set on activated forms only.
    pub zymogen_id: Option<String>,
    pub parents: Vec<String>,
    pub children: Vec<String>,
    /// Positive-feedback targets. Not traversed by [`propagate`].
    pub feedback_targets: Vec<String>,
    pub inhibits: Vec<String>,
    pub complex_partner: Option<String>,
    pub complex_name: Option<String>,
    /// Physiological plasma concentration, nM.
    pub plasma_nm: Option<f64>,
}

impl Factor {
    pub fn is_activated_form(&self) -> bool {
        self.zymogen_id.is_some()
    }

    pub fn is_enzyme(&self) -> bool {
        self.kind == FactorKind::Enzyme
    }

    pub fn is_cofactor(&self) -> bool {
        self.kind == FactorKind::Cofactor
    }
}

#[derive(Debug, Clone, Default)]
pub struct FactorTable {
    factors: Vec<Factor>,
    index: HashMap<String, usize>,
}

impl FactorTable {
    pub fn new(factors: Vec<Factor>) -> Self {
        let index = factors
            .iter()
            .enumerate()
            .map(|(i, f)| (f.id.clone(), i))
            .collect();
        Self { factors, index }
    }

    pub fn get(&self, id: &str) -> Option<&Factor> {
        self.index.get(id).map(|&i| &self.factors[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Factor> {
        self.factors.iter()
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// (zymogen, activated form) pairs in table order.
    pub fn activation_pairs(&self) -> Vec<(&str, &str)> {
        self.factors
            .iter()
            .filter_map(|f| f.zymogen_id.as_deref().map(|z| (z, f.id.as_str())))
            .collect()
    }

    pub fn feedback_edges(&self) -> Vec<(&str, &str)> {
        let mut out = Vec::new();
        for f in &self.factors {
            for target in &f.feedback_targets {
                out.push((f.id.as_str(), target.as_str()));
            }
        }
        out
    }

    pub fn validate(&self) -> Result<()> {
        if self.index.len() != self.factors.len() {
            bail!("duplicate factor id in factor table");
        }
        for f in &self.factors {
            let refs = f
                .parents
                .iter()
                .chain(&f.children)
                .chain(&f.feedback_targets)
                .chain(&f.inhibits)
                .chain(f.zymogen_id.iter())
                .chain(f.complex_partner.iter());
            for r in refs {
                if self.get(r).is_none() {
                    bail!("factor '{}' references unknown factor '{}'", f.id, r);
                }
            }
            for p in &f.parents {
                let parent = &self.factors[self.index[p]];
                if !parent.children.contains(&f.id) {
                    bail!("edge {} -> {} missing from children of '{}'", p, f.id, p);
                }
            }
            for c in &f.children {
                let child = &self.factors[self.index[c]];
                if !child.parents.contains(&f.id) {
                    bail!("edge {} -> {} missing from parents of '{}'", f.id, c, c);
                }
            }
            if let Some(z) = &f.zymogen_id {
                if !f.parents.contains(z) {
                    bail!("activated form '{}' does not list zymogen '{}' as parent", f.id, z);
                }
                if self.factors[self.index[z]].zymogen_id.is_some() {
                    bail!("zymogen '{}' of '{}' is itself an activated form", z, f.id);
                }
            }
            if !(0.0..=1.0).contains(&f.base_activity) {
                bail!("factor '{}' base activity outside [0, 1]", f.id);
            }
        }
        self.check_acyclic()
    }

    // Kahn's algorithm over parent -> child edges; feedback edges are excluded.
    fn check_acyclic(&self) -> Result<()> {
        let mut in_degree: Vec<usize> = self.factors.iter().map(|f| f.parents.len()).collect();
        let mut queue: VecDeque<usize> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, d)| **d == 0)
            .map(|(i, _)| i)
            .collect();
        let mut visited = 0usize;
        while let Some(i) = queue.pop_front() {
            visited += 1;
            for c in &self.factors[i].children {
                let ci = self.index[c];
                in_degree[ci] -= 1;
                if in_degree[ci] == 0 {
                    queue.push_back(ci);
                }
            }
        }
        if visited != self.factors.len() {
            let stuck: HashSet<&str> = in_degree
                .iter()
                .enumerate()
                .filter(|(_, d)| **d > 0)
                .map(|(i, _)| self.factors[i].id.as_str())
                .collect();
            let mut stuck: Vec<&str> = stuck.into_iter().collect();
            stuck.sort_unstable();
            bail!("activation graph has a cycle through {}", stuck.join(", "));
        }
        Ok(())
    }

    pub fn snapshot(&self, activity: &ActivityMap) -> Vec<FactorState> {
        self.factors
            .iter()
            .map(|f| FactorState {
                id: f.id.clone(),
                name: f.name.clone(),
                short_name: f.short_name.clone(),
                activity: activity.get(&f.id).unwrap_or(f.base_activity),
                base_activity: f.base_activity,
                is_activated_form: f.is_activated_form(),
                zymogen_id: f.zymogen_id.clone(),
            })
            .collect()
    }
}

/// A factor's activity after one evaluation, as handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorState {
    pub id: String,
    pub name: String,
    pub short_name: String,
    pub activity: f64,
    pub base_activity: f64,
    pub is_activated_form: bool,
    pub zymogen_id: Option<String>,
}

/// Factor id -> activity fraction in [0, 1].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActivityMap(BTreeMap<String, f64>);

impl ActivityMap {
    pub fn baseline(factors: &FactorTable) -> Self {
        Self(
            factors
                .iter()
                .map(|f| (f.id.clone(), f.base_activity))
                .collect(),
        )
    }

    pub fn get(&self, id: &str) -> Option<f64> {
        self.0.get(id).copied()
    }

    /// Unknown ids and NaN values are ignored.
    pub fn set(&mut self, id: &str, value: f64) {
        if value.is_nan() {
            return;
        }
        if let Some(slot) = self.0.get_mut(id) {
            *slot = value.clamp(0.0, 1.0);
        }
    }

    pub fn cap(&mut self, id: &str, ceiling: f64) {
        if let Some(current) = self.get(id) {
            self.set(id, current.min(ceiling));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ActivityEvaluation {
    pub estimates: Vec<FactorEstimate>,
    pub scenario: Option<String>,
    pub seeded: ActivityMap,
    pub medicated: ActivityMap,
    pub activity: ActivityMap,
}

/// Lab-derived estimates, or a scenario preset when one is named and known.
pub fn seed_activity(
    config: &EngineConfig,
    labs: &LabInput,
    meds: &MedicationContext,
    scenario: Option<&str>,
) -> (ActivityMap, Vec<FactorEstimate>, Option<String>) {
    let estimates = estimate_activities(
        &config.factors,
        &config.ranges,
        &config.lab_factors,
        labs,
        meds,
    );
    let baseline = ActivityMap::baseline(&config.factors);
    if let Some(preset) = scenario.and_then(|key| config.scenarios.get(key)) {
        let seeded = apply_preset(&config.factors, &baseline, preset);
        return (seeded, estimates, Some(preset.id.clone()));
    }
    let mut seeded = baseline;
    for est in &estimates {
        seeded.set(&est.factor_id, est.activity_percent / 100.0);
    }
    (seeded, estimates, None)
}

pub fn evaluate_activity(
    config: &EngineConfig,
    labs: &LabInput,
    meds: &MedicationContext,
    scenario: Option<&str>,
) -> ActivityEvaluation {
    let (seeded, estimates, scenario) = seed_activity(config, labs, meds, scenario);
    let medicated = apply_ceilings(&config.ceilings, meds, &seeded);
    let activity = propagate(&config.factors, &medicated);
    ActivityEvaluation {
        estimates,
        scenario,
        seeded,
        medicated,
        activity,
    }
}
