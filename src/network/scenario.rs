//! Curated teaching scenarios.
//!
//! A preset carries factor levels relative to normal (1.0 = physiological,
//! values above 1.0 model replacement products such as PCC) and kinetic
//! modifiers that only the thrombin-generation simulator reads.

use serde::{Deserialize, Serialize};

use crate::network::{ActivityMap, FactorTable};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KineticModifiers {
    /// Antithrombin rate multiplier (heparins).
    pub at_factor: f64,
    /// Fraction of Xa activity left (anti-Xa agents).
    pub xa_inhibition: f64,
    /// Fraction of thrombin activity left (anti-IIa agents).
    pub iia_inhibition: f64,
}

impl Default for KineticModifiers {
    fn default() -> Self {
        Self {
            at_factor: 1.0,
            xa_inhibition: 1.0,
            iia_inhibition: 1.0,
        }
    }
}

impl KineticModifiers {
    /// Returns false for unknown parameter names.
    pub fn set(&mut self, name: &str, value: f64) -> bool {
        match name {
            "at_factor" => self.at_factor = value,
            "xa_inhibition" => self.xa_inhibition = value,
            "iia_inhibition" => self.iia_inhibition = value,
            _ => return false,
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioPreset {
    pub id: String,
    pub label: String,
    pub factor_levels: Vec<(String, f64)>,
    pub kinetics: KineticModifiers,
}

impl ScenarioPreset {
    pub fn level(&self, factor_id: &str) -> Option<f64> {
        self.factor_levels
            .iter()
            .find(|(id, _)| id == factor_id)
            .map(|(_, level)| *level)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScenarioTable {
    presets: Vec<ScenarioPreset>,
}

impl ScenarioTable {
    pub fn new(presets: Vec<ScenarioPreset>) -> Self {
        Self { presets }
    }

    pub fn get(&self, id: &str) -> Option<&ScenarioPreset> {
        self.presets.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScenarioPreset> {
        self.presets.iter()
    }

    pub fn presets(&self) -> &[ScenarioPreset] {
        &self.presets
    }
}

/// Overrides only the factors the preset names; activity saturates at 1.0.
pub fn apply_preset(
    factors: &FactorTable,
    activity: &ActivityMap,
    preset: &ScenarioPreset,
) -> ActivityMap {
    let mut next = activity.clone();
    for (id, level) in &preset.factor_levels {
        if let Some(factor) = factors.get(id) {
            next.set(id, factor.base_activity * level);
        }
    }
    next
}
