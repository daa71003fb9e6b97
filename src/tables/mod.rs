//! Static configuration tables.
//!
//! Everything the engine looks up (factor graph, reference ranges, lab
//! membership, medication ceilings, scenario presets) is loaded once into an
//! immutable [`EngineConfig`] and passed by reference.

mod loader;

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::labs::{LabRange, LabTest, RangeTable};
use crate::network::{CeilingTable, FactorTable, LabFactorTable, ScenarioPreset, ScenarioTable};
use crate::scores::Calibration;

pub use loader::{load_ranges_tsv, load_scenarios_tsv, merge_by_key};

pub const TABLES_VERSION: &str = "v1";

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub version: String,
    pub factors: FactorTable,
    pub ranges: RangeTable,
    pub lab_factors: LabFactorTable,
    pub ceilings: CeilingTable,
    pub scenarios: ScenarioTable,
    pub calibration: Calibration,
}

pub fn load_builtin() -> Result<EngineConfig> {
    let config = EngineConfig {
        version: TABLES_VERSION.to_string(),
        factors: FactorTable::new(loader::builtin_factors()?),
        ranges: RangeTable::new(loader::builtin_ranges()?.into_iter().collect()),
        lab_factors: LabFactorTable::new(loader::builtin_lab_factors()?),
        ceilings: CeilingTable::new(loader::builtin_ceilings()?),
        scenarios: ScenarioTable::new(loader::builtin_scenarios()?),
        calibration: Calibration::default_v1(),
    };
    config.validate().context("built-in tables failed validation")?;
    Ok(config)
}

pub fn load_user_ranges(path: &Path) -> Result<Vec<(LabTest, LabRange)>> {
    load_ranges_tsv(path)
}

pub fn load_user_scenarios(path: &Path) -> Result<Vec<ScenarioPreset>> {
    load_scenarios_tsv(path)
}

impl EngineConfig {
    /// Overlays user range and scenario tables, then re-validates.
    pub fn with_overlays(
        mut self,
        ranges_path: Option<&Path>,
        scenarios_path: Option<&Path>,
    ) -> Result<Self> {
        if let Some(path) = ranges_path {
            let user = load_user_ranges(path)?;
            let builtin: Vec<(LabTest, LabRange)> = self
                .ranges
                .iter()
                .map(|(t, r)| (*t, r.clone()))
                .collect();
            let merged = merge_by_key(builtin, user, |(test, _)| *test);
            let map: BTreeMap<LabTest, LabRange> = merged.into_iter().collect();
            self.ranges = RangeTable::new(map);
        }
        if let Some(path) = scenarios_path {
            let user = load_user_scenarios(path)?;
            let merged = merge_by_key(self.scenarios.presets().to_vec(), user, |p| p.id.clone());
            self.scenarios = ScenarioTable::new(merged);
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        self.factors.validate()?;

        for test in LabTest::ALL {
            if self.ranges.get(test).is_none() {
                bail!("no reference range for lab '{}'", test.key());
            }
        }
        for (test, members) in self.lab_factors.iter() {
            for id in members {
                if self.factors.get(id).is_none() {
                    bail!("lab '{}' lists unknown factor '{}'", test.key(), id);
                }
            }
        }
        for rule in self.ceilings.rules() {
            if self.factors.get(&rule.factor_id).is_none() {
                bail!(
                    "medication '{}' caps unknown factor '{}'",
                    rule.medication.key(),
                    rule.factor_id
                );
            }
        }
        for preset in self.scenarios.iter() {
            for (id, _) in &preset.factor_levels {
                if self.factors.get(id).is_none() {
                    bail!("scenario '{}' sets unknown factor '{}'", preset.id, id);
                }
            }
        }
        Ok(())
    }

    pub fn scenario_keys(&self) -> Vec<&str> {
        self.scenarios.iter().map(|p| p.id.as_str()).collect()
    }
}
