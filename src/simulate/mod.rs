//! Thrombin-generation simulation.
//!
//! Integrates the plasma cascade after a tissue-factor trigger. Scenario
//! presets scale the initial zymogen and inhibitor concentrations and set the
//! kinetic modifiers (heparin potentiation of antithrombin, direct Xa and
//! thrombin inhibition).

pub mod integrator;
pub mod kinetics;

use std::collections::BTreeMap;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::math::stats::{argmax, trapezoid_area};
use crate::network::{KineticModifiers, ScenarioPreset};

pub use integrator::{IntegratorConfig, Rk4Integrator};
pub use kinetics::{N_SPECIES, RateConstants, Species, derivatives};

/// First time thrombin exceeds this marks the end of the lag phase.
pub const LAG_THRESHOLD_NM: f64 = 10.0;

pub const EXPORT_SPECIES: [Species; 7] = [
    Species::Iia,
    Species::Xa,
    Species::Ixa,
    Species::Viiia,
    Species::Va,
    Species::Fibrin,
    Species::TfViia,
];

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub t_end_s: f64,
    pub dt_s: f64,
    /// Number of recorded samples, both ends included.
    pub t_points: usize,
    pub tf_nm: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            t_end_s: 600.0,
            dt_s: 0.005,
            t_points: 1000,
            tf_nm: 25.0,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.t_end_s.is_finite() && self.t_end_s > 0.0) {
            bail!("t_end must be positive, got {}", self.t_end_s);
        }
        if !(self.dt_s.is_finite() && self.dt_s > 0.0) {
            bail!("dt must be positive, got {}", self.dt_s);
        }
        if self.dt_s > self.t_end_s {
            bail!("dt {} exceeds t_end {}", self.dt_s, self.t_end_s);
        }
        if self.t_points < 2 {
            bail!("at least 2 time points are required");
        }
        if !(self.tf_nm.is_finite() && self.tf_nm >= 0.0) {
            bail!("tissue factor must be finite and >= 0, got {}", self.tf_nm);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationMetrics {
    pub peak_iia_nm: f64,
    pub time_to_peak_s: f64,
    /// None when thrombin never crosses the lag threshold.
    pub lag_time_s: Option<f64>,
    pub peak_xa_nm: f64,
    pub final_fibrin_nm: f64,
    /// Endogenous thrombin potential, area under the thrombin curve (nM*s).
    pub etp_nm_s: f64,
}

#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub scenario: String,
    pub time: Vec<f64>,
    pub concentrations: BTreeMap<Species, Vec<f64>>,
    pub parameters: BTreeMap<String, f64>,
}

impl SimulationResult {
    pub fn series(&self, species: Species) -> &[f64] {
        self.concentrations
            .get(&species)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn metrics(&self) -> SimulationMetrics {
        let iia = self.series(Species::Iia);
        let peak_idx = argmax(iia);
        let peak_iia_nm = peak_idx.map(|i| iia[i]).unwrap_or(0.0);
        let time_to_peak_s = peak_idx.map(|i| self.time[i]).unwrap_or(0.0);
        let lag_time_s = iia
            .iter()
            .position(|&c| c > LAG_THRESHOLD_NM)
            .map(|i| self.time[i]);
        let peak_xa_nm = self
            .series(Species::Xa)
            .iter()
            .copied()
            .fold(0.0, f64::max);
        let final_fibrin_nm = self.series(Species::Fibrin).last().copied().unwrap_or(0.0);
        SimulationMetrics {
            peak_iia_nm,
            time_to_peak_s,
            lag_time_s,
            peak_xa_nm,
            final_fibrin_nm,
            etp_nm_s: trapezoid_area(&self.time, iia),
        }
    }

    /// Every `time_step`-th sample of the exported species.
    pub fn export(&self, time_step: usize) -> SimulationExport {
        let step = time_step.max(1);
        let time = self.time.iter().step_by(step).copied().collect();
        let factors = EXPORT_SPECIES
            .into_iter()
            .map(|s| {
                (
                    s.label().to_string(),
                    self.series(s).iter().step_by(step).copied().collect(),
                )
            })
            .collect();
        SimulationExport {
            scenario: self.scenario.clone(),
            parameters: self.parameters.clone(),
            metrics: self.metrics(),
            time,
            factors,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationExport {
    pub scenario: String,
    pub parameters: BTreeMap<String, f64>,
    pub metrics: SimulationMetrics,
    pub time: Vec<f64>,
    pub factors: BTreeMap<String, Vec<f64>>,
}

pub struct ThrombinSimulator {
    pub rates: RateConstants,
    pub config: SimulationConfig,
}

impl ThrombinSimulator {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            rates: RateConstants::default_v1(),
            config,
        }
    }

    /// Physiological concentrations scaled by the preset, plus the TF trigger.
    pub fn initial_state(&self, preset: Option<&ScenarioPreset>) -> Vec<f64> {
        let mut y: Vec<f64> = Species::ALL.iter().map(|s| s.initial_nm()).collect();
        if let Some(preset) = preset {
            for (factor_id, level) in &preset.factor_levels {
                if let Some(species) = Species::from_factor_id(factor_id) {
                    y[species.idx()] = species.initial_nm() * level;
                }
            }
        }
        y[Species::Tf.idx()] = self.config.tf_nm;
        y
    }

    pub fn run(&self, preset: Option<&ScenarioPreset>) -> Result<SimulationResult> {
        self.config.validate()?;
        let modifiers = preset.map(|p| p.kinetics).unwrap_or_default();
        let mut y = self.initial_state(preset);

        let n_steps = (self.config.t_end_s / self.config.dt_s).round().max(1.0) as usize;
        let stride = (n_steps / (self.config.t_points - 1)).max(1);

        let mut time = Vec::with_capacity(n_steps / stride + 2);
        let mut traces: Vec<Vec<f64>> = vec![Vec::with_capacity(n_steps / stride + 2); N_SPECIES];
        let mut record = |t: f64, y: &[f64]| {
            time.push(t);
            for (trace, &c) in traces.iter_mut().zip(y) {
                trace.push(c);
            }
        };
        record(0.0, &y);

        let mut integrator = Rk4Integrator::new(
            N_SPECIES,
            IntegratorConfig {
                dt_s: self.config.dt_s,
                min_concentration_nm: 0.0,
            },
        );
        let rates = &self.rates;
        for step in 1..=n_steps {
            integrator.step(&mut y, |state, dydt| {
                derivatives(rates, &modifiers, state, dydt)
            });
            if step % stride == 0 || step == n_steps {
                record(step as f64 * self.config.dt_s, &y);
            }
        }

        let concentrations = Species::ALL.into_iter().zip(traces).collect();
        Ok(SimulationResult {
            scenario: preset
                .map(|p| p.id.clone())
                .unwrap_or_else(|| "normal".to_string()),
            time,
            concentrations,
            parameters: parameters(&self.config, &modifiers, preset),
        })
    }
}

fn parameters(
    config: &SimulationConfig,
    modifiers: &KineticModifiers,
    preset: Option<&ScenarioPreset>,
) -> BTreeMap<String, f64> {
    let mut out = BTreeMap::new();
    out.insert("tf_concentration".to_string(), config.tf_nm);
    out.insert("dt".to_string(), config.dt_s);
    out.insert("t_end".to_string(), config.t_end_s);
    out.insert("at_factor".to_string(), modifiers.at_factor);
    out.insert("xa_inhibition".to_string(), modifiers.xa_inhibition);
    out.insert("iia_inhibition".to_string(), modifiers.iia_inhibition);
    if let Some(preset) = preset {
        for (factor_id, level) in &preset.factor_levels {
            out.insert(format!("level_{}", factor_id), *level);
        }
    }
    out
}
