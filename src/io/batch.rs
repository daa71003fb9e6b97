//! Independent evaluation of many panels into one TSV.

use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

#[cfg(feature = "mt")]
use rayon::prelude::*;

use crate::diagnosis::interpret;
use crate::io::panel::LabPanel;
use crate::tables::EngineConfig;

pub const BATCH_HEADER: &str = "label\tpattern\tpathway\tn_diagnoses\ttop_diagnosis\ttop_probability\tisth_total\thit4t_total\tn_warnings\tscenario";

#[derive(Debug, Clone, PartialEq)]
pub struct BatchRow {
    pub label: String,
    pub pattern: String,
    pub pathway: String,
    pub n_diagnoses: usize,
    pub top_diagnosis: Option<String>,
    pub top_probability: Option<String>,
    pub isth_total: Option<u8>,
    pub hit4t_total: Option<u8>,
    pub n_warnings: usize,
    pub scenario: Option<String>,
}

pub fn evaluate_panel(config: &EngineConfig, panel: &LabPanel) -> BatchRow {
    let scenario = panel
        .scenario
        .as_deref()
        .and_then(|key| config.scenarios.get(key))
        .map(|preset| preset.id.clone());
    let interp = interpret(config, &panel.labs, &panel.medications, panel.hit4t.as_ref());
    let top = interp.diagnoses.first();
    BatchRow {
        label: panel.label.clone(),
        pattern: interp.pattern.clone(),
        pathway: interp.affected_pathway.as_str().to_string(),
        n_diagnoses: interp.diagnoses.len(),
        top_diagnosis: top.map(|d| d.name.clone()),
        top_probability: top.map(|d| d.probability.as_str().to_string()),
        isth_total: interp.isth_score.as_ref().map(|s| s.total),
        hit4t_total: interp.hit4t_score.as_ref().map(|s| s.total),
        n_warnings: interp.warnings.len(),
        scenario,
    }
}

/// Rows come back in input order. `threads == 0` lets rayon decide.
pub fn evaluate_batch(config: &EngineConfig, panels: &[LabPanel], threads: usize) -> Result<Vec<BatchRow>> {
    #[cfg(feature = "mt")]
    {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if threads > 0 {
            builder = builder.num_threads(threads);
        }
        let pool = builder
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build thread pool: {}", e))?;
        Ok(pool.install(|| {
            panels
                .par_iter()
                .map(|p| evaluate_panel(config, p))
                .collect()
        }))
    }

    #[cfg(not(feature = "mt"))]
    {
        let _ = threads;
        Ok(panels.iter().map(|p| evaluate_panel(config, p)).collect())
    }
}

pub fn write_batch_tsv(path: &Path, rows: &[BatchRow]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    writeln!(w, "{}", BATCH_HEADER)?;
    for r in rows {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            r.label,
            r.pattern,
            r.pathway,
            r.n_diagnoses,
            r.top_diagnosis.as_deref().unwrap_or("-"),
            r.top_probability.as_deref().unwrap_or("-"),
            opt(r.isth_total),
            opt(r.hit4t_total),
            r.n_warnings,
            r.scenario.as_deref().unwrap_or("-"),
        )?;
    }
    w.flush()?;
    Ok(())
}

fn opt(value: Option<u8>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}
