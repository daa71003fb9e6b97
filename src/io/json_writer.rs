use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::ctx::Ctx;
use crate::schema::v1::{CoagReportV1, InputMeta, SCHEMA_VERSION, TOOL_NAME};

pub fn build_report(ctx: &Ctx) -> Result<CoagReportV1> {
    let panel = ctx.panel()?;
    let config = ctx.config()?;
    let activity = ctx.activity()?;

    let input_meta = InputMeta {
        source: Some(ctx.input.display().to_string()),
        label: Some(panel.label.clone()),
        scenario: ctx.scenario.clone(),
        medications: panel
            .medications
            .active()
            .into_iter()
            .map(|m| m.key().to_string())
            .collect(),
        tables_version: Some(config.version.clone()),
        rule_set_version: ctx
            .interpretation
            .as_ref()
            .map(|i| i.rule_set_version.clone()),
        timecourse: ctx.timecourse,
    };

    Ok(CoagReportV1 {
        tool: TOOL_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        schema_version: SCHEMA_VERSION.to_string(),
        input_meta,
        lab_statuses: ctx.lab_statuses.clone(),
        estimates: ctx.estimates.clone(),
        factors: config.factors.snapshot(activity),
        interpretation: ctx.interpretation.clone(),
        warnings: ctx.warnings.clone(),
        timecourse: ctx.timecourse_result.clone(),
    })
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, value)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
