use anyhow::Result;
use tracing::{info, warn};

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::tables::load_builtin;

pub struct Stage2Tables;

impl Stage2Tables {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage2Tables {
    fn name(&self) -> &'static str {
        "stage2_tables"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let config = load_builtin()?.with_overlays(
            ctx.overlays.ranges.as_deref(),
            ctx.overlays.scenarios.as_deref(),
        )?;

        if let Some(key) = ctx.requested_scenario() {
            if config.scenarios.get(&key).is_none() {
                warn!(scenario = %key, "unknown scenario; using lab-derived activities");
                ctx.warnings.push(format!(
                    "unknown scenario '{}'; using lab-derived activities",
                    key
                ));
            }
        }

        info!(
            version = %config.version,
            factors = config.factors.len(),
            ranges = config.ranges.len(),
            scenarios = config.scenarios.presets().len(),
            "tables_loaded"
        );
        ctx.report.input_meta.tables_version = Some(config.version.clone());
        ctx.config = Some(config);
        Ok(())
    }
}
