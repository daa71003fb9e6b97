use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::diagnosis::interpret;
use crate::pipeline::Stage;

pub struct Stage6Interpret;

impl Stage6Interpret {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage6Interpret {
    fn name(&self) -> &'static str {
        "stage6_interpret"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let config = ctx.config()?;
        let panel = ctx.panel()?;
        let interp = interpret(config, &panel.labs, &panel.medications, panel.hit4t.as_ref());
        info!(
            pattern = %interp.pattern,
            pathway = interp.affected_pathway.as_str(),
            diagnoses = interp.diagnoses.len(),
            warnings = interp.warnings.len(),
            "interpretation_ready"
        );
        ctx.report.input_meta.rule_set_version = Some(interp.rule_set_version.clone());
        ctx.interpretation = Some(interp);
        Ok(())
    }
}
