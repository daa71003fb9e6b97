use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::network::apply_ceilings;
use crate::pipeline::Stage;

pub struct Stage4Medication;

impl Stage4Medication {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage4Medication {
    fn name(&self) -> &'static str {
        "stage4_medication"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let config = ctx.config()?;
        let meds = ctx.panel()?.medications;
        let next = apply_ceilings(&config.ceilings, &meds, ctx.activity()?);
        info!(active = meds.active().len(), "medication_ceilings_applied");
        ctx.activity = Some(next);
        Ok(())
    }
}
