use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::network::propagate;
use crate::pipeline::Stage;

pub struct Stage5Propagate;

impl Stage5Propagate {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage5Propagate {
    fn name(&self) -> &'static str {
        "stage5_propagate"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let config = ctx.config()?;
        let before = ctx.activity()?;
        let next = propagate(&config.factors, before);
        let clamped = next
            .iter()
            .filter(|(id, v)| before.get(id) != Some(**v))
            .count();
        info!(clamped, "zymogen_clamp_applied");
        ctx.activity = Some(next);
        Ok(())
    }
}
