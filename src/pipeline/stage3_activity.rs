use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::network::seed_activity;
use crate::pipeline::Stage;

pub struct Stage3Activity;

impl Stage3Activity {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage3Activity {
    fn name(&self) -> &'static str {
        "stage3_activity"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let requested = ctx.requested_scenario();
        let config = ctx.config()?;
        let panel = ctx.panel()?;

        let statuses = config.ranges.statuses(&panel.labs);
        let (seeded, estimates, scenario) = seed_activity(
            config,
            &panel.labs,
            &panel.medications,
            requested.as_deref(),
        );
        let abnormal = statuses
            .iter()
            .filter(|s| s.status != crate::labs::LabStatus::Normal)
            .count();

        info!(
            abnormal_labs = abnormal,
            estimates = estimates.len(),
            scenario = scenario.as_deref().unwrap_or("-"),
            "activity_seeded"
        );

        ctx.report.input_meta.scenario = scenario.clone();
        ctx.lab_statuses = statuses;
        ctx.estimates = estimates;
        ctx.scenario = scenario;
        ctx.activity = Some(seeded);
        Ok(())
    }
}
