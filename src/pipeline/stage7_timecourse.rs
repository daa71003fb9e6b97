use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::scores::timecourse::compute_timecourse;

pub struct Stage7Timecourse;

impl Stage7Timecourse {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage7Timecourse {
    fn name(&self) -> &'static str {
        "stage7_timecourse"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        if !ctx.timecourse {
            return Ok(());
        }
        if ctx.timecourse_points.len() < 2 {
            anyhow::bail!("timecourse requires at least 2 timepoints");
        }
        let result = compute_timecourse(ctx.timecourse_points.clone())?;
        info!(trajectory = %result.trajectory, "timecourse_ready");
        ctx.report.timecourse = Some(result.clone());
        ctx.timecourse_result = Some(result);
        Ok(())
    }
}
