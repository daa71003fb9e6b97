use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::io::panel::load_panel;
use crate::pipeline::Stage;

pub struct Stage1Input;

impl Stage1Input {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage1Input {
    fn name(&self) -> &'static str {
        "stage1_input"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let cal = ctx
            .config
            .as_ref()
            .map(|c| c.calibration)
            .unwrap_or_default();
        let panel = load_panel(&ctx.input, &cal)?;

        let meds: Vec<&str> = panel
            .medications
            .active()
            .into_iter()
            .map(|m| m.key())
            .collect();
        info!(
            label = %panel.label,
            medications = %meds.join(","),
            hit4t = panel.hit4t.is_some(),
            "panel_loaded"
        );

        ctx.report.input_meta.label = Some(panel.label.clone());
        ctx.report.input_meta.medications = meds.iter().map(|m| m.to_string()).collect();
        ctx.panel = Some(panel);
        Ok(())
    }
}
