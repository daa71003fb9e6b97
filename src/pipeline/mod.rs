use anyhow::Result;
use std::time::Instant;
use tracing::{info, warn};

use crate::ctx::Ctx;

pub mod stage0_scaffold;
pub mod stage1_input;
pub mod stage2_tables;
pub mod stage3_activity;
pub mod stage4_medication;
pub mod stage5_propagate;
pub mod stage6_interpret;
pub mod stage7_timecourse;
pub mod stage8_output;

use stage0_scaffold::Stage0Scaffold;
use stage1_input::Stage1Input;
use stage2_tables::Stage2Tables;
use stage3_activity::Stage3Activity;
use stage4_medication::Stage4Medication;
use stage5_propagate::Stage5Propagate;
use stage6_interpret::Stage6Interpret;
use stage8_output::Stage8Output;

pub trait Stage {
    fn name(&self) -> &'static str;
    fn run(&self, ctx: &mut Ctx) -> Result<()>;
}

pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// Scaffold through output for one panel.
    pub fn single_panel() -> Self {
        Self::new(vec![
            Box::new(Stage0Scaffold::new()),
            Box::new(Stage1Input::new()),
            Box::new(Stage2Tables::new()),
            Box::new(Stage3Activity::new()),
            Box::new(Stage4Medication::new()),
            Box::new(Stage5Propagate::new()),
            Box::new(Stage6Interpret::new()),
            Box::new(Stage8Output::new()),
        ])
    }

    /// Input checks and lab classification only; nothing is written.
    pub fn validate_only() -> Self {
        Self::new(vec![
            Box::new(Stage1Input::new()),
            Box::new(Stage2Tables::new()),
            Box::new(Stage3Activity::new()),
        ])
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn run(&self, ctx: &mut Ctx) -> Result<()> {
        for stage in &self.stages {
            let start = Instant::now();
            info!(stage = stage.name(), "stage started");
            if let Err(err) = stage.run(ctx) {
                let elapsed_ms = start.elapsed().as_millis();
                warn!(
                    stage = stage.name(),
                    elapsed_ms = elapsed_ms as u64,
                    "stage failed"
                );
                return Err(err);
            }
            let elapsed_ms = start.elapsed().as_millis();
            info!(
                stage = stage.name(),
                elapsed_ms = elapsed_ms as u64,
                "stage finished"
            );
        }
        Ok(())
    }
}
