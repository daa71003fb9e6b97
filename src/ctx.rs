use std::path::PathBuf;

use crate::diagnosis::ClinicalInterpretation;
use crate::io::panel::LabPanel;
use crate::labs::LabStatusEntry;
use crate::network::{ActivityMap, FactorEstimate};
use crate::schema::v1::CoagReportV1;
use crate::scores::{TimecourseResult, TimepointSummary};
use crate::tables::EngineConfig;

#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub out_dir: PathBuf,
    pub json_path: PathBuf,
    pub tsv_path: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct Overlays {
    pub ranges: Option<PathBuf>,
    pub scenarios: Option<PathBuf>,
}

/// One panel evaluation: inputs, configuration and every intermediate result.
#[derive(Debug)]
pub struct Ctx {
    pub input: PathBuf,
    pub timecourse: bool,
    pub write_json: bool,
    pub write_tsv: bool,
    pub overlays: Overlays,
    /// Overrides the scenario named inside the panel file.
    pub scenario_override: Option<String>,
    pub panel: Option<LabPanel>,
    pub config: Option<EngineConfig>,
    pub lab_statuses: Vec<LabStatusEntry>,
    pub estimates: Vec<FactorEstimate>,
    pub scenario: Option<String>,
    pub activity: Option<ActivityMap>,
    pub interpretation: Option<ClinicalInterpretation>,
    pub warnings: Vec<String>,
    pub timecourse_points: Vec<TimepointSummary>,
    pub timecourse_result: Option<TimecourseResult>,
    pub output: OutputPaths,
    pub report: CoagReportV1,
}

impl Ctx {
    pub fn new(
        input: PathBuf,
        out_dir: PathBuf,
        timecourse: bool,
        write_json: bool,
        write_tsv: bool,
        tool_version: &str,
    ) -> Self {
        let json_path = out_dir.join("hemostasis.json");
        let tsv_path = out_dir.join("factors.tsv");
        let report = CoagReportV1::empty(tool_version, timecourse);
        Self {
            input,
            timecourse,
            write_json,
            write_tsv,
            overlays: Overlays::default(),
            scenario_override: None,
            panel: None,
            config: None,
            lab_statuses: Vec::new(),
            estimates: Vec::new(),
            scenario: None,
            activity: None,
            interpretation: None,
            warnings: Vec::new(),
            timecourse_points: Vec::new(),
            timecourse_result: None,
            output: OutputPaths {
                out_dir,
                json_path,
                tsv_path,
            },
            report,
        }
    }

    pub fn panel(&self) -> anyhow::Result<&LabPanel> {
        use anyhow::Context;
        self.panel.as_ref().context("lab panel not loaded")
    }

    pub fn config(&self) -> anyhow::Result<&EngineConfig> {
        use anyhow::Context;
        self.config.as_ref().context("engine tables not loaded")
    }

    pub fn activity(&self) -> anyhow::Result<&ActivityMap> {
        use anyhow::Context;
        self.activity.as_ref().context("activity map missing")
    }

    /// Scenario from the command line, else the one the panel names.
    pub fn requested_scenario(&self) -> Option<String> {
        self.scenario_override
            .clone()
            .or_else(|| self.panel.as_ref().and_then(|p| p.scenario.clone()))
    }
}
