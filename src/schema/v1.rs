use serde::{Deserialize, Serialize};

use crate::diagnosis::ClinicalInterpretation;
use crate::labs::LabStatusEntry;
use crate::network::{FactorEstimate, FactorState};
use crate::scores::TimecourseResult;

pub const TOOL_NAME: &str = "kira-hemostasis";
pub const SCHEMA_VERSION: &str = "v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputMeta {
    pub source: Option<String>,
    pub label: Option<String>,
    pub scenario: Option<String>,
    pub medications: Vec<String>,
    pub tables_version: Option<String>,
    pub rule_set_version: Option<String>,
    pub timecourse: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoagReportV1 {
    pub tool: String,
    pub version: String,
    pub schema_version: String,
    pub input_meta: InputMeta,
    pub lab_statuses: Vec<LabStatusEntry>,
    pub estimates: Vec<FactorEstimate>,
    pub factors: Vec<FactorState>,
    pub interpretation: Option<ClinicalInterpretation>,
    pub warnings: Vec<String>,
    pub timecourse: Option<TimecourseResult>,
}

impl CoagReportV1 {
    pub fn empty(tool_version: &str, timecourse: bool) -> Self {
        Self {
            tool: TOOL_NAME.to_string(),
            version: tool_version.to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            input_meta: InputMeta {
                source: None,
                label: None,
                scenario: None,
                medications: Vec::new(),
                tables_version: None,
                rule_set_version: None,
                timecourse,
            },
            lab_statuses: Vec::new(),
            estimates: Vec::new(),
            factors: Vec::new(),
            interpretation: None,
            warnings: Vec::new(),
            timecourse: None,
        }
    }
}
