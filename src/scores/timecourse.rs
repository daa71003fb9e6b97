use anyhow::{Result, bail};

use crate::labs::LabInput;
use crate::math::stats::relative_change;
use crate::scores::{Calibration, DeltaSummary, TimecourseResult, TimepointSummary, isth};

const PLATELET_SHIFT: f64 = 0.30;

impl TimepointSummary {
    pub fn from_labs(label: &str, labs: &LabInput, cal: &Calibration) -> Self {
        Self {
            label: label.to_string(),
            pt: labs.pt,
            inr: labs.inr,
            aptt: labs.aptt,
            platelets: labs.platelets,
            fibrinogen: labs.fibrinogen,
            d_dimers: labs.d_dimers,
            isth_total: isth::score(labs, cal).total,
        }
    }
}

pub fn compute_timecourse(timepoints: Vec<TimepointSummary>) -> Result<TimecourseResult> {
    if timepoints.len() < 2 {
        bail!("timecourse requires at least 2 timepoints");
    }

    for tp in &timepoints {
        if tp.pt.is_nan()
            || tp.inr.is_nan()
            || tp.aptt.is_nan()
            || tp.platelets.is_nan()
            || tp.fibrinogen.is_nan()
            || tp.d_dimers.is_nan()
        {
            bail!("NaN encountered in timepoint summary");
        }
    }

    let mut deltas = Vec::new();
    for win in timepoints.windows(2) {
        let a = &win[0];
        let b = &win[1];
        deltas.push(DeltaSummary {
            from: a.label.clone(),
            to: b.label.clone(),
            delta_inr: b.inr - a.inr,
            delta_aptt: b.aptt - a.aptt,
            delta_platelets: b.platelets - a.platelets,
            delta_fibrinogen: b.fibrinogen - a.fibrinogen,
            delta_d_dimers: b.d_dimers - a.d_dimers,
            delta_isth: b.isth_total as i16 - a.isth_total as i16,
        });
    }

    let first = &timepoints[0];
    let last = &timepoints[timepoints.len() - 1];
    let platelet_change = relative_change(first.platelets, last.platelets);

    let worsening = last.isth_total > first.isth_total || platelet_change <= -PLATELET_SHIFT;
    let improving = last.isth_total < first.isth_total || platelet_change >= PLATELET_SHIFT;

    let trajectory = if worsening {
        "worsening"
    } else if improving {
        "improving"
    } else {
        "stable"
    };

    Ok(TimecourseResult {
        timepoints,
        deltas,
        trajectory: trajectory.to_string(),
    })
}
