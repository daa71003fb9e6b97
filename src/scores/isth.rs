//! ISTH overt-DIC score.

use crate::labs::LabInput;
use crate::scores::{Calibration, IsthCategory, IsthScore};

pub fn platelet_points(platelets: f64) -> u8 {
    if platelets < 50.0 {
        2
    } else if platelets <= 100.0 {
        1
    } else {
        0
    }
}

pub fn d_dimer_points(d_dimers: f64) -> u8 {
    if d_dimers > 2000.0 {
        3
    } else if d_dimers >= 500.0 {
        2
    } else {
        0
    }
}

pub fn pt_prolongation_points(prolongation_s: f64) -> u8 {
    if prolongation_s > 6.0 {
        2
    } else if prolongation_s >= 3.0 {
        1
    } else {
        0
    }
}

pub fn fibrinogen_points(fibrinogen: f64) -> u8 {
    if fibrinogen <= 100.0 { 1 } else { 0 }
}

pub fn category(total: u8) -> IsthCategory {
    if total >= 5 {
        IsthCategory::Overt
    } else if total >= 3 {
        IsthCategory::NonOvert
    } else {
        IsthCategory::Unlikely
    }
}

pub fn score(labs: &LabInput, cal: &Calibration) -> IsthScore {
    let platelets = platelet_points(labs.platelets);
    let d_dimer = d_dimer_points(labs.d_dimers);
    let pt_prolongation = pt_prolongation_points(labs.pt - cal.pt_normal_s);
    let fibrinogen = fibrinogen_points(labs.fibrinogen);
    let total = platelets + d_dimer + pt_prolongation + fibrinogen;
    let category = category(total);
    let interpretation = match category {
        IsthCategory::Overt => format!("ISTH {}/8: compatible with overt DIC, repeat daily", total),
        IsthCategory::NonOvert => format!(
            "ISTH {}/8: possible non-overt DIC, repeat in 24-48h",
            total
        ),
        IsthCategory::Unlikely => format!("ISTH {}/8: DIC unlikely", total),
    };
    IsthScore {
        platelets,
        d_dimer,
        pt_prolongation,
        fibrinogen,
        total,
        category,
        interpretation,
    }
}
