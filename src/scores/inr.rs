use crate::math::round_to;
use crate::scores::Calibration;

/// INR = (PT / PT_normal) ^ ISI, two decimals.
pub fn calculate_inr_from_pt(pt_s: f64, cal: &Calibration) -> f64 {
    if pt_s <= 0.0 || cal.pt_normal_s <= 0.0 {
        return 0.0;
    }
    round_to((pt_s / cal.pt_normal_s).powf(cal.isi), 2)
}

/// PT = PT_normal * INR ^ (1 / ISI), one decimal.
pub fn calculate_pt_from_inr(inr: f64, cal: &Calibration) -> f64 {
    if inr <= 0.0 || cal.isi <= 0.0 {
        return 0.0;
    }
    round_to(cal.pt_normal_s * inr.powf(1.0 / cal.isi), 1)
}
