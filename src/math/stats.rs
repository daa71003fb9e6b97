//! Small numeric helpers shared by the scores and the simulator.

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Index of the largest finite value; `None` for an empty slice.
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Trapezoidal area under `y(t)`; extra samples in the longer slice are ignored.
pub fn trapezoid_area(t: &[f64], y: &[f64]) -> f64 {
    let n = t.len().min(y.len());
    let mut area = 0.0;
    for i in 1..n {
        area += 0.5 * (y[i] + y[i - 1]) * (t[i] - t[i - 1]);
    }
    area
}

/// (to - from) / from; zero when `from` is zero.
pub fn relative_change(from: f64, to: f64) -> f64 {
    if from == 0.0 {
        return 0.0;
    }
    (to - from) / from
}
