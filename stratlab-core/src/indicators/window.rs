//! Rolling extremes over a fixed window (highest / lowest value).
//!
//! First valid value at index period-1; any NaN in the window yields NaN.

pub fn rolling_max(values: &[f64], period: usize) -> Vec<f64> {
    rolling(values, period, f64::max)
}

pub fn rolling_min(values: &[f64], period: usize) -> Vec<f64> {
    rolling(values, period, f64::min)
}

fn rolling(values: &[f64], period: usize, pick: fn(f64, f64) -> f64) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period {
        return result;
    }

    for i in (period - 1)..n {
        let window = &values[(i + 1 - period)..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        result[i] = window.iter().copied().reduce(pick).unwrap_or(f64::NAN);
    }

    result
}
