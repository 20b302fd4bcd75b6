//! Simple Moving Average (SMA).
//!
//! Rolling mean over a window of `period` values.
//! First valid value at index period-1; any NaN in the window yields NaN.

pub fn sma_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period {
        return result;
    }

    let mut sum: f64 = values[..period].iter().sum();
    let mut nan_in_window = values[..period].iter().any(|v| v.is_nan());
    if !nan_in_window {
        result[period - 1] = sum / period as f64;
    }

    for i in period..n {
        let leaving = values[i - period];
        let entering = values[i];

        if entering.is_nan() || leaving.is_nan() || nan_in_window {
            // Rescan: the running sum is meaningless once NaN touched it
            let window = &values[(i + 1 - period)..=i];
            nan_in_window = window.iter().any(|v| v.is_nan());
            sum = window.iter().sum();
            if nan_in_window {
                continue;
            }
        } else {
            sum = sum - leaving + entering;
        }

        result[i] = sum / period as f64;
    }

    result
}
