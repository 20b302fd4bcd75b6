//! Rate of Change (ROC).
//!
//! ROC[t] = (x[t] - x[t-period]) / x[t-period] * 100

pub fn roc_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 {
        return result;
    }

    for i in period..n {
        let prev = values[i - period];
        let curr = values[i];
        if !(prev.is_nan() || curr.is_nan() || prev == 0.0) {
            result[i] = (curr - prev) / prev * 100.0;
        }
    }

    result
}
