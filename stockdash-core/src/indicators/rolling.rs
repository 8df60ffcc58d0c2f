//! Rolling-window primitives shared by the indicators.
//!
//! All functions return a vector the same length as the input. Positions
//! without enough history are `f64::NAN`. A NaN inside a full window makes
//! that window's output NaN, except for `rolling_sum_min1` which skips NaNs.

/// Rolling mean over `window` values. First `window - 1` outputs are NaN.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    assert!(window >= 1, "rolling window must be >= 1");
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    if n < window {
        return out;
    }

    let mut sum = 0.0;
    let mut nans = 0usize;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            nans += 1;
        } else {
            sum += v;
        }
        if i >= window {
            let leaving = values[i - window];
            if leaving.is_nan() {
                nans -= 1;
            } else {
                sum -= leaving;
            }
        }
        if i + 1 >= window && nans == 0 {
            out[i] = sum / window as f64;
        }
    }
    out
}

/// Rolling sample standard deviation (n - 1 denominator).
///
/// A window of 1 has no sample deviation and yields NaN everywhere.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    assert!(window >= 1, "rolling window must be >= 1");
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    if window < 2 || n < window {
        return out;
    }

    for i in (window - 1)..n {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        let mean = slice.iter().sum::<f64>() / window as f64;
        let ss: f64 = slice.iter().map(|v| (v - mean) * (v - mean)).sum();
        out[i] = (ss / (window - 1) as f64).sqrt();
    }
    out
}

/// Rolling sum with `min_periods = 1`: every position sums the non-NaN values
/// among the last `window` inputs. NaN only if all of them are NaN.
pub fn rolling_sum_min1(values: &[f64], window: usize) -> Vec<f64> {
    assert!(window >= 1, "rolling window must be >= 1");
    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        let start = (i + 1).saturating_sub(window);
        let mut sum = 0.0;
        let mut seen = false;
        for &v in &values[start..=i] {
            if !v.is_nan() {
                sum += v;
                seen = true;
            }
        }
        out.push(if seen { sum } else { f64::NAN });
    }
    out
}
