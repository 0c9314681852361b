//! Trailing-window series helpers.
//!
//! Every output at index `t` reads only `values[..=t]`. Windows shorter
//! than requested at the series start use what is available (minimum one
//! value), and lags before the start repeat the first value.

/// `values[t - n]`, or `values[0]` while `t < n`.
pub fn lag(values: &[f64], n: usize) -> Vec<f64> {
    (0..values.len())
        .map(|t| values[t.saturating_sub(n)])
        .collect()
}

/// `values[t] - values[t - n]` with first-value fill.
pub fn diff(values: &[f64], n: usize) -> Vec<f64> {
    values
        .iter()
        .zip(lag(values, n))
        .map(|(x, prev)| x - prev)
        .collect()
}

/// Apply `f` to each trailing window `values[t+1-window ..= t]`.
pub fn rolling<F>(values: &[f64], window: usize, f: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let window = window.max(1);
    (0..values.len())
        .map(|t| {
            let start = (t + 1).saturating_sub(window);
            f(&values[start..=t])
        })
        .collect()
}

pub fn mean(window: &[f64]) -> f64 {
    window.iter().sum::<f64>() / window.len() as f64
}

/// Sample standard deviation (divide by N - 1); 0 for fewer than two values.
pub fn sample_std(window: &[f64]) -> f64 {
    let n = window.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(window);
    let ss: f64 = window
        .iter()
        .map(|x| {
            let d = x - m;
            d * d
        })
        .sum();
    (ss / (n - 1) as f64).sqrt()
}

pub fn min(window: &[f64]) -> f64 {
    window.iter().copied().fold(f64::INFINITY, f64::min)
}

pub fn max(window: &[f64]) -> f64 {
    window.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Share of earlier window values strictly below the last one, in percent
/// of the window length.
pub fn percentile_rank(window: &[f64]) -> f64 {
    let Some((&last, earlier)) = window.split_last() else {
        return 0.0;
    };
    let below = earlier.iter().filter(|&&x| last > x).count();
    below as f64 / window.len() as f64 * 100.0
}

/// Exponential moving average with `alpha = 2 / (span + 1)`, seeded with
/// the first value.
pub fn ewm(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;
    for &x in values {
        let next = match prev {
            None => x,
            Some(p) => (1.0 - alpha) * p + alpha * x,
        };
        out.push(next);
        prev = Some(next);
    }
    out
}

/// Value or 1 where it is exactly zero, for use as a divisor.
pub fn nonzero_or_one(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        x
    }
}
