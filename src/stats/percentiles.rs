/// Percentile of `values` by linear interpolation between order statistics
/// (the type-7 estimator). `q` is a fraction in `[0, 1]`.
///
/// Returns `0.0` for an empty slice. The input does not need to be sorted.
pub fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let k = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let f = k.floor();
    let c = k.ceil();

    if f == c {
        return sorted[k as usize];
    }
    // lower order statistic weighted by (c - k), upper by (k - f)
    sorted[f as usize] * (c - k) + sorted[c as usize] * (k - f)
}

/// 95th percentile, as reported in `p95_latency`.
pub fn percentile_95(values: &[f64]) -> f64 {
    percentile(values, 0.95)
}
