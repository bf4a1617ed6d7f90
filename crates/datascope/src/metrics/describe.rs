//! Pure descriptive-statistics functions.
//!
//! All functions return `None` when the statistic is undefined for the
//! given sample (empty input, too few observations, or zero variance for
//! the shape statistics) rather than producing NaN or panicking.

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Percentile with linear interpolation between closest ranks.
///
/// `sorted` must be ascending; `p` is in percent (0-100).
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    if n == 1 {
        return Some(sorted[0]);
    }

    let rank = (p / 100.0) * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let frac = rank - lo as f64;

    if lo + 1 < n {
        Some(sorted[lo] + frac * (sorted[lo + 1] - sorted[lo]))
    } else {
        Some(sorted[n - 1])
    }
}

/// Median (50th percentile).
pub fn median(sorted: &[f64]) -> Option<f64> {
    percentile(sorted, 50.0)
}

/// Sample variance (N-1 denominator); undefined for fewer than 2 values.
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some(ss / (n - 1) as f64)
}

/// Sample standard deviation (N-1 denominator).
pub fn sample_std(values: &[f64]) -> Option<f64> {
    sample_variance(values).map(f64::sqrt)
}

/// Population standard deviation (N denominator).
pub fn population_std(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / values.len() as f64).sqrt())
}

/// Most frequent value; ties resolve to the smallest value.
///
/// `sorted` must be ascending, so the first of the longest runs is the
/// smallest modal value.
pub fn mode(sorted: &[f64]) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }

    let mut best_value = sorted[0];
    let mut best_len = 0usize;
    let mut run_value = sorted[0];
    let mut run_len = 0usize;

    for &v in sorted {
        if v == run_value {
            run_len += 1;
        } else {
            run_value = v;
            run_len = 1;
        }
        if run_len > best_len {
            best_len = run_len;
            best_value = run_value;
        }
    }

    Some(best_value)
}

/// Adjusted Fisher-Pearson sample skewness.
///
/// Undefined for n < 3 or zero variance.
pub fn skewness(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 3 {
        return None;
    }
    let m = mean(values)?;
    let m2: f64 = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / n as f64;
    if m2 == 0.0 {
        return None;
    }
    let m3: f64 = values.iter().map(|v| (v - m).powi(3)).sum::<f64>() / n as f64;

    let g1 = m3 / m2.powf(1.5);
    let nf = n as f64;
    Some(g1 * (nf * (nf - 1.0)).sqrt() / (nf - 2.0))
}

/// Bias-corrected sample excess kurtosis.
///
/// Undefined for n < 4 or zero variance.
pub fn kurtosis(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 4 {
        return None;
    }
    let m = mean(values)?;
    let m2: f64 = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / n as f64;
    if m2 == 0.0 {
        return None;
    }
    let m4: f64 = values.iter().map(|v| (v - m).powi(4)).sum::<f64>() / n as f64;

    let g2 = m4 / (m2 * m2) - 3.0;
    let nf = n as f64;
    Some(((nf + 1.0) * g2 + 6.0) * (nf - 1.0) / ((nf - 2.0) * (nf - 3.0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_mean_and_median() {
        let v = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert_close(mean(&v).unwrap(), 30.0);
        assert_close(median(&v).unwrap(), 30.0);

        let even = [1.0, 2.0, 3.0, 4.0];
        assert_close(median(&even).unwrap(), 2.5);
    }

    #[test]
    fn test_percentile_linear_interpolation() {
        let v = [1.0, 2.0, 3.0, 4.0];
        // rank = 0.25 * 3 = 0.75 -> 1 + 0.75 * (2 - 1)
        assert_close(percentile(&v, 25.0).unwrap(), 1.75);
        assert_close(percentile(&v, 75.0).unwrap(), 3.25);
        assert_close(percentile(&v, 0.0).unwrap(), 1.0);
        assert_close(percentile(&v, 100.0).unwrap(), 4.0);
    }

    #[test]
    fn test_percentile_edge_cases() {
        assert!(percentile(&[], 50.0).is_none());
        assert_close(percentile(&[7.0], 25.0).unwrap(), 7.0);
    }

    #[test]
    fn test_sample_variance_and_std() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        // Sum of squared deviations is 32; 32 / 7 for the sample variance.
        assert_close(sample_variance(&v).unwrap(), 32.0 / 7.0);
        assert_close(sample_std(&v).unwrap(), (32.0f64 / 7.0).sqrt());

        assert!(sample_variance(&[1.0]).is_none());
        assert_close(sample_variance(&[5.0, 5.0, 5.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_population_std() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_close(population_std(&v).unwrap(), 2.0);
    }

    #[test]
    fn test_mode_prefers_smallest_on_tie() {
        assert_close(mode(&[1.0, 2.0, 2.0, 3.0, 3.0]).unwrap(), 2.0);
        assert_close(mode(&[1.0, 2.0, 3.0]).unwrap(), 1.0);
        assert!(mode(&[]).is_none());
    }

    #[test]
    fn test_skewness_symmetric_is_zero() {
        let v = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_close(skewness(&v).unwrap(), 0.0);
    }

    #[test]
    fn test_skewness_known_value() {
        // Matches pandas Series([1, 2, 3, 4, 100]).skew()
        let v = [1.0, 2.0, 3.0, 4.0, 100.0];
        let s = skewness(&v).unwrap();
        assert!((s - 2.232396).abs() < 1e-5, "got {s}");
    }

    #[test]
    fn test_kurtosis_known_value() {
        // Matches pandas Series([1, 2, 3, 4, 100]).kurtosis()
        let v = [1.0, 2.0, 3.0, 4.0, 100.0];
        let k = kurtosis(&v).unwrap();
        assert!((k - 4.986866).abs() < 1e-5, "got {k}");
    }

    #[test]
    fn test_shape_stats_undefined_for_constant_input() {
        let v = [5.0, 5.0, 5.0, 5.0, 5.0];
        assert!(skewness(&v).is_none());
        assert!(kurtosis(&v).is_none());
    }

    #[test]
    fn test_shape_stats_undefined_for_small_samples() {
        assert!(skewness(&[1.0, 2.0]).is_none());
        assert!(kurtosis(&[1.0, 2.0, 3.0]).is_none());
    }
}
