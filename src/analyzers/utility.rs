/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Returns an ascending copy of `values`, ordered with [`f64::total_cmp`].
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(f64::total_cmp);
    out
}

/// Percentile of pre-sorted data, `q` in `0.0..=1.0`.
///
/// Interpolates linearly between the two closest ranks (`q * (n - 1)`),
/// the same definition numpy and pandas use by default. Returns `NaN` for
/// empty input. Tied neighbours yield exactly their shared value.
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 {
        return sorted[0];
    }

    let idx = q.clamp(0.0, 1.0) * (n - 1) as f64;
    let lo = idx.floor() as usize;
    let hi = idx.ceil() as usize;

    if lo == hi {
        sorted[lo]
    } else {
        lerp(sorted[lo], sorted[hi], idx - lo as f64)
    }
}

/// `a + (b - a) * w`, anchored on the nearer endpoint so `a == b` gives `a`.
fn lerp(a: f64, b: f64, w: f64) -> f64 {
    let diff = b - a;
    if w < 0.5 {
        a + diff * w
    } else {
        b - diff * (1.0 - w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_mean_values() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), 2.5);
    }

    #[test]
    fn test_sorted_does_not_touch_input() {
        let values = [3.0, 1.0, 2.0];
        assert_eq!(sorted(&values), vec![1.0, 2.0, 3.0]);
        assert_eq!(values, [3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_percentile_empty_is_nan() {
        assert!(percentile(&[], 0.5).is_nan());
    }

    #[test]
    fn test_percentile_single_value() {
        assert_eq!(percentile(&[7.0], 0.025), 7.0);
        assert_eq!(percentile(&[7.0], 0.975), 7.0);
    }

    #[test]
    fn test_percentile_exact_rank() {
        let data = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert_eq!(percentile(&data, 0.0), 10.0);
        assert_eq!(percentile(&data, 0.5), 30.0);
        assert_eq!(percentile(&data, 1.0), 50.0);
    }

    #[test]
    fn test_percentile_interpolates() {
        // idx = 0.025 * 99 = 2.475 -> between 3 and 4
        let data: Vec<f64> = (1..=100).map(f64::from).collect();
        assert!((percentile(&data, 0.025) - 3.475).abs() < 1e-9);
        assert!((percentile(&data, 0.975) - 97.525).abs() < 1e-9);
    }

    #[test]
    fn test_percentile_tied_neighbours_are_exact() {
        for value in [0.1, 1402.0, 19999.0] {
            for n in 2..50 {
                let data = vec![value; n];
                assert_eq!(percentile(&data, 0.025), value, "n = {n}");
                assert_eq!(percentile(&data, 0.975), value, "n = {n}");
            }
        }
    }

    #[test]
    fn test_percentile_upper_half_weight() {
        // idx = 0.75 * 4 = 3.0; idx = 0.9 * 4 = 3.6 -> 40 + 0.6 * 10
        let data = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert_eq!(percentile(&data, 0.75), 40.0);
        assert!((percentile(&data, 0.9) - 46.0).abs() < 1e-9);
    }
}
