//! Weighted order-statistic primitives shared by the distribution engine and
//! the vintage reconciler.
//!
//! The weighted median follows the survey convention: walk the observations
//! in ascending value order and return the first value whose cumulative
//! weight reaches half the total. The unweighted quantile uses linear
//! interpolation between order statistics (the R-7 method, the default in R
//! and NumPy), which is what the archived comparison figures were produced
//! with.

/// Weighted arithmetic mean. `None` on empty input or zero total weight.
#[must_use]
pub fn weighted_mean(values: &[f64], weights: &[f64]) -> Option<f64> {
    debug_assert_eq!(values.len(), weights.len());
    if values.is_empty() {
        return None;
    }
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return None;
    }
    let acc: f64 = values.iter().zip(weights).map(|(v, w)| v * w).sum();
    Some(acc / total)
}

/// Weighted population standard deviation (no Bessel correction).
#[must_use]
pub fn weighted_std(values: &[f64], weights: &[f64]) -> Option<f64> {
    let mean = weighted_mean(values, weights)?;
    let total: f64 = weights.iter().sum();
    let var: f64 = values
        .iter()
        .zip(weights)
        .map(|(v, w)| w * (v - mean) * (v - mean))
        .sum::<f64>()
        / total;
    Some(var.sqrt())
}

/// Weighted median over observations already sorted ascending by value.
///
/// Returns the value at the smallest index where the cumulative weight
/// reaches half the total weight. If accumulated rounding keeps the running
/// sum from ever reaching half, the last value is returned.
#[must_use]
pub fn weighted_median_sorted(values: &[f64], weights: &[f64]) -> Option<f64> {
    debug_assert_eq!(values.len(), weights.len());
    if values.is_empty() {
        return None;
    }
    let half: f64 = weights.iter().sum::<f64>() / 2.0;
    let mut cum = 0.0;
    for (v, w) in values.iter().zip(weights) {
        cum += w;
        if cum >= half {
            return Some(*v);
        }
    }
    values.last().copied()
}

/// Unweighted median without mutating the input.
#[must_use]
pub fn median(data: &[f64]) -> Option<f64> {
    quantile(data, 0.5)
}

/// The `p`-th quantile (p in [0, 1]) by R-7 linear interpolation.
#[must_use]
pub fn quantile(data: &[f64], p: f64) -> Option<f64> {
    if data.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }
    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    if n == 1 {
        return Some(sorted[0]);
    }
    let h = p * (n - 1) as f64;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = h - lo as f64;
    Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_mean_matches_plain_mean_under_uniform_weights() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let weights = [0.5, 0.5, 0.5, 0.5];
        assert_eq!(weighted_mean(&values, &weights), Some(2.5));
    }

    #[test]
    fn test_weighted_mean_empty_and_zero_weight() {
        assert_eq!(weighted_mean(&[], &[]), None);
        assert_eq!(weighted_mean(&[1.0], &[0.0]), None);
    }

    #[test]
    fn test_weighted_std_population_convention() {
        // Two equally weighted points at 0 and 2: mean 1, variance 1
        let std = weighted_std(&[0.0, 2.0], &[1.0, 1.0]).unwrap();
        assert!((std - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_median_crossing_rule() {
        // Cumulative weights: 0.2, 0.5, 0.8, 1.0; half = 0.5, so the first
        // index reaching it is the second value.
        let values = [10.0, 20.0, 30.0, 40.0];
        let weights = [0.2, 0.3, 0.3, 0.2];
        assert_eq!(weighted_median_sorted(&values, &weights), Some(20.0));
    }

    #[test]
    fn test_weighted_median_heavy_tail() {
        // One observation carries most of the weight
        let values = [1.0, 2.0, 3.0];
        let weights = [0.1, 0.1, 0.8];
        assert_eq!(weighted_median_sorted(&values, &weights), Some(3.0));
    }

    #[test]
    fn test_weighted_median_single() {
        assert_eq!(weighted_median_sorted(&[7.0], &[0.3]), Some(7.0));
        assert_eq!(weighted_median_sorted(&[], &[]), None);
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn test_quantile_endpoints_and_interior() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(quantile(&data, 0.0), Some(1.0));
        assert_eq!(quantile(&data, 1.0), Some(5.0));
        assert_eq!(quantile(&data, 0.5), Some(3.0));
        // h = 0.25 * 4 = 1.0 exactly, no interpolation
        assert_eq!(quantile(&data, 0.25), Some(2.0));
        // h = 0.1 * 4 = 0.4, between the first two order statistics
        let q = quantile(&data, 0.1).unwrap();
        assert!((q - 1.4).abs() < 1e-12);
    }

    #[test]
    fn test_quantile_out_of_range() {
        assert_eq!(quantile(&[1.0], -0.1), None);
        assert_eq!(quantile(&[1.0], 1.1), None);
        assert_eq!(quantile(&[], 0.5), None);
    }
}
