//! Weighted quantiles for functional posteriors.

use crate::error::AppError;

/// Lower tail probability of the central 1-sigma interval.
pub const ONE_SIGMA_LOW: f64 = 0.158_655_253_931_457_05;
/// Lower tail probability of the central 2-sigma interval.
pub const TWO_SIGMA_LOW: f64 = 0.022_750_131_948_179_21;

/// Weighted quantile `q` of `values`.
///
/// Each sample sits at the midpoint of its weight in the cumulative
/// distribution and the CDF is interpolated linearly between samples.
/// Zero-weight samples are ignored.
pub fn weighted_quantile(values: &[f64], weights: &[f64], q: f64) -> Result<f64, AppError> {
    if values.len() != weights.len() {
        return Err(AppError::invalid(format!(
            "{} values but {} weights",
            values.len(),
            weights.len()
        )));
    }
    if !(0.0..=1.0).contains(&q) {
        return Err(AppError::invalid(format!("quantile must be in [0, 1], got {q}")));
    }

    let mut pairs: Vec<(f64, f64)> = values
        .iter()
        .copied()
        .zip(weights.iter().copied())
        .filter(|&(_, w)| w > 0.0)
        .collect();
    if pairs.is_empty() {
        return Err(AppError::invalid("weighted quantile needs at least one positive weight"));
    }
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let total: f64 = pairs.iter().map(|p| p.1).sum();
    let mut cumulative = 0.0;
    let mut prev: Option<(f64, f64)> = None;
    for &(v, w) in &pairs {
        let p = (cumulative + 0.5 * w) / total;
        cumulative += w;
        if p >= q {
            return Ok(match prev {
                None => v,
                Some((p0, v0)) if p > p0 => v0 + (v - v0) * (q - p0) / (p - p0),
                Some(_) => v,
            });
        }
        prev = Some((p, v));
    }
    Ok(pairs[pairs.len() - 1].0)
}

/// Quantiles of a functional posterior at one grid point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandSummary {
    pub lower_2sigma: f64,
    pub lower_1sigma: f64,
    pub median: f64,
    pub upper_1sigma: f64,
    pub upper_2sigma: f64,
}

impl BandSummary {
    pub fn from_samples(values: &[f64], weights: &[f64]) -> Result<Self, AppError> {
        Ok(Self {
            lower_2sigma: weighted_quantile(values, weights, TWO_SIGMA_LOW)?,
            lower_1sigma: weighted_quantile(values, weights, ONE_SIGMA_LOW)?,
            median: weighted_quantile(values, weights, 0.5)?,
            upper_1sigma: weighted_quantile(values, weights, 1.0 - ONE_SIGMA_LOW)?,
            upper_2sigma: weighted_quantile(values, weights, 1.0 - TWO_SIGMA_LOW)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn uniform_weights_median() {
        let v = [5.0, 1.0, 4.0, 2.0, 3.0];
        let w = [1.0; 5];
        assert_abs_diff_eq!(weighted_quantile(&v, &w, 0.5).unwrap(), 3.0);
    }

    #[test]
    fn heavy_weight_pulls_the_median() {
        let v = [0.0, 1.0];
        let w = [3.0, 1.0];
        // centres at 0.375 and 0.875
        assert_abs_diff_eq!(weighted_quantile(&v, &w, 0.5).unwrap(), 0.25);
    }

    #[test]
    fn tails_clamp_to_extremes() {
        let v = [1.0, 2.0, 3.0];
        let w = [1.0, 1.0, 1.0];
        assert_eq!(weighted_quantile(&v, &w, 0.0).unwrap(), 1.0);
        assert_eq!(weighted_quantile(&v, &w, 1.0).unwrap(), 3.0);
    }

    #[test]
    fn zero_weights_are_ignored() {
        let v = [100.0, 1.0, 2.0, 3.0];
        let w = [0.0, 1.0, 1.0, 1.0];
        assert_abs_diff_eq!(weighted_quantile(&v, &w, 0.5).unwrap(), 2.0);
    }

    #[test]
    fn rejects_bad_inputs() {
        assert!(weighted_quantile(&[1.0], &[1.0, 2.0], 0.5).is_err());
        assert!(weighted_quantile(&[1.0], &[0.0], 0.5).is_err());
        assert!(weighted_quantile(&[1.0], &[1.0], 1.5).is_err());
    }

    #[test]
    fn bands_are_nested() {
        let v: Vec<f64> = (0..200).map(|i| i as f64).collect();
        let w = vec![1.0; v.len()];
        let b = BandSummary::from_samples(&v, &w).unwrap();
        assert!(b.lower_2sigma < b.lower_1sigma);
        assert!(b.lower_1sigma < b.median);
        assert!(b.median < b.upper_1sigma);
        assert!(b.upper_1sigma < b.upper_2sigma);
    }
}
