//! Coordinate grids.
//!
//! Curves are evaluated on log-spaced grids so that the many decades between
//! `amin` and today are sampled evenly.

use crate::error::AppError;

/// Generate `steps` log-spaced points between `min` and `max` (inclusive).
pub fn log_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, AppError> {
    if !(min.is_finite() && max.is_finite() && min > 0.0 && max > 0.0 && max > min) {
        return Err(AppError::invalid(format!(
            "invalid grid range: min={min}, max={max} (must be finite, >0, and max>min)"
        )));
    }
    if steps < 2 {
        return Err(AppError::invalid("grid steps must be >= 2"));
    }

    let log_min = min.log10();
    let log_max = max.log10();
    let step = (log_max - log_min) / (steps as f64 - 1.0);

    let mut out = Vec::with_capacity(steps);
    for i in 0..steps {
        out.push(10f64.powf(log_min + step * i as f64));
    }
    // Pin the end points so the grid spans the domain exactly.
    out[0] = min;
    out[steps - 1] = max;
    Ok(out)
}

/// Generate `steps` evenly spaced points between `min` and `max` (inclusive).
pub fn lin_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, AppError> {
    if !(min.is_finite() && max.is_finite() && max > min) {
        return Err(AppError::invalid(format!(
            "invalid grid range: min={min}, max={max} (must be finite and max>min)"
        )));
    }
    if steps < 2 {
        return Err(AppError::invalid("grid steps must be >= 2"));
    }

    let step = (max - min) / (steps as f64 - 1.0);
    let mut out: Vec<f64> = (0..steps).map(|i| min + step * i as f64).collect();
    out[steps - 1] = max;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_space_includes_endpoints() {
        let v = log_space(1e-10, 1.0, 11).unwrap();
        assert_eq!(v[0], 1e-10);
        assert_eq!(v[10], 1.0);
        assert!((v[5] - 1e-5).abs() < 1e-15, "midpoint: {}", v[5]);
    }

    #[test]
    fn log_space_is_strictly_increasing() {
        let v = log_space(1.0, 1e10, 500).unwrap();
        assert!(v.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn log_space_rejects_non_positive_range() {
        assert!(log_space(0.0, 1.0, 10).is_err());
        assert!(log_space(1.0, 1.0, 10).is_err());
        assert!(log_space(1e-3, 1.0, 1).is_err());
    }

    #[test]
    fn lin_space_includes_endpoints() {
        let v = lin_space(0.0, 1.0, 5).unwrap();
        assert_eq!(v, [0.0, 0.25, 0.5, 0.75, 1.0]);
    }
}
