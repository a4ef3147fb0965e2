//! Synthetic posterior samples around a fiducial dark-energy curve.
//!
//! Useful for exercising the plotter without a sampler run: every value is
//! drawn from a simple distribution, so the resulting posterior is a
//! Gaussian tube around the fiducial `w` with uniformly placed breakpoints.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::data::table::SampleTable;
use crate::domain::{Coordinate, DarkKnotConfig, Family};
use crate::error::AppError;
use crate::schema::{FINAL_VALUE, NODE_COUNT, build_schema};

/// Settings for synthetic sample generation.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub samples: usize,
    pub seed: u64,
    /// Fiducial equation of state for every node value.
    pub fiducial_w: f64,
    /// Standard deviation of the node values around `fiducial_w`.
    pub sigma: f64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            samples: 1000,
            seed: 42,
            fiducial_w: -1.0,
            sigma: 0.1,
        }
    }
}

/// Draw a weighted sample table for `family` with node count `n`.
pub fn generate_samples(
    family: Family,
    n: i64,
    coordinate: Coordinate,
    domain: &DarkKnotConfig,
    config: &SampleConfig,
) -> Result<SampleTable, AppError> {
    if config.samples == 0 {
        return Err(AppError::invalid("sample count must be > 0"));
    }
    if !(config.sigma.is_finite() && config.sigma > 0.0) {
        return Err(AppError::invalid(format!("sigma must be > 0, got {}", config.sigma)));
    }
    domain.validate()?;

    let schema = build_schema(family, n, coordinate)?;
    let n = n as usize;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(config.fiducial_w, config.sigma)
        .map_err(|e| AppError::invalid(format!("noise distribution error: {e}")))?;

    // Breakpoints are placed log-uniformly: in `a` directly, in `1 + z` for redshift.
    let (log_lo, log_hi) = match coordinate {
        Coordinate::ScaleFactor => (domain.amin.ln(), domain.atoday.ln()),
        Coordinate::Redshift => ((1.0 + domain.ztoday).ln(), (1.0 + domain.zmax).ln()),
    };

    let mut rows = Vec::with_capacity(config.samples);
    let mut weights = Vec::with_capacity(config.samples);
    for _ in 0..config.samples {
        let active = match family {
            Family::Vanilla => n,
            Family::Adaptive if n == 0 => 0,
            Family::Adaptive => rng.gen_range(1..=n),
        };

        let mut breakpoints: Vec<f64> = (0..active.saturating_sub(2))
            .map(|_| {
                let u = rng.gen_range(log_lo..log_hi).exp();
                match coordinate {
                    Coordinate::ScaleFactor => u,
                    Coordinate::Redshift => u - 1.0,
                }
            })
            .collect();
        breakpoints.sort_by(|a, b| a.total_cmp(b));

        let row = schema
            .names()
            .map(|name| match name {
                NODE_COUNT => active as f64,
                FINAL_VALUE if active >= 1 => normal.sample(&mut rng),
                _ => match slot_index(name) {
                    Some((_, 0)) if active >= 2 => normal.sample(&mut rng),
                    Some(('w', i)) if i + 2 <= active && i >= 1 => normal.sample(&mut rng),
                    Some((_, i)) if i + 2 <= active && i >= 1 => breakpoints[i - 1],
                    _ => f64::NAN,
                },
            })
            .collect();
        rows.push(row);
        weights.push(1.0 - rng.r#gen::<f64>());
    }

    SampleTable::new(schema.to_names(), rows, weights)
}

/// Split `w3` / `a3` / `z3` into its letter and index.
fn slot_index(name: &str) -> Option<(char, usize)> {
    let mut chars = name.chars();
    let letter = chars.next()?;
    let index = chars.as_str().parse().ok()?;
    Some((letter, index))
}
