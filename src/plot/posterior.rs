//! Functional posteriors of `w(a)`.
//!
//! Every weighted sample is mapped through the flexknot evaluator onto a
//! common plot grid. The result is either summarised by weighted quantiles
//! at each grid point (contour mode) or kept as a set of curves drawn by
//! weight (line mode).

use rand::SeedableRng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::data::SampleTable;
use crate::domain::{Coordinate, DarkKnotConfig, Family, PlotConfig, PlotMode, XAxis};
use crate::error::AppError;
use crate::math::{BandSummary, lin_space};
use crate::models::CurveModel;
use crate::plot::infer::{InferredSchema, infer_schema};

/// What a posterior plot draws.
#[derive(Debug, Clone, PartialEq)]
pub enum PosteriorCurves {
    /// Credible bands at each grid point.
    Bands(Vec<BandSummary>),
    /// Individual sample curves.
    Lines(Vec<Vec<f64>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionalPosterior {
    pub schema: InferredSchema,
    /// Plot grid in scale factor.
    pub a: Vec<f64>,
    /// The same grid mapped onto the plot's x axis.
    pub x: Vec<f64>,
    pub x_axis: XAxis,
    pub curves: PosteriorCurves,
}

impl FunctionalPosterior {
    /// Smallest and largest `w` drawn, if any finite values exist.
    pub fn w_range(&self) -> Option<(f64, f64)> {
        let values: Box<dyn Iterator<Item = f64> + '_> = match &self.curves {
            PosteriorCurves::Bands(bands) => {
                Box::new(bands.iter().flat_map(|b| [b.lower_2sigma, b.upper_2sigma]))
            }
            PosteriorCurves::Lines(lines) => Box::new(lines.iter().flatten().copied()),
        };
        let (lo, hi) = values
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        (lo <= hi).then_some((lo, hi))
    }

    /// Median curve in contour mode.
    pub fn median(&self) -> Option<Vec<(f64, f64)>> {
        match &self.curves {
            PosteriorCurves::Bands(bands) => {
                Some(self.x.iter().copied().zip(bands.iter().map(|b| b.median)).collect())
            }
            PosteriorCurves::Lines(_) => None,
        }
    }
}

/// Scale-factor range covered by a model's domain.
fn model_a_range(domain: &DarkKnotConfig, coordinate: Coordinate) -> (f64, f64) {
    match coordinate {
        Coordinate::ScaleFactor => (domain.amin, domain.atoday),
        Coordinate::Redshift => (1.0 / (1.0 + domain.zmax), 1.0 / (1.0 + domain.ztoday)),
    }
}

/// Infer the table's parametrization and compute its functional posterior.
pub fn functional_posterior(
    table: &SampleTable,
    domain: &DarkKnotConfig,
    config: &PlotConfig,
) -> Result<FunctionalPosterior, AppError> {
    let schema = infer_schema(table)?;
    let model = CurveModel::new(schema.family, schema.n as i64, schema.coordinate, *domain)?;

    let (a_lo, a_hi) = model_a_range(domain, schema.coordinate);
    let a = lin_space(config.a_min.unwrap_or(a_lo), config.a_max.unwrap_or(a_hi), config.resolution)?;
    let x = a.iter().map(|&a| config.x_axis.from_scale_factor(a)).collect();

    let rows: Vec<usize> = (0..table.len()).filter(|&i| table.weights()[i] > 0.0).collect();
    if rows.len() < table.len() {
        warn!(dropped = table.len() - rows.len(), "ignoring zero-weight samples");
    }
    if rows.is_empty() {
        return Err(AppError::invalid("sample table has no positively weighted rows"));
    }

    let curves = match config.mode {
        PlotMode::Contour => {
            let curves = sample_curves(&model, table, &rows, &a)?;
            let weights: Vec<f64> = rows.iter().map(|&i| table.weights()[i]).collect();
            let bands = (0..a.len())
                .into_par_iter()
                .map(|j| {
                    let column: Vec<f64> = curves.iter().map(|c| c[j]).collect();
                    BandSummary::from_samples(&column, &weights)
                })
                .collect::<Result<Vec<_>, _>>()?;
            PosteriorCurves::Bands(bands)
        }
        PlotMode::Lines => {
            let chosen = draw_rows(table, &rows, config.n_lines, config.seed)?;
            PosteriorCurves::Lines(sample_curves(&model, table, &chosen, &a)?)
        }
    };

    info!(
        family = %schema.family,
        n = schema.n,
        samples = rows.len(),
        resolution = a.len(),
        "computed functional posterior"
    );
    Ok(FunctionalPosterior {
        schema,
        a,
        x,
        x_axis: config.x_axis,
        curves,
    })
}

/// Evaluate the curves of `rows` on `a`.
///
/// Adaptive slots missing from the table count as inactive.
fn sample_curves(
    model: &CurveModel,
    table: &SampleTable,
    rows: &[usize],
    a: &[f64],
) -> Result<Vec<Vec<f64>>, AppError> {
    let inert = match model.family() {
        Family::Adaptive => Some(f64::NAN),
        Family::Vanilla => None,
    };
    rows.par_iter()
        .map(|&i| {
            let theta = model.pack_with(|name| table.value(i, name).or(inert))?;
            model.curve_at(a, &theta)
        })
        .collect()
}

/// Pick `count` rows with probability proportional to weight.
fn draw_rows(table: &SampleTable, rows: &[usize], count: usize, seed: u64) -> Result<Vec<usize>, AppError> {
    let weights = rows.iter().map(|&i| table.weights()[i]);
    let dist = WeightedIndex::new(weights).map_err(|e| AppError::invalid(format!("sample weights: {e}")))?;
    let mut rng = StdRng::seed_from_u64(seed);
    Ok((0..count).map(|_| rows[dist.sample(&mut rng)]).collect())
}
