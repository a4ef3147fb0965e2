//! Plotters rendering of functional posteriors.
//!
//! `draw_posterior` draws onto any drawing area the caller owns, so plots can
//! be composed into larger figures; `render_svg` is the one-shot variant that
//! creates its own SVG surface.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::info;

use crate::domain::PlotConfig;
use crate::error::AppError;
use crate::math::BandSummary;
use crate::plot::posterior::{FunctionalPosterior, PosteriorCurves};

// Sequential blue palette, light to dark.
const BAND_2SIGMA: RGBColor = RGBColor(198, 219, 239);
const BAND_1SIGMA: RGBColor = RGBColor(107, 174, 214);
const MEDIAN: RGBColor = RGBColor(8, 48, 107);
const LINE: RGBColor = RGBColor(33, 113, 181);

fn plot_err<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Plot(e.to_string())
}

/// Default axis labels, `$a$` / `$w(a)$` style.
fn labels(posterior: &FunctionalPosterior, config: &PlotConfig) -> (String, String) {
    let x = config
        .x_label
        .clone()
        .unwrap_or_else(|| posterior.x_axis.label().to_string());
    let y = config
        .y_label
        .clone()
        .unwrap_or_else(|| format!("w({})", posterior.x_axis.label()));
    (x, y)
}

fn padded(lo: f64, hi: f64) -> (f64, f64) {
    let pad = ((hi - lo).abs() * 0.05).max(1e-3);
    (lo - pad, hi + pad)
}

/// Draw `posterior` onto `area`.
pub fn draw_posterior<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    posterior: &FunctionalPosterior,
    config: &PlotConfig,
) -> Result<(), AppError> {
    let Some((w_lo, w_hi)) = posterior.w_range() else {
        return Err(AppError::Plot("posterior has no finite values to draw".into()));
    };
    let (y0, y1) = padded(w_lo, w_hi);

    let (x0, x1) = posterior
        .x
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !(x0.is_finite() && x1.is_finite()) || x1 <= x0 {
        return Err(AppError::Plot(format!("degenerate x range [{x0}, {x1}]")));
    }

    let (x_label, y_label) = labels(posterior, config);
    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 50)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .x_labels(6)
        .y_labels(6)
        .draw()
        .map_err(plot_err)?;

    let x = &posterior.x;
    match &posterior.curves {
        PosteriorCurves::Bands(bands) => {
            let band = |lower: fn(&BandSummary) -> f64, upper: fn(&BandSummary) -> f64| {
                let mut outline: Vec<(f64, f64)> = x.iter().copied().zip(bands.iter().map(upper)).collect();
                outline.extend(x.iter().copied().zip(bands.iter().map(lower)).rev());
                outline
            };

            let outer = band(|b| b.lower_2sigma, |b| b.upper_2sigma);
            let inner = band(|b| b.lower_1sigma, |b| b.upper_1sigma);
            chart
                .draw_series(std::iter::once(Polygon::new(outer, BAND_2SIGMA.filled())))
                .map_err(plot_err)?;
            chart
                .draw_series(std::iter::once(Polygon::new(inner, BAND_1SIGMA.filled())))
                .map_err(plot_err)?;

            let median = x.iter().copied().zip(bands.iter().map(|b| b.median));
            chart
                .draw_series(LineSeries::new(median, MEDIAN.stroke_width(2)))
                .map_err(plot_err)?;
        }
        PosteriorCurves::Lines(lines) => {
            let faint = LINE.mix(0.3);
            for line in lines {
                chart
                    .draw_series(LineSeries::new(x.iter().copied().zip(line.iter().copied()), &faint))
                    .map_err(plot_err)?;
            }
        }
    }

    Ok(())
}

/// Render `posterior` into a new SVG file.
pub fn render_svg(path: &Path, posterior: &FunctionalPosterior, config: &PlotConfig) -> Result<(), AppError> {
    let root = SVGBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    draw_posterior(&root, posterior, config)?;
    root.present().map_err(plot_err)?;
    info!(path = %path.display(), "wrote posterior plot");
    Ok(())
}
