//! Export functional posterior bands to CSV.
//!
//! One row per plot grid point, easy to load into spreadsheets or scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::error::AppError;
use crate::plot::{FunctionalPosterior, PosteriorCurves};

pub const BAND_HEADER: [&str; 6] = ["x", "q02", "q16", "q50", "q84", "q97"];

/// Write the credible bands of a contour-mode posterior to a CSV file.
pub fn write_bands_csv(path: &Path, posterior: &FunctionalPosterior) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::invalid(format!("failed to create band CSV '{}': {e}", path.display())))?;
    write_bands(file, posterior)?;
    info!(path = %path.display(), rows = posterior.x.len(), "wrote posterior bands");
    Ok(())
}

pub fn write_bands<W: Write>(sink: W, posterior: &FunctionalPosterior) -> Result<(), AppError> {
    let PosteriorCurves::Bands(bands) = &posterior.curves else {
        return Err(AppError::invalid("band export needs a contour-mode posterior"));
    };

    let mut writer = csv::Writer::from_writer(sink);
    writer.write_record(BAND_HEADER)?;
    for (x, b) in posterior.x.iter().zip(bands) {
        writer.write_record(
            [x, &b.lower_2sigma, &b.lower_1sigma, &b.median, &b.upper_1sigma, &b.upper_2sigma]
                .iter()
                .map(|v| format!("{v:.10}")),
        )?;
    }
    writer.flush()?;
    Ok(())
}
