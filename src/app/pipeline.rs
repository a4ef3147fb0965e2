//! Shared posterior pipeline: sample tables -> functional posterior -> outputs.
//!
//! Kept apart from `app` so the workflow can be driven without a CLI.

use std::path::PathBuf;

use tracing::info;

use crate::data::{ReadOptions, SampleTable, read_samples_csv};
use crate::domain::{DarkKnotConfig, PlotConfig};
use crate::error::AppError;
use crate::io::export::write_bands_csv;
use crate::plot::{FunctionalPosterior, concat_as_adaptive, functional_posterior, render_svg};

/// Everything a posterior plot run needs.
#[derive(Debug, Clone)]
pub struct PlotJob {
    pub samples: Vec<PathBuf>,
    pub read: ReadOptions,
    pub domain: DarkKnotConfig,
    pub plot: PlotConfig,
    pub output: Option<PathBuf>,
    pub export_bands: Option<PathBuf>,
}

/// All computed outputs of a single plot run.
#[derive(Debug, Clone)]
pub struct PlotRun {
    pub table: SampleTable,
    pub posterior: FunctionalPosterior,
}

/// Load one sample table, or stack several vanilla tables into an adaptive one.
pub fn load_samples(paths: &[PathBuf], options: &ReadOptions) -> Result<SampleTable, AppError> {
    let mut tables = paths
        .iter()
        .map(|p| read_samples_csv(p, options))
        .collect::<Result<Vec<_>, _>>()?;
    if tables.len() > 1 {
        info!(tables = tables.len(), "stacking vanilla runs into an adaptive table");
        return concat_as_adaptive(&tables);
    }
    tables.pop().ok_or_else(|| AppError::invalid("no sample files given"))
}

/// Execute the plot pipeline and write the requested outputs.
pub fn run_plot(job: &PlotJob) -> Result<PlotRun, AppError> {
    let table = load_samples(&job.samples, &job.read)?;
    let posterior = functional_posterior(&table, &job.domain, &job.plot)?;

    if let Some(path) = &job.output {
        render_svg(path, &posterior, &job.plot)?;
    }
    if let Some(path) = &job.export_bands {
        write_bands_csv(path, &posterior)?;
    }

    Ok(PlotRun { table, posterior })
}
