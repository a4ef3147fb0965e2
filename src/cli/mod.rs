//! Command-line parsing for the flexknot dark-energy tool.
//!
//! Argument parsing and command dispatch stay separate from the model and
//! plotting code; `app` turns these structs into library configs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::data::WEIGHT_COLUMN;
use crate::domain::{Coordinate, Family, PlotMode, XAxis};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "darkknot", version, about = "Flexknot dark-energy parametrizations and posterior plots")]
pub struct Cli {
    /// Log level used when DARKKNOT_LOG is unset (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the ordered parameter schema of a parametrization.
    Schema(ModelArgs),
    /// Evaluate w(a) for one set of parameter values.
    Eval(EvalArgs),
    /// Recover the parametrization behind a posterior sample table.
    Infer(SamplesArgs),
    /// Plot the functional posterior of w(a) from sample tables.
    Plot(PlotArgs),
    /// Write a synthetic weighted sample table.
    Simulate(SimulateArgs),
}

/// Which flexknot parametrization to use.
#[derive(Debug, Args, Clone)]
pub struct ModelArgs {
    /// Parametrization family (vanilla/fixed or adaptive).
    #[arg(short = 'f', long, value_enum, default_value_t = Family::Vanilla)]
    pub family: Family,

    /// Node count (maximum node count for adaptive).
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    pub n: i64,

    /// Breakpoints in redshift (z1, z2, ...) instead of scale factor.
    #[arg(long)]
    pub redshift: bool,
}

impl ModelArgs {
    pub fn coordinate(&self) -> Coordinate {
        if self.redshift {
            Coordinate::Redshift
        } else {
            Coordinate::ScaleFactor
        }
    }
}

/// Evaluation domain of the curve model.
#[derive(Debug, Args, Clone)]
pub struct DomainArgs {
    /// Number of evaluation points.
    #[arg(long = "points", default_value_t = 10_000)]
    pub num_points: usize,

    /// Smallest scale factor.
    #[arg(long, default_value_t = 1e-10)]
    pub amin: f64,

    /// Scale factor today.
    #[arg(long, default_value_t = 1.0)]
    pub atoday: f64,

    /// Redshift today.
    #[arg(long, default_value_t = 0.0)]
    pub ztoday: f64,

    /// Largest redshift.
    #[arg(long, default_value_t = 1e10 - 1.0)]
    pub zmax: f64,
}

/// Options for evaluating one curve.
#[derive(Debug, Args, Clone)]
pub struct EvalArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub domain: DomainArgs,

    /// Parameter value, repeatable (e.g. --param w0=-1 --param wn=-0.9).
    #[arg(long = "param", value_name = "NAME=VALUE", value_parser = parse_param)]
    pub param: Vec<(String, f64)>,

    /// JSON object of parameter values; --param entries override it.
    #[arg(long = "params", value_name = "JSON")]
    pub params_file: Option<PathBuf>,

    /// Render an ASCII plot of w against log10(a).
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export the evaluated curve (parametrization + params + grid) to JSON.
    #[arg(long = "export-curve")]
    pub export_curve: Option<PathBuf>,
}

/// Where to read posterior samples from.
#[derive(Debug, Args, Clone)]
pub struct SamplesArgs {
    /// Sample CSV; repeat to stack vanilla runs into one adaptive table.
    #[arg(long, value_name = "CSV", required = true)]
    pub samples: Vec<PathBuf>,

    /// Column holding the sample weights.
    #[arg(long, default_value = WEIGHT_COLUMN)]
    pub weight_column: String,

    /// The CSV has a second header row of display labels.
    #[arg(long)]
    pub label_row: bool,
}

/// Options for posterior plots.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    #[command(flatten)]
    pub samples: SamplesArgs,

    #[command(flatten)]
    pub domain: DomainArgs,

    /// SVG output path.
    #[arg(short = 'o', long, value_name = "SVG")]
    pub output: Option<PathBuf>,

    /// Credible bands or weighted sample lines.
    #[arg(long, value_enum, default_value_t = PlotMode::Contour)]
    pub mode: PlotMode,

    /// Plot against scale factor (a) or redshift (z).
    #[arg(long = "x-axis", value_enum, default_value_t = XAxis::ScaleFactor)]
    pub x_axis: XAxis,

    /// Grid points on the plot range.
    #[arg(long, default_value_t = 100)]
    pub resolution: usize,

    /// Lower end of the plot range in scale factor.
    #[arg(long = "a-min")]
    pub a_min: Option<f64>,

    /// Upper end of the plot range in scale factor.
    #[arg(long = "a-max")]
    pub a_max: Option<f64>,

    /// Curves drawn in lines mode.
    #[arg(long, default_value_t = 100)]
    pub lines: usize,

    /// Seed for weighted line selection.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// SVG width (pixels).
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// SVG height (pixels).
    #[arg(long, default_value_t = 600)]
    pub height: u32,

    #[arg(long = "x-label")]
    pub x_label: Option<String>,

    #[arg(long = "y-label")]
    pub y_label: Option<String>,

    /// Export the credible bands to CSV (contour mode).
    #[arg(long = "export-bands", value_name = "CSV")]
    pub export_bands: Option<PathBuf>,

    /// Also render an ASCII plot in the terminal.
    #[arg(long)]
    pub ascii: bool,
}

/// Options for synthetic sample generation.
#[derive(Debug, Args, Clone)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub domain: DomainArgs,

    /// Number of rows to draw.
    #[arg(long, default_value_t = 1000)]
    pub samples: usize,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Fiducial w of every node.
    #[arg(long = "fiducial-w", default_value_t = -1.0, allow_negative_numbers = true)]
    pub fiducial_w: f64,

    /// Standard deviation of the node values.
    #[arg(long, default_value_t = 0.1)]
    pub sigma: f64,

    /// Output CSV path.
    #[arg(short = 'o', long, value_name = "CSV")]
    pub output: PathBuf,
}

/// Parse `name=value` into a parameter pair.
fn parse_param(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty parameter name in '{s}'"));
    }
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid value for '{name}': {e}"))?;
    Ok((name.to_string(), value))
}
