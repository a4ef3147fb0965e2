//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the real main that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - builds curve models / sample tables / posteriors
//! - prints reports and plots
//! - writes optional exports

use std::collections::HashMap;
use std::fs::File;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, DomainArgs, EvalArgs, ModelArgs, PlotArgs, SamplesArgs, SimulateArgs};
use crate::data::{ReadOptions, SampleConfig, generate_samples, write_samples_csv};
use crate::domain::{DarkKnotConfig, PlotConfig};
use crate::error::AppError;
use crate::models::CurveModel;
use crate::plot::infer_schema;

pub mod pipeline;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "DARKKNOT_LOG";

/// Entry point for the `darkknot` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Command::Schema(args) => handle_schema(&args),
        Command::Eval(args) => handle_eval(&args),
        Command::Infer(args) => handle_infer(&args),
        Command::Plot(args) => handle_plot(&args),
        Command::Simulate(args) => handle_simulate(&args),
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));
    // A subscriber may already be installed when embedded.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_schema(args: &ModelArgs) -> Result<(), AppError> {
    let schema = crate::schema::build_schema(args.family, args.n, args.coordinate())?;
    print!(
        "{}",
        crate::report::format_schema(&schema, args.family, args.n as usize, args.coordinate())
    );
    Ok(())
}

fn handle_eval(args: &EvalArgs) -> Result<(), AppError> {
    let domain = domain_config_from_args(&args.domain);
    let model = CurveModel::new(args.model.family, args.model.n, args.model.coordinate(), domain)?;
    let values = eval_params_from_args(args)?;

    let curve = crate::io::curve::curve_file(&model, &values)?;
    println!(
        "{}",
        crate::report::format_curve_summary(
            curve.family,
            curve.n,
            curve.coordinate,
            &curve.params,
            &curve.dark_energy
        )
    );

    if args.plot {
        let points: Vec<(f64, f64)> = curve.dark_energy.points().map(|(a, w)| (a.log10(), w)).collect();
        println!("{}", crate::plot::render_ascii_curve(&points, "log10(a)", args.width, args.height));
    }
    if let Some(path) = &args.export_curve {
        crate::io::curve::write_curve_json(path, &curve)?;
    }
    Ok(())
}

fn handle_infer(args: &SamplesArgs) -> Result<(), AppError> {
    let table = pipeline::load_samples(&args.samples, &read_options_from_args(args))?;
    let inferred = infer_schema(&table)?;
    print!("{}", crate::report::format_inferred(&inferred, &table));
    Ok(())
}

fn handle_plot(args: &PlotArgs) -> Result<(), AppError> {
    let job = plot_job_from_args(args);
    let run = pipeline::run_plot(&job)?;

    print!("{}", crate::report::format_posterior_summary(&run.posterior));
    if args.ascii {
        println!("{}", crate::plot::render_ascii_posterior(&run.posterior, 100, 25));
    }
    Ok(())
}

fn handle_simulate(args: &SimulateArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        samples: args.samples,
        seed: args.seed,
        fiducial_w: args.fiducial_w,
        sigma: args.sigma,
    };
    let domain = domain_config_from_args(&args.domain);
    let table = generate_samples(args.model.family, args.model.n, args.model.coordinate(), &domain, &config)?;
    write_samples_csv(&args.output, &table)?;
    info!(path = %args.output.display(), rows = table.len(), "wrote synthetic samples");
    println!(
        "Wrote {} {} n={} samples to {}",
        table.len(),
        args.model.family,
        args.model.n,
        args.output.display()
    );
    Ok(())
}

pub fn domain_config_from_args(args: &DomainArgs) -> DarkKnotConfig {
    DarkKnotConfig {
        num_points: args.num_points,
        amin: args.amin,
        atoday: args.atoday,
        ztoday: args.ztoday,
        zmax: args.zmax,
    }
}

pub fn read_options_from_args(args: &SamplesArgs) -> ReadOptions {
    ReadOptions {
        weight_column: args.weight_column.clone(),
        label_row: args.label_row,
    }
}

pub fn plot_config_from_args(args: &PlotArgs) -> PlotConfig {
    PlotConfig {
        resolution: args.resolution,
        a_min: args.a_min,
        a_max: args.a_max,
        mode: args.mode,
        x_axis: args.x_axis,
        n_lines: args.lines,
        seed: args.seed,
        width: args.width,
        height: args.height,
        x_label: args.x_label.clone(),
        y_label: args.y_label.clone(),
    }
}

pub fn plot_job_from_args(args: &PlotArgs) -> pipeline::PlotJob {
    pipeline::PlotJob {
        samples: args.samples.samples.clone(),
        read: read_options_from_args(&args.samples),
        domain: domain_config_from_args(&args.domain),
        plot: plot_config_from_args(args),
        output: args.output.clone(),
        export_bands: args.export_bands.clone(),
    }
}

/// Merge the `--params` JSON object with the `--param` overrides.
pub fn eval_params_from_args(args: &EvalArgs) -> Result<HashMap<String, f64>, AppError> {
    let mut values: HashMap<String, f64> = match &args.params_file {
        Some(path) => {
            let file = File::open(path).map_err(|e| {
                AppError::invalid(format!("failed to open parameter JSON '{}': {e}", path.display()))
            })?;
            serde_json::from_reader(file)?
        }
        None => HashMap::new(),
    };
    values.extend(args.param.iter().cloned());
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Command {
        Cli::try_parse_from(argv).unwrap().command
    }

    #[test]
    fn domain_defaults_match_library_defaults() {
        let Command::Eval(args) = parse(&["darkknot", "eval", "-n", "2"]) else {
            panic!("expected eval");
        };
        assert_eq!(domain_config_from_args(&args.domain), DarkKnotConfig::default());
    }

    #[test]
    fn plot_defaults_match_library_defaults() {
        let Command::Plot(args) = parse(&["darkknot", "plot", "--samples", "s.csv"]) else {
            panic!("expected plot");
        };
        let config = plot_config_from_args(&args);
        let defaults = PlotConfig::default();
        assert_eq!(config.resolution, defaults.resolution);
        assert_eq!(config.n_lines, defaults.n_lines);
        assert_eq!(config.seed, defaults.seed);
        assert_eq!((config.width, config.height), (defaults.width, defaults.height));
        assert_eq!(config.mode, defaults.mode);
    }

    #[test]
    fn param_flags_override_json() {
        let path = std::env::temp_dir().join(format!("darkknot-params-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"w0": -1.0, "wn": -0.5}"#).unwrap();
        let path_str = path.to_string_lossy().to_string();
        let Command::Eval(args) = parse(&["darkknot", "eval", "-n", "2", "--params", &path_str, "--param", "wn=-0.9"])
        else {
            panic!("expected eval");
        };
        let values = eval_params_from_args(&args).unwrap();
        assert_eq!(values["w0"], -1.0);
        assert_eq!(values["wn"], -0.9);
    }
}
