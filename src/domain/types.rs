//! Shared domain types.
//!
//! These types are kept lightweight and serializable so they can be:
//!
//! - passed between the schema builder, curve models and plotter
//! - exported to JSON/CSV
//! - reloaded later for plotting or comparisons

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Parametrization family of a flexknot curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    /// Fixed node count, known when the model is built.
    #[value(alias = "fixed")]
    Vanilla,
    /// Variable node count up to a maximum, exposed as the `Nw` parameter.
    Adaptive,
}

impl Family {
    pub fn display_name(self) -> &'static str {
        match self {
            Family::Vanilla => "Vanilla",
            Family::Adaptive => "Adaptive",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Family {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vanilla" | "fixed" => Ok(Family::Vanilla),
            "adaptive" => Ok(Family::Adaptive),
            other => Err(AppError::invalid(format!(
                "unknown parametrization family '{other}' (expected vanilla or adaptive)"
            ))),
        }
    }
}

/// Which coordinate the breakpoints (and the evaluator) are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Coordinate {
    /// Breakpoints `a1..a_{n-2}` in scale factor.
    #[value(name = "a")]
    ScaleFactor,
    /// Breakpoints `z1..z_{n-2}` in redshift.
    #[value(name = "z")]
    Redshift,
}

impl Coordinate {
    /// Prefix used for breakpoint parameter names.
    pub fn breakpoint_prefix(self) -> char {
        match self {
            Coordinate::ScaleFactor => 'a',
            Coordinate::Redshift => 'z',
        }
    }
}

/// Functional posterior rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlotMode {
    /// Weighted credible-interval bands around the median.
    Contour,
    /// Overlay of individual posterior curves drawn by weight.
    Lines,
}

/// Horizontal axis of a posterior plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum XAxis {
    /// Scale factor `a`.
    #[value(name = "a")]
    ScaleFactor,
    /// Redshift `z = 1/a - 1`.
    #[value(name = "z")]
    Redshift,
}

impl XAxis {
    /// Map a scale factor onto this axis.
    pub fn from_scale_factor(self, a: f64) -> f64 {
        match self {
            XAxis::ScaleFactor => a,
            XAxis::Redshift => 1.0 / a - 1.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            XAxis::ScaleFactor => "a",
            XAxis::Redshift => "z",
        }
    }
}

/// Fixed evaluation settings shared by every curve model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DarkKnotConfig {
    /// Number of log-spaced grid points per evaluation.
    pub num_points: usize,
    /// Earliest scale factor on the grid.
    pub amin: f64,
    /// Scale factor today.
    pub atoday: f64,
    /// Redshift today.
    pub ztoday: f64,
    /// Latest redshift on the grid (redshift convention only).
    pub zmax: f64,
}

impl Default for DarkKnotConfig {
    fn default() -> Self {
        Self {
            num_points: 10_000,
            amin: 1e-10,
            atoday: 1.0,
            ztoday: 0.0,
            zmax: 1e10 - 1.0,
        }
    }
}

/// Domain end points as seen by the evaluator, in its native variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainBounds {
    pub lower: f64,
    pub upper: f64,
}

impl DarkKnotConfig {
    /// Evaluator bounds for the given coordinate convention.
    pub fn bounds(&self, coordinate: Coordinate) -> DomainBounds {
        match coordinate {
            Coordinate::ScaleFactor => DomainBounds {
                lower: self.amin,
                upper: self.atoday,
            },
            Coordinate::Redshift => DomainBounds {
                lower: self.ztoday,
                upper: self.zmax,
            },
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.num_points < 2 {
            return Err(AppError::invalid("num_points must be >= 2"));
        }
        if !(self.amin.is_finite() && self.atoday.is_finite() && self.amin > 0.0 && self.atoday > self.amin) {
            return Err(AppError::invalid(format!(
                "scale-factor bounds must satisfy 0 < amin < atoday (got amin={}, atoday={})",
                self.amin, self.atoday
            )));
        }
        if !(self.ztoday.is_finite() && self.zmax.is_finite() && self.ztoday > -1.0 && self.zmax > self.ztoday) {
            return Err(AppError::invalid(format!(
                "redshift bounds must satisfy -1 < ztoday < zmax (got ztoday={}, zmax={})",
                self.ztoday, self.zmax
            )));
        }
        Ok(())
    }
}

/// Plotting settings for the posterior curve plotter.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// Number of grid points on the plot's x range.
    pub resolution: usize,
    /// Plot range in scale factor. `None` means the model's own bounds.
    pub a_min: Option<f64>,
    pub a_max: Option<f64>,
    pub mode: PlotMode,
    pub x_axis: XAxis,
    /// Curves drawn in `PlotMode::Lines`.
    pub n_lines: usize,
    /// Seed for weighted line selection.
    pub seed: u64,
    /// Surface size (pixels for SVG).
    pub width: u32,
    pub height: u32,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            resolution: 100,
            a_min: None,
            a_max: None,
            mode: PlotMode::Contour,
            x_axis: XAxis::ScaleFactor,
            n_lines: 100,
            seed: 42,
            width: 800,
            height: 600,
            x_label: None,
            y_label: None,
        }
    }
}

/// The curve written into the framework state under `"dark_energy"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DarkEnergy {
    /// Scale-factor grid.
    pub a: Vec<f64>,
    /// Equation of state `w(a)` on that grid.
    pub w: Vec<f64>,
}

impl DarkEnergy {
    pub fn len(&self) -> usize {
        self.a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.a.iter().copied().zip(self.w.iter().copied())
    }
}

/// A saved curve file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub generated: DateTime<Utc>,
    pub family: Family,
    pub n: usize,
    pub coordinate: Coordinate,
    /// Parameter values in schema order.
    pub params: Vec<(String, f64)>,
    pub dark_energy: DarkEnergy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_parses_aliases_case_insensitively() {
        assert_eq!("Vanilla".parse::<Family>().unwrap(), Family::Vanilla);
        assert_eq!("fixed".parse::<Family>().unwrap(), Family::Vanilla);
        assert_eq!(" ADAPTIVE ".parse::<Family>().unwrap(), Family::Adaptive);
    }

    #[test]
    fn unknown_family_is_invalid_configuration() {
        let err = "cubic".parse::<Family>().unwrap_err();
        assert!(matches!(err, AppError::InvalidConfiguration(_)), "got {err:?}");
    }

    #[test]
    fn default_redshift_bounds_match_scale_factor_bounds() {
        let config = DarkKnotConfig::default();
        config.validate().unwrap();
        let z = config.bounds(Coordinate::Redshift);
        assert!((1.0 / (1.0 + z.upper) - config.amin).abs() < 1e-20);
        assert_eq!(z.lower, 0.0);
    }

    #[test]
    fn dark_energy_serializes_with_wire_keys() {
        let de = DarkEnergy {
            a: vec![0.5, 1.0],
            w: vec![-1.0, -0.9],
        };
        let json = serde_json::to_value(&de).unwrap();
        assert_eq!(json["a"][1], 1.0);
        assert_eq!(json["w"][0], -1.0);
        assert_eq!(json.as_object().unwrap().len(), 2);
    }

    #[test]
    fn redshift_axis_inverts_scale_factor() {
        assert_eq!(XAxis::Redshift.from_scale_factor(0.5), 1.0);
        assert_eq!(XAxis::ScaleFactor.from_scale_factor(0.5), 0.5);
    }
}
