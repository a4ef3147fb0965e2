//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - parametrization enums (`Family`, `Coordinate`)
//! - evaluation and plotting configuration (`DarkKnotConfig`, `PlotConfig`)
//! - curve outputs (`DarkEnergy`, `CurveFile`)

pub mod types;

pub use types::*;
