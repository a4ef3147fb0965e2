//! Mathematical utilities: grids, flexknot evaluators and weighted quantiles.

pub mod grid;
pub mod knot;
pub mod quantile;

pub use grid::*;
pub use knot::*;
pub use quantile::*;
