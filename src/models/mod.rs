//! Flexknot curve models.
//!
//! `CurveModel` is the single parametrized factory for every family and node
//! count; `Theory` is the contract the inference framework drives it through.

pub mod model;
pub mod theory;

pub use model::*;
pub use theory::*;
