//! Posterior plotting: schema inference, functional posteriors, rendering.

pub mod ascii;
pub mod infer;
pub mod posterior;
pub mod svg;

pub use ascii::*;
pub use infer::*;
pub use posterior::*;
pub use svg::*;
