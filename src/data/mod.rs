//! Posterior sample tables: CSV ingest/export and synthetic generation.

pub mod sample;
pub mod table;

pub use sample::*;
pub use table::*;
