//! Input/output helpers.
//!
//! - curve JSON read/write (`curve`)
//! - posterior band CSV exports (`export`)
//!
//! Sample tables have their own reader/writer in `data::table`.

pub mod curve;
pub mod export;

pub use curve::*;
pub use export::*;
