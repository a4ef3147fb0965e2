//! `darkknot` library crate.
//!
//! Flexknot parametrizations of the dark-energy equation of state `w(a)`:
//! parameter schemas, curve evaluation behind a `Theory` interface, and
//! functional-posterior plots of weighted sample tables.
//!
//! The binary (`darkknot`) is a thin wrapper around this library so that the
//! core logic is testable without spawning processes.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod schema;
