//! Inference-framework contract.
//!
//! The sampler drives a theory component through three hooks:
//! - `initialize()` once, before it reads the declared parameters
//! - `params()` to register the ordered parameter names
//! - `calculate()` for every point in parameter space
//!
//! Results are published under fixed keys; `"dark_energy"` with an `"a"` and
//! a `"w"` array is what downstream likelihoods read.

use std::collections::{BTreeMap, HashMap};

use crate::domain::DarkEnergy;
use crate::error::AppError;
use crate::models::CurveModel;
use crate::schema::ParameterSchema;

/// State key under which the dark-energy curve is published.
pub const DARK_ENERGY: &str = "dark_energy";

/// Products of one `calculate()` call, keyed by product name.
pub type State = BTreeMap<String, DarkEnergy>;

pub trait Theory {
    /// Populate the declared parameters.
    fn initialize(&mut self) -> Result<(), AppError>;

    /// Declared parameters, in evaluator order.
    fn params(&self) -> &ParameterSchema;

    /// Compute products for `values` and write them into `state`.
    fn calculate(&self, state: &mut State, values: &HashMap<String, f64>) -> Result<(), AppError>;

    /// The state stored by the latest successful `calculate()`.
    fn get_current_output(&self) -> State;

    fn get_dark_energy(&self) -> Option<DarkEnergy> {
        self.get_current_output().remove(DARK_ENERGY)
    }
}

impl Theory for CurveModel {
    fn initialize(&mut self) -> Result<(), AppError> {
        self.rebuild_schema()
    }

    fn params(&self) -> &ParameterSchema {
        self.schema()
    }

    fn calculate(&self, state: &mut State, values: &HashMap<String, f64>) -> Result<(), AppError> {
        let curve = self.evaluate(values)?;
        state.insert(DARK_ENERGY.to_string(), curve);
        Ok(())
    }

    fn get_current_output(&self) -> State {
        self.current()
            .map(|curve| State::from([(DARK_ENERGY.to_string(), curve)]))
            .unwrap_or_default()
    }
}
