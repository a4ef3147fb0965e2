//! Flexknot dark-energy curve model.
//!
//! A `CurveModel` binds together:
//! - a parametrization family and node count
//! - the parameter schema built for them
//! - the domain bounds and a fixed dense evaluation grid
//! - the flexknot evaluator matching the family
//!
//! and keeps the most recently computed curve.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::domain::{Coordinate, DarkEnergy, DarkKnotConfig, Family};
use crate::error::AppError;
use crate::math::{AdaptiveKnot, FlexKnot, Knot, log_space};
use crate::schema::{FINAL_VALUE, NODE_COUNT, ParameterSchema, build_schema};

pub struct CurveModel {
    family: Family,
    n: usize,
    coordinate: Coordinate,
    config: DarkKnotConfig,
    schema: ParameterSchema,
    knot: Box<dyn Knot>,
    /// Grid in the evaluator's native variable (`a` or `z`).
    eval_grid: Vec<f64>,
    /// The same grid expressed in scale factor.
    a_grid: Vec<f64>,
    current: Mutex<Option<DarkEnergy>>,
}

impl std::fmt::Debug for CurveModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurveModel")
            .field("family", &self.family)
            .field("n", &self.n)
            .field("coordinate", &self.coordinate)
            .field("params", &self.schema.to_names())
            .field("num_points", &self.config.num_points)
            .finish()
    }
}

impl CurveModel {
    /// Build a model for `family` with node count `n` (the maximum for `Adaptive`).
    pub fn new(family: Family, n: i64, coordinate: Coordinate, config: DarkKnotConfig) -> Result<Self, AppError> {
        config.validate()?;
        let schema = build_schema(family, n, coordinate)?;

        let bounds = config.bounds(coordinate);
        let knot: Box<dyn Knot> = match family {
            Family::Vanilla => Box::new(FlexKnot::new(bounds.lower, bounds.upper)),
            Family::Adaptive => Box::new(AdaptiveKnot::new(bounds.lower, bounds.upper)),
        };

        // Redshift grids are log-spaced in (1 + z) so the lower end at
        // z = 0 stays well defined.
        let (eval_grid, a_grid) = match coordinate {
            Coordinate::ScaleFactor => {
                let a = log_space(config.amin, config.atoday, config.num_points)?;
                (a.clone(), a)
            }
            Coordinate::Redshift => {
                let one_plus_z = log_space(1.0 + config.ztoday, 1.0 + config.zmax, config.num_points)?;
                let z = one_plus_z.iter().map(|g| g - 1.0).collect();
                let a = one_plus_z.iter().map(|g| 1.0 / g).collect();
                (z, a)
            }
        };

        Ok(Self {
            family,
            n: n as usize,
            coordinate,
            config,
            schema,
            knot,
            eval_grid,
            a_grid,
            current: Mutex::new(None),
        })
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn config(&self) -> &DarkKnotConfig {
        &self.config
    }

    pub fn schema(&self) -> &ParameterSchema {
        &self.schema
    }

    /// Rebuild the schema in place; a fresh allocation owned by this model.
    pub(crate) fn rebuild_schema(&mut self) -> Result<(), AppError> {
        self.schema = build_schema(self.family, self.n as i64, self.coordinate)?;
        Ok(())
    }

    /// Pack values into evaluator order using `lookup`.
    ///
    /// Every schema name must resolve. For the adaptive family, `NaN` slots
    /// (inactive nodes) are dropped; `Nw` and `wn` are always kept.
    pub fn pack_with<F>(&self, mut lookup: F) -> Result<Vec<f64>, AppError>
    where
        F: FnMut(&str) -> Option<f64>,
    {
        let mut theta = Vec::with_capacity(self.schema.len());
        for name in self.schema.names() {
            let value = lookup(name).ok_or_else(|| AppError::MissingParameter(name.to_string()))?;
            let inactive = self.family == Family::Adaptive
                && value.is_nan()
                && name != NODE_COUNT
                && name != FINAL_VALUE;
            if !inactive {
                theta.push(value);
            }
        }
        Ok(theta)
    }

    /// Pack a name -> value mapping into evaluator order.
    pub fn pack(&self, values: &HashMap<String, f64>) -> Result<Vec<f64>, AppError> {
        self.pack_with(|name| values.get(name).copied())
    }

    /// Evaluate the curve for `theta` on a scale-factor grid of the caller's choosing.
    pub fn curve_at(&self, a: &[f64], theta: &[f64]) -> Result<Vec<f64>, AppError> {
        match self.coordinate {
            Coordinate::ScaleFactor => self.knot.evaluate(a, theta),
            Coordinate::Redshift => {
                let z: Vec<f64> = a.iter().map(|a| 1.0 / a - 1.0).collect();
                self.knot.evaluate(&z, theta)
            }
        }
    }

    /// Evaluate `w(a)` on the dense model grid and cache the result.
    pub fn evaluate(&self, values: &HashMap<String, f64>) -> Result<DarkEnergy, AppError> {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);

        let theta = self.pack(values)?;
        let w = self.knot.evaluate(&self.eval_grid, &theta)?;
        debug!(family = %self.family, n = self.n, theta_len = theta.len(), "evaluated dark energy curve");

        let curve = DarkEnergy {
            a: self.a_grid.clone(),
            w,
        };
        *current = Some(curve.clone());
        Ok(curve)
    }

    /// The most recently evaluated curve, if any.
    pub fn current(&self) -> Option<DarkEnergy> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}
