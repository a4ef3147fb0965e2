//! Flexknot evaluators.
//!
//! A flexknot is a piecewise-linear function through an ordered set of nodes.
//! The two end nodes sit on the domain bounds and only carry a value; every
//! interior node carries a (position, value) pair. The parameter vector is
//! laid out as
//!
//! ```text
//! theta = [y0, x1, y1, x2, y2, ..., x_m, y_m, y_last]
//! ```
//!
//! which is exactly the order `schema::build_schema` declares names in.
//! The adaptive variant prefixes the vector with the active node count.

use crate::error::AppError;

/// Value of an empty flexknot (no nodes): the cosmological constant.
pub const EMPTY_VALUE: f64 = -1.0;

/// Evaluator contract: map a grid and a parameter vector to curve values.
pub trait Knot: Send + Sync {
    fn evaluate(&self, x: &[f64], theta: &[f64]) -> Result<Vec<f64>, AppError>;
}

/// Fixed-node flexknot over `[x_min, x_max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlexKnot {
    pub x_min: f64,
    pub x_max: f64,
}

impl FlexKnot {
    pub fn new(x_min: f64, x_max: f64) -> Self {
        Self { x_min, x_max }
    }

    /// Node positions and values for `theta`, sorted by position.
    fn nodes(&self, theta: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let last = theta.len() - 1;
        let mut nodes = Vec::with_capacity(theta.len() / 2 + 1);
        nodes.push((self.x_min, theta[0]));
        for pair in theta[1..last].chunks_exact(2) {
            nodes.push((pair[0], pair[1]));
        }
        nodes.push((self.x_max, theta[last]));
        nodes.sort_by(|a, b| a.0.total_cmp(&b.0));

        nodes.into_iter().unzip()
    }
}

impl Knot for FlexKnot {
    fn evaluate(&self, x: &[f64], theta: &[f64]) -> Result<Vec<f64>, AppError> {
        if let Some(bad) = theta.iter().find(|v| !v.is_finite()) {
            return Err(AppError::evaluator(format!(
                "flexknot parameter vector contains non-finite value {bad}"
            )));
        }
        match theta {
            [] => Ok(vec![EMPTY_VALUE; x.len()]),
            [y] => Ok(vec![*y; x.len()]),
            _ if theta.len() % 2 == 1 => Err(AppError::evaluator(format!(
                "flexknot parameter vector must have even length, got {}",
                theta.len()
            ))),
            _ => {
                let (xs, ys) = self.nodes(theta);
                Ok(x.iter().map(|&xi| interp(xi, &xs, &ys)).collect())
            }
        }
    }
}

/// Variable-node flexknot.
///
/// `theta[0]` is the active node count `N` (floored). The first `2N - 3`
/// entries after it and the final entry are handed to a `FlexKnot`; the
/// slots in between are inactive and never read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveKnot {
    inner: FlexKnot,
}

impl AdaptiveKnot {
    pub fn new(x_min: f64, x_max: f64) -> Self {
        Self {
            inner: FlexKnot::new(x_min, x_max),
        }
    }

    /// The active part of `theta`, without the leading node count.
    pub fn active(&self, theta: &[f64]) -> Result<Vec<f64>, AppError> {
        let Some((&count, rest)) = theta.split_first() else {
            return Err(AppError::evaluator("adaptive flexknot requires the node count as first entry"));
        };
        if !(count.is_finite() && count >= 0.0) {
            return Err(AppError::evaluator(format!("invalid adaptive node count {count}")));
        }

        // n nodes need 2n - 2 slots (one for n = 1).
        let supported = rest.len() / 2 + 1;
        if count.floor() > supported as f64 {
            return Err(AppError::evaluator(format!(
                "adaptive node count {count} exceeds the {} supplied slots",
                rest.len()
            )));
        }

        let n = count.floor() as usize;
        match n {
            0 => Ok(Vec::new()),
            _ => {
                let (head, needed) = if n == 1 { (0, 1) } else { (2 * n - 3, 2 * n - 2) };
                if rest.len() < needed {
                    return Err(AppError::evaluator(format!(
                        "adaptive node count {n} needs {needed} slots, only {} supplied",
                        rest.len()
                    )));
                }
                let mut active = Vec::with_capacity(head + 1);
                active.extend_from_slice(&rest[..head]);
                active.push(rest[rest.len() - 1]);
                Ok(active)
            }
        }
    }
}

impl Knot for AdaptiveKnot {
    fn evaluate(&self, x: &[f64], theta: &[f64]) -> Result<Vec<f64>, AppError> {
        let active = self.active(theta)?;
        self.inner.evaluate(x, &active)
    }
}

/// Linear interpolation through sorted nodes, flat outside the node range.
fn interp(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    let last = xs.len() - 1;
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[last] {
        return ys[last];
    }

    let i = xs.partition_point(|&v| v <= x);
    let (x0, x1) = (xs[i - 1], xs[i]);
    let (y0, y1) = (ys[i - 1], ys[i]);
    if x1 == x0 {
        return y1;
    }
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}
