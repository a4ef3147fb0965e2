//! Parameter schema construction for flexknot curves.
//!
//! A schema is the ordered list of free parameter names for one model. The
//! order is the positional order the flexknot evaluator reads its parameter
//! vector in, so it is load-bearing: two schemas with the same names in a
//! different order describe different curves.
//!
//! For node count `n` the layout is:
//!
//! ```text
//! [Nw]  w0  a1 w1  a2 w2  ...  a_{n-2} w_{n-2}  wn
//! ```
//!
//! with `Nw` only for the adaptive family, `w0` only for `n >= 2` and `wn`
//! only for `n >= 1`. Breakpoints are named `z1..` in the redshift convention.

use tracing::debug;

use crate::domain::{Coordinate, Family};
use crate::error::AppError;

/// Active node count parameter of the adaptive family.
pub const NODE_COUNT: &str = "Nw";

/// Value at the upper domain bound; always the final entry.
pub const FINAL_VALUE: &str = "wn";

/// A single declared parameter.
///
/// Declarations carry no prior or bounds; those belong to the inference run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParamDecl {
    pub name: String,
}

impl ParamDecl {
    fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Ordered name -> declaration mapping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParameterSchema {
    decls: Vec<ParamDecl>,
}

impl ParameterSchema {
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.decls.iter().map(|d| d.name.as_str())
    }

    pub fn to_names(&self) -> Vec<String> {
        self.names().map(str::to_string).collect()
    }

    /// Keep only the declarations accepted by `keep`, preserving order.
    pub fn restrict_to(&self, mut keep: impl FnMut(&str) -> bool) -> ParameterSchema {
        ParameterSchema {
            decls: self.decls.iter().filter(|d| keep(&d.name)).cloned().collect(),
        }
    }

    fn push(&mut self, name: impl Into<String>) {
        self.decls.push(ParamDecl::new(name));
    }
}

/// Build the schema for `family` with node count `n`.
///
/// For `Vanilla`, `n` is the exact node count; for `Adaptive` it is the
/// maximum. Negative `n` is rejected.
pub fn build_schema(family: Family, n: i64, coordinate: Coordinate) -> Result<ParameterSchema, AppError> {
    if n < 0 {
        return Err(AppError::invalid(format!("node count must be >= 0, got {n}")));
    }

    let prefix = coordinate.breakpoint_prefix();
    let mut schema = ParameterSchema::default();

    if family == Family::Adaptive {
        schema.push(NODE_COUNT);
    }
    if n >= 2 {
        schema.push("w0");
    }
    for i in 1..=(n - 2) {
        schema.push(format!("{prefix}{i}"));
        schema.push(format!("w{i}"));
    }
    if n >= 1 {
        schema.push(FINAL_VALUE);
    }

    debug!(%family, n, ?coordinate, params = schema.len(), "built parameter schema");
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(family: Family, n: i64, coordinate: Coordinate) -> Vec<String> {
        build_schema(family, n, coordinate).unwrap().to_names()
    }

    #[test]
    fn vanilla_three_nodes() {
        assert_eq!(
            names(Family::Vanilla, 3, Coordinate::ScaleFactor),
            ["w0", "a1", "w1", "wn"]
        );
    }

    #[test]
    fn adaptive_nine_nodes_prepends_nw() {
        let got = names(Family::Adaptive, 9, Coordinate::ScaleFactor);
        let mut expected = vec!["Nw".to_string()];
        expected.extend(names(Family::Vanilla, 9, Coordinate::ScaleFactor));
        assert_eq!(got, expected);
        assert_eq!(got[..4], ["Nw", "w0", "a1", "w1"]);
        assert_eq!(got[got.len() - 3..], ["a7", "w7", "wn"]);
        assert_eq!(got.len(), 17);
    }

    #[test]
    fn degenerate_node_counts() {
        assert!(names(Family::Vanilla, 0, Coordinate::ScaleFactor).is_empty());
        assert_eq!(names(Family::Adaptive, 0, Coordinate::ScaleFactor), ["Nw"]);
        assert_eq!(names(Family::Vanilla, 1, Coordinate::ScaleFactor), ["wn"]);
        assert_eq!(names(Family::Adaptive, 1, Coordinate::ScaleFactor), ["Nw", "wn"]);
        assert_eq!(names(Family::Vanilla, 2, Coordinate::ScaleFactor), ["w0", "wn"]);
    }

    #[test]
    fn layout_rule_holds_for_all_small_n() {
        for family in [Family::Vanilla, Family::Adaptive] {
            for n in 0..12i64 {
                let got = names(family, n, Coordinate::ScaleFactor);
                let mut expected = Vec::new();
                if family == Family::Adaptive {
                    expected.push("Nw".to_string());
                }
                if n >= 2 {
                    expected.push("w0".to_string());
                }
                for i in 1..n - 1 {
                    expected.push(format!("a{i}"));
                    expected.push(format!("w{i}"));
                }
                if n >= 1 {
                    expected.push("wn".to_string());
                }
                assert_eq!(got, expected, "family={family} n={n}");
            }
        }
    }

    #[test]
    fn rebuilding_is_deterministic() {
        for n in 0..10 {
            let a = build_schema(Family::Adaptive, n, Coordinate::Redshift).unwrap();
            let b = build_schema(Family::Adaptive, n, Coordinate::Redshift).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn redshift_convention_renames_breakpoints() {
        assert_eq!(
            names(Family::Vanilla, 4, Coordinate::Redshift),
            ["w0", "z1", "w1", "z2", "w2", "wn"]
        );
    }

    #[test]
    fn negative_node_count_is_rejected() {
        let err = build_schema(Family::Vanilla, -1, Coordinate::ScaleFactor).unwrap_err();
        assert!(matches!(err, AppError::InvalidConfiguration(_)), "got {err:?}");
    }

    #[test]
    fn restrict_preserves_order() {
        let schema = build_schema(Family::Adaptive, 5, Coordinate::ScaleFactor).unwrap();
        let kept = schema.restrict_to(|name| name != "a2" && name != "w2");
        assert_eq!(kept.to_names(), ["Nw", "w0", "a1", "w1", "a3", "w3", "wn"]);
    }
}
