//! Recover the parametrization that produced a sample table.
//!
//! Column names follow the schema naming convention, so the family and node
//! count can be read back from them:
//!
//! - `Nw` present => adaptive family
//! - the highest breakpoint / node index `k` gives `n = k + 2`
//! - `z`-indexed breakpoints mean the redshift convention

use tracing::debug;

use crate::data::SampleTable;
use crate::domain::{Coordinate, Family};
use crate::error::AppError;
use crate::schema::{FINAL_VALUE, NODE_COUNT, ParameterSchema, build_schema};

/// Largest node count a table may describe.
pub const MAX_INFERRED_NODES: usize = 1024;

/// Family, node count and usable keys of a sample table.
#[derive(Debug, Clone, PartialEq)]
pub struct InferredSchema {
    pub family: Family,
    /// Exact node count (vanilla) or maximum node count (adaptive).
    pub n: usize,
    pub coordinate: Coordinate,
    /// Schema names present in the table, in schema order.
    pub keys: ParameterSchema,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    NodeCount,
    Final,
    Indexed(char, usize),
}

fn classify(name: &str) -> Option<ColumnKind> {
    match name {
        NODE_COUNT => return Some(ColumnKind::NodeCount),
        FINAL_VALUE => return Some(ColumnKind::Final),
        _ => {}
    }
    let mut chars = name.chars();
    let letter = chars.next().filter(|c| matches!(c, 'w' | 'a' | 'z'))?;
    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(ColumnKind::Indexed(letter, digits.parse().ok()?))
}

pub fn infer_schema(table: &SampleTable) -> Result<InferredSchema, AppError> {
    infer_from_columns(table.columns().iter().map(String::as_str))
}

/// Infer the schema from a set of column names.
pub fn infer_from_columns<'a, I>(columns: I) -> Result<InferredSchema, AppError>
where
    I: IntoIterator<Item = &'a str>,
{
    let columns: Vec<&str> = columns.into_iter().collect();
    let kinds: Vec<ColumnKind> = columns.iter().filter_map(|c| classify(c)).collect();
    if kinds.is_empty() {
        return Err(AppError::ambiguous("no flexknot parameter columns (w<k>, a<k>, z<k>, wn, Nw) found"));
    }

    let has_breakpoint = |letter: char| kinds.iter().any(|k| matches!(k, ColumnKind::Indexed(l, _) if *l == letter));
    let coordinate = match (has_breakpoint('a'), has_breakpoint('z')) {
        (true, true) => {
            return Err(AppError::ambiguous(
                "table mixes scale-factor (a<k>) and redshift (z<k>) breakpoints",
            ));
        }
        (false, true) => Coordinate::Redshift,
        _ => Coordinate::ScaleFactor,
    };

    let max_index = kinds
        .iter()
        .filter_map(|k| match k {
            ColumnKind::Indexed(_, i) => Some(*i),
            _ => None,
        })
        .max();
    let has_final = kinds.contains(&ColumnKind::Final);
    let n = match max_index {
        Some(k) if k <= MAX_INFERRED_NODES - 2 => k + 2,
        Some(k) => {
            return Err(AppError::ambiguous(format!(
                "column index {k} implies more than {MAX_INFERRED_NODES} nodes"
            )));
        }
        None if has_final => 1,
        None => 0,
    };

    let family = if kinds.contains(&ColumnKind::NodeCount) {
        Family::Adaptive
    } else {
        Family::Vanilla
    };

    // A vanilla table must carry every one of its 2n - 2 parameters.
    let matched = columns.iter().filter(|c| classify(c).is_some_and(|k| k != ColumnKind::NodeCount)).count();
    let required = if n >= 2 { 2 * n - 2 } else { n };
    if family == Family::Vanilla && matched < required {
        return Err(AppError::ambiguous(format!(
            "columns look like a {n}-node vanilla flexknot but only {matched} of {required} parameters are present"
        )));
    }

    let schema = build_schema(family, n as i64, coordinate)?;
    let present = |name: &str| columns.iter().any(|c| *c == name);
    match family {
        Family::Vanilla => {
            let missing: Vec<&str> = schema.names().filter(|name| !present(*name)).collect();
            if !missing.is_empty() {
                return Err(AppError::ambiguous(format!(
                    "columns look like a {n}-node vanilla flexknot but {} missing",
                    missing.join(", ")
                )));
            }
        }
        Family::Adaptive => {
            if n >= 1 && !present(FINAL_VALUE) {
                return Err(AppError::ambiguous(format!(
                    "adaptive table with up to {n} nodes has no '{FINAL_VALUE}' column"
                )));
            }
        }
    }

    let keys = schema.restrict_to(present);
    debug!(%family, n, ?coordinate, keys = keys.len(), "inferred schema from columns");
    Ok(InferredSchema {
        family,
        n,
        coordinate,
        keys,
    })
}

/// Stack vanilla sample tables of different node counts into one adaptive table.
///
/// Each table gets an `Nw` column holding its own node count, so each row
/// evaluates exactly as it did in its original vanilla model.
pub fn concat_as_adaptive(tables: &[SampleTable]) -> Result<SampleTable, AppError> {
    let mut tagged = Vec::with_capacity(tables.len());
    for table in tables {
        let inferred = infer_schema(table)?;
        if inferred.family != Family::Vanilla {
            return Err(AppError::invalid("only vanilla tables can be stacked into an adaptive table"));
        }
        tagged.push(table.with_constant_column(NODE_COUNT, inferred.n as f64)?);
    }
    SampleTable::concat(&tagged)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn infer(columns: &[&str]) -> Result<InferredSchema, AppError> {
        infer_from_columns(columns.iter().copied())
    }

    #[test]
    fn three_node_vanilla_columns() {
        let got = infer(&["w0", "a1", "w1", "wn"]).unwrap();
        assert_eq!(got.family, Family::Vanilla);
        assert_eq!(got.n, 3);
        assert_eq!(got.coordinate, Coordinate::ScaleFactor);
        assert_eq!(got.keys.to_names(), ["w0", "a1", "w1", "wn"]);
    }

    #[test]
    fn vanilla_round_trip_for_all_node_counts() {
        for n in 1..12i64 {
            for coordinate in [Coordinate::ScaleFactor, Coordinate::Redshift] {
                let schema = build_schema(Family::Vanilla, n, coordinate).unwrap();
                let got = infer_from_columns(schema.names()).unwrap();
                assert_eq!((got.family, got.n as i64), (Family::Vanilla, n));
                assert_eq!(got.keys, schema);
                if n >= 3 {
                    assert_eq!(got.coordinate, coordinate);
                }
            }
        }
    }

    #[test]
    fn adaptive_round_trip() {
        let schema = build_schema(Family::Adaptive, 9, Coordinate::ScaleFactor).unwrap();
        let got = infer_from_columns(schema.names()).unwrap();
        assert_eq!(got.family, Family::Adaptive);
        assert_eq!(got.n, 9);
        assert_eq!(got.keys, schema);
    }

    #[test]
    fn extra_columns_are_ignored() {
        let got = infer(&["logL", "H0", "w0", "a1", "w1", "wn", "omegam", "wa"]).unwrap();
        assert_eq!((got.family, got.n), (Family::Vanilla, 3));
    }

    #[test]
    fn adaptive_tolerates_column_subsets() {
        // Vanilla 2- and 4-node runs stacked with an Nw column: no a3/w3 etc.
        let got = infer(&["Nw", "w0", "wn", "a1", "w1", "a2", "w2"]).unwrap();
        assert_eq!(got.family, Family::Adaptive);
        assert_eq!(got.n, 4);
        assert_eq!(got.keys.to_names(), ["Nw", "w0", "a1", "w1", "a2", "w2", "wn"]);

        let sparse = infer(&["Nw", "w0", "w3", "wn"]).unwrap();
        assert_eq!(sparse.n, 5);
        assert_eq!(sparse.keys.to_names(), ["Nw", "w0", "w3", "wn"]);
    }

    #[test]
    fn single_node_and_empty_schemas() {
        assert_eq!(infer(&["wn"]).unwrap().n, 1);
        let nw_only = infer(&["Nw"]).unwrap();
        assert_eq!((nw_only.family, nw_only.n), (Family::Adaptive, 0));
    }

    #[test]
    fn redshift_breakpoints_select_redshift() {
        let got = infer(&["w0", "z1", "w1", "wn"]).unwrap();
        assert_eq!(got.coordinate, Coordinate::Redshift);
        assert_eq!(got.keys.to_names(), ["w0", "z1", "w1", "wn"]);
    }

    #[test]
    fn ambiguous_tables() {
        for columns in [
            &["H0", "omegam"][..],
            &[][..],
            &["w0", "a1", "z1", "w1", "wn"][..],
            &["w0", "a1", "w1"][..],
            &["w0", "w1", "wn"][..],
            &["Nw", "w0", "a1", "w1"][..],
        ] {
            let err = infer(columns).unwrap_err();
            assert!(matches!(err, AppError::AmbiguousSchema(_)), "{columns:?}: {err:?}");
        }
    }

    #[test]
    fn oversized_indices_are_ambiguous() {
        for columns in [
            &["w18446744073709551615", "wn"][..],
            &["w0", "a1000000000", "wn"][..],
            &["Nw", "w0", "a1000000000", "wn"][..],
            &["w0", "a40", "w40", "wn"][..],
        ] {
            let err = infer(columns).unwrap_err();
            assert!(matches!(err, AppError::AmbiguousSchema(_)), "{columns:?}: {err:?}");
        }
        let widest = format!("w{}", MAX_INFERRED_NODES - 2);
        let got = infer(&["Nw", "w0", &widest, "wn"]).unwrap();
        assert_eq!(got.n, MAX_INFERRED_NODES);
    }

    #[test]
    fn pattern_rejects_lookalikes() {
        assert_eq!(classify("w"), None);
        assert_eq!(classify("wa"), None);
        assert_eq!(classify("a1b"), None);
        assert_eq!(classify("b1"), None);
        assert_eq!(classify("a+1"), None);
        assert_eq!(classify("z12"), Some(ColumnKind::Indexed('z', 12)));
    }

    #[test]
    fn stacking_vanilla_tables() {
        let two = SampleTable::uniform(vec!["w0".into(), "wn".into()], vec![vec![-1.0, -0.5]]).unwrap();
        let three = SampleTable::uniform(
            vec!["w0".into(), "a1".into(), "w1".into(), "wn".into()],
            vec![vec![-1.0, 0.5, 0.0, -0.7]],
        )
        .unwrap();
        let stacked = concat_as_adaptive(&[two, three]).unwrap();
        assert_eq!(stacked.value(0, "Nw"), Some(2.0));
        assert_eq!(stacked.value(1, "Nw"), Some(3.0));

        let got = infer_schema(&stacked).unwrap();
        assert_eq!((got.family, got.n), (Family::Adaptive, 3));
    }
}
