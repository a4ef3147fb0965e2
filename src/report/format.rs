//! Formatted terminal output.
//!
//! All user-facing text lives here so output changes stay local and the
//! model / plotting code stays free of formatting.

use crate::data::SampleTable;
use crate::domain::{Coordinate, DarkEnergy, Family};
use crate::plot::{FunctionalPosterior, InferredSchema, PosteriorCurves};
use crate::report::summarize_curve;
use crate::schema::ParameterSchema;

fn coordinate_label(coordinate: Coordinate) -> &'static str {
    match coordinate {
        Coordinate::ScaleFactor => "scale factor (a)",
        Coordinate::Redshift => "redshift (z)",
    }
}

/// Ordered parameter names, one per line with their theta index.
pub fn format_schema(schema: &ParameterSchema, family: Family, n: usize, coordinate: Coordinate) -> String {
    let mut out = format!(
        "Schema: {family}, n={n}, breakpoints in {}\n",
        coordinate_label(coordinate)
    );
    if schema.is_empty() {
        out.push_str("  (no parameters: w = -1)\n");
    }
    for (i, name) in schema.names().enumerate() {
        out.push_str(&format!("{i:>3}  {name}\n"));
    }
    out
}

/// Evaluated curve summary: parametrization, inputs, resulting ranges.
pub fn format_curve_summary(
    family: Family,
    n: usize,
    coordinate: Coordinate,
    params: &[(String, f64)],
    curve: &DarkEnergy,
) -> String {
    let mut out = String::new();
    out.push_str("=== darkknot - flexknot w(a) ===\n");
    out.push_str(&format!("Family: {family}\n"));
    out.push_str(&format!("Nodes: n={n}\n"));
    out.push_str(&format!("Breakpoints: {}\n", coordinate_label(coordinate)));

    out.push_str("\nParameters:\n");
    if params.is_empty() {
        out.push_str("- (none)\n");
    }
    for (name, value) in params {
        out.push_str(&format!("- {name:<4} = {value:.6}\n"));
    }

    out.push_str("\nCurve:\n");
    match summarize_curve(curve) {
        Some(s) => {
            out.push_str(&format!("- points: {}\n", s.points));
            out.push_str(&format!("- a=[{:.3e}, {:.3e}]\n", s.a_min, s.a_max));
            out.push_str(&format!("- w=[{:.4}, {:.4}]\n", s.w_min, s.w_max));
            out.push_str(&format!("- w(a={:.3}) = {:.4}\n", s.a_max, s.w_today));
        }
        None => out.push_str("- (no finite points)\n"),
    }
    out
}

/// Inferred parametrization of a sample table.
pub fn format_inferred(inferred: &InferredSchema, table: &SampleTable) -> String {
    let qualifier = match inferred.family {
        Family::Adaptive => " (maximum)",
        Family::Vanilla => "",
    };
    let keys: Vec<&str> = inferred.keys.names().collect();

    let mut out = String::new();
    out.push_str(&format!("Family: {}\n", inferred.family));
    out.push_str(&format!("Nodes: n={}{qualifier}\n", inferred.n));
    out.push_str(&format!("Breakpoints: {}\n", coordinate_label(inferred.coordinate)));
    out.push_str(&format!("Samples: {} rows | weight sum={:.4}\n", table.len(), table.weights().iter().sum::<f64>()));
    out.push_str(&format!("Keys: [{}]\n", keys.join(", ")));
    out
}

/// One-paragraph description of a computed posterior.
pub fn format_posterior_summary(posterior: &FunctionalPosterior) -> String {
    let mode = match &posterior.curves {
        PosteriorCurves::Bands(_) => "contour".to_string(),
        PosteriorCurves::Lines(lines) => format!("{} lines", lines.len()),
    };
    let first = posterior.x.first().copied().unwrap_or(f64::NAN);
    let last = posterior.x.last().copied().unwrap_or(f64::NAN);

    let mut out = format!(
        "Posterior: {} n={} | {mode} | {} points, {}=[{first:.4}, {last:.4}]\n",
        posterior.schema.family,
        posterior.schema.n,
        posterior.x.len(),
        posterior.x_axis.label(),
    );
    if let Some((lo, hi)) = posterior.w_range() {
        out.push_str(&format!("w range: [{lo:.4}, {hi:.4}]\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::infer_schema;
    use crate::schema::build_schema;

    #[test]
    fn schema_listing() {
        let schema = build_schema(Family::Vanilla, 3, Coordinate::ScaleFactor).unwrap();
        let txt = format_schema(&schema, Family::Vanilla, 3, Coordinate::ScaleFactor);
        let expected = concat!(
            "Schema: Vanilla, n=3, breakpoints in scale factor (a)\n",
            "  0  w0\n",
            "  1  a1\n",
            "  2  w1\n",
            "  3  wn\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn empty_schema_mentions_lambda() {
        let schema = build_schema(Family::Vanilla, 0, Coordinate::ScaleFactor).unwrap();
        let txt = format_schema(&schema, Family::Vanilla, 0, Coordinate::ScaleFactor);
        assert!(txt.contains("w = -1"));
    }

    #[test]
    fn curve_summary_lists_params_and_today() {
        let curve = DarkEnergy {
            a: vec![0.5, 1.0],
            w: vec![-1.0, -0.9],
        };
        let params = vec![("w0".to_string(), -1.0), ("wn".to_string(), -0.9)];
        let txt = format_curve_summary(Family::Vanilla, 2, Coordinate::ScaleFactor, &params, &curve);
        assert!(txt.contains("- w0   = -1.000000\n"), "{txt}");
        assert!(txt.contains("- w(a=1.000) = -0.9000\n"), "{txt}");
    }

    #[test]
    fn inferred_adaptive_says_maximum() {
        let table = SampleTable::uniform(
            vec!["Nw".into(), "w0".into(), "wn".into()],
            vec![vec![2.0, -1.0, -1.0]],
        )
        .unwrap();
        let inferred = infer_schema(&table).unwrap();
        let txt = format_inferred(&inferred, &table);
        assert!(txt.contains("Nodes: n=2 (maximum)\n"), "{txt}");
        assert!(txt.contains("Keys: [Nw, w0, wn]\n"), "{txt}");
    }
}
