//! Read/write curve JSON files.
//!
//! Curve JSON is the portable record of one evaluated curve: the
//! parametrization, the parameter values in schema order and the
//! resulting `w(a)` grid. The schema is defined by `domain::CurveFile`.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use chrono::Utc;
use tracing::info;

use crate::domain::CurveFile;
use crate::error::AppError;
use crate::models::CurveModel;

/// Evaluate `values` with `model` and wrap the result for saving.
pub fn curve_file(model: &CurveModel, values: &HashMap<String, f64>) -> Result<CurveFile, AppError> {
    let dark_energy = model.evaluate(values)?;
    let params = model
        .schema()
        .names()
        .filter_map(|name| values.get(name).map(|&v| (name.to_string(), v)))
        .collect();

    Ok(CurveFile {
        tool: env!("CARGO_PKG_NAME").to_string(),
        generated: Utc::now(),
        family: model.family(),
        n: model.n(),
        coordinate: model.coordinate(),
        params,
        dark_energy,
    })
}

/// Write a curve JSON file.
pub fn write_curve_json(path: &Path, curve: &CurveFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::invalid(format!("failed to create curve JSON '{}': {e}", path.display())))?;
    write_curve(file, curve)?;
    info!(path = %path.display(), points = curve.dark_energy.len(), "wrote curve JSON");
    Ok(())
}

pub fn write_curve<W: Write>(sink: W, curve: &CurveFile) -> Result<(), AppError> {
    serde_json::to_writer_pretty(sink, curve)?;
    Ok(())
}

/// Read a curve JSON document, checking the grid is consistent.
pub fn read_curve<R: Read>(source: R) -> Result<CurveFile, AppError> {
    let curve: CurveFile = serde_json::from_reader(source)?;
    if curve.dark_energy.a.len() != curve.dark_energy.w.len() {
        return Err(AppError::invalid(format!(
            "curve JSON has {} scale factors but {} w values",
            curve.dark_energy.a.len(),
            curve.dark_energy.w.len()
        )));
    }
    Ok(curve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use crate::domain::{Coordinate, DarkKnotConfig, Family};

    fn model() -> CurveModel {
        let config = DarkKnotConfig {
            num_points: 16,
            ..DarkKnotConfig::default()
        };
        CurveModel::new(Family::Vanilla, 3, Coordinate::ScaleFactor, config).unwrap()
    }

    fn values() -> HashMap<String, f64> {
        [("wn", -1.0), ("w1", -0.5), ("a1", 0.3), ("w0", -0.9), ("H0", 70.0)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn curve_file_records_params_in_schema_order() {
        let curve = curve_file(&model(), &values()).unwrap();
        let names: Vec<&str> = curve.params.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["w0", "a1", "w1", "wn"]);
        assert_eq!(curve.tool, "darkknot");
        assert_eq!(curve.dark_energy.len(), 16);
    }

    #[test]
    fn json_round_trip() {
        let curve = curve_file(&model(), &values()).unwrap();
        let mut buf = Vec::new();
        write_curve(&mut buf, &curve).unwrap();
        let back = read_curve(buf.as_slice()).unwrap();
        assert_eq!(back.family, Family::Vanilla);
        assert_eq!(back.n, 3);
        assert_eq!(back.params, curve.params);
        assert_eq!(back.dark_energy.len(), curve.dark_energy.len());
        for ((a0, w0), (a1, w1)) in back.dark_energy.points().zip(curve.dark_energy.points()) {
            assert_relative_eq!(a0, a1, max_relative = 1e-12);
            assert_abs_diff_eq!(w0, w1, epsilon = 1e-12);
        }
        assert_eq!(back.generated, curve.generated);
    }

    #[test]
    fn mismatched_grid_is_rejected() {
        let json = r#"{"tool":"darkknot","generated":"2024-01-01T00:00:00Z","family":"vanilla","n":1,
            "coordinate":"scalefactor","params":[["wn",-1.0]],"dark_energy":{"a":[0.5,1.0],"w":[-1.0]}}"#;
        assert!(read_curve(json.as_bytes()).is_err());
    }
}
