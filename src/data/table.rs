//! Posterior sample tables.
//!
//! A table is a set of weighted samples with named columns. Only the column
//! names (to recognise the parametrization) and the values (to rebuild each
//! sample's curve) are used; tables are never mutated in place.
//!
//! Missing values are stored as `NaN`; in adaptive tables that marks an
//! inactive node slot.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use tracing::info;

use crate::error::AppError;

/// Default name of the per-row weight column in CSV files.
pub const WEIGHT_COLUMN: &str = "weight";

#[derive(Debug, Clone, PartialEq)]
pub struct SampleTable {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<f64>>,
    weights: Vec<f64>,
}

/// CSV layout options.
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Column holding the sample weights; uniform weights when absent.
    pub weight_column: String,
    /// Skip a second header row of display labels.
    pub label_row: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            weight_column: WEIGHT_COLUMN.to_string(),
            label_row: false,
        }
    }
}

impl SampleTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<f64>>, weights: Vec<f64>) -> Result<Self, AppError> {
        let mut index = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(AppError::invalid(format!("duplicate column '{name}'")));
            }
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != columns.len()) {
            return Err(AppError::invalid(format!(
                "row {i} has {} values for {} columns",
                row.len(),
                columns.len()
            )));
        }
        if weights.len() != rows.len() {
            return Err(AppError::invalid(format!(
                "{} weights for {} rows",
                weights.len(),
                rows.len()
            )));
        }
        if let Some(w) = weights.iter().find(|w| !(w.is_finite() && **w >= 0.0)) {
            return Err(AppError::invalid(format!("sample weights must be finite and >= 0, got {w}")));
        }

        Ok(Self {
            columns,
            index,
            rows,
            weights,
        })
    }

    /// A table with unit weights.
    pub fn uniform(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self, AppError> {
        let weights = vec![1.0; rows.len()];
        Self::new(columns, rows, weights)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.rows[i]
    }

    /// Value of column `name` in row `i`.
    pub fn value(&self, i: usize, name: &str) -> Option<f64> {
        self.index.get(name).map(|&c| self.rows[i][c])
    }

    /// A copy of this table with an extra constant column.
    pub fn with_constant_column(&self, name: &str, value: f64) -> Result<SampleTable, AppError> {
        let mut columns = self.columns.clone();
        columns.push(name.to_string());
        let rows = self
            .rows
            .iter()
            .map(|r| {
                let mut r = r.clone();
                r.push(value);
                r
            })
            .collect();
        SampleTable::new(columns, rows, self.weights.clone())
    }

    /// Stack tables row-wise over the union of their columns.
    ///
    /// Column order follows first appearance; cells a table lacks are `NaN`.
    pub fn concat(tables: &[SampleTable]) -> Result<SampleTable, AppError> {
        let mut columns: Vec<String> = Vec::new();
        for t in tables {
            for c in &t.columns {
                if !columns.contains(c) {
                    columns.push(c.clone());
                }
            }
        }

        let mut rows = Vec::new();
        let mut weights = Vec::new();
        for t in tables {
            for (i, w) in t.weights.iter().enumerate() {
                rows.push(columns.iter().map(|c| t.value(i, c).unwrap_or(f64::NAN)).collect());
                weights.push(*w);
            }
        }
        SampleTable::new(columns, rows, weights)
    }
}

/// Read a sample table from a CSV file.
pub fn read_samples_csv(path: &Path, options: &ReadOptions) -> Result<SampleTable, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::invalid(format!("failed to open samples CSV '{}': {e}", path.display())))?;
    let table = read_samples(file, options)?;
    info!(path = %path.display(), rows = table.len(), columns = table.columns().len(), "loaded sample table");
    Ok(table)
}

/// Read a sample table from any CSV source.
pub fn read_samples<R: Read>(source: R, options: &ReadOptions) -> Result<SampleTable, AppError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(source);

    let headers = reader.headers()?.clone();
    let weight_idx = headers.iter().position(|h| h == options.weight_column);
    let columns: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != weight_idx)
        .map(|(_, h)| h.to_string())
        .collect();

    let mut rows = Vec::new();
    let mut weights = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // header is line 1
        let line = idx + 2;
        let record = result?;
        if idx == 0 && options.label_row {
            continue;
        }

        let mut row = Vec::with_capacity(columns.len());
        let mut weight = 1.0;
        for (i, cell) in record.iter().enumerate() {
            let value = parse_cell(cell).ok_or_else(|| {
                AppError::invalid(format!(
                    "line {line}: column '{}' has non-numeric value '{cell}'",
                    headers.get(i).unwrap_or("?")
                ))
            })?;
            if Some(i) == weight_idx {
                weight = value;
            } else {
                row.push(value);
            }
        }
        rows.push(row);
        weights.push(weight);
    }

    SampleTable::new(columns, rows, weights)
}

fn parse_cell(cell: &str) -> Option<f64> {
    if cell.is_empty() {
        return Some(f64::NAN);
    }
    cell.parse::<f64>().ok()
}

/// Write a sample table as CSV, weights in the last column.
pub fn write_samples_csv(path: &Path, table: &SampleTable) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::invalid(format!("failed to create samples CSV '{}': {e}", path.display())))?;
    write_samples(file, table)
}

pub fn write_samples<W: Write>(sink: W, table: &SampleTable) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(sink);

    let mut header: Vec<&str> = table.columns.iter().map(String::as_str).collect();
    header.push(WEIGHT_COLUMN);
    writer.write_record(&header)?;

    for (row, w) in table.rows.iter().zip(&table.weights) {
        let mut record: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        record.push(w.to_string());
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}
