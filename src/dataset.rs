//! Tagged cell values, records, and CSV ingestion.
//!
//! Cells are typed exactly once, at parse time; everything downstream pattern
//! matches on [`Value`] instead of re-inspecting strings.

use csv::{ReaderBuilder, Trim};

use crate::error::Error;

/// A single parsed cell.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Null,
}

impl Value {
    /// Numeric form: `Number` as-is, `Text` that parses to a finite float.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            Value::Null => None,
        }
    }

    /// Numeric form with non-coercible values flattened to zero (pie/radar
    /// aggregation rule).
    pub fn as_number_or_zero(&self) -> f64 {
        self.as_number().unwrap_or(0.0)
    }

    /// String form used for group keys and category labels.
    pub fn display(&self) -> String {
        match self {
            Value::Number(n) => n.to_string(),
            Value::Text(s) => s.clone(),
            Value::Null => String::new(),
        }
    }
}

/// An ordered table of parsed records sharing one column set.
///
/// Rows are aligned with `columns`; row order is preserved except where the
/// sampler explicitly thins it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Dataset {
    pub fn from_parts(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));
        Self { columns, rows }
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<Value>>) {
        (self.columns, self.rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at `(row, column name)`; `None` when either does not exist.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }

    /// The record that drives column classification.
    pub fn first_row(&self) -> Option<&[Value]> {
        self.rows.first().map(Vec::as_slice)
    }
}

/// Parses raw CSV text into a dataset.
///
/// The header row defines the column names (surrounding whitespace trimmed);
/// blank lines are skipped; each cell is coerced once: empty to `Null`, a
/// finite numeric literal to `Number`, anything else to `Text`. A record with
/// a field count different from the header is a structural error. Pure and
/// deterministic: identical input yields an identical dataset.
pub fn parse_csv(text: &str) -> Result<Dataset, Error> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::Headers)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| Error::Parse(format!("reading CSV header: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| Error::Parse(format!("record {}: {e}", i + 1)))?;
        let row = (0..columns.len())
            .map(|idx| parse_cell(record.get(idx).unwrap_or("")))
            .collect();
        rows.push(row);
    }

    Ok(Dataset::from_parts(columns, rows))
}

fn parse_cell(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Value::Number(n),
        _ => Value::Text(raw.to_string()),
    }
}
