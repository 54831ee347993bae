//! Type definitions for tabular input data

use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

/// Represents a single typed value destined for a worksheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Text value
    Text(String),
    /// Numeric value
    Number(f64),
    /// Calendar timestamp, displayed as `yyyy-MM-dd`
    Date(NaiveDateTime),
    /// Formula expression (e.g., "SUM(A1:A10)")
    ///
    /// Stored as text and never evaluated. A leading '=' is accepted and
    /// dropped when the cell is encoded.
    Formula(String),
}

impl CellValue {
    /// Create a formula value
    pub fn formula(expr: impl Into<String>) -> Self {
        CellValue::Formula(expr.into())
    }

    /// Name of the variant, used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            CellValue::Text(_) => "text",
            CellValue::Number(_) => "number",
            CellValue::Date(_) => "date",
            CellValue::Formula(_) => "formula",
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            CellValue::Formula(expr) => write!(f, "={}", expr.trim_start_matches('=')),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(d: NaiveDateTime) -> Self {
        CellValue::Date(d)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::Date(d.and_time(chrono::NaiveTime::MIN))
    }
}

/// One row of input: a slot per column, `None` meaning no stored cell
pub type Row = Vec<Option<CellValue>>;

/// A named table: header names plus typed rows
///
/// The name is normalized when the sheet is assembled into a workbook, so
/// any caller-supplied string is accepted here.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sheet {
    /// Sheet name as supplied by the caller
    pub name: String,
    /// Header names, one per column
    pub columns: Vec<String>,
    /// Data rows, in output order
    pub rows: Vec<Row>,
}

impl Sheet {
    /// Create a sheet with headers and no rows
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Sheet {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Replace the rows
    pub fn with_rows(mut self, rows: Vec<Row>) -> Self {
        self.rows = rows;
        self
    }

    /// Append a row
    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Number of declared columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}
