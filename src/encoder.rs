//! Conversion of typed values into low-level cell records

use chrono::NaiveDateTime;
use std::borrow::Cow;
use thiserror::Error;

use crate::types::CellValue;

/// Format slot under which the date display pattern is registered
pub const DATE_FORMAT_ID: u32 = 165;

/// Display pattern for date cells, in spreadsheet notation
pub const DATE_PATTERN: &str = "yyyy-MM-dd";

/// The same pattern in chrono notation, used to pre-render display text
const DATE_DISPLAY_FORMAT: &str = "%Y-%m-%d";

/// Longest text a single cell may hold
pub const MAX_TEXT_CHARS: usize = 32_767;

/// Storage kind written for a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    String,
    Numeric,
    Date,
}

/// Raw value carried by an encoded cell
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Number(f64),
    Date(NaiveDateTime),
    /// Formula text without the leading '='
    Formula(String),
}

/// Why a value could not be encoded
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefectReason {
    #[error("number is NaN or infinite")]
    NonFiniteNumber,
    #[error("formula is empty")]
    EmptyFormula,
    #[error("text has {0} characters, more than the 32767 a cell can hold")]
    TextTooLong(usize),
}

/// A value ready to be placed in a worksheet
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedCell {
    pub kind: CellKind,
    pub raw: RawValue,
    /// Pre-rendered display text; doubles as the column width hint
    pub display: Option<String>,
    /// Format slot in the workbook's number-format table
    pub format: Option<u32>,
}

impl EncodedCell {
    /// Header and text cells
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        EncodedCell {
            kind: CellKind::String,
            display: Some(s.clone()),
            raw: RawValue::Text(s),
            format: None,
        }
    }

    /// Text used for column width: display text if any, otherwise the raw
    /// value in its canonical string form
    pub fn width_text(&self) -> Cow<'_, str> {
        if let Some(display) = &self.display {
            return Cow::Borrowed(display);
        }
        match &self.raw {
            RawValue::Text(s) | RawValue::Formula(s) => Cow::Borrowed(s),
            RawValue::Number(n) => Cow::Owned(n.to_string()),
            RawValue::Date(d) => Cow::Owned(d.format(DATE_DISPLAY_FORMAT).to_string()),
        }
    }

    /// Width contribution in characters
    pub fn width(&self) -> usize {
        self.width_text().chars().count()
    }
}

/// Encode one value
pub fn encode(value: &CellValue) -> Result<EncodedCell, DefectReason> {
    match value {
        CellValue::Text(s) => {
            let len = s.chars().count();
            if len > MAX_TEXT_CHARS {
                return Err(DefectReason::TextTooLong(len));
            }
            Ok(EncodedCell::text(s.as_str()))
        }
        CellValue::Number(n) => {
            if !n.is_finite() {
                return Err(DefectReason::NonFiniteNumber);
            }
            Ok(EncodedCell {
                kind: CellKind::Numeric,
                raw: RawValue::Number(*n),
                display: None,
                format: None,
            })
        }
        CellValue::Date(d) => Ok(EncodedCell {
            kind: CellKind::Date,
            raw: RawValue::Date(*d),
            display: Some(d.format(DATE_DISPLAY_FORMAT).to_string()),
            format: Some(DATE_FORMAT_ID),
        }),
        CellValue::Formula(expr) => {
            let expr = expr.trim().trim_start_matches('=').trim_start();
            if expr.is_empty() {
                return Err(DefectReason::EmptyFormula);
            }
            Ok(EncodedCell {
                kind: CellKind::Numeric,
                raw: RawValue::Formula(expr.to_string()),
                display: None,
                format: None,
            })
        }
    }
}
