//! Error types for sheetpack

use std::path::PathBuf;
use thiserror::Error;

use crate::encoder::DefectReason;

/// Result type alias for sheetpack operations
pub type Result<T> = std::result::Result<T, SheetError>;

/// Main error type for building and writing workbooks
#[derive(Error, Debug)]
pub enum SheetError {
    /// A cell value could not be represented in the container.
    ///
    /// Layout records these as defects instead of aborting the sheet; see
    /// [`CellDefect`](crate::layout::CellDefect).
    #[error("Cell {address} could not be encoded: {reason}")]
    UnencodableCell {
        address: String,
        reason: DefectReason,
    },

    /// A row carried a value past the last declared column
    #[error("Row {row} has a value in column {col}, but the sheet only declares {columns} columns")]
    ColumnOutOfRange { row: u32, col: u32, columns: u32 },

    /// The container could not be assembled from the workbook
    #[error("Failed to serialize workbook: {0}")]
    Serialization(String),

    /// Two sheets normalized to the same name
    #[error("Sheet name '{0}' is used more than once in the workbook")]
    DuplicateSheetName(String),

    /// Invalid cell reference or range
    #[error("Invalid cell reference: {0}")]
    InvalidCell(String),

    /// The final write to storage failed
    #[error("Failed to write workbook to '{}': {source}", path.display())]
    StorageWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error wrapper
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<zip::result::ZipError> for SheetError {
    fn from(err: zip::result::ZipError) -> Self {
        SheetError::Serialization(err.to_string())
    }
}
