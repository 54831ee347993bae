//! # sheetpack
//!
//! Build spreadsheets from typed tabular data and write them as XLSX files.
//!
//! ## Features
//!
//! - **Typed cells**: text, numbers, dates (shown as `yyyy-MM-dd`) and formulas
//! - **Column widths**: computed from headers and the widest value per column
//! - **Safe sheet names**: forbidden characters stripped, length capped at 31
//! - **Multi-sheet workbooks**: with an explicit policy for name collisions
//! - **Atomic writes**: a failed write never leaves a partial file behind
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sheetpack::types::{CellValue, Sheet};
//! use sheetpack::{write_sheet, SerializeOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
//!
//! let sheet = Sheet::new("Cards", ["Name", "Estimate", "Due", "Double"]).with_rows(vec![
//!     vec![
//!         Some(CellValue::from("Write docs")),
//!         Some(CellValue::from(3.5)),
//!         Some(CellValue::from(date)),
//!         Some(CellValue::formula("B2*2")),
//!     ],
//!     // Absent slots produce no cell at all
//!     vec![Some(CellValue::from("Review")), None, None, None],
//! ]);
//!
//! let path = write_sheet(sheet, "cards.xlsx", &SerializeOptions::default())?;
//! println!("wrote {}", path.display());
//! # Ok(())
//! # }
//! ```
//!
//! The pipeline can also be driven step by step: [`SheetLayout::build`],
//! [`Workbook::assemble_multiple`], [`container::serialize`] and
//! [`write_to_path`].

pub mod address;
pub mod container;
pub mod encoder;
pub mod error;
pub mod layout;
pub mod sanitize;
pub mod types;
pub mod workbook;
pub mod writer;

pub use address::{decode_address, decode_range, encode_address, encode_range, CellRange, CellRef};
pub use container::{serialize, ContainerKind, SerializeOptions, SerializeOptionsBuilder};
pub use encoder::{encode, DefectReason, EncodedCell};
pub use error::{Result, SheetError};
pub use layout::{CellDefect, SheetLayout};
pub use sanitize::normalize_sheet_name;
pub use types::{CellValue, Row, Sheet};
pub use workbook::{CollisionPolicy, NumberFormats, Workbook};
pub use writer::{with_xlsx_extension, write_sheet, write_sheets, write_to_path, WorkbookWriter};
