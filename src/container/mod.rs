//! XLSX package serialization
//!
//! Turns an assembled [`Workbook`] into the bytes of an Office Open XML
//! spreadsheet package:
//! - one worksheet part per sheet, with dimension, column widths and cells
//! - a styles part carrying the workbook's number-format table
//! - inline strings by default, or a shared string table on request

pub mod parts;
pub mod shared_strings;
pub mod worksheet;
pub mod xml_writer;

use chrono::{DateTime, Utc};
use std::io::Cursor;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

use crate::error::{Result, SheetError};
use crate::workbook::Workbook;

use parts::StyleMap;
use shared_strings::SharedStrings;
use worksheet::CellWriter;
use xml_writer::XmlWriter;

/// Most rows a worksheet can hold
pub const MAX_ROWS: u32 = 1_048_576;

/// Most columns a worksheet can hold
pub const MAX_COLUMNS: u32 = 16_384;

/// Target container format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContainerKind {
    /// Office Open XML workbook
    #[default]
    Xlsx,
}

impl ContainerKind {
    /// File extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ContainerKind::Xlsx => "xlsx",
        }
    }
}

/// Options controlling how a workbook is serialized
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SerializeOptions {
    pub container_kind: ContainerKind,
    /// Write strings inline in each cell instead of through a shared table
    pub inline_strings: bool,
    /// Store dates as date-typed cells instead of serial numbers
    pub native_dates: bool,
    /// Deflate level (0-9); `None` uses the zip default
    pub compression_level: Option<i64>,
    /// Timestamp for the document properties; `None` means now
    pub created: Option<DateTime<Utc>>,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        SerializeOptions {
            container_kind: ContainerKind::Xlsx,
            inline_strings: true,
            native_dates: true,
            compression_level: Some(6),
            created: None,
        }
    }
}

impl SerializeOptions {
    pub fn builder() -> SerializeOptionsBuilder {
        SerializeOptionsBuilder::default()
    }
}

/// Builder for [`SerializeOptions`]
#[derive(Debug, Clone, Default)]
pub struct SerializeOptionsBuilder {
    options: SerializeOptions,
}

impl SerializeOptionsBuilder {
    pub fn inline_strings(mut self, inline: bool) -> Self {
        self.options.inline_strings = inline;
        self
    }

    pub fn native_dates(mut self, native: bool) -> Self {
        self.options.native_dates = native;
        self
    }

    /// Set deflate level; values above 9 are clamped
    pub fn compression_level(mut self, level: i64) -> Self {
        self.options.compression_level = Some(level.clamp(0, 9));
        self
    }

    /// Fix the document timestamp, for reproducible output
    pub fn created(mut self, created: DateTime<Utc>) -> Self {
        self.options.created = Some(created);
        self
    }

    pub fn build(self) -> SerializeOptions {
        self.options
    }
}

/// Serialize a workbook into container bytes
pub fn serialize(workbook: &Workbook, options: &SerializeOptions) -> Result<Vec<u8>> {
    validate(workbook)?;

    let file_options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(options.compression_level);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    let names: Vec<&str> = workbook.sheet_names().collect();
    let shared = !options.inline_strings;
    let created = options.created.unwrap_or_else(Utc::now);

    zip.start_file("[Content_Types].xml", file_options)?;
    parts::write_content_types(&mut XmlWriter::new(&mut zip), names.len(), shared)?;

    zip.start_file("_rels/.rels", file_options)?;
    parts::write_root_rels(&mut XmlWriter::new(&mut zip))?;

    zip.start_file("docProps/core.xml", file_options)?;
    parts::write_core_props(&mut XmlWriter::new(&mut zip), created)?;

    zip.start_file("docProps/app.xml", file_options)?;
    parts::write_app_props(&mut XmlWriter::new(&mut zip), &names)?;

    zip.start_file("xl/workbook.xml", file_options)?;
    parts::write_workbook(&mut XmlWriter::new(&mut zip), &names)?;

    zip.start_file("xl/_rels/workbook.xml.rels", file_options)?;
    parts::write_workbook_rels(&mut XmlWriter::new(&mut zip), names.len(), shared)?;

    zip.start_file("xl/styles.xml", file_options)?;
    parts::write_styles(&mut XmlWriter::new(&mut zip), workbook.number_formats())?;

    let styles = StyleMap::new(workbook.number_formats());
    let mut shared_strings = SharedStrings::new();
    {
        let mut cells = CellWriter {
            styles: &styles,
            shared_strings: shared.then_some(&mut shared_strings),
            native_dates: options.native_dates,
        };

        for (i, layout) in workbook.sheets().enumerate() {
            zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), file_options)?;
            cells.write_worksheet(&mut XmlWriter::new(&mut zip), layout)?;
        }
    }

    if shared {
        zip.start_file("xl/sharedStrings.xml", file_options)?;
        shared_strings.write_xml(&mut XmlWriter::new(&mut zip))?;
    }

    let bytes = zip.finish()?.into_inner();

    tracing::debug!(
        sheets = names.len(),
        bytes = bytes.len(),
        container = options.container_kind.extension(),
        "serialized workbook"
    );
    Ok(bytes)
}

/// Reject workbooks the container cannot represent
fn validate(workbook: &Workbook) -> Result<()> {
    if workbook.is_empty() {
        return Err(SheetError::Serialization(
            "workbook has no sheets".to_string(),
        ));
    }

    for layout in workbook.sheets() {
        if layout.row_count() > MAX_ROWS {
            return Err(SheetError::Serialization(format!(
                "sheet '{}' has {} rows, the limit is {}",
                layout.name(),
                layout.row_count(),
                MAX_ROWS
            )));
        }
        if layout.column_count() > MAX_COLUMNS {
            return Err(SheetError::Serialization(format!(
                "sheet '{}' has {} columns, the limit is {}",
                layout.name(),
                layout.column_count(),
                MAX_COLUMNS
            )));
        }
    }
    Ok(())
}
