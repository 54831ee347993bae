//! Worksheet part generation

use chrono::NaiveDateTime;
use std::io::Write;

use super::parts::StyleMap;
use super::shared_strings::SharedStrings;
use super::xml_writer::XmlWriter;
use crate::address::encode_column;
use crate::encoder::{EncodedCell, RawValue};
use crate::error::{Result, SheetError};
use crate::layout::SheetLayout;

/// ISO timestamp written into `t="d"` cells, milliseconds included
const NATIVE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Per-workbook state shared by all worksheet parts
pub struct CellWriter<'a> {
    pub styles: &'a StyleMap,
    /// `Some` when strings go through the shared table instead of inline
    pub shared_strings: Option<&'a mut SharedStrings>,
    pub native_dates: bool,
}

impl CellWriter<'_> {
    pub fn write_worksheet<W: Write>(
        &mut self,
        w: &mut XmlWriter<W>,
        layout: &SheetLayout,
    ) -> Result<()> {
        let range = layout.range();

        w.declaration()?;
        w.write_str(
            r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        )?;

        w.start_element("dimension")?;
        w.attribute("ref", &range.to_string())?;
        w.close_empty()?;

        if !layout.widths().is_empty() {
            w.start_element("cols")?;
            w.close_start_tag()?;
            for (i, width) in layout.widths().iter().enumerate() {
                w.start_element("col")?;
                w.attribute_int("min", i as u64 + 1)?;
                w.attribute_int("max", i as u64 + 1)?;
                w.attribute("width", &width.to_string())?;
                w.attribute("customWidth", "1")?;
                w.close_empty()?;
            }
            w.end_element("cols")?;
        }

        w.start_element("sheetData")?;
        w.close_start_tag()?;

        let mut open_row = None;
        for (cell, encoded) in layout.cells() {
            if !range.contains(cell) {
                return Err(SheetError::Serialization(format!(
                    "cell {} lies outside the declared range {} of sheet '{}'",
                    cell,
                    range,
                    layout.name()
                )));
            }

            if open_row != Some(cell.row) {
                if open_row.is_some() {
                    w.end_element("row")?;
                }
                w.start_element("row")?;
                w.attribute_int("r", cell.row as u64 + 1)?;
                w.close_start_tag()?;
                open_row = Some(cell.row);
            }

            let mut reference = encode_column(cell.col);
            reference.push_str(itoa::Buffer::new().format(cell.row as u64 + 1));
            self.write_cell(w, &reference, encoded)?;
        }
        if open_row.is_some() {
            w.end_element("row")?;
        }

        w.end_element("sheetData")?;
        w.end_element("worksheet")?;
        w.flush()
    }

    fn write_cell<W: Write>(
        &mut self,
        w: &mut XmlWriter<W>,
        reference: &str,
        cell: &EncodedCell,
    ) -> Result<()> {
        w.start_element("c")?;
        w.attribute("r", reference)?;

        if let Some(format_id) = cell.format {
            let xf = self.styles.xf_index(format_id).ok_or_else(|| {
                SheetError::Serialization(format!(
                    "cell {} references unregistered number format {}",
                    reference, format_id
                ))
            })?;
            w.attribute_int("s", xf as u64)?;
        }

        match &cell.raw {
            RawValue::Text(s) => match self.shared_strings.as_deref_mut() {
                Some(table) => {
                    let index = table.add_string(s);
                    w.attribute("t", "s")?;
                    w.close_start_tag()?;
                    w.text_element("v", itoa::Buffer::new().format(index))?;
                }
                None => {
                    w.attribute("t", "inlineStr")?;
                    w.close_start_tag()?;
                    w.start_element("is")?;
                    w.close_start_tag()?;
                    w.string_item(s)?;
                    w.end_element("is")?;
                }
            },
            RawValue::Number(n) => {
                w.close_start_tag()?;
                w.text_element("v", &n.to_string())?;
            }
            RawValue::Date(d) if self.native_dates => {
                w.attribute("t", "d")?;
                w.close_start_tag()?;
                w.text_element("v", &d.format(NATIVE_DATE_FORMAT).to_string())?;
            }
            RawValue::Date(d) => {
                w.close_start_tag()?;
                w.text_element("v", &excel_serial(d).to_string())?;
            }
            RawValue::Formula(expr) => {
                w.close_start_tag()?;
                w.text_element("f", expr)?;
            }
        }

        w.end_element("c")
    }
}

/// Days since the 1900 date system epoch, time of day as the fraction
///
/// Day 25569 is 1970-01-01, which puts the epoch at 1899-12-30 so that
/// serials from March 1900 on match what spreadsheet applications show.
pub fn excel_serial(d: &NaiveDateTime) -> f64 {
    const UNIX_EPOCH_SERIAL: f64 = 25_569.0;
    d.and_utc().timestamp_millis() as f64 / 86_400_000.0 + UNIX_EPOCH_SERIAL
}
