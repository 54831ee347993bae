//! Placement of a sheet's header and rows onto an addressed grid
//!
//! A [`SheetLayout`] is everything the serializer needs for one worksheet:
//! encoded cells keyed by address, per-column widths and the bounding range
//! declared in the worksheet's dimension.

use std::collections::BTreeMap;

use crate::address::{encode_address, CellRange, CellRef};
use crate::encoder::{encode, DefectReason, EncodedCell};
use crate::error::{Result, SheetError};
use crate::types::{CellValue, Sheet};

/// Characters added to every column's widest value
pub const WIDTH_PADDING: f64 = 4.0;

/// A cell that was dropped because its value could not be encoded
#[derive(Debug, Clone, PartialEq)]
pub struct CellDefect {
    pub cell: CellRef,
    /// Variant of the offending value ("number", "formula", ...)
    pub value_kind: &'static str,
    pub reason: DefectReason,
}

impl CellDefect {
    /// A1-style address of the dropped cell
    pub fn address(&self) -> String {
        self.cell.to_string()
    }

    pub fn into_error(self) -> SheetError {
        SheetError::UnencodableCell {
            address: self.address(),
            reason: self.reason,
        }
    }
}

/// Laid-out worksheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    name: String,
    column_count: u32,
    row_count: u32,
    cells: BTreeMap<CellRef, EncodedCell>,
    widths: Vec<f64>,
    range: CellRange,
    defects: Vec<CellDefect>,
}

impl SheetLayout {
    /// Lay out a sheet: header on row 0, data rows from row 1
    pub fn build(sheet: &Sheet) -> Result<Self> {
        let column_count = u32::try_from(sheet.columns.len()).map_err(|_| {
            SheetError::Serialization(format!("sheet '{}' has too many columns", sheet.name))
        })?;
        let row_count = u32::try_from(sheet.rows.len())
            .ok()
            .and_then(|n| n.checked_add(1))
            .ok_or_else(|| {
                SheetError::Serialization(format!("sheet '{}' has too many rows", sheet.name))
            })?;

        let mut cells = BTreeMap::new();
        let mut defects = Vec::new();

        for (col, header) in sheet.columns.iter().enumerate() {
            let header = CellValue::Text(header.clone());
            place(&sheet.name, CellRef::new(0, col as u32), &header, &mut cells, &mut defects);
        }

        for (index, row) in sheet.rows.iter().enumerate() {
            let row_idx = index as u32 + 1;

            for (col, slot) in row.iter().enumerate() {
                let Some(value) = slot else {
                    continue;
                };
                if col >= sheet.columns.len() {
                    return Err(SheetError::ColumnOutOfRange {
                        row: row_idx,
                        col: col as u32,
                        columns: column_count,
                    });
                }

                let cell = CellRef::new(row_idx, col as u32);
                place(&sheet.name, cell, value, &mut cells, &mut defects);
            }
        }

        let widths = column_widths(sheet.columns.len(), &cells);

        let range = CellRange::new(
            CellRef::new(0, 0),
            CellRef::new(row_count - 1, column_count.saturating_sub(1)),
        );

        Ok(SheetLayout {
            name: sheet.name.clone(),
            column_count,
            row_count,
            cells,
            widths,
            range,
            defects,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Encoded cell at a position, if one is stored there
    pub fn cell(&self, row: u32, col: u32) -> Option<&EncodedCell> {
        self.cells.get(&CellRef::new(row, col))
    }

    /// All stored cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (CellRef, &EncodedCell)> {
        self.cells.iter().map(|(cell, encoded)| (*cell, encoded))
    }

    /// Final width of a column, padding included
    pub fn column_width(&self, col: u32) -> Option<f64> {
        self.widths.get(col as usize).copied()
    }

    pub fn widths(&self) -> &[f64] {
        &self.widths
    }

    pub fn range(&self) -> CellRange {
        self.range
    }

    /// Rows including the header row
    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    pub fn column_count(&self) -> u32 {
        self.column_count
    }

    /// Cells dropped during encoding
    pub fn defects(&self) -> &[CellDefect] {
        &self.defects
    }
}

/// Encode one value into `cells`, or record why it could not be
fn place(
    sheet: &str,
    cell: CellRef,
    value: &CellValue,
    cells: &mut BTreeMap<CellRef, EncodedCell>,
    defects: &mut Vec<CellDefect>,
) {
    match encode(value) {
        Ok(encoded) => {
            cells.insert(cell, encoded);
        }
        Err(reason) => {
            tracing::warn!(
                sheet = %sheet,
                address = %encode_address(cell.row, cell.col),
                kind = value.kind_name(),
                %reason,
                "dropping cell that cannot be encoded"
            );
            defects.push(CellDefect {
                cell,
                value_kind: value.kind_name(),
                reason,
            });
        }
    }
}

/// Fold every stored cell into a width per column, seeded by the headers
fn column_widths(columns: usize, cells: &BTreeMap<CellRef, EncodedCell>) -> Vec<f64> {
    cells
        .iter()
        .fold(vec![0usize; columns], |mut widths, (cell, encoded)| {
            let slot = &mut widths[cell.col as usize];
            *slot = (*slot).max(encoded.width());
            widths
        })
        .into_iter()
        .map(|w| w as f64 + WIDTH_PADDING)
        .collect()
}
