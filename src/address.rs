//! A1-style cell addresses and ranges
//!
//! Rows and columns are zero-indexed everywhere in the crate; these helpers
//! are the only place where they turn into column letters and 1-based row
//! numbers.

use crate::error::{Result, SheetError};
use std::fmt;

/// Zero-indexed cell coordinate
///
/// Ordering is row-major, which is the order cells must appear in a
/// worksheet part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellRef {
    /// Row index (0-based)
    pub row: u32,
    /// Column index (0-based)
    pub col: u32,
}

impl CellRef {
    pub fn new(row: u32, col: u32) -> Self {
        CellRef { row, col }
    }

    /// Parse an address such as "B2"
    pub fn parse(address: &str) -> Result<Self> {
        let (row, col) = decode_address(address)?;
        Ok(CellRef { row, col })
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_address(self.row, self.col))
    }
}

/// Rectangular range between two cells, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    pub start: CellRef,
    pub end: CellRef,
}

impl CellRange {
    pub fn new(start: CellRef, end: CellRef) -> Self {
        CellRange { start, end }
    }

    /// Whether a cell falls inside the range
    pub fn contains(&self, cell: CellRef) -> bool {
        (self.start.row..=self.end.row).contains(&cell.row)
            && (self.start.col..=self.end.col).contains(&cell.col)
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

/// Convert a column index to letters (0 -> A, 25 -> Z, 26 -> AA)
pub fn encode_column(col: u32) -> String {
    let mut letters = Vec::with_capacity(3);
    let mut n = col as u64 + 1;

    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }

    letters.reverse();
    // Only ASCII uppercase letters were pushed
    String::from_utf8(letters).unwrap_or_default()
}

/// Convert column letters back to a zero-based index
pub fn decode_column(letters: &str) -> Result<u32> {
    if letters.is_empty() {
        return Err(SheetError::InvalidCell("missing column letters".to_string()));
    }

    let mut n: u64 = 0;
    for b in letters.bytes() {
        if !b.is_ascii_alphabetic() {
            return Err(SheetError::InvalidCell(format!(
                "invalid column letters '{}'",
                letters
            )));
        }
        n = n * 26 + (b.to_ascii_uppercase() - b'A') as u64 + 1;
        if n > u32::MAX as u64 + 1 {
            return Err(SheetError::InvalidCell(format!(
                "column '{}' is out of range",
                letters
            )));
        }
    }

    Ok((n - 1) as u32)
}

/// Encode a zero-indexed row/column as an address such as "A1"
pub fn encode_address(row: u32, col: u32) -> String {
    let mut out = encode_column(col);
    let mut buf = itoa::Buffer::new();
    out.push_str(buf.format(row as u64 + 1));
    out
}

/// Decode an address such as "AA10" into zero-indexed (row, col)
pub fn decode_address(address: &str) -> Result<(u32, u32)> {
    let split = address
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(|| SheetError::InvalidCell(format!("'{}' has no row number", address)))?;
    let (letters, digits) = address.split_at(split);

    let col = decode_column(letters)?;
    let row: u64 = digits
        .parse()
        .map_err(|_| SheetError::InvalidCell(format!("'{}' has an invalid row number", address)))?;

    if row == 0 || row > u32::MAX as u64 + 1 {
        return Err(SheetError::InvalidCell(format!(
            "'{}' has a row number out of range",
            address
        )));
    }

    Ok(((row - 1) as u32, col))
}

/// Encode a range such as "A1:C5"
pub fn encode_range(r0: u32, c0: u32, r1: u32, c1: u32) -> String {
    CellRange::new(CellRef::new(r0, c0), CellRef::new(r1, c1)).to_string()
}

/// Decode "A1:C5" (or a single address, meaning a one-cell range)
pub fn decode_range(range: &str) -> Result<CellRange> {
    match range.split_once(':') {
        Some((start, end)) => Ok(CellRange::new(CellRef::parse(start)?, CellRef::parse(end)?)),
        None => {
            let cell = CellRef::parse(range)?;
            Ok(CellRange::new(cell, cell))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_address() {
        assert_eq!(encode_address(0, 0), "A1");
        assert_eq!(encode_address(0, 25), "Z1");
        assert_eq!(encode_address(0, 26), "AA1");
        assert_eq!(encode_address(99, 0), "A100");
        assert_eq!(encode_address(0, 701), "ZZ1");
        assert_eq!(encode_address(0, 702), "AAA1");
        assert_eq!(encode_address(0, 16383), "XFD1");
    }

    #[test]
    fn test_encode_range() {
        assert_eq!(encode_range(0, 0, 4, 2), "A1:C5");
    }

    #[test]
    fn test_extremes() {
        assert_eq!(encode_column(u32::MAX), "MWLQKWV");
        let address = encode_address(u32::MAX, u32::MAX);
        assert_eq!(decode_address(&address).unwrap(), (u32::MAX, u32::MAX));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_address("").is_err());
        assert!(decode_address("A").is_err());
        assert!(decode_address("12").is_err());
        assert!(decode_address("A0").is_err());
        assert!(decode_address("A1B").is_err());
        assert!(decode_address("1A").is_err());
        assert!(decode_range("A1:").is_err());
    }

    #[test]
    fn test_decode_range() {
        let range = decode_range("A1:C5").unwrap();
        assert_eq!(range.start, CellRef::new(0, 0));
        assert_eq!(range.end, CellRef::new(4, 2));
        assert!(range.contains(CellRef::new(2, 1)));
        assert!(!range.contains(CellRef::new(5, 0)));

        let single = decode_range("b2").unwrap();
        assert_eq!(single.start, single.end);
        assert_eq!(single.start, CellRef::new(1, 1));
    }

    #[test]
    fn test_cell_ref_order_is_row_major() {
        let mut cells = vec![CellRef::new(1, 0), CellRef::new(0, 5), CellRef::new(0, 1)];
        cells.sort();
        assert_eq!(
            cells,
            vec![CellRef::new(0, 1), CellRef::new(0, 5), CellRef::new(1, 0)]
        );
    }

    proptest! {
        #[test]
        fn prop_address_round_trip(row in any::<u32>(), col in any::<u32>()) {
            let address = encode_address(row, col);
            prop_assert_eq!(decode_address(&address).unwrap(), (row, col));
        }

        #[test]
        fn prop_range_round_trip(r0 in 0u32..1_048_576, c0 in 0u32..16_384, r1 in 0u32..1_048_576, c1 in 0u32..16_384) {
            let range = decode_range(&encode_range(r0, c0, r1, c1)).unwrap();
            prop_assert_eq!(range.start, CellRef::new(r0, c0));
            prop_assert_eq!(range.end, CellRef::new(r1, c1));
        }
    }
}
