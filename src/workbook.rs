//! Workbook assembly: named sheets plus the shared number-format table

use indexmap::IndexMap;
use std::collections::BTreeMap;

use crate::encoder::{DATE_FORMAT_ID, DATE_PATTERN};
use crate::error::{Result, SheetError};
use crate::layout::{CellDefect, SheetLayout};
use crate::sanitize::{normalize_sheet_name, truncate_escaped, MAX_SHEET_NAME_CHARS};
use crate::types::Sheet;

/// Number-format table of one workbook
///
/// Built fresh for every workbook; the date pattern is always registered
/// under [`DATE_FORMAT_ID`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormats {
    formats: BTreeMap<u32, String>,
}

impl NumberFormats {
    pub fn new() -> Self {
        let mut formats = BTreeMap::new();
        formats.insert(DATE_FORMAT_ID, DATE_PATTERN.to_string());
        NumberFormats { formats }
    }

    pub fn get(&self, id: u32) -> Option<&str> {
        self.formats.get(&id).map(String::as_str)
    }

    /// Entries in slot order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.formats.iter().map(|(id, pattern)| (*id, pattern.as_str()))
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

impl Default for NumberFormats {
    fn default() -> Self {
        Self::new()
    }
}

/// What to do when two sheets normalize to the same name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CollisionPolicy {
    /// Fail with [`SheetError::DuplicateSheetName`]
    #[default]
    Error,
    /// Rename the later sheet to "Name (2)", "Name (3)", ...
    Suffix,
    /// Replace the earlier sheet's content, keeping its position
    Overwrite,
}

/// A complete workbook ready for serialization
#[derive(Debug, Clone, PartialEq)]
pub struct Workbook {
    sheets: IndexMap<String, SheetLayout>,
    number_formats: NumberFormats,
}

impl Workbook {
    fn empty() -> Self {
        Workbook {
            sheets: IndexMap::new(),
            number_formats: NumberFormats::new(),
        }
    }

    /// Workbook holding a single sheet
    pub fn assemble_single(sheet: Sheet) -> Result<Self> {
        let mut workbook = Workbook::empty();
        workbook.insert(sheet, CollisionPolicy::Error)?;
        Ok(workbook)
    }

    /// Workbook holding several sheets, in order
    ///
    /// Every name is normalized independently; `policy` decides what happens
    /// when two of them end up equal.
    pub fn assemble_multiple(sheets: Vec<Sheet>, policy: CollisionPolicy) -> Result<Self> {
        let mut workbook = Workbook::empty();
        for sheet in sheets {
            workbook.insert(sheet, policy)?;
        }
        tracing::debug!(sheets = workbook.len(), "assembled workbook");
        Ok(workbook)
    }

    fn insert(&mut self, sheet: Sheet, policy: CollisionPolicy) -> Result<()> {
        let mut layout = SheetLayout::build(&sheet)?;
        let name = normalize_sheet_name(&sheet.name);

        let name = match (self.find(&name), policy) {
            (None, _) => name,
            (Some(existing), CollisionPolicy::Error) => {
                return Err(SheetError::DuplicateSheetName(existing.to_string()));
            }
            (Some(existing), CollisionPolicy::Overwrite) => {
                tracing::warn!(sheet = %existing, "sheet name collision, replacing earlier sheet");
                existing.to_string()
            }
            (Some(_), CollisionPolicy::Suffix) => self.suffixed(&name),
        };

        layout.set_name(name.clone());
        self.sheets.insert(name, layout);
        Ok(())
    }

    /// Existing name equal to `name`, ignoring case as spreadsheet apps do
    fn find(&self, name: &str) -> Option<&str> {
        let folded = name.to_lowercase();
        self.sheets
            .keys()
            .find(|existing| existing.to_lowercase() == folded)
            .map(String::as_str)
    }

    fn suffixed(&self, name: &str) -> String {
        (2..)
            .map(|n| {
                let suffix = format!(" ({})", n);
                let room = MAX_SHEET_NAME_CHARS - suffix.chars().count();
                format!("{}{}", truncate_escaped(name, room), suffix)
            })
            .find(|candidate| self.find(candidate).is_none())
            .unwrap_or_else(|| name.to_string())
    }

    pub fn sheet(&self, name: &str) -> Option<&SheetLayout> {
        self.sheets.get(name)
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.keys().map(String::as_str)
    }

    /// Sheets in workbook order
    pub fn sheets(&self) -> impl Iterator<Item = &SheetLayout> {
        self.sheets.values()
    }

    /// Cells dropped from any sheet during encoding
    pub fn defects(&self) -> impl Iterator<Item = (&str, &CellDefect)> {
        self.sheets
            .iter()
            .flat_map(|(name, layout)| layout.defects().iter().map(move |d| (name.as_str(), d)))
    }

    pub fn number_formats(&self) -> &NumberFormats {
        &self.number_formats
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}
