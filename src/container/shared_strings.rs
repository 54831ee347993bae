//! Shared string table, used when inline strings are turned off

use super::xml_writer::XmlWriter;
use crate::error::Result;
use indexmap::IndexSet;
use std::io::Write;

/// Deduplicated strings of a whole workbook, in first-use order
#[derive(Debug, Default)]
pub struct SharedStrings {
    strings: IndexSet<String>,
    references: u64,
}

impl SharedStrings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a string and get its index
    pub fn add_string(&mut self, s: &str) -> u32 {
        self.references += 1;
        if let Some(index) = self.strings.get_index_of(s) {
            return index as u32;
        }
        let (index, _) = self.strings.insert_full(s.to_string());
        index as u32
    }

    /// Number of unique strings
    pub fn count(&self) -> usize {
        self.strings.len()
    }

    pub fn write_xml<W: Write>(&self, writer: &mut XmlWriter<W>) -> Result<()> {
        writer.declaration()?;
        writer.start_element("sst")?;
        writer.attribute(
            "xmlns",
            "http://schemas.openxmlformats.org/spreadsheetml/2006/main",
        )?;
        writer.attribute_int("count", self.references)?;
        writer.attribute_int("uniqueCount", self.strings.len() as u64)?;
        writer.close_start_tag()?;

        for s in &self.strings {
            writer.start_element("si")?;
            writer.close_start_tag()?;
            writer.string_item(s)?;
            writer.end_element("si")?;
        }

        writer.end_element("sst")?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_strings() {
        let mut ss = SharedStrings::new();

        assert_eq!(ss.add_string("Hello"), 0);
        assert_eq!(ss.add_string("World"), 1);
        assert_eq!(ss.add_string("Hello"), 0);
        assert_eq!(ss.count(), 2);

        let mut output = Vec::new();
        {
            let mut writer = XmlWriter::new(&mut output);
            ss.write_xml(&mut writer).unwrap();
        }
        let xml = String::from_utf8(output).unwrap();
        assert!(xml.contains("count=\"3\" uniqueCount=\"2\""));
        assert!(xml.contains("<si><t>Hello</t></si><si><t>World</t></si>"));
    }
}
