//! Package-level parts: content types, relationships, properties, styles
//! and the workbook part itself

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::io::Write;

use super::xml_writer::XmlWriter;
use crate::error::Result;
use crate::sanitize::display_name;
use crate::workbook::NumberFormats;

const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PKG_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_WORKSHEET: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
const REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const REL_SHARED_STRINGS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings";

const APPLICATION: &str = "sheetpack";

pub fn write_content_types<W: Write>(
    w: &mut XmlWriter<W>,
    sheet_count: usize,
    shared_strings: bool,
) -> Result<()> {
    w.write_str(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
"#,
    )?;

    for i in 1..=sheet_count {
        w.start_element("Override")?;
        w.attribute("PartName", &format!("/xl/worksheets/sheet{}.xml", i))?;
        w.attribute(
            "ContentType",
            "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml",
        )?;
        w.close_empty()?;
        w.write_str("\n")?;
    }

    if shared_strings {
        w.write_str(
            r#"<Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>
"#,
        )?;
    }

    w.end_element("Types")?;
    w.flush()
}

pub fn write_root_rels<W: Write>(w: &mut XmlWriter<W>) -> Result<()> {
    w.write_str(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>"#,
    )?;
    w.flush()
}

pub fn write_core_props<W: Write>(w: &mut XmlWriter<W>, created: DateTime<Utc>) -> Result<()> {
    let stamp = created.format("%Y-%m-%dT%H:%M:%SZ").to_string();

    w.declaration()?;
    w.write_str(
        r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
    )?;
    w.text_element("dc:creator", APPLICATION)?;
    w.text_element("cp:lastModifiedBy", APPLICATION)?;
    for tag in ["dcterms:created", "dcterms:modified"] {
        w.start_element(tag)?;
        w.attribute("xsi:type", "dcterms:W3CDTF")?;
        w.close_start_tag()?;
        w.write_str(&stamp)?;
        w.end_element(tag)?;
    }
    w.end_element("cp:coreProperties")?;
    w.flush()
}

pub fn write_app_props<W: Write>(w: &mut XmlWriter<W>, sheet_names: &[&str]) -> Result<()> {
    w.declaration()?;
    w.write_str(
        r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#,
    )?;
    w.text_element("Application", APPLICATION)?;
    w.text_element("DocSecurity", "0")?;
    w.text_element("ScaleCrop", "false")?;

    w.write_str("<HeadingPairs><vt:vector size=\"2\" baseType=\"variant\">")?;
    w.write_str("<vt:variant><vt:lpstr>Worksheets</vt:lpstr></vt:variant><vt:variant>")?;
    w.text_element("vt:i4", &sheet_names.len().to_string())?;
    w.write_str("</vt:variant></vt:vector></HeadingPairs>")?;

    w.start_element("TitlesOfParts")?;
    w.close_start_tag()?;
    w.start_element("vt:vector")?;
    w.attribute_int("size", sheet_names.len() as u64)?;
    w.attribute("baseType", "lpstr")?;
    w.close_start_tag()?;
    for name in sheet_names {
        w.text_element("vt:lpstr", &display_name(name))?;
    }
    w.end_element("vt:vector")?;
    w.end_element("TitlesOfParts")?;

    w.text_element("LinksUpToDate", "false")?;
    w.text_element("SharedDoc", "false")?;
    w.text_element("HyperlinksChanged", "false")?;
    w.text_element("AppVersion", "1.0")?;
    w.end_element("Properties")?;
    w.flush()
}

/// `xl/workbook.xml`; names are stored entity-safe and written back in
/// their visible form
pub fn write_workbook<W: Write>(w: &mut XmlWriter<W>, sheet_names: &[&str]) -> Result<()> {
    w.declaration()?;
    w.start_element("workbook")?;
    w.attribute("xmlns", NS_MAIN)?;
    w.attribute("xmlns:r", NS_REL)?;
    w.close_start_tag()?;

    w.write_str("<bookViews><workbookView activeTab=\"0\"/></bookViews>")?;
    w.start_element("sheets")?;
    w.close_start_tag()?;
    for (i, name) in sheet_names.iter().enumerate() {
        let sheet_id = i as u64 + 1;
        w.start_element("sheet")?;
        w.attribute("name", &display_name(name))?;
        w.attribute_int("sheetId", sheet_id)?;
        w.attribute("r:id", &format!("rId{}", sheet_id))?;
        w.close_empty()?;
    }
    w.end_element("sheets")?;

    w.end_element("workbook")?;
    w.flush()
}

pub fn write_workbook_rels<W: Write>(
    w: &mut XmlWriter<W>,
    sheet_count: usize,
    shared_strings: bool,
) -> Result<()> {
    fn relationship<W: Write>(
        w: &mut XmlWriter<W>,
        id: usize,
        kind: &str,
        target: &str,
    ) -> Result<()> {
        w.start_element("Relationship")?;
        w.attribute("Id", &format!("rId{}", id))?;
        w.attribute("Type", kind)?;
        w.attribute("Target", target)?;
        w.close_empty()
    }

    w.declaration()?;
    w.start_element("Relationships")?;
    w.attribute("xmlns", NS_PKG_REL)?;
    w.close_start_tag()?;

    for i in 1..=sheet_count {
        relationship(w, i, REL_WORKSHEET, &format!("worksheets/sheet{}.xml", i))?;
    }
    relationship(w, sheet_count + 1, REL_STYLES, "styles.xml")?;
    if shared_strings {
        relationship(w, sheet_count + 2, REL_SHARED_STRINGS, "sharedStrings.xml")?;
    }

    w.end_element("Relationships")?;
    w.flush()
}

/// Maps number-format slots to `cellXfs` indices
///
/// Index 0 is the default style; each registered format gets the next
/// index in slot order. The default map knows no formats.
#[derive(Debug, Default)]
pub struct StyleMap {
    xf_by_format: HashMap<u32, u32>,
}

impl StyleMap {
    pub fn new(formats: &NumberFormats) -> Self {
        let xf_by_format = formats
            .iter()
            .enumerate()
            .map(|(i, (id, _))| (id, i as u32 + 1))
            .collect();
        StyleMap { xf_by_format }
    }

    pub fn xf_index(&self, format_id: u32) -> Option<u32> {
        self.xf_by_format.get(&format_id).copied()
    }
}

pub fn write_styles<W: Write>(w: &mut XmlWriter<W>, formats: &NumberFormats) -> Result<()> {
    w.declaration()?;
    w.start_element("styleSheet")?;
    w.attribute("xmlns", NS_MAIN)?;
    w.close_start_tag()?;

    w.start_element("numFmts")?;
    w.attribute_int("count", formats.len() as u64)?;
    w.close_start_tag()?;
    for (id, pattern) in formats.iter() {
        w.start_element("numFmt")?;
        w.attribute_int("numFmtId", id as u64)?;
        w.attribute("formatCode", pattern)?;
        w.close_empty()?;
    }
    w.end_element("numFmts")?;

    w.write_str(
        r#"<fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>
<fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills>
<borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>
<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
"#,
    )?;

    w.start_element("cellXfs")?;
    w.attribute_int("count", formats.len() as u64 + 1)?;
    w.close_start_tag()?;
    w.write_str(r#"<xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>"#)?;
    for (id, _) in formats.iter() {
        w.start_element("xf")?;
        w.attribute_int("numFmtId", id as u64)?;
        w.write_str(r#" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1""#)?;
        w.close_empty()?;
    }
    w.end_element("cellXfs")?;

    w.write_str(
        r#"<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>"#,
    )?;
    w.end_element("styleSheet")?;
    w.flush()
}
