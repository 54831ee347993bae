//! Small buffered XML writer used for every package part

use crate::error::Result;
use std::io::Write;

const FLUSH_THRESHOLD: usize = 4096;

/// XML writer that batches output into an internal buffer
pub struct XmlWriter<W: Write> {
    writer: W,
    buffer: Vec<u8>,
}

impl<W: Write> XmlWriter<W> {
    pub fn new(writer: W) -> Self {
        XmlWriter {
            writer,
            buffer: Vec::with_capacity(8192),
        }
    }

    /// Write raw bytes directly
    #[inline]
    pub fn write_raw(&mut self, data: &[u8]) -> Result<()> {
        self.buffer.extend_from_slice(data);
        if self.buffer.len() > FLUSH_THRESHOLD {
            self.flush()?;
        }
        Ok(())
    }

    #[inline]
    pub fn write_str(&mut self, s: &str) -> Result<()> {
        self.write_raw(s.as_bytes())
    }

    /// Standard XML declaration
    pub fn declaration(&mut self) -> Result<()> {
        self.write_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n")
    }

    /// Open a start tag; attributes may follow
    #[inline]
    pub fn start_element(&mut self, name: &str) -> Result<()> {
        self.write_raw(b"<")?;
        self.write_str(name)
    }

    #[inline]
    pub fn close_start_tag(&mut self) -> Result<()> {
        self.write_raw(b">")
    }

    /// Close a start tag as a self-closing element
    #[inline]
    pub fn close_empty(&mut self) -> Result<()> {
        self.write_raw(b"/>")
    }

    #[inline]
    pub fn end_element(&mut self, name: &str) -> Result<()> {
        self.write_raw(b"</")?;
        self.write_str(name)?;
        self.write_raw(b">")
    }

    #[inline]
    pub fn attribute(&mut self, name: &str, value: &str) -> Result<()> {
        self.write_raw(b" ")?;
        self.write_str(name)?;
        self.write_raw(b"=\"")?;
        self.write_escaped(value)?;
        self.write_raw(b"\"")
    }

    #[inline]
    pub fn attribute_int(&mut self, name: &str, value: u64) -> Result<()> {
        let mut buf = itoa::Buffer::new();
        self.write_raw(b" ")?;
        self.write_str(name)?;
        self.write_raw(b"=\"")?;
        self.write_str(buf.format(value))?;
        self.write_raw(b"\"")
    }

    /// `<name>text</name>` with the text escaped
    pub fn text_element(&mut self, name: &str, text: &str) -> Result<()> {
        self.start_element(name)?;
        self.close_start_tag()?;
        self.write_escaped(text)?;
        self.end_element(name)
    }

    /// `<t>` element of a string item, preserving edge whitespace
    pub fn string_item(&mut self, text: &str) -> Result<()> {
        self.start_element("t")?;
        if text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace) {
            self.attribute("xml:space", "preserve")?;
        }
        self.close_start_tag()?;
        self.write_cell_text(text)?;
        self.end_element("t")
    }

    /// Write text with XML escaping
    ///
    /// Control characters that XML 1.0 cannot carry are written in the
    /// `_xHHHH_` form spreadsheet readers understand.
    pub fn write_escaped(&mut self, text: &str) -> Result<()> {
        self.escape(text, false)
    }

    /// Like [`write_escaped`](Self::write_escaped), but a literal `_xHHHH_`
    /// in the text gets its underscore written as `_x005F_` so readers do
    /// not decode it
    pub fn write_cell_text(&mut self, text: &str) -> Result<()> {
        self.escape(text, true)
    }

    fn escape(&mut self, text: &str, literal_escapes: bool) -> Result<()> {
        let bytes = text.as_bytes();
        for (i, &byte) in bytes.iter().enumerate() {
            match byte {
                b'_' if literal_escapes && is_escape_sequence(&bytes[i..]) => {
                    self.buffer.extend_from_slice(b"_x005F_")
                }
                b'&' => self.buffer.extend_from_slice(b"&amp;"),
                b'<' => self.buffer.extend_from_slice(b"&lt;"),
                b'>' => self.buffer.extend_from_slice(b"&gt;"),
                b'"' => self.buffer.extend_from_slice(b"&quot;"),
                b'\'' => self.buffer.extend_from_slice(b"&apos;"),
                b'\t' | b'\n' | b'\r' => self.buffer.push(byte),
                0..=0x1f => {
                    let escaped = format!("_x{:04X}_", byte);
                    self.buffer.extend_from_slice(escaped.as_bytes());
                }
                _ => self.buffer.push(byte),
            }
        }
        if self.buffer.len() > FLUSH_THRESHOLD {
            self.flush()?;
        }
        Ok(())
    }

    /// Flush buffer to underlying writer
    pub fn flush(&mut self) -> Result<()> {
        if !self.buffer.is_empty() {
            self.writer.write_all(&self.buffer)?;
            self.buffer.clear();
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// Whether `bytes` starts with an `_xHHHH_` escape
fn is_escape_sequence(bytes: &[u8]) -> bool {
    matches!(
        bytes,
        [b'_', b'x', h1, h2, h3, h4, b'_', ..]
            if [h1, h2, h3, h4].iter().all(|h| h.is_ascii_hexdigit())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut XmlWriter<&mut Vec<u8>>) -> Result<()>) -> String {
        let mut output = Vec::new();
        let mut writer = XmlWriter::new(&mut output);
        f(&mut writer).unwrap();
        writer.flush().unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_xml_writer() {
        let xml = render(|w| {
            w.start_element("root")?;
            w.attribute("attr", "value")?;
            w.attribute_int("n", 42)?;
            w.close_start_tag()?;
            w.text_element("child", "content")?;
            w.start_element("empty")?;
            w.close_empty()?;
            w.end_element("root")
        });

        assert_eq!(
            xml,
            "<root attr=\"value\" n=\"42\"><child>content</child><empty/></root>"
        );
    }

    #[test]
    fn test_xml_escaping() {
        let xml = render(|w| w.write_escaped("<test>&\"value\"</test>"));
        assert_eq!(xml, "&lt;test&gt;&amp;&quot;value&quot;&lt;/test&gt;");
    }

    #[test]
    fn test_control_characters() {
        let xml = render(|w| w.write_escaped("a\u{1}b\tc"));
        assert_eq!(xml, "a_x0001_b\tc");
    }

    #[test]
    fn test_literal_escape_sequence_in_cell_text() {
        assert_eq!(
            render(|w| w.string_item("id_x0041_z")),
            "<t>id_x005F_x0041_z</t>"
        );
        // Not a full sequence, left alone
        assert_eq!(render(|w| w.string_item("a_x12_b_x")), "<t>a_x12_b_x</t>");
        // Attributes are not cell text
        assert_eq!(render(|w| w.write_escaped("_x0041_")), "_x0041_");
        // Control characters still use the escape form
        assert_eq!(render(|w| w.string_item("_x0041_\u{1}")), "<t>_x005F_x0041__x0001_</t>");
    }

    #[test]
    fn test_string_item_whitespace() {
        assert_eq!(render(|w| w.string_item("plain")), "<t>plain</t>");
        assert_eq!(
            render(|w| w.string_item(" padded ")),
            "<t xml:space=\"preserve\"> padded </t>"
        );
    }

    #[test]
    fn test_large_output_flushes() {
        let text = "x".repeat(10_000);
        let xml = render(|w| w.text_element("big", &text));
        assert_eq!(xml.len(), text.len() + "<big></big>".len());
    }
}
