//! Word document normalizer.
//!
//! Turns a `.docx` container into the plain text the model sees:
//! body paragraphs first (document order), then every table cell
//! (table → row → cell order), one entry per line.
//!
//! Only `word/document.xml` is read. Headers, footers and comments are ignored.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader as XmlReader;
use thiserror::Error;
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";

#[derive(Debug, Error)]
pub enum DocumentParseError {
    #[error("not a document container: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("container has no word/document.xml part")]
    MissingDocumentPart,

    #[error("failed to read document part: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed document XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("document XML ends with {0} unclosed element(s)")]
    Truncated(usize),
}

/// Extracts paragraph and table-cell text from a Word document.
pub fn normalize(bytes: &[u8]) -> Result<String, DocumentParseError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|_| DocumentParseError::MissingDocumentPart)?
        .read_to_string(&mut xml)?;

    let collected = collect_text(&xml)?;
    Ok(collected.into_text())
}

#[derive(Debug, Default)]
struct CollectedText {
    paragraphs: Vec<String>,
    cells: Vec<String>,
}

impl CollectedText {
    fn into_text(self) -> String {
        self.paragraphs
            .into_iter()
            .chain(self.cells)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Walks `document.xml` keeping track of table and paragraph nesting.
///
/// Only depth-1 paragraphs contribute text, so text boxes anchored inside a
/// run do not leak into their host paragraph. Cells of nested tables are not
/// part of the outer cell.
#[derive(Default)]
struct Walker {
    out: CollectedText,
    table_depth: usize,
    paragraph_depth: usize,
    run_depth: usize,
    in_text: bool,
    paragraph: String,
    cell: Option<Vec<String>>,
}

impl Walker {
    fn start(&mut self, local_name: &[u8]) {
        match local_name {
            b"tbl" => self.table_depth += 1,
            b"tc" if self.table_depth == 1 => self.cell = Some(Vec::new()),
            b"p" => {
                self.paragraph_depth += 1;
                if self.paragraph_depth == 1 {
                    self.paragraph.clear();
                }
            }
            b"r" => self.run_depth += 1,
            b"t" if self.paragraph_depth == 1 => self.in_text = true,
            _ => {}
        }
    }

    fn end(&mut self, local_name: &[u8]) {
        match local_name {
            b"tbl" => self.table_depth = self.table_depth.saturating_sub(1),
            b"tc" if self.table_depth == 1 => self.finish_cell(),
            b"p" => {
                if self.paragraph_depth == 1 {
                    self.finish_paragraph();
                }
                self.paragraph_depth = self.paragraph_depth.saturating_sub(1);
            }
            b"r" => self.run_depth = self.run_depth.saturating_sub(1),
            b"t" => self.in_text = false,
            _ => {}
        }
    }

    fn empty(&mut self, local_name: &[u8]) {
        match local_name {
            b"p" => {
                self.start(b"p");
                self.end(b"p");
            }
            b"tc" => {
                self.start(b"tc");
                self.end(b"tc");
            }
            // Tab stops in paragraph properties share the `tab` name; only runs count.
            b"tab" if self.in_run() => self.paragraph.push('\t'),
            b"br" | b"cr" if self.in_run() => self.paragraph.push('\n'),
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_text {
            self.paragraph.push_str(text);
        }
    }

    fn in_run(&self) -> bool {
        self.paragraph_depth == 1 && self.run_depth > 0
    }

    fn finish_paragraph(&mut self) {
        let text = std::mem::take(&mut self.paragraph);
        match self.table_depth {
            0 => {
                if !text.trim().is_empty() {
                    self.out.paragraphs.push(text);
                }
            }
            1 => {
                if let Some(cell) = self.cell.as_mut() {
                    cell.push(text);
                }
            }
            _ => {}
        }
    }

    fn finish_cell(&mut self) {
        if let Some(paragraphs) = self.cell.take() {
            let text = paragraphs.join("\n");
            if !text.trim().is_empty() {
                self.out.cells.push(text);
            }
        }
    }
}

fn collect_text(xml: &str) -> Result<CollectedText, DocumentParseError> {
    let mut reader = XmlReader::from_str(xml);
    let mut walker = Walker::default();
    let mut buf = Vec::new();
    // quick-xml reports Eof without complaint while elements are still open.
    let mut open = 0usize;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                open += 1;
                walker.start(e.local_name().as_ref());
            }
            Event::End(ref e) => {
                open = open.saturating_sub(1);
                walker.end(e.local_name().as_ref());
            }
            Event::Empty(ref e) => walker.empty(e.local_name().as_ref()),
            Event::Text(ref e) => walker.text(&e.unescape()?),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if open > 0 {
        return Err(DocumentParseError::Truncated(open));
    }
    Ok(walker.out)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    use zip::write::SimpleFileOptions;

    /// Wraps body XML in a minimal `.docx` container.
    pub(crate) fn docx_with_body(body: &str) -> Vec<u8> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        );
        let stored =
            || SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer.start_file("[Content_Types].xml", stored()).unwrap();
        writer.write_all(b"<Types/>").unwrap();
        writer.start_file(DOCUMENT_PART, stored()).unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    fn para(text: &str) -> String {
        format!("<w:p><w:r><w:t xml:space=\"preserve\">{text}</w:t></w:r></w:p>")
    }

    fn table(rows: &[&[&str]]) -> String {
        let rows: String = rows
            .iter()
            .map(|cells| {
                let cells: String = cells
                    .iter()
                    .map(|c| format!("<w:tc>{}</w:tc>", para(c)))
                    .collect();
                format!("<w:tr>{cells}</w:tr>")
            })
            .collect();
        format!("<w:tbl>{rows}</w:tbl>")
    }

    #[test]
    fn test_paragraphs_in_order() {
        let body = format!("{}{}{}", para("Jane Doe"), para("jane@x.com"), para("Rust"));
        let text = normalize(&docx_with_body(&body)).unwrap();
        assert_eq!(text, "Jane Doe\njane@x.com\nRust");
    }

    #[test]
    fn test_paragraphs_come_before_table_cells() {
        // Table sits between two paragraphs in the document, but cells go last.
        let body = format!(
            "{}{}{}",
            para("Jane Doe"),
            table(&[&["Skills", "Go"], &["Education", "MIT"]]),
            para("Summary line")
        );
        let text = normalize(&docx_with_body(&body)).unwrap();
        assert_eq!(text, "Jane Doe\nSummary line\nSkills\nGo\nEducation\nMIT");
    }

    #[test]
    fn test_blank_paragraphs_and_cells_are_skipped() {
        let body = format!(
            "{}<w:p/>{}{}",
            para("   "),
            para("Jane"),
            table(&[&["", "Go"]])
        );
        let text = normalize(&docx_with_body(&body)).unwrap();
        assert_eq!(text, "Jane\nGo");
    }

    #[test]
    fn test_whitespace_only_document_is_empty() {
        let body = format!("{}{}", para(" "), table(&[&[" "]]));
        let text = normalize(&docx_with_body(&body)).unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn test_runs_tabs_and_breaks() {
        let body = "<w:p><w:pPr><w:tabs><w:tab w:val=\"left\" w:pos=\"720\"/></w:tabs></w:pPr>\
                    <w:r><w:t>Jane</w:t></w:r><w:r><w:tab/><w:t>Doe</w:t><w:br/><w:t>Rust &amp; Go</w:t></w:r></w:p>";
        let text = normalize(&docx_with_body(body)).unwrap();
        assert_eq!(text, "Jane\tDoe\nRust & Go");
    }

    #[test]
    fn test_multi_paragraph_cell_joined_by_newline() {
        let body = format!(
            "<w:tbl><w:tr><w:tc>{}{}</w:tc></w:tr></w:tbl>",
            para("Line one"),
            para("Line two")
        );
        let text = normalize(&docx_with_body(&body)).unwrap();
        assert_eq!(text, "Line one\nLine two");
    }

    #[test]
    fn test_nested_table_text_not_in_outer_cell() {
        let nested = table(&[&["inner"]]);
        let body = format!(
            "<w:tbl><w:tr><w:tc>{}{}</w:tc></w:tr></w:tbl>",
            para("outer"),
            nested
        );
        let text = normalize(&docx_with_body(&body)).unwrap();
        assert_eq!(text, "outer");
    }

    #[test]
    fn test_content_control_paragraphs_are_collected() {
        let body = format!(
            "<w:sdt><w:sdtContent>{}</w:sdtContent></w:sdt>{}",
            para("inside control"),
            para("after")
        );
        let text = normalize(&docx_with_body(&body)).unwrap();
        assert_eq!(text, "inside control\nafter");
    }

    /// A container whose `document.xml` is exactly `xml`.
    pub(crate) fn docx_with_xml(xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(DOCUMENT_PART, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_truncated_document_xml_fails() {
        let bytes = docx_with_xml(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>Jane"#,
        );
        let err = normalize(&bytes).unwrap_err();
        assert!(matches!(err, DocumentParseError::Truncated(5)));
    }

    #[test]
    fn test_corrupt_bytes_fail() {
        let err = normalize(b"definitely not a zip").unwrap_err();
        assert!(matches!(err, DocumentParseError::Archive(_)));
    }

    #[test]
    fn test_zip_without_document_part_fails() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("hello.txt", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"hi").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let err = normalize(&bytes).unwrap_err();
        assert!(matches!(err, DocumentParseError::MissingDocumentPart));
    }
}
