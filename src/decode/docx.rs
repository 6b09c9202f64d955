//! DOCX text extraction: the OOXML body is rendered to a minimal HTML
//! string, then flattened through [`super::html::html_to_text`].

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use super::html::html_to_text;
use super::DecodeError;

pub fn extract_docx(bytes: &[u8]) -> Result<String, DecodeError> {
    let cursor = Cursor::new(bytes);
    let mut archive = zip::ZipArchive::new(cursor)
        .map_err(|e| DecodeError::ExtractionFailed(format!("docx archive: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| DecodeError::ExtractionFailed(format!("docx body: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| DecodeError::ExtractionFailed(format!("docx body: {e}")))?;

    Ok(html_to_text(&document_xml_to_html(&xml)))
}

fn escape_text(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Renders `word/document.xml` to HTML: paragraphs to `<p>`, table rows to
/// `<tr>`, breaks to `<br>`, tabs to spaces. Malformed XML ends the walk
/// early; whatever was rendered is kept.
fn document_xml_to_html(xml: &str) -> String {
    let mut reader = Reader::from_reader(xml.as_bytes());
    let mut html = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:p" => html.push_str("<p>"),
                b"w:tr" => html.push_str("<tr>"),
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:p" => html.push_str("</p>"),
                b"w:tr" => html.push_str("</tr>"),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:br" | b"w:cr" => html.push_str("<br>"),
                b"w:tab" => html.push(' '),
                _ => {}
            },
            Ok(Event::Text(t)) => {
                if let Ok(text) = t.unescape() {
                    html.push_str(&escape_text(&text));
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    html
}
