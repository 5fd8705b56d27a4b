//! DOCX extraction: unzip the container and walk `word/document.xml`.

use std::io::{Cursor, Read};

use quick_xml::NsReader;
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use zip::ZipArchive;

use super::{Document, ExtractError, TextExtractor};

const WORDML_NS: &[u8] = b"http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const BODY_PART: &str = "word/document.xml";

/// Paragraphs joined by `\n`; runs inside a paragraph joined with no separator.
pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn extract(&self, doc: &Document) -> Result<String, ExtractError> {
        let xml = read_body_part(doc)?;
        paragraphs_from_xml(&xml).map_err(|detail| ExtractError::malformed(doc.path(), detail))
    }
}

fn read_body_part(doc: &Document) -> Result<String, ExtractError> {
    let mut archive = ZipArchive::new(Cursor::new(doc.bytes()))
        .map_err(|e| ExtractError::malformed(doc.path(), format!("not a DOCX container: {e}")))?;
    let mut part = archive
        .by_name(BODY_PART)
        .map_err(|e| ExtractError::malformed(doc.path(), format!("missing {BODY_PART}: {e}")))?;
    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| ExtractError::malformed(doc.path(), format!("unreadable {BODY_PART}: {e}")))?;
    Ok(xml)
}

fn is_wordml(ns: &ResolveResult<'_>) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == WORDML_NS)
}

/// Collects the text of every `w:p` in document order. Paragraphs without
/// any `w:t` content are dropped. Nested paragraphs (text boxes) are
/// emitted on their own, before the paragraph that contains them.
pub fn paragraphs_from_xml(xml: &str) -> Result<String, String> {
    let mut reader = NsReader::from_str(xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut open: Vec<String> = Vec::new();
    let mut in_text = false;

    loop {
        match reader.read_resolved_event() {
            Ok((ns, Event::Start(e))) if is_wordml(&ns) => match e.local_name().as_ref() {
                b"p" => open.push(String::new()),
                b"t" => in_text = true,
                _ => {}
            },
            Ok((ns, Event::End(e))) if is_wordml(&ns) => match e.local_name().as_ref() {
                b"p" => {
                    if let Some(paragraph) = open.pop()
                        && !paragraph.is_empty()
                    {
                        paragraphs.push(paragraph);
                    }
                }
                b"t" => in_text = false,
                _ => {}
            },
            Ok((_, Event::Text(t))) if in_text => {
                let text = t.unescape().map_err(|e| format!("bad text node: {e}"))?;
                if let Some(paragraph) = open.last_mut() {
                    paragraph.push_str(&text);
                }
            }
            Ok((_, Event::Eof)) => break,
            Err(e) => return Err(format!("invalid {BODY_PART}: {e}")),
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}
