//! PDF extraction through an optional, injected text capability.
//!
//! The capability is a [`PdfTextSource`]. Builds with the `pdf` feature get
//! an in-process one backed by `lopdf`; without it the extractor is built
//! with `None` and every PDF degrades to [`PDF_UNAVAILABLE_NOTICE`].

use tracing::warn;

use super::{Document, ExtractError, TextExtractor};

pub const PDF_UNAVAILABLE_NOTICE: &str = "PDF transcript provided, but PDF text extraction is not available in this build.\n\
Rebuild with the `pdf` feature to enable extraction, or provide the transcript in Markdown/TXT/DOCX.";

pub const PDF_EMPTY_NOTICE: &str =
    "PDF transcript contained no extractable text. Please export to Markdown or DOCX.";

pub const PDF_UNREADABLE_NOTICE: &str =
    "PDF transcript could not be parsed. Please export to Markdown or DOCX.";

/// Per-page PDF text extraction.
pub trait PdfTextSource: Send + Sync {
    /// Text of every page in page order. The outer error means the file
    /// could not be opened at all; an inner error affects only that page.
    fn page_texts(&self, bytes: &[u8]) -> Result<Vec<Result<String, String>>, String>;
}

#[cfg(feature = "pdf")]
pub struct LopdfSource;

#[cfg(feature = "pdf")]
impl PdfTextSource for LopdfSource {
    fn page_texts(&self, bytes: &[u8]) -> Result<Vec<Result<String, String>>, String> {
        let document = lopdf::Document::load_mem(bytes).map_err(|e| e.to_string())?;
        let pages = document.get_pages();
        Ok(pages
            .keys()
            .map(|&number| {
                document
                    .extract_text(&[number])
                    .map_err(|e| e.to_string())
            })
            .collect())
    }
}

/// The capability compiled into this binary, if any.
pub fn default_source() -> Option<Box<dyn PdfTextSource>> {
    #[cfg(feature = "pdf")]
    {
        Some(Box::new(LopdfSource))
    }
    #[cfg(not(feature = "pdf"))]
    {
        None
    }
}

pub struct PdfExtractor {
    source: Option<Box<dyn PdfTextSource>>,
}

impl PdfExtractor {
    pub fn new(source: Option<Box<dyn PdfTextSource>>) -> Self {
        Self { source }
    }
}

impl TextExtractor for PdfExtractor {
    fn extract(&self, doc: &Document) -> Result<String, ExtractError> {
        let Some(source) = &self.source else {
            warn!(
                "No PDF text capability available for {}",
                doc.path().display()
            );
            return Ok(PDF_UNAVAILABLE_NOTICE.to_string());
        };

        let pages = match source.page_texts(doc.bytes()) {
            Ok(pages) => pages,
            Err(detail) => {
                warn!("Failed to open PDF {}: {detail}", doc.path().display());
                return Ok(PDF_UNREADABLE_NOTICE.to_string());
            }
        };

        let mut any_text = false;
        let mut blocks = Vec::with_capacity(pages.len());
        for (idx, page) in pages.into_iter().enumerate() {
            match page {
                Ok(text) => {
                    let text = text.trim();
                    if !text.is_empty() {
                        any_text = true;
                        blocks.push(text.to_string());
                    }
                }
                Err(detail) => {
                    warn!("PDF page {} of {}: {detail}", idx + 1, doc.path().display());
                    blocks.push(format!(
                        "[Warning: failed to read PDF page {}: {detail}]",
                        idx + 1
                    ));
                }
            }
        }

        if !any_text {
            return Ok(PDF_EMPTY_NOTICE.to_string());
        }
        Ok(blocks.join("\n\n"))
    }
}
