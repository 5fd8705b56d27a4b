//! Plain-text extraction for transcript documents.
//!
//! Each [`DocumentFormat`] maps to one [`TextExtractor`] strategy held in an
//! [`ExtractorRegistry`]. Recognized-but-damaged inputs degrade to notice
//! text wherever possible; only a broken DOCX container surfaces as
//! [`ExtractError::MalformedDocument`].

pub mod docx;
pub mod pdf;
pub mod pointer;

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::error::BriefError;

pub use docx::DocxExtractor;
pub use pdf::{PdfExtractor, PdfTextSource};
pub use pointer::CloudPointerExtractor;

/// Input formats, inferred from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    /// `.md`, `.markdown`, `.txt`
    PlainText,
    /// `.docx`
    WordArchive,
    /// `.pdf`
    Pdf,
    /// `.gdoc` Drive shortcut
    CloudPointer,
    Unknown,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("md" | "markdown" | "txt") => DocumentFormat::PlainText,
            Some("docx") => DocumentFormat::WordArchive,
            Some("pdf") => DocumentFormat::Pdf,
            Some("gdoc") => DocumentFormat::CloudPointer,
            _ => DocumentFormat::Unknown,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::PlainText => write!(f, "plain-text"),
            DocumentFormat::WordArchive => write!(f, "docx"),
            DocumentFormat::Pdf => write!(f, "pdf"),
            DocumentFormat::CloudPointer => write!(f, "gdoc"),
            DocumentFormat::Unknown => write!(f, "unknown"),
        }
    }
}

/// A transcript file read fully into memory. Immutable once read.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    format: DocumentFormat,
    bytes: Vec<u8>,
}

impl Document {
    /// Reads the file at `path`. Failure here is fatal for the run.
    pub fn read(path: &Path) -> Result<Self, BriefError> {
        let bytes = std::fs::read(path).map_err(|source| BriefError::InputRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_bytes(path, bytes))
    }

    pub fn from_bytes(path: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        let path = path.into();
        let format = DocumentFormat::from_path(&path);
        Self {
            path,
            format,
            bytes,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Errors raised by extraction strategies.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// A container format is corrupt or lacks its expected internal part.
    #[error("malformed document '{path}': {detail}")]
    MalformedDocument { path: PathBuf, detail: String },

    /// No strategy is registered for the format and the bytes are not text.
    #[error("unsupported {format} document '{path}'")]
    UnsupportedFormat {
        path: PathBuf,
        format: DocumentFormat,
    },
}

impl ExtractError {
    pub fn malformed(path: &Path, detail: impl Into<String>) -> Self {
        ExtractError::MalformedDocument {
            path: path.to_path_buf(),
            detail: detail.into(),
        }
    }
}

/// One extraction strategy.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, doc: &Document) -> Result<String, ExtractError>;
}

/// UTF-8 text with lossy replacement of undecodable bytes.
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, doc: &Document) -> Result<String, ExtractError> {
        match std::str::from_utf8(doc.bytes()) {
            Ok(text) => Ok(text.to_string()),
            Err(e) => {
                warn!(
                    "{} is not valid UTF-8 ({e}); decoding lossily",
                    doc.path().display()
                );
                Ok(String::from_utf8_lossy(doc.bytes()).into_owned())
            }
        }
    }
}

/// Routes a [`Document`] to the strategy registered for its format.
pub struct ExtractorRegistry {
    extractors: HashMap<DocumentFormat, Box<dyn TextExtractor>>,
}

impl ExtractorRegistry {
    /// An empty registry. Every format falls through to strict UTF-8.
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    /// The standard set of strategies. `pdf_source` is the optional
    /// PDF text capability; `None` makes PDFs degrade to a notice.
    pub fn with_defaults(pdf_source: Option<Box<dyn PdfTextSource>>) -> Self {
        let mut registry = Self::new();
        registry.register(DocumentFormat::PlainText, PlainTextExtractor);
        registry.register(DocumentFormat::WordArchive, DocxExtractor);
        registry.register(DocumentFormat::Pdf, PdfExtractor::new(pdf_source));
        registry.register(DocumentFormat::CloudPointer, CloudPointerExtractor);
        registry.register(DocumentFormat::Unknown, PlainTextExtractor);
        registry
    }

    pub fn register(&mut self, format: DocumentFormat, extractor: impl TextExtractor + 'static) {
        self.extractors.insert(format, Box::new(extractor));
    }

    pub fn extract(&self, doc: &Document) -> Result<String, ExtractError> {
        debug!(
            "Extracting {} as {}",
            doc.path().display(),
            doc.format()
        );
        if let Some(extractor) = self.extractors.get(&doc.format()) {
            return extractor.extract(doc);
        }
        std::str::from_utf8(doc.bytes())
            .map(str::to_string)
            .map_err(|_| ExtractError::UnsupportedFormat {
                path: doc.path().to_path_buf(),
                format: doc.format(),
            })
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults(pdf::default_source())
    }
}
