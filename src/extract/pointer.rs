//! `.gdoc` Drive shortcuts. These carry only a link, never the transcript,
//! and the link is never fetched.

use serde::Deserialize;
use tracing::warn;

use super::{Document, ExtractError, TextExtractor};

const DEFAULT_POINTER_URL: &str = "https://docs.google.com/";

#[derive(Debug, Deserialize)]
struct PointerRecord {
    #[serde(default)]
    url: Option<String>,
}

pub fn pointer_notice(url: &str) -> String {
    format!(
        "WARNING: Google .gdoc files are Drive shortcuts.\n\
         Please export the meeting notes as Markdown or DOCX and commit that file.\n\
         Referenced document: {url}"
    )
}

pub struct CloudPointerExtractor;

impl TextExtractor for CloudPointerExtractor {
    fn extract(&self, doc: &Document) -> Result<String, ExtractError> {
        let url = match serde_json::from_slice::<PointerRecord>(doc.bytes()) {
            Ok(record) => record.url.filter(|u| !u.trim().is_empty()),
            Err(e) => {
                warn!("Unreadable .gdoc pointer {}: {e}", doc.path().display());
                None
            }
        };
        Ok(pointer_notice(url.as_deref().unwrap_or(DEFAULT_POINTER_URL)))
    }
}
