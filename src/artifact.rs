//! Final brief document: a front-matter header followed by the body.

use std::path::Path;

use tracing::debug;

use crate::error::BriefError;
use crate::fallback::FALLBACK_MARKER;
use crate::metadata::Metadata;

/// Quote a header value. JSON string syntax is also a valid YAML
/// double-quoted scalar.
fn quoted(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Builds the artifact text. `job_id` of `None` records [`FALLBACK_MARKER`].
/// The output always ends with exactly one newline.
pub fn assemble(content: &str, metadata: &Metadata, source: &Path, job_id: Option<&str>) -> String {
    let source = source.to_string_lossy().replace('\\', "/");
    let header = format!(
        "---\n\
         meeting: {}\n\
         date: {}\n\
         source_transcript: {}\n\
         agent_id: {}\n\
         ---",
        quoted(&metadata.title),
        quoted(&metadata.date),
        quoted(&source),
        quoted(job_id.unwrap_or(FALLBACK_MARKER)),
    );

    let body = content.trim();
    if body.is_empty() {
        format!("{header}\n")
    } else {
        format!("{header}\n\n{body}\n")
    }
}

/// Writes the artifact, creating parent directories as needed.
pub fn write_artifact(path: &Path, contents: &str) -> Result<(), BriefError> {
    let write_err = |source| BriefError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, contents).map_err(write_err)?;
    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

/// Splits an assembled artifact back into `(header, body)`.
#[cfg(test)]
pub fn split_artifact(doc: &str) -> (&str, &str) {
    let end = doc[4..].find("\n---").map(|i| i + 4 + 4).unwrap_or(doc.len());
    let header = &doc[..end];
    let body = doc[end..].trim_start_matches('\n').strip_suffix('\n').unwrap_or("");
    (header, body)
}
