//! Locally generated brief used when the agent produces nothing.

use crate::metadata::Metadata;

/// Marker recorded in the artifact header instead of a job id.
pub const FALLBACK_MARKER: &str = "fallback";

/// Number of non-blank transcript lines quoted in a fallback brief.
pub const EXCERPT_LINES: usize = 12;

/// Degraded brief: metadata plus the first [`EXCERPT_LINES`] non-blank
/// transcript lines (each trimmed). Never empty, even for an empty transcript.
pub fn fallback(text: &str, metadata: &Metadata) -> String {
    let excerpt = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(EXCERPT_LINES)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "_Cursor agent fallback summary_\n\
         \n\
         Meeting: {} ({})\n\
         \n\
         Transcript excerpt:\n\
         {excerpt}",
        metadata.title, metadata.date
    )
    .trim_end()
    .to_string()
}
