use std::path::PathBuf;

use thiserror::Error;

use crate::extract::ExtractError;

/// Local failures that end a run with a non-zero exit. Remote failures
/// never appear here; they turn into a fallback brief instead.
#[derive(Debug, Error)]
pub enum BriefError {
    #[error("Cannot read transcript '{path}': {source}")]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write brief '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("CURSOR_API_KEY is required (require_credential is enabled)")]
    MissingCredential,

    #[error("Config error: {0}")]
    Config(String),

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
