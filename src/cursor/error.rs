//! Errors from talking to the Cursor agent API.
//!
//! [`AgentError::MissingCredential`] is a local precondition failure raised
//! before any request is made. Every other variant is a transport or
//! protocol problem; together they form the "remote job error" kind that the
//! pipeline answers with a fallback brief.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    /// No API key configured; nothing was sent.
    #[error("CURSOR_API_KEY is not configured")]
    MissingCredential,

    /// The request could not be built from the local configuration.
    #[error("invalid agent request: {0}")]
    InvalidRequest(String),

    /// Non-2xx response. Carries the status code and the response body.
    #[error("Cursor API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Connection, TLS or timeout failure below HTTP.
    #[error("Cursor API network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A 2xx response whose body was not what the API promises.
    #[error("invalid response from Cursor API: {0}")]
    InvalidResponse(String),
}

impl AgentError {
    /// True for every failure that happened while talking to the remote side.
    pub fn is_remote(&self) -> bool {
        !matches!(self, AgentError::MissingCredential)
    }
}
