//! Error types for the call agent

use thiserror::Error;

/// Result type alias for call agent operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while hosting the call agent
///
/// Reply resolution itself never fails; remote completion errors live in
/// [`crate::completion::CompletionError`] and are recovered by the resolver.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP server error (bind, serve)
    #[error("server error: {0}")]
    Server(String),

    /// HTTP client error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
