//! Error types for the Notion client.

use thiserror::Error;

/// Result type for Notion client operations.
pub type Result<T> = std::result::Result<T, NotionError>;

/// Notion client errors.
#[derive(Debug, Error)]
pub enum NotionError {
    /// Non-success response from the Notion API.
    #[error("Notion API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure (connection, timeout, body read).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}
