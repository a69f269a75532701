//! Typed errors for the research pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to keep the failure
//! taxonomy explicit: pipeline-level errors abort or fail an entry, while
//! [`FetchError`] marks a single page that contributes nothing.

use thiserror::Error;

/// Errors that can occur while processing keywords.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Keyword store (Notion) operation failed
    #[error("keyword store error: {0}")]
    Store(#[from] notion_client::NotionError),

    /// Web search failed
    #[error("search failed: {0}")]
    Search(#[from] SearchError),

    /// Summarization failed
    #[error("summarization failed: {0}")]
    Summarize(#[from] groq_client::GroqError),
}

/// Errors from the web search step.
#[derive(Debug, Error)]
pub enum SearchError {
    /// HTTP request failed
    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from the search endpoint
    #[error("search responded with HTTP {status}")]
    Status { status: u16 },
}

/// Why a single page fetch yielded no text.
///
/// Every variant is treated the same by the pipeline (the page contributes
/// nothing to the concatenation), but callers can tell "no content" apart
/// from "error" and log accordingly.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Fetch exceeded the per-page timeout
    #[error("timeout fetching: {url}")]
    Timeout { url: String },

    /// Transport-level failure (connection, body read)
    #[error("fetch failed: {0}")]
    Network(#[source] reqwest::Error),

    /// Non-success response from the page
    #[error("page responded with HTTP {status}")]
    Status { status: u16 },

    /// URL could not be used for a request
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
