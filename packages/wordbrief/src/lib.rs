//! Keyword research pipeline.
//!
//! Reads pending keyword entries from a Notion database, searches the web
//! for each keyword, extracts and concatenates page text, summarizes it
//! with an LLM, and writes the summary back while flipping the entry's
//! status.
//!
//! # Usage
//!
//! ```rust,ignore
//! use wordbrief::{
//!     pipeline, Config, DuckDuckGoSearcher, GroqSummarizer, NotionKeywordStore,
//!     PageExtractor, PipelineConfig,
//! };
//!
//! let config = Config::from_env()?;
//! let store = NotionKeywordStore::new(notion, config.notion_database_id.clone());
//! let report = pipeline::run(
//!     &store,
//!     &DuckDuckGoSearcher::new(),
//!     &PageExtractor::new(),
//!     &GroqSummarizer::with_default_model(groq),
//!     &PipelineConfig::default(),
//! )
//! .await?;
//! ```
//!
//! # Modules
//!
//! - [`store`] - keyword store trait and the Notion implementation
//! - [`search`] - DuckDuckGo web search
//! - [`extract`] - page text extraction with redirect resolution
//! - [`summarize`] - Groq-backed summarization
//! - [`pipeline`] - the sequential orchestrator
//! - [`config`] - environment-driven configuration

pub mod config;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod search;
pub mod store;
pub mod summarize;

pub use config::Config;
pub use error::{FetchError, PipelineError, Result, SearchError};
pub use extract::{MockExtractor, PageExtractor, TextExtractor};
pub use pipeline::{run, PipelineConfig, RunReport};
pub use search::{DuckDuckGoSearcher, MockSearcher, WebSearcher};
pub use store::{KeywordEntry, KeywordStore, MockKeywordStore, NotionKeywordStore, NotionProperties};
pub use summarize::{GroqSummarizer, MockSummarizer, Summarizer, DEFAULT_MODEL};
