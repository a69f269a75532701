//! The sequential research pipeline.
//!
//! For each pending keyword: search, extract, summarize, write back. One
//! entry at a time, one link at a time, with a fixed pause after each
//! processed entry to respect external rate limits.
//!
//! Failure handling follows a three-level taxonomy:
//! - a keyword-store fetch failure aborts the run (nothing to iterate);
//! - search, summarize, and write failures fail that entry only — logged,
//!   counted, and the loop advances;
//! - page fetch failures inside extraction degrade to an empty contribution.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::extract::TextExtractor;
use crate::search::WebSearcher;
use crate::store::{KeywordEntry, KeywordStore};
use crate::summarize::Summarizer;

/// Configuration for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Pause after each processed entry.
    pub pause: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            pause: Duration::from_secs(1),
        }
    }
}

impl PipelineConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the inter-entry pause.
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }
}

/// Outcome of a pipeline run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// When the run started.
    pub started_at: DateTime<Utc>,

    /// When the run finished.
    pub finished_at: DateTime<Utc>,

    /// Entries summarized and marked.
    pub processed: usize,

    /// Entries left unchanged because no source yielded text.
    pub skipped: usize,

    /// Entries that failed (search, summarize, or write).
    pub failed: usize,

    /// Keywords of the failed entries.
    pub failed_keywords: Vec<String>,
}

impl RunReport {
    /// Check whether every entry either processed or skipped cleanly.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Run the pipeline over every unprocessed entry.
///
/// Only a `fetch_unprocessed` failure propagates; per-entry failures are
/// recorded in the report and the batch continues.
pub async fn run<S, W, E, A>(
    store: &S,
    searcher: &W,
    extractor: &E,
    summarizer: &A,
    config: &PipelineConfig,
) -> Result<RunReport>
where
    S: KeywordStore,
    W: WebSearcher,
    E: TextExtractor,
    A: Summarizer,
{
    let started_at = Utc::now();

    let entries = store.fetch_unprocessed().await?;
    info!(count = entries.len(), "fetched unprocessed keywords");

    let mut processed = 0;
    let mut skipped = 0;
    let mut failed_keywords = Vec::new();

    for entry in &entries {
        match process_entry(store, searcher, extractor, summarizer, entry).await {
            Ok(true) => {
                processed += 1;
                tokio::time::sleep(config.pause).await;
            }
            Ok(false) => skipped += 1,
            Err(e) => {
                warn!(keyword = %entry.keyword, error = %e, "entry failed, continuing");
                failed_keywords.push(entry.keyword.clone());
            }
        }
    }

    Ok(RunReport {
        started_at,
        finished_at: Utc::now(),
        processed,
        skipped,
        failed: failed_keywords.len(),
        failed_keywords,
    })
}

/// Process one entry. Returns `Ok(true)` when a summary was written,
/// `Ok(false)` when the entry was skipped because no source yielded text.
async fn process_entry<S, W, E, A>(
    store: &S,
    searcher: &W,
    extractor: &E,
    summarizer: &A,
    entry: &KeywordEntry,
) -> Result<bool>
where
    S: KeywordStore,
    W: WebSearcher,
    E: TextExtractor,
    A: Summarizer,
{
    info!(keyword = %entry.keyword, "processing keyword");

    let links = searcher.search(&entry.keyword).await?;
    debug!(keyword = %entry.keyword, links = links.len(), "search returned links");

    let mut texts = Vec::new();
    for link in links.iter().filter(|l| !l.is_empty()) {
        match extractor.extract(link).await {
            Ok(text) if !text.is_empty() => texts.push(text),
            Ok(_) => debug!(url = %link, "page yielded no paragraph text"),
            Err(e) => debug!(url = %link, error = %e, "page fetch failed, contributes nothing"),
        }
    }

    if texts.is_empty() {
        info!(keyword = %entry.keyword, "no text extracted, leaving unprocessed");
        return Ok(false);
    }

    let combined = texts.join("\n");
    let summary = summarizer.summarize(&entry.keyword, &combined).await?;
    store.mark_summarized(&entry.id, &summary).await?;

    info!(keyword = %entry.keyword, "summary written");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::MockExtractor;
    use crate::search::MockSearcher;
    use crate::store::MockKeywordStore;
    use crate::summarize::MockSummarizer;

    fn zero_pause() -> PipelineConfig {
        PipelineConfig::new().with_pause(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_empty_database_is_a_clean_run() {
        let store = MockKeywordStore::new();
        let searcher = MockSearcher::new();
        let extractor = MockExtractor::new();
        let summarizer = MockSummarizer::new();

        let report = run(&store, &searcher, &extractor, &summarizer, &zero_pause())
            .await
            .unwrap();

        assert!(report.is_success());
        assert_eq!(report.processed, 0);
        assert_eq!(report.skipped, 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_run() {
        let store = MockKeywordStore::new().with_fetch_failure();
        let searcher = MockSearcher::new();
        let extractor = MockExtractor::new();
        let summarizer = MockSummarizer::new();

        let result = run(&store, &searcher, &extractor, &summarizer, &zero_pause()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_no_links_counts_as_skip() {
        let store = MockKeywordStore::new()
            .with_entries(vec![KeywordEntry::new("id-1", "未知語")]);
        // Searcher returns no links for the keyword.
        let searcher = MockSearcher::new();
        let extractor = MockExtractor::new();
        let summarizer = MockSummarizer::new();

        let report = run(&store, &searcher, &extractor, &summarizer, &zero_pause())
            .await
            .unwrap();

        assert_eq!(report.skipped, 1);
        assert!(store.marked().is_empty());
        assert!(summarizer.calls().is_empty());
    }
}
