//! Web search for keyword research.
//!
//! Searches the DuckDuckGo HTML endpoint (scraped, not a structured API) and
//! returns the top result links in page order. The query is the keyword
//! suffixed with a fixed disambiguation term so definitional pages rank
//! first.

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::debug;

use crate::error::{Result, SearchError};

/// Fixed suffix appended to every query: "とは" ("what is").
const QUERY_SUFFIX: &str = "とは";

const SEARCH_URL: &str = "https://html.duckduckgo.com/html/";

/// Web search trait for link discovery.
///
/// # Implementations
///
/// - `DuckDuckGoSearcher` - scrapes the DuckDuckGo HTML endpoint
/// - `MockSearcher` - for testing
#[async_trait]
pub trait WebSearcher: Send + Sync {
    /// Search the web for the keyword, returning result links in page order.
    async fn search(&self, keyword: &str) -> Result<Vec<String>>;
}

/// DuckDuckGo-backed searcher.
///
/// Fetches the first results page only and keeps at most `max_results`
/// links. The returned hrefs may still be wrapped in DuckDuckGo's redirect
/// indirection; resolving that is the extractor's job.
pub struct DuckDuckGoSearcher {
    client: reqwest::Client,
    user_agent: String,
    max_results: usize,
}

impl Default for DuckDuckGoSearcher {
    fn default() -> Self {
        Self::new()
    }
}

impl DuckDuckGoSearcher {
    /// Create a new searcher with default settings (top 3 links).
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            user_agent: "Mozilla/5.0".to_string(),
            max_results: 3,
        }
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the maximum number of links to return.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

#[async_trait]
impl WebSearcher for DuckDuckGoSearcher {
    async fn search(&self, keyword: &str) -> Result<Vec<String>> {
        let query = format!("{}{}", keyword, QUERY_SUFFIX);
        let url = format!("{}?q={}", SEARCH_URL, urlencoding::encode(&query));

        let response = self
            .client
            .get(&url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(SearchError::Http)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status {
                status: status.as_u16(),
            }
            .into());
        }

        let html = response.text().await.map_err(SearchError::Http)?;
        let links = parse_result_links(&html, self.max_results);
        debug!(keyword, links = links.len(), "search page parsed");
        Ok(links)
    }
}

/// Extract result links from a DuckDuckGo HTML results page.
///
/// Result anchors carry the `result__a` class; hrefs are returned verbatim,
/// in page order, truncated to `limit`.
fn parse_result_links(html: &str, limit: usize) -> Vec<String> {
    let document = Html::parse_document(html);
    let anchors = Selector::parse("a.result__a").unwrap();

    document
        .select(&anchors)
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .take(limit)
        .collect()
}

/// Mock searcher for testing.
#[derive(Default)]
pub struct MockSearcher {
    results: std::sync::RwLock<std::collections::HashMap<String, Vec<String>>>,
}

impl MockSearcher {
    /// Create a new mock searcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add result links for a keyword.
    pub fn with_links(self, keyword: &str, links: &[&str]) -> Self {
        self.results
            .write()
            .unwrap()
            .insert(keyword.to_string(), links.iter().map(|l| l.to_string()).collect());
        self
    }
}

#[async_trait]
impl WebSearcher for MockSearcher {
    async fn search(&self, keyword: &str) -> Result<Vec<String>> {
        Ok(self
            .results
            .read()
            .unwrap()
            .get(keyword)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS_PAGE: &str = r#"
        <html><body>
          <div class="result">
            <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fa.example.com%2F">A</a>
            <a class="result__snippet" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fa.example.com%2F">snippet</a>
          </div>
          <div class="result">
            <a class="result__a" href="https://b.example.com/page">B</a>
          </div>
          <div class="result">
            <a class="result__a" href="https://c.example.com/">C</a>
          </div>
          <div class="result">
            <a class="result__a" href="https://d.example.com/">D</a>
          </div>
          <a href="https://nav.example.com/">not a result</a>
        </body></html>
    "#;

    #[test]
    fn test_parse_result_links_order_and_limit() {
        let links = parse_result_links(RESULTS_PAGE, 3);

        assert_eq!(
            links,
            vec![
                "//duckduckgo.com/l/?uddg=https%3A%2F%2Fa.example.com%2F",
                "https://b.example.com/page",
                "https://c.example.com/",
            ]
        );
    }

    #[test]
    fn test_parse_result_links_ignores_other_anchors() {
        let links = parse_result_links(RESULTS_PAGE, 10);

        assert_eq!(links.len(), 4);
        assert!(!links.iter().any(|l| l.contains("nav.example.com")));
        assert!(!links.iter().any(|l| l.contains("snippet")));
    }

    #[test]
    fn test_parse_result_links_empty_page() {
        assert!(parse_result_links("<html><body></body></html>", 3).is_empty());
    }

    #[tokio::test]
    async fn test_mock_searcher() {
        let searcher = MockSearcher::new().with_links(
            "量子コンピュータ",
            &["https://a.example.com/", "https://b.example.com/"],
        );

        let links = searcher.search("量子コンピュータ").await.unwrap();
        assert_eq!(links.len(), 2);

        let none = searcher.search("unknown").await.unwrap();
        assert!(none.is_empty());
    }
}
