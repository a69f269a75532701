//! Page text extraction.
//!
//! Given one search result link, resolves DuckDuckGo's redirect indirection
//! to the real target, fetches the page with a short timeout, and returns
//! the concatenated paragraph text capped at a fixed length. Extraction is
//! best-effort: any failure is a typed [`FetchError`] the caller degrades to
//! an empty contribution, never an abort.

use std::borrow::Cow;
use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use url::Url;

use crate::error::FetchError;

/// Scheme-relative prefix of DuckDuckGo's result redirect wrapper.
const REDIRECT_PREFIX: &str = "//duckduckgo.com/l/?";

/// Per-page fetch timeout.
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Cap on extracted text, in characters.
const MAX_CHARS: usize = 2000;

/// Text extraction trait.
///
/// # Implementations
///
/// - `PageExtractor` - fetches over HTTP and strips HTML
/// - `MockExtractor` - for testing
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract the paragraph text of the page behind `url`.
    async fn extract(&self, url: &str) -> std::result::Result<String, FetchError>;
}

/// HTTP-backed page text extractor.
pub struct PageExtractor {
    client: reqwest::Client,
    max_chars: usize,
}

impl Default for PageExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PageExtractor {
    /// Create a new extractor with the default timeout and length cap.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(FETCH_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
            max_chars: MAX_CHARS,
        }
    }

    /// Set a custom HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Set the extracted-text cap (characters).
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }
}

#[async_trait]
impl TextExtractor for PageExtractor {
    async fn extract(&self, url: &str) -> std::result::Result<String, FetchError> {
        let target = resolve_redirect(url);

        let response = self.client.get(target.as_ref()).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: target.to_string(),
                }
            } else if e.is_builder() {
                FetchError::InvalidUrl {
                    url: target.to_string(),
                }
            } else {
                FetchError::Network(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let html = response.text().await.map_err(FetchError::Network)?;
        Ok(paragraph_text(&html, self.max_chars))
    }
}

/// Resolve DuckDuckGo's redirect wrapper to the real target URL.
///
/// Result links come back as `//duckduckgo.com/l/?uddg=<pct-encoded-url>`
/// (sometimes with an explicit scheme). The embedded `uddg` parameter is the
/// percent-encoded target; anything else passes through unchanged.
pub fn resolve_redirect(url: &str) -> Cow<'_, str> {
    let stripped = url
        .strip_prefix("https:")
        .or_else(|| url.strip_prefix("http:"))
        .unwrap_or(url);

    if !stripped.starts_with(REDIRECT_PREFIX) {
        return Cow::Borrowed(url);
    }

    if let Ok(parsed) = Url::parse(&format!("https:{}", stripped)) {
        if let Some((_, target)) = parsed.query_pairs().find(|(key, _)| key == "uddg") {
            return Cow::Owned(target.into_owned());
        }
    }

    Cow::Borrowed(url)
}

/// Collect the text of all `<p>` elements, newline-joined, capped at
/// `max_chars` characters.
fn paragraph_text(html: &str, max_chars: usize) -> String {
    let document = Html::parse_document(html);
    let paragraphs = Selector::parse("p").unwrap();

    let text = document
        .select(&paragraphs)
        .map(|p| p.text().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n");

    truncate_chars(&text, max_chars)
}

/// Truncate to at most `max_chars` characters (not bytes), so multibyte
/// text is never split mid-codepoint.
fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Mock extractor for testing.
#[derive(Default)]
pub struct MockExtractor {
    texts: std::sync::RwLock<std::collections::HashMap<String, String>>,
    failures: std::sync::RwLock<std::collections::HashMap<String, u16>>,
}

impl MockExtractor {
    /// Create a new mock extractor. Unknown URLs yield empty text.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text returned for a URL.
    pub fn with_text(self, url: &str, text: &str) -> Self {
        self.texts
            .write()
            .unwrap()
            .insert(url.to_string(), text.to_string());
        self
    }

    /// Make a URL fail with the given HTTP status.
    pub fn with_failure(self, url: &str, status: u16) -> Self {
        self.failures
            .write()
            .unwrap()
            .insert(url.to_string(), status);
        self
    }
}

#[async_trait]
impl TextExtractor for MockExtractor {
    async fn extract(&self, url: &str) -> std::result::Result<String, FetchError> {
        if let Some(status) = self.failures.read().unwrap().get(url) {
            return Err(FetchError::Status { status: *status });
        }
        Ok(self
            .texts
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_redirect_decodes_target() {
        let wrapped = "//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com";
        assert_eq!(resolve_redirect(wrapped), "https://example.com");
    }

    #[test]
    fn test_resolve_redirect_with_scheme_and_extra_params() {
        let wrapped = "https://duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fpage%3Fa%3D1&rut=abcd";
        assert_eq!(resolve_redirect(wrapped), "https://example.com/page?a=1");
    }

    #[test]
    fn test_resolve_redirect_passthrough() {
        let direct = "https://example.com/article";
        assert_eq!(resolve_redirect(direct), direct);
    }

    #[test]
    fn test_resolve_redirect_missing_param() {
        let wrapped = "//duckduckgo.com/l/?other=value";
        assert_eq!(resolve_redirect(wrapped), wrapped);
    }

    #[test]
    fn test_paragraph_text_joins_with_newlines() {
        let html = r#"
            <html><body>
              <h1>Title</h1>
              <p>First paragraph.</p>
              <div><p>Second <b>paragraph</b>.</p></div>
              <script>ignored();</script>
            </body></html>
        "#;

        let text = paragraph_text(html, 2000);
        assert_eq!(text, "First paragraph.\nSecond paragraph.");
    }

    #[test]
    fn test_paragraph_text_respects_cap() {
        let html = format!("<p>{}</p>", "あ".repeat(3000));
        let text = paragraph_text(&html, 2000);
        assert_eq!(text.chars().count(), 2000);
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        let s = "日本語のテキスト";
        assert_eq!(truncate_chars(s, 4), "日本語の");
        assert_eq!(truncate_chars(s, 100), s);
        assert_eq!(truncate_chars(s, 0), "");
    }

    #[tokio::test]
    async fn test_mock_extractor() {
        let extractor = MockExtractor::new()
            .with_text("https://a.example.com/", "some text")
            .with_failure("https://b.example.com/", 500);

        assert_eq!(
            extractor.extract("https://a.example.com/").await.unwrap(),
            "some text"
        );
        assert!(extractor.extract("https://b.example.com/").await.is_err());
        assert_eq!(
            extractor.extract("https://unknown.example.com/").await.unwrap(),
            ""
        );
    }
}
