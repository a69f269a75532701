//! Keyword summarization via the Groq chat-completion API.
//!
//! The prompt is fixed: a system instruction embedding the keyword and a
//! five-section bulleted output template, with the extracted web text as the
//! user message.

use async_trait::async_trait;
use groq_client::{ChatRequest, GroqClient, Message};
use tracing::debug;

use crate::error::Result;

/// Default model for summarization.
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Sampling temperature for every summarization call.
const TEMPERATURE: f32 = 0.7;

/// Summarization trait.
///
/// # Implementations
///
/// - `GroqSummarizer` - real LLM calls
/// - `MockSummarizer` - for testing
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize the extracted text for a keyword.
    async fn summarize(&self, keyword: &str, text: &str) -> Result<String>;
}

/// Groq-backed summarizer.
pub struct GroqSummarizer {
    client: GroqClient,
    model: String,
}

impl GroqSummarizer {
    /// Create a new summarizer with the given model.
    pub fn new(client: GroqClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Create a new summarizer with the default model.
    pub fn with_default_model(client: GroqClient) -> Self {
        Self::new(client, DEFAULT_MODEL)
    }
}

/// System instruction: explain the keyword for a general audience, in five
/// labeled bullet sections, around 200 characters.
fn system_prompt(keyword: &str) -> String {
    format!(
        "次の文章は、{}という言葉の説明文です。\n\
         これを子どもやお年寄りにも分かりやすく、箇条書きで、200文字程度で、次の形式で出力してください。\n\
         ・これは何か（改行して本文開始）\n\
         ・なぜそれが必要か（改行して本文開始）\n\
         ・どのように実現するか（改行して本文開始）\n\
         ・理解を深めるための補足情報（改行して本文開始）\n\
         ・関連ワード",
        keyword
    )
}

#[async_trait]
impl Summarizer for GroqSummarizer {
    async fn summarize(&self, keyword: &str, text: &str) -> Result<String> {
        let request = ChatRequest::new(&self.model)
            .message(Message::system(system_prompt(keyword)))
            .message(Message::user(text))
            .temperature(TEMPERATURE);

        let response = self.client.chat_completion(request).await?;
        debug!(keyword, chars = response.content.chars().count(), "summary generated");
        Ok(response.content)
    }
}

/// Mock summarizer for testing.
///
/// Returns a canned summary and records every call for assertions.
#[derive(Default)]
pub struct MockSummarizer {
    summaries: std::sync::RwLock<std::collections::HashMap<String, String>>,
    failing: std::sync::RwLock<std::collections::HashSet<String>>,
    calls: std::sync::RwLock<Vec<(String, String)>>,
}

impl MockSummarizer {
    /// Create a new mock summarizer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the summary returned for a keyword.
    pub fn with_summary(self, keyword: &str, summary: &str) -> Self {
        self.summaries
            .write()
            .unwrap()
            .insert(keyword.to_string(), summary.to_string());
        self
    }

    /// Make summarization fail for a keyword.
    pub fn with_failure(self, keyword: &str) -> Self {
        self.failing.write().unwrap().insert(keyword.to_string());
        self
    }

    /// Calls made so far, as (keyword, text) pairs.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, keyword: &str, text: &str) -> Result<String> {
        self.calls
            .write()
            .unwrap()
            .push((keyword.to_string(), text.to_string()));

        if self.failing.read().unwrap().contains(keyword) {
            return Err(groq_client::GroqError::Api("mock failure".into()).into());
        }

        Ok(self
            .summaries
            .read()
            .unwrap()
            .get(keyword)
            .cloned()
            .unwrap_or_else(|| format!("summary of {}", keyword)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_embeds_keyword_and_sections() {
        let prompt = system_prompt("量子コンピュータ");

        assert!(prompt.contains("量子コンピュータという言葉"));
        assert!(prompt.contains("・これは何か"));
        assert!(prompt.contains("・なぜそれが必要か"));
        assert!(prompt.contains("・どのように実現するか"));
        assert!(prompt.contains("・理解を深めるための補足情報"));
        assert!(prompt.contains("・関連ワード"));
    }

    #[tokio::test]
    async fn test_mock_summarizer_records_calls() {
        let summarizer = MockSummarizer::new().with_summary("rust", "・これは何か\nsummary");

        let summary = summarizer.summarize("rust", "extracted text").await.unwrap();
        assert_eq!(summary, "・これは何か\nsummary");

        let calls = summarizer.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], ("rust".to_string(), "extracted text".to_string()));
    }

    #[tokio::test]
    async fn test_mock_summarizer_failure() {
        let summarizer = MockSummarizer::new().with_failure("rust");
        assert!(summarizer.summarize("rust", "text").await.is_err());
    }
}
