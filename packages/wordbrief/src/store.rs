//! Keyword store: where pending keywords come from and results go back.
//!
//! The Notion database is the system of record. The trait seam keeps the
//! pipeline testable without network access, and the Notion implementation
//! is the only place that knows property names.

use async_trait::async_trait;
use notion_client::{DatabaseQuery, NotionClient};
use tracing::warn;

use crate::error::Result;

/// A pending keyword entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordEntry {
    /// Opaque page identifier assigned by the database.
    pub id: String,

    /// The keyword to research.
    pub keyword: String,
}

impl KeywordEntry {
    pub fn new(id: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            keyword: keyword.into(),
        }
    }
}

/// Store of keyword entries.
///
/// `mark_summarized` is all-or-nothing: the entry only counts as processed
/// when both the summary block and the status flip succeeded. A partial
/// write leaves the entry pending for a future run.
#[async_trait]
pub trait KeywordStore: Send + Sync {
    /// Fetch all unprocessed entries, in the store's natural order.
    async fn fetch_unprocessed(&self) -> Result<Vec<KeywordEntry>>;

    /// Append the summary to the entry and flip its status to summarized.
    async fn mark_summarized(&self, id: &str, summary: &str) -> Result<()>;
}

/// Property and option names of the keyword database.
#[derive(Debug, Clone)]
pub struct NotionProperties {
    /// Select property holding the processing status.
    pub status_property: String,

    /// Option name for entries waiting to be processed.
    pub unprocessed_option: String,

    /// Option name for processed entries.
    pub summarized_option: String,

    /// Title property holding the keyword.
    pub keyword_property: String,
}

impl Default for NotionProperties {
    fn default() -> Self {
        Self {
            status_property: "状態".to_string(),
            unprocessed_option: "未処理".to_string(),
            summarized_option: "要約済み".to_string(),
            keyword_property: "ワード".to_string(),
        }
    }
}

/// Notion-backed keyword store.
pub struct NotionKeywordStore {
    client: NotionClient,
    database_id: String,
    properties: NotionProperties,
}

impl NotionKeywordStore {
    /// Create a store over a database with the default property names.
    pub fn new(client: NotionClient, database_id: impl Into<String>) -> Self {
        Self {
            client,
            database_id: database_id.into(),
            properties: NotionProperties::default(),
        }
    }

    /// Override the property names.
    pub fn with_properties(mut self, properties: NotionProperties) -> Self {
        self.properties = properties;
        self
    }
}

#[async_trait]
impl KeywordStore for NotionKeywordStore {
    async fn fetch_unprocessed(&self) -> Result<Vec<KeywordEntry>> {
        let query = DatabaseQuery::select_equals(
            &self.properties.status_property,
            &self.properties.unprocessed_option,
        );
        let pages = self.client.query_database(&self.database_id, &query).await?;

        let mut entries = Vec::with_capacity(pages.len());
        for page in pages {
            let keyword = page
                .title_text(&self.properties.keyword_property)
                .map(str::to_string);
            match keyword {
                Some(keyword) if !keyword.is_empty() => {
                    entries.push(KeywordEntry::new(page.id, keyword));
                }
                _ => warn!(page_id = %page.id, "page has no keyword title, skipping"),
            }
        }
        Ok(entries)
    }

    async fn mark_summarized(&self, id: &str, summary: &str) -> Result<()> {
        self.client.append_paragraph_block(id, summary).await?;
        self.client
            .update_select_property(
                id,
                &self.properties.status_property,
                &self.properties.summarized_option,
            )
            .await?;
        Ok(())
    }
}

/// Mock keyword store for testing.
///
/// Serves a preset entry list and records `mark_summarized` calls.
#[derive(Default)]
pub struct MockKeywordStore {
    entries: Vec<KeywordEntry>,
    fail_fetch: bool,
    fail_mark: std::sync::RwLock<std::collections::HashSet<String>>,
    marked: std::sync::RwLock<Vec<(String, String)>>,
}

impl MockKeywordStore {
    /// Create an empty mock store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset the unprocessed entries.
    pub fn with_entries(mut self, entries: Vec<KeywordEntry>) -> Self {
        self.entries = entries;
        self
    }

    /// Make `fetch_unprocessed` fail.
    pub fn with_fetch_failure(mut self) -> Self {
        self.fail_fetch = true;
        self
    }

    /// Make `mark_summarized` fail for an entry id.
    pub fn with_mark_failure(self, id: &str) -> Self {
        self.fail_mark.write().unwrap().insert(id.to_string());
        self
    }

    /// Recorded `mark_summarized` calls, as (id, summary) pairs.
    pub fn marked(&self) -> Vec<(String, String)> {
        self.marked.read().unwrap().clone()
    }
}

#[async_trait]
impl KeywordStore for MockKeywordStore {
    async fn fetch_unprocessed(&self) -> Result<Vec<KeywordEntry>> {
        if self.fail_fetch {
            return Err(notion_client::NotionError::Api {
                status: 500,
                message: "mock failure".to_string(),
            }
            .into());
        }
        Ok(self.entries.clone())
    }

    async fn mark_summarized(&self, id: &str, summary: &str) -> Result<()> {
        if self.fail_mark.read().unwrap().contains(id) {
            return Err(notion_client::NotionError::Api {
                status: 500,
                message: "mock failure".to_string(),
            }
            .into());
        }
        self.marked
            .write()
            .unwrap()
            .push((id.to_string(), summary.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_properties() {
        let props = NotionProperties::default();
        assert_eq!(props.status_property, "状態");
        assert_eq!(props.unprocessed_option, "未処理");
        assert_eq!(props.summarized_option, "要約済み");
        assert_eq!(props.keyword_property, "ワード");
    }

    #[tokio::test]
    async fn test_mock_store_records_marks() {
        let store = MockKeywordStore::new()
            .with_entries(vec![KeywordEntry::new("id-1", "量子コンピュータ")]);

        let entries = store.fetch_unprocessed().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].keyword, "量子コンピュータ");

        store.mark_summarized("id-1", "summary").await.unwrap();
        assert_eq!(
            store.marked(),
            vec![("id-1".to_string(), "summary".to_string())]
        );
    }

    #[tokio::test]
    async fn test_mock_store_failures() {
        let store = MockKeywordStore::new().with_fetch_failure();
        assert!(store.fetch_unprocessed().await.is_err());

        let store = MockKeywordStore::new().with_mark_failure("id-1");
        assert!(store.mark_summarized("id-1", "summary").await.is_err());
        assert!(store.marked().is_empty());
    }
}
