//! Pure Notion REST API client.
//!
//! A minimal client for the Notion API, covering the three operations the
//! research pipeline needs: querying a database by select property, appending
//! a paragraph block to a page, and updating a select property.
//!
//! # Example
//!
//! ```rust,ignore
//! use notion_client::{DatabaseQuery, NotionClient};
//!
//! let client = NotionClient::new("secret-token");
//!
//! let query = DatabaseQuery::select_equals("状態", "未処理");
//! let pages = client.query_database("database-id", &query).await?;
//! for page in &pages {
//!     println!("{:?}", page.title_text("ワード"));
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{NotionError, Result};
pub use types::{Block, DatabaseQuery, Page, UpdatePropertiesRequest};

use types::{AppendChildrenRequest, QueryResponse};

const BASE_URL: &str = "https://api.notion.com/v1";

/// API version pinned via the `Notion-Version` header on every request.
const NOTION_VERSION: &str = "2022-06-28";

pub struct NotionClient {
    client: reqwest::Client,
    token: String,
}

impl NotionClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: token.into(),
        }
    }

    /// Query a database, returning the pages matching the filter in the
    /// database's natural result order.
    pub async fn query_database(
        &self,
        database_id: &str,
        query: &DatabaseQuery,
    ) -> Result<Vec<Page>> {
        let url = format!("{}/databases/{}/query", BASE_URL, database_id);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(query)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NotionError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let response: QueryResponse = resp.json().await?;
        if response.has_more {
            // Only the first result batch is consumed; the rest stay pending
            // and are picked up by a later query.
            tracing::warn!(database_id, "database query truncated to first batch");
        }
        Ok(response.results)
    }

    /// Append one paragraph block of plain rich text to a page.
    pub async fn append_paragraph_block(&self, page_id: &str, text: &str) -> Result<()> {
        let payload = AppendChildrenRequest {
            children: vec![Block::paragraph(text)],
        };

        let url = format!("{}/blocks/{}/children", BASE_URL, page_id);
        let resp = self
            .client
            .patch(&url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NotionError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        tracing::debug!(page_id, "paragraph block appended");
        Ok(())
    }

    /// Set a select-type property of a page to a named option.
    pub async fn update_select_property(
        &self,
        page_id: &str,
        property: &str,
        option: &str,
    ) -> Result<()> {
        let payload = UpdatePropertiesRequest::select(property, option);

        let url = format!("{}/pages/{}", BASE_URL, page_id);
        let resp = self
            .client
            .patch(&url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NotionError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        tracing::debug!(page_id, property, option, "select property updated");
        Ok(())
    }
}
