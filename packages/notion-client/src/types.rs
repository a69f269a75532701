//! Notion API request and response types.
//!
//! Only the slices of the Notion object model the pipeline touches are
//! modeled: select-filtered database queries, title properties, paragraph
//! blocks, and select-property updates.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// =============================================================================
// Database query
// =============================================================================

/// Body for a database query request.
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseQuery {
    pub filter: PropertyFilter,
}

impl DatabaseQuery {
    /// Filter on a select property equal to a named option.
    pub fn select_equals(property: impl Into<String>, option: impl Into<String>) -> Self {
        Self {
            filter: PropertyFilter {
                property: property.into(),
                select: SelectEquals {
                    equals: option.into(),
                },
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertyFilter {
    pub property: String,
    pub select: SelectEquals,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectEquals {
    pub equals: String,
}

/// Response envelope for a database query.
#[derive(Debug, Deserialize)]
pub(crate) struct QueryResponse {
    pub results: Vec<Page>,
    #[serde(default)]
    pub has_more: bool,
}

/// A page returned from a database query.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub properties: HashMap<String, PropertyValue>,
}

impl Page {
    /// Plain text of the first rich text element of a title property,
    /// if the property exists and is a non-empty title.
    pub fn title_text(&self, property: &str) -> Option<&str> {
        let first = self.properties.get(property)?.title.as_ref()?.first()?;
        match &first.text {
            Some(text) => Some(text.content.as_str()),
            None => first.plain_text.as_deref(),
        }
    }
}

/// A property value on a page. Only title payloads are decoded; every other
/// property type deserializes with `title: None`.
#[derive(Debug, Clone, Deserialize)]
pub struct PropertyValue {
    #[serde(default)]
    pub title: Option<Vec<RichText>>,
}

/// One rich text element as returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct RichText {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub text: Option<TextContent>,
    #[serde(default)]
    pub plain_text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextContent {
    pub content: String,
}

// =============================================================================
// Block append
// =============================================================================

/// Body for appending children to a block.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct AppendChildrenRequest {
    pub children: Vec<Block>,
}

/// A block to append. Only paragraph blocks are constructed.
#[derive(Debug, Clone, Serialize)]
pub struct Block {
    pub object: String,
    #[serde(rename = "type")]
    pub block_type: String,
    pub paragraph: Paragraph,
}

impl Block {
    /// A paragraph block holding one plain rich text run.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            object: "block".to_string(),
            block_type: "paragraph".to_string(),
            paragraph: Paragraph {
                rich_text: vec![RichTextInput {
                    kind: "text".to_string(),
                    text: TextContent {
                        content: text.into(),
                    },
                }],
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Paragraph {
    pub rich_text: Vec<RichTextInput>,
}

/// One rich text element in a write payload.
#[derive(Debug, Clone, Serialize)]
pub struct RichTextInput {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: TextContent,
}

// =============================================================================
// Property update
// =============================================================================

/// Body for a page properties update.
#[derive(Debug, Clone, Serialize)]
pub struct UpdatePropertiesRequest {
    pub properties: HashMap<String, PropertyUpdate>,
}

impl UpdatePropertiesRequest {
    /// Set one select property to a named option.
    pub fn select(property: impl Into<String>, option: impl Into<String>) -> Self {
        let mut properties = HashMap::new();
        properties.insert(
            property.into(),
            PropertyUpdate {
                select: SelectOption {
                    name: option.into(),
                },
            },
        );
        Self { properties }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertyUpdate {
    pub select: SelectOption,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectOption {
    pub name: String,
}
