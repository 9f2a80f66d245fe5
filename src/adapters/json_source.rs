//! JSON file news source.
//!
//! Accepts either a top-level array of items or an object with a `news`
//! array. Field presence and non-emptiness are validated here so the
//! curation core can rely on them.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use super::{NewsSource, SourceError};
use crate::domain::NewsItem;

#[derive(Deserialize)]
#[serde(untagged)]
enum NewsDocument {
    List(Vec<NewsItem>),
    Wrapped { news: Vec<NewsItem> },
}

impl NewsDocument {
    fn into_items(self) -> Vec<NewsItem> {
        match self {
            Self::List(items) | Self::Wrapped { news: items } => items,
        }
    }
}

/// News source backed by a JSON file
pub struct JsonNewsSource {
    path: PathBuf,
}

impl JsonNewsSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parse and validate a JSON document
    pub fn parse(content: &str) -> Result<Vec<NewsItem>, SourceError> {
        let document: NewsDocument = serde_json::from_str(content)
            .map_err(|e| SourceError::InvalidFormat(e.to_string()))?;

        let items = document.into_items();
        for (index, item) in items.iter().enumerate() {
            validate_item(index, item)?;
        }

        Ok(items)
    }
}

fn validate_item(index: usize, item: &NewsItem) -> Result<(), SourceError> {
    let blank = |field: &str| {
        SourceError::InvalidFormat(format!("item {}: field '{}' is empty", index, field))
    };

    if item.title.trim().is_empty() {
        return Err(blank("title"));
    }
    if item.content.trim().is_empty() {
        return Err(blank("content"));
    }
    if item.source.trim().is_empty() {
        return Err(blank("source"));
    }
    if item.language.trim().is_empty() {
        return Err(blank("language"));
    }
    if item.categories.is_empty() {
        return Err(blank("categories"));
    }
    if item.categories.iter().any(|c| c.trim().is_empty()) {
        return Err(SourceError::InvalidFormat(format!(
            "item {}: categories contain an empty name",
            index
        )));
    }

    Ok(())
}

#[async_trait]
impl NewsSource for JsonNewsSource {
    async fn load_news(&self) -> Result<Vec<NewsItem>, SourceError> {
        debug!(path = %self.path.display(), "Loading news file");

        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            SourceError::SourceUnavailable(format!("{}: {}", self.path.display(), e))
        })?;

        let items = Self::parse(&content)?;
        info!(count = items.len(), "Loaded news items");

        Ok(items)
    }
}
