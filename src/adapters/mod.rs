//! Adapter interfaces for external systems.
//!
//! Adapters provide a unified interface for the collaborators around the
//! curation core: the language-generation backend, the news source and the
//! persistence sink. The core only ever sees the traits.

pub mod gemini;
pub mod json_source;
pub mod sqlite_sink;
pub mod stub;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::NewsItem;

pub use gemini::{GeminiConfig, GeminiGenerator};
pub use json_source::JsonNewsSource;
pub use sqlite_sink::SqliteSink;
pub use stub::StubGenerator;

/// Errors from a language-generation backend
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GenerationError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Generation API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed generation response: {0}")]
    MalformedResponse(String),

    #[error("Generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Generation backend unavailable: {0}")]
    Unavailable(String),
}

/// Trait for language-generation backends
#[async_trait]
pub trait Generator: Send + Sync {
    /// Human-readable backend name
    fn name(&self) -> &str;

    /// Generate text for a prompt
    async fn generate_content(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Errors from a news source
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("News source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Invalid news format: {0}")]
    InvalidFormat(String),
}

/// Trait for news sources
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Load one batch of items, in source order
    async fn load_news(&self) -> Result<Vec<NewsItem>, SourceError>;
}

/// Row id assigned by the sink
pub type PersistedId = i64;

/// Errors from a persistence sink
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Invalid item: {0}")]
    InvalidItem(String),
}

/// Trait for persistence sinks
pub trait NewsSink {
    /// Insert a news row (without categories)
    fn insert_news(&mut self, item: &NewsItem) -> Result<PersistedId, SinkError>;

    /// Insert a category by exact name, returning the existing id if present
    fn insert_category(&mut self, name: &str) -> Result<PersistedId, SinkError>;

    /// Insert an item and associate all of its categories atomically
    fn persist(&mut self, item: &NewsItem) -> Result<PersistedId, SinkError>;
}
