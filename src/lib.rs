//! news-curator - Curation and summarization pipeline for news batches
//!
//! Loads a batch of news items, filters them by relevance score and
//! language, compresses long content into a bounded-length summary through a
//! language-generation backend, and stores the approved items in SQLite
//! with their categories.
//!
//! # Architecture
//!
//! - Acceptance rules are pure and evaluated in input order
//! - Summaries are bounded: one corrective retry, then hard truncation
//! - A failed summary never rejects an item; the original content is kept
//! - Backends (generator, source, sink) are injected behind traits
//!
//! # Modules
//!
//! - `adapters`: External integrations (Gemini, JSON source, SQLite sink, stub)
//! - `core`: Curation logic (CurationEngine, SummaryGenerator, aggregator)
//! - `domain`: Data structures (NewsItem, CurationOutcome, CurationBatchReport)
//! - `config`: Config file and environment resolution
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Curate a batch and store approved items
//! news-curator curate --input news.json
//!
//! # Report only
//! news-curator curate --input news.json --dry-run --json
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use crate::adapters::{GenerationError, Generator, NewsSink, NewsSource, StubGenerator};
pub use crate::core::{aggregate, CurationConfig, CurationEngine, Curator, SummaryGenerator};
pub use crate::domain::{CurationBatchReport, CurationOutcome, NewsItem, SummaryResult};
