//! Core curation logic.
//!
//! This module contains:
//! - Settings: Curation and summary limits
//! - Summarizer: Bounded summary generation with one corrective retry
//! - Curation: Acceptance rules and per-item decisions
//! - Aggregator: Batch report folding
//! - Orchestrator: Source -> curation -> sink runner

pub mod aggregator;
pub mod curation;
pub mod orchestrator;
pub mod settings;
pub mod summarizer;

// Re-export commonly used types
pub use aggregator::{aggregate, aggregate_with_failures};
pub use curation::{supported_languages, CurationEngine};
pub use orchestrator::{persist_report, Curator, PersistFailure, PersistSummary};
pub use settings::{ConfigError, CurationConfig};
pub use summarizer::{draft_prompt, shorten_prompt, truncate_with_ellipsis, SummaryGenerator};
