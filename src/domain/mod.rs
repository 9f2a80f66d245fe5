//! Domain types for the news curator.
//!
//! This module contains the core data structures:
//! - NewsItem: A single item loaded from the source
//! - CurationOutcome / SummaryResult: Per-item results
//! - CurationBatchReport: Aggregated batch result

pub mod news;
pub mod outcome;
pub mod report;

// Re-export commonly used types
pub use news::{NewsItem, SUPPORTED_LANGUAGES};
pub use outcome::{
    compression_ratio, CurationOutcome, SummaryMetadata, SummaryResolution, SummaryResult,
};
pub use report::{CurationBatchReport, RejectedItem};
