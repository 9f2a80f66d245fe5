//! Per-item results of summarization and curation.

use serde::{Deserialize, Serialize};

use super::news::NewsItem;

/// How the final summary text was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryResolution {
    /// First draft already fit the bound
    Accepted,

    /// Corrective "shorten" call produced a fitting text
    Corrected,

    /// Hard truncation of the first draft
    Truncated,

    /// First generation call failed
    Failed,
}

/// Timing and size information about one summarization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetadata {
    pub processing_time_ms: u64,

    /// Original content length in characters
    pub original_length: usize,

    /// Final summary length in characters
    pub summary_length: usize,

    /// summary_length / original_length (0 when the original is empty)
    pub compression_ratio: f64,

    pub resolution: SummaryResolution,
}

impl SummaryMetadata {
    pub fn new(
        processing_time_ms: u64,
        original_length: usize,
        summary_length: usize,
        resolution: SummaryResolution,
    ) -> Self {
        Self {
            processing_time_ms,
            original_length,
            summary_length,
            compression_ratio: compression_ratio(summary_length, original_length),
            resolution,
        }
    }
}

/// Ratio of summary to original length, 0 for an empty original
pub fn compression_ratio(summary_length: usize, original_length: usize) -> f64 {
    if original_length == 0 {
        0.0
    } else {
        summary_length as f64 / original_length as f64
    }
}

/// Result of a summarization attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    /// Final summary text (empty on failure)
    pub summary: String,

    pub success: bool,

    /// Generation error message when `success` is false
    pub error: Option<String>,

    pub metadata: SummaryMetadata,
}

impl SummaryResult {
    pub fn succeeded(summary: String, metadata: SummaryMetadata) -> Self {
        Self {
            summary,
            success: true,
            error: None,
            metadata,
        }
    }

    pub fn failed(error: String, metadata: SummaryMetadata) -> Self {
        Self {
            summary: String::new(),
            success: false,
            error: Some(error),
            metadata,
        }
    }
}

/// Decision for a single item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CurationOutcome {
    /// Item passed every rule. `summary` is set only when a summary replaced the content.
    Approved {
        item: NewsItem,
        summary: Option<SummaryMetadata>,
    },

    /// Item failed at least one rule; reasons in evaluation order
    Rejected { item: NewsItem, reasons: Vec<String> },
}

impl CurationOutcome {
    /// Build the outcome implied by a reasons list: empty means approved
    pub fn from_reasons(item: NewsItem, reasons: Vec<String>) -> Self {
        if reasons.is_empty() {
            Self::Approved {
                item,
                summary: None,
            }
        } else {
            Self::Rejected { item, reasons }
        }
    }

    pub fn item(&self) -> &NewsItem {
        match self {
            Self::Approved { item, .. } | Self::Rejected { item, .. } => item,
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Approved { .. })
    }
}
