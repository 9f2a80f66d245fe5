//! Aggregated outcome of curating one batch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::news::NewsItem;

/// A rejected item together with every rule it failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedItem {
    pub item: NewsItem,
    pub reasons: Vec<String>,
}

/// Batch report consumed by persistence and by the operator-facing output.
///
/// Invariant: `total_processed == total_approved + total_rejected
/// == approved_items.len() + rejected_items.len()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurationBatchReport {
    /// Identifier of the curation run that produced this report
    pub run_id: Uuid,

    pub generated_at: DateTime<Utc>,

    /// Approved items in input order, content possibly replaced by a summary
    pub approved_items: Vec<NewsItem>,

    /// Rejected items in input order
    pub rejected_items: Vec<RejectedItem>,

    pub total_processed: usize,
    pub total_approved: usize,
    pub total_rejected: usize,

    /// Approved items whose content was replaced by a summary
    pub summaries_generated: usize,

    /// Approved items whose summarization failed (original content kept)
    pub summaries_failed: usize,
}

impl CurationBatchReport {
    /// Create an empty report for a new run
    pub fn empty() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            approved_items: Vec::new(),
            rejected_items: Vec::new(),
            total_processed: 0,
            total_approved: 0,
            total_rejected: 0,
            summaries_generated: 0,
            summaries_failed: 0,
        }
    }

    /// Share of attempted summarizations that failed (0 when none were attempted)
    pub fn summary_failure_rate(&self) -> f64 {
        let attempted = self.summaries_generated + self.summaries_failed;
        if attempted == 0 {
            0.0
        } else {
            self.summaries_failed as f64 / attempted as f64
        }
    }

    /// Check the count invariant
    pub fn is_consistent(&self) -> bool {
        self.total_processed == self.total_approved + self.total_rejected
            && self.total_approved == self.approved_items.len()
            && self.total_rejected == self.rejected_items.len()
    }

    /// Distinct category names across approved items, first-seen order
    pub fn approved_categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for item in &self.approved_items {
            for category in &item.categories {
                if !seen.contains(&category.as_str()) {
                    seen.push(category);
                }
            }
        }
        seen
    }
}
