//! Folds per-item outcomes into a batch report.

use crate::domain::{CurationBatchReport, CurationOutcome, RejectedItem};

/// Partition outcomes into approved and rejected, preserving input order
pub fn aggregate(outcomes: Vec<CurationOutcome>) -> CurationBatchReport {
    aggregate_with_failures(outcomes, 0)
}

/// Same as [`aggregate`], recording how many summarizations failed
pub fn aggregate_with_failures(
    outcomes: Vec<CurationOutcome>,
    summaries_failed: usize,
) -> CurationBatchReport {
    let mut report = CurationBatchReport::empty();

    for outcome in outcomes {
        match outcome {
            CurationOutcome::Approved { item, summary } => {
                if summary.is_some() {
                    report.summaries_generated += 1;
                }
                report.approved_items.push(item);
            }
            CurationOutcome::Rejected { item, reasons } => {
                report.rejected_items.push(RejectedItem { item, reasons });
            }
        }
    }

    report.total_approved = report.approved_items.len();
    report.total_rejected = report.rejected_items.len();
    report.total_processed = report.total_approved + report.total_rejected;
    report.summaries_failed = summaries_failed;

    report
}
