//! Batch runner.
//!
//! Loads one batch from a source, curates it and hands the approved items
//! to a sink. Source and sink calls are not retried; a failing insert is
//! recorded and the remaining items are still persisted.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{error, info, instrument};

use crate::adapters::{NewsSink, NewsSource, PersistedId};
use crate::domain::CurationBatchReport;

use super::curation::CurationEngine;

/// An approved item the sink refused
#[derive(Debug, Clone, Serialize)]
pub struct PersistFailure {
    pub title: String,
    pub error: String,
}

/// Result of handing a report to a sink
#[derive(Debug, Clone, Default, Serialize)]
pub struct PersistSummary {
    /// Row ids of stored items, in report order
    pub persisted: Vec<PersistedId>,

    pub failures: Vec<PersistFailure>,
}

/// Runs source -> curation for one batch
pub struct Curator {
    engine: CurationEngine,
}

impl Curator {
    pub fn new(engine: CurationEngine) -> Self {
        Self { engine }
    }

    /// Load and curate one batch
    #[instrument(skip(self, source))]
    pub async fn run(&self, source: &dyn NewsSource) -> Result<CurationBatchReport> {
        let items = source
            .load_news()
            .await
            .context("Failed to load news batch")?;

        info!(count = items.len(), "Curating batch");
        Ok(self.engine.curate_batch(items).await)
    }
}

/// Store every approved item with its categories
pub fn persist_report(report: &CurationBatchReport, sink: &mut dyn NewsSink) -> PersistSummary {
    let mut summary = PersistSummary::default();

    for item in &report.approved_items {
        match sink.persist(item) {
            Ok(id) => summary.persisted.push(id),
            Err(e) => {
                error!(title = %item.title, error = %e, "Failed to persist item");
                summary.failures.push(PersistFailure {
                    title: item.title.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    info!(
        persisted = summary.persisted.len(),
        failed = summary.failures.len(),
        "Persistence finished"
    );

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{SinkError, SqliteSink};
    use crate::domain::NewsItem;

    /// Sink that refuses items with a given title
    struct PickySink {
        inner: SqliteSink,
        refuse: &'static str,
    }

    impl NewsSink for PickySink {
        fn insert_news(&mut self, item: &NewsItem) -> Result<PersistedId, SinkError> {
            self.inner.insert_news(item)
        }

        fn insert_category(&mut self, name: &str) -> Result<PersistedId, SinkError> {
            self.inner.insert_category(name)
        }

        fn persist(&mut self, item: &NewsItem) -> Result<PersistedId, SinkError> {
            if item.title == self.refuse {
                return Err(SinkError::InvalidItem("refused".to_string()));
            }
            self.inner.persist(item)
        }
    }

    #[test]
    fn test_sink_failure_does_not_stop_batch() {
        let items: Vec<NewsItem> = ["a", "b", "c"]
            .iter()
            .map(|t| NewsItem::new(*t, "c", "s", vec!["x".to_string()], 0.9, "EN"))
            .collect();
        let report = CurationBatchReport {
            total_processed: 3,
            total_approved: 3,
            approved_items: items,
            ..CurationBatchReport::empty()
        };

        let mut sink = PickySink {
            inner: SqliteSink::open_in_memory().unwrap(),
            refuse: "b",
        };
        let summary = persist_report(&report, &mut sink);

        assert_eq!(summary.persisted.len(), 2);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].title, "b");
        assert_eq!(sink.inner.news_count().unwrap(), 2);
    }
}
