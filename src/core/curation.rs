//! Accept/reject decisions for news items.
//!
//! Rules are evaluated synchronously and in input order. Approved items with
//! long content are then summarized on a bounded pool of concurrent calls;
//! `buffered` keeps results in input order regardless of completion order.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, instrument, warn};

use crate::adapters::Generator;
use crate::domain::{CurationBatchReport, CurationOutcome, NewsItem, SUPPORTED_LANGUAGES};

use super::aggregator::aggregate_with_failures;
use super::settings::{ConfigError, CurationConfig};
use super::summarizer::SummaryGenerator;

/// An outcome plus whether a summary was attempted and failed
#[derive(Debug, Clone)]
struct Evaluation {
    outcome: CurationOutcome,
    summary_failed: bool,
}

/// Work left for an item after rule evaluation
enum Pending {
    Decided(Evaluation),
    Summarize(NewsItem),
}

/// Applies acceptance rules and summarization to news items
pub struct CurationEngine {
    summarizer: SummaryGenerator,
    config: CurationConfig,
}

impl CurationEngine {
    /// Create an engine around an injected generator
    ///
    /// Fails when `config` does not pass [`CurationConfig::validate`].
    pub fn new(generator: Arc<dyn Generator>, config: CurationConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            summarizer: SummaryGenerator::new(generator, config.clone())?,
            config,
        })
    }

    /// Evaluate every acceptance rule, returning all failure reasons
    pub fn check_rules(&self, item: &NewsItem) -> Vec<String> {
        let mut reasons = Vec::new();
        let threshold = self.config.relevance_threshold;

        // Negated so NaN fails the threshold too
        if !(item.relevance_score >= threshold) {
            reasons.push(format!(
                "insufficient score ({} < {})",
                item.relevance_score, threshold
            ));
        }

        if !item.has_supported_language() {
            reasons.push(format!("unsupported language ({})", item.language));
        }

        if !(0.0..=1.0).contains(&item.relevance_score) {
            reasons.push(format!(
                "relevance score out of range ({})",
                item.relevance_score
            ));
        }

        reasons
    }

    /// Whether an approved item is long enough to be summarized
    pub fn needs_summary(&self, item: &NewsItem) -> bool {
        item.content_len() > self.config.content_length_trigger
    }

    /// Curate a single item
    pub async fn evaluate(&self, item: NewsItem) -> CurationOutcome {
        match self.plan(item) {
            Pending::Decided(evaluation) => evaluation.outcome,
            Pending::Summarize(item) => self.summarize_approved(item).await.outcome,
        }
    }

    /// Curate a batch, returning outcomes in input order
    pub async fn curate(&self, items: Vec<NewsItem>) -> Vec<CurationOutcome> {
        self.run(items)
            .await
            .into_iter()
            .map(|evaluation| evaluation.outcome)
            .collect()
    }

    /// Curate a batch and fold it into a report
    #[instrument(skip(self, items), fields(items = items.len()))]
    pub async fn curate_batch(&self, items: Vec<NewsItem>) -> CurationBatchReport {
        let evaluations = self.run(items).await;
        let failures = evaluations.iter().filter(|e| e.summary_failed).count();
        let report = aggregate_with_failures(
            evaluations.into_iter().map(|e| e.outcome).collect(),
            failures,
        );

        info!(
            processed = report.total_processed,
            approved = report.total_approved,
            rejected = report.total_rejected,
            summarized = report.summaries_generated,
            summary_failures = report.summaries_failed,
            "Curation finished"
        );

        report
    }

    async fn run(&self, items: Vec<NewsItem>) -> Vec<Evaluation> {
        // Rules first, synchronously, so rejection never waits on the network
        let planned: Vec<Pending> = items.into_iter().map(|item| self.plan(item)).collect();

        stream::iter(planned)
            .map(|pending| async move {
                match pending {
                    Pending::Decided(evaluation) => evaluation,
                    Pending::Summarize(item) => self.summarize_approved(item).await,
                }
            })
            .buffered(self.config.max_concurrency.max(1))
            .collect()
            .await
    }

    fn plan(&self, item: NewsItem) -> Pending {
        let reasons = self.check_rules(&item);

        if !reasons.is_empty() {
            debug!(title = %item.title, ?reasons, "Item rejected");
            return Pending::Decided(Evaluation {
                outcome: CurationOutcome::Rejected { item, reasons },
                summary_failed: false,
            });
        }

        if self.needs_summary(&item) {
            Pending::Summarize(item)
        } else {
            Pending::Decided(Evaluation {
                outcome: CurationOutcome::from_reasons(item, reasons),
                summary_failed: false,
            })
        }
    }

    async fn summarize_approved(&self, item: NewsItem) -> Evaluation {
        let result = self.summarizer.summarize(&item).await;

        if result.success {
            Evaluation {
                outcome: CurationOutcome::Approved {
                    item: item.apply_summary(result.summary),
                    summary: Some(result.metadata),
                },
                summary_failed: false,
            }
        } else {
            warn!(
                title = %item.title,
                error = result.error.as_deref().unwrap_or("unknown"),
                "Keeping original content"
            );
            Evaluation {
                outcome: CurationOutcome::Approved {
                    item,
                    summary: None,
                },
                summary_failed: true,
            }
        }
    }
}

/// Human-readable list of accepted language codes
pub fn supported_languages() -> String {
    SUPPORTED_LANGUAGES.join(", ")
}
