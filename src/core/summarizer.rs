//! Length-bounded summary generation.
//!
//! Each summary walks a small state machine:
//!
//! ```text
//! Draft ──fits──────────────────────────────▶ Accepted
//!   │
//!   └─too long─▶ CorrectiveRetry ──fits─────▶ Corrected
//!                      │
//!                      └─too long / error───▶ Truncated (first draft)
//! ```
//!
//! At most two generation calls are made per item. Only a failure of the
//! first call fails the summary; everything after it degrades to truncation.

use std::sync::Arc;
use std::time::Instant;

use tokio::time::timeout;
use tracing::{debug, instrument, warn};

use crate::adapters::{GenerationError, Generator};
use crate::domain::{NewsItem, SummaryMetadata, SummaryResolution, SummaryResult};

use super::settings::{ConfigError, CurationConfig};

const ELLIPSIS: &str = "...";

/// Where a summary currently is in its lifecycle
#[derive(Debug)]
enum Stage {
    Draft,
    CorrectiveRetry { draft: String },
    Done {
        text: String,
        resolution: SummaryResolution,
    },
}

/// Generates bounded summaries through an injected generator
pub struct SummaryGenerator {
    generator: Arc<dyn Generator>,
    config: CurationConfig,
}

impl SummaryGenerator {
    pub fn new(generator: Arc<dyn Generator>, config: CurationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { generator, config })
    }

    pub fn max_length(&self) -> usize {
        self.config.summary_max_length
    }

    /// Summarize an item's content to at most `summary_max_length` characters
    #[instrument(skip(self, item), fields(title = %item.title))]
    pub async fn summarize(&self, item: &NewsItem) -> SummaryResult {
        let started = Instant::now();
        let original_length = item.content_len();
        let max = self.max_length();

        let mut stage = Stage::Draft;
        let (summary, resolution) = loop {
            stage = match stage {
                Stage::Draft => {
                    let prompt = draft_prompt(&item.title, &item.content, max);
                    match self.call(&prompt).await.and_then(non_empty) {
                        Ok(draft) if char_len(&draft) <= max => Stage::Done {
                            text: draft,
                            resolution: SummaryResolution::Accepted,
                        },
                        Ok(draft) => {
                            debug!(draft_chars = char_len(&draft), max, "Draft too long, asking to shorten");
                            Stage::CorrectiveRetry { draft }
                        }
                        Err(e) => {
                            warn!(error = %e, "Summary generation failed");
                            let metadata = SummaryMetadata::new(
                                elapsed_ms(started),
                                original_length,
                                0,
                                SummaryResolution::Failed,
                            );
                            return SummaryResult::failed(e.to_string(), metadata);
                        }
                    }
                }

                Stage::CorrectiveRetry { draft } => {
                    let prompt = shorten_prompt(&item.title, &draft, max);
                    let corrected = match self.call(&prompt).await {
                        Ok(text) => Some(text.trim().to_string()),
                        Err(e) => {
                            warn!(error = %e, "Corrective call failed, truncating draft");
                            None
                        }
                    };

                    match corrected {
                        Some(text) if !text.is_empty() && char_len(&text) <= max => Stage::Done {
                            text,
                            resolution: SummaryResolution::Corrected,
                        },
                        _ => Stage::Done {
                            text: truncate_with_ellipsis(&draft, max),
                            resolution: SummaryResolution::Truncated,
                        },
                    }
                }

                Stage::Done { text, resolution } => break (text, resolution),
            };
        };

        let metadata = SummaryMetadata::new(
            elapsed_ms(started),
            original_length,
            char_len(&summary),
            resolution,
        );
        debug!(
            summary_chars = metadata.summary_length,
            ratio = metadata.compression_ratio,
            ?resolution,
            "Summary ready"
        );

        SummaryResult::succeeded(summary, metadata)
    }

    /// One generation call with the configured delay and timeout
    async fn call(&self, prompt: &str) -> Result<String, GenerationError> {
        let delay = self.config.call_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let limit = self.config.generation_timeout();
        match timeout(limit, self.generator.generate_content(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(GenerationError::Timeout(limit)),
        }
    }
}

/// Prompt for the first summary attempt
pub fn draft_prompt(title: &str, content: &str, max_length: usize) -> String {
    format!(
        "Summarize the news article below in a single paragraph.\n\
         \n\
         RULES:\n\
         1. The summary MUST have at most {max} characters, including spaces.\n\
         2. Keep the language of the original article.\n\
         3. Use only facts stated in the article.\n\
         4. Reply with the summary text only.\n\
         \n\
         Title: {title}\n\
         \n\
         Article:\n\
         {content}",
        max = max_length,
        title = title,
        content = content,
    )
}

/// Prompt asking to shorten an oversized draft
pub fn shorten_prompt(title: &str, oversized: &str, max_length: usize) -> String {
    format!(
        "The summary below has {len} characters, which is longer than the limit.\n\
         Rewrite it with at most {max} characters, including spaces, keeping the key facts.\n\
         Reply with the shortened text only.\n\
         \n\
         Title: {title}\n\
         \n\
         Summary:\n\
         {oversized}",
        len = char_len(oversized),
        max = max_length,
        title = title,
        oversized = oversized,
    )
}

/// Keep the first `max_length - 3` characters and append "..."
pub fn truncate_with_ellipsis(text: &str, max_length: usize) -> String {
    let keep = max_length.saturating_sub(ELLIPSIS.len());
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

fn non_empty(text: String) -> Result<String, GenerationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(GenerationError::MalformedResponse(
            "empty summary".to_string(),
        ))
    } else {
        Ok(trimmed.to_string())
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
