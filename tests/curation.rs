//! Curation Integration Tests
//!
//! Acceptance rules, summary triggering, ordering and batch reports.

use std::sync::Arc;
use std::time::Duration;

use news_curator::adapters::StubGenerator;
use news_curator::core::{ConfigError, CurationConfig, CurationEngine};
use news_curator::domain::{CurationOutcome, NewsItem};

fn item(title: &str, score: f64, language: &str, content: &str) -> NewsItem {
    NewsItem::new(
        title,
        content,
        "Agência Brasil",
        vec!["Política".to_string(), "Economia".to_string()],
        score,
        language,
    )
}

fn engine_with(stub: Arc<StubGenerator>) -> CurationEngine {
    CurationEngine::new(stub, CurationConfig::default()).unwrap()
}

#[tokio::test]
async fn test_low_score_rejected() {
    let stub = Arc::new(StubGenerator::replying("unused"));
    let outcome = engine_with(stub.clone())
        .evaluate(item("a", 0.5, "EN", "short"))
        .await;

    match outcome {
        CurationOutcome::Rejected { reasons, .. } => {
            assert_eq!(reasons, vec!["insufficient score (0.5 < 0.7)"]);
        }
        other => panic!("Expected rejection, got {:?}", other),
    }
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn test_unsupported_language_rejected() {
    let stub = Arc::new(StubGenerator::replying("unused"));
    let outcome = engine_with(stub.clone())
        .evaluate(item("a", 0.8, "FR", "short"))
        .await;

    match outcome {
        CurationOutcome::Rejected { reasons, .. } => {
            assert_eq!(reasons, vec!["unsupported language (FR)"]);
        }
        other => panic!("Expected rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_both_rules_fail_together() {
    let stub = Arc::new(StubGenerator::replying("unused"));
    let long = "z".repeat(1000);
    let outcome = engine_with(stub.clone())
        .evaluate(item("a", 0.1, "es", &long))
        .await;

    match outcome {
        CurationOutcome::Rejected { reasons, .. } => {
            assert_eq!(
                reasons,
                vec!["insufficient score (0.1 < 0.7)", "unsupported language (es)"]
            );
        }
        other => panic!("Expected rejection, got {:?}", other),
    }
    // Rejected items are never summarized, however long
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn test_short_content_untouched_without_generation() {
    let stub = Arc::new(StubGenerator::replying("unused"));
    let content = "c".repeat(300);
    let outcome = engine_with(stub.clone())
        .evaluate(item("a", 0.9, "ptBR", &content))
        .await;

    match outcome {
        CurationOutcome::Approved { item, summary } => {
            assert_eq!(item.content, content);
            assert!(item.summary.is_none());
            assert!(summary.is_none());
        }
        other => panic!("Expected approval, got {:?}", other),
    }
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn test_long_content_replaced_by_summary() {
    let reply = "s".repeat(133);
    let stub = Arc::new(StubGenerator::replying(reply.clone()));
    let original = item("a", 0.9, "ptBR", &"c".repeat(500));

    let outcome = engine_with(stub.clone()).evaluate(original.clone()).await;

    match outcome {
        CurationOutcome::Approved { item, summary } => {
            assert_eq!(item.content, reply);
            assert_eq!(item.summary.as_deref(), Some(reply.as_str()));
            assert_eq!(item.title, original.title);
            assert_eq!(item.categories, original.categories);
            assert_eq!(item.relevance_score, original.relevance_score);
            assert_eq!(item.language, original.language);

            let metadata = summary.expect("summary metadata");
            assert_eq!(metadata.summary_length, 133);
            assert_eq!(metadata.original_length, 500);
            assert!((metadata.compression_ratio - 0.266).abs() < 1e-9);
        }
        other => panic!("Expected approval, got {:?}", other),
    }
    assert_eq!(stub.call_count(), 1);
}

#[tokio::test]
async fn test_generation_failure_keeps_original_content() {
    let stub = Arc::new(StubGenerator::failing("network unreachable"));
    let content = "c".repeat(500);

    let outcome = engine_with(stub.clone())
        .evaluate(item("a", 0.9, "EN", &content))
        .await;

    match outcome {
        CurationOutcome::Approved { item, summary } => {
            assert_eq!(item.content, content);
            assert!(item.summary.is_none());
            assert!(summary.is_none());
        }
        other => panic!("Expected approval, got {:?}", other),
    }
    assert_eq!(stub.call_count(), 1);
}

#[tokio::test]
async fn test_batch_report_counts() {
    let stub = Arc::new(StubGenerator::failing("down"));
    let items = vec![
        item("ok-short", 0.9, "EN", "short"),
        item("low", 0.2, "EN", "short"),
        item("ok-long", 0.8, "ptBR", &"c".repeat(400)),
        item("french", 0.95, "FR", "court"),
    ];

    let report = engine_with(stub).curate_batch(items).await;

    assert_eq!(report.total_processed, 4);
    assert_eq!(report.total_approved, 2);
    assert_eq!(report.total_rejected, 2);
    assert_eq!(report.summaries_generated, 0);
    assert_eq!(report.summaries_failed, 1);
    assert_eq!(report.summary_failure_rate(), 1.0);
    assert!(report.is_consistent());

    let approved: Vec<&str> = report.approved_items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(approved, vec!["ok-short", "ok-long"]);
    let rejected: Vec<&str> = report
        .rejected_items
        .iter()
        .map(|r| r.item.title.as_str())
        .collect();
    assert_eq!(rejected, vec!["low", "french"]);
}

#[tokio::test]
async fn test_empty_batch() {
    let stub = Arc::new(StubGenerator::replying("unused"));
    let report = engine_with(stub).curate_batch(vec![]).await;

    assert_eq!(report.total_processed, 0);
    assert_eq!(report.total_approved + report.total_rejected, 0);
    assert!(report.is_consistent());
}

#[tokio::test]
async fn test_curation_is_idempotent() {
    let items = vec![
        item("one", 0.9, "EN", &"a".repeat(450)),
        item("two", 0.3, "EN", "short"),
        item("three", 0.75, "ptBR", "curto"),
        item("four", 0.9, "EN", &"b".repeat(700)),
    ];
    let responder = |prompt: &str| Ok(format!("digest {}", prompt.chars().count() % 97));

    let first = engine_with(Arc::new(StubGenerator::from_fn(responder)))
        .curate_batch(items.clone())
        .await;
    let second = engine_with(Arc::new(StubGenerator::from_fn(responder)))
        .curate_batch(items)
        .await;

    assert_eq!(first.approved_items, second.approved_items);
    assert_eq!(first.rejected_items, second.rejected_items);
    assert_eq!(first.total_processed, second.total_processed);
    assert_eq!(first.summaries_generated, second.summaries_generated);
}

#[tokio::test]
async fn test_order_preserved_under_concurrency() {
    // Earlier items answer slower than later ones
    let stub = StubGenerator::from_fn(|prompt: &str| {
        let title = prompt
            .lines()
            .find_map(|line| line.strip_prefix("Title: "))
            .unwrap_or("?");
        Ok(format!("summary of {}", title))
    })
    .with_delay(|prompt: &str| {
        if prompt.contains("Title: item-0") {
            Duration::from_millis(150)
        } else if prompt.contains("Title: item-1") {
            Duration::from_millis(75)
        } else {
            Duration::from_millis(5)
        }
    });

    let config = CurationConfig {
        max_concurrency: 4,
        ..Default::default()
    };
    let engine = CurationEngine::new(Arc::new(stub), config).unwrap();

    let items: Vec<NewsItem> = (0..6)
        .map(|i| {
            let score = if i == 3 { 0.1 } else { 0.9 };
            item(&format!("item-{}", i), score, "EN", &"x".repeat(400))
        })
        .collect();

    let outcomes = engine.curate(items).await;
    let titles: Vec<&str> = outcomes.iter().map(|o| o.item().title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["item-0", "item-1", "item-2", "item-3", "item-4", "item-5"]
    );

    for outcome in &outcomes {
        if let CurationOutcome::Approved { item, .. } = outcome {
            assert_eq!(item.content, format!("summary of {}", item.title));
        }
    }
    assert!(!outcomes[3].is_approved());
}

#[tokio::test]
async fn test_custom_threshold_and_trigger() {
    let stub = Arc::new(StubGenerator::replying("tiny"));
    let config = CurationConfig {
        relevance_threshold: 0.4,
        content_length_trigger: 10,
        ..Default::default()
    };
    let engine = CurationEngine::new(stub.clone(), config).unwrap();

    let outcome = engine
        .evaluate(item("a", 0.45, "EN", "eleven char"))
        .await;

    match outcome {
        CurationOutcome::Approved { item, .. } => assert_eq!(item.content, "tiny"),
        other => panic!("Expected approval, got {:?}", other),
    }
    assert_eq!(stub.call_count(), 1);
}

#[test]
fn test_engine_rejects_invalid_config() {
    let stub = Arc::new(StubGenerator::replying("unused"));
    let config = CurationConfig {
        summary_max_length: 3,
        ..Default::default()
    };

    let result = CurationEngine::new(stub.clone(), config);

    assert!(matches!(result, Err(ConfigError::SummaryTooShort(3))));
    assert_eq!(stub.call_count(), 0);
}
