//! Command-line interface for news-curator.
//!
//! Provides commands for curating a news batch into the database and for
//! showing the resolved configuration.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::adapters::{Generator, GeminiGenerator, JsonNewsSource, SqliteSink, StubGenerator};
use crate::config::{load_config, ResolvedConfig};
use crate::core::{
    persist_report, supported_languages, CurationEngine, Curator, PersistSummary,
};
use crate::domain::CurationBatchReport;

/// news-curator - Filter, summarize and store a batch of news items
#[derive(Parser, Debug)]
#[command(name = "news-curator")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Curate a JSON batch and store the approved items
    Curate {
        /// JSON file with the news batch
        #[arg(short, long)]
        input: PathBuf,

        /// SQLite database (overrides config)
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Curate and report without writing to the database
        #[arg(long)]
        dry_run: bool,

        /// Relevance threshold (overrides config)
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Keep original content, never call the generator
        #[arg(long)]
        no_summaries: bool,

        /// Skip persistence when more than this share of summaries failed
        #[arg(long)]
        max_summary_failure_rate: Option<f64>,

        /// Print the batch report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Curate {
                input,
                database,
                dry_run,
                threshold,
                no_summaries,
                max_summary_failure_rate,
                json,
            } => {
                let options = CurateOptions {
                    input,
                    database,
                    dry_run,
                    threshold,
                    no_summaries,
                    max_summary_failure_rate,
                    json,
                };
                curate(options).await
            }
            Commands::Config => show_config(),
        }
    }
}

struct CurateOptions {
    input: PathBuf,
    database: Option<PathBuf>,
    dry_run: bool,
    threshold: Option<f64>,
    no_summaries: bool,
    max_summary_failure_rate: Option<f64>,
    json: bool,
}

/// Pick the generation backend for this run
fn build_generator(config: &ResolvedConfig, no_summaries: bool) -> Result<Arc<dyn Generator>> {
    if no_summaries {
        return Ok(Arc::new(StubGenerator::failing("summaries disabled")));
    }

    let gemini = config.gemini_config().context(
        "GEMINI_API_KEY not found.\n\n\
         Set it in the environment, or run with --no-summaries to keep original content.",
    )?;

    Ok(Arc::new(GeminiGenerator::new(gemini)?))
}

async fn curate(options: CurateOptions) -> Result<()> {
    let mut config = load_config()?;

    if let Some(threshold) = options.threshold {
        config.curation.relevance_threshold = threshold;
    }
    if options.no_summaries {
        config.curation.content_length_trigger = usize::MAX;
    }
    let generator = build_generator(&config, options.no_summaries)?;
    let curator = Curator::new(CurationEngine::new(generator, config.curation.clone())?);

    let source = JsonNewsSource::new(&options.input);
    let report = curator.run(&source).await?;

    let persisted = if options.dry_run {
        None
    } else {
        if let Some(limit) = options.max_summary_failure_rate {
            let rate = report.summary_failure_rate();
            if rate > limit {
                print_report(&report, None, options.json)?;
                anyhow::bail!(
                    "Summary failure rate {:.0}% exceeds limit {:.0}%; nothing was stored",
                    rate * 100.0,
                    limit * 100.0
                );
            }
        }

        let db_path = options.database.unwrap_or_else(|| config.database.clone());
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create database directory: {}", parent.display())
                })?;
            }
        }

        let mut sink = SqliteSink::open(&db_path)
            .with_context(|| format!("Failed to open database: {}", db_path.display()))?;
        Some(persist_report(&report, &mut sink))
    };

    print_report(&report, persisted.as_ref(), options.json)
}

/// Render the batch report for the operator
fn print_report(
    report: &CurationBatchReport,
    persisted: Option<&PersistSummary>,
    json: bool,
) -> Result<()> {
    if json {
        let value = serde_json::json!({
            "report": report,
            "persistence": persisted,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&value).context("Failed to serialize report")?
        );
        return Ok(());
    }

    println!("Run ID: {}", report.run_id);
    println!("Processed: {}", report.total_processed);
    println!("Approved: {}", report.total_approved);
    println!("Rejected: {}", report.total_rejected);
    println!(
        "Summaries: {} generated, {} failed",
        report.summaries_generated, report.summaries_failed
    );

    if !report.approved_items.is_empty() {
        println!("\nApproved:");
        for item in &report.approved_items {
            let marker = if item.summary.is_some() { "*" } else { " " };
            println!(
                "  {} {} [{}] ({})",
                marker,
                item.title,
                item.categories.join(", "),
                item.language
            );
        }
    }

    if !report.rejected_items.is_empty() {
        println!("\nRejected:");
        for rejected in &report.rejected_items {
            println!("    {}", rejected.item.title);
            for reason in &rejected.reasons {
                println!("      - {}", reason);
            }
        }
    }

    match persisted {
        Some(summary) => {
            println!("\nStored {} item(s)", summary.persisted.len());
            for failure in &summary.failures {
                println!("  ✗ {}: {}", failure.title, failure.error);
            }
        }
        None => println!("\n[Nothing stored]"),
    }

    Ok(())
}

/// Show resolved configuration
fn show_config() -> Result<()> {
    let config = load_config()?;

    println!("news-curator Configuration");
    println!("==========================");
    println!();

    if let Some(ref config_file) = config.config_file {
        println!("Config file: {}", config_file.display());
    } else {
        println!("Config file: (none found, using defaults)");
    }
    println!();

    println!("Curation:");
    println!("  relevance_threshold: {}", config.curation.relevance_threshold);
    println!("  content_length_trigger: {}", config.curation.content_length_trigger);
    println!("  summary_max_length: {}", config.curation.summary_max_length);
    println!("  max_concurrency: {}", config.curation.max_concurrency);
    println!("  call_delay_ms: {}", config.curation.call_delay_ms);
    println!(
        "  generation_timeout_seconds: {}",
        config.curation.generation_timeout_seconds
    );
    println!("  languages: {}", supported_languages());
    println!();

    println!("Generator:");
    println!("  model: {}", config.gemini_model);
    println!(
        "  api_key: {}",
        if config.gemini_api_key.is_some() { "(set)" } else { "(missing)" }
    );
    println!();

    println!("Storage:");
    println!("  database: {}", config.database.display());

    Ok(())
}
