//! Configuration for the news curator.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (CURATOR_*, GEMINI_API_KEY, GEMINI_MODEL)
//! 2. Config file (.curator/config.yaml)
//! 3. Defaults
//!
//! Config file discovery:
//! - Searches current directory and parents for .curator/config.yaml
//! - Relative paths in the config file are resolved against the project root
//!   (the parent of `.curator/`)
//!
//! The resolved value is returned to the caller and passed into constructors;
//! nothing is cached globally.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::adapters::gemini::{GeminiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::core::{ConfigError, CurationConfig};

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub curation: CurationConfig,
    #[serde(default)]
    pub generator: GeneratorSection,
    #[serde(default)]
    pub storage: StorageSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneratorSection {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageSection {
    /// SQLite database path (relative to the project root)
    pub database: Option<String>,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub curation: CurationConfig,
    /// Absolute or cwd-relative path to the SQLite database
    pub database: PathBuf,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub request_timeout_seconds: u64,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl ResolvedConfig {
    /// Gemini client settings, if an API key is available
    pub fn gemini_config(&self) -> Option<GeminiConfig> {
        self.gemini_api_key.as_ref().map(|key| GeminiConfig {
            api_key: key.clone(),
            model: self.gemini_model.clone(),
            base_url: self.gemini_base_url.clone(),
            request_timeout_seconds: self.request_timeout_seconds,
        })
    }
}

/// Find config file by searching `start` and its parents
fn find_config_file_from(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(".curator").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to a base directory
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Default database location (~/.local/share/news-curator/news.db on Linux)
fn default_database() -> Result<PathBuf> {
    Ok(dirs::data_local_dir()
        .context("Failed to determine local data directory")?
        .join("news-curator")
        .join("news.db"))
}

fn parse_env<T: FromStr>(
    env: &dyn Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    match env(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv {
                key: key.to_string(),
                value,
            }),
    }
}

/// Merge file settings, environment and defaults
fn resolve(
    file: Option<(PathBuf, ConfigFile)>,
    env: &dyn Fn(&str) -> Option<String>,
) -> Result<ResolvedConfig> {
    let (config_file, mut curation, generator, database) = match file {
        Some((path, parsed)) => {
            // Project root is the parent of .curator/
            let base_dir = path
                .parent()
                .and_then(|p| p.parent())
                .unwrap_or(Path::new("."))
                .to_path_buf();
            let database = parsed
                .storage
                .database
                .as_deref()
                .map(|db| resolve_path(&base_dir, db));
            (Some(path), parsed.curation, parsed.generator, database)
        }
        None => (None, CurationConfig::default(), GeneratorSection::default(), None),
    };

    if let Some(threshold) = parse_env(env, "CURATOR_RELEVANCE_THRESHOLD")? {
        curation.relevance_threshold = threshold;
    }
    if let Some(max_length) = parse_env(env, "CURATOR_SUMMARY_MAX_LENGTH")? {
        curation.summary_max_length = max_length;
    }
    if let Some(trigger) = parse_env(env, "CURATOR_CONTENT_LENGTH_TRIGGER")? {
        curation.content_length_trigger = trigger;
    }
    if let Some(concurrency) = parse_env(env, "CURATOR_MAX_CONCURRENCY")? {
        curation.max_concurrency = concurrency;
    }

    curation.validate()?;

    let database = match env("CURATOR_DATABASE") {
        Some(path) => PathBuf::from(path),
        None => match database {
            Some(path) => path,
            None => default_database()?,
        },
    };

    Ok(ResolvedConfig {
        curation,
        database,
        gemini_api_key: env("GEMINI_API_KEY").filter(|k| !k.trim().is_empty()),
        gemini_model: env("GEMINI_MODEL")
            .or(generator.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        gemini_base_url: generator
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        request_timeout_seconds: generator.request_timeout_seconds.unwrap_or(60),
        config_file,
    })
}

/// Load configuration from all sources
pub fn load_config() -> Result<ResolvedConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;

    let file = match find_config_file_from(&cwd) {
        Some(path) => {
            let parsed = load_config_file(&path)?;
            Some((path, parsed))
        }
        None => None,
    };

    resolve(file, &|key| std::env::var(key).ok())
}
