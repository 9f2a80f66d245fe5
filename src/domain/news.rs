//! News items as produced by the source adapter.

use serde::{Deserialize, Serialize};

/// Language codes accepted by curation (exact, case-sensitive match)
pub const SUPPORTED_LANGUAGES: [&str; 2] = ["ptBR", "EN"];

/// A single news item flowing through curation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub title: String,

    /// Body text; replaced by the generated summary when one is produced
    pub content: String,

    /// Outlet or feed the item came from
    pub source: String,

    /// Category names, display order preserved
    pub categories: Vec<String>,

    /// Importance in [0, 1]
    pub relevance_score: f64,

    /// Free-form language code (e.g. "ptBR", "EN")
    pub language: String,

    /// Generated summary, set only when summarization succeeded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl NewsItem {
    /// Create an item without a summary
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        source: impl Into<String>,
        categories: Vec<String>,
        relevance_score: f64,
        language: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            source: source.into(),
            categories,
            relevance_score,
            language: language.into(),
            summary: None,
        }
    }

    /// Content length in characters (not bytes)
    pub fn content_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Whether the language code is one curation accepts
    pub fn has_supported_language(&self) -> bool {
        SUPPORTED_LANGUAGES.contains(&self.language.as_str())
    }

    /// Replace the content with a generated summary.
    ///
    /// This is the only mutation an item goes through during curation.
    pub fn apply_summary(mut self, summary: String) -> Self {
        self.content = summary.clone();
        self.summary = Some(summary);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(language: &str) -> NewsItem {
        NewsItem::new(
            "Title",
            "Conteúdo",
            "Folha",
            vec!["Tecnologia".to_string()],
            0.9,
            language,
        )
    }

    #[test]
    fn test_language_match_is_case_sensitive() {
        assert!(item("ptBR").has_supported_language());
        assert!(item("EN").has_supported_language());
        assert!(!item("ptbr").has_supported_language());
        assert!(!item("en").has_supported_language());
        assert!(!item("FR").has_supported_language());
    }

    #[test]
    fn test_content_len_counts_chars() {
        // "Conteúdo" is 8 chars but 9 bytes
        assert_eq!(item("EN").content_len(), 8);
    }

    #[test]
    fn test_apply_summary_keeps_other_fields() {
        let original = item("EN");
        let summarized = original.clone().apply_summary("short".to_string());

        assert_eq!(summarized.content, "short");
        assert_eq!(summarized.summary.as_deref(), Some("short"));
        assert_eq!(summarized.title, original.title);
        assert_eq!(summarized.categories, original.categories);
        assert_eq!(summarized.relevance_score, original.relevance_score);
        assert_eq!(summarized.language, original.language);
    }

    #[test]
    fn test_camel_case_json() {
        let json = r#"{
            "title": "t",
            "content": "c",
            "source": "s",
            "categories": ["a", "b"],
            "relevanceScore": 0.75,
            "language": "EN"
        }"#;

        let parsed: NewsItem = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.relevance_score, 0.75);
        assert_eq!(parsed.categories, vec!["a", "b"]);
        assert!(parsed.summary.is_none());
    }
}
