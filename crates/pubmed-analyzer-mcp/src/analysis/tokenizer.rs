//! Keyword candidate extraction and normalization.
//!
//! Controlled-vocabulary terms (MeSH descriptors, author keywords) are taken
//! whole; free text (title, abstract) goes through a [`CandidateExtractor`].

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::{AnalysisConfig, FieldSelection};
use crate::models::ArticleRecord;

static WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{L}\p{N}]+(?:['’\-][\p{L}\p{N}]+)*").expect("valid word regex")
});

/// Splits free text into normalized keyword candidates.
pub trait CandidateExtractor: Send + Sync {
    /// Lazily yield the candidates found in `text`, in order of occurrence.
    fn extract_candidates<'a>(&'a self, text: &'a str) -> Box<dyn Iterator<Item = String> + 'a>;
}

/// Word-boundary splitter with stopword and length filters. No stemming.
#[derive(Debug, Clone)]
pub struct WordExtractor {
    stopwords: HashSet<String>,
    min_token_length: usize,
}

impl WordExtractor {
    /// Create an extractor from the analysis configuration.
    #[must_use]
    pub fn new(config: &AnalysisConfig) -> Self {
        Self { stopwords: config.stopwords.clone(), min_token_length: config.min_token_length }
    }

    fn normalize_word(&self, word: &str) -> Option<String> {
        let lower = word.to_lowercase();
        let stripped = lower
            .strip_suffix("'s")
            .or_else(|| lower.strip_suffix("’s"))
            .unwrap_or(lower.as_str());

        if stripped.chars().count() < self.min_token_length
            || !stripped.chars().any(char::is_alphabetic)
            || self.stopwords.contains(stripped)
        {
            return None;
        }
        Some(stripped.to_string())
    }
}

impl CandidateExtractor for WordExtractor {
    fn extract_candidates<'a>(&'a self, text: &'a str) -> Box<dyn Iterator<Item = String> + 'a> {
        Box::new(WORD.find_iter(text).filter_map(|m| self.normalize_word(m.as_str())))
    }
}

/// Normalize a controlled-vocabulary term: lowercase, collapse whitespace,
/// trim punctuation at both ends. Terms without a letter are dropped.
#[must_use]
pub fn normalize_term(term: &str) -> Option<String> {
    let collapsed = term.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    let trimmed = collapsed.trim_matches(|c: char| !c.is_alphanumeric());
    if trimmed.is_empty() || !trimmed.chars().any(char::is_alphabetic) {
        return None;
    }
    Some(trimmed.to_string())
}

/// Produces the keyword candidates of a record from the configured fields.
pub struct Tokenizer {
    fields: FieldSelection,
    extractor: Box<dyn CandidateExtractor>,
}

impl Tokenizer {
    /// Tokenizer with the default word extractor.
    #[must_use]
    pub fn new(config: &AnalysisConfig) -> Self {
        Self::with_extractor(config.fields, Box::new(WordExtractor::new(config)))
    }

    /// Tokenizer with a custom free-text extractor.
    #[must_use]
    pub fn with_extractor(fields: FieldSelection, extractor: Box<dyn CandidateExtractor>) -> Self {
        Self { fields, extractor }
    }

    /// Fields this tokenizer mines.
    #[must_use]
    pub const fn fields(&self) -> FieldSelection {
        self.fields
    }

    /// Candidates of one record: title, then abstract, then keyword terms.
    ///
    /// Calling this again restarts the sequence.
    pub fn candidates<'a>(&'a self, record: &'a ArticleRecord) -> impl Iterator<Item = String> + 'a {
        let title = self
            .fields
            .title
            .then(|| self.extractor.extract_candidates(&record.title))
            .into_iter()
            .flatten();
        let r#abstract = self
            .fields
            .r#abstract
            .then(|| self.extractor.extract_candidates(record.abstract_text()))
            .into_iter()
            .flatten();
        let keywords = self
            .fields
            .keywords
            .then(|| record.keywords.iter().filter_map(|k| normalize_term(k)))
            .into_iter()
            .flatten();

        title.chain(r#abstract).chain(keywords)
    }
}

impl std::fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokenizer").field("fields", &self.fields).finish()
    }
}
