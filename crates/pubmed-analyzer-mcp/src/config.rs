//! Configuration for the PubMed analyzer MCP server.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

/// NCBI E-utilities constants.
pub mod eutils {
    use std::time::Duration;

    /// Base URL for E-utilities.
    pub const BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

    /// Tool name reported to NCBI with every request.
    pub const TOOL_NAME: &str = "pubmed-analyzer-mcp";

    /// Request timeout (efetch of 100 full records can be slow).
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Delay between requests without API key (NCBI allows 3 req/s).
    pub const RATE_LIMIT_DELAY: Duration = Duration::from_millis(340);

    /// Delay between requests with API key (NCBI allows 10 req/s).
    pub const RATE_LIMIT_DELAY_WITH_KEY: Duration = Duration::from_millis(100);

    /// PMIDs per efetch call.
    pub const FETCH_BATCH_SIZE: usize = 100;

    /// Hard cap on `max_results` (esearch retmax limit).
    pub const MAX_RESULTS_CAP: usize = 10_000;

    /// Cache TTL (5 minutes).
    pub const CACHE_TTL: Duration = Duration::from_secs(300);

    /// Maximum cache size.
    pub const CACHE_MAX_SIZE: u64 = 500;

    /// Retries for transient failures (429, 5xx, connection errors).
    pub const MAX_RETRIES: u32 = 3;

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);
}

/// Defaults for analysis requests.
pub mod defaults {
    /// Number of keywords in a hotspot ranking.
    pub const TOP_N: i64 = 20;

    /// Article references listed per hotspot keyword.
    pub const ARTICLES_PER_KEYWORD: usize = 5;

    /// Results retrieved by `search_pubmed`.
    pub const MAX_RESULTS: usize = 1000;

    /// Shortest free-text token kept by the tokenizer.
    pub const MIN_TOKEN_LENGTH: usize = 2;

    /// Results directory when none is configured.
    pub const RESULTS_DIR: &str = "results";
}

/// Common English function words dropped from free text.
pub const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "among", "an", "and",
    "any", "are", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each",
    "either", "et", "few", "for", "from", "further", "had", "has", "have", "having", "he", "her",
    "here", "hers", "him", "his", "how", "however", "i", "if", "in", "into", "is", "it", "its",
    "itself", "may", "me", "might", "more", "most", "must", "my", "no", "nor", "not", "of", "off",
    "on", "once", "only", "or", "other", "our", "ours", "out", "over", "own", "same", "she",
    "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them", "then",
    "there", "these", "they", "this", "those", "through", "thus", "to", "too", "under", "until",
    "up", "upon", "using", "very", "via", "was", "we", "were", "what", "when", "where", "whether",
    "which", "while", "who", "whom", "why", "will", "with", "within", "without", "would", "you",
    "your", "yours",
];

/// Which record fields the tokenizer mines for keyword candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSelection {
    /// Mine the title as free text.
    pub title: bool,
    /// Mine the abstract as free text.
    pub r#abstract: bool,
    /// Take controlled-vocabulary keyword terms verbatim.
    pub keywords: bool,
}

impl FieldSelection {
    /// Keyword terms only.
    pub const KEYWORDS_ONLY: Self = Self { title: false, r#abstract: false, keywords: true };

    /// Title, abstract and keyword terms.
    pub const ALL: Self = Self { title: true, r#abstract: true, keywords: true };
}

impl Default for FieldSelection {
    fn default() -> Self {
        Self::KEYWORDS_ONLY
    }
}

/// How keyword occurrences are counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CountingMode {
    /// Every occurrence counts.
    #[default]
    Occurrences,
    /// A keyword counts at most once per record.
    Records,
}

/// Analysis engine configuration.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Words dropped from free-text fields (lowercase).
    pub stopwords: HashSet<String>,

    /// Free-text tokens shorter than this (in characters) are dropped.
    pub min_token_length: usize,

    /// Fields mined for candidates.
    pub fields: FieldSelection,

    /// Occurrence counting policy.
    pub counting: CountingMode,

    /// Treat a year-only publication date as January of that year.
    pub year_only_as_january: bool,
}

impl AnalysisConfig {
    /// Default configuration with a different field selection.
    #[must_use]
    pub fn with_fields(fields: FieldSelection) -> Self {
        Self { fields, ..Self::default() }
    }

    /// Check whether `word` (already lowercased) is a stopword.
    #[must_use]
    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            stopwords: STOPWORDS.iter().map(|w| (*w).to_string()).collect(),
            min_token_length: defaults::MIN_TOKEN_LENGTH,
            fields: FieldSelection::default(),
            counting: CountingMode::default(),
            year_only_as_january: true,
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Contact email sent to NCBI (required for searching).
    pub email: Option<String>,

    /// NCBI API key (optional, raises the rate limit).
    pub api_key: Option<String>,

    /// Base URL for E-utilities (for testing with mock servers).
    pub eutils_url: String,

    /// Directory holding saved result sets.
    pub results_dir: PathBuf,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Minimum spacing between requests.
    pub rate_limit_delay: Duration,

    /// Retries for transient failures.
    pub max_retries: u32,

    /// PMIDs per efetch call.
    pub fetch_batch_size: usize,

    /// Cache TTL.
    pub cache_ttl: Duration,

    /// Maximum cache size.
    pub cache_max_size: u64,

    /// Analysis engine settings.
    pub analysis: AnalysisConfig,
}

impl Config {
    /// Create a new configuration.
    ///
    /// The rate limit follows NCBI's policy: 3 req/s without a key, 10 req/s with one.
    #[must_use]
    pub fn new(email: Option<String>, api_key: Option<String>, results_dir: PathBuf) -> Self {
        let has_key = api_key.is_some();
        Self {
            email,
            api_key,
            eutils_url: eutils::BASE_URL.to_string(),
            results_dir,
            request_timeout: eutils::REQUEST_TIMEOUT,
            connect_timeout: eutils::CONNECT_TIMEOUT,
            rate_limit_delay: if has_key {
                eutils::RATE_LIMIT_DELAY_WITH_KEY
            } else {
                eutils::RATE_LIMIT_DELAY
            },
            max_retries: eutils::MAX_RETRIES,
            fetch_batch_size: eutils::FETCH_BATCH_SIZE,
            cache_ttl: eutils::CACHE_TTL,
            cache_max_size: eutils::CACHE_MAX_SIZE,
            analysis: AnalysisConfig::default(),
        }
    }

    /// Create a test configuration pointing at a mock server.
    #[must_use]
    pub fn for_testing(base_url: &str, results_dir: impl Into<PathBuf>) -> Self {
        Self {
            email: Some("test@example.org".to_string()),
            api_key: None,
            eutils_url: base_url.trim_end_matches('/').to_string(),
            results_dir: results_dir.into(),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            rate_limit_delay: Duration::from_millis(0), // No delay in tests
            max_retries: 0,
            fetch_batch_size: eutils::FETCH_BATCH_SIZE,
            cache_ttl: Duration::from_secs(0), // No caching in tests
            cache_max_size: 0,
            analysis: AnalysisConfig::default(),
        }
    }

    /// Check if an API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Check if a contact email is configured.
    #[must_use]
    pub const fn has_email(&self) -> bool {
        self.email.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None, None, PathBuf::from(defaults::RESULTS_DIR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.api_key.is_none());
        assert!(!config.has_api_key());
        assert_eq!(config.rate_limit_delay, eutils::RATE_LIMIT_DELAY);
    }

    #[test]
    fn test_config_with_api_key_is_faster() {
        let config = Config::new(None, Some("key".to_string()), PathBuf::from("r"));
        assert!(config.has_api_key());
        assert_eq!(config.rate_limit_delay, eutils::RATE_LIMIT_DELAY_WITH_KEY);
    }

    #[test]
    fn test_analysis_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.fields, FieldSelection::KEYWORDS_ONLY);
        assert_eq!(config.min_token_length, 2);
        assert!(config.is_stopword("the"));
        assert!(!config.is_stopword("cancer"));
    }
}
