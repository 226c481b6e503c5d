//! Input models for MCP tool parameters.
//!
//! `top_n` and `months_per_period` are signed on purpose: out-of-range values
//! must reach the analysis engine and come back as `InvalidParameter`, not
//! fail deserialization. Granularity is a string for the same reason.

use serde::{Deserialize, Serialize};

use super::ResponseFormat;
use crate::config::defaults;

/// Input for a PubMed search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPubmedInput {
    /// PubMed advanced search query (e.g. `"KRAS"[tiab] AND "pancreatic cancer"[MeSH]`).
    #[serde(alias = "query")]
    pub advanced_search: String,

    /// Earliest publication date, `YYYY/MM/DD`.
    #[serde(default)]
    pub start_date: Option<String>,

    /// Latest publication date, `YYYY/MM/DD`.
    #[serde(default)]
    pub end_date: Option<String>,

    /// Maximum records to retrieve.
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Base name for the saved files (a timestamp is appended).
    #[serde(default)]
    pub output_filename: Option<String>,

    /// Output format.
    #[serde(default)]
    pub response_format: ResponseFormat,
}

fn default_max_results() -> usize {
    defaults::MAX_RESULTS
}

/// Input for hotspot analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotspotInput {
    /// Result file name (`.json` recommended).
    pub filename: String,

    /// Number of keywords to return.
    #[serde(default = "default_top_n")]
    pub top_n: i64,

    /// Earliest publication month included.
    #[serde(default)]
    pub start_date: Option<String>,

    /// Latest publication month included.
    #[serde(default)]
    pub end_date: Option<String>,

    /// Articles listed under each keyword (0 to disable).
    #[serde(default = "default_articles_per_keyword")]
    pub articles_per_keyword: usize,

    /// Output format.
    #[serde(default)]
    pub response_format: ResponseFormat,
}

/// Input for trend analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendInput {
    /// Result file name (`.json` recommended).
    pub filename: String,

    /// Number of keywords per period.
    #[serde(default = "default_top_n")]
    pub top_n: i64,

    /// `month`, `quarter` or `year` (default `month`).
    #[serde(default)]
    pub granularity: Option<String>,

    /// Alternative to `granularity`: 1, 3 or 12.
    #[serde(default)]
    pub months_per_period: Option<i64>,

    /// Earliest publication month included.
    #[serde(default)]
    pub start_date: Option<String>,

    /// Latest publication month included.
    #[serde(default)]
    pub end_date: Option<String>,

    /// Output format.
    #[serde(default)]
    pub response_format: ResponseFormat,
}

/// Input for publication count analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicationCountInput {
    /// Result file name (`.json` recommended).
    pub filename: String,

    /// `month`, `quarter` or `year` (default `month`).
    #[serde(default)]
    pub granularity: Option<String>,

    /// Alternative to `granularity`: 1, 3 or 12.
    #[serde(default)]
    pub months_per_period: Option<i64>,

    /// Earliest publication month included.
    #[serde(default)]
    pub start_date: Option<String>,

    /// Latest publication month included.
    #[serde(default)]
    pub end_date: Option<String>,

    /// Output format.
    #[serde(default)]
    pub response_format: ResponseFormat,
}

/// Input for comprehensive analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComprehensiveAnalysisInput {
    /// Result file name (`.json` recommended).
    pub filename: String,

    /// Number of keywords in rankings.
    #[serde(default = "default_top_n", alias = "top_keywords")]
    pub top_n: i64,

    /// `month`, `quarter` or `year` (default `month`).
    #[serde(default)]
    pub granularity: Option<String>,

    /// Alternative to `granularity`: 1, 3 or 12.
    #[serde(default)]
    pub months_per_period: Option<i64>,

    /// Earliest publication month included.
    #[serde(default)]
    pub start_date: Option<String>,

    /// Latest publication month included.
    #[serde(default)]
    pub end_date: Option<String>,

    /// Articles listed under each hotspot keyword (0 to disable).
    #[serde(default = "default_articles_per_keyword")]
    pub articles_per_keyword: usize,

    /// Output format.
    #[serde(default)]
    pub response_format: ResponseFormat,
}

/// Input for listing result files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListResultFilesInput {
    /// Output format.
    #[serde(default)]
    pub response_format: ResponseFormat,
}

fn default_top_n() -> i64 {
    defaults::TOP_N
}

fn default_articles_per_keyword() -> usize {
    defaults::ARTICLES_PER_KEYWORD
}
