//! Analysis report models.
//!
//! Reports are built once per request and never mutated afterwards.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{ArticleRef, DateRange, Granularity};

/// A normalized keyword and how often it occurs within one scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeywordCount {
    /// Normalized keyword text.
    pub keyword: String,
    /// Occurrence count.
    pub count: u64,
}

impl KeywordCount {
    /// Create a keyword count.
    #[must_use]
    pub fn new(keyword: impl Into<String>, count: u64) -> Self {
        Self { keyword: keyword.into(), count }
    }
}

/// One calendar period of a time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBucket {
    /// Period label: `2024-01`, `2024-Q1` or `2024`.
    pub label: String,
    /// First day of the period.
    pub start: NaiveDate,
    /// Last day of the period.
    pub end: NaiveDate,
    /// Records published in the period.
    pub publication_count: usize,
    /// Keyword ranking for the period (empty for publication counts).
    #[serde(default)]
    pub keywords: Vec<KeywordCount>,
}

/// Per-bucket counts of one keyword, aligned with the report's buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordSeries {
    /// Normalized keyword text.
    pub keyword: String,
    /// Count over the whole series.
    pub total: u64,
    /// Count in each bucket.
    pub counts: Vec<u64>,
}

/// Parameters a sub-report was produced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportParameters {
    /// Ranking length, when a ranking was computed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_n: Option<usize>,
    /// Period granularity, for bucketed reports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub granularity: Option<Granularity>,
    /// Date filter applied.
    pub date_range: DateRange,
}

/// Keyword ranking over a whole result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotspotReport {
    /// Parameters used.
    pub parameters: ReportParameters,
    /// Records that passed the date filter.
    pub records_analyzed: usize,
    /// Distinct normalized keywords seen.
    pub distinct_keywords: usize,
    /// Top keywords, count descending then keyword ascending.
    pub keywords: Vec<KeywordCount>,
    /// Sample articles for each top keyword.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub keyword_articles: BTreeMap<String, Vec<ArticleRef>>,
}

/// Keyword rankings per time bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendReport {
    /// Parameters used.
    pub parameters: ReportParameters,
    /// Gap-free chronological buckets.
    pub buckets: Vec<TimeBucket>,
    /// Series for the overall top keywords.
    pub series: Vec<KeywordSeries>,
    /// Records without a parseable publication date.
    pub undated: usize,
    /// Dated records outside the date range.
    pub out_of_range: usize,
}

/// Publication counts per time bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationCountReport {
    /// Parameters used.
    pub parameters: ReportParameters,
    /// Gap-free chronological buckets (no keyword rankings).
    pub buckets: Vec<TimeBucket>,
    /// Records placed in a bucket.
    pub total_publications: usize,
    /// Records without a parseable publication date.
    pub undated: usize,
    /// Dated records outside the date range.
    pub out_of_range: usize,
}

impl PublicationCountReport {
    /// The busiest bucket, earliest on ties.
    #[must_use]
    pub fn peak(&self) -> Option<&TimeBucket> {
        self.buckets
            .iter()
            .filter(|b| b.publication_count > 0)
            .fold(None, |best: Option<&TimeBucket>, b| match best {
                Some(cur) if cur.publication_count >= b.publication_count => Some(cur),
                _ => Some(b),
            })
    }
}

/// Result of one analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Result file analyzed.
    pub result_set: String,
    /// Query that produced the result set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Articles in the result set.
    pub article_count: usize,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Keyword ranking.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotspots: Option<HotspotReport>,
    /// Keyword rankings over time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trends: Option<TrendReport>,
    /// Publication counts over time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_counts: Option<PublicationCountReport>,
}
