//! Analysis requests and report assembly.

use chrono::Utc;
use tracing::{debug, info};

use super::{AnalysisEngine, validate_top_n};
use crate::config::defaults;
use crate::error::{AnalysisError, AnalysisResult};
use crate::models::{AnalysisKind, AnalysisReport, DateRange, Granularity, ResultSet};
use crate::store::ResultStore;

/// One analysis request against a stored result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    /// Result set name in the store.
    pub result_set: String,
    /// Sub-reports to produce.
    pub kind: AnalysisKind,
    /// Ranking length for hotspots and trends.
    pub top_n: i64,
    /// Period size for trends and publication counts.
    pub granularity: Granularity,
    /// Date filter shared by every sub-report.
    pub date_range: DateRange,
    /// Sample articles per hotspot keyword.
    pub articles_per_keyword: usize,
}

impl AnalysisRequest {
    /// Request with default parameters.
    #[must_use]
    pub fn new(result_set: impl Into<String>, kind: AnalysisKind) -> Self {
        Self {
            result_set: result_set.into(),
            kind,
            top_n: defaults::TOP_N,
            granularity: Granularity::default(),
            date_range: DateRange::unbounded(),
            articles_per_keyword: defaults::ARTICLES_PER_KEYWORD,
        }
    }

    /// Set the ranking length.
    #[must_use]
    pub const fn top_n(mut self, top_n: i64) -> Self {
        self.top_n = top_n;
        self
    }

    /// Set the period granularity.
    #[must_use]
    pub const fn granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    /// Set the date filter.
    #[must_use]
    pub const fn date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = date_range;
        self
    }

    /// Set the number of sample articles per hotspot keyword.
    #[must_use]
    pub const fn articles_per_keyword(mut self, n: usize) -> Self {
        self.articles_per_keyword = n;
        self
    }

    /// Check every parameter without touching the store.
    pub fn validate(&self) -> AnalysisResult<()> {
        if self.result_set.trim().is_empty() {
            return Err(AnalysisError::invalid("filename", "must not be empty"));
        }
        if self.kind.includes_hotspots() || self.kind.includes_trends() {
            validate_top_n(self.top_n)?;
        }
        // Re-check the range in case it was built field by field.
        DateRange::new(self.date_range.start, self.date_range.end)?;
        Ok(())
    }
}

impl AnalysisEngine {
    /// Validate `request`, load its result set from `store` and analyze it.
    ///
    /// Nothing is loaded when a parameter is invalid. Any sub-report error
    /// fails the whole request.
    pub fn compose(
        &self,
        store: &dyn ResultStore,
        request: &AnalysisRequest,
    ) -> AnalysisResult<AnalysisReport> {
        request.validate()?;
        let result_set = store.load(&request.result_set)?;
        info!(
            result_set = %request.result_set,
            articles = result_set.len(),
            kind = ?request.kind,
            "Analyzing result set"
        );
        self.analyze(&request.result_set, &result_set, request)
    }

    /// Produce the requested sub-reports from one loaded snapshot.
    pub fn analyze(
        &self,
        name: &str,
        result_set: &ResultSet,
        request: &AnalysisRequest,
    ) -> AnalysisResult<AnalysisReport> {
        let records = &result_set.articles;
        let range = &request.date_range;

        let hotspots = if request.kind.includes_hotspots() {
            Some(self.hotspot_report(records, request.top_n, range, request.articles_per_keyword)?)
        } else {
            None
        };

        let trends = if request.kind.includes_trends() {
            Some(self.trends(records, request.top_n, request.granularity, range)?)
        } else {
            None
        };

        let publication_counts = request
            .kind
            .includes_publication_counts()
            .then(|| self.publication_counts(records, request.granularity, range));

        debug!(name, kind = ?request.kind, "Report composed");

        Ok(AnalysisReport {
            result_set: name.to_string(),
            query: result_set.query.clone(),
            article_count: result_set.len(),
            generated_at: Utc::now(),
            hotspots,
            trends,
            publication_counts,
        })
    }
}
