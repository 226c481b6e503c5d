//! Literature analysis engine.
//!
//! The engine is synchronous and holds no mutable state; one instance is
//! shared behind an `Arc` by every tool call.
//!
//! - [`tokenizer`]: keyword candidates per record
//! - [`frequency`]: counting and ranking
//! - [`timeline`]: calendar periods and bucketing
//! - [`composer`]: request validation and report assembly

pub mod composer;
pub mod frequency;
pub mod timeline;
pub mod tokenizer;

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

pub use composer::AnalysisRequest;
pub use frequency::{KeywordTally, validate_top_n};
pub use timeline::Period;
pub use tokenizer::{CandidateExtractor, Tokenizer, WordExtractor, normalize_term};

use crate::config::AnalysisConfig;
use crate::error::AnalysisResult;
use crate::models::{
    ArticleRecord, ArticleRef, DateRange, Granularity, HotspotReport, KeywordCount, KeywordSeries,
    PublicationCountReport, ReportParameters, TimeBucket, TrendReport,
};

/// Keyword hotspot, trend and publication-count analysis over article records.
#[derive(Debug)]
pub struct AnalysisEngine {
    config: AnalysisConfig,
    tokenizer: Tokenizer,
}

impl AnalysisEngine {
    /// Create an engine with the default word extractor.
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        let tokenizer = Tokenizer::new(&config);
        Self { config, tokenizer }
    }

    /// Create an engine with a custom free-text extractor.
    #[must_use]
    pub fn with_extractor(config: AnalysisConfig, extractor: Box<dyn CandidateExtractor>) -> Self {
        let tokenizer = Tokenizer::with_extractor(config.fields, extractor);
        Self { config, tokenizer }
    }

    /// Engine configuration.
    #[must_use]
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Tokenizer in use.
    #[must_use]
    pub const fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// The `top_n` most frequent keywords over `records`.
    ///
    /// Empty input gives an empty ranking.
    pub fn hotspots(&self, records: &[ArticleRecord], top_n: i64) -> AnalysisResult<Vec<KeywordCount>> {
        let top_n = validate_top_n(top_n)?;
        let counts = frequency::tally(&self.tokenizer, records, self.config.counting);
        Ok(frequency::rank(&counts, top_n))
    }

    /// Hotspot ranking with sample articles per keyword.
    ///
    /// With a bounded range only dated records inside it are ranked.
    pub fn hotspot_report(
        &self,
        records: &[ArticleRecord],
        top_n: i64,
        range: &DateRange,
        articles_per_keyword: usize,
    ) -> AnalysisResult<HotspotReport> {
        let top_n = validate_top_n(top_n)?;

        let scoped: Vec<&ArticleRecord> = if range.is_bounded() {
            timeline::partition(records, range, self.config.year_only_as_january)
                .dated
                .into_iter()
                .map(|(_, r)| r)
                .collect()
        } else {
            records.iter().collect()
        };

        let counts = frequency::tally(&self.tokenizer, scoped.iter().copied(), self.config.counting);
        let keywords = frequency::rank(&counts, top_n);
        let keyword_articles = self.keyword_articles(&scoped, &keywords, articles_per_keyword);

        debug!(
            records = scoped.len(),
            distinct = counts.len(),
            top_n,
            "Computed hotspots"
        );

        Ok(HotspotReport {
            parameters: ReportParameters { top_n: Some(top_n), granularity: None, date_range: *range },
            records_analyzed: scoped.len(),
            distinct_keywords: counts.len(),
            keywords,
            keyword_articles,
        })
    }

    /// Per-period keyword rankings plus series for the overall top keywords.
    pub fn trends(
        &self,
        records: &[ArticleRecord],
        top_n: i64,
        granularity: Granularity,
        range: &DateRange,
    ) -> AnalysisResult<TrendReport> {
        let top_n = validate_top_n(top_n)?;
        let partition = timeline::partition(records, range, self.config.year_only_as_january);
        let periods = timeline::bucket_records(&partition, granularity, range);

        let mut overall = KeywordTally::new();
        let mut tallies = Vec::with_capacity(periods.len());
        let mut buckets = Vec::with_capacity(periods.len());
        for (period, members) in &periods {
            let tally = frequency::tally(&self.tokenizer, members.iter().copied(), self.config.counting);
            frequency::merge(&mut overall, &tally);
            buckets.push(bucket(*period, members.len(), frequency::rank(&tally, top_n)));
            tallies.push(tally);
        }

        let series = frequency::rank(&overall, top_n)
            .into_iter()
            .map(|top| KeywordSeries {
                counts: tallies.iter().map(|t| t.get(&top.keyword).copied().unwrap_or(0)).collect(),
                keyword: top.keyword,
                total: top.count,
            })
            .collect();

        debug!(
            buckets = buckets.len(),
            undated = partition.undated,
            out_of_range = partition.out_of_range,
            granularity = granularity.as_str(),
            "Computed trends"
        );

        Ok(TrendReport {
            parameters: ReportParameters {
                top_n: Some(top_n),
                granularity: Some(granularity),
                date_range: *range,
            },
            buckets,
            series,
            undated: partition.undated,
            out_of_range: partition.out_of_range,
        })
    }

    /// Publication counts per period. No keyword work is done.
    #[must_use]
    pub fn publication_counts(
        &self,
        records: &[ArticleRecord],
        granularity: Granularity,
        range: &DateRange,
    ) -> PublicationCountReport {
        let partition = timeline::partition(records, range, self.config.year_only_as_january);
        let buckets: Vec<TimeBucket> = timeline::bucket_records(&partition, granularity, range)
            .into_iter()
            .map(|(period, members)| bucket(period, members.len(), Vec::new()))
            .collect();

        debug!(
            buckets = buckets.len(),
            total = partition.dated.len(),
            undated = partition.undated,
            "Computed publication counts"
        );

        PublicationCountReport {
            parameters: ReportParameters { top_n: None, granularity: Some(granularity), date_range: *range },
            total_publications: partition.dated.len(),
            buckets,
            undated: partition.undated,
            out_of_range: partition.out_of_range,
        }
    }

    fn keyword_articles(
        &self,
        records: &[&ArticleRecord],
        keywords: &[KeywordCount],
        per_keyword: usize,
    ) -> BTreeMap<String, Vec<ArticleRef>> {
        let mut out: BTreeMap<String, Vec<ArticleRef>> = BTreeMap::new();
        if per_keyword == 0 || keywords.is_empty() {
            return out;
        }

        let wanted: HashSet<&str> = keywords.iter().map(|k| k.keyword.as_str()).collect();
        for record in records {
            let found: HashSet<String> =
                self.tokenizer.candidates(record).filter(|c| wanted.contains(c.as_str())).collect();
            for keyword in found {
                let refs = out.entry(keyword).or_default();
                if refs.len() < per_keyword {
                    refs.push(record.to_ref());
                }
            }
        }
        out
    }
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

fn bucket(period: Period, publication_count: usize, keywords: Vec<KeywordCount>) -> TimeBucket {
    TimeBucket {
        label: period.label(),
        start: period.start(),
        end: period.end(),
        publication_count,
        keywords,
    }
}
