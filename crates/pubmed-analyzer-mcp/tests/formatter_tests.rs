//! Tests for Markdown and JSON report formatting.

use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeZone, Utc};

use pubmed_analyzer_mcp::formatters::{
    compact_publication_counts, compact_report, compact_saved, format_hotspots_markdown,
    format_listing_markdown, format_publication_counts_markdown, format_report_markdown,
    format_saved_markdown, format_trends_markdown,
};
use pubmed_analyzer_mcp::models::{
    AnalysisReport, ArticleRef, DateRange, Granularity, HotspotReport, KeywordCount,
    KeywordSeries, PublicationCountReport, ReportParameters, TimeBucket, TrendReport,
};
use pubmed_analyzer_mcp::store::{ResultSetListing, SavedResultSet};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn bucket(label: &str, start: NaiveDate, end: NaiveDate, count: usize, keywords: Vec<KeywordCount>) -> TimeBucket {
    TimeBucket { label: label.to_string(), start, end, publication_count: count, keywords }
}

fn hotspots() -> HotspotReport {
    let mut keyword_articles = BTreeMap::new();
    keyword_articles.insert(
        "asthma".to_string(),
        vec![ArticleRef {
            pmid: "42".to_string(),
            title: "Asthma in cities".to_string(),
            journal: Some("Thorax".to_string()),
            publication_date: Some("2024 Jan".to_string()),
            doi: Some("10.1/abc".to_string()),
        }],
    );
    HotspotReport {
        parameters: ReportParameters { top_n: Some(2), granularity: None, date_range: DateRange::unbounded() },
        records_analyzed: 3,
        distinct_keywords: 4,
        keywords: vec![KeywordCount::new("asthma", 3), KeywordCount::new("child", 2)],
        keyword_articles,
    }
}

fn trends() -> TrendReport {
    TrendReport {
        parameters: ReportParameters {
            top_n: Some(2),
            granularity: Some(Granularity::Month),
            date_range: DateRange::unbounded(),
        },
        buckets: vec![
            bucket("2024-01", day(2024, 1, 1), day(2024, 1, 31), 2, vec![KeywordCount::new("asthma", 2)]),
            bucket("2024-02", day(2024, 2, 1), day(2024, 2, 29), 0, vec![]),
        ],
        series: vec![KeywordSeries { keyword: "asthma".to_string(), total: 2, counts: vec![2, 0] }],
        undated: 1,
        out_of_range: 0,
    }
}

fn counts() -> PublicationCountReport {
    PublicationCountReport {
        parameters: ReportParameters {
            top_n: None,
            granularity: Some(Granularity::Year),
            date_range: DateRange::unbounded(),
        },
        buckets: vec![
            bucket("2023", day(2023, 1, 1), day(2023, 12, 31), 5, vec![]),
            bucket("2024", day(2024, 1, 1), day(2024, 12, 31), 7, vec![]),
        ],
        total_publications: 12,
        undated: 0,
        out_of_range: 0,
    }
}

fn report() -> AnalysisReport {
    AnalysisReport {
        result_set: "asthma_20240101120000.json".to_string(),
        query: Some("asthma[MeSH]".to_string()),
        article_count: 13,
        generated_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        hotspots: Some(hotspots()),
        trends: Some(trends()),
        publication_counts: Some(counts()),
    }
}

// =============================================================================
// Markdown
// =============================================================================

#[test]
fn test_hotspots_markdown_table_and_articles() {
    let md = format_hotspots_markdown(&hotspots());
    assert!(md.starts_with("## Research Hotspots"));
    assert!(md.contains("| 1 | asthma | 3 |"));
    assert!(md.contains("| 2 | child | 2 |"));
    assert!(md.contains("Asthma in cities (PMID 42)"));
    assert!(md.contains("*Thorax*"));
}

#[test]
fn test_hotspots_markdown_empty() {
    let mut report = hotspots();
    report.keywords.clear();
    report.keyword_articles.clear();
    assert!(format_hotspots_markdown(&report).contains("No keywords found."));
}

#[test]
fn test_trends_markdown_series_and_periods() {
    let md = format_trends_markdown(&trends());
    assert!(md.contains("| Keyword | Total | 2024-01 | 2024-02 |"));
    assert!(md.contains("| asthma | 2 | 2 | 0 |"));
    assert!(md.contains("**2024-02** (0 articles): none"));
}

#[test]
fn test_publication_counts_markdown_peak() {
    let md = format_publication_counts_markdown(&counts());
    assert!(md.contains("**Total publications**: 12"));
    assert!(md.contains("**Peak**: 2024 (7 articles)"));
    assert!(md.contains("| 2023 | 5 |"));
}

#[test]
fn test_report_markdown_contains_every_section() {
    let md = format_report_markdown(&report());
    assert!(md.starts_with("# Literature Analysis: asthma_20240101120000.json"));
    assert!(md.contains("**Query**: `asthma[MeSH]`"));
    assert!(md.contains("2024-06-01 12:00 UTC"));
    let hot = md.find("## Research Hotspots").unwrap();
    let trend = md.find("## Research Trends").unwrap();
    let count = md.find("## Publication Counts").unwrap();
    assert!(hot < trend && trend < count);
}

#[test]
fn test_listing_markdown() {
    let listing = ResultSetListing { json: vec!["a.json".into()], txt: vec!["a.txt".into()] };
    let md = format_listing_markdown(&listing);
    assert!(md.contains("# Result Files (2 files)"));
    assert!(md.contains("- `a.json`"));
    assert!(md.contains("## Text"));

    assert!(format_listing_markdown(&ResultSetListing::default()).contains("search_pubmed"));
}

#[test]
fn test_saved_markdown_suggests_analysis() {
    let saved = SavedResultSet {
        json_file: "x_1.json".into(),
        txt_file: "x_1.txt".into(),
        article_count: 10,
    };
    let md = format_saved_markdown("asthma", &saved);
    assert!(md.contains("**Articles saved**: 10"));
    assert!(md.contains("filename: \"x_1.json\""));
}

// =============================================================================
// JSON
// =============================================================================

#[test]
fn test_compact_report_sections() {
    let json = compact_report(&report());
    assert_eq!(json["article_count"], 13);
    assert_eq!(json["query"], "asthma[MeSH]");
    assert_eq!(json["hotspots"]["keywords"][0]["keyword"], "asthma");
    assert_eq!(json["trends"]["periods"][1], "2024-02");
    assert!(json["trends"]["buckets"][1].get("keywords").is_none());
    assert_eq!(json["trends"]["buckets"][0]["start"], "2024-01-01");
    assert_eq!(json["publication_counts"]["total_publications"], 12);
}

#[test]
fn test_compact_report_omits_missing_sections() {
    let mut only_counts = report();
    only_counts.hotspots = None;
    only_counts.trends = None;
    only_counts.query = None;
    let json = compact_report(&only_counts);
    assert!(json.get("hotspots").is_none());
    assert!(json.get("trends").is_none());
    assert!(json.get("query").is_none());
    assert!(json.get("publication_counts").is_some());
}

#[test]
fn test_compact_publication_counts_peak() {
    let json = compact_publication_counts(&counts());
    assert_eq!(json["peak"]["period"], "2024");
    assert_eq!(json["peak"]["count"], 7);
    assert_eq!(json["parameters"]["granularity"], "year");
}

#[test]
fn test_compact_saved() {
    let saved = SavedResultSet { json_file: "a.json".into(), txt_file: "a.txt".into(), article_count: 3 };
    let json = compact_saved("q", &saved);
    assert_eq!(json["success"], true);
    assert_eq!(json["txt_file"], "a.txt");
}
