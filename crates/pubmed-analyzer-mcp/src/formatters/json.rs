//! JSON output formatting with token efficiency.

use serde_json::{Value, json};

use crate::models::{
    AnalysisReport, HotspotReport, PublicationCountReport, TimeBucket, TrendReport,
};
use crate::store::{ResultSetListing, SavedResultSet};

/// Compact JSON for a full analysis report.
#[must_use]
pub fn compact_report(report: &AnalysisReport) -> Value {
    let mut obj = json!({
        "result_set": report.result_set,
        "article_count": report.article_count,
        "generated_at": report.generated_at.to_rfc3339(),
    });

    if let Some(query) = &report.query {
        obj["query"] = json!(query);
    }
    if let Some(hotspots) = &report.hotspots {
        obj["hotspots"] = compact_hotspots(hotspots);
    }
    if let Some(trends) = &report.trends {
        obj["trends"] = compact_trends(trends);
    }
    if let Some(counts) = &report.publication_counts {
        obj["publication_counts"] = compact_publication_counts(counts);
    }

    obj
}

/// Compact JSON for a hotspot ranking.
#[must_use]
pub fn compact_hotspots(report: &HotspotReport) -> Value {
    let mut obj = json!({
        "parameters": report.parameters,
        "records_analyzed": report.records_analyzed,
        "distinct_keywords": report.distinct_keywords,
        "keywords": report.keywords,
    });

    if !report.keyword_articles.is_empty() {
        obj["keyword_articles"] = json!(report.keyword_articles);
    }

    obj
}

/// Compact JSON for keyword trends.
#[must_use]
pub fn compact_trends(report: &TrendReport) -> Value {
    json!({
        "parameters": report.parameters,
        "periods": report.buckets.iter().map(|b| b.label.as_str()).collect::<Vec<_>>(),
        "buckets": report.buckets.iter().map(compact_bucket).collect::<Vec<_>>(),
        "series": report.series,
        "undated": report.undated,
        "out_of_range": report.out_of_range,
    })
}

/// Compact JSON for publication counts.
#[must_use]
pub fn compact_publication_counts(report: &PublicationCountReport) -> Value {
    let mut obj = json!({
        "parameters": report.parameters,
        "total_publications": report.total_publications,
        "buckets": report.buckets.iter().map(compact_bucket).collect::<Vec<_>>(),
        "undated": report.undated,
        "out_of_range": report.out_of_range,
    });

    if let Some(peak) = report.peak() {
        obj["peak"] = json!({"period": peak.label, "count": peak.publication_count});
    }

    obj
}

/// Compact JSON for one time bucket. Empty keyword lists are left out.
#[must_use]
pub fn compact_bucket(bucket: &TimeBucket) -> Value {
    let mut obj = json!({
        "period": bucket.label,
        "start": bucket.start,
        "end": bucket.end,
        "count": bucket.publication_count,
    });

    if !bucket.keywords.is_empty() {
        obj["keywords"] = json!(bucket.keywords);
    }

    obj
}

/// JSON for the stored result files.
#[must_use]
pub fn compact_listing(listing: &ResultSetListing) -> Value {
    json!({
        "files": {
            "recommended": listing.json,
            "alternative": listing.txt,
        },
        "count": listing.len(),
    })
}

/// JSON for a completed search-and-save.
#[must_use]
pub fn compact_saved(query: &str, saved: &SavedResultSet) -> Value {
    json!({
        "success": true,
        "query": query,
        "article_count": saved.article_count,
        "json_file": saved.json_file,
        "txt_file": saved.txt_file,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::KeywordCount;

    #[test]
    fn test_compact_bucket_omits_empty_keywords() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut bucket = TimeBucket {
            label: "2024-01".to_string(),
            start: day,
            end: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            publication_count: 2,
            keywords: vec![],
        };
        let compact = compact_bucket(&bucket);
        assert_eq!(compact["period"], "2024-01");
        assert_eq!(compact["start"], "2024-01-01");
        assert!(compact.get("keywords").is_none());

        bucket.keywords.push(KeywordCount::new("cancer", 2));
        assert_eq!(compact_bucket(&bucket)["keywords"][0]["keyword"], "cancer");
    }

    #[test]
    fn test_compact_listing_shape() {
        let listing = ResultSetListing { json: vec!["a.json".into()], txt: vec![] };
        let compact = compact_listing(&listing);
        assert_eq!(compact["files"]["recommended"], json!(["a.json"]));
        assert_eq!(compact["count"], 1);
    }
}
