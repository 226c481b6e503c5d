//! Markdown output formatting.

use crate::models::{
    AnalysisReport, ArticleRef, HotspotReport, KeywordCount, PublicationCountReport,
    ReportParameters, TrendReport,
};
use crate::store::{ResultSetListing, SavedResultSet};

/// Format a full analysis report as Markdown.
#[must_use]
pub fn format_report_markdown(report: &AnalysisReport) -> String {
    let mut output = format!("# Literature Analysis: {}\n\n", report.result_set);

    if let Some(query) = &report.query {
        output.push_str(&format!("**Query**: `{query}`\n\n"));
    }
    output.push_str(&format!(
        "**Articles**: {} | **Generated**: {}\n\n",
        report.article_count,
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    if let Some(hotspots) = &report.hotspots {
        output.push_str("---\n\n");
        output.push_str(&format_hotspots_markdown(hotspots));
    }
    if let Some(trends) = &report.trends {
        output.push_str("---\n\n");
        output.push_str(&format_trends_markdown(trends));
    }
    if let Some(counts) = &report.publication_counts {
        output.push_str("---\n\n");
        output.push_str(&format_publication_counts_markdown(counts));
    }

    output
}

/// Format a hotspot ranking as Markdown.
#[must_use]
pub fn format_hotspots_markdown(report: &HotspotReport) -> String {
    let mut output = String::from("## Research Hotspots\n\n");
    output.push_str(&parameters_line(&report.parameters));
    output.push_str(&format!(
        "**Records analyzed**: {} | **Distinct keywords**: {}\n\n",
        report.records_analyzed, report.distinct_keywords
    ));

    if report.keywords.is_empty() {
        output.push_str("No keywords found.\n\n");
        return output;
    }

    output.push_str("| Rank | Keyword | Count |\n|------|---------|-------|\n");
    for (i, kw) in report.keywords.iter().enumerate() {
        output.push_str(&format!("| {} | {} | {} |\n", i + 1, kw.keyword, kw.count));
    }
    output.push('\n');

    if !report.keyword_articles.is_empty() {
        output.push_str("### Representative Articles\n\n");
        for kw in &report.keywords {
            let Some(refs) = report.keyword_articles.get(&kw.keyword) else {
                continue;
            };
            output.push_str(&format!("**{}**\n", kw.keyword));
            for r in refs {
                output.push_str(&format!("- {}\n", format_article_ref(r)));
            }
            output.push('\n');
        }
    }

    output
}

/// Format keyword trends as Markdown.
#[must_use]
pub fn format_trends_markdown(report: &TrendReport) -> String {
    let mut output = String::from("## Research Trends\n\n");
    output.push_str(&parameters_line(&report.parameters));
    output.push_str(&excluded_line(report.undated, report.out_of_range));

    if report.buckets.is_empty() {
        output.push_str("No dated articles in range.\n\n");
        return output;
    }

    if !report.series.is_empty() {
        output.push_str("### Keyword Series\n\n");
        output.push_str("| Keyword | Total |");
        for bucket in &report.buckets {
            output.push_str(&format!(" {} |", bucket.label));
        }
        output.push_str("\n|---------|-------|");
        output.push_str(&"---|".repeat(report.buckets.len()));
        output.push('\n');
        for series in &report.series {
            output.push_str(&format!("| {} | {} |", series.keyword, series.total));
            for count in &series.counts {
                output.push_str(&format!(" {count} |"));
            }
            output.push('\n');
        }
        output.push('\n');
    }

    output.push_str("### Top Keywords per Period\n\n");
    for bucket in &report.buckets {
        output.push_str(&format!("**{}** ({} articles): ", bucket.label, bucket.publication_count));
        if bucket.keywords.is_empty() {
            output.push_str("none\n");
        } else {
            output.push_str(&format!("{}\n", keyword_list(&bucket.keywords)));
        }
    }
    output.push('\n');

    output
}

/// Format publication counts as Markdown.
#[must_use]
pub fn format_publication_counts_markdown(report: &PublicationCountReport) -> String {
    let mut output = String::from("## Publication Counts\n\n");
    output.push_str(&parameters_line(&report.parameters));
    output.push_str(&format!("**Total publications**: {}", report.total_publications));
    if let Some(peak) = report.peak() {
        output.push_str(&format!(
            " | **Peak**: {} ({} articles)",
            peak.label, peak.publication_count
        ));
    }
    output.push_str("\n\n");
    output.push_str(&excluded_line(report.undated, report.out_of_range));

    if report.buckets.is_empty() {
        output.push_str("No dated articles in range.\n\n");
        return output;
    }

    output.push_str("| Period | Articles |\n|--------|----------|\n");
    for bucket in &report.buckets {
        output.push_str(&format!("| {} | {} |\n", bucket.label, bucket.publication_count));
    }
    output.push('\n');

    output
}

/// Format the stored result files as Markdown.
#[must_use]
pub fn format_listing_markdown(listing: &ResultSetListing) -> String {
    if listing.is_empty() {
        return "No result files found. Run `search_pubmed` first.".to_string();
    }

    let mut output = format!("# Result Files ({} files)\n\n", listing.len());
    if !listing.json.is_empty() {
        output.push_str("## JSON (recommended)\n\n");
        for name in &listing.json {
            output.push_str(&format!("- `{name}`\n"));
        }
        output.push('\n');
    }
    if !listing.txt.is_empty() {
        output.push_str("## Text\n\n");
        for name in &listing.txt {
            output.push_str(&format!("- `{name}`\n"));
        }
        output.push('\n');
    }
    output
}

/// Format the outcome of a search-and-save as Markdown.
#[must_use]
pub fn format_saved_markdown(query: &str, saved: &SavedResultSet) -> String {
    format!(
        "# PubMed Search Complete\n\n\
         **Query**: `{query}`\n\
         **Articles saved**: {}\n\n\
         - JSON: `{}`\n\
         - Text: `{}`\n\n\
         Analyze with `analyze_research_hotspots`, `analyze_research_trends`, \
         `analyze_publication_count` or `generate_comprehensive_analysis` using \
         `filename: \"{}\"`.\n",
        saved.article_count, saved.json_file, saved.txt_file, saved.json_file
    )
}

fn format_article_ref(r: &ArticleRef) -> String {
    let mut line = format!("{} (PMID {})", r.title, r.pmid);
    if let Some(journal) = &r.journal {
        line.push_str(&format!(", *{journal}*"));
    }
    if let Some(date) = &r.publication_date {
        line.push_str(&format!(", {date}"));
    }
    if let Some(doi) = &r.doi {
        line.push_str(&format!(" [DOI](https://doi.org/{doi})"));
    }
    line
}

fn parameters_line(params: &ReportParameters) -> String {
    let mut parts = Vec::new();
    if let Some(top_n) = params.top_n {
        parts.push(format!("**Top**: {top_n}"));
    }
    if let Some(granularity) = params.granularity {
        parts.push(format!("**Granularity**: {granularity}"));
    }
    parts.push(format!("**Dates**: {}", params.date_range));
    format!("{}\n\n", parts.join(" | "))
}

fn excluded_line(undated: usize, out_of_range: usize) -> String {
    if undated == 0 && out_of_range == 0 {
        return String::new();
    }
    format!("*Excluded: {undated} undated, {out_of_range} outside the date range.*\n\n")
}

fn keyword_list(keywords: &[KeywordCount]) -> String {
    keywords.iter().map(|k| format!("{} ({})", k.keyword, k.count)).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DateRange;

    #[test]
    fn test_empty_listing() {
        let output = format_listing_markdown(&ResultSetListing::default());
        assert!(output.contains("search_pubmed"));
    }

    #[test]
    fn test_hotspots_table() {
        let report = HotspotReport {
            parameters: ReportParameters {
                top_n: Some(2),
                granularity: None,
                date_range: DateRange::unbounded(),
            },
            records_analyzed: 3,
            distinct_keywords: 4,
            keywords: vec![KeywordCount::new("cancer", 3), KeywordCount::new("kras", 1)],
            keyword_articles: Default::default(),
        };
        let output = format_hotspots_markdown(&report);
        assert!(output.contains("| 1 | cancer | 3 |"));
        assert!(output.contains("**Dates**: all dates"));
        assert!(!output.contains("Representative Articles"));
    }
}
