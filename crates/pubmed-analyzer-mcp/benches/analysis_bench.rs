//! Criterion benchmarks for the analysis engine.
//!
//! Synthetic result sets of 1K and 10K articles with MeSH-like keywords,
//! spread over ten years of publication dates.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use pubmed_analyzer_mcp::AnalysisEngine;
use pubmed_analyzer_mcp::config::{AnalysisConfig, FieldSelection};
use pubmed_analyzer_mcp::models::{ArticleRecord, DateRange, Granularity};

const MONTHS: [&str; 12] =
    ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

/// Helper: deterministic synthetic articles.
fn make_articles(n: usize) -> Vec<ArticleRecord> {
    (0..n)
        .map(|i| ArticleRecord {
            pmid: i.to_string(),
            title: format!("Effects of treatment {} on outcome {} in adults", i % 37, i % 11),
            r#abstract: Some(format!(
                "Background: cohort {} was followed for {} months. Results: marker {} improved.",
                i % 53,
                i % 24,
                i % 17
            )),
            keywords: (0..6).map(|k| format!("Term {}", (i * 7 + k * 13) % 400)).collect(),
            publication_date: Some(format!("{} {}", 2015 + (i % 10), MONTHS[i % 12])),
            ..Default::default()
        })
        .collect()
}

fn bench_hotspots(c: &mut Criterion) {
    let mut group = c.benchmark_group("hotspots");
    let keywords_only = AnalysisEngine::default();
    let all_fields = AnalysisEngine::new(AnalysisConfig::with_fields(FieldSelection::ALL));

    for n in [1_000, 10_000] {
        let articles = make_articles(n);
        group.bench_with_input(BenchmarkId::new("keywords", n), &articles, |b, articles| {
            b.iter(|| keywords_only.hotspots(black_box(articles), 20));
        });
        group.bench_with_input(BenchmarkId::new("all_fields", n), &articles, |b, articles| {
            b.iter(|| all_fields.hotspots(black_box(articles), 20));
        });
    }
    group.finish();
}

fn bench_trends(c: &mut Criterion) {
    let mut group = c.benchmark_group("trends");
    let engine = AnalysisEngine::default();
    let articles = make_articles(10_000);

    for granularity in [Granularity::Month, Granularity::Quarter, Granularity::Year] {
        group.bench_function(granularity.as_str(), |b| {
            b.iter(|| engine.trends(black_box(&articles), 10, granularity, &DateRange::unbounded()));
        });
    }
    group.finish();
}

fn bench_publication_counts(c: &mut Criterion) {
    let engine = AnalysisEngine::default();
    let articles = make_articles(10_000);

    c.bench_function("publication_counts_month_10k", |b| {
        b.iter(|| {
            engine.publication_counts(black_box(&articles), Granularity::Month, &DateRange::unbounded())
        });
    });
}

criterion_group!(benches, bench_hotspots, bench_trends, bench_publication_counts);
criterion_main!(benches);
