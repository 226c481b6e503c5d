//! Mock-based tool tests using wiremock and a temporary results directory.
//!
//! These tests drive the MCP tools end to end: search, save, list, analyze.

use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pubmed_analyzer_mcp::config::Config;
use pubmed_analyzer_mcp::error::{AnalysisError, ToolError};
use pubmed_analyzer_mcp::models::{ArticleRecord, ResultSet};
use pubmed_analyzer_mcp::tools::{
    ComprehensiveAnalysisTool, ListResultFilesTool, McpTool, PublicationCountTool,
    ResearchHotspotsTool, ResearchTrendsTool, SearchPubmedTool, ToolContext, register_all_tools,
};

/// Create a test context with a mock server and an empty results directory.
fn setup_test_context(base_url: &str, dir: &TempDir) -> ToolContext {
    let config = Config::for_testing(base_url, dir.path());
    ToolContext::from_config(&config).unwrap()
}

/// Context for tools that never touch the network.
fn offline_context(dir: &TempDir) -> ToolContext {
    setup_test_context("http://127.0.0.1:9", dir)
}

fn record(pmid: &str, date: &str, keywords: &[&str]) -> ArticleRecord {
    ArticleRecord {
        pmid: pmid.to_string(),
        title: format!("Study {pmid}"),
        publication_date: Some(date.to_string()),
        keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        journal: Some("Test Journal".to_string()),
        ..Default::default()
    }
}

/// Save a small result set and return its JSON file name.
fn seed_results(ctx: &ToolContext) -> String {
    let set = ResultSet::new(
        "asthma",
        vec![
            record("1", "2024 Jan", &["Asthma", "Child"]),
            record("2", "2024 Feb", &["Asthma"]),
            record("3", "2024 Apr 2", &["Asthma", "Air Pollution"]),
            record("4", "2023 Nov", &["Child"]),
        ],
    );
    ctx.store.save(Some("asthma"), &set).unwrap().json_file
}

fn pubmed_xml(pmid: &str) -> String {
    format!(
        r#"<?xml version="1.0" ?>
<PubmedArticleSet>
  <PubmedArticle>
    <MedlineCitation>
      <PMID>{pmid}</PMID>
      <Article>
        <Journal><JournalIssue><PubDate><Year>2024</Year><Month>May</Month></PubDate></JournalIssue><Title>Thorax</Title></Journal>
        <ArticleTitle>Asthma outcomes</ArticleTitle>
      </Article>
      <MeshHeadingList><MeshHeading><DescriptorName>Asthma</DescriptorName></MeshHeading></MeshHeadingList>
    </MedlineCitation>
  </PubmedArticle>
</PubmedArticleSet>"#
    )
}

// =============================================================================
// search_pubmed
// =============================================================================

#[tokio::test]
async fn test_search_saves_results_and_lists_them() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("retmax", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "esearchresult": {"idlist": ["555"]}
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(pubmed_xml("555")))
        .mount(&mock_server)
        .await;

    let ctx = setup_test_context(&mock_server.uri(), &dir);

    let result = SearchPubmedTool
        .execute(
            &ctx,
            json!({"advanced_search": "asthma[MeSH]", "max_results": 25, "output_filename": "asthma"}),
        )
        .await
        .unwrap();
    assert!(result.contains("# PubMed Search Complete"));
    assert!(result.contains("**Articles saved**: 1"));
    assert!(result.contains("asthma_"));

    let listing = ListResultFilesTool
        .execute(&ctx, json!({"response_format": "json"}))
        .await
        .unwrap();
    let listing: Value = serde_json::from_str(&listing).unwrap();
    assert_eq!(listing["count"], 2);
    let json_file = listing["files"]["recommended"][0].as_str().unwrap().to_string();
    assert!(json_file.starts_with("asthma_"));

    let loaded = ctx.store.load(&json_file).unwrap();
    assert_eq!(loaded.query.as_deref(), Some("asthma[MeSH]"));
    assert_eq!(loaded.articles[0].pmid, "555");
}

#[tokio::test]
async fn test_search_json_response() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "esearchresult": {"idlist": ["1"]}
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(pubmed_xml("1")))
        .mount(&mock_server)
        .await;

    let ctx = setup_test_context(&mock_server.uri(), &dir);
    let result = SearchPubmedTool
        .execute(&ctx, json!({"advanced_search": "asthma", "response_format": "json"}))
        .await
        .unwrap();

    let parsed: Value = serde_json::from_str(&result).unwrap();
    assert_eq!(parsed["success"], true);
    assert_eq!(parsed["article_count"], 1);
    assert!(parsed["json_file"].as_str().unwrap().starts_with("pubmed_results_"));
}

#[tokio::test]
async fn test_search_one_sided_date_range() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let expected = r#"asthma AND ("2020/01/01"[Date - Publication] : "3000/12/31"[Date - Publication])"#;
    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("term", expected))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "esearchresult": {"idlist": []}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let ctx = setup_test_context(&mock_server.uri(), &dir);
    let result = SearchPubmedTool
        .execute(&ctx, json!({"advanced_search": "asthma", "start_date": "2020/01/01"}))
        .await
        .unwrap();

    assert!(result.contains("No results found"));
    assert!(ctx.store.list().unwrap().is_empty());
}

#[tokio::test]
async fn test_search_requires_email() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::for_testing("http://127.0.0.1:9", dir.path());
    config.email = None;
    let ctx = ToolContext::from_config(&config).unwrap();

    let err = SearchPubmedTool
        .execute(&ctx, json!({"advanced_search": "asthma"}))
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::Unavailable(_)));
    assert!(err.to_user_message().contains("NCBI_USER_EMAIL"));
}

#[tokio::test]
async fn test_search_validates_input() {
    let dir = TempDir::new().unwrap();
    let ctx = offline_context(&dir);

    let err = SearchPubmedTool.execute(&ctx, json!({"advanced_search": "   "})).await.unwrap_err();
    assert!(matches!(err, ToolError::Validation { ref field, .. } if field == "advanced_search"));

    let err = SearchPubmedTool
        .execute(&ctx, json!({"advanced_search": "asthma", "max_results": 0}))
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::Validation { ref field, .. } if field == "max_results"));

    let err = SearchPubmedTool
        .execute(&ctx, json!({"advanced_search": "asthma", "end_date": "2020-12-31"}))
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::Validation { ref field, .. } if field == "end_date"));

    let err = SearchPubmedTool.execute(&ctx, json!({})).await.unwrap_err();
    assert!(matches!(err, ToolError::Serialization(_)));
}

#[tokio::test]
async fn test_search_upstream_error_is_reported() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad query"))
        .mount(&mock_server)
        .await;

    let ctx = setup_test_context(&mock_server.uri(), &dir);
    let err = SearchPubmedTool
        .execute(&ctx, json!({"advanced_search": "(("}))
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::Client(_)));
}

// =============================================================================
// list_result_files
// =============================================================================

#[tokio::test]
async fn test_list_result_files_empty() {
    let dir = TempDir::new().unwrap();
    let ctx = offline_context(&dir);

    let result = ListResultFilesTool.execute(&ctx, Value::Null).await.unwrap();
    assert!(result.contains("No result files found"));
    assert!(result.contains("search_pubmed"));
}

#[test]
fn test_list_result_files_outside_async_test() {
    let dir = TempDir::new().unwrap();
    let ctx = offline_context(&dir);
    seed_results(&ctx);

    let result = tokio_test::block_on(
        ListResultFilesTool.execute(&ctx, json!({"response_format": "json"})),
    )
    .unwrap();
    let parsed: Value = serde_json::from_str(&result).unwrap();
    assert_eq!(parsed["files"]["alternative"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_result_files_markdown() {
    let dir = TempDir::new().unwrap();
    let ctx = offline_context(&dir);
    let json_file = seed_results(&ctx);

    let result = ListResultFilesTool.execute(&ctx, json!({})).await.unwrap();
    assert!(result.contains("# Result Files (2 files)"));
    assert!(result.contains("## JSON (recommended)"));
    assert!(result.contains(&json_file));
}

// =============================================================================
// Analysis tools
// =============================================================================

#[tokio::test]
async fn test_hotspots_markdown() {
    let dir = TempDir::new().unwrap();
    let ctx = offline_context(&dir);
    let json_file = seed_results(&ctx);

    let result = ResearchHotspotsTool
        .execute(&ctx, json!({"filename": json_file, "top_n": 2}))
        .await
        .unwrap();

    assert!(result.contains("## Research Hotspots"));
    assert!(result.contains("| 1 | asthma | 3 |"));
    assert!(result.contains("| 2 | child | 2 |"));
    assert!(result.contains("### Representative Articles"));
}

#[tokio::test]
async fn test_hotspots_json_from_text_file() {
    let dir = TempDir::new().unwrap();
    let ctx = offline_context(&dir);
    let txt_file = seed_results(&ctx).replace(".json", ".txt");

    let result = ResearchHotspotsTool
        .execute(
            &ctx,
            json!({"filename": txt_file, "top_n": 1, "articles_per_keyword": 0, "response_format": "json"}),
        )
        .await
        .unwrap();

    let parsed: Value = serde_json::from_str(&result).unwrap();
    assert_eq!(parsed["article_count"], 4);
    assert_eq!(parsed["hotspots"]["keywords"][0]["keyword"], "asthma");
    assert_eq!(parsed["hotspots"]["keywords"][0]["count"], 3);
    assert!(parsed["hotspots"].get("keyword_articles").is_none());
}

#[tokio::test]
async fn test_trends_quarterly_json() {
    let dir = TempDir::new().unwrap();
    let ctx = offline_context(&dir);
    let json_file = seed_results(&ctx);

    let result = ResearchTrendsTool
        .execute(
            &ctx,
            json!({"filename": json_file, "granularity": "quarter", "response_format": "json"}),
        )
        .await
        .unwrap();

    let parsed: Value = serde_json::from_str(&result).unwrap();
    let trends = &parsed["trends"];
    assert_eq!(trends["periods"], json!(["2023-Q4", "2024-Q1", "2024-Q2"]));
    assert_eq!(trends["buckets"][1]["count"], 2);
    assert_eq!(trends["series"][0]["keyword"], "asthma");
    assert_eq!(trends["series"][0]["counts"], json!([0, 2, 1]));
}

#[tokio::test]
async fn test_trends_reject_bad_granularity() {
    let dir = TempDir::new().unwrap();
    let ctx = offline_context(&dir);
    let json_file = seed_results(&ctx);

    let err = ResearchTrendsTool
        .execute(&ctx, json!({"filename": json_file, "granularity": "weekly"}))
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::Analysis(AnalysisError::InvalidParameter { .. })));

    let err = ResearchTrendsTool
        .execute(&ctx, json!({"filename": json_file, "top_n": 0}))
        .await
        .unwrap_err();
    assert!(err.to_user_message().contains("top_n"));
}

#[tokio::test]
async fn test_publication_count_with_range() {
    let dir = TempDir::new().unwrap();
    let ctx = offline_context(&dir);
    let json_file = seed_results(&ctx);

    let result = PublicationCountTool
        .execute(
            &ctx,
            json!({
                "filename": json_file,
                "months_per_period": 1,
                "start_date": "2024-01",
                "end_date": "2024-04",
                "response_format": "json"
            }),
        )
        .await
        .unwrap();

    let parsed: Value = serde_json::from_str(&result).unwrap();
    let counts = &parsed["publication_counts"];
    assert_eq!(counts["total_publications"], 3);
    assert_eq!(counts["out_of_range"], 1);
    assert_eq!(counts["buckets"].as_array().unwrap().len(), 4);
    assert_eq!(counts["buckets"][2]["count"], 0);
    assert_eq!(counts["peak"]["period"], "2024-01");
    assert!(parsed.get("hotspots").is_none());
}

#[tokio::test]
async fn test_publication_count_rejects_inverted_range() {
    let dir = TempDir::new().unwrap();
    let ctx = offline_context(&dir);
    let json_file = seed_results(&ctx);

    let err = PublicationCountTool
        .execute(
            &ctx,
            json!({"filename": json_file, "start_date": "2024-05", "end_date": "2024-01"}),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::Analysis(AnalysisError::InvalidParameter { .. })));
}

#[tokio::test]
async fn test_comprehensive_markdown() {
    let dir = TempDir::new().unwrap();
    let ctx = offline_context(&dir);
    let json_file = seed_results(&ctx);

    let result = ComprehensiveAnalysisTool
        .execute(&ctx, json!({"filename": json_file, "top_keywords": 3, "granularity": "year"}))
        .await
        .unwrap();

    assert!(result.contains("# Literature Analysis:"));
    assert!(result.contains("**Query**: `asthma`"));
    assert!(result.contains("## Research Hotspots"));
    assert!(result.contains("## Research Trends"));
    assert!(result.contains("## Publication Counts"));
    assert!(result.contains("| 2023 | 1 |"));
    assert!(result.contains("| 2024 | 3 |"));
}

#[tokio::test]
async fn test_analysis_missing_file() {
    let dir = TempDir::new().unwrap();
    let ctx = offline_context(&dir);

    let err = ComprehensiveAnalysisTool
        .execute(&ctx, json!({"filename": "missing.json"}))
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::Analysis(AnalysisError::NotFound { .. })));
    assert!(err.to_user_message().contains("list_result_files"));
}

#[tokio::test]
async fn test_analysis_rejects_traversal() {
    let dir = TempDir::new().unwrap();
    let ctx = offline_context(&dir);

    let err = ResearchHotspotsTool
        .execute(&ctx, json!({"filename": "../etc/passwd"}))
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::Analysis(AnalysisError::InvalidParameter { .. })));
}

// =============================================================================
// Registry
// =============================================================================

#[test]
fn test_all_tools_registered_with_object_schemas() {
    let tools = register_all_tools();
    let names: Vec<&str> = tools.iter().map(|t| t.name()).collect();
    assert_eq!(
        names,
        [
            "search_pubmed",
            "list_result_files",
            "analyze_research_hotspots",
            "analyze_research_trends",
            "analyze_publication_count",
            "generate_comprehensive_analysis",
        ]
    );

    for tool in &tools {
        let schema = tool.input_schema();
        assert_eq!(schema["type"], "object", "{} schema", tool.name());
        assert!(!tool.description().is_empty());
    }
}
