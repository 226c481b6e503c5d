//! Analysis tools: research hotspots, research trends, publication counts and
//! the comprehensive report.

use serde_json::{Value, json};
use tracing::info;

use super::{McpTool, ToolContext, run_blocking};
use crate::analysis::AnalysisRequest;
use crate::error::ToolResult;
use crate::formatters;
use crate::models::{
    AnalysisKind, AnalysisReport, ComprehensiveAnalysisInput, DateRange, Granularity,
    HotspotInput, PublicationCountInput, ResponseFormat, TrendInput,
};

/// Compose a report on the blocking pool and render it.
async fn run_analysis(
    ctx: &ToolContext,
    request: AnalysisRequest,
    format: ResponseFormat,
) -> ToolResult<String> {
    let engine = ctx.engine.clone();
    let store = ctx.store.clone();
    let kind = request.kind;
    let name = request.result_set.clone();

    let report: AnalysisReport =
        run_blocking(move || Ok(engine.compose(store.as_ref(), &request)?)).await?;

    info!(result_set = %name, kind = ?kind, articles = report.article_count, "Analysis complete");

    match format {
        ResponseFormat::Markdown => Ok(formatters::format_report_markdown(&report)),
        ResponseFormat::Json => Ok(serde_json::to_string(&formatters::compact_report(&report))?),
    }
}

fn filename_property() -> Value {
    json!({
        "type": "string",
        "description": "Result file from search_pubmed (.json recommended, .txt accepted)"
    })
}

fn date_properties() -> (Value, Value) {
    (
        json!({
            "type": "string",
            "description": "First publication month included (YYYY, YYYY-MM or YYYY/MM/DD)"
        }),
        json!({
            "type": "string",
            "description": "Last publication month included (YYYY, YYYY-MM or YYYY/MM/DD)"
        }),
    )
}

fn granularity_properties() -> (Value, Value) {
    (
        json!({
            "type": "string",
            "enum": ["month", "quarter", "year"],
            "default": "month"
        }),
        json!({
            "type": "integer",
            "enum": [1, 3, 12],
            "description": "Alternative to granularity: months per period"
        }),
    )
}

fn response_format_property() -> Value {
    json!({
        "type": "string",
        "enum": ["markdown", "json"],
        "default": "markdown"
    })
}

/// Keyword hotspot ranking tool.
pub struct ResearchHotspotsTool;

#[async_trait::async_trait]
impl McpTool for ResearchHotspotsTool {
    fn name(&self) -> &'static str {
        "analyze_research_hotspots"
    }

    fn description(&self) -> &'static str {
        "Rank the most frequent keywords (MeSH terms and author keywords) in a saved \
         result file, with representative articles for each keyword."
    }

    fn input_schema(&self) -> Value {
        let (start_date, end_date) = date_properties();
        json!({
            "type": "object",
            "properties": {
                "filename": filename_property(),
                "top_n": {"type": "integer", "default": 20, "minimum": 1},
                "start_date": start_date,
                "end_date": end_date,
                "articles_per_keyword": {"type": "integer", "default": 5, "minimum": 0},
                "response_format": response_format_property()
            },
            "required": ["filename"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: Value) -> ToolResult<String> {
        let params: HotspotInput = serde_json::from_value(input)?;
        let date_range = DateRange::parse(params.start_date.as_deref(), params.end_date.as_deref())?;

        let request = AnalysisRequest::new(params.filename, AnalysisKind::Hotspots)
            .top_n(params.top_n)
            .date_range(date_range)
            .articles_per_keyword(params.articles_per_keyword);

        run_analysis(ctx, request, params.response_format).await
    }
}

/// Keyword trends over time tool.
pub struct ResearchTrendsTool;

#[async_trait::async_trait]
impl McpTool for ResearchTrendsTool {
    fn name(&self) -> &'static str {
        "analyze_research_trends"
    }

    fn description(&self) -> &'static str {
        "Track how keyword frequencies change over time in a saved result file. \
         Articles are grouped by publication month, quarter or year."
    }

    fn input_schema(&self) -> Value {
        let (start_date, end_date) = date_properties();
        let (granularity, months_per_period) = granularity_properties();
        json!({
            "type": "object",
            "properties": {
                "filename": filename_property(),
                "top_n": {"type": "integer", "default": 20, "minimum": 1},
                "granularity": granularity,
                "months_per_period": months_per_period,
                "start_date": start_date,
                "end_date": end_date,
                "response_format": response_format_property()
            },
            "required": ["filename"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: Value) -> ToolResult<String> {
        let params: TrendInput = serde_json::from_value(input)?;
        let granularity =
            Granularity::resolve(params.granularity.as_deref(), params.months_per_period)?;
        let date_range = DateRange::parse(params.start_date.as_deref(), params.end_date.as_deref())?;

        let request = AnalysisRequest::new(params.filename, AnalysisKind::Trends)
            .top_n(params.top_n)
            .granularity(granularity)
            .date_range(date_range);

        run_analysis(ctx, request, params.response_format).await
    }
}

/// Publication counts per period tool.
pub struct PublicationCountTool;

#[async_trait::async_trait]
impl McpTool for PublicationCountTool {
    fn name(&self) -> &'static str {
        "analyze_publication_count"
    }

    fn description(&self) -> &'static str {
        "Count publications per month, quarter or year in a saved result file. \
         Periods with no publications are included."
    }

    fn input_schema(&self) -> Value {
        let (start_date, end_date) = date_properties();
        let (granularity, months_per_period) = granularity_properties();
        json!({
            "type": "object",
            "properties": {
                "filename": filename_property(),
                "granularity": granularity,
                "months_per_period": months_per_period,
                "start_date": start_date,
                "end_date": end_date,
                "response_format": response_format_property()
            },
            "required": ["filename"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: Value) -> ToolResult<String> {
        let params: PublicationCountInput = serde_json::from_value(input)?;
        let granularity =
            Granularity::resolve(params.granularity.as_deref(), params.months_per_period)?;
        let date_range = DateRange::parse(params.start_date.as_deref(), params.end_date.as_deref())?;

        let request = AnalysisRequest::new(params.filename, AnalysisKind::PublicationCounts)
            .granularity(granularity)
            .date_range(date_range);

        run_analysis(ctx, request, params.response_format).await
    }
}

/// Hotspots, trends and publication counts in one report.
pub struct ComprehensiveAnalysisTool;

#[async_trait::async_trait]
impl McpTool for ComprehensiveAnalysisTool {
    fn name(&self) -> &'static str {
        "generate_comprehensive_analysis"
    }

    fn description(&self) -> &'static str {
        "Produce research hotspots, keyword trends and publication counts for a saved \
         result file in a single report, all over the same date range."
    }

    fn input_schema(&self) -> Value {
        let (start_date, end_date) = date_properties();
        let (granularity, months_per_period) = granularity_properties();
        json!({
            "type": "object",
            "properties": {
                "filename": filename_property(),
                "top_n": {"type": "integer", "default": 20, "minimum": 1},
                "granularity": granularity,
                "months_per_period": months_per_period,
                "start_date": start_date,
                "end_date": end_date,
                "articles_per_keyword": {"type": "integer", "default": 5, "minimum": 0},
                "response_format": response_format_property()
            },
            "required": ["filename"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: Value) -> ToolResult<String> {
        let params: ComprehensiveAnalysisInput = serde_json::from_value(input)?;
        let granularity =
            Granularity::resolve(params.granularity.as_deref(), params.months_per_period)?;
        let date_range = DateRange::parse(params.start_date.as_deref(), params.end_date.as_deref())?;

        let request = AnalysisRequest::new(params.filename, AnalysisKind::Comprehensive)
            .top_n(params.top_n)
            .granularity(granularity)
            .date_range(date_range)
            .articles_per_keyword(params.articles_per_keyword);

        run_analysis(ctx, request, params.response_format).await
    }
}
