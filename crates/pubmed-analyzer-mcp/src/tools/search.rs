//! Search and storage tools: search_pubmed, list_result_files.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::json;
use tracing::info;

use super::{McpTool, ToolContext, run_blocking};
use crate::config::eutils;
use crate::error::{ToolError, ToolResult};
use crate::formatters;
use crate::models::{ListResultFilesInput, ResponseFormat, ResultSet, SearchPubmedInput};

static SEARCH_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}/\d{2}/\d{2}$").expect("valid search date regex"));

/// Open bounds used when only one side of the date filter is given.
const EARLIEST_DATE: &str = "1800/01/01";
const LATEST_DATE: &str = "3000/12/31";

/// PubMed search tool. Saves the results as JSON and text files.
pub struct SearchPubmedTool;

#[async_trait::async_trait]
impl McpTool for SearchPubmedTool {
    fn name(&self) -> &'static str {
        "search_pubmed"
    }

    fn description(&self) -> &'static str {
        "Search PubMed with an advanced query and save the articles (title, authors, \
         journal, date, abstract, MeSH terms and keywords, DOI) to a JSON and a text \
         file for later analysis. Requires NCBI_USER_EMAIL."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "advanced_search": {
                    "type": "string",
                    "description": "PubMed query, e.g. (\"KRAS\"[tiab]) AND (\"pancreatic cancer\"[MeSH])"
                },
                "start_date": {
                    "type": "string",
                    "description": "Earliest publication date, YYYY/MM/DD"
                },
                "end_date": {
                    "type": "string",
                    "description": "Latest publication date, YYYY/MM/DD"
                },
                "max_results": {
                    "type": "integer",
                    "default": 1000,
                    "maximum": 10000
                },
                "output_filename": {
                    "type": "string",
                    "description": "Base file name; a timestamp is appended"
                },
                "response_format": {
                    "type": "string",
                    "enum": ["markdown", "json"],
                    "default": "markdown"
                }
            },
            "required": ["advanced_search"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let params: SearchPubmedInput = serde_json::from_value(input)?;

        if !ctx.client.has_email() {
            return Err(ToolError::unavailable(
                "NCBI_USER_EMAIL is not set; NCBI requires a contact email for E-utilities",
            ));
        }

        let query = params.advanced_search.trim().to_string();
        if query.is_empty() {
            return Err(ToolError::validation("advanced_search", "must not be empty"));
        }
        if params.max_results == 0 {
            return Err(ToolError::validation("max_results", "must be at least 1"));
        }
        let max_results = params.max_results.min(eutils::MAX_RESULTS_CAP);

        let start = validate_search_date("start_date", params.start_date.as_deref())?;
        let end = validate_search_date("end_date", params.end_date.as_deref())?;
        let date_range = match (start, end) {
            (None, None) => None,
            (start, end) => Some((start.unwrap_or(EARLIEST_DATE), end.unwrap_or(LATEST_DATE))),
        };

        let articles = ctx.client.search(&query, date_range, max_results).await?;
        if articles.is_empty() {
            info!(query = %query, "No articles found");
            return Ok(format!("No results found for `{query}`."));
        }

        let result_set = ResultSet::new(query.clone(), articles);
        let store = ctx.store.clone();
        let base_name = params.output_filename.clone();
        let saved =
            run_blocking(move || Ok(store.save(base_name.as_deref(), &result_set)?)).await?;

        info!(query = %query, articles = saved.article_count, file = %saved.json_file, "Search saved");

        match params.response_format {
            ResponseFormat::Markdown => Ok(formatters::format_saved_markdown(&query, &saved)),
            ResponseFormat::Json => {
                Ok(serde_json::to_string(&formatters::compact_saved(&query, &saved))?)
            }
        }
    }
}

fn validate_search_date<'a>(field: &str, raw: Option<&'a str>) -> ToolResult<Option<&'a str>> {
    match raw.map(str::trim).filter(|r| !r.is_empty()) {
        None => Ok(None),
        Some(date) if SEARCH_DATE.is_match(date) => Ok(Some(date)),
        Some(date) => Err(ToolError::validation(
            field,
            format!("'{date}' must be formatted as YYYY/MM/DD"),
        )),
    }
}

/// Lists saved result files.
pub struct ListResultFilesTool;

#[async_trait::async_trait]
impl McpTool for ListResultFilesTool {
    fn name(&self) -> &'static str {
        "list_result_files"
    }

    fn description(&self) -> &'static str {
        "List the saved PubMed result files. JSON files are recommended for analysis; \
         text files are accepted as an alternative."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "response_format": {
                    "type": "string",
                    "enum": ["markdown", "json"],
                    "default": "markdown"
                }
            }
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let params: ListResultFilesInput = if input.is_null() {
            ListResultFilesInput::default()
        } else {
            serde_json::from_value(input)?
        };

        let store = ctx.store.clone();
        let listing = run_blocking(move || Ok(store.list()?)).await?;

        match params.response_format {
            ResponseFormat::Markdown => Ok(formatters::format_listing_markdown(&listing)),
            ResponseFormat::Json => Ok(serde_json::to_string(&formatters::compact_listing(&listing))?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_search_date() {
        assert_eq!(validate_search_date("start_date", Some("2020/01/31")).unwrap(), Some("2020/01/31"));
        assert_eq!(validate_search_date("start_date", Some("  ")).unwrap(), None);
        assert_eq!(validate_search_date("start_date", None).unwrap(), None);
        let err = validate_search_date("end_date", Some("2020-01-31")).unwrap_err();
        assert!(err.to_user_message().contains("end_date"));
    }
}
