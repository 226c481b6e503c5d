//! MCP tool implementations.
//!
//! Each tool:
//! 1. Parses and validates input parameters
//! 2. Calls the E-utilities client, the result store or the analysis engine
//! 3. Formats results as Markdown or JSON

mod analysis;
mod search;

pub use analysis::*;
pub use search::*;

use std::sync::Arc;

use crate::analysis::AnalysisEngine;
use crate::client::PubMedClient;
use crate::config::Config;
use crate::error::{ToolError, ToolResult};
use crate::store::{FileStore, ResultStore};

/// Tool execution context.
#[derive(Clone)]
pub struct ToolContext {
    /// E-utilities client.
    pub client: Arc<PubMedClient>,
    /// Saved result sets.
    pub store: Arc<dyn ResultStore>,
    /// Analysis engine.
    pub engine: Arc<AnalysisEngine>,
}

impl ToolContext {
    /// Create a new tool context.
    #[must_use]
    pub fn new(
        client: Arc<PubMedClient>,
        store: Arc<dyn ResultStore>,
        engine: Arc<AnalysisEngine>,
    ) -> Self {
        Self { client, store, engine }
    }

    /// Build a context from configuration: file store under the results
    /// directory and an engine with the configured analysis settings.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(
            Arc::new(PubMedClient::new(config)?),
            Arc::new(FileStore::new(&config.results_dir)),
            Arc::new(AnalysisEngine::new(config.analysis.clone())),
        ))
    }
}

impl std::fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolContext").field("client", &self.client).finish_non_exhaustive()
    }
}

/// Run blocking store or engine work off the async runtime.
pub(crate) async fn run_blocking<T, F>(work: F) -> ToolResult<T>
where
    F: FnOnce() -> ToolResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ToolError::internal(format!("background task failed: {e}")))?
}

/// Trait for MCP tools.
#[async_trait::async_trait]
pub trait McpTool: Send + Sync {
    /// Tool name (e.g., "analyze_research_hotspots").
    fn name(&self) -> &'static str;

    /// Tool description for LLM.
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters.
    fn input_schema(&self) -> serde_json::Value;

    /// Execute the tool with given input.
    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String>;
}

/// Register all tools.
#[must_use]
pub fn register_all_tools() -> Vec<Box<dyn McpTool>> {
    vec![
        // Search and storage tools (2)
        Box::new(search::SearchPubmedTool),
        Box::new(search::ListResultFilesTool),
        // Analysis tools (4)
        Box::new(analysis::ResearchHotspotsTool),
        Box::new(analysis::ResearchTrendsTool),
        Box::new(analysis::PublicationCountTool),
        Box::new(analysis::ComprehensiveAnalysisTool),
    ]
}
