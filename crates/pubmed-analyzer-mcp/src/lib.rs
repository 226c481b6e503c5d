//! PubMed Analyzer MCP Server
//!
//! A Model Context Protocol (MCP) server that searches PubMed through NCBI
//! E-utilities, saves result sets to disk and analyzes them: keyword
//! hotspots, keyword trends over time and publication counts per period.
//!
//! # Features
//!
//! - **6 MCP Tools**: search, listing, hotspots, trends, publication counts, comprehensive report
//! - **Deterministic analysis**: rankings tie-break alphabetically, time series have no gaps
//! - **Rate-limited**: Respects NCBI's 3 req/s (10 req/s with an API key)
//! - **Cached**: 5-minute TTL cache reduces E-utilities calls
//!
//! # Example
//!
//! ```no_run
//! use pubmed_analyzer_mcp::{AnalysisEngine, FileStore};
//! use pubmed_analyzer_mcp::analysis::AnalysisRequest;
//! use pubmed_analyzer_mcp::models::AnalysisKind;
//!
//! fn main() -> anyhow::Result<()> {
//!     let store = FileStore::new("results");
//!     let engine = AnalysisEngine::default();
//!
//!     let request = AnalysisRequest::new("pubmed_results_20240101120000.json", AnalysisKind::Hotspots);
//!     let report = engine.compose(&store, &request)?;
//!     println!("{} articles analyzed", report.article_count);
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod client;
pub mod config;
pub mod error;
pub mod formatters;
pub mod models;
pub mod server;
pub mod store;
pub mod tools;

pub use analysis::AnalysisEngine;
pub use client::PubMedClient;
pub use config::Config;
pub use error::{AnalysisError, ClientError, StoreError, ToolError};
pub use server::McpServer;
pub use store::{FileStore, ResultStore};
