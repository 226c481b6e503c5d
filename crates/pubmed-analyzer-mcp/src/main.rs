//! PubMed Analyzer MCP Server - Entry Point
//!
//! Provides both stdio (for desktop MCP clients) and HTTP transports.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use pubmed_analyzer_mcp::{McpServer, config::Config, tools::ToolContext};

#[derive(Parser, Debug)]
#[command(name = "pubmed-analyzer-mcp")]
#[command(about = "MCP server for PubMed search and literature analysis")]
#[command(version)]
struct Cli {
    /// Contact email sent to NCBI (required by search_pubmed)
    #[arg(long, env = "NCBI_USER_EMAIL")]
    email: Option<String>,

    /// NCBI API key (optional, enables higher rate limits)
    #[arg(long, env = "NCBI_USER_API_KEY")]
    api_key: Option<String>,

    /// Directory where result files are saved and read
    #[arg(long, default_value = "results", env = "PUBMED_RESULTS_DIR")]
    results_dir: PathBuf,

    /// Transport mode: stdio or http
    #[arg(long, default_value = "stdio")]
    transport: Transport,

    /// HTTP server port (only used with --transport http)
    #[arg(long, default_value = "8000", env = "PORT")]
    port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum Transport {
    /// Standard input/output (for desktop MCP clients)
    #[default]
    Stdio,
    /// JSON-RPC over HTTP POST
    Http,
}

/// Logs go to stderr; stdout belongs to the stdio transport.
fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        transport = ?cli.transport,
        results_dir = %cli.results_dir.display(),
        "Starting PubMed Analyzer MCP server"
    );

    let email = cli.email.filter(|e| !e.trim().is_empty());
    let api_key = cli.api_key.filter(|k| !k.trim().is_empty());
    if email.is_none() {
        tracing::warn!("NCBI_USER_EMAIL is not set; search_pubmed will be unavailable");
    }

    let config = Config::new(email, api_key, cli.results_dir);
    let ctx = ToolContext::from_config(&config)?;
    let server = McpServer::new(ctx);

    match cli.transport {
        Transport::Stdio => {
            tracing::info!("Running in stdio mode");
            server.run_stdio().await?;
        }
        Transport::Http => {
            tracing::info!(port = cli.port, "Running in HTTP mode");
            server.run_http(cli.port).await?;
        }
    }

    Ok(())
}
