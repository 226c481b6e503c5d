//! MCP server implementation.
//!
//! Provides both stdio (for desktop MCP clients) and HTTP transports over a
//! shared JSON-RPC dispatcher.

pub mod protocol;
pub mod stdio;
pub mod transport;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::tools::{self, McpTool, ToolContext};

use self::protocol::Dispatcher;

/// MCP server for PubMed literature analysis.
pub struct McpServer {
    dispatcher: Arc<Dispatcher>,
}

impl McpServer {
    /// Create a server with every tool registered.
    #[must_use]
    pub fn new(ctx: ToolContext) -> Self {
        Self::with_tools(tools::register_all_tools(), ctx)
    }

    /// Create a server with a custom tool set.
    #[must_use]
    pub fn with_tools(tools: Vec<Box<dyn McpTool>>, ctx: ToolContext) -> Self {
        Self { dispatcher: Dispatcher::new(tools, ctx) }
    }

    /// Shared request dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> Arc<Dispatcher> {
        Arc::clone(&self.dispatcher)
    }

    /// Run the server in stdio mode.
    ///
    /// # Errors
    ///
    /// Returns error on I/O failure.
    pub async fn run_stdio(self) -> anyhow::Result<()> {
        tracing::info!(tools = self.dispatcher.tool_count(), "Starting MCP server in stdio mode");
        stdio::run_stdio(self.dispatcher).await
    }

    /// Run the server in HTTP mode.
    ///
    /// # Errors
    ///
    /// Returns error on server failure.
    pub async fn run_http(self, port: u16) -> anyhow::Result<()> {
        tracing::info!(port, tools = self.dispatcher.tool_count(), "Starting MCP server in HTTP mode");

        let router = transport::create_router(self.dispatcher);
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        tracing::info!("HTTP server listening on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

        tracing::info!("HTTP server shut down");
        Ok(())
    }
}

impl std::fmt::Debug for McpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpServer").field("tools", &self.dispatcher.tool_count()).finish()
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received shutdown signal"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signal"),
    }
}
