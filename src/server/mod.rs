//! Assistant-facing surface: tool dispatch, text formatting and MCP transport

use crate::storage::JobStore;

pub mod format;
pub mod mcp;
pub mod tools;

pub use mcp::McpService;
pub use tools::{tool_specs, ToolDispatcher, ToolReply, ToolSpec};

/// Serve the job store as MCP tools over stdin/stdout until the host disconnects
pub async fn serve_stdio(store: JobStore) -> anyhow::Result<()> {
    tracing::info!("Serving {:?}", store.path());
    let service = McpService::new(ToolDispatcher::new(store));
    service.run_stdio().await
}
