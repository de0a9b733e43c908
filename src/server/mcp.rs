use std::sync::Arc;
use mcp_sdk_rs::server::{Server, ServerHandler};
use mcp_sdk_rs::types::{
    Tool, ListToolsResult,
    Implementation, ClientCapabilities, ServerCapabilities
};
use mcp_sdk_rs::error::ErrorCode;
use mcp_sdk_rs::transport::stdio::StdioTransport;
use mcp_sdk_rs::error::Error;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use serde::Deserialize;
use super::tools::{tool_specs, ToolDispatcher, ToolReply};

#[derive(Deserialize)]
struct CallToolRequest {
    name: String,
    arguments: Option<Value>,
}

/// MCP front end for the tool dispatcher
#[derive(Clone)]
pub struct McpService {
    dispatcher: ToolDispatcher,
}

impl McpService {
    pub fn new(dispatcher: ToolDispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn run_stdio(&self) -> anyhow::Result<()> {
        let (read_tx, read_rx) = mpsc::channel::<String>(32);
        let (write_tx, mut write_rx) = mpsc::channel::<String>(32);

        // Stdin reader
        tokio::spawn(async move {
            let stdin = tokio::io::stdin();
            let mut reader = BufReader::new(stdin).lines();
            while let Ok(Some(line)) = reader.next_line().await {
                if read_tx.send(line).await.is_err() {
                    break;
                }
            }
            tracing::debug!("stdin closed");
        });

        // Stdout writer
        tokio::spawn(async move {
            let mut stdout = tokio::io::stdout();
            while let Some(msg) = write_rx.recv().await {
                if let Err(e) = write_line(&mut stdout, &msg).await {
                    tracing::error!("Failed to write response: {}", e);
                    break;
                }
            }
        });

        tracing::info!("MCP server listening on stdio ({} tools)", tool_specs().len());
        let transport = StdioTransport::new(read_rx, write_tx);
        let server = Server::new(Arc::new(transport), Arc::new(self.clone()));
        server.start().await?;
        Ok(())
    }

    fn list_tools() -> Result<Value, Error> {
        let tools = tool_specs()
            .into_iter()
            .map(|spec| {
                Ok(Tool {
                    name: spec.name.to_string(),
                    description: spec.description.to_string(),
                    input_schema: serde_json::from_value(spec.input_schema)
                        .map_err(|e| Error::protocol(ErrorCode::ParseError, e.to_string()))?,
                    annotations: None,
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;

        let result = ListToolsResult { tools, next_cursor: None };
        serde_json::to_value(result).map_err(|e| Error::protocol(ErrorCode::InternalError, e.to_string()))
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value, Error> {
        let req: CallToolRequest = params
            .and_then(|v| serde_json::from_value(v).ok())
            .ok_or(Error::protocol(ErrorCode::InvalidParams, "Missing params"))?;

        tracing::debug!("tools/call {}", req.name);
        let dispatcher = self.dispatcher.clone();
        let name = req.name.clone();
        let reply = tokio::task::spawn_blocking(move || dispatcher.call(&name, req.arguments))
            .await
            .map_err(|e| Error::protocol(ErrorCode::InternalError, e.to_string()))?
            .map_err(|_| Error::protocol(ErrorCode::MethodNotFound, req.name))?;

        Ok(tool_result(&reply))
    }
}

async fn write_line(stdout: &mut tokio::io::Stdout, msg: &str) -> std::io::Result<()> {
    stdout.write_all(msg.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await
}

/// `tools/call` result body with a single text block
fn tool_result(reply: &ToolReply) -> Value {
    serde_json::json!({
        "content": [
            { "type": "text", "text": reply.text }
        ],
        "isError": reply.is_error
    })
}

#[async_trait]
impl ServerHandler for McpService {
    async fn initialize(
        &self,
        _implementation: Implementation,
        _capabilities: ClientCapabilities
    ) -> Result<ServerCapabilities, Error> {
        tracing::info!("MCP client initialized");
        Ok(ServerCapabilities::default())
    }

    async fn shutdown(&self) -> Result<(), Error> {
        tracing::info!("MCP server shutting down");
        Ok(())
    }

    async fn handle_method(&self, method: &str, params: Option<Value>) -> Result<Value, Error> {
        match method {
            "tools/list" => Self::list_tools(),
            "tools/call" => self.call_tool(params).await,
            _ => Err(Error::protocol(ErrorCode::MethodNotFound, method.to_string()))
        }
    }
}
