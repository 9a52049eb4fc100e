//! The request loop: read one line, dispatch, write one line, repeat.
//!
//! Generic over the byte streams so tests can drive it with in-memory
//! pipes; `main` wires it to stdin/stdout.

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use recap_protocol::{
    codes, decode_request, encode_line, InitializeResult, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, ServerInfo, PROTOCOL_VERSION,
};

use crate::registry::{self, ToolError};
use crate::ServerContext;

/// Serve requests until the reader reaches end-of-input.
///
/// Every request gets exactly one response line echoing its id. Tool
/// failures become response-level error objects; a failing call never
/// terminates the loop.
pub async fn serve<R, W>(mut reader: R, mut writer: W, ctx: &ServerContext) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();
    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            tracing::debug!("stdin closed, shutting down");
            return Ok(());
        }
        if line.trim().is_empty() {
            continue;
        }

        let request = match decode_request(&line) {
            Ok(req) => req,
            Err(e) => {
                tracing::warn!(error = %e, "undecodable request line");
                // Best effort: answer with a parse error if a numeric id
                // can still be recovered, otherwise stay silent — there
                // is no id the client could correlate a response to.
                if let Some(id) = recover_id(&line) {
                    let resp = JsonRpcResponse::error(
                        id,
                        JsonRpcError::new(codes::PARSE_ERROR, e.to_string()),
                    );
                    write_response(&mut writer, &resp).await?;
                }
                continue;
            }
        };

        let response = dispatch(ctx, &request).await;
        write_response(&mut writer, &response).await?;
    }
}

/// Dispatch one request to its handler and build the response.
pub async fn dispatch(ctx: &ServerContext, request: &JsonRpcRequest) -> JsonRpcResponse {
    let id = request.id;
    match request.method.as_str() {
        "initialize" => JsonRpcResponse::result(id, initialize_result()),
        "tools/list" => {
            let tools = serde_json::json!({ "tools": registry::descriptors() });
            JsonRpcResponse::result(id, tools)
        }
        "tools/call" => {
            let params = request.params.clone().unwrap_or(Value::Null);
            let name = params["name"].as_str().unwrap_or_default().to_string();
            let arguments = params
                .get("arguments")
                .cloned()
                .unwrap_or_else(|| serde_json::json!({}));

            match registry::call(ctx, &name, &arguments).await {
                Ok(result) => JsonRpcResponse::result(id, result),
                Err(ToolError::Unknown(tool)) => {
                    tracing::warn!(tool = %tool, "tools/call named an unregistered tool");
                    JsonRpcResponse::error(
                        id,
                        JsonRpcError::new(codes::UNKNOWN_TOOL, format!("Unknown tool: {tool}")),
                    )
                }
                Err(ToolError::Failed(e)) => {
                    tracing::warn!(tool = %name, error = %e, "tool execution failed");
                    JsonRpcResponse::error(
                        id,
                        JsonRpcError::new(codes::TOOL_FAILED, e.to_string()),
                    )
                }
            }
        }
        other => JsonRpcResponse::error(
            id,
            JsonRpcError::new(
                codes::METHOD_NOT_FOUND,
                format!("Unsupported method: {other}"),
            ),
        ),
    }
}

fn initialize_result() -> Value {
    serde_json::to_value(InitializeResult {
        protocol_version: PROTOCOL_VERSION.into(),
        server_info: ServerInfo {
            name: "recap-mcp".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        },
        capabilities: serde_json::json!({ "tools": {} }),
    })
    .unwrap_or(Value::Null)
}

/// Pull a numeric `id` out of a line that failed request decoding.
fn recover_id(line: &str) -> Option<u64> {
    serde_json::from_str::<Value>(line.trim())
        .ok()
        .and_then(|v| v.get("id")?.as_u64())
}

async fn write_response<W>(writer: &mut W, response: &JsonRpcResponse) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let line = encode_line(response).map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
    })?;
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
