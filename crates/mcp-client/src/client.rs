//! The MCP client: correlated request/response exchanges over a
//! transport.
//!
//! The client owns the request-id counter and the transport for the
//! duration of one recap request. Strict alternation — never a second
//! request before the first response is consumed — is enforced by
//! construction: every exchange takes `&mut self`.

use std::time::Duration;

use serde_json::Value;

use recap_domain::config::McpServerConfig;
use recap_protocol::{decode_response, encode_line, CodecError, JsonRpcRequest, JsonRpcResponse};

use crate::transport::{StdioTransport, Transport, TransportError};

/// Deadline applied to every blocking read. A hung or silent peer
/// surfaces as [`TransportError::Timeout`] instead of wedging the
/// calling task forever.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors surfaced by MCP exchanges.
#[derive(Debug, thiserror::Error)]
pub enum McpError {
    #[error("MCP transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("MCP handshake failed: {0}")]
    Handshake(String),

    #[error("remote tool error {code}: {message}")]
    RemoteTool { code: i64, message: String },

    #[error("MCP protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("MCP codec error: {0}")]
    Codec(#[from] CodecError),
}

/// A client driving one MCP tool-server subprocess.
pub struct McpClient {
    transport: Box<dyn Transport>,
    next_id: u64,
    request_timeout: Duration,
}

impl McpClient {
    /// Create a client over a stdio transport for the configured server
    /// command. Nothing is spawned until [`open`](Self::open).
    pub fn new(config: &McpServerConfig) -> Self {
        Self::with_transport(Box::new(StdioTransport::new(config)))
    }

    /// Create a client over an arbitrary transport.
    pub fn with_transport(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            next_id: 0,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Override the per-read deadline.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Start the transport and perform the `initialize` handshake.
    ///
    /// The handshake's only purpose is to confirm the peer is alive and
    /// speaking the protocol; its result payload is discarded.
    pub async fn open(&mut self) -> Result<(), McpError> {
        self.transport.start().await?;

        match self.exchange("initialize", serde_json::json!({})).await {
            Ok(resp) => {
                if let Some(err) = resp.error {
                    return Err(McpError::Handshake(err.to_string()));
                }
                tracing::debug!("MCP handshake complete");
                Ok(())
            }
            // A structurally broken reply to `initialize` means the peer
            // does not speak the protocol at all.
            Err(McpError::ProtocolViolation(msg)) => Err(McpError::Handshake(msg)),
            Err(other) => Err(other),
        }
    }

    /// Invoke a named tool and return its result value verbatim.
    ///
    /// The result is opaque to this layer; no schema validation is
    /// applied against the tool's declared input shape.
    pub async fn call_tool(&mut self, name: &str, arguments: Value) -> Result<Value, McpError> {
        let params = serde_json::json!({
            "name": name,
            "arguments": arguments,
        });

        let resp = self.exchange("tools/call", params).await?;
        resp.into_result().map_err(|err| McpError::RemoteTool {
            code: err.code,
            message: err.message,
        })
    }

    /// Tear down the transport (and with it, the subprocess).
    pub async fn close(&mut self) {
        self.transport.stop().await;
    }

    /// Send one request and read exactly one response line.
    ///
    /// Identifiers are allocated here, strictly increasing from 1; a
    /// response carrying any other id fails the exchange.
    async fn exchange(&mut self, method: &str, params: Value) -> Result<JsonRpcResponse, McpError> {
        self.next_id += 1;
        let id = self.next_id;

        let req = JsonRpcRequest::new(id, method, Some(params));
        let line = encode_line(&req)?;

        tracing::debug!(id, method, "sending MCP request");
        self.transport.write_line(&line).await?;

        let raw = match tokio::time::timeout(self.request_timeout, self.transport.read_line()).await
        {
            Ok(read) => read?,
            Err(_) => {
                // Tear the peer down so a stuck child is not leaked.
                tracing::warn!(id, method, "MCP response deadline expired, stopping server");
                self.transport.stop().await;
                return Err(TransportError::Timeout.into());
            }
        };

        let resp =
            decode_response(&raw).map_err(|e| McpError::ProtocolViolation(e.to_string()))?;
        if resp.id != id {
            return Err(McpError::ProtocolViolation(format!(
                "response id {} does not match request id {id}",
                resp.id
            )));
        }
        Ok(resp)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// In-memory transport replaying canned response lines, recording
    /// every line the client writes.
    struct ScriptedTransport {
        written: Arc<Mutex<Vec<String>>>,
        replies: VecDeque<String>,
        started: bool,
    }

    impl ScriptedTransport {
        fn new(replies: &[&str]) -> (Self, Arc<Mutex<Vec<String>>>) {
            let written = Arc::new(Mutex::new(Vec::new()));
            let transport = Self {
                written: written.clone(),
                replies: replies.iter().map(|s| s.to_string()).collect(),
                started: false,
            };
            (transport, written)
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn start(&mut self) -> Result<(), TransportError> {
            self.started = true;
            Ok(())
        }

        async fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
            if !self.started {
                return Err(TransportError::Closed);
            }
            self.written.lock().unwrap().push(line.to_string());
            Ok(())
        }

        async fn read_line(&mut self) -> Result<String, TransportError> {
            self.replies.pop_front().ok_or(TransportError::Closed)
        }

        async fn stop(&mut self) {
            self.started = false;
        }
    }

    fn client_with(replies: &[&str]) -> (McpClient, Arc<Mutex<Vec<String>>>) {
        let (transport, written) = ScriptedTransport::new(replies);
        (McpClient::with_transport(Box::new(transport)), written)
    }

    #[tokio::test]
    async fn ids_increase_by_one_from_one() {
        let (mut client, written) = client_with(&[
            r#"{"jsonrpc":"2.0","id":1,"result":{}}"#,
            r#"{"jsonrpc":"2.0","id":2,"result":{"notes":[]}}"#,
            r#"{"jsonrpc":"2.0","id":3,"result":{"notes":[]}}"#,
        ]);
        client.open().await.unwrap();
        client
            .call_tool("local_notes", serde_json::json!({}))
            .await
            .unwrap();
        client
            .call_tool("local_notes", serde_json::json!({}))
            .await
            .unwrap();

        let ids: Vec<u64> = written
            .lock()
            .unwrap()
            .iter()
            .map(|line| {
                serde_json::from_str::<serde_json::Value>(line).unwrap()["id"]
                    .as_u64()
                    .unwrap()
            })
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn handshake_error_response_fails_open() {
        let (mut client, _) = client_with(&[
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32600,"message":"nope"}}"#,
        ]);
        let err = client.open().await.unwrap_err();
        assert!(matches!(err, McpError::Handshake(_)));
    }

    #[tokio::test]
    async fn handshake_undecodable_response_fails_open() {
        let (mut client, _) = client_with(&[r#"{"jsonrpc":"2.0","id":1}"#]);
        let err = client.open().await.unwrap_err();
        assert!(matches!(err, McpError::Handshake(_)));
    }

    #[tokio::test]
    async fn remote_error_maps_to_remote_tool() {
        let (mut client, _) = client_with(&[
            r#"{"jsonrpc":"2.0","id":1,"result":{}}"#,
            r#"{"jsonrpc":"2.0","id":2,"error":{"code":-32001,"message":"Unknown tool: nope"}}"#,
        ]);
        client.open().await.unwrap();
        let err = client
            .call_tool("nope", serde_json::json!({}))
            .await
            .unwrap_err();
        match err {
            McpError::RemoteTool { code, message } => {
                assert_eq!(code, -32001);
                assert!(message.contains("Unknown tool"));
            }
            other => panic!("expected RemoteTool, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn id_mismatch_is_a_protocol_violation() {
        let (mut client, _) = client_with(&[
            r#"{"jsonrpc":"2.0","id":1,"result":{}}"#,
            r#"{"jsonrpc":"2.0","id":99,"result":{}}"#,
        ]);
        client.open().await.unwrap();
        let err = client
            .call_tool("local_notes", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, McpError::ProtocolViolation(_)));
    }

    #[tokio::test]
    async fn malformed_response_is_a_protocol_violation() {
        let (mut client, _) = client_with(&[
            r#"{"jsonrpc":"2.0","id":1,"result":{}}"#,
            r#"{"jsonrpc":"2.0","id":2,"result":{},"error":{"code":-1,"message":"x"}}"#,
        ]);
        client.open().await.unwrap();
        let err = client
            .call_tool("local_notes", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, McpError::ProtocolViolation(_)));
    }

    #[tokio::test]
    async fn closed_stream_surfaces_transport_error() {
        let (mut client, _) = client_with(&[r#"{"jsonrpc":"2.0","id":1,"result":{}}"#]);
        client.open().await.unwrap();
        let err = client
            .call_tool("local_notes", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            McpError::Transport(TransportError::Closed)
        ));
    }

    #[tokio::test]
    async fn result_returned_verbatim() {
        let (mut client, _) = client_with(&[
            r#"{"jsonrpc":"2.0","id":1,"result":{}}"#,
            r#"{"jsonrpc":"2.0","id":2,"result":{"notes":[{"date":"2026-01-05","title":"t"}]}}"#,
        ]);
        client.open().await.unwrap();
        let value = client
            .call_tool("local_notes", serde_json::json!({}))
            .await
            .unwrap();
        assert_eq!(value["notes"][0]["date"], "2026-01-05");
    }
}
