//! `recap-mcp-client` — stdio MCP client for the recap gateway.
//!
//! This crate provides:
//! - A stdio transport that spawns the tool-server subprocess and
//!   exposes line-oriented read/write over its stdin/stdout.
//! - An [`McpClient`] that performs the `initialize` handshake and
//!   issues correlated `tools/call` requests, one at a time.
//!
//! # Usage
//!
//! ```rust,ignore
//! use recap_domain::config::McpServerConfig;
//! use recap_mcp_client::McpClient;
//!
//! let mut client = McpClient::new(&config);
//! client.open().await?;
//! let activity = client
//!     .call_tool("github_activity", serde_json::json!({ "repo": "owner/repo", ... }))
//!     .await?;
//! client.close().await;
//! ```
//!
//! The client issues at most one request at a time — `call_tool` takes
//! `&mut self`, so a second in-flight call cannot exist. Responses are
//! therefore received in request order and correlation-id matching is a
//! hard check rather than a routing mechanism.

pub mod client;
pub mod transport;

// Re-exports for convenience.
pub use client::{McpClient, McpError};
pub use transport::{StdioTransport, Transport, TransportError};
