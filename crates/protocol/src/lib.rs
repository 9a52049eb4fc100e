//! `recap-protocol` — JSON-RPC 2.0 wire types for the recap MCP link.
//!
//! Both sides of the stdio connection speak newline-delimited JSON-RPC:
//! the client (gateway side) and the tool server (`recap-mcp`). This
//! crate holds the message types, the line codec, and the fixed error
//! code table so the two sides cannot drift apart.

pub mod codec;
pub mod message;

// Re-exports for convenience.
pub use codec::{decode_request, decode_response, encode_line, CodecError};
pub use message::{
    InitializeResult, JsonRpcError, JsonRpcRequest, JsonRpcResponse, ServerInfo, ToolDescriptor,
};

/// JSON-RPC / MCP error codes used on this connection.
pub mod codes {
    /// The request line was not valid JSON.
    pub const PARSE_ERROR: i64 = -32700;
    /// The request was JSON but not a well-formed request object.
    pub const INVALID_REQUEST: i64 = -32600;
    /// The request named a method outside the fixed method set.
    pub const METHOD_NOT_FOUND: i64 = -32601;
    /// A tool raised an error during execution.
    pub const TOOL_FAILED: i64 = -32000;
    /// `tools/call` named a tool that is not in the registry.
    pub const UNKNOWN_TOOL: i64 = -32001;
}

/// Protocol version advertised in the `initialize` result.
pub const PROTOCOL_VERSION: &str = "0.1";
