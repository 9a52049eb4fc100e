//! Line codec: one JSON-RPC message per newline-terminated line.
//!
//! `encode_line` produces the line body without a trailing newline; the
//! transport appends it. Decoding validates the `jsonrpc` tag and, for
//! responses, the result/error well-formedness invariant, so callers
//! can treat a decoded response as structurally sound.

use serde::Serialize;

use crate::message::{JsonRpcRequest, JsonRpcResponse};

/// Errors raised by the line codec.
///
/// Both variants indicate a programming or compatibility defect rather
/// than a runtime condition, and are never silently swallowed.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("message not encodable: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("malformed protocol line: {0}")]
    Decode(String),
}

/// Serialize a message to a single line of JSON.
///
/// Fails if the value is not representable or if serialization would
/// embed a newline (which would desynchronize the line framing).
pub fn encode_line<T: Serialize>(message: &T) -> Result<String, CodecError> {
    let line = serde_json::to_string(message).map_err(CodecError::Encode)?;
    if line.contains('\n') {
        return Err(CodecError::Decode(
            "encoded message contains embedded newline".into(),
        ));
    }
    Ok(line)
}

/// Parse one line as a request.
pub fn decode_request(line: &str) -> Result<JsonRpcRequest, CodecError> {
    let req: JsonRpcRequest =
        serde_json::from_str(line.trim()).map_err(|e| CodecError::Decode(e.to_string()))?;
    if req.jsonrpc != "2.0" {
        return Err(CodecError::Decode(format!(
            "unexpected jsonrpc tag: {:?}",
            req.jsonrpc
        )));
    }
    Ok(req)
}

/// Parse one line as a response.
///
/// Rejects lines that carry both `result` and `error`, or neither;
/// the caller maps that to a protocol violation.
pub fn decode_response(line: &str) -> Result<JsonRpcResponse, CodecError> {
    let resp: JsonRpcResponse =
        serde_json::from_str(line.trim()).map_err(|e| CodecError::Decode(e.to_string()))?;
    if resp.jsonrpc != "2.0" {
        return Err(CodecError::Decode(format!(
            "unexpected jsonrpc tag: {:?}",
            resp.jsonrpc
        )));
    }
    match (&resp.result, &resp.error) {
        (Some(_), Some(_)) => Err(CodecError::Decode(
            "response carries both result and error".into(),
        )),
        (None, None) => Err(CodecError::Decode(
            "response carries neither result nor error".into(),
        )),
        _ => Ok(resp),
    }
}
