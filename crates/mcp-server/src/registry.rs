//! The static tool registry.
//!
//! Two tools, constructed once, never mutated. Dispatch is a closed
//! match over the tool name; anything else is rejected explicitly.

use std::sync::OnceLock;

use serde_json::Value;

use recap_protocol::ToolDescriptor;

use crate::tools::{github, notes};
use crate::ServerContext;

/// Errors raised by tool dispatch.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    Unknown(String),

    #[error(transparent)]
    Failed(#[from] recap_domain::Error),
}

/// The tool descriptors advertised by `tools/list`.
pub fn descriptors() -> &'static [ToolDescriptor] {
    static DESCRIPTORS: OnceLock<Vec<ToolDescriptor>> = OnceLock::new();
    DESCRIPTORS.get_or_init(|| {
        vec![
            ToolDescriptor {
                name: "github_activity".into(),
                description: "Fetch pull requests and commits for a repo in a date range.".into(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "repo": { "type": "string" },
                        "since": { "type": "string" },
                        "until": { "type": "string" },
                        "token": { "type": "string" }
                    },
                    "required": ["repo", "since", "until"]
                }),
            },
            ToolDescriptor {
                name: "local_notes".into(),
                description: "Read local recap notes for a date range.".into(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "since": { "type": "string" },
                        "until": { "type": "string" }
                    },
                    "required": ["since", "until"]
                }),
            },
        ]
    })
}

/// Invoke a registered tool by name.
pub async fn call(ctx: &ServerContext, name: &str, arguments: &Value) -> Result<Value, ToolError> {
    match name {
        "github_activity" => Ok(github::run(ctx, arguments).await?),
        "local_notes" => Ok(notes::run(ctx, arguments)?),
        other => Err(ToolError::Unknown(other.to_string())),
    }
}
