//! `recap-mcp-server` — the stdio tool server behind the recap gateway.
//!
//! Reads newline-delimited JSON-RPC requests from stdin, dispatches to
//! a fixed registry of two tools (`github_activity`, `local_notes`),
//! and writes exactly one response line per request. A failing tool
//! becomes a response-level error object; only end-of-input terminates
//! the loop.

use std::path::PathBuf;

pub mod registry;
pub mod server;
pub mod tools;

pub use server::serve;

/// Process-wide context shared by the tool handlers.
///
/// Built once at startup, never mutated afterwards.
pub struct ServerContext {
    /// HTTP client for the GitHub API.
    pub http: reqwest::Client,
    /// Path to the local notes store (a JSON array of note objects).
    pub notes_path: PathBuf,
    /// Fallback GitHub token; a token supplied in tool arguments wins.
    pub github_token: Option<String>,
}

impl ServerContext {
    /// Build the context for a notes path, taking the fallback token
    /// from `GITHUB_TOKEN`.
    pub fn new(notes_path: PathBuf) -> recap_domain::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("recap-mcp/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(20))
            .build()
            .map_err(|e| recap_domain::Error::Http(e.to_string()))?;

        Ok(Self {
            http,
            notes_path,
            github_token: std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()),
        })
    }
}
