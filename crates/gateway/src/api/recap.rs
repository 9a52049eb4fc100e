//! `POST /api/recap` — generate a recap document.
//!
//! Each request gets its own MCP subprocess and client; the client is
//! closed on every exit path so a failed recap never leaks a child
//! process.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;

use recap_domain::activity::{parse_iso_date, GithubActivity, LocalNotes};
use recap_mcp_client::{McpClient, McpError};

use crate::api::api_error;
use crate::report;
use crate::state::AppState;

/// Request body for recap generation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecapRequest {
    /// Repository in `owner/repo` form.
    pub repo: String,
    /// Start of the range, `YYYY-MM-DD`.
    pub since: String,
    /// End of the range, `YYYY-MM-DD`.
    pub until: String,
    /// Optional GitHub token; overrides the configured fallback.
    #[serde(default)]
    pub github_token: Option<String>,
}

pub async fn create_recap(
    State(state): State<AppState>,
    Json(req): Json<RecapRequest>,
) -> Response {
    if req.repo.trim().is_empty() {
        return api_error(StatusCode::BAD_REQUEST, "repo must not be empty");
    }
    let (Some(since), Some(until)) = (parse_iso_date(&req.since), parse_iso_date(&req.until))
    else {
        return api_error(
            StatusCode::BAD_REQUEST,
            "since and until must be YYYY-MM-DD dates",
        );
    };
    if since > until {
        return api_error(StatusCode::BAD_REQUEST, "since must not be after until");
    }

    let token = req
        .github_token
        .as_deref()
        .or(state.config.github.token.as_deref());

    let mut client = McpClient::new(&state.config.mcp);
    let fetched = fetch_activity(&mut client, &req, token).await;
    // Tear the subprocess down on success and failure alike.
    client.close().await;

    match fetched {
        Ok((github, notes)) => {
            let doc = report::build_recap(&req.repo, &req.since, &req.until, &github, &notes);
            Json(doc).into_response()
        }
        Err(e) => {
            tracing::error!(repo = %req.repo, error = %e, "recap generation failed");
            api_error(StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}

/// Open the connection and run both tool calls, strictly one at a time.
async fn fetch_activity(
    client: &mut McpClient,
    req: &RecapRequest,
    token: Option<&str>,
) -> Result<(GithubActivity, LocalNotes), McpError> {
    client.open().await?;

    let github_value = client
        .call_tool(
            "github_activity",
            serde_json::json!({
                "repo": req.repo,
                "since": req.since,
                "until": req.until,
                "token": token,
            }),
        )
        .await?;

    let notes_value = client
        .call_tool(
            "local_notes",
            serde_json::json!({ "since": req.since, "until": req.until }),
        )
        .await?;

    let github: GithubActivity = serde_json::from_value(github_value)
        .map_err(|e| McpError::ProtocolViolation(format!("malformed github_activity result: {e}")))?;
    let notes: LocalNotes = serde_json::from_value(notes_value)
        .map_err(|e| McpError::ProtocolViolation(format!("malformed local_notes result: {e}")))?;

    Ok((github, notes))
}
