//! Activity data returned by the MCP tools.
//!
//! Dates stay `YYYY-MM-DD` strings on the wire; parse with
//! [`parse_iso_date`] when arithmetic is needed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A pull request summary from the `github_activity` tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PullRequest {
    pub title: String,
    pub url: String,
    pub date: String,
    pub author: String,
}

/// A commit summary from the `github_activity` tool.
///
/// `message` is the first line only; `sha` is the 7-character short form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Commit {
    pub message: String,
    pub sha: String,
    pub date: String,
    pub author: String,
}

/// Result payload of the `github_activity` tool.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GithubActivity {
    pub pull_requests: Vec<PullRequest>,
    pub commits: Vec<Commit>,
}

/// A locally authored note from the `local_notes` tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    pub date: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Result payload of the `local_notes` tool.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LocalNotes {
    pub notes: Vec<Note>,
}

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
