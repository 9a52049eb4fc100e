//! `github_activity` — pull requests and commits for a repo in a date
//! range, fetched from the GitHub REST API.
//!
//! PRs come from the issue search endpoint (`repo:<repo> is:pr
//! created:<since>..<until>`), commits from the repo commits listing.
//! Responses are trimmed down to the few fields the recap needs.

use serde_json::Value;

use recap_domain::activity::{Commit, GithubActivity, PullRequest};
use recap_domain::{Error, Result};

use crate::tools::required_str;
use crate::ServerContext;

const GITHUB_API: &str = "https://api.github.com";
const PER_PAGE: &str = "20";

pub async fn run(ctx: &ServerContext, arguments: &Value) -> Result<Value> {
    let repo = required_str(arguments, "repo")?;
    let since = required_str(arguments, "since")?;
    let until = required_str(arguments, "until")?;
    let token = arguments
        .get("token")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .or(ctx.github_token.as_deref());

    let pull_requests = fetch_pull_requests(ctx, repo, since, until, token).await?;
    let commits = fetch_commits(ctx, repo, since, until, token).await?;

    Ok(serde_json::to_value(GithubActivity {
        pull_requests,
        commits,
    })?)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Fetching
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

async fn fetch_pull_requests(
    ctx: &ServerContext,
    repo: &str,
    since: &str,
    until: &str,
    token: Option<&str>,
) -> Result<Vec<PullRequest>> {
    let query = format!("repo:{repo} is:pr created:{since}..{until}");
    let url = format!("{GITHUB_API}/search/issues");
    let request = ctx
        .http
        .get(&url)
        .query(&[("q", query.as_str()), ("per_page", PER_PAGE)]);
    let body = get_json(request, token).await?;

    let items = body["items"].as_array().cloned().unwrap_or_default();
    Ok(items.iter().map(parse_search_item).collect())
}

async fn fetch_commits(
    ctx: &ServerContext,
    repo: &str,
    since: &str,
    until: &str,
    token: Option<&str>,
) -> Result<Vec<Commit>> {
    let url = format!("{GITHUB_API}/repos/{repo}/commits");
    let request = ctx.http.get(&url).query(&[
        ("since", format!("{since}T00:00:00Z")),
        ("until", format!("{until}T23:59:59Z")),
        ("per_page", PER_PAGE.to_string()),
    ]);
    let body = get_json(request, token).await?;

    let items = body.as_array().cloned().unwrap_or_default();
    Ok(items.iter().map(parse_commit_item).collect())
}

/// Send an authenticated GET and parse the body as JSON, mapping a
/// non-success status to an error carrying the response text.
async fn get_json(request: reqwest::RequestBuilder, token: Option<&str>) -> Result<Value> {
    let mut request = request.header("Accept", "application/vnd.github+json");
    if let Some(token) = token {
        request = request.header("Authorization", format!("Bearer {token}"));
    }

    let resp = request
        .send()
        .await
        .map_err(|e| Error::Http(e.to_string()))?;

    let status = resp.status();
    let text = resp.text().await.map_err(|e| Error::Http(e.to_string()))?;
    if !status.is_success() {
        return Err(Error::Http(format!("HTTP {} - {}", status.as_u16(), text)));
    }

    Ok(serde_json::from_str(&text)?)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Response parsing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn parse_search_item(item: &Value) -> PullRequest {
    PullRequest {
        title: item["title"]
            .as_str()
            .unwrap_or("Untitled PR")
            .to_string(),
        url: item["html_url"].as_str().unwrap_or_default().to_string(),
        date: date_prefix(item["created_at"].as_str().unwrap_or_default()),
        author: item["user"]["login"].as_str().unwrap_or_default().to_string(),
    }
}

fn parse_commit_item(item: &Value) -> Commit {
    let commit = &item["commit"];
    let author = &commit["author"];
    let message = commit["message"].as_str().unwrap_or_default();
    let sha = item["sha"].as_str().unwrap_or_default();
    Commit {
        message: message.lines().next().unwrap_or_default().to_string(),
        sha: sha.chars().take(7).collect(),
        date: date_prefix(author["date"].as_str().unwrap_or_default()),
        author: author["name"].as_str().unwrap_or_default().to_string(),
    }
}

/// `YYYY-MM-DD` prefix of an ISO timestamp (empty input stays empty).
fn date_prefix(timestamp: &str) -> String {
    timestamp.chars().take(10).collect()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_search_item_fields() {
        let item = serde_json::json!({
            "title": "Add stdio transport",
            "html_url": "https://github.com/owner/repo/pull/7",
            "created_at": "2026-01-05T14:02:11Z",
            "user": { "login": "dev1" }
        });
        let pr = parse_search_item(&item);
        assert_eq!(pr.title, "Add stdio transport");
        assert_eq!(pr.date, "2026-01-05");
        assert_eq!(pr.author, "dev1");
    }

    #[test]
    fn missing_title_defaults() {
        let item = serde_json::json!({ "user": null });
        let pr = parse_search_item(&item);
        assert_eq!(pr.title, "Untitled PR");
        assert_eq!(pr.url, "");
        assert_eq!(pr.author, "");
    }

    #[test]
    fn commit_message_first_line_and_short_sha() {
        let item = serde_json::json!({
            "sha": "0123456789abcdef",
            "commit": {
                "message": "Fix handshake\n\nLong body here.",
                "author": { "name": "dev2", "date": "2026-01-06T09:00:00Z" }
            }
        });
        let commit = parse_commit_item(&item);
        assert_eq!(commit.message, "Fix handshake");
        assert_eq!(commit.sha, "0123456");
        assert_eq!(commit.date, "2026-01-06");
        assert_eq!(commit.author, "dev2");
    }

    #[test]
    fn empty_commit_item_yields_empty_fields() {
        let commit = parse_commit_item(&serde_json::json!({}));
        assert_eq!(commit.message, "");
        assert_eq!(commit.sha, "");
        assert_eq!(commit.date, "");
    }

    #[tokio::test]
    async fn missing_required_argument_is_an_error() {
        let ctx = ServerContext {
            http: reqwest::Client::new(),
            notes_path: "/tmp/notes.json".into(),
            github_token: None,
        };
        let err = run(&ctx, &serde_json::json!({ "repo": "owner/repo" }))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("since"));
    }
}
