//! `local_notes` — dated entries from a flat JSON file.
//!
//! The store is a JSON array of note objects. Entries whose `date`
//! parses as an ISO date inside `[since, until]` (inclusive) are kept;
//! entries with malformed dates are silently skipped. A missing store
//! file means no notes, not an error.

use serde_json::Value;

use recap_domain::activity::{parse_iso_date, LocalNotes, Note};
use recap_domain::{Error, Result};

use crate::tools::required_str;
use crate::ServerContext;

pub fn run(ctx: &ServerContext, arguments: &Value) -> Result<Value> {
    let since = required_str(arguments, "since")?;
    let until = required_str(arguments, "until")?;

    let start = parse_iso_date(since)
        .ok_or_else(|| Error::InvalidArgument(format!("invalid since date: {since}")))?;
    let end = parse_iso_date(until)
        .ok_or_else(|| Error::InvalidArgument(format!("invalid until date: {until}")))?;

    let notes = read_notes(ctx)?
        .into_iter()
        .filter(|note| {
            parse_iso_date(&note.date)
                .map(|date| start <= date && date <= end)
                .unwrap_or(false)
        })
        .collect();

    Ok(serde_json::to_value(LocalNotes { notes })?)
}

/// Load the full note store; a missing file yields an empty list.
fn read_notes(ctx: &ServerContext) -> Result<Vec<Note>> {
    if !ctx.notes_path.exists() {
        tracing::debug!(path = %ctx.notes_path.display(), "notes store missing, returning no notes");
        return Ok(Vec::new());
    }
    let raw = std::fs::read_to_string(&ctx.notes_path)?;
    Ok(serde_json::from_str(&raw)?)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn ctx_with_store(contents: &str) -> (ServerContext, tempfile::NamedTempFile) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        let ctx = ServerContext {
            http: reqwest::Client::new(),
            notes_path: file.path().to_path_buf(),
            github_token: None,
        };
        (ctx, file)
    }

    fn args(since: &str, until: &str) -> Value {
        serde_json::json!({ "since": since, "until": until })
    }

    #[test]
    fn keeps_only_in_range_notes() {
        let (ctx, _file) = ctx_with_store(
            r#"[
                {"date": "2026-01-05", "title": "Demo walkthrough", "tags": []},
                {"date": "2025-11-20", "title": "Too early", "tags": []}
            ]"#,
        );
        let result = run(&ctx, &args("2025-12-01", "2026-01-31")).unwrap();
        let notes = result["notes"].as_array().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0]["title"], "Demo walkthrough");
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let (ctx, _file) = ctx_with_store(
            r#"[
                {"date": "2025-12-01", "title": "first day"},
                {"date": "2026-01-31", "title": "last day"}
            ]"#,
        );
        let result = run(&ctx, &args("2025-12-01", "2026-01-31")).unwrap();
        assert_eq!(result["notes"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn malformed_note_dates_are_skipped() {
        let (ctx, _file) = ctx_with_store(
            r#"[
                {"date": "whenever", "title": "undated"},
                {"date": "2026-01-10", "title": "dated"}
            ]"#,
        );
        let result = run(&ctx, &args("2026-01-01", "2026-01-31")).unwrap();
        let notes = result["notes"].as_array().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0]["title"], "dated");
    }

    #[test]
    fn missing_store_yields_empty_list() {
        let ctx = ServerContext {
            http: reqwest::Client::new(),
            notes_path: "/nonexistent/notes.json".into(),
            github_token: None,
        };
        let result = run(&ctx, &args("2026-01-01", "2026-01-31")).unwrap();
        assert!(result["notes"].as_array().unwrap().is_empty());
    }

    #[test]
    fn corrupt_store_is_an_error() {
        let (ctx, _file) = ctx_with_store("{ not an array");
        assert!(run(&ctx, &args("2026-01-01", "2026-01-31")).is_err());
    }

    #[test]
    fn invalid_range_is_an_error() {
        let (ctx, _file) = ctx_with_store("[]");
        assert!(run(&ctx, &args("soonish", "2026-01-31")).is_err());
    }
}
