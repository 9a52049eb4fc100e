//! Report assembly: pure functions turning fetched activity into the
//! recap document (summary, chapters, timeline, metrics).

use recap_domain::activity::{parse_iso_date, Commit, GithubActivity, LocalNotes, Note, PullRequest};
use recap_domain::recap::{
    Chapter, DateRange, Metrics, Project, RecapDocument, Summary, TimelineItem, TimelineKind,
};

/// Maximum number of timeline entries in the document.
const TIMELINE_CAP: usize = 12;

/// Assemble the full recap document.
pub fn build_recap(
    repo: &str,
    since: &str,
    until: &str,
    github: &GithubActivity,
    notes: &LocalNotes,
) -> RecapDocument {
    let prs = &github.pull_requests;
    let commits = &github.commits;
    let notes = &notes.notes;

    RecapDocument {
        project: Project {
            repo: repo.to_string(),
            title: repo.replace('/', " "),
        },
        range: DateRange {
            since: since.to_string(),
            until: until.to_string(),
        },
        summary: build_summary(prs, commits, notes, since, until),
        chapters: build_chapters(prs, commits),
        timeline: build_timeline(prs, commits, notes),
        metrics: Metrics {
            pr_count: prs.len(),
            commit_count: commits.len(),
            note_count: notes.len(),
        },
        source_notes: notes.iter().map(|n| n.title.clone()).collect(),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Summary
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn build_summary(
    prs: &[PullRequest],
    commits: &[Commit],
    notes: &[Note],
    since: &str,
    until: &str,
) -> Summary {
    let days = day_span(since, until);
    let headline = format!(
        "Shipped {} PRs and {} commits across {} days.",
        prs.len(),
        commits.len(),
        days
    );

    let mut highlights: Vec<String> = prs.iter().take(2).map(|pr| pr.title.clone()).collect();
    highlights.extend(
        commits
            .iter()
            .take(1)
            .map(|c| format!("Commit: {}", c.message)),
    );
    highlights.retain(|h| !h.is_empty());
    if highlights.is_empty() {
        highlights.push("No major highlights captured yet.".into());
    }

    let mut risks: Vec<String> = notes
        .iter()
        .filter(|n| has_any_tag(n, &["risk", "blocker"]))
        .map(|n| n.title.clone())
        .collect();
    if risks.is_empty() {
        risks.push("No major risks recorded.".into());
    }

    let mut next: Vec<String> = notes
        .iter()
        .filter(|n| has_any_tag(n, &["next"]))
        .map(|n| n.title.clone())
        .collect();
    if next.is_empty() {
        next.push("Pick the next milestone and align on scope.".into());
        next.push("Draft the next recap to lock in outcomes.".into());
    }

    Summary {
        headline,
        highlights,
        risks,
        next,
    }
}

fn has_any_tag(note: &Note, tags: &[&str]) -> bool {
    note.tags.iter().any(|t| tags.contains(&t.as_str()))
}

/// Inclusive day count of the range; falls back to 1 when a bound does
/// not parse (the API layer validates dates before this runs).
fn day_span(since: &str, until: &str) -> i64 {
    match (parse_iso_date(since), parse_iso_date(until)) {
        (Some(start), Some(end)) => (end - start).num_days() + 1,
        _ => 1,
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Chapters
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn build_chapters(prs: &[PullRequest], commits: &[Commit]) -> Vec<Chapter> {
    vec![
        Chapter {
            title: "Act I: Setting the stage".into(),
            beats: vec![
                "Set the product vision and recap goals.".into(),
                format!("Opened {} pull requests to move work forward.", prs.len()),
                format!("Logged {} commits for the sprint narrative.", commits.len()),
            ],
        },
        Chapter {
            title: "Act II: Turning points".into(),
            beats: vec![
                "Resolved blockers and clarified integration paths.".into(),
                "Validated the demo flow with stakeholders.".into(),
                "Captured key decisions in recap notes.".into(),
            ],
        },
        Chapter {
            title: "Act III: Results and next".into(),
            beats: vec![
                "Summarized measurable outcomes and wins.".into(),
                "Documented risks and areas to revisit.".into(),
                "Outlined next steps for the next sprint.".into(),
            ],
        },
    ]
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Timeline
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn build_timeline(prs: &[PullRequest], commits: &[Commit], notes: &[Note]) -> Vec<TimelineItem> {
    let mut items: Vec<TimelineItem> = Vec::new();

    items.extend(prs.iter().map(|pr| TimelineItem {
        date: pr.date.clone(),
        title: pr.title.clone(),
        detail: pr.url.clone(),
        kind: TimelineKind::Pr,
    }));
    items.extend(commits.iter().map(|c| TimelineItem {
        date: c.date.clone(),
        title: c.message.clone(),
        detail: c.sha.clone(),
        kind: TimelineKind::Commit,
    }));
    items.extend(notes.iter().map(|n| TimelineItem {
        date: n.date.clone(),
        title: n.title.clone(),
        detail: n.detail.clone(),
        kind: TimelineKind::Note,
    }));

    // Newest first; ISO dates sort lexicographically.
    items.sort_by(|a, b| b.date.cmp(&a.date));
    items.truncate(TIMELINE_CAP);
    items
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
