//! The recap document returned by `POST /api/recap`.
//!
//! Field names are camelCase on the wire where the frontend expects
//! them (`prCount`, `sourceNotes`, ...).

use serde::{Deserialize, Serialize};

/// The full recap document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecapDocument {
    pub project: Project,
    pub range: DateRange,
    pub summary: Summary,
    pub chapters: Vec<Chapter>,
    pub timeline: Vec<TimelineItem>,
    pub metrics: Metrics,
    pub source_notes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub repo: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    pub since: String,
    pub until: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub headline: String,
    pub highlights: Vec<String>,
    pub risks: Vec<String>,
    pub next: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    pub title: String,
    pub beats: Vec<String>,
}

/// One entry in the merged activity timeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineItem {
    pub date: String,
    pub title: String,
    pub detail: String,
    #[serde(rename = "type")]
    pub kind: TimelineKind,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimelineKind {
    Pr,
    Commit,
    Note,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub pr_count: usize,
    pub commit_count: usize,
    pub note_count: usize,
}
