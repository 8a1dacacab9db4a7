use chrono::{DateTime, Utc};
use serde::Serialize;

/// Reporting window for one working day, resolved in UTC.
/// Invariant: `start` is at midnight and `end == start + 24h - 1s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Inclusive on both ends; used for worklog and changelog filtering.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// Everything the report needs to know about one issue touched in the
/// window. Built once per issue per run, never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityRecord {
    pub key: String,
    pub summary: String,
    pub link: String,
    pub original_estimate_seconds: Option<i64>,
    pub time_spent_seconds: i64,
    pub created: String,
    pub updated: String,
    pub comments: Vec<CommentEntry>,
    pub status_changes: Vec<StatusChange>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentEntry {
    pub body: String,
    pub created: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusChange {
    pub from: String,
    pub to: String,
    pub at: String,
}
