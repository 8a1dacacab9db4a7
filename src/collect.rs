use tracing::{info, warn};

use crate::config::Config;
use crate::error::TrackerError;
use crate::jira::{self, JiraIssue, Tracker};
use crate::models::{ActivityRecord, CommentEntry, StatusChange, TimeWindow};

/// Query the tracker for everything the user touched inside the window and
/// assemble one record per issue, ordered as the tracker returned them
/// (descending by update time).
///
/// Window rules: worklog and status-change timestamps are matched
/// inclusively on both ends; comments must be strictly after the window
/// start and non-empty.
pub fn collect_activities<T: Tracker>(
    tracker: &T,
    config: &Config,
    window: &TimeWindow,
) -> Result<Vec<ActivityRecord>, TrackerError> {
    let start = window.start.format("%Y-%m-%d %H:%M").to_string();
    let end = window.end.format("%Y-%m-%d %H:%M").to_string();
    info!("collecting activities between {} and {}", start, end);

    let jql = format!(
        "updated >= \"{}\" AND updated < \"{}\" AND assignee = currentUser() AND project != {} ORDER BY updated DESC",
        start, end, config.excluded_project
    );
    let page = tracker.search_issues(&jql, true, jira::SEARCH_PAGE_SIZE)?;

    let total = page.total.unwrap_or(page.issues.len() as u64);
    if total > page.issues.len() as u64 {
        warn!(
            "search matched {} issues but only the first {} are reported",
            total,
            page.issues.len()
        );
    }

    let mut records = Vec::with_capacity(page.issues.len());
    for issue in page.issues {
        let time_spent_seconds = sum_worklog_seconds(tracker, &issue.key, window)?;
        let comments = comments_after_start(tracker, &issue.key, window)?;
        let status_changes = status_changes_in_window(&issue, window);

        records.push(ActivityRecord {
            link: format!("{}/browse/{}", config.server, issue.key),
            key: issue.key,
            summary: issue.fields.summary,
            original_estimate_seconds: issue.fields.original_estimate,
            time_spent_seconds,
            created: jira::date_part(&issue.fields.created),
            updated: jira::date_part(&issue.fields.updated),
            comments,
            status_changes,
        });
    }

    info!("collected {} activity records", records.len());
    Ok(records)
}

fn sum_worklog_seconds<T: Tracker>(
    tracker: &T,
    issue_key: &str,
    window: &TimeWindow,
) -> Result<i64, TrackerError> {
    let mut total = 0;
    for worklog in tracker.worklogs(issue_key)? {
        if let Some(started) = jira::parse_timestamp(&worklog.started) {
            if window.contains(started) {
                total += worklog.time_spent_seconds;
            }
        }
    }
    Ok(total)
}

fn comments_after_start<T: Tracker>(
    tracker: &T,
    issue_key: &str,
    window: &TimeWindow,
) -> Result<Vec<CommentEntry>, TrackerError> {
    let mut entries = Vec::new();
    for comment in tracker.comments(issue_key)? {
        if comment.body.is_empty() {
            continue;
        }
        match jira::parse_timestamp(&comment.created) {
            Some(created) if created > window.start => entries.push(CommentEntry {
                created: jira::date_part(&comment.created),
                body: comment.body,
            }),
            _ => {}
        }
    }
    Ok(entries)
}

fn status_changes_in_window(issue: &JiraIssue, window: &TimeWindow) -> Vec<StatusChange> {
    let mut changes = Vec::new();
    let Some(changelog) = &issue.changelog else {
        return changes;
    };

    for history in &changelog.histories {
        let Some(at) = jira::parse_timestamp(&history.created) else {
            continue;
        };
        if !window.contains(at) {
            continue;
        }
        for item in &history.items {
            if item.field == "status" {
                changes.push(StatusChange {
                    from: item.from.clone().unwrap_or_default(),
                    to: item.to.clone().unwrap_or_default(),
                    at: at.format("%Y-%m-%d %H:%M").to_string(),
                });
            }
        }
    }
    changes
}
