use chrono::{Datelike, NaiveDate};
use serde_json::{json, Map, Value};
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::TrackerError;
use crate::jira::{Tracker, SEARCH_PAGE_SIZE};

/// What the upserter did with the rendered report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A new sub-task was created under the monthly task.
    Created(String),
    /// Today's sub-task already existed; the report was appended as a
    /// comment (journal semantics, re-runs never overwrite).
    Commented(String),
    /// The per-user epic or monthly task is missing; nothing was filed.
    Skipped,
}

/// File the rendered report under the current user's monthly task.
///
/// Resolution order: current user -> epic -> monthly task -> today's
/// sub-task. A missing epic or monthly task ends the run gracefully with
/// `Skipped`; any tracker error aborts it. Nothing already committed is
/// rolled back.
pub fn file_work_log<T: Tracker>(
    tracker: &T,
    config: &Config,
    report: &str,
    today: NaiveDate,
) -> Result<Outcome, TrackerError> {
    let user = tracker.current_user()?;
    let display_name = user.display_name;
    info!("current user: {}", display_name);

    let epic_jql = format!(
        "project = {} AND issuetype = Epic AND summary ~ \"{}\"",
        config.worklog_project, display_name
    );
    let epics = tracker.search_issues(&epic_jql, false, SEARCH_PAGE_SIZE)?;
    let Some(epic) = epics.issues.first() else {
        error!(
            "no epic found with a summary containing '{}'",
            display_name
        );
        return Ok(Outcome::Skipped);
    };
    if epics.issues.len() > 1 {
        debug!(
            "{} epics match '{}'; taking the tracker's first result",
            epics.issues.len(),
            display_name
        );
    }
    info!("found epic: {}", epic.key);

    let (month_start, month_end) = month_bounds(today);
    let monthly_jql = format!(
        "project = {} AND type = Task AND summary ~ \"{}\" AND created >= \"{}\" AND created <= \"{}\"",
        config.worklog_project,
        display_name,
        month_start.format("%Y-%m-%d"),
        month_end.format("%Y-%m-%d")
    );
    let monthly = tracker.search_issues(&monthly_jql, false, SEARCH_PAGE_SIZE)?;
    let Some(monthly_task) = monthly.issues.first() else {
        error!(
            "no task with the summary '{}' was created this month",
            display_name
        );
        return Ok(Outcome::Skipped);
    };
    info!("found monthly task: {}", monthly_task.key);

    let today_str = today.format("%Y-%m-%d").to_string();
    let sub_task_jql = format!(
        "parent = {} AND \"Start date\" = \"{}\"",
        monthly_task.key, today_str
    );
    let existing = tracker.search_issues(&sub_task_jql, false, SEARCH_PAGE_SIZE)?;

    if let Some(sub_task) = existing.issues.first() {
        info!("existing sub-task with today's start date: {}", sub_task.key);
        tracker.add_comment(&sub_task.key, report)?;
        info!("added comment to sub-task {}", sub_task.key);
        return Ok(Outcome::Commented(sub_task.key.clone()));
    }

    // The start-date field id is configured per installation, so the
    // payload is assembled as a map rather than a fixed literal.
    let mut fields = Map::new();
    fields.insert("project".to_string(), json!({ "key": config.worklog_project }));
    fields.insert("parent".to_string(), json!({ "key": monthly_task.key }));
    fields.insert(
        "summary".to_string(),
        Value::String(format!("{}, {}", today.format("%d"), today.format("%b"))),
    );
    fields.insert("description".to_string(), Value::String(report.to_string()));
    fields.insert("issuetype".to_string(), json!({ "name": "Sub-task" }));
    fields.insert(
        config.start_date_field.clone(),
        Value::String(today_str),
    );

    let key = tracker.create_issue(Value::Object(fields))?;
    tracker.assign_issue(&key, &display_name)?;
    info!("created sub-task {} under {}", key, monthly_task.key);
    Ok(Outcome::Created(key))
}

/// First and last calendar day of `today`'s month.
fn month_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = today.with_day(1).unwrap_or(today);
    let next_month = if today.month() == 12 {
        NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
    };
    let last = next_month.and_then(|d| d.pred_opt()).unwrap_or(today);
    (first, last)
}
