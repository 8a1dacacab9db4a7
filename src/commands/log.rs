use anyhow::Result;
use chrono::{Local, Utc};
use tracing::info;

use crate::collect::collect_activities;
use crate::config::Config;
use crate::jira::Tracker;
use crate::report::render_report;
use crate::upsert::{self, Outcome};
use crate::window::resolve_window;

/// Full pipeline: resolve the window, collect, render and file the report.
/// An empty collection ends the run before the upserter is touched.
pub fn run<T: Tracker>(tracker: &T, config: &Config, date: Option<&str>) -> Result<()> {
    let window = resolve_window(date, Utc::now())?;
    let records = collect_activities(tracker, config, &window)?;

    if records.is_empty() {
        info!("no activities found for the requested day; nothing to file");
        println!("No activities found.");
        return Ok(());
    }

    let report = render_report(&records);
    // The sub-task start date is the operator's calendar date, not the
    // reported day.
    let today = Local::now().date_naive();

    match upsert::file_work_log(tracker, config, &report, today)? {
        Outcome::Created(key) => println!("Created work-log sub-task {}", key),
        Outcome::Commented(key) => println!("Appended today's report to {}", key),
        Outcome::Skipped => println!("No work-log filed."),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{test_config, FakeTracker};

    #[test]
    fn empty_collection_never_reaches_the_upserter() {
        let tracker = FakeTracker::with_user("Jane Doe");

        run(&tracker, &test_config(), Some("2024-08-14")).unwrap();

        // only the activity search ran; no epic/monthly resolution and no writes
        assert_eq!(tracker.search_log.borrow().len(), 1);
        assert!(tracker.created.borrow().is_empty());
        assert!(tracker.added_comments.borrow().is_empty());
        assert!(tracker.assignments.borrow().is_empty());
    }

    #[test]
    fn malformed_date_fails_before_any_api_call() {
        let tracker = FakeTracker::with_user("Jane Doe");

        let result = run(&tracker, &test_config(), Some("not-a-date"));

        assert!(result.is_err());
        assert!(tracker.search_log.borrow().is_empty());
    }
}
