use anyhow::Result;
use chrono::Utc;

use crate::collect::collect_activities;
use crate::config::Config;
use crate::jira::Tracker;
use crate::report::render_report;
use crate::window::resolve_window;

/// Collect and render without filing anything; for checking what a run
/// would post.
pub fn run<T: Tracker>(tracker: &T, config: &Config, date: Option<&str>) -> Result<()> {
    let window = resolve_window(date, Utc::now())?;
    let records = collect_activities(tracker, config, &window)?;

    if records.is_empty() {
        println!("No activities found.");
        return Ok(());
    }

    print!("{}", render_report(&records));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{test_config, FakeTracker};

    #[test]
    fn preview_never_writes_to_the_tracker() {
        let tracker = FakeTracker::with_user("Jane Doe");

        run(&tracker, &test_config(), Some("2024-08-14")).unwrap();

        assert!(tracker.created.borrow().is_empty());
        assert!(tracker.added_comments.borrow().is_empty());
    }
}
