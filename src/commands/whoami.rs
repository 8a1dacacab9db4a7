use anyhow::Result;

use crate::jira::Tracker;

/// Print the authenticated user's display name; the cheapest way to check
/// the configured credentials.
pub fn run<T: Tracker>(tracker: &T) -> Result<()> {
    let user = tracker.current_user()?;
    println!("{}", user.display_name);
    Ok(())
}
