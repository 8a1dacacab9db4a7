use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};

use crate::error::TrackerError;
use crate::models::TimeWindow;

/// Resolve the day to report on into a UTC window.
///
/// An explicit `YYYY-MM-DD` wins; otherwise the previous working day is
/// taken relative to `now`, mapping weekend and Monday anchors back to the
/// preceding Friday.
pub fn resolve_window(
    explicit: Option<&str>,
    now: DateTime<Utc>,
) -> Result<TimeWindow, TrackerError> {
    let day = match explicit {
        Some(raw) => {
            let raw = raw.trim();
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| TrackerError::InvalidDate(raw.to_string()))?
        }
        None => previous_working_day(now.date_naive()),
    };

    let start = day.and_time(NaiveTime::MIN).and_utc();
    let end = start + Duration::days(1) - Duration::seconds(1);
    Ok(TimeWindow { start, end })
}

fn previous_working_day(today: NaiveDate) -> NaiveDate {
    let step_back = match today.weekday() {
        Weekday::Mon => 3,
        Weekday::Sun => 2,
        // Saturday and ordinary weekdays both step back one day
        _ => 1,
    };
    today - Duration::days(step_back)
}
