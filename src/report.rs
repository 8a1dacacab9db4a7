use crate::models::ActivityRecord;

// Panel markup for Jira's wiki renderer. Swap these to target another
// tracker's rich-text syntax; the section structure stays the same.
const PANEL_STYLE: &str = "borderStyle=dashed|borderColor=#A9A9A9|titleBGColor=#E6F7E6|bgColor=#deebff";
const TOTALS_TITLE: &str = "Total Time Summary";

/// `"{hours}h {minutes}m"`, or `"N/A"` when the duration is unknown.
pub fn format_seconds(seconds: Option<i64>) -> String {
    match seconds {
        None => "N/A".to_string(),
        Some(s) => format!("{}h {}m", s / 3600, (s % 3600) / 60),
    }
}

/// Render the collected records into one report string: a panel per issue
/// in the order given, then a totals panel. Pure and deterministic.
pub fn render_report(records: &[ActivityRecord]) -> String {
    let mut out = String::new();
    let mut total_estimate = 0i64;
    let mut total_spent = 0i64;

    for record in records {
        let estimate = record.original_estimate_seconds.unwrap_or(0);
        total_estimate += estimate;
        total_spent += record.time_spent_seconds;

        out.push_str(&format!(
            "{{panel:title={} - {}|{}}}\n",
            record.key, record.summary, PANEL_STYLE
        ));
        out.push_str(&format!("*Link*: [{}]\n", record.link));
        out.push_str(&format!(
            "*Original Estimate*: {}\n",
            format_seconds(Some(estimate))
        ));
        out.push_str(&format!("*Created*: {}\n", record.created));
        out.push_str(&format!("*Updated*: {}\n", record.updated));
        out.push_str(&format!(
            "*Time Spent*: {}\n",
            format_seconds(Some(record.time_spent_seconds))
        ));

        if !record.status_changes.is_empty() {
            out.push_str("\n*Status Changes:*\n");
            for change in &record.status_changes {
                out.push_str(&format!(
                    " - From '{}' to '{}' on {}\n",
                    change.from, change.to, change.at
                ));
            }
        }

        if !record.comments.is_empty() {
            out.push_str("\n*Comments:*\n");
            for comment in &record.comments {
                out.push_str(&format!("* {} (on {})\n", comment.body, comment.created));
            }
        }

        out.push_str("{panel}\n\n----\n\n");
    }

    out.push_str(&format!(
        "{{panel:title={}|{}}}\n",
        TOTALS_TITLE, PANEL_STYLE
    ));
    out.push_str(&format!(
        "*Total Original Estimate*: {}\n",
        format_seconds(Some(total_estimate))
    ));
    out.push_str(&format!(
        "*Total Time Spent*: {}\n",
        format_seconds(Some(total_spent))
    ));
    out.push_str("{panel}\n");

    out
}
