//! Caption text for the result photo

use crate::models::NodeResult;
use crate::stats::NodeStatistics;
use chrono::{DateTime, Local};
use std::fmt::Write as _;

/// Title line, before the optional group label
pub const CAPTION_TITLE: &str = "🚀 Stair Speedtest Results";

/// Format used for the completion time line
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a report summary stamped with the current local time
///
/// Returns an empty string for an empty batch; callers treat that as
/// "nothing to report".
pub fn summarize(nodes: &[NodeResult], group_label: Option<&str>) -> String {
    summarize_at(nodes, group_label, Local::now())
}

/// Render a report summary stamped with `completed_at`
pub fn summarize_at(nodes: &[NodeResult], group_label: Option<&str>, completed_at: DateTime<Local>) -> String {
    if nodes.is_empty() {
        return String::new();
    }

    let stats = NodeStatistics::from_nodes(nodes);
    let mut caption = String::from(CAPTION_TITLE);

    if let Some(label) = group_label.filter(|label| !label.is_empty()) {
        caption.push_str(" - ");
        caption.push_str(label);
    }
    caption.push_str("\n\n");

    // Writing into a String cannot fail
    let _ = write_summary(&mut caption, &stats);

    caption.push_str("\n⏰ Test completed at: ");
    caption.push_str(&format_timestamp(&completed_at));
    caption
}

fn write_summary(out: &mut String, stats: &NodeStatistics) -> std::fmt::Result {
    writeln!(out, "📊 Summary:")?;
    writeln!(out, "• Total Nodes: {}", stats.total)?;
    writeln!(out, "• Working: {} ✅", stats.working)?;
    writeln!(out, "• Failed: {} ❌", stats.failed)?;

    if let Some(average) = stats.average_speed() {
        writeln!(out, "• Avg Speed: {:.2} MB/s", average)?;
        writeln!(out, "• Max Speed: {:.2} MB/s", stats.max_speed)?;
        if let Some(ping) = stats.best_ping {
            writeln!(out, "• Best Ping: {:.2}ms", ping)?;
        }
    }
    Ok(())
}

/// Human-readable completion time
pub fn format_timestamp(at: &DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}
