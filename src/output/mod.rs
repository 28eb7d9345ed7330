//! Caption generation and terminal previews

mod caption;

pub use caption::{format_timestamp, summarize, summarize_at, CAPTION_TITLE, TIMESTAMP_FORMAT};

use colored::Colorize;

/// Frame a caption for display in the terminal (used by `--dry-run`)
pub fn preview_caption(caption: &str, use_color: bool) -> String {
    let rule = "-".repeat(40);
    let header = if use_color {
        "Caption preview".bold().to_string()
    } else {
        "Caption preview".to_string()
    };

    if caption.is_empty() {
        let note = if use_color {
            "(no caption)".dimmed().to_string()
        } else {
            "(no caption)".to_string()
        };
        return format!("{}\n{}\n{}\n{}", header, rule, note, rule);
    }

    format!("{}\n{}\n{}\n{}", header, rule, caption, rule)
}
