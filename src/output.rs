use eyre::Result;

use crate::pipeline::{Level, Notice, Report};

/// Render a report as plain text: thumbnail, then the summary under a heading
pub fn render_text(report: &Report) -> String {
    let mut sections = Vec::new();
    if let Some(ref thumbnail) = report.thumbnail_url {
        sections.push(format!("Thumbnail: {thumbnail}"));
    }
    if let Some(ref summary) = report.summary {
        sections.push(format!("## Detailed Notes:\n{summary}"));
    }
    sections.join("\n\n")
}

pub fn render_json(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// One line per notice, prefixed with its level
pub fn render_notice(notice: &Notice) -> String {
    match notice.level {
        Level::Warning => format!("warning: {}", notice.message),
        Level::Error => format!("error: {}", notice.message),
    }
}
