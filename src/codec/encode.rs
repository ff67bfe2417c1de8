//! Report model -> flat-text grammar.

use crate::domain::{ReportModel, TitleRecord};
use crate::rank::format_ranks;

use super::{FAILED_SECTION_MARKER, NEW_SECTION_MARKER};

/// Serialize a report model into the persisted text grammar. The output is
/// what [`super::decode_summary`] reads back, so field order here defines
/// the format.
pub fn encode_report(model: &ReportModel) -> String {
    let mut lines: Vec<String> = Vec::new();

    for group in &model.groups {
        lines.push(format!("{} (共{}条)", group.word, group.count));
        lines.push(String::new());
        for title in &group.titles {
            lines.push(title_line(title));
        }
        lines.push(String::new());
    }

    if !model.new_titles.is_empty() {
        lines.push(NEW_SECTION_MARKER.to_string());
        lines.push(String::new());
        for source in &model.new_titles {
            lines.push(format!("{} (新增{}条)", source.source_name, source.titles.len()));
            lines.push(String::new());
            for title in &source.titles {
                lines.push(new_title_line(title));
            }
            lines.push(String::new());
        }
    }

    if !model.failed_ids.is_empty() {
        lines.push(FAILED_SECTION_MARKER.to_string());
        lines.push(model.failed_ids.iter().cloned().collect::<Vec<_>>().join(", "));
    }

    lines.join("\n")
}

/// `[<source>] <title>` followed by the optional rank token, time, count,
/// URL and mobile URL suffixes. Absent fields are omitted entirely.
fn title_line(title: &TitleRecord) -> String {
    let mut line = format!("[{}] {}", title.source_name, title.title);

    let rank = format_ranks(title.ranks.iter().copied(), 0);
    if !rank.token.is_empty() {
        line.push_str(&format!(" {}", rank.token));
    }
    if !title.time_display.is_empty() {
        line.push_str(&format!(" - {}", title.time_display));
    }
    if title.occurrence_count > 1 {
        line.push_str(&format!(" ({}次)", title.occurrence_count));
    }
    if !title.url.is_empty() {
        line.push_str(&format!(" [URL:{}]", title.url));
    }
    if !title.mobile_url.is_empty() {
        line.push_str(&format!(" [MOBILE:{}]", title.mobile_url));
    }

    line
}

/// Title line inside the "newly added" section: no source prefix, single
/// observed rank only.
fn new_title_line(title: &TitleRecord) -> String {
    let mut line = title.title.clone();

    if let Some(first) = title.ranks.iter().next() {
        line.push_str(&format!(" [{}]", first));
    }
    if !title.url.is_empty() {
        line.push_str(&format!(" [URL:{}]", title.url));
    }
    if !title.mobile_url.is_empty() {
        line.push_str(&format!(" [MOBILE:{}]", title.mobile_url));
    }

    line
}
