//! Flat-text grammar -> degraded summary reconstruction.
//!
//! The parser is forward-only: it classifies each line (blank, section
//! marker, group header, title line) and never backtracks across lines.
//! Title-line fields are stripped right to left in a fixed order: mobile
//! URL, URL, occurrence count, time display, rank token. Any absent field
//! is simply skipped. Malformed title lines are dropped with a warning and
//! parsing continues.

use crate::domain::{DecodedGroup, DecodedSummary, TitleRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;

use super::{FAILED_SECTION_MARKER, NEW_SECTION_MARKER};

static GROUP_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<word>.+) \(共(?P<count>\d+)条\)$").expect("group header regex"));

/// One classified line of the grammar.
enum Line<'a> {
    Blank,
    NewSectionMarker,
    FailedSectionMarker,
    GroupHeader { word: &'a str },
    Title(&'a str),
    Other,
}

fn classify(line: &str) -> Line<'_> {
    if line.is_empty() {
        return Line::Blank;
    }
    if line.starts_with(FAILED_SECTION_MARKER) {
        return Line::FailedSectionMarker;
    }
    if line.starts_with(NEW_SECTION_MARKER) {
        return Line::NewSectionMarker;
    }
    if let Some(caps) = GROUP_HEADER_RE.captures(line) {
        return Line::GroupHeader { word: caps.name("word").expect("word capture").as_str() };
    }
    if line.starts_with('[') && line.contains("] ") {
        return Line::Title(line);
    }
    Line::Other
}

/// Read a running summary file into its degraded map form. An unreadable or
/// missing file is prior state lost, not an error: it decodes to the empty
/// summary.
pub fn decode_summary_file(path: &Path) -> DecodedSummary {
    match std::fs::read_to_string(path) {
        Ok(text) => decode_summary(&text),
        Err(err) => {
            tracing::info!("No readable summary at {}: {}", path.display(), err);
            DecodedSummary::default()
        }
    }
}

/// Parse the persisted grammar. Only the group-record section and the
/// failed-ids section are reconstructed; the "newly added this batch"
/// section is informational and skipped.
pub fn decode_summary(text: &str) -> DecodedSummary {
    enum Section {
        Groups,
        NewBatch,
        Failed,
    }

    let mut summary = DecodedSummary::default();
    let mut section = Section::Groups;
    let mut current_group: Option<usize> = None;

    for line in text.lines() {
        let line = line.trim();
        match classify(line) {
            Line::Blank => {}
            Line::FailedSectionMarker => {
                section = Section::Failed;
                current_group = None;
            }
            Line::NewSectionMarker => {
                section = Section::NewBatch;
                current_group = None;
            }
            _ if matches!(section, Section::NewBatch) => {}
            _ if matches!(section, Section::Failed) => {
                if line.contains(',') {
                    summary
                        .failed_ids
                        .extend(line.split(',').map(str::trim).filter(|id| !id.is_empty()).map(String::from));
                }
            }
            Line::GroupHeader { word } => {
                let index = match summary.groups.iter().position(|g| g.word == word) {
                    Some(index) => index,
                    None => {
                        summary
                            .groups
                            .push(DecodedGroup { word: word.to_string(), titles: Vec::new() });
                        summary.groups.len() - 1
                    }
                };
                current_group = Some(index);
            }
            Line::Title(line) => {
                let Some(index) = current_group else {
                    continue;
                };
                match parse_title_line(line) {
                    Some(record) => {
                        let group = &mut summary.groups[index];
                        // First occurrence wins; later duplicates of the
                        // same title are ignored.
                        if group.title(&record.title).is_none() {
                            group.titles.push(record);
                        }
                    }
                    None => {
                        tracing::warn!("Skipping malformed title line: {}", truncate(line, 50));
                    }
                }
            }
            Line::Other => {}
        }
    }

    summary
}

/// Parse one `[<source>] <title> ...` line, stripping optional suffixes
/// right to left. Returns `None` when nothing that looks like a title
/// remains.
fn parse_title_line(line: &str) -> Option<TitleRecord> {
    let body = line.strip_prefix('[')?;
    let (source_name, rest) = body.split_once("] ")?;
    let mut rest = rest;

    let mut mobile_url = "";
    if let Some((head, tail)) = rest.rsplit_once(" [MOBILE:") {
        if let Some(value) = tail.strip_suffix(']') {
            mobile_url = value;
            rest = head;
        }
    }

    let mut url = "";
    if let Some((head, tail)) = rest.rsplit_once(" [URL:") {
        if let Some(value) = tail.strip_suffix(']') {
            url = value;
            rest = head;
        }
    }

    let mut occurrence_count = 1u32;
    if let Some((head, tail)) = rest.rsplit_once(" (") {
        if let Some(digits) = tail.strip_suffix("次)") {
            if let Ok(count) = digits.parse::<u32>() {
                occurrence_count = count;
                rest = head;
            }
        }
    }

    let mut time_display = "";
    if let Some((head, tail)) = rest.rsplit_once(" - ") {
        time_display = tail;
        rest = head;
    }

    let mut ranks = BTreeSet::new();
    if let Some((head, tail)) = rest.rsplit_once(" [") {
        if let Some(token) = tail.strip_suffix(']') {
            if let Some(parsed) = parse_rank_token(token) {
                ranks = parsed;
                rest = head;
            }
        }
    }

    let title = rest.trim();
    if title.is_empty() {
        return None;
    }

    Some(TitleRecord {
        title: title.to_string(),
        platform_id: String::new(),
        source_name: source_name.to_string(),
        time_display: time_display.to_string(),
        occurrence_count,
        ranks,
        url: url.to_string(),
        mobile_url: mobile_url.to_string(),
        is_new: false,
    })
}

/// `<n>` or `<min> - <max>`; a range expands to the full inclusive span.
fn parse_rank_token(token: &str) -> Option<BTreeSet<u32>> {
    if let Some((min, max)) = token.split_once(" - ") {
        let min: u32 = min.parse().ok()?;
        let max: u32 = max.parse().ok()?;
        if min > max {
            return None;
        }
        return Some((min..=max).collect());
    }
    let rank: u32 = token.parse().ok()?;
    Some(BTreeSet::from([rank]))
}

fn truncate(line: &str, max_chars: usize) -> &str {
    match line.char_indices().nth(max_chars) {
        Some((index, _)) => &line[..index],
        None => line,
    }
}
