//! Incremental merge of a freshly built report into previously persisted
//! state.
//!
//! This is a pure function of `(existing, fresh) -> merged`: no ambient
//! state, no I/O. Callers decode the running file first and re-encode the
//! result.

use crate::domain::{DecodedSummary, GroupRecord, ReportModel, TitleRecord};

/// Combine a decoded running summary with a fresh report model.
///
/// Per fresh group: titles already present merge (rank union, occurrence
/// count +1, existing non-empty time display wins, fresh fields otherwise);
/// unseen fresh titles pass through; historical titles absent from the
/// fresh batch re-append unchanged with `is_new` forced off. Group counts
/// and percentages are re-derived from the merged title sets. Failed-id
/// sets union. The "new since last run" section always comes from the
/// fresh model alone.
pub fn merge_reports(existing: &DecodedSummary, fresh: &ReportModel) -> ReportModel {
    let mut groups: Vec<GroupRecord> = Vec::with_capacity(fresh.groups.len());

    for fresh_group in &fresh.groups {
        let existing_group = existing.group(&fresh_group.word);
        let mut titles: Vec<TitleRecord> = Vec::with_capacity(fresh_group.titles.len());

        for fresh_title in &fresh_group.titles {
            let merged = match existing_group.and_then(|g| g.title(&fresh_title.title)) {
                Some(existing_title) => merge_title(existing_title, fresh_title),
                None => fresh_title.clone(),
            };
            titles.push(merged);
        }

        if let Some(existing_group) = existing_group {
            for historical in &existing_group.titles {
                if fresh_group.titles.iter().any(|t| t.title == historical.title) {
                    continue;
                }
                let mut carried = historical.clone();
                carried.is_new = false;
                carried.platform_id.clear();
                titles.push(carried);
            }
        }

        groups.push(GroupRecord {
            word: fresh_group.word.clone(),
            count: titles.len(),
            percentage: 0.0,
            titles,
        });
    }

    renormalize_percentages(&mut groups);

    let mut failed_ids = existing.failed_ids.clone();
    failed_ids.extend(fresh.failed_ids.iter().cloned());

    ReportModel {
        groups,
        new_titles: fresh.new_titles.clone(),
        failed_ids,
        total_new_count: fresh.total_new_count,
    }
}

/// One title seen again in a later run: ranks union, one more observed run,
/// the earliest non-empty time display sticks, everything else follows the
/// fresh record.
fn merge_title(existing: &TitleRecord, fresh: &TitleRecord) -> TitleRecord {
    let mut merged = fresh.clone();
    merged.ranks.extend(existing.ranks.iter().copied());
    merged.occurrence_count = existing.occurrence_count + 1;
    if !existing.time_display.is_empty() {
        merged.time_display = existing.time_display.clone();
    }
    merged
}

/// `round(count / total * 100, 2)` for every group, so percentages sum to
/// ~100 whenever any titles exist.
pub fn renormalize_percentages(groups: &mut [GroupRecord]) {
    let total: usize = groups.iter().map(|g| g.count).sum();
    if total == 0 {
        return;
    }
    for group in groups {
        group.percentage = round2(group.count as f64 / total as f64 * 100.0);
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
