//! Canonical JSON snapshot of a report, written atomically.

use crate::domain::{ReportMode, ReportModel};
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use serde_json::{json, Value};
use std::path::Path;

/// Fixed snapshot file name; the snapshot is a full overwrite every run.
pub const SNAPSHOT_FILENAME: &str = "news_summary.json";

/// Build the complete structured snapshot for a report model.
pub fn build_snapshot(model: &ReportModel, mode: ReportMode, now: &DateTime<FixedOffset>) -> Value {
    let mut stats: Vec<Value> = Vec::new();
    let mut total_count = 0usize;

    for group in &model.groups {
        let news_list: Vec<Value> = group
            .titles
            .iter()
            .map(|title| {
                json!({
                    "title": title.title,
                    "url": title.url,
                    "mobile_url": title.mobile_url,
                    "platform": title.platform_id,
                    "platform_name": title.source_name,
                    "rank": title.ranks.iter().next().copied().unwrap_or(999),
                    "ranks": title.ranks.iter().copied().collect::<Vec<u32>>(),
                    "occurrence_count": title.occurrence_count,
                    "time_display": title.time_display,
                })
            })
            .collect();

        if news_list.is_empty() {
            continue;
        }
        total_count += news_list.len();
        stats.push(json!({
            "word_group": group.word,
            "count": news_list.len(),
            "percentage": group.percentage,
            "news_list": news_list,
        }));
    }

    json!({
        "metadata": {
            "date": now.format("%Y-%m-%d").to_string(),
            "mode": mode.as_str(),
            "timestamp": now.to_rfc3339(),
            "total_word_groups": stats.len(),
            "total_news_count": total_count,
        },
        "stats": stats,
    })
}

/// Write the snapshot via a temporary file in the destination directory
/// followed by an atomic rename. A reader never observes a partial file;
/// if anything fails before the rename the temporary file is removed, the
/// error propagates, and the previous snapshot (if any) survives.
pub fn write_snapshot(
    model: &ReportModel,
    mode: ReportMode,
    now: &DateTime<FixedOffset>,
    path: &Path,
) -> Result<()> {
    let snapshot = build_snapshot(model, mode, now);
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed creating snapshot directory: {}", dir.display()))?;

    let mut temp = tempfile::Builder::new()
        .prefix(".tmp_")
        .suffix(".json")
        .tempfile_in(dir)
        .with_context(|| format!("Failed creating temporary snapshot in {}", dir.display()))?;

    // Dropping `temp` (or the PersistError holding it) unlinks the
    // temporary file, so every early return below leaves the directory
    // clean and the destination untouched.
    serde_json::to_writer_pretty(&mut temp, &snapshot)
        .with_context(|| format!("Failed writing snapshot for {}", path.display()))?;

    if let Err(persist_err) = temp.persist(path) {
        let tempfile::PersistError { error, file } = persist_err;
        drop(file);
        return Err(error).with_context(|| format!("Failed replacing snapshot: {}", path.display()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GroupRecord, TitleRecord};
    use chrono::TimeZone;
    use std::collections::BTreeSet;
    use std::fs;
    use tempfile::TempDir;

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(8 * 3600).unwrap().with_ymd_and_hms(2026, 8, 6, 15, 30, 0).unwrap()
    }

    fn sample_model() -> ReportModel {
        let title = TitleRecord {
            title: "GPT-5 即将发布".to_string(),
            platform_id: "zhihu".to_string(),
            source_name: "知乎".to_string(),
            time_display: "15时30分".to_string(),
            occurrence_count: 2,
            ranks: BTreeSet::from([1, 5]),
            url: "https://example.com/1".to_string(),
            mobile_url: "https://m.example.com/1".to_string(),
            is_new: false,
        };
        ReportModel {
            groups: vec![GroupRecord {
                word: "人工智能".to_string(),
                count: 1,
                percentage: 100.0,
                titles: vec![title],
            }],
            ..ReportModel::default()
        }
    }

    #[test]
    fn snapshot_layout() {
        let snapshot = build_snapshot(&sample_model(), ReportMode::Daily, &now());

        assert_eq!(snapshot["metadata"]["date"], "2026-08-06");
        assert_eq!(snapshot["metadata"]["mode"], "daily");
        assert_eq!(snapshot["metadata"]["total_word_groups"], 1);
        assert_eq!(snapshot["metadata"]["total_news_count"], 1);

        let news = &snapshot["stats"][0]["news_list"][0];
        assert_eq!(news["rank"], 1);
        assert_eq!(news["ranks"], json!([1, 5]));
        assert_eq!(news["occurrence_count"], 2);
        assert_eq!(news["platform"], "zhihu");
        assert_eq!(news["platform_name"], "知乎");
    }

    #[test]
    fn empty_groups_are_omitted_from_snapshot() {
        let mut model = sample_model();
        model.groups.push(GroupRecord {
            word: "空词组".to_string(),
            count: 0,
            percentage: 0.0,
            titles: Vec::new(),
        });
        let snapshot = build_snapshot(&model, ReportMode::Daily, &now());
        assert_eq!(snapshot["metadata"]["total_word_groups"], 1);
    }

    #[test]
    fn write_replaces_previous_snapshot() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join(SNAPSHOT_FILENAME);
        fs::write(&path, "{\"stale\": true}").expect("seed");

        write_snapshot(&sample_model(), ReportMode::Daily, &now(), &path).expect("write");

        let parsed: Value = serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("json");
        assert_eq!(parsed["metadata"]["mode"], "daily");
        // No temporary files linger next to the snapshot.
        let leftovers: Vec<_> = fs::read_dir(tmp.path())
            .expect("dir")
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".tmp_"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn failed_replacement_leaves_destination_untouched() {
        let tmp = TempDir::new().expect("tmp");
        // A directory at the destination path makes the rename fail after
        // the temporary file is fully written.
        let path = tmp.path().join("news_summary.json");
        fs::create_dir(&path).expect("dir in the way");
        fs::write(path.join("keep.txt"), "prior artifact").expect("seed");

        let err = write_snapshot(&sample_model(), ReportMode::Daily, &now(), &path);
        assert!(err.is_err());

        assert_eq!(fs::read_to_string(path.join("keep.txt")).expect("read"), "prior artifact");
        let leftovers: Vec<_> = fs::read_dir(tmp.path())
            .expect("dir")
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".tmp_"))
            .collect();
        assert!(leftovers.is_empty(), "temporary file must be cleaned up");
    }
}
