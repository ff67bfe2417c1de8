//! Text report artifact: grammar-compatible writing plus the running-file
//! merge path.

use crate::codec::{decode_summary_file, encode_report};
use crate::domain::{ReportMode, ReportModel};
use crate::merge::merge_reports;
use crate::utils::time::time_filename;
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use std::path::Path;

/// Fixed running-file name for a mode's daily summary.
pub fn summary_filename(mode: ReportMode) -> &'static str {
    match mode {
        ReportMode::Daily => "当日汇总.txt",
        ReportMode::Current => "当前榜单汇总.txt",
        ReportMode::Incremental => "当日增量.txt",
    }
}

/// Fixed file name for a mode's daily summary, timestamped otherwise.
pub fn text_filename(mode: ReportMode, is_daily_summary: bool, now: &DateTime<FixedOffset>) -> String {
    if is_daily_summary {
        summary_filename(mode).to_string()
    } else {
        format!("{}.txt", time_filename(now))
    }
}

/// Write a text report in the persisted grammar.
///
/// A run's own timestamped file is a full overwrite. With `accumulate` set
/// (the shared running daily file), existing content is decoded, merged
/// with the fresh model, and the file is replaced with the merged encoding
/// — never appended to. The read-modify-write window is covered by the
/// single-writer contract, not a lock.
pub fn write_text_report(model: &ReportModel, path: &Path, accumulate: bool) -> Result<()> {
    let content = if accumulate && path.exists() {
        tracing::info!("Existing running summary found, merging: {}", path.display());
        let existing = decode_summary_file(path);
        encode_report(&merge_reports(&existing, model))
    } else {
        encode_report(model)
    };

    std::fs::write(path, content)
        .with_context(|| format!("Failed writing text report: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GroupRecord, TitleRecord};
    use std::collections::BTreeSet;
    use std::fs;
    use tempfile::TempDir;

    fn model_with(title: &str, ranks: &[u32]) -> ReportModel {
        let record = TitleRecord {
            title: title.to_string(),
            platform_id: "zhihu".to_string(),
            source_name: "知乎".to_string(),
            time_display: "15时30分".to_string(),
            occurrence_count: 1,
            ranks: ranks.iter().copied().collect(),
            url: "https://example.com/1".to_string(),
            mobile_url: String::new(),
            is_new: false,
        };
        ReportModel {
            groups: vec![GroupRecord {
                word: "人工智能".to_string(),
                count: 1,
                percentage: 100.0,
                titles: vec![record],
            }],
            ..ReportModel::default()
        }
    }

    #[test]
    fn timestamped_write_is_full_overwrite() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("15时30分.txt");
        fs::write(&path, "stale content").expect("seed");

        write_text_report(&model_with("GPT-5 即将发布", &[1]), &path, false).expect("write");

        let content = fs::read_to_string(&path).expect("read");
        assert!(!content.contains("stale content"));
        assert!(content.contains("人工智能 (共1条)"));
    }

    #[test]
    fn running_daily_file_accumulates_across_runs() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("当日汇总.txt");

        write_text_report(&model_with("GPT-5 即将发布", &[5]), &path, true).expect("first run");
        write_text_report(&model_with("GPT-5 即将发布", &[1]), &path, true).expect("second run");

        let content = fs::read_to_string(&path).expect("read");
        assert!(content.contains("[1 - 5]"), "ranks union across runs: {}", content);
        assert!(content.contains("(2次)"), "one occurrence per run: {}", content);
    }

    #[test]
    fn accumulate_against_missing_file_degrades_to_fresh_write() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("当日汇总.txt");

        write_text_report(&model_with("GPT-5 即将发布", &[1]), &path, true).expect("write");
        assert!(fs::read_to_string(&path).expect("read").contains("GPT-5 即将发布 [1]"));
    }

    #[test]
    fn summary_filenames_per_mode() {
        assert_eq!(summary_filename(ReportMode::Daily), "当日汇总.txt");
        assert_eq!(summary_filename(ReportMode::Current), "当前榜单汇总.txt");
        assert_eq!(summary_filename(ReportMode::Incremental), "当日增量.txt");
    }
}
