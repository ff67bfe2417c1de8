//! Canonical report model shared by the builder, merge engine, and renderers.

use clap::ValueEnum;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Report flavor. Selects artifact naming and whether the
/// "new since last run" section is populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    Daily,
    Current,
    Incremental,
}

impl ReportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportMode::Daily => "daily",
            ReportMode::Current => "current",
            ReportMode::Incremental => "incremental",
        }
    }
}

/// A normalized news item as handed over by a collector. Consumed read-only.
///
/// `extra` may carry precomputed display fields: `time_display`, `count`,
/// `all_ranks`, `is_new`, `mobileUrl`. Missing fields fall back to defaults
/// when the item is converted into a [`TitleRecord`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewsItem {
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub mobile_url: Option<String>,
    pub source_id: String,
    pub source_name: String,
    /// 1-based position within the source's listing at fetch time.
    pub rank: u32,
    #[serde(default)]
    pub extra: Map<String, Value>,
}

/// A keyword bucket with its matched items, as computed upstream.
#[derive(Debug, Clone, Deserialize)]
pub struct WordGroupStat {
    pub word: String,
    pub count: i64,
    pub percentage: f64,
    #[serde(default)]
    pub news_list: Vec<NewsItem>,
}

/// One collection run's input, as handed over by the collectors: grouped
/// statistics, items that are new since the last run, and the ids of
/// sources that failed to respond.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectorBatch {
    #[serde(default)]
    pub stats: Vec<WordGroupStat>,
    #[serde(default)]
    pub new_news: Vec<NewsItem>,
    #[serde(default)]
    pub failed_ids: Vec<String>,
}

/// The unit tracked for deduplication and merging. Within one group the
/// title string is the merge key: `occurrence_count` never decreases and
/// `ranks` only grows across merges.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleRecord {
    pub title: String,
    /// Platform id. Empty for records reconstructed from the text grammar,
    /// which does not persist it.
    pub platform_id: String,
    pub source_name: String,
    pub time_display: String,
    pub occurrence_count: u32,
    pub ranks: BTreeSet<u32>,
    pub url: String,
    pub mobile_url: String,
    pub is_new: bool,
}

impl TitleRecord {
    /// Preferred link target: mobile URL when present, desktop URL otherwise.
    pub fn link_url(&self) -> &str {
        if self.mobile_url.is_empty() {
            &self.url
        } else {
            &self.mobile_url
        }
    }
}

/// A keyword group in the canonical model. `count` always equals the number
/// of distinct titles currently held.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupRecord {
    pub word: String,
    pub count: usize,
    pub percentage: f64,
    pub titles: Vec<TitleRecord>,
}

/// Titles that appeared for the first time in the current run, bucketed by
/// source display name.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSourceGroup {
    pub source_id: String,
    pub source_name: String,
    pub titles: Vec<TitleRecord>,
}

/// The canonical intermediate model passed between builder, merge engine,
/// and renderers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportModel {
    pub groups: Vec<GroupRecord>,
    pub new_titles: Vec<NewSourceGroup>,
    pub failed_ids: BTreeSet<String>,
    pub total_new_count: usize,
}

impl ReportModel {
    /// Total number of distinct titles across all groups.
    pub fn total_title_count(&self) -> usize {
        self.groups.iter().map(|g| g.count).sum()
    }
}

/// Degraded reconstruction of a previously persisted running summary.
///
/// Group and title order follow the file so historical titles re-append in
/// the order they were persisted. Reconstructed records carry an empty
/// `platform_id` and `is_new == false`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedSummary {
    pub groups: Vec<DecodedGroup>,
    pub failed_ids: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedGroup {
    pub word: String,
    pub titles: Vec<TitleRecord>,
}

impl DecodedSummary {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.failed_ids.is_empty()
    }

    pub fn group(&self, word: &str) -> Option<&DecodedGroup> {
        self.groups.iter().find(|g| g.word == word)
    }
}

impl DecodedGroup {
    pub fn title(&self, title: &str) -> Option<&TitleRecord> {
        self.titles.iter().find(|t| t.title == title)
    }
}
