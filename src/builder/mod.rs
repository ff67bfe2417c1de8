//! Collector input -> canonical report model.

use crate::domain::{
    GroupRecord, NewSourceGroup, NewsItem, ReportMode, ReportModel, TitleRecord, WordGroupStat,
};
use crate::utils::text::clean_title;
use serde_json::Value;
use std::collections::BTreeSet;

/// Build a fresh report model from grouped statistics, the items that are
/// new since the last run, and the ids of sources that failed to respond.
///
/// Groups with a non-positive count are dropped. In incremental mode the
/// "new since last run" section is suppressed at the model level: every
/// item in that mode is new by definition, so the section would restate
/// the whole report.
pub fn build_model(
    stats: &[WordGroupStat],
    new_items: &[NewsItem],
    failed_ids: &[String],
    mode: ReportMode,
) -> ReportModel {
    let mut model = ReportModel::default();

    if mode != ReportMode::Incremental {
        model.new_titles = group_new_items(new_items);
        model.total_new_count = model.new_titles.iter().map(|s| s.titles.len()).sum();
    }

    for stat in stats {
        if stat.count <= 0 {
            continue;
        }
        let titles: Vec<TitleRecord> =
            stat.news_list.iter().filter_map(aggregated_title).collect();
        model.groups.push(GroupRecord {
            word: stat.word.clone(),
            count: titles.len(),
            percentage: stat.percentage,
            titles,
        });
    }

    model.failed_ids = failed_ids.iter().filter(|id| !id.is_empty()).cloned().collect();
    model
}

/// Bucket new items by source display name, preserving first-seen order.
fn group_new_items(new_items: &[NewsItem]) -> Vec<NewSourceGroup> {
    let mut sources: Vec<NewSourceGroup> = Vec::new();

    for item in new_items {
        let Some(record) = new_title(item) else {
            continue;
        };
        match sources.iter_mut().find(|s| s.source_name == item.source_name) {
            Some(source) => source.titles.push(record),
            None => sources.push(NewSourceGroup {
                source_id: item.source_id.clone(),
                source_name: item.source_name.clone(),
                titles: vec![record],
            }),
        }
    }

    sources
}

/// A first-observation record: single rank, no time display, marked new.
fn new_title(item: &NewsItem) -> Option<TitleRecord> {
    let title = clean_title(&item.title);
    if title.is_empty() {
        tracing::warn!("Skipping untitled item from {}", item.source_id);
        return None;
    }
    Some(TitleRecord {
        title,
        platform_id: item.source_id.clone(),
        source_name: item.source_name.clone(),
        time_display: String::new(),
        occurrence_count: 1,
        ranks: BTreeSet::from([item.rank]),
        url: item.url.clone(),
        mobile_url: item.mobile_url.clone().unwrap_or_default(),
        is_new: true,
    })
}

/// A record sourced from already-aggregated statistics: display fields come
/// from the item's extras map with defined defaults. Malformed extras are
/// isolated per item — the field falls back to its default with a warning
/// and the batch continues.
fn aggregated_title(item: &NewsItem) -> Option<TitleRecord> {
    let title = clean_title(&item.title);
    if title.is_empty() {
        tracing::warn!("Skipping untitled item from {}", item.source_id);
        return None;
    }

    let extra = &item.extra;
    let time_display =
        extra.get("time_display").and_then(Value::as_str).unwrap_or_default().to_string();
    let occurrence_count = match extra.get("count") {
        None => 1,
        Some(value) => match value.as_u64() {
            Some(count) => count.min(u32::MAX as u64) as u32,
            None => {
                tracing::warn!("Non-numeric occurrence count for '{}', using 1", title);
                1
            }
        },
    };
    let ranks = match extra.get("all_ranks") {
        None => BTreeSet::from([item.rank]),
        Some(value) => {
            let parsed = parse_rank_list(value);
            if parsed.is_empty() {
                tracing::warn!("Unusable rank list for '{}', using observed rank", title);
                BTreeSet::from([item.rank])
            } else {
                parsed
            }
        }
    };
    let mobile_url = extra
        .get("mobileUrl")
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| item.mobile_url.clone())
        .unwrap_or_default();
    let is_new = extra.get("is_new").and_then(Value::as_bool).unwrap_or(false);

    Some(TitleRecord {
        title,
        platform_id: item.source_id.clone(),
        source_name: item.source_name.clone(),
        time_display,
        occurrence_count,
        ranks,
        url: item.url.clone(),
        mobile_url,
        is_new,
    })
}

fn parse_rank_list(value: &Value) -> BTreeSet<u32> {
    value
        .as_array()
        .map(|ranks| {
            ranks.iter().filter_map(Value::as_u64).map(|r| r.min(u32::MAX as u64) as u32).collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(title: &str, source_id: &str, source_name: &str, rank: u32) -> NewsItem {
        NewsItem {
            title: title.to_string(),
            url: format!("https://example.com/{}", rank),
            mobile_url: None,
            source_id: source_id.to_string(),
            source_name: source_name.to_string(),
            rank,
            extra: serde_json::Map::new(),
        }
    }

    fn stat(word: &str, items: Vec<NewsItem>) -> WordGroupStat {
        WordGroupStat {
            word: word.to_string(),
            count: items.len() as i64,
            percentage: 100.0,
            news_list: items,
        }
    }

    #[test]
    fn extras_populate_display_fields_with_defaults() {
        let mut loaded = item("GPT-5 即将发布", "zhihu", "知乎", 1);
        loaded.extra = json!({
            "time_display": "15时30分",
            "count": 3,
            "all_ranks": [1, 2, 4],
            "is_new": true,
            "mobileUrl": "https://m.example.com/1",
        })
        .as_object()
        .cloned()
        .unwrap();

        let model = build_model(
            &[stat("人工智能", vec![loaded, item("AI 技术突破", "weibo", "微博", 5)])],
            &[],
            &[],
            ReportMode::Daily,
        );

        let group = &model.groups[0];
        assert_eq!(group.count, 2);
        let loaded = &group.titles[0];
        assert_eq!(loaded.time_display, "15时30分");
        assert_eq!(loaded.occurrence_count, 3);
        assert_eq!(loaded.ranks, BTreeSet::from([1, 2, 4]));
        assert!(loaded.is_new);
        assert_eq!(loaded.mobile_url, "https://m.example.com/1");

        let defaulted = &group.titles[1];
        assert_eq!(defaulted.occurrence_count, 1);
        assert_eq!(defaulted.ranks, BTreeSet::from([5]));
        assert!(!defaulted.is_new);
        assert_eq!(defaulted.time_display, "");
    }

    #[test]
    fn malformed_extras_fall_back_per_item() {
        let mut broken = item("标题甲", "zhihu", "知乎", 2);
        broken.extra =
            json!({"count": "three", "all_ranks": ["not", "numbers"]}).as_object().cloned().unwrap();

        let model =
            build_model(&[stat("词组", vec![broken, item("标题乙", "weibo", "微博", 7)])], &[], &[], ReportMode::Daily);

        let group = &model.groups[0];
        assert_eq!(group.count, 2, "bad extras must not drop the batch");
        assert_eq!(group.titles[0].occurrence_count, 1);
        assert_eq!(group.titles[0].ranks, BTreeSet::from([2]));
    }

    #[test]
    fn empty_groups_are_dropped() {
        let empty = WordGroupStat {
            word: "空词组".to_string(),
            count: 0,
            percentage: 0.0,
            news_list: Vec::new(),
        };
        let model = build_model(&[empty], &[], &[], ReportMode::Daily);
        assert!(model.groups.is_empty());
    }

    #[test]
    fn new_items_bucket_by_source_name_in_first_seen_order() {
        let model = build_model(
            &[],
            &[
                item("甲", "zhihu", "知乎", 1),
                item("乙", "weibo", "微博", 2),
                item("丙", "zhihu", "知乎", 3),
            ],
            &[],
            ReportMode::Daily,
        );

        assert_eq!(model.total_new_count, 3);
        assert_eq!(model.new_titles.len(), 2);
        assert_eq!(model.new_titles[0].source_name, "知乎");
        assert_eq!(model.new_titles[0].titles.len(), 2);
        assert_eq!(model.new_titles[1].source_name, "微博");
        assert!(model.new_titles[0].titles.iter().all(|t| t.is_new));
    }

    #[test]
    fn incremental_mode_suppresses_new_section() {
        let model = build_model(
            &[],
            &[item("甲", "zhihu", "知乎", 1)],
            &[],
            ReportMode::Incremental,
        );
        assert!(model.new_titles.is_empty());
        assert_eq!(model.total_new_count, 0);
    }

    #[test]
    fn failed_ids_collect_into_set() {
        let model = build_model(
            &[],
            &[],
            &["douyin".to_string(), "".to_string(), "douyin".to_string(), "toutiao".to_string()],
            ReportMode::Daily,
        );
        assert_eq!(
            model.failed_ids,
            BTreeSet::from(["douyin".to_string(), "toutiao".to_string()])
        );
    }
}
