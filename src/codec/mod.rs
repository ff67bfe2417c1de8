//! Flat-text grammar for the running summary file.
//!
//! The persisted format is line-oriented UTF-8: group headers
//! (`<word> (共<N>条)`), title lines
//! (`[<source>] <title> [<rank>] - <time> (<N>次) [URL:<u>] [MOBILE:<m>]`),
//! a "newly added this batch" section, and a failed-source-ids section.
//! [`encode`] and [`decode`] must stay byte-compatible: a file written by
//! the encoder re-reads into the same group/title records (minus the
//! platform id, which the grammar does not carry).

pub mod decode;
pub mod encode;

pub use decode::{decode_summary, decode_summary_file};
pub use encode::encode_report;

/// Marker line opening the "newly added this batch" section. Content after
/// it is informational only and never merged back.
pub const NEW_SECTION_MARKER: &str = "==== 最新批次新增 ====";

/// Marker line opening the failed-source-ids section.
pub const FAILED_SECTION_MARKER: &str = "==== 以下ID请求失败 ====";

#[cfg(test)]
mod tests {
    use crate::domain::{GroupRecord, ReportModel, TitleRecord};
    use std::collections::BTreeSet;

    fn record(title: &str, source: &str, ranks: &[u32]) -> TitleRecord {
        TitleRecord {
            title: title.to_string(),
            platform_id: "zhihu".to_string(),
            source_name: source.to_string(),
            time_display: String::new(),
            occurrence_count: 1,
            ranks: ranks.iter().copied().collect(),
            url: format!("https://example.com/{}", ranks[0]),
            mobile_url: format!("https://m.example.com/{}", ranks[0]),
            is_new: false,
        }
    }

    // Encoding then decoding must reproduce every (group, title) ->
    // (ranks, occurrence_count, time_display, url, mobile_url) tuple.
    #[test]
    fn round_trip_preserves_title_tuples() {
        let mut model = ReportModel::default();
        let mut ranged = record("GPT-5 即将发布", "知乎", &[3, 4, 5, 6, 7]);
        ranged.occurrence_count = 2;
        ranged.time_display = "10:00".to_string();
        let mut plain = record("AI 技术突破", "微博", &[5]);
        plain.time_display = "15时30分".to_string();
        model.groups.push(GroupRecord {
            word: "人工智能".to_string(),
            count: 2,
            percentage: 100.0,
            titles: vec![ranged.clone(), plain.clone()],
        });
        model.failed_ids = BTreeSet::from(["douyin".to_string(), "toutiao".to_string()]);

        let text = super::encode_report(&model);
        let decoded = super::decode_summary(&text);

        assert_eq!(decoded.failed_ids, model.failed_ids);
        let group = decoded.group("人工智能").expect("group survives");
        assert_eq!(group.titles.len(), 2);

        let got = group.title("GPT-5 即将发布").expect("title survives");
        assert_eq!(got.ranks, ranged.ranks);
        assert_eq!(got.occurrence_count, 2);
        assert_eq!(got.time_display, "10:00");
        assert_eq!(got.url, ranged.url);
        assert_eq!(got.mobile_url, ranged.mobile_url);
        assert_eq!(got.source_name, "知乎");
        // The grammar does not persist the platform id.
        assert_eq!(got.platform_id, "");

        let got = group.title("AI 技术突破").expect("title survives");
        assert_eq!(got.ranks, plain.ranks);
        assert_eq!(got.occurrence_count, 1);
    }
}
