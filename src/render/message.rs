//! Per-destination title formatting for the notification dispatcher.
//!
//! Every chat destination writes the same fields in the same order —
//! optional source prefix, "new" prefix, linked title, rank token, time
//! suffix, occurrence-count suffix — and differs only in markup. One
//! formatter over a style descriptor keeps each destination's exact output
//! stable without duplicating the field logic.

use crate::domain::TitleRecord;
use crate::rank::format_ranks;
use crate::utils::text::{clean_title, html_escape};

/// How a destination writes links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSyntax {
    /// `[title](url)`
    Markdown,
    /// `<a href="url">escaped title</a>`
    HtmlAnchor,
}

/// Markup descriptor for one chat destination. The pair fields are the
/// open/close wrap tokens around the respective fragment.
pub struct MessageStyle {
    pub name: &'static str,
    pub link: LinkSyntax,
    /// Around a highlighted rank token; plain tokens pass through bare.
    pub highlight: (&'static str, &'static str),
    /// Around the `[source]` prefix.
    pub source: (&'static str, &'static str),
    /// Around the `- <time>` suffix.
    pub time: (&'static str, &'static str),
    /// Around the `(<N>次)` suffix.
    pub count: (&'static str, &'static str),
}

pub const FEISHU: MessageStyle = MessageStyle {
    name: "feishu",
    link: LinkSyntax::Markdown,
    highlight: ("<font color='red'>**", "**</font>"),
    source: ("<font color='grey'>", "</font>"),
    time: ("<font color='grey'>", "</font>"),
    count: ("<font color='green'>", "</font>"),
};

pub const DINGTALK: MessageStyle = MessageStyle {
    name: "dingtalk",
    link: LinkSyntax::Markdown,
    highlight: ("**", "**"),
    source: ("", ""),
    time: ("", ""),
    count: ("", ""),
};

pub const WEWORK: MessageStyle = MessageStyle {
    name: "wework",
    link: LinkSyntax::Markdown,
    highlight: ("**", "**"),
    source: ("", ""),
    time: ("", ""),
    count: ("", ""),
};

pub const TELEGRAM: MessageStyle = MessageStyle {
    name: "telegram",
    link: LinkSyntax::HtmlAnchor,
    highlight: ("<b>", "</b>"),
    source: ("", ""),
    time: ("<code>", "</code>"),
    count: ("<code>", "</code>"),
};

pub const NTFY: MessageStyle = MessageStyle {
    name: "ntfy",
    link: LinkSyntax::Markdown,
    highlight: ("**", "**"),
    source: ("", ""),
    time: ("`", "`"),
    count: ("`", "`"),
};

pub const ALL_STYLES: [&MessageStyle; 5] = [&FEISHU, &DINGTALK, &WEWORK, &TELEGRAM, &NTFY];

pub fn style_for(name: &str) -> Option<&'static MessageStyle> {
    ALL_STYLES.iter().copied().find(|style| style.name.eq_ignore_ascii_case(name))
}

/// Format one title record for a destination.
pub fn format_title(
    style: &MessageStyle,
    title: &TitleRecord,
    rank_threshold: u32,
    show_source: bool,
) -> String {
    let rank = format_ranks(title.ranks.iter().copied(), rank_threshold);
    let rank_text = if rank.token.is_empty() {
        String::new()
    } else if rank.highlight {
        format!("{}{}{}", style.highlight.0, rank.token, style.highlight.1)
    } else {
        rank.token
    };

    let cleaned = clean_title(&title.title);
    let link_url = title.link_url();
    let linked = if link_url.is_empty() {
        cleaned
    } else {
        match style.link {
            LinkSyntax::Markdown => format!("[{}]({})", cleaned, link_url),
            LinkSyntax::HtmlAnchor => {
                format!("<a href=\"{}\">{}</a>", link_url, html_escape(&cleaned))
            }
        }
    };
    let new_prefix = if title.is_new { "🆕 " } else { "" };

    let mut formatted = if show_source {
        format!(
            "{}[{}]{} {}{}",
            style.source.0, title.source_name, style.source.1, new_prefix, linked
        )
    } else {
        format!("{}{}", new_prefix, linked)
    };

    if !rank_text.is_empty() {
        formatted.push_str(&format!(" {}", rank_text));
    }
    if !title.time_display.is_empty() {
        formatted.push_str(&format!(" {}- {}{}", style.time.0, title.time_display, style.time.1));
    }
    if title.occurrence_count > 1 {
        formatted
            .push_str(&format!(" {}({}次){}", style.count.0, title.occurrence_count, style.count.1));
    }

    formatted
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn title() -> TitleRecord {
        TitleRecord {
            title: "GPT-5 即将发布".to_string(),
            platform_id: "zhihu".to_string(),
            source_name: "知乎".to_string(),
            time_display: "10:00".to_string(),
            occurrence_count: 2,
            ranks: BTreeSet::from([1]),
            url: "https://example.com/1".to_string(),
            mobile_url: "https://m.example.com/1".to_string(),
            is_new: true,
        }
    }

    #[test]
    fn feishu_markup() {
        assert_eq!(
            format_title(&FEISHU, &title(), 10, true),
            "<font color='grey'>[知乎]</font> 🆕 [GPT-5 即将发布](https://m.example.com/1) \
             <font color='red'>**[1]**</font> <font color='grey'>- 10:00</font> \
             <font color='green'>(2次)</font>"
        );
    }

    #[test]
    fn dingtalk_markup() {
        assert_eq!(
            format_title(&DINGTALK, &title(), 10, true),
            "[知乎] 🆕 [GPT-5 即将发布](https://m.example.com/1) **[1]** - 10:00 (2次)"
        );
    }

    #[test]
    fn wework_matches_dingtalk_markup() {
        let record = title();
        let dingtalk = format_title(&DINGTALK, &record, 10, true);
        assert_eq!(format_title(&WEWORK, &record, 10, true), dingtalk);
    }

    #[test]
    fn telegram_escapes_linked_titles() {
        let mut record = title();
        record.title = "A <b> & B".to_string();
        assert_eq!(
            format_title(&TELEGRAM, &record, 10, true),
            "[知乎] 🆕 <a href=\"https://m.example.com/1\">A &lt;b&gt; &amp; B</a> \
             <b>[1]</b> <code>- 10:00</code> <code>(2次)</code>"
        );
    }

    #[test]
    fn ntfy_uses_code_spans() {
        assert_eq!(
            format_title(&NTFY, &title(), 10, true),
            "[知乎] 🆕 [GPT-5 即将发布](https://m.example.com/1) **[1]** `- 10:00` `(2次)`",
        );
    }

    #[test]
    fn plain_rank_and_no_optional_fields() {
        let mut record = title();
        record.ranks = BTreeSet::from([30]);
        record.time_display.clear();
        record.occurrence_count = 1;
        record.is_new = false;
        record.mobile_url.clear();
        assert_eq!(
            format_title(&DINGTALK, &record, 10, true),
            "[知乎] [GPT-5 即将发布](https://example.com/1) [30]"
        );
    }

    #[test]
    fn unlinked_title_falls_back_to_plain_text() {
        let mut record = title();
        record.url.clear();
        record.mobile_url.clear();
        assert_eq!(
            format_title(&NTFY, &record, 10, false),
            "🆕 GPT-5 即将发布 **[1]** `- 10:00` `(2次)`"
        );
    }

    #[test]
    fn style_lookup_by_name() {
        assert_eq!(style_for("Feishu").map(|s| s.name), Some("feishu"));
        assert!(style_for("unknown").is_none());
    }
}
