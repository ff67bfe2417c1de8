//! Email-safe HTML report: server-side rendered, script-free, inline
//! styles only, built from a `${slot}` template.

use crate::domain::{GroupRecord, NewSourceGroup, ReportMode, ReportModel, TitleRecord};
use crate::rank::format_ranks;
use crate::utils::text::html_escape;
use crate::utils::time::time_filename;
use chrono::{DateTime, FixedOffset};
use once_cell::sync::OnceCell;
use std::path::PathBuf;
use thiserror::Error;

/// Default hero tagline shown under the report title.
pub const HERO_TAGLINE: &str = "汇集 11+ 平台热点，实时洞察关键词组合与新增动向。";

/// No safe default document exists without the template, so a missing or
/// unreadable template fails the render call instead of degrading.
#[derive(Debug, Error)]
pub enum HtmlRenderError {
    #[error("email template not found: {0}")]
    TemplateMissing(PathBuf),
    #[error("failed reading email template {path}: {source}")]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn mode_metadata(mode: ReportMode) -> (&'static str, &'static str) {
    match mode {
        ReportMode::Daily => ("当日汇总", "聚焦当日跨平台关键词热度与走势"),
        ReportMode::Current => ("当前榜单", "高频监控当前榜单并及时预警波动"),
        ReportMode::Incremental => ("增量监控", "仅推送新增热点，辅助实时决策"),
    }
}

/// Fixed file name for a mode's daily summary, timestamped otherwise.
pub fn email_filename(mode: ReportMode, is_daily_summary: bool, now: &DateTime<FixedOffset>) -> String {
    if is_daily_summary {
        match mode {
            ReportMode::Daily => "email_report_daily.html".to_string(),
            ReportMode::Current => "email_report_current.html".to_string(),
            ReportMode::Incremental => "email_report_incremental.html".to_string(),
        }
    } else {
        format!("email_{}.html", time_filename(now))
    }
}

/// Renders the canonical model into a self-contained email document.
/// The template is read once per renderer and cached.
pub struct EmailRenderer {
    template_path: PathBuf,
    rank_threshold: u32,
    hero_tagline: String,
    template_cache: OnceCell<String>,
}

impl EmailRenderer {
    pub fn new(
        template_path: impl Into<PathBuf>,
        rank_threshold: u32,
        hero_tagline: impl Into<String>,
    ) -> Self {
        EmailRenderer {
            template_path: template_path.into(),
            rank_threshold,
            hero_tagline: hero_tagline.into(),
            template_cache: OnceCell::new(),
        }
    }

    pub fn render(
        &self,
        model: &ReportModel,
        total_titles: usize,
        mode: ReportMode,
        now: &DateTime<FixedOffset>,
    ) -> Result<String, HtmlRenderError> {
        let template = self.template()?;
        let (mode_label, mode_description) = mode_metadata(mode);

        let substitutions = [
            ("page_title", format!("TrendReport - {} 报告", mode_label)),
            ("mode_label", mode_label.to_string()),
            ("hero_tagline", html_escape(&self.hero_tagline)),
            ("meta_date", now.format("%Y-%m-%d").to_string()),
            ("meta_keywords", model.groups.len().to_string()),
            ("meta_news", total_titles.to_string()),
            ("meta_updated", now.format("%Y-%m-%d %H:%M:%S").to_string()),
            ("mode_description", mode_description.to_string()),
            ("news_sections", self.render_word_groups(&model.groups)),
            ("new_section", self.render_new_section(&model.new_titles, model.total_new_count)),
            ("failed_section", render_failed_section(model)),
        ];

        Ok(substitute(template, &substitutions))
    }

    fn template(&self) -> Result<&str, HtmlRenderError> {
        self.template_cache
            .get_or_try_init(|| {
                if !self.template_path.exists() {
                    return Err(HtmlRenderError::TemplateMissing(self.template_path.clone()));
                }
                std::fs::read_to_string(&self.template_path).map_err(|source| {
                    HtmlRenderError::TemplateRead { path: self.template_path.clone(), source }
                })
            })
            .map(String::as_str)
    }

    fn render_word_groups(&self, groups: &[GroupRecord]) -> String {
        if groups.is_empty() {
            return wrap_card(
                "暂无数据",
                &html_escape("等待新的抓取批次"),
                &render_placeholder_item("当前没有可展示的热点词组，请稍后再试。"),
            );
        }

        let mut sections = String::new();
        for group in groups {
            let mut body_rows = String::new();
            for (index, title) in group.titles.iter().enumerate() {
                body_rows.push_str(&self.render_news_item(title, index == 0));
            }
            if body_rows.is_empty() {
                body_rows = render_placeholder_item("该词组暂无可展示的新闻。");
            }

            let meta_text = format!("共 {} 条 · {:.1}% 覆盖", group.count, group.percentage);
            sections.push_str(&wrap_card(&html_escape(&group.word), &html_escape(&meta_text), &body_rows));
        }
        sections
    }

    fn render_news_item(&self, title: &TitleRecord, is_first: bool) -> String {
        let link_url = title.link_url();
        let title_text = html_escape(&title.title);

        let link_html = if link_url.is_empty() {
            format!("<span style=\"color:#111111;\">{}</span>", title_text)
        } else {
            format!(
                "<a href=\"{}\" style=\"color:#0f6bff; text-decoration:none;\">{}</a>",
                html_escape(link_url),
                title_text
            )
        };

        let new_badge = if title.is_new {
            "<span style=\"display:inline-block; padding:2px 8px; border-radius:999px; \
             background-color:#e7f7ec; color:#0a8f08; font-size:11px; \
             font-weight:600; margin-right:6px;\">NEW</span>"
        } else {
            ""
        };

        let mut meta_parts: Vec<String> = Vec::new();
        if !title.source_name.is_empty() {
            meta_parts.push(format!("<span>[{}]</span>", html_escape(&title.source_name)));
        }

        let rank = format_ranks(title.ranks.iter().copied(), self.rank_threshold);
        if !rank.token.is_empty() {
            let (color, background) =
                if rank.highlight { ("#c62828", "#fdecef") } else { ("#0f6bff", "#e6efff") };
            meta_parts.push(format!(
                "<span style=\"display:inline-block; padding:2px 10px; border-radius:999px; \
                 background-color:{}; color:{}; font-size:12px; \
                 font-weight:600;\">{}</span>",
                background,
                color,
                html_escape(&rank.token)
            ));
        }

        if !title.time_display.is_empty() {
            meta_parts.push(format!("<span>{}</span>", html_escape(&title.time_display)));
        }
        if title.occurrence_count > 1 {
            meta_parts.push(format!("<span>{} 次出现</span>", title.occurrence_count));
        }

        let meta_block = if meta_parts.is_empty() {
            String::new()
        } else {
            format!(
                "<div style=\"font-size:13px; color:#6e6e73; margin-top:6px;\">{}</div>",
                meta_parts.join(" &middot; ")
            )
        };

        let border_style =
            if is_first { "border-top:none;" } else { "border-top:1px solid #f1f2f6;" };

        format!(
            "\n<tr>\n    <td style=\"padding:12px 24px; {}\">\n        \
             <div style=\"font-size:15px; color:#111111; line-height:1.5;\">\n            \
             {}{}\n        </div>\n        {}\n    </td>\n</tr>\n",
            border_style, new_badge, link_html, meta_block
        )
    }

    fn render_new_section(&self, new_titles: &[NewSourceGroup], total_new_count: usize) -> String {
        if new_titles.is_empty() {
            return String::new();
        }

        let mut blocks = String::new();
        for source in new_titles {
            if source.titles.is_empty() {
                continue;
            }
            let mut body_rows = String::new();
            for (index, title) in source.titles.iter().enumerate() {
                body_rows.push_str(&self.render_news_item(title, index == 0));
            }
            blocks.push_str(&wrap_card(
                &html_escape(&source.source_name),
                &html_escape(&format!("新增 {} 条", source.titles.len())),
                &body_rows,
            ));
        }
        if blocks.is_empty() {
            return String::new();
        }

        let mut section = String::from(
            "\n<tr>\n    <td style=\"padding:28px 36px 8px 36px; font-size:18px; \
             font-weight:600; color:#111111;\">\n        📢 最新批次新增\n    </td>\n</tr>\n",
        );
        if total_new_count > 0 {
            section.push_str(&format!(
                "\n<tr>\n    <td style=\"padding:0 36px 12px 36px; font-size:13px; \
                 color:#6e6e73;\">\n        共 {} 条新增\n    </td>\n</tr>\n",
                total_new_count
            ));
        }
        section.push_str(&blocks);
        section
    }
}

fn render_failed_section(model: &ReportModel) -> String {
    let failed: Vec<&str> =
        model.failed_ids.iter().map(String::as_str).filter(|id| !id.is_empty()).collect();
    if failed.is_empty() {
        return String::new();
    }

    format!(
        "\n<tr>\n    <td style=\"padding:24px 36px 0 36px;\">\n        \
         <table role=\"presentation\" width=\"100%\" cellpadding=\"0\" cellspacing=\"0\" \
         style=\"border-radius:20px; background-color:#fff4f0; border:1px solid #ffd6cc;\">\n            \
         <tr>\n                <td style=\"padding:18px 20px; font-size:14px; color:#b3261e;\">\n                    \
         <strong style=\"display:block; margin-bottom:6px;\">⚠️ 以下平台请求失败</strong>\n                    \
         <span style=\"color:#7a2e23;\">{}</span>\n                </td>\n            </tr>\n        \
         </table>\n    </td>\n</tr>\n",
        html_escape(&failed.join(", "))
    )
}

fn wrap_card(title: &str, meta_text: &str, body_rows: &str) -> String {
    format!(
        "\n<tr>\n    <td style=\"padding:0 36px 16px 36px;\">\n        \
         <table role=\"presentation\" width=\"100%\" cellpadding=\"0\" cellspacing=\"0\" \
         style=\"border-collapse:separate; border-spacing:0; border:1px solid #e3e7ee; \
         border-radius:28px; background-color:#ffffff;\">\n            <tr>\n                \
         <td style=\"padding:20px 24px 10px 24px;\">\n                    \
         <table role=\"presentation\" width=\"100%\" cellpadding=\"0\" cellspacing=\"0\">\n                        \
         <tr>\n                            \
         <td style=\"font-size:18px; font-weight:600; color:#111111;\">{}</td>\n                            \
         <td style=\"font-size:13px; color:#6e6e73; text-align:right;\">{}</td>\n                        \
         </tr>\n                    </table>\n                </td>\n            </tr>\n            \
         {}\n        </table>\n    </td>\n</tr>\n",
        title, meta_text, body_rows
    )
}

fn render_placeholder_item(message: &str) -> String {
    format!(
        "\n<tr>\n    <td style=\"padding:18px 24px;\">\n        \
         <div style=\"font-size:14px; color:#6e6e73;\">{}</div>\n    </td>\n</tr>\n",
        html_escape(message)
    )
}

fn substitute(template: &str, values: &[(&str, String)]) -> String {
    let mut document = template.to_string();
    for (name, value) in values {
        document = document.replace(&format!("${{{}}}", name), value);
    }
    document
}
