//! `preview` subcommand: the notification dispatcher's view of a batch.

use crate::builder::build_model;
use crate::config::load_config;
use crate::domain::ReportMode;
use crate::render::message::{format_title, style_for};
use anyhow::{anyhow, Context, Result};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct PreviewArgs {
    /// Collector batch JSON: {"stats": [...], "new_news": [...], "failed_ids": [...]}
    #[arg(short, long)]
    input: PathBuf,

    /// Destination whose markup to use: feishu, dingtalk, wework, telegram, ntfy
    #[arg(short, long)]
    destination: String,

    /// Report mode
    #[arg(short, long, value_enum, default_value_t = ReportMode::Daily)]
    mode: ReportMode,

    /// Omit the [source] prefix in front of each title
    #[arg(long)]
    hide_source: bool,

    /// Highlight threshold for ranks (overrides config)
    #[arg(long)]
    rank_threshold: Option<u32>,

    /// Config file path (otherwise discovered in the working directory)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

pub fn run(args: PreviewArgs) -> Result<()> {
    let style = style_for(&args.destination).ok_or_else(|| {
        anyhow!(
            "Unknown destination '{}' (expected feishu, dingtalk, wework, telegram, or ntfy)",
            args.destination
        )
    })?;

    let work_dir = std::env::current_dir().context("Failed resolving working directory")?;
    let mut config = load_config(&work_dir, args.config.as_deref())?;
    if let Some(threshold) = args.rank_threshold {
        config.rank_threshold = threshold;
    }

    let batch = super::read_batch(&args.input)?;
    let model = build_model(&batch.stats, &batch.new_news, &batch.failed_ids, args.mode);

    for group in &model.groups {
        println!("{} (共{}条)", group.word, group.count);
        for title in &group.titles {
            println!("{}", format_title(style, title, config.rank_threshold, !args.hide_source));
        }
        println!();
    }

    if !model.failed_ids.is_empty() {
        let failed: Vec<&str> = model.failed_ids.iter().map(String::as_str).collect();
        println!("⚠️ 请求失败: {}", failed.join(", "));
    }

    Ok(())
}
