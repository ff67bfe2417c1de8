//! `generate` subcommand: collector batch in, report artifacts out.

use crate::builder::build_model;
use crate::config::load_config;
use crate::domain::ReportMode;
use crate::render::html::{email_filename, EmailRenderer};
use crate::render::json::SNAPSHOT_FILENAME;
use crate::render::{json, text};
use crate::utils::{paths, time};
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::path::PathBuf;

#[derive(Args)]
pub struct GenerateArgs {
    /// Collector batch JSON: {"stats": [...], "new_news": [...], "failed_ids": [...]}
    #[arg(short, long)]
    input: PathBuf,

    /// Report mode
    #[arg(short, long, value_enum, default_value_t = ReportMode::Daily)]
    mode: ReportMode,

    /// Write the fixed-name daily summary artifacts (the shared daily text
    /// file then accumulates across runs) instead of timestamped ones
    #[arg(long)]
    daily_summary: bool,

    /// Artifacts to write (defaults to all three)
    #[arg(short, long, value_enum, value_delimiter = ',')]
    formats: Vec<Format>,

    /// Root directory for artifacts (overrides config)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Highlight threshold for ranks (overrides config)
    #[arg(long)]
    rank_threshold: Option<u32>,

    /// Config file path (otherwise discovered in the working directory)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
    Html,
}

pub fn run(args: GenerateArgs) -> Result<()> {
    let work_dir = std::env::current_dir().context("Failed resolving working directory")?;
    let mut config = load_config(&work_dir, args.config.as_deref())?;
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    if let Some(threshold) = args.rank_threshold {
        config.rank_threshold = threshold;
    }

    let batch = super::read_batch(&args.input)?;
    let model = build_model(&batch.stats, &batch.new_news, &batch.failed_ids, args.mode);

    let now = time::report_now();
    let date_folder = time::date_folder(&now);
    let total_titles = model.total_title_count();

    let formats = if args.formats.is_empty() {
        vec![Format::Text, Format::Json, Format::Html]
    } else {
        args.formats.clone()
    };

    for format in formats {
        match format {
            Format::Text => {
                let filename = text::text_filename(args.mode, args.daily_summary, &now);
                let path =
                    paths::output_path(&config.output_dir, &date_folder, "txt", &filename)?;
                let accumulate = args.daily_summary && args.mode == ReportMode::Daily;
                text::write_text_report(&model, &path, accumulate)?;
                println!("{}", path.display());
            }
            Format::Json => {
                let path = paths::output_path(
                    &config.output_dir,
                    &date_folder,
                    "json",
                    SNAPSHOT_FILENAME,
                )?;
                json::write_snapshot(&model, args.mode, &now, &path)?;
                println!("{}", path.display());
            }
            Format::Html => {
                let filename = email_filename(args.mode, args.daily_summary, &now);
                let path =
                    paths::output_path(&config.output_dir, &date_folder, "html", &filename)?;
                let renderer = EmailRenderer::new(
                    &config.template_path,
                    config.rank_threshold,
                    config.hero_tagline.clone(),
                );
                let document = renderer.render(&model, total_titles, args.mode, &now)?;
                std::fs::write(&path, document)
                    .with_context(|| format!("Failed writing HTML report: {}", path.display()))?;
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}
