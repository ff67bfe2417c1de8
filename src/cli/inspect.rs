//! `inspect` subcommand: decode a running summary file and show what the
//! merge path would start from.

use crate::codec::decode_summary_file;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct InspectArgs {
    /// Running summary file in the persisted text grammar
    file: PathBuf,
}

pub fn run(args: InspectArgs) -> Result<()> {
    let summary = decode_summary_file(&args.file);

    println!("Groups: {}", summary.groups.len());
    for group in &summary.groups {
        println!("  {} ({} titles)", group.word, group.titles.len());
        for title in &group.titles {
            let ranks: Vec<String> = title.ranks.iter().map(|r| r.to_string()).collect();
            println!(
                "    {} [ranks: {}] (seen {} runs)",
                title.title,
                ranks.join(", "),
                title.occurrence_count
            );
        }
    }

    let failed: Vec<&str> = summary.failed_ids.iter().map(String::as_str).collect();
    println!("Failed ids: {}", if failed.is_empty() { "-".to_string() } else { failed.join(", ") });

    Ok(())
}
