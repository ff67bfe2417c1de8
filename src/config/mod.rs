//! Engine configuration
//!
//! File values are overridden by CLI flags; everything has a default so the
//! engine runs without any config file at all.

pub mod loader;

pub use loader::load_config;

use serde::Deserialize;
use std::path::PathBuf;

/// Default highlight threshold: titles that reached the top 10 anywhere get
/// emphasized rank tokens.
pub const DEFAULT_RANK_THRESHOLD: u32 = 10;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Highlight ranks at or above this position.
    pub rank_threshold: u32,
    /// Root directory for report artifacts.
    pub output_dir: PathBuf,
    /// Email HTML template with `${slot}` substitution fields.
    pub template_path: PathBuf,
    /// Tagline under the email report title.
    pub hero_tagline: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            rank_threshold: DEFAULT_RANK_THRESHOLD,
            output_dir: PathBuf::from("output"),
            template_path: PathBuf::from("templates/email_report.html"),
            hero_tagline: crate::render::html::HERO_TAGLINE.to_string(),
        }
    }
}
