//! Config file loading

use crate::config::ReportConfig;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Load the engine config from an explicit path or by discovery in the
/// working directory.
///
/// A parse failure in an explicitly provided file is a hard error; a
/// failure in an auto-discovered file is logged and falls back to the
/// defaults, so a broken optional config never blocks a collection run.
pub fn load_config(work_dir: &Path, config_path: Option<&Path>) -> Result<ReportConfig> {
    let config_path_provided = config_path.is_some();

    let discovered = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(work_dir),
    };

    let Some(config_file) = discovered else {
        return Ok(ReportConfig::default());
    };

    let content = fs::read_to_string(&config_file)
        .with_context(|| format!("Failed reading config file: {}", config_file.display()))?;

    let ext = config_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "toml" => parse_toml_config(&content, &config_file),
        "yaml" | "yml" => parse_yaml_config(&content, &config_file),
        other => Err(anyhow::anyhow!(
            "Unsupported config extension '.{}' for file {}",
            other,
            config_file.display()
        )),
    };

    match parsed {
        Ok(config) => Ok(config),
        Err(err) => {
            if config_path_provided {
                return Err(err);
            }
            // Auto-discovered: warn and fall back to defaults.
            tracing::warn!(
                "Ignoring unusable auto-discovered config {}: {}",
                config_file.display(),
                err
            );
            Ok(ReportConfig::default())
        }
    }
}

/// Parse a TOML config, supporting a nested `[trend-report]` section so the
/// file can live inside a larger project config.
fn parse_toml_config(content: &str, config_file: &Path) -> Result<ReportConfig> {
    let raw: toml::Value = toml::from_str(content)
        .with_context(|| format!("Invalid TOML syntax: {}", config_file.display()))?;

    let config_val = match raw.get("trend-report") {
        Some(nested) => nested.clone(),
        None => raw,
    };

    config_val
        .try_into()
        .with_context(|| format!("Invalid TOML config: {}", config_file.display()))
}

/// Parse a YAML config, supporting a nested `trend-report` section.
fn parse_yaml_config(content: &str, config_file: &Path) -> Result<ReportConfig> {
    let raw: serde_yaml::Value = serde_yaml::from_str(content)
        .with_context(|| format!("Invalid YAML syntax: {}", config_file.display()))?;

    let config_val = match raw.get("trend-report") {
        Some(nested) => nested.clone(),
        None => raw,
    };

    serde_yaml::from_value(config_val)
        .with_context(|| format!("Invalid YAML config: {}", config_file.display()))
}

fn discover_config(work_dir: &Path) -> Option<std::path::PathBuf> {
    let candidates = [
        "trend-report.toml",
        ".trend-report.toml",
        "trend-report.yml",
        ".trend-report.yml",
        "trend-report.yaml",
        ".trend-report.yaml",
    ];

    for candidate in candidates {
        let path = work_dir.join(candidate);
        if path.exists() {
            return Some(path);
        }
    }

    None
}
