//! Output directory layout for report artifacts.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Resolve `<base>/<date folder>/<kind>/<filename>`, creating the directory
/// chain as needed. `kind` is one of `txt`, `html`, `json`.
pub fn output_path(base: &Path, date_folder: &str, kind: &str, filename: &str) -> Result<PathBuf> {
    let dir = base.join(date_folder).join(kind);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed creating output directory: {}", dir.display()))?;
    Ok(dir.join(filename))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_nested_layout() {
        let tmp = TempDir::new().expect("tmp");
        let path = output_path(tmp.path(), "2026年08月06日", "txt", "当日汇总.txt").expect("path");
        assert!(path.parent().unwrap().is_dir());
        assert!(path.ends_with("2026年08月06日/txt/当日汇总.txt"));
    }
}
