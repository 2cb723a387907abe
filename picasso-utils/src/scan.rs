//! Flat directory scans for photos and decoration masks.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use walkdir::WalkDir;

/// Which files a scan keeps: a case-insensitive extension list plus an optional
/// file-name prefix.
#[derive(Debug, Clone)]
pub struct FileFilter {
    pub prefix: Option<String>,
    pub extensions: Vec<String>,
}

impl FileFilter {
    pub fn with_extensions(extensions: &[&str]) -> Self {
        Self {
            prefix: None,
            extensions: extensions.iter().map(|e| e.to_ascii_lowercase()).collect(),
        }
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn matches(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        if let Some(prefix) = self.prefix.as_deref()
            && !name.starts_with(prefix)
        {
            return false;
        }
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions.contains(&ext.to_ascii_lowercase()))
            .unwrap_or(false)
    }
}

/// Collect the regular files directly inside `dir` that pass `filter`, sorted by path.
///
/// Sub-directories are not descended into.
pub fn collect_files(dir: &Path, filter: &FileFilter) -> Result<Vec<PathBuf>> {
    anyhow::ensure!(dir.is_dir(), "not a directory: {}", dir.display());

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry.with_context(|| format!("failed to scan {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if filter.matches(entry.path()) {
            files.push(entry.into_path());
        } else {
            debug!("Skipping {}", entry.path().display());
        }
    }
    files.sort();
    Ok(files)
}
