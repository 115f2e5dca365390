use crate::utils::error::Result;
use chrono::{Datelike, NaiveDate};
use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Month and year following `today`; December rolls over to January.
pub fn next_month(today: NaiveDate) -> (u32, i32) {
    if today.month() == 12 {
        (1, today.year() + 1)
    } else {
        (today.month() + 1, today.year())
    }
}

/// File name pattern of exports whose drive expires next month,
/// e.g. `*.11.2025_*.txt` for any day of October 2025.
pub fn pattern_for(today: NaiveDate) -> String {
    let (month, year) = next_month(today);
    format!("*.{:02}.{}_*.txt", month, year)
}

/// Recursively lists regular files under `root` whose name matches `pattern`.
///
/// A missing root yields an empty list. Symlinks to files are followed.
/// Results are sorted by file name across all directories, full path breaking ties.
pub fn find_files(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let matcher = Pattern::new(pattern)?;

    if !root.exists() {
        tracing::warn!("Root directory {} does not exist", root.display());
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable directory entry: {}", e);
                continue;
            }
        };

        if !entry.path().is_file() {
            continue;
        }

        let matched = matcher.matches(&entry.file_name().to_string_lossy());
        if matched {
            files.push(entry.into_path());
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()).then_with(|| a.cmp(b)));

    tracing::debug!(
        "Found {} files matching {} under {}",
        files.len(),
        pattern,
        root.display()
    );
    Ok(files)
}
