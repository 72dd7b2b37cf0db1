//! On-disk size accounting for run directories

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Bytes measured under a directory, plus the entries that could not be read
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SizeReport {
    pub bytes: u64,
    pub skipped: Vec<(PathBuf, String)>,
}

impl SizeReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Sum the sizes of all regular files under `root`
///
/// Symlinks are neither followed nor counted. Unreadable entries are
/// recorded in [`SizeReport::skipped`] and the walk carries on.
pub fn measure_dir(root: &Path) -> SizeReport {
    let mut report = SizeReport::default();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                report.skipped.push((path, e.to_string()));
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        match entry.metadata() {
            Ok(metadata) => report.bytes += metadata.len(),
            Err(e) => report
                .skipped
                .push((entry.path().to_path_buf(), e.to_string())),
        }
    }

    report
}

/// Format bytes as a human-readable string with one decimal place
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    let mut size = bytes as f64;
    for unit in UNITS {
        if size < 1024.0 {
            return format!("{:.1} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.1} PB", size)
}
