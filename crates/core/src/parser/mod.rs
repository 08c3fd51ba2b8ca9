mod assertions;
mod source;

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use anyhow::Context;
use chrono::{DateTime, Utc};
use walkdir::WalkDir;

use crate::types::ReportDirectory;

pub use assertions::{load_report_assertions, parse_assertions};
pub use source::{simulation_class_from_build_config, simulation_source_path};

/// Find report directories under `workspace`.
///
/// A report is the grandparent of each `marker_file`
/// (`<report>/js/global_stats.json`) that lies strictly inside `workspace`.
/// Results are sorted by path.
pub fn discover_reports(
    workspace: &Path,
    marker_file: &str,
) -> anyhow::Result<Vec<ReportDirectory>> {
    let mut dirs: BTreeSet<PathBuf> = BTreeSet::new();

    for entry in WalkDir::new(workspace).follow_links(false) {
        let entry = entry?;
        if !entry.file_type().is_file() || entry.file_name().to_str() != Some(marker_file) {
            continue;
        }
        match entry.path().parent().and_then(Path::parent) {
            Some(report_dir)
                if report_dir != workspace && report_dir.starts_with(workspace) =>
            {
                dirs.insert(report_dir.to_path_buf());
            }
            _ => log::debug!(
                "Ignoring {} outside a report directory",
                entry.path().display()
            ),
        }
    }

    if dirs.is_empty() {
        log::info!(
            "Could not find a {} report under {}",
            marker_file,
            workspace.display()
        );
    }

    dirs.into_iter()
        .map(|path| -> anyhow::Result<ReportDirectory> {
            let modified = std::fs::metadata(&path)
                .and_then(|m| m.modified())
                .with_context(|| format!("read modification time of {}", path.display()))?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok(ReportDirectory {
                last_modified_at: DateTime::<Utc>::from(modified),
                name,
                path,
            })
        })
        .collect()
}
