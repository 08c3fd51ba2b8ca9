pub mod brand;
pub mod classify;
pub mod config;
pub mod error;
pub mod parser;
pub mod report;
pub mod select;
pub mod shift;
pub mod trend;
pub mod types;
pub mod verdict;

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, NaiveDateTime, Utc};

pub use crate::error::{Error, Result};

use crate::{
    config::Config,
    report::{ArchivedReport, BuildOutcome, BuildReport},
    trend::TrendUrlBuilder,
};

#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub build_start: DateTime<Utc>,
    pub project_name: String,
    /// Start of the trend graph range. `None` uses a relative one-month range.
    pub trend_from: Option<NaiveDateTime>,
    pub config: Config,
    pub build_config_path: Option<PathBuf>,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            build_start: DateTime::<Utc>::UNIX_EPOCH,
            project_name: String::new(),
            trend_from: None,
            config: Config::default(),
            build_config_path: None,
        }
    }
}

/// Process the load-test reports a build left in `workspace`.
pub fn analyze_workspace(workspace: &Path, opts: AnalyzeOptions) -> anyhow::Result<BuildOutcome> {
    let candidates = parser::discover_reports(workspace, opts.config.marker_file())
        .with_context(|| format!("failed to scan workspace {}", workspace.display()))?;
    if candidates.is_empty() {
        return Ok(BuildOutcome::NothingArchived {
            reason: format!("no {} found in workspace", opts.config.marker_file()),
        });
    }

    let selected = select::select_reports(candidates, opts.build_start);
    if selected.is_empty() {
        return Ok(BuildOutcome::NothingArchived {
            reason: "no reports newer than the build start".to_string(),
        });
    }

    let mut report = BuildReport::new(workspace, &opts.project_name, opts.build_start);
    let mut records = Vec::new();

    for dir in &selected {
        let simulation = match select::simulation_id(&dir.name) {
            Ok(sim) => sim.to_string(),
            Err(e) => {
                log::error!("{e}");
                report.diagnostics.push(e.to_string());
                continue;
            }
        };

        match parser::load_report_assertions(
            &dir.path,
            opts.config.assertions_file(),
            &opts.project_name,
        ) {
            Ok(Some(parsed)) => records.extend(parsed),
            Ok(None) => report.diagnostics.push(format!(
                "no results found in report '{}': missing {}",
                dir.name,
                opts.config.assertions_file()
            )),
            Err(e) => {
                log::error!("failed to read assertions of report '{}': {e:#}", dir.name);
                report
                    .diagnostics
                    .push(format!("report '{}': {e:#}", dir.name));
            }
        }

        report.reports.push(ArchivedReport {
            name: dir.name.clone(),
            simulation,
            path: dir.path.display().to_string(),
        });
    }

    if report.reports.is_empty() {
        return Ok(BuildOutcome::NothingArchived {
            reason: format!("no valid reports: {}", report.diagnostics.join("; ")),
        });
    }

    if let Some(path) = &opts.build_config_path {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                report.simulation_source = parser::simulation_class_from_build_config(&text)
                    .map(|class| parser::simulation_source_path(&class));
            }
            Err(e) => {
                log::error!("failed to read build config {}: {e}", path.display());
                report.diagnostics.push(format!(
                    "simulation source lookup failed: read build config {}: {e}",
                    path.display()
                ));
            }
        }
    }

    let builder = TrendUrlBuilder::from_config(&opts.config);
    report.trend_graphs = builder.build_all(opts.trend_from, &records);

    let tally = verdict::tally(&records);
    report.assertion_count = records.len();
    report.failed_count = tally.failed_count;
    report.verdict = tally.verdict();
    report.description = tally.to_html();

    Ok(BuildOutcome::Archived(report))
}
