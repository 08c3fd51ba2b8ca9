use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{trend::TrendGraph, verdict::Verdict};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildOutcome {
    Archived(BuildReport),
    /// No reports were found, none were newer than the build start, or every
    /// selected report had a malformed name.
    NothingArchived { reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildReport {
    pub report_version: String,
    pub inputs: Inputs,
    pub reports: Vec<ArchivedReport>,
    pub assertion_count: usize,
    pub failed_count: usize,
    pub verdict: Verdict,
    pub trend_graphs: Vec<TrendGraph>,
    pub description: String,
    pub simulation_source: Option<String>,
    pub diagnostics: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Inputs {
    pub workspace: String,
    pub project_name: String,
    pub build_start: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArchivedReport {
    pub name: String,
    pub simulation: String,
    pub path: String,
}

impl BuildReport {
    pub fn new(workspace: &Path, project_name: &str, build_start: DateTime<Utc>) -> Self {
        Self {
            report_version: "0.1.0".to_string(),
            inputs: Inputs {
                workspace: workspace.display().to_string(),
                project_name: project_name.to_string(),
                build_start,
            },
            reports: vec![],
            assertion_count: 0,
            failed_count: 0,
            verdict: Verdict::Clean,
            trend_graphs: vec![],
            description: String::new(),
            simulation_source: None,
            diagnostics: vec![],
        }
    }

    pub fn to_markdown(&self) -> String {
        let mut s = String::new();
        s.push_str("# loadtrend report\n\n");
        s.push_str(&format!("- report_version: `{}`\n", self.report_version));
        s.push_str(&format!("- workspace: `{}`\n", self.inputs.workspace));
        s.push_str(&format!("- project: `{}`\n", self.inputs.project_name));
        s.push_str(&format!("- build_start: `{}`\n", self.inputs.build_start));
        if let Some(src) = &self.simulation_source {
            s.push_str(&format!("- simulation_source: `{}`\n", src));
        }
        s.push('\n');

        s.push_str("## Reports\n\n");
        for r in &self.reports {
            s.push_str(&format!("- `{}` ({}) at `{}`\n", r.name, r.simulation, r.path));
        }
        s.push('\n');

        s.push_str("## Verdict\n\n");
        s.push_str(&format!("- verdict: `{}`\n", self.verdict.label()));
        s.push_str(&format!("- assertions: `{}`\n", self.assertion_count));
        s.push_str(&format!("- failed: `{}`\n", self.failed_count));
        s.push('\n');

        s.push_str("## Trend graphs\n\n");
        if self.trend_graphs.is_empty() {
            s.push_str("- (none)\n");
        } else {
            for g in &self.trend_graphs {
                s.push_str(&format!("- [{}]({})\n", g.display_name, g.url));
            }
        }
        s.push('\n');

        if !self.diagnostics.is_empty() {
            s.push_str("## Diagnostics\n\n");
            for d in &self.diagnostics {
                s.push_str(&format!("- {}\n", d));
            }
            s.push('\n');
        }

        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn markdown_includes_sections() {
        let mut report = BuildReport::new(
            Path::new("ws"),
            "Perf-kappa-checkout",
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        );
        report.reports.push(ArchivedReport {
            name: "checkout-1".to_string(),
            simulation: "checkout".to_string(),
            path: "ws/checkout-1".to_string(),
        });
        report.verdict = Verdict::Performance;
        report.diagnostics.push("bad-name".to_string());

        let md = report.to_markdown();
        assert!(md.contains("## Reports"));
        assert!(md.contains("`checkout-1` (checkout)"));
        assert!(md.contains("- verdict: `PERFORMANCE`"));
        assert!(md.contains("- (none)"));
        assert!(md.contains("## Diagnostics"));
    }

    #[test]
    fn nothing_archived_serializes_with_tag() {
        let outcome = BuildOutcome::NothingArchived {
            reason: "no reports".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "NOTHING_ARCHIVED");
        assert_eq!(json["reason"], "no reports");
    }
}
