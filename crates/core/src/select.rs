use chrono::{DateTime, Utc};

use crate::{
    error::{Error, Result},
    types::ReportDirectory,
};

/// Keep the reports produced during the current build.
///
/// A report counts as new only when it was modified strictly after the build
/// started. Input order is preserved. An empty result means there is nothing
/// to archive for this build.
pub fn select_reports(
    candidates: Vec<ReportDirectory>,
    build_start: DateTime<Utc>,
) -> Vec<ReportDirectory> {
    candidates
        .into_iter()
        .filter(|report| {
            let fresh = report.last_modified_at > build_start;
            if fresh {
                log::info!("Adding report '{}'", report.name);
            } else {
                log::debug!(
                    "Skipping report '{}' last modified at {} (build started {})",
                    report.name,
                    report.last_modified_at,
                    build_start
                );
            }
            fresh
        })
        .collect()
}

/// Split a report directory name on its last `-` and return the simulation id.
pub fn simulation_id(name: &str) -> Result<&str> {
    name.rsplit_once('-')
        .map(|(simulation, _run)| simulation)
        .ok_or_else(|| Error::MalformedReportDirectoryName {
            name: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::path::PathBuf;

    fn report(name: &str, modified: DateTime<Utc>) -> ReportDirectory {
        ReportDirectory {
            path: PathBuf::from("results").join(name),
            last_modified_at: modified,
            name: name.to_string(),
        }
    }

    #[test]
    fn excludes_reports_modified_at_or_before_build_start() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let picked = select_reports(
            vec![
                report("old-1", start - Duration::seconds(1)),
                report("same-2", start),
                report("new-3", start + Duration::seconds(1)),
                report("newer-4", start + Duration::hours(1)),
            ],
            start,
        );
        let names: Vec<_> = picked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["new-3", "newer-4"]);
    }

    #[test]
    fn empty_selection_is_valid() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        assert!(select_reports(vec![report("a-1", start)], start).is_empty());
        assert!(select_reports(vec![], start).is_empty());
    }

    #[test]
    fn simulation_id_splits_on_last_dash() {
        assert_eq!(simulation_id("checkout-20240101120000").unwrap(), "checkout");
        assert_eq!(
            simulation_id("checkout-flow-20240101120000").unwrap(),
            "checkout-flow"
        );
        assert_eq!(simulation_id("-1").unwrap(), "");
    }

    #[test]
    fn simulation_id_without_dash_is_malformed() {
        assert_eq!(
            simulation_id("checkout").unwrap_err(),
            Error::MalformedReportDirectoryName {
                name: "checkout".to_string()
            }
        );
    }
}
