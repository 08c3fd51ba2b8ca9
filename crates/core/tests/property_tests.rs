use std::path::PathBuf;

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use loadtrend_core::classify::{metric_kind, METRIC_PATTERNS};
use loadtrend_core::select::{select_reports, simulation_id};
use loadtrend_core::shift::shift_from;
use loadtrend_core::types::ReportDirectory;

const URL: &str = "http://graphs/render?target=a&from=00%3A00_20140101&title=t";

proptest! {
    #[test]
    fn earlier_metric_pattern_wins(
        i in 0..METRIC_PATTERNS.len(),
        j in 0..METRIC_PATTERNS.len(),
        prefix in "[0-9 ,;:]{0,8}",
        mid in "[ ,;:]{1,4}",
        suffix in "[0-9 ,;:]{0,8}",
    ) {
        let label = format!("{prefix}{}{mid}{}{suffix}", METRIC_PATTERNS[i].0, METRIC_PATTERNS[j].0);
        let expected = METRIC_PATTERNS[i.min(j)].1;
        prop_assert_eq!(metric_kind(&label).unwrap(), expected);
    }

    #[test]
    fn selection_keeps_strictly_newer_in_order(offsets in prop::collection::vec(-100i64..100, 0..32)) {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let candidates: Vec<ReportDirectory> = offsets
            .iter()
            .enumerate()
            .map(|(i, off)| ReportDirectory {
                path: PathBuf::from(format!("r/sim-{i}")),
                last_modified_at: start + Duration::seconds(*off),
                name: format!("sim-{i}"),
            })
            .collect();

        let expected: Vec<String> = candidates
            .iter()
            .filter(|c| c.last_modified_at > start)
            .map(|c| c.name.clone())
            .collect();
        let picked: Vec<String> = select_reports(candidates, start)
            .into_iter()
            .map(|c| c.name)
            .collect();
        prop_assert_eq!(picked, expected);
    }

    #[test]
    fn non_numeric_offset_is_noop(offset in "[a-zA-Z .]{1,12}") {
        prop_assert_eq!(shift_from(URL, &offset), URL);
    }

    #[test]
    fn shift_preserves_other_parameters(days in -3650i64..3650) {
        let shifted = shift_from(URL, &days.to_string());
        prop_assert!(shifted.starts_with("http://graphs/render?target=a&from="));
        prop_assert!(shifted.ends_with("&title=t"));
    }

    #[test]
    fn simulation_id_is_text_before_last_dash(sim in "[a-z0-9_-]{0,16}", run in "[a-z0-9_]{0,16}") {
        let name = format!("{sim}-{run}");
        prop_assert_eq!(simulation_id(&name).unwrap(), sim.as_str());
    }

    #[test]
    fn names_without_dash_are_malformed(name in "[a-z0-9_.]{0,24}") {
        prop_assert!(simulation_id(&name).is_err());
    }
}
