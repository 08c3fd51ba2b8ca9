use serde::{Deserialize, Serialize};

use crate::{
    classify,
    types::{AssertionRecord, MetricKind},
};

const NBSP: &str = "&nbsp;";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Clean,
    Ko,
    Performance,
    KoAndPerformance,
}

impl Verdict {
    pub fn label(self) -> &'static str {
        match self {
            Verdict::Clean => "CLEAN",
            Verdict::Ko => "KO",
            Verdict::Performance => "PERFORMANCE",
            Verdict::KoAndPerformance => "KO AND PERFORMANCE",
        }
    }
}

/// Result of folding a build's assertions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    pub lines: Vec<String>,
    pub failed_count: usize,
    pub hard_failure_count: usize,
}

impl Tally {
    pub fn verdict(&self) -> Verdict {
        match (self.failed_count, self.hard_failure_count) {
            (0, _) => Verdict::Clean,
            (failed, hard) if failed == hard => Verdict::Ko,
            (_, 0) => Verdict::Performance,
            _ => Verdict::KoAndPerformance,
        }
    }

    pub fn to_html(&self) -> String {
        let verdict = self.verdict();
        if verdict == Verdict::Clean {
            return String::new();
        }
        let mut s = format!("<b>{}</b><br>", verdict.label());
        for line in &self.lines {
            s.push_str(line);
        }
        s
    }
}

pub fn tally(records: &[AssertionRecord]) -> Tally {
    records
        .iter()
        .filter(|r| !r.status)
        .fold(Tally::default(), |mut acc, record| {
            acc.failed_count += 1;
            if is_hard_failure(record) {
                acc.hard_failure_count += 1;
            }
            acc.lines.push(describe_failure(record));
            acc
        })
}

/// HTML build description for a build's assertions. Empty when nothing failed.
pub fn aggregate(records: &[AssertionRecord]) -> String {
    tally(records).to_html()
}

fn is_hard_failure(record: &AssertionRecord) -> bool {
    matches!(
        classify::metric_kind(&record.assertion_type_label),
        Ok(MetricKind::Ko)
    )
}

/// One `<br>`-terminated line describing a failed assertion.
pub fn describe_failure(record: &AssertionRecord) -> String {
    let kind = classify::metric_kind(&record.assertion_type_label).ok();
    let symbol = classify::comparison_operator(&record.message).symbol();

    match (kind, symbol) {
        (Some(kind), Some(symbol)) => format!(
            "{}{NBSP}{}={},{NBSP}expect{}{};<br>",
            record.request_name.replace(' ', NBSP),
            kind.short_label(),
            record.actual_value,
            symbol,
            record.expected_value
        ),
        _ => format!(
            "{}:{}-Actual{NBSP}Value:{};<br>",
            record.message.replace(' ', NBSP),
            record.status,
            record.actual_value
        ),
    }
}
