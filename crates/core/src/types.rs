use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One evaluated assertion from a load-test run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssertionRecord {
    pub project_name: String,
    pub simulation_name: String,
    pub scenario_name: String,
    pub request_name: String,
    pub message: String,
    pub assertion_type_label: String,
    pub actual_value: String,
    pub expected_value: String,
    pub status: bool,
}

/// A candidate result directory found in a build workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDirectory {
    pub path: PathBuf,
    pub last_modified_at: DateTime<Utc>,
    pub name: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    P50,
    P80,
    P95,
    P99,
    Mean,
    Min,
    Max,
    Stddev,
    Throughput,
    /// Percentage of failed requests. Never a performance metric.
    Ko,
}

impl MetricKind {
    /// Series name used by the metrics backend.
    pub fn series_name(self) -> &'static str {
        match self {
            MetricKind::P50 => "percentiles50",
            MetricKind::P80 => "percentiles80",
            MetricKind::P95 => "percentiles95",
            MetricKind::P99 => "percentiles99",
            MetricKind::Mean => "mean",
            MetricKind::Min => "min",
            MetricKind::Max => "max",
            MetricKind::Stddev => "stddev",
            MetricKind::Throughput => "throughput",
            MetricKind::Ko => "ko",
        }
    }

    /// Short label used in build descriptions.
    pub fn short_label(self) -> &'static str {
        match self {
            MetricKind::P50 => "50th",
            MetricKind::P80 => "80th",
            MetricKind::P95 => "95th",
            MetricKind::P99 => "99th",
            MetricKind::Mean => "mean",
            MetricKind::Min => "min",
            MetricKind::Max => "max",
            MetricKind::Stddev => "stddev",
            MetricKind::Throughput => "req/s",
            MetricKind::Ko => "KO%",
        }
    }

    pub fn is_performance(self) -> bool {
        self != MetricKind::Ko
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ComparisonOperator {
    GreaterThan,
    LessThan,
    Within,
    EqualTo,
    Unknown,
}

impl ComparisonOperator {
    /// `None` for [`ComparisonOperator::Unknown`].
    pub fn symbol(self) -> Option<&'static str> {
        match self {
            ComparisonOperator::GreaterThan => Some(">"),
            ComparisonOperator::LessThan => Some("<"),
            ComparisonOperator::Within => Some("in"),
            ComparisonOperator::EqualTo => Some("="),
            ComparisonOperator::Unknown => None,
        }
    }
}
