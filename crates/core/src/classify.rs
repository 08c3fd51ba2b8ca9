use crate::{
    error::{Error, Result},
    types::{ComparisonOperator, MetricKind},
};

/// Substring patterns for metric kinds, checked top to bottom.
///
/// Labels come from the load-testing tool as free text and may contain more
/// than one pattern ("99th percentile of mean ..."), so the first row that
/// matches wins.
pub const METRIC_PATTERNS: &[(&str, MetricKind)] = &[
    ("50th", MetricKind::P50),
    ("80th", MetricKind::P80),
    ("95th", MetricKind::P95),
    ("99th", MetricKind::P99),
    ("requests per second", MetricKind::Throughput),
    ("mean", MetricKind::Mean),
    ("percentage of failed requests", MetricKind::Ko),
    ("min", MetricKind::Min),
    ("max", MetricKind::Max),
    ("standard deviation", MetricKind::Stddev),
];

pub const OPERATOR_PATTERNS: &[(&str, ComparisonOperator)] = &[
    ("is greater than", ComparisonOperator::GreaterThan),
    ("is less than", ComparisonOperator::LessThan),
    ("is in", ComparisonOperator::Within),
    ("is equal to", ComparisonOperator::EqualTo),
];

pub fn metric_kind(assertion_type_label: &str) -> Result<MetricKind> {
    METRIC_PATTERNS
        .iter()
        .find(|(pattern, _)| assertion_type_label.contains(pattern))
        .map(|(_, kind)| *kind)
        .ok_or_else(|| Error::UnrecognizedMetricKind {
            label: assertion_type_label.to_string(),
        })
}

pub fn comparison_operator(message: &str) -> ComparisonOperator {
    OPERATOR_PATTERNS
        .iter()
        .find(|(pattern, _)| message.contains(pattern))
        .map(|(_, op)| *op)
        .unwrap_or(ComparisonOperator::Unknown)
}

/// Classify an assertion by its type label and message.
///
/// The operator is derived from the message independently, so an unknown
/// operator never fails classification; only the metric kind can.
pub fn classify(
    assertion_type_label: &str,
    message: &str,
) -> Result<(MetricKind, ComparisonOperator)> {
    Ok((
        metric_kind(assertion_type_label)?,
        comparison_operator(message),
    ))
}
