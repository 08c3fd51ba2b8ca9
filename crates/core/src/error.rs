use thiserror::Error;

/// Failures scoped to a single assertion, report or URL.
///
/// None of these abort a batch; callers log them and carry on with the
/// remaining items.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unrecognized metric kind in assertion type: {label:?}")]
    UnrecognizedMetricKind { label: String },

    #[error("report directory name has no '-' separator: {name:?}")]
    MalformedReportDirectoryName { name: String },

    #[error("cannot resolve brand/environment from project name: {project:?}")]
    UnrecognizedBrandOrEnvironment { project: String },

    #[error("cannot shift graph url: {reason}")]
    MalformedShiftTarget { reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
