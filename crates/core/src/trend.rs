use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::{
    brand,
    classify,
    config::Config,
    error::{Error, Result},
    types::{AssertionRecord, MetricKind},
};

pub const ROOT_URL: &str = "http://tre-stats.internal.shutterfly.com/render?";

pub const KO_TARGET: &str = "target=alias(color(secondYAxis(load.summary.${env}.${simName}.${reqName}.ko.percent)%2C%22red%22)%2C%22percent%20KOs%22)";

pub const PERFORMANCE_STAT_TARGET: &str =
    "target=alias(load.summary.${env}.${simName}.${reqName}.all.${assertName}%2C%22${assertDescr}%22)";

pub const PERFORMANCE_THRESHOLD_TARGET: &str = "target=alias(load.summary.${env}.${simName}.${reqName}.all.expected.${assertName}%2C%22performance+assert+threshold%22)";

pub const RELEASE_BRANCH_TARGET: &str = "target=alias(color(lineWidth(drawAsInfinite(integral(sfly.releng.branch.*))%2C1)%2C%22yellow%22)%2C%22Release%20Branch%20Created%22)";

pub const RENDER_OPTIONS: &str = "width=586&height=308&lineMode=connected&from=${fromDateTime}&title=${reqName}+-+${assertDescr}&vtitle=${performanceMetricLabel}&vtitleRight=Percentage_KOs&bgcolor=FFFFFF&fgcolor=000000&yMaxRight=100&yMinRight=0&hideLegend=false&uniqueLegend=true";

const SUMMARIZED_KO_TARGET: &str = "target=alias(color(secondYAxis(summarize(load.summary.${env}.${simName}.${reqName}.ko.percent,%22${summarizeWindow}%22,%22max%22))%2C%22red%22)%2C%22percent%20KOs%22)";

const SUMMARIZED_PERFORMANCE_STAT_TARGET: &str = "target=alias(summarize(load.summary.${env}.${simName}.${reqName}.all.${assertName},%22${summarizeWindow}%22,%22${performanceStatSummarizeMethod}%22)%2C%22${assertDescr}%22)";

const SUMMARIZED_PERFORMANCE_THRESHOLD_TARGET: &str = "target=alias(summarize(load.summary.${env}.${simName}.${reqName}.all.expected.${assertName},%22${summarizeWindow}%22,%22${performanceStatSummarizeMethod}%22)%2C%22performance+assert+threshold%22)";

pub const METRIC_LABEL_THROUGHPUT: &str = "Requests_per_second";
pub const METRIC_LABEL_RESPONSE_TIME: &str = "Response_Time_in_ms";

/// Relative range the backend understands, used when no start time is known.
pub const FROM_FALLBACK: &str = "-1months";

/// `HH:mm_yyyyMMdd`
pub const FROM_FORMAT: &str = "%H:%M_%Y%m%d";

static RE_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Za-z0-9_]+)\}").expect("valid regex"));

static RE_UNSAFE_PATH_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.\-]").expect("valid regex"));

/// Sub-templates that make up one trend graph URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendUrlTemplate {
    pub root_url: String,
    pub ko_target: String,
    pub performance_stat_target: String,
    pub threshold_target: String,
    pub release_marker_target: String,
    pub render_options: String,
}

impl Default for TrendUrlTemplate {
    fn default() -> Self {
        Self {
            root_url: ROOT_URL.to_string(),
            ko_target: KO_TARGET.to_string(),
            performance_stat_target: PERFORMANCE_STAT_TARGET.to_string(),
            threshold_target: PERFORMANCE_THRESHOLD_TARGET.to_string(),
            release_marker_target: RELEASE_BRANCH_TARGET.to_string(),
            render_options: RENDER_OPTIONS.to_string(),
        }
    }
}

impl TrendUrlTemplate {
    /// Targets wrapped in `summarize(series, "${summarizeWindow}", method)`.
    pub fn summarized() -> Self {
        Self {
            ko_target: SUMMARIZED_KO_TARGET.to_string(),
            performance_stat_target: SUMMARIZED_PERFORMANCE_STAT_TARGET.to_string(),
            threshold_target: SUMMARIZED_PERFORMANCE_THRESHOLD_TARGET.to_string(),
            ..Self::default()
        }
    }

    pub fn with_root_url(mut self, root_url: impl Into<String>) -> Self {
        self.root_url = root_url.into();
        self
    }

    pub fn combined(&self) -> String {
        let mut s = self.root_url.clone();
        s.push_str(
            &[
                self.ko_target.as_str(),
                self.performance_stat_target.as_str(),
                self.threshold_target.as_str(),
                self.release_marker_target.as_str(),
                self.render_options.as_str(),
            ]
            .join("&"),
        );
        s
    }
}

/// A graphable assertion's URL plus the label shown next to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrendGraph {
    pub url: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct TrendUrlBuilder {
    template: TrendUrlTemplate,
    summarize_window: Option<String>,
}

impl TrendUrlBuilder {
    pub fn new(template: TrendUrlTemplate) -> Self {
        Self {
            template,
            summarize_window: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let template = match &config.summarize_window {
            Some(_) => TrendUrlTemplate::summarized(),
            None => TrendUrlTemplate::default(),
        };
        let template = match &config.root_url {
            Some(root) => template.with_root_url(root),
            None => template,
        };
        Self {
            template,
            summarize_window: config.summarize_window.clone(),
        }
    }

    pub fn template(&self) -> &TrendUrlTemplate {
        &self.template
    }

    /// Build the trend graph URL for one assertion.
    ///
    /// `Ok(None)` means the assertion is not graphable: its project name does
    /// not resolve to a brand/environment, or it is a KO-percentage assertion.
    pub fn build(
        &self,
        from: Option<NaiveDateTime>,
        record: &AssertionRecord,
    ) -> Result<Option<String>> {
        Ok(self
            .template_values(from, record)?
            .map(|values| fill_template(&self.template.combined(), &values)))
    }

    /// Build URLs for a batch, in input order. Skipped and failing
    /// assertions are left out.
    pub fn build_all(
        &self,
        from: Option<NaiveDateTime>,
        records: &[AssertionRecord],
    ) -> Vec<TrendGraph> {
        records
            .iter()
            .filter_map(|record| match self.build(from, record) {
                Ok(Some(url)) => Some(TrendGraph {
                    url,
                    display_name: format!(
                        "{} - {}",
                        record.request_name, record.assertion_type_label
                    ),
                }),
                Ok(None) => None,
                Err(e) => {
                    log::warn!(
                        "Failed to generate url for assertion (project {}, simulation {}, request {}): {e}",
                        record.project_name,
                        record.simulation_name,
                        record.request_name
                    );
                    None
                }
            })
            .collect()
    }

    /// URL-encoded placeholder values for one assertion.
    pub fn template_values(
        &self,
        from: Option<NaiveDateTime>,
        record: &AssertionRecord,
    ) -> Result<Option<BTreeMap<&'static str, String>>> {
        let env = match environment_key(&record.project_name) {
            Ok(env) => env,
            Err(e) => {
                log::debug!("Not graphing assertion '{}': {e}", record.message);
                return Ok(None);
            }
        };

        let kind = classify::metric_kind(&record.assertion_type_label)?;
        if !kind.is_performance() {
            log::debug!("Not graphing KO assertion '{}'", record.message);
            return Ok(None);
        }

        let (metric_label, summarize_method) = match kind {
            MetricKind::Throughput => (METRIC_LABEL_THROUGHPUT, "min"),
            _ => (METRIC_LABEL_RESPONSE_TIME, "max"),
        };

        let mut values = BTreeMap::new();
        values.insert("env", encode(&env));
        values.insert("simName", encode(&simulation_token(&record.simulation_name)));
        values.insert("reqName", encode(&request_path_segment(&record.request_name)));
        values.insert("assertName", encode(kind.series_name()));
        values.insert("assertDescr", encode(&record.assertion_type_label));
        values.insert("projName", encode(&record.project_name));
        values.insert("performanceMetricLabel", encode(metric_label));
        values.insert("fromDateTime", encode(&format_from_time(from)));
        values.insert("performanceStatSummarizeMethod", encode(summarize_method));
        if let Some(window) = &self.summarize_window {
            values.insert("summarizeWindow", encode(window));
        }
        Ok(Some(values))
    }
}

fn environment_key(project_name: &str) -> Result<String> {
    brand::resolve(project_name)
        .effective_environment()
        .ok_or_else(|| Error::UnrecognizedBrandOrEnvironment {
            project: project_name.to_string(),
        })
}

/// Replace each `${name}` with its value. Unknown placeholders are left as is.
pub fn fill_template(template: &str, values: &BTreeMap<&str, String>) -> String {
    RE_PLACEHOLDER
        .replace_all(template, |cap: &Captures<'_>| match values.get(&cap[1]) {
            Some(v) => v.clone(),
            None => cap[0].to_string(),
        })
        .into_owned()
}

pub fn format_from_time(from: Option<NaiveDateTime>) -> String {
    match from {
        Some(t) => t.format(FROM_FORMAT).to_string(),
        None => {
            log::warn!("No start time for trend graph range, defaulting to {FROM_FALLBACK}");
            FROM_FALLBACK.to_string()
        }
    }
}

/// Form-encode a single query value.
pub fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Replace anything that is not a word character, `.` or `-` with `_`.
pub fn sanitize(value: &str) -> String {
    RE_UNSAFE_PATH_CHARS.replace_all(value, "_").into_owned()
}

/// Last `.`-separated segment of a simulation class name, lower-cased and
/// sanitized.
pub fn simulation_token(simulation_name: &str) -> String {
    let last = simulation_name.rsplit('.').next().unwrap_or(simulation_name);
    sanitize(&last.to_lowercase())
}

pub fn request_path_segment(request_name: &str) -> String {
    if request_name == "Global" {
        return "Global_Information".to_string();
    }
    sanitize(request_name)
}
