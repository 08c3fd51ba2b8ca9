use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;
use serde_json::Value;
use walkdir::WalkDir;

use crate::types::AssertionRecord;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct AssertionsFile {
    simulation: String,
    assertions: Vec<RawAssertion>,
}

/// One entry of the assertions file. Field aliases accept the load tool's
/// native key names as well.
#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct RawAssertion {
    scenario_name: String,
    #[serde(alias = "path")]
    request_name: String,
    message: String,
    #[serde(alias = "target")]
    assertion_type: String,
    #[serde(alias = "result")]
    status: bool,
    #[serde(alias = "expectedValues")]
    condition_values: Vec<Value>,
    #[serde(alias = "actualValue")]
    values: Vec<Value>,
}

pub fn parse_assertions<R: Read>(
    reader: R,
    project_name: &str,
) -> anyhow::Result<Vec<AssertionRecord>> {
    let file: AssertionsFile = serde_json::from_reader(reader).context("parse assertions json")?;

    Ok(file
        .assertions
        .into_iter()
        .map(|a| AssertionRecord {
            project_name: project_name.to_string(),
            simulation_name: file.simulation.clone(),
            scenario_name: a.scenario_name,
            request_name: a.request_name,
            message: a.message,
            assertion_type_label: a.assertion_type,
            actual_value: join_values(&a.values),
            expected_value: join_values(&a.condition_values),
            status: a.status,
        })
        .collect())
}

/// Read every assertions file inside one report directory.
///
/// `Ok(None)` when the report has no assertions file at all.
pub fn load_report_assertions(
    report_dir: &Path,
    assertions_file: &str,
    project_name: &str,
) -> anyhow::Result<Option<Vec<AssertionRecord>>> {
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(report_dir).follow_links(false) {
        let entry = entry?;
        if entry.file_type().is_file() && entry.file_name().to_str() == Some(assertions_file) {
            files.push(entry.into_path());
        }
    }

    if files.is_empty() {
        return Ok(None);
    }
    files.sort();

    let mut records = Vec::new();
    for path in files {
        let f = File::open(&path).with_context(|| format!("open {}", path.display()))?;
        let parsed = parse_assertions(BufReader::new(f), project_name)
            .with_context(|| format!("read assertions {}", path.display()))?;
        records.extend(parsed);
    }
    Ok(Some(records))
}

fn join_values(values: &[Value]) -> String {
    values
        .iter()
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(",")
}
