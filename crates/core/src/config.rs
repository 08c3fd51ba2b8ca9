use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_MARKER_FILE: &str = "global_stats.json";
pub const DEFAULT_ASSERTIONS_FILE: &str = "assertions.json";

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Base URL of the graph renderer, ending in `?`.
    pub root_url: Option<String>,
    /// Backend summarize window such as `1day`. Unset means raw series.
    pub summarize_window: Option<String>,
    pub marker_file: Option<String>,
    pub assertions_file: Option<String>,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents =
            std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let config: Config =
            toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
        Ok(config)
    }

    pub fn discover() -> Option<Self> {
        let path = Path::new("loadtrend.toml");
        if path.exists() {
            Config::load(path).ok()
        } else {
            None
        }
    }

    pub fn marker_file(&self) -> &str {
        self.marker_file.as_deref().unwrap_or(DEFAULT_MARKER_FILE)
    }

    pub fn assertions_file(&self) -> &str {
        self.assertions_file
            .as_deref()
            .unwrap_or(DEFAULT_ASSERTIONS_FILE)
    }
}
