use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context as _;
use serde::Deserialize;

use loadtest_core::{Scenario, ScenarioSet};

/// One entry of the scenario file, a JSON array of these objects.
#[derive(Debug, Deserialize)]
struct ScenarioEntry {
    #[serde(default)]
    name: String,
    endpoint: String,
    #[serde(default)]
    method: String,
    #[serde(default)]
    headers: BTreeMap<String, String>,
    #[serde(default)]
    payload: String,
}

impl From<ScenarioEntry> for Scenario {
    fn from(e: ScenarioEntry) -> Self {
        Scenario {
            name: e.name,
            endpoint: e.endpoint,
            method: e.method,
            headers: e.headers,
            payload: e.payload,
        }
    }
}

pub(crate) async fn load(path: &Path) -> anyhow::Result<ScenarioSet> {
    let data = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read scenario file: {}", path.display()))?;
    parse(&data).with_context(|| format!("failed to parse scenario file: {}", path.display()))
}

fn parse(data: &str) -> anyhow::Result<ScenarioSet> {
    let entries: Vec<ScenarioEntry> = serde_json::from_str(data)?;
    Ok(ScenarioSet::new(
        entries.into_iter().map(Scenario::from).collect(),
    ))
}
