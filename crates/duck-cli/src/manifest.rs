use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub run_id: String,
    pub command: String,
    pub version: String,
    pub timestamp: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    pub outputs: Vec<String>,
    pub params: Vec<Param>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<Param>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub value: String,
}

impl Param {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Run outcome recorded alongside the parameters.
#[derive(Debug, Default)]
pub struct ManifestTelemetry {
    pub status: String,
    pub duration_ms: Option<u128>,
    pub env: Vec<Param>,
    pub correlation_id: Option<String>,
}

/// Writes `run-{uuid}.json` into `dir` and returns its path.
pub fn record_manifest(
    dir: &Path,
    command: &str,
    params: Vec<Param>,
    outputs: &[PathBuf],
    telemetry: ManifestTelemetry,
) -> Result<PathBuf> {
    let run_id = Uuid::new_v4().to_string();
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let manifest = ManifestEntry {
        run_id: run_id.clone(),
        command: command.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
        status: telemetry.status,
        duration_ms: telemetry.duration_ms,
        correlation_id: telemetry.correlation_id,
        outputs: outputs.iter().map(|p| p.display().to_string()).collect(),
        params,
        env: telemetry.env,
    };
    let json = serde_json::to_string_pretty(&manifest)?;
    let path = dir.join(format!("run-{}.json", run_id));
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

pub fn read_manifest(path: &Path) -> Result<ManifestEntry> {
    let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let manifest = serde_json::from_str(&json)?;
    Ok(manifest)
}
