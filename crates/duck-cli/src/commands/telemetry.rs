use std::{
    env,
    path::{Path, PathBuf},
    time::Instant,
};

use tracing::{info, warn};

use crate::manifest::{record_manifest, ManifestTelemetry, Param};

const TELEMETRY_ENV_KEYS: &[&str] = &[
    "DUCK_ENV",
    "GITHUB_RUN_ID",
    "GITHUB_WORKFLOW",
    "GITHUB_REF",
    "GITHUB_SHA",
];

fn collect_telemetry_env() -> Vec<Param> {
    TELEMETRY_ENV_KEYS
        .iter()
        .filter_map(|key| env::var(key).ok().map(|value| Param::new(*key, value)))
        .collect()
}

fn correlation_id() -> Option<String> {
    env::var("DUCK_CORRELATION_ID")
        .or_else(|_| env::var("GITHUB_RUN_ID"))
        .ok()
}

/// Records a manifest for a finished run. Failing to write it is logged,
/// never fatal.
pub fn record_run_timed<T>(
    dir: &Path,
    command: &str,
    params: Vec<Param>,
    outputs: &[PathBuf],
    start: Instant,
    result: &anyhow::Result<T>,
) {
    let telemetry = ManifestTelemetry {
        status: if result.is_ok() { "success" } else { "failure" }.to_string(),
        duration_ms: Some(start.elapsed().as_millis()),
        env: collect_telemetry_env(),
        correlation_id: correlation_id(),
    };
    match record_manifest(dir, command, params, outputs, telemetry) {
        Ok(path) => info!("recorded run manifest {}", path.display()),
        Err(err) => warn!("failed to record run manifest: {err:#}"),
    }
}
