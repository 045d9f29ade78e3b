//! The single read-only fetch of the observation array.

use crate::data_types::Observation;
use eyre::{Result, WrapErr};
use std::path::Path;
use tracing::info;

/// Reads the observation array from an http(s) URL or a local file. Runs
/// synchronously; callers on a UI thread should move it to a background task.
pub fn load_observations(source: &str) -> Result<Vec<Observation>> {
    let body = if is_remote(source) {
        fetch_remote(source)?
    } else {
        std::fs::read_to_string(Path::new(source))
            .wrap_err_with(|| format!("failed to read observations from {}", source))?
    };
    let data = parse_observations(&body).wrap_err_with(|| format!("in {}", source))?;
    info!(source, observations = data.len(), "observations loaded");
    Ok(data)
}

pub fn parse_observations(body: &str) -> Result<Vec<Observation>> {
    serde_json::from_str(body).wrap_err("malformed observation array")
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn fetch_remote(url: &str) -> Result<String> {
    let response = reqwest::blocking::get(url)
        .wrap_err_with(|| format!("failed to fetch {}", url))?
        .error_for_status()
        .wrap_err_with(|| format!("bad response from {}", url))?;
    response
        .text()
        .wrap_err_with(|| format!("failed to read body from {}", url))
}
