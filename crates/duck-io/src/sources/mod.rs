//! Where tables come from.
//!
//! A [`DataSource`] is either an `http(s)://` URL or a filesystem path.
//! Fetching returns the raw bytes; parsing lives in [`crate::importers`].

pub mod covid_emda;

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use duck_core::DuckError;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DataSource {
    Url(String),
    Path(PathBuf),
}

impl DataSource {
    pub fn is_remote(&self) -> bool {
        matches!(self, DataSource::Url(_))
    }

    /// Reads the whole source into memory. No retries.
    pub fn fetch(&self) -> Result<Vec<u8>> {
        let bytes = match self {
            DataSource::Url(url) => fetch_url(url)?,
            DataSource::Path(path) => {
                fs::read(path).with_context(|| format!("reading {}", path.display()))?
            }
        };
        debug!(source = %self, bytes = bytes.len(), "fetched source");
        Ok(bytes)
    }
}

#[cfg(feature = "native-io")]
fn fetch_url(url: &str) -> Result<Vec<u8>> {
    use std::io::Read;

    let response = ureq::get(url)
        .call()
        .map_err(|err| DuckError::Fetch(format!("requesting {url}: {err}")))?;
    let mut bytes = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut bytes)
        .with_context(|| format!("reading response body from {url}"))?;
    Ok(bytes)
}

#[cfg(not(feature = "native-io"))]
fn fetch_url(url: &str) -> Result<Vec<u8>> {
    Err(DuckError::Fetch(format!(
        "cannot fetch {url}: network access is disabled; rebuild with the 'native-io' feature"
    ))
    .into())
}

impl FromStr for DataSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            anyhow::bail!("data source cannot be empty");
        }
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(DataSource::Url(trimmed.to_string()))
        } else {
            Ok(DataSource::Path(PathBuf::from(trimmed)))
        }
    }
}

impl TryFrom<String> for DataSource {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<DataSource> for String {
    fn from(source: DataSource) -> Self {
        source.to_string()
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(url) => f.write_str(url),
            DataSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_urls_and_paths() {
        let url: DataSource = "https://example.org/load.csv".parse().unwrap();
        assert!(url.is_remote());
        let path: DataSource = "data/load.csv".parse().unwrap();
        assert_eq!(path, DataSource::Path(PathBuf::from("data/load.csv")));
        assert!("   ".parse::<DataSource>().is_err());
    }

    #[test]
    fn fetches_local_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "date,00:00\n2020-03-01,1\n").unwrap();
        let source = DataSource::Path(file.path().to_path_buf());
        let bytes = source.fetch().unwrap();
        assert!(bytes.starts_with(b"date,"));
    }

    #[test]
    fn missing_file_reports_path() {
        let source = DataSource::Path(PathBuf::from("/nonexistent/genmix.csv"));
        let err = source.fetch().unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/genmix.csv"));
    }

    #[test]
    fn unreachable_url_is_a_fetch_error() {
        // port 9 (discard) is closed on test hosts, so the connection is refused
        let source: DataSource = "http://127.0.0.1:9/load.csv".parse().unwrap();
        let err = source.fetch().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DuckError>(),
            Some(DuckError::Fetch(msg)) if msg.contains("127.0.0.1:9")
        ));
    }
}
