//! Sheet loading
//!
//! A `DataSource` hands the classification core a fresh `Table` for a stage.
//! Retry and caching policy belong to whoever drives the sources.

use crate::models::{Config, Table};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no data source configured for stage '{0}'")]
    UnknownStage(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {origin}: {source}")]
    Csv { origin: String, source: csv::Error },

    #[error("failed to fetch {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP request to {url} failed with status: {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

#[allow(async_fn_in_trait)]
pub trait DataSource {
    async fn fetch(&self, stage_id: &str) -> Result<Table, SourceError>;
}

/// Parse a CSV export. Rows may be ragged; the first non-empty row is the header.
pub fn parse_csv(content: &str, origin: &str) -> Result<Table, SourceError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|source| SourceError::Csv {
            origin: origin.to_string(),
            source,
        })?;

        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let cells: Vec<String> = record.iter().map(|cell| cell.to_string()).collect();
        if headers.is_none() {
            headers = Some(cells);
        } else {
            rows.push(cells);
        }
    }

    Ok(Table {
        headers: headers.unwrap_or_default(),
        rows,
    })
}

/// Reads stage sheets from CSV files on disk.
pub struct LocalCsvSource {
    paths: HashMap<String, PathBuf>,
}

impl LocalCsvSource {
    pub fn new(paths: HashMap<String, PathBuf>) -> Self {
        Self { paths }
    }

    pub fn from_config(config: &Config) -> Self {
        let paths = config
            .stages
            .iter()
            .filter_map(|stage| Some((stage.id.clone(), PathBuf::from(stage.csv_path.as_ref()?))))
            .collect();
        Self::new(paths)
    }
}

impl DataSource for LocalCsvSource {
    async fn fetch(&self, stage_id: &str) -> Result<Table, SourceError> {
        let path = self
            .paths
            .get(stage_id)
            .ok_or_else(|| SourceError::UnknownStage(stage_id.to_string()))?;
        let display = path.display().to_string();

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| SourceError::Io {
                path: display.clone(),
                source,
            })?;

        parse_csv(&content, &display)
    }
}

/// Fetches published-sheet CSV exports over HTTP.
pub struct HttpCsvSource {
    client: reqwest::Client,
    urls: HashMap<String, String>,
}

impl HttpCsvSource {
    pub fn new(urls: HashMap<String, String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            urls,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let urls = config
            .stages
            .iter()
            .filter_map(|stage| Some((stage.id.clone(), stage.url.clone()?)))
            .collect();
        Self::new(urls)
    }
}

impl DataSource for HttpCsvSource {
    async fn fetch(&self, stage_id: &str) -> Result<Table, SourceError> {
        let url = self
            .urls
            .get(stage_id)
            .ok_or_else(|| SourceError::UnknownStage(stage_id.to_string()))?;
        log::info!("Fetching {} from {}", stage_id, url);

        let http_error = |source| SourceError::Http {
            url: url.clone(),
            source,
        };

        let response = self
            .client
            .get(url)
            .timeout(FETCH_TIMEOUT)
            .send()
            .await
            .map_err(http_error)?;

        if !response.status().is_success() {
            return Err(SourceError::Status {
                url: url.clone(),
                status: response.status(),
            });
        }

        let content = response.text().await.map_err(http_error)?;
        parse_csv(&content, url)
    }
}

/// Tries `primary` first and falls back to `secondary` on any error.
pub struct FallbackSource<P, S> {
    pub primary: P,
    pub secondary: S,
}

impl<P: DataSource, S: DataSource> DataSource for FallbackSource<P, S> {
    async fn fetch(&self, stage_id: &str) -> Result<Table, SourceError> {
        match self.primary.fetch(stage_id).await {
            Ok(table) => Ok(table),
            Err(e) => {
                log::warn!("{}: primary source failed ({}), trying secondary", stage_id, e);
                self.secondary.fetch(stage_id).await
            }
        }
    }
}
