//! Search requests and the handlers that receive them

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::form::TravelMode;

/// What the form hands over on a successful submit
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchRequest {
    /// "City, Region"
    pub origin: String,
    /// "City, Region"
    pub destination: String,
    pub travel_mode: TravelMode,
    pub journey_date: Option<NaiveDate>,
}

impl SearchRequest {
    pub fn summary(&self) -> String {
        let date = self
            .journey_date
            .map(|d| d.format("%d %b %Y").to_string())
            .unwrap_or_else(|| "any date".to_string());
        format!(
            "{} -> {} ({}, {})",
            self.origin, self.destination, self.travel_mode, date
        )
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    #[error("failed to write search request: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize search request: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Receives submitted searches. What happens next is up to the
/// implementation; the form only learns whether it succeeded.
#[async_trait]
pub trait SearchHandler: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<(), SearchError>;
}

/// Appends each request as a JSON line to a file.
#[derive(Clone, Debug)]
pub struct JsonLinesSink {
    path: PathBuf,
}

impl JsonLinesSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SearchHandler for JsonLinesSink {
    async fn search(&self, request: &SearchRequest) -> Result<(), SearchError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let mut line = serde_json::to_string(request)?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        tracing::debug!(path = %self.path.display(), "appended search request");
        Ok(())
    }
}

/// Keeps requests in memory until someone takes them.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    requests: Arc<Mutex<Vec<SearchRequest>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn take(&self) -> Vec<SearchRequest> {
        std::mem::take(&mut *self.requests.lock().await)
    }
}

#[async_trait]
impl SearchHandler for MemorySink {
    async fn search(&self, request: &SearchRequest) -> Result<(), SearchError> {
        self.requests.lock().await.push(request.clone());
        Ok(())
    }
}

/// Write requests as JSON lines, one per request.
pub fn write_json_lines(
    requests: &[SearchRequest],
    out: &mut impl Write,
) -> Result<(), SearchError> {
    for request in requests {
        serde_json::to_writer(&mut *out, request)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
