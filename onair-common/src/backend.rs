//! Backend read contract for program schedule rows
//!
//! The schedule lives in a remote structured data service exposing a
//! PostgREST-style HTTP API. The store only needs one query: every row of the
//! schedule table, which it groups by `day_of_week` itself.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use crate::config::BackendConfig;
use crate::{Error, Result};

const USER_AGENT: &str = concat!("onair/", env!("CARGO_PKG_VERSION"));

const SELECT_COLUMNS: &str =
    "day_of_week,start_time,end_time,program_name_sinhala,program_name_english,program_id";

/// One persisted schedule row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// 0 = Sunday
    pub day_of_week: i64,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub program_name_sinhala: Option<String>,
    #[serde(default)]
    pub program_name_english: Option<String>,
    #[serde(default)]
    pub program_id: Option<Uuid>,
}

/// Source of persisted schedule rows
#[async_trait]
pub trait ScheduleBackend: Send + Sync {
    /// All rows of the weekly schedule. Single attempt, no retry.
    async fn fetch_rows(&self) -> Result<Vec<ScheduleRow>>;
}

/// Rows held in memory
///
/// Used when no remote backend is configured (every day falls back to the
/// bundled defaults) and as a test double.
#[derive(Debug, Clone, Default)]
pub struct StaticBackend {
    rows: Vec<ScheduleRow>,
}

impl StaticBackend {
    pub fn new(rows: Vec<ScheduleRow>) -> Self {
        Self { rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScheduleBackend for StaticBackend {
    async fn fetch_rows(&self) -> Result<Vec<ScheduleRow>> {
        Ok(self.rows.clone())
    }
}

/// Remote data service client
pub struct RestScheduleBackend {
    http_client: reqwest::Client,
    base_url: String,
    table: String,
    api_key: Option<String>,
}

impl RestScheduleBackend {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let base_url = config
            .url
            .as_deref()
            .map(|u| u.trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .ok_or_else(|| Error::Config("backend url is not set".to_string()))?;

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            http_client,
            base_url,
            table: config.table.clone(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
        })
    }

    /// Query URL for the whole week, pre-sorted by day and start time
    pub fn rows_url(&self) -> String {
        format!(
            "{}/rest/v1/{}?select={}&order=day_of_week.asc,start_time.asc",
            self.base_url, self.table, SELECT_COLUMNS
        )
    }
}

#[async_trait]
impl ScheduleBackend for RestScheduleBackend {
    async fn fetch_rows(&self) -> Result<Vec<ScheduleRow>> {
        let url = self.rows_url();
        debug!(url = %url, "Fetching schedule rows");

        let mut request = self.http_client.get(&url);
        if let Some(key) = &self.api_key {
            request = request
                .header("apikey", key)
                .bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Backend(format!("{} {}", status.as_u16(), body)));
        }

        let body = response.text().await?;
        let rows = parse_rows(&body)?;
        debug!(rows = rows.len(), "Schedule rows received");
        Ok(rows)
    }
}

/// Decode a JSON array of schedule rows
pub fn parse_rows(body: &str) -> Result<Vec<ScheduleRow>> {
    serde_json::from_str(body).map_err(|e| Error::Parse(format!("schedule rows: {}", e)))
}
