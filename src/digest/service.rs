//! Remote digest store client.
//!
//! Reads the `daily_digests` and `weekly_digests` tables through the
//! store's REST interface (PostgREST query syntax). Reads only; there is
//! no retry or backoff. When the daily archive cannot be fetched the
//! caller falls back to the bundled sample issues.

use super::adapter::{DailyRow, WeeklyRow};
use super::model::{DailyDigest, Digest, MockIssue, WeeklyDigest};
use super::search::merge_archives;
use crate::config::RemoteConfig;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

const DAILY_TABLE: &str = "daily_digests";
const WEEKLY_TABLE: &str = "weekly_digests";

const DAILY_ARCHIVE_COLUMNS: &str = "id,publish_date,title,video_count,keywords,content_json";
const WEEKLY_ARCHIVE_COLUMNS: &str = "id,week_start_date,week_end_date,title,description,keywords,total_videos,days_with_content,channels_included,content_json";

/// Errors from the digest store.
#[derive(Debug, Error)]
pub enum DigestError {
    #[error("digest store not configured (set remote.supabase_url and remote.supabase_key)")]
    NotConfigured,

    #[error("request to digest store failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("digest store returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("no digest found for {0}")]
    NotFound(String),

    #[error("unexpected digest payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result of loading the combined archive.
#[derive(Debug, Clone)]
pub struct ArchiveLoad {
    /// Daily (or sample) and weekly digests, newest first.
    pub digests: Vec<Digest>,
    /// True when the sample issues replaced the daily archive.
    pub using_fallback: bool,
    /// Why the weekly archive is missing, if it is.
    pub weekly_error: Option<String>,
}

/// Client for the remote digest tables.
pub struct DigestService {
    base_url: Option<String>,
    api_key: Option<String>,
    daily_limit: usize,
    weekly_limit: usize,
    http_client: reqwest::Client,
}

impl DigestService {
    /// Creates a client. An incomplete config yields an unconfigured
    /// client whose calls fail with [`DigestError::NotConfigured`].
    pub fn new(config: &RemoteConfig) -> Result<Self, DigestError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: config
                .supabase_url
                .as_deref()
                .filter(|u| !u.is_empty())
                .map(|u| u.trim_end_matches('/').to_string()),
            api_key: config.supabase_key.clone().filter(|k| !k.is_empty()),
            daily_limit: config.daily_limit,
            weekly_limit: config.weekly_limit,
            http_client,
        })
    }

    /// True when both the store URL and key are set.
    pub fn is_configured(&self) -> bool {
        self.base_url.is_some() && self.api_key.is_some()
    }

    /// The most recently published daily digest.
    pub async fn latest_daily(&self) -> Result<DailyDigest, DigestError> {
        let rows: Vec<DailyRow> = self
            .select(DAILY_TABLE, &[("select", "*"), ("order", "publish_date.desc"), ("limit", "1")])
            .await?;
        first_row(rows, "latest daily digest")
    }

    /// The daily digest published on `date` (`YYYY-MM-DD`).
    pub async fn daily_by_date(&self, date: &str) -> Result<DailyDigest, DigestError> {
        let filter = format!("eq.{}", date);
        let rows: Vec<DailyRow> = self
            .select(DAILY_TABLE, &[("select", "*"), ("publish_date", &filter)])
            .await?;
        first_row(rows, date)
    }

    /// Daily archive summaries, newest first.
    pub async fn daily_archive(&self) -> Result<Vec<DailyDigest>, DigestError> {
        let limit = self.daily_limit.to_string();
        let rows: Vec<DailyRow> = self
            .select(
                DAILY_TABLE,
                &[
                    ("select", DAILY_ARCHIVE_COLUMNS),
                    ("order", "publish_date.desc"),
                    ("limit", &limit),
                ],
            )
            .await?;
        Ok(rows.into_iter().map(DailyDigest::from).collect())
    }

    /// The most recent weekly digest.
    pub async fn latest_weekly(&self) -> Result<WeeklyDigest, DigestError> {
        let rows: Vec<WeeklyRow> = self
            .select(WEEKLY_TABLE, &[("select", "*"), ("order", "week_start_date.desc"), ("limit", "1")])
            .await?;
        first_row(rows, "latest weekly digest")
    }

    /// The weekly digest starting on `week_start` (`YYYY-MM-DD`).
    pub async fn weekly_by_week_start(&self, week_start: &str) -> Result<WeeklyDigest, DigestError> {
        let filter = format!("eq.{}", week_start);
        let rows: Vec<WeeklyRow> = self
            .select(WEEKLY_TABLE, &[("select", "*"), ("week_start_date", &filter)])
            .await?;
        first_row(rows, &format!("week of {}", week_start))
    }

    /// Weekly archive summaries, newest first.
    pub async fn weekly_archive(&self) -> Result<Vec<WeeklyDigest>, DigestError> {
        let limit = self.weekly_limit.to_string();
        let rows: Vec<WeeklyRow> = self
            .select(
                WEEKLY_TABLE,
                &[
                    ("select", WEEKLY_ARCHIVE_COLUMNS),
                    ("order", "week_start_date.desc"),
                    ("limit", &limit),
                ],
            )
            .await?;
        Ok(rows.into_iter().map(WeeklyDigest::from).collect())
    }

    /// Fetches both archives concurrently.
    ///
    /// A failed daily fetch falls back to `fallback`; a failed weekly
    /// fetch leaves the weekly part empty.
    pub async fn load_archive(&self, fallback: &[MockIssue]) -> ArchiveLoad {
        let (daily, weekly) = futures::join!(self.daily_archive(), self.weekly_archive());

        let (daily, using_fallback) = match daily {
            Ok(rows) => {
                info!("Fetched {} daily digests", rows.len());
                (rows.into_iter().map(Digest::Daily).collect(), false)
            }
            Err(e) => {
                warn!("Failed to fetch digests, using fallback: {}", e);
                (fallback.iter().cloned().map(Digest::Mock).collect(), true)
            }
        };

        let (weekly, weekly_error) = match weekly {
            Ok(rows) => {
                info!("Fetched {} weekly digests", rows.len());
                (rows.into_iter().map(Digest::Weekly).collect(), None)
            }
            Err(e) => {
                warn!("Failed to fetch weekly digests: {}", e);
                (Vec::new(), Some(e.to_string()))
            }
        };

        ArchiveLoad {
            digests: merge_archives(daily, weekly),
            using_fallback,
            weekly_error,
        }
    }

    /// Runs a table query and decodes the JSON array response.
    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, DigestError> {
        let (Some(base_url), Some(api_key)) = (&self.base_url, &self.api_key) else {
            return Err(DigestError::NotConfigured);
        };

        let url = format!("{}/rest/v1/{}", base_url, table);
        debug!("GET {} {:?}", url, query);

        let response = self
            .http_client
            .get(&url)
            .query(query)
            .header("apikey", api_key)
            .bearer_auth(api_key)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(DigestError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

fn first_row<R, T>(rows: Vec<R>, what: &str) -> Result<T, DigestError>
where
    T: From<R>,
{
    rows.into_iter()
        .next()
        .map(T::from)
        .ok_or_else(|| DigestError::NotFound(what.to_string()))
}
