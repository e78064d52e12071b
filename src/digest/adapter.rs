//! Adapters from store rows to [`Digest`] variants.
//!
//! Every source shape is normalized here, once, at the fetch boundary.
//! The store sometimes returns `content_json` as an embedded JSON string
//! rather than an object; both forms are accepted. Content that fails to
//! parse is dropped with a warning so the row itself still lists.

use super::model::{
    null_as_default, string_or_number, DailyContent, DailyDigest, Digest, MockIssue,
    WeeklyContent, WeeklyDigest,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// Row shape of the `daily_digests` table.
#[derive(Debug, Clone, Deserialize)]
pub struct DailyRow {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub publish_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub video_count: Option<u32>,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    #[serde(default)]
    pub content_json: Option<Value>,
}

/// Row shape of the `weekly_digests` table.
#[derive(Debug, Clone, Deserialize)]
pub struct WeeklyRow {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub week_start_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub week_end_date: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    #[serde(default)]
    pub total_videos: Option<u32>,
    #[serde(default)]
    pub days_with_content: Option<u32>,
    #[serde(default)]
    pub channels_included: Option<Vec<String>>,
    #[serde(default)]
    pub content_json: Option<Value>,
}

impl From<DailyRow> for DailyDigest {
    fn from(row: DailyRow) -> Self {
        let content: Option<DailyContent> = parse_content(row.content_json, &row.publish_date);

        let video_count = row
            .video_count
            .or_else(|| content.as_ref().and_then(|c| c.stats.as_ref()).map(|s| s.video_count))
            .unwrap_or_else(|| content.as_ref().map_or(0, |c| c.video_sections.len() as u32));

        let keywords = match row.keywords {
            Some(k) if !k.is_empty() => k,
            _ => content.as_ref().map(|c| c.keywords.clone()).unwrap_or_default(),
        };

        DailyDigest {
            id: row.id,
            publish_date: row.publish_date,
            title: row.title,
            video_count,
            keywords,
            content,
        }
    }
}

impl From<WeeklyRow> for WeeklyDigest {
    fn from(row: WeeklyRow) -> Self {
        let content: Option<WeeklyContent> = parse_content(row.content_json, &row.week_start_date);
        let stats = content.as_ref().and_then(|c| c.stats.as_ref());

        // Row columns win; zero and empty values fall back to content stats.
        let total_videos = row
            .total_videos
            .filter(|n| *n > 0)
            .or_else(|| stats.map(|s| s.total_videos))
            .unwrap_or(0);
        let days_with_content = row
            .days_with_content
            .filter(|n| *n > 0)
            .or_else(|| stats.map(|s| s.days_covered))
            .unwrap_or(0);
        let channels_included = match row.channels_included {
            Some(c) if !c.is_empty() => c,
            _ => stats.map(|s| s.channels.clone()).unwrap_or_default(),
        };
        let title = row
            .title
            .filter(|t| !t.is_empty())
            .or_else(|| content.as_ref().and_then(|c| c.title.clone()))
            .unwrap_or_default();
        let keywords = match row.keywords {
            Some(k) if !k.is_empty() => k,
            _ => content.as_ref().map(|c| c.keywords.clone()).unwrap_or_default(),
        };

        WeeklyDigest {
            id: row.id,
            week_start_date: row.week_start_date,
            week_end_date: row.week_end_date,
            title,
            description: row.description,
            keywords,
            total_videos,
            days_with_content,
            channels_included,
            content,
        }
    }
}

impl From<DailyRow> for Digest {
    fn from(row: DailyRow) -> Self {
        Digest::Daily(row.into())
    }
}

impl From<WeeklyRow> for Digest {
    fn from(row: WeeklyRow) -> Self {
        Digest::Weekly(row.into())
    }
}

impl From<MockIssue> for Digest {
    fn from(issue: MockIssue) -> Self {
        Digest::Mock(issue)
    }
}

/// Parses `content_json` given as an object or as a JSON string.
fn parse_content<T: DeserializeOwned>(raw: Option<Value>, row_key: &str) -> Option<T> {
    let value = match raw? {
        Value::Null => return None,
        Value::String(s) => match serde_json::from_str::<Value>(&s) {
            Ok(v) => v,
            Err(e) => {
                warn!("Digest {} has unparseable content_json string: {}", row_key, e);
                return None;
            }
        },
        other => other,
    };

    match serde_json::from_value(value) {
        Ok(content) => Some(content),
        Err(e) => {
            warn!("Digest {} content_json has unexpected shape: {}", row_key, e);
            None
        }
    }
}
