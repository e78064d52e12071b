//! Digest types.
//!
//! A digest is one newsletter issue. The archive mixes three shapes
//! (daily rows, weekly rows and bundled mock issues); [`Digest`] keeps them
//! apart as variants so render and search code never sniff field names.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Which kind of digest an archive item is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestKind {
    Daily,
    Weekly,
    Mock,
}

impl fmt::Display for DigestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigestKind::Daily => write!(f, "Daily"),
            DigestKind::Weekly => write!(f, "Weekly"),
            DigestKind::Mock => write!(f, "Sample"),
        }
    }
}

/// A normalized archive item.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "digest_type", rename_all = "lowercase")]
pub enum Digest {
    Daily(DailyDigest),
    Weekly(WeeklyDigest),
    Mock(MockIssue),
}

impl Digest {
    pub fn kind(&self) -> DigestKind {
        match self {
            Digest::Daily(_) => DigestKind::Daily,
            Digest::Weekly(_) => DigestKind::Weekly,
            Digest::Mock(_) => DigestKind::Mock,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Digest::Daily(d) => &d.id,
            Digest::Weekly(w) => &w.id,
            Digest::Mock(m) => &m.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Digest::Daily(d) => &d.title,
            Digest::Weekly(w) => &w.title,
            Digest::Mock(m) => &m.title,
        }
    }

    /// Keywords used for tag filtering (mock issues call them tags).
    pub fn keywords(&self) -> &[String] {
        match self {
            Digest::Daily(d) => &d.keywords,
            Digest::Weekly(w) => &w.keywords,
            Digest::Mock(m) => &m.tags,
        }
    }

    /// ISO date the archive is ordered by. Mock issues only carry a label.
    pub fn sort_date(&self) -> Option<&str> {
        match self {
            Digest::Daily(d) => Some(&d.publish_date),
            Digest::Weekly(w) => Some(&w.week_start_date),
            Digest::Mock(_) => None,
        }
    }

    /// One-paragraph summary for list views.
    pub fn summary(&self) -> Option<&str> {
        match self {
            Digest::Daily(d) => d.content.as_ref().and_then(|c| c.daily_tldr.as_deref()),
            Digest::Weekly(w) => w.summary(),
            Digest::Mock(m) => Some(&m.summary),
        }
    }
}

/// A daily digest row.
#[derive(Debug, Clone, Serialize)]
pub struct DailyDigest {
    pub id: String,
    /// `YYYY-MM-DD`.
    pub publish_date: String,
    pub title: String,
    pub video_count: u32,
    pub keywords: Vec<String>,
    pub content: Option<DailyContent>,
}

/// A weekly digest row.
#[derive(Debug, Clone, Serialize)]
pub struct WeeklyDigest {
    pub id: String,
    pub week_start_date: String,
    pub week_end_date: String,
    pub title: String,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub total_videos: u32,
    pub days_with_content: u32,
    pub channels_included: Vec<String>,
    pub content: Option<WeeklyContent>,
}

impl WeeklyDigest {
    /// Description, falling back to the week-in-review summary.
    pub fn summary(&self) -> Option<&str> {
        self.description
            .as_deref()
            .filter(|d| !d.is_empty())
            .or_else(|| self.review_summary())
    }

    pub fn review_summary(&self) -> Option<&str> {
        self.content
            .as_ref()
            .and_then(|c| c.week_in_review.as_ref())
            .and_then(|r| r.summary.as_deref())
    }
}

/// A bundled sample issue, shown when the remote archive is unavailable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockIssue {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Display label such as "Dec 04".
    pub date: String,
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub source_count: u32,
    #[serde(default)]
    pub reading_time: String,
}

/// Structured body of a daily digest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyContent {
    pub daily_tldr: Option<String>,
    pub stats: Option<DailyStats>,
    #[serde(deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub table_of_contents: Vec<TocItem>,
    #[serde(deserialize_with = "null_as_default")]
    pub video_sections: Vec<VideoSection>,
    pub contrarian_corner: Option<ContrarianCorner>,
    #[serde(deserialize_with = "null_as_default")]
    pub action_items: Vec<ActionItem>,
    #[serde(deserialize_with = "lists_by_key")]
    pub references: BTreeMap<String, Vec<ReferenceItem>>,
    pub conclusion: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyStats {
    #[serde(deserialize_with = "null_as_default")]
    pub video_count: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub estimated_read_minutes: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TocItem {
    pub id: Option<String>,
    pub title: Option<String>,
}

/// Breakdown of one analysed video.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoSection {
    #[serde(deserialize_with = "opt_string_or_number")]
    pub video_id: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    pub channel_name: Option<String>,
    pub duration_minutes: Option<u32>,
    pub video_url: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub speakers: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    pub condensed_summary: Option<String>,
    pub structure_overview: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub key_quotes: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub frameworks_mentioned: Vec<String>,
    /// `"value: description"` strings.
    #[serde(deserialize_with = "null_as_default")]
    pub key_statistics: Vec<String>,
}

impl VideoSection {
    /// "Channel · 12 min video".
    pub fn subtitle(&self) -> String {
        format!(
            "{} · {} video",
            self.channel_name.as_deref().unwrap_or("Unknown Channel"),
            format_duration(self.duration_minutes.unwrap_or(0))
        )
    }
}

/// Newer digests send `insight`/`conventional_wisdom`, older ones
/// `claim`/`verdict`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContrarianCorner {
    pub insight: Option<String>,
    pub claim: Option<String>,
    pub conventional_wisdom: Option<String>,
    pub verdict: Option<String>,
    pub evidence: Option<String>,
}

impl ContrarianCorner {
    pub fn insight(&self) -> Option<&str> {
        self.insight.as_deref().or(self.claim.as_deref())
    }

    pub fn conventional_wisdom(&self) -> Option<&str> {
        self.conventional_wisdom.as_deref().or(self.verdict.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionItem {
    #[serde(deserialize_with = "null_as_default")]
    pub action: String,
    /// e.g. "quick-win", "deep-dive".
    pub difficulty: Option<String>,
    pub source_video_title: Option<String>,
    #[serde(deserialize_with = "opt_string_or_number")]
    pub source_video_id: Option<String>,
}

/// A reference is either a bare name or a named link.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReferenceItem {
    Name(String),
    Detailed {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        url: Option<String>,
    },
}

impl ReferenceItem {
    pub fn label(&self) -> &str {
        match self {
            ReferenceItem::Name(name) => name,
            ReferenceItem::Detailed { name, title, .. } => {
                name.as_deref().or(title.as_deref()).unwrap_or("")
            }
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            ReferenceItem::Name(_) => None,
            ReferenceItem::Detailed { url, .. } => url.as_deref(),
        }
    }
}

/// Structured body of a weekly digest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklyContent {
    pub title: Option<String>,
    pub stats: Option<WeeklyStats>,
    #[serde(deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
    pub week_in_review: Option<WeekInReview>,
    pub the_one_thing: Option<TheOneThing>,
    pub quote_of_the_week: Option<QuoteOfWeek>,
    pub watch_one: Option<WatchOne>,
    #[serde(deserialize_with = "null_as_default")]
    pub numbers_that_matter: Vec<NumberThatMatters>,
    pub contrarian_take: Option<ContrarianTake>,
    pub concept_of_the_week: Option<ConceptOfWeek>,
    #[serde(deserialize_with = "null_as_default")]
    pub themes: Vec<Theme>,
    #[serde(deserialize_with = "lists_by_key")]
    pub videos_by_category: BTreeMap<String, Vec<CategoryVideo>>,
    #[serde(deserialize_with = "null_as_default")]
    pub weekly_references: Vec<WeeklyReference>,
    pub weekly_note: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklyStats {
    #[serde(deserialize_with = "null_as_default")]
    pub total_videos: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub days_covered: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub channels: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeekInReview {
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TheOneThing {
    #[serde(deserialize_with = "null_as_default")]
    pub headline: String,
    pub subtext: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteOfWeek {
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
    pub speaker: Option<String>,
    #[serde(deserialize_with = "opt_string_or_number")]
    pub source_video_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchOne {
    #[serde(deserialize_with = "opt_string_or_number")]
    pub video_id: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    pub channel: Option<String>,
    pub duration_minutes: Option<u32>,
    pub why: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberThatMatters {
    #[serde(deserialize_with = "string_or_number_or_empty")]
    pub number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub context: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContrarianTake {
    #[serde(deserialize_with = "null_as_default")]
    pub conventional: String,
    #[serde(deserialize_with = "null_as_default")]
    pub actual: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConceptOfWeek {
    #[serde(deserialize_with = "null_as_default")]
    pub term: String,
    pub full_name: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub definition: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub name: Option<String>,
    pub theme: Option<String>,
    pub title: Option<String>,
    pub one_liner: Option<String>,
    pub mention_count: Option<u32>,
    #[serde(deserialize_with = "null_as_default")]
    pub video_ids: Vec<String>,
}

impl Theme {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.theme.as_deref())
            .or(self.title.as_deref())
            .unwrap_or("")
    }

    /// Explicit mention count, else the number of linked videos.
    pub fn mentions(&self) -> u32 {
        self.mention_count
            .unwrap_or(self.video_ids.len() as u32)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryVideo {
    #[serde(deserialize_with = "opt_string_or_number")]
    pub video_id: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    pub channel: Option<String>,
    pub duration_minutes: Option<u32>,
    pub one_liner: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklyReference {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// framework, person, book, paper, community or other.
    pub reference_type: Option<String>,
}

/// Display order and headings for weekly reference groups.
pub const REFERENCE_GROUPS: [(&str, &str); 6] = [
    ("framework", "Frameworks & Tools"),
    ("person", "People"),
    ("book", "Books"),
    ("paper", "Papers"),
    ("community", "Communities"),
    ("other", "Other References"),
];

/// Formats a duration in minutes: "22 min", "1 hr", "3 hrs", "3h 52m".
///
/// Zero means unknown and renders as "?".
pub fn format_duration(minutes: u32) -> String {
    if minutes == 0 {
        return "?".to_string();
    }
    if minutes < 60 {
        return format!("{} min", minutes);
    }

    let hours = minutes / 60;
    let rest = minutes % 60;
    match (hours, rest) {
        (1, 0) => "1 hr".to_string(),
        (h, 0) => format!("{} hrs", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

/// YouTube watch URL for a video id.
pub fn youtube_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Int(i64),
    Float(f64),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Int(n) => n.to_string(),
            StringOrNumber::Float(n) => n.to_string(),
        }
    }
}

/// Store ids accept both numeric and text keys.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(String::from)
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?.map(String::from))
}

/// Like [`string_or_number`], with `null` read as an empty string.
fn string_or_number_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_string_or_number(deserializer)?.unwrap_or_default())
}

/// Reads `null` as the type's default. `#[serde(default)]` only covers
/// missing keys; the store sends explicit nulls for empty columns.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Keyed lists where the map or any of its lists may be `null`; null
/// lists are dropped.
fn lists_by_key<'de, D, T>(deserializer: D) -> Result<BTreeMap<String, Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let groups: Option<BTreeMap<String, Option<Vec<T>>>> = Option::deserialize(deserializer)?;
    Ok(groups
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(key, list)| list.map(|list| (key, list)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "?");
        assert_eq!(format_duration(22), "22 min");
        assert_eq!(format_duration(60), "1 hr");
        assert_eq!(format_duration(180), "3 hrs");
        assert_eq!(format_duration(232), "3h 52m");
    }

    #[test]
    fn test_mock_issue_numeric_id() {
        let issue: MockIssue = serde_json::from_str(
            r#"{"id": 7, "date": "Nov 28", "title": "T", "summary": "S", "tags": ["api"], "source_count": 18, "reading_time": "9 min"}"#,
        )
        .unwrap();
        assert_eq!(issue.id, "7");
        assert_eq!(issue.source_count, 18);
    }

    #[test]
    fn test_contrarian_corner_legacy_fields() {
        let corner: ContrarianCorner =
            serde_json::from_str(r#"{"claim": "c", "verdict": "v"}"#).unwrap();
        assert_eq!(corner.insight(), Some("c"));
        assert_eq!(corner.conventional_wisdom(), Some("v"));
    }

    #[test]
    fn test_reference_item_shapes() {
        let items: Vec<ReferenceItem> =
            serde_json::from_str(r#"["LangChain", {"title": "Paper", "url": "https://x.y"}]"#)
                .unwrap();
        assert_eq!(items[0].label(), "LangChain");
        assert_eq!(items[0].url(), None);
        assert_eq!(items[1].label(), "Paper");
        assert_eq!(items[1].url(), Some("https://x.y"));
    }

    #[test]
    fn test_theme_fallbacks() {
        let theme: Theme =
            serde_json::from_str(r#"{"theme": "Agents", "video_ids": ["a", "b"]}"#).unwrap();
        assert_eq!(theme.display_name(), "Agents");
        assert_eq!(theme.mentions(), 2);
    }

    #[test]
    fn test_null_fields_read_as_empty() {
        let content: DailyContent = serde_json::from_str(
            r#"{
                "daily_tldr": "Agents shipped.",
                "keywords": null,
                "table_of_contents": null,
                "video_sections": [{"title": null, "speakers": null, "video_id": 12}],
                "action_items": [{"action": null}],
                "stats": {"video_count": null, "estimated_read_minutes": 4},
                "references": {"tools": null, "papers": ["Attention"]}
            }"#,
        )
        .unwrap();

        assert_eq!(content.daily_tldr.as_deref(), Some("Agents shipped."));
        assert!(content.keywords.is_empty());
        assert_eq!(content.video_sections[0].title, "");
        assert_eq!(content.video_sections[0].video_id.as_deref(), Some("12"));
        assert_eq!(content.action_items[0].action, "");
        assert_eq!(content.stats.as_ref().map(|s| s.video_count), Some(0));
        assert_eq!(content.references.len(), 1);
        assert_eq!(content.references["papers"][0].label(), "Attention");
    }

    #[test]
    fn test_weekly_null_fields_read_as_empty() {
        let content: WeeklyContent = serde_json::from_str(
            r#"{
                "keywords": null,
                "themes": [{"name": "Agents", "video_ids": null}],
                "numbers_that_matter": [{"number": null, "context": null}],
                "videos_by_category": {"Talks": null, "Demos": [{"title": null}]},
                "weekly_references": null,
                "stats": {"total_videos": 9, "days_covered": null, "channels": null}
            }"#,
        )
        .unwrap();

        assert!(content.keywords.is_empty());
        assert_eq!(content.themes[0].mentions(), 0);
        assert_eq!(content.numbers_that_matter[0].number, "");
        assert_eq!(content.videos_by_category.len(), 1);
        assert_eq!(content.videos_by_category["Demos"][0].title, "");
        assert!(content.weekly_references.is_empty());
        let stats = content.stats.unwrap();
        assert_eq!(stats.total_videos, 9);
        assert!(stats.channels.is_empty());
    }

    #[test]
    fn test_video_subtitle() {
        let video = VideoSection {
            channel_name: Some("Latent Space".to_string()),
            duration_minutes: Some(75),
            ..VideoSection::default()
        };
        assert_eq!(video.subtitle(), "Latent Space · 1h 15m video");
        assert_eq!(
            VideoSection::default().subtitle(),
            "Unknown Channel · ? video"
        );
    }
}
