//! Archive search, tag counting and filtering.

use super::model::{Digest, DigestKind};
use serde::Serialize;
use std::collections::HashMap;

/// A keyword and the number of digests carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Which digest kinds the archive view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KindFilter {
    #[default]
    All,
    Daily,
    Weekly,
}

impl KindFilter {
    /// Mock issues stand in for daily digests.
    pub fn accepts(&self, kind: DigestKind) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Daily => matches!(kind, DigestKind::Daily | DigestKind::Mock),
            KindFilter::Weekly => kind == DigestKind::Weekly,
        }
    }
}

/// Search query, selected tags and kind filter for the archive.
#[derive(Debug, Clone, Default)]
pub struct DigestFilter {
    pub kind: KindFilter,
    pub query: String,
    /// A digest must carry every selected tag.
    pub tags: Vec<String>,
}

impl DigestFilter {
    pub fn has_active_filters(&self) -> bool {
        !self.query.is_empty() || !self.tags.is_empty()
    }

    pub fn matches(&self, digest: &Digest) -> bool {
        self.kind.accepts(digest.kind())
            && digest_matches_search(digest, &self.query)
            && self
                .tags
                .iter()
                .all(|tag| digest.keywords().iter().any(|k| k == tag))
    }

    /// Digests passing the filter, in archive order.
    pub fn apply<'a>(&self, digests: &'a [Digest]) -> Vec<&'a Digest> {
        digests.iter().filter(|d| self.matches(d)).collect()
    }
}

/// Text fields a query is matched against, per digest kind.
fn searchable_fields(digest: &Digest) -> Vec<&str> {
    let mut fields: Vec<&str> = vec![digest.title()];
    fields.extend(digest.keywords().iter().map(String::as_str));

    match digest {
        Digest::Weekly(w) => {
            fields.extend(w.description.as_deref());
            fields.extend(w.review_summary());
        }
        Digest::Daily(d) => {
            fields.extend(d.content.as_ref().and_then(|c| c.daily_tldr.as_deref()));
        }
        Digest::Mock(m) => fields.push(&m.summary),
    }

    fields
}

/// Case-insensitive substring match over a digest's searchable fields.
///
/// An empty query matches everything.
pub fn digest_matches_search(digest: &Digest, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }

    let needle = query.to_lowercase();
    searchable_fields(digest)
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Tags whose name contains the query; all tags for an empty query.
pub fn filter_tags_by_query(tags: &[TagCount], query: &str) -> Vec<TagCount> {
    if query.is_empty() {
        return tags.to_vec();
    }

    let needle = query.to_lowercase();
    tags.iter()
        .filter(|t| t.tag.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Keyword frequencies, most common first, ties alphabetical.
pub fn compute_tags_with_counts<'a, I>(digests: I) -> Vec<TagCount>
where
    I: IntoIterator<Item = &'a Digest>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for digest in digests {
        for keyword in digest.keywords() {
            *counts.entry(keyword.as_str()).or_default() += 1;
        }
    }

    let mut tags: Vec<TagCount> = counts
        .into_iter()
        .map(|(tag, count)| TagCount {
            tag: tag.to_string(),
            count,
        })
        .collect();

    tags.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.tag.to_lowercase().cmp(&b.tag.to_lowercase()))
            .then_with(|| a.tag.cmp(&b.tag))
    });
    tags
}

/// Daily and weekly digests in one list, newest first.
///
/// Undated items (mock issues) keep their relative order after dated ones.
pub fn merge_archives(daily: Vec<Digest>, weekly: Vec<Digest>) -> Vec<Digest> {
    let mut all: Vec<Digest> = daily.into_iter().chain(weekly).collect();
    all.sort_by(|a, b| match (a.sort_date(), b.sort_date()) {
        (Some(x), Some(y)) => y.cmp(x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::model::{DailyContent, DailyDigest, MockIssue, WeeklyDigest};

    fn daily(date: &str, title: &str, keywords: &[&str], tldr: Option<&str>) -> Digest {
        Digest::Daily(DailyDigest {
            id: date.to_string(),
            publish_date: date.to_string(),
            title: title.to_string(),
            video_count: 1,
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            content: tldr.map(|t| DailyContent {
                daily_tldr: Some(t.to_string()),
                ..DailyContent::default()
            }),
        })
    }

    fn weekly(start: &str, title: &str, description: Option<&str>) -> Digest {
        Digest::Weekly(WeeklyDigest {
            id: start.to_string(),
            week_start_date: start.to_string(),
            week_end_date: String::new(),
            title: title.to_string(),
            description: description.map(String::from),
            keywords: vec!["weekly".to_string()],
            total_videos: 0,
            days_with_content: 0,
            channels_included: Vec::new(),
            content: None,
        })
    }

    fn mock(title: &str) -> Digest {
        Digest::Mock(MockIssue {
            id: "1".to_string(),
            date: "Dec 04".to_string(),
            title: title.to_string(),
            summary: "OpenRouter usage data".to_string(),
            tags: vec!["research".to_string()],
            source_count: 1,
            reading_time: "8 min".to_string(),
        })
    }

    #[test]
    fn test_search_matches_title_keywords_and_tldr() {
        let d = daily("2026-01-10", "Agents Day", &["RAG"], Some("Evals got better"));
        assert!(digest_matches_search(&d, ""));
        assert!(digest_matches_search(&d, "agents"));
        assert!(digest_matches_search(&d, "rag"));
        assert!(digest_matches_search(&d, "EVALS"));
        assert!(!digest_matches_search(&d, "robotics"));
    }

    #[test]
    fn test_search_weekly_description() {
        let w = weekly("2026-01-05", "Week 2", Some("Inference costs fell"));
        assert!(digest_matches_search(&w, "inference"));
        assert!(!digest_matches_search(&w, "robotics"));
    }

    #[test]
    fn test_search_mock_summary() {
        assert!(digest_matches_search(&mock("State of AI"), "openrouter"));
    }

    #[test]
    fn test_compute_tags_with_counts_ordering() {
        let digests = vec![
            daily("2026-01-01", "a", &["beta", "alpha"], None),
            daily("2026-01-02", "b", &["beta", "gamma"], None),
            daily("2026-01-03", "c", &["alpha", "beta"], None),
        ];
        let tags = compute_tags_with_counts(&digests);
        let order: Vec<(&str, usize)> = tags.iter().map(|t| (t.tag.as_str(), t.count)).collect();
        assert_eq!(order, vec![("beta", 3), ("alpha", 2), ("gamma", 1)]);
    }

    #[test]
    fn test_filter_tags_by_query() {
        let tags = vec![
            TagCount { tag: "OpenAI".to_string(), count: 2 },
            TagCount { tag: "agents".to_string(), count: 1 },
        ];
        assert_eq!(filter_tags_by_query(&tags, "").len(), 2);
        let hits = filter_tags_by_query(&tags, "open");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].tag, "OpenAI");
    }

    #[test]
    fn test_digest_filter_kind_and_tags() {
        let digests = vec![
            daily("2026-01-10", "a", &["agents", "rag"], None),
            daily("2026-01-09", "b", &["agents"], None),
            weekly("2026-01-05", "w", None),
        ];

        let filter = DigestFilter {
            kind: KindFilter::Daily,
            query: String::new(),
            tags: vec!["agents".to_string(), "rag".to_string()],
        };
        let hits = filter.apply(&digests);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title(), "a");
        assert!(filter.has_active_filters());

        let weekly_only = DigestFilter {
            kind: KindFilter::Weekly,
            ..DigestFilter::default()
        };
        assert_eq!(weekly_only.apply(&digests).len(), 1);
        assert!(!weekly_only.has_active_filters());
    }

    #[test]
    fn test_merge_archives_newest_first() {
        let merged = merge_archives(
            vec![
                daily("2026-01-03", "d3", &[], None),
                daily("2026-01-12", "d12", &[], None),
            ],
            vec![weekly("2026-01-05", "w5", None)],
        );
        let titles: Vec<&str> = merged.iter().map(|d| d.title()).collect();
        assert_eq!(titles, vec!["d12", "w5", "d3"]);
    }

    #[test]
    fn test_merge_keeps_mock_after_dated() {
        let merged = merge_archives(
            vec![mock("m1"), mock("m2")],
            vec![weekly("2026-01-05", "w5", None)],
        );
        let titles: Vec<&str> = merged.iter().map(|d| d.title()).collect();
        assert_eq!(titles, vec!["w5", "m1", "m2"]);
    }
}
