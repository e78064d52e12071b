//! Static site content.
//!
//! The ship log, library, events, social links and sample newsletter
//! issues are compiled into the binary. Any of them can be replaced by a
//! JSON file named in the `[content]` config section.

use crate::config::ContentConfig;
use crate::digest::MockIssue;
use crate::models::{Book, BookStatus, Events, Library, ShipLogEntry, SocialLink};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

const SHIP_LOG_JSON: &str = include_str!("../data/ship_log.json");
const BOOKS_JSON: &str = include_str!("../data/books.json");
const EVENTS_JSON: &str = include_str!("../data/events.json");
const SOCIAL_LINKS_JSON: &str = include_str!("../data/social_links.json");
const NEWSLETTER_ISSUES_JSON: &str = include_str!("../data/newsletter_issues.json");

/// Library filter category showing every book.
pub const ALL_CATEGORY: &str = "All";
/// Library filter category showing favorites only.
pub const FAVORITES_CATEGORY: &str = "Favorites";

/// Errors loading content files.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {name} content: {source}")]
    Parse {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// All static content, loaded once.
#[derive(Debug, Clone)]
pub struct SiteContent {
    pub ship_log: Vec<ShipLogEntry>,
    pub library: Library,
    pub events: Events,
    pub social_links: Vec<SocialLink>,
    pub newsletter_issues: Vec<MockIssue>,
}

impl SiteContent {
    /// Loads bundled content, applying any configured overrides.
    pub fn load(overrides: &ContentConfig) -> Result<Self, ContentError> {
        Ok(Self {
            ship_log: load_one("ship log", overrides.ship_log.as_deref(), SHIP_LOG_JSON)?,
            library: load_one("books", overrides.books.as_deref(), BOOKS_JSON)?,
            events: load_one("events", overrides.events.as_deref(), EVENTS_JSON)?,
            social_links: load_one(
                "social links",
                overrides.social_links.as_deref(),
                SOCIAL_LINKS_JSON,
            )?,
            newsletter_issues: load_one(
                "newsletter issues",
                overrides.newsletter_issues.as_deref(),
                NEWSLETTER_ISSUES_JSON,
            )?,
        })
    }

    /// Bundled content only.
    #[cfg(test)]
    pub fn bundled() -> Result<Self, ContentError> {
        Self::load(&ContentConfig::default())
    }
}

fn load_one<T: DeserializeOwned>(
    name: &'static str,
    path: Option<&Path>,
    bundled: &str,
) -> Result<T, ContentError> {
    let text = match path {
        Some(path) => {
            info!("Loading {} from {}", name, path.display());
            std::fs::read_to_string(path).map_err(|source| ContentError::Read {
                path: path.to_path_buf(),
                source,
            })?
        }
        None => {
            debug!("Using bundled {}", name);
            bundled.to_string()
        }
    };

    serde_json::from_str(&text).map_err(|source| ContentError::Parse { name, source })
}

/// Books shown for a library category.
///
/// `All` shows everything, `Favorites` the favorites, anything else the
/// books of that category. Books being read sort first; the sort is
/// stable so input order holds otherwise.
pub fn filter_books<'a>(books: &'a [Book], category: &str) -> Vec<&'a Book> {
    let mut shown: Vec<&Book> = books
        .iter()
        .filter(|book| match category {
            ALL_CATEGORY => true,
            FAVORITES_CATEGORY => book.is_favorite,
            other => book.category == other,
        })
        .collect();

    shown.sort_by_key(|book| book.status != BookStatus::Reading);
    shown
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn book(id: &str, category: &str, status: BookStatus, favorite: bool) -> Book {
        Book {
            id: id.to_string(),
            title: id.to_uppercase(),
            author: "Author".to_string(),
            cover: String::new(),
            tags: Vec::new(),
            category: category.to_string(),
            status,
            is_favorite: favorite,
            year: 2020,
        }
    }

    #[test]
    fn test_bundled_content_parses() {
        let content = SiteContent::bundled().unwrap();
        assert!(!content.ship_log.is_empty());
        assert!(!content.library.books.is_empty());
        assert_eq!(content.library.categories[0], ALL_CATEGORY);
        assert!(!content.social_links.is_empty());
        assert_eq!(content.newsletter_issues.len(), 7);
    }

    #[test]
    fn test_override_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"[{{"date": "2025-03-01", "youtube": 2}}]"#).unwrap();

        let overrides = ContentConfig {
            ship_log: Some(file.path().to_path_buf()),
            ..ContentConfig::default()
        };
        let content = SiteContent::load(&overrides).unwrap();
        assert_eq!(content.ship_log.len(), 1);
        assert_eq!(content.ship_log[0].youtube, 2);
    }

    #[test]
    fn test_missing_override_is_read_error() {
        let overrides = ContentConfig {
            events: Some(PathBuf::from("/definitely/not/here.json")),
            ..ContentConfig::default()
        };
        let err = SiteContent::load(&overrides).unwrap_err();
        assert!(matches!(err, ContentError::Read { .. }));
    }

    #[test]
    fn test_bad_override_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not json").unwrap();

        let overrides = ContentConfig {
            books: Some(file.path().to_path_buf()),
            ..ContentConfig::default()
        };
        let err = SiteContent::load(&overrides).unwrap_err();
        assert!(matches!(err, ContentError::Parse { name: "books", .. }));
    }

    #[test]
    fn test_filter_books() {
        let books = vec![
            book("a", "Mind", BookStatus::Read, true),
            book("b", "Business", BookStatus::Read, false),
            book("c", "Mind", BookStatus::Reading, false),
        ];

        let all: Vec<&str> = filter_books(&books, ALL_CATEGORY)
            .iter()
            .map(|b| b.id.as_str())
            .collect();
        assert_eq!(all, vec!["c", "a", "b"]);

        let favorites = filter_books(&books, FAVORITES_CATEGORY);
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].id, "a");

        let mind: Vec<&str> = filter_books(&books, "Mind")
            .iter()
            .map(|b| b.id.as_str())
            .collect();
        assert_eq!(mind, vec!["c", "a"]);

        assert!(filter_books(&books, "Philosophy").is_empty());
    }
}
