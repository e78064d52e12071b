//! Data models for the site content.
//!
//! This module contains the static content types shared across the
//! application: ship log entries, books, events and social links.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A social platform tracked by the ship log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linkedin,
    X,
    Tiktok,
    Youtube,
    Substack,
    Shorts,
}

impl Platform {
    /// All platforms in display order.
    pub const ALL: [Platform; 6] = [
        Platform::Linkedin,
        Platform::X,
        Platform::Tiktok,
        Platform::Youtube,
        Platform::Substack,
        Platform::Shorts,
    ];
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Linkedin => write!(f, "LinkedIn"),
            Platform::X => write!(f, "X"),
            Platform::Tiktok => write!(f, "TikTok"),
            Platform::Youtube => write!(f, "YouTube"),
            Platform::Substack => write!(f, "Substack"),
            Platform::Shorts => write!(f, "Shorts"),
        }
    }
}

/// One calendar day of shipped content, counted per platform.
///
/// `date` is always a zero-padded `YYYY-MM-DD` string. Year and month
/// filters match on string prefixes and depend on that format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipLogEntry {
    pub date: String,
    #[serde(default)]
    pub linkedin: u32,
    #[serde(default)]
    pub x: u32,
    #[serde(default)]
    pub tiktok: u32,
    #[serde(default)]
    pub youtube: u32,
    #[serde(default)]
    pub substack: u32,
    #[serde(default)]
    pub shorts: u32,
    /// Free-form notes, conventionally prefixed with the platform key.
    #[serde(default)]
    pub notes: Vec<String>,
}

impl ShipLogEntry {
    /// Creates an entry with no posts.
    #[cfg(test)]
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            ..Self::default()
        }
    }

    /// Returns the count for one platform.
    pub fn count(&self, platform: Platform) -> u32 {
        match platform {
            Platform::Linkedin => self.linkedin,
            Platform::X => self.x,
            Platform::Tiktok => self.tiktok,
            Platform::Youtube => self.youtube,
            Platform::Substack => self.substack,
            Platform::Shorts => self.shorts,
        }
    }

    /// Sets the count for one platform, builder style.
    #[cfg(test)]
    pub fn with(mut self, platform: Platform, count: u32) -> Self {
        match platform {
            Platform::Linkedin => self.linkedin = count,
            Platform::X => self.x = count,
            Platform::Tiktok => self.tiktok = count,
            Platform::Youtube => self.youtube = count,
            Platform::Substack => self.substack = count,
            Platform::Shorts => self.shorts = count,
        }
        self
    }
}

/// Reading status of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    Read,
    Reading,
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookStatus::Read => write!(f, "Read"),
            BookStatus::Reading => write!(f, "Reading"),
        }
    }
}

/// A book in the library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    /// Site-relative cover image path.
    #[serde(default)]
    pub cover: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub category: String,
    pub status: BookStatus,
    #[serde(default)]
    pub is_favorite: bool,
    /// Publication year. Negative for BCE.
    pub year: i32,
}

/// The book library with its filter categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Library {
    /// Filter categories in display order, including `All` and `Favorites`.
    pub categories: Vec<String>,
    pub books: Vec<Book>,
}

/// A conference or meetup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    pub url: String,
    /// Location and dates, e.g. "London, UK - Apr 8-10, 2026".
    pub details: String,
    pub label: String,
}

/// Upcoming and past events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Events {
    #[serde(default)]
    pub upcoming: Vec<Event>,
    #[serde(default)]
    pub past: Vec<Event>,
}

/// A link to one of the author's profiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialLink {
    pub name: String,
    pub url: String,
    pub category: String,
}
