//! Theme and notification state, persisted through a key-value store.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

/// Storage key holding the selected theme.
pub const THEME_KEY: &str = "theme";

/// Small string key-value persistence port.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a flat JSON object on disk.
///
/// Every `set` rewrites the whole file through a temp file in the same
/// directory, then renames it into place.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens the store at `path`. A missing file is an empty store; an
    /// unreadable one is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                warn!("Ignoring corrupt state file {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No state file at {}", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                warn!("Failed to read state file {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };

        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
        let json = serde_json::to_string_pretty(&self.values)?;
        tmp.write_all(json.as_bytes())?;
        tmp.persist(&self.path)
            .with_context(|| format!("Failed to write state file {}", self.path.display()))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.save()
    }
}

/// Color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Accent color of the click-spark effect.
    pub fn spark_color(&self) -> &'static str {
        match self {
            Theme::Dark => "#F2E7C9",
            Theme::Light => "#4E4B93",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Dark => write!(f, "dark"),
            Theme::Light => write!(f, "light"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(format!("unknown theme: {}", other)),
        }
    }
}

/// A transient toast message.
///
/// Showing a message while one is visible restarts the toast instead of
/// stacking a second one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NotificationState {
    pub message: String,
    pub visible: bool,
    /// Times a visible toast was restarted by a new message.
    pub restarts: u32,
}

impl NotificationState {
    pub fn show(&mut self, message: impl Into<String>) {
        if self.visible {
            self.restarts += 1;
        }
        self.message = message.into();
        self.visible = true;
    }

    #[allow(dead_code)] // Dismissed by interactive front ends; the CLI exits first
    pub fn hide(&mut self) {
        self.visible = false;
        self.message.clear();
    }
}

/// Theme and notification state over an injected store.
pub struct AppState<S: KeyValueStore> {
    store: S,
    theme: Theme,
    pub notification: NotificationState,
}

impl<S: KeyValueStore> AppState<S> {
    /// Loads the stored theme, defaulting to dark.
    pub fn new(store: S) -> Self {
        let theme = match store.get(THEME_KEY) {
            Some(value) => value.parse().unwrap_or_else(|e| {
                warn!("{}; using default theme", e);
                Theme::default()
            }),
            None => Theme::default(),
        };

        Self {
            store,
            theme,
            notification: NotificationState::default(),
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn spark_color(&self) -> &'static str {
        self.theme.spark_color()
    }

    /// Changes and persists the theme.
    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.theme = theme;
        self.store
            .set(THEME_KEY, &theme.to_string())
            .context("Failed to persist theme")
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
