//! `.folio.toml` settings.
//!
//! Every section falls back to its defaults, so a partial file is valid.
//! Command-line flags and environment variables win over the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = ".folio.toml";

/// Settings read from `.folio.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Content override paths.
    #[serde(default)]
    pub content: ContentConfig,

    /// Remote digest store settings.
    #[serde(default)]
    pub remote: RemoteConfig,

    /// GitHub settings.
    #[serde(default)]
    pub github: GithubConfig,
}

/// Output and local state settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output format (markdown, text, json).
    #[serde(default = "default_format")]
    pub format: String,

    /// Where theme and badge state is persisted.
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            state_file: default_state_file(),
        }
    }
}

fn default_format() -> String {
    "markdown".to_string()
}

fn default_state_file() -> PathBuf {
    PathBuf::from(".folio-state.json")
}

/// Optional paths replacing the bundled content files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_log: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub books: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_links: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub newsletter_issues: Option<PathBuf>,
}

/// Remote digest store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the store, e.g. `https://xyz.supabase.co`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supabase_url: Option<String>,

    /// Anonymous API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supabase_key: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Daily digests fetched for the archive.
    #[serde(default = "default_daily_limit")]
    pub daily_limit: usize,

    /// Weekly digests fetched for the archive.
    #[serde(default = "default_weekly_limit")]
    pub weekly_limit: usize,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            supabase_url: None,
            supabase_key: None,
            timeout_seconds: default_timeout(),
            daily_limit: default_daily_limit(),
            weekly_limit: default_weekly_limit(),
        }
    }
}

fn default_timeout() -> u64 {
    15
}

fn default_daily_limit() -> usize {
    30
}

fn default_weekly_limit() -> usize {
    12
}

/// GitHub API settings for the star counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    #[serde(default = "default_github_api")]
    pub api_url: String,

    /// `owner/name` of the site repository.
    #[serde(default = "default_github_repo")]
    pub repo: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: default_github_api(),
            repo: default_github_repo(),
        }
    }
}

fn default_github_api() -> String {
    "https://api.github.com".to_string()
}

fn default_github_repo() -> String {
    "ThoBustos/thomasbustos".to_string()
}

impl Config {
    /// Reads and parses a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Reads `.folio.toml` from the working directory, if present.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Applies command-line and environment overrides.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref url) = args.supabase_url {
            self.remote.supabase_url = Some(url.clone());
        }
        if let Some(ref key) = args.supabase_key {
            self.remote.supabase_key = Some(key.clone());
        }
        if let Some(timeout) = args.timeout {
            self.remote.timeout_seconds = timeout;
        }
        if let Some(ref state_file) = args.state_file {
            self.general.state_file = state_file.clone();
        }
    }

    /// The default settings as TOML, for `init-config`.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.format, "markdown");
        assert_eq!(config.remote.daily_limit, 30);
        assert_eq!(config.remote.weekly_limit, 12);
        assert!(config.remote.supabase_url.is_none());
        assert_eq!(config.github.repo, "ThoBustos/thomasbustos");
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
format = "json"

[content]
books = "my_books.json"

[remote]
supabase_url = "https://db.example.com"
supabase_key = "anon"
daily_limit = 10
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.format, "json");
        assert_eq!(config.content.books, Some(PathBuf::from("my_books.json")));
        assert!(config.content.events.is_none());
        assert_eq!(config.remote.supabase_url.as_deref(), Some("https://db.example.com"));
        assert_eq!(config.remote.daily_limit, 10);
        assert_eq!(config.remote.weekly_limit, 12);
        assert_eq!(config.remote.timeout_seconds, 15);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[github]\nrepo = \"someone/site\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.github.repo, "someone/site");
        assert_eq!(config.github.api_url, "https://api.github.com");
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[general\nformat = ").unwrap();
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[remote]"));
        assert!(toml_str.contains("[github]"));
    }
}
