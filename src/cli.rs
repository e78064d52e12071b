//! `folio` subcommands and global flags.

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// folio - content tool for the portfolio site
///
/// Renders the ship log, newsletter digests, library, events and links
/// as Markdown, terminal text or JSON.
///
/// Examples:
///   folio ship-log --year 2026
///   folio digests --kind weekly --search agents
///   folio digest 2026-01-12 --format text
///   folio library --category Favorites
///   folio route /newsletter/2026-01-12 /nope
///   folio init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config file (default: ./.folio.toml when present)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Errors only, no spinner
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format (markdown, text, json). Default: from config or markdown
    #[arg(long, value_name = "FORMAT", global = true)]
    pub format: Option<OutputFormat>,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "FILE", global = true)]
    pub output: Option<PathBuf>,

    /// Digest store base URL
    #[arg(long, value_name = "URL", env = "FOLIO_SUPABASE_URL", global = true)]
    pub supabase_url: Option<String>,

    /// Digest store API key
    #[arg(
        long,
        value_name = "KEY",
        env = "FOLIO_SUPABASE_KEY",
        hide_env_values = true,
        global = true
    )]
    pub supabase_key: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    /// State file for theme and badge (default: from config)
    #[arg(long, value_name = "FILE", global = true)]
    pub state_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Ship log stats and yearly heatmap
    ShipLog {
        /// Year to chart (default: newest year in the log)
        #[arg(long, value_name = "YYYY", conflicts_with = "all_years")]
        year: Option<String>,

        /// Chart every year in the log, newest first
        #[arg(long)]
        all_years: bool,

        /// Reference day for weekly and monthly stats (default: today)
        #[arg(long, value_name = "YYYY-MM-DD")]
        today: Option<NaiveDate>,
    },

    /// Newsletter archive with search and tag filters
    Digests {
        /// Digest kind to list
        #[arg(long, value_enum, default_value = "all")]
        kind: DigestKindArg,

        /// Case-insensitive search over titles, keywords and summaries
        #[arg(short, long, value_name = "QUERY")]
        search: Option<String>,

        /// Only digests carrying all of these tags (comma-separated)
        #[arg(long = "tag", value_name = "TAGS", value_delimiter = ',')]
        tags: Vec<String>,

        /// Skip the remote store and list the bundled sample issues
        #[arg(long)]
        offline: bool,
    },

    /// One digest in full
    Digest {
        /// Publish date (daily) or week start date (weekly). Default: latest
        #[arg(value_name = "YYYY-MM-DD")]
        date: Option<String>,

        /// Show a weekly digest instead of a daily one
        #[arg(long)]
        weekly: bool,
    },

    /// Book library
    Library {
        /// All, Favorites, or a category name
        #[arg(long, default_value = "All")]
        category: String,
    },

    /// Upcoming and past events
    Events,

    /// Social links
    Links,

    /// Resolve site paths the way the router does
    Route {
        /// Paths to visit, in order
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<String>,

        /// Go back this many steps after visiting
        #[arg(long, value_name = "STEPS", default_value_t = 0)]
        back: usize,
    },

    /// Show or change the color theme
    Theme {
        #[arg(value_enum)]
        value: Option<ThemeArg>,
    },

    /// Newsletter unread badge
    Badge {
        /// Record the latest digest as read
        #[arg(long)]
        mark_read: bool,
    },

    /// GitHub stars of the site repository
    Stars,

    /// Generate a default .folio.toml configuration file
    InitConfig,
}

/// Output format for rendered views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Markdown (default)
    #[default]
    Markdown,
    /// Plain terminal text
    Text,
    /// JSON format
    Json,
}

/// Digest kinds for `digests --kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DigestKindArg {
    All,
    Daily,
    Weekly,
}

/// Theme choices for the `theme` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    Dark,
    Light,
    Toggle,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Checks flag combinations and argument shapes clap cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        // Validate the store URL format
        if let Some(ref url) = self.supabase_url {
            if !url.is_empty() && !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Digest store URL must start with 'http://' or 'https://'".to_string());
            }
        }

        match &self.command {
            Command::ShipLog {
                year: Some(year), ..
            } => {
                if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
                    return Err(format!("Year must be four digits: {}", year));
                }
            }
            Command::Digest {
                date: Some(date), ..
            } => {
                if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
                    return Err(format!("Date must be YYYY-MM-DD: {}", date));
                }
            }
            Command::Library { category } if category.trim().is_empty() => {
                return Err("Category must not be empty".to_string());
            }
            Command::Route { paths, .. } => {
                if let Some(bad) = paths.iter().find(|p| !p.starts_with('/')) {
                    return Err(format!("Paths must start with '/': {}", bad));
                }
            }
            _ => {}
        }

        Ok(())
    }

    /// Tracing level for `--verbose` / `--quiet`.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Returns the output format, falling back to the configured default.
    pub fn effective_format(&self, configured: &str) -> OutputFormat {
        self.format
            .or_else(|| OutputFormat::from_str(configured, true).ok())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args(command: Command) -> Args {
        Args {
            command,
            config: None,
            verbose: false,
            quiet: false,
            format: None,
            output: None,
            supabase_url: None,
            supabase_key: None,
            timeout: None,
            state_file: None,
        }
    }

    #[test]
    fn test_parse_subcommand_with_globals() {
        let args = Args::try_parse_from([
            "folio", "digests", "--kind", "weekly", "--tag", "agents,rag", "--format", "json",
        ])
        .unwrap();

        assert_eq!(args.format, Some(OutputFormat::Json));
        match args.command {
            Command::Digests { kind, tags, .. } => {
                assert_eq!(kind, DigestKindArg::Weekly);
                assert_eq!(tags, vec!["agents", "rag"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_ship_log_today() {
        let args = Args::try_parse_from(["folio", "ship-log", "--today", "2026-01-14"]).unwrap();
        match args.command {
            Command::ShipLog {
                today,
                year,
                all_years,
            } => {
                assert_eq!(today, NaiveDate::from_ymd_opt(2026, 1, 14));
                assert!(year.is_none());
                assert!(!all_years);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_all_years_and_back() {
        let args = Args::try_parse_from(["folio", "ship-log", "--all-years"]).unwrap();
        assert!(matches!(args.command, Command::ShipLog { all_years: true, .. }));

        let conflict = Args::try_parse_from(["folio", "ship-log", "--all-years", "--year", "2026"]);
        assert!(conflict.is_err());

        let args =
            Args::try_parse_from(["folio", "route", "/events", "/library", "--back", "1"]).unwrap();
        match args.command {
            Command::Route { paths, back } => {
                assert_eq!(paths.len(), 2);
                assert_eq!(back, 1);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args(Command::Events);
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_bad_inputs() {
        let args = make_args(Command::ShipLog {
            year: Some("26".to_string()),
            today: None,
            all_years: false,
        });
        assert!(args.validate().is_err());

        let args = make_args(Command::Digest {
            date: Some("2026-13-01".to_string()),
            weekly: false,
        });
        assert!(args.validate().is_err());

        let args = make_args(Command::Route {
            paths: vec!["newsletter".to_string()],
            back: 0,
        });
        assert!(args.validate().is_err());

        let mut args = make_args(Command::Stars);
        args.supabase_url = Some("db.example.com".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_ok() {
        let args = make_args(Command::Digest {
            date: Some("2026-01-12".to_string()),
            weekly: true,
        });
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args(Command::Links);
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_effective_format() {
        let mut args = make_args(Command::Links);
        assert_eq!(args.effective_format("text"), OutputFormat::Text);
        assert_eq!(args.effective_format("nonsense"), OutputFormat::Markdown);

        args.format = Some(OutputFormat::Json);
        assert_eq!(args.effective_format("text"), OutputFormat::Json);
    }
}
