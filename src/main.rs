//! folio - content tool for the portfolio site
//!
//! Renders the ship log heatmap and stats, the newsletter digest archive,
//! the book library, events and social links as Markdown, plain text or
//! JSON.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (config, content, remote store, etc.)

mod app;
mod cli;
mod config;
mod content;
mod digest;
mod github;
mod markdown;
mod models;
mod report;
mod shiplog;

use anyhow::{Context, Result};
use app::badge;
use app::{AppState, FileStore, HistoryNavigator, KeyValueStore, Navigator, Resolution, Theme};
use chrono::Local;
use cli::{Args, Command, DigestKindArg, OutputFormat, ThemeArg};
use config::{Config, CONFIG_FILE_NAME};
use content::{filter_books, SiteContent};
use digest::{
    compute_tags_with_counts, filter_tags_by_query, ArchiveLoad, Digest, DigestFilter,
    DigestService, KindFilter,
};
use indicatif::{ProgressBar, ProgressStyle};
use report::{BadgeReport, DigestListing, ShipLogReport, Style, ThemeReport};
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle init-config early (no logging needed)
    if matches!(args.command, Command::InitConfig) {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("folio v{}", env!("CARGO_PKG_VERSION"));
    debug!("Command: {:?}", args.command);

    match run(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle init-config: generate a default .folio.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE_NAME);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to set the digest store, content overrides, and more.");
    Ok(())
}

/// Compact stderr logging at the level chosen by the flags.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run one command. Returns the exit code.
async fn run(args: Args) -> Result<i32> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let format = args.effective_format(&config.general.format);
    let show_progress = !args.quiet;

    let output = match args.command {
        Command::ShipLog {
            ref year,
            today,
            all_years,
        } => {
            let content = load_content(&config)?;
            let today = today.unwrap_or_else(|| Local::now().date_naive());
            let ship_log = if all_years {
                ShipLogReport::build_all_years(&content.ship_log, today)
            } else {
                ShipLogReport::build(&content.ship_log, today, year.as_deref())
            };
            render(format, &ship_log, |style| {
                report::generate_ship_log_report(style, &ship_log)
            })?
        }

        Command::Digests {
            kind,
            ref search,
            ref tags,
            offline,
        } => {
            let content = load_content(&config)?;
            let load = if offline {
                info!("Offline: listing bundled sample issues");
                ArchiveLoad {
                    digests: content
                        .newsletter_issues
                        .iter()
                        .cloned()
                        .map(Digest::Mock)
                        .collect(),
                    using_fallback: true,
                    weekly_error: None,
                }
            } else {
                let service = DigestService::new(&config.remote)?;
                with_spinner(
                    show_progress,
                    "Fetching digests...",
                    service.load_archive(&content.newsletter_issues),
                )
                .await
            };

            let filter = DigestFilter {
                kind: kind_filter(kind),
                query: search.clone().unwrap_or_default(),
                tags: tags.clone(),
            };
            let tag_counts = filter_tags_by_query(
                &compute_tags_with_counts(
                    load.digests.iter().filter(|d| filter.kind.accepts(d.kind())),
                ),
                &filter.query,
            );
            let listing = DigestListing {
                digests: filter.apply(&load.digests),
                total: load.digests.len(),
                tags: tag_counts,
                using_fallback: load.using_fallback,
                weekly_error: load.weekly_error.clone(),
            };

            if filter.has_active_filters() {
                info!(
                    "{} of {} digests match the filters",
                    listing.digests.len(),
                    listing.total
                );
            }
            render(format, &listing, |style| {
                report::generate_digest_list(style, &listing)
            })?
        }

        Command::Digest { ref date, weekly } => {
            let service = DigestService::new(&config.remote)?;
            let fetch = async {
                match (date.as_deref(), weekly) {
                    (Some(d), true) => service.weekly_by_week_start(d).await.map(Digest::Weekly),
                    (Some(d), false) => service.daily_by_date(d).await.map(Digest::Daily),
                    (None, true) => service.latest_weekly().await.map(Digest::Weekly),
                    (None, false) => service.latest_daily().await.map(Digest::Daily),
                }
            };
            let digest = with_spinner(show_progress, "Fetching digest...", fetch)
                .await
                .context("Failed to load digest")?;
            debug!("Loaded {} digest {}", digest.kind(), digest.id());

            render(format, &digest, |style| {
                report::generate_digest_detail(style, &digest)
            })?
        }

        Command::Library { ref category } => {
            let content = load_content(&config)?;
            if !content.library.categories.iter().any(|c| c == category) {
                warn!("Unknown category '{}'", category);
            }
            let books = filter_books(&content.library.books, category);
            render(format, &books, |style| {
                report::generate_library(style, category, &content.library.categories, &books)
            })?
        }

        Command::Events => {
            let content = load_content(&config)?;
            render(format, &content.events, |style| {
                report::generate_events(style, &content.events)
            })?
        }

        Command::Links => {
            let content = load_content(&config)?;
            render(format, &content.social_links, |style| {
                report::generate_links(style, &content.social_links)
            })?
        }

        Command::Route { ref paths, back } => {
            let mut navigator = HistoryNavigator::default();
            let resolutions: Vec<Resolution> = paths
                .iter()
                .map(|path| {
                    navigator.navigate(path);
                    Resolution::resolve(path)
                })
                .collect();
            go_back(&mut navigator, back);
            debug!("History: {}", navigator.history().join(" -> "));
            let current = navigator.current();

            render(format, &resolutions, |style| {
                report::generate_routes(style, &resolutions, &current)
            })?
        }

        Command::Theme { value } => {
            let mut state = AppState::new(FileStore::open(&config.general.state_file));
            if let Some(value) = value {
                let theme = match value {
                    ThemeArg::Dark => Theme::Dark,
                    ThemeArg::Light => Theme::Light,
                    ThemeArg::Toggle => state.theme().toggled(),
                };
                state.set_theme(theme)?;
                state
                    .notification
                    .show(format!("Switched to {} theme", theme));
                info!("Theme saved to {}", state.store().path().display());
            }

            let theme_report = ThemeReport {
                theme: state.theme(),
                spark_color: state.spark_color(),
                notification: state.notification.clone(),
            };
            render(format, &theme_report, |style| {
                report::generate_theme(style, &theme_report)
            })?
        }

        Command::Badge { mark_read } => {
            let service = DigestService::new(&config.remote)?;
            let mut store = FileStore::open(&config.general.state_file);
            if !service.is_configured() {
                warn!("Digest store not configured; badge is always off");
            }

            let unread = if mark_read {
                match badge::mark_as_read(&service, &mut store).await {
                    Some(date) => info!("Marked digest {} as read", date),
                    None => debug!("Nothing marked as read"),
                }
                false
            } else {
                with_spinner(
                    show_progress,
                    "Checking for new digests...",
                    badge::check_unread(&service, &store),
                )
                .await
            };

            let badge_report = BadgeReport {
                unread,
                last_viewed: store.get(badge::LAST_VIEWED_KEY),
            };
            render(format, &badge_report, |style| {
                report::generate_badge(style, &badge_report)
            })?
        }

        Command::Stars => {
            let stars = with_spinner(
                show_progress,
                "Fetching stars...",
                github::stars_or_none(&config.github, config.remote.timeout_seconds),
            )
            .await;

            match format {
                OutputFormat::Json => report::generate_json(&serde_json::json!({
                    "repo": config.github.repo,
                    "stars": stars,
                }))?,
                _ => match stars {
                    Some(n) => format!("★ {} stars on {}\n", n, config.github.repo),
                    None => format!("Star count unavailable for {}\n", config.github.repo),
                },
            }
        }

        Command::InitConfig => unreachable!("handled before logging is set up"),
    };

    emit(&args.output, &output)?;
    Ok(0)
}

/// Renders data as JSON or through a Markdown/text generator.
fn render<T, F>(format: OutputFormat, data: &T, generate: F) -> Result<String>
where
    T: Serialize + ?Sized,
    F: FnOnce(Style) -> String,
{
    match format {
        OutputFormat::Json => report::generate_json(data),
        OutputFormat::Markdown => Ok(generate(Style::Markdown)),
        OutputFormat::Text => Ok(generate(Style::Text)),
    }
}

/// Prints the output or saves it to the requested file.
fn emit(path: &Option<std::path::PathBuf>, output: &str) -> Result<()> {
    match path {
        Some(path) => {
            report::write_report(output, path)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            println!("✅ Saved to: {}", path.display());
        }
        None => {
            print!("{}", output);
            if !output.ends_with('\n') {
                println!();
            }
        }
    }
    Ok(())
}

/// Awaits `future` behind a spinner on stderr.
async fn with_spinner<F: Future>(show: bool, message: &str, future: F) -> F::Output {
    let spinner = if show {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let output = future.await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    output
}

/// Steps back through history, stopping at the first entry.
fn go_back(navigator: &mut HistoryNavigator, steps: usize) {
    for taken in 0..steps {
        if !navigator.back() {
            warn!("Only {} of {} back steps possible", taken, steps);
            break;
        }
    }
}

/// Convert DigestKindArg to the archive kind filter.
fn kind_filter(kind: DigestKindArg) -> KindFilter {
    match kind {
        DigestKindArg::All => KindFilter::All,
        DigestKindArg::Daily => KindFilter::Daily,
        DigestKindArg::Weekly => KindFilter::Weekly,
    }
}

/// Load site content with configured overrides.
fn load_content(config: &Config) -> Result<SiteContent> {
    SiteContent::load(&config.content).context("Failed to load site content")
}

/// Explicit `--config` must load; a broken default file only warns.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
