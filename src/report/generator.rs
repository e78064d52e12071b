//! Report generation.
//!
//! Every view renders to Markdown or plain terminal text from the same
//! code path; [`Style`] decides how headings, emphasis and links come out.
//! JSON output serializes the underlying data directly.

use crate::app::{NotificationState, Resolution, Route, Theme};
use crate::digest::{
    format_duration, youtube_url, DailyContent, DailyDigest, Digest, MockIssue, TagCount,
    WeeklyContent, WeeklyDigest, REFERENCE_GROUPS,
};
use crate::markdown::{render_markdown, render_paragraphs, to_markdown, to_plain, Fragment};
use crate::models::{Book, BookStatus, Event, Events, Platform, ShipLogEntry, SocialLink};
use crate::shiplog::{
    day_stat, generate_year_grid, year_stats, DayStat, GridWeek, ShipLogSummary,
    WeekOverWeekChange, YearStats,
};
use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

const DAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const HEAT_CHARS: [char; 5] = ['·', '░', '▒', '▓', '█'];

/// Number of tags listed above the archive.
const TOP_TAGS: usize = 12;

/// Human-readable output flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Markdown,
    Text,
}

impl Style {
    fn heading(&self, level: usize, text: &str) -> String {
        match self {
            Style::Markdown => format!("{} {}\n\n", "#".repeat(level), text),
            Style::Text => match level {
                1 => format!("{}\n{}\n\n", text, "=".repeat(text.chars().count())),
                2 => format!("{}\n{}\n\n", text, "-".repeat(text.chars().count())),
                _ => format!("{}\n\n", text.to_uppercase()),
            },
        }
    }

    fn bold(&self, text: &str) -> String {
        match self {
            Style::Markdown => format!("**{}**", text),
            Style::Text => text.to_string(),
        }
    }

    fn italic(&self, text: &str) -> String {
        match self {
            Style::Markdown => format!("*{}*", text),
            Style::Text => text.to_string(),
        }
    }

    fn link(&self, text: &str, href: &str) -> String {
        match self {
            Style::Markdown => format!("[{}]({})", text, href),
            Style::Text => format!("{} ({})", text, href),
        }
    }

    fn quote(&self, text: &str) -> String {
        match self {
            Style::Markdown => format!("> {}\n\n", text),
            Style::Text => format!("  \"{}\"\n\n", text),
        }
    }

    fn fragments(&self, fragments: &[Fragment]) -> String {
        match self {
            Style::Markdown => to_markdown(fragments),
            Style::Text => to_plain(fragments),
        }
    }

    /// Renders one line of inline markdown.
    fn inline(&self, text: &str) -> String {
        self.fragments(&render_markdown(text))
    }

    /// Renders blank-line separated paragraphs of inline markdown.
    fn paragraphs(&self, text: &str) -> String {
        let mut out = String::new();
        for paragraph in render_paragraphs(text) {
            if paragraph.is_empty() {
                continue;
            }
            out.push_str(&self.fragments(&paragraph));
            out.push_str("\n\n");
        }
        out
    }

    fn footer(&self) -> String {
        match self {
            Style::Markdown => format!(
                "---\n\n*Generated by folio v{}*\n",
                env!("CARGO_PKG_VERSION")
            ),
            Style::Text => String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Ship log
// ---------------------------------------------------------------------------

/// Data behind the ship log view.
#[derive(Debug, Clone, Serialize)]
pub struct ShipLogReport {
    pub summary: ShipLogSummary,
    /// Charted years, newest first.
    pub charts: Vec<YearChart>,
}

/// Heatmap and totals for one year.
#[derive(Debug, Clone, Serialize)]
pub struct YearChart {
    pub year: String,
    pub year_stats: YearStats,
    pub grid: Vec<GridWeek>,
    /// Days with an entry, newest first.
    pub days: Vec<DayStat>,
}

impl YearChart {
    /// Charts `year`. A year that is not a number charts as `fallback`.
    pub fn build(log: &[ShipLogEntry], year: &str, fallback: i32) -> Self {
        let year_stats = year_stats(log, year);
        let grid = generate_year_grid(year.parse().unwrap_or(fallback), &year_stats.entries);

        let mut days: Vec<DayStat> = year_stats.entries.iter().map(day_stat).collect();
        days.sort_by(|a, b| b.date.cmp(&a.date));

        Self {
            year: year.to_string(),
            year_stats,
            grid,
            days,
        }
    }

    /// Highest-total day; ties go to the later date.
    pub fn busiest_day(&self) -> Option<&DayStat> {
        self.days
            .iter()
            .filter(|d| d.total > 0)
            .max_by(|a, b| a.total.cmp(&b.total).then_with(|| a.date.cmp(&b.date)))
    }
}

impl ShipLogReport {
    /// Builds the view for `today`. Without an explicit year the newest
    /// year in the log is shown.
    pub fn build(log: &[ShipLogEntry], today: NaiveDate, year: Option<&str>) -> Self {
        let summary = ShipLogSummary::build(log, today);
        let year = year
            .map(String::from)
            .or_else(|| summary.years.first().cloned())
            .unwrap_or_else(|| today.year().to_string());

        Self {
            charts: vec![YearChart::build(log, &year, today.year())],
            summary,
        }
    }

    /// Builds the view with one chart per year in the log.
    pub fn build_all_years(log: &[ShipLogEntry], today: NaiveDate) -> Self {
        let summary = ShipLogSummary::build(log, today);
        let charts = summary
            .years
            .iter()
            .map(|year| YearChart::build(log, year, today.year()))
            .collect();

        Self { summary, charts }
    }
}

/// Generate the ship log report.
pub fn generate_ship_log_report(style: Style, report: &ShipLogReport) -> String {
    let mut output = String::new();
    let summary = &report.summary;

    output.push_str(&style.heading(1, "Ship Log"));

    output.push_str(&format!(
        "- {} {} posts\n",
        style.bold("All time:"),
        summary.all_time_total
    ));
    output.push_str(&format!(
        "- {} {} posts\n",
        style.bold("This month:"),
        summary.month_total
    ));
    output.push_str(&format!(
        "- {} {}\n",
        style.bold("This week:"),
        format_week_over_week(&summary.week_over_week)
    ));
    match summary.most_recent {
        Some(ref recent) => output.push_str(&format!(
            "- {} {} ({} posts)\n",
            style.bold("Last shipped:"),
            recent.date,
            recent.total
        )),
        None => output.push_str(&format!("- {} nothing yet\n", style.bold("Last shipped:"))),
    }
    output.push('\n');

    output.push_str(&generate_current_week_section(style, report));
    for chart in &report.charts {
        output.push_str(&generate_year_section(style, chart));
        output.push_str(&generate_recent_notes_section(style, chart));
    }
    output.push_str(&style.footer());

    output
}

/// "3 posts (+50% vs 2 last week)".
fn format_week_over_week(change: &WeekOverWeekChange) -> String {
    format!(
        "{} posts ({}{}% vs {} last week)",
        change.this_week,
        if change.percent_change > 0 { "+" } else { "" },
        change.percent_change,
        change.last_week
    )
}

fn generate_current_week_section(style: Style, report: &ShipLogReport) -> String {
    let mut section = style.heading(2, "This Week");
    let week = &report.summary.current_week;

    match style {
        Style::Markdown => {
            let labels: Vec<String> = week
                .iter()
                .map(|day| {
                    let label = DAY_LABELS[day.day_of_week as usize % 7];
                    if day.is_today {
                        format!("**{}**", label)
                    } else {
                        label.to_string()
                    }
                })
                .collect();
            section.push_str(&format!("| {} |\n", labels.join(" | ")));
            section.push_str(&format!("|{}\n", ":---:|".repeat(7)));
            let totals: Vec<String> = week.iter().map(|day| day.total.to_string()).collect();
            section.push_str(&format!("| {} |\n\n", totals.join(" | ")));
        }
        Style::Text => {
            let cells: Vec<String> = week
                .iter()
                .map(|day| {
                    let label = DAY_LABELS[day.day_of_week as usize % 7];
                    if day.is_today {
                        format!("[{} {}]", label, day.total)
                    } else {
                        format!("{} {}", label, day.total)
                    }
                })
                .collect();
            section.push_str(&cells.join("  "));
            section.push_str("\n\n");
        }
    }

    section
}

fn generate_year_section(style: Style, chart: &YearChart) -> String {
    let mut section = style.heading(2, &chart.year);

    if style == Style::Markdown {
        section.push_str("```text\n");
        section.push_str(&render_heatmap(&chart.grid));
        section.push_str("```\n\n");
    } else {
        section.push_str(&render_heatmap(&chart.grid));
        section.push('\n');
    }

    if let Some(day) = chart.busiest_day() {
        section.push_str(&format!(
            "{} {} ({} posts)\n\n",
            style.bold("Busiest day:"),
            day.date,
            day.total
        ));
    }

    section.push_str(&style.heading(3, "Platforms"));
    match style {
        Style::Markdown => {
            section.push_str("| Platform | Posts |\n");
            section.push_str("|:---|:---:|\n");
            for platform in Platform::ALL {
                section.push_str(&format!(
                    "| {} | {} |\n",
                    platform,
                    chart.year_stats.totals.get(&platform).copied().unwrap_or(0)
                ));
            }
            section.push_str(&format!("| **Total** | **{}** |\n\n", chart.year_stats.total));
        }
        Style::Text => {
            for platform in Platform::ALL {
                section.push_str(&format!(
                    "  {:<10} {:>4}\n",
                    platform.to_string(),
                    chart.year_stats.totals.get(&platform).copied().unwrap_or(0)
                ));
            }
            section.push_str(&format!("  {:<10} {:>4}\n\n", "Total", chart.year_stats.total));
        }
    }

    section
}

/// Notes of the ten latest noted days, newest first.
fn generate_recent_notes_section(style: Style, chart: &YearChart) -> String {
    let mut noted: Vec<&ShipLogEntry> = chart
        .year_stats
        .entries
        .iter()
        .filter(|e| !e.notes.is_empty())
        .collect();
    noted.sort_by(|a, b| b.date.cmp(&a.date));
    noted.truncate(10);

    if noted.is_empty() {
        return String::new();
    }

    let mut section = style.heading(3, "Notes");
    for entry in noted {
        for note in &entry.notes {
            section.push_str(&format!("- {} {}\n", style.bold(&entry.date), note));
        }
    }
    section.push('\n');
    section
}

/// Draws a year grid as a 7-row character heatmap with month labels.
pub fn render_heatmap(grid: &[GridWeek]) -> String {
    let mut header: Vec<char> = vec![' '; grid.len() + 3];
    for (col, week) in grid.iter().enumerate() {
        let month_start = week
            .iter()
            .find(|cell| cell.is_in_year && cell.date.ends_with("-01"))
            .and_then(|cell| cell.date.get(5..7))
            .and_then(|month| month.parse::<usize>().ok());

        if let Some(month) = month_start.filter(|m| (1..=12).contains(m)) {
            if header[col..col + 3].iter().all(|c| *c == ' ') {
                for (i, ch) in MONTH_LABELS[month - 1].chars().enumerate() {
                    header[col + i] = ch;
                }
            }
        }
    }

    let mut out = String::new();
    out.push_str("    ");
    out.push_str(header.iter().collect::<String>().trim_end());
    out.push('\n');

    for (day, label) in DAY_LABELS.iter().enumerate() {
        out.push_str(label);
        out.push(' ');
        for week in grid {
            out.push(heat_char(week[day].level));
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "    Less {} More\n",
        HEAT_CHARS.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" ")
    ));
    out
}

fn heat_char(level: i8) -> char {
    if level < 0 {
        ' '
    } else {
        HEAT_CHARS[(level as usize).min(HEAT_CHARS.len() - 1)]
    }
}

// ---------------------------------------------------------------------------
// Digest archive
// ---------------------------------------------------------------------------

/// Data behind the archive listing.
#[derive(Debug, Clone, Serialize)]
pub struct DigestListing<'a> {
    pub digests: Vec<&'a Digest>,
    /// Digests before search and tag filters.
    pub total: usize,
    pub tags: Vec<TagCount>,
    pub using_fallback: bool,
    pub weekly_error: Option<String>,
}

/// Generate the archive listing.
pub fn generate_digest_list(style: Style, listing: &DigestListing<'_>) -> String {
    let mut output = style.heading(1, "LTAI Daily News");

    if listing.using_fallback {
        output.push_str(&format!(
            "{}\n\n",
            style.italic("Showing sample issues; the digest archive is unavailable.")
        ));
    }

    output.push_str(&format!(
        "Showing {} of {} digests.\n\n",
        listing.digests.len(),
        listing.total
    ));

    if !listing.tags.is_empty() {
        let tags: Vec<String> = listing
            .tags
            .iter()
            .take(TOP_TAGS)
            .map(|t| format!("{} ({})", t.tag, t.count))
            .collect();
        output.push_str(&format!("{} {}\n\n", style.bold("Tags:"), tags.join(", ")));
    }

    if listing.digests.is_empty() {
        output.push_str("No digests match the current filters.\n\n");
    }

    for digest in &listing.digests {
        output.push_str(&generate_digest_card(style, digest));
    }

    output.push_str(&style.footer());
    output
}

/// Generate one archive entry.
fn generate_digest_card(style: Style, digest: &Digest) -> String {
    let mut card = style.heading(2, digest.title());

    card.push_str(&format!(
        "{}\n\n",
        style.italic(&format!(
            "{} · {} · {}",
            digest.kind(),
            date_label(digest),
            digest_meta(digest)
        ))
    ));

    if let Some(summary) = digest.summary() {
        card.push_str(&style.paragraphs(summary));
    }

    if !digest.keywords().is_empty() {
        card.push_str(&format!("Tags: {}\n\n", digest.keywords().join(", ")));
    }

    if let Some(path) = detail_path(digest) {
        card.push_str(&format!("→ {}\n\n", path));
    }

    card
}

fn date_label(digest: &Digest) -> String {
    match digest {
        Digest::Daily(d) => d.publish_date.clone(),
        Digest::Weekly(w) => weekly_dates(w),
        Digest::Mock(m) => m.date.clone(),
    }
}

fn weekly_dates(digest: &WeeklyDigest) -> String {
    if digest.week_end_date.is_empty() {
        format!("week of {}", digest.week_start_date)
    } else {
        format!("{} to {}", digest.week_start_date, digest.week_end_date)
    }
}

fn digest_meta(digest: &Digest) -> String {
    match digest {
        Digest::Daily(d) => daily_meta(d),
        Digest::Weekly(w) => weekly_meta(w),
        Digest::Mock(m) => mock_meta(m),
    }
}

fn daily_meta(digest: &DailyDigest) -> String {
    let minutes = digest
        .content
        .as_ref()
        .and_then(|c| c.stats.as_ref())
        .map_or(0, |s| s.estimated_read_minutes);
    if minutes > 0 {
        format!("{} videos · {} min read", digest.video_count, minutes)
    } else {
        format!("{} videos", digest.video_count)
    }
}

fn weekly_meta(digest: &WeeklyDigest) -> String {
    format!(
        "{} videos · {} days · {} channels",
        digest.total_videos,
        digest.days_with_content,
        digest.channels_included.len()
    )
}

fn mock_meta(issue: &MockIssue) -> String {
    format!("{} sources · {}", issue.source_count, issue.reading_time)
}

/// Site path of a digest's detail page. Sample issues have none.
pub fn detail_path(digest: &Digest) -> Option<String> {
    match digest {
        Digest::Daily(d) => Some(Route::DailyDigest(d.publish_date.clone()).path()),
        Digest::Weekly(w) => Some(Route::WeeklyDigest(w.week_start_date.clone()).path()),
        Digest::Mock(_) => None,
    }
}

/// Generate a full digest page.
pub fn generate_digest_detail(style: Style, digest: &Digest) -> String {
    let mut output = match digest {
        Digest::Daily(d) => generate_daily_detail(style, d),
        Digest::Weekly(w) => generate_weekly_detail(style, w),
        Digest::Mock(m) => generate_mock_detail(style, m),
    };
    output.push_str(&style.footer());
    output
}

fn generate_daily_detail(style: Style, digest: &DailyDigest) -> String {
    let mut output = style.heading(1, &digest.title);
    output.push_str(&format!(
        "{}\n\n",
        style.italic(&format!("{} · {}", digest.publish_date, daily_meta(digest)))
    ));

    if !digest.keywords.is_empty() {
        output.push_str(&format!("Tags: {}\n\n", digest.keywords.join(", ")));
    }

    let Some(ref content) = digest.content else {
        output.push_str("This digest has no content yet.\n\n");
        return output;
    };

    if let Some(ref tldr) = content.daily_tldr {
        output.push_str(&style.heading(2, "TL;DR"));
        output.push_str(&style.paragraphs(tldr));
    }

    output.push_str(&generate_video_sections(style, content));
    output.push_str(&generate_contrarian_corner(style, content));
    output.push_str(&generate_action_items(style, content));
    output.push_str(&generate_daily_references(style, content));

    if let Some(ref conclusion) = content.conclusion {
        output.push_str(&style.heading(2, "Conclusion"));
        output.push_str(&style.paragraphs(conclusion));
    }

    output
}

fn generate_video_sections(style: Style, content: &DailyContent) -> String {
    if content.video_sections.is_empty() {
        return String::new();
    }

    let mut section = style.heading(2, "Videos");
    for video in &content.video_sections {
        section.push_str(&style.heading(3, &video.title));
        section.push_str(&format!("{}\n\n", style.italic(&video.subtitle())));

        let url = video
            .video_url
            .clone()
            .or_else(|| video.video_id.as_deref().map(youtube_url));
        if let Some(url) = url {
            section.push_str(&format!("{}\n\n", style.link("Watch", &url)));
        }

        if !video.speakers.is_empty() {
            section.push_str(&format!(
                "{} {}\n\n",
                style.bold("Speakers:"),
                video.speakers.join(", ")
            ));
        }

        if let Some(ref summary) = video.condensed_summary {
            section.push_str(&style.paragraphs(summary));
        }
        if let Some(ref overview) = video.structure_overview {
            section.push_str(&format!("{} {}\n\n", style.bold("Flow:"), style.inline(overview)));
        }

        for quote in &video.key_quotes {
            section.push_str(&style.quote(&style.inline(quote)));
        }

        if !video.key_statistics.is_empty() {
            for stat in &video.key_statistics {
                // "value: description"
                match stat.split_once(':') {
                    Some((value, description)) => section.push_str(&format!(
                        "- {} {}\n",
                        style.bold(value.trim()),
                        style.inline(description.trim())
                    )),
                    None => section.push_str(&format!("- {}\n", style.inline(stat))),
                }
            }
            section.push('\n');
        }

        if !video.frameworks_mentioned.is_empty() {
            section.push_str(&format!(
                "{} {}\n\n",
                style.bold("Frameworks:"),
                video.frameworks_mentioned.join(", ")
            ));
        }
    }

    section
}

fn generate_contrarian_corner(style: Style, content: &DailyContent) -> String {
    let Some(ref corner) = content.contrarian_corner else {
        return String::new();
    };
    let Some(insight) = corner.insight() else {
        return String::new();
    };

    let mut section = style.heading(2, "Contrarian Corner");
    if let Some(wisdom) = corner.conventional_wisdom() {
        section.push_str(&format!("{} {}\n\n", style.bold("They say:"), style.inline(wisdom)));
    }
    section.push_str(&format!("{} {}\n\n", style.bold("Actually:"), style.inline(insight)));
    if let Some(ref evidence) = corner.evidence {
        section.push_str(&format!("{} {}\n\n", style.bold("Evidence:"), style.inline(evidence)));
    }
    section
}

fn generate_action_items(style: Style, content: &DailyContent) -> String {
    if content.action_items.is_empty() {
        return String::new();
    }

    let mut section = style.heading(2, "Action Items");
    for (i, item) in content.action_items.iter().enumerate() {
        let mut line = format!("{}. {}", i + 1, style.inline(&item.action));
        if let Some(ref difficulty) = item.difficulty {
            line.push_str(&format!(" [{}]", difficulty.replace('-', " ")));
        }
        if let Some(ref source) = item.source_video_title {
            line.push_str(&format!(" (from {})", source));
        }
        section.push_str(&line);
        section.push('\n');
    }
    section.push('\n');
    section
}

fn generate_daily_references(style: Style, content: &DailyContent) -> String {
    let groups: Vec<_> = content
        .references
        .iter()
        .filter(|(_, items)| !items.is_empty())
        .collect();
    if groups.is_empty() {
        return String::new();
    }

    let mut section = style.heading(2, "References");
    for (group, items) in groups {
        section.push_str(&style.heading(3, &reference_group_name(group)));
        for item in items {
            match item.url() {
                Some(url) => section.push_str(&format!("- {}\n", style.link(item.label(), url))),
                None => section.push_str(&format!("- {}\n", item.label())),
            }
        }
        section.push('\n');
    }
    section
}

/// "key_people" becomes "Key people".
fn reference_group_name(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn generate_weekly_detail(style: Style, digest: &WeeklyDigest) -> String {
    let mut output = style.heading(1, &digest.title);
    output.push_str(&format!(
        "{}\n\n",
        style.italic(&format!("{} · {}", weekly_dates(digest), weekly_meta(digest)))
    ));

    if let Some(summary) = digest.summary() {
        output.push_str(&style.paragraphs(summary));
    }

    let Some(ref content) = digest.content else {
        return output;
    };

    output.push_str(&generate_weekly_highlights(style, content));
    output.push_str(&generate_weekly_themes(style, content));
    output.push_str(&generate_videos_by_category(style, content));
    output.push_str(&generate_weekly_references(style, content));

    if let Some(ref note) = content.weekly_note {
        output.push_str(&style.heading(2, "A Note"));
        output.push_str(&style.paragraphs(note));
    }

    output
}

fn generate_weekly_highlights(style: Style, content: &WeeklyContent) -> String {
    let mut section = String::new();

    if let Some(ref one) = content.the_one_thing {
        section.push_str(&style.heading(2, "The One Thing"));
        section.push_str(&format!("{}\n\n", style.bold(&style.inline(&one.headline))));
        if let Some(ref subtext) = one.subtext {
            section.push_str(&style.paragraphs(subtext));
        }
    }

    if let Some(ref quote) = content.quote_of_the_week {
        section.push_str(&style.heading(2, "Quote of the Week"));
        section.push_str(&style.quote(&quote.text));
        if let Some(ref speaker) = quote.speaker {
            section.push_str(&format!("— {}\n\n", speaker));
        }
    }

    if let Some(ref watch) = content.watch_one {
        section.push_str(&style.heading(2, "If You Watch One Thing"));
        let title = match watch.video_id.as_deref() {
            Some(id) => style.link(&watch.title, &youtube_url(id)),
            None => watch.title.clone(),
        };
        section.push_str(&format!("{}\n\n", title));
        let mut meta = Vec::new();
        if let Some(ref channel) = watch.channel {
            meta.push(channel.clone());
        }
        if let Some(minutes) = watch.duration_minutes {
            meta.push(format_duration(minutes));
        }
        if !meta.is_empty() {
            section.push_str(&format!("{}\n\n", style.italic(&meta.join(" · "))));
        }
        if let Some(ref why) = watch.why {
            section.push_str(&format!("{} {}\n\n", style.bold("Why this one:"), style.inline(why)));
        }
    }

    if !content.numbers_that_matter.is_empty() {
        section.push_str(&style.heading(2, "Numbers That Matter"));
        for number in &content.numbers_that_matter {
            section.push_str(&format!(
                "- {} {}\n",
                style.bold(&number.number),
                style.inline(&number.context)
            ));
        }
        section.push('\n');
    }

    if let Some(ref take) = content.contrarian_take {
        section.push_str(&style.heading(2, "Contrarian Take"));
        section.push_str(&format!("{} {}\n\n", style.bold("They say:"), style.inline(&take.conventional)));
        section.push_str(&format!("{} {}\n\n", style.bold("Actually:"), style.inline(&take.actual)));
    }

    if let Some(ref concept) = content.concept_of_the_week {
        section.push_str(&style.heading(2, "Concept of the Week"));
        let term = match concept.full_name {
            Some(ref full) => format!("{} ({})", concept.term, full),
            None => concept.term.clone(),
        };
        section.push_str(&format!("{}\n\n", style.bold(&term)));
        section.push_str(&style.paragraphs(&concept.definition));
    }

    section
}

fn generate_weekly_themes(style: Style, content: &WeeklyContent) -> String {
    if content.themes.is_empty() {
        return String::new();
    }

    let mut section = style.heading(2, "Emerging Themes");
    for theme in &content.themes {
        let mut line = format!("- {}", style.bold(theme.display_name()));
        let mentions = theme.mentions();
        if mentions > 0 {
            line.push_str(&format!(" ({} mentions)", mentions));
        }
        if let Some(ref one_liner) = theme.one_liner {
            line.push_str(&format!(": {}", style.inline(one_liner)));
        }
        section.push_str(&line);
        section.push('\n');
    }
    section.push('\n');
    section
}

fn generate_videos_by_category(style: Style, content: &WeeklyContent) -> String {
    let categories: Vec<_> = content
        .videos_by_category
        .iter()
        .filter(|(_, videos)| !videos.is_empty())
        .collect();
    if categories.is_empty() {
        return String::new();
    }

    let mut section = style.heading(2, "Videos by Category");
    for (category, videos) in categories {
        section.push_str(&style.heading(3, &format!("{} ({})", category, videos.len())));
        for video in videos {
            let title = match video.video_id.as_deref() {
                Some(id) => style.link(&video.title, &youtube_url(id)),
                None => video.title.clone(),
            };
            let mut line = format!("- {}", title);
            if let Some(ref channel) = video.channel {
                line.push_str(&format!(" · {}", channel));
            }
            line.push_str(&format!(
                " · {} video",
                format_duration(video.duration_minutes.unwrap_or(0))
            ));
            section.push_str(&line);
            section.push('\n');
            if let Some(ref one_liner) = video.one_liner {
                section.push_str(&format!("  {}\n", style.inline(one_liner)));
            }
        }
        section.push('\n');
    }
    section
}

fn generate_weekly_references(style: Style, content: &WeeklyContent) -> String {
    if content.weekly_references.is_empty() {
        return String::new();
    }

    let mut section = style.heading(2, "References");
    for (kind, label) in REFERENCE_GROUPS {
        let names: Vec<&str> = content
            .weekly_references
            .iter()
            .filter(|r| {
                let ref_kind = r.reference_type.as_deref().unwrap_or("other");
                let known = REFERENCE_GROUPS.iter().any(|(k, _)| *k == ref_kind);
                ref_kind == kind || (kind == "other" && !known)
            })
            .map(|r| r.name.as_str())
            .collect();

        if names.is_empty() {
            continue;
        }
        section.push_str(&format!("{} {}\n\n", style.bold(&format!("{}:", label)), names.join(", ")));
    }
    section
}

fn generate_mock_detail(style: Style, issue: &MockIssue) -> String {
    let mut output = style.heading(1, &issue.title);
    output.push_str(&format!(
        "{}\n\n",
        style.italic(&format!("{} · {}", issue.date, mock_meta(issue)))
    ));
    output.push_str(&style.paragraphs(&issue.summary));
    if !issue.tags.is_empty() {
        output.push_str(&format!("Tags: {}\n\n", issue.tags.join(", ")));
    }
    output
}

// ---------------------------------------------------------------------------
// Static pages
// ---------------------------------------------------------------------------

/// Generate the library page for one category.
pub fn generate_library(style: Style, category: &str, categories: &[String], books: &[&Book]) -> String {
    let mut output = style.heading(1, "Library");
    output.push_str(&format!(
        "{} {} · {} {}\n\n",
        style.bold("Category:"),
        category,
        style.bold("Categories:"),
        categories.join(", ")
    ));

    if books.is_empty() {
        output.push_str("No books in this category yet.\n\n");
        output.push_str(&style.footer());
        return output;
    }

    match style {
        Style::Markdown => {
            output.push_str("| Title | Author | Year | Category | Status |\n");
            output.push_str("|:---|:---|:---:|:---|:---|\n");
            for book in books {
                output.push_str(&format!(
                    "| {}{} | {} | {} | {} | {} |\n",
                    book.title,
                    if book.is_favorite { " ★" } else { "" },
                    book.author,
                    format_year(book.year),
                    book.category,
                    book.status
                ));
            }
            output.push('\n');
        }
        Style::Text => {
            for book in books {
                let marker = match book.status {
                    BookStatus::Reading => "▶",
                    BookStatus::Read => " ",
                };
                output.push_str(&format!(
                    "{} {}{} by {} ({}) [{}]\n",
                    marker,
                    book.title,
                    if book.is_favorite { " ★" } else { "" },
                    book.author,
                    format_year(book.year),
                    book.category
                ));
            }
            output.push('\n');
        }
    }

    output.push_str(&style.footer());
    output
}

/// Negative years are BCE.
fn format_year(year: i32) -> String {
    if year < 0 {
        format!("{} BC", -year)
    } else {
        year.to_string()
    }
}

/// Generate the events page.
pub fn generate_events(style: Style, events: &Events) -> String {
    let mut output = style.heading(1, "Events");
    output.push_str(&generate_event_list(style, "Upcoming", &events.upcoming));
    output.push_str(&generate_event_list(style, "Past", &events.past));
    output.push_str(&style.footer());
    output
}

fn generate_event_list(style: Style, title: &str, events: &[Event]) -> String {
    let mut section = style.heading(2, title);
    if events.is_empty() {
        section.push_str("Nothing scheduled.\n\n");
        return section;
    }
    for event in events {
        section.push_str(&format!(
            "- {}: {}\n",
            style.link(&event.label, &event.url),
            event.details
        ));
    }
    section.push('\n');
    section
}

/// Generate the social links page.
pub fn generate_links(style: Style, links: &[SocialLink]) -> String {
    let mut output = style.heading(1, "Links");
    for link in links {
        output.push_str(&format!(
            "- {} {}\n",
            style.link(&link.name, &link.url),
            style.italic(&format!("({})", link.category))
        ));
    }
    output.push('\n');
    output.push_str(&style.footer());
    output
}

// ---------------------------------------------------------------------------
// Routes and state
// ---------------------------------------------------------------------------

/// Generate the route resolution listing.
pub fn generate_routes(style: Style, resolutions: &[Resolution], current: &Route) -> String {
    let mut output = style.heading(2, "Routes");
    for r in resolutions {
        output.push_str(&format!(
            "- {} → {} ({}, dock: {})\n",
            r.requested,
            r.path,
            r.title,
            r.view
        ));
    }
    output.push_str(&format!(
        "\n{} {} ({})\n",
        style.bold("Current page:"),
        current.path(),
        current.title()
    ));
    output
}

/// Theme state as shown by the `theme` command.
#[derive(Debug, Clone, Serialize)]
pub struct ThemeReport {
    pub theme: Theme,
    pub spark_color: &'static str,
    pub notification: NotificationState,
}

/// Generate the theme status line.
pub fn generate_theme(style: Style, report: &ThemeReport) -> String {
    let mut output = format!(
        "{} {} (spark {})\n",
        style.bold("Theme:"),
        report.theme,
        report.spark_color
    );
    if report.notification.visible {
        output.push_str(&format!("{}\n", report.notification.message));
    }
    output
}

/// Newsletter badge state.
#[derive(Debug, Clone, Serialize)]
pub struct BadgeReport {
    pub unread: bool,
    pub last_viewed: Option<String>,
}

/// Generate the badge status line.
pub fn generate_badge(style: Style, report: &BadgeReport) -> String {
    let status = if report.unread {
        style.bold("● New digest available")
    } else {
        "No unread digests".to_string()
    };
    match report.last_viewed {
        Some(ref date) => format!("{} (last viewed {})\n", status, date),
        None => format!("{}\n", status),
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Generate a JSON document.
pub fn generate_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}

/// Write a rendered report to a file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}
