//! Ship log aggregation and statistics.
//!
//! Pure functions that turn the flat list of per-day entries into
//! display-ready statistics: daily totals, heatmap intensity levels,
//! per-year calendar grids, week-over-week deltas and month totals.
//!
//! Weeks always start on Sunday. Year and month filters match string
//! prefixes of the zero-padded `YYYY-MM-DD` dates.

use crate::models::{Platform, ShipLogEntry};
use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Level reported for grid cells that fall outside the requested year.
pub const OUT_OF_YEAR_LEVEL: i8 = -1;

/// Minimum number of week rows in a year grid.
pub const MIN_GRID_WEEKS: usize = 52;

/// Total and intensity for a single day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayStat {
    pub date: String,
    pub total: u32,
    pub level: u8,
}

/// Per-platform totals for one year.
#[derive(Debug, Clone, Serialize)]
pub struct YearStats {
    pub totals: BTreeMap<Platform, u32>,
    pub total: u32,
    /// Entries of the year, in input order.
    pub entries: Vec<ShipLogEntry>,
}

/// Posts this week against the week before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekOverWeekChange {
    pub this_week: u32,
    pub last_week: u32,
    pub percent_change: i64,
}

/// One day in a year heatmap grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridCell {
    pub date: String,
    pub total: u32,
    /// Intensity 0-4, or [`OUT_OF_YEAR_LEVEL`] for padding days.
    pub level: i8,
    /// 0 = Sunday.
    pub day_of_week: u8,
    pub is_in_year: bool,
    pub notes: Vec<String>,
}

/// One week row (Sunday to Saturday) of a year grid.
pub type GridWeek = [GridCell; 7];

/// One day of the current-week strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekDay {
    pub date: String,
    /// 0 = Sunday.
    pub day_of_week: u8,
    pub total: u32,
    pub level: u8,
    pub notes: Vec<String>,
    pub is_today: bool,
}

/// The latest day that had any posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentActivity {
    pub date: String,
    pub total: u32,
    pub notes: Vec<String>,
}

/// Everything the ship log view shows, computed for one reference day.
#[derive(Debug, Clone, Serialize)]
pub struct ShipLogSummary {
    pub today: String,
    pub years: Vec<String>,
    pub all_time_total: u32,
    pub month_total: u32,
    pub week_over_week: WeekOverWeekChange,
    pub current_week: [WeekDay; 7],
    pub most_recent: Option<RecentActivity>,
}

impl ShipLogSummary {
    /// Builds the summary for `today`.
    pub fn build(log: &[ShipLogEntry], today: NaiveDate) -> Self {
        Self {
            today: format_date(today),
            years: years_in_log(log),
            all_time_total: all_time_total(log),
            month_total: month_total(log, today.year(), today.month0()),
            week_over_week: week_over_week_change(log, today),
            current_week: current_week_entries(log, today),
            most_recent: most_recent_activity(log),
        }
    }
}

/// Sum of all platform counts for one day; 0 when there is no entry.
pub fn day_total(entry: Option<&ShipLogEntry>) -> u32 {
    entry.map_or(0, |e| Platform::ALL.iter().map(|p| e.count(*p)).sum())
}

/// Heatmap intensity bucket (0-4) for a day total.
pub fn intensity_level(total: u32) -> u8 {
    match total {
        0 => 0,
        1..=2 => 1,
        3..=4 => 2,
        5..=7 => 3,
        _ => 4,
    }
}

/// Total and intensity for one entry.
pub fn day_stat(entry: &ShipLogEntry) -> DayStat {
    let total = day_total(Some(entry));
    DayStat {
        date: entry.date.clone(),
        total,
        level: intensity_level(total),
    }
}

/// Per-platform and grand totals for entries whose date starts with `year`.
pub fn year_stats(log: &[ShipLogEntry], year: &str) -> YearStats {
    let entries: Vec<ShipLogEntry> = log
        .iter()
        .filter(|e| e.date.starts_with(year))
        .cloned()
        .collect();

    let mut totals: BTreeMap<Platform, u32> = Platform::ALL.iter().map(|p| (*p, 0)).collect();
    for entry in &entries {
        for platform in Platform::ALL {
            *totals.entry(platform).or_default() += entry.count(platform);
        }
    }

    let total = totals.values().sum();
    YearStats {
        totals,
        total,
        entries,
    }
}

/// Compares the Sunday-anchored week containing `today` with the week before.
pub fn week_over_week_change(log: &[ShipLogEntry], today: NaiveDate) -> WeekOverWeekChange {
    let by_date = index_by_date(log);
    let this_week_start = week_start(today);
    let last_week_start = this_week_start - Duration::days(7);

    let this_week = window_total(&by_date, this_week_start);
    let last_week = window_total(&by_date, last_week_start);

    let percent_change = if last_week > 0 {
        let ratio = (this_week as f64 - last_week as f64) / last_week as f64;
        round_half_up(ratio * 100.0)
    } else if this_week > 0 {
        100
    } else {
        0
    };

    WeekOverWeekChange {
        this_week,
        last_week,
        percent_change,
    }
}

/// Builds the heatmap calendar for `year`.
///
/// Rows start on the Sunday on or before January 1 and continue until
/// December 31 is covered, with at least [`MIN_GRID_WEEKS`] rows. Days
/// outside the year are padding and carry [`OUT_OF_YEAR_LEVEL`].
pub fn generate_year_grid(year: i32, entries: &[ShipLogEntry]) -> Vec<GridWeek> {
    let (Some(jan_first), Some(dec_last)) = (
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    ) else {
        return Vec::new();
    };

    let by_date = index_by_date(entries);
    let mut weeks: Vec<GridWeek> = Vec::with_capacity(MIN_GRID_WEEKS + 2);
    let mut current = week_start(jan_first);

    while current <= dec_last || weeks.len() <= MIN_GRID_WEEKS {
        let start = current;
        let week: GridWeek = std::array::from_fn(|offset| {
            let date = start + Duration::days(offset as i64);
            let key = format_date(date);
            let entry = by_date.get(key.as_str()).copied();
            let total = day_total(entry);
            let is_in_year = date.year() == year;

            GridCell {
                level: if is_in_year {
                    intensity_level(total) as i8
                } else {
                    OUT_OF_YEAR_LEVEL
                },
                date: key,
                total,
                day_of_week: offset as u8,
                is_in_year,
                notes: entry.map(|e| e.notes.clone()).unwrap_or_default(),
            }
        });
        weeks.push(week);
        current = start + Duration::days(7);

        if current.year() > year && weeks.len() >= MIN_GRID_WEEKS {
            break;
        }
    }

    weeks
}

/// Distinct years in the log, newest first.
///
/// An empty log yields the current calendar year.
pub fn years_in_log(log: &[ShipLogEntry]) -> Vec<String> {
    if log.is_empty() {
        return vec![Local::now().year().to_string()];
    }

    let years: BTreeSet<&str> = log
        .iter()
        .map(|e| e.date.get(..4).unwrap_or(e.date.as_str()))
        .collect();

    years.into_iter().rev().map(String::from).collect()
}

/// Total posts across the whole log.
pub fn all_time_total(log: &[ShipLogEntry]) -> u32 {
    log.iter().map(|e| day_total(Some(e))).sum()
}

/// The Sunday-to-Saturday strip for the week containing `today`.
pub fn current_week_entries(log: &[ShipLogEntry], today: NaiveDate) -> [WeekDay; 7] {
    let by_date = index_by_date(log);
    let start = week_start(today);
    let today_key = format_date(today);

    std::array::from_fn(|offset| {
        let key = format_date(start + Duration::days(offset as i64));
        let entry = by_date.get(key.as_str()).copied();
        let total = day_total(entry);

        WeekDay {
            is_today: key == today_key,
            date: key,
            day_of_week: offset as u8,
            total,
            level: intensity_level(total),
            notes: entry.map(|e| e.notes.clone()).unwrap_or_default(),
        }
    })
}

/// Total posts in one month. `month0` is zero-based (0 = January).
pub fn month_total(log: &[ShipLogEntry], year: i32, month0: u32) -> u32 {
    let prefix = format!("{}-{:02}", year, month0 + 1);
    log.iter()
        .filter(|e| e.date.starts_with(&prefix))
        .map(|e| day_total(Some(e)))
        .sum()
}

/// The latest entry, by date, that has at least one post.
pub fn most_recent_activity(log: &[ShipLogEntry]) -> Option<RecentActivity> {
    let mut sorted: Vec<&ShipLogEntry> = log.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    sorted
        .into_iter()
        .find(|e| day_total(Some(*e)) > 0)
        .map(|e| RecentActivity {
            date: e.date.clone(),
            total: day_total(Some(e)),
            notes: e.notes.clone(),
        })
}

/// Most recent Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

/// Formats a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn index_by_date(log: &[ShipLogEntry]) -> HashMap<&str, &ShipLogEntry> {
    log.iter().map(|e| (e.date.as_str(), e)).collect()
}

fn window_total(by_date: &HashMap<&str, &ShipLogEntry>, start: NaiveDate) -> u32 {
    (0..7)
        .map(|offset| {
            let key = format_date(start + Duration::days(offset));
            day_total(by_date.get(key.as_str()).copied())
        })
        .sum()
}

// Halves round toward positive infinity: 2.5 -> 3, -2.5 -> -2.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn entry(d: &str, linkedin: u32, x: u32) -> ShipLogEntry {
        ShipLogEntry::new(d)
            .with(Platform::Linkedin, linkedin)
            .with(Platform::X, x)
    }

    #[test]
    fn test_day_total_sums_all_platforms() {
        let e = ShipLogEntry::new("2026-01-05")
            .with(Platform::Linkedin, 1)
            .with(Platform::X, 2)
            .with(Platform::Tiktok, 3)
            .with(Platform::Youtube, 4)
            .with(Platform::Substack, 5)
            .with(Platform::Shorts, 6);
        assert_eq!(day_total(Some(&e)), 21);
        assert_eq!(day_total(None), 0);
    }

    #[test]
    fn test_intensity_level_boundaries() {
        assert_eq!(intensity_level(0), 0);
        assert_eq!(intensity_level(1), 1);
        assert_eq!(intensity_level(2), 1);
        assert_eq!(intensity_level(3), 2);
        assert_eq!(intensity_level(4), 2);
        assert_eq!(intensity_level(5), 3);
        assert_eq!(intensity_level(7), 3);
        assert_eq!(intensity_level(8), 4);
        assert_eq!(intensity_level(100), 4);
    }

    #[test]
    fn test_day_stat() {
        let stat = day_stat(&entry("2026-02-01", 2, 1));
        assert_eq!(
            stat,
            DayStat {
                date: "2026-02-01".to_string(),
                total: 3,
                level: 2
            }
        );
    }

    #[test]
    fn test_year_stats_filters_by_prefix() {
        let log = vec![
            entry("2025-12-31", 5, 0),
            entry("2026-01-01", 1, 2),
            entry("2026-03-10", 0, 4),
        ];
        let stats = year_stats(&log, "2026");

        assert_eq!(stats.entries.len(), 2);
        assert_eq!(stats.entries[0].date, "2026-01-01");
        assert_eq!(stats.entries[1].date, "2026-03-10");
        assert_eq!(stats.totals[&Platform::Linkedin], 1);
        assert_eq!(stats.totals[&Platform::X], 6);
        assert_eq!(stats.totals[&Platform::Shorts], 0);
        assert_eq!(stats.total, 7);
        assert_eq!(stats.total, stats.totals.values().sum::<u32>());
    }

    #[test]
    fn test_year_stats_empty_year_has_all_platforms() {
        let stats = year_stats(&[], "2030");
        assert_eq!(stats.totals.len(), 6);
        assert_eq!(stats.total, 0);
        assert!(stats.entries.is_empty());
    }

    #[test]
    fn test_week_start_is_sunday() {
        // 2026-01-07 is a Wednesday.
        assert_eq!(week_start(date("2026-01-07")), date("2026-01-04"));
        assert_eq!(week_start(date("2026-01-04")), date("2026-01-04"));
        assert_eq!(week_start(date("2026-01-10")), date("2026-01-04"));
    }

    #[test]
    fn test_week_over_week_doubling() {
        // This week: Sun 2026-01-04 .. Sat 2026-01-10. Last week: 2025-12-28 .. 2026-01-03.
        let log = vec![
            entry("2026-01-04", 4, 0),
            entry("2026-01-08", 0, 6),
            entry("2025-12-28", 2, 0),
            entry("2026-01-03", 0, 3),
            entry("2025-12-27", 50, 0),
        ];
        let wow = week_over_week_change(&log, date("2026-01-08"));
        assert_eq!(wow.this_week, 10);
        assert_eq!(wow.last_week, 5);
        assert_eq!(wow.percent_change, 100);
    }

    #[test]
    fn test_week_over_week_no_last_week() {
        let log = vec![entry("2026-01-05", 1, 0)];
        let wow = week_over_week_change(&log, date("2026-01-06"));
        assert_eq!(wow.last_week, 0);
        assert_eq!(wow.percent_change, 100);

        let wow = week_over_week_change(&[], date("2026-01-06"));
        assert_eq!(wow.this_week, 0);
        assert_eq!(wow.percent_change, 0);
    }

    #[test]
    fn test_week_over_week_decline_rounds() {
        let log = vec![entry("2025-12-29", 3, 0), entry("2026-01-05", 1, 0)];
        let wow = week_over_week_change(&log, date("2026-01-05"));
        // (1 - 3) / 3 = -66.67%
        assert_eq!(wow.percent_change, -67);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-66.6), -67);
    }

    #[test]
    fn test_year_grid_shape_and_continuity() {
        for year in [2024, 2025, 2026, 2027, 2028] {
            let grid = generate_year_grid(year, &[]);
            assert!(grid.len() >= MIN_GRID_WEEKS, "year {}", year);

            let dates: Vec<NaiveDate> = grid.iter().flatten().map(|c| date(&c.date)).collect();
            for pair in dates.windows(2) {
                assert_eq!(pair[1] - pair[0], Duration::days(1));
            }

            assert_eq!(dates[0].weekday().num_days_from_sunday(), 0);
            assert!(dates.contains(&NaiveDate::from_ymd_opt(year, 1, 1).unwrap()));
            assert!(dates.contains(&NaiveDate::from_ymd_opt(year, 12, 31).unwrap()));
        }
    }

    #[test]
    fn test_year_grid_levels() {
        // 2026-01-01 is a Thursday, so the grid opens with 2025-12-28.
        let entries = vec![entry("2026-01-02", 8, 0), entry("2025-12-29", 3, 0)];
        let grid = generate_year_grid(2026, &entries);

        let first = &grid[0];
        assert_eq!(first[0].date, "2025-12-28");
        assert!(!first[1].is_in_year);
        assert_eq!(first[1].total, 3);
        assert_eq!(first[1].level, OUT_OF_YEAR_LEVEL);
        assert!(first[4].is_in_year);
        assert_eq!(first[4].level, 0);
        assert_eq!(first[5].date, "2026-01-02");
        assert_eq!(first[5].level, 4);
        assert_eq!(first[5].day_of_week, 5);
    }

    #[test]
    fn test_year_grid_notes_carry_over() {
        let mut e = entry("2026-06-15", 1, 0);
        e.notes = vec!["linkedin: launch post".to_string()];
        let grid = generate_year_grid(2026, &[e]);
        let cell = grid
            .iter()
            .flatten()
            .find(|c| c.date == "2026-06-15")
            .unwrap();
        assert_eq!(cell.notes, vec!["linkedin: launch post".to_string()]);
    }

    #[test]
    fn test_years_in_log() {
        let log = vec![
            entry("2025-11-01", 1, 0),
            entry("2026-01-01", 1, 0),
            entry("2025-12-01", 1, 0),
        ];
        assert_eq!(years_in_log(&log), vec!["2026", "2025"]);
        assert_eq!(years_in_log(&[]), vec![Local::now().year().to_string()]);
    }

    #[test]
    fn test_all_time_and_month_totals() {
        let log = vec![
            entry("2026-01-05", 1, 1),
            entry("2026-01-20", 2, 0),
            entry("2026-02-01", 0, 4),
        ];
        assert_eq!(all_time_total(&log), 8);
        assert_eq!(month_total(&log, 2026, 0), 4);
        assert_eq!(month_total(&log, 2026, 1), 4);
        assert_eq!(month_total(&log, 2026, 11), 0);
    }

    #[test]
    fn test_current_week_entries() {
        let log = vec![entry("2026-01-06", 2, 0)];
        let week = current_week_entries(&log, date("2026-01-07"));

        assert_eq!(week[0].date, "2026-01-04");
        assert_eq!(week[6].date, "2026-01-10");
        assert_eq!(week[2].total, 2);
        assert_eq!(week[2].level, 1);
        assert!(week[3].is_today);
        assert_eq!(week.iter().filter(|d| d.is_today).count(), 1);
    }

    #[test]
    fn test_most_recent_activity_skips_empty_days() {
        let log = vec![
            entry("2026-01-03", 1, 0),
            entry("2026-01-09", 0, 0),
            entry("2026-01-05", 0, 2),
        ];
        let recent = most_recent_activity(&log).unwrap();
        assert_eq!(recent.date, "2026-01-05");
        assert_eq!(recent.total, 2);

        assert!(most_recent_activity(&[entry("2026-01-01", 0, 0)]).is_none());
    }

    #[test]
    fn test_summary_build() {
        let log = vec![entry("2026-01-05", 1, 0)];
        let summary = ShipLogSummary::build(&log, date("2026-01-06"));
        assert_eq!(summary.today, "2026-01-06");
        assert_eq!(summary.years, vec!["2026"]);
        assert_eq!(summary.all_time_total, 1);
        assert_eq!(summary.month_total, 1);
        assert_eq!(summary.week_over_week.this_week, 1);
    }
}
