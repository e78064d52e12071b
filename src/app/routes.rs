//! Site routes and navigation.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;
use tracing::debug;

static DAILY_RE: OnceLock<Regex> = OnceLock::new();
static WEEKLY_RE: OnceLock<Regex> = OnceLock::new();

fn daily_regex() -> &'static Regex {
    DAILY_RE.get_or_init(|| {
        Regex::new(r"^/newsletter/(\d{4}-\d{2}-\d{2})$").expect("daily route pattern is valid")
    })
}

fn weekly_regex() -> &'static Regex {
    WEEKLY_RE.get_or_init(|| {
        Regex::new(r"^/newsletter/weekly/(\d{4}-\d{2}-\d{2})$")
            .expect("weekly route pattern is valid")
    })
}

/// A resolved page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", content = "date", rename_all = "snake_case")]
pub enum Route {
    Home,
    Mission,
    Events,
    Library,
    ShipLog,
    Newsletter,
    /// Daily digest detail, keyed by publish date.
    DailyDigest(String),
    /// Weekly digest detail, keyed by week start date.
    WeeklyDigest(String),
}

impl Route {
    /// Resolves a URL path. Unknown paths resolve to [`Route::Home`].
    pub fn parse(path: &str) -> Self {
        if let Some(caps) = weekly_regex().captures(path) {
            return Route::WeeklyDigest(caps[1].to_string());
        }
        if let Some(caps) = daily_regex().captures(path) {
            return Route::DailyDigest(caps[1].to_string());
        }

        match path {
            "/" => Route::Home,
            "/mission" => Route::Mission,
            "/events" => Route::Events,
            "/library" => Route::Library,
            "/ship-log" => Route::ShipLog,
            "/newsletter" => Route::Newsletter,
            other => {
                debug!("Unknown path {}, resolving to home", other);
                Route::Home
            }
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Mission => "/mission".to_string(),
            Route::Events => "/events".to_string(),
            Route::Library => "/library".to_string(),
            Route::ShipLog => "/ship-log".to_string(),
            Route::Newsletter => "/newsletter".to_string(),
            Route::DailyDigest(date) => format!("/newsletter/{}", date),
            Route::WeeklyDigest(date) => format!("/newsletter/weekly/{}", date),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Mission => "Mission",
            Route::Events => "Events",
            Route::Library => "Library",
            Route::ShipLog => "Ship Log",
            Route::Newsletter => "LTAI Daily News",
            Route::DailyDigest(_) => "Daily Digest",
            Route::WeeklyDigest(_) => "Weekly Digest",
        }
    }
}

/// Dock entry highlighted for a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Home,
    Mission,
    Events,
    Library,
    Newsletter,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            View::Home => "home",
            View::Mission => "mission",
            View::Events => "events",
            View::Library => "library",
            View::Newsletter => "newsletter",
        };
        write!(f, "{}", name)
    }
}

/// The dock view for a path. Every `/newsletter*` path highlights the
/// newsletter; pages without a dock entry highlight home.
pub fn active_view(path: &str) -> View {
    match path {
        "/mission" => View::Mission,
        "/events" => View::Events,
        "/library" => View::Library,
        p if p.starts_with("/newsletter") => View::Newsletter,
        _ => View::Home,
    }
}

/// How a requested path resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub requested: String,
    pub route: Route,
    /// Path of the page actually shown.
    pub path: String,
    pub view: View,
    pub title: &'static str,
}

impl Resolution {
    pub fn resolve(requested: &str) -> Self {
        let route = Route::parse(requested);
        Self {
            requested: requested.to_string(),
            path: route.path(),
            view: active_view(requested),
            title: route.title(),
            route,
        }
    }
}

/// Navigation port.
pub trait Navigator {
    fn navigate(&mut self, path: &str);
    fn current(&self) -> Route;
}

/// Navigator keeping a history stack of visited paths.
#[derive(Debug, Clone)]
pub struct HistoryNavigator {
    history: Vec<String>,
}

impl HistoryNavigator {
    pub fn new(start: &str) -> Self {
        Self {
            history: vec![start.to_string()],
        }
    }

    /// Goes back one entry. Returns false at the start of history.
    pub fn back(&mut self) -> bool {
        if self.history.len() > 1 {
            self.history.pop();
            true
        } else {
            false
        }
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl Default for HistoryNavigator {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&mut self, path: &str) {
        debug!("Navigate to {}", path);
        self.history.push(path.to_string());
    }

    fn current(&self) -> Route {
        self.history
            .last()
            .map_or(Route::Home, |path| Route::parse(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_static_routes() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse("/mission"), Route::Mission);
        assert_eq!(Route::parse("/ship-log"), Route::ShipLog);
        assert_eq!(Route::parse("/newsletter"), Route::Newsletter);
    }

    #[test]
    fn test_parse_digest_routes() {
        assert_eq!(
            Route::parse("/newsletter/2026-01-12"),
            Route::DailyDigest("2026-01-12".to_string())
        );
        assert_eq!(
            Route::parse("/newsletter/weekly/2026-01-05"),
            Route::WeeklyDigest("2026-01-05".to_string())
        );
    }

    #[test]
    fn test_unknown_paths_resolve_home() {
        assert_eq!(Route::parse("/nope"), Route::Home);
        assert_eq!(Route::parse("/newsletter/latest"), Route::Home);
        assert_eq!(Route::parse("/newsletter/2026-1-5"), Route::Home);
    }

    #[test]
    fn test_path_round_trip() {
        for path in ["/", "/events", "/newsletter/2026-01-12", "/newsletter/weekly/2026-01-05"] {
            assert_eq!(Route::parse(path).path(), path);
        }
    }

    #[test]
    fn test_active_view() {
        assert_eq!(active_view("/library"), View::Library);
        assert_eq!(active_view("/newsletter/2026-01-12"), View::Newsletter);
        assert_eq!(active_view("/ship-log"), View::Home);
        assert_eq!(active_view("/whatever"), View::Home);
    }

    #[test]
    fn test_resolution() {
        let r = Resolution::resolve("/newsletter/oops");
        assert_eq!(r.route, Route::Home);
        assert_eq!(r.path, "/");
        assert_eq!(r.view, View::Newsletter);
        assert_eq!(r.title, "Home");
    }

    #[test]
    fn test_history_navigator() {
        let mut nav = HistoryNavigator::default();
        assert_eq!(nav.current(), Route::Home);

        nav.navigate("/newsletter");
        nav.navigate("/newsletter/2026-01-12");
        assert_eq!(nav.current(), Route::DailyDigest("2026-01-12".to_string()));

        assert!(nav.back());
        assert_eq!(nav.current(), Route::Newsletter);
        assert!(nav.back());
        assert!(!nav.back());
        assert_eq!(nav.history(), ["/".to_string()]);
    }
}
