//! Inline markdown rendering for digest text.
//!
//! Handles a deliberately small subset: `**bold**`, `*italic*` and
//! `[text](url)` links. Bold and italic spans are rendered recursively so
//! links can live inside them. Link targets of the form `#video-<id>` are
//! rewritten to YouTube watch URLs. Anything that does not match passes
//! through as literal text; there are no headings, lists, code spans or
//! escapes.

use regex::{Captures, Regex};
use serde::Serialize;
use std::sync::OnceLock;

/// Bold is tried before italic so `**` is never read as two italics.
const INLINE_PATTERN: &str = r"(\*\*(.+?)\*\*)|(\*(.+?)\*)|(\[([^\]]+)\]\(([^)]+)\))";

const VIDEO_ANCHOR_PREFIX: &str = "#video-";
const YOUTUBE_WATCH_URL: &str = "https://youtube.com/watch?v=";

static INLINE_RE: OnceLock<Regex> = OnceLock::new();

fn inline_regex() -> &'static Regex {
    INLINE_RE.get_or_init(|| Regex::new(INLINE_PATTERN).expect("inline markdown pattern is valid"))
}

/// A styled piece of inline text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Fragment {
    Text(String),
    Bold(Vec<Fragment>),
    Italic(Vec<Fragment>),
    Link { href: String, text: String },
}

impl Fragment {
    fn text(s: &str) -> Self {
        Fragment::Text(s.to_string())
    }
}

/// Renders one line of inline markdown into fragments.
///
/// Empty input yields no fragments.
pub fn render_markdown(text: &str) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    let mut last = 0;

    for caps in inline_regex().captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };

        if whole.start() > last {
            fragments.push(Fragment::text(&text[last..whole.start()]));
        }
        fragments.push(fragment_from_captures(&caps));
        last = whole.end();
    }

    if last < text.len() {
        fragments.push(Fragment::text(&text[last..]));
    }

    fragments
}

fn fragment_from_captures(caps: &Captures<'_>) -> Fragment {
    if let Some(inner) = caps.get(2) {
        Fragment::Bold(render_markdown(inner.as_str()))
    } else if let Some(inner) = caps.get(4) {
        Fragment::Italic(render_markdown(inner.as_str()))
    } else {
        let text = caps.get(6).map_or("", |m| m.as_str());
        let href = caps.get(7).map_or("", |m| m.as_str());
        Fragment::Link {
            href: resolve_href(href),
            text: text.to_string(),
        }
    }
}

/// Rewrites `#video-<id>` anchors to YouTube watch URLs.
pub fn resolve_href(href: &str) -> String {
    match href.strip_prefix(VIDEO_ANCHOR_PREFIX) {
        Some(video_id) => format!("{}{}", YOUTUBE_WATCH_URL, video_id),
        None => href.to_string(),
    }
}

/// Splits text on blank lines and renders each trimmed paragraph.
pub fn render_paragraphs(text: &str) -> Vec<Vec<Fragment>> {
    static PARAGRAPH_BREAK: OnceLock<Regex> = OnceLock::new();
    let breaks = PARAGRAPH_BREAK
        .get_or_init(|| Regex::new(r"\n\n+").expect("paragraph break pattern is valid"));

    if text.is_empty() {
        return Vec::new();
    }

    breaks
        .split(text)
        .map(|para| render_markdown(para.trim()))
        .collect()
}

/// Flattens fragments to terminal text. Links print as `text (href)`.
pub fn to_plain(fragments: &[Fragment]) -> String {
    let mut out = String::new();
    for fragment in fragments {
        match fragment {
            Fragment::Text(s) => out.push_str(s),
            Fragment::Bold(children) | Fragment::Italic(children) => {
                out.push_str(&to_plain(children))
            }
            Fragment::Link { href, text } => {
                out.push_str(&format!("{} ({})", text, href));
            }
        }
    }
    out
}

/// Writes fragments back out as markdown with resolved link targets.
pub fn to_markdown(fragments: &[Fragment]) -> String {
    let mut out = String::new();
    for fragment in fragments {
        match fragment {
            Fragment::Text(s) => out.push_str(s),
            Fragment::Bold(children) => out.push_str(&format!("**{}**", to_markdown(children))),
            Fragment::Italic(children) => out.push_str(&format!("*{}*", to_markdown(children))),
            Fragment::Link { href, text } => out.push_str(&format!("[{}]({})", text, href)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Fragment {
        Fragment::Text(s.to_string())
    }

    #[test]
    fn test_bold_and_italic() {
        let fragments = render_markdown("**a** and *b*");
        assert_eq!(
            fragments,
            vec![
                Fragment::Bold(vec![text("a")]),
                text(" and "),
                Fragment::Italic(vec![text("b")]),
            ]
        );
    }

    #[test]
    fn test_video_link_rewrite() {
        let fragments = render_markdown("[t](#video-123)");
        assert_eq!(
            fragments,
            vec![Fragment::Link {
                href: "https://youtube.com/watch?v=123".to_string(),
                text: "t".to_string(),
            }]
        );
    }

    #[test]
    fn test_plain_link_kept() {
        let fragments = render_markdown("see [docs](https://example.com/a) now");
        assert_eq!(fragments.len(), 3);
        assert_eq!(
            fragments[1],
            Fragment::Link {
                href: "https://example.com/a".to_string(),
                text: "docs".to_string(),
            }
        );
        assert_eq!(fragments[2], text(" now"));
    }

    #[test]
    fn test_link_nested_in_bold() {
        let fragments = render_markdown("**watch [this](#video-abc)**");
        assert_eq!(
            fragments,
            vec![Fragment::Bold(vec![
                text("watch "),
                Fragment::Link {
                    href: "https://youtube.com/watch?v=abc".to_string(),
                    text: "this".to_string(),
                },
            ])]
        );
    }

    #[test]
    fn test_unterminated_markers_pass_through() {
        assert_eq!(render_markdown("**open"), vec![text("**open")]);
        assert_eq!(render_markdown("[x](missing"), vec![text("[x](missing")]);
    }

    #[test]
    fn test_double_star_is_bold_not_italic() {
        let fragments = render_markdown("**x**");
        assert!(matches!(fragments[0], Fragment::Bold(_)));
    }

    #[test]
    fn test_empty_input() {
        assert!(render_markdown("").is_empty());
        assert!(render_paragraphs("").is_empty());
    }

    #[test]
    fn test_render_paragraphs() {
        let paras = render_paragraphs("first *one*\n\n\n  second  ");
        assert_eq!(paras.len(), 2);
        assert_eq!(paras[0][1], Fragment::Italic(vec![text("one")]));
        assert_eq!(paras[1], vec![text("second")]);
    }

    #[test]
    fn test_to_plain_and_markdown() {
        let fragments = render_markdown("**big** [v](#video-9)");
        assert_eq!(to_plain(&fragments), "big v (https://youtube.com/watch?v=9)");
        assert_eq!(
            to_markdown(&fragments),
            "**big** [v](https://youtube.com/watch?v=9)"
        );
    }
}
