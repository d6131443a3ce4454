//! Shareable links: maps prompt ids to human-readable URL fragments and back.
//!
//! Fragments look like `#/prompt/<slug>-<id>[/category/<id>][/action/<name>]`.

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

const MAX_SLUG_LEN: usize = 50;

static SLUG_STRIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s-]").expect("slug pattern is valid"));
static SLUG_SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("slug pattern is valid"));
static SLUG_DASHES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-+").expect("slug pattern is valid"));
/// Trailing UUID or run of at least ten digits at the end of a slug segment.
static TRAILING_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:^|-)([0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}|\d{10,})$",
    )
    .expect("id pattern is valid")
});

/// What the linked view should do with the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAction {
    View,
    Edit,
    Customize,
    Other(String),
}

impl FromStr for RouteAction {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "view" => RouteAction::View,
            "edit" => RouteAction::Edit,
            "customize" => RouteAction::Customize,
            other => RouteAction::Other(other.to_string()),
        })
    }
}

impl fmt::Display for RouteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteAction::View => f.write_str("view"),
            RouteAction::Edit => f.write_str("edit"),
            RouteAction::Customize => f.write_str("customize"),
            RouteAction::Other(s) => f.write_str(s),
        }
    }
}

/// Parsed location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Prompt {
        prompt_id: String,
        slug: String,
        category_id: Option<String>,
        action: Option<RouteAction>,
    },
    Unknown(String),
}

/// Optional decorations of a prompt link.
#[derive(Debug, Clone, Default)]
pub struct LinkHints<'a> {
    pub title: Option<&'a str>,
    pub purpose: Option<&'a str>,
    pub category_id: Option<&'a str>,
    pub action: Option<RouteAction>,
}

/// Builds and parses prompt links relative to a base URL.
#[derive(Debug, Clone)]
pub struct UrlRouter {
    base_url: String,
}

impl UrlRouter {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Fragment (including the leading `#`) for a prompt.
    pub fn prompt_fragment(&self, prompt_id: &str, hints: &LinkHints<'_>) -> String {
        let mut url = String::from("#/prompt/");
        match hints.title.filter(|t| !t.is_empty()).or(hints.purpose) {
            Some(text) if !text.is_empty() => {
                url.push_str(&create_slug(text));
                url.push('-');
                url.push_str(prompt_id);
            }
            _ => url.push_str(prompt_id),
        }
        if let Some(category_id) = hints.category_id {
            url.push_str("/category/");
            url.push_str(category_id);
        }
        if let Some(action) = &hints.action {
            url.push_str("/action/");
            url.push_str(&action.to_string());
        }
        url
    }

    /// Absolute link for sharing.
    pub fn shareable_url(&self, prompt_id: &str, hints: &LinkHints<'_>) -> String {
        format!("{}{}", self.base_url, self.prompt_fragment(prompt_id, hints))
    }

    /// Parses a fragment, a full URL, or a bare `/prompt/...` path.
    pub fn parse(&self, location: &str) -> Route {
        let fragment = match location.split_once('#') {
            Some((_, hash)) => hash,
            None => location,
        };
        if fragment.is_empty() {
            return Route::Home;
        }

        let parts: Vec<&str> = fragment.split('/').filter(|p| !p.is_empty()).collect();
        match parts.as_slice() {
            ["prompt", slug, rest @ ..] => {
                let mut category_id = None;
                let mut action = None;
                for pair in rest.chunks(2) {
                    match pair {
                        ["category", id] => category_id = Some(id.to_string()),
                        ["action", name] => action = name.parse().ok(),
                        _ => {}
                    }
                }
                Route::Prompt {
                    prompt_id: extract_prompt_id(slug),
                    slug: slug.to_string(),
                    category_id,
                    action,
                }
            }
            [] => Route::Home,
            _ => Route::Unknown(fragment.to_string()),
        }
    }
}

/// Lowercase, dash-separated, ASCII-only slug of at most 50 characters.
pub fn create_slug(text: &str) -> String {
    let lower = text.to_lowercase();
    let stripped = SLUG_STRIP.replace_all(&lower, "");
    let dashed = SLUG_SPACES.replace_all(&stripped, "-");
    let collapsed = SLUG_DASHES.replace_all(&dashed, "-");
    collapsed
        .trim_matches('-')
        .chars()
        .take(MAX_SLUG_LEN)
        .collect()
}

/// Recovers the id from `slug-id`; the whole segment when no id is recognized.
pub fn extract_prompt_id(segment: &str) -> String {
    TRAILING_ID
        .captures(segment)
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "3f2b8c1e-4a5d-4e6f-9a7b-1c2d3e4f5a6b";

    fn router() -> UrlRouter {
        UrlRouter::new("https://prompts.example.com/")
    }

    #[test]
    fn slugs_are_url_safe() {
        assert_eq!(create_slug("  Hello, World!  Again "), "hello-world-again");
        assert_eq!(create_slug("a -- b"), "a-b");
        assert_eq!(create_slug("Café & Crème"), "caf-crme");
        assert_eq!(create_slug(&"x".repeat(80)).len(), 50);
    }

    #[test]
    fn fragment_includes_slug_and_hints() {
        let hints = LinkHints {
            title: Some("Blog Post Writer"),
            category_id: Some("cat-1"),
            ..LinkHints::default()
        };
        assert_eq!(
            router().prompt_fragment(ID, &hints),
            format!("#/prompt/blog-post-writer-{}/category/cat-1", ID)
        );
        assert_eq!(
            router().prompt_fragment("42", &LinkHints::default()),
            "#/prompt/42"
        );
    }

    #[test]
    fn purpose_is_used_when_title_missing() {
        let hints = LinkHints {
            purpose: Some("Summarize notes"),
            action: Some(RouteAction::Customize),
            ..LinkHints::default()
        };
        assert_eq!(
            router().prompt_fragment("1700000000000", &hints),
            "#/prompt/summarize-notes-1700000000000/action/customize"
        );
    }

    #[test]
    fn parses_generated_links_back() {
        let r = router();
        let hints = LinkHints {
            title: Some("Code Review"),
            action: Some(RouteAction::Edit),
            ..LinkHints::default()
        };
        let url = r.shareable_url(ID, &hints);
        assert_eq!(
            r.parse(&url),
            Route::Prompt {
                prompt_id: ID.to_string(),
                slug: format!("code-review-{}", ID),
                category_id: None,
                action: Some(RouteAction::Edit),
            }
        );
    }

    #[test]
    fn category_and_action_survive_a_round_trip() {
        let r = router();
        let hints = LinkHints {
            title: Some("Daily Standup"),
            category_id: Some("cat-1"),
            action: Some(RouteAction::Customize),
            ..LinkHints::default()
        };
        let url = r.shareable_url("1712345678901", &hints);
        assert!(url.ends_with("/category/cat-1/action/customize"));
        assert_eq!(
            r.parse(&url),
            Route::Prompt {
                prompt_id: "1712345678901".to_string(),
                slug: "daily-standup-1712345678901".to_string(),
                category_id: Some("cat-1".to_string()),
                action: Some(RouteAction::Customize),
            }
        );
    }

    #[test]
    fn recognizes_timestamp_ids_and_falls_back() {
        assert_eq!(extract_prompt_id("my-title-1712345678901"), "1712345678901");
        assert_eq!(extract_prompt_id("1712345678901"), "1712345678901");
        assert_eq!(extract_prompt_id(ID), ID);
        assert_eq!(extract_prompt_id("custom-slug"), "custom-slug");
    }

    #[test]
    fn empty_and_foreign_fragments() {
        let r = router();
        assert_eq!(r.parse(""), Route::Home);
        assert_eq!(r.parse("https://prompts.example.com/#"), Route::Home);
        assert_eq!(r.parse("#/settings"), Route::Unknown("/settings".into()));
    }

    #[test]
    fn category_hint_is_parsed() {
        match router().parse("#/prompt/abc/category/cat-7") {
            Route::Prompt {
                prompt_id,
                category_id,
                action,
                ..
            } => {
                assert_eq!(prompt_id, "abc");
                assert_eq!(category_id.as_deref(), Some("cat-7"));
                assert_eq!(action, None);
            }
            other => panic!("unexpected route {:?}", other),
        }
    }
}
