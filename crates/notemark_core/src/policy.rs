//! Per-platform content policy.
//!
//! Every resolver consults the single [`PLATFORM_RULES`] table, so cover
//! suppression and title cleanup cannot drift between strategies.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Default favicon lookup; `{domain}` is replaced with the target's hostname.
pub const DEFAULT_FAVICON_TEMPLATE: &str =
    "https://www.google.com/s2/favicons?domain={domain}&sz=64";

static UNREAD_BADGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\(\d+\)\s*").expect("badge pattern compiles"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformRule {
    pub name: &'static str,
    /// Matched against the host exactly or as a parent domain.
    pub domains: &'static [&'static str],
    /// og:image is a placeholder, an avatar or a video thumbnail.
    pub suppress_cover: bool,
    /// Tab titles carry a leading "(N)" unread counter.
    pub strip_unread_badge: bool,
    /// Pages embed a `VideoObject` in ld+json with a better description.
    pub video_structured_data: bool,
}

pub const PLATFORM_RULES: &[PlatformRule] = &[
    PlatformRule {
        name: "x",
        domains: &["x.com", "twitter.com"],
        suppress_cover: true,
        strip_unread_badge: true,
        video_structured_data: false,
    },
    PlatformRule {
        name: "youtube",
        domains: &["youtube.com", "youtu.be"],
        suppress_cover: true,
        strip_unread_badge: false,
        video_structured_data: true,
    },
    PlatformRule {
        name: "bilibili",
        domains: &["bilibili.com"],
        suppress_cover: true,
        strip_unread_badge: false,
        video_structured_data: false,
    },
];

const RESTRICTED_SCHEMES: &[&str] = &[
    "about",
    "chrome",
    "chrome-extension",
    "chrome-search",
    "chrome-untrusted",
    "devtools",
    "edge",
    "file",
    "moz-extension",
    "view-source",
];

/// Looks up the platform rule for `url`, if its host is on the table.
pub fn platform_for(url: &str) -> Option<&'static PlatformRule> {
    let host = host_of(url)?;
    PLATFORM_RULES.iter().find(|rule| {
        rule.domains
            .iter()
            .any(|domain| host == *domain || host.ends_with(&format!(".{domain}")))
    })
}

pub fn is_cover_suppressed(url: &str) -> bool {
    platform_for(url).is_some_and(|rule| rule.suppress_cover)
}

pub fn wants_video_structured_data(url: &str) -> bool {
    platform_for(url).is_some_and(|rule| rule.video_structured_data)
}

/// Removes a leading "(12) " unread badge on platforms that bake it into titles.
pub fn clean_title(url: &str, title: &str) -> String {
    match platform_for(url) {
        Some(rule) if rule.strip_unread_badge => UNREAD_BADGE.replace(title, "").into_owned(),
        _ => title.to_string(),
    }
}

/// Browser-internal surfaces where page scripts cannot run.
pub fn is_restricted_url(url: &str) -> bool {
    let Some((scheme, _)) = url.trim().split_once(':') else {
        return false;
    };
    let scheme = scheme.to_ascii_lowercase();
    RESTRICTED_SCHEMES.contains(&scheme.as_str())
}

/// Accepts only absolute http(s) image URLs.
pub fn is_absolute_http_url(candidate: &str) -> bool {
    Url::parse(candidate)
        .map(|parsed| matches!(parsed.scheme(), "http" | "https") && parsed.host().is_some())
        .unwrap_or(false)
}

/// Favicon service URL keyed by the target's hostname; `None` when the URL has no host.
pub fn favicon_url(url: &str, template: &str) -> Option<String> {
    let host = host_of(url)?;
    Some(template.replace("{domain}", &host))
}

fn host_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    parsed.host_str().map(|host| host.to_ascii_lowercase())
}
