use crate::policy::{clean_title, favicon_url, is_absolute_http_url, is_cover_suppressed};

/// Longest article snippet used as a description fallback, in characters.
pub const SNIPPET_MAX_CHARS: usize = 200;

/// Resolved bookmark metadata for one target. `cover` is either a usable
/// absolute image URL or `None`, never an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub cover: Option<String>,
    pub icon: Option<String>,
}

impl PageMetadata {
    /// What a failed remote fetch degrades to: the URL as title, nothing else.
    pub fn degraded(url: &str) -> Self {
        Self {
            title: Some(url.to_string()),
            ..Self::default()
        }
    }

    /// Title as shown on the bookmark, falling back to the URL.
    pub fn display_title<'a>(&'a self, url: &'a str) -> &'a str {
        self.title.as_deref().unwrap_or(url)
    }
}

/// Raw values as read from a page, before any policy is applied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MetadataCandidates {
    pub title: Option<String>,
    pub description: Option<String>,
    pub cover: Option<String>,
}

/// Applies the shared post-processing both resolvers go through: empty values
/// become absent, titles are cleaned, covers are checked against the scheme
/// rule and the suppression table, and the favicon is derived from the host.
pub fn finalize_metadata(
    url: &str,
    candidates: MetadataCandidates,
    favicon_template: &str,
) -> PageMetadata {
    let title = non_empty(candidates.title).map(|title| clean_title(url, &title));
    let description = non_empty(candidates.description);
    let cover = non_empty(candidates.cover)
        .filter(|cover| is_absolute_http_url(cover))
        .filter(|_| !is_cover_suppressed(url));

    PageMetadata {
        title,
        description,
        cover,
        icon: favicon_url(url, favicon_template),
    }
}

/// Cuts `text` to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::DEFAULT_FAVICON_TEMPLATE;

    #[test]
    fn empty_values_become_absent() {
        let meta = finalize_metadata(
            "https://example.com/a",
            MetadataCandidates {
                title: Some("  ".into()),
                description: Some(String::new()),
                cover: Some(String::new()),
            },
            DEFAULT_FAVICON_TEMPLATE,
        );
        assert_eq!(meta.title, None);
        assert_eq!(meta.description, None);
        assert_eq!(meta.cover, None);
        assert!(meta.icon.is_some());
    }

    #[test]
    fn relative_cover_is_dropped() {
        let meta = finalize_metadata(
            "https://example.com/a",
            MetadataCandidates {
                cover: Some("/img/cover.png".into()),
                ..MetadataCandidates::default()
            },
            DEFAULT_FAVICON_TEMPLATE,
        );
        assert_eq!(meta.cover, None);
    }

    #[test]
    fn suppressed_platform_never_keeps_cover() {
        let meta = finalize_metadata(
            "https://www.youtube.com/watch?v=1",
            MetadataCandidates {
                title: Some("Video".into()),
                cover: Some("https://i.ytimg.com/vi/1/maxres.jpg".into()),
                ..MetadataCandidates::default()
            },
            DEFAULT_FAVICON_TEMPLATE,
        );
        assert_eq!(meta.cover, None);
        assert_eq!(meta.title.as_deref(), Some("Video"));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo wörld", 4), "héll");
        assert_eq!(truncate_chars("short", 200), "short");
    }

    #[test]
    fn degraded_record_only_has_title() {
        let meta = PageMetadata::degraded("https://example.com");
        assert_eq!(meta.title.as_deref(), Some("https://example.com"));
        assert_eq!(meta.description, None);
        assert_eq!(meta.cover, None);
        assert_eq!(meta.icon, None);
    }
}
