use std::sync::Arc;

use notemark_core::policy::{is_restricted_url, wants_video_structured_data};
use notemark_core::{
    finalize_metadata, truncate_chars, ActiveTab, PageMetadata, TabId, SNIPPET_MAX_CHARS,
};
use serde_json::Value;

use crate::extract::PageSnapshot;
use crate::remote::candidates_from_head;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("page scripts are not allowed on {0}")]
    Restricted(String),
    #[error("page script returned no result")]
    NoResult,
    #[error("page script failed: {0}")]
    Execution(String),
}

/// Page-level access to the browser: the active tab and read-only script execution in it.
#[async_trait::async_trait]
pub trait TabScripting: Send + Sync {
    async fn active_tab(&self) -> Option<ActiveTab>;

    /// Runs the extraction script in `tab_id`. `Ok(None)` means the script produced nothing.
    async fn extract_page(&self, tab_id: TabId) -> Result<Option<PageSnapshot>, ScriptError>;
}

/// A browser with no tabs; every target goes through the remote strategy.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTabs;

#[async_trait::async_trait]
impl TabScripting for NoTabs {
    async fn active_tab(&self) -> Option<ActiveTab> {
        None
    }

    async fn extract_page(&self, _tab_id: TabId) -> Result<Option<PageSnapshot>, ScriptError> {
        Err(ScriptError::NoResult)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InPageOutcome {
    Ok(PageMetadata),
    FallbackRequired(ScriptError),
}

/// Strategy P: read the live DOM of the open tab.
#[derive(Clone)]
pub struct InPageResolver {
    tabs: Arc<dyn TabScripting>,
    favicon_template: String,
}

impl InPageResolver {
    pub fn new(tabs: Arc<dyn TabScripting>, favicon_template: impl Into<String>) -> Self {
        Self {
            tabs,
            favicon_template: favicon_template.into(),
        }
    }

    pub async fn resolve(&self, tab_id: TabId, url: &str) -> InPageOutcome {
        if is_restricted_url(url) {
            return InPageOutcome::FallbackRequired(ScriptError::Restricted(url.to_string()));
        }
        match self.tabs.extract_page(tab_id).await {
            Ok(Some(snapshot)) => {
                InPageOutcome::Ok(metadata_from_snapshot(url, snapshot, &self.favicon_template))
            }
            Ok(None) => InPageOutcome::FallbackRequired(ScriptError::NoResult),
            Err(err) => InPageOutcome::FallbackRequired(err),
        }
    }
}

pub fn metadata_from_snapshot(
    url: &str,
    snapshot: PageSnapshot,
    favicon_template: &str,
) -> PageMetadata {
    let mut candidates = candidates_from_head(snapshot.head);

    if wants_video_structured_data(url) {
        if let Some(description) = video_description(&snapshot.structured_data) {
            candidates.description = Some(description);
        }
    }

    let has_description = candidates
        .description
        .as_deref()
        .is_some_and(|d| !d.trim().is_empty());
    if !has_description {
        candidates.description = snapshot
            .article_text
            .map(|text| truncate_chars(&text, SNIPPET_MAX_CHARS));
    }

    finalize_metadata(url, candidates, favicon_template)
}

/// Description of the last `VideoObject` found across the ld+json blocks.
fn video_description(blocks: &[String]) -> Option<String> {
    blocks
        .iter()
        .filter_map(|block| serde_json::from_str::<Value>(block).ok())
        .filter_map(|json| match json {
            Value::Array(items) => items.into_iter().find(is_video_object),
            other if is_video_object(&other) => Some(other),
            _ => None,
        })
        .filter_map(|video| {
            video
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .filter(|description| !description.trim().is_empty())
        .last()
}

fn is_video_object(value: &Value) -> bool {
    value.get("@type").and_then(Value::as_str) == Some("VideoObject")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::HeadMetadata;
    use notemark_core::policy::DEFAULT_FAVICON_TEMPLATE;

    fn snapshot(head: HeadMetadata) -> PageSnapshot {
        PageSnapshot {
            head,
            ..PageSnapshot::default()
        }
    }

    #[test]
    fn article_text_fills_missing_description() {
        let mut snap = snapshot(HeadMetadata {
            title: Some("(2) Someone on X".into()),
            ..HeadMetadata::default()
        });
        snap.article_text = Some("x".repeat(300));
        let meta = metadata_from_snapshot(
            "https://x.com/someone/status/1",
            snap,
            DEFAULT_FAVICON_TEMPLATE,
        );
        assert_eq!(meta.title.as_deref(), Some("Someone on X"));
        assert_eq!(
            meta.description.map(|d| d.chars().count()),
            Some(SNIPPET_MAX_CHARS)
        );
    }

    #[test]
    fn video_object_description_is_preferred_on_video_platform() {
        let mut snap = snapshot(HeadMetadata {
            og_description: Some("short og text".into()),
            og_image: Some("https://i.ytimg.com/vi/1/hq.jpg".into()),
            ..HeadMetadata::default()
        });
        snap.structured_data = vec![
            "not json".into(),
            r#"[{"@type":"Person"},{"@type":"VideoObject","description":"full video description"}]"#.into(),
        ];
        let meta = metadata_from_snapshot(
            "https://www.youtube.com/watch?v=1",
            snap,
            DEFAULT_FAVICON_TEMPLATE,
        );
        assert_eq!(meta.description.as_deref(), Some("full video description"));
        assert_eq!(meta.cover, None);
    }

    #[test]
    fn structured_data_ignored_elsewhere() {
        let mut snap = snapshot(HeadMetadata {
            og_description: Some("og text".into()),
            ..HeadMetadata::default()
        });
        snap.structured_data = vec![r#"{"@type":"VideoObject","description":"video"}"#.into()];
        let meta = metadata_from_snapshot("https://example.com/v", snap, DEFAULT_FAVICON_TEMPLATE);
        assert_eq!(meta.description.as_deref(), Some("og text"));
    }
}
