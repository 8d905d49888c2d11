use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use notemark_core::{ActiveTab, TabId};
use notemark_engine::{
    decode_html, snapshot_from_html, NoTabs, PageSnapshot, ScriptError, TabScripting,
};
use notemark_logging::notemark_debug;

use crate::cli::TabArgs;

const ACTIVE_TAB_ID: TabId = 1;

/// Picks the tab seam for a run: a page given on the command line, or no browser at all.
pub fn tab_scripting(args: &TabArgs) -> Arc<dyn TabScripting> {
    let active_url = args
        .active_tab_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty());
    match active_url {
        Some(url) => Arc::new(SnapshotTabs::new(
            url.to_string(),
            args.active_tab_snapshot.clone(),
        )),
        None => Arc::new(NoTabs),
    }
}

/// Stands in for the browser: one active page, optionally with its rendered DOM saved to disk.
#[derive(Debug, Clone)]
pub struct SnapshotTabs {
    active_url: String,
    snapshot: Option<PathBuf>,
}

impl SnapshotTabs {
    pub fn new(active_url: String, snapshot: Option<PathBuf>) -> Self {
        Self {
            active_url,
            snapshot,
        }
    }
}

#[async_trait]
impl TabScripting for SnapshotTabs {
    async fn active_tab(&self) -> Option<ActiveTab> {
        Some(ActiveTab {
            id: ACTIVE_TAB_ID,
            url: self.active_url.clone(),
        })
    }

    async fn extract_page(&self, tab_id: TabId) -> Result<Option<PageSnapshot>, ScriptError> {
        if tab_id != ACTIVE_TAB_ID {
            return Err(ScriptError::Execution(format!("no tab with id {tab_id}")));
        }
        let Some(path) = &self.snapshot else {
            return Ok(None);
        };
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|err| ScriptError::Execution(format!("cannot read {path:?}: {err}")))?;
        let decoded = decode_html(&bytes, None);
        notemark_debug!(
            "Read page snapshot {:?} ({} bytes, {})",
            path,
            bytes.len(),
            decoded.encoding_label
        );
        Ok(Some(snapshot_from_html(&decoded.html)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn args(url: Option<&str>, snapshot: Option<PathBuf>) -> TabArgs {
        TabArgs {
            active_tab_url: url.map(str::to_string),
            active_tab_snapshot: snapshot,
        }
    }

    #[tokio::test]
    async fn reads_rendered_snapshot() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("page.html");
        std::fs::write(
            &path,
            r#"<html><head><meta property="og:title" content="Rendered"></head></html>"#,
        )
        .unwrap();

        let tabs = tab_scripting(&args(Some(" https://x.com/a "), Some(path)));
        let tab = tabs.active_tab().await.unwrap();
        assert_eq!(tab.url, "https://x.com/a");

        let snapshot = tabs.extract_page(tab.id).await.unwrap().unwrap();
        assert_eq!(snapshot.head.og_title.as_deref(), Some("Rendered"));
    }

    #[tokio::test]
    async fn missing_snapshot_yields_no_result() {
        let tabs = tab_scripting(&args(Some("https://example.com"), None));
        assert_eq!(tabs.extract_page(ACTIVE_TAB_ID).await, Ok(None));
    }

    #[tokio::test]
    async fn unreadable_snapshot_is_a_script_error() {
        let temp = TempDir::new().unwrap();
        let tabs = tab_scripting(&args(
            Some("https://example.com"),
            Some(temp.path().join("absent.html")),
        ));
        assert!(matches!(
            tabs.extract_page(ACTIVE_TAB_ID).await,
            Err(ScriptError::Execution(_))
        ));
    }

    #[tokio::test]
    async fn without_active_page_there_is_no_browser() {
        for tabs in [
            tab_scripting(&args(None, None)),
            tab_scripting(&args(Some("  "), None)),
        ] {
            assert_eq!(tabs.active_tab().await, None);
            assert_eq!(
                tabs.extract_page(ACTIVE_TAB_ID).await,
                Err(ScriptError::NoResult)
            );
        }
    }
}
