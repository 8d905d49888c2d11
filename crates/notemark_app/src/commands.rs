use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use notemark_core::append_unique;
use notemark_engine::{
    Collaborators, DraftState, DraftStore, ImportRequest, ImportSettings, Importer, NotionClient,
    ReqwestFetcher, RonDraftStore, ServiceSettings, StaticCredentials,
};
use notemark_logging::{notemark_info, notemark_warn};

use crate::cli::{Cli, Command, DraftCommand, DraftSetArgs, ImportArgs};
use crate::progress::ConsoleProgress;
use crate::tabs::tab_scripting;

pub async fn run(cli: Cli) -> Result<()> {
    let store = RonDraftStore::new(cli.draft);
    match cli.command {
        Command::Import(args) => import(store, args).await,
        Command::Draft(command) => draft(&store, command),
    }
}

async fn import(store: RonDraftStore, args: ImportArgs) -> Result<()> {
    let listed = listed_urls(&args.urls, args.urls_file.as_deref()).await?;
    let loaded = store.load().context("failed to load draft")?;
    let (draft, request) = prepare_import(loaded.clone(), &args, listed);
    if draft != loaded {
        store.save(&draft).context("failed to save draft")?;
    }

    let settings = ImportSettings {
        pause_between_targets: Duration::from_millis(args.pause_ms),
        ..ImportSettings::default()
    };
    let fetcher =
        ReqwestFetcher::new(settings.fetch.clone()).context("failed to build HTTP client")?;
    let service = NotionClient::new(ServiceSettings {
        api_base: args.service.api_base.clone(),
        session_token: args.service.session_token.clone(),
        ..ServiceSettings::default()
    })
    .context("failed to build document service client")?;

    let importer = Importer::new(
        settings,
        Collaborators {
            fetcher: Arc::new(fetcher),
            tabs: tab_scripting(&args.tab),
            service: Arc::new(service),
            credentials: Arc::new(StaticCredentials::new(args.service.user_id.clone())),
            drafts: Arc::new(store),
        },
    );

    let summary = importer.run(request, &ConsoleProgress).await?;
    if summary.total == 0 {
        println!("Nothing to import.");
        return Ok(());
    }
    if !summary.failed.is_empty() {
        bail!(
            "{} of {} target(s) failed and were kept",
            summary.failed.len(),
            summary.total
        );
    }
    Ok(())
}

/// URLs given on the command line, flags first then the file, one per line.
async fn listed_urls(urls: &[String], file: Option<&Path>) -> Result<Option<String>> {
    let mut lines: Vec<String> = urls.to_vec();
    if let Some(path) = file {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {path:?}"))?;
        lines.push(text);
    }
    if lines.is_empty() {
        return Ok(None);
    }
    Ok(Some(lines.join("\n")))
}

/// Merges flags over the draft the way the form does: typed fields are mirrored
/// into the draft, and the pending list only survives in batch mode.
fn prepare_import(
    mut draft: DraftState,
    args: &ImportArgs,
    listed: Option<String>,
) -> (DraftState, ImportRequest) {
    if let Some(document) = &args.document {
        draft.document_id = Some(document.clone());
    }
    if let Some(caption) = &args.caption {
        draft.pending_caption = Some(caption.clone());
    }

    let batch_mode = args.batch || draft.batch_mode();
    let urls_text = if batch_mode {
        match listed {
            Some(text) => {
                draft.pending_urls_text = Some(text.clone());
                text
            }
            None => draft.pending_urls().to_string(),
        }
    } else {
        draft.pending_urls_text = None;
        listed
            .or_else(|| args.tab.active_tab_url.clone())
            .unwrap_or_default()
    };

    let request = ImportRequest {
        urls_text,
        batch_mode,
        import_cover: args.cover || draft.cover_import(),
        ..ImportRequest::from_draft(&draft)
    };
    (draft, request)
}

fn draft(store: &RonDraftStore, command: DraftCommand) -> Result<()> {
    match command {
        DraftCommand::Show => {
            let state = store.load().context("failed to load draft")?;
            let text = ron::ser::to_string_pretty(&state, ron::ser::PrettyConfig::new())
                .context("failed to format draft")?;
            println!("{text}");
        }
        DraftCommand::Clear => {
            store
                .clear_pending_urls()
                .context("failed to clear pending urls")?;
            notemark_info!("Cleared pending urls in {:?}", store.path());
        }
        DraftCommand::AddCurrent { active_tab_url } => {
            let mut state = store.load().context("failed to load draft")?;
            let pending = append_unique(state.pending_urls(), active_tab_url.trim());
            println!("{pending}");
            state.pending_urls_text = Some(pending);
            store.save(&state).context("failed to save draft")?;
        }
        DraftCommand::Set(args) => {
            let state = store.load().context("failed to load draft")?;
            let state = apply_draft_set(state, &args);
            store.save(&state).context("failed to save draft")?;
        }
    }
    Ok(())
}

fn apply_draft_set(mut state: DraftState, args: &DraftSetArgs) -> DraftState {
    if let Some(document) = &args.document {
        state.document_id = Some(document.clone());
    }
    if let Some(caption) = &args.caption {
        state.pending_caption = Some(caption.clone());
    }
    if let Some(cover) = args.cover {
        state.cover_import_enabled = Some(cover);
    }
    if let Some(batch) = args.batch {
        state.batch_mode_enabled = Some(batch);
        if !batch {
            state.pending_urls_text = None;
        }
    }
    if !args.urls.is_empty() {
        if state.batch_mode() {
            state.pending_urls_text = Some(args.urls.join("\n"));
        } else {
            notemark_warn!("Pending urls are only kept in batch mode; ignoring --url");
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::TabArgs;
    use pretty_assertions::assert_eq;

    fn batch_draft() -> DraftState {
        DraftState {
            document_id: Some("0123456789abcdef0123456789abcdef".into()),
            pending_urls_text: Some("https://saved.test".into()),
            pending_caption: Some("saved caption".into()),
            batch_mode_enabled: Some(true),
            ..DraftState::default()
        }
    }

    #[test]
    fn batch_import_resumes_pending_list() {
        let (draft, request) = prepare_import(batch_draft(), &ImportArgs::default(), None);
        assert_eq!(draft, batch_draft());
        assert_eq!(
            request,
            ImportRequest {
                document_input: "0123456789abcdef0123456789abcdef".into(),
                urls_text: "https://saved.test".into(),
                caption: "saved caption".into(),
                batch_mode: true,
                import_cover: false,
            }
        );
    }

    #[test]
    fn batch_import_mirrors_listed_urls() {
        let listed = Some("https://a.test\nhttps://b.test".to_string());
        let (draft, request) = prepare_import(batch_draft(), &ImportArgs::default(), listed);
        assert_eq!(
            draft.pending_urls_text.as_deref(),
            Some("https://a.test\nhttps://b.test")
        );
        assert_eq!(request.urls_text, "https://a.test\nhttps://b.test");
    }

    #[test]
    fn default_mode_uses_active_tab_and_drops_pending() {
        let args = ImportArgs {
            caption: Some("note".into()),
            tab: TabArgs {
                active_tab_url: Some("https://open.test/page".into()),
                active_tab_snapshot: None,
            },
            ..ImportArgs::default()
        };
        let draft = DraftState {
            batch_mode_enabled: Some(false),
            ..batch_draft()
        };
        let (draft, request) = prepare_import(draft, &args, None);
        assert_eq!(draft.pending_urls_text, None);
        assert_eq!(draft.pending_caption.as_deref(), Some("note"));
        assert_eq!(request.urls_text, "https://open.test/page");
        assert!(!request.batch_mode);
    }

    #[test]
    fn batch_flag_overrides_draft_toggle() {
        let args = ImportArgs {
            batch: true,
            cover: true,
            ..ImportArgs::default()
        };
        let (_, request) = prepare_import(DraftState::default(), &args, None);
        assert!(request.batch_mode);
        assert!(request.import_cover);
        assert_eq!(request.urls_text, "");
    }

    #[test]
    fn draft_set_ignores_urls_outside_batch_mode() {
        let args = DraftSetArgs {
            document: Some("doc".into()),
            urls: vec!["https://a.test".into()],
            ..DraftSetArgs::default()
        };
        let state = apply_draft_set(DraftState::default(), &args);
        assert_eq!(state.document_id.as_deref(), Some("doc"));
        assert_eq!(state.pending_urls_text, None);
    }

    #[test]
    fn turning_batch_off_discards_pending() {
        let args = DraftSetArgs {
            batch: Some(false),
            ..DraftSetArgs::default()
        };
        let state = apply_draft_set(batch_draft(), &args);
        assert_eq!(state.batch_mode_enabled, Some(false));
        assert_eq!(state.pending_urls_text, None);
        assert_eq!(state.pending_caption.as_deref(), Some("saved caption"));
    }

    #[test]
    fn draft_set_stores_urls_in_batch_mode() {
        let args = DraftSetArgs {
            batch: Some(true),
            cover: Some(true),
            urls: vec!["https://a.test".into(), "https://b.test".into()],
            ..DraftSetArgs::default()
        };
        let state = apply_draft_set(DraftState::default(), &args);
        assert_eq!(
            state.pending_urls_text.as_deref(),
            Some("https://a.test\nhttps://b.test")
        );
        assert_eq!(state.cover_import_enabled, Some(true));
    }
}
