use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use notemark_core::{
    parse_targets, update, DocumentId, Effect, ImportSession, ImportSummary, Msg, SessionPlan,
    StatusMessage, WriteRequest,
};
use notemark_logging::{notemark_error, notemark_info, notemark_warn};

use crate::draft::{DraftError, DraftState, DraftStore};
use crate::in_page::{InPageResolver, TabScripting};
use crate::observer::{ImportEvent, SessionObserver};
use crate::remote::RemoteResolver;
use crate::resolver::MetadataResolver;
use crate::service::{DocumentService, WriteContext, WriteError};
use crate::{CredentialSource, Fetcher, ImportError, ImportSettings};

/// Raw user input for one run, as typed into the form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportRequest {
    pub document_input: String,
    pub urls_text: String,
    pub caption: String,
    pub batch_mode: bool,
    pub import_cover: bool,
}

impl ImportRequest {
    pub fn from_draft(draft: &DraftState) -> Self {
        Self {
            document_input: draft.document_id.clone().unwrap_or_default(),
            urls_text: draft.pending_urls().to_string(),
            caption: draft.pending_caption.clone().unwrap_or_default(),
            batch_mode: draft.batch_mode(),
            import_cover: draft.cover_import(),
        }
    }
}

/// External services the importer talks to.
pub struct Collaborators {
    pub fetcher: Arc<dyn Fetcher>,
    pub tabs: Arc<dyn TabScripting>,
    pub service: Arc<dyn DocumentService>,
    pub credentials: Arc<dyn CredentialSource>,
    pub drafts: Arc<dyn DraftStore>,
}

/// Runs import sessions: targets strictly one at a time, in input order.
pub struct Importer {
    settings: ImportSettings,
    resolver: MetadataResolver,
    tabs: Arc<dyn TabScripting>,
    service: Arc<dyn DocumentService>,
    credentials: Arc<dyn CredentialSource>,
    drafts: Arc<dyn DraftStore>,
    running: AtomicBool,
}

impl Importer {
    pub fn new(settings: ImportSettings, parts: Collaborators) -> Self {
        let remote = RemoteResolver::new(parts.fetcher, settings.favicon_template.clone());
        let in_page = InPageResolver::new(parts.tabs.clone(), settings.favicon_template.clone());
        Self {
            settings,
            resolver: MetadataResolver::new(remote, in_page),
            tabs: parts.tabs,
            service: parts.service,
            credentials: parts.credentials,
            drafts: parts.drafts,
            running: AtomicBool::new(false),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Runs one session. Per-target write failures are reported through the
    /// observer and the summary; only session-level failures return `Err`.
    pub async fn run(
        &self,
        request: ImportRequest,
        observer: &dyn SessionObserver,
    ) -> Result<ImportSummary, ImportError> {
        let _guard = RunGuard::acquire(&self.running)?;
        let result = self.run_session(request, observer).await;
        if let Err(err) = &result {
            notemark_error!("Import aborted: {}", err);
            observer.notify(ImportEvent::Status(StatusMessage::Aborted {
                reason: err.to_string(),
            }));
        }
        result
    }

    async fn run_session(
        &self,
        request: ImportRequest,
        observer: &dyn SessionObserver,
    ) -> Result<ImportSummary, ImportError> {
        let document_id = DocumentId::from_input(&request.document_input)?;

        let active_tab = self.tabs.active_tab().await;
        let mut targets = parse_targets(&request.urls_text);
        if targets.is_empty() {
            if let Some(tab) = &active_tab {
                targets.push(tab.url.clone());
            }
        }
        if targets.is_empty() {
            notemark_info!("Nothing to import");
            return Ok(ImportSummary::default());
        }

        let user_id = self
            .credentials
            .current_user_id()
            .await
            .ok_or(ImportError::NotLoggedIn)?;

        observer.notify(ImportEvent::Status(StatusMessage::Connecting));
        let space_id = self.service.resolve_space_id(&document_id, &user_id).await?;
        notemark_info!(
            "Importing {} target(s) into {} (space {})",
            targets.len(),
            document_id,
            space_id
        );

        let ctx = WriteContext {
            space_id,
            parent_id: document_id,
            user_id,
        };
        let plan = SessionPlan {
            targets,
            import_cover: request.import_cover,
            persist_pending: request.batch_mode,
            active_tab,
            ..SessionPlan::default()
        }
        .with_caption(&request.caption);

        Ok(self.drive(ImportSession::new(plan), &ctx, observer).await)
    }

    async fn drive(
        &self,
        mut session: ImportSession,
        ctx: &WriteContext,
        observer: &dyn SessionObserver,
    ) -> ImportSummary {
        let mut inbox = VecDeque::from([Msg::Start]);
        let mut finished = None;
        let mut last_status = None;

        while let Some(msg) = inbox.pop_front() {
            let (next, effects) = update(session, msg);
            session = next;
            if session.consume_dirty() {
                let status = session.view().status;
                if status != last_status {
                    if let Some(current) = &status {
                        observer.notify(ImportEvent::Status(current.clone()));
                    }
                    last_status = status;
                }
            }

            for effect in effects {
                match effect {
                    Effect::Resolve {
                        index,
                        url,
                        strategy,
                    } => {
                        let metadata = self.resolver.resolve(&url, strategy).await;
                        inbox.push_back(Msg::Resolved { index, metadata });
                    }
                    Effect::Write { index, request } => {
                        match self.write_target(ctx, &request).await {
                            Ok(()) => {
                                observer.notify(ImportEvent::TargetImported {
                                    url: request.url,
                                });
                                inbox.push_back(Msg::WriteSucceeded { index });
                            }
                            Err(err) => {
                                notemark_error!("[{}] write failed: {}", request.url, err);
                                observer.notify(ImportEvent::TargetFailed {
                                    url: request.url,
                                    reason: err.to_string(),
                                });
                                inbox.push_back(Msg::WriteFailed {
                                    index,
                                    reason: err.to_string(),
                                });
                            }
                        }
                    }
                    Effect::UpdateRemaining { text, persist } => {
                        if persist {
                            let pending = text.clone();
                            self.with_drafts("persist pending urls", move |drafts| {
                                drafts.set_pending_urls(&pending)
                            })
                            .await;
                        }
                        observer.notify(ImportEvent::RemainingChanged { text });
                    }
                    Effect::Pause => {
                        tokio::time::sleep(self.settings.pause_between_targets).await;
                        inbox.push_back(Msg::PauseElapsed);
                    }
                    Effect::ClearPending => {
                        self.with_drafts("clear pending urls", |drafts| {
                            drafts.clear_pending_urls()
                        })
                        .await;
                    }
                    Effect::Finished { summary } => {
                        notemark_info!(
                            "Import finished: {}/{} imported, {} failed",
                            summary.imported,
                            summary.total,
                            summary.failed.len()
                        );
                        observer.notify(ImportEvent::Finished(summary.clone()));
                        finished = Some(summary);
                    }
                }
            }
        }

        finished.unwrap_or_else(|| session.summary())
    }

    // Draft stores do blocking file IO, so they run on the blocking pool. Failures are
    // logged and the session carries on.
    async fn with_drafts<F>(&self, action: &str, op: F)
    where
        F: FnOnce(&dyn DraftStore) -> Result<(), DraftError> + Send + 'static,
    {
        let drafts = Arc::clone(&self.drafts);
        match tokio::task::spawn_blocking(move || op(drafts.as_ref())).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => notemark_warn!("Failed to {}: {}", action, err),
            Err(err) => notemark_warn!("Failed to {}: draft task ended: {}", action, err),
        }
    }

    async fn write_target(
        &self,
        ctx: &WriteContext,
        request: &WriteRequest,
    ) -> Result<(), WriteError> {
        if let Some(cover) = request.cover_image.as_deref() {
            self.service.create_image_block(ctx, cover).await?;
        }
        self.service
            .create_bookmark_block(ctx, &request.metadata, &request.url, request.caption.as_deref())
            .await
    }
}

/// Holds the re-entry flag for the duration of one run.
struct RunGuard<'a>(&'a AtomicBool);

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, ImportError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ImportError::AlreadyRunning)?;
        Ok(Self(flag))
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
