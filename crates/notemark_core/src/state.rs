use crate::policy::is_restricted_url;
use crate::targets::{matches_active_tab, pending_text};
use crate::view_model::{SessionView, StatusMessage};

pub type TabId = u64;

/// The browser tab the user is looking at when the session starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveTab {
    pub id: TabId,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStrategy {
    /// Fetch the page over HTTP and parse its HTML.
    Remote,
    /// Read the rendered DOM of the open tab, falling back to `Remote`.
    InPage { tab_id: TabId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Resolving {
        index: usize,
    },
    Writing {
        index: usize,
    },
    Advancing {
        index: usize,
    },
    Finished,
}

/// Everything a session needs that is fixed for its whole run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionPlan {
    pub targets: Vec<String>,
    /// Already trimmed; `None` when the user left it blank.
    pub caption: Option<String>,
    pub import_cover: bool,
    /// Mirror the remaining list into durable draft storage.
    pub persist_pending: bool,
    pub active_tab: Option<ActiveTab>,
}

impl SessionPlan {
    pub fn with_caption(mut self, caption: &str) -> Self {
        let trimmed = caption.trim();
        self.caption = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }
}

/// Result of one finished session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportSummary {
    pub total: usize,
    pub imported: usize,
    pub failed: Vec<String>,
    pub remaining_text: String,
}

/// In-memory state of one import run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportSession {
    plan: SessionPlan,
    cursor: usize,
    success_count: usize,
    failed_targets: Vec<String>,
    phase: Phase,
    status: Option<StatusMessage>,
    dirty: bool,
}

impl ImportSession {
    pub fn new(plan: SessionPlan) -> Self {
        Self {
            plan,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn targets(&self) -> &[String] {
        &self.plan.targets
    }

    pub fn target(&self, index: usize) -> Option<&str> {
        self.plan.targets.get(index).map(String::as_str)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn success_count(&self) -> usize {
        self.success_count
    }

    pub fn failed_targets(&self) -> &[String] {
        &self.failed_targets
    }

    pub fn caption(&self) -> Option<&str> {
        self.plan.caption.as_deref()
    }

    pub fn import_cover(&self) -> bool {
        self.plan.import_cover
    }

    pub fn persist_pending(&self) -> bool {
        self.plan.persist_pending
    }

    /// Failed-so-far followed by everything after the cursor.
    pub fn remaining_text(&self) -> String {
        let next = (self.cursor + 1).min(self.plan.targets.len());
        let tail = match self.phase {
            Phase::Idle | Phase::Resolving { .. } | Phase::Writing { .. } => {
                &self.plan.targets[self.cursor.min(self.plan.targets.len())..]
            }
            Phase::Advancing { .. } | Phase::Finished => &self.plan.targets[next..],
        };
        pending_text(&self.failed_targets, tail)
    }

    pub fn strategy_for(&self, url: &str) -> ResolveStrategy {
        match &self.plan.active_tab {
            Some(tab) if matches_active_tab(url, &tab.url) && !is_restricted_url(&tab.url) => {
                ResolveStrategy::InPage { tab_id: tab.id }
            }
            _ => ResolveStrategy::Remote,
        }
    }

    pub fn summary(&self) -> ImportSummary {
        ImportSummary {
            total: self.plan.targets.len(),
            imported: self.success_count,
            failed: self.failed_targets.clone(),
            remaining_text: self.remaining_text(),
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            phase: self.phase,
            total: self.plan.targets.len(),
            success_count: self.success_count,
            failed: self.failed_targets.clone(),
            remaining_text: self.remaining_text(),
            status: self.status.clone(),
        }
    }

    /// Returns whether the view changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.dirty = true;
    }

    pub(crate) fn set_status(&mut self, status: StatusMessage) {
        self.status = Some(status);
        self.dirty = true;
    }

    pub(crate) fn record_success(&mut self) {
        self.success_count += 1;
    }

    pub(crate) fn record_failure(&mut self, url: String) {
        self.failed_targets.push(url);
    }

    pub(crate) fn advance_cursor(&mut self) -> usize {
        self.cursor += 1;
        self.cursor
    }
}
