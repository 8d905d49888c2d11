use std::fmt;

use crate::Phase;

/// Characters of the title echoed in the "writing" status line.
pub const STATUS_TITLE_CHARS: usize = 10;

/// Short per-phase status line shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Connecting,
    Analysing { position: usize, total: usize },
    ReadingScreen { position: usize, total: usize },
    Writing { position: usize, total: usize, title: String },
    WriteFailedKept { position: usize, total: usize },
    Done { imported: usize },
    Aborted { reason: String },
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusMessage::Connecting => write!(f, "connecting to document service..."),
            StatusMessage::Analysing { position, total } => {
                write!(f, "[{position}/{total}] analysing page...")
            }
            StatusMessage::ReadingScreen { position, total } => {
                write!(f, "[{position}/{total}] reading screen data...")
            }
            StatusMessage::Writing {
                position,
                total,
                title,
            } => write!(f, "[{position}/{total}] writing: {title}..."),
            StatusMessage::WriteFailedKept { position, total } => {
                write!(f, "[{position}/{total}] write failed, link kept")
            }
            StatusMessage::Done { imported } => write!(f, "done, imported {imported}"),
            StatusMessage::Aborted { reason } => write!(f, "failed: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionView {
    pub phase: Phase,
    pub total: usize,
    pub success_count: usize,
    pub failed: Vec<String>,
    pub remaining_text: String,
    pub status: Option<StatusMessage>,
}

impl SessionView {
    /// Status line as rendered, empty before the session starts.
    pub fn status_line(&self) -> String {
        self.status
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }
}
