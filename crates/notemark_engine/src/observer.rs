use notemark_core::{ImportSummary, StatusMessage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportEvent {
    Status(StatusMessage),
    /// The pending input now reads `text`.
    RemainingChanged { text: String },
    TargetImported { url: String },
    TargetFailed { url: String, reason: String },
    Finished(ImportSummary),
}

/// Receives session progress; the surrounding UI mirrors its fields from these events.
pub trait SessionObserver: Send + Sync {
    fn notify(&self, event: ImportEvent);
}
