use crate::PageMetadata;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Import trigger pressed; starts with the first target.
    Start,
    /// Metadata for the target at `index` is ready.
    Resolved {
        index: usize,
        metadata: PageMetadata,
    },
    /// Every block for the target at `index` was written.
    WriteSucceeded { index: usize },
    /// The write sink rejected a transaction for the target at `index`.
    WriteFailed { index: usize, reason: String },
    /// The courtesy delay after a target has elapsed.
    PauseElapsed,
}
