use crate::{ImportSummary, PageMetadata, ResolveStrategy};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Resolve {
        index: usize,
        url: String,
        strategy: ResolveStrategy,
    },
    Write {
        index: usize,
        request: WriteRequest,
    },
    /// Remaining input changed; `persist` asks for a durable draft write too.
    UpdateRemaining { text: String, persist: bool },
    /// Sleep for the courtesy delay, then send `Msg::PauseElapsed`.
    Pause,
    /// Drop the pending list from the draft store.
    ClearPending,
    Finished { summary: ImportSummary },
}

/// Blocks to create for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRequest {
    pub url: String,
    pub metadata: PageMetadata,
    pub caption: Option<String>,
    /// Prepend a standalone image block with the cover.
    pub cover_image: Option<String>,
}
