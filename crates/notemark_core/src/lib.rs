//! Notemark core: identifiers, platform policy and the pure import session state machine.
mod effect;
mod identifier;
mod metadata;
mod msg;
pub mod policy;
mod state;
mod targets;
mod update;
mod view_model;

pub use effect::{Effect, WriteRequest};
pub use identifier::{
    extract_identifier, generate_identifier, normalize_to_hyphenated, DocumentId, IdentifierError,
};
pub use metadata::{
    finalize_metadata, truncate_chars, MetadataCandidates, PageMetadata, SNIPPET_MAX_CHARS,
};
pub use msg::Msg;
pub use state::{
    ActiveTab, ImportSession, ImportSummary, Phase, ResolveStrategy, SessionPlan, TabId,
};
pub use targets::{append_unique, matches_active_tab, parse_targets, pending_text};
pub use update::update;
pub use view_model::{SessionView, StatusMessage, STATUS_TITLE_CHARS};
