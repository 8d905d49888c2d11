//! Notemark engine: metadata resolution, document-service writes and session execution.
mod credentials;
mod decode;
mod draft;
mod error;
mod extract;
mod fetch;
mod importer;
mod in_page;
mod observer;
pub mod payload;
mod remote;
mod resolver;
mod service;
mod settings;
mod types;

pub use credentials::{CredentialSource, StaticCredentials};
pub use decode::{decode_html, DecodedHtml};
pub use draft::{DraftError, DraftState, DraftStore, MemoryDraftStore, RonDraftStore};
pub use error::ImportError;
pub use extract::{extract_head_metadata, snapshot_from_html, HeadMetadata, PageSnapshot};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use importer::{Collaborators, ImportRequest, Importer};
pub use in_page::{
    metadata_from_snapshot, InPageOutcome, InPageResolver, NoTabs, ScriptError, TabScripting,
};
pub use observer::{ImportEvent, SessionObserver};
pub use remote::RemoteResolver;
pub use resolver::MetadataResolver;
pub use service::{DocumentService, NotionClient, WriteContext, WriteError, USER_HEADER};
pub use settings::{ImportSettings, ServiceSettings, DEFAULT_API_BASE};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};
