use notemark_core::IdentifierError;

use crate::WriteError;

/// Failures that abort a whole session before or instead of any per-target work.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("invalid document id: {0}")]
    InvalidDocumentId(#[from] IdentifierError),
    #[error("not logged in to the document service")]
    NotLoggedIn,
    #[error("cannot read document {document_id}; check the id")]
    DocumentNotFound { document_id: String },
    #[error("an import is already running")]
    AlreadyRunning,
    #[error("document service error: {0}")]
    Service(WriteError),
}

impl From<WriteError> for ImportError {
    fn from(err: WriteError) -> Self {
        match err {
            WriteError::SpaceNotFound { document_id } => {
                ImportError::DocumentNotFound { document_id }
            }
            other => ImportError::Service(other),
        }
    }
}
