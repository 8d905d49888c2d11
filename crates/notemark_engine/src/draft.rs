use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use notemark_logging::{notemark_debug, notemark_warn};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Durable in-progress input. Every key is absent until first written.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    /// Newline-separated URLs not yet imported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_urls_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_mode_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_import_enabled: Option<bool>,
}

impl DraftState {
    pub fn batch_mode(&self) -> bool {
        self.batch_mode_enabled.unwrap_or(false)
    }

    pub fn cover_import(&self) -> bool {
        self.cover_import_enabled.unwrap_or(false)
    }

    pub fn pending_urls(&self) -> &str {
        self.pending_urls_text.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("draft io error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to serialize draft: {0}")]
    Serialize(String),
}

/// Key-value draft storage shared, last-writer-wins, by the editing surface and the importer.
///
/// Calls block on storage IO; async callers run them on the blocking pool.
pub trait DraftStore: Send + Sync {
    fn load(&self) -> Result<DraftState, DraftError>;

    fn save(&self, state: &DraftState) -> Result<(), DraftError>;

    fn set_pending_urls(&self, text: &str) -> Result<(), DraftError> {
        let mut state = self.load()?;
        state.pending_urls_text = Some(text.to_string());
        self.save(&state)
    }

    fn clear_pending_urls(&self) -> Result<(), DraftError> {
        let mut state = self.load()?;
        if state.pending_urls_text.take().is_none() {
            return Ok(());
        }
        self.save(&state)
    }
}

/// Draft kept in a RON file, replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct RonDraftStore {
    path: PathBuf,
}

impl RonDraftStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DraftStore for RonDraftStore {
    fn load(&self) -> Result<DraftState, DraftError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(DraftState::default()),
            Err(err) => return Err(err.into()),
        };
        match ron::from_str(&content) {
            Ok(state) => Ok(state),
            Err(err) => {
                notemark_warn!("Ignoring unreadable draft {:?}: {}", self.path, err);
                Ok(DraftState::default())
            }
        }
    }

    fn save(&self, state: &DraftState) -> Result<(), DraftError> {
        let content = ron::ser::to_string_pretty(state, ron::ser::PrettyConfig::new())
            .map_err(|err| DraftError::Serialize(err.to_string()))?;
        write_atomically(&self.path, &content)?;
        notemark_debug!("Saved draft to {:?}", self.path);
        Ok(())
    }
}

// Temp file in the same directory, then rename over the target.
fn write_atomically(target: &Path, content: &str) -> io::Result<()> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;
    let mut tmp = NamedTempFile::new_in(&dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(target).map_err(|err| err.error)?;
    Ok(())
}

/// Draft held in memory; for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    state: Mutex<DraftState>,
}

impl MemoryDraftStore {
    pub fn new(state: DraftState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn snapshot(&self) -> DraftState {
        self.state
            .lock()
            .map(|state| state.clone())
            .unwrap_or_default()
    }
}

impl DraftStore for MemoryDraftStore {
    fn load(&self) -> Result<DraftState, DraftError> {
        Ok(self.snapshot())
    }

    fn save(&self, state: &DraftState) -> Result<(), DraftError> {
        if let Ok(mut guard) = self.state.lock() {
            *guard = state.clone();
        }
        Ok(())
    }
}
