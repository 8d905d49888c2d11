use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

static IDENTIFIER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)([a-f0-9]{32}|[a-f0-9]{8}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{12})",
    )
    .expect("identifier pattern compiles")
});

const COMPACT_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    #[error("no document identifier found in input")]
    NotFound,
    #[error("malformed identifier {value:?}: expected 32 hex characters")]
    Malformed { value: String },
}

/// Returns the first compact or hyphenated 128-bit identifier in `input`,
/// with hyphens stripped.
pub fn extract_identifier(input: &str) -> Option<String> {
    IDENTIFIER_PATTERN
        .find(input)
        .map(|found| found.as_str().replace('-', ""))
}

/// Hyphenated ids pass through untouched; compact ids get hyphens at 8/12/16/20.
pub fn normalize_to_hyphenated(id: &str) -> Result<String, IdentifierError> {
    if id.contains('-') {
        return Ok(id.to_string());
    }
    if id.len() != COMPACT_LEN || !id.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(IdentifierError::Malformed {
            value: id.to_string(),
        });
    }
    Uuid::try_parse(id)
        .map(|uuid| uuid.hyphenated().to_string())
        .map_err(|_| IdentifierError::Malformed {
            value: id.to_string(),
        })
}

/// Fresh random version-4 identifier in hyphenated form.
pub fn generate_identifier() -> String {
    Uuid::new_v4().hyphenated().to_string()
}

/// Validated identifier of the destination document, always hyphenated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentId(String);

impl DocumentId {
    /// Parses user input that may wrap the identifier in a URL or other text.
    pub fn from_input(raw: &str) -> Result<Self, IdentifierError> {
        let compact = extract_identifier(raw.trim()).ok_or(IdentifierError::NotFound)?;
        normalize_to_hyphenated(&compact).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
