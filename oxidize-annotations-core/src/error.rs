use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnnotationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid page number: {0}")]
    InvalidPageNumber(u32),

    /// A single raw annotation record could not be understood. Parsers absorb
    /// this per record; it never fails a whole page.
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Could not read annotations from {}: {reason}", .path.display())]
    PersistenceRead { path: PathBuf, reason: String },

    #[error("Could not write annotations to {}: {reason}", .path.display())]
    PersistenceWrite { path: PathBuf, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Document is no longer available")]
    DocumentUnavailable,

    #[error("Host error: {0}")]
    Host(String),
}

impl AnnotationError {
    /// Whether the error came from reading the sidecar store. Provider lookups
    /// treat these as a miss and fall back to parsing.
    pub fn is_persistence_read(&self) -> bool {
        matches!(self, AnnotationError::PersistenceRead { .. })
    }
}

pub type Result<T> = std::result::Result<T, AnnotationError>;
