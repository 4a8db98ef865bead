use crate::persistence::PersistenceMode;
use crate::resolver::{FileTypeTable, ProtocolConfig};
use std::path::PathBuf;

/// Configuration of an [`AnnotationProvider`](super::AnnotationProvider)
///
/// ```rust
/// use oxidize_annotations::{MediaType, PersistenceMode, ProviderOptions};
///
/// let options = ProviderOptions::default()
///     .with_protocol("mypdf://")
///     .with_file_type("mkv", MediaType::Video)
///     .with_persistence_mode(PersistenceMode::ExternalFile)
///     .with_default_username("reviewer");
/// assert_eq!(options.protocol.scheme(), "mypdf://");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProviderOptions {
    /// Scheme of links that need resolution
    pub protocol: ProtocolConfig,
    /// Extension to media classification
    pub file_types: FileTypeTable,
    pub persistence_mode: PersistenceMode,
    /// Sidecar location; derived from the document identity when unset
    pub annotations_path: Option<PathBuf>,
    /// Author set on added annotations that carry none
    pub default_username: Option<String>,
}

impl ProviderOptions {
    pub fn with_protocol(mut self, scheme: &str) -> Self {
        self.protocol = ProtocolConfig::new(scheme);
        self
    }

    pub fn with_file_types(mut self, file_types: FileTypeTable) -> Self {
        self.file_types = file_types;
        self
    }

    /// Add or override one entry of the file-type table
    pub fn with_file_type(mut self, extension: &str, media: crate::MediaType) -> Self {
        self.file_types.insert(extension, media);
        self
    }

    pub fn with_persistence_mode(mut self, mode: PersistenceMode) -> Self {
        self.persistence_mode = mode;
        self
    }

    pub fn with_annotations_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.annotations_path = Some(path.into());
        self
    }

    pub fn with_default_username(mut self, username: impl Into<String>) -> Self {
        self.default_username = Some(username.into());
        self
    }
}

/// Counters of where resolved pages came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProviderStats {
    /// Pages produced by the parser
    pub parses: u64,
    /// Pages served from the sidecar on a cache miss
    pub sidecar_hits: u64,
    /// Pages installed by an explicit load
    pub loaded_pages: u64,
}
