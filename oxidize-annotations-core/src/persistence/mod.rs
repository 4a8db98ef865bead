//! Sidecar persistence of the full page-to-annotations mapping
//!
//! Persistence is explicit: the provider only writes when asked to save, and
//! a failed read is never fatal (the provider falls back to parsing).
//! Adapters are blocking and must not be driven from a context that cannot
//! tolerate blocking I/O.

mod json_sidecar;
mod record;

pub use json_sidecar::JsonSidecarStore;
pub use record::FORMAT_VERSION;

use crate::error::Result;
use crate::store::AnnotationMap;
use std::path::Path;

/// Whether the provider consults the sidecar when a page is first requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PersistenceMode {
    /// Pages are always parsed from the document on a cache miss
    #[default]
    Disabled,
    /// Pages found in the sidecar are served from it instead of parsing
    ExternalFile,
}

/// Swappable load/save step of the provider
pub trait PersistenceAdapter: Send + Sync {
    /// Read the whole mapping stored at `path`
    fn load(&self, path: &Path) -> Result<AnnotationMap>;

    /// Replace whatever is stored at `path` with `annotations`
    fn save(&self, path: &Path, annotations: &AnnotationMap) -> Result<()>;
}
