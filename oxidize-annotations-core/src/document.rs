//! The document side of the provider
//!
//! A provider belongs to a document. The document owns the provider, so the
//! provider only keeps a weak handle back to it; once the document is gone,
//! every provider operation that needs it fails with
//! [`AnnotationError::DocumentUnavailable`](crate::AnnotationError::DocumentUnavailable).

use crate::error::Result;
use crate::geometry::Rectangle;
use crate::objects::Object;
use std::path::PathBuf;

/// What changed on a page, passed to [`DocumentHost::annotations_did_change`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationChange {
    /// The page content was replaced wholesale
    Replaced,
    /// Annotations were appended
    Added { count: usize },
    /// An annotation was tombstoned
    Deleted { id: String },
    /// A tombstoned annotation was brought back
    Restored { id: String },
    /// Tombstones were physically removed
    Compacted { removed: usize },
    /// The page was installed from the sidecar
    Loaded,
    /// The page was dropped from the cache and will be resolved again
    Invalidated,
}

/// Host document collaborator.
///
/// Implementations are called from whichever thread asks the provider for a
/// page, so they must be `Send + Sync`. `raw_annotations` is called at most
/// once per page resolution.
pub trait DocumentHost: Send + Sync {
    /// Stable identity of the document, used to derive the sidecar path
    fn uid(&self) -> String;

    fn page_count(&self) -> u32;

    /// Raw annotation dictionaries of `page`
    fn raw_annotations(&self, page: u32) -> Result<Vec<Object>>;

    /// Page box of `page`, when the host knows it
    fn page_rect(&self, _page: u32) -> Option<Rectangle> {
        None
    }

    /// Directory document-relative links resolve against
    fn storage_root(&self) -> PathBuf;

    /// Directory the default sidecar path lives under
    fn cache_directory(&self) -> PathBuf;

    /// Called after the provider changed the content of `page`. Never called
    /// while the provider holds a lock.
    fn annotations_did_change(&self, _page: u32, _change: &AnnotationChange) {}
}
