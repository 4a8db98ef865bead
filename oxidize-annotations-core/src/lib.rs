//! # oxidize-annotations
//!
//! Per-document annotation storage for a PDF viewing engine.
//!
//! ## Features
//!
//! - **Lazy per-page cache**: a page is parsed the first time it is asked for, once,
//!   even when many threads ask at the same time
//! - **Immediate writes**: added, replaced and tombstoned annotations are visible as
//!   soon as the call returns
//! - **Custom-protocol links**: `oxidize://media/clip.mp4` style links are resolved
//!   against the document's storage root and classified as video, audio or image
//! - **Sidecar persistence**: explicit save/load of the whole mapping as JSON, with
//!   unknown annotation subtypes preserved
//! - **Swappable steps**: parser, link resolver and sidecar store are traits
//!
//! ## Quick Start
//!
//! ```rust
//! use oxidize_annotations::{
//!     Annotation, AnnotationProvider, DocumentHost, Object, ProviderOptions, Rectangle, Result,
//! };
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! struct Notebook;
//!
//! impl DocumentHost for Notebook {
//!     fn uid(&self) -> String {
//!         "notebook".to_string()
//!     }
//!     fn page_count(&self) -> u32 {
//!         10
//!     }
//!     fn raw_annotations(&self, _page: u32) -> Result<Vec<Object>> {
//!         Ok(Vec::new())
//!     }
//!     fn storage_root(&self) -> PathBuf {
//!         PathBuf::from("/library/notebook")
//!     }
//!     fn cache_directory(&self) -> PathBuf {
//!         std::env::temp_dir()
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let document = Arc::new(Notebook);
//! let provider = AnnotationProvider::new(&document, 0, ProviderOptions::default());
//!
//! let note = Annotation::note(Rectangle::from_position_and_size(72.0, 700.0, 20.0, 20.0), "check");
//! let added = provider.add_annotations(2, vec![note])?;
//!
//! provider.set_deleted(2, &added[0].id, true)?;
//! assert!(provider.annotations_for_page(2)?[0].is_deleted());
//!
//! assert_eq!(provider.compact(), 1);
//! assert!(provider.annotations_for_page(2)?.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod annotations;
pub mod color;
pub mod document;
pub mod error;
pub mod geometry;
pub mod objects;
pub mod parser;
pub mod persistence;
pub mod provider;
pub mod resolver;
pub mod store;

pub use annotations::{Annotation, AnnotationKind, LinkTarget, Location, MediaType};
pub use color::Color;
pub use document::{AnnotationChange, DocumentHost};
pub use error::{AnnotationError, Result};
pub use geometry::{Point, Rectangle};
pub use objects::{Dictionary, Object};
pub use parser::{AnnotationParser, ParseContext, PdfAnnotationParser};
pub use persistence::{JsonSidecarStore, PersistenceAdapter, PersistenceMode};
pub use provider::{AnnotationProvider, ProviderOptions, ProviderStats};
pub use resolver::{
    DefaultLinkResolver, FileTypeTable, LinkResolver, ProtocolConfig, ResolveContext,
    ResolvedLink, DEFAULT_PROTOCOL,
};
pub use store::{AnnotationMap, PageAnnotationStore, PageAnnotations};

/// Current version of oxidize-annotations
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
