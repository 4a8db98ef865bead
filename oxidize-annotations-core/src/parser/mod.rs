//! Raw page annotation data to [`Annotation`] values
//!
//! The provider calls a parser at most once per page resolution, always from
//! the thread that claimed the page. Parsers must be deterministic: identical
//! raw input yields identical output, which lets a failed resolution be
//! retried safely.

mod page_annotations;

pub use page_annotations::PdfAnnotationParser;

use crate::annotations::Annotation;
use crate::geometry::Rectangle;
use crate::objects::Object;
use crate::resolver::{FileTypeTable, LinkResolver, ProtocolConfig};
use std::path::Path;

/// Everything a parser may consult besides the raw records
#[derive(Clone, Copy)]
pub struct ParseContext<'a> {
    pub protocol: &'a ProtocolConfig,
    pub file_types: &'a FileTypeTable,
    /// Root for document-relative custom links
    pub storage_root: &'a Path,
    /// Page box reported by the host, if any
    pub page_rect: Option<Rectangle>,
    pub resolver: &'a dyn LinkResolver,
}

/// Swappable parse step of the provider
pub trait AnnotationParser: Send + Sync {
    /// Parse one page's raw annotation records. Malformed records are skipped;
    /// they never fail the page.
    fn parse(&self, page: u32, raw: &[Object], context: &ParseContext<'_>) -> Vec<Annotation>;
}
