//! Annotation value types
//!
//! Annotations are plain values. The provider hands out shared snapshots of a
//! page's annotation sequence; edits go back through the provider.

mod annotation;
mod link;

pub use annotation::{Annotation, AnnotationKind};
pub use link::{LinkTarget, Location, MediaType};
