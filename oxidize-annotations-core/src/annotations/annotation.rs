//! The annotation value type shared by the cache, parser and sidecar store

use crate::annotations::{LinkTarget, MediaType};
use crate::color::Color;
use crate::geometry::Rectangle;
use chrono::{DateTime, Utc};

/// Subtype-specific part of an annotation
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationKind {
    /// Generic link
    Link(LinkTarget),
    /// Link to a playable video
    Video(LinkTarget),
    /// Link to playable audio
    Audio(LinkTarget),
    /// Link to an image shown inline
    Image(LinkTarget),
    /// Text note (sticky note)
    Note {
        /// Icon name, e.g. "Comment"
        icon: Option<String>,
    },
    /// Text highlight; quad points come in groups of eight coordinates
    Highlight { quad_points: Vec<f64> },
    /// A subtype this version does not know. Kept verbatim so it survives a
    /// load/save cycle written by a newer version.
    Unknown {
        subtype: String,
        payload: serde_json::Map<String, serde_json::Value>,
    },
}

impl AnnotationKind {
    /// Build the link-like kind matching a file-type classification
    pub fn from_media(media: MediaType, target: LinkTarget) -> Self {
        match media {
            MediaType::Link => AnnotationKind::Link(target),
            MediaType::Video => AnnotationKind::Video(target),
            MediaType::Audio => AnnotationKind::Audio(target),
            MediaType::Image => AnnotationKind::Image(target),
        }
    }

    /// Subtype name as written to the sidecar store
    pub fn subtype(&self) -> &str {
        match self {
            AnnotationKind::Link(_) => MediaType::Link.name(),
            AnnotationKind::Video(_) => MediaType::Video.name(),
            AnnotationKind::Audio(_) => MediaType::Audio.name(),
            AnnotationKind::Image(_) => MediaType::Image.name(),
            AnnotationKind::Note { .. } => "Note",
            AnnotationKind::Highlight { .. } => "Highlight",
            AnnotationKind::Unknown { subtype, .. } => subtype,
        }
    }

    /// Media classification for link-like kinds
    pub fn media_type(&self) -> Option<MediaType> {
        match self {
            AnnotationKind::Link(_) => Some(MediaType::Link),
            AnnotationKind::Video(_) => Some(MediaType::Video),
            AnnotationKind::Audio(_) => Some(MediaType::Audio),
            AnnotationKind::Image(_) => Some(MediaType::Image),
            _ => None,
        }
    }

    pub fn target(&self) -> Option<&LinkTarget> {
        match self {
            AnnotationKind::Link(target)
            | AnnotationKind::Video(target)
            | AnnotationKind::Audio(target)
            | AnnotationKind::Image(target) => Some(target),
            _ => None,
        }
    }
}

/// A single annotation on a page
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Identifier, unique within the document
    pub id: String,
    /// Zero-based page index
    pub page: u32,
    /// Bounds in page space
    pub rect: Rectangle,
    pub kind: AnnotationKind,
    /// Author ("T" entry)
    pub author: Option<String>,
    pub contents: Option<String>,
    pub color: Option<Color>,
    pub modified: Option<DateTime<Utc>>,
    /// Tombstone flag. Deleted annotations stay in the page sequence until
    /// the provider compacts them.
    pub deleted: bool,
}

impl Annotation {
    /// Create a new annotation with no identifier; the provider assigns one
    /// when the annotation is added.
    pub fn new(kind: AnnotationKind, rect: Rectangle) -> Self {
        Self {
            id: String::new(),
            page: 0,
            rect,
            kind,
            author: None,
            contents: None,
            color: None,
            modified: None,
            deleted: false,
        }
    }

    /// Create a generic link to an external URI
    pub fn link(rect: Rectangle, uri: impl Into<String>) -> Self {
        Self::new(AnnotationKind::Link(LinkTarget::Uri(uri.into())), rect)
    }

    /// Create a text note
    pub fn note(rect: Rectangle, contents: impl Into<String>) -> Self {
        Self::new(AnnotationKind::Note { icon: None }, rect).with_contents(contents)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_contents(mut self, contents: impl Into<String>) -> Self {
        self.contents = Some(contents.into());
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Set or clear the tombstone flag and stamp the modification time
    pub fn set_deleted(&mut self, deleted: bool) {
        self.deleted = deleted;
        self.modified = Some(Utc::now());
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn subtype(&self) -> &str {
        self.kind.subtype()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::Location;
    use std::path::PathBuf;

    fn rect() -> Rectangle {
        Rectangle::from_position_and_size(10.0, 10.0, 100.0, 20.0)
    }

    #[test]
    fn test_new_annotation_defaults() {
        let annotation = Annotation::link(rect(), "https://example.com");
        assert!(annotation.id.is_empty());
        assert_eq!(annotation.page, 0);
        assert!(!annotation.is_deleted());
        assert_eq!(annotation.subtype(), "Link");
        assert_eq!(
            annotation.kind.target(),
            Some(&LinkTarget::Uri("https://example.com".to_string()))
        );
    }

    #[test]
    fn test_builder_methods() {
        let annotation = Annotation::note(rect(), "Check this")
            .with_id("n1")
            .with_page(4)
            .with_author("reviewer")
            .with_color(Color::yellow());

        assert_eq!(annotation.id, "n1");
        assert_eq!(annotation.page, 4);
        assert_eq!(annotation.author.as_deref(), Some("reviewer"));
        assert_eq!(annotation.contents.as_deref(), Some("Check this"));
        assert_eq!(annotation.color, Some(Color::Rgb(1.0, 1.0, 0.0)));
        assert_eq!(annotation.kind.media_type(), None);
    }

    #[test]
    fn test_from_media() {
        let target = LinkTarget::Resolved {
            uri: "oxidize://clip.mp4".to_string(),
            location: Location::File(PathBuf::from("/docs/clip.mp4")),
        };
        let kind = AnnotationKind::from_media(MediaType::Video, target.clone());
        assert_eq!(kind, AnnotationKind::Video(target));
        assert_eq!(kind.subtype(), "Video");
        assert_eq!(kind.media_type(), Some(MediaType::Video));
    }

    #[test]
    fn test_set_deleted_touches_modified() {
        let mut annotation = Annotation::link(rect(), "https://example.com");
        assert!(annotation.modified.is_none());

        annotation.set_deleted(true);
        assert!(annotation.is_deleted());
        assert!(annotation.modified.is_some());

        annotation.set_deleted(false);
        assert!(!annotation.is_deleted());
    }

    #[test]
    fn test_unknown_subtype_name() {
        let kind = AnnotationKind::Unknown {
            subtype: "Redact".to_string(),
            payload: serde_json::Map::new(),
        };
        assert_eq!(kind.subtype(), "Redact");
        assert_eq!(kind.target(), None);
    }
}
