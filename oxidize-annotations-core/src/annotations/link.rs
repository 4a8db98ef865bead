//! Link targets and the media classification used for custom-protocol links

use crate::error::AnnotationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Classification a file-type table assigns to a link's extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MediaType {
    /// Plain link, opened by the host
    Link,
    /// Playable video
    Video,
    /// Playable audio
    Audio,
    /// Inline image
    Image,
}

impl MediaType {
    /// Subtype name used in the persisted format
    pub fn name(&self) -> &'static str {
        match self {
            MediaType::Link => "Link",
            MediaType::Video => "Video",
            MediaType::Audio => "Audio",
            MediaType::Image => "Image",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MediaType {
    type Err = AnnotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "link" => Ok(MediaType::Link),
            "video" => Ok(MediaType::Video),
            "audio" => Ok(MediaType::Audio),
            "image" => Ok(MediaType::Image),
            other => Err(AnnotationError::ParseError(format!(
                "unknown media type '{other}'"
            ))),
        }
    }
}

/// Where a resolved custom-protocol link points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    /// Network reference
    Url(String),
    /// Local file
    File(PathBuf),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Url(url) => f.write_str(url),
            Location::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Target of a link-like annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkTarget {
    /// Jump to a page in the same document (zero-based)
    Page(u32),
    /// Ordinary external link, handed to the host untouched
    Uri(String),
    /// Custom-protocol link after resolution; `uri` keeps the original text
    Resolved { uri: String, location: Location },
}

impl LinkTarget {
    /// The resolved location, if this target went through link resolution
    pub fn location(&self) -> Option<&Location> {
        match self {
            LinkTarget::Resolved { location, .. } => Some(location),
            _ => None,
        }
    }

    /// The original target text for external links
    pub fn uri(&self) -> Option<&str> {
        match self {
            LinkTarget::Uri(uri) | LinkTarget::Resolved { uri, .. } => Some(uri),
            LinkTarget::Page(_) => None,
        }
    }
}
