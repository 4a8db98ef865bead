//! On-disk shape of the sidecar file
//!
//! ```json
//! { "version": 1,
//!   "pages": { "0": [ { "id": "p0-a0", "page": 0, "rect": { ... },
//!                       "subtype": "Video", "target": { ... } } ] } }
//! ```
//!
//! Common fields sit at the top level of a record; the subtype payload is
//! flattened next to them. Records with a subtype this version does not know
//! keep their payload verbatim.

use crate::annotations::{Annotation, AnnotationKind, LinkTarget, MediaType};
use crate::color::Color;
use crate::error::{AnnotationError, Result};
use crate::geometry::Rectangle;
use crate::store::AnnotationMap;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

/// Highest sidecar format version this crate reads and the one it writes
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct SidecarDocument {
    version: u32,
    #[serde(default)]
    pages: BTreeMap<u32, Vec<AnnotationRecord>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct AnnotationRecord {
    id: String,
    page: u32,
    rect: Rectangle,
    subtype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    contents: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    modified: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "is_false")]
    deleted: bool,
    #[serde(flatten)]
    payload: Map<String, Value>,
}

// Unknown keys make the record opaque instead of being dropped
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct LinkPayload {
    target: LinkTarget,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NotePayload {
    #[serde(default)]
    icon: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct HighlightPayload {
    quad_points: Vec<f64>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl SidecarDocument {
    pub(crate) fn from_annotations(annotations: &AnnotationMap) -> Result<Self> {
        let mut pages = BTreeMap::new();
        for (page, list) in annotations {
            let records = list
                .iter()
                .map(AnnotationRecord::from_annotation)
                .collect::<Result<Vec<_>>>()?;
            pages.insert(*page, records);
        }

        Ok(Self {
            version: FORMAT_VERSION,
            pages,
        })
    }

    pub(crate) fn into_annotations(self, path: &Path) -> Result<AnnotationMap> {
        if self.version > FORMAT_VERSION {
            return Err(AnnotationError::PersistenceRead {
                path: path.to_path_buf(),
                reason: format!(
                    "format version {} is newer than supported version {}",
                    self.version, FORMAT_VERSION
                ),
            });
        }

        Ok(self
            .pages
            .into_iter()
            .map(|(page, records)| {
                let annotations = records
                    .into_iter()
                    .map(AnnotationRecord::into_annotation)
                    .collect();
                (page, annotations)
            })
            .collect())
    }
}

impl AnnotationRecord {
    fn from_annotation(annotation: &Annotation) -> Result<Self> {
        ensure_finite(annotation)?;

        let mut payload = Map::new();
        match &annotation.kind {
            AnnotationKind::Link(target)
            | AnnotationKind::Video(target)
            | AnnotationKind::Audio(target)
            | AnnotationKind::Image(target) => {
                payload.insert("target".to_string(), serde_json::to_value(target)?);
            }
            AnnotationKind::Note { icon } => {
                if let Some(icon) = icon {
                    payload.insert("icon".to_string(), Value::String(icon.clone()));
                }
            }
            AnnotationKind::Highlight { quad_points } => {
                payload.insert("quad_points".to_string(), serde_json::to_value(quad_points)?);
            }
            AnnotationKind::Unknown { payload: opaque, .. } => {
                payload = opaque.clone();
            }
        }

        Ok(Self {
            id: annotation.id.clone(),
            page: annotation.page,
            rect: annotation.rect,
            subtype: annotation.kind.subtype().to_string(),
            author: annotation.author.clone(),
            contents: annotation.contents.clone(),
            color: annotation.color,
            modified: annotation.modified,
            deleted: annotation.deleted,
            payload,
        })
    }

    fn into_annotation(self) -> Annotation {
        let kind = decode_kind(&self.id, self.subtype, self.payload);
        Annotation {
            id: self.id,
            page: self.page,
            rect: self.rect,
            kind,
            author: self.author,
            contents: self.contents,
            color: self.color,
            modified: self.modified,
            deleted: self.deleted,
        }
    }
}

/// JSON has no NaN or infinity; serde_json would write them as `null` and
/// the sidecar would no longer load.
fn ensure_finite(annotation: &Annotation) -> Result<()> {
    let rect = &annotation.rect;
    let mut values = vec![
        rect.lower_left.x,
        rect.lower_left.y,
        rect.upper_right.x,
        rect.upper_right.y,
    ];
    match annotation.color {
        Some(Color::Rgb(r, g, b)) => values.extend([r, g, b]),
        Some(Color::Gray(gray)) => values.push(gray),
        Some(Color::Cmyk(c, m, y, k)) => values.extend([c, m, y, k]),
        None => {}
    }
    if let AnnotationKind::Highlight { quad_points } = &annotation.kind {
        values.extend_from_slice(quad_points);
    }

    if values.iter().all(|value| value.is_finite()) {
        Ok(())
    } else {
        Err(AnnotationError::Serialization(serde::ser::Error::custom(
            format!("annotation {} has a non-finite coordinate", annotation.id),
        )))
    }
}

fn decode_kind(id: &str, subtype: String, payload: Map<String, Value>) -> AnnotationKind {
    let media = match subtype.as_str() {
        "Link" => Some(MediaType::Link),
        "Video" => Some(MediaType::Video),
        "Audio" => Some(MediaType::Audio),
        "Image" => Some(MediaType::Image),
        _ => None,
    };

    let decoded = match (media, subtype.as_str()) {
        (Some(media), _) => Some(
            decode::<LinkPayload>(&payload).map(|p| AnnotationKind::from_media(media, p.target)),
        ),
        (None, "Note") => Some(
            decode::<NotePayload>(&payload).map(|p| AnnotationKind::Note { icon: p.icon }),
        ),
        (None, "Highlight") => Some(decode::<HighlightPayload>(&payload).map(|p| {
            AnnotationKind::Highlight {
                quad_points: p.quad_points,
            }
        })),
        _ => None,
    };

    match decoded {
        Some(Some(kind)) => kind,
        Some(None) => {
            warn!(id, subtype = %subtype, "Stored payload does not decode; keeping it opaque");
            AnnotationKind::Unknown { subtype, payload }
        }
        None => AnnotationKind::Unknown { subtype, payload },
    }
}

fn decode<T: DeserializeOwned>(payload: &Map<String, Value>) -> Option<T> {
    serde_json::from_value(Value::Object(payload.clone())).ok()
}
