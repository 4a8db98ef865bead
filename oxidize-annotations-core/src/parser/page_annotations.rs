//! Parser for PDF annotation dictionaries (ISO 32000-1 §12.5)

use super::{AnnotationParser, ParseContext};
use crate::annotations::{Annotation, AnnotationKind, LinkTarget};
use crate::color::Color;
use crate::error::{AnnotationError, Result};
use crate::geometry::Rectangle;
use crate::objects::{Dictionary, Object};
use crate::resolver::ResolveContext;
use tracing::{debug, warn};

/// Default parser for the annotation dictionaries of a PDF page
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfAnnotationParser;

impl AnnotationParser for PdfAnnotationParser {
    fn parse(&self, page: u32, raw: &[Object], context: &ParseContext<'_>) -> Vec<Annotation> {
        let mut annotations = Vec::with_capacity(raw.len());

        for (ordinal, object) in raw.iter().enumerate() {
            match parse_record(page, ordinal, object, context) {
                Ok(Some(annotation)) => annotations.push(annotation),
                Ok(None) => {}
                Err(err) => {
                    warn!(page, ordinal, error = %err, "Skipping malformed annotation record");
                }
            }
        }

        debug!(
            page,
            parsed = annotations.len(),
            raw = raw.len(),
            "Parsed page annotations"
        );
        annotations
    }
}

/// Parse one record. `Ok(None)` means the subtype is not surfaced by the
/// provider (popups, form widgets, ...).
fn parse_record(
    page: u32,
    ordinal: usize,
    object: &Object,
    context: &ParseContext<'_>,
) -> Result<Option<Annotation>> {
    let dict = object.as_dict().ok_or_else(|| {
        malformed(format!(
            "expected annotation dictionary, found {}",
            object.type_name()
        ))
    })?;

    let subtype = dict
        .get_name("Subtype")
        .ok_or_else(|| malformed("missing /Subtype"))?;

    let rect = parse_rect(dict)?;

    let kind = match subtype {
        "Link" => parse_link(page, dict, context)?,
        "Text" => AnnotationKind::Note {
            icon: dict.get_name("Name").map(str::to_string),
        },
        "Highlight" => AnnotationKind::Highlight {
            quad_points: parse_quad_points(dict, &rect)?,
        },
        other => {
            debug!(page, ordinal, subtype = other, "Ignoring unsupported annotation subtype");
            return Ok(None);
        }
    };

    if let Some(page_rect) = context.page_rect {
        if !page_rect.intersects(&rect) {
            return Err(malformed("annotation lies outside the page box"));
        }
    }

    let id = dict
        .get_string("NM")
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("p{page}-a{ordinal}"));

    Ok(Some(Annotation {
        id,
        page,
        rect,
        kind,
        author: dict.get_string("T").map(str::to_string),
        contents: dict.get_string("Contents").map(str::to_string),
        color: dict
            .get_array("C")
            .and_then(|components| Color::from_components(components)),
        modified: None,
        deleted: false,
    }))
}

fn parse_rect(dict: &Dictionary) -> Result<Rectangle> {
    let values = dict
        .get_array("Rect")
        .ok_or_else(|| malformed("missing /Rect"))?;

    let numbers: Vec<f64> = values.iter().filter_map(Object::as_real).collect();
    match numbers.as_slice() {
        [x1, y1, x2, y2] if numbers.len() == values.len() => {
            if !numbers.iter().all(|n| n.is_finite()) {
                return Err(malformed("/Rect has non-finite coordinates"));
            }
            Ok(Rectangle::from_corners(*x1, *y1, *x2, *y2))
        }
        _ => Err(malformed("/Rect must hold four numbers")),
    }
}

fn parse_quad_points(dict: &Dictionary, rect: &Rectangle) -> Result<Vec<f64>> {
    let Some(values) = dict.get_array("QuadPoints") else {
        // Viewers fall back to the bounding box when QuadPoints are absent
        let (ll, ur) = (rect.lower_left, rect.upper_right);
        return Ok(vec![ll.x, ur.y, ur.x, ur.y, ll.x, ll.y, ur.x, ll.y]);
    };

    let points: Option<Vec<f64>> = values.iter().map(Object::as_real).collect();
    match points {
        Some(points)
            if !points.is_empty()
                && points.len() % 8 == 0
                && points.iter().all(|p| p.is_finite()) =>
        {
            Ok(points)
        }
        _ => Err(malformed("/QuadPoints must hold groups of eight numbers")),
    }
}

enum RawTarget {
    Page(u32),
    Uri(String),
}

fn parse_link(page: u32, dict: &Dictionary, context: &ParseContext<'_>) -> Result<AnnotationKind> {
    let target = match (dict.get_dict("A"), dict.get("Dest")) {
        (Some(action), _) => parse_action(action)?,
        (None, Some(dest)) => RawTarget::Page(destination_page(dest)?),
        (None, None) => return Err(malformed("link has neither /A nor /Dest")),
    };

    let uri = match target {
        RawTarget::Page(index) => return Ok(AnnotationKind::Link(LinkTarget::Page(index))),
        RawTarget::Uri(uri) => uri,
    };

    let Some(path) = context.protocol.strip(&uri) else {
        return Ok(AnnotationKind::Link(LinkTarget::Uri(uri)));
    };

    let resolve_context = ResolveContext {
        storage_root: context.storage_root,
        file_types: context.file_types,
    };
    let resolved = context.resolver.resolve(path, &resolve_context, page);

    Ok(AnnotationKind::from_media(
        resolved.media,
        LinkTarget::Resolved {
            uri,
            location: resolved.location,
        },
    ))
}

fn parse_action(action: &Dictionary) -> Result<RawTarget> {
    match action.get_name("S") {
        Some("URI") => action
            .get_string("URI")
            .map(|uri| RawTarget::Uri(uri.to_string()))
            .ok_or_else(|| malformed("URI action without /URI")),
        Some("Launch") => action
            .get_string("F")
            .map(|file| RawTarget::Uri(file.to_string()))
            .ok_or_else(|| malformed("Launch action without /F")),
        Some("GoTo") => {
            let dest = action
                .get("D")
                .ok_or_else(|| malformed("GoTo action without /D"))?;
            Ok(RawTarget::Page(destination_page(dest)?))
        }
        Some(other) => Err(malformed(format!("unsupported link action /{other}"))),
        None => Err(malformed("link action without /S")),
    }
}

/// The host hands destinations over with page references already turned into
/// zero-based page indices, either bare or as the first element of an
/// explicit destination array.
fn destination_page(dest: &Object) -> Result<u32> {
    let index = match dest {
        Object::Integer(index) => Some(*index),
        Object::Array(items) => items.first().and_then(Object::as_integer),
        _ => None,
    };

    index
        .and_then(|i| u32::try_from(i).ok())
        .ok_or_else(|| malformed("destination does not name a page index"))
}

fn malformed(message: impl Into<String>) -> AnnotationError {
    AnnotationError::ParseError(message.into())
}
