//! Custom-protocol link resolution
//!
//! Links whose target uses the configured scheme (`oxidize://` unless changed)
//! point at media stored next to the document. Resolution turns the remainder
//! of such a link into an absolute [`Location`] and classifies it through the
//! [`FileTypeTable`]:
//!
//! | remainder                    | location                          |
//! |------------------------------|-----------------------------------|
//! | `http://…`, `https://…`      | `Location::Url`, unchanged        |
//! | `file:///abs/path`, `/abs`   | `Location::File`, unchanged       |
//! | `localhost/rel`, `rel`       | `Location::File`, under the root  |
//!
//! Resolution is pure: it never touches the annotation cache.

mod file_types;
mod protocol;

pub use file_types::FileTypeTable;
pub use protocol::{ProtocolConfig, DEFAULT_PROTOCOL};

use crate::annotations::{Location, MediaType};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What a link resolver can see of the document
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    /// Directory relative links are resolved against
    pub storage_root: &'a Path,
    pub file_types: &'a FileTypeTable,
}

/// Outcome of resolving one custom-protocol path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub location: Location,
    pub media: MediaType,
}

/// Turns the path part of a custom-protocol link into a location and media
/// classification. Implementations must be pure and deterministic.
pub trait LinkResolver: Send + Sync {
    fn resolve(&self, path: &str, context: &ResolveContext<'_>, page: u32) -> ResolvedLink;
}

/// Resolution rules described in the module documentation
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultLinkResolver;

impl LinkResolver for DefaultLinkResolver {
    fn resolve(&self, path: &str, context: &ResolveContext<'_>, page: u32) -> ResolvedLink {
        let path = path.trim();
        let file_part = strip_query(path);
        let extension = Path::new(file_part).extension().and_then(OsStr::to_str);
        let media = context.file_types.classify(extension);
        let location = locate(path, file_part, context.storage_root);

        debug!(page, path, %location, %media, "Resolved custom-protocol link");
        ResolvedLink { location, media }
    }
}

fn locate(path: &str, file_part: &str, storage_root: &Path) -> Location {
    if starts_with_ignore_case(path, "http://") || starts_with_ignore_case(path, "https://") {
        return Location::Url(path.to_string());
    }
    if starts_with_ignore_case(file_part, "file://") {
        return Location::File(PathBuf::from(&file_part["file://".len()..]));
    }

    let relative = if starts_with_ignore_case(file_part, "localhost/") {
        &file_part["localhost/".len()..]
    } else {
        file_part
    };

    let candidate = Path::new(relative);
    if candidate.is_absolute() {
        Location::File(candidate.to_path_buf())
    } else {
        Location::File(storage_root.join(candidate))
    }
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
