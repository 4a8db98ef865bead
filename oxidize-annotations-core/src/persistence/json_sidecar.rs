use super::record::SidecarDocument;
use super::PersistenceAdapter;
use crate::error::{AnnotationError, Result};
use crate::store::AnnotationMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Stores the mapping as a JSON document next to the document's cache
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSidecarStore {
    pretty: bool,
}

impl JsonSidecarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write indented JSON, for sidecars people read by hand
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl PersistenceAdapter for JsonSidecarStore {
    fn load(&self, path: &Path) -> Result<AnnotationMap> {
        let data = fs::read(path).map_err(|e| read_error(path, e))?;
        let document: SidecarDocument =
            serde_json::from_slice(&data).map_err(|e| read_error(path, e))?;
        let annotations = document.into_annotations(path)?;

        debug!(path = %path.display(), pages = annotations.len(), "Loaded annotation sidecar");
        Ok(annotations)
    }

    fn save(&self, path: &Path, annotations: &AnnotationMap) -> Result<()> {
        let document =
            SidecarDocument::from_annotations(annotations).map_err(|e| write_error(path, e))?;
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(&document)
        } else {
            serde_json::to_vec(&document)
        }
        .map_err(|e| write_error(path, e))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| write_error(path, e))?;
        }

        // Write-then-rename so a crash never leaves a truncated sidecar behind
        let mut staging = path.as_os_str().to_owned();
        staging.push(".tmp");
        fs::write(&staging, &bytes).map_err(|e| write_error(path, e))?;
        fs::rename(&staging, path).map_err(|e| write_error(path, e))?;

        info!(path = %path.display(), pages = annotations.len(), "Saved annotation sidecar");
        Ok(())
    }
}

fn read_error(path: &Path, err: impl std::fmt::Display) -> AnnotationError {
    AnnotationError::PersistenceRead {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

fn write_error(path: &Path, err: impl std::fmt::Display) -> AnnotationError {
    AnnotationError::PersistenceWrite {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}
