//! Shared host document for the integration tests

#![allow(dead_code)]

use oxidize_annotations::{
    AnnotationChange, AnnotationError, Dictionary, DocumentHost, Object, Rectangle, Result,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// In-memory document with canned raw annotation records
pub struct TestDocument {
    pub uid: String,
    pub pages: u32,
    pub raw: HashMap<u32, Vec<Object>>,
    pub storage_root: PathBuf,
    pub cache_dir: PathBuf,
    /// Sleep inside every raw fetch, to widen race windows
    pub fetch_delay: Option<Duration>,
    pub fail_fetches: AtomicBool,
    pub fetches: AtomicUsize,
    pub changes: Mutex<Vec<(u32, AnnotationChange)>>,
}

impl TestDocument {
    pub fn new(pages: u32, cache_dir: &Path) -> Self {
        Self {
            uid: "doc-1".to_string(),
            pages,
            raw: HashMap::new(),
            storage_root: PathBuf::from("/library/doc-1"),
            cache_dir: cache_dir.to_path_buf(),
            fetch_delay: None,
            fail_fetches: AtomicBool::new(false),
            fetches: AtomicUsize::new(0),
            changes: Mutex::new(Vec::new()),
        }
    }

    pub fn with_page(mut self, page: u32, records: Vec<Object>) -> Self {
        self.raw.insert(page, records);
        self
    }

    pub fn with_storage_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.storage_root = root.into();
        self
    }

    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = Some(delay);
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn changes(&self) -> Vec<(u32, AnnotationChange)> {
        self.changes.lock().unwrap().clone()
    }
}

impl DocumentHost for TestDocument {
    fn uid(&self) -> String {
        self.uid.clone()
    }

    fn page_count(&self) -> u32 {
        self.pages
    }

    fn raw_annotations(&self, page: u32) -> Result<Vec<Object>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.fetch_delay {
            std::thread::sleep(delay);
        }
        if self.fail_fetches.load(Ordering::SeqCst) {
            return Err(AnnotationError::Host("page engine unavailable".to_string()));
        }
        Ok(self.raw.get(&page).cloned().unwrap_or_default())
    }

    fn page_rect(&self, _page: u32) -> Option<Rectangle> {
        Some(Rectangle::from_position_and_size(0.0, 0.0, 612.0, 792.0))
    }

    fn storage_root(&self) -> PathBuf {
        self.storage_root.clone()
    }

    fn cache_directory(&self) -> PathBuf {
        self.cache_dir.clone()
    }

    fn annotations_did_change(&self, page: u32, change: &AnnotationChange) {
        self.changes.lock().unwrap().push((page, change.clone()));
    }
}

fn rect_array(x: f64, y: f64) -> Object {
    vec![
        Object::Real(x),
        Object::Real(y),
        Object::Real(x + 100.0),
        Object::Real(y + 20.0),
    ]
    .into()
}

/// Raw `/Link` record with a `URI` action
pub fn uri_link(uri: &str, id: &str) -> Object {
    let action = Dictionary::new()
        .with("S", Object::name("URI"))
        .with("URI", uri);
    Dictionary::new()
        .with("Type", Object::name("Annot"))
        .with("Subtype", Object::name("Link"))
        .with("Rect", rect_array(50.0, 700.0))
        .with("NM", id)
        .with("A", action)
        .into()
}

/// Raw `/Text` record
pub fn text_note(contents: &str, id: &str) -> Object {
    Dictionary::new()
        .with("Subtype", Object::name("Text"))
        .with("Rect", rect_array(300.0, 400.0))
        .with("NM", id)
        .with("Name", Object::name("Comment"))
        .with("Contents", contents)
        .with("T", "reviewer")
        .into()
}

pub fn rect() -> Rectangle {
    Rectangle::from_position_and_size(10.0, 10.0, 40.0, 40.0)
}
