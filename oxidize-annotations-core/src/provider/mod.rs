//! Per-document annotation provider
//!
//! The provider answers "which annotations are on page N" for one document.
//! A page is resolved the first time somebody asks for it: from the sidecar
//! when persistence is enabled and the sidecar has the page, otherwise by
//! fetching the raw records from the document and parsing them. Resolved
//! pages are cached until the cache is cleared; writes go straight to the
//! cache and are only persisted by an explicit save.
//!
//! # Example
//!
//! ```rust
//! use oxidize_annotations::{
//!     AnnotationProvider, Dictionary, DocumentHost, Object, ProviderOptions, Result,
//! };
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! struct Brochure;
//!
//! impl DocumentHost for Brochure {
//!     fn uid(&self) -> String {
//!         "brochure".to_string()
//!     }
//!     fn page_count(&self) -> u32 {
//!         1
//!     }
//!     fn raw_annotations(&self, _page: u32) -> Result<Vec<Object>> {
//!         let action = Dictionary::new()
//!             .with("S", Object::name("URI"))
//!             .with("URI", "oxidize://media/intro.mp4");
//!         let link = Dictionary::new()
//!             .with("Subtype", Object::name("Link"))
//!             .with("Rect", vec![Object::Real(0.0), Object::Real(0.0), Object::Real(100.0), Object::Real(20.0)])
//!             .with("A", action);
//!         Ok(vec![link.into()])
//!     }
//!     fn storage_root(&self) -> PathBuf {
//!         PathBuf::from("/library/brochure")
//!     }
//!     fn cache_directory(&self) -> PathBuf {
//!         PathBuf::from("/tmp/annotations")
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let document = Arc::new(Brochure);
//! let provider = AnnotationProvider::new(&document, 0, ProviderOptions::default());
//!
//! let page = provider.annotations_for_page(0)?;
//! assert_eq!(page[0].subtype(), "Video");
//! # Ok(())
//! # }
//! ```

mod options;

pub use options::{ProviderOptions, ProviderStats};

use crate::annotations::{Annotation, MediaType};
use crate::document::{AnnotationChange, DocumentHost};
use crate::error::{AnnotationError, Result};
use crate::parser::{AnnotationParser, ParseContext, PdfAnnotationParser};
use crate::persistence::{JsonSidecarStore, PersistenceAdapter, PersistenceMode};
use crate::resolver::{DefaultLinkResolver, FileTypeTable, LinkResolver, ProtocolConfig};
use crate::store::{AnnotationMap, PageAnnotationStore, PageAnnotations};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};
use tracing::{debug, info, warn};

const USER_ID_PREFIX: &str = "user-";

/// Link configuration handed to the parser. Swapped as a whole so a parse
/// in flight keeps the configuration it started with.
#[derive(Debug, Clone)]
struct LinkConfig {
    protocol: ProtocolConfig,
    file_types: FileTypeTable,
}

#[derive(Debug, Clone)]
struct Settings {
    persistence_mode: PersistenceMode,
    annotations_path: Option<PathBuf>,
    default_username: Option<String>,
}

#[derive(Debug, Default)]
struct Counters {
    parses: AtomicU64,
    sidecar_hits: AtomicU64,
    loaded_pages: AtomicU64,
}

/// Lazily populated, thread-safe annotation cache of one document
pub struct AnnotationProvider {
    document: Weak<dyn DocumentHost>,
    index: usize,
    store: PageAnnotationStore,
    parser: Arc<dyn AnnotationParser>,
    resolver: Arc<dyn LinkResolver>,
    persistence: Arc<dyn PersistenceAdapter>,
    links: RwLock<Arc<LinkConfig>>,
    settings: RwLock<Settings>,
    /// Mapping as last read from or written to the sidecar
    persisted: Mutex<Option<Arc<AnnotationMap>>>,
    dirty: AtomicBool,
    next_user_id: AtomicU64,
    counters: Counters,
}

impl AnnotationProvider {
    /// Create the provider with index `index` of `document`. The provider
    /// does not keep the document alive.
    pub fn new<D: DocumentHost + 'static>(
        document: &Arc<D>,
        index: usize,
        options: ProviderOptions,
    ) -> Self {
        let weak: Weak<D> = Arc::downgrade(document);
        let ProviderOptions {
            protocol,
            file_types,
            persistence_mode,
            annotations_path,
            default_username,
        } = options;

        Self {
            document: weak,
            index,
            store: PageAnnotationStore::new(),
            parser: Arc::new(PdfAnnotationParser),
            resolver: Arc::new(DefaultLinkResolver),
            persistence: Arc::new(JsonSidecarStore::new()),
            links: RwLock::new(Arc::new(LinkConfig {
                protocol,
                file_types,
            })),
            settings: RwLock::new(Settings {
                persistence_mode,
                annotations_path,
                default_username,
            }),
            persisted: Mutex::new(None),
            dirty: AtomicBool::new(false),
            next_user_id: AtomicU64::new(0),
            counters: Counters::default(),
        }
    }

    /// Replace the parse step
    pub fn with_parser(mut self, parser: impl AnnotationParser + 'static) -> Self {
        self.parser = Arc::new(parser);
        self
    }

    /// Replace the custom-link resolution step
    pub fn with_resolver(mut self, resolver: impl LinkResolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    /// Replace the sidecar store
    pub fn with_persistence(mut self, persistence: impl PersistenceAdapter + 'static) -> Self {
        self.persistence = Arc::new(persistence);
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Annotations of `page`, resolving the page first if needed.
    ///
    /// Concurrent callers asking for the same unresolved page share a single
    /// resolution. A failure to fetch the raw records is returned and the page
    /// stays unresolved, so the next call tries again.
    pub fn annotations_for_page(&self, page: u32) -> Result<PageAnnotations> {
        let document = self.document()?;
        check_page(document.as_ref(), page)?;
        self.resolved(document.as_ref(), page)
    }

    /// Force the content of `page`. `Some(list)` marks the page resolved with
    /// exactly `list` (an empty list is a resolved page without annotations);
    /// `None` drops the page so the next access resolves it again.
    pub fn set_annotations(&self, page: u32, annotations: Option<Vec<Annotation>>) -> Result<()> {
        let document = self.document()?;
        check_page(document.as_ref(), page)?;

        let change = match annotations {
            Some(annotations) => {
                self.observe_ids(&annotations);
                debug!(page, count = annotations.len(), "Replacing page annotations");
                self.store.put(page, annotations);
                self.dirty.store(true, Ordering::Release);
                AnnotationChange::Replaced
            }
            None => {
                debug!(page, "Dropping page annotations");
                self.store.invalidate(page);
                AnnotationChange::Invalidated
            }
        };

        document.annotations_did_change(page, &change);
        Ok(())
    }

    /// Append `annotations` to `page`, resolving it first if needed.
    ///
    /// Every annotation is accepted. Each one gets its page index set, an
    /// identifier if it has none, and the default username as author if it
    /// has no author. The accepted annotations are returned as stored.
    pub fn add_annotations(&self, page: u32, annotations: Vec<Annotation>) -> Result<Vec<Annotation>> {
        let document = self.document()?;
        check_page(document.as_ref(), page)?;

        let username = self.settings().default_username;
        let accepted: Vec<Annotation> = annotations
            .into_iter()
            .map(|annotation| self.prepare_added(page, annotation, username.as_deref()))
            .collect();

        // The page can be invalidated between resolving it and appending
        let accepted = loop {
            self.resolved(document.as_ref(), page)?;
            if let Some(stored) = self.store.append(page, &accepted) {
                break stored;
            }
        };

        self.dirty.store(true, Ordering::Release);
        debug!(page, count = accepted.len(), "Added annotations");
        document.annotations_did_change(
            page,
            &AnnotationChange::Added {
                count: accepted.len(),
            },
        );
        Ok(accepted)
    }

    /// Set or clear the tombstone of annotation `id` on `page`. Returns
    /// whether anything changed; an unknown id changes nothing.
    pub fn set_deleted(&self, page: u32, id: &str, deleted: bool) -> Result<bool> {
        let document = self.document()?;
        check_page(document.as_ref(), page)?;

        let current = self.resolved(document.as_ref(), page)?;
        if !current
            .iter()
            .any(|annotation| annotation.id == id && annotation.deleted != deleted)
        {
            return Ok(false);
        }

        let changed = self
            .store
            .modify(page, |annotations| {
                match annotations
                    .iter_mut()
                    .find(|annotation| annotation.id == id && annotation.deleted != deleted)
                {
                    Some(annotation) => {
                        annotation.set_deleted(deleted);
                        true
                    }
                    None => false,
                }
            })
            .unwrap_or(false);

        if changed {
            self.dirty.store(true, Ordering::Release);
            let change = if deleted {
                AnnotationChange::Deleted { id: id.to_string() }
            } else {
                AnnotationChange::Restored { id: id.to_string() }
            };
            document.annotations_did_change(page, &change);
        }
        Ok(changed)
    }

    /// Physically remove tombstoned annotations from every known page:
    /// resolved pages and pages only present in the sidecar. Returns the
    /// number of annotations removed.
    pub fn compact(&self) -> usize {
        let mut removed_per_page = Vec::new();

        let resolved = self.store.resolved_pages();
        for &page in &resolved {
            let has_tombstones = self
                .store
                .get(page)
                .is_some_and(|annotations| annotations.iter().any(Annotation::is_deleted));
            if !has_tombstones {
                continue;
            }
            let removed = self
                .store
                .modify(page, |annotations| {
                    let before = annotations.len();
                    annotations.retain(|annotation| !annotation.deleted);
                    before - annotations.len()
                })
                .unwrap_or(0);
            if removed > 0 {
                removed_per_page.push((page, removed));
            }
        }

        {
            let mut persisted = self.persisted();
            if let Some(base) = persisted.as_mut() {
                let base = Arc::make_mut(base);
                for (page, annotations) in base.iter_mut() {
                    if resolved.binary_search(page).is_ok() {
                        continue;
                    }
                    let before = annotations.len();
                    annotations.retain(|annotation| !annotation.deleted);
                    if annotations.len() < before {
                        removed_per_page.push((*page, before - annotations.len()));
                    }
                }
            }
        }

        let total: usize = removed_per_page.iter().map(|(_, removed)| removed).sum();
        if total > 0 {
            self.dirty.store(true, Ordering::Release);
            info!(removed = total, pages = removed_per_page.len(), "Compacted tombstones");
        }

        if let Some(document) = self.document.upgrade() {
            for (page, removed) in removed_per_page {
                document.annotations_did_change(page, &AnnotationChange::Compacted { removed });
            }
        }
        total
    }

    /// Drop every cached page. The next access to a page resolves it again.
    pub fn clear_cache(&self) {
        let resolved = self.store.resolved_pages();
        self.store.invalidate_all();
        *self.persisted() = None;
        self.dirty.store(false, Ordering::Release);
        debug!(pages = resolved.len(), "Cleared annotation cache");

        if let Some(document) = self.document.upgrade() {
            for page in resolved {
                document.annotations_did_change(page, &AnnotationChange::Invalidated);
            }
        }
    }

    /// Write every known page to the sidecar.
    ///
    /// Resolved pages are written over the mapping last read from the
    /// sidecar, so pages that were never resolved in this session keep their
    /// stored content. A sidecar that exists but cannot be read is an error
    /// and is left as it is. A write failure leaves the cache untouched.
    pub fn save_with_persistence(&self) -> Result<()> {
        let document = self.document()?;
        let path = self.path_for(document.as_ref());

        let mut persisted = self.persisted();
        let mut merged = match persisted.as_ref() {
            Some(base) => AnnotationMap::clone(base),
            // An unreadable sidecar blocks the save rather than being replaced
            None => self.read_sidecar(&path)?.unwrap_or_default(),
        };
        merged.extend(self.store.snapshot());

        self.persistence.save(&path, &merged)?;
        info!(path = %path.display(), pages = merged.len(), "Saved annotations");

        *persisted = Some(Arc::new(merged));
        self.dirty.store(false, Ordering::Release);
        Ok(())
    }

    /// Install every page stored in the sidecar as resolved, skipping the
    /// parser. Returns the number of pages installed. On failure the cache
    /// is left as it was.
    pub fn load_from_persistence(&self) -> Result<usize> {
        let document = self.document()?;
        let path = self.path_for(document.as_ref());
        let mapping = self.persistence.load(&path)?;
        let page_count = document.page_count();

        let mut installed = Vec::with_capacity(mapping.len());
        for (page, annotations) in &mapping {
            if *page >= page_count {
                warn!(page, page_count, "Sidecar page is outside the document; ignoring it");
                continue;
            }
            self.observe_ids(annotations);
            self.store.put(*page, annotations.clone());
            installed.push(*page);
        }

        *self.persisted() = Some(Arc::new(mapping));
        self.dirty.store(false, Ordering::Release);
        self.counters
            .loaded_pages
            .fetch_add(installed.len() as u64, Ordering::Relaxed);
        info!(path = %path.display(), pages = installed.len(), "Loaded annotations");

        for &page in &installed {
            document.annotations_did_change(page, &AnnotationChange::Loaded);
        }
        Ok(installed.len())
    }

    /// Sidecar location: the override if one is set, otherwise
    /// `<cache directory>/<document uid>/annotations_<index>.json`
    pub fn annotations_path(&self) -> Result<PathBuf> {
        let document = self.document()?;
        Ok(self.path_for(document.as_ref()))
    }

    /// Override the sidecar location; `None` goes back to the derived one
    pub fn set_annotations_path(&self, path: Option<PathBuf>) {
        self.settings_mut().annotations_path = path;
        *self.persisted() = None;
    }

    pub fn persistence_mode(&self) -> PersistenceMode {
        self.settings().persistence_mode
    }

    pub fn set_persistence_mode(&self, mode: PersistenceMode) {
        self.settings_mut().persistence_mode = mode;
    }

    pub fn protocol(&self) -> ProtocolConfig {
        self.link_config().protocol.clone()
    }

    /// Change the custom-link scheme. Pages resolved already keep the
    /// classification they got.
    pub fn set_protocol(&self, scheme: &str) {
        self.update_links(|links| links.protocol = ProtocolConfig::new(scheme));
    }

    pub fn file_type_table(&self) -> FileTypeTable {
        self.link_config().file_types.clone()
    }

    /// Replace the file-type table. Pages resolved already are not
    /// reclassified.
    pub fn set_file_type_table(&self, file_types: FileTypeTable) {
        self.update_links(|links| links.file_types = file_types);
    }

    /// Extensions currently classified as video, sorted
    pub fn video_file_types(&self) -> Vec<String> {
        self.link_config().file_types.extensions_for(MediaType::Video)
    }

    pub fn default_username(&self) -> Option<String> {
        self.settings().default_username
    }

    pub fn set_default_username(&self, username: Option<String>) {
        self.settings_mut().default_username = username;
    }

    /// Whether the cache holds writes that were not saved yet
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Resolved page indices in ascending order
    pub fn cached_pages(&self) -> Vec<u32> {
        self.store.resolved_pages()
    }

    pub fn is_page_cached(&self, page: u32) -> bool {
        self.store.is_resolved(page)
    }

    pub fn stats(&self) -> ProviderStats {
        ProviderStats {
            parses: self.counters.parses.load(Ordering::Relaxed),
            sidecar_hits: self.counters.sidecar_hits.load(Ordering::Relaxed),
            loaded_pages: self.counters.loaded_pages.load(Ordering::Relaxed),
        }
    }

    fn document(&self) -> Result<Arc<dyn DocumentHost>> {
        self.document
            .upgrade()
            .ok_or(AnnotationError::DocumentUnavailable)
    }

    fn resolved(&self, document: &dyn DocumentHost, page: u32) -> Result<PageAnnotations> {
        self.store
            .get_or_resolve(page, || self.resolve_page(document, page))
    }

    /// Load-then-parse fallback chain of one page
    fn resolve_page(&self, document: &dyn DocumentHost, page: u32) -> Result<Vec<Annotation>> {
        if self.persistence_mode() == PersistenceMode::ExternalFile {
            if let Some(stored) = self.sidecar_page(document, page) {
                self.counters.sidecar_hits.fetch_add(1, Ordering::Relaxed);
                debug!(page, count = stored.len(), "Page served from sidecar");
                return Ok(stored);
            }
        }

        let raw = document.raw_annotations(page)?;
        let links = self.link_config();
        let storage_root = document.storage_root();
        let context = ParseContext {
            protocol: &links.protocol,
            file_types: &links.file_types,
            storage_root: &storage_root,
            page_rect: document.page_rect(page),
            resolver: self.resolver.as_ref(),
        };

        let annotations = self.parser.parse(page, &raw, &context);
        self.counters.parses.fetch_add(1, Ordering::Relaxed);
        Ok(annotations)
    }

    /// Stored content of `page`. The sidecar is read once per cache lifetime;
    /// a failed read is retried on the next miss.
    fn sidecar_page(&self, document: &dyn DocumentHost, page: u32) -> Option<Vec<Annotation>> {
        let mut persisted = self.persisted();
        if persisted.is_none() {
            let path = self.path_for(document);
            let mapping = match self.read_sidecar(&path) {
                Ok(mapping) => mapping.unwrap_or_default(),
                Err(err) => {
                    // Not cached, so a later save sees the failure too
                    warn!(path = %path.display(), error = %err, "Ignoring unreadable annotation sidecar");
                    return None;
                }
            };
            for annotations in mapping.values() {
                self.observe_ids(annotations);
            }
            *persisted = Some(Arc::new(mapping));
        }
        persisted.as_ref()?.get(&page).cloned()
    }

    /// `Ok(None)` when there is no sidecar yet
    fn read_sidecar(&self, path: &std::path::Path) -> Result<Option<AnnotationMap>> {
        if !path.exists() {
            debug!(path = %path.display(), "No annotation sidecar");
            return Ok(None);
        }
        self.persistence.load(path).map(Some)
    }

    fn path_for(&self, document: &dyn DocumentHost) -> PathBuf {
        if let Some(path) = self.settings().annotations_path {
            return path;
        }
        document
            .cache_directory()
            .join(document.uid())
            .join(format!("annotations_{}.json", self.index))
    }

    fn prepare_added(
        &self,
        page: u32,
        mut annotation: Annotation,
        username: Option<&str>,
    ) -> Annotation {
        annotation.page = page;
        if annotation.id.is_empty() {
            let n = self.next_user_id.fetch_add(1, Ordering::Relaxed);
            annotation.id = format!("{USER_ID_PREFIX}{n}");
        }
        if annotation.author.is_none() {
            annotation.author = username.map(str::to_string);
        }
        annotation
    }

    /// Keep generated identifiers clear of `user-<n>` ids already in use
    fn observe_ids(&self, annotations: &[Annotation]) {
        let highest = annotations
            .iter()
            .filter_map(|annotation| annotation.id.strip_prefix(USER_ID_PREFIX))
            .filter_map(|n| n.parse::<u64>().ok())
            .max();
        if let Some(highest) = highest {
            self.next_user_id
                .fetch_max(highest.saturating_add(1), Ordering::Relaxed);
        }
    }

    fn link_config(&self) -> Arc<LinkConfig> {
        let links = self.links.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*links)
    }

    fn update_links(&self, edit: impl FnOnce(&mut LinkConfig)) {
        let mut links = self.links.write().unwrap_or_else(PoisonError::into_inner);
        let mut updated = LinkConfig::clone(&links);
        edit(&mut updated);
        *links = Arc::new(updated);
    }

    fn settings(&self) -> Settings {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn settings_mut(&self) -> std::sync::RwLockWriteGuard<'_, Settings> {
        self.settings.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn persisted(&self) -> std::sync::MutexGuard<'_, Option<Arc<AnnotationMap>>> {
        self.persisted.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn check_page(document: &dyn DocumentHost, page: u32) -> Result<()> {
    if page >= document.page_count() {
        return Err(AnnotationError::InvalidPageNumber(page));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rectangle;
    use crate::objects::Object;
    use std::path::Path;

    struct Blank {
        pages: u32,
    }

    impl DocumentHost for Blank {
        fn uid(&self) -> String {
            "doc-42".to_string()
        }
        fn page_count(&self) -> u32 {
            self.pages
        }
        fn raw_annotations(&self, _page: u32) -> Result<Vec<Object>> {
            Ok(Vec::new())
        }
        fn storage_root(&self) -> PathBuf {
            PathBuf::from("/library/doc-42")
        }
        fn cache_directory(&self) -> PathBuf {
            PathBuf::from("/cache")
        }
    }

    fn rect() -> Rectangle {
        Rectangle::from_position_and_size(0.0, 0.0, 5.0, 5.0)
    }

    #[test]
    fn test_derived_sidecar_path() {
        let document = Arc::new(Blank { pages: 1 });
        let provider = AnnotationProvider::new(&document, 2, ProviderOptions::default());
        assert_eq!(
            provider.annotations_path().unwrap(),
            Path::new("/cache/doc-42/annotations_2.json")
        );

        provider.set_annotations_path(Some(PathBuf::from("/elsewhere/a.json")));
        assert_eq!(
            provider.annotations_path().unwrap(),
            Path::new("/elsewhere/a.json")
        );
    }

    #[test]
    fn test_page_out_of_range() {
        let document = Arc::new(Blank { pages: 2 });
        let provider = AnnotationProvider::new(&document, 0, ProviderOptions::default());
        assert!(matches!(
            provider.annotations_for_page(2),
            Err(AnnotationError::InvalidPageNumber(2))
        ));
        assert!(provider.annotations_for_page(1).unwrap().is_empty());
    }

    #[test]
    fn test_dropped_document() {
        let document = Arc::new(Blank { pages: 1 });
        let provider = AnnotationProvider::new(&document, 0, ProviderOptions::default());
        drop(document);
        assert!(matches!(
            provider.annotations_for_page(0),
            Err(AnnotationError::DocumentUnavailable)
        ));
    }

    #[test]
    fn test_added_annotations_are_stamped() {
        let document = Arc::new(Blank { pages: 3 });
        let provider = AnnotationProvider::new(
            &document,
            0,
            ProviderOptions::default().with_default_username("ana"),
        );

        let accepted = provider
            .add_annotations(
                1,
                vec![
                    Annotation::note(rect(), "first"),
                    Annotation::note(rect(), "second").with_author("bo"),
                    Annotation::note(rect(), "third").with_id("mine"),
                ],
            )
            .unwrap();

        let ids: Vec<_> = accepted.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["user-0", "user-1", "mine"]);
        assert!(accepted.iter().all(|a| a.page == 1));
        assert_eq!(accepted[0].author.as_deref(), Some("ana"));
        assert_eq!(accepted[1].author.as_deref(), Some("bo"));
        assert_eq!(provider.annotations_for_page(1).unwrap().to_vec(), accepted);
    }

    #[test]
    fn test_generated_ids_skip_existing_ones() {
        let document = Arc::new(Blank { pages: 1 });
        let provider = AnnotationProvider::new(&document, 0, ProviderOptions::default());
        provider
            .set_annotations(0, Some(vec![Annotation::note(rect(), "x").with_id("user-7")]))
            .unwrap();

        let accepted = provider
            .add_annotations(0, vec![Annotation::note(rect(), "y")])
            .unwrap();
        assert_eq!(accepted[0].id, "user-8");
    }

    #[test]
    fn test_configuration_accessors() {
        let document = Arc::new(Blank { pages: 1 });
        let provider = AnnotationProvider::new(&document, 0, ProviderOptions::default());
        assert_eq!(provider.protocol().scheme(), crate::resolver::DEFAULT_PROTOCOL);
        assert!(provider.video_file_types().contains(&"mp4".to_string()));

        provider.set_protocol("MyPdf");
        assert_eq!(provider.protocol().scheme(), "mypdf://");

        provider.set_file_type_table(FileTypeTable::empty().with("webm", MediaType::Video));
        assert_eq!(provider.video_file_types(), vec!["webm".to_string()]);

        assert_eq!(provider.persistence_mode(), PersistenceMode::Disabled);
        provider.set_persistence_mode(PersistenceMode::ExternalFile);
        assert_eq!(provider.persistence_mode(), PersistenceMode::ExternalFile);
    }
}
