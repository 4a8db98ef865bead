//! Per-page annotation storage
//!
//! Each page owns a slot with its own mutex and condition variable. The map
//! of slots is behind a `RwLock` that is only held long enough to find or
//! create a slot, so resolving page 3 never blocks a reader of page 7.
//!
//! A slot moves through `Unresolved -> Resolving -> Resolved`. Exactly one
//! caller performs the resolution of an unresolved page; callers that arrive
//! while it runs wait on the slot's condition variable and receive the same
//! result. Resolved content is an immutable `Arc<[Annotation]>` snapshot;
//! writers swap in a new snapshot, so readers that hold an older one are never
//! blocked or invalidated.
//!
//! Every write bumps the slot's epoch. A resolution only installs its result
//! if the epoch it started from is still current, so a write that lands while
//! a parse is in flight is never overwritten by the parse.

use crate::annotations::Annotation;
use crate::error::Result;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, RwLock};

/// Shared snapshot of one page's annotations
pub type PageAnnotations = Arc<[Annotation]>;

/// Full page-indexed mapping, as saved to and loaded from a sidecar
pub type AnnotationMap = BTreeMap<u32, Vec<Annotation>>;

enum SlotState {
    Unresolved,
    Resolving,
    Resolved(PageAnnotations),
}

struct SlotInner {
    state: SlotState,
    epoch: u64,
}

struct PageSlot {
    inner: Mutex<SlotInner>,
    ready: Condvar,
}

impl PageSlot {
    fn new() -> Self {
        Self {
            inner: Mutex::new(SlotInner {
                state: SlotState::Unresolved,
                epoch: 0,
            }),
            ready: Condvar::new(),
        }
    }

    // A panicking parser must not wedge the page for everyone else, so
    // poisoning is ignored; the slot state is always left consistent.
    fn lock(&self) -> MutexGuard<'_, SlotInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn reset(&self) {
        let mut inner = self.lock();
        inner.epoch += 1;
        inner.state = SlotState::Unresolved;
        self.ready.notify_all();
    }
}

/// Releases a claimed slot if the resolver unwinds before finishing
struct ResolutionClaim<'a> {
    slot: &'a PageSlot,
    epoch: u64,
    finished: bool,
}

impl ResolutionClaim<'_> {
    fn finish(mut self, outcome: Result<Vec<Annotation>>) -> Result<PageAnnotations> {
        self.finished = true;
        let mut inner = self.slot.lock();
        let current = inner.epoch == self.epoch;

        let result = match outcome {
            Ok(annotations) => {
                let annotations: PageAnnotations = annotations.into();
                if current {
                    inner.state = SlotState::Resolved(Arc::clone(&annotations));
                    Ok(annotations)
                } else if let SlotState::Resolved(written) = &inner.state {
                    // A write won the race; hand out what was written
                    Ok(Arc::clone(written))
                } else {
                    Ok(annotations)
                }
            }
            Err(err) => {
                if current {
                    inner.state = SlotState::Unresolved;
                }
                Err(err)
            }
        };

        self.slot.ready.notify_all();
        result
    }
}

impl Drop for ResolutionClaim<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let mut inner = self.slot.lock();
        if inner.epoch == self.epoch && matches!(inner.state, SlotState::Resolving) {
            inner.state = SlotState::Unresolved;
        }
        self.slot.ready.notify_all();
    }
}

/// Thread-safe mapping from page index to that page's annotation sequence.
///
/// A page is present only once it has been resolved or written. An empty
/// sequence is a resolved page with no annotations, which is distinct from
/// an absent page.
pub struct PageAnnotationStore {
    slots: RwLock<HashMap<u32, Arc<PageSlot>>>,
}

impl PageAnnotationStore {
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }

    fn slot(&self, page: u32) -> Option<Arc<PageSlot>> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.get(&page).cloned()
    }

    fn slot_or_insert(&self, page: u32) -> Arc<PageSlot> {
        if let Some(slot) = self.slot(page) {
            return slot;
        }
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            slots
                .entry(page)
                .or_insert_with(|| Arc::new(PageSlot::new())),
        )
    }

    fn all_slots(&self) -> Vec<(u32, Arc<PageSlot>)> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        let mut all: Vec<_> = slots
            .iter()
            .map(|(page, slot)| (*page, Arc::clone(slot)))
            .collect();
        all.sort_by_key(|(page, _)| *page);
        all
    }

    /// Resolved content of `page`; `None` while the page is unresolved or
    /// still being resolved
    pub fn get(&self, page: u32) -> Option<PageAnnotations> {
        let slot = self.slot(page)?;
        let inner = slot.lock();
        match &inner.state {
            SlotState::Resolved(annotations) => Some(Arc::clone(annotations)),
            _ => None,
        }
    }

    /// Replace the content of `page`, marking it resolved
    pub fn put(&self, page: u32, annotations: Vec<Annotation>) {
        let slot = self.slot_or_insert(page);
        let mut inner = slot.lock();
        inner.epoch += 1;
        inner.state = SlotState::Resolved(annotations.into());
        slot.ready.notify_all();
    }

    /// Append to a resolved page, keeping what is there, and return the
    /// accepted annotations. `None` leaves the store untouched: the page is
    /// not resolved.
    pub fn append(&self, page: u32, annotations: &[Annotation]) -> Option<Vec<Annotation>> {
        self.modify(page, |current| {
            current.extend_from_slice(annotations);
            annotations.to_vec()
        })
    }

    /// Copy-on-write edit of a resolved page. `None` if the page is not
    /// resolved; the closure is not called in that case.
    pub fn modify<R>(&self, page: u32, edit: impl FnOnce(&mut Vec<Annotation>) -> R) -> Option<R> {
        let slot = self.slot(page)?;
        let mut inner = slot.lock();
        let SlotState::Resolved(current) = &inner.state else {
            return None;
        };

        let mut annotations = current.to_vec();
        let result = edit(&mut annotations);
        inner.epoch += 1;
        inner.state = SlotState::Resolved(annotations.into());
        Some(result)
    }

    /// Return the resolved content of `page`, running `resolve` if nobody has
    /// resolved it yet.
    ///
    /// At most one `resolve` runs per page at a time. Concurrent callers for
    /// the same page block until it finishes and share its result. If
    /// `resolve` fails, the page goes back to unresolved and the error is
    /// returned to the caller that ran it; waiting callers retry.
    pub fn get_or_resolve<F>(&self, page: u32, resolve: F) -> Result<PageAnnotations>
    where
        F: FnOnce() -> Result<Vec<Annotation>>,
    {
        let slot = self.slot_or_insert(page);

        let epoch = {
            let mut inner = slot
                .ready
                .wait_while(slot.lock(), |inner| {
                    matches!(inner.state, SlotState::Resolving)
                })
                .unwrap_or_else(PoisonError::into_inner);

            if let SlotState::Resolved(annotations) = &inner.state {
                return Ok(Arc::clone(annotations));
            }
            inner.state = SlotState::Resolving;
            inner.epoch
        };

        let claim = ResolutionClaim {
            slot: &slot,
            epoch,
            finished: false,
        };
        let outcome = resolve();
        claim.finish(outcome)
    }

    /// Forget `page`; the next access resolves it again
    pub fn invalidate(&self, page: u32) {
        if let Some(slot) = self.slot(page) {
            slot.reset();
        }
    }

    /// Forget every page
    pub fn invalidate_all(&self) {
        for (_, slot) in self.all_slots() {
            slot.reset();
        }
    }

    pub fn is_resolved(&self, page: u32) -> bool {
        self.get(page).is_some()
    }

    /// Resolved page indices in ascending order
    pub fn resolved_pages(&self) -> Vec<u32> {
        self.all_slots()
            .into_iter()
            .filter(|(_, slot)| matches!(slot.lock().state, SlotState::Resolved(_)))
            .map(|(page, _)| page)
            .collect()
    }

    /// Copy of every resolved page
    pub fn snapshot(&self) -> AnnotationMap {
        self.all_slots()
            .into_iter()
            .filter_map(|(page, slot)| match &slot.lock().state {
                SlotState::Resolved(annotations) => Some((page, annotations.to_vec())),
                _ => None,
            })
            .collect()
    }
}

impl Default for PageAnnotationStore {
    fn default() -> Self {
        Self::new()
    }
}
