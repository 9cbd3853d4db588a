use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// Immutable, published state of a group.
pub type SeriesList<T> = Arc<Vec<Arc<T>>>;

/// Ordered collection of series with copy-on-write mutation.
///
/// Every mutation builds the new list and swaps it in under one write lock, so a reader
/// holding a `list()` snapshot keeps seeing the old state in full and the next `list()`
/// sees the new state in full.
pub struct DataSeriesGroup<T> {
    items: RwLock<SeriesList<T>>,
}

impl<T> Default for DataSeriesGroup<T> {
    fn default() -> Self {
        Self {
            items: RwLock::new(Arc::new(Vec::new())),
        }
    }
}

impl<T> DataSeriesGroup<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, item: T) {
        self.add_shared(Arc::new(item));
    }

    pub fn add_shared(&self, item: Arc<T>) {
        let mut items = self.items.write();
        Arc::make_mut(&mut *items).push(item);
    }

    /// Removes the most recently added item. No-op on an empty group.
    pub fn remove_last(&self) -> Option<Arc<T>> {
        let mut items = self.items.write();
        if items.is_empty() {
            return None;
        }
        Arc::make_mut(&mut *items).pop()
    }

    pub fn clear_all(&self) {
        *self.items.write() = Arc::new(Vec::new());
    }

    /// Replaces the whole content with the content of `other` in one step.
    pub fn replace_all(&self, other: &DataSeriesGroup<T>) {
        let incoming = other.list();
        *self.items.write() = incoming;
    }

    /// Appends every item of `other` in one step.
    pub fn append_all(&self, other: &DataSeriesGroup<T>) {
        let incoming = other.list();
        if incoming.is_empty() {
            return;
        }
        let mut items = self.items.write();
        let mut next = Vec::with_capacity(items.len() + incoming.len());
        next.extend(items.iter().cloned());
        next.extend(incoming.iter().cloned());
        *items = Arc::new(next);
    }

    /// Snapshot of the current content. Later mutations never show through it.
    pub fn list(&self) -> SeriesList<T> {
        self.items.read().clone()
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, SeriesList<T>> {
        self.items.read()
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, SeriesList<T>> {
        self.items.write()
    }
}

impl<T> FromIterator<T> for DataSeriesGroup<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: RwLock::new(Arc::new(iter.into_iter().map(Arc::new).collect())),
        }
    }
}
