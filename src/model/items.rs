use std::cmp::Ordering;
use std::ops::Range;

/// Structural change to an [`ObservableList`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListChange {
    /// `count` items were inserted starting at `at`.
    Inserted { at: usize, count: usize },
    /// `count` items starting at `at` were removed.
    Removed { at: usize, count: usize },
    /// The item at `index` was replaced by a different value.
    Updated { index: usize },
    /// Items were reordered; the item previously at `i` is now at
    /// `new_index_of[i]`.
    Permuted { new_index_of: Vec<usize> },
    /// The whole content was replaced. `retained` lists rows whose item is
    /// equal to the old item at the same row.
    Replaced { len: usize, retained: Vec<usize> },
}

/// An ordered, index-addressable list that records every structural change
/// so the selection engine can keep its indices in step.
#[derive(Debug, Clone)]
pub struct ObservableList<T> {
    items: Vec<T>,
    pending: Vec<ListChange>,
}

impl<T> Default for ObservableList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pending: Vec::new(),
        }
    }
}

impl<T> ObservableList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            items,
            pending: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn push(&mut self, item: T) {
        let at = self.items.len();
        self.items.push(item);
        self.record(ListChange::Inserted { at, count: 1 });
    }

    /// Insert `item` at `at`, clamped to the end of the list.
    pub fn insert(&mut self, at: usize, item: T) {
        let at = at.min(self.items.len());
        self.items.insert(at, item);
        self.record(ListChange::Inserted { at, count: 1 });
    }

    pub fn insert_many(&mut self, at: usize, items: impl IntoIterator<Item = T>) {
        let at = at.min(self.items.len());
        let before = self.items.len();
        self.items.splice(at..at, items);
        let count = self.items.len() - before;
        if count > 0 {
            self.record(ListChange::Inserted { at, count });
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.items.len() {
            return None;
        }
        let item = self.items.remove(index);
        self.record(ListChange::Removed { at: index, count: 1 });
        Some(item)
    }

    /// Remove the items in `range`, clamped to the list bounds.
    pub fn remove_range(&mut self, range: Range<usize>) -> Vec<T> {
        let end = range.end.min(self.items.len());
        let start = range.start.min(end);
        if start == end {
            return Vec::new();
        }
        let removed: Vec<T> = self.items.drain(start..end).collect();
        self.record(ListChange::Removed {
            at: start,
            count: removed.len(),
        });
        removed
    }

    pub fn clear(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let count = self.items.len();
        self.items.clear();
        self.record(ListChange::Removed { at: 0, count });
    }

    /// Stable sort, recording the resulting permutation.
    pub fn sort_by(&mut self, mut compare: impl FnMut(&T, &T) -> Ordering) {
        let mut order: Vec<usize> = (0..self.items.len()).collect();
        order.sort_by(|&a, &b| compare(&self.items[a], &self.items[b]));

        let mut new_index_of = vec![0; order.len()];
        for (new_idx, &old_idx) in order.iter().enumerate() {
            new_index_of[old_idx] = new_idx;
        }
        if new_index_of.iter().enumerate().all(|(i, &n)| i == n) {
            return;
        }

        let mut slots: Vec<Option<T>> = self.items.drain(..).map(Some).collect();
        self.items = order
            .iter()
            .filter_map(|&old_idx| slots[old_idx].take())
            .collect();
        self.record(ListChange::Permuted { new_index_of });
    }

    /// Queued changes, oldest first.
    pub fn drain_changes(&mut self) -> Vec<ListChange> {
        std::mem::take(&mut self.pending)
    }

    pub fn has_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    fn record(&mut self, change: ListChange) {
        tracing::trace!(?change, "list changed");
        self.pending.push(change);
    }
}

impl<T: PartialEq> ObservableList<T> {
    /// Replace the item at `index`. Setting an equal value records nothing.
    pub fn set(&mut self, index: usize, item: T) -> Option<T> {
        let slot = self.items.get_mut(index)?;
        if *slot == item {
            return Some(item);
        }
        let old = std::mem::replace(slot, item);
        self.record(ListChange::Updated { index });
        Some(old)
    }

    /// Replace the whole content at once.
    pub fn set_all(&mut self, items: Vec<T>) {
        let retained = self
            .items
            .iter()
            .zip(items.iter())
            .enumerate()
            .filter(|(_, (old, new))| old == new)
            .map(|(i, _)| i)
            .collect();
        self.items = items;
        self.record(ListChange::Replaced {
            len: self.items.len(),
            retained,
        });
    }
}

impl<T> From<Vec<T>> for ObservableList<T> {
    fn from(items: Vec<T>) -> Self {
        Self::from_vec(items)
    }
}

impl<T> std::ops::Index<usize> for ObservableList<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}
