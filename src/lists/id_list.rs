//! Ordered, duplicate-free id list with an optional capacity.

/// Pure list state behind the favorites and compare stores. No I/O.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdList {
    ids: Vec<u64>,
    capacity: Option<usize>,
}

impl IdList {
    /// An empty list with no capacity limit.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// An empty list holding at most `capacity` ids.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            ids: Vec::new(),
            capacity: Some(capacity),
        }
    }

    /// Rebuild a list from stored ids.
    ///
    /// Duplicates keep their first position; ids beyond the capacity are
    /// dropped.
    pub fn restore(ids: impl IntoIterator<Item = u64>, capacity: Option<usize>) -> Self {
        let mut list = Self {
            ids: Vec::new(),
            capacity,
        };
        for id in ids {
            list.add(id);
        }
        list
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    /// Ids with the most recently added first.
    pub fn recent_first(&self) -> impl Iterator<Item = u64> + '_ {
        self.ids.iter().rev().copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }

    /// Whether a new id would fit.
    pub fn can_add_more(&self) -> bool {
        self.capacity.is_none_or(|cap| self.ids.len() < cap)
    }

    /// Add `id` at the end. Returns whether it is now present; `false` means
    /// the list is full and nothing changed.
    pub fn add(&mut self, id: u64) -> bool {
        if self.contains(id) {
            return true;
        }
        if !self.can_add_more() {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Remove `id`. Returns whether anything changed.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.ids.len();
        self.ids.retain(|&existing| existing != id);
        self.ids.len() != before
    }

    /// Remove `id` if present (always succeeds), otherwise try to add it.
    pub fn toggle(&mut self, id: u64) -> bool {
        if self.remove(id) {
            true
        } else {
            self.add(id)
        }
    }

    /// Empty the list. Returns whether anything changed.
    pub fn clear(&mut self) -> bool {
        let changed = !self.ids.is_empty();
        self.ids.clear();
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_is_idempotent() {
        let mut list = IdList::unbounded();
        assert!(list.add(5));
        assert!(list.add(7));
        assert!(list.add(5));
        assert_eq!(list.ids(), &[5, 7]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut list = IdList::restore([1, 2], None);
        assert!(!list.remove(9));
        assert_eq!(list.ids(), &[1, 2]);
        assert!(list.remove(1));
        assert!(!list.remove(1));
        assert_eq!(list.ids(), &[2]);
    }

    #[test]
    fn test_capacity_rejects_fifth_distinct_id() {
        let mut list = IdList::bounded(4);
        for id in [10, 20, 30, 40] {
            assert!(list.add(id));
        }
        assert!(!list.can_add_more());

        assert!(!list.add(50));
        assert_eq!(list.ids(), &[10, 20, 30, 40]);

        // Already present still succeeds at capacity
        assert!(list.add(30));
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn test_toggle_symmetry() {
        let mut list = IdList::unbounded();
        assert!(list.toggle(3));
        assert!(list.contains(3));
        assert!(list.toggle(3));
        assert!(!list.contains(3));
        assert!(list.is_empty());
    }

    #[test]
    fn test_toggle_at_capacity() {
        let mut list = IdList::restore([1, 2], Some(2));
        assert!(!list.toggle(3));
        assert_eq!(list.ids(), &[1, 2]);

        // Removing works regardless of capacity
        assert!(list.toggle(1));
        assert_eq!(list.ids(), &[2]);
        assert!(list.toggle(3));
        assert_eq!(list.ids(), &[2, 3]);
    }

    #[test]
    fn test_restore_normalizes() {
        let list = IdList::restore([4, 4, 1, 2, 3, 5, 6], Some(4));
        assert_eq!(list.ids(), &[4, 1, 2, 3]);
    }

    #[test]
    fn test_recent_first() {
        let list = IdList::restore([1, 2, 3], None);
        assert_eq!(list.recent_first().collect::<Vec<_>>(), vec![3, 2, 1]);
    }

    #[test]
    fn test_clear() {
        let mut list = IdList::restore([1, 2], None);
        assert!(list.clear());
        assert!(!list.clear());
        assert!(list.is_empty());
    }
}
