use std::collections::HashSet;

use crate::item::ItemId;

/// The set of items currently marked for batch deletion.
///
/// Sole source of truth for "is this item marked" and for the visible
/// selection count. All operations are total; there are no error paths.
/// Confirmation-cancel side effects of mutation live in the controller,
/// which owns both this store and the confirmation machine.
#[derive(Debug, Default)]
pub struct SelectionStore {
    ids: HashSet<ItemId>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle membership; returns the new membership state.
    pub fn toggle(&mut self, id: ItemId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Remove an id (terminal deletion attempt, success or failure).
    pub fn remove(&mut self, id: &ItemId) -> bool {
        self.ids.remove(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Snapshot of the current membership. Ordering is not meaningful.
    pub fn snapshot(&self) -> Vec<ItemId> {
        self.ids.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_returns_membership() {
        let mut store = SelectionStore::new();
        assert!(store.toggle(ItemId::from("a")));
        assert!(!store.toggle(ItemId::from("a")));
        assert!(store.toggle(ItemId::from("a")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_size_equals_odd_toggle_counts() {
        // a toggled 3x (odd), b toggled 2x (even), c toggled 1x (odd)
        let mut store = SelectionStore::new();
        let seq = ["a", "b", "a", "c", "b", "a"];
        for id in seq {
            store.toggle(ItemId::from(id));
        }
        assert_eq!(store.len(), 2);
        assert!(store.contains(&ItemId::from("a")));
        assert!(!store.contains(&ItemId::from("b")));
        assert!(store.contains(&ItemId::from("c")));
    }

    #[test]
    fn test_clear() {
        let mut store = SelectionStore::new();
        store.toggle(ItemId::from("a"));
        store.toggle(ItemId::from("b"));
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.snapshot().len(), 0);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut store = SelectionStore::new();
        store.toggle(ItemId::from("a"));
        assert!(store.remove(&ItemId::from("a")));
        assert!(!store.remove(&ItemId::from("a")));
    }
}
