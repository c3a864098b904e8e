use core::borrow::Borrow;

use super::node::{Node, SearchResult};

impl<K: Ord + Clone, V: Clone> Node<K, V> {
    /// Recursive descent removal. Counts along the path shrink by one exactly
    /// when an entry comes out; a child left deficient is rebalanced on the
    /// way back up, so only the root may end under-occupied.
    pub(crate) fn remove_and_collapse<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.search(key) {
            SearchResult::Found(slot) if self.is_leaf() => Some(self.remove_entry(slot)),
            SearchResult::Found(slot) => {
                // An internal hit: the separator's replacement is its in-order
                // predecessor, the greatest entry of the subtree to its left.
                let predecessor = {
                    let child = self.child_mut(slot);
                    let predecessor_key = child.rightmost_key().clone();
                    child
                        .remove_and_collapse::<K>(&predecessor_key)
                        .expect("the predecessor is present in the left subtree")
                };
                let removed = self.replace_entry(slot, predecessor.0, predecessor.1);
                self.decr_count();
                self.rebalance_child(slot);
                Some(removed)
            }
            SearchResult::NotFound(_) if self.is_leaf() => None,
            SearchResult::NotFound(slot) => {
                let removed = self.child_mut(slot).remove_and_collapse(key)?;
                self.decr_count();
                self.rebalance_child(slot);
                Some(removed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::CowBTreeMap;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    fn filled(order: usize, keys: impl IntoIterator<Item = i32>) -> CowBTreeMap<i32, i32> {
        let mut map = CowBTreeMap::with_order(order);
        for key in keys {
            map.insert(key, key);
        }
        map
    }

    #[test]
    fn removing_an_internal_separator_promotes_its_predecessor() {
        // Order 4, keys [10, 20, 5, 6, 12, 30, 7, 17]: 10 ends up a separator.
        let mut map = filled(4, [10, 20, 5, 6, 12, 30, 7, 17]);
        let depth = map.depth();

        assert_eq!(map.remove(&10), Some(10));
        map.check_invariants();
        assert_eq!(map.get(&10), None);
        assert_eq!(map.rank_of(&12), Some(3));
        assert!(map.depth() == depth || map.depth() + 1 == depth);
    }

    #[test]
    fn absent_key_changes_nothing() {
        let mut map = filled(4, 0..20);
        assert_eq!(map.remove(&99), None);
        map.check_invariants();
        assert_eq!(map.len(), 20);
    }

    #[test]
    fn last_entry_out_empties_the_map() {
        let mut map = filled(4, [1, 2]);
        assert_eq!(map.remove(&2), Some(2));
        map.check_invariants();
        assert_eq!(map.len(), 1);
        assert_eq!(map.depth(), 0);

        assert_eq!(map.remove(&1), Some(1));
        map.check_invariants();
        assert!(map.is_empty());
        assert_eq!(map.remove(&1), None);
    }

    #[test]
    fn draining_by_rank_zero_reaches_empty() {
        let mut map = filled(4, 0..64);
        for expected in 0..64 {
            let (key, payload) = map.remove_by_rank(0).unwrap();
            assert_eq!((key, payload), (expected, expected));
            map.check_invariants();
        }
        assert!(map.is_empty());
        assert_eq!(map.remove_by_rank(0), None);
    }

    #[test]
    fn deep_trees_collapse_back_down() {
        let mut map = filled(3, 0..200);
        assert!(map.depth() >= 4);
        for key in 0..200 {
            assert_eq!(map.remove(&key), Some(key));
            map.check_invariants();
        }
        assert_eq!(map.depth(), 0);
        assert!(map.is_empty());
    }

    proptest! {
        #[test]
        fn random_removals_stay_balanced(
            order in 3usize..12,
            keys in proptest::collection::vec(-300i32..300, 1..300),
            removals in proptest::collection::vec(-300i32..300, 1..300),
        ) {
            let mut map = CowBTreeMap::with_order(order);
            let mut model: Vec<i32> = Vec::new();
            for key in keys {
                map.insert(key, key);
                if !model.contains(&key) {
                    model.push(key);
                }
            }

            for key in removals {
                let removed = map.remove(&key);
                if let Some(index) = model.iter().position(|&k| k == key) {
                    prop_assert_eq!(removed, Some(key));
                    model.swap_remove(index);
                } else {
                    prop_assert_eq!(removed, None);
                }
                map.check_invariants();
            }

            model.sort_unstable();
            let collected: Vec<i32> = map.keys().copied().collect();
            prop_assert_eq!(collected, model);
        }
    }
}
