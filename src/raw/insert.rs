use super::node::{Node, SearchResult, Splinter};

/// Outcome of one recursive insertion step.
pub(crate) enum InsertResult<K, V> {
    /// A fresh key went in; carries the splinter when this subtree's root
    /// overflowed and split.
    Inserted(Option<Splinter<K, V>>),
    /// The key was present and `replace` was set: the payload was swapped in
    /// place and the previous one comes back.
    Replaced(V),
    /// The key was present and `replace` was not set; nothing changed.
    Rejected,
}

impl<K: Ord + Clone, V: Clone> Node<K, V> {
    /// Recursive descent insertion. Counts along the path grow by one exactly
    /// when a fresh key lands; splits propagate bottom-up through the
    /// returned splinter, so an observer never sees an overfull node.
    pub(crate) fn insert_and_split(&mut self, key: K, payload: V, replace: bool) -> InsertResult<K, V> {
        match self.search(&key) {
            SearchResult::Found(slot) => {
                if replace {
                    InsertResult::Replaced(self.replace_payload(slot, payload))
                } else {
                    InsertResult::Rejected
                }
            }
            SearchResult::NotFound(slot) if self.is_leaf() => {
                self.insert_entry(slot, key, payload);
                InsertResult::Inserted(self.split_if_overfull())
            }
            SearchResult::NotFound(slot) => {
                match self.child_mut(slot).insert_and_split(key, payload, replace) {
                    InsertResult::Inserted(splinter) => {
                        self.incr_count();
                        if let Some(splinter) = splinter {
                            self.absorb_splinter(slot, splinter);
                        }
                        InsertResult::Inserted(self.split_if_overfull())
                    }
                    outcome => outcome,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::CowBTreeMap;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    #[test]
    fn splits_keep_every_invariant() {
        let mut map = CowBTreeMap::with_order(4);
        for key in [10, 20, 5, 6, 12, 30, 7, 17] {
            map.insert(key, key);
            map.check_invariants();
        }
        assert_eq!(map.len(), 8);
        assert_eq!(map.get(&12), Some(&12));
        assert_eq!(map.rank_of(&12), Some(4));
    }

    #[test]
    fn overflow_by_one_grows_the_root() {
        let mut map = CowBTreeMap::with_order(8);
        for key in 0..7 {
            map.insert(key, key);
        }
        assert_eq!(map.depth(), 0);
        map.insert(7, 7);
        map.check_invariants();
        assert_eq!(map.depth(), 1);
        assert_eq!(map.len(), 8);
    }

    #[test]
    fn rejected_duplicate_leaves_the_tree_alone() {
        let mut map = CowBTreeMap::with_order(4);
        for key in 0..32 {
            map.insert(key, key);
        }
        let before: Vec<_> = map.iter().map(|(k, v)| (*k, *v)).collect();

        assert!(map.try_insert(13, 999).is_err());
        map.check_invariants();
        let after: Vec<_> = map.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(before, after);
        assert_eq!(map.get(&13), Some(&13));
    }

    proptest! {
        #[test]
        fn random_insertions_stay_balanced(
            order in 3usize..12,
            keys in proptest::collection::vec(-500i32..500, 1..400),
        ) {
            let mut map = CowBTreeMap::with_order(order);
            let mut model: Vec<i32> = Vec::new();

            for key in keys {
                let previous = map.insert(key, key * 2);
                prop_assert_eq!(previous.is_some(), model.contains(&key));
                if !model.contains(&key) {
                    model.push(key);
                }
                map.check_invariants();
            }

            model.sort_unstable();
            let collected: Vec<i32> = map.keys().copied().collect();
            prop_assert_eq!(collected, model);
        }
    }
}
