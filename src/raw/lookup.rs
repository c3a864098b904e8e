use core::borrow::Borrow;

use super::node::{Node, SearchResult};

/// Where a rank falls inside an internal node.
enum RankStep {
    /// Inside the child at this index, at this rank within the child.
    Descend(usize, usize),
    /// Exactly on the separator at this slot.
    Separator(usize),
}

impl<K, V> Node<K, V> {
    /// Walks the children left to right to find where `rank` falls: inside a
    /// child subtree, or on one of the separators between them.
    fn locate_rank(&self, rank: usize) -> RankStep {
        let mut seen = 0;
        for (index, child) in self.children().iter().enumerate() {
            let through_child = seen + child.count();
            if rank < through_child {
                return RankStep::Descend(index, rank - seen);
            }
            if rank == through_child {
                return RankStep::Separator(index);
            }
            seen = through_child + 1;
        }
        unreachable!("rank exceeds the subtree count");
    }

    /// Rank → entry. The caller has already checked `rank < count`.
    pub(crate) fn select(&self, rank: usize) -> (&K, &V) {
        let mut node = self;
        let mut rank = rank;
        loop {
            debug_assert!(rank < node.count());
            if node.is_leaf() {
                return node.entry(rank);
            }
            match node.locate_rank(rank) {
                RankStep::Descend(index, within) => {
                    node = node.child(index);
                    rank = within;
                }
                RankStep::Separator(slot) => return node.entry(slot),
            }
        }
    }
}

impl<K: Ord, V> Node<K, V> {
    /// Key → payload descent from this subtree's root.
    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.get_entry(key).map(|(_, payload)| payload)
    }

    pub(crate) fn get_entry<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut node = self;
        loop {
            match node.search(key) {
                SearchResult::Found(slot) => return Some(node.entry(slot)),
                SearchResult::NotFound(slot) => {
                    if node.is_leaf() {
                        return None;
                    }
                    node = node.child(slot);
                }
            }
        }
    }

    /// Key → rank: sums every entry left of the descent at each level, one
    /// per separator passed plus the whole subtrees skipped over.
    pub(crate) fn rank_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut node = self;
        let mut rank = 0;
        loop {
            match node.search(key) {
                SearchResult::Found(slot) => {
                    if !node.is_leaf() {
                        rank += slot
                            + node.children()[..=slot]
                                .iter()
                                .map(|child| child.count())
                                .sum::<usize>();
                        return Some(rank);
                    }
                    return Some(rank + slot);
                }
                SearchResult::NotFound(slot) => {
                    if node.is_leaf() {
                        return None;
                    }
                    rank += slot
                        + node.children()[..slot]
                            .iter()
                            .map(|child| child.count())
                            .sum::<usize>();
                    node = node.child(slot);
                }
            }
        }
    }
}

impl<K: Clone, V: Clone> Node<K, V> {
    /// Rank → entry with a mutable payload; shared nodes on the path are
    /// un-shared on the way down.
    pub(crate) fn select_mut(&mut self, rank: usize) -> (&K, &mut V) {
        debug_assert!(rank < self.count());
        if self.is_leaf() {
            return self.entry_mut(rank);
        }
        match self.locate_rank(rank) {
            RankStep::Descend(index, within) => self.child_mut(index).select_mut(within),
            RankStep::Separator(slot) => self.entry_mut(slot),
        }
    }

    /// Key → mutable payload. Shared nodes on the search path are un-shared
    /// even when the key turns out to be absent.
    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Ord + Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.search(key) {
            SearchResult::Found(slot) => Some(self.payload_mut(slot)),
            SearchResult::NotFound(slot) => {
                if self.is_leaf() {
                    None
                } else {
                    self.child_mut(slot).get_mut(key)
                }
            }
        }
    }
}
