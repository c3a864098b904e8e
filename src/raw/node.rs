use alloc::sync::Arc;
use alloc::vec::Vec;
use core::borrow::Borrow;

/// Smallest fanout for which the balance rules are self-consistent.
pub(crate) const MIN_ORDER: usize = 3;

/// Byte budget for a full node's keys under the default fanout: 2^13 - 1, so
/// a loaded node stays near 8 KiB without the key vector sitting on a
/// power-of-two length exactly when the node overflows.
const NODE_SIZE_TARGET: usize = 8191;

/// Fanout floor of the default order, for very large key types.
const MIN_DEFAULT_ORDER: usize = 32;

/// Picks the fanout used by `CowBTreeMap::new` for the key type `K`.
pub(crate) fn default_order<K>() -> usize {
    let key_size = size_of::<K>().max(1);
    (NODE_SIZE_TARGET / key_size).max(MIN_DEFAULT_ORDER)
}

/// A node of a classical B-tree: keys and payloads live at every level,
/// children only in internal nodes (`children` is empty for a leaf, and holds
/// `keys.len() + 1` subtrees otherwise).
///
/// `count` is the number of entries in the whole subtree. Children are
/// reference counted so distinct map values share unmodified subtrees;
/// mutation goes through [`Node::child_mut`], which un-shares a child before
/// handing out the borrow.
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    order: usize,
    count: usize,
    keys: Vec<K>,
    payloads: Vec<V>,
    children: Vec<Arc<Node<K, V>>>,
}

/// Result of the in-node binary search.
pub(crate) enum SearchResult {
    /// Key sits at this slot.
    Found(usize),
    /// Key is absent from this node; an insertion would go at this slot, and
    /// a descent continues into the child at this slot.
    NotFound(usize),
}

/// The right half split off an overfull node, together with the separator
/// entry promoted to the parent.
pub(crate) struct Splinter<K, V> {
    pub(crate) key: K,
    pub(crate) payload: V,
    pub(crate) right: Arc<Node<K, V>>,
}

impl<K, V> Node<K, V> {
    /// Creates an empty leaf.
    pub(crate) fn leaf(order: usize) -> Self {
        debug_assert!(order >= MIN_ORDER);
        Self {
            order,
            count: 0,
            keys: Vec::new(),
            payloads: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builds the replacement root after the old root split: one separator,
    /// the old root on the left, the splinter's half on the right. This is
    /// the only place tree depth grows.
    pub(crate) fn root_from_splinter(left: Arc<Node<K, V>>, splinter: Splinter<K, V>) -> Self {
        Self {
            order: left.order,
            count: left.count + 1 + splinter.right.count,
            keys: alloc::vec![splinter.key],
            payloads: alloc::vec![splinter.payload],
            children: alloc::vec![left, splinter.right],
        }
    }

    /// Number of entries in the whole subtree.
    pub(crate) fn count(&self) -> usize {
        self.count
    }

    /// Number of keys held directly in this node.
    pub(crate) fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn max_keys(&self) -> usize {
        self.order - 1
    }

    pub(crate) fn min_children(&self) -> usize {
        self.order.div_ceil(2)
    }

    pub(crate) fn min_keys(&self) -> usize {
        self.min_children() - 1
    }

    /// True when an insertion left this node with more keys than the order
    /// admits and it must split.
    pub(crate) fn is_overfull(&self) -> bool {
        self.keys.len() > self.max_keys()
    }

    /// True when a removal left this (non-root) node below the balance floor.
    pub(crate) fn is_deficient(&self) -> bool {
        self.keys.len() < self.min_keys()
    }

    /// True when this node can give a key to a sibling without itself
    /// becoming deficient.
    pub(crate) fn can_lend(&self) -> bool {
        self.keys.len() > self.min_keys()
    }

    #[inline]
    pub(crate) fn entry(&self, slot: usize) -> (&K, &V) {
        (&self.keys[slot], &self.payloads[slot])
    }

    /// The key stays shared; mutating it could break the ordering.
    #[inline]
    pub(crate) fn entry_mut(&mut self, slot: usize) -> (&K, &mut V) {
        (&self.keys[slot], &mut self.payloads[slot])
    }

    #[inline]
    pub(crate) fn payload_mut(&mut self, slot: usize) -> &mut V {
        &mut self.payloads[slot]
    }

    #[inline]
    pub(crate) fn child(&self, index: usize) -> &Node<K, V> {
        &self.children[index]
    }

    pub(crate) fn children(&self) -> &[Arc<Node<K, V>>] {
        &self.children
    }

    pub(crate) fn incr_count(&mut self) {
        self.count += 1;
    }

    pub(crate) fn decr_count(&mut self) {
        self.count -= 1;
    }

    /// Recomputes `count` from this node's own keys and its children.
    pub(crate) fn recount(&mut self) {
        self.count = self.keys.len() + self.children.iter().map(|child| child.count).sum::<usize>();
    }

    /// Binary search within this node's keys.
    #[inline]
    pub(crate) fn search<Q>(&self, key: &Q) -> SearchResult
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.keys.binary_search_by(|probe| probe.borrow().cmp(key)) {
            Ok(slot) => SearchResult::Found(slot),
            Err(slot) => SearchResult::NotFound(slot),
        }
    }

    /// Key of the greatest entry in this subtree.
    pub(crate) fn rightmost_key(&self) -> &K {
        let mut node = self;
        while let Some(child) = node.children.last() {
            node = child;
        }
        node.keys.last().expect("a live node holds at least one key")
    }

    /// Splices an entry into a leaf.
    pub(crate) fn insert_entry(&mut self, slot: usize, key: K, payload: V) {
        debug_assert!(self.is_leaf());
        self.keys.insert(slot, key);
        self.payloads.insert(slot, payload);
        self.count += 1;
    }

    /// Splices an entry out of a leaf.
    pub(crate) fn remove_entry(&mut self, slot: usize) -> (K, V) {
        debug_assert!(self.is_leaf());
        self.count -= 1;
        (self.keys.remove(slot), self.payloads.remove(slot))
    }

    /// Swaps the payload at `slot`, returning the previous one.
    pub(crate) fn replace_payload(&mut self, slot: usize, payload: V) -> V {
        core::mem::replace(&mut self.payloads[slot], payload)
    }

    /// Overwrites the entry at `slot` and returns the old one. The count is
    /// unchanged; used when a removed separator is replaced by its in-order
    /// predecessor.
    pub(crate) fn replace_entry(&mut self, slot: usize, key: K, payload: V) -> (K, V) {
        (
            core::mem::replace(&mut self.keys[slot], key),
            core::mem::replace(&mut self.payloads[slot], payload),
        )
    }

    /// Splits this overfull node at the median. The left half stays in
    /// `self`; the median and the right half come back as a [`Splinter`] for
    /// the parent to absorb. Both halves' counts are recomputed from scratch.
    pub(crate) fn split(&mut self) -> Splinter<K, V> {
        let median = self.keys.len() / 2;
        let keys = self.keys.split_off(median + 1);
        let payloads = self.payloads.split_off(median + 1);
        let children = if self.is_leaf() {
            Vec::new()
        } else {
            self.children.split_off(median + 1)
        };
        let payload = self.payloads.pop().unwrap();
        let key = self.keys.pop().unwrap();

        let mut right = Node {
            order: self.order,
            count: 0,
            keys,
            payloads,
            children,
        };
        right.recount();
        self.recount();

        Splinter {
            key,
            payload,
            right: Arc::new(right),
        }
    }

    /// Inserts a splinter produced by the child at `slot`: the separator goes
    /// into `slot` and the right half becomes the child after it. The subtree
    /// count is untouched; the entries only moved up a level.
    pub(crate) fn absorb_splinter(&mut self, slot: usize, splinter: Splinter<K, V>) {
        self.keys.insert(slot, splinter.key);
        self.payloads.insert(slot, splinter.payload);
        self.children.insert(slot + 1, splinter.right);
    }

    pub(crate) fn split_if_overfull(&mut self) -> Option<Splinter<K, V>> {
        self.is_overfull().then(|| self.split())
    }

    /// Detaches the sole child of a keyless internal root; the caller makes
    /// it the new root. This is the only place tree depth shrinks.
    pub(crate) fn take_only_child(&mut self) -> Arc<Node<K, V>> {
        debug_assert!(self.keys.is_empty() && self.children.len() == 1);
        self.count = 0;
        self.children.pop().expect("a collapsing root keeps exactly one child")
    }

    /// Surrenders the rightmost child; `count` stops covering it until
    /// [`Node::attach_rightmost_child`] hands one back.
    pub(crate) fn detach_rightmost_child(&mut self) -> Arc<Node<K, V>> {
        let child = self.children.pop().expect("only internal nodes detach children");
        self.count -= child.count;
        child
    }

    pub(crate) fn attach_rightmost_child(&mut self, child: Arc<Node<K, V>>) {
        self.count += child.count;
        self.children.push(child);
    }

    /// Appends an entry in the trailing slot of a rightmost leaf.
    pub(crate) fn push_entry(&mut self, key: K, payload: V) {
        debug_assert!(self.is_leaf());
        self.keys.push(key);
        self.payloads.push(payload);
        self.count += 1;
    }

    /// Appends a separator and the finished child to its left; used by the
    /// append spine when the level below splits.
    pub(crate) fn push_separator_and_child(&mut self, key: K, payload: V, child: Arc<Node<K, V>>) {
        self.count += 1 + child.count;
        self.keys.push(key);
        self.payloads.push(payload);
        self.children.push(child);
    }
}

impl<K: Clone, V: Clone> Node<K, V> {
    /// Clone-on-write access to a child: a shared child is cloned one level
    /// deep before the mutable borrow is handed out.
    pub(crate) fn child_mut(&mut self, index: usize) -> &mut Node<K, V> {
        Arc::make_mut(&mut self.children[index])
    }

    /// Restores the balance floor for the child at `slot` after a removal
    /// inside it: borrow a key from a sibling that can spare one, otherwise
    /// merge with a sibling.
    pub(crate) fn rebalance_child(&mut self, slot: usize) {
        if !self.children[slot].is_deficient() {
            return;
        }
        if slot > 0 && self.children[slot - 1].can_lend() {
            self.rotate_right(slot);
        } else if slot + 1 < self.children.len() && self.children[slot + 1].can_lend() {
            self.rotate_left(slot);
        } else if slot > 0 {
            self.merge_down(slot - 1);
        } else {
            self.merge_down(slot);
        }
    }

    /// Moves the greatest entry of the left sibling up into the separator and
    /// the separator down to the front of the deficient child at `slot`,
    /// carrying the sibling's last child across when the level is internal.
    fn rotate_right(&mut self, slot: usize) {
        let (left, right) = self.children.split_at_mut(slot);
        let donor = Arc::make_mut(left.last_mut().expect("rotate_right needs a left sibling"));
        let recipient = Arc::make_mut(&mut right[0]);

        let donor_key = donor.keys.pop().unwrap();
        let donor_payload = donor.payloads.pop().unwrap();
        let grandchild = donor.children.pop();
        let moved = 1 + grandchild.as_ref().map_or(0, |g| g.count);
        donor.count -= moved;
        recipient.count += moved;

        let key = core::mem::replace(&mut self.keys[slot - 1], donor_key);
        let payload = core::mem::replace(&mut self.payloads[slot - 1], donor_payload);
        recipient.keys.insert(0, key);
        recipient.payloads.insert(0, payload);
        if let Some(grandchild) = grandchild {
            recipient.children.insert(0, grandchild);
        }
    }

    /// Mirror image of [`Node::rotate_right`]: the right sibling donates its
    /// least entry through the separator at `slot`.
    fn rotate_left(&mut self, slot: usize) {
        let (left, right) = self.children.split_at_mut(slot + 1);
        let recipient = Arc::make_mut(left.last_mut().expect("rotate_left targets a child"));
        let donor = Arc::make_mut(&mut right[0]);

        let donor_key = donor.keys.remove(0);
        let donor_payload = donor.payloads.remove(0);
        let grandchild = if donor.is_leaf() {
            None
        } else {
            Some(donor.children.remove(0))
        };
        let moved = 1 + grandchild.as_ref().map_or(0, |g| g.count);
        donor.count -= moved;
        recipient.count += moved;

        let key = core::mem::replace(&mut self.keys[slot], donor_key);
        let payload = core::mem::replace(&mut self.payloads[slot], donor_payload);
        recipient.keys.push(key);
        recipient.payloads.push(payload);
        if let Some(grandchild) = grandchild {
            recipient.children.push(grandchild);
        }
    }

    /// Merges the child after the separator at `sep` into the child before
    /// it, pulling the separator down between the two halves. The parent
    /// loses one key and one child; its subtree count is unchanged.
    fn merge_down(&mut self, sep: usize) {
        let key = self.keys.remove(sep);
        let payload = self.payloads.remove(sep);
        let right = Arc::unwrap_or_clone(self.children.remove(sep + 1));
        let left = Arc::make_mut(&mut self.children[sep]);
        left.keys.push(key);
        left.payloads.push(payload);
        left.keys.extend(right.keys);
        left.payloads.extend(right.payloads);
        left.children.extend(right.children);
        left.count += 1 + right.count;
    }
}

#[cfg(test)]
impl<K: Ord, V> Node<K, V> {
    pub(crate) fn order(&self) -> usize {
        self.order
    }

    /// Walks the subtree asserting every structural invariant; returns the
    /// verified `(count, depth)` of the subtree.
    pub(crate) fn check_invariants(
        &self,
        is_root: bool,
        lower: Option<&K>,
        upper: Option<&K>,
    ) -> (usize, usize) {
        assert_eq!(self.keys.len(), self.payloads.len(), "keys and payloads out of step");
        assert!(self.keys.len() <= self.max_keys(), "node is overfull");
        if is_root {
            assert!(self.is_leaf() || !self.keys.is_empty(), "internal root lost its last key");
        } else {
            assert!(self.keys.len() >= self.min_keys(), "node is deficient");
        }
        for window in self.keys.windows(2) {
            assert!(window[0] < window[1], "keys not strictly ascending");
        }
        if let (Some(lower), Some(first)) = (lower, self.keys.first()) {
            assert!(lower < first, "key at or below the subtree's lower bound");
        }
        if let (Some(upper), Some(last)) = (upper, self.keys.last()) {
            assert!(last < upper, "key at or above the subtree's upper bound");
        }

        if self.is_leaf() {
            assert_eq!(self.count, self.keys.len(), "leaf count out of date");
            return (self.count, 0);
        }

        assert_eq!(self.children.len(), self.keys.len() + 1, "child count out of step");
        let mut total = self.keys.len();
        let mut child_depth = None;
        for (index, child) in self.children.iter().enumerate() {
            assert_eq!(child.order, self.order, "fanout differs across the tree");
            let lower = if index == 0 { lower } else { Some(&self.keys[index - 1]) };
            let upper = if index == self.keys.len() { upper } else { Some(&self.keys[index]) };
            let (count, depth) = child.check_invariants(false, lower, upper);
            total += count;
            match child_depth {
                None => child_depth = Some(depth),
                Some(expected) => assert_eq!(depth, expected, "leaves at unequal depth"),
            }
        }
        assert_eq!(self.count, total, "subtree count out of date");
        (total, child_depth.unwrap() + 1)
    }

    /// Distance from this node down to its leaves.
    pub(crate) fn depth(&self) -> usize {
        self.children.first().map_or(0, |child| child.depth() + 1)
    }
}
