use alloc::sync::Arc;
use core::mem;

use smallvec::SmallVec;

use super::node::{Node, Splinter};

/// The materialised rightmost spine of a tree during a sorted bulk append.
///
/// `levels[0]` is the rightmost leaf; every level above it has surrendered
/// its rightmost child to the level below, so each node here is uniquely
/// owned and its `count` covers only what is still attached. An appended
/// entry lands in the leaf's trailing slot without a search, and overflow
/// walks upward one level at a time, which makes the whole append amortised
/// O(1) per entry.
pub(crate) struct AppendSpine<K, V> {
    levels: SmallVec<[Node<K, V>; 8]>,
    order: usize,
}

impl<K: Clone, V: Clone> AppendSpine<K, V> {
    /// Takes the tree apart along its rightmost edge. Shared spine nodes are
    /// cloned out of their `Arc`s here, so the in-place pushes that follow
    /// can never reach another map value.
    pub(crate) fn descend(root: Option<Arc<Node<K, V>>>, order: usize) -> Self {
        let mut levels: SmallVec<[Node<K, V>; 8]> = SmallVec::new();
        match root {
            None => levels.push(Node::leaf(order)),
            Some(root) => {
                let mut node = Arc::unwrap_or_clone(root);
                while !node.is_leaf() {
                    let below = node.detach_rightmost_child();
                    levels.push(node);
                    node = Arc::unwrap_or_clone(below);
                }
                levels.push(node);
                levels.reverse();
            }
        }
        Self { levels, order }
    }

    /// Appends one entry past the current maximum key. The caller has
    /// validated the ordering.
    pub(crate) fn push(&mut self, key: K, payload: V) {
        self.levels[0].push_entry(key, payload);
        let mut level = 0;
        while self.levels[level].is_overfull() {
            self.split_level(level);
            level += 1;
        }
    }

    /// Splits the overfull spine node at `level`: the left half is finished
    /// and moves up as a new child of the level above, the right half takes
    /// over the spine slot.
    fn split_level(&mut self, level: usize) {
        // A spine node above the leaf is missing its rightmost child; hand it
        // back for the duration so the ordinary split primitive applies.
        if level > 0 {
            let below = mem::replace(&mut self.levels[level - 1], Node::leaf(self.order));
            self.levels[level].attach_rightmost_child(Arc::new(below));
        }

        let Splinter { key, payload, right } = self.levels[level].split();
        let mut right = Arc::unwrap_or_clone(right);
        if level > 0 {
            self.levels[level - 1] = Arc::unwrap_or_clone(right.detach_rightmost_child());
        }
        let left = mem::replace(&mut self.levels[level], right);

        if level + 1 == self.levels.len() {
            // The root itself split; open a fresh level above it.
            self.levels.push(Node::leaf(self.order));
        }
        self.levels[level + 1].push_separator_and_child(key, payload, Arc::new(left));
    }

    /// Puts the spine back together bottom-up and returns the new root.
    pub(crate) fn ascend(self) -> Option<Arc<Node<K, V>>> {
        let mut levels = self.levels.into_iter();
        let mut node = levels.next().expect("the spine always has a leaf level");
        for mut parent in levels {
            parent.attach_rightmost_child(Arc::new(node));
            node = parent;
        }
        (node.count() > 0).then(|| Arc::new(node))
    }
}
