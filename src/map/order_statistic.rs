use alloc::sync::Arc;
use core::borrow::Borrow;
use core::ops::{Index, IndexMut};

use super::CowBTreeMap;
use crate::Position;

impl<K: Ord, V> CowBTreeMap<K, V> {
    /// Returns the entry at position `rank` in ascending key order, or `None`
    /// when the rank is out of range.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use cow_btree::CowBTreeMap;
    ///
    /// let map = CowBTreeMap::from([("a", 10), ("c", 30), ("b", 20)]);
    ///
    /// assert_eq!(map.get_by_rank(1), Some((&"b", &20)));
    /// assert_eq!(map.get_by_rank(3), None);
    /// ```
    #[must_use]
    pub fn get_by_rank(&self, rank: usize) -> Option<(&K, &V)> {
        if rank >= self.len() {
            return None;
        }
        Some(self.root.as_deref()?.select(rank))
    }

    /// Returns the zero-based rank of `key` in ascending key order, or `None`
    /// when the key is absent.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use cow_btree::CowBTreeMap;
    ///
    /// let map = CowBTreeMap::from([(10, "a"), (20, "b")]);
    ///
    /// assert_eq!(map.rank_of(&20), Some(1));
    /// assert_eq!(map.rank_of(&15), None);
    /// ```
    #[must_use]
    pub fn rank_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.root.as_deref()?.rank_of(key)
    }

    /// Returns the first entry, the one with the least key.
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.get_by_rank(0)
    }

    /// Returns the last entry, the one with the greatest key.
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.get_by_rank(self.len().checked_sub(1)?)
    }
}

impl<K: Ord + Clone, V: Clone> CowBTreeMap<K, V> {
    /// Returns the key and a mutable reference to the payload at position
    /// `rank` in ascending key order.
    ///
    /// The key comes back as a shared reference because rewriting it could
    /// break the ordering. Shared nodes on the path are un-shared first.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use cow_btree::CowBTreeMap;
    ///
    /// let mut map = CowBTreeMap::from([(10, "a"), (5, "b")]);
    ///
    /// if let Some((key, payload)) = map.get_by_rank_mut(0) {
    ///     assert_eq!(*key, 5);
    ///     *payload = "updated";
    /// }
    /// assert_eq!(map.get(&5), Some(&"updated"));
    /// ```
    #[must_use]
    pub fn get_by_rank_mut(&mut self, rank: usize) -> Option<(&K, &mut V)> {
        if rank >= self.len() {
            return None;
        }
        Some(Arc::make_mut(self.root.as_mut()?).select_mut(rank))
    }

    /// Removes and returns the entry at position `rank` in ascending key
    /// order, or `None` when the rank is out of range.
    ///
    /// The rank is resolved to its key first and the removal then runs by
    /// key, so the balancing work is the same as [`remove`].
    ///
    /// [`remove`]: CowBTreeMap::remove
    ///
    /// # Examples
    ///
    /// ```
    /// use cow_btree::CowBTreeMap;
    ///
    /// let mut map = CowBTreeMap::from([(10, "a"), (20, "b"), (30, "c")]);
    ///
    /// assert_eq!(map.remove_by_rank(1), Some((20, "b")));
    /// assert_eq!(map.remove_by_rank(5), None);
    /// assert_eq!(map.len(), 2);
    /// ```
    pub fn remove_by_rank(&mut self, rank: usize) -> Option<(K, V)> {
        let key = self.get_by_rank(rank)?.0.clone();
        self.remove_entry(&key)
    }

    /// Removes and returns the first entry.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.remove_by_rank(0)
    }

    /// Removes and returns the last entry.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let last = self.len().checked_sub(1)?;
        self.remove_by_rank(last)
    }
}

/// Indexes into the map by position in sorted order.
///
/// # Panics
///
/// Panics if the position is out of bounds.
///
/// # Examples
///
/// ```
/// use cow_btree::{CowBTreeMap, Position};
///
/// let map = CowBTreeMap::from([("a", 1), ("b", 2)]);
/// assert_eq!(map[Position(1)], 2);
/// ```
impl<K: Ord, V> Index<Position> for CowBTreeMap<K, V> {
    type Output = V;

    fn index(&self, position: Position) -> &Self::Output {
        self.get_by_rank(position.0)
            .map(|(_, payload)| payload)
            .expect("position out of bounds")
    }
}

/// Mutably indexes into the map by position in sorted order.
///
/// # Panics
///
/// Panics if the position is out of bounds.
///
/// # Examples
///
/// ```
/// use cow_btree::{CowBTreeMap, Position};
///
/// let mut map = CowBTreeMap::from([("a", 1), ("b", 2)]);
/// map[Position(1)] = 5;
/// assert_eq!(map.get(&"b"), Some(&5));
/// ```
impl<K: Ord + Clone, V: Clone> IndexMut<Position> for CowBTreeMap<K, V> {
    fn index_mut(&mut self, position: Position) -> &mut Self::Output {
        self.get_by_rank_mut(position.0)
            .map(|(_, payload)| payload)
            .expect("position out of bounds")
    }
}
