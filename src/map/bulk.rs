use alloc::vec::Vec;

use super::CowBTreeMap;
use crate::Error;
use crate::raw::{AppendSpine, Node};

impl<K: Ord + Clone, V: Clone> CowBTreeMap<K, V> {
    /// Builds a map (default fanout) from entries already in strictly
    /// ascending key order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeysOutOfOrder`] when the keys are not strictly
    /// ascending.
    ///
    /// # Examples
    ///
    /// ```
    /// use cow_btree::CowBTreeMap;
    ///
    /// let map = CowBTreeMap::from_sorted_iter((0..1000).map(|k| (k, k))).unwrap();
    /// assert_eq!(map.len(), 1000);
    /// assert!(CowBTreeMap::from_sorted_iter([(2, "b"), (1, "a")]).is_err());
    /// ```
    pub fn from_sorted_iter<I>(entries: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = Self::new();
        map.extend_from_sorted(entries)?;
        Ok(map)
    }

    /// Builds a map (default fanout) from entries in any order. The entries
    /// are sorted by key first; the sort is stable, so payload order is kept
    /// for equal keys right up to the duplicate check.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateKey`] when two entries share a key.
    ///
    /// # Examples
    ///
    /// ```
    /// use cow_btree::{CowBTreeMap, Error};
    ///
    /// let map = CowBTreeMap::try_from_iter([(3, "c"), (1, "a"), (2, "b")]).unwrap();
    /// assert_eq!(map.get_by_rank(0), Some((&1, &"a")));
    ///
    /// let clash = CowBTreeMap::try_from_iter([(1, "a"), (1, "b")]);
    /// assert_eq!(clash, Err(Error::DuplicateKey));
    /// ```
    pub fn try_from_iter<I>(entries: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut entries: Vec<(K, V)> = entries.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        if entries.windows(2).any(|pair| pair[0].0 == pair[1].0) {
            return Err(Error::DuplicateKey);
        }

        let mut map = Self::new();
        map.append_unchecked(entries);
        Ok(map)
    }

    /// Appends a batch of entries whose keys ascend strictly from beyond the
    /// map's current maximum. Amortised O(1) per entry: the batch lands on
    /// the materialised rightmost spine instead of running a root-to-leaf
    /// descent per entry.
    ///
    /// The whole batch is validated before the tree is touched, so a failed
    /// call leaves the map exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeysOutOfOrder`] when the batch is not strictly
    /// ascending, or its first key is not strictly greater than the map's
    /// current maximum.
    ///
    /// # Examples
    ///
    /// ```
    /// use cow_btree::CowBTreeMap;
    ///
    /// let mut map = CowBTreeMap::from_sorted_iter([(1, "a"), (2, "b")]).unwrap();
    ///
    /// map.extend_from_sorted([(3, "c"), (4, "d")]).unwrap();
    /// assert_eq!(map.len(), 4);
    ///
    /// // 4 is not strictly greater than the current maximum.
    /// assert!(map.extend_from_sorted([(4, "again"), (5, "e")]).is_err());
    /// assert_eq!(map.len(), 4);
    /// ```
    pub fn extend_from_sorted<I>(&mut self, entries: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let entries: Vec<(K, V)> = entries.into_iter().collect();
        let mut previous = self.root.as_deref().map(Node::rightmost_key);
        for (key, _) in &entries {
            if previous.is_some_and(|p| p >= key) {
                return Err(Error::KeysOutOfOrder);
            }
            previous = Some(key);
        }

        self.append_unchecked(entries);
        Ok(())
    }

    /// Runs the spine append; the caller has already validated ordering.
    fn append_unchecked(&mut self, entries: Vec<(K, V)>) {
        if entries.is_empty() {
            return;
        }
        let mut spine = AppendSpine::descend(self.root.take(), self.order);
        for (key, payload) in entries {
            spine.push(key, payload);
        }
        self.root = spine.ascend();
    }
}

impl<K: Ord + Clone, V: Clone> FromIterator<(K, V)> for CowBTreeMap<K, V> {
    /// Builds a map from entries in any order.
    ///
    /// # Panics
    ///
    /// Panics when two entries share a key; use
    /// [`CowBTreeMap::try_from_iter`] to handle that case gracefully.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(entries: I) -> Self {
        match Self::try_from_iter(entries) {
            Ok(map) => map,
            Err(error) => panic!("CowBTreeMap::from_iter: {error}"),
        }
    }
}

impl<K: Ord + Clone, V: Clone> Extend<(K, V)> for CowBTreeMap<K, V> {
    /// Inserts each entry in turn, replacing payloads of keys already
    /// present.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, entries: I) {
        for (key, value) in entries {
            self.insert(key, value);
        }
    }
}

impl<K: Ord + Clone, V: Clone, const N: usize> From<[(K, V); N]> for CowBTreeMap<K, V> {
    /// Builds a map from an array of entries.
    ///
    /// # Panics
    ///
    /// Panics when two entries share a key.
    ///
    /// # Examples
    ///
    /// ```
    /// use cow_btree::CowBTreeMap;
    ///
    /// let map = CowBTreeMap::from([(2, "b"), (1, "a")]);
    /// let keys: Vec<_> = map.keys().copied().collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}
