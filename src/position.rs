/// A zero-based position in the sorted order of a map.
///
/// A `Position` is plain index arithmetic: it does not keep a reference to
/// the map it came from, which makes it `Copy` and free to pass around, but
/// also means it goes stale as soon as the map is mutated. Using a stale
/// position yields `None` or a panic on the lookup, never corruption.
///
/// # Examples
///
/// ```
/// use cow_btree::{CowBTreeMap, Position};
///
/// let mut map = CowBTreeMap::new();
/// map.insert("a", 10);
/// map.insert("b", 20);
///
/// assert_eq!(map[Position(0)], 10);
/// assert_eq!(map[Position(0).successor()], 20);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Position(pub usize);

impl Position {
    /// The position immediately after this one.
    ///
    /// # Examples
    ///
    /// ```
    /// use cow_btree::Position;
    ///
    /// assert_eq!(Position(3).successor(), Position(4));
    /// ```
    #[must_use]
    pub const fn successor(self) -> Self {
        Self(self.0 + 1)
    }

    /// The position immediately before this one.
    ///
    /// # Panics
    ///
    /// Panics when called on `Position(0)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cow_btree::Position;
    ///
    /// assert_eq!(Position(3).predecessor(), Position(2));
    /// ```
    #[must_use]
    pub const fn predecessor(self) -> Self {
        assert!(self.0 > 0, "no position precedes the first");
        Self(self.0 - 1)
    }

    /// The position `distance` steps away, in either direction.
    ///
    /// # Panics
    ///
    /// Panics when a negative `distance` would move before the first
    /// position.
    ///
    /// # Examples
    ///
    /// ```
    /// use cow_btree::Position;
    ///
    /// assert_eq!(Position(3).advanced_by(4), Position(7));
    /// assert_eq!(Position(3).advanced_by(-3), Position(0));
    /// ```
    #[must_use]
    pub fn advanced_by(self, distance: isize) -> Self {
        if distance >= 0 {
            Self(self.0 + distance.unsigned_abs())
        } else {
            let back = distance.unsigned_abs();
            assert!(back <= self.0, "cannot advance before the first position");
            Self(self.0 - back)
        }
    }

    /// The position `distance` steps away, unless that would move past
    /// `limit`.
    ///
    /// The limit only applies in the direction of travel; a limit behind the
    /// movement has no effect. Returns `None` when the limit (or the first
    /// position) would be overshot.
    ///
    /// # Examples
    ///
    /// ```
    /// use cow_btree::Position;
    ///
    /// let end = Position(5);
    /// assert_eq!(Position(3).advanced_by_limited(2, end), Some(Position(5)));
    /// assert_eq!(Position(3).advanced_by_limited(3, end), None);
    /// // A limit behind the direction of travel is ignored.
    /// assert_eq!(Position(3).advanced_by_limited(-2, end), Some(Position(1)));
    /// ```
    #[must_use]
    pub fn advanced_by_limited(self, distance: isize, limit: Self) -> Option<Self> {
        if distance >= 0 {
            let target = self.0 + distance.unsigned_abs();
            if limit.0 >= self.0 && target > limit.0 {
                return None;
            }
            Some(Self(target))
        } else {
            let target = self.0.checked_sub(distance.unsigned_abs())?;
            if limit.0 <= self.0 && target < limit.0 {
                return None;
            }
            Some(Self(target))
        }
    }

    /// Signed number of steps from `self` to `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cow_btree::Position;
    ///
    /// assert_eq!(Position(2).distance_to(Position(7)), 5);
    /// assert_eq!(Position(7).distance_to(Position(2)), -5);
    /// ```
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn distance_to(self, other: Self) -> isize {
        other.0 as isize - self.0 as isize
    }
}
