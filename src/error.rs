use thiserror::Error;

/// Precondition violations reported by the fallible map operations.
///
/// A missing key is never an error: lookups and removals signal absence with
/// `None`. The variants here cover inputs the caller promised not to supply.
///
/// # Examples
///
/// ```
/// use cow_btree::{CowBTreeMap, Error};
///
/// let mut map = CowBTreeMap::new();
/// map.insert(1, "one");
///
/// assert_eq!(map.try_insert(1, "uno"), Err(Error::DuplicateKey));
/// assert_eq!(map.extend_from_sorted([(1, "one again")]), Err(Error::KeysOutOfOrder));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum Error {
    /// The key is already present in the map.
    #[error("key is already present")]
    DuplicateKey,
    /// A sorted stream was not strictly ascending, or did not start beyond
    /// the map's current maximum key.
    #[error("keys are not strictly ascending")]
    KeysOutOfOrder,
}
