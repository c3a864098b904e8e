//! A value-semantic, order-statistic B-tree map.
//!
//! This crate provides [`CowBTreeMap`], an ordered map that behaves as a
//! value: cloning a map is O(1), clones share unmodified subtrees, and a
//! mutation through one map value is never observable through another. On top
//! of the usual ordered-map operations, every subtree tracks how many entries
//! it holds, so positional (rank-based) access is O(log n):
//!
//! - [`get_by_rank`](CowBTreeMap::get_by_rank) - the entry at a given sorted
//!   position
//! - [`rank_of`](CowBTreeMap::rank_of) - the sorted position of a key
//! - Indexing by [`Position`] - e.g., `map[Position(0)]` for the first entry
//! - [`extend_from_sorted`](CowBTreeMap::extend_from_sorted) - amortised O(1)
//!   per entry bulk append of an ascending stream
//!
//! # Example
//!
//! ```
//! use cow_btree::{CowBTreeMap, Position};
//!
//! let mut scores = CowBTreeMap::new();
//! scores.insert("Alice", 100);
//! scores.insert("Bob", 85);
//! scores.insert("Carol", 92);
//!
//! // Ordered-map operations work as expected.
//! assert_eq!(scores.get(&"Bob"), Some(&85));
//! assert_eq!(scores.len(), 3);
//!
//! // Order-statistic operations (O(log n)).
//! let (name, score) = scores.get_by_rank(1).unwrap();
//! assert_eq!((*name, *score), ("Bob", 85));
//! assert_eq!(scores.rank_of(&"Carol"), Some(2));
//! assert_eq!(scores[Position(0)], 100);
//!
//! // Value semantics: clones are O(1) and never see later mutations.
//! let snapshot = scores.clone();
//! scores.remove(&"Bob");
//! assert_eq!(snapshot.len(), 3);
//! assert_eq!(scores.len(), 2);
//! ```
//!
//! # Implementation
//!
//! The map is a classical B-tree: separator keys and payloads live at every
//! level, and each node records the entry count of its subtree. Nodes are
//! reference counted; mutations clone only the nodes on the path they touch,
//! and only when those nodes are still shared with another map value. The
//! fanout is chosen per tree at construction (a cache-friendly default, or an
//! explicit [`with_order`](CowBTreeMap::with_order)).

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]

extern crate alloc;

mod error;
mod position;
mod raw;

pub mod map;

pub use error::Error;
pub use map::CowBTreeMap;
pub use position::Position;
