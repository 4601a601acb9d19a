//! An AVL-balanced ordered dictionary for Rust.
//!
//! This crate provides [`AvlMap`], an ordered map with an API modeled on the standard
//! library's `BTreeMap`, plus:
//!
//! - Traversal in a [`TraversalOrder`] chosen per walk: ascending, descending or
//!   breadth-first ([`iter_in`](AvlMap::iter_in), [`traverse`](AvlMap::traverse))
//! - Bidirectional [cursors](avl_map::Cursor) that report misuse as [`Error`]s, and a
//!   [mutable cursor](avl_map::CursorMut) that can remove the entry under it and keep going
//! - Set-style algebra: [`union`](AvlMap::union), [`intersect`](AvlMap::intersect) and
//!   [`complement`](AvlMap::complement), also available in place (see [`set_algebra`])
//! - Pluggable key orderings through [`Comparator`](compare::Comparator)
//!
//! # Example
//!
//! ```
//! use avl_dict::{AvlMap, Error, TraversalOrder};
//!
//! let mut stock = AvlMap::new();
//! stock.insert("pears", 4);
//! stock.insert("apples", 12);
//! stock.insert("figs", 0);
//!
//! assert_eq!(stock.try_get("plums"), Err(Error::KeyNotFound));
//!
//! // Walk the map from the largest key down, dropping empty shelves as we go.
//! let mut cursor = stock.cursor_mut(TraversalOrder::Descending);
//! while let Ok((_, count)) = cursor.get() {
//!     if *count == 0 {
//!         cursor.remove_current()?;
//!     } else {
//!         cursor.move_next()?;
//!     }
//! }
//! assert_eq!(stock.keys().copied().collect::<Vec<_>>(), ["apples", "pears"]);
//!
//! let delivery = AvlMap::from([("apples", 1), ("kiwis", 9)]);
//! let merged = stock.union(&delivery);
//! assert_eq!(merged["apples"], 12); // the left-hand map wins on shared keys
//! assert_eq!(merged["kiwis"], 9);
//! # Ok::<(), Error>(())
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Handle-stable removal** - Removing an entry never moves any other entry, so a cursor
//!   can remove and continue
//! - **`serde`** - Optional `Serialize`/`Deserialize` for [`AvlMap`] and [`TraversalOrder`]
//!
//! # Implementation
//!
//! Nodes live in an arena addressed by compact handles and carry parent links, so every
//! traversal and every rebalancing pass is iterative. The tree keeps the AVL invariant:
//! the heights of the two subtrees of any node differ by at most one.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
// NOTE: The mutable iterators hand out disjoint `&mut` values through a raw pointer.
// #![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod order;
mod raw;
#[cfg(feature = "serde")]
mod serde;

pub mod avl_map;
pub mod compare;
pub mod reduce;
pub mod set_algebra;

pub use avl_map::AvlMap;
pub use error::Error;
pub use order::TraversalOrder;
