#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]

//! `PairStore`: an insertion-ordered vector of key/value pairs with map-style lookup.
//!
//! `PairStore` behaves like a growable array whose elements can also be found
//! by key. Keys only need `PartialEq`: they are neither hashed nor ordered, and
//! they may repeat. Repeated keys are told apart by position and by their
//! *ordinal*, the 1-based rank of an occurrence in position order.
//!
//! This crate is `no_std` compatible and only needs `alloc`.
//!
//! Buffer layout: one contiguous allocation of `(K, V)` slots. Slots
//! `[0, len)` hold live pairs, slots `[len, capacity)` are spare.
//!
//! # Performance Characteristics
//!
//! ## Time Complexity
//! - `get()`, `value()`, `key()`: O(1) - positional access
//! - `push_back()`: amortized O(1), O(n) when a new chunk is allocated
//! - `insert()`, `erase()`, `move_to()`: O(n) - pairs after the position shift
//! - `find()`, `position()`, `erase_all()`: O(n) - linear key scan
//! - `swap()`: O(1)
//! - `clear()`: O(n) drops, no reallocation
//!
//! ## Growth Policy
//! - Capacity grows in chunks of `DELTA` slots (100 unless chosen otherwise)
//! - After growth the capacity is the smallest multiple of `DELTA` that holds
//!   the pairs
//! - The buffer only shrinks on `shrink()`, `resize()` or `reserve()`
//! - A chunk size of zero is rejected when the store type is instantiated
//!
//! ```compile_fail
//! # use pairstore::PairStore;
//! let store: PairStore<u8, u8, 0> = PairStore::new();
//! assert!(store.as_slice().is_empty());
//! ```
//!
//! ```
//! # use pairstore::PairStore;
//! let mut store: PairStore<&str, i32, 2> = PairStore::new();
//! store.push_back("a", 1).unwrap();
//! store.push_back("b", 2).unwrap();
//! store.push_back("c", 3).unwrap();
//! assert_eq!(store.len(), 3);
//! assert_eq!(store.capacity(), 4);
//!
//! store.erase(0);
//! assert_eq!(store.as_slice(), &[("b", 2), ("c", 3)]);
//! assert_eq!(store.find_positions(&"c", 1, 1), vec![1]);
//! ```
//!
//! # Duplicate Keys
//!
//! Lookups take an ordinal and a count: "give me the k-th through
//! (k + number - 1)-th occurrence".
//!
//! ```
//! # use pairstore::PairStore;
//! let store: PairStore<&str, i32> = PairStore::from([
//!     ("x", 0), ("y", 1), ("k", 2), ("y", 3), ("k", 5), ("k", 9),
//! ]);
//!
//! assert_eq!(store.find_positions(&"k", 2, 2), vec![4, 5]);
//! assert_eq!(store.find_all_values(&"y"), vec![&1, &3]);
//! assert_eq!(store.nth_position(&"k", 3), Some(5));
//! assert_eq!(store.count(&"k"), 3);
//! ```
//!
//! # Absence Is Explicit
//!
//! Out-of-range reads return `None`; keyed writes to a missing occurrence
//! return an error instead of touching anything.
//!
//! ```
//! # use pairstore::{PairStore, PairStoreError};
//! let mut store: PairStore<&str, i32> = PairStore::from([("a", 1)]);
//!
//! assert_eq!(store.value(5), None);
//! assert_eq!(store.value_or_default(5), 0);
//! assert_eq!(
//!     store.set_value_by_key(&"a", 2, 10),
//!     Err(PairStoreError::KeyNotFound { ordinal: 2 })
//! );
//! ```
//!
//! # Cursors
//!
//! Cursors are positions that borrow the store, so they can never outlive a
//! reallocation or a shift.
//!
//! ```
//! # use pairstore::{Cursor, PairStore};
//! let mut store: PairStore<&str, i32> = PairStore::from([("a", 1), ("b", 2)]);
//!
//! let mut cursor = store.cursor_at_mut(1);
//! if let Some(value) = cursor.value_mut() {
//!     *value *= 10;
//! }
//! let mut cursor: Cursor<'_, _, _> = cursor.into();
//! cursor.move_prev();
//! assert_eq!(cursor.pair(), Some((&"a", &1)));
//! assert_eq!(store.value(1), Some(&20));
//! ```

extern crate alloc;

mod cursor;
mod error;
mod iter;
mod lookup;
mod raw;
mod store;

// Re-export public types and traits
pub use cursor::{Cursor, CursorMut};
pub use error::PairStoreError;
pub use iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
pub use store::{PairStore, DEFAULT_CHUNK_SIZE};
