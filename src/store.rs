use alloc::vec::Vec;
use core::fmt;
use core::mem;
use core::ops::{Index, IndexMut};
use core::ptr;
use core::slice;

use crate::error::PairStoreError;
use crate::raw::RawBuffer;

/// Growth chunk used when no chunk size is given.
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// An insertion-ordered vector of `(key, value)` pairs with map-style lookup.
///
/// Keys only need `PartialEq` and may repeat. Pairs are addressed either by
/// position or by key plus ordinal (the 1-based rank of an occurrence).
/// Capacity grows in multiples of `DELTA`.
pub struct PairStore<K, V, const DELTA: usize = DEFAULT_CHUNK_SIZE> {
    pub(crate) buf: RawBuffer<(K, V)>,
    pub(crate) len: usize,
}

impl<K, V, const DELTA: usize> PairStore<K, V, DELTA> {
    const CHUNK: usize = {
        assert!(DELTA > 0, "PairStore chunk size must be non-zero");
        DELTA
    };

    /// Creates an empty store. Nothing is allocated until the first insert.
    #[must_use]
    pub const fn new() -> Self {
        let _ = Self::CHUNK;
        Self {
            buf: RawBuffer::new(),
            len: 0,
        }
    }

    /// Creates an empty store able to hold `min_capacity` pairs, rounded up
    /// to the chunk size.
    ///
    /// # Errors
    ///
    /// Returns `PairStoreError::CapacityOverflow` or
    /// `PairStoreError::AllocationFailed` if the buffer cannot be allocated.
    pub fn with_capacity(min_capacity: usize) -> Result<Self, PairStoreError> {
        let mut store = Self::new();
        store.reserve(min_capacity)?;
        Ok(store)
    }

    /// Creates a store holding `pairs` in iteration order.
    ///
    /// # Errors
    ///
    /// Returns a capacity error if the buffer cannot be allocated.
    pub fn try_from_pairs<I>(pairs: I) -> Result<Self, PairStoreError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut store = Self::new();
        store.insert_many(0, pairs)?;
        Ok(store)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    #[must_use]
    pub fn chunk_size(&self) -> usize {
        Self::CHUNK
    }

    /// Returns the live pairs as a slice, in position order.
    #[must_use]
    pub fn as_slice(&self) -> &[(K, V)] {
        // SAFETY: slots [0, len) are initialized.
        unsafe { slice::from_raw_parts(self.buf.as_ptr(), self.len) }
    }

    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [(K, V)] {
        // SAFETY: slots [0, len) are initialized and uniquely borrowed.
        unsafe { slice::from_raw_parts_mut(self.buf.as_mut_ptr(), self.len) }
    }

    // ---------------------------------------------------------------------
    // Capacity management
    // ---------------------------------------------------------------------

    /// Reallocates to the smallest multiple of the chunk size that holds
    /// `min_capacity` pairs.
    ///
    /// # Errors
    ///
    /// - `PairStoreError::CapacityBelowLength` if `min_capacity < len()`
    /// - `PairStoreError::CapacityOverflow` / `AllocationFailed` if the new
    ///   buffer cannot be allocated; the store is unchanged
    pub fn reserve(&mut self, min_capacity: usize) -> Result<(), PairStoreError> {
        if min_capacity < self.len {
            return Err(PairStoreError::CapacityBelowLength {
                requested: min_capacity,
                length: self.len,
            });
        }
        let new_capacity = min_capacity
            .div_ceil(Self::CHUNK)
            .checked_mul(Self::CHUNK)
            .ok_or(PairStoreError::CapacityOverflow {
                requested: min_capacity,
            })?;
        self.resize(new_capacity)
    }

    /// Reallocates to exactly `new_capacity` slots, keeping every pair.
    ///
    /// # Errors
    ///
    /// - `PairStoreError::CapacityBelowLength` if `new_capacity < len()`
    /// - `PairStoreError::CapacityOverflow` / `AllocationFailed` if the new
    ///   buffer cannot be allocated; the store is unchanged
    pub fn resize(&mut self, new_capacity: usize) -> Result<(), PairStoreError> {
        if new_capacity < self.len {
            return Err(PairStoreError::CapacityBelowLength {
                requested: new_capacity,
                length: self.len,
            });
        }
        if new_capacity == self.buf.capacity() {
            return Ok(());
        }
        // SAFETY: slots [0, len) are initialized and len <= both capacities.
        unsafe { self.buf.relocate(new_capacity, self.len) }
    }

    /// Trims the capacity to the current length.
    ///
    /// # Errors
    ///
    /// Returns `PairStoreError::AllocationFailed` if the smaller buffer
    /// cannot be allocated; the store is unchanged.
    pub fn shrink(&mut self) -> Result<(), PairStoreError> {
        self.resize(self.len)
    }

    fn grow_for(&mut self, additional: usize) -> Result<(), PairStoreError> {
        let required = self
            .len
            .checked_add(additional)
            .ok_or(PairStoreError::CapacityOverflow {
                requested: usize::MAX,
            })?;
        if required > self.buf.capacity() {
            self.reserve(required)?;
        }
        Ok(())
    }

    pub(crate) fn or_fail<T>(result: Result<T, PairStoreError>) -> T {
        result.unwrap_or_else(|err| RawBuffer::<(K, V)>::fail(&err))
    }

    // ---------------------------------------------------------------------
    // Gap engine
    // ---------------------------------------------------------------------

    /// Shifts every pair at `from..len` up by `length` slots, growing the
    /// buffer first if needed.
    ///
    /// On success slots `[from, from + length)` are uninitialized and not
    /// yet counted by `len`. On error nothing moved.
    ///
    /// # Safety
    ///
    /// `from <= len`. The caller must initialize the gap and then add
    /// `length` to `len` before any other access to the store.
    unsafe fn open_gap(&mut self, from: usize, length: usize) -> Result<(), PairStoreError> {
        debug_assert!(from <= self.len);
        self.grow_for(length)?;
        let tail = self.len - from;
        if tail > 0 && length > 0 {
            let base = self.buf.as_mut_ptr();
            // SAFETY: capacity >= len + length, so both ranges are in bounds.
            unsafe { ptr::copy(base.add(from), base.add(from + length), tail) };
        }
        Ok(())
    }

    /// Shifts every pair above the closed range down by `length` slots.
    ///
    /// # Safety
    ///
    /// `from + length <= len` and the pairs in `[from, from + length)` must
    /// already have been moved out.
    unsafe fn close_gap(&mut self, from: usize, length: usize) {
        debug_assert!(from + length <= self.len);
        let tail = self.len - from - length;
        let base = self.buf.as_mut_ptr();
        // SAFETY: both ranges are within [0, len).
        unsafe { ptr::copy(base.add(from + length), base.add(from), tail) };
        self.len -= length;
    }

    /// Moves the pair at `from` to `to`, shifting the pairs in between by
    /// one slot towards the vacated position.
    ///
    /// # Safety
    ///
    /// `from < len` and `to < len`.
    unsafe fn relocate(&mut self, from: usize, to: usize) {
        let base = self.buf.as_mut_ptr();
        // SAFETY: the caller checked both positions; the moved pair is held
        // in a local while the run between the positions shifts over it.
        unsafe {
            let moving = ptr::read(base.add(from));
            if from < to {
                ptr::copy(base.add(from + 1), base.add(from), to - from);
            } else {
                ptr::copy(base.add(to), base.add(to + 1), from - to);
            }
            ptr::write(base.add(to), moving);
        }
    }

    fn check_insert_position(&self, pos: usize) -> Result<(), PairStoreError> {
        if pos > self.len {
            Err(PairStoreError::IndexOutOfBounds {
                index: pos,
                length: self.len,
            })
        } else {
            Ok(())
        }
    }

    fn insert_batch(
        &mut self,
        pos: usize,
        mut batch: Vec<(K, V)>,
    ) -> Result<usize, PairStoreError> {
        self.check_insert_position(pos)?;
        let length = batch.len();
        // SAFETY: pos <= len; the gap is filled from `batch` and counted below.
        unsafe {
            self.open_gap(pos, length)?;
            ptr::copy_nonoverlapping(batch.as_ptr(), self.buf.as_mut_ptr().add(pos), length);
            batch.set_len(0);
        }
        self.len += length;
        Ok(pos)
    }

    // ---------------------------------------------------------------------
    // Insertion
    // ---------------------------------------------------------------------

    /// Inserts a pair at `pos`, shifting later pairs up by one.
    ///
    /// Returns the position of the inserted pair.
    ///
    /// # Errors
    ///
    /// - `PairStoreError::IndexOutOfBounds` if `pos > len()`
    /// - a capacity error if the buffer cannot grow
    ///
    /// The store is unchanged on error.
    pub fn insert(&mut self, pos: usize, key: K, value: V) -> Result<usize, PairStoreError> {
        self.insert_pair(pos, (key, value))
    }

    /// Same as [`insert`](Self::insert), taking the pair as a tuple.
    ///
    /// # Errors
    ///
    /// See [`insert`](Self::insert).
    pub fn insert_pair(&mut self, pos: usize, pair: (K, V)) -> Result<usize, PairStoreError> {
        self.check_insert_position(pos)?;
        // SAFETY: pos <= len; the single-slot gap is written right away.
        unsafe {
            self.open_gap(pos, 1)?;
            ptr::write(self.buf.as_mut_ptr().add(pos), pair);
        }
        self.len += 1;
        Ok(pos)
    }

    /// Inserts a batch of pairs as one contiguous run starting at `pos`.
    ///
    /// Returns the position of the first inserted pair.
    ///
    /// # Errors
    ///
    /// See [`insert`](Self::insert).
    pub fn insert_many<I>(&mut self, pos: usize, pairs: I) -> Result<usize, PairStoreError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.check_insert_position(pos)?;
        self.insert_batch(pos, pairs.into_iter().collect())
    }

    /// Inserts a copy of every pair of `other` as one contiguous run.
    ///
    /// # Errors
    ///
    /// See [`insert`](Self::insert).
    pub fn insert_from<const OTHER: usize>(
        &mut self,
        pos: usize,
        other: &PairStore<K, V, OTHER>,
    ) -> Result<usize, PairStoreError>
    where
        K: Clone,
        V: Clone,
    {
        self.check_insert_position(pos)?;
        self.insert_batch(pos, other.as_slice().to_vec())
    }

    /// # Errors
    ///
    /// Returns a capacity error if the buffer cannot grow.
    pub fn push_back(&mut self, key: K, value: V) -> Result<usize, PairStoreError> {
        self.insert(self.len, key, value)
    }

    /// # Errors
    ///
    /// Returns a capacity error if the buffer cannot grow.
    pub fn push_back_pair(&mut self, pair: (K, V)) -> Result<usize, PairStoreError> {
        self.insert_pair(self.len, pair)
    }

    /// # Errors
    ///
    /// Returns a capacity error if the buffer cannot grow.
    pub fn push_back_many<I>(&mut self, pairs: I) -> Result<usize, PairStoreError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.insert_many(self.len, pairs)
    }

    /// # Errors
    ///
    /// Returns a capacity error if the buffer cannot grow.
    pub fn push_back_from<const OTHER: usize>(
        &mut self,
        other: &PairStore<K, V, OTHER>,
    ) -> Result<usize, PairStoreError>
    where
        K: Clone,
        V: Clone,
    {
        self.insert_from(self.len, other)
    }

    /// # Errors
    ///
    /// Returns a capacity error if the buffer cannot grow.
    pub fn push_front(&mut self, key: K, value: V) -> Result<usize, PairStoreError> {
        self.insert(0, key, value)
    }

    /// # Errors
    ///
    /// Returns a capacity error if the buffer cannot grow.
    pub fn push_front_pair(&mut self, pair: (K, V)) -> Result<usize, PairStoreError> {
        self.insert_pair(0, pair)
    }

    /// # Errors
    ///
    /// Returns a capacity error if the buffer cannot grow.
    pub fn push_front_many<I>(&mut self, pairs: I) -> Result<usize, PairStoreError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.insert_many(0, pairs)
    }

    /// # Errors
    ///
    /// Returns a capacity error if the buffer cannot grow.
    pub fn push_front_from<const OTHER: usize>(
        &mut self,
        other: &PairStore<K, V, OTHER>,
    ) -> Result<usize, PairStoreError>
    where
        K: Clone,
        V: Clone,
    {
        self.insert_from(0, other)
    }

    // ---------------------------------------------------------------------
    // Removal and reordering
    // ---------------------------------------------------------------------

    /// Removes and returns the pair at `pos`, shifting later pairs down.
    ///
    /// Returns `None` and leaves the store untouched if `pos >= len()`.
    pub fn erase(&mut self, pos: usize) -> Option<(K, V)> {
        if pos >= self.len {
            return None;
        }
        // SAFETY: pos < len; the pair is moved out before the gap closes.
        unsafe {
            let removed = ptr::read(self.buf.as_ptr().add(pos));
            self.close_gap(pos, 1);
            Some(removed)
        }
    }

    /// Removes the pairs at the given positions.
    ///
    /// Every position refers to the store as it was before the call:
    /// positions are applied in descending order, duplicates count once and
    /// out-of-range positions are ignored. Returns the number of pairs
    /// removed.
    pub fn erase_many<I>(&mut self, positions: I) -> usize
    where
        I: IntoIterator<Item = usize>,
    {
        let mut positions: Vec<usize> = positions.into_iter().filter(|&p| p < self.len).collect();
        positions.sort_unstable_by(|a, b| b.cmp(a));
        positions.dedup();
        positions
            .into_iter()
            .filter_map(|pos| self.erase(pos))
            .count()
    }

    pub fn pop_back(&mut self) -> Option<(K, V)> {
        let last = self.len.checked_sub(1)?;
        self.erase(last)
    }

    pub fn pop_front(&mut self) -> Option<(K, V)> {
        self.erase(0)
    }

    /// Keeps only the pairs for which `keep` returns `true`, in order.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut pos = 0;
        while pos < self.len {
            let (key, value) = &mut self.as_mut_slice()[pos];
            if keep(key, value) {
                pos += 1;
            } else {
                self.erase(pos);
            }
        }
    }

    /// Moves the pair at `from` so that it ends up at position `to`.
    ///
    /// Returns `false` and does nothing if either position is out of range.
    pub fn move_to(&mut self, from: usize, to: usize) -> bool {
        if from >= self.len || to >= self.len {
            return false;
        }
        if from != to {
            // SAFETY: both positions were checked against len.
            unsafe { self.relocate(from, to) };
        }
        true
    }

    /// Exchanges the pairs at `a` and `b`.
    ///
    /// Returns `false` and does nothing if either position is out of range.
    pub fn swap(&mut self, a: usize, b: usize) -> bool {
        if a >= self.len || b >= self.len {
            return false;
        }
        self.as_mut_slice().swap(a, b);
        true
    }

    /// Exchanges the whole contents (buffer, length and capacity) of two
    /// stores.
    pub fn swap_with(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Drops every pair. The capacity is kept.
    pub fn clear(&mut self) {
        let live = self.len;
        self.len = 0;
        // SAFETY: slots [0, live) were initialized and are no longer counted.
        unsafe {
            ptr::drop_in_place(slice::from_raw_parts_mut(self.buf.as_mut_ptr(), live));
        }
    }

    fn clone_into_spare(&mut self, source: &[(K, V)])
    where
        K: Clone,
        V: Clone,
    {
        debug_assert!(self.len + source.len() <= self.buf.capacity());
        for (key, value) in source {
            // SAFETY: the caller reserved room for every source pair.
            unsafe {
                ptr::write(
                    self.buf.as_mut_ptr().add(self.len),
                    (key.clone(), value.clone()),
                );
            }
            self.len += 1;
        }
    }
}

impl<K, V, const DELTA: usize> Drop for PairStore<K, V, DELTA> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K, V, const DELTA: usize> Default for PairStore<K, V, DELTA> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone, const DELTA: usize> Clone for PairStore<K, V, DELTA> {
    fn clone(&self) -> Self {
        let mut copy = Self::new();
        Self::or_fail(copy.resize(self.capacity()));
        copy.clone_into_spare(self.as_slice());
        copy
    }

    fn clone_from(&mut self, source: &Self) {
        self.clear();
        if source.len > self.capacity() {
            Self::or_fail(self.reserve(source.len));
        }
        self.clone_into_spare(source.as_slice());
    }
}

impl<K: fmt::Debug, V: fmt::Debug, const DELTA: usize> fmt::Debug for PairStore<K, V, DELTA> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq, const DELTA: usize> PartialEq for PairStore<K, V, DELTA> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<K: Eq, V: Eq, const DELTA: usize> Eq for PairStore<K, V, DELTA> {}

impl<K, V, const DELTA: usize, const N: usize> From<[(K, V); N]> for PairStore<K, V, DELTA> {
    fn from(pairs: [(K, V); N]) -> Self {
        Self::or_fail(Self::try_from_pairs(pairs))
    }
}

impl<K, V, const DELTA: usize> FromIterator<(K, V)> for PairStore<K, V, DELTA> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(pairs: I) -> Self {
        Self::or_fail(Self::try_from_pairs(pairs))
    }
}

impl<K, V, const DELTA: usize> Extend<(K, V)> for PairStore<K, V, DELTA> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, pairs: I) {
        Self::or_fail(self.push_back_many(pairs));
    }
}

impl<K, V, const DELTA: usize> Index<usize> for PairStore<K, V, DELTA> {
    type Output = (K, V);

    fn index(&self, pos: usize) -> &Self::Output {
        &self.as_slice()[pos]
    }
}

impl<K, V, const DELTA: usize> IndexMut<usize> for PairStore<K, V, DELTA> {
    fn index_mut(&mut self, pos: usize) -> &mut Self::Output {
        &mut self.as_mut_slice()[pos]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec;

    fn content<K: Clone, V: Clone, const D: usize>(store: &PairStore<K, V, D>) -> Vec<(K, V)> {
        store.as_slice().to_vec()
    }

    #[test]
    fn test_new_store_has_no_buffer() {
        let store: PairStore<String, i32> = PairStore::new();
        assert_eq!(store.len(), 0);
        assert_eq!(store.capacity(), 0);
        assert_eq!(store.chunk_size(), 100);
    }

    #[test]
    fn test_reserve_rounds_to_chunk() {
        let mut store: PairStore<&str, i32, 4> = PairStore::new();
        store.reserve(1).unwrap();
        assert_eq!(store.capacity(), 4);
        store.reserve(4).unwrap();
        assert_eq!(store.capacity(), 4);
        store.reserve(5).unwrap();
        assert_eq!(store.capacity(), 8);
        store.reserve(0).unwrap();
        assert_eq!(store.capacity(), 0);
    }

    #[test]
    fn test_open_gap_shifts_tail() {
        let mut store: PairStore<&str, i32, 2> = PairStore::from([("a", 1), ("b", 2), ("c", 3)]);
        unsafe {
            store.open_gap(1, 2).unwrap();
            ptr::write(store.buf.as_mut_ptr().add(1), ("x", 10));
            ptr::write(store.buf.as_mut_ptr().add(2), ("y", 20));
        }
        store.len += 2;
        assert_eq!(
            content(&store),
            vec![("a", 1), ("x", 10), ("y", 20), ("b", 2), ("c", 3)]
        );
        assert_eq!(store.capacity(), 6);
    }

    #[test]
    fn test_open_gap_at_tail_does_not_shift() {
        let mut store: PairStore<&str, i32, 2> = PairStore::from([("a", 1)]);
        unsafe {
            store.open_gap(1, 1).unwrap();
            ptr::write(store.buf.as_mut_ptr().add(1), ("b", 2));
        }
        store.len += 1;
        assert_eq!(content(&store), vec![("a", 1), ("b", 2)]);
    }

    #[test]
    fn test_close_gap_keeps_order() {
        let mut store: PairStore<&str, i32, 2> =
            PairStore::from([("a", 1), ("b", 2), ("c", 3), ("d", 4)]);
        unsafe {
            let _ = ptr::read(store.buf.as_ptr().add(1));
            let _ = ptr::read(store.buf.as_ptr().add(2));
            store.close_gap(1, 2);
        }
        assert_eq!(content(&store), vec![("a", 1), ("d", 4)]);
        assert_eq!(store.capacity(), 4);
    }

    #[test]
    fn test_relocate_both_directions() {
        let mut store: PairStore<&str, i32> =
            PairStore::from([("a", 1), ("b", 2), ("c", 3), ("d", 4)]);
        unsafe { store.relocate(0, 3) };
        assert_eq!(content(&store), vec![("b", 2), ("c", 3), ("d", 4), ("a", 1)]);
        unsafe { store.relocate(3, 1) };
        assert_eq!(content(&store), vec![("b", 2), ("a", 1), ("c", 3), ("d", 4)]);
    }

    #[test]
    fn test_failed_growth_leaves_store_intact() {
        let mut store: PairStore<u8, u8, 1> = PairStore::from([(1, 1), (2, 2)]);
        let err = unsafe { store.open_gap(1, usize::MAX) }.unwrap_err();
        assert!(matches!(err, PairStoreError::CapacityOverflow { .. }));
        assert_eq!(content(&store), vec![(1, 1), (2, 2)]);
        assert_eq!(store.capacity(), 2);
    }

    #[test]
    fn test_clone_from_reuses_buffer() {
        let source: PairStore<String, i32, 4> =
            PairStore::from([(String::from("a"), 1), (String::from("b"), 2)]);
        let mut target: PairStore<String, i32, 4> = PairStore::with_capacity(8).unwrap();
        target.push_back(String::from("z"), 26).unwrap();
        target.clone_from(&source);
        assert_eq!(target, source);
        assert_eq!(target.capacity(), 8);
    }
}
