use alloc::vec::Vec;
use core::mem;

use crate::cursor::Cursor;
use crate::error::PairStoreError;
use crate::store::PairStore;

/// Positional access. Out-of-range positions yield `None` or an error,
/// never a placeholder value.
impl<K, V, const DELTA: usize> PairStore<K, V, DELTA> {
    #[must_use]
    pub fn get(&self, pos: usize) -> Option<(&K, &V)> {
        self.as_slice().get(pos).map(|(key, value)| (key, value))
    }

    pub fn get_mut(&mut self, pos: usize) -> Option<(&K, &mut V)> {
        self.as_mut_slice()
            .get_mut(pos)
            .map(|(key, value)| (&*key, value))
    }

    #[must_use]
    pub fn key(&self, pos: usize) -> Option<&K> {
        self.as_slice().get(pos).map(|(key, _)| key)
    }

    #[must_use]
    pub fn value(&self, pos: usize) -> Option<&V> {
        self.as_slice().get(pos).map(|(_, value)| value)
    }

    pub fn value_mut(&mut self, pos: usize) -> Option<&mut V> {
        self.as_mut_slice().get_mut(pos).map(|(_, value)| value)
    }

    /// Returns a copy of the value at `pos`, or `V::default()` when `pos` is
    /// out of range.
    #[must_use]
    pub fn value_or_default(&self, pos: usize) -> V
    where
        V: Clone + Default,
    {
        self.value(pos).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn first(&self) -> Option<(&K, &V)> {
        self.get(0)
    }

    #[must_use]
    pub fn last(&self) -> Option<(&K, &V)> {
        self.get(self.len().checked_sub(1)?)
    }

    fn slot_mut(&mut self, pos: usize) -> Result<&mut (K, V), PairStoreError> {
        let length = self.len();
        self.as_mut_slice()
            .get_mut(pos)
            .ok_or(PairStoreError::IndexOutOfBounds { index: pos, length })
    }

    /// Replaces the pair at `pos` and returns the old one.
    ///
    /// # Errors
    ///
    /// Returns `PairStoreError::IndexOutOfBounds` if `pos >= len()`.
    pub fn set(&mut self, pos: usize, key: K, value: V) -> Result<(K, V), PairStoreError> {
        Ok(mem::replace(self.slot_mut(pos)?, (key, value)))
    }

    /// Replaces the value at `pos` and returns the old one.
    ///
    /// # Errors
    ///
    /// Returns `PairStoreError::IndexOutOfBounds` if `pos >= len()`.
    pub fn set_value(&mut self, pos: usize, value: V) -> Result<V, PairStoreError> {
        Ok(mem::replace(&mut self.slot_mut(pos)?.1, value))
    }

    /// Replaces the key at `pos` and returns the old one.
    ///
    /// # Errors
    ///
    /// Returns `PairStoreError::IndexOutOfBounds` if `pos >= len()`.
    pub fn set_key(&mut self, pos: usize, key: K) -> Result<K, PairStoreError> {
        Ok(mem::replace(&mut self.slot_mut(pos)?.0, key))
    }
}

/// Keyed access. Every lookup is a linear scan in ascending position order.
///
/// Occurrences of a key are numbered from 1 in scan order; an ordinal of 0
/// is treated as 1.
impl<K: PartialEq, V, const DELTA: usize> PairStore<K, V, DELTA> {
    fn matches<'a>(&'a self, key: &'a K) -> impl Iterator<Item = usize> + 'a {
        self.as_slice()
            .iter()
            .enumerate()
            .filter(move |(_, (candidate, _))| candidate == key)
            .map(|(pos, _)| pos)
    }

    fn occurrences<'a>(
        &'a self,
        key: &'a K,
        ordinal: usize,
        number: usize,
    ) -> impl Iterator<Item = usize> + 'a {
        self.matches(key).skip(ordinal.saturating_sub(1)).take(number)
    }

    /// Returns cursors to the `ordinal`-th through `(ordinal + number - 1)`-th
    /// occurrences of `key`, in ascending position order.
    ///
    /// Fewer cursors are returned when the key runs out of occurrences.
    #[must_use]
    pub fn find<'a>(
        &'a self,
        key: &'a K,
        ordinal: usize,
        number: usize,
    ) -> Vec<Cursor<'a, K, V, DELTA>> {
        self.occurrences(key, ordinal, number)
            .map(|pos| Cursor::new(self, pos))
            .collect()
    }

    #[must_use]
    pub fn find_all<'a>(&'a self, key: &'a K) -> Vec<Cursor<'a, K, V, DELTA>> {
        self.find(key, 1, usize::MAX)
    }

    #[must_use]
    pub fn find_values<'a>(&'a self, key: &'a K, ordinal: usize, number: usize) -> Vec<&'a V> {
        self.occurrences(key, ordinal, number)
            .filter_map(|pos| self.value(pos))
            .collect()
    }

    #[must_use]
    pub fn find_all_values<'a>(&'a self, key: &'a K) -> Vec<&'a V> {
        self.find_values(key, 1, usize::MAX)
    }

    #[must_use]
    pub fn find_positions(&self, key: &K, ordinal: usize, number: usize) -> Vec<usize> {
        self.occurrences(key, ordinal, number).collect()
    }

    #[must_use]
    pub fn find_all_positions(&self, key: &K) -> Vec<usize> {
        self.matches(key).collect()
    }

    /// Position of the first occurrence of `key`.
    #[must_use]
    pub fn position(&self, key: &K) -> Option<usize> {
        self.matches(key).next()
    }

    /// Position of the `ordinal`-th occurrence of `key`.
    #[must_use]
    pub fn nth_position(&self, key: &K, ordinal: usize) -> Option<usize> {
        self.occurrences(key, ordinal, 1).next()
    }

    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.position(key).is_some()
    }

    #[must_use]
    pub fn count(&self, key: &K) -> usize {
        self.matches(key).count()
    }

    /// Value of the first occurrence of `key`.
    #[must_use]
    pub fn value_of(&self, key: &K) -> Option<&V> {
        self.value(self.position(key)?)
    }

    pub fn value_of_mut(&mut self, key: &K) -> Option<&mut V> {
        let pos = self.position(key)?;
        self.value_mut(pos)
    }

    fn ordinal_position(&self, key: &K, ordinal: usize) -> Result<usize, PairStoreError> {
        self.nth_position(key, ordinal)
            .ok_or(PairStoreError::KeyNotFound {
                ordinal: ordinal.max(1),
            })
    }

    /// Removes the first occurrence of `key` and returns it.
    ///
    /// # Errors
    ///
    /// Returns `PairStoreError::KeyNotFound` if the key is absent; the store
    /// is unchanged.
    pub fn erase_key(&mut self, key: &K) -> Result<(K, V), PairStoreError> {
        let pos = self.ordinal_position(key, 1)?;
        self.erase(pos)
            .ok_or(PairStoreError::KeyNotFound { ordinal: 1 })
    }

    /// Removes every occurrence of `key`, highest position first so that the
    /// remaining matches keep their positions. Returns the number removed.
    pub fn erase_all(&mut self, key: &K) -> usize {
        let positions = self.find_all_positions(key);
        positions
            .into_iter()
            .rev()
            .filter_map(|pos| self.erase(pos))
            .count()
    }

    /// Replaces the `ordinal`-th occurrence of `key` with a new pair and
    /// returns the old one.
    ///
    /// # Errors
    ///
    /// Returns `PairStoreError::KeyNotFound` if there is no such occurrence.
    pub fn set_by_key(
        &mut self,
        key: &K,
        ordinal: usize,
        new_key: K,
        new_value: V,
    ) -> Result<(K, V), PairStoreError> {
        let pos = self.ordinal_position(key, ordinal)?;
        self.set(pos, new_key, new_value)
    }

    /// Replaces the value of the `ordinal`-th occurrence of `key`.
    ///
    /// # Errors
    ///
    /// Returns `PairStoreError::KeyNotFound` if there is no such occurrence.
    pub fn set_value_by_key(
        &mut self,
        key: &K,
        ordinal: usize,
        value: V,
    ) -> Result<V, PairStoreError> {
        let pos = self.ordinal_position(key, ordinal)?;
        self.set_value(pos, value)
    }

    /// Renames the `ordinal`-th occurrence of `key`.
    ///
    /// # Errors
    ///
    /// Returns `PairStoreError::KeyNotFound` if there is no such occurrence.
    pub fn set_key_by_key(
        &mut self,
        key: &K,
        ordinal: usize,
        new_key: K,
    ) -> Result<K, PairStoreError> {
        let pos = self.ordinal_position(key, ordinal)?;
        self.set_key(pos, new_key)
    }
}
