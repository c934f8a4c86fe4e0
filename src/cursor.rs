use core::fmt;
use core::ptr;

use crate::store::{PairStore, DEFAULT_CHUNK_SIZE};

/// A read-only position in a `PairStore`.
///
/// The cursor is a logical index plus a shared borrow of the store, so the
/// store cannot be reallocated or shifted while the cursor is alive. The
/// position `len()` is the end position: it holds no pair, and stepping
/// forward from it stays there.
pub struct Cursor<'a, K, V, const DELTA: usize = DEFAULT_CHUNK_SIZE> {
    store: &'a PairStore<K, V, DELTA>,
    pos: usize,
}

impl<'a, K, V, const DELTA: usize> Cursor<'a, K, V, DELTA> {
    pub(crate) fn new(store: &'a PairStore<K, V, DELTA>, pos: usize) -> Self {
        Self {
            store,
            pos: pos.min(store.len()),
        }
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[must_use]
    pub fn is_end(&self) -> bool {
        self.pos >= self.store.len()
    }

    #[must_use]
    pub fn pair(&self) -> Option<(&'a K, &'a V)> {
        self.store.get(self.pos)
    }

    #[must_use]
    pub fn key(&self) -> Option<&'a K> {
        self.store.key(self.pos)
    }

    #[must_use]
    pub fn value(&self) -> Option<&'a V> {
        self.store.value(self.pos)
    }

    /// Steps one position forward; stays at the end position.
    pub fn move_next(&mut self) {
        if self.pos < self.store.len() {
            self.pos += 1;
        }
    }

    /// Steps one position back. From the first pair the cursor moves to the
    /// end position; from the end position it moves to the last pair.
    pub fn move_prev(&mut self) {
        self.pos = match self.pos {
            0 => self.store.len(),
            pos => pos - 1,
        };
    }
}

impl<K, V, const DELTA: usize> Clone for Cursor<'_, K, V, DELTA> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V, const DELTA: usize> Copy for Cursor<'_, K, V, DELTA> {}

impl<K, V, const DELTA: usize> PartialEq for Cursor<'_, K, V, DELTA> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.store, other.store) && self.pos == other.pos
    }
}

impl<K, V, const DELTA: usize> Eq for Cursor<'_, K, V, DELTA> {}

impl<K: fmt::Debug, V: fmt::Debug, const DELTA: usize> fmt::Debug for Cursor<'_, K, V, DELTA> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("position", &self.pos)
            .field("pair", &self.pair())
            .finish()
    }
}

/// A position in a `PairStore` that can modify the pair under it.
///
/// Converts into a read-only [`Cursor`], but not back.
pub struct CursorMut<'a, K, V, const DELTA: usize = DEFAULT_CHUNK_SIZE> {
    store: &'a mut PairStore<K, V, DELTA>,
    pos: usize,
}

impl<'a, K, V, const DELTA: usize> CursorMut<'a, K, V, DELTA> {
    pub(crate) fn new(store: &'a mut PairStore<K, V, DELTA>, pos: usize) -> Self {
        let pos = pos.min(store.len());
        Self { store, pos }
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[must_use]
    pub fn is_end(&self) -> bool {
        self.pos >= self.store.len()
    }

    #[must_use]
    pub fn pair(&self) -> Option<(&K, &V)> {
        self.store.get(self.pos)
    }

    #[must_use]
    pub fn key(&self) -> Option<&K> {
        self.store.key(self.pos)
    }

    #[must_use]
    pub fn value(&self) -> Option<&V> {
        self.store.value(self.pos)
    }

    pub fn key_mut(&mut self) -> Option<&mut K> {
        self.store.as_mut_slice().get_mut(self.pos).map(|(key, _)| key)
    }

    pub fn value_mut(&mut self) -> Option<&mut V> {
        self.store.value_mut(self.pos)
    }

    pub fn move_next(&mut self) {
        if self.pos < self.store.len() {
            self.pos += 1;
        }
    }

    pub fn move_prev(&mut self) {
        self.pos = match self.pos {
            0 => self.store.len(),
            pos => pos - 1,
        };
    }

    /// Borrows a read-only cursor at the same position.
    #[must_use]
    pub fn as_cursor(&self) -> Cursor<'_, K, V, DELTA> {
        Cursor::new(&*self.store, self.pos)
    }
}

impl<'a, K, V, const DELTA: usize> From<CursorMut<'a, K, V, DELTA>> for Cursor<'a, K, V, DELTA> {
    fn from(cursor: CursorMut<'a, K, V, DELTA>) -> Self {
        Cursor::new(cursor.store, cursor.pos)
    }
}

impl<K, V, const DELTA: usize> PairStore<K, V, DELTA> {
    /// Cursor at `pos`, clamped to the end position.
    #[must_use]
    pub fn cursor_at(&self, pos: usize) -> Cursor<'_, K, V, DELTA> {
        Cursor::new(self, pos)
    }

    #[must_use]
    pub fn cursor_front(&self) -> Cursor<'_, K, V, DELTA> {
        Cursor::new(self, 0)
    }

    /// Cursor at the last pair, or at the end position when empty.
    #[must_use]
    pub fn cursor_back(&self) -> Cursor<'_, K, V, DELTA> {
        Cursor::new(self, self.len().saturating_sub(1))
    }

    #[must_use]
    pub fn cursor_end(&self) -> Cursor<'_, K, V, DELTA> {
        Cursor::new(self, self.len())
    }

    pub fn cursor_at_mut(&mut self, pos: usize) -> CursorMut<'_, K, V, DELTA> {
        CursorMut::new(self, pos)
    }

    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, K, V, DELTA> {
        CursorMut::new(self, 0)
    }

    pub fn cursor_back_mut(&mut self) -> CursorMut<'_, K, V, DELTA> {
        let last = self.len().saturating_sub(1);
        CursorMut::new(self, last)
    }
}
