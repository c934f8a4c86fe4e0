use alloc::alloc as heap;
use core::alloc::Layout;
use core::marker::PhantomData;
use core::ptr::{self, NonNull};

use crate::error::PairStoreError;

/// A single contiguous allocation of `cap` slots.
///
/// The buffer never tracks which slots are initialized. The owner keeps that
/// count and is responsible for dropping live values before the buffer is
/// released or relocated away from them.
pub(crate) struct RawBuffer<T> {
    ptr: NonNull<T>,
    cap: usize,
    _owns: PhantomData<T>,
}

// SAFETY: the buffer uniquely owns its slots, same as `Vec<T>`.
unsafe impl<T: Send> Send for RawBuffer<T> {}
// SAFETY: shared access only hands out shared pointers to the slots.
unsafe impl<T: Sync> Sync for RawBuffer<T> {}

impl<T> RawBuffer<T> {
    pub(crate) const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: 0,
            _owns: PhantomData,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.cap
    }

    pub(crate) fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    pub(crate) fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    fn layout(cap: usize) -> Result<Layout, PairStoreError> {
        Layout::array::<T>(cap).map_err(|_| {
            log::debug!("pairstore: layout for {cap} slots overflows");
            PairStoreError::CapacityOverflow { requested: cap }
        })
    }

    fn allocate(cap: usize) -> Result<NonNull<T>, PairStoreError> {
        let layout = Self::layout(cap)?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }
        // SAFETY: the layout has a non-zero size.
        let raw = unsafe { heap::alloc(layout) };
        NonNull::new(raw.cast::<T>()).ok_or_else(|| {
            log::debug!("pairstore: allocator refused {cap} slots");
            PairStoreError::AllocationFailed { requested: cap }
        })
    }

    /// Moves the first `live` slots into a fresh allocation of `new_cap`
    /// slots and releases the old allocation.
    ///
    /// On error the buffer is left untouched.
    ///
    /// # Safety
    ///
    /// `live <= self.capacity()`, `live <= new_cap`, and slots `[0, live)`
    /// must be initialized.
    pub(crate) unsafe fn relocate(
        &mut self,
        new_cap: usize,
        live: usize,
    ) -> Result<(), PairStoreError> {
        debug_assert!(live <= self.cap && live <= new_cap);
        let new_ptr = Self::allocate(new_cap)?;
        if live > 0 {
            // SAFETY: both allocations hold at least `live` slots and are distinct.
            unsafe { ptr::copy_nonoverlapping(self.ptr.as_ptr(), new_ptr.as_ptr(), live) };
        }
        log::trace!(
            "pairstore: relocated {live} pairs, capacity {} -> {new_cap}",
            self.cap
        );
        self.release();
        self.ptr = new_ptr;
        self.cap = new_cap;
        Ok(())
    }

    fn release(&mut self) {
        if let Ok(layout) = Self::layout(self.cap) {
            if layout.size() != 0 {
                // SAFETY: `ptr` was returned by `allocate` with this same layout.
                unsafe { heap::dealloc(self.ptr.as_ptr().cast(), layout) };
            }
        }
    }

    /// Escalates a capacity error from an infallible entry point, the same
    /// way the standard collections do.
    pub(crate) fn fail(err: &PairStoreError) -> ! {
        match *err {
            PairStoreError::AllocationFailed { requested } => match Layout::array::<T>(requested) {
                Ok(layout) => heap::handle_alloc_error(layout),
                Err(_) => panic!("capacity overflow"),
            },
            PairStoreError::CapacityOverflow { .. } => panic!("capacity overflow"),
            ref other => panic!("{other}"),
        }
    }
}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(values: &[u32], cap: usize) -> RawBuffer<u32> {
        let mut buf: RawBuffer<u32> = RawBuffer::new();
        unsafe {
            buf.relocate(cap, 0).unwrap();
            for (i, v) in values.iter().enumerate() {
                ptr::write(buf.as_mut_ptr().add(i), *v);
            }
        }
        buf
    }

    fn read(buf: &RawBuffer<u32>, live: usize) -> alloc::vec::Vec<u32> {
        (0..live)
            .map(|i| unsafe { ptr::read(buf.as_ptr().add(i)) })
            .collect()
    }

    #[test]
    fn test_new_buffer_is_empty() {
        let buf: RawBuffer<u64> = RawBuffer::new();
        assert_eq!(buf.capacity(), 0);
    }

    #[test]
    fn test_relocate_keeps_live_slots() {
        let mut buf = filled(&[1, 2, 3], 4);
        unsafe { buf.relocate(10, 3).unwrap() };
        assert_eq!(buf.capacity(), 10);
        assert_eq!(read(&buf, 3), [1, 2, 3]);

        unsafe { buf.relocate(3, 3).unwrap() };
        assert_eq!(buf.capacity(), 3);
        assert_eq!(read(&buf, 3), [1, 2, 3]);
    }

    #[test]
    fn test_relocate_to_zero() {
        let mut buf = filled(&[], 5);
        unsafe { buf.relocate(0, 0).unwrap() };
        assert_eq!(buf.capacity(), 0);
    }

    #[test]
    fn test_zero_sized_slots() {
        let mut buf: RawBuffer<()> = RawBuffer::new();
        unsafe { buf.relocate(1_000, 0).unwrap() };
        assert_eq!(buf.capacity(), 1_000);
    }

    #[test]
    fn test_layout_overflow_leaves_buffer_untouched() {
        let mut buf = filled(&[7, 8], 2);
        let result = unsafe { buf.relocate(usize::MAX, 2) };
        assert_eq!(
            result,
            Err(PairStoreError::CapacityOverflow {
                requested: usize::MAX
            })
        );
        assert_eq!(buf.capacity(), 2);
        assert_eq!(read(&buf, 2), [7, 8]);
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn test_fail_on_overflow_panics() {
        RawBuffer::<u32>::fail(&PairStoreError::CapacityOverflow { requested: 1 });
    }
}
