use thiserror::Error;

/// Error types for `PairStore` operations
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum PairStoreError {
    /// Position is beyond the current length of the store
    #[error("Index out of bounds: index {index} is beyond store length {length}")]
    IndexOutOfBounds {
        /// Position that was accessed
        index: usize,
        /// Current length of the store
        length: usize,
    },
    /// No occurrence of the key with the requested ordinal exists
    #[error("Key not found: no occurrence with ordinal {ordinal}")]
    KeyNotFound {
        /// 1-based ordinal that was looked up
        ordinal: usize,
    },
    /// Requested capacity cannot hold the live pairs
    #[error("Capacity {requested} is below the store length {length}")]
    CapacityBelowLength {
        /// Capacity that was requested
        requested: usize,
        /// Current length of the store
        length: usize,
    },
    /// Requested capacity does not fit in the address space
    #[error("Capacity overflow: {requested} slots cannot be laid out")]
    CapacityOverflow {
        /// Number of slots requested
        requested: usize,
    },
    /// The allocator refused the request
    #[error("Allocation failed: {requested} slots")]
    AllocationFailed {
        /// Number of slots requested
        requested: usize,
    },
}
