use core::fmt;

/// Errors reported by [`IdentityHashMap`] and its cursors and views.
///
/// Every error is returned to the immediate caller; nothing is retried or
/// swallowed internally.
///
/// [`IdentityHashMap`]: crate::IdentityHashMap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Error {
    /// A constructor or configuration argument was rejected before anything
    /// was allocated.
    InvalidArgument(&'static str),
    /// The table is at its maximum capacity and already holds `capacity - 1`
    /// entries, so no empty slot would remain after another insertion.
    CapacityExhausted {
        /// The table size that could not grow further.
        capacity: usize,
    },
    /// The map was structurally modified outside the cursor or view that
    /// observed it.
    ///
    /// Detection is best-effort. It exists to surface bugs and must not be
    /// relied on for correctness.
    ConcurrentModification,
    /// A cursor operation needed a current entry but there was none.
    IllegalIteratorState(&'static str),
    /// Persisted map state could not be reconstructed.
    StreamCorrupted(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument(reason) => write!(f, "invalid argument: {reason}"),
            Error::CapacityExhausted { capacity } => {
                write!(f, "capacity exhausted: table of {capacity} slots is full")
            }
            Error::ConcurrentModification => f.write_str("map was modified during traversal"),
            Error::IllegalIteratorState(reason) => write!(f, "illegal cursor state: {reason}"),
            Error::StreamCorrupted(reason) => write!(f, "stream corrupted: {reason}"),
        }
    }
}

impl core::error::Error for Error {}
