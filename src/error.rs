use crate::TraversalOrder;

/// Errors reported by the fallible operations of this crate.
///
/// Lookups that are expected to miss (`get`, `remove`, ...) return [`Option`] instead.
/// Broken tree invariants are never reported through this type; they panic.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, thiserror::Error)]
pub enum Error {
    /// The key is not present in the map.
    #[error("key not found")]
    KeyNotFound,

    /// The cursor does not point at an entry, or would move before the first entry.
    #[error("cursor does not point at an entry")]
    InvalidIterator,

    /// The operation is not available for cursors walking in the given order.
    #[error("operation is not supported in {0} order")]
    UnsupportedInOrder(TraversalOrder),

    /// An aggregate computed over the entries does not fit its type.
    #[error("arithmetic overflow while reducing entries")]
    ArithmeticOverflow,

    /// The name does not denote a traversal order.
    #[error("unknown traversal order, expected `ascending`, `descending` or `breadth`")]
    UnknownTraversalOrder,
}
