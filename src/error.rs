//! Failure kinds shared by every tree variant.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = TreeError> = std::result::Result<T, E>;

/// The ways a tree operation can fail.
///
/// [`DuplicateValue`][TreeError::DuplicateValue] and [`NotFound`][TreeError::NotFound] are
/// ordinary, recoverable outcomes that callers are expected to match on.
/// [`Structure`][TreeError::Structure] means the node graph is not shaped the way an algorithm
/// requires. It is a bug in the tree, not in the caller, and nothing in this crate swallows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The value being inserted is already stored in the tree.
    #[error("value already exists in the tree and cannot be inserted again")]
    DuplicateValue,
    /// The value being looked up or removed is not stored in the tree.
    #[error("value was not found in the tree")]
    NotFound,
    /// A structural invariant was violated (e.g. rotating a node without the required child).
    #[error("structural invariant violated: {0}")]
    Structure(&'static str),
}

impl TreeError {
    /// Whether this is a [`NotFound`][TreeError::NotFound] failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}
