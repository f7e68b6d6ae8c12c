//! Errors returned by [`Tree`][crate::Tree] operations.

use thiserror::Error;

/// The ways a tree operation can fail. A failed operation never leaves the tree partially
/// modified.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The key is already stored in the tree. Keys are unique so the insert was rejected.
    #[error("duplicate key {0} not allowed in tree")]
    DuplicateKey(i32),
    /// The tree has no nodes so there is no minimum or maximum.
    #[error("tree is empty")]
    EmptyTree,
}
