//! This crate exposes a Red-Black Tree over unique integer keys.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert and find stored records. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` will typically store
//! some sort of value (the key that was inserted, for example) and will
//! sometimes have child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    key less than its own key.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    key greater than its own key.
//!
//! Searching for a key takes `O(height)`. Without any balancing, inserting keys
//! in sorted order makes the height `O(N)`.
//!
//! ## Red-Black Tree
//!
//! A Red-Black Tree colors every `Node` red or black and keeps three more
//! invariants:
//!
//! 3. The root is black.
//! 4. A red `Node` never has a red child.
//! 5. Every path from a `Node` down to a missing child passes through the same
//!    number of black `Node`s (the "black-height").
//!
//! Together these bound the height of the tree to `2 * lg(N + 1)`. Inserting
//! can break invariants 3 and 4; they are restored by recoloring and
//! rotating nodes on the path back up to the root.
//!
//! # Examples
//!
//! ```
//! use rbtree::{Error, Tree};
//!
//! let mut tree = Tree::new();
//! tree.insert(30).unwrap();
//! tree.insert(15).unwrap();
//! tree.insert(10).unwrap();
//!
//! // Inserting 10 rotated 15 up to the root.
//! assert_eq!(tree.to_prefix_string(), " B15  R10  R30 ");
//!
//! assert_eq!(tree.insert(15), Err(Error::DuplicateKey(15)));
//! assert_eq!(tree.len(), 3);
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod error;
pub mod redblack;

pub use error::Error;
pub use redblack::Tree;

#[cfg(test)]
mod test;
