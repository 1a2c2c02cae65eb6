//! This crate exposes Binary Search Trees (BSTs) with a choice of balancing
//! strategy, mostly for educational purposes.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and remove stored values. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` stores a value and
//! will sometimes have child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    value less than its own value.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    value greater than its own value.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Searching for values in the tree takes `O(height)` (where `height` is the longest
//! path from the root `Node` to a leaf `Node`). A plain BST fed sorted input
//! degenerates into a list, so this crate offers two ways of keeping the height at
//! `O(lg N)`:
//!
//! - [`AvlTree`] rotates whenever the heights of a node's two subtrees differ by more
//!   than one.
//! - [`RedBlackTree`] colours nodes red or black and rotates or recolours whenever a
//!   red node gets a red child.
//!
//! All variants share one [`Tree`] type. The balancing strategy is its second type
//! parameter, and [`BinarySearchTree`] is the variant that does no balancing at all.
//! Values are unique: inserting a value twice fails with
//! [`TreeError::DuplicateValue`].
//!
//! ```
//! use search_trees::{AvlTree, BinarySearchTree};
//!
//! let mut plain = BinarySearchTree::new();
//! let mut avl = AvlTree::new();
//! for x in 1..=7 {
//!     plain.insert(x).unwrap();
//!     avl.insert(x).unwrap();
//! }
//!
//! assert_eq!(plain.to_string(), avl.to_string());
//! assert_eq!(plain.height(), 6);
//! assert_eq!(avl.height(), 2);
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod avl;
pub mod error;
pub mod node;
pub mod red_black;
pub mod tree;

pub use avl::{Avl, AvlTree};
pub use error::{Result, TreeError};
pub use node::{Color, NodeId, NodeRef};
pub use red_black::{RedBlack, RedBlackTree};
pub use tree::{BinarySearchTree, Iter, Rebalance, Removal, Tree, Unbalanced};
