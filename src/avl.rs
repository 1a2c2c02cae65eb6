//! A self-balancing Binary Search Tree (specifically, an AVL tree).
//!
//! After every insert and removal the tree walks from the point of change up to the root and
//! rotates any node whose subtrees differ in height by more than one. See
//! [the Wikipedia page][wiki] for terminology.
//!
//! [wiki]: https://en.wikipedia.org/wiki/AVL_tree#Rebalancing
//!
//! # Examples
//!
//! ```
//! use search_trees::AvlTree;
//!
//! let mut tree = AvlTree::new();
//! for x in [30, 20, 40, 10, 25, 5] {
//!     tree.insert(x).unwrap();
//! }
//!
//! // Inserting 5 unbalanced 30, so 20 was rotated up to the root.
//! let root = tree.root().unwrap();
//! assert_eq!(root.value(), Some(&20));
//! assert_eq!(root.left().unwrap().value(), Some(&10));
//! assert_eq!(root.right().unwrap().value(), Some(&30));
//! assert_eq!(root.height(), 2);
//!
//! // A missing value is reported, not raised.
//! assert_eq!(tree.remove(&100), Ok(false));
//! ```

use crate::error::{Result, TreeError};
use crate::node::NodeId;
use crate::tree::{Rebalance, Removal, Tree};

/// Height-driven rebalancing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Avl;

/// A Binary Search Tree kept height-balanced with AVL rotations.
///
/// Heights are not stored on the nodes. Every balance factor is computed by walking the
/// subtree below it, so an insert or removal costs `O(n)` rather than `O(lg n)`.
pub type AvlTree<T> = Tree<T, Avl>;

impl Rebalance for Avl {
    fn after_insert<T>(tree: &mut Tree<T, Self>, inserted: NodeId) -> Result<()> {
        rebalance_upwards(tree, Some(inserted))
    }

    fn after_remove<T>(tree: &mut Tree<T, Self>, removal: &Removal) -> Result<()> {
        rebalance_upwards(tree, removal.filler_parent.or(removal.filler))
    }
}

/// Balances `from` and every one of its ancestors.
fn rebalance_upwards<T>(tree: &mut Tree<T, Avl>, from: Option<NodeId>) -> Result<()> {
    let mut current = from;
    while let Some(node) = current {
        balance(tree, node)?;
        // After a rotation `node` sits one level lower, so its new parent is the node that took
        // its place. Balancing that one again is a no-op.
        current = tree.parent_of(node);
    }

    Ok(())
}

/// Rotates `node` if its balance factor is outside `-1..=1`.
fn balance<T>(tree: &mut Tree<T, Avl>, node: NodeId) -> Result<()> {
    let factor = tree.nodes.balance_factor(node);
    if factor > 1 {
        let left = tree
            .left_of(node)
            .ok_or(TreeError::Structure("left-heavy node without a left child"))?;
        if tree.nodes.balance_factor(left) >= 0 {
            // Left-left.
            tree.rotate_right(node)?;
        } else {
            // Left-right.
            tree.rotate_left(left)?;
            tree.rotate_right(node)?;
        }
    } else if factor < -1 {
        let right = tree
            .right_of(node)
            .ok_or(TreeError::Structure("right-heavy node without a right child"))?;
        if tree.nodes.balance_factor(right) <= 0 {
            // Right-right.
            tree.rotate_left(node)?;
        } else {
            // Right-left.
            tree.rotate_right(right)?;
            tree.rotate_left(node)?;
        }
    }

    Ok(())
}


#[cfg(test)]
mod quicktests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::test::quick::Op;

    /// Applies a set of operations to a tree and a set, checking the AVL invariant after each.
    fn do_ops(ops: &[Op<i8>], tree: &mut AvlTree<i8>, set: &mut BTreeSet<i8>) {
        for op in ops {
            match op {
                Op::Insert(x) => {
                    assert_eq!(tree.insert(*x).is_ok(), set.insert(*x));
                }
                Op::Remove(x) => {
                    assert_eq!(tree.remove(x), Ok(set.remove(x)));
                }
                Op::Iter => {
                    assert!(tree.iter().eq(set.iter()));
                }
            }
            if let Some(root) = tree.root() {
                assert!(root.is_balanced());
            }
        }
    }

    quickcheck::quickcheck! {
        fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
            let mut tree = AvlTree::new();
            let mut set = BTreeSet::new();

            do_ops(&ops, &mut tree, &mut set);
            tree.is_search_tree() && set.iter().all(|x| tree.contains(x))
        }
    }

    quickcheck::quickcheck! {
        fn contains(xs: Vec<i8>) -> bool {
            let mut tree = AvlTree::new();
            for x in &xs {
                let _ = tree.insert(*x);
            }

            xs.iter().all(|x| tree.contains(x))
        }
    }
}
