//! A Red-Black tree.
//!
//! Every node is coloured red or black such that:
//!
//! 1. The root is black.
//! 2. A red node never has a red parent.
//! 3. Every path from the root down to a missing child passes the same number of black nodes.
//!
//! Insertion colours the new node red (black if it is the root) and then repairs any red-red
//! pair by recolouring when the uncle is red, or by rotating when it is not. Removal repairs a
//! lost black node with the usual sibling case analysis.
//!
//! # Examples
//!
//! ```
//! use search_trees::{Color, RedBlackTree};
//!
//! let mut tree = RedBlackTree::new();
//! tree.insert(10).unwrap();
//! assert_eq!(tree.root().unwrap().color(), Color::Black);
//!
//! assert_eq!(tree.insert(15).unwrap().color(), Color::Red);
//! assert_eq!(tree.insert(5).unwrap().color(), Color::Red);
//! assert_eq!(tree.to_string(), "5,10,15");
//! assert_eq!(tree.height(), 1);
//! assert!(tree.is_valid());
//! ```

use log::trace;

use crate::error::{Result, TreeError};
use crate::node::{Color, NodeId};
use crate::tree::{Rebalance, Removal, Tree};

/// Colour-driven rebalancing.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedBlack;

/// A Binary Search Tree kept balanced with red-black colouring.
pub type RedBlackTree<T> = Tree<T, RedBlack>;

impl Rebalance for RedBlack {
    fn after_insert<T>(tree: &mut Tree<T, Self>, inserted: NodeId) -> Result<()> {
        let color = if tree.parent_of(inserted).is_none() {
            Color::Black
        } else {
            Color::Red
        };
        tree.set_color(inserted, color);

        // A repair at `node` leaves at worst a red-red pair between its grandparent and the
        // grandparent's parent, so the walk moves up two levels at a time.
        let mut current = Some(inserted);
        while let Some(node) = current {
            balance(tree, node)?;
            current = tree.parent_of(node).and_then(|parent| tree.parent_of(parent));
        }

        Ok(())
    }

    fn after_remove<T>(tree: &mut Tree<T, Self>, removal: &Removal) -> Result<()> {
        if removal.removed_color.is_black() {
            repair_removal(tree, removal.filler, removal.filler_parent)?;
        }

        Ok(())
    }
}

impl<T> Tree<T, RedBlack> {
    /// Checks all three colour rules over the whole tree.
    pub fn is_valid(&self) -> bool {
        match self.root() {
            None => true,
            Some(root) => root.color().is_black() && self.black_height(Some(root.id())).is_some(),
        }
    }

    /// The number of black nodes on every path below `node`, or `None` if the paths disagree or
    /// a red node has a red child.
    fn black_height(&self, node: Option<NodeId>) -> Option<usize> {
        let Some(id) = node else {
            return Some(1);
        };
        let color = self.nodes.get(id).color;
        let left = self.left_of(id);
        let right = self.right_of(id);

        if color.is_red() && (self.is_red(left) || self.is_red(right)) {
            return None;
        }
        if !color.is_red() && !color.is_black() {
            return None;
        }

        let left_height = self.black_height(left)?;
        let right_height = self.black_height(right)?;
        if left_height != right_height {
            return None;
        }

        Some(left_height + usize::from(color.is_black()))
    }

    fn is_red(&self, node: Option<NodeId>) -> bool {
        self.nodes.color_of(node).is_red()
    }
}

/// Repairs a red node whose parent is also red, given that `node` is the lower of the two.
fn balance<T>(tree: &mut Tree<T, RedBlack>, node: NodeId) -> Result<()> {
    let Some(parent) = tree.parent_of(node) else {
        return Ok(());
    };
    let Some(grandparent) = tree.parent_of(parent) else {
        return Ok(());
    };
    if !(tree.is_red(Some(node)) && tree.is_red(Some(parent))) {
        return Ok(());
    }

    let uncle = tree.nodes.uncle(node);
    if tree.is_red(uncle) {
        recolor(tree, parent, uncle, grandparent);
        return Ok(());
    }

    let parent_is_left = tree.left_of(grandparent) == Some(parent);
    let node_is_left = tree.left_of(parent) == Some(node);
    let top = match (parent_is_left, node_is_left) {
        (true, true) => tree.rotate_right(grandparent)?,
        (true, false) => {
            tree.rotate_left(parent)?;
            tree.rotate_right(grandparent)?
        }
        (false, false) => tree.rotate_left(grandparent)?,
        (false, true) => {
            tree.rotate_right(parent)?;
            tree.rotate_left(grandparent)?
        }
    };
    swap_colors(tree, grandparent, top);

    Ok(())
}

/// The red-uncle case: push the grandparent's blackness down one level.
fn recolor<T>(
    tree: &mut Tree<T, RedBlack>,
    parent: NodeId,
    uncle: Option<NodeId>,
    grandparent: NodeId,
) {
    tree.set_color(parent, Color::Black);
    if let Some(uncle) = uncle {
        tree.set_color(uncle, Color::Black);
    }
    let grandparent_color = if grandparent == tree.root {
        Color::Black
    } else {
        Color::Red
    };
    tree.set_color(grandparent, grandparent_color);
    trace!("recoloured below {}", grandparent);
}

fn swap_colors<T>(tree: &mut Tree<T, RedBlack>, a: NodeId, b: NodeId) {
    let a_color = tree.nodes.get(a).color;
    let b_color = tree.nodes.get(b).color;
    tree.set_color(a, b_color);
    tree.set_color(b, a_color);
}

/// Restores the black height after a black node left the position now held by `node` (which
/// may be a missing child of `parent`).
fn repair_removal<T>(
    tree: &mut Tree<T, RedBlack>,
    mut node: Option<NodeId>,
    mut parent: Option<NodeId>,
) -> Result<()> {
    while node != Some(tree.root) && !tree.is_red(node) {
        let Some(above) = parent else {
            break;
        };

        if tree.left_of(above) == node {
            let mut sibling = tree
                .right_of(above)
                .ok_or(TreeError::Structure("black height deficit without a sibling"))?;
            if tree.is_red(Some(sibling)) {
                // Make the sibling black so one of the cases below applies.
                tree.set_color(sibling, Color::Black);
                tree.set_color(above, Color::Red);
                tree.rotate_left(above)?;
                sibling = tree
                    .right_of(above)
                    .ok_or(TreeError::Structure("rotation left no sibling behind"))?;
            }

            let near = tree.left_of(sibling);
            let far = tree.right_of(sibling);
            if !tree.is_red(near) && !tree.is_red(far) {
                // Take a black from both sides and push the deficit up.
                tree.set_color(sibling, Color::Red);
                node = Some(above);
                parent = tree.parent_of(above);
                continue;
            }

            if !tree.is_red(far) {
                if let Some(near) = near {
                    tree.set_color(near, Color::Black);
                }
                tree.set_color(sibling, Color::Red);
                sibling = tree.rotate_right(sibling)?;
            }

            let above_color = tree.nodes.get(above).color;
            tree.set_color(sibling, above_color);
            tree.set_color(above, Color::Black);
            if let Some(far) = tree.right_of(sibling) {
                tree.set_color(far, Color::Black);
            }
            tree.rotate_left(above)?;
        } else {
            let mut sibling = tree
                .left_of(above)
                .ok_or(TreeError::Structure("black height deficit without a sibling"))?;
            if tree.is_red(Some(sibling)) {
                tree.set_color(sibling, Color::Black);
                tree.set_color(above, Color::Red);
                tree.rotate_right(above)?;
                sibling = tree
                    .left_of(above)
                    .ok_or(TreeError::Structure("rotation left no sibling behind"))?;
            }

            let near = tree.right_of(sibling);
            let far = tree.left_of(sibling);
            if !tree.is_red(near) && !tree.is_red(far) {
                tree.set_color(sibling, Color::Red);
                node = Some(above);
                parent = tree.parent_of(above);
                continue;
            }

            if !tree.is_red(far) {
                if let Some(near) = near {
                    tree.set_color(near, Color::Black);
                }
                tree.set_color(sibling, Color::Red);
                sibling = tree.rotate_left(sibling)?;
            }

            let above_color = tree.nodes.get(above).color;
            tree.set_color(sibling, above_color);
            tree.set_color(above, Color::Black);
            if let Some(far) = tree.left_of(sibling) {
                tree.set_color(far, Color::Black);
            }
            tree.rotate_right(above)?;
        }

        node = Some(tree.root);
        break;
    }

    if let Some(node) = node {
        tree.set_color(node, Color::Black);
    }
    trace!("repaired black height after removal");

    Ok(())
}
