//! The tree shared by every variant. It stores nodes in a slab, implements plain Binary Search
//! Tree insertion, lookup and removal, and hands control to a [`Rebalance`] strategy after each
//! mutation so that [`Avl`][crate::Avl] and [`RedBlack`][crate::RedBlack] can restructure the
//! graph.
//!
//! # Examples
//!
//! ```
//! use search_trees::{BinarySearchTree, TreeError};
//!
//! let mut tree = BinarySearchTree::new();
//!
//! // Nothing in here yet.
//! assert_eq!(tree.find(&10).unwrap_err(), TreeError::NotFound);
//!
//! tree.insert(10).unwrap();
//! tree.insert(5).unwrap();
//! tree.insert(20).unwrap();
//! assert_eq!(tree.to_string(), "5,10,20");
//!
//! // Values are unique.
//! assert_eq!(tree.insert(10).unwrap_err(), TreeError::DuplicateValue);
//!
//! // Removing reports whether anything was there.
//! assert_eq!(tree.remove(&5), Ok(true));
//! assert_eq!(tree.remove(&5), Ok(false));
//! assert_eq!(tree.to_string(), "10,20");
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

use log::{debug, trace, warn};

use crate::error::{Result, TreeError};
use crate::node::{Color, NodeId, NodeRef, Nodes};

/// What a removal did to the shape of the tree, handed to [`Rebalance::after_remove`].
///
/// The names follow the usual description of BST deletion: some node physically leaves its
/// position (the removed node itself, or its in-order predecessor when that one is moved up to
/// take its place), and `filler` is whatever now sits in that vacated position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removal {
    /// Colour of the node that physically left its position.
    pub removed_color: Color,
    /// The node now occupying the vacated position, if any.
    pub filler: Option<NodeId>,
    /// The parent of the vacated position. `None` when the position is the root.
    pub filler_parent: Option<NodeId>,
}

/// A balancing strategy. The tree calls these hooks after its own structural work is done.
pub trait Rebalance: Sized {
    /// Restores the strategy's invariants after `inserted` was linked into the tree.
    fn after_insert<T>(tree: &mut Tree<T, Self>, inserted: NodeId) -> Result<()>;

    /// Restores the strategy's invariants after a node was unlinked.
    fn after_remove<T>(tree: &mut Tree<T, Self>, removal: &Removal) -> Result<()>;
}

/// No rebalancing at all: a plain Binary Search Tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbalanced;

impl Rebalance for Unbalanced {
    fn after_insert<T>(_: &mut Tree<T, Self>, _: NodeId) -> Result<()> {
        Ok(())
    }

    fn after_remove<T>(_: &mut Tree<T, Self>, _: &Removal) -> Result<()> {
        Ok(())
    }
}

/// A plain, unbalanced Binary Search Tree.
pub type BinarySearchTree<T> = Tree<T, Unbalanced>;

/// Which child slot of a parent a node occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

/// A Binary Search Tree of unique values, balanced by the strategy `S`.
///
/// The tree always owns a root node. Before the first insert (and after the last value is
/// removed) that root is an empty sentinel without a value.
pub struct Tree<T, S = Unbalanced> {
    pub(crate) nodes: Nodes<T>,
    pub(crate) root: NodeId,
    len: usize,
    comparator: fn(&T, &T) -> Ordering,
    strategy: PhantomData<S>,
}

impl<T, S> Clone for Tree<T, S>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        // Ids are slab indices so cloning the slab keeps every link consistent.
        Self {
            nodes: self.nodes.clone(),
            root: self.root,
            len: self.len,
            comparator: self.comparator,
            strategy: PhantomData,
        }
    }
}

impl<T, S> fmt::Debug for Tree<T, S>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree").field("root", &self.root()).finish()
    }
}

/// Comma separated values in ascending order, e.g. `5,10,20`.
impl<T, S> fmt::Display for Tree<T, S>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

impl<T, S> Default for Tree<T, S>
where
    T: Ord,
    S: Rebalance,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S> Tree<T, S>
where
    T: Ord,
    S: Rebalance,
{
    /// Generate a new, empty `Tree` ordered by `T`'s `Ord` implementation.
    pub fn new() -> Self {
        Self::with_comparator(T::cmp)
    }
}

impl<T, S> Tree<T, S>
where
    S: Rebalance,
{
    /// Generate a new, empty `Tree` ordered by `comparator`. Values the comparator reports as
    /// `Equal` are duplicates of each other.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::AvlTree;
    ///
    /// let mut tree = AvlTree::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    /// for x in [1, 2, 3] {
    ///     tree.insert(x).unwrap();
    /// }
    ///
    /// assert_eq!(tree.to_string(), "3,2,1");
    /// ```
    pub fn with_comparator(comparator: fn(&T, &T) -> Ordering) -> Self {
        let mut nodes = Nodes::new();
        let root = nodes.alloc(None);
        Self {
            nodes,
            root,
            len: 0,
            comparator,
            strategy: PhantomData,
        }
    }

    /// Inserts `value` and returns a view of the node now holding it.
    ///
    /// # Errors
    ///
    /// [`TreeError::DuplicateValue`] when an equal value is already stored. The tree is left
    /// untouched in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::{AvlTree, TreeError};
    ///
    /// let mut tree = AvlTree::new();
    /// assert_eq!(tree.insert(4).unwrap().value(), Some(&4));
    /// tree.insert(3).unwrap();
    /// tree.insert(2).unwrap();
    ///
    /// let root = tree.root().unwrap();
    /// assert_eq!(root.value(), Some(&3));
    /// assert_eq!(root.height(), 1);
    ///
    /// assert_eq!(tree.insert(3).unwrap_err(), TreeError::DuplicateValue);
    /// ```
    pub fn insert(&mut self, value: T) -> Result<NodeRef<'_, T>> {
        let inserted = self.insert_unbalanced(value)?;
        self.len += 1;
        S::after_insert(self, inserted)?;
        debug!("inserted a value, tree now holds {}", self.len);

        Ok(NodeRef::new(&self.nodes, inserted))
    }

    /// Removes `value` and returns it.
    ///
    /// # Errors
    ///
    /// [`TreeError::NotFound`] when no equal value is stored, or [`TreeError::Structure`] when
    /// rebalancing found the graph in an impossible shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::{RedBlackTree, TreeError};
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(String::from("b")).unwrap();
    ///
    /// assert_eq!(tree.delete(&String::from("b")), Ok(String::from("b")));
    /// assert_eq!(tree.delete(&String::from("b")), Err(TreeError::NotFound));
    /// ```
    pub fn delete(&mut self, value: &T) -> Result<T> {
        let target = self.find_id(value)?;
        let (value, removal) = self.unlink(target)?;
        self.len -= 1;
        S::after_remove(self, &removal)?;
        debug!("removed a value, tree now holds {}", self.len);

        Ok(value)
    }

    /// Removes `value`, reporting whether it was present.
    ///
    /// A missing value is not an error here: `Ok(false)` is returned instead. Every other
    /// failure is passed through untouched.
    pub fn remove(&mut self, value: &T) -> Result<bool> {
        match self.delete(value) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => {
                debug!("nothing to remove: {}", e);
                Ok(false)
            }
            Err(e) => {
                warn!("removal failed: {}", e);
                Err(e)
            }
        }
    }
}

impl<T, S> Tree<T, S> {
    /// Number of values stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no value is stored (the root is the empty sentinel).
    pub fn is_empty(&self) -> bool {
        self.nodes.get(self.root).value.is_none()
    }

    /// The root node, or `None` while the tree is empty.
    pub fn root(&self) -> Option<NodeRef<'_, T>> {
        if self.is_empty() {
            None
        } else {
            Some(NodeRef::new(&self.nodes, self.root))
        }
    }

    /// The id of the root slot. While the tree is empty this is the sentinel.
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// A view of the node `id`, if it is still part of this tree.
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_, T>> {
        if self.nodes.contains(id) {
            Some(NodeRef::new(&self.nodes, id))
        } else {
            None
        }
    }

    /// Height of the whole tree (0 for a single node or an empty tree).
    pub fn height(&self) -> usize {
        self.nodes.height(self.root)
    }

    /// Finds the node holding `value`.
    ///
    /// # Errors
    ///
    /// [`TreeError::NotFound`] when no equal value is stored.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::BinarySearchTree;
    ///
    /// let mut tree = BinarySearchTree::new();
    /// tree.insert(1).unwrap();
    ///
    /// assert_eq!(tree.find(&1).unwrap().value(), Some(&1));
    /// assert!(tree.find(&42).is_err());
    /// ```
    pub fn find(&self, value: &T) -> Result<NodeRef<'_, T>> {
        self.find_id(value).map(|id| NodeRef::new(&self.nodes, id))
    }

    /// Whether an equal value is stored.
    pub fn contains(&self, value: &T) -> bool {
        self.find_id(value).is_ok()
    }

    /// The node holding the smallest value.
    pub fn find_min(&self) -> Option<NodeRef<'_, T>> {
        self.root()
            .map(|root| NodeRef::new(&self.nodes, self.nodes.min_of(root.id())))
    }

    /// The node holding the largest value.
    pub fn find_max(&self) -> Option<NodeRef<'_, T>> {
        self.root()
            .map(|root| NodeRef::new(&self.nodes, self.nodes.max_of(root.id())))
    }

    /// Values in ascending order, or descending when `reverse` is set. Walks the tree
    /// recursively; [`iter`][Tree::iter] yields the same ascending sequence with an explicit
    /// stack.
    pub fn in_order_traversal(&self, reverse: bool) -> Vec<&T> {
        fn walk<'a, T>(nodes: &'a Nodes<T>, id: NodeId, reverse: bool, out: &mut Vec<&'a T>) {
            let node = nodes.get(id);
            let (first, second) = if reverse {
                (node.right, node.left)
            } else {
                (node.left, node.right)
            };

            if let Some(first) = first {
                walk(nodes, first, reverse, out);
            }
            out.extend(node.value.as_ref());
            if let Some(second) = second {
                walk(nodes, second, reverse, out);
            }
        }

        let mut out = Vec::with_capacity(self.len);
        if !self.is_empty() {
            walk(&self.nodes, self.root, reverse, &mut out);
        }
        out
    }

    /// Values in ascending order, collected from the stack-based [`Iter`].
    pub fn in_order_traversal_iterative(&self) -> Vec<&T> {
        self.iter().collect()
    }

    /// A borrowing iterator over the values in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            nodes: &self.nodes,
            stack: Vec::new(),
            current: self.root().map(|root| root.id()),
            remaining: self.len,
        }
    }

    /// Checks the search order and the parent/child links of every node.
    pub fn is_search_tree(&self) -> bool {
        if self.nodes.get(self.root).parent.is_some() {
            return false;
        }
        if self.is_empty() {
            return self.nodes.get(self.root).left.is_none()
                && self.nodes.get(self.root).right.is_none();
        }

        let links_consistent = self.iter_ids().all(|id| {
            let node = self.nodes.get(id);
            node.left
                .into_iter()
                .chain(node.right)
                .all(|child| self.nodes.get(child).parent == Some(id))
        });
        let values = self.in_order_traversal(false);
        let ordered = values
            .windows(2)
            .all(|pair| (self.comparator)(pair[0], pair[1]) == Ordering::Less);

        links_consistent && ordered && values.len() == self.len
    }

    /// Replaces the value stored in `node` without moving it.
    ///
    /// This and the other link-editing methods below operate on single nodes and do not keep
    /// the search order; they exist for building and repairing trees by hand. A subtree whose
    /// link is cleared by them is destroyed: its ids go stale and its values no longer count
    /// towards [`len`][Tree::len].
    ///
    /// # Panics
    ///
    /// When `node` is stale.
    pub fn set_value(&mut self, node: NodeId, value: T) {
        let node = self.nodes.get_mut(node);
        if node.value.is_none() {
            self.len += 1;
        }
        node.value = Some(value);
    }

    /// Makes `child` the left child of `node`, moving it away from its current parent. The
    /// previous left child (if it is not `child` itself) is destroyed along with its subtree.
    ///
    /// # Panics
    ///
    /// When either id is stale, or when `child` is `node` or one of its ancestors.
    pub fn set_left(&mut self, node: NodeId, child: Option<NodeId>) {
        self.install_child(node, Side::Left, child);
    }

    /// Makes `child` the right child of `node`. See [`set_left`][Tree::set_left].
    ///
    /// # Panics
    ///
    /// When either id is stale, or when `child` is `node` or one of its ancestors.
    pub fn set_right(&mut self, node: NodeId, child: Option<NodeId>) {
        self.install_child(node, Side::Right, child);
    }

    /// Detaches and destroys whichever child of `parent` holds a value equal to `child`'s.
    /// Returns whether such a child existed.
    ///
    /// Children are matched by comparing values, not ids. With unique values (the tree's own
    /// invariant) the two agree. A hand-built graph holding equal values in both children would
    /// lose the left one.
    ///
    /// # Panics
    ///
    /// When either id is stale.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        match self.child_side(parent, child) {
            Some(side) => {
                self.install_child(parent, side, None);
                true
            }
            None => false,
        }
    }

    /// Puts `replacement` into the slot of whichever child of `parent` holds a value equal to
    /// `old`'s, moving `replacement` away from its current parent. The child that was there is
    /// destroyed along with what is left of its subtree. Returns whether such a child existed.
    /// Matching works as in [`remove_child`][Tree::remove_child].
    ///
    /// # Panics
    ///
    /// When any id is stale, or when `replacement` is `parent` or one of its ancestors.
    pub fn replace_child(&mut self, parent: NodeId, old: NodeId, replacement: NodeId) -> bool {
        match self.child_side(parent, old) {
            Some(side) => {
                self.install_child(parent, side, Some(replacement));
                true
            }
            None => false,
        }
    }

    pub(crate) fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).parent
    }

    pub(crate) fn left_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).left
    }

    pub(crate) fn right_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).right
    }

    pub(crate) fn set_color(&mut self, id: NodeId, color: Color) {
        self.nodes.get_mut(id).color = color;
    }

    /// Rotate `pivot` to the right. This moves its left child up vertically and `pivot` down
    /// vertically, and returns the id of the node now on top.
    ///
    /// # Diagram
    ///
    /// ```text
    ///    Option<parent>          Option<parent>
    ///      /                       /
    ///    pivot                   top
    ///    /   \                  /   \
    ///  top    z    rotate ->   x    pivot
    ///  / \                          /  \
    /// x   y                        y    z
    /// ```
    ///
    /// # Errors
    ///
    /// [`TreeError::Structure`] when `pivot` has no left child.
    pub(crate) fn rotate_right(&mut self, pivot: NodeId) -> Result<NodeId> {
        let top = self
            .take_child(pivot, Side::Left)
            .ok_or(TreeError::Structure("rotate right without a left child"))?;
        let inner = self.take_child(top, Side::Right);
        self.set_child(pivot, Side::Left, inner);
        self.transplant(pivot, Some(top))?;
        self.set_child(top, Side::Right, Some(pivot));
        trace!("rotated {} right, {} is on top", pivot, top);

        Ok(top)
    }

    /// Mirror image of [`rotate_right`][Tree::rotate_right].
    ///
    /// # Errors
    ///
    /// [`TreeError::Structure`] when `pivot` has no right child.
    pub(crate) fn rotate_left(&mut self, pivot: NodeId) -> Result<NodeId> {
        let top = self
            .take_child(pivot, Side::Right)
            .ok_or(TreeError::Structure("rotate left without a right child"))?;
        let inner = self.take_child(top, Side::Left);
        self.set_child(pivot, Side::Right, inner);
        self.transplant(pivot, Some(top))?;
        self.set_child(top, Side::Left, Some(pivot));
        trace!("rotated {} left, {} is on top", pivot, top);

        Ok(top)
    }

    fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.comparator)(a, b)
    }

    fn find_id(&self, value: &T) -> Result<NodeId> {
        let mut current = Some(self.root);
        while let Some(id) = current {
            let node = self.nodes.get(id);
            let Some(stored) = &node.value else {
                break;
            };
            current = match self.compare(value, stored) {
                Ordering::Less => node.left,
                Ordering::Equal => return Ok(id),
                Ordering::Greater => node.right,
            };
        }

        Err(TreeError::NotFound)
    }

    /// Plain BST insertion: fills the empty root or hangs a new leaf below the node the search
    /// ends at.
    fn insert_unbalanced(&mut self, value: T) -> Result<NodeId> {
        if self.is_empty() {
            self.nodes.get_mut(self.root).value = Some(value);
            return Ok(self.root);
        }

        let mut current = self.root;
        loop {
            let node = self.nodes.get(current);
            let stored = node
                .value
                .as_ref()
                .ok_or(TreeError::Structure("node without a value below the root"))?;
            let (side, next) = match self.compare(&value, stored) {
                Ordering::Less => (Side::Left, node.left),
                Ordering::Equal => return Err(TreeError::DuplicateValue),
                Ordering::Greater => (Side::Right, node.right),
            };

            match next {
                Some(next) => current = next,
                None => {
                    let leaf = self.nodes.alloc(Some(value));
                    self.set_child(current, side, Some(leaf));
                    return Ok(leaf);
                }
            }
        }
    }

    /// Unlinks `target` from the graph, frees its slot and returns its value.
    ///
    /// With a left subtree, the in-order predecessor (the largest value on the left) takes
    /// `target`'s place and colour. Otherwise the right child moves up, and a leaf is simply
    /// dropped from its parent. The last value of the tree is cleared out of the root in place so
    /// that the empty sentinel survives.
    fn unlink(&mut self, target: NodeId) -> Result<(T, Removal)> {
        let (left, right, parent, color) = {
            let node = self.nodes.get(target);
            (node.left, node.right, node.parent, node.color)
        };

        let removal = match (left, right) {
            (Some(left), _) => {
                let predecessor = self.nodes.max_of(left);
                let removed_color = self.nodes.get(predecessor).color;

                let filler_parent = if predecessor == left {
                    // The predecessor keeps its own left subtree and adopts the right one.
                    self.take_child(target, Side::Left);
                    let right = self.take_child(target, Side::Right);
                    self.set_child(predecessor, Side::Right, right);
                    predecessor
                } else {
                    let predecessor_parent = self.parent_of(predecessor).ok_or(
                        TreeError::Structure("predecessor below the left child has no parent"),
                    )?;
                    let orphan = self.take_child(predecessor, Side::Left);
                    self.set_child(predecessor_parent, Side::Right, orphan);

                    let left = self.take_child(target, Side::Left);
                    let right = self.take_child(target, Side::Right);
                    self.set_child(predecessor, Side::Left, left);
                    self.set_child(predecessor, Side::Right, right);
                    predecessor_parent
                };

                self.transplant(target, Some(predecessor))?;
                self.set_color(predecessor, color);
                let filler = if filler_parent == predecessor {
                    self.left_of(predecessor)
                } else {
                    self.right_of(filler_parent)
                };

                Removal {
                    removed_color,
                    filler,
                    filler_parent: Some(filler_parent),
                }
            }
            (None, Some(right)) => {
                self.take_child(target, Side::Right);
                self.transplant(target, Some(right))?;
                Removal {
                    removed_color: color,
                    filler: Some(right),
                    filler_parent: parent,
                }
            }
            (None, None) => {
                let removal = Removal {
                    removed_color: color,
                    filler: None,
                    filler_parent: parent,
                };
                if parent.is_none() {
                    let root = self.nodes.get_mut(target);
                    root.color = Color::Unset;
                    let value = root
                        .value
                        .take()
                        .ok_or(TreeError::Structure("removing from an empty root"))?;
                    return Ok((value, removal));
                }

                self.transplant(target, None)?;
                removal
            }
        };

        let value = self
            .nodes
            .release(target)
            .value
            .ok_or(TreeError::Structure("removed node carried no value"))?;
        Ok((value, removal))
    }

    /// Puts `new` where `old` hangs: in `old`'s parent's child slot, or at the root. `old` ends
    /// up without a parent; its own children are not touched.
    fn transplant(&mut self, old: NodeId, new: Option<NodeId>) -> Result<()> {
        match self.parent_of(old) {
            Some(parent) => {
                let side = self
                    .child_side(parent, old)
                    .ok_or(TreeError::Structure("node is not a child of its own parent"))?;
                self.take_child(parent, side);
                self.set_child(parent, side, new);
            }
            None => {
                let new = new.ok_or(TreeError::Structure("cannot replace the root with nothing"))?;
                self.nodes.get_mut(new).parent = None;
                self.root = new;
            }
        }

        Ok(())
    }

    fn child_side(&self, parent: NodeId, child: NodeId) -> Option<Side> {
        let node = self.nodes.get(parent);
        if node.left.map_or(false, |left| self.same_value(left, child)) {
            Some(Side::Left)
        } else if node.right.map_or(false, |right| self.same_value(right, child)) {
            Some(Side::Right)
        } else {
            None
        }
    }

    fn same_value(&self, a: NodeId, b: NodeId) -> bool {
        match (&self.nodes.get(a).value, &self.nodes.get(b).value) {
            (Some(a), Some(b)) => self.compare(a, b) == Ordering::Equal,
            (None, None) => true,
            _ => false,
        }
    }

    fn child(&self, node: NodeId, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left_of(node),
            Side::Right => self.right_of(node),
        }
    }

    fn child_slot(&mut self, node: NodeId, side: Side) -> &mut Option<NodeId> {
        let node = self.nodes.get_mut(node);
        match side {
            Side::Left => &mut node.left,
            Side::Right => &mut node.right,
        }
    }

    /// Installs `child` on `side` of `node`, stamping its parent link. The previous child keeps
    /// no parent link back to `node`.
    fn set_child(&mut self, node: NodeId, side: Side, child: Option<NodeId>) {
        if let Some(previous) = self.child(node, side) {
            let previous = self.nodes.get_mut(previous);
            if previous.parent == Some(node) {
                previous.parent = None;
            }
        }

        *self.child_slot(node, side) = child;
        if let Some(child) = child {
            self.nodes.get_mut(child).parent = Some(node);
        }
    }

    /// Public form of [`set_child`][Tree::set_child]: `child` is first unhooked from wherever
    /// it hangs, and the displaced child's subtree is destroyed.
    fn install_child(&mut self, node: NodeId, side: Side, child: Option<NodeId>) {
        let previous = self.child(node, side);
        if previous == child {
            return;
        }

        if let Some(child) = child {
            assert!(
                !self.is_ancestor_or_self(child, node),
                "linking {} below {} would create a cycle",
                child,
                node
            );
            if let Some(old_parent) = self.parent_of(child) {
                let old_side = if self.left_of(old_parent) == Some(child) {
                    Side::Left
                } else {
                    Side::Right
                };
                self.take_child(old_parent, old_side);
            }
        }

        self.take_child(node, side);
        self.set_child(node, side, child);
        if let Some(previous) = previous {
            self.destroy(previous);
        }
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == candidate {
                return true;
            }
            match self.parent_of(node) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    /// Frees every slot of the detached subtree rooted at `id`.
    fn destroy(&mut self, id: NodeId) {
        let mut stack = vec![id];
        let mut destroyed = 0;
        while let Some(id) = stack.pop() {
            let node = self.nodes.release(id);
            stack.extend(node.left);
            stack.extend(node.right);
            if node.value.is_some() {
                destroyed += 1;
            }
        }
        self.len -= destroyed;
        debug!("destroyed {} values, tree now holds {}", destroyed, self.len);
    }

    /// Clears `side` of `node` and the parent link of the child that was there.
    fn take_child(&mut self, node: NodeId, side: Side) -> Option<NodeId> {
        let child = self.child_slot(node, side).take();
        if let Some(child) = child {
            self.nodes.get_mut(child).parent = None;
        }
        child
    }

    /// Ids of every value-bearing node, in order.
    fn iter_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack = Vec::new();
        let mut current = self.root().map(|root| root.id());
        std::iter::from_fn(move || {
            while let Some(id) = current {
                stack.push(id);
                current = self.left_of(id);
            }
            let id = stack.pop()?;
            current = self.right_of(id);
            Some(id)
        })
    }
}

/// An in-order iterator over the values of a [`Tree`], driven by an explicit stack rather than
/// recursion.
pub struct Iter<'a, T> {
    nodes: &'a Nodes<T>,
    stack: Vec<NodeId>,
    current: Option<NodeId>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;
        // Get the left-most node we haven't visited yet.
        while let Some(id) = self.current {
            self.stack.push(id);
            self.current = nodes.get(id).left;
        }

        let node = nodes.get(self.stack.pop()?);
        self.current = node.right;
        self.remaining = self.remaining.saturating_sub(1);
        node.value.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T, S> IntoIterator for &'a Tree<T, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}


#[cfg(test)]
mod quicktests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::test::quick::Op;

    /// Applies a set of operations to a tree and a set.
    /// This way we can ensure that after a random smattering of inserts
    /// and deletes we have the same values in both.
    fn do_ops(ops: &[Op<i8>], tree: &mut BinarySearchTree<i8>, set: &mut BTreeSet<i8>) {
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
        }
    }

    quickcheck::quickcheck! {
        fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
            let mut tree = BinarySearchTree::new();
            let mut set = BTreeSet::new();

            do_ops(&ops, &mut tree, &mut set);
            tree.is_search_tree() && set.iter().all(|x| tree.contains(x))
        }
    }

    quickcheck::quickcheck! {
        fn traversals_match(xs: Vec<i8>) -> bool {
            let mut tree = BinarySearchTree::new();
            for x in &xs {
                let _ = tree.insert(*x);
            }

            tree.in_order_traversal(false) == tree.in_order_traversal_iterative()
        }
    }
}
