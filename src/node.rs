//! Node storage and the read-only node view.
//!
//! Nodes live in a slab owned by a [`Tree`][crate::Tree] and refer to each other by
//! [`NodeId`]. A node's `left` and `right` links are the only owning links in the graph: a node
//! is freed exactly when a removal detaches it from its parent. The `parent` link is a plain
//! index and never keeps anything alive.

use std::collections::HashMap;
use std::fmt;

const STALE_ID: &str = "NodeId does not refer to a live node of this tree";

/// Index of a node inside the tree that created it. A `NodeId` is only meaningful for that
/// tree, and only until the node is removed (slots are reused).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The colour tag carried by every node. Only the red-black tree ever sets it; nodes of the
/// other variants stay `Unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// No colour has been assigned.
    Unset,
    /// Red node.
    Red,
    /// Black node.
    Black,
}

impl Default for Color {
    fn default() -> Self {
        Self::Unset
    }
}

impl Color {
    /// Whether this colour is `Red`.
    pub fn is_red(self) -> bool {
        self == Self::Red
    }

    /// Whether this colour is `Black`.
    pub fn is_black(self) -> bool {
        self == Self::Black
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    /// `None` only for the empty root sentinel.
    pub(crate) value: Option<T>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) color: Color,
}

impl<T> Node<T> {
    pub(crate) fn new(value: Option<T>) -> Self {
        Self {
            value,
            left: None,
            right: None,
            parent: None,
            color: Color::Unset,
        }
    }
}

/// The slab every node of a tree lives in. Freed slots are recycled through `free`.
#[derive(Debug, Clone)]
pub(crate) struct Nodes<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<usize>,
}

impl<T> Nodes<T> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn alloc(&mut self, value: Option<T>) -> NodeId {
        let node = Node::new(value);
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(node);
                NodeId(index)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Frees the slot of `id` and hands back the node that lived there. The caller must already
    /// have unlinked it from the rest of the graph.
    pub(crate) fn release(&mut self, id: NodeId) -> Node<T> {
        let node = self.slots[id.0].take().expect(STALE_ID);
        self.free.push(id.0);
        node
    }

    pub(crate) fn contains(&self, id: NodeId) -> bool {
        matches!(self.slots.get(id.0), Some(Some(_)))
    }

    /// # Panics
    ///
    /// When `id` is stale.
    pub(crate) fn get(&self, id: NodeId) -> &Node<T> {
        self.slots
            .get(id.0)
            .and_then(Option::as_ref)
            .expect(STALE_ID)
    }

    /// # Panics
    ///
    /// When `id` is stale.
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node<T> {
        self.slots
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .expect(STALE_ID)
    }

    /// Number of edges on the longest path from `id` down to a leaf. A childless node has
    /// height 0. Walks the subtree with an explicit stack so that degenerate, list shaped trees
    /// do not exhaust the call stack.
    pub(crate) fn height(&self, id: NodeId) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(id, 0)];
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            let node = self.get(id);
            stack.extend(node.left.map(|left| (left, depth + 1)));
            stack.extend(node.right.map(|right| (right, depth + 1)));
        }
        deepest
    }

    /// 0 without a left child, otherwise the left child's height plus the edge to it.
    pub(crate) fn left_height(&self, id: NodeId) -> usize {
        self.get(id).left.map_or(0, |left| self.height(left) + 1)
    }

    pub(crate) fn right_height(&self, id: NodeId) -> usize {
        self.get(id).right.map_or(0, |right| self.height(right) + 1)
    }

    /// Left height minus right height. Positive means left-heavy.
    pub(crate) fn balance_factor(&self, id: NodeId) -> isize {
        self.left_height(id) as isize - self.right_height(id) as isize
    }

    /// The sibling of `id`'s parent.
    pub(crate) fn uncle(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.get(id).parent?;
        let grandparent = self.get(self.get(parent).parent?);
        if grandparent.left == Some(parent) {
            grandparent.right
        } else {
            grandparent.left
        }
    }

    /// Colour of an optional node. Missing nodes are leaves and leaves count as black.
    pub(crate) fn color_of(&self, id: Option<NodeId>) -> Color {
        id.map_or(Color::Black, |id| self.get(id).color)
    }

    /// The rightmost node of the subtree rooted at `id`.
    pub(crate) fn max_of(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.get(id).right {
            id = right;
        }
        id
    }

    /// The leftmost node of the subtree rooted at `id`.
    pub(crate) fn min_of(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.get(id).left {
            id = left;
        }
        id
    }
}

/// A read-only view of one node and, through it, of the subtree below it and the path above
/// it. Obtained from [`Tree::root`][crate::Tree::root], [`Tree::find`][crate::Tree::find],
/// [`Tree::insert`][crate::Tree::insert] or [`Tree::get`][crate::Tree::get].
pub struct NodeRef<'a, T> {
    nodes: &'a Nodes<T>,
    id: NodeId,
}

impl<'a, T> Clone for NodeRef<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<'a, T> Copy for NodeRef<'a, T> {}

impl<'a, T> NodeRef<'a, T> {
    pub(crate) fn new(nodes: &'a Nodes<T>, id: NodeId) -> Self {
        Self { nodes, id }
    }

    fn node(&self) -> &'a Node<T> {
        self.nodes.get(self.id)
    }

    fn at(&self, id: Option<NodeId>) -> Option<Self> {
        id.map(|id| Self::new(self.nodes, id))
    }

    /// The id of this node, usable with the tree's link-editing methods.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The stored value. `None` only for the root of an empty tree.
    pub fn value(&self) -> Option<&'a T> {
        self.node().value.as_ref()
    }

    /// The left child, if any.
    pub fn left(&self) -> Option<Self> {
        self.at(self.node().left)
    }

    /// The right child, if any.
    pub fn right(&self) -> Option<Self> {
        self.at(self.node().right)
    }

    /// The parent, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        self.at(self.node().parent)
    }

    /// The sibling of this node's parent, if both a grandparent and that sibling exist.
    pub fn uncle(&self) -> Option<Self> {
        self.at(self.nodes.uncle(self.id))
    }

    /// Whether a left child exists.
    pub fn has_left(&self) -> bool {
        self.node().left.is_some()
    }

    /// Whether a right child exists.
    pub fn has_right(&self) -> bool {
        self.node().right.is_some()
    }

    /// The red-black colour tag.
    pub fn color(&self) -> Color {
        self.node().color
    }

    /// Edges on the longest downward path from this node. A childless node has height 0.
    pub fn height(&self) -> usize {
        self.nodes.height(self.id)
    }

    /// 0 without a left child, otherwise the left child's height plus one.
    pub fn left_height(&self) -> usize {
        self.nodes.left_height(self.id)
    }

    /// 0 without a right child, otherwise the right child's height plus one.
    pub fn right_height(&self) -> usize {
        self.nodes.right_height(self.id)
    }

    /// `left_height - right_height`.
    pub fn balance_factor(&self) -> isize {
        self.nodes.balance_factor(self.id)
    }

    /// Values of this subtree in ascending order (left, self, right).
    pub fn traverse_in_order(&self) -> Vec<&'a T> {
        let mut out = Vec::new();
        let mut stack = Vec::new();
        let mut current = Some(self.id);
        loop {
            while let Some(id) = current {
                stack.push(id);
                current = self.nodes.get(id).left;
            }
            let Some(id) = stack.pop() else {
                break;
            };
            let node = self.nodes.get(id);
            out.extend(node.value.as_ref());
            current = node.right;
        }
        out
    }

    /// Checks only this node: its two subtree heights differ by at most one.
    pub fn is_locally_balanced(&self) -> bool {
        self.balance_factor().abs() <= 1
    }

    /// Checks every node of this subtree, bottom up.
    pub fn is_balanced(&self) -> bool {
        let mut heights: HashMap<NodeId, usize> = HashMap::new();
        // `true` once both children have been visited.
        let mut stack = vec![(self.id, false)];
        while let Some((id, children_done)) = stack.pop() {
            let node = self.nodes.get(id);
            if !children_done {
                stack.push((id, true));
                stack.extend(node.left.map(|left| (left, false)));
                stack.extend(node.right.map(|right| (right, false)));
                continue;
            }

            let side_height = |child: Option<NodeId>| child.map_or(0, |child| heights[&child] + 1);
            let left = side_height(node.left);
            let right = side_height(node.right);
            if left.abs_diff(right) > 1 {
                return false;
            }
            heights.insert(id, left.max(right));
        }

        true
    }
}

/// Prints the whole subtree. The recursion goes as deep as the subtree is tall, so this is
/// meant for small or balanced trees.
impl<'a, T> fmt::Debug for NodeRef<'a, T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("value", &self.value())
            .field("color", &self.color())
            .field("left", &self.left())
            .field("right", &self.right())
            .finish()
    }
}
