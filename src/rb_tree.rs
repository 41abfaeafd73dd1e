use core::cmp::Ordering;

use num_traits::float::FloatCore;
use ordered_float::OrderedFloat;

use crate::{
    NodeId, SearchTree,
    utils::{Arena, NIL},
};

/// Node color. A red node never has a red child and every root-to-leaf path
/// crosses the same number of black nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Color {
    Red,
    /// Counted by the black height
    Black,
}

/// One stored value of the color-balanced tree.
///
/// Every duplicate is its own node. Children and parent are arena indices, the
/// `NIL` index is the black sentinel for every external leaf position.
#[derive(Debug, Clone)]
struct Node<T> {
    /// Stored value, totally ordered so NaN cannot break the search order
    value: OrderedFloat<T>,

    /// Index of parent node in the arena (nil if this is root)
    parent: usize,

    /// Index of left child node in the arena (nil if no left child)
    left: usize,

    /// Index of right child node in the arena (nil if no right child)
    right: usize,

    color: Color,

    /// Total count of elements in this node's subtree
    /// Used for order statistic selection
    subtree_count: usize,
}

/// A color-balanced (Red-Black) search tree over a multiset of floats.
///
/// Insertion colors the new node red and repairs red-red violations by
/// recoloring or rotating around the uncle. Deletion splices out the node or
/// its in-order successor and, when a black node left the tree, runs the
/// double-black fix-up so that black height stays uniform after every
/// operation.
///
/// Parent links are plain arena indices used for fix-up bookkeeping only,
/// the arena owns every node.
#[derive(Debug, Clone)]
pub struct RbTree<T> {
    /// Node storage, links are arena indices
    nodes: Arena<Node<T>>,

    /// Index of the root node, nil when empty
    root: usize,
}

impl<T: FloatCore> RbTree<T> {
    /// Creates an empty tree
    pub const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: NIL,
        }
    }

    /// Creates an empty tree with room for `capacity` nodes before reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: NIL,
        }
    }

    /// Number of nodes the arena holds before reallocating
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Number of black nodes on any path from the root to a leaf position,
    /// counting the sentinel
    ///
    /// # Returns
    ///
    /// * `Option<usize>` - The black height, or `None` if it is not uniform
    pub fn black_height(&self) -> Option<usize> {
        self.verify_black_height(self.root)
    }

    /// Checks ordering, colors, black height, parent links and subtree counts
    ///
    /// # Returns
    ///
    /// * `bool` - True if every invariant holds
    pub fn verify_invariants(&self) -> bool {
        if self.root == NIL {
            return true;
        }

        self.is_black(self.root)
            && self.get_parent(self.root) == NIL
            && self.verify_black_height(self.root).is_some()
            && self
                .verify_structure(self.root, None, None)
                .is_some_and(|count| count == self.nodes.len())
    }

    #[inline]
    fn node_at(&self, idx: usize) -> &Node<T> {
        self.nodes.get(idx)
    }

    #[inline]
    fn node_at_mut(&mut self, idx: usize) -> &mut Node<T> {
        self.nodes.get_mut(idx)
    }

    fn create_node(&mut self, value: OrderedFloat<T>, parent: usize) -> usize {
        self.nodes.allocate(Node {
            value,
            parent,
            left: NIL,
            right: NIL,
            color: Color::Red,
            subtree_count: 1,
        })
    }

    fn link_to_parent(&mut self, node_idx: usize, parent_idx: usize, value: OrderedFloat<T>) {
        if parent_idx == NIL {
            self.root = node_idx;
        } else if value < self.node_at(parent_idx).value {
            self.node_at_mut(parent_idx).left = node_idx;
        } else {
            self.node_at_mut(parent_idx).right = node_idx;
        }
    }

    fn find_node(&self, value: OrderedFloat<T>) -> Option<usize> {
        let mut current = self.root;

        while current != NIL {
            let node = self.node_at(current);
            match value.cmp(&node.value) {
                Ordering::Equal => return Some(current),
                Ordering::Less => current = node.left,
                Ordering::Greater => current = node.right,
            }
        }
        None
    }

    /// Ties descend right, so a duplicate lands after its equals in order
    fn find_insertion_parent(&self, value: OrderedFloat<T>) -> usize {
        let mut current = self.root;
        let mut parent = NIL;

        while current != NIL {
            parent = current;
            let node = self.node_at(current);
            current = if value < node.value {
                node.left
            } else {
                node.right
            };
        }
        parent
    }

    fn find_minimum(&self, mut node: usize) -> usize {
        while node != NIL {
            let left = self.node_at(node).left;
            if left == NIL {
                break;
            }
            node = left;
        }
        node
    }

    fn update_subtree_counts_to_root(&mut self, mut node: usize) {
        while node != NIL {
            self.recalculate_subtree_count(node);
            node = self.node_at(node).parent;
        }
    }

    fn recalculate_subtree_count(&mut self, node_idx: usize) {
        if node_idx == NIL {
            return;
        }

        let node = self.node_at(node_idx);
        let total = 1 + self.get_subtree_count(node.left) + self.get_subtree_count(node.right);
        self.node_at_mut(node_idx).subtree_count = total;
    }

    #[inline]
    fn get_subtree_count(&self, node_idx: usize) -> usize {
        if node_idx == NIL {
            0
        } else {
            self.node_at(node_idx).subtree_count
        }
    }

    #[inline]
    fn get_color(&self, node_idx: usize) -> Color {
        if node_idx == NIL {
            Color::Black
        } else {
            self.node_at(node_idx).color
        }
    }

    #[inline]
    fn set_color(&mut self, node_idx: usize, color: Color) {
        if node_idx != NIL {
            self.node_at_mut(node_idx).color = color;
        }
    }

    #[inline]
    fn is_red(&self, node_idx: usize) -> bool {
        self.get_color(node_idx) == Color::Red
    }

    #[inline]
    fn is_black(&self, node_idx: usize) -> bool {
        self.get_color(node_idx) == Color::Black
    }

    #[inline]
    fn get_parent(&self, node: usize) -> usize {
        if node == NIL {
            NIL
        } else {
            self.node_at(node).parent
        }
    }

    #[inline]
    fn get_left(&self, node: usize) -> usize {
        if node == NIL {
            NIL
        } else {
            self.node_at(node).left
        }
    }

    #[inline]
    fn get_right(&self, node: usize) -> usize {
        if node == NIL {
            NIL
        } else {
            self.node_at(node).right
        }
    }

    fn rotate_left(&mut self, x: usize) {
        if x == NIL {
            return;
        }

        let y = self.node_at(x).right;
        if y == NIL {
            return;
        }

        let y_left = self.node_at(y).left;
        self.node_at_mut(x).right = y_left;
        if y_left != NIL {
            self.node_at_mut(y_left).parent = x;
        }

        let x_parent = self.node_at(x).parent;
        self.node_at_mut(y).parent = x_parent;

        if x_parent == NIL {
            self.root = y;
        } else if x == self.node_at(x_parent).left {
            self.node_at_mut(x_parent).left = y;
        } else {
            self.node_at_mut(x_parent).right = y;
        }

        self.node_at_mut(y).left = x;
        self.node_at_mut(x).parent = y;

        self.recalculate_subtree_count(x);
        self.recalculate_subtree_count(y);
    }

    fn rotate_right(&mut self, y: usize) {
        if y == NIL {
            return;
        }

        let x = self.node_at(y).left;
        if x == NIL {
            return;
        }

        let x_right = self.node_at(x).right;
        self.node_at_mut(y).left = x_right;
        if x_right != NIL {
            self.node_at_mut(x_right).parent = y;
        }

        let y_parent = self.node_at(y).parent;
        self.node_at_mut(x).parent = y_parent;

        if y_parent == NIL {
            self.root = x;
        } else if y == self.node_at(y_parent).left {
            self.node_at_mut(y_parent).left = x;
        } else {
            self.node_at_mut(y_parent).right = x;
        }

        self.node_at_mut(x).right = y;
        self.node_at_mut(y).parent = x;

        self.recalculate_subtree_count(y);
        self.recalculate_subtree_count(x);
    }

    fn fix_insertion_violations(&mut self, mut node: usize) {
        while node != self.root && self.is_red(self.get_parent(node)) {
            let parent = self.get_parent(node);
            let grandparent = self.get_parent(parent);

            if parent == self.get_left(grandparent) {
                let uncle = self.get_right(grandparent);

                if self.is_red(uncle) {
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    node = grandparent;
                } else {
                    if node == self.get_right(parent) {
                        node = parent;
                        self.rotate_left(node);
                    }
                    let updated_parent = self.get_parent(node);
                    let updated_grandparent = self.get_parent(updated_parent);
                    self.set_color(updated_parent, Color::Black);
                    self.set_color(updated_grandparent, Color::Red);
                    self.rotate_right(updated_grandparent);
                }
            } else {
                let uncle = self.get_left(grandparent);

                if self.is_red(uncle) {
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    node = grandparent;
                } else {
                    if node == self.get_left(parent) {
                        node = parent;
                        self.rotate_right(node);
                    }
                    let updated_parent = self.get_parent(node);
                    let updated_grandparent = self.get_parent(updated_parent);
                    self.set_color(updated_parent, Color::Black);
                    self.set_color(updated_grandparent, Color::Red);
                    self.rotate_left(updated_grandparent);
                }
            }
        }
        self.set_color(self.root, Color::Black);
    }

    fn delete_node(&mut self, node: usize) {
        let (removed_color, fixup_node, fixup_parent) = self.perform_deletion(node);

        // Counts first: the fix-up rotations recompute from correct children
        self.update_subtree_counts_to_root(fixup_parent);

        if removed_color == Color::Black {
            self.fix_deletion_violations(fixup_node, fixup_parent);
        }

        self.nodes.deallocate(node);
    }

    /// Unlinks `node` and returns the color that left the tree, the node that
    /// took its place and that node's parent (tracked separately because the
    /// sentinel has no parent slot)
    fn perform_deletion(&mut self, node: usize) -> (Color, usize, usize) {
        let original_color = self.get_color(node);
        let left = self.node_at(node).left;
        let right = self.node_at(node).right;

        if left == NIL {
            let parent = self.node_at(node).parent;
            self.transplant(node, right);
            return (original_color, right, parent);
        }

        if right == NIL {
            let parent = self.node_at(node).parent;
            self.transplant(node, left);
            return (original_color, left, parent);
        }

        let successor = self.find_minimum(right);
        let successor_color = self.get_color(successor);
        let fixup_node = self.node_at(successor).right;

        let fixup_parent = if self.node_at(successor).parent == node {
            successor
        } else {
            let successor_parent = self.node_at(successor).parent;
            self.transplant(successor, fixup_node);
            self.node_at_mut(successor).right = right;
            self.node_at_mut(right).parent = successor;
            successor_parent
        };

        self.transplant(node, successor);
        self.node_at_mut(successor).left = left;
        self.node_at_mut(left).parent = successor;
        self.node_at_mut(successor).color = original_color;

        (successor_color, fixup_node, fixup_parent)
    }

    fn transplant(&mut self, old_node: usize, new_node: usize) {
        let parent = self.node_at(old_node).parent;

        if parent == NIL {
            self.root = new_node;
        } else if old_node == self.node_at(parent).left {
            self.node_at_mut(parent).left = new_node;
        } else {
            self.node_at_mut(parent).right = new_node;
        }

        if new_node != NIL {
            self.node_at_mut(new_node).parent = parent;
        }
    }

    /// Pushes the extra black carried by `fixup_node` up the tree until it can
    /// be absorbed by a red node, a rotation, or the root
    fn fix_deletion_violations(&mut self, mut fixup_node: usize, mut fixup_parent: usize) {
        while fixup_node != self.root && self.is_black(fixup_node) {
            if fixup_parent == NIL {
                break;
            }

            // The sibling of a double-black position is never the sentinel, so
            // a nil `fixup_node` is the left child exactly when the left slot is nil.
            if fixup_node == self.get_left(fixup_parent) {
                let mut sibling = self.get_right(fixup_parent);

                if self.is_red(sibling) {
                    self.set_color(sibling, Color::Black);
                    self.set_color(fixup_parent, Color::Red);
                    self.rotate_left(fixup_parent);
                    sibling = self.get_right(fixup_parent);
                }

                if self.is_black(self.get_left(sibling)) && self.is_black(self.get_right(sibling)) {
                    self.set_color(sibling, Color::Red);
                    fixup_node = fixup_parent;
                    fixup_parent = self.get_parent(fixup_node);
                } else {
                    if self.is_black(self.get_right(sibling)) {
                        self.set_color(self.get_left(sibling), Color::Black);
                        self.set_color(sibling, Color::Red);
                        self.rotate_right(sibling);
                        sibling = self.get_right(fixup_parent);
                    }

                    self.set_color(sibling, self.get_color(fixup_parent));
                    self.set_color(fixup_parent, Color::Black);
                    self.set_color(self.get_right(sibling), Color::Black);
                    self.rotate_left(fixup_parent);
                    fixup_node = self.root;
                    fixup_parent = NIL;
                }
            } else {
                let mut sibling = self.get_left(fixup_parent);

                if self.is_red(sibling) {
                    self.set_color(sibling, Color::Black);
                    self.set_color(fixup_parent, Color::Red);
                    self.rotate_right(fixup_parent);
                    sibling = self.get_left(fixup_parent);
                }

                if self.is_black(self.get_right(sibling)) && self.is_black(self.get_left(sibling)) {
                    self.set_color(sibling, Color::Red);
                    fixup_node = fixup_parent;
                    fixup_parent = self.get_parent(fixup_node);
                } else {
                    if self.is_black(self.get_left(sibling)) {
                        self.set_color(self.get_right(sibling), Color::Black);
                        self.set_color(sibling, Color::Red);
                        self.rotate_left(sibling);
                        sibling = self.get_left(fixup_parent);
                    }

                    self.set_color(sibling, self.get_color(fixup_parent));
                    self.set_color(fixup_parent, Color::Black);
                    self.set_color(self.get_left(sibling), Color::Black);
                    self.rotate_right(fixup_parent);
                    fixup_node = self.root;
                    fixup_parent = NIL;
                }
            }
        }

        self.set_color(fixup_node, Color::Black);
    }

    fn verify_black_height(&self, node: usize) -> Option<usize> {
        if node == NIL {
            return Some(1);
        }

        let node_ref = self.node_at(node);

        if self.is_red(node) && (self.is_red(node_ref.left) || self.is_red(node_ref.right)) {
            return None;
        }

        let left_height = self.verify_black_height(node_ref.left)?;
        let right_height = self.verify_black_height(node_ref.right)?;

        if left_height != right_height {
            return None;
        }

        if self.is_black(node) {
            Some(left_height + 1)
        } else {
            Some(left_height)
        }
    }

    /// Returns the subtree count if ordering, parent links and counts hold
    fn verify_structure(
        &self,
        node: usize,
        lower: Option<OrderedFloat<T>>,
        upper: Option<OrderedFloat<T>>,
    ) -> Option<usize> {
        if node == NIL {
            return Some(0);
        }

        let node_ref = self.node_at(node);
        if lower.is_some_and(|lo| node_ref.value < lo) || upper.is_some_and(|hi| node_ref.value > hi) {
            return None;
        }

        for child in [node_ref.left, node_ref.right] {
            if child != NIL && self.node_at(child).parent != node {
                return None;
            }
        }

        let left_count = self.verify_structure(node_ref.left, lower, Some(node_ref.value))?;
        let right_count = self.verify_structure(node_ref.right, Some(node_ref.value), upper)?;
        let count = 1 + left_count + right_count;

        (node_ref.subtree_count == count).then_some(count)
    }
}

impl<T: FloatCore> SearchTree for RbTree<T> {
    type Key = T;

    fn insert(&mut self, value: T) {
        let ordered_value = OrderedFloat(value);

        let parent_idx = self.find_insertion_parent(ordered_value);
        let new_idx = self.create_node(ordered_value, parent_idx);
        self.link_to_parent(new_idx, parent_idx, ordered_value);

        self.update_subtree_counts_to_root(parent_idx);
        self.fix_insertion_violations(new_idx);

        #[cfg(debug_assertions)]
        debug_assert!(
            self.verify_invariants(),
            "RB tree invariants violated after insertion"
        );
    }

    fn remove(&mut self, value: T) -> bool {
        let Some(node_idx) = self.find_node(OrderedFloat(value)) else {
            return false;
        };

        self.delete_node(node_idx);

        #[cfg(debug_assertions)]
        debug_assert!(
            self.verify_invariants(),
            "RB tree invariants violated after removal"
        );

        true
    }

    #[inline]
    fn len(&self) -> usize {
        self.get_subtree_count(self.root)
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.root = NIL;
    }

    #[inline]
    fn root(&self) -> Option<NodeId> {
        (self.root != NIL).then_some(self.root)
    }

    #[inline]
    fn left(&self, node: NodeId) -> Option<NodeId> {
        let left = self.node_at(node).left;
        (left != NIL).then_some(left)
    }

    #[inline]
    fn right(&self, node: NodeId) -> Option<NodeId> {
        let right = self.node_at(node).right;
        (right != NIL).then_some(right)
    }

    #[inline]
    fn key(&self, node: NodeId) -> T {
        self.node_at(node).value.into_inner()
    }

    #[inline]
    fn size(&self, node: NodeId) -> usize {
        self.node_at(node).subtree_count
    }
}

impl<T: FloatCore> Default for RbTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FloatCore> Extend<T> for RbTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: FloatCore> FromIterator<T> for RbTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}
