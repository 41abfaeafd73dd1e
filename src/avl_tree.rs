use alloc::vec::Vec;
use core::cmp::Ordering;

use num_traits::float::FloatCore;
use ordered_float::OrderedFloat;

use crate::{
    NodeId, SearchTree,
    utils::{Arena, NIL},
};

/// A node of the height-balanced tree.
#[derive(Debug, Clone)]
struct Node<T> {
    /// The stored value wrapped in OrderedFloat for a total order including NaN
    key: OrderedFloat<T>,

    /// Index of the left child in the arena (nil if absent)
    left: usize,

    /// Index of the right child in the arena (nil if absent)
    right: usize,

    /// Height of the subtree rooted here, a leaf has height 1
    height: u32,

    /// Number of values in the subtree rooted here
    size: usize,
}

impl<T> Node<T> {
    const fn leaf(key: OrderedFloat<T>) -> Self {
        Self {
            key,
            left: NIL,
            right: NIL,
            height: 1,
            size: 1,
        }
    }
}

/// One ancestor on the descent path: the node and whether the descent went left
type Step = (usize, bool);

/// A height-balanced (AVL) search tree over a multiset of floats.
///
/// Keeps `|height(left) - height(right)| <= 1` at every node. Descent is
/// iterative: the ancestors of the touched position are collected on a path
/// stack and rebalanced bottom-up, so no operation recurses on tree depth.
///
/// Insertion selects the rotation case by comparing the inserted key with the
/// heavy child's key and needs at most one single or double rotation. Deletion
/// selects the case from the heavy child's own balance factor and may rotate
/// at every ancestor up to the root.
#[derive(Debug, Clone)]
pub struct AvlTree<T> {
    /// Node storage, links are arena indices
    nodes: Arena<Node<T>>,

    /// Index of the root node, nil when empty
    root: usize,
}

impl<T: FloatCore> AvlTree<T> {
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

    /// Height of the tree, 0 when empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use order_stats::{AvlTree, SearchTree};
    /// let tree: AvlTree<f64> = [10.0, 20.0, 30.0, 40.0, 50.0].into_iter().collect();
    /// assert_eq!(tree.height(), 3);
    /// ```
    pub fn height(&self) -> u32 {
        self.height_of(self.root)
    }

    /// Checks ordering, balance, height and size bookkeeping of every node
    ///
    /// # Returns
    ///
    /// * `bool` - True if every invariant holds
    pub fn verify_invariants(&self) -> bool {
        self.verify_subtree(self.root, None, None)
            .is_some_and(|(_, size)| size == self.nodes.len())
    }

    #[inline]
    fn node_at(&self, idx: usize) -> &Node<T> {
        self.nodes.get(idx)
    }

    #[inline]
    fn node_at_mut(&mut self, idx: usize) -> &mut Node<T> {
        self.nodes.get_mut(idx)
    }

    #[inline]
    fn height_of(&self, idx: usize) -> u32 {
        if idx == NIL {
            0
        } else {
            self.node_at(idx).height
        }
    }

    #[inline]
    fn size_of(&self, idx: usize) -> usize {
        if idx == NIL {
            0
        } else {
            self.node_at(idx).size
        }
    }

    fn balance_factor(&self, idx: usize) -> i64 {
        let node = self.node_at(idx);
        i64::from(self.height_of(node.left)) - i64::from(self.height_of(node.right))
    }

    fn recalculate(&mut self, idx: usize) {
        let node = self.node_at(idx);
        let (left, right) = (node.left, node.right);
        let height = 1 + self.height_of(left).max(self.height_of(right));
        let size = 1 + self.size_of(left) + self.size_of(right);

        let node = self.node_at_mut(idx);
        node.height = height;
        node.size = size;
    }

    /// Rotates `y` right and returns the new subtree root
    fn rotate_right(&mut self, y: usize) -> usize {
        let x = self.node_at(y).left;
        debug_assert!(x != NIL, "right rotation without a left child");

        let x_right = self.node_at(x).right;
        self.node_at_mut(y).left = x_right;
        self.node_at_mut(x).right = y;

        self.recalculate(y);
        self.recalculate(x);
        x
    }

    /// Rotates `x` left and returns the new subtree root
    fn rotate_left(&mut self, x: usize) -> usize {
        let y = self.node_at(x).right;
        debug_assert!(y != NIL, "left rotation without a right child");

        let y_left = self.node_at(y).left;
        self.node_at_mut(x).right = y_left;
        self.node_at_mut(y).left = x;

        self.recalculate(x);
        self.recalculate(y);
        y
    }

    /// Restores balance at `node` after `key` was inserted below it
    fn rebalance_after_insert(&mut self, node: usize, key: OrderedFloat<T>) -> usize {
        self.recalculate(node);
        let balance = self.balance_factor(node);

        if balance > 1 {
            let left = self.node_at(node).left;
            if key >= self.node_at(left).key {
                let rotated = self.rotate_left(left);
                self.node_at_mut(node).left = rotated;
            }
            return self.rotate_right(node);
        }

        if balance < -1 {
            let right = self.node_at(node).right;
            if key < self.node_at(right).key {
                let rotated = self.rotate_right(right);
                self.node_at_mut(node).right = rotated;
            }
            return self.rotate_left(node);
        }

        node
    }

    /// Restores balance at `node` after a removal below it
    fn rebalance(&mut self, node: usize) -> usize {
        self.recalculate(node);
        let balance = self.balance_factor(node);

        if balance > 1 {
            let left = self.node_at(node).left;
            if self.balance_factor(left) < 0 {
                let rotated = self.rotate_left(left);
                self.node_at_mut(node).left = rotated;
            }
            return self.rotate_right(node);
        }

        if balance < -1 {
            let right = self.node_at(node).right;
            if self.balance_factor(right) > 0 {
                let rotated = self.rotate_right(right);
                self.node_at_mut(node).right = rotated;
            }
            return self.rotate_left(node);
        }

        node
    }

    /// Points the slot below `path[..depth]` at `subtree`
    fn relink(&mut self, path: &[Step], depth: usize, subtree: usize) {
        match depth.checked_sub(1).map(|i| path[i]) {
            None => self.root = subtree,
            Some((parent, true)) => self.node_at_mut(parent).left = subtree,
            Some((parent, false)) => self.node_at_mut(parent).right = subtree,
        }
    }

    /// Rebalances every ancestor on `path`, deepest first
    fn unwind(&mut self, path: &[Step], inserted: Option<OrderedFloat<T>>) {
        for depth in (0..path.len()).rev() {
            let (node, _) = path[depth];
            let subtree = match inserted {
                Some(key) => self.rebalance_after_insert(node, key),
                None => self.rebalance(node),
            };
            if subtree != node {
                self.relink(path, depth, subtree);
            }
        }
    }

    fn verify_subtree(
        &self,
        idx: usize,
        lower: Option<OrderedFloat<T>>,
        upper: Option<OrderedFloat<T>>,
    ) -> Option<(u32, usize)> {
        if idx == NIL {
            return Some((0, 0));
        }

        let node = self.node_at(idx);
        if lower.is_some_and(|lo| node.key < lo) || upper.is_some_and(|hi| node.key > hi) {
            return None;
        }

        let (left_height, left_size) = self.verify_subtree(node.left, lower, Some(node.key))?;
        let (right_height, right_size) = self.verify_subtree(node.right, Some(node.key), upper)?;

        if left_height.abs_diff(right_height) > 1 {
            return None;
        }

        let height = 1 + left_height.max(right_height);
        let size = 1 + left_size + right_size;
        (node.height == height && node.size == size).then_some((height, size))
    }
}

impl<T: FloatCore> SearchTree for AvlTree<T> {
    type Key = T;

    fn insert(&mut self, value: T) {
        let key = OrderedFloat(value);
        let mut path = Vec::new();
        let mut current = self.root;

        while current != NIL {
            let node = self.node_at(current);
            let go_left = key < node.key;
            path.push((current, go_left));
            current = if go_left { node.left } else { node.right };
        }

        let new_idx = self.nodes.allocate(Node::leaf(key));
        self.relink(&path, path.len(), new_idx);
        self.unwind(&path, Some(key));

        #[cfg(debug_assertions)]
        debug_assert!(
            self.verify_invariants(),
            "AVL tree invariants violated after insertion"
        );
    }

    fn remove(&mut self, value: T) -> bool {
        let key = OrderedFloat(value);
        let mut path = Vec::new();
        let mut current = self.root;

        let target = loop {
            if current == NIL {
                return false;
            }
            let node = self.node_at(current);
            match key.cmp(&node.key) {
                Ordering::Equal => break current,
                Ordering::Less => {
                    path.push((current, true));
                    current = node.left;
                }
                Ordering::Greater => {
                    path.push((current, false));
                    current = node.right;
                }
            }
        };

        let (left, right) = (self.node_at(target).left, self.node_at(target).right);
        if left != NIL && right != NIL {
            // Pull the in-order successor's key up and splice the successor out
            path.push((target, false));
            let mut successor = right;
            loop {
                let next = self.node_at(successor).left;
                if next == NIL {
                    break;
                }
                path.push((successor, true));
                successor = next;
            }

            let successor_key = self.node_at(successor).key;
            let successor_right = self.node_at(successor).right;
            self.node_at_mut(target).key = successor_key;
            self.relink(&path, path.len(), successor_right);
            self.nodes.deallocate(successor);
        } else {
            let child = if left != NIL { left } else { right };
            self.relink(&path, path.len(), child);
            self.nodes.deallocate(target);
        }

        self.unwind(&path, None);

        #[cfg(debug_assertions)]
        debug_assert!(
            self.verify_invariants(),
            "AVL tree invariants violated after removal"
        );

        true
    }

    #[inline]
    fn len(&self) -> usize {
        self.size_of(self.root)
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
        self.node_at(node).key.into_inner()
    }

    #[inline]
    fn size(&self, node: NodeId) -> usize {
        self.node_at(node).size
    }
}

impl<T: FloatCore> Default for AvlTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FloatCore> Extend<T> for AvlTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: FloatCore> FromIterator<T> for AvlTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}
