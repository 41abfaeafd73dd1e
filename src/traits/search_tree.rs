use core::cmp::Ordering;

use num_traits::float::FloatCore;
use ordered_float::OrderedFloat;

use crate::InOrder;

/// Index of a node inside a tree's arena, valid until the tree is next mutated
pub type NodeId = usize;

/// Contract shared by the balanced search tree variants
///
/// A `SearchTree` is a multiset of floats ordered by value: for every node all
/// keys in the left subtree compare `<=` the node key and all keys in the right
/// subtree compare `>=`. Insertion routes duplicates right, but a later rotation
/// may leave an equal key on the left, so an in-order walk is non-decreasing
/// rather than strictly split. Implementors only differ in how they rebalance
/// after a structural change.
///
/// Besides mutation, the trait exposes a read-only structural view (root,
/// children, key, subtree size) so traversal and every order statistic can be
/// written once against it, see [`OrderStatistics`](crate::OrderStatistics).
pub trait SearchTree {
    /// Float type stored in the tree
    type Key: FloatCore;

    /// Inserts a value, duplicates are permitted
    ///
    /// # Examples
    ///
    /// ```
    /// # use order_stats::{AvlTree, SearchTree};
    /// let mut tree = AvlTree::new();
    /// tree.insert(2.0);
    /// tree.insert(2.0);
    /// assert_eq!(tree.len(), 2);
    /// ```
    fn insert(&mut self, value: Self::Key);

    /// Removes one occurrence of a value
    ///
    /// Removing an absent value is a no-op.
    ///
    /// # Returns
    ///
    /// * `bool` - True if an occurrence was found and removed
    ///
    /// # Examples
    ///
    /// ```
    /// # use order_stats::{RbTree, SearchTree};
    /// let mut tree: RbTree<f64> = [1.0, 5.0, 5.0].into_iter().collect();
    /// assert!(tree.remove(5.0));
    /// assert!(!tree.remove(7.0));
    /// assert_eq!(tree.iter().collect::<Vec<_>>(), vec![1.0, 5.0]);
    /// ```
    fn remove(&mut self, value: Self::Key) -> bool;

    /// Number of stored values, duplicates included
    fn len(&self) -> usize;

    /// True iff the tree has no root
    fn is_empty(&self) -> bool {
        self.root().is_none()
    }

    /// Drops every node
    fn clear(&mut self);

    /// Root node, `None` when empty
    ///
    /// A [`NodeId`] obtained from [`root`](Self::root), [`left`](Self::left)
    /// or [`right`](Self::right) is only valid until the next `insert`,
    /// `remove` or `clear`: slots are reused, so a stale id may name a
    /// different value or a freed slot.
    fn root(&self) -> Option<NodeId>;

    /// Left child of `node`
    ///
    /// # Panics
    ///
    /// Panics if `node` was never handed out by this tree. Debug builds also
    /// panic on a freed slot.
    fn left(&self, node: NodeId) -> Option<NodeId>;

    /// Right child of `node`
    ///
    /// # Panics
    ///
    /// Same conditions as [`left`](Self::left).
    fn right(&self, node: NodeId) -> Option<NodeId>;

    /// Key stored at `node`
    ///
    /// # Panics
    ///
    /// Same conditions as [`left`](Self::left).
    fn key(&self, node: NodeId) -> Self::Key;

    /// Number of values in the subtree rooted at `node`
    ///
    /// # Panics
    ///
    /// Same conditions as [`left`](Self::left).
    fn size(&self, node: NodeId) -> usize;

    /// Returns true if at least one occurrence of `value` is stored
    fn contains(&self, value: Self::Key) -> bool {
        let value = OrderedFloat(value);
        let mut current = self.root();
        while let Some(node) = current {
            current = match value.cmp(&OrderedFloat(self.key(node))) {
                Ordering::Equal => return true,
                Ordering::Less => self.left(node),
                Ordering::Greater => self.right(node),
            };
        }
        false
    }

    /// Lazy ascending traversal, a fresh one per call
    fn iter(&self) -> InOrder<'_, Self>
    where
        Self: Sized,
    {
        InOrder::new(self)
    }

    /// Lazy descending traversal, a fresh one per call
    fn iter_rev(&self) -> InOrder<'_, Self>
    where
        Self: Sized,
    {
        InOrder::new_rev(self)
    }
}
