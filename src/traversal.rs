use alloc::vec::Vec;

use crate::{NodeId, SearchTree};

/// Lazy in-order traversal over any [`SearchTree`]
///
/// Walks with an explicit stack of pending ancestors instead of recursion, so
/// memory use is bounded by the tree height. Ascending by default, descending
/// when built with [`InOrder::new_rev`].
#[derive(Debug, Clone)]
pub struct InOrder<'a, S> {
    /// Tree being walked
    tree: &'a S,
    /// Ancestors whose key has not been yielded yet
    stack: Vec<NodeId>,
    /// Walk right-to-left
    reverse: bool,
    /// Values not yielded yet
    remaining: usize,
}

impl<'a, S: SearchTree> InOrder<'a, S> {
    /// Creates an ascending traversal
    pub fn new(tree: &'a S) -> Self {
        Self::start(tree, false)
    }

    /// Creates a descending traversal
    pub fn new_rev(tree: &'a S) -> Self {
        Self::start(tree, true)
    }

    fn start(tree: &'a S, reverse: bool) -> Self {
        let mut iter = Self {
            tree,
            stack: Vec::new(),
            reverse,
            remaining: tree.len(),
        };
        iter.push_spine(tree.root());
        iter
    }

    /// Pushes `node` and its chain of leading children
    fn push_spine(&mut self, mut node: Option<NodeId>) {
        while let Some(idx) = node {
            self.stack.push(idx);
            node = if self.reverse {
                self.tree.right(idx)
            } else {
                self.tree.left(idx)
            };
        }
    }
}

impl<S: SearchTree> Iterator for InOrder<'_, S> {
    type Item = S::Key;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let trailing = if self.reverse {
            self.tree.left(node)
        } else {
            self.tree.right(node)
        };
        self.push_spine(trailing);
        self.remaining = self.remaining.saturating_sub(1);
        Some(self.tree.key(node))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<S: SearchTree> ExactSizeIterator for InOrder<'_, S> {}

#[cfg(test)]
mod tests {
    use crate::{AvlTree, RbTree, SearchTree};

    #[test]
    fn test_empty_traversal() {
        let tree = AvlTree::<f64>::new();
        assert_eq!(tree.iter().next(), None);
        assert_eq!(tree.iter_rev().len(), 0);
    }

    #[test]
    fn test_ascending_and_descending() {
        let tree: RbTree<f64> = [15.0, 10.0, 20.0, 10.0, 30.0, 5.0].into_iter().collect();

        let asc: Vec<_> = tree.iter().collect();
        assert_eq!(asc, vec![5.0, 10.0, 10.0, 15.0, 20.0, 30.0]);

        let desc: Vec<_> = tree.iter_rev().collect();
        assert_eq!(desc, vec![30.0, 20.0, 15.0, 10.0, 10.0, 5.0]);
    }

    #[test]
    fn test_traversal_is_restartable() {
        let tree: AvlTree<f64> = (0..10).map(|i| i as f64).collect();

        let mut first = tree.iter();
        assert_eq!(first.next(), Some(0.0));
        assert_eq!(first.len(), 9);

        let second: Vec<_> = tree.iter().take(3).collect();
        assert_eq!(second, vec![0.0, 1.0, 2.0]);
        assert_eq!(first.next(), Some(1.0));
    }

    #[test]
    fn test_exact_size() {
        let tree: AvlTree<f64> = (0..100).map(|i| (i % 7) as f64).collect();
        let iter = tree.iter();
        assert_eq!(iter.size_hint(), (100, Some(100)));
        assert_eq!(iter.count(), 100);
    }
}
