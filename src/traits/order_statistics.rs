use alloc::vec::Vec;
use core::cmp::Ordering;

use num_traits::{Zero, float::FloatCore};
use ordered_float::OrderedFloat;

use crate::{SearchTree, helper::midpoint};

/// Order statistics over a multiset of floats
///
/// Implemented once for every [`SearchTree`] on top of its structural view,
/// and separately by the comparison baselines, which must return identical
/// results. All methods are pure reads.
pub trait OrderStatistics {
    /// Float type the statistics are computed over
    type Value: FloatCore;

    /// Returns the k-th smallest value (0-based)
    ///
    /// # Returns
    ///
    /// * `Option<Self::Value>` - The value, or `None` if `k` is out of range
    ///
    /// # Examples
    ///
    /// ```
    /// # use order_stats::{AvlTree, OrderStatistics};
    /// let tree: AvlTree<f64> = [9.0, 3.0, 6.0].into_iter().collect();
    /// assert_eq!(tree.select(0), Some(3.0));
    /// assert_eq!(tree.select(2), Some(9.0));
    /// assert_eq!(tree.select(3), None);
    /// ```
    fn select(&self, k: usize) -> Option<Self::Value>;

    /// Returns the median of the stored values
    ///
    /// Middle element for an odd count, average of the two middle elements for
    /// an even count.
    ///
    /// # Returns
    ///
    /// * `Self::Value` - The median, or zero if nothing is stored
    ///
    /// # Examples
    ///
    /// ```
    /// # use order_stats::{RbTree, OrderStatistics};
    /// let tree: RbTree<f64> = [15.0, 10.0, 20.0, 10.0, 30.0, 5.0].into_iter().collect();
    /// assert_eq!(tree.median(), 12.5);
    ///
    /// let empty = RbTree::<f64>::new();
    /// assert_eq!(empty.median(), 0.0);
    /// ```
    fn median(&self) -> Self::Value;

    /// Returns up to `n` smallest values in ascending order
    ///
    /// # Examples
    ///
    /// ```
    /// # use order_stats::{AvlTree, OrderStatistics};
    /// let tree: AvlTree<f64> = [4.0, 1.0, 3.0, 1.0].into_iter().collect();
    /// assert_eq!(tree.k_smallest(3), vec![1.0, 1.0, 3.0]);
    /// assert_eq!(tree.k_smallest(10).len(), 4);
    /// ```
    fn k_smallest(&self, n: usize) -> Vec<Self::Value>;

    /// Returns up to `n` largest values, largest first
    ///
    /// # Examples
    ///
    /// ```
    /// # use order_stats::{AvlTree, OrderStatistics};
    /// let tree: AvlTree<f64> = [4.0, 1.0, 3.0, 1.0].into_iter().collect();
    /// assert_eq!(tree.k_largest(2), vec![4.0, 3.0]);
    /// ```
    fn k_largest(&self, n: usize) -> Vec<Self::Value>;

    /// Returns every stored value in `[low, high]`, ascending
    ///
    /// # Examples
    ///
    /// ```
    /// # use order_stats::{RbTree, OrderStatistics};
    /// let tree: RbTree<f64> = [15.0, 10.0, 20.0, 10.0, 30.0, 5.0].into_iter().collect();
    /// assert_eq!(tree.range_query(10.0, 25.0), vec![10.0, 10.0, 15.0, 20.0]);
    /// ```
    fn range_query(&self, low: Self::Value, high: Self::Value) -> Vec<Self::Value>;

    /// Returns every stored value, ascending
    fn sorted(&self) -> Vec<Self::Value>;

    /// Smallest stored value
    fn min(&self) -> Option<Self::Value> {
        self.select(0)
    }

    /// Largest stored value
    fn max(&self) -> Option<Self::Value> {
        self.k_largest(1).pop()
    }
}

impl<S: SearchTree> OrderStatistics for S {
    type Value = S::Key;

    fn select(&self, k: usize) -> Option<Self::Value> {
        let mut current = self.root();
        let mut rank = k;

        while let Some(node) = current {
            let left = self.left(node);
            let left_size = left.map_or(0, |l| self.size(l));

            match rank.cmp(&left_size) {
                Ordering::Less => current = left,
                Ordering::Equal => return Some(self.key(node)),
                Ordering::Greater => {
                    rank -= left_size + 1;
                    current = self.right(node);
                }
            }
        }
        None
    }

    fn median(&self) -> Self::Value {
        let len = self.len();
        if len == 0 {
            return Self::Value::zero();
        }

        let mid = len / 2;
        let upper = self.select(mid);
        let median = if len % 2 == 0 {
            self.select(mid - 1).zip(upper).map(|(l, u)| midpoint(l, u))
        } else {
            upper
        };

        debug_assert!(median.is_some(), "subtree sizes disagree with len");
        median.unwrap_or_else(Self::Value::zero)
    }

    fn k_smallest(&self, n: usize) -> Vec<Self::Value> {
        self.iter().take(n).collect()
    }

    fn k_largest(&self, n: usize) -> Vec<Self::Value> {
        self.iter_rev().take(n).collect()
    }

    fn range_query(&self, low: Self::Value, high: Self::Value) -> Vec<Self::Value> {
        let (low, high) = (OrderedFloat(low), OrderedFloat(high));
        let mut out = Vec::new();
        let mut stack = Vec::new();
        let mut current = self.root();

        // Rotations can leave an equal key on either side, so both bounds
        // prune inclusively: left only when `low <= key`, right only when `key <= high`.
        loop {
            while let Some(node) = current {
                stack.push(node);
                current = if low <= OrderedFloat(self.key(node)) {
                    self.left(node)
                } else {
                    None
                };
            }

            let Some(node) = stack.pop() else {
                break;
            };

            let key = OrderedFloat(self.key(node));
            if low <= key && key <= high {
                out.push(key.into_inner());
            }
            current = if key <= high { self.right(node) } else { None };
        }
        out
    }

    fn sorted(&self) -> Vec<Self::Value> {
        self.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::OrderStatistics;
    use crate::{AvlTree, MinHeap, RbTree, SearchTree, UnsortedArray};

    use assert_approx_eq::assert_approx_eq;
    use ordered_float::OrderedFloat;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const RNG_SEED: u64 = 0x5EED_2026;

    /// Mutation surface shared by the trees and the baselines
    trait Multiset: OrderStatistics<Value = f64> + Default {
        fn put(&mut self, value: f64);
        fn take(&mut self, value: f64) -> bool;
        fn count(&self) -> usize;
        fn verify(&self) -> bool {
            true
        }
    }

    impl Multiset for AvlTree<f64> {
        fn put(&mut self, value: f64) {
            self.insert(value);
        }
        fn take(&mut self, value: f64) -> bool {
            self.remove(value)
        }
        fn count(&self) -> usize {
            self.len()
        }
        fn verify(&self) -> bool {
            self.verify_invariants()
        }
    }

    impl Multiset for RbTree<f64> {
        fn put(&mut self, value: f64) {
            self.insert(value);
        }
        fn take(&mut self, value: f64) -> bool {
            self.remove(value)
        }
        fn count(&self) -> usize {
            self.len()
        }
        fn verify(&self) -> bool {
            self.verify_invariants()
        }
    }

    impl Multiset for UnsortedArray<f64> {
        fn put(&mut self, value: f64) {
            self.insert(value);
        }
        fn take(&mut self, value: f64) -> bool {
            self.remove(value)
        }
        fn count(&self) -> usize {
            self.len()
        }
    }

    impl Multiset for MinHeap<f64> {
        fn put(&mut self, value: f64) {
            self.insert(value);
        }
        fn take(&mut self, value: f64) -> bool {
            self.remove(value)
        }
        fn count(&self) -> usize {
            self.len()
        }
        fn verify(&self) -> bool {
            self.verify_heap()
        }
    }

    fn oracle_median(sorted: &[f64]) -> f64 {
        let n = sorted.len();
        if n == 0 {
            0.0
        } else if n % 2 == 1 {
            sorted[n / 2]
        } else {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        }
    }

    fn oracle_remove(oracle: &mut Vec<f64>, value: f64) -> bool {
        match oracle.iter().position(|&v| v == value) {
            Some(idx) => {
                oracle.remove(idx);
                true
            }
            None => false,
        }
    }

    fn check_scenario<M: Multiset>() {
        let mut m = M::default();
        for v in [15.0, 10.0, 20.0, 10.0, 30.0, 5.0] {
            m.put(v);
        }
        assert_eq!(m.sorted(), vec![5.0, 10.0, 10.0, 15.0, 20.0, 30.0]);
        assert_eq!(m.median(), 12.5);
        assert_eq!(m.range_query(10.0, 25.0), vec![10.0, 10.0, 15.0, 20.0]);
        assert_eq!(m.k_smallest(2), vec![5.0, 10.0]);
        assert_eq!(m.k_largest(2), vec![30.0, 20.0]);

        assert!(m.take(15.0));
        assert_eq!(m.sorted(), vec![5.0, 10.0, 10.0, 20.0, 30.0]);
        assert_eq!(m.median(), 10.0);
        assert!(m.verify());
    }

    fn check_empty<M: Multiset>() {
        let mut m = M::default();
        assert_eq!(m.median(), 0.0);
        assert!(m.k_smallest(3).is_empty());
        assert!(m.k_largest(3).is_empty());
        assert!(m.range_query(-1.0, 1.0).is_empty());
        assert_eq!(m.select(0), None);
        assert_eq!(m.min(), None);
        assert_eq!(m.max(), None);

        assert!(!m.take(1.0));
        assert_eq!(m.count(), 0);
        assert!(m.verify());
    }

    fn check_absent_delete_is_noop<M: Multiset>() {
        let mut m = M::default();
        for v in [3.0, 1.0, 4.0, 1.0, 5.0] {
            m.put(v);
        }
        let before = m.sorted();
        assert!(!m.take(2.0));
        assert!(!m.take(-1.0));
        assert_eq!(m.sorted(), before);
        assert_eq!(m.count(), 5);
    }

    fn check_bounds<M: Multiset>() {
        let mut m = M::default();
        for v in [2.0, 8.0, 4.0, 6.0] {
            m.put(v);
        }
        assert_eq!(m.k_smallest(0), Vec::<f64>::new());
        assert_eq!(m.k_largest(10), vec![8.0, 6.0, 4.0, 2.0]);
        assert_eq!(m.range_query(4.0, 4.0), vec![4.0]);
        assert_eq!(m.range_query(4.5, 5.5), Vec::<f64>::new());
        assert_eq!(m.range_query(f64::NEG_INFINITY, f64::INFINITY), m.sorted());
        assert_eq!(m.min(), Some(2.0));
        assert_eq!(m.max(), Some(8.0));
        assert_eq!(m.median(), 5.0);
    }

    fn check_random<M: Multiset>() {
        let mut rng = StdRng::seed_from_u64(RNG_SEED);
        let mut m = M::default();
        let mut oracle: Vec<f64> = Vec::new();

        const OPS: usize = 3_000;
        for step in 0..OPS {
            // Small value domain so duplicates and repeated deletes are common
            let value = rng.random_range(0..200) as f64 / 4.0;
            if rng.random_range(0..100) < 60 {
                m.put(value);
                oracle.push(value);
            } else {
                assert_eq!(m.take(value), oracle_remove(&mut oracle, value), "step {step}");
            }

            if step % 97 == 0 {
                let mut sorted = oracle.clone();
                sorted.sort_by_key(|&v| OrderedFloat(v));

                assert!(m.verify(), "invariants broken at step {step}");
                assert_eq!(m.count(), sorted.len());
                assert_eq!(m.sorted(), sorted);
                assert_approx_eq!(m.median(), oracle_median(&sorted));

                let low = rng.random_range(0..200) as f64 / 4.0;
                let high = low + rng.random_range(0..60) as f64 / 4.0;
                let expected: Vec<f64> = sorted
                    .iter()
                    .copied()
                    .filter(|&v| low <= v && v <= high)
                    .collect();
                assert_eq!(m.range_query(low, high), expected);

                let k = rng.random_range(0..20);
                assert_eq!(m.k_smallest(k), sorted.iter().copied().take(k).collect::<Vec<_>>());
                assert_eq!(
                    m.k_largest(k),
                    sorted.iter().rev().copied().take(k).collect::<Vec<_>>()
                );
                if !sorted.is_empty() {
                    let idx = rng.random_range(0..sorted.len());
                    assert_eq!(m.select(idx), Some(sorted[idx]));
                }
            }
        }
    }

    macro_rules! test_all {
        ($name:ident, $func:ident) => {
            #[test]
            fn $name() {
                $func::<AvlTree<f64>>();
                $func::<RbTree<f64>>();
                $func::<UnsortedArray<f64>>();
                $func::<MinHeap<f64>>();
            }
        };
    }

    test_all!(test_scenario_all_impls, check_scenario);
    test_all!(test_empty_all_impls, check_empty);
    test_all!(test_absent_delete_all_impls, check_absent_delete_is_noop);
    test_all!(test_bounds_all_impls, check_bounds);
    test_all!(test_random_all_impls, check_random);

    #[test]
    fn test_range_query_prunes_but_keeps_duplicates() {
        let mut tree = AvlTree::new();
        for _ in 0..50 {
            tree.insert(7.0);
        }
        tree.insert(1.0);
        tree.insert(9.0);
        assert_eq!(tree.range_query(7.0, 7.0).len(), 50);
        assert_eq!(tree.range_query(7.5, 9.0), vec![9.0]);

        let rb: RbTree<f64> = tree.iter().collect();
        assert_eq!(rb.range_query(7.0, 7.0).len(), 50);
        assert_eq!(rb.range_query(1.0, 7.0).len(), 51);
    }

    fn drained_median<S>(values: &[S::Key]) -> S::Key
    where
        S: SearchTree + Default,
    {
        let mut tree = S::default();
        for &v in values {
            tree.insert(v);
        }
        for &v in values {
            assert!(tree.remove(v));
        }
        tree.median()
    }

    #[test]
    fn test_median_of_drained_tree_is_zero() {
        assert_eq!(drained_median::<AvlTree<f64>>(&[3.0, 1.0, 2.0]), 0.0);
        assert_eq!(drained_median::<RbTree<f64>>(&[3.0, 1.0, 2.0]), 0.0);
        assert_eq!(drained_median::<AvlTree<f32>>(&[5.0, 5.0]), 0.0f32);
        assert_eq!(drained_median::<RbTree<f32>>(&[]), 0.0f32);
    }

    #[test]
    fn test_median_f32() {
        let tree: RbTree<f32> = [1.0f32, 2.0].into_iter().collect();
        assert_eq!(tree.median(), 1.5f32);
    }
}
