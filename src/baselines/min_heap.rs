use alloc::vec::Vec;

use num_traits::float::FloatCore;
use ordered_float::OrderedFloat;

use crate::{
    OrderStatistics,
    helper::{median_from_sorted_slice, sorted_copy, within},
};

/// Binary min-heap over an implicit array
///
/// Only the minimum is cheap. Removing an arbitrary value is a linear search
/// followed by a sift, and every ordered query sorts a copy of the storage.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    data: Vec<T>,
}

impl<T: FloatCore> MinHeap<T> {
    /// Creates an empty heap
    pub const fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Creates an empty heap with room for `capacity` values
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Pushes a value and sifts it up
    pub fn insert(&mut self, value: T) {
        self.data.push(value);
        self.sift_up(self.data.len() - 1);
    }

    /// Removes one occurrence of `value`
    ///
    /// # Returns
    ///
    /// * `bool` - True if an occurrence was found and removed
    pub fn remove(&mut self, value: T) -> bool {
        let target = OrderedFloat(value);
        let Some(idx) = self.data.iter().position(|&v| OrderedFloat(v) == target) else {
            return false;
        };

        self.data.swap_remove(idx);
        if idx < self.data.len() {
            // The moved-in tail may belong above or below its new slot
            self.sift_down(idx);
            self.sift_up(idx);
        }
        true
    }

    /// Smallest value without removing it
    #[inline]
    pub fn peek_min(&self) -> Option<T> {
        self.data.first().copied()
    }

    /// Number of stored values
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when nothing is stored
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Drops every value
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Checks that every parent is `<=` its children
    pub fn verify_heap(&self) -> bool {
        (1..self.data.len()).all(|i| self.less_or_equal((i - 1) / 2, i))
    }

    #[inline]
    fn less_or_equal(&self, a: usize, b: usize) -> bool {
        OrderedFloat(self.data[a]) <= OrderedFloat(self.data[b])
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if self.less_or_equal(parent, idx) {
                break;
            }
            self.data.swap(parent, idx);
            idx = parent;
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.data.len();
        loop {
            let left = 2 * idx + 1;
            let right = left + 1;
            let mut smallest = idx;

            if left < len && !self.less_or_equal(smallest, left) {
                smallest = left;
            }
            if right < len && !self.less_or_equal(smallest, right) {
                smallest = right;
            }
            if smallest == idx {
                break;
            }
            self.data.swap(idx, smallest);
            idx = smallest;
        }
    }
}

impl<T: FloatCore> OrderStatistics for MinHeap<T> {
    type Value = T;

    fn select(&self, k: usize) -> Option<T> {
        if k >= self.data.len() {
            return None;
        }
        sorted_copy(&self.data).get(k).copied()
    }

    fn median(&self) -> T {
        median_from_sorted_slice(&sorted_copy(&self.data))
    }

    fn k_smallest(&self, n: usize) -> Vec<T> {
        let mut sorted = sorted_copy(&self.data);
        sorted.truncate(n);
        sorted
    }

    fn k_largest(&self, n: usize) -> Vec<T> {
        sorted_copy(&self.data).into_iter().rev().take(n).collect()
    }

    fn range_query(&self, low: T, high: T) -> Vec<T> {
        let in_range: Vec<T> = self
            .data
            .iter()
            .copied()
            .filter(|&v| within(v, low, high))
            .collect();
        sorted_copy(&in_range)
    }

    fn sorted(&self) -> Vec<T> {
        sorted_copy(&self.data)
    }

    fn min(&self) -> Option<T> {
        self.peek_min()
    }
}

impl<T: FloatCore> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FloatCore> Extend<T> for MinHeap<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: FloatCore> FromIterator<T> for MinHeap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut heap = Self::new();
        heap.extend(iter);
        heap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_min_tracks_inserts() {
        let mut heap = MinHeap::new();
        assert_eq!(heap.peek_min(), None);

        for v in [5.0, 3.0, 8.0, 1.0, 9.0] {
            heap.insert(v);
            assert!(heap.verify_heap());
        }
        assert_eq!(heap.peek_min(), Some(1.0));
        assert_eq!(heap.len(), 5);
    }

    #[test]
    fn test_remove_root_and_interior() {
        let mut heap: MinHeap<f64> = [4.0, 1.0, 7.0, 3.0, 8.0, 2.0, 9.0].into_iter().collect();

        assert!(heap.remove(1.0));
        assert_eq!(heap.peek_min(), Some(2.0));
        assert!(heap.verify_heap());

        assert!(heap.remove(7.0));
        assert!(heap.verify_heap());
        assert_eq!(heap.sorted(), vec![2.0, 3.0, 4.0, 8.0, 9.0]);

        assert!(!heap.remove(7.0));
        assert_eq!(heap.len(), 5);
    }

    #[test]
    fn test_remove_tail_needs_sift_up() {
        // Removing 20 moves 6 under 15, which must rise above it
        let mut heap: MinHeap<f64> = [1.0, 15.0, 2.0, 20.0, 16.0, 3.0, 4.0, 21.0, 22.0, 17.0, 18.0, 5.0, 6.0]
            .into_iter()
            .collect();
        assert!(heap.remove(20.0));
        assert!(heap.verify_heap());
        assert_eq!(heap.k_smallest(4), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_queries_leave_heap_untouched() {
        let heap: MinHeap<f64> = [15.0, 10.0, 20.0, 10.0, 30.0, 5.0].into_iter().collect();
        let before = heap.data.clone();

        assert_eq!(heap.median(), 12.5);
        assert_eq!(heap.range_query(10.0, 25.0), vec![10.0, 10.0, 15.0, 20.0]);
        assert_eq!(heap.k_largest(3), vec![30.0, 20.0, 15.0]);
        assert_eq!(heap.select(5), Some(30.0));
        assert_eq!(heap.select(6), None);

        assert_eq!(heap.data, before);
    }

    #[test]
    fn test_clear() {
        let mut heap: MinHeap<f64> = [3.0, 1.0].into_iter().collect();
        heap.clear();
        assert!(heap.is_empty());
        assert_eq!(heap.min(), None);
    }
}
