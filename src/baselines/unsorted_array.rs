use alloc::{borrow::Cow, vec::Vec};

use num_traits::float::FloatCore;
use ordered_float::OrderedFloat;

use crate::{
    OrderStatistics,
    helper::{median_from_sorted_slice, sorted_copy},
};

/// Growable array that defers sorting until a query needs order
///
/// Insertion appends in O(1) and marks the data unsorted. [`sort`](Self::sort)
/// restores order in place with an insertion sort, which is close to linear
/// when only a few values arrived since the last sort. Queries take `&self`,
/// so they read the data in place when it is already sorted and otherwise
/// work on a sorted copy.
#[derive(Debug, Clone)]
pub struct UnsortedArray<T> {
    data: Vec<T>,
    sorted: bool,
}

impl<T: FloatCore> UnsortedArray<T> {
    /// Creates an empty array
    pub const fn new() -> Self {
        Self {
            data: Vec::new(),
            sorted: true,
        }
    }

    /// Creates an empty array with room for `capacity` values
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            sorted: true,
        }
    }

    /// Appends a value
    pub fn insert(&mut self, value: T) {
        if let Some(&last) = self.data.last() {
            self.sorted &= OrderedFloat(last) <= OrderedFloat(value);
        }
        self.data.push(value);
    }

    /// Removes the first occurrence of `value`, keeping the order of the rest
    ///
    /// # Returns
    ///
    /// * `bool` - True if an occurrence was found and removed
    pub fn remove(&mut self, value: T) -> bool {
        let target = OrderedFloat(value);
        match self.data.iter().position(|&v| OrderedFloat(v) == target) {
            Some(idx) => {
                self.data.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Sorts the stored values in place
    pub fn sort(&mut self) {
        if self.sorted {
            return;
        }

        for i in 1..self.data.len() {
            let current = self.data[i];
            let mut j = i;
            while j > 0 && OrderedFloat(self.data[j - 1]) > OrderedFloat(current) {
                self.data[j] = self.data[j - 1];
                j -= 1;
            }
            self.data[j] = current;
        }
        self.sorted = true;
    }

    /// True if the stored values are currently in ascending order
    pub fn is_sorted(&self) -> bool {
        self.sorted
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
        self.sorted = true;
    }

    fn view(&self) -> Cow<'_, [T]> {
        if self.sorted {
            Cow::Borrowed(&self.data)
        } else {
            Cow::Owned(sorted_copy(&self.data))
        }
    }
}

impl<T: FloatCore> OrderStatistics for UnsortedArray<T> {
    type Value = T;

    fn select(&self, k: usize) -> Option<T> {
        self.view().get(k).copied()
    }

    fn median(&self) -> T {
        median_from_sorted_slice(&self.view())
    }

    fn k_smallest(&self, n: usize) -> Vec<T> {
        self.view().iter().take(n).copied().collect()
    }

    fn k_largest(&self, n: usize) -> Vec<T> {
        self.view().iter().rev().take(n).copied().collect()
    }

    fn range_query(&self, low: T, high: T) -> Vec<T> {
        let view = self.view();
        let (low, high) = (OrderedFloat(low), OrderedFloat(high));
        let start = view.partition_point(|&v| OrderedFloat(v) < low);
        let end = view.partition_point(|&v| OrderedFloat(v) <= high);
        if start >= end {
            return Vec::new();
        }
        view[start..end].to_vec()
    }

    fn sorted(&self) -> Vec<T> {
        self.view().into_owned()
    }
}

impl<T: FloatCore> Default for UnsortedArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FloatCore> Extend<T> for UnsortedArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: FloatCore> FromIterator<T> for UnsortedArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new();
        array.extend(iter);
        array
    }
}
