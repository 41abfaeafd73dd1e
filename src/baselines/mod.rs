//! Simple reference structures used to cross-check and benchmark the trees
//!
//! Both answer the same [`OrderStatistics`](crate::OrderStatistics) queries as
//! the trees, trading query cost for cheap insertion.

mod min_heap;
pub use min_heap::MinHeap;

mod unsorted_array;
pub use unsorted_array::UnsortedArray;
