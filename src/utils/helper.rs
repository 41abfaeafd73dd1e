use alloc::vec::Vec;
use num_traits::float::FloatCore;
use ordered_float::OrderedFloat;

/// Returns the median from a sorted slice
///
/// # Arguments
///
/// * `ss` - The sorted slice
///
/// # Returns
///
/// * `T` - The median, or zero if the slice is empty
#[inline]
pub fn median_from_sorted_slice<T: FloatCore>(ss: &[T]) -> T {
    let len = ss.len();
    if len == 0 {
        return T::zero();
    }
    let mid = len / 2;
    if len % 2 == 0 {
        midpoint(ss[mid - 1], ss[mid])
    } else {
        ss[mid]
    }
}

/// Average of the two middle elements of an even-sized sample
#[inline]
pub fn midpoint<T: FloatCore>(lower: T, upper: T) -> T {
    let _2 = T::one() + T::one();
    (lower + upper) / _2
}

/// Sorts a copy of `values` ascending under the `OrderedFloat` total order
pub fn sorted_copy<T: FloatCore>(values: &[T]) -> Vec<T> {
    let mut out = values.to_vec();
    out.sort_unstable_by_key(|&v| OrderedFloat(v));
    out
}

/// Inclusive membership test under the `OrderedFloat` total order
#[inline]
pub fn within<T: FloatCore>(value: T, low: T, high: T) -> bool {
    let value = OrderedFloat(value);
    OrderedFloat(low) <= value && value <= OrderedFloat(high)
}
