//! Length equalisation for reference/estimate pairs

use num_traits::Zero;

/// Zero-pad the shorter of two arrays at the end so both have the length of
/// the longer one. Nothing is ever truncated.
pub fn pad_arrays_to_match<T: Copy + Zero>(a: &[T], b: &[T]) -> (Vec<T>, Vec<T>) {
    let len = a.len().max(b.len());
    (pad_to(a, len), pad_to(b, len))
}

fn pad_to<T: Copy + Zero>(samples: &[T], len: usize) -> Vec<T> {
    let mut padded = Vec::with_capacity(len);
    padded.extend_from_slice(samples);
    padded.resize(len, T::zero());
    padded
}
