//! Fixed-size batching over a split

/// Groups an iterator into batches of `batch_size` items.
///
/// The last batch may be shorter. A `batch_size` of zero never flushes early,
/// so the whole input arrives as one batch.
pub struct Batched<I: Iterator> {
    inner: I,
    batch_size: usize,
}

impl<I: Iterator> Batched<I> {
    pub fn new(inner: I, batch_size: usize) -> Self {
        Self { inner, batch_size }
    }
}

impl<I: Iterator> Iterator for Batched<I> {
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut batch = Vec::with_capacity(self.batch_size.min(1024));
        for item in self.inner.by_ref() {
            batch.push(item);
            if batch.len() == self.batch_size {
                return Some(batch);
            }
        }
        if batch.is_empty() {
            None
        } else {
            Some(batch)
        }
    }
}
