//! Fixed-size batching of ticket keys.

/// Lazy iterator over consecutive batches of at most `size` items.
///
/// Created by [`batches`]. Every batch is non-empty, order is preserved, and
/// concatenating the batches yields the input exactly.
#[derive(Debug, Clone)]
pub struct Batches<I> {
    iter: I,
    size: usize,
}

/// Partition `items` into batches of at most `size`.
///
/// # Panics
///
/// Panics if `size` is 0.
pub fn batches<I>(items: I, size: usize) -> Batches<I::IntoIter>
where
    I: IntoIterator,
{
    assert!(size > 0, "batch size must be greater than 0");
    Batches {
        iter: items.into_iter(),
        size,
    }
}

impl<I: Iterator> Iterator for Batches<I> {
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let batch: Vec<I::Item> = self.iter.by_ref().take(self.size).collect();
        if batch.is_empty() {
            None
        } else {
            Some(batch)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.iter.size_hint();
        (
            lower.div_ceil(self.size),
            upper.map(|u| u.div_ceil(self.size)),
        )
    }
}
