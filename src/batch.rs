//! Bounded buffer of pending units.
//!
//! Units are pushed one by one; when the buffer reaches its capacity the full batch
//! is handed back to the caller, which is responsible for flushing it.
use crate::error::Error;

#[derive(Debug)]
pub struct Batch<T> {
    items: Vec<T>,
    size: usize,
}

impl<T> Batch<T> {
    /// Creates an empty batch. `size` is clamped to 1.
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            items: Vec::with_capacity(size),
            size,
        }
    }

    /// Adds an item, returning the full batch if the size limit is reached.
    pub fn push(&mut self, item: T) -> Option<Vec<T>> {
        self.items.push(item);
        if self.items.len() >= self.size {
            Some(self.take())
        } else {
            None
        }
    }

    /// Takes the pending items, leaving the batch empty.
    pub fn take(&mut self) -> Vec<T> {
        std::mem::replace(&mut self.items, Vec::with_capacity(self.size))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Groups the items of a fallible iterator into batches of a given size.
///
/// The last, possibly smaller, batch is yielded once the inner iterator is exhausted.
/// The first error ends the iteration, and the pending items are dropped.
pub struct Batches<I, T> {
    inner: I,
    batch: Batch<T>,
    done: bool,
}

impl<I, T> Batches<I, T>
where
    I: Iterator<Item = Result<T, Error>>,
{
    pub fn new(inner: I, size: usize) -> Self {
        Self {
            inner,
            batch: Batch::new(size),
            done: false,
        }
    }
}

impl<I, T> Iterator for Batches<I, T>
where
    I: Iterator<Item = Result<T, Error>>,
{
    type Item = Result<Vec<T>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.inner.next() {
                Some(Ok(item)) => {
                    if let Some(full) = self.batch.push(item) {
                        return Some(Ok(full));
                    }
                }
                Some(Err(e)) => {
                    self.done = true;
                    self.batch.take();
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    if self.batch.is_empty() {
                        return None;
                    }
                    return Some(Ok(self.batch.take()));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Batch, Batches};
    use crate::error::Error;

    #[test]
    fn flushes_at_size() {
        let mut b = Batch::new(3);
        let mut flushed = Vec::new();
        for i in 0..7 {
            if let Some(full) = b.push(i) {
                flushed.push(full);
            }
            assert!(b.len() < 3);
        }
        assert_eq!(flushed, vec![vec![0, 1, 2], vec![3, 4, 5]]);
        assert_eq!(b.take(), vec![6]);
        assert!(b.is_empty());
    }

    #[test]
    fn batches_deliver_remainder() {
        let items = (0..10).map(Ok::<_, Error>);
        let sizes: Vec<usize> = Batches::new(items, 4).map(|b| b.unwrap().len()).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
    }

    #[test]
    fn batches_exact_multiple() {
        let items = (0..8).map(Ok::<_, Error>);
        let sizes: Vec<usize> = Batches::new(items, 4).map(|b| b.unwrap().len()).collect();
        assert_eq!(sizes, vec![4, 4]);
    }

    #[test]
    fn batches_stop_on_error() {
        let items = vec![
            Ok(1),
            Err(Error::Custom("bad".to_string())),
            Ok(2),
        ];
        let mut b = Batches::new(items.into_iter(), 4);
        assert!(b.next().unwrap().is_err());
        assert!(b.next().is_none());
    }
}
