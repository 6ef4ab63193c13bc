use std::marker::PhantomData;
use std::num::NonZeroUsize;

use libseed_core::{Error, Result};

/// Splits a row target into fixed-size batches.
///
/// Each call to [`BatchBuilder::batches`] starts a fresh cursor at index 0, so
/// one builder can be replayed any number of times.
#[derive(Debug, Clone, Copy)]
pub struct BatchBuilder {
    total: u64,
    batch_size: NonZeroUsize,
}

impl BatchBuilder {
    pub fn new(total: u64, batch_size: usize) -> Result<Self> {
        let batch_size = NonZeroUsize::new(batch_size)
            .ok_or_else(|| Error::InvalidConfig("batch_size must be at least 1".to_string()))?;
        Ok(Self { total, batch_size })
    }

    /// `ceil(total / batch_size)`.
    pub fn batch_count(&self) -> u64 {
        self.total.div_ceil(self.batch_size.get() as u64)
    }

    /// Lazily produce batches, calling `generator` once per row index.
    pub fn batches<R, F>(&self, generator: F) -> Batches<R, F>
    where
        F: FnMut(u64) -> R,
    {
        Batches {
            next: 0,
            total: self.total,
            batch_size: self.batch_size.get() as u64,
            generator,
            _row: PhantomData,
        }
    }
}

/// Iterator over the batches of one [`BatchBuilder`] run.
pub struct Batches<R, F> {
    next: u64,
    total: u64,
    batch_size: u64,
    generator: F,
    _row: PhantomData<fn() -> R>,
}

impl<R, F> Batches<R, F> {
    /// Index of the first row of the next batch.
    pub fn position(&self) -> u64 {
        self.next
    }
}

impl<R, F> Iterator for Batches<R, F>
where
    F: FnMut(u64) -> R,
{
    type Item = Vec<R>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.total {
            return None;
        }
        let end = self.total.min(self.next + self.batch_size);
        let rows = (self.next..end).map(&mut self.generator).collect();
        self.next = end;
        Some(rows)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.total - self.next.min(self.total)).div_ceil(self.batch_size);
        let remaining = usize::try_from(remaining).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl<R, F> ExactSizeIterator for Batches<R, F> where F: FnMut(u64) -> R {}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(total: u64, size: usize) -> Vec<Vec<u64>> {
        BatchBuilder::new(total, size)
            .unwrap()
            .batches(|idx| idx)
            .collect()
    }

    #[test]
    fn covers_every_index_in_order() {
        for total in [0_u64, 1, 4, 5, 6, 17, 100] {
            for size in [1_usize, 2, 5, 7, 100, 1000] {
                let batches = collect(total, size);
                let flat: Vec<u64> = batches.iter().flatten().copied().collect();
                assert_eq!(flat, (0..total).collect::<Vec<_>>(), "total={total} size={size}");
                assert_eq!(
                    batches.len() as u64,
                    total.div_ceil(size as u64),
                    "total={total} size={size}"
                );
                if let Some((last, full)) = batches.split_last() {
                    assert!(full.iter().all(|batch| batch.len() == size));
                    assert!(!last.is_empty() && last.len() <= size);
                }
            }
        }
    }

    #[test]
    fn last_batch_holds_remainder() {
        let batches = collect(12, 5);
        let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![5, 5, 2]);

        let batches = collect(10, 5);
        let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![5, 5]);
    }

    #[test]
    fn empty_target_yields_no_batches() {
        assert!(collect(0, 3).is_empty());
        assert_eq!(BatchBuilder::new(0, 3).unwrap().batch_count(), 0);
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        assert!(matches!(
            BatchBuilder::new(10, 0),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn each_call_restarts_from_zero() {
        let builder = BatchBuilder::new(7, 3).unwrap();
        let first: Vec<Vec<u64>> = builder.batches(|idx| idx).collect();
        let second: Vec<Vec<u64>> = builder.batches(|idx| idx).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn generator_is_lazy_and_called_once_per_row() {
        let mut calls = Vec::new();
        {
            let builder = BatchBuilder::new(5, 2).unwrap();
            let mut batches = builder.batches(|idx| {
                calls.push(idx);
                idx * 10
            });
            assert_eq!(batches.len(), 3);
            assert_eq!(batches.next(), Some(vec![0, 10]));
            assert_eq!(batches.position(), 2);
            assert_eq!(batches.len(), 2);
        }
        assert_eq!(calls, vec![0, 1]);
    }
}
