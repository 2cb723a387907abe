//! Best-effort non-repeating index draws over a fixed pool.

use std::{collections::HashSet, num::NonZeroUsize};

use rand::Rng;

/// Hands out random indices in `0..pool_size`, avoiding indices it already issued
/// until every index has been used once. After that, repeats are allowed.
///
/// One allocator lives for one image and one decoration kind, so choices made on one
/// photo never bias another.
#[derive(Debug, Clone)]
pub struct UniqueIndexAllocator {
    pool_size: usize,
    issued: HashSet<usize>,
}

impl UniqueIndexAllocator {
    pub fn new(pool_size: NonZeroUsize) -> Self {
        Self {
            pool_size: pool_size.get(),
            issued: HashSet::with_capacity(pool_size.get()),
        }
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Whether every index has been issued at least once.
    pub fn is_exhausted(&self) -> bool {
        self.issued.len() >= self.pool_size
    }

    /// Draw the next index.
    ///
    /// While the pool has unused indices, a drawn duplicate is redrawn up to
    /// `pool_size - 1` times; if the redraws keep colliding, one of the unused indices
    /// is picked uniformly instead, so the first `pool_size` draws form a permutation.
    pub fn next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let mut index = rng.random_range(0..self.pool_size);
        if self.is_exhausted() {
            return index;
        }

        let mut retries = self.pool_size - 1;
        while self.issued.contains(&index) && retries > 0 {
            index = rng.random_range(0..self.pool_size);
            retries -= 1;
        }

        if self.issued.contains(&index) {
            let unused: Vec<usize> = (0..self.pool_size)
                .filter(|i| !self.issued.contains(i))
                .collect();
            index = unused[rng.random_range(0..unused.len())];
        }

        self.issued.insert(index);
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn allocator(size: usize) -> UniqueIndexAllocator {
        UniqueIndexAllocator::new(NonZeroUsize::new(size).unwrap())
    }

    #[test]
    fn first_pool_size_draws_are_a_permutation() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            for size in [1, 2, 3, 7, 16] {
                let mut alloc = allocator(size);
                let mut drawn: Vec<usize> = (0..size).map(|_| alloc.next(&mut rng)).collect();
                drawn.sort_unstable();
                assert_eq!(drawn, (0..size).collect::<Vec<_>>(), "seed {seed} size {size}");
                assert!(alloc.is_exhausted());
            }
        }
    }

    #[test]
    fn draws_after_exhaustion_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut alloc = allocator(3);
        for _ in 0..3 {
            alloc.next(&mut rng);
        }
        for _ in 0..100 {
            assert!(alloc.next(&mut rng) < 3);
        }
    }

    #[test]
    fn single_entry_pool_always_returns_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut alloc = allocator(1);
        for _ in 0..10 {
            assert_eq!(alloc.next(&mut rng), 0);
        }
    }

    #[test]
    fn independent_allocators_do_not_share_state() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut first = allocator(2);
        first.next(&mut rng);
        first.next(&mut rng);
        assert!(first.is_exhausted());

        let second = allocator(2);
        assert!(!second.is_exhausted());
        assert_eq!(second.pool_size(), 2);
    }
}
