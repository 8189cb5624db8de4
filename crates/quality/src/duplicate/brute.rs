//! Exact O(n²) duplicate search.

use contentgate_core::{DuplicateAlgorithm, DuplicatePair};
use rayon::prelude::*;

use super::{sort_pairs, verify_pair, DuplicateStrategy, Hook};

/// Compares every pair of hooks with the exact similarity.
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForce {
    parallel: bool,
}

impl BruteForce {
    /// Create a brute-force search, optionally spreading rows over the
    /// rayon pool.
    pub fn new(parallel: bool) -> Self {
        Self { parallel }
    }
}

impl DuplicateStrategy for BruteForce {
    fn algorithm(&self) -> DuplicateAlgorithm {
        DuplicateAlgorithm::BruteForce
    }

    fn find_pairs(&self, hooks: &[Hook], threshold: f64) -> Vec<DuplicatePair> {
        let n = hooks.len();
        let row = |i: usize| -> Vec<DuplicatePair> {
            ((i + 1)..n)
                .filter_map(|j| verify_pair(&hooks[i], &hooks[j], threshold))
                .collect()
        };

        let mut pairs: Vec<DuplicatePair> = if self.parallel {
            (0..n).into_par_iter().flat_map_iter(row).collect()
        } else {
            (0..n).flat_map(row).collect()
        };

        sort_pairs(&mut pairs);
        pairs
    }
}
