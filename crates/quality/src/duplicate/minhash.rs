//! MinHash signatures and LSH banding for approximate duplicate search.
//!
//! Every character occurrence of the normalized hook, spaces included,
//! becomes one shingle, so `"aa b"` yields `a#0 a#1 ' '#0 b#0`. The longest
//! common subsequence of two hooks is a common sub-multiset of their
//! characters, which bounds the Jaccard similarity of the shingle sets from
//! below:
//!
//! ```text
//! jaccard >= s / (2 - s)    where s = 2 * LCS / (|a| + |b|)
//! ```
//!
//! The band layout is chosen so hooks at that Jaccard floor collide with
//! near certainty. Candidates are verified with the exact similarity, so this
//! path never reports a pair the brute-force path would reject.

use contentgate_core::{DuplicateAlgorithm, DuplicatePair, QaError, Result};
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use xxhash_rust::xxh3::xxh3_64;

use super::{sort_pairs, verify_pair, DuplicateStrategy, Hook};
use crate::config::MAX_PERMUTATIONS;

/// Mersenne prime 2^61 - 1 for universal hashing.
const PRIME: u64 = (1u64 << 61) - 1;

/// Largest accepted chance of missing a pair that sits exactly on the
/// recall floor. Pairs above the floor are missed far less often.
const MAX_MISS: f64 = 1e-4;

/// Approximate duplicate search.
#[derive(Debug, Clone)]
pub struct MinHashLsh {
    num_perm: usize,
    bands: usize,
    rows: usize,
    /// Per-permutation `(a, b)` coefficients
    coefficients: Vec<(u64, u64)>,
    parallel: bool,
}

impl MinHashLsh {
    /// Create a search with `num_perm` permutations that finds every pair at
    /// or above `threshold + epsilon` with near certainty.
    pub fn new(num_perm: usize, threshold: f64, epsilon: f64, parallel: bool) -> Result<Self> {
        if num_perm == 0 || num_perm > MAX_PERMUTATIONS {
            return Err(QaError::BackendUnavailable(format!(
                "MinHash needs 1 to {MAX_PERMUTATIONS} permutations, got {num_perm}"
            )));
        }
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(QaError::BackendUnavailable(format!(
                "LSH threshold must be in (0, 1], got {threshold}"
            )));
        }
        if !(0.0..=1.0).contains(&epsilon) {
            return Err(QaError::BackendUnavailable(format!(
                "LSH tolerance must be in [0, 1], got {epsilon}"
            )));
        }

        let recall_floor = (threshold + epsilon).min(1.0);
        let (bands, rows) = band_layout(jaccard_floor(recall_floor), num_perm);
        let coefficients = (0..num_perm as u64)
            .map(|seed| {
                let a = seed
                    .wrapping_mul(0x517cc1b727220a95)
                    .wrapping_add(0x6c62272e07bb0142)
                    | 1;
                let b = seed
                    .wrapping_mul(0x6c62272e07bb0142)
                    .wrapping_add(0x517cc1b727220a95);
                (a, b)
            })
            .collect();

        Ok(Self {
            num_perm,
            bands,
            rows,
            coefficients,
            parallel,
        })
    }

    /// `(bands, rows)` layout in use.
    pub fn layout(&self) -> (usize, usize) {
        (self.bands, self.rows)
    }

    /// Signature for a set of hashed shingles.
    pub fn signature(&self, shingles: &[u64]) -> Vec<u64> {
        let mut signature = vec![u64::MAX; self.num_perm];

        for base in shingles {
            for (slot, (a, b)) in signature.iter_mut().zip(&self.coefficients) {
                let hashed = a.wrapping_mul(*base).wrapping_add(*b) % PRIME;
                *slot = (*slot).min(hashed);
            }
        }

        signature
    }

    /// Fraction of matching signature slots, an estimate of Jaccard
    /// similarity.
    pub fn estimate(&self, a: &[u64], b: &[u64]) -> f64 {
        let matching = a.iter().zip(b).filter(|(x, y)| x == y).count();
        matching as f64 / self.num_perm as f64
    }

    fn band_key(&self, signature: &[u64], band: usize) -> u64 {
        let start = band * self.rows;
        signature[start..start + self.rows]
            .iter()
            .fold(0u64, |hash, v| hash.wrapping_mul(31).wrapping_add(*v))
    }

    fn signatures(&self, hooks: &[Hook]) -> Vec<Vec<u64>> {
        let sign = |hook: &Hook| self.signature(&shingles(hook));
        if self.parallel {
            hooks.par_iter().map(sign).collect()
        } else {
            hooks.iter().map(sign).collect()
        }
    }
}

/// Hashed character-occurrence shingles of a hook.
pub(crate) fn shingles(hook: &Hook) -> Vec<u64> {
    let mut seen: FxHashMap<char, u32> = FxHashMap::default();
    hook.chars
        .iter()
        .map(|c| {
            let count = seen.entry(*c).or_insert(0);
            let occurrence = *count;
            *count += 1;
            xxh3_64(&(((*c as u64) << 32) | occurrence as u64).to_le_bytes())
        })
        .collect()
}

/// Lowest Jaccard similarity of the shingle sets of two hooks whose exact
/// similarity is `similarity`.
pub fn jaccard_floor(similarity: f64) -> f64 {
    similarity / (2.0 - similarity)
}

/// Insert-only LSH index mapping `(band, key)` buckets to hook slots.
struct LshIndex {
    buckets: FxHashMap<(usize, u64), Vec<usize>>,
}

impl LshIndex {
    fn build(lsh: &MinHashLsh, signatures: &[Vec<u64>]) -> Self {
        let mut buckets: FxHashMap<(usize, u64), Vec<usize>> = FxHashMap::default();
        for (slot, signature) in signatures.iter().enumerate() {
            for band in 0..lsh.bands {
                buckets
                    .entry((band, lsh.band_key(signature, band)))
                    .or_default()
                    .push(slot);
            }
        }
        Self { buckets }
    }

    /// Slots after `slot` sharing at least one bucket with it.
    fn query(&self, lsh: &MinHashLsh, slot: usize, signature: &[u64]) -> Vec<(usize, usize)> {
        let mut found = FxHashSet::default();
        for band in 0..lsh.bands {
            if let Some(members) = self.buckets.get(&(band, lsh.band_key(signature, band))) {
                found.extend(members.iter().copied().filter(|other| *other > slot));
            }
        }
        found.into_iter().map(|other| (slot, other)).collect()
    }
}

impl DuplicateStrategy for MinHashLsh {
    fn algorithm(&self) -> DuplicateAlgorithm {
        DuplicateAlgorithm::MinHashLsh
    }

    fn find_pairs(&self, hooks: &[Hook], threshold: f64) -> Vec<DuplicatePair> {
        let signatures = self.signatures(hooks);

        // The index is complete before any query runs.
        let index = LshIndex::build(self, &signatures);

        let mut candidates: Vec<(usize, usize)> = if self.parallel {
            signatures
                .par_iter()
                .enumerate()
                .flat_map_iter(|(slot, sig)| index.query(self, slot, sig))
                .collect()
        } else {
            signatures
                .iter()
                .enumerate()
                .flat_map(|(slot, sig)| index.query(self, slot, sig))
                .collect()
        };
        candidates.sort_unstable();
        candidates.dedup();

        tracing::debug!(
            "LSH proposed {} candidate pairs for {} hooks ({} bands x {} rows)",
            candidates.len(),
            hooks.len(),
            self.bands,
            self.rows
        );

        let verify = |(i, j): &(usize, usize)| verify_pair(&hooks[*i], &hooks[*j], threshold);
        let mut pairs: Vec<DuplicatePair> = if self.parallel {
            candidates.par_iter().filter_map(verify).collect()
        } else {
            candidates.iter().filter_map(verify).collect()
        };

        sort_pairs(&mut pairs);
        pairs
    }
}

/// Band layout `(bands, rows)` with `bands * rows <= num_perm`.
///
/// Takes the most rows per band (fewest stray candidates) for which some
/// band count still makes sets at `jaccard` collide with probability at
/// least `1 - MAX_MISS`. Falls back to one row per band.
pub fn band_layout(jaccard: f64, num_perm: usize) -> (usize, usize) {
    for rows in (1..=num_perm).rev() {
        let bands = (1..=num_perm / rows)
            .find(|bands| collision_probability(jaccard, *bands, rows) >= 1.0 - MAX_MISS);
        if let Some(bands) = bands {
            return (bands, rows);
        }
    }
    (num_perm, 1)
}

/// Probability that two sets with Jaccard similarity `s` share a bucket.
fn collision_probability(s: f64, bands: usize, rows: usize) -> f64 {
    1.0 - (1.0 - s.powi(rows as i32)).powi(bands as i32)
}
