//! Duplicate hook detection.
//!
//! Two interchangeable strategies find near-duplicate hooks:
//! - [`BruteForce`]: exact O(n²) comparison of every pair.
//! - `MinHashLsh`: character-occurrence MinHash signatures indexed with LSH
//!   banding, every candidate verified against the exact similarity.
//!
//! [`select_algorithm`] picks one from the batch size and whether the
//! approximate backend is available. Both report only pairs whose exact
//! similarity clears the threshold, so they can only disagree on pairs the
//! approximate index failed to propose.

mod brute;
#[cfg(feature = "minhash")]
mod minhash;

pub use brute::BruteForce;
#[cfg(feature = "minhash")]
pub use minhash::{band_layout, jaccard_floor, MinHashLsh};

use contentgate_core::{
    AnalyzerKind, Batch, ContentItem, DuplicateAlgorithm, DuplicatePair, DuplicateSection,
    Issue, Result, ValidationResult, clamp_unit,
};
use tracing::{debug, warn};

use crate::config::DuplicateConfig;
use crate::similarity::{normalize, similarity_chars, similarity_upper_bound};

/// The comparison unit for one item.
#[derive(Debug, Clone, PartialEq)]
pub struct Hook {
    /// Item position
    pub position: usize,
    /// Hook as written, trimmed
    pub text: String,
    /// Normalized characters used for comparison
    chars: Vec<char>,
}

impl Hook {
    /// Build a hook from raw text.
    pub fn new(position: usize, text: impl Into<String>) -> Self {
        let text = text.into().trim().to_string();
        let chars = normalize(&text).chars().collect();
        Self { position, text, chars }
    }

    /// Whether there is nothing to compare.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Normalized text.
    pub fn normalized(&self) -> String {
        self.chars.iter().collect()
    }
}

/// The hook of one item: its first line, or its first N words on
/// long-form platforms.
pub fn hook_for(item: &ContentItem, config: &DuplicateConfig) -> Hook {
    let profile = item.profile();
    let word_limit = profile
        .hook_words
        .map(|n| config.long_form_hook_words.unwrap_or(n));

    match word_limit {
        Some(n) => {
            let words: Vec<&str> = item.text().split_whitespace().take(n).collect();
            Hook::new(item.position(), words.join(" "))
        }
        None => Hook::new(item.position(), item.hook()),
    }
}

/// Non-empty hooks of a batch, in position order.
pub fn extract_hooks(batch: &Batch, config: &DuplicateConfig) -> Vec<Hook> {
    batch
        .items()
        .iter()
        .map(|item| hook_for(item, config))
        .filter(|hook| !hook.is_empty())
        .collect()
}

/// A near-duplicate search over hooks.
pub trait DuplicateStrategy: Send + Sync {
    /// Which algorithm this is.
    fn algorithm(&self) -> DuplicateAlgorithm;

    /// Every pair with exact similarity ≥ `threshold`, sorted by
    /// `(index_a, index_b)`. Hooks must be non-empty and in position order.
    fn find_pairs(&self, hooks: &[Hook], threshold: f64) -> Vec<DuplicatePair>;
}

/// Choose the algorithm for a batch.
pub fn select_algorithm(
    batch_size: usize,
    brute_force_below: usize,
    backend_available: bool,
) -> DuplicateAlgorithm {
    if batch_size < brute_force_below || !backend_available {
        DuplicateAlgorithm::BruteForce
    } else {
        DuplicateAlgorithm::MinHashLsh
    }
}

/// Build the approximate backend, if this build has one.
pub fn approximate_backend(config: &DuplicateConfig) -> Result<Box<dyn DuplicateStrategy>> {
    #[cfg(feature = "minhash")]
    {
        let backend = MinHashLsh::new(
            config.num_perm,
            config.similarity_threshold,
            config.epsilon,
            config.parallel,
        )?;
        Ok(Box::new(backend))
    }

    #[cfg(not(feature = "minhash"))]
    {
        let _ = config;
        Err(contentgate_core::QaError::BackendUnavailable(
            "built without the minhash feature".to_string(),
        ))
    }
}

/// Strategy for a batch of `batch_size` items.
///
/// An approximate backend that fails to build downgrades to brute force.
pub fn select_strategy(batch_size: usize, config: &DuplicateConfig) -> Box<dyn DuplicateStrategy> {
    let brute = || -> Box<dyn DuplicateStrategy> { Box::new(BruteForce::new(config.parallel)) };

    if select_algorithm(batch_size, config.brute_force_below, true) == DuplicateAlgorithm::BruteForce {
        return brute();
    }

    match approximate_backend(config) {
        Ok(backend) => backend,
        Err(e) => {
            warn!("Approximate duplicate search unavailable, using brute force: {}", e);
            brute()
        }
    }
}

/// Exact verification of one pair, ordered by position.
pub(crate) fn verify_pair(a: &Hook, b: &Hook, threshold: f64) -> Option<DuplicatePair> {
    if similarity_upper_bound(a.chars.len(), b.chars.len()) < threshold {
        return None;
    }
    let similarity = similarity_chars(&a.chars, &b.chars);
    if similarity < threshold {
        return None;
    }

    let (first, second) = if a.position < b.position { (a, b) } else { (b, a) };
    Some(DuplicatePair {
        index_a: first.position,
        index_b: second.position,
        similarity,
        label_a: first.text.clone(),
        label_b: second.text.clone(),
    })
}

pub(crate) fn sort_pairs(pairs: &mut Vec<DuplicatePair>) {
    pairs.sort_by(|x, y| (x.index_a, x.index_b).cmp(&(y.index_a, y.index_b)));
    pairs.dedup_by(|x, y| x.index_a == y.index_a && x.index_b == y.index_b);
}

/// Pairs below `threshold + epsilon`, where the two strategies may disagree.
pub(crate) fn near_threshold_pairs(pairs: &[DuplicatePair], config: &DuplicateConfig) -> usize {
    let ceiling = config.similarity_threshold + config.epsilon;
    pairs.iter().filter(|pair| pair.similarity < ceiling).count()
}

/// `1 - pairs / (n(n-1)/2)` over the full batch size, clamped to [0, 1].
pub fn uniqueness_score(batch_size: usize, pair_count: usize) -> f64 {
    if batch_size < 2 {
        return 1.0;
    }
    let total = batch_size * (batch_size - 1) / 2;
    clamp_unit(1.0 - pair_count as f64 / total as f64)
}

/// Duplicate hook detector.
#[derive(Debug, Clone, Default)]
pub struct DuplicateDetector {
    config: DuplicateConfig,
}

impl DuplicateDetector {
    /// Create a detector.
    pub fn new(config: DuplicateConfig) -> Self {
        Self { config }
    }

    /// Run over a batch with the automatically selected strategy.
    pub fn analyze(&self, batch: &Batch) -> DuplicateSection {
        let strategy = select_strategy(batch.len(), &self.config);
        self.analyze_with(batch, strategy.as_ref())
    }

    /// Run over a batch with a given strategy.
    pub fn analyze_with(&self, batch: &Batch, strategy: &dyn DuplicateStrategy) -> DuplicateSection {
        let hooks = extract_hooks(batch, &self.config);
        debug!(
            "Duplicate search over {} hooks ({} items) using {}",
            hooks.len(),
            batch.len(),
            strategy.algorithm().as_str()
        );

        let pairs = if hooks.len() < 2 {
            Vec::new()
        } else {
            strategy.find_pairs(&hooks, self.config.similarity_threshold)
        };

        let near_threshold = near_threshold_pairs(&pairs, &self.config);
        if near_threshold > 0 {
            debug!(
                "{} duplicate pair(s) within the {:.2} tolerance band of the threshold",
                near_threshold, self.config.epsilon
            );
        }

        let uniqueness = uniqueness_score(batch.len(), pairs.len());

        let issues: Vec<Issue> = pairs
            .iter()
            .map(|pair| {
                Issue::item_error(
                    pair.index_b,
                    format!(
                        "hook duplicates item {} (similarity {:.2}): \"{}\"",
                        pair.index_a, pair.similarity, pair.label_b
                    ),
                )
            })
            .collect();

        let metric = format!(
            "uniqueness {:.2}, {} duplicate pair(s) across {} hook(s) [{}]",
            uniqueness,
            pairs.len(),
            hooks.len(),
            strategy.algorithm().as_str()
        );

        DuplicateSection {
            result: ValidationResult::new(
                AnalyzerKind::Duplicates,
                pairs.is_empty(),
                uniqueness,
                issues,
                metric,
            ),
            algorithm: strategy.algorithm(),
            uniqueness_score: uniqueness,
            compared_hooks: hooks.len(),
            pairs,
        }
    }
}
