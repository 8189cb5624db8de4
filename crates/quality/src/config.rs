//! Configuration for the quality engine and its analyzers.

use contentgate_core::{QaError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest accepted MinHash signature length.
pub const MAX_PERMUTATIONS: usize = 1024;

/// Configuration for the quality engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QaConfig {
    /// Duplicate hook detection
    pub duplicates: DuplicateConfig,
    /// CTA variety
    pub cta: CtaConfig,
    /// Length distribution
    pub length: LengthConfig,
    /// Headline engagement
    pub headlines: HeadlineConfig,
    /// Keyword usage
    pub keywords: KeywordConfig,
    /// Run the analyzers concurrently
    pub parallel_analyzers: bool,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            duplicates: DuplicateConfig::default(),
            cta: CtaConfig::default(),
            length: LengthConfig::default(),
            headlines: HeadlineConfig::default(),
            keywords: KeywordConfig::default(),
            parallel_analyzers: true,
        }
    }
}

/// Duplicate hook detector settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuplicateConfig {
    /// Pairs at or above this similarity are duplicates
    pub similarity_threshold: f64,
    /// Batches smaller than this are always brute-forced
    pub brute_force_below: usize,
    /// MinHash signature length, 1 to [`MAX_PERMUTATIONS`]
    pub num_perm: usize,
    /// Tolerance band above the threshold. MinHash banding is laid out to
    /// find every pair at `similarity_threshold + epsilon` or more; pairs
    /// below that may be missed and are logged at debug level.
    pub epsilon: f64,
    /// Overrides the profile's word count for long-form hooks
    pub long_form_hook_words: Option<usize>,
    /// Parallelize per-item work
    pub parallel: bool,
}

impl Default for DuplicateConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.80,
            brute_force_below: 50,
            num_perm: 128,
            epsilon: 0.05,
            long_form_hook_words: None,
            parallel: true,
        }
    }
}

/// CTA variety validator settings.
///
/// Category dominance is skipped for batches under `min_items_for_dominance`
/// (5 by default). With fewer items a single repeated CTA already exceeds the
/// variety threshold, so only the per-item `none` checks apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CtaConfig {
    /// Category dominance is only enforced from this batch size up (5)
    pub min_items_for_dominance: usize,
    /// Replaces the platform profile's variety threshold
    pub variety_threshold_override: Option<f64>,
}

impl Default for CtaConfig {
    fn default() -> Self {
        Self {
            min_items_for_dominance: 5,
            variety_threshold_override: None,
        }
    }
}

/// Length distribution validator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LengthConfig {
    /// Largest share of items allowed in one homogeneity bucket
    pub homogeneity_max_share: f64,
    /// Homogeneity bucket width, in words
    pub homogeneity_bucket: usize,
    /// Homogeneity is only checked from this batch size up
    pub min_items_for_homogeneity: usize,
}

impl Default for LengthConfig {
    fn default() -> Self {
        Self {
            homogeneity_max_share: 0.70,
            homogeneity_bucket: 10,
            min_items_for_homogeneity: 5,
        }
    }
}

/// Headline scorer settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadlineConfig {
    /// Replaces every profile's minimum element count
    pub min_elements_override: Option<u8>,
}

/// Keyword analyzer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    /// Keyword occurrences / words above which an item is stuffed
    pub max_density: f64,
    /// Minimum share of items carrying a primary keyword
    pub min_primary_usage: f64,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            max_density: 0.03,
            min_primary_usage: 0.70,
        }
    }
}

impl QaConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Reject out-of-range values.
    pub fn validate(&self) -> Result<()> {
        unit("duplicates.similarity_threshold", self.duplicates.similarity_threshold)?;
        unit("duplicates.epsilon", self.duplicates.epsilon)?;
        unit("length.homogeneity_max_share", self.length.homogeneity_max_share)?;
        unit("keywords.max_density", self.keywords.max_density)?;
        unit("keywords.min_primary_usage", self.keywords.min_primary_usage)?;
        if let Some(threshold) = self.cta.variety_threshold_override {
            unit("cta.variety_threshold_override", threshold)?;
        }

        if self.duplicates.num_perm == 0 || self.duplicates.num_perm > MAX_PERMUTATIONS {
            return Err(QaError::Config(format!(
                "duplicates.num_perm must be within [1, {MAX_PERMUTATIONS}], got {}",
                self.duplicates.num_perm
            )));
        }
        if self.length.homogeneity_bucket == 0 {
            return Err(QaError::Config("length.homogeneity_bucket must be positive".into()));
        }
        if self.duplicates.long_form_hook_words == Some(0) {
            return Err(QaError::Config(
                "duplicates.long_form_hook_words must be positive".into(),
            ));
        }
        Ok(())
    }
}

fn unit(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(QaError::Config(format!("{name} must be within [0, 1], got {value}")))
    }
}
