//! Keyword usage analysis.
//!
//! Only runs when a keyword strategy is supplied. Matching is whole-word and
//! case-insensitive; multi-word keywords tolerate any whitespace between
//! their words.

use contentgate_core::{
    AnalyzerKind, Batch, ContentItem, Issue, KeywordItem, KeywordSection, KeywordStrategy,
    KeywordTier, QaError, Result, ValidationResult,
};
use regex::Regex;
use std::collections::BTreeMap;

use crate::config::KeywordConfig;

/// An item is stuffed only with at least this many keyword occurrences and
/// density above `max_density`. A single mention in a very short item is
/// never stuffing.
const MIN_STUFFING_OCCURRENCES: usize = 2;

/// Compiled matcher for one keyword.
#[derive(Debug, Clone)]
struct KeywordMatcher {
    tier: KeywordTier,
    pattern: Regex,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whole-word, case-insensitive pattern for a keyword.
fn keyword_pattern(keyword: &str) -> Result<Regex> {
    let keyword = keyword.trim();
    let body = keyword
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");

    // \b only makes sense next to a word character.
    let lead = if keyword.starts_with(is_word_char) { r"\b" } else { "" };
    let trail = if keyword.ends_with(is_word_char) { r"\b" } else { "" };

    Regex::new(&format!("(?i){lead}{body}{trail}"))
        .map_err(|e| QaError::invalid(format!("keyword \"{keyword}\": {e}")))
}

/// Tiered keyword analyzer.
#[derive(Debug, Clone)]
pub struct KeywordAnalyzer {
    matchers: Vec<KeywordMatcher>,
    config: KeywordConfig,
}

impl KeywordAnalyzer {
    /// Validate the strategy and compile its keywords.
    pub fn new(strategy: &KeywordStrategy, config: KeywordConfig) -> Result<Self> {
        strategy.validate()?;

        let mut matchers = Vec::new();
        for tier in KeywordTier::ALL {
            for keyword in strategy.tier(tier) {
                matchers.push(KeywordMatcher {
                    tier,
                    pattern: keyword_pattern(keyword)?,
                });
            }
        }

        Ok(Self { matchers, config })
    }

    /// Occurrences per tier in one item.
    pub fn count(&self, item: &ContentItem) -> BTreeMap<KeywordTier, usize> {
        let mut counts: BTreeMap<KeywordTier, usize> =
            KeywordTier::ALL.iter().map(|t| (*t, 0)).collect();
        for matcher in &self.matchers {
            let found = matcher.pattern.find_iter(item.text()).count();
            *counts.entry(matcher.tier).or_default() += found;
        }
        counts
    }

    /// Measure every item and check usage and stuffing.
    pub fn analyze(&self, batch: &Batch) -> KeywordSection {
        let n = batch.len();
        let mut issues = Vec::new();
        let mut items = Vec::with_capacity(n);

        for item in batch.items() {
            let counts = self.count(item);
            let occurrences: usize = counts.values().sum();
            let density = if item.word_count() == 0 {
                0.0
            } else {
                occurrences as f64 / item.word_count() as f64
            };
            let has_primary = counts.get(&KeywordTier::Primary).copied().unwrap_or(0) > 0;
            let stuffed =
                occurrences >= MIN_STUFFING_OCCURRENCES && density > self.config.max_density;

            if !has_primary {
                issues.push(Issue::item_error(item.position(), "no primary keyword"));
            }
            if stuffed {
                issues.push(Issue::item_error(
                    item.position(),
                    format!(
                        "keyword stuffing: {} occurrences in {} words ({:.1}%, limit {:.1}%)",
                        occurrences,
                        item.word_count(),
                        density * 100.0,
                        self.config.max_density * 100.0
                    ),
                ));
            }

            items.push(KeywordItem {
                position: item.position(),
                counts,
                density,
                has_primary,
                stuffed,
            });
        }

        let with_primary = items.iter().filter(|i| i.has_primary).count();
        let primary_usage_ratio = if n == 0 { 1.0 } else { with_primary as f64 / n as f64 };
        let missing_primary: Vec<usize> = items
            .iter()
            .filter(|i| !i.has_primary)
            .map(|i| i.position)
            .collect();
        let stuffed_items: Vec<usize> = items
            .iter()
            .filter(|i| i.stuffed)
            .map(|i| i.position)
            .collect();

        // No primary hit anywhere fails even with a zero floor.
        let usage_too_low = n > 0
            && (primary_usage_ratio < self.config.min_primary_usage || with_primary == 0);
        if usage_too_low {
            issues.push(Issue::batch_error(format!(
                "primary keywords used in {:.0}% of items, minimum {:.0}%",
                primary_usage_ratio * 100.0,
                self.config.min_primary_usage * 100.0
            )));
        }

        let passed = !usage_too_low && stuffed_items.is_empty();
        let stuffed_ratio = if n == 0 { 0.0 } else { stuffed_items.len() as f64 / n as f64 };
        let score = primary_usage_ratio * (1.0 - stuffed_ratio);

        let metric = format!(
            "primary usage {:.0}% (minimum {:.0}%), {} stuffed item(s)",
            primary_usage_ratio * 100.0,
            self.config.min_primary_usage * 100.0,
            stuffed_items.len()
        );

        KeywordSection {
            result: ValidationResult::new(AnalyzerKind::Keywords, passed, score, issues, metric),
            items,
            primary_usage_ratio,
            stuffed_items,
            missing_primary,
        }
    }
}
