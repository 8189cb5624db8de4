//! Call-to-action classification and variety validation.
//!
//! Classification walks an ordered rule table; the first matching rule wins
//! and an item matching nothing is [`CtaCategory::None`].

use contentgate_core::{
    AnalyzerKind, Batch, ContentItem, CtaCategory, CtaSection, Distribution, Issue,
    ValidationResult, clamp_unit,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use crate::config::CtaConfig;

/// Number of closing lines inspected.
const CLOSING_LINES: usize = 2;

/// One classification rule.
#[derive(Debug)]
pub struct CtaRule {
    /// Category assigned on match
    pub category: CtaCategory,
    /// Pattern tested against the closing lines
    pub pattern: Regex,
}

impl CtaRule {
    fn new(category: CtaCategory, pattern: &str) -> Self {
        Self {
            category,
            pattern: Regex::new(pattern).unwrap(),
        }
    }

    /// Whether the rule matches the text.
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Rules in evaluation order. More specific asks come before generic ones.
pub static CTA_RULES: Lazy<Vec<CtaRule>> = Lazy::new(|| {
    vec![
        CtaRule::new(
            CtaCategory::DirectMessage,
            r"(?i)\b(dm (me|us)|send (me|us) a (dm|message)|message me|inbox me|reach out)\b",
        ),
        CtaRule::new(
            CtaCategory::Save,
            r"(?i)\b(save (this|it|for later)|bookmark)",
        ),
        CtaRule::new(
            CtaCategory::Share,
            r"(?i)\b(share (this|it|with)|repost|retweet|tag (a|someone|your|a friend))\b",
        ),
        CtaRule::new(
            CtaCategory::Follow,
            r"(?i)\b(follow (me|us|along|for)|subscribe|turn on notifications)\b",
        ),
        CtaRule::new(
            CtaCategory::Signup,
            r"(?i)\b(sign up|register|join (us|the|our)|download|grab your|get your free)\b",
        ),
        CtaRule::new(
            CtaCategory::LinkClick,
            r"(?i)\b(link in (bio|the comments|comments)|click|read more|learn more|check out|visit)\b",
        ),
        CtaRule::new(
            CtaCategory::Comment,
            r"(?i)\b(comment|let me know|drop (a|your)|tell me|in the comments)\b",
        ),
        CtaRule::new(
            CtaCategory::QuestionTake,
            r"(?i)(\b(what do you think|what[’']s your take|what is your take|agree or disagree|thoughts|would you|have you ever|how do you)\b|\?\s*$)",
        ),
    ]
});

/// Classify free text against the rule table.
pub fn classify_text(text: &str) -> CtaCategory {
    let text = text.trim();
    if text.is_empty() {
        return CtaCategory::None;
    }
    CTA_RULES
        .iter()
        .find(|rule| rule.matches(text))
        .map(|rule| rule.category)
        .unwrap_or(CtaCategory::None)
}

/// Classify an item by its closing lines.
pub fn classify(item: &ContentItem) -> CtaCategory {
    classify_text(&item.last_lines(CLOSING_LINES).join("\n"))
}

/// `1 - (max_share - 1/distinct)`, clamped to [0, 1].
///
/// 1.0 when every category is equally represented; falls as one category
/// dominates.
pub fn variety_score(distribution: &Distribution) -> f64 {
    let total: usize = distribution.values().sum();
    let distinct = distribution.values().filter(|c| **c > 0).count();
    if total == 0 || distinct == 0 {
        return 1.0;
    }
    let max_count = distribution.values().copied().max().unwrap_or(0);
    let max_share = max_count as f64 / total as f64;
    clamp_unit(1.0 - (max_share - 1.0 / distinct as f64))
}

/// CTA variety validator.
///
/// Batches under [`CtaConfig::min_items_for_dominance`] items (5 by default)
/// skip the category dominance check.
#[derive(Debug, Clone, Default)]
pub struct CtaValidator {
    config: CtaConfig,
}

impl CtaValidator {
    /// Create a validator.
    pub fn new(config: CtaConfig) -> Self {
        Self { config }
    }

    /// Classify every item and check the distribution.
    pub fn analyze(&self, batch: &Batch) -> CtaSection {
        let n = batch.len();
        let threshold = self
            .config
            .variety_threshold_override
            .unwrap_or_else(|| batch.batch_profile().variety_threshold);

        let categories: BTreeMap<usize, CtaCategory> = batch
            .items()
            .iter()
            .map(|item| (item.position(), classify(item)))
            .collect();

        let mut distribution = Distribution::new();
        for category in categories.values() {
            *distribution.entry(*category).or_default() += 1;
        }

        let share = |count: usize| if n == 0 { 0.0 } else { count as f64 / n as f64 };
        let dominant_share = share(distribution.values().copied().max().unwrap_or(0));
        let variety = variety_score(&distribution);

        let mut issues = Vec::new();

        let mut overused = Vec::new();
        if n >= self.config.min_items_for_dominance {
            for (category, count) in &distribution {
                if *category != CtaCategory::None && share(*count) > threshold {
                    overused.push(*category);
                    issues.push(Issue::batch_error(format!(
                        "CTA category \"{}\" overused: {}/{} items ({:.0}%) exceeds {:.0}%",
                        category,
                        count,
                        n,
                        share(*count) * 100.0,
                        threshold * 100.0
                    )));
                }
            }
        }

        for (position, category) in &categories {
            if *category == CtaCategory::None {
                issues.push(Issue::item_error(
                    *position,
                    "no recognizable call-to-action in closing lines",
                ));
            }
        }

        let passed = issues.is_empty();
        let metric = format!(
            "variety {:.2}, {} distinct categor{}, dominant share {:.0}% (limit {:.0}%)",
            variety,
            distribution.len(),
            if distribution.len() == 1 { "y" } else { "ies" },
            dominant_share * 100.0,
            threshold * 100.0
        );

        CtaSection {
            result: ValidationResult::new(AnalyzerKind::Cta, passed, variety, issues, metric),
            categories,
            distribution,
            overused,
            variety_score: variety,
            dominant_share,
            variety_threshold: threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contentgate_core::ItemRecord;

    fn batch(texts: &[&str]) -> Batch {
        let records = texts
            .iter()
            .enumerate()
            .map(|(i, t)| ItemRecord::new(i, *t))
            .collect();
        Batch::from_records(records).unwrap()
    }

    #[test]
    fn test_each_rule_matches_its_phrase() {
        let cases = [
            ("DM me the word GUIDE", CtaCategory::DirectMessage),
            ("Save this for your next launch.", CtaCategory::Save),
            ("Share this with your team.", CtaCategory::Share),
            ("Follow me for more growth tips.", CtaCategory::Follow),
            ("Sign up for the free workshop.", CtaCategory::Signup),
            ("Link in bio.", CtaCategory::LinkClick),
            ("Let me know in the comments.", CtaCategory::Comment),
            ("What's your take?", CtaCategory::QuestionTake),
            ("Agree or disagree", CtaCategory::QuestionTake),
            ("That is all.", CtaCategory::None),
            ("", CtaCategory::None),
        ];
        for (text, expected) in cases {
            assert_eq!(classify_text(text), expected, "{text}");
        }
    }

    #[test]
    fn test_first_matching_rule_wins() {
        // Both a question and a comment request: comment comes first.
        assert_eq!(classify_text("Comment below: which one would you pick?"), CtaCategory::Comment);
        // Trailing question mark falls through to question_take.
        assert_eq!(classify_text("Ready for Monday?"), CtaCategory::QuestionTake);
    }

    #[test]
    fn test_classify_reads_only_closing_lines() {
        let item = ContentItem::new(
            0,
            "Follow me for more.\nBody line one.\nBody line two.\nThat is all.",
            None,
            None,
        );
        assert_eq!(classify(&item), CtaCategory::None);
    }

    #[test]
    fn test_variety_score_all_distinct_is_one() {
        let distribution: Distribution = [
            (CtaCategory::Save, 1),
            (CtaCategory::Share, 1),
            (CtaCategory::Follow, 1),
        ]
        .into_iter()
        .collect();
        assert_eq!(variety_score(&distribution), 1.0);
        assert_eq!(variety_score(&Distribution::new()), 1.0);
    }

    #[test]
    fn test_variety_score_decreases_with_dominance() {
        let mut previous = f64::MAX;
        for dominant in 1..=8 {
            let distribution: Distribution = [
                (CtaCategory::QuestionTake, dominant),
                (CtaCategory::Share, 1),
                (CtaCategory::Save, 1),
            ]
            .into_iter()
            .collect();
            let score = variety_score(&distribution);
            assert!(score < previous, "dominant={dominant} score={score}");
            previous = score;
        }
    }

    #[test]
    fn test_overused_category_fails() {
        let texts = vec!["Post\nWhat's your take?"; 6];
        let section = CtaValidator::default().analyze(&batch(&texts));
        assert!(!section.result.passed);
        assert_eq!(section.overused, vec![CtaCategory::QuestionTake]);
        assert_eq!(section.dominant_share, 1.0);
    }

    #[test]
    fn test_small_batch_skips_dominance() {
        let texts = vec!["Post\nWhat's your take?"; 2];
        let section = CtaValidator::default().analyze(&batch(&texts));
        assert!(section.result.passed);
        assert!(section.overused.is_empty());
    }

    #[test]
    fn test_dominance_starts_at_five_items() {
        let four = vec!["Post\nWhat's your take?"; 4];
        assert!(CtaValidator::default().analyze(&batch(&four)).overused.is_empty());

        let five = vec!["Post\nWhat's your take?"; 5];
        let section = CtaValidator::default().analyze(&batch(&five));
        assert_eq!(section.overused, vec![CtaCategory::QuestionTake]);
    }

    #[test]
    fn test_missing_cta_reported_per_item() {
        let section = CtaValidator::default().analyze(&batch(&[
            "Post\nShare this with a friend.",
            "Post\nThe end.",
            "Post\nNothing more.",
        ]));
        assert!(!section.result.passed);
        let positions: Vec<_> = section.result.issues.iter().map(|i| i.position).collect();
        assert_eq!(positions, vec![Some(1), Some(2)]);
    }

    #[test]
    fn test_empty_batch_passes() {
        let section = CtaValidator::default().analyze(&Batch::default());
        assert!(section.result.passed);
        assert_eq!(section.variety_score, 1.0);
    }
}
