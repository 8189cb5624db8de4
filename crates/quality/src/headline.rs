//! Headline engagement scoring.
//!
//! Six independent signals each add at most one point to a headline's
//! element count. The lexicons are process-wide and read-only.

use contentgate_core::{
    AnalyzerKind, Batch, HeadlineElements, HeadlineItem, HeadlineSection, Issue,
    ValidationResult,
};
use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;

use crate::config::HeadlineConfig;

static POWER_WORDS: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    [
        "ultimate", "proven", "secret", "secrets", "essential", "exclusive", "instantly",
        "free", "new", "easy", "simple", "powerful", "guaranteed", "effortless", "best",
        "complete", "critical", "definitive", "breakthrough", "boost", "master", "hack",
        "hacks", "insider", "unlock", "transform", "top", "results", "fast", "quick",
        "little-known", "game-changer", "must-have", "step-by-step",
    ]
    .into_iter()
    .collect()
});

static EMOTIONAL_TRIGGERS: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    [
        "amazing", "shocking", "surprising", "heartbreaking", "inspiring", "fear", "love",
        "hate", "mistake", "mistakes", "fail", "failed", "failure", "struggle", "regret",
        "painful", "brutal", "honest", "truth", "warning", "stop", "never", "finally",
        "crazy", "incredible", "unbelievable", "devastating", "proud", "grateful", "lonely",
        "scared", "worried", "dangerous", "embarrassing", "burnout", "fired",
    ]
    .into_iter()
    .collect()
});

/// Question words counted anywhere in the headline.
static WH_WORDS: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    ["how", "what", "why", "when", "where", "who", "which"]
        .into_iter()
        .collect()
});

/// Question words counted only when they open the headline.
static LEADING_AUXILIARIES: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    [
        "can", "should", "would", "could", "is", "are", "do", "does", "did", "will",
    ]
    .into_iter()
    .collect()
});

/// First-person forms that are capitalized without being specific.
const FIRST_PERSON: [&str; 5] = ["I", "I'm", "I've", "I'll", "I'd"];

fn bare(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_alphanumeric() && c != '-' && c != '\'')
        .trim_matches('\'')
}

/// Detect the engagement signals in one headline.
pub fn score_headline(headline: &str) -> HeadlineElements {
    let headline = headline.trim();
    let tokens: Vec<&str> = headline.split_whitespace().collect();
    let lowered: Vec<String> = tokens.iter().map(|t| bare(t).to_lowercase()).collect();

    let proper_noun = tokens.iter().enumerate().skip(1).any(|(i, token)| {
        let word = bare(token);
        let starts_upper = word.chars().next().map_or(false, char::is_uppercase);
        let after_sentence_end = tokens[i - 1].ends_with(&['.', '!', '?', ':'][..]);
        starts_upper && !after_sentence_end && !FIRST_PERSON.contains(&word)
    });

    HeadlineElements {
        number: headline.chars().any(|c| c.is_ascii_digit()),
        power_word: lowered.iter().any(|w| POWER_WORDS.contains(w.as_str())),
        emotional_trigger: lowered.iter().any(|w| EMOTIONAL_TRIGGERS.contains(w.as_str())),
        question_mark: headline.ends_with('?'),
        question_word: lowered.iter().any(|w| WH_WORDS.contains(w.as_str()))
            || lowered
                .first()
                .map_or(false, |w| LEADING_AUXILIARIES.contains(w.as_str())),
        proper_noun,
    }
}

/// Headline engagement scorer.
#[derive(Debug, Clone, Default)]
pub struct HeadlineScorer {
    config: HeadlineConfig,
}

impl HeadlineScorer {
    /// Create a scorer.
    pub fn new(config: HeadlineConfig) -> Self {
        Self { config }
    }

    /// Score every item's first line against its profile minimum.
    pub fn analyze(&self, batch: &Batch) -> HeadlineSection {
        let n = batch.len();
        let mut issues = Vec::new();
        let mut items = Vec::with_capacity(n);
        let mut overlong_hooks = Vec::new();

        for item in batch.items() {
            let profile = item.profile();
            let required = self
                .config
                .min_elements_override
                .unwrap_or(profile.min_headline_elements);
            let elements = score_headline(item.hook());
            let element_count = elements.count();

            if element_count < required {
                issues.push(Issue::item_error(
                    item.position(),
                    format!(
                        "headline has {} engagement element(s), {} required: \"{}\"",
                        element_count,
                        required,
                        item.hook()
                    ),
                ));
            }

            let hook_chars = item.hook().chars().count();
            if hook_chars > profile.hook_max_chars {
                overlong_hooks.push(item.position());
                issues.push(Issue::item_warning(
                    item.position(),
                    format!(
                        "hook is {} characters, limit for {} is {}",
                        hook_chars,
                        profile.key(),
                        profile.hook_max_chars
                    ),
                ));
            }

            items.push(HeadlineItem {
                position: item.position(),
                headline: item.hook().to_string(),
                elements,
                element_count,
                required,
            });
        }

        let below = items.iter().filter(|i| i.element_count < i.required).count();
        let (average_elements, below_threshold_ratio) = if n == 0 {
            (0.0, 0.0)
        } else {
            let total: usize = items.iter().map(|i| i.element_count as usize).sum();
            (total as f64 / n as f64, below as f64 / n as f64)
        };

        let metric = format!(
            "average {:.2} elements, {}/{} below minimum ({:.0}%)",
            average_elements,
            below,
            n,
            below_threshold_ratio * 100.0
        );

        HeadlineSection {
            result: ValidationResult::new(
                AnalyzerKind::Headlines,
                below == 0,
                1.0 - below_threshold_ratio,
                issues,
                metric,
            ),
            items,
            average_elements,
            below_threshold_ratio,
            overlong_hooks,
        }
    }
}
