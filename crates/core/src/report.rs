//! Quality report model - per-analyzer results and the aggregated report.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::keywords::KeywordTier;

/// The analyzers that make up the quality gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyzerKind {
    /// Near-duplicate hooks
    Duplicates,
    /// Call-to-action variety
    Cta,
    /// Length distribution
    Length,
    /// Headline engagement signals
    Headlines,
    /// Keyword usage
    Keywords,
}

impl AnalyzerKind {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyzerKind::Duplicates => "duplicates",
            AnalyzerKind::Cta => "cta",
            AnalyzerKind::Length => "length",
            AnalyzerKind::Headlines => "headlines",
            AnalyzerKind::Keywords => "keywords",
        }
    }
}

/// Issue severity. Only errors fail an analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational only
    Info,
    /// Worth a look, does not fail the analyzer
    Warning,
    /// Fails the analyzer
    Error,
}

/// A single finding, optionally tied to an item position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Severity
    pub severity: Severity,

    /// Offending item position, `None` for batch-level findings
    pub position: Option<usize>,

    /// Human-readable message
    pub message: String,
}

impl Issue {
    /// An error tied to one item.
    pub fn item_error(position: usize, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            position: Some(position),
            message: message.into(),
        }
    }

    /// A warning tied to one item.
    pub fn item_warning(position: usize, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            position: Some(position),
            message: message.into(),
        }
    }

    /// A batch-level error.
    pub fn batch_error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            position: None,
            message: message.into(),
        }
    }
}

/// Outcome of one analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Which analyzer produced this
    pub analyzer: AnalyzerKind,

    /// Whether the analyzer passed
    pub passed: bool,

    /// Sub-score in [0, 1]
    pub score: f64,

    /// Findings
    pub issues: Vec<Issue>,

    /// Human-readable metric line
    pub metric: String,
}

impl ValidationResult {
    /// A result from a pass flag, raw score, issues and metric line.
    ///
    /// The score is clamped to [0, 1].
    pub fn new(
        analyzer: AnalyzerKind,
        passed: bool,
        score: f64,
        issues: Vec<Issue>,
        metric: impl Into<String>,
    ) -> Self {
        Self {
            analyzer,
            passed,
            score: clamp_unit(score),
            issues,
            metric: metric.into(),
        }
    }

    /// Number of error-severity issues.
    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|i| i.severity == Severity::Error).count()
    }
}

/// Clamp to [0, 1], mapping NaN to 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

// === Duplicate hooks ===

/// Which duplicate-search algorithm ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateAlgorithm {
    /// Exact comparison of every pair
    BruteForce,
    /// MinHash signatures with LSH banding, candidates verified exactly
    MinHashLsh,
}

impl DuplicateAlgorithm {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicateAlgorithm::BruteForce => "brute_force",
            DuplicateAlgorithm::MinHashLsh => "minhash_lsh",
        }
    }
}

/// Two items whose hooks are near-duplicates.
///
/// `index_a < index_b` always holds; indices are item positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicatePair {
    /// Lower position
    pub index_a: usize,
    /// Higher position
    pub index_b: usize,
    /// Exact similarity of the two hooks
    pub similarity: f64,
    /// Hook of the first item
    pub label_a: String,
    /// Hook of the second item
    pub label_b: String,
}

/// Duplicate hook detector output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateSection {
    /// Pass flag, score and issues
    pub result: ValidationResult,
    /// Near-duplicate pairs, sorted by `(index_a, index_b)`
    pub pairs: Vec<DuplicatePair>,
    /// Algorithm that produced the pairs
    pub algorithm: DuplicateAlgorithm,
    /// `1 - pairs / (n(n-1)/2)`, in [0, 1]
    pub uniqueness_score: f64,
    /// Number of non-empty hooks that took part in the comparison
    pub compared_hooks: usize,
}

// === Calls to action ===

/// Call-to-action taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CtaCategory {
    /// Asks for a direct message
    DirectMessage,
    /// Asks the reader to save the post
    Save,
    /// Asks the reader to share or repost
    Share,
    /// Asks for a follow or subscription to the author
    Follow,
    /// Asks for a signup or registration
    Signup,
    /// Points to a link
    LinkClick,
    /// Asks for a comment
    Comment,
    /// Closes with a question to the reader
    QuestionTake,
    /// No call to action found
    None,
}

impl CtaCategory {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CtaCategory::DirectMessage => "direct_message",
            CtaCategory::Save => "save",
            CtaCategory::Share => "share",
            CtaCategory::Follow => "follow",
            CtaCategory::Signup => "signup",
            CtaCategory::LinkClick => "link_click",
            CtaCategory::Comment => "comment",
            CtaCategory::QuestionTake => "question_take",
            CtaCategory::None => "none",
        }
    }
}

impl std::fmt::Display for CtaCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category → count mapping.
pub type Distribution = BTreeMap<CtaCategory, usize>;

/// CTA variety validator output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CtaSection {
    /// Pass flag, score and issues
    pub result: ValidationResult,
    /// Category per item position
    pub categories: BTreeMap<usize, CtaCategory>,
    /// Count per category
    pub distribution: Distribution,
    /// Categories whose share exceeds the threshold
    pub overused: Vec<CtaCategory>,
    /// `1 - (max_share - 1/distinct)`, in [0, 1]
    pub variety_score: f64,
    /// Share held by the most frequent category
    pub dominant_share: f64,
    /// Threshold applied
    pub variety_threshold: f64,
}

// === Length distribution ===

/// Length verdict for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LengthItem {
    /// Item position
    pub position: usize,
    /// Profile key used
    pub profile: String,
    /// Word count
    pub word_count: usize,
    /// Within `[min_words, max_words]`
    pub in_range: bool,
    /// Within `[optimal_min, optimal_max]`
    pub in_optimal: bool,
}

/// Length distribution validator output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LengthSection {
    /// Pass flag, score and issues
    pub result: ValidationResult,
    /// Per-item verdicts
    pub items: Vec<LengthItem>,
    /// Fraction of items within the hard limits
    pub in_range_ratio: f64,
    /// Fraction of items within the optimal range
    pub optimal_ratio: f64,
    /// Per profile key: bucket lower bound → count
    pub histograms: BTreeMap<String, BTreeMap<usize, usize>>,
    /// Largest share of items falling in one homogeneity bucket
    pub largest_bucket_share: f64,
    /// Whether the homogeneity check was breached
    pub homogeneous: bool,
}

// === Headlines ===

/// Engagement signals found in a headline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadlineElements {
    /// Contains a digit
    pub number: bool,
    /// Contains a power word
    pub power_word: bool,
    /// Contains an emotional trigger
    pub emotional_trigger: bool,
    /// Ends with a question mark
    pub question_mark: bool,
    /// Contains a question word
    pub question_word: bool,
    /// Contains a capitalized non-initial token
    pub proper_noun: bool,
}

impl HeadlineElements {
    /// Number of signals present.
    pub fn count(&self) -> u8 {
        [
            self.number,
            self.power_word,
            self.emotional_trigger,
            self.question_mark,
            self.question_word,
            self.proper_noun,
        ]
        .iter()
        .filter(|present| **present)
        .count() as u8
    }
}

/// Headline verdict for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlineItem {
    /// Item position
    pub position: usize,
    /// The first line inspected
    pub headline: String,
    /// Signals found
    pub elements: HeadlineElements,
    /// Number of signals found
    pub element_count: u8,
    /// Minimum required by the item's profile
    pub required: u8,
}

/// Headline engagement scorer output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlineSection {
    /// Pass flag, score and issues
    pub result: ValidationResult,
    /// Per-item verdicts
    pub items: Vec<HeadlineItem>,
    /// Mean element count
    pub average_elements: f64,
    /// Fraction of items below their minimum
    pub below_threshold_ratio: f64,
    /// Positions whose hook exceeds the profile's character limit
    pub overlong_hooks: Vec<usize>,
}

// === Keywords ===

/// Keyword usage for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordItem {
    /// Item position
    pub position: usize,
    /// Occurrences per tier
    pub counts: BTreeMap<KeywordTier, usize>,
    /// All occurrences / word count
    pub density: f64,
    /// At least one primary keyword present
    pub has_primary: bool,
    /// Density above the ceiling
    pub stuffed: bool,
}

/// Keyword usage analyzer output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordSection {
    /// Pass flag, score and issues
    pub result: ValidationResult,
    /// Per-item usage
    pub items: Vec<KeywordItem>,
    /// Items with at least one primary keyword / n
    pub primary_usage_ratio: f64,
    /// Positions flagged for stuffing
    pub stuffed_items: Vec<usize>,
    /// Positions with no primary keyword
    pub missing_primary: Vec<usize>,
}

// === Report ===

/// The aggregated quality report for one batch.
///
/// The `keywords` section is absent, not null, when no keyword strategy was
/// supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaReport {
    /// Number of items analyzed
    pub item_count: usize,

    /// AND of every analyzer's pass flag
    pub overall_pass: bool,

    /// Mean of every available sub-score
    pub composite_score: f64,

    /// Duplicate hooks
    pub duplicates: DuplicateSection,

    /// CTA variety
    pub cta: CtaSection,

    /// Length distribution
    pub length: LengthSection,

    /// Headline engagement
    pub headlines: HeadlineSection,

    /// Keyword usage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<KeywordSection>,
}

impl QaReport {
    /// Assemble the report, deriving the composite score and overall pass.
    pub fn assemble(
        item_count: usize,
        duplicates: DuplicateSection,
        cta: CtaSection,
        length: LengthSection,
        headlines: HeadlineSection,
        keywords: Option<KeywordSection>,
    ) -> Self {
        let mut report = Self {
            item_count,
            overall_pass: false,
            composite_score: 0.0,
            duplicates,
            cta,
            length,
            headlines,
            keywords,
        };

        let results = report.results();
        let overall_pass = results.iter().all(|r| r.passed);
        let composite_score =
            results.iter().map(|r| r.score).sum::<f64>() / results.len() as f64;

        report.overall_pass = overall_pass;
        report.composite_score = clamp_unit(composite_score);
        report
    }

    /// Every analyzer result present, in a fixed order.
    pub fn results(&self) -> Vec<&ValidationResult> {
        let mut results = vec![
            &self.duplicates.result,
            &self.cta.result,
            &self.length.result,
            &self.headlines.result,
        ];
        if let Some(keywords) = &self.keywords {
            results.push(&keywords.result);
        }
        results
    }

    /// Every issue across analyzers.
    pub fn issues(&self) -> impl Iterator<Item = (AnalyzerKind, &Issue)> {
        self.results()
            .into_iter()
            .flat_map(|r| r.issues.iter().map(move |i| (r.analyzer, i)))
    }

    /// Results of analyzers that failed.
    pub fn failed(&self) -> Vec<AnalyzerKind> {
        self.results()
            .into_iter()
            .filter(|r| !r.passed)
            .map(|r| r.analyzer)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn passing(analyzer: AnalyzerKind, score: f64) -> ValidationResult {
        ValidationResult::new(analyzer, true, score, Vec::new(), "ok")
    }

    fn sample_report(keywords: Option<KeywordSection>) -> QaReport {
        QaReport::assemble(
            0,
            DuplicateSection {
                result: passing(AnalyzerKind::Duplicates, 1.0),
                pairs: Vec::new(),
                algorithm: DuplicateAlgorithm::BruteForce,
                uniqueness_score: 1.0,
                compared_hooks: 0,
            },
            CtaSection {
                result: passing(AnalyzerKind::Cta, 0.5),
                categories: BTreeMap::new(),
                distribution: Distribution::new(),
                overused: Vec::new(),
                variety_score: 0.5,
                dominant_share: 0.0,
                variety_threshold: 0.4,
            },
            LengthSection {
                result: passing(AnalyzerKind::Length, 1.0),
                items: Vec::new(),
                in_range_ratio: 1.0,
                optimal_ratio: 1.0,
                histograms: BTreeMap::new(),
                largest_bucket_share: 0.0,
                homogeneous: false,
            },
            HeadlineSection {
                result: passing(AnalyzerKind::Headlines, 0.5),
                items: Vec::new(),
                average_elements: 0.0,
                below_threshold_ratio: 0.0,
                overlong_hooks: Vec::new(),
            },
            keywords,
        )
    }

    fn keyword_section(passed: bool, score: f64) -> KeywordSection {
        KeywordSection {
            result: ValidationResult::new(AnalyzerKind::Keywords, passed, score, Vec::new(), ""),
            items: Vec::new(),
            primary_usage_ratio: score,
            stuffed_items: Vec::new(),
            missing_primary: Vec::new(),
        }
    }

    #[test]
    fn test_composite_is_mean_of_available_scores() {
        let report = sample_report(None);
        assert_eq!(report.composite_score, 0.75);
        assert!(report.overall_pass);
        assert_eq!(report.results().len(), 4);
    }

    #[test]
    fn test_keyword_section_joins_composite_and_pass() {
        let report = sample_report(Some(keyword_section(false, 0.0)));
        assert_eq!(report.composite_score, 0.6);
        assert!(!report.overall_pass);
        assert_eq!(report.failed(), vec![AnalyzerKind::Keywords]);
    }

    #[test]
    fn test_absent_keywords_not_serialized() {
        let json = serde_json::to_value(sample_report(None)).unwrap();
        assert!(json.get("keywords").is_none());

        let json = serde_json::to_value(sample_report(Some(keyword_section(true, 1.0)))).unwrap();
        assert!(json.get("keywords").is_some());
    }

    #[test]
    fn test_score_clamped() {
        let result = ValidationResult::new(AnalyzerKind::Cta, true, 1.7, Vec::new(), "");
        assert_eq!(result.score, 1.0);
        assert_eq!(clamp_unit(-0.2), 0.0);
        assert_eq!(clamp_unit(f64::NAN), 0.0);
    }

    #[test]
    fn test_headline_element_count() {
        let elements = HeadlineElements {
            number: true,
            question_mark: true,
            ..Default::default()
        };
        assert_eq!(elements.count(), 2);
    }

    #[test]
    fn test_cta_category_serializes_snake_case() {
        let json = serde_json::to_string(&CtaCategory::QuestionTake).unwrap();
        assert_eq!(json, "\"question_take\"");
        assert_eq!(CtaCategory::QuestionTake.as_str(), "question_take");
    }

    #[test]
    fn test_enum_names_match_serde() {
        for kind in [
            AnalyzerKind::Duplicates,
            AnalyzerKind::Cta,
            AnalyzerKind::Length,
            AnalyzerKind::Headlines,
            AnalyzerKind::Keywords,
        ] {
            assert_eq!(serde_json::to_value(kind).unwrap(), kind.as_str());
        }
        for algorithm in [DuplicateAlgorithm::BruteForce, DuplicateAlgorithm::MinHashLsh] {
            assert_eq!(serde_json::to_value(algorithm).unwrap(), algorithm.as_str());
        }
        assert_eq!(serde_json::to_value(Severity::Warning).unwrap(), "warning");
    }
}
