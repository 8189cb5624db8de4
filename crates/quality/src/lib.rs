//! Content quality gate
//!
//! Analyzers, the engine that combines them, and text views of the report.

#![warn(missing_docs)]

pub mod config;
pub mod similarity;
pub mod duplicate;
pub mod cta;
pub mod length;
pub mod headline;
pub mod keywords;
pub mod engine;
pub mod render;

pub use config::{
    CtaConfig, DuplicateConfig, HeadlineConfig, KeywordConfig, LengthConfig, QaConfig,
    MAX_PERMUTATIONS,
};
pub use similarity::similarity;
pub use duplicate::{
    select_algorithm, select_strategy, uniqueness_score, BruteForce, DuplicateDetector,
    DuplicateStrategy, Hook,
};
#[cfg(feature = "minhash")]
pub use duplicate::MinHashLsh;
pub use cta::{classify, classify_text, variety_score, CtaValidator, CTA_RULES};
pub use length::LengthValidator;
pub use headline::{score_headline, HeadlineScorer};
pub use keywords::KeywordAnalyzer;
pub use engine::{BasicQualityEngine, QualityEngine};
pub use render::{render_markdown, summary_line};
