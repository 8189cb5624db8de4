//! Quality engine.
//!
//! Runs every analyzer over one batch and folds the results into a
//! [`QaReport`]. No analyzer's outcome short-circuits another.

use contentgate_core::{
    Batch, CtaSection, DuplicateSection, HeadlineSection, ItemRecord, KeywordSection,
    KeywordStrategy, LengthSection, QaReport, Result,
};

use crate::config::QaConfig;
use crate::cta::CtaValidator;
use crate::duplicate::DuplicateDetector;
use crate::headline::HeadlineScorer;
use crate::keywords::KeywordAnalyzer;
use crate::length::LengthValidator;

/// Quality engine.
pub trait QualityEngine: Send + Sync {
    /// Run every analyzer over a validated batch.
    ///
    /// The keyword section is present only when a non-empty strategy is
    /// supplied.
    fn run(&self, batch: &Batch, keywords: Option<&KeywordStrategy>) -> Result<QaReport>;

    /// Validate raw records, then run.
    fn run_records(
        &self,
        records: Vec<ItemRecord>,
        keywords: Option<&KeywordStrategy>,
    ) -> Result<QaReport> {
        let batch = Batch::from_records(records)?;
        self.run(&batch, keywords)
    }
}

/// Sections produced by the always-on analyzers.
struct Sections {
    duplicates: DuplicateSection,
    cta: CtaSection,
    length: LengthSection,
    headlines: HeadlineSection,
    keywords: Option<KeywordSection>,
}

/// Basic quality engine implementation.
#[derive(Debug, Clone, Default)]
pub struct BasicQualityEngine {
    config: QaConfig,
}

impl BasicQualityEngine {
    /// Create an engine, rejecting malformed configuration.
    pub fn new(config: QaConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration.
    pub fn config(&self) -> &QaConfig {
        &self.config
    }

    fn analyze_sequential(&self, batch: &Batch, keywords: Option<&KeywordAnalyzer>) -> Sections {
        Sections {
            duplicates: DuplicateDetector::new(self.config.duplicates.clone()).analyze(batch),
            cta: CtaValidator::new(self.config.cta.clone()).analyze(batch),
            length: LengthValidator::new(self.config.length.clone()).analyze(batch),
            headlines: HeadlineScorer::new(self.config.headlines.clone()).analyze(batch),
            keywords: keywords.map(|analyzer| analyzer.analyze(batch)),
        }
    }

    fn analyze_parallel(&self, batch: &Batch, keywords: Option<&KeywordAnalyzer>) -> Sections {
        let ((duplicates, cta), ((length, headlines), keywords)) = rayon::join(
            || {
                rayon::join(
                    || DuplicateDetector::new(self.config.duplicates.clone()).analyze(batch),
                    || CtaValidator::new(self.config.cta.clone()).analyze(batch),
                )
            },
            || {
                rayon::join(
                    || {
                        rayon::join(
                            || LengthValidator::new(self.config.length.clone()).analyze(batch),
                            || HeadlineScorer::new(self.config.headlines.clone()).analyze(batch),
                        )
                    },
                    || keywords.map(|analyzer| analyzer.analyze(batch)),
                )
            },
        );

        Sections {
            duplicates,
            cta,
            length,
            headlines,
            keywords,
        }
    }
}

impl QualityEngine for BasicQualityEngine {
    fn run(&self, batch: &Batch, keywords: Option<&KeywordStrategy>) -> Result<QaReport> {
        // Strategy errors surface before any analysis starts.
        let keyword_analyzer = match keywords {
            Some(strategy) if !strategy.is_empty() => Some(KeywordAnalyzer::new(
                strategy,
                self.config.keywords.clone(),
            )?),
            _ => None,
        };

        tracing::debug!(
            "Running quality analyzers over {} item(s), keywords: {}",
            batch.len(),
            keyword_analyzer.is_some()
        );

        let sections = if self.config.parallel_analyzers {
            self.analyze_parallel(batch, keyword_analyzer.as_ref())
        } else {
            self.analyze_sequential(batch, keyword_analyzer.as_ref())
        };

        let report = QaReport::assemble(
            batch.len(),
            sections.duplicates,
            sections.cta,
            sections.length,
            sections.headlines,
            sections.keywords,
        );

        tracing::info!(
            items = report.item_count,
            composite = report.composite_score,
            passed = report.overall_pass,
            "Quality report assembled"
        );

        Ok(report)
    }
}
