//! contentgate core data models.
//!
//! This crate defines the batch, platform and report structures shared by
//! the quality analyzers and the delivery layer. It contains no analysis
//! logic.

#![warn(missing_docs)]

// Errors
mod error;

// Input
mod platform;
mod item;
mod keywords;

// Output
mod report;

// Re-exports
pub use error::{QaError, Result};

pub use platform::{Platform, PlatformProfile};
pub use item::{Batch, ContentItem, ItemRecord};
pub use keywords::{KeywordStrategy, KeywordTier};

pub use report::{
    AnalyzerKind, Severity, Issue, ValidationResult,
    DuplicateAlgorithm, DuplicatePair, DuplicateSection,
    CtaCategory, Distribution, CtaSection,
    LengthItem, LengthSection,
    HeadlineElements, HeadlineItem, HeadlineSection,
    KeywordItem, KeywordSection,
    QaReport, clamp_unit,
};
