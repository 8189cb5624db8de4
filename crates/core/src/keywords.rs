//! Tiered keyword strategy supplied with a batch.

use serde::{Deserialize, Serialize};

use crate::error::{QaError, Result};

/// Keyword tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordTier {
    /// Keywords every item should carry
    Primary,
    /// Supporting keywords
    Secondary,
    /// Specific long-tail phrases
    LongTail,
}

impl KeywordTier {
    /// All tiers, primary first.
    pub const ALL: [KeywordTier; 3] = [KeywordTier::Primary, KeywordTier::Secondary, KeywordTier::LongTail];

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeywordTier::Primary => "primary",
            KeywordTier::Secondary => "secondary",
            KeywordTier::LongTail => "long_tail",
        }
    }
}

/// Keywords the batch is expected to use, by tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordStrategy {
    /// Must appear in most items
    #[serde(default)]
    pub primary: Vec<String>,

    /// Supporting terms
    #[serde(default)]
    pub secondary: Vec<String>,

    /// Long-tail phrases
    #[serde(default)]
    pub long_tail: Vec<String>,
}

impl KeywordStrategy {
    /// Create a strategy with only primary keywords.
    pub fn new(primary: Vec<String>) -> Self {
        Self {
            primary,
            ..Default::default()
        }
    }

    /// Keywords of one tier.
    pub fn tier(&self, tier: KeywordTier) -> &[String] {
        match tier {
            KeywordTier::Primary => &self.primary,
            KeywordTier::Secondary => &self.secondary,
            KeywordTier::LongTail => &self.long_tail,
        }
    }

    /// Whether no tier has any keyword. An empty strategy counts as not
    /// supplied.
    pub fn is_empty(&self) -> bool {
        KeywordTier::ALL.iter().all(|t| self.tier(*t).is_empty())
    }

    /// Reject blank keywords and a missing primary tier.
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        if self.primary.is_empty() {
            return Err(QaError::invalid("keyword strategy has no primary keywords"));
        }
        for tier in KeywordTier::ALL {
            if self.tier(tier).iter().any(|k| k.trim().is_empty()) {
                return Err(QaError::invalid(format!(
                    "blank keyword in {} tier",
                    tier.as_str()
                )));
            }
        }
        Ok(())
    }

    /// Load a strategy from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let strategy: Self = serde_json::from_str(json)?;
        strategy.validate()?;
        Ok(strategy)
    }
}
