//! Content items and batches.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{QaError, Result};
use crate::platform::{Platform, PlatformProfile};

/// An item as delivered by the generation pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Ordinal position in the batch
    pub position: usize,

    /// Text body
    pub text: String,

    /// Target platform key (e.g. `"linkedin"`)
    #[serde(default)]
    pub platform: Option<String>,

    /// Template the item was generated from
    #[serde(default)]
    pub template_id: Option<String>,
}

impl ItemRecord {
    /// Create a record without platform or template.
    pub fn new(position: usize, text: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
            platform: None,
            template_id: None,
        }
    }

    /// Set the platform key.
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Set the template identifier.
    pub fn with_template(mut self, template_id: impl Into<String>) -> Self {
        self.template_id = Some(template_id.into());
        self
    }
}

/// A validated content item with its derived metrics.
///
/// Immutable once created for a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentItem {
    position: usize,
    text: String,
    word_count: usize,
    char_count: usize,
    hook: String,
    platform: Option<Platform>,
    template_id: Option<String>,
}

impl ContentItem {
    /// Build an item, deriving word count, character count and hook.
    pub fn new(
        position: usize,
        text: impl Into<String>,
        platform: Option<Platform>,
        template_id: Option<String>,
    ) -> Self {
        let text = text.into();
        let word_count = text.split_whitespace().count();
        let char_count = text.chars().count();
        let hook = first_line(&text).to_string();

        Self {
            position,
            text,
            word_count,
            char_count,
            hook,
            platform,
            template_id,
        }
    }

    /// Ordinal position in the batch.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Text body.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whitespace-delimited word count.
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// Character count (Unicode scalar values).
    pub fn char_count(&self) -> usize {
        self.char_count
    }

    /// First non-blank line, trimmed.
    pub fn hook(&self) -> &str {
        &self.hook
    }

    /// Target platform, if known.
    pub fn platform(&self) -> Option<Platform> {
        self.platform
    }

    /// Template identifier.
    pub fn template_id(&self) -> Option<&str> {
        self.template_id.as_deref()
    }

    /// Resolved thresholds for this item.
    pub fn profile(&self) -> PlatformProfile {
        PlatformProfile::resolve(self.platform)
    }

    /// Whether the item has any non-whitespace text.
    pub fn has_text(&self) -> bool {
        self.word_count > 0
    }

    /// The last `n` non-blank lines, trimmed, in original order.
    pub fn last_lines(&self, n: usize) -> Vec<&str> {
        let mut lines: Vec<&str> = self
            .text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .rev()
            .take(n)
            .collect();
        lines.reverse();
        lines
    }
}

fn first_line(text: &str) -> &str {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("")
}

/// An ordered, validated batch of content items.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Batch {
    items: Vec<ContentItem>,
}

impl Batch {
    /// Validate records and build a batch ordered by position.
    ///
    /// Unknown platform keys are not an error: the item gets no platform and
    /// the default profile applies.
    pub fn from_records(records: Vec<ItemRecord>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.position) {
                return Err(QaError::invalid_item(
                    record.position,
                    "duplicate item position",
                ));
            }
        }

        let mut items: Vec<ContentItem> = records
            .into_iter()
            .map(|record| {
                let platform = match record.platform.as_deref() {
                    Some(key) => {
                        let parsed = Platform::from_key(key);
                        if parsed.is_none() {
                            tracing::warn!(
                                "Unknown platform '{}' on item {}, using default profile",
                                key,
                                record.position
                            );
                        }
                        parsed
                    }
                    None => None,
                };
                ContentItem::new(record.position, record.text, platform, record.template_id)
            })
            .collect();

        items.sort_by_key(|item| item.position);

        let batch = Self { items };
        if !batch.is_empty() && !batch.items.iter().any(ContentItem::has_text) {
            return Err(QaError::NoExtractableText { items: batch.len() });
        }

        Ok(batch)
    }

    /// Load a batch from a JSON array of records.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<ItemRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    /// Items in position order.
    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the batch has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The platform most items target; ties go to the earlier platform in
    /// table order. `None` when no item has a known platform.
    pub fn dominant_platform(&self) -> Option<Platform> {
        let mut counts = [0usize; Platform::ALL.len()];
        for platform in self.items.iter().filter_map(ContentItem::platform) {
            if let Some(idx) = Platform::ALL.iter().position(|p| *p == platform) {
                counts[idx] += 1;
            }
        }

        let mut best: Option<(usize, Platform)> = None;
        for (idx, count) in counts.iter().enumerate() {
            if *count == 0 {
                continue;
            }
            if best.map_or(true, |(c, _)| *count > c) {
                best = Some((*count, Platform::ALL[idx]));
            }
        }
        best.map(|(_, p)| p)
    }

    /// Profile governing batch-level checks.
    pub fn batch_profile(&self) -> PlatformProfile {
        PlatformProfile::resolve(self.dominant_platform())
    }
}
